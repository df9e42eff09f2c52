//! Line-oriented front end.
//!
//! Reads credentials and commands from any [`BufRead`] and writes to any
//! [`Write`], so the same loop serves a terminal and scripted input.

use anyhow::Result;
use dealer_portal::{
    Portal, View,
    auth::SessionPhase,
    forms::LoginField,
    sales::{SaleField, VEHICLE_CATALOG},
};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::{
    api_client::ApiClient,
    commands::{Command, parse_command},
    logging::{AuthEvent, log_auth_event},
};

/// Credentials given up front, used for the first login attempt only.
#[derive(Debug, Default, Clone)]
pub struct InitialCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub struct CliApp {
    portal: Portal<ApiClient>,
}

impl CliApp {
    /// Wrap a started portal.
    pub fn new(portal: Portal<ApiClient>) -> Self {
        Self { portal }
    }

    pub fn portal(&self) -> &Portal<ApiClient> {
        &self.portal
    }

    /// Run until `quit` or end of input.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        mut initial: InitialCredentials,
    ) -> Result<()> {
        loop {
            self.portal.process_events();
            if self.portal.take_expired() {
                log_auth_event(AuthEvent::SessionExpired, None, "Session rejected by the server");
                writeln!(out, "Your session has expired. Please sign in again.")?;
            }

            match self.portal.view() {
                View::Login => {
                    let username = match initial.username.take() {
                        Some(username) => username,
                        None => match prompt(input, out, "Username: ")? {
                            Some(username) => username,
                            None => return Ok(()),
                        },
                    };
                    let password = match initial.password.take() {
                        Some(password) => password,
                        None => match prompt(input, out, "Password: ")? {
                            Some(password) => password,
                            None => return Ok(()),
                        },
                    };
                    self.login(out, username, password).await?;
                }
                View::Dashboard => {
                    let Some(line) = prompt(input, out, "> ")? else {
                        return Ok(());
                    };
                    match parse_command(&line) {
                        Ok(Command::Quit) => return Ok(()),
                        Ok(command) => self.dispatch(input, out, command).await?,
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
            }
        }
    }

    async fn login<W: Write>(&mut self, out: &mut W, username: String, password: String) -> Result<()> {
        let form = self.portal.login_form_mut();
        form.edit(LoginField::Username, username.as_str());
        form.edit(LoginField::Password, password);

        writeln!(out, "Signing in as {}...", username.trim())?;
        match self.portal.submit_login().await {
            Some(outcome) if outcome.is_success() => {
                log_auth_event(AuthEvent::LoginSucceeded, Some(username.trim()), "Signed in");
                writeln!(out, "Welcome! Type 'help' to see available commands.")?;
            }
            Some(outcome) => {
                let message = outcome.error().unwrap_or_default();
                log_auth_event(AuthEvent::LoginFailed, Some(username.trim()), message);
                writeln!(out, "Login failed: {message}")?;
            }
            None => {
                let message = self.portal.login_form().error().unwrap_or_default();
                writeln!(out, "{message}")?;
            }
        }
        Ok(())
    }

    async fn dispatch<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        command: Command,
    ) -> Result<()> {
        match command {
            Command::Sale => self.register_sale(input, out)?,
            Command::Profile => match self.portal.refresh_profile().await {
                Ok(profile) => {
                    writeln!(out, "Username:    {}", profile.username)?;
                    writeln!(out, "Name:        {}", profile.full_name.as_deref().unwrap_or("-"))?;
                    writeln!(out, "Email:       {}", profile.email.as_deref().unwrap_or("-"))?;
                    writeln!(out, "Seller code: {}", profile.seller_code.as_deref().unwrap_or("-"))?;
                    writeln!(out, "Branch:      {}", profile.branch.as_deref().unwrap_or("-"))?;
                }
                Err(e) => writeln!(out, "Could not load profile: {e}")?,
            },
            Command::Health => match self.portal.check_health().await {
                Ok(health) => writeln!(
                    out,
                    "API status: {} ({} {})",
                    health.status,
                    health.service.as_deref().unwrap_or("unknown service"),
                    health.version.as_deref().unwrap_or("")
                )?,
                Err(e) => writeln!(out, "API unreachable: {e}")?,
            },
            Command::Status => {
                let session = self.portal.session();
                let phase = match session.phase() {
                    SessionPhase::Authenticated => "signed in",
                    SessionPhase::Unauthenticated => "signed out",
                    SessionPhase::Loading => "signing in",
                    SessionPhase::Uninitialized => "starting",
                };
                let user = session.user();
                writeln!(out, "Session:     {phase}")?;
                writeln!(out, "User:        {}", user.and_then(|u| u.display_name()).unwrap_or("-"))?;
                writeln!(out, "Branch:      {}", user.and_then(|u| u.branch()).unwrap_or("-"))?;
                writeln!(out, "Seller code: {}", or_dash(session.seller_code()))?;
                writeln!(out, "Route:       {}", self.portal.navigator().route())?;
            }
            Command::Vehicles => {
                for (idx, vehicle) in VEHICLE_CATALOG.iter().enumerate() {
                    writeln!(out, "  {}. {vehicle}", idx + 1)?;
                }
            }
            Command::Logout => {
                if let Err(e) = self.portal.api().logout().await {
                    debug!("Server logout failed: {e}");
                }
                self.portal.logout();
                // The session is already gone, so a 401 here is no expiry.
                self.portal.process_events();
                log_auth_event(AuthEvent::Logout, None, "Signed out");
                writeln!(out, "Signed out.")?;
            }
            Command::Help => {
                for (name, description) in Command::HELP {
                    writeln!(out, "  {name:<10} {description}")?;
                }
            }
            Command::Quit => {}
        }
        Ok(())
    }

    /// Prompt for every sale field, then submit.
    fn register_sale<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        for field in SaleField::ALL {
            if let Some(options) = field.options() {
                writeln!(out, "{}:", field.label())?;
                for (idx, option) in options.iter().enumerate() {
                    writeln!(out, "  {}. {option}", idx + 1)?;
                }
            }
            let Some(answer) = prompt(input, out, &format!("{}: ", field.label()))? else {
                return Ok(());
            };
            let value = field
                .options()
                .and_then(|options| pick_option(&options, &answer))
                .map_or(answer.clone(), str::to_string);
            self.portal.sale_form_mut().edit(field, &value);
        }

        let notification = self.portal.submit_sale();
        writeln!(out, "[{}] {}", notification.title, notification.message)?;
        self.portal.dismiss_notification();
        Ok(())
    }
}

/// Resolve a numbered or case-insensitive answer to one of `options`.
fn pick_option<'a>(options: &[&'a str], answer: &str) -> Option<&'a str> {
    let answer = answer.trim();
    if let Ok(number) = answer.parse::<usize>() {
        return number.checked_sub(1).and_then(|idx| options.get(idx)).copied();
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(answer))
        .copied()
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Print `label` and read one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
