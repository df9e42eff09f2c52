//! TUI front end for the dealer portal.
//!
//! Renders the login screen or the sales dashboard depending on the
//! portal's current view. Network calls are awaited inline, so the screen
//! is redrawn with a progress indicator before each one.

use anyhow::Result;
use chrono::{DateTime, Local};
use dealer_portal::{
    Portal, View,
    forms::LoginField,
    notification::{Notification, NotificationKind},
    sales::SaleField,
};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Clear, List, ListDirection, ListItem, Padding, Paragraph, Scrollbar,
        ScrollbarOrientation, Wrap,
    },
};
use std::time::Duration;
use tracing::debug;

use crate::{
    api_client::ApiClient,
    logging::{AuthEvent, log_auth_event},
};

mod widgets;

use widgets::{ScrollableList, UserInput};

const MAX_LOG_RECORDS: usize = 256;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Clone, Copy)]
enum RecordKind {
    Ack,
    Alert,
    Error,
    Sale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ApiStatus {
    Unknown,
    Healthy,
    Unreachable,
}

/// A timestamped history entry.
struct Record {
    datetime: DateTime<Local>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Local::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Sale => "SALE".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];
        ListItem::new(Line::from(msg))
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    SubmitLogin,
    Logout,
    Refresh,
    Quit,
}

/// TUI App state
pub struct TuiApp {
    portal: Portal<ApiClient>,
    login_focus: LoginField,
    username: UserInput,
    password: UserInput,
    /// Drawn while a login request is in flight
    signing_in: bool,
    /// Index into `SaleField::ALL`
    sale_focus: usize,
    /// One input per entry of `SaleField::ALL`
    sale_inputs: Vec<UserInput>,
    /// History of recorded messages
    log_handle: ScrollableList,
    api_status: ApiStatus,
}

impl TuiApp {
    /// Wrap a started portal.
    pub fn new(portal: Portal<ApiClient>) -> Self {
        let mut app = Self {
            portal,
            login_focus: LoginField::Username,
            username: UserInput::new(),
            password: UserInput::new(),
            signing_in: false,
            sale_focus: 0,
            sale_inputs: vec![UserInput::new(); SaleField::ALL.len()],
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            api_status: ApiStatus::Unknown,
        };
        app.sync_login_inputs();
        app.sync_sale_inputs();
        app
    }

    pub fn portal(&self) -> &Portal<ApiClient> {
        &self.portal
    }

    fn add_log(&mut self, kind: RecordKind, content: impl Into<String>) {
        let record = Record::new(kind, content.into());
        self.log_handle.push(record.into());
    }

    fn focused_sale_field(&self) -> SaleField {
        SaleField::ALL[self.sale_focus]
    }

    fn sync_login_inputs(&mut self) {
        let form = self.portal.login_form();
        let username = form.value(LoginField::Username).to_string();
        let password = form.value(LoginField::Password).to_string();
        self.username.set(username);
        self.password.set(password);
    }

    fn sync_sale_inputs(&mut self) {
        let draft = self.portal.sale_form().draft().clone();
        for (input, field) in self.sale_inputs.iter_mut().zip(SaleField::ALL) {
            input.set(draft.value(field));
        }
    }

    /// Handle pending API events and refresh inputs the portal reset.
    fn process_events(&mut self) {
        self.portal.process_events();
        if self.portal.take_expired() {
            log_auth_event(AuthEvent::SessionExpired, None, "Session rejected by the server");
            self.add_log(RecordKind::Alert, "Session expired, please sign in again");
            self.sync_login_inputs();
            self.sync_sale_inputs();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        // Any key closes the modal.
        if self.portal.notification().is_some() {
            self.portal.dismiss_notification();
            return Action::None;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return Action::Quit,
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
            _ => {}
        }

        match self.portal.view() {
            View::Login => self.handle_login_key(key),
            View::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Action {
        if self.signing_in {
            return Action::None;
        }

        let input = match self.login_focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        };
        match key.code {
            KeyCode::Enter => return Action::SubmitLogin,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_focus = self.login_focus.next();
                return Action::None;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.input(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.jump_to_first(),
            KeyCode::End => input.jump_to_last(),
            _ => return Action::None,
        }

        let value = input.value.clone();
        self.portal.login_form_mut().edit(self.login_focus, value);
        Action::None
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers == KeyModifiers::CONTROL {
            return match key.code {
                KeyCode::Char('l') => Action::Logout,
                KeyCode::Char('r') => Action::Refresh,
                KeyCode::Home => {
                    self.log_handle.jump_to_first();
                    Action::None
                }
                KeyCode::End => {
                    self.log_handle.jump_to_last();
                    Action::None
                }
                _ => Action::None,
            };
        }

        let field = self.focused_sale_field();
        match key.code {
            KeyCode::Enter => {
                let notification = self.portal.submit_sale();
                self.record_sale_result(&notification);
                self.sync_sale_inputs();
                return Action::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.sale_focus = (self.sale_focus + 1) % SaleField::ALL.len();
                return Action::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.sale_focus =
                    (self.sale_focus + SaleField::ALL.len() - 1) % SaleField::ALL.len();
                return Action::None;
            }
            KeyCode::PageUp => {
                self.log_handle.move_up();
                return Action::None;
            }
            KeyCode::PageDown => {
                self.log_handle.move_down();
                return Action::None;
            }
            _ => {}
        }

        if let Some(options) = field.options() {
            let step: isize = match key.code {
                KeyCode::Left => -1,
                KeyCode::Right | KeyCode::Char(' ') => 1,
                _ => return Action::None,
            };
            let current = self.sale_inputs[self.sale_focus].value.clone();
            let next = cycle_option(&options, &current, step);
            self.portal.sale_form_mut().edit(field, next);
            self.sync_sale_inputs();
            return Action::None;
        }

        let input = &mut self.sale_inputs[self.sale_focus];
        match key.code {
            KeyCode::Char(c) => input.input(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.jump_to_first(),
            KeyCode::End => input.jump_to_last(),
            _ => return Action::None,
        }
        let value = input.value.clone();
        self.portal.sale_form_mut().edit(field, &value);
        Action::None
    }

    fn record_sale_result(&mut self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => {
                self.add_log(RecordKind::Sale, notification.message.clone())
            }
            NotificationKind::Error => self.add_log(
                RecordKind::Error,
                format!("{}: {}", notification.title, notification.message),
            ),
        }
    }

    async fn submit_login(&mut self) {
        let username = self.username.value.trim().to_string();
        match self.portal.submit_login().await {
            Some(outcome) if outcome.is_success() => {
                log_auth_event(AuthEvent::LoginSucceeded, Some(&username), "Signed in");
                self.add_log(RecordKind::Ack, format!("Signed in as {username}"));
                self.login_focus = LoginField::Username;
                self.sync_sale_inputs();
            }
            Some(outcome) => {
                let message = outcome.error().unwrap_or_default().to_string();
                log_auth_event(AuthEvent::LoginFailed, Some(&username), &message);
            }
            None => debug!("Login form incomplete"),
        }
        self.sync_login_inputs();
    }

    async fn logout(&mut self) {
        if let Err(e) = self.portal.api().logout().await {
            debug!("Server logout failed: {e}");
        }
        self.portal.logout();
        // The session is already gone, so a 401 here is no expiry.
        self.portal.process_events();
        log_auth_event(AuthEvent::Logout, None, "Signed out");
        self.login_focus = LoginField::Username;
        self.sync_login_inputs();
        self.sync_sale_inputs();
    }

    async fn refresh(&mut self) {
        self.check_health().await;
        match self.portal.refresh_profile().await {
            Ok(profile) => {
                self.add_log(RecordKind::Ack, format!("Profile loaded for {}", profile.username));
                self.sync_sale_inputs();
            }
            Err(e) => self.add_log(RecordKind::Error, format!("Profile unavailable: {e}")),
        }
    }

    async fn check_health(&mut self) {
        self.api_status = match self.portal.check_health().await {
            Ok(health) if health.is_healthy() => ApiStatus::Healthy,
            Ok(health) => {
                self.add_log(RecordKind::Alert, format!("API reports status '{}'", health.status));
                ApiStatus::Unreachable
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                ApiStatus::Unreachable
            }
        };
    }

    /// Render the login screen
    fn draw_login(&self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Length(13)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(56)]).flex(Flex::Center);
        let [area] = vertical.areas(frame.area());
        let [area] = horizontal.areas(area);

        let block = Block::bordered()
            .padding(Padding::horizontal(1))
            .title(" dealer portal: sign in  ".light_green());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [username_area, password_area, message_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .areas(inner);

        let masked = "*".repeat(self.password.value.chars().count());
        for (field, area, text) in [
            (LoginField::Username, username_area, self.username.value.clone()),
            (LoginField::Password, password_area, masked),
        ] {
            let mut block = Block::bordered().title(format!(" {}  ", field.label()));
            if field == self.login_focus {
                block = block.border_style(Style::default().light_green());
            }
            frame.render_widget(Paragraph::new(text).block(block), area);
        }

        let message = if self.signing_in {
            Line::from("Signing in...".light_yellow())
        } else if let Some(error) = self.portal.login_form().error() {
            Line::from(error.to_string().light_red())
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), message_area);

        let hint = Line::from(vec![
            "Tab".bold().white(),
            " switch field, ".into(),
            "Enter".bold().white(),
            " sign in, ".into(),
            "Esc".bold().white(),
            " exit".into(),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);

        if !self.signing_in {
            let (input, area) = match self.login_focus {
                LoginField::Username => (&self.username, username_area),
                LoginField::Password => (&self.password, password_area),
            };
            frame.set_cursor_position(cursor_position(area, input.char_idx, 1));
        }
    }

    /// Render the seller header
    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let user = self.portal.session().user();
        let branch = user.and_then(|u| u.branch()).unwrap_or("-");
        let seller = user.and_then(|u| u.display_name()).unwrap_or("-");
        let code = match self.portal.session().seller_code() {
            "" => "-",
            code => code,
        };
        let today = Local::now().format("%B %-d, %Y").to_string();

        let block = Block::bordered().title(" registration of a car sale  ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::horizontal([Constraint::Fill(1); 4]).split(inner);
        for (area, (label, value)) in columns.iter().zip([
            ("Date", today.as_str()),
            ("Branch", branch),
            ("Seller", seller),
            ("Seller code", code),
        ]) {
            let lines = vec![Line::from(label.dark_gray()), Line::from(value.to_string().bold())];
            frame.render_widget(Paragraph::new(lines), *area);
        }
    }

    /// Render the sale form
    fn draw_sale_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .padding(Padding::horizontal(1))
            .title(" new sale  ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(2); SaleField::ALL.len() + 1];
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        for (idx, field) in SaleField::ALL.into_iter().enumerate() {
            let focused = idx == self.sale_focus;
            let label = if focused {
                format!("> {}", field.label()).light_green().bold()
            } else {
                format!("  {}", field.label()).into()
            };
            let value = &self.sale_inputs[idx].value;
            let value = match field.options() {
                Some(_) if value.is_empty() => "  < select >".dark_gray(),
                Some(_) => format!("  < {value} >").into(),
                None => format!("  {value}").into(),
            };
            frame.render_widget(Paragraph::new(vec![Line::from(label), Line::from(value)]), rows[idx]);

            if focused && field.options().is_none() {
                frame.set_cursor_position(cursor_position(
                    rows[idx],
                    self.sale_inputs[idx].char_idx,
                    2,
                ));
            }
        }

        let seller_code = self.portal.sale_form().draft().seller_code.clone();
        let seller_line = Line::from(vec![
            "  Seller code: ".dark_gray(),
            if seller_code.is_empty() { "-".into() } else { seller_code.into() },
        ]);
        frame.render_widget(Paragraph::new(seller_line), rows[SaleField::ALL.len()]);
    }

    /// Render the history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the status bar at the bottom
    fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_indicator = match self.api_status {
            ApiStatus::Unknown => "● API unknown".dark_gray(),
            ApiStatus::Healthy => "● API healthy".green(),
            ApiStatus::Unreachable => "● API unreachable".red(),
        };

        let help_message = vec![
            status_indicator,
            " | ".into(),
            "Enter".bold().white(),
            " register, ".into(),
            "←/→".bold().white(),
            " choose, ".into(),
            "Ctrl+R".bold().white(),
            " refresh, ".into(),
            "Ctrl+L".bold().white(),
            " log out, ".into(),
            "Esc".bold().white(),
            " exit".into(),
        ];
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Render the active notification as a centered modal
    fn draw_notification(&self, frame: &mut Frame, notification: &Notification) {
        let vertical = Layout::vertical([Constraint::Length(7)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(60)]).flex(Flex::Center);
        let [area] = vertical.areas(frame.area());
        let [area] = horizontal.areas(area);
        frame.render_widget(Clear, area);

        let title = format!(" {}  ", notification.title);
        let block = match notification.kind {
            NotificationKind::Success => Block::bordered()
                .title(title.light_green())
                .border_style(Style::default().light_green()),
            NotificationKind::Error => Block::bordered()
                .title(title.light_red())
                .border_style(Style::default().light_red()),
        };
        let body = vec![
            Line::from(notification.message.clone()),
            Line::default(),
            Line::from("press any key to close".dark_gray()),
        ];
        frame.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: true })
                .block(block.padding(Padding::uniform(1))),
            area,
        );
    }

    /// Main draw function
    fn draw(&mut self, frame: &mut Frame) {
        match self.portal.view() {
            View::Login => self.draw_login(frame),
            View::Dashboard => {
                let [header_area, body_area, status_area] = Layout::vertical([
                    Constraint::Length(4),
                    Constraint::Min(8),
                    Constraint::Length(1),
                ])
                .areas(frame.area());
                let [form_area, log_area] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .areas(body_area);

                self.draw_header(frame, header_area);
                self.draw_sale_form(frame, form_area);
                self.draw_log(frame, log_area);
                self.draw_status_bar(frame, status_area);
            }
        }

        if let Some(notification) = self.portal.notification() {
            self.draw_notification(frame, notification);
        }
    }

    /// Run the TUI application
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.check_health().await;

        loop {
            self.process_events();
            terminal.draw(|frame| self.draw(frame))?;

            if !event::poll(POLL_TIMEOUT)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match self.handle_key(key) {
                Action::None => {}
                Action::Quit => return Ok(()),
                Action::SubmitLogin => {
                    self.signing_in = true;
                    terminal.draw(|frame| self.draw(frame))?;
                    self.submit_login().await;
                    self.signing_in = false;
                }
                Action::Logout => self.logout().await,
                Action::Refresh => self.refresh().await,
            }
        }
    }
}

/// Cursor for text on the second line of `area`, `pad` columns in. Long
/// text pins the cursor to the last column inside the field.
fn cursor_position(area: Rect, char_idx: usize, pad: u16) -> Position {
    let offset = u16::try_from(char_idx)
        .unwrap_or(u16::MAX)
        .saturating_add(pad)
        .min(area.width.saturating_sub(2));
    Position::new(area.x.saturating_add(offset), area.y.saturating_add(1))
}

/// Step through `options` from `current`. An empty or unknown value
/// starts at the first option.
fn cycle_option<'a>(options: &[&'a str], current: &str, step: isize) -> &'a str {
    let len = options.len() as isize;
    let next = match options.iter().position(|option| *option == current) {
        Some(idx) => (idx as isize + step).rem_euclid(len),
        None if step < 0 => len - 1,
        None => 0,
    };
    options[next as usize]
}
