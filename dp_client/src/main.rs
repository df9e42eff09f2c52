//! A terminal client for the dealership sales portal.
//!
//! The client restores or establishes a session against the portal API,
//! then lets a seller register car sales from a command prompt or a TUI.

use anyhow::{Context, Result};
use dealer_portal::{
    Portal, SessionManager, View,
    auth::{FileTokenStore, MemoryTokenStore, TokenStore, event_channel},
    forms::LoginField,
    sales::LoggingSaleSink,
};
use pico_args::Arguments;
use std::{io, sync::Arc};
use tracing::{info, warn};

use dp_client::{
    api_client::ApiClient,
    cli::{CliApp, InitialCredentials},
    config::ClientConfig,
    logging::{self, LogTarget},
    tui_app::TuiApp,
};

const HELP: &str = "\
Register car sales with the dealership portal

USAGE:
  dp_client [OPTIONS]

OPTIONS:
  --server URL          API base URL  [default: $PORTAL_API_URL or http://localhost:8000]
  --username NAME       Username for login
  --password PASS       Password for login
  --tui                 Use TUI (Terminal UI) mode [default: false]
  --ephemeral           Keep the session in memory only

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    use_tui: bool,
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server").ok().flatten(),
        username: pargs.opt_value_from_str("--username").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        use_tui: pargs.contains("--tui"),
        ephemeral: pargs.contains("--ephemeral"),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env(args.server_url).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let log_target = if args.use_tui {
        LogTarget::File(config.log_path.clone())
    } else {
        LogTarget::Stderr
    };
    logging::init(&log_target).context("Failed to initialize logging")?;
    info!(api = %config.api_base_url, "Dealer portal client starting");

    let store: Arc<dyn TokenStore> = if args.ephemeral {
        Arc::new(MemoryTokenStore::new())
    } else {
        Arc::new(FileTokenStore::new(config.token_path.clone()))
    };

    let (events_tx, events_rx) = event_channel();
    let api = ApiClient::new(config.api_base_url.clone(), store.clone(), events_tx);
    let session = SessionManager::new(Arc::new(api), store);
    let mut portal = Portal::new(session, events_rx, Box::new(LoggingSaleSink::new()));

    if portal.start() == View::Dashboard && config.revalidate_on_startup {
        // A stale token answers 401 and sends the portal back to login.
        if let Err(e) = portal.refresh_profile().await {
            warn!("Stored session could not be revalidated: {e}");
        }
    }

    if args.use_tui {
        let form = portal.login_form_mut();
        if let Some(username) = args.username {
            form.edit(LoginField::Username, username);
        }
        if let Some(password) = args.password {
            form.edit(LoginField::Password, password);
        }

        let terminal = ratatui::init();
        let result = TuiApp::new(portal).run(terminal).await;
        ratatui::restore();
        result?;
    } else {
        let initial = InitialCredentials {
            username: args.username,
            password: args.password,
        };
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        CliApp::new(portal).run(&mut input, &mut out, initial).await?;
    }

    info!("Dealer portal client exiting");
    Ok(())
}
