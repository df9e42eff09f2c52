use std::fmt;

/// Commands available in the line-oriented client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fill in and register a sale.
    Sale,
    /// Fetch the seller profile from the server.
    Profile,
    /// Query API health.
    Health,
    /// Show the local session state.
    Status,
    /// List the vehicle catalog.
    Vehicles,
    Logout,
    Help,
    Quit,
}

impl Command {
    /// Every command with a one-line description, in help order.
    pub const HELP: [(&'static str, &'static str); 8] = [
        ("sale", "register a sale"),
        ("profile", "show your seller profile"),
        ("health", "check the API health"),
        ("status", "show the current session"),
        ("vehicles", "list the vehicle catalog"),
        ("logout", "end the session"),
        ("help", "show this message"),
        ("quit", "exit the portal"),
    ];
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was entered.
    Empty,
    /// Command does not take arguments.
    UnexpectedArguments(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Enter a command. Type 'help' to see available commands"),
            Self::UnexpectedArguments(cmd) => write!(
                f,
                "'{}' does not take arguments (e.g., just '{}')",
                cmd, cmd
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Examples
///
/// ```
/// use dp_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("sale"), Ok(Command::Sale));
/// assert_eq!(parse_command("  Quit "), Ok(Command::Quit));
/// assert!(parse_command("sell").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    let Some(first) = parts.first() else {
        return Err(ParseError::Empty);
    };

    let name = first.to_ascii_lowercase();
    let command = match name.as_str() {
        "sale" | "new" => Command::Sale,
        "profile" | "me" => Command::Profile,
        "health" => Command::Health,
        "status" => Command::Status,
        "vehicles" | "catalog" => Command::Vehicles,
        "logout" => Command::Logout,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    };

    if parts.len() > 1 {
        return Err(ParseError::UnexpectedArguments(name));
    }
    Ok(command)
}
