//! Parsing of console input lines.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit this text as a query.
    Ask(String),
    /// Submit whatever is in the input buffer (e.g. after `/pick`).
    Send,
    /// Re-submit suggestion N (1-based) of the latest answer.
    Suggest(usize),
    /// Put sidebar entry N (1-based) into the input buffer.
    Pick(usize),
    Speak,
    Clear,
    History,
    Sidebar,
    ToggleSidebar,
    ToggleSql,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    MissingIndex(&'static str),
    BadIndex(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unknown(cmd) => write!(f, "unknown command {}, try /help", cmd),
            ParseError::MissingIndex(cmd) => write!(f, "{} needs a number", cmd),
            ParseError::BadIndex(raw) => write!(f, "{} is not a positive number", raw),
        }
    }
}

pub const HELP: &str = "\
Type a question and press Enter to ask it.
  (empty line)     send the prefilled input
  /suggest N       ask suggestion N from the latest answer
  /pick N          prefill sidebar entry N
  /sidebar         show the sidebar ([toggle] to collapse/expand)
  /history         show recent queries
  /sql             show or hide SQL blocks
  /speak           read the latest answer aloud, again to stop
  /clear           clear the conversation
  /quit            exit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Send);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Ask(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "suggest" | "s" => index(arg, "/suggest").map(Command::Suggest),
        "pick" | "p" => index(arg, "/pick").map(Command::Pick),
        "speak" => Ok(Command::Speak),
        "clear" => Ok(Command::Clear),
        "history" => Ok(Command::History),
        "sidebar" => match arg {
            Some("toggle") => Ok(Command::ToggleSidebar),
            _ => Ok(Command::Sidebar),
        },
        "sql" => Ok(Command::ToggleSql),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(format!("/{}", other))),
    }
}

fn index(arg: Option<&str>, command: &'static str) -> Result<usize, ParseError> {
    let raw = arg.ok_or(ParseError::MissingIndex(command))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadIndex(raw.to_string())),
    }
}
