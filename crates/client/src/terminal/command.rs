//! Player input lines parsed into terminal commands.
use std::str::FromStr;

use annex_core::PlayerAction;
use thiserror::Error;

/// One line of player input.
///
/// Choice numbers are typed 1-based and stored 0-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Triage the log on the terminal, with the words blacked out during a
    /// redaction event.
    Act {
        action: PlayerAction,
        redactions: Option<u32>,
    },
    Intro,
    Start,
    /// Close the open email, optionally answering with one of its options.
    Email(Option<usize>),
    Lunch(usize),
    Review(usize),
    Accept,
    Reject,
    Sign,
    Veto,
    Pause,
    /// Dismiss the sticky note on the terminal.
    Note,
    Reset,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs a choice number")]
    MissingChoice { command: &'static str },

    #[error("`{0}` is not a choice number")]
    BadNumber(String),

    #[error("unexpected `{0}`")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(ParseError::Trailing(extra.to_string()));
        }

        let command = match head.as_str() {
            "l" => act(PlayerAction::Log, arg)?,
            "c" => act(PlayerAction::Contain, arg)?,
            "d" => act(PlayerAction::Defer, arg)?,
            "intro" => no_arg(Command::Intro, arg)?,
            "start" | "clock-in" => no_arg(Command::Start, arg)?,
            "email" | "mail" => Command::Email(arg.map(choice).transpose()?),
            "lunch" => Command::Lunch(required(arg, "lunch")?),
            "review" => Command::Review(required(arg, "review")?),
            "accept" => no_arg(Command::Accept, arg)?,
            "reject" => no_arg(Command::Reject, arg)?,
            "sign" => no_arg(Command::Sign, arg)?,
            "veto" => no_arg(Command::Veto, arg)?,
            "pause" | "p" => no_arg(Command::Pause, arg)?,
            "note" => no_arg(Command::Note, arg)?,
            "reset" => no_arg(Command::Reset, arg)?,
            "status" | "s" => no_arg(Command::Status, arg)?,
            "help" | "?" => no_arg(Command::Help, arg)?,
            "quit" | "exit" | "q" => no_arg(Command::Quit, arg)?,
            other => match PlayerAction::from_str(other) {
                Ok(action) => act(action, arg)?,
                Err(_) => return Err(ParseError::Unknown(other.to_string())),
            },
        };

        Ok(command)
    }
}

fn act(action: PlayerAction, arg: Option<&str>) -> Result<Command, ParseError> {
    let redactions = arg
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| ParseError::BadNumber(raw.to_string()))
        })
        .transpose()?;
    Ok(Command::Act { action, redactions })
}

fn no_arg(command: Command, arg: Option<&str>) -> Result<Command, ParseError> {
    match arg {
        Some(extra) => Err(ParseError::Trailing(extra.to_string())),
        None => Ok(command),
    }
}

fn required(arg: Option<&str>, command: &'static str) -> Result<usize, ParseError> {
    choice(arg.ok_or(ParseError::MissingChoice { command })?)
}

fn choice(raw: &str) -> Result<usize, ParseError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseError::BadNumber(raw.to_string())),
    }
}

pub const HELP: &str = "\
Triage:   log | contain | defer (l, c, d)  [redacted words]
          free | forget                    (Ollie mode)
Shift:    intro, start, pause, note
Choices:  email [n], lunch <n>, review <n>
Offers:   accept | reject (trap), sign | veto (amendment)
Other:    status, reset, help, quit";
