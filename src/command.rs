//! Interactive input lines
//!
//! Every stdin line is the new state of the input field, except for the
//! `:select N` and `:quit` commands.

use crate::error::SuggestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New raw text of the input field
    Input(String),
    /// Accept the visible suggestion at this 0-based index
    Select(usize),
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, SuggestError> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Input(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "q"), None, None) => Ok(Command::Quit),
        (Some("select" | "s"), Some(index), None) => match index.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Command::Select(n - 1)),
            _ => Err(SuggestError::InvalidCommand(format!(
                "expected a suggestion number starting at 1, got '{}'",
                index
            ))),
        },
        _ => Err(SuggestError::InvalidCommand(line.to_string())),
    }
}
