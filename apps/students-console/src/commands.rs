use std::str::FromStr;

use students_client::view::{Field, UnknownField};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  list                  reload and show the student list
  set <field> <value>   fill a form field (userName, firstName, lastName, email)
  submit                add the student, or save the one being edited
  edit <n>              load student #n into the form
  delete <n>            delete student #n
  cancel                clear the form
  help                  show this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Set(Field, String),
    Submit,
    Edit(usize),
    Delete(usize),
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Field(#[from] UnknownField),
    #[error("`{0}` is not a list position")]
    Position(String),
}

fn position(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    arg.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::Position(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "list" | "ls" => Ok(Command::List),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("set <field> <value>"))?;
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "submit" => Ok(Command::Submit),
            "edit" => position(rest, "edit <n>").map(Command::Edit),
            "delete" | "rm" => position(rest, "delete <n>").map(Command::Delete),
            "cancel" => Ok(Command::Cancel),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
