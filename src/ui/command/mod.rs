//! Console commands.
//!
//! Command is a user request that is mapped one-to-one to a debugger session operation.

pub mod parser;

use crate::debugger::{Error, SourcePlace};

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Parsing(String),
    #[error(transparent)]
    Handle(#[from] Error),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// External commands that can be processed by the debugger.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start or restart a program.
    Start,
    Attach(i32),
    Detach,
    /// Set or remove a breakpoint.
    Breakpoint(SourcePlace),
    Condition(SourcePlace, String),
    ClearBreakpoints,
    Next,
    Step,
    Continue,
    Until(SourcePlace),
    Backtrace,
    /// Raw debugger command.
    Raw(String),
    Display(String),
    Undisplay(usize),
    Watch(usize),
    Variables,
    Stop,
    Kill,
    Help(Option<String>),
}
