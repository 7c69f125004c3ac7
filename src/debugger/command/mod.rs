//! Textual commands sent to the debugger and the queue that holds them until the debugger is
//! ready to accept a next one.

use crate::debugger::breakpoint::SourcePlace;
use crate::debugger::Error;
use std::collections::VecDeque;
use strum_macros::Display;

/// Debugger ready-prompt, signals that a command is completed.
pub const PROMPT: &str = "(gdb) ";
/// Reply to [`CLEAR_FLUSH`] followed by a prompt, terminates a breakpoint-clear command.
pub const CLEAR_PROMPT: &str = "1834559546\n(gdb) ";
/// No-op expression appended to every breakpoint-clear command.
pub const CLEAR_FLUSH: &str = "p 1834559546\n";

/// Max number of commands waiting in the queue.
pub const QUEUE_CAPACITY: usize = 98;

/// Determine how a response of a command must be classified.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ActionKind {
    /// Just wait for a prompt, response is ignored.
    Prompt,
    /// Show response to user if it is not empty.
    Message,
    /// Debugger banner check.
    Version,
    Breakpoint,
    BreakpointClear,
    /// Set a breakpoint then put a condition on it.
    Condition { expression: String },
    /// Answer `y` to a pending breakpoint question, `condition` is put on the breakpoint
    /// once it is set.
    ConfirmBreakpoint { condition: Option<String> },
    /// Answer `n` to a pending breakpoint question.
    DenyBreakpoint,
    Running,
    Step,
    Until,
    InfoSource,
    InfoProgram,
    Backtrace,
    /// Show response in a text dialog.
    Show { title: &'static str },
    /// Print a displayed variable, `last` is set for the last variable in a batch.
    VariableQuery { last: bool },
    /// Set or delete a watchpoint for variable with index `variable`.
    Watch { variable: usize },
    /// Show response to user if it is not empty, then finish a session.
    Quit,
}

impl ActionKind {
    /// True for actions after which the debugee is moving.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            ActionKind::Running | ActionKind::Step | ActionKind::Until
        )
    }

    /// True for actions of `b` commands.
    pub fn sets_breakpoint(&self) -> bool {
        matches!(self, ActionKind::Breakpoint | ActionKind::Condition { .. })
    }
}

/// Single debugger command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub action: ActionKind,
    pub text: String,
    pub place: Option<SourcePlace>,
}

impl Command {
    /// Create a new command, `text` must be terminated by newline.
    /// Breakpoint-clear commands are framed with [`CLEAR_FLUSH`].
    pub fn new(text: impl Into<String>, action: ActionKind) -> Self {
        let mut text = text.into();
        if action == ActionKind::BreakpointClear {
            text.push_str(CLEAR_FLUSH);
        }
        Self {
            action,
            text,
            place: None,
        }
    }

    pub fn with_place(self, place: SourcePlace) -> Self {
        Self {
            place: Some(place),
            ..self
        }
    }

    /// Return prompt that terminates response of this command.
    pub fn terminator(action: &ActionKind) -> &'static str {
        if *action == ActionKind::BreakpointClear {
            CLEAR_PROMPT
        } else {
            PROMPT
        }
    }
}

/// FIFO of commands waiting to be sent.
#[derive(Default, Debug)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command to the end of the queue.
    ///
    /// # Errors
    ///
    /// Return [`Error::QueueFull`] if queue already holds [`QUEUE_CAPACITY`] commands,
    /// the command is dropped in that case.
    pub fn enqueue(&mut self, command: Command) -> Result<(), Error> {
        if self.commands.len() >= QUEUE_CAPACITY {
            return Err(Error::QueueFull);
        }
        self.commands.push_back(command);
        Ok(())
    }

    pub fn peek_head(&self) -> Option<&Command> {
        self.commands.front()
    }

    pub fn dequeue_head(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    /// Drop all pending commands, return number of dropped commands.
    pub fn flush(&mut self) -> usize {
        let count = self.commands.len();
        self.commands.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
