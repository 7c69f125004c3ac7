//! Action dispatcher: classify a completed command response by the action kind of
//! the command and apply a result to the session.

mod breakpoint;
mod program;
mod running;
mod source;

use crate::debugger::command::ActionKind;
use crate::debugger::pattern::find_from_end;
use crate::debugger::{Debugger, Error, MarkerKind, SourcePlace, MESSAGE_TITLE};
use log::debug;

const NO_STACK_MESSAGE: &str = "There is no stack";

/// True if text contains only whitespaces and control characters.
fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b <= b' ')
}

/// Check a debugger banner, return an error if debugger can not be used for debugging.
fn check_banner(text: &str) -> Result<(), Error> {
    if find_from_end(text.as_bytes(), "no debugging symbols found", 6).is_some()
        || text.contains("(No debugging symbols found in")
    {
        return Err(Error::NoDebugSymbols);
    }
    Ok(())
}

impl Debugger {
    /// Handle a response of completed command.
    ///
    /// # Arguments
    ///
    /// * `action`: action kind of completed command
    /// * `place`: source place of completed command, if any
    /// * `text`: debugger output before the terminating prompt
    pub(super) fn dispatch(&mut self, action: ActionKind, place: Option<SourcePlace>, text: String) {
        debug!(target: "debugger", "dispatch {action}: {:?}", text);

        match action {
            ActionKind::Prompt => {}
            ActionKind::Message => self.show_message(&text),
            ActionKind::Quit => {
                self.show_message(&text);
                self.finish();
            }
            ActionKind::Version => {
                if let Err(e) = check_banner(&text) {
                    self.fatal(e);
                }
            }
            ActionKind::Breakpoint => self.on_breakpoint_response(&text, place, None, false),
            ActionKind::BreakpointClear => self.on_breakpoint_response(&text, place, None, true),
            ActionKind::Condition { expression } => {
                self.on_breakpoint_response(&text, place, Some(expression), false)
            }
            ActionKind::ConfirmBreakpoint { condition } => {
                self.on_pending_answer(&text, place, Some(condition))
            }
            ActionKind::DenyBreakpoint => self.on_pending_answer(&text, place, None),
            ActionKind::Running | ActionKind::Step => self.on_running_response(&text, None),
            ActionKind::Until => self.on_running_response(&text, place),
            ActionKind::InfoSource => self.on_info_source_response(&text),
            ActionKind::InfoProgram => self.on_info_program_response(&text),
            ActionKind::Backtrace => self.show_listing("Backtrace", &text),
            ActionKind::Show { title } => self.show_listing(title, &text),
            ActionKind::VariableQuery { last } => self.display_variable(&text, last),
            ActionKind::Watch { variable } => self.watch_reported(variable, &text),
        }
    }

    fn show_message(&self, text: &str) {
        if !is_blank(text) {
            self.hook.show_error(MESSAGE_TITLE, text.trim_end());
        }
    }

    fn show_listing(&self, title: &str, text: &str) {
        if text.starts_with("No stack") {
            self.hook.show_error(MESSAGE_TITLE, NO_STACK_MESSAGE);
        } else if !is_blank(text) {
            self.hook.show_text(title, text.trim_end());
        }
    }

    /// Clear a current line marker and forget a debugee.
    fn debugee_gone(&mut self) {
        self.hook.clear_markers(MarkerKind::Current);
        self.debugee_pid = None;
        self.current_line = None;
    }
}
