//! Breakpoints and `until` operations. Breakpoint markers are owned by the session,
//! the UI only reflects them.

use crate::debugger::command::{ActionKind, Command};
use crate::debugger::{Debugger, Error, MarkerKind};
use log::debug;
use std::fmt::{Display, Formatter};

/// Line in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePlace {
    pub file: String,
    pub line: u64,
}

impl SourcePlace {
    pub fn new(file: impl Into<String>, line: u64) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl Display for SourcePlace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl Debugger {
    /// Set a breakpoint at a place or remove it if place is already marked.
    /// If debugger is not running only a marker is toggled, breakpoint will be set
    /// at the next session start.
    pub fn toggle_breakpoint(&mut self, place: SourcePlace) -> Result<(), Error> {
        if self.gdb.is_none() {
            if self.breakpoints.contains_key(&place) {
                self.unmark_breakpoint(&place);
            } else {
                self.mark_breakpoint(place, None);
            }
            return Ok(());
        }
        if self.is_busy() {
            return Err(Error::Busy);
        }

        let command = if self.breakpoints.contains_key(&place) {
            Command::new(format!("clear {place}\n"), ActionKind::BreakpointClear)
        } else {
            Command::new(format!("b {place}\n"), ActionKind::Breakpoint)
        };
        self.enqueue(command.with_place(place));
        Ok(())
    }

    /// Set a breakpoint that stops debugee only if `expression` is true.
    pub fn set_conditional_breakpoint(
        &mut self,
        place: SourcePlace,
        expression: &str,
    ) -> Result<(), Error> {
        self.ensure_ready()?;
        let action = ActionKind::Condition {
            expression: expression.trim().to_string(),
        };
        self.enqueue(Command::new(format!("b {place}\n"), action).with_place(place));
        Ok(())
    }

    /// Remove all breakpoints.
    pub fn clear_breakpoints(&mut self) -> Result<(), Error> {
        if self.gdb.is_some() {
            if self.is_busy() {
                return Err(Error::Busy);
            }
            self.enqueue(Command::new("d\n", ActionKind::Prompt));
        }
        self.breakpoints.clear();
        self.hook.clear_markers(MarkerKind::Breakpoint);
        Ok(())
    }

    /// Continue until a place is reached. A temporary breakpoint is set at the place
    /// and cleared when debugee stops, existing breakpoint is left untouched.
    pub fn until(&mut self, place: SourcePlace) -> Result<(), Error> {
        self.ensure_ready()?;
        if self.breakpoints.contains_key(&place) {
            self.enqueue(Command::new("c\n", ActionKind::Until));
            return Ok(());
        }

        self.enqueue(
            Command::new(format!("b {place}\n"), ActionKind::Breakpoint).with_place(place.clone()),
        );
        self.enqueue(Command::new("c\n", ActionKind::Until).with_place(place));
        Ok(())
    }

    /// Set all marked breakpoints in a freshly started debugger.
    pub(super) fn reissue_breakpoints(&mut self) {
        let places: Vec<SourcePlace> = self.breakpoints.keys().cloned().collect();
        for place in places {
            self.breakpoints.insert(place.clone(), None);
            self.enqueue(
                Command::new(format!("b {place}\n"), ActionKind::Breakpoint).with_place(place),
            );
        }
    }

    /// Insert a breakpoint marker if place is not marked yet, remember breakpoint number.
    pub(super) fn mark_breakpoint(&mut self, place: SourcePlace, number: Option<u32>) {
        match self.breakpoints.get_mut(&place) {
            Some(known) => {
                if number.is_some() {
                    *known = number;
                }
            }
            None => {
                debug!(target: "debugger", "mark breakpoint at {place}");
                self.hook.insert_marker(&place, MarkerKind::Breakpoint);
                self.breakpoints.insert(place, number);
            }
        }
    }

    pub(super) fn unmark_breakpoint(&mut self, place: &SourcePlace) {
        if self.breakpoints.shift_remove(place).is_some() {
            debug!(target: "debugger", "unmark breakpoint at {place}");
            self.hook.remove_marker(place, MarkerKind::Breakpoint);
        }
    }

    /// Remove markers of breakpoints with given debugger numbers.
    pub(super) fn unmark_breakpoint_numbers(&mut self, numbers: &[u32]) {
        let places: Vec<SourcePlace> = self
            .breakpoints
            .iter()
            .filter(|(_, number)| number.is_some_and(|n| numbers.contains(&n)))
            .map(|(place, _)| place.clone())
            .collect();
        places.iter().for_each(|place| self.unmark_breakpoint(place));
    }
}
