use crate::debugger::command::{ActionKind, Command};
use crate::debugger::{Debugger, MarkerKind, SourcePlace};
use crate::weak_error;
use log::debug;
use std::path::Path;

#[derive(Debug, PartialEq)]
pub(super) enum SourceReport {
    /// Debugee has no current source file.
    NoSource,
    /// Current source file if it can be determined.
    File(Option<String>),
}

fn value_after<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let (_, tail) = text.split_once(prefix)?;
    let (value, _) = tail.split_once('\n')?;
    Some(value)
}

/// Classify an `info source` response.
///
/// # Arguments
///
/// * `text`: response text
/// * `last_file`: previously known current file, reused if debugee is still in the file with
///   the same name
pub(super) fn classify(text: &str, last_file: Option<&str>) -> SourceReport {
    if text.contains("No current source file") {
        return SourceReport::NoSource;
    }

    if let Some(path) = value_after(text, "Located in ") {
        return SourceReport::File(Some(path.to_string()));
    }

    let file = value_after(text, "Current source file is ").map(|name| {
        let same_as_last = last_file.filter(|last| {
            Path::new(last)
                .file_name()
                .is_some_and(|base| base.to_string_lossy() == name)
        });
        same_as_last.unwrap_or(name).to_string()
    });
    SourceReport::File(file)
}

impl Debugger {
    pub(super) fn on_info_source_response(&mut self, text: &str) {
        let report = classify(text, self.current_file.as_deref());
        debug!(target: "debugger", "source response: {report:?}");

        match report {
            SourceReport::NoSource => {
                self.current_file = None;
                self.hook.clear_markers(MarkerKind::Current);
            }
            SourceReport::File(file) => {
                self.current_file = file;
                match self.current_place() {
                    Some(place) => self.show_current_place(&place),
                    None => self.enqueue(Command::new("backtrace\n", ActionKind::Backtrace)),
                }
            }
        }
    }

    /// Navigate to a place where debugee is stopped and mark it.
    fn show_current_place(&mut self, place: &SourcePlace) {
        weak_error!(self.hook.navigate(place), "navigate:");
        self.hook.clear_markers(MarkerKind::Current);
        self.hook.insert_marker(place, MarkerKind::Current);
    }
}
