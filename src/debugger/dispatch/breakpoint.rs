use crate::debugger::command::{ActionKind, Command};
use crate::debugger::dispatch::is_blank;
use crate::debugger::pattern::{find_from_end_wildcard, find_from_start};
use crate::debugger::query::{
    PENDING_BREAKPOINT_QUERY, PENDING_BREAKPOINT_QUESTION, PENDING_BREAKPOINT_TITLE,
};
use crate::debugger::{Debugger, Error, SourcePlace, MESSAGE_TITLE};
use log::debug;
use once_cell::sync;
use regex::Regex;

/// Clear commands are framed with an extra print, their output may be shifted.
const CLEAR_PROMPT_OFFSET: usize = 8;


#[derive(Debug, PartialEq)]
pub(super) enum BreakpointOutcome {
    NoSymbolTable,
    NotCompiledWithDebugInfo,
    /// Debugger asks whether breakpoint must be pending.
    PendingQuery,
    Set {
        number: u32,
        place: Option<SourcePlace>,
    },
    /// Breakpoints are deleted or never existed, `numbers` may be empty.
    Removed { numbers: Vec<u32> },
    Unrecognized,
}

/// Parse leading decimal number.
fn leading_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let number = s[..end].parse().ok()?;
    Some((number, &s[end..]))
}

/// Parse a place from a breakpoint report like
/// `Breakpoint 1 at 0x1139: file test.c, line 5.` or `Breakpoint 1 at /x/y.c:10`.
fn parse_reported_place(report: &str) -> Option<SourcePlace> {
    static FILE_LINE_RE: sync::Lazy<Regex> = sync::Lazy::new(|| {
        Regex::new(r"file (.+?), line (\d+)\.").expect("must compile")
    });
    static AT_RE: sync::Lazy<Regex> = sync::Lazy::new(|| {
        Regex::new(r"\bat ([^\s:]+):(\d+)").expect("must compile")
    });
    static PENDING_RE: sync::Lazy<Regex> = sync::Lazy::new(|| {
        Regex::new(r"^\s*\(([^\s:]+):(\d+)\) pending").expect("must compile")
    });

    [&*FILE_LINE_RE, &*AT_RE, &*PENDING_RE]
        .into_iter()
        .find_map(|re| {
            let caps = re.captures(report)?;
            let line = caps[2].parse().ok()?;
            Some(SourcePlace::new(&caps[1], line))
        })
}

/// Find a `Breakpoint N at ...` or `Breakpoint N (...) pending.` report.
fn parse_set(text: &str) -> Option<BreakpointOutcome> {
    let start = text.find("Breakpoint ")?;
    let (number, rest) = leading_number(&text[start + "Breakpoint ".len()..])?;
    let report = rest.lines().next().unwrap_or_default();

    let is_set = rest.starts_with(" at ") || (rest.starts_with(" (") && report.contains("pending."));
    is_set.then(|| BreakpointOutcome::Set {
        number,
        place: parse_reported_place(report),
    })
}

/// Parse numbers of `Deleted breakpoint 1` or `Deleted breakpoints 2 3`.
fn parse_deleted(text: &str) -> Vec<u32> {
    let Some((_, tail)) = text.split_once("Deleted breakpoint") else {
        return vec![];
    };
    tail.trim_start_matches('s')
        .split_whitespace()
        .map_while(|word| word.parse().ok())
        .collect()
}

/// Classify a response of `b`, `clear` and conditional breakpoint commands.
pub(super) fn classify(text: &str, clearing: bool) -> BreakpointOutcome {
    let bytes = text.as_bytes();

    if find_from_start(bytes, "No symbol table is loaded", CLEAR_PROMPT_OFFSET).is_some() {
        return BreakpointOutcome::NoSymbolTable;
    }
    if find_from_start(bytes, "Function \"main\" not defined", CLEAR_PROMPT_OFFSET).is_some()
        || find_from_start(bytes, "No source file specified", CLEAR_PROMPT_OFFSET).is_some()
    {
        return BreakpointOutcome::NotCompiledWithDebugInfo;
    }
    if find_from_end_wildcard(bytes, PENDING_BREAKPOINT_QUERY, CLEAR_PROMPT_OFFSET).is_some() {
        return BreakpointOutcome::PendingQuery;
    }
    if let Some(set) = parse_set(text) {
        return set;
    }

    if find_from_start(bytes, "Deleted breakpoint", CLEAR_PROMPT_OFFSET).is_some() {
        return BreakpointOutcome::Removed {
            numbers: parse_deleted(text),
        };
    }
    if find_from_start(bytes, "No breakpoint ", CLEAR_PROMPT_OFFSET).is_some()
        || (!clearing
            && find_from_start(bytes, "No source file named ", CLEAR_PROMPT_OFFSET).is_some())
    {
        return BreakpointOutcome::Removed { numbers: vec![] };
    }

    BreakpointOutcome::Unrecognized
}

impl Debugger {
    pub(super) fn on_breakpoint_response(
        &mut self,
        text: &str,
        place: Option<SourcePlace>,
        condition: Option<String>,
        clearing: bool,
    ) {
        let outcome = classify(text, clearing);
        debug!(target: "debugger", "breakpoint response: {outcome:?}");

        match outcome {
            BreakpointOutcome::NoSymbolTable => self.fatal(Error::NoSymbolTable),
            BreakpointOutcome::NotCompiledWithDebugInfo => {
                self.fatal(Error::NotCompiledWithDebugInfo)
            }
            BreakpointOutcome::PendingQuery => {
                let confirmed = self
                    .hook
                    .ask_yes_no(PENDING_BREAKPOINT_TITLE, PENDING_BREAKPOINT_QUESTION);
                let (reply, action) = if confirmed {
                    ("y\n", ActionKind::ConfirmBreakpoint { condition })
                } else {
                    ("n\n", ActionKind::DenyBreakpoint)
                };
                let mut command = Command::new(reply, action);
                command.place = place;
                self.enqueue(command);
            }
            BreakpointOutcome::Set {
                number,
                place: reported,
            } => {
                if let Some(expression) = condition {
                    self.enqueue(Command::new(
                        format!("condition {number} {expression}\n"),
                        ActionKind::Message,
                    ));
                }
                if let Some(place) = place.or(reported) {
                    self.mark_breakpoint(place, Some(number));
                }
                self.refresh_variables();
            }
            BreakpointOutcome::Removed { numbers } => {
                match place {
                    Some(place) => self.unmark_breakpoint(&place),
                    None => self.unmark_breakpoint_numbers(&numbers),
                }
                self.refresh_variables();
            }
            BreakpointOutcome::Unrecognized => {
                if !is_blank(text) {
                    self.hook.show_error(MESSAGE_TITLE, text.trim_end());
                }
                self.flush_commands();
            }
        }
    }

    /// Handle a response to an answer on pending breakpoint question, `confirmed` holds
    /// a condition for the breakpoint if answer was `y`.
    pub(super) fn on_pending_answer(
        &mut self,
        text: &str,
        place: Option<SourcePlace>,
        confirmed: Option<Option<String>>,
    ) {
        let reported = match classify(text, false) {
            BreakpointOutcome::Set { number, place } => Some((number, place)),
            _ => None,
        };
        if let (Some(Some(expression)), Some((number, _))) = (&confirmed, &reported) {
            self.enqueue(Command::new(
                format!("condition {number} {expression}\n"),
                ActionKind::Message,
            ));
        }
        let confirmed = confirmed.is_some();

        match (confirmed, place) {
            (true, Some(place)) => {
                self.mark_breakpoint(place, reported.map(|(number, _)| number));
            }
            (true, None) => {
                if let Some((number, Some(place))) = reported {
                    self.mark_breakpoint(place, Some(number));
                }
            }
            (false, Some(place)) => self.unmark_breakpoint(&place),
            (false, None) => {}
        }
    }
}
