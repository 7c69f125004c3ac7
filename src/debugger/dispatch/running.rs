use crate::debugger::command::{ActionKind, Command};
use crate::debugger::pattern::{
    find_from_end, find_from_end_wildcard, find_from_start, find_from_start_wildcard,
};
use crate::debugger::{Debugger, SourcePlace, MESSAGE_TITLE};
use log::debug;

const WATCHPOINT_TITLE: &str = "Watchpoint";

/// Triggered watchpoint report.
#[derive(Debug, PartialEq)]
pub(super) struct WatchpointHit {
    pub number: u32,
    pub expression: String,
    pub old: String,
    pub new: String,
}

impl WatchpointHit {
    fn describe(&self) -> String {
        format!(
            "Variable: {}\n\n{}\n     --->     \n{}",
            self.expression, self.old, self.new
        )
    }
}

#[derive(Debug, PartialEq)]
pub(super) enum RunOutcome {
    /// Debugee exited, contains debugger message.
    Exited(String),
    /// Debugee stopped, `notice` is set if it stopped because of a signal or exception.
    Suspended { notice: Option<String> },
    /// Debugee is not running anymore, contains debugger message.
    Gone(String),
}

#[derive(Debug, PartialEq)]
pub(super) struct RunReport {
    /// Line where debugee is stopped.
    pub line: Option<u64>,
    pub watchpoint: Option<WatchpointHit>,
    pub outcome: RunOutcome,
}

/// Find a line number at the start of some response line, like `7\t    }` or
/// `0x8060bd0       2110    return -1;`. The last one wins.
fn scan_line_number(text: &str) -> Option<u64> {
    text.lines()
        .filter_map(|line| {
            let line = match line.strip_prefix("0x") {
                Some(addr) => addr
                    .trim_start_matches(|c: char| c.is_ascii_digit() || ('a'..='f').contains(&c))
                    .trim_start_matches([' ', '\t']),
                None => line,
            };
            let digits: String = line.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok().filter(|&n| n > 0)
        })
        .last()
}

/// Parse a report like:
/// ```text
/// Hardware watchpoint 2: counter
///
/// Old value = 1
/// New value = 2
/// ```
fn parse_watchpoint(text: &str) -> Option<WatchpointHit> {
    let start = text.find("\nHardware watchpoint ")?;
    let report = &text[start + "\nHardware watchpoint ".len()..];

    let (head, rest) = report.split_once('\n')?;
    let (number, expression) = head.split_once(": ")?;
    fn value_after(prefix: &str, text: &str) -> Option<String> {
        let pos = text.find(prefix)?;
        let value = text[pos + prefix.len()..].lines().next().unwrap_or_default();
        Some(value.to_string())
    }

    Some(WatchpointHit {
        number: number.trim().parse().ok()?,
        expression: expression.trim().to_string(),
        old: value_after("Old value = ", rest)?,
        new: value_after("New value = ", rest)?,
    })
}

/// Return debugger message starting at `pos`.
fn message_at(text: &str, pos: usize) -> String {
    text.get(pos..).unwrap_or_default().trim().to_string()
}

fn find_exit(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    find_from_end(bytes, "\nProgram exited normally", 3)
        .or_else(|| find_from_end_wildcard(bytes, "[* * (* *) exited normally]", 3))
        .or_else(|| find_from_end(bytes, "\nProgram exited with code", 7))
        .or_else(|| find_from_end_wildcard(bytes, "[* * (* *) exited with code *]", 3))
        .or_else(|| find_from_end(bytes, "No such process", 7))
}

fn find_notice(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    find_from_start(bytes, "terminate called after throwing an instance of", 3)
        .or_else(|| find_from_start_wildcard(bytes, "Program received signal *", 20))
}

fn find_gone(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    find_from_start(bytes, "The program is not being run", 0)
        .or_else(|| find_from_start_wildcard(bytes, "Program terminated with signal *", 3))
        .or_else(|| find_from_end_wildcard(bytes, "The program no longer exists.\n", 3))
}

/// Classify a response of run, step, continue and until commands.
pub(super) fn classify(text: &str) -> RunReport {
    let line = scan_line_number(text);
    let watchpoint = parse_watchpoint(text);

    let outcome = if let Some(pos) = find_exit(text) {
        RunOutcome::Exited(message_at(text, pos))
    } else if let Some(pos) = find_notice(text) {
        RunOutcome::Suspended {
            notice: Some(message_at(text, pos)),
        }
    } else if let Some(pos) = find_gone(text) {
        RunOutcome::Gone(message_at(text, pos))
    } else {
        RunOutcome::Suspended { notice: None }
    };

    RunReport {
        line,
        watchpoint,
        outcome,
    }
}

impl Debugger {
    /// Handle a response of a command after which debugee moves.
    ///
    /// # Arguments
    ///
    /// * `text`: response text
    /// * `until_place`: temporary breakpoint of an until command, cleared after debugee stops
    pub(super) fn on_running_response(&mut self, text: &str, until_place: Option<SourcePlace>) {
        let report = classify(text);
        debug!(target: "debugger", "running response: {:?}", report.outcome);

        if let Some(hit) = &report.watchpoint {
            debug!(target: "debugger", "watchpoint {} triggered", hit.number);
            self.hook.show_text(WATCHPOINT_TITLE, &hit.describe());
        }

        match report.outcome {
            RunOutcome::Exited(message) | RunOutcome::Gone(message) => {
                self.debugee_gone();
                self.hook.show_error(MESSAGE_TITLE, &message);
            }
            RunOutcome::Suspended { notice } => {
                self.current_line = report.line;
                let (query, action) = match report.line {
                    Some(_) => ("info source\n", ActionKind::InfoSource),
                    None => ("backtrace\n", ActionKind::Backtrace),
                };
                self.enqueue(Command::new(query, action));

                if let Some(notice) = notice {
                    self.hook.show_error(MESSAGE_TITLE, &notice);
                }
                self.refresh_variables();
            }
        }

        if let Some(place) = until_place {
            self.enqueue(
                Command::new(format!("clear {place}\n"), ActionKind::BreakpointClear)
                    .with_place(place),
            );
        }
    }
}
