use crate::debugger::command::{ActionKind, Command};
use crate::debugger::{Debugger, Error, SessionState};
use log::debug;

/// Max number of displayed variables, one slot is reserved.
pub const MAX_VARIABLES: usize = 60;
/// Max number of characters in a rendered value.
const MAX_VALUE_LEN: usize = 255;

/// Expression displayed in the variables panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Expression text as typed by user.
    pub name: String,
    /// Last rendered value, `None` until debugger reports it.
    pub value: Option<String>,
    /// Watchpoint number if variable is watched.
    pub watch: Option<u32>,
    /// True if the last value differs from the previous one.
    pub changed: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            watch: None,
            changed: false,
        }
    }

    /// Store a new value, changed flag is set only if a previous value exists and differs.
    fn update(&mut self, value: String) {
        self.changed = self.value.as_ref().is_some_and(|prev| *prev != value);
        self.value = Some(value);
    }
}

/// Render a `print` command response into a single-line value:
/// value-history prefix (`$1 = `) is stripped, whitespaces become spaces,
/// non-printable characters become `?`.
pub fn render_value(response: &str) -> String {
    let value = if response.starts_with('$') {
        response
            .split_once("= ")
            .map(|(_, value)| value)
            .unwrap_or(response)
    } else {
        response
    };

    value
        .trim_end()
        .chars()
        .take(MAX_VALUE_LEN)
        .map(|c| match c {
            c if c.is_whitespace() => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect()
}

/// Extract a watchpoint number from a `watch` command response.
pub fn parse_watchpoint_number(response: &str) -> Option<u32> {
    let (_, tail) = response.split_once("watchpoint")?;
    let digits: String = tail
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|&n| n != 0)
}

impl Debugger {
    /// Add expression to the variables panel.
    pub fn add_variable(&mut self, expression: &str) -> Result<(), Error> {
        if self.variables.len() >= MAX_VARIABLES - 1 {
            return Err(Error::TooManyVariables(MAX_VARIABLES - 1));
        }
        self.variables.push(Variable::new(expression.trim()));
        if self.gdb.is_some() && !self.is_busy() {
            self.refresh_variables();
        } else {
            self.hook.refresh_variables(&self.variables);
        }
        Ok(())
    }

    /// Remove variable at `index` from the variables panel. Watchpoint on it is not deleted.
    ///
    /// # Errors
    ///
    /// Return [`Error::Busy`] while variable values are requested, values are matched
    /// to variables by position.
    pub fn remove_variable(&mut self, index: usize) -> Result<Variable, Error> {
        if index >= self.variables.len() {
            return Err(Error::VariableNotFound(index));
        }
        if self.variables_requested() {
            return Err(Error::Busy);
        }
        let variable = self.variables.remove(index);
        self.hook.refresh_variables(&self.variables);
        Ok(variable)
    }

    /// Set a watchpoint on variable at `index` or delete it if variable is already watched.
    pub fn toggle_watch(&mut self, index: usize) -> Result<(), Error> {
        self.ensure_ready()?;
        if !self.queue.is_empty() {
            return Err(Error::Busy);
        }
        let variable = self
            .variables
            .get(index)
            .ok_or(Error::VariableNotFound(index))?;

        let text = match variable.watch {
            Some(number) => format!("delete {number}\n"),
            None => format!("watch {}\n", variable.name),
        };
        self.enqueue(Command::new(text, ActionKind::Watch { variable: index }));
        Ok(())
    }

    /// Ask debugger for values of all displayed variables, the panel is refreshed when
    /// the last value is received.
    pub fn refresh_variables(&mut self) {
        if self.gdb.is_none() {
            return;
        }
        let count = self.variables.len();
        let commands: Vec<Command> = self
            .variables
            .iter()
            .enumerate()
            .map(|(i, variable)| {
                Command::new(
                    format!("p {}\n", variable.name),
                    ActionKind::VariableQuery {
                        last: i + 1 == count,
                    },
                )
            })
            .collect();
        commands.into_iter().for_each(|cmd| self.enqueue(cmd));
    }

    /// True if some variable values are queued or in flight.
    fn variables_requested(&self) -> bool {
        let in_flight = matches!(
            &self.state,
            SessionState::AwaitingResponse {
                action: ActionKind::VariableQuery { .. },
                ..
            }
        );
        in_flight
            || self
                .queue
                .iter()
                .any(|cmd| matches!(cmd.action, ActionKind::VariableQuery { .. }))
    }

    /// Store a value of the next variable in a batch.
    pub(super) fn display_variable(&mut self, response: &str, last: bool) {
        let value = render_value(response);
        match self.variables.get_mut(self.last_displayed_variable) {
            Some(variable) => {
                debug!(target: "debugger", "variable `{}` = {value}", variable.name);
                variable.update(value);
                self.last_displayed_variable += 1;
            }
            None => {
                debug!(target: "debugger", "value for removed variable dropped");
            }
        }

        if last {
            self.last_displayed_variable = 0;
            self.hook.refresh_variables(&self.variables);
        }
    }

    /// Store a watchpoint number reported for variable at `index`.
    pub(super) fn watch_reported(&mut self, index: usize, response: &str) {
        let number = parse_watchpoint_number(response);
        if let Some(variable) = self.variables.get_mut(index) {
            variable.watch = number;
        }
        self.hook.refresh_variables(&self.variables);
    }
}
