//! GDB session engine.
//!
//! Debugger is driven over its human-readable console: commands are written as plain text,
//! responses are accumulated until a ready-prompt appears and then classified by a set of
//! text patterns. Only one command is in flight at any time, the rest are waiting in a queue.

pub mod breakpoint;
pub mod command;
mod dispatch;
mod driver;
pub mod error;
pub mod hook;
pub mod pattern;
pub mod pool;
pub mod process;
pub mod query;
pub mod reactor;
pub mod variable;

pub use breakpoint::SourcePlace;
pub use error::Error;
pub use hook::{EventHook, MarkerKind};
pub use process::{ProcessSupervisor, PtySupervisor};
pub use reactor::{Interest, Reactor, WatchSet};
pub use variable::Variable;

use crate::debugger::command::{ActionKind, Command, CommandQueue};
use crate::debugger::pool::OutputPool;
use crate::debugger::process::{DebugeeTerminal, DebuggerPipe};
use crate::weak_error;
use indexmap::IndexMap;
use log::{debug, error, info};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::path::Path;

/// Title of dialogs with debugger messages and errors.
pub const MESSAGE_TITLE: &str = "Debug Message";

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Debugger executable.
    pub debugger: String,
    /// Run debugee on its own terminal.
    pub show_debugee_output: bool,
    /// Stay at `main` function after start.
    pub stop_at_entry: bool,
    /// Echo debugger traffic to the console.
    pub echo_to_console: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debugger: "gdb".to_string(),
            show_debugee_output: false,
            stop_at_entry: true,
            echo_to_console: false,
        }
    }
}

/// Program under debugging.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub path: String,
    pub args: Vec<String>,
}

impl Program {
    pub fn new(path: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: path.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No command in flight.
    Idle,
    /// A command is sent, its response is accumulating.
    AwaitingResponse {
        action: ActionKind,
        place: Option<SourcePlace>,
    },
    /// There is no debugger process.
    Closed,
}

struct DebuggerProcess {
    pid: Pid,
    pipe: Box<dyn DebuggerPipe>,
}

pub struct DebuggerBuilder {
    options: SessionOptions,
    program: Option<Program>,
    supervisor: Option<Box<dyn ProcessSupervisor>>,
}

impl DebuggerBuilder {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            program: None,
            supervisor: None,
        }
    }

    pub fn with_program(self, program: Program) -> Self {
        Self {
            program: Some(program),
            ..self
        }
    }

    pub fn with_supervisor(self, supervisor: impl ProcessSupervisor + 'static) -> Self {
        Self {
            supervisor: Some(Box::new(supervisor)),
            ..self
        }
    }

    /// Create a debugger, session is closed until [`Debugger::start`] or [`Debugger::attach`].
    ///
    /// # Arguments
    ///
    /// * `hook`: UI collaborator
    /// * `reactor`: event loop collaborator
    pub fn build(
        self,
        hook: impl EventHook + 'static,
        reactor: impl Reactor + 'static,
    ) -> Debugger {
        Debugger {
            options: self.options,
            program: self.program,
            gdb: None,
            terminal: None,
            debugee_pid: None,
            state: SessionState::Closed,
            queue: CommandQueue::new(),
            pool: OutputPool::new(),
            variables: vec![],
            last_displayed_variable: 0,
            current_file: None,
            current_line: None,
            breakpoints: IndexMap::new(),
            hook: Box::new(hook),
            supervisor: self
                .supervisor
                .unwrap_or_else(|| Box::new(PtySupervisor::new())),
            reactor: Box::new(reactor),
        }
    }
}

/// Debugger session.
pub struct Debugger {
    options: SessionOptions,
    program: Option<Program>,
    gdb: Option<DebuggerProcess>,
    /// Debugee terminal, exists only if debugee output is shown.
    terminal: Option<DebugeeTerminal>,
    debugee_pid: Option<Pid>,
    state: SessionState,
    queue: CommandQueue,
    pool: OutputPool,
    variables: Vec<Variable>,
    /// Index of a variable which value is expected in the next variable query response.
    last_displayed_variable: usize,
    current_file: Option<String>,
    current_line: Option<u64>,
    /// Marked breakpoints and their numbers, if debugger already reported them.
    breakpoints: IndexMap<SourcePlace, Option<u32>>,
    hook: Box<dyn EventHook>,
    supervisor: Box<dyn ProcessSupervisor>,
    reactor: Box<dyn Reactor>,
}

impl Debugger {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// True if the debugger process is running.
    pub fn is_started(&self) -> bool {
        self.gdb.is_some()
    }

    /// True if a command is sent and its response is not received yet.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { .. })
    }

    pub fn debugee_pid(&self) -> Option<Pid> {
        self.debugee_pid
    }

    pub fn debugger_pid(&self) -> Option<Pid> {
        self.gdb.as_ref().map(|gdb| gdb.pid)
    }

    /// Return last known place where debugee is stopped.
    pub fn current_place(&self) -> Option<SourcePlace> {
        Some(SourcePlace::new(
            self.current_file.clone()?,
            self.current_line?,
        ))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Return places of all marked breakpoints.
    pub fn breakpoints(&self) -> impl Iterator<Item = &SourcePlace> {
        self.breakpoints.keys()
    }

    /// Return commands that wait to be sent.
    pub fn pending_commands(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    /// Set program to debug, changes take effect on the next debugger start.
    pub fn set_program(&mut self, program: Program) {
        if self.gdb.is_some() {
            self.hook.show_error(
                MESSAGE_TITLE,
                "The debugger is currently running. You will have to kill the debugger for these changes to take effect.",
            );
        }
        self.program = Some(program);
    }

    /// Start a program from the beginning. Debugger is started if it is not running yet,
    /// otherwise current debugee is killed and restarted.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let program = self.program.clone().ok_or(Error::NoProgram)?;

        self.hook.clear_markers(MarkerKind::Current);
        self.flush_commands();

        if self.gdb.is_none() {
            if !Path::new(&program.path).exists() {
                return Err(Error::Executable(program.path));
            }
            let show_output = self.options.show_debugee_output;
            self.spawn_debugger(Some(&program.path), show_output)?;
            self.enqueue(Command::new(
                format!("set args {}\n", program.args.join(" ")),
                ActionKind::Prompt,
            ));
            self.reissue_breakpoints();
        } else {
            self.debugee_pid = None;
            self.enqueue(Command::new("k\n", ActionKind::Prompt));
        }

        self.enqueue_run_sequence();
        Ok(())
    }

    /// Start a debugger and attach it to a running process. Debugee output is never shown
    /// in a dedicated terminal in this mode.
    pub fn attach(&mut self, pid: Pid) -> Result<(), Error> {
        if self.gdb.is_some() {
            return Err(Error::AlreadyRunning);
        }
        if self.is_busy() {
            return Err(Error::Busy);
        }

        self.hook.clear_markers(MarkerKind::Current);
        self.flush_commands();

        let program = self.program.as_ref().map(|p| p.path.clone());
        self.spawn_debugger(program.as_deref(), false)?;
        self.reissue_breakpoints();
        self.enqueue(Command::new(format!("attach {pid}\n"), ActionKind::Prompt));
        self.enqueue(Command::new("info program\n", ActionKind::InfoProgram));
        self.enqueue(Command::new("c\n", ActionKind::Running));
        Ok(())
    }

    /// Detach from debugee and finish a session.
    pub fn detach(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new("detach\n", ActionKind::Quit));
        self.debugee_pid = None;
        Ok(())
    }

    /// Step into.
    pub fn step(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new("s\n", ActionKind::Step));
        Ok(())
    }

    /// Step over.
    pub fn next(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new("n\n", ActionKind::Step));
        Ok(())
    }

    pub fn continue_debugee(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new("c\n", ActionKind::Running));
        Ok(())
    }

    /// Show a backtrace in a text dialog.
    pub fn backtrace(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new(
            "backtrace\n",
            ActionKind::Show { title: "Backtrace" },
        ));
        Ok(())
    }

    /// Send a raw command to the debugger, output is shown in a text dialog.
    pub fn execute(&mut self, raw_command: &str) -> Result<(), Error> {
        self.ensure_ready()?;
        self.enqueue(Command::new(
            format!("{}\n", raw_command.trim_end()),
            ActionKind::Show { title: "Output" },
        ));
        Ok(())
    }

    /// Interrupt a running debugee. Queued commands are dropped.
    pub fn interrupt(&mut self) -> Result<(), Error> {
        if self.gdb.is_none() {
            return Err(Error::NotRunning);
        }
        let running = matches!(&self.state, SessionState::AwaitingResponse { action, .. } if action.is_running());
        if !running {
            return Ok(());
        }

        self.flush_commands();
        if let Some(pid) = self.debugee_pid {
            self.supervisor.signal(pid, Signal::SIGINT)?;
            self.state = SessionState::AwaitingResponse {
                action: ActionKind::Running,
                place: None,
            };
        }
        Ok(())
    }

    /// Kill the debugger and the debugee.
    pub fn kill(&mut self) {
        info!(target: "debugger", "kill debugger");
        self.finish();
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.gdb.is_none() {
            return Err(Error::NotRunning);
        }
        if self.is_busy() {
            return Err(Error::Busy);
        }
        Ok(())
    }

    fn spawn_debugger(&mut self, target: Option<&str>, show_output: bool) -> Result<(), Error> {
        let mut args: Vec<String> = ["-iex", "set editing off", "-iex", "set width 0"]
            .into_iter()
            .map(ToString::to_string)
            .collect();

        if show_output {
            let terminal = self.supervisor.open_terminal()?;
            args.push(format!("-tty={}", terminal.path.display()));
            self.reactor.watch(terminal.fd(), Interest::Readable);
            self.terminal = Some(terminal);
        }
        if let Some(target) = target {
            args.push(target.to_string());
        }

        let spawned = match self
            .supervisor
            .spawn(&self.options.debugger, &args, !show_output)
        {
            Ok(spawned) => spawned,
            Err(e) => {
                self.close_terminal();
                return Err(e);
            }
        };
        info!(target: "debugger", "debugger started: {} {}", self.options.debugger, args.join(" "));

        self.reactor
            .watch(spawned.pipe.output_fd(), Interest::Readable);
        self.gdb = Some(DebuggerProcess {
            pid: spawned.pid,
            pipe: spawned.pipe,
        });
        self.debugee_pid = None;
        self.pool.reset();
        self.state = SessionState::AwaitingResponse {
            action: ActionKind::Version,
            place: None,
        };
        Ok(())
    }

    fn enqueue_run_sequence(&mut self) {
        self.enqueue(Command::new("b main\n", ActionKind::Breakpoint));
        self.enqueue(Command::new("r\n", ActionKind::Running));
        self.enqueue(Command::new("clear\n", ActionKind::BreakpointClear));
        self.enqueue(Command::new("info program\n", ActionKind::InfoProgram));
        if !self.options.stop_at_entry {
            self.enqueue(Command::new("c\n", ActionKind::Running));
        }
    }

    /// Put command into the queue, overflowed commands are dropped.
    fn enqueue(&mut self, command: Command) {
        let text = command.text.clone();
        if weak_error!(self.queue.enqueue(command), "drop command:").is_some() {
            debug!(target: "debugger", "enqueue `{}`", text.trim_end());
            self.arm_writer();
        }
    }

    /// Watch debugger input for writability if there is something to send.
    fn arm_writer(&self) {
        if let Some(gdb) = &self.gdb {
            if self.state == SessionState::Idle && !self.queue.is_empty() {
                self.reactor
                    .watch(gdb.pipe.input_fd(), Interest::Writable);
            }
        }
    }

    fn disarm_writer(&self) {
        if let Some(gdb) = &self.gdb {
            self.reactor
                .unwatch(gdb.pipe.input_fd(), Interest::Writable);
        }
    }

    /// Drop all pending commands and forget about a command in flight.
    fn flush_commands(&mut self) {
        let dropped = self.queue.flush();
        if dropped > 0 {
            debug!(target: "debugger", "{dropped} pending commands dropped");
        }
        self.last_displayed_variable = 0;
        if self.is_busy() {
            self.state = SessionState::Idle;
        }
        self.disarm_writer();
    }

    /// Report an error and tear down the session.
    fn fatal(&mut self, err: Error) {
        error!(target: "debugger", "{:#}", err);
        self.hook.show_error(MESSAGE_TITLE, &err.to_string());
        self.finish();
    }

    /// Tear down the session: drop commands, kill the debugger and the debugee.
    fn finish(&mut self) {
        self.hook.clear_markers(MarkerKind::Current);
        self.flush_commands();
        self.pool.reset();

        if let Some(gdb) = self.gdb.take() {
            self.reactor
                .unwatch(gdb.pipe.input_fd(), Interest::Writable);
            self.reactor
                .unwatch(gdb.pipe.output_fd(), Interest::Readable);
            self.supervisor.kill(gdb.pid);
            if let Some(pid) = self.debugee_pid.take() {
                weak_error!(
                    self.supervisor.signal(pid, Signal::SIGKILL),
                    "kill debugee:"
                );
            }
        }
        self.close_terminal();
        self.debugee_pid = None;
        self.state = SessionState::Closed;
    }

    fn close_terminal(&mut self) {
        if let Some(terminal) = self.terminal.take() {
            self.reactor.unwatch(terminal.fd(), Interest::Readable);
        }
    }
}

impl Drop for Debugger {
    fn drop(&mut self) {
        if self.gdb.is_some() {
            self.finish();
        }
    }
}
