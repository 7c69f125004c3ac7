use crate::debugger::{Debugger, DebuggerBuilder, Error, Program, SessionOptions, WatchSet};
use crate::ui::command::{Command, CommandError, CommandResult};
use crate::ui::config;
use crate::ui::console::editor::{create_editor, RLHelper};
use crate::ui::console::help::help_for_command;
use crate::ui::console::hook::TerminalHook;
use crate::ui::console::print::style::{ErrorView, KeywordView};
use crate::ui::console::print::ExternalPrinter;
use crate::ui::console::variable::render_variables;
use crate::ui::supervisor::DebugeeSource;
use anyhow::Context;
use log::{debug, warn};
use nix::errno::Errno;
use nix::unistd::Pid;
use rustyline::error::ReadlineError;
use rustyline::history::MemHistory;
use rustyline::Editor;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError};
use std::sync::{mpsc, Once};
use std::thread;

mod editor;
mod file;
mod help;
pub mod hook;
pub mod print;
mod variable;

const WELCOME_TEXT: &str = r#"
gdbpilot greets, type `help` for list of commands
"#;
const PROMT: &str = "(gp) ";
/// Max time of a single reactor poll.
const POLL_TIMEOUT_MS: u16 = 100;

type GPEditor = Editor<RLHelper, MemHistory>;

pub struct AppBuilder {
    options: SessionOptions,
}

impl AppBuilder {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub fn build(self, source: DebugeeSource) -> anyhow::Result<TerminalApplication> {
        let (control_tx, control_rx) = mpsc::sync_channel::<Control>(0);
        let control_rx = Rc::new(control_rx);
        let mut editor = create_editor(PROMT, config::current().colored)?;
        let printer = Rc::new(ExternalPrinter::new(&mut editor));

        let reactor = WatchSet::new();
        let hook = TerminalHook::new(Rc::clone(&printer), Rc::clone(&control_rx));

        let mut builder = DebuggerBuilder::new(self.options);
        let attach_to = match source {
            DebugeeSource::File { path, args } => {
                builder = builder.with_program(Program::new(path, args));
                None
            }
            DebugeeSource::Process { pid, program } => {
                if let Some(path) = program {
                    builder = builder.with_program(Program::new(path, Vec::<String>::new()));
                }
                Some(Pid::from_raw(pid))
            }
        };
        let debugger = builder.build(hook, reactor.clone());

        Ok(TerminalApplication {
            debugger,
            reactor,
            attach_to,
            editor,
            printer,
            control_tx,
            control_rx,
        })
    }
}

/// Messages from the editor thread.
pub enum Control {
    /// New command or answer from user received
    Cmd(String),
    /// Ctrl-C pressed
    Interrupt,
    /// Terminate application
    Terminate,
}

pub struct TerminalApplication {
    debugger: Debugger,
    reactor: WatchSet,
    attach_to: Option<Pid>,
    editor: GPEditor,
    printer: Rc<ExternalPrinter>,
    control_tx: SyncSender<Control>,
    control_rx: Rc<Receiver<Control>>,
}

pub static LOGGER_ONCE: Once = Once::new();
pub static HELLO_ONCE: Once = Once::new();

impl TerminalApplication {
    pub fn run(self) -> anyhow::Result<()> {
        LOGGER_ONCE.call_once(|| {
            env_logger::init();
        });

        let mut editor = self.editor;
        let control_tx = self.control_tx;
        thread::spawn(move || {
            HELLO_ONCE.call_once(|| {
                println!("{WELCOME_TEXT}");
            });

            loop {
                let line = editor.readline(PROMT);
                match line {
                    Ok(input) => {
                        if input == "q" || input == "quit" {
                            _ = control_tx.send(Control::Terminate);
                            break;
                        } else {
                            _ = editor.add_history_entry(&input);
                            _ = control_tx.send(Control::Cmd(input));
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        _ = control_tx.send(Control::Interrupt);
                    }
                    Err(ReadlineError::Eof) => {
                        _ = control_tx.send(Control::Terminate);
                        break;
                    }
                    Err(err) => {
                        println!("error: {:#}", err);
                        _ = control_tx.send(Control::Terminate);
                        break;
                    }
                }
            }
        });

        let mut app_loop = AppLoop {
            debugger: self.debugger,
            reactor: self.reactor,
            control_rx: self.control_rx,
            printer: self.printer,
        };

        if let Some(pid) = self.attach_to {
            if let Err(e) = app_loop.debugger.attach(pid) {
                app_loop.print_error(CommandError::Handle(e));
            }
        }

        app_loop.run()
    }
}

struct AppLoop {
    debugger: Debugger,
    reactor: WatchSet,
    control_rx: Rc<Receiver<Control>>,
    printer: Rc<ExternalPrinter>,
}

impl AppLoop {
    fn yes(&self, question: &str) -> bool {
        self.printer.print(question);

        match self.control_rx.recv() {
            Ok(Control::Cmd(cmd)) => {
                let cmd = cmd.trim().to_lowercase();
                cmd == "y" || cmd == "yes"
            }
            Ok(Control::Interrupt) | Ok(Control::Terminate) | Err(_) => false,
        }
    }

    fn handle_command(&mut self, cmd: &str) -> CommandResult<()> {
        match Command::parse(cmd)? {
            Command::Start => {
                if self.debugger.is_started() && !self.yes("Restart program? (y or n)") {
                    return Ok(());
                }
                self.debugger.start()?;
            }
            Command::Attach(pid) => self.debugger.attach(Pid::from_raw(pid))?,
            Command::Detach => self.debugger.detach()?,
            Command::Breakpoint(place) => self.debugger.toggle_breakpoint(place)?,
            Command::Condition(place, expression) => self
                .debugger
                .set_conditional_breakpoint(place, &expression)?,
            Command::ClearBreakpoints => self.debugger.clear_breakpoints()?,
            Command::Next => self.debugger.next()?,
            Command::Step => self.debugger.step()?,
            Command::Continue => self.debugger.continue_debugee()?,
            Command::Until(place) => self.debugger.until(place)?,
            Command::Backtrace => self.debugger.backtrace()?,
            Command::Raw(raw) => self.debugger.execute(&raw)?,
            Command::Display(expression) => self.debugger.add_variable(&expression)?,
            Command::Undisplay(index) => {
                let var = self.debugger.remove_variable(index)?;
                self.printer
                    .print(format!("Remove {}", KeywordView::from(var.name)));
            }
            Command::Watch(index) => self.debugger.toggle_watch(index)?,
            Command::Variables => {
                let variables = self.debugger.variables();
                if variables.is_empty() {
                    self.printer.print("No variables, use `display <expression>`");
                } else {
                    self.printer.print(render_variables(variables));
                }
            }
            Command::Stop => self.debugger.interrupt()?,
            Command::Kill => {
                self.debugger.kill();
                self.printer.print("Debugger killed");
            }
            Command::Help(command) => {
                self.printer.print(help_for_command(command.as_deref()));
            }
        }

        Ok(())
    }

    fn print_error(&self, e: CommandError) {
        match e {
            CommandError::Parsing(_) => {
                self.printer.print(ErrorView::from(e));
            }
            CommandError::Handle(ref err) if err.is_fatal() => {
                self.printer.print(ErrorView::from("shutdown debugger"));
                self.printer
                    .print(ErrorView::from(format!("fatal debugger error: {e:#}")));
            }
            CommandError::Handle(_) => {
                self.printer
                    .print(ErrorView::from(format!("debugger error: {e:#}")));
            }
        }
    }

    /// Wait for debugger events and pass them to the session.
    fn poll_debugger(&mut self) -> anyhow::Result<()> {
        let ready = match self.reactor.poll(POLL_TIMEOUT_MS) {
            Ok(ready) => ready,
            Err(Errno::EINTR) => return Ok(()),
            Err(e) => return Err(e).context("Poll debugger descriptors"),
        };
        for (fd, interest) in ready {
            self.debugger.on_ready(fd, interest);
        }
        Ok(())
    }

    fn run(mut self) -> anyhow::Result<()> {
        loop {
            self.poll_debugger()?;

            let action = match self.control_rx.try_recv() {
                Ok(action) => action,
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Disconnected) => break,
            };

            match action {
                Control::Cmd(command) => {
                    debug!(target: "debugger", "user command: {command}");
                    if let Err(e) = self.handle_command(&command) {
                        self.print_error(e);
                    }
                }
                Control::Interrupt => {
                    if let Err(e) = self.debugger.interrupt() {
                        match e {
                            Error::NotRunning => {}
                            e => self.print_error(CommandError::Handle(e)),
                        }
                    }
                }
                Control::Terminate => {
                    break;
                }
            }
        }

        if self.debugger.is_started() {
            warn!(target: "debugger", "application terminated, kill debugger");
        }
        self.debugger.kill();
        Ok(())
    }
}
