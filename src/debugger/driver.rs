//! Reactor callbacks: send queued commands, read responses and detect their completion.

use crate::debugger::command::{ActionKind, Command, PROMPT};
use crate::debugger::pattern::find_from_end;
use crate::debugger::{query, Debugger, Error, Interest, MarkerKind, SessionState};
use log::{debug, trace};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::RawFd;

const READ_CHUNK: usize = 1024;

impl Debugger {
    /// Route a readiness event to a corresponding callback.
    pub fn on_ready(&mut self, fd: RawFd, interest: Interest) {
        let terminal_fd = self.terminal.as_ref().map(|terminal| terminal.fd());
        if terminal_fd == Some(fd) && interest == Interest::Readable {
            self.on_terminal_readable();
            return;
        }

        let Some((input_fd, output_fd)) = self
            .gdb
            .as_ref()
            .map(|gdb| (gdb.pipe.input_fd(), gdb.pipe.output_fd()))
        else {
            return;
        };
        match interest {
            Interest::Writable if input_fd == fd => self.on_writable(),
            Interest::Readable if output_fd == fd => self.on_readable(),
            _ => {}
        }
    }

    /// Debugger input is writable, send the next queued command.
    pub fn on_writable(&mut self) {
        self.disarm_writer();
        if self.gdb.is_none() {
            return;
        }
        if !self.debugger_alive() {
            self.fatal(Error::DebuggerExited);
            return;
        }
        if self.state != SessionState::Idle {
            return;
        }

        while let Some(command) = self.queue.dequeue_head() {
            let needs_debugee = matches!(
                command.action,
                ActionKind::InfoSource | ActionKind::Backtrace
            );
            if needs_debugee && self.debugee_pid.is_none() {
                debug!(target: "debugger", "skip `{}`, no debugee", command.text.trim_end());
                continue;
            }

            self.send(command);
            return;
        }
    }

    fn send(&mut self, command: Command) {
        if let Err(e) = self.write_raw(&command.text) {
            self.fatal(e);
            return;
        }
        debug!(target: "debugger", "sent `{}` ({})", command.text.trim_end(), command.action);

        if command.action.is_running() {
            self.hook.clear_markers(MarkerKind::Current);
        }
        self.state = SessionState::AwaitingResponse {
            action: command.action,
            place: command.place,
        };
    }

    /// Debugger output is readable, accumulate it and complete a command in flight if
    /// its response is over.
    pub fn on_readable(&mut self) {
        if self.gdb.is_none() {
            return;
        }
        if !self.debugger_alive() {
            self.fatal(Error::DebuggerExited);
            return;
        }

        let mut buf = [0u8; READ_CHUNK];
        let n = match self.read_chunk(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.fatal(e);
                return;
            }
        };
        let chunk = &buf[..n];
        trace!(target: "debugger", "read: {:?}", String::from_utf8_lossy(chunk));

        self.pool.append(chunk);
        if self.options.echo_to_console {
            self.hook.on_echo(&String::from_utf8_lossy(chunk));
        }

        if self.answer_sub_query() {
            return;
        }

        let (action, place) = match &self.state {
            SessionState::AwaitingResponse { action, place } => (action.clone(), place.clone()),
            SessionState::Idle => {
                if find_from_end(self.pool.snapshot(), PROMPT, 0).is_some() {
                    debug!(target: "debugger", "unsolicited output discarded");
                    self.pool.reset();
                }
                return;
            }
            SessionState::Closed => return,
        };

        let terminator = Command::terminator(&action);
        let end = match find_from_end(self.pool.snapshot(), terminator, 0) {
            Some(end) => end,
            // pending breakpoint question is left for the dispatcher, see `answer_sub_query`
            None if self.pending_question_terminates() => self.pool.len(),
            // response is not completed yet
            None => return,
        };
        self.pool.truncate(end);
        let response = self.pool.take_text();

        self.state = SessionState::Idle;
        self.dispatch(action, place, response);
        self.arm_writer();
    }

    fn on_terminal_readable(&mut self) {
        let Some(terminal) = self.terminal.as_mut() else {
            return;
        };

        let mut buf = [0u8; READ_CHUNK];
        let result = terminal.master.read(&mut buf);
        match result {
            Ok(0) => self.close_terminal(),
            Ok(n) => self.hook.on_debugee_output(&buf[..n]),
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            Err(e) => {
                debug!(target: "debugger", "debugee terminal closed: {e}");
                self.close_terminal();
            }
        }
    }

    /// True if a pending breakpoint question at the end of output completes a command in
    /// flight. It happens when nothing else is queued and the command sets a breakpoint.
    fn pending_question_terminates(&self) -> bool {
        let sets_breakpoint = matches!(
            &self.state,
            SessionState::AwaitingResponse { action, .. } if action.sets_breakpoint()
        );
        sets_breakpoint
            && self.queue.is_empty()
            && query::detect(self.pool.snapshot()).is_some_and(|q| q.asks_user())
    }

    /// Answer to a debugger question if it is at the end of accumulated output.
    /// Return true if question was answered.
    fn answer_sub_query(&mut self) -> bool {
        let Some(sub_query) = query::detect(self.pool.snapshot()) else {
            return false;
        };
        if self.pending_question_terminates() {
            return false;
        }
        self.pool.drop_last_line();

        let reply = match sub_query.reply {
            Some(reply) => reply,
            None if !self.queue.is_empty() => "n\n",
            None => {
                if self.hook.ask_yes_no(
                    query::PENDING_BREAKPOINT_TITLE,
                    query::PENDING_BREAKPOINT_QUESTION,
                ) {
                    "y\n"
                } else {
                    "n\n"
                }
            }
        };
        debug!(target: "debugger", "answer `{}` to a debugger question", reply.trim_end());

        if let Err(e) = self.write_raw(reply) {
            self.fatal(e);
        }
        true
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let gdb = self.gdb.as_mut().ok_or(Error::NotRunning)?;
        loop {
            match gdb.pipe.read(buf) {
                Ok(0) => return Err(Error::ReadEof),
                Ok(n) => return Ok(n),
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
                Err(e) => return Err(Error::Read(e)),
            }
        }
    }

    fn write_raw(&mut self, text: &str) -> Result<(), Error> {
        if self.options.echo_to_console {
            self.hook.on_echo(text);
        }
        let gdb = self.gdb.as_mut().ok_or(Error::NotRunning)?;
        gdb.pipe
            .write_all(text.as_bytes())
            .and_then(|_| gdb.pipe.flush())
            .map_err(Error::Write)
    }

    fn debugger_alive(&mut self) -> bool {
        match &self.gdb {
            Some(gdb) => self.supervisor.is_alive(gdb.pid),
            None => false,
        }
    }
}
