use crate::debugger::error::Error;
use log::debug;
use nix::pty::openpty;
use nix::sys::signal::{self, Signal};
use nix::sys::termios::{self, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices};
use nix::unistd::{self, Pid};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

/// Bidirectional channel to a debugger process.
pub trait DebuggerPipe: Read + Write {
    /// Descriptor for writing commands.
    fn input_fd(&self) -> RawFd;
    /// Descriptor for reading responses.
    fn output_fd(&self) -> RawFd;
}

/// Debugger driven over a pseudo-terminal master, single descriptor for both directions.
pub struct PtyPipe {
    master: File,
}

impl Read for PtyPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.master.read(buf)
    }
}

impl Write for PtyPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.master.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.master.flush()
    }
}

impl DebuggerPipe for PtyPipe {
    fn input_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    fn output_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

/// Debugger driven over a pair of pipes, stderr merged into stdout.
pub struct SplitPipe {
    input: ChildStdin,
    output: os_pipe::PipeReader,
}

impl Read for SplitPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.output.read(buf)
    }
}

impl Write for SplitPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.input.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.input.flush()
    }
}

impl DebuggerPipe for SplitPipe {
    fn input_fd(&self) -> RawFd {
        self.input.as_raw_fd()
    }

    fn output_fd(&self) -> RawFd {
        self.output.as_raw_fd()
    }
}

/// Started debugger process.
pub struct Spawned {
    pub pid: Pid,
    pub pipe: Box<dyn DebuggerPipe>,
}

/// Dedicated terminal for a debugee output.
pub struct DebugeeTerminal {
    /// Path of the slave side, passed to the debugger.
    pub path: PathBuf,
    /// Master side, debugee output is read from it.
    pub master: File,
    /// Slave side stays open so that reading from master does not fail until debugee opens it.
    _slave: OwnedFd,
}

impl DebugeeTerminal {
    pub fn fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

/// Start and stop debugger and debugee processes, track their liveness.
pub trait ProcessSupervisor {
    /// Start a process, when `use_pty` is true process is started under a new pseudo-terminal,
    /// otherwise with piped stdin and merged stdout/stderr.
    fn spawn(&mut self, program: &str, args: &[String], use_pty: bool) -> Result<Spawned, Error>;

    fn is_alive(&mut self, pid: Pid) -> bool;

    fn signal(&mut self, pid: Pid, sig: Signal) -> Result<(), Error>;

    /// Terminate a process and release its resources.
    fn kill(&mut self, pid: Pid);

    /// Allocate a pseudo-terminal for the debugee.
    fn open_terminal(&mut self) -> Result<DebugeeTerminal, Error>;
}

/// [`ProcessSupervisor`] backed by real processes and pseudo-terminals.
#[derive(Default)]
pub struct PtySupervisor {
    children: HashMap<Pid, Child>,
}

const TERMINATE_ATTEMPTS: u32 = 10;
const TERMINATE_STEP: Duration = Duration::from_millis(10);

impl PtySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_under_pty(cmd: &mut Command) -> Result<(Child, Box<dyn DebuggerPipe>), Error> {
        let pty = openpty(None, None).map_err(Error::Terminal)?;
        make_raw(&pty.slave)?;

        let slave = File::from(pty.slave);
        cmd.stdin(slave.try_clone()?)
            .stdout(slave.try_clone()?)
            .stderr(slave);

        unsafe {
            cmd.pre_exec(|| {
                unistd::setsid()?;
                if nix::libc::ioctl(0, nix::libc::TIOCSCTTY, 0) < 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let child = cmd.spawn()?;
        let pipe = PtyPipe {
            master: File::from(pty.master),
        };
        Ok((child, Box::new(pipe)))
    }

    fn spawn_with_pipes(cmd: &mut Command) -> Result<(Child, Box<dyn DebuggerPipe>), Error> {
        let (reader, writer) = os_pipe::pipe()?;
        cmd.stdin(Stdio::piped())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = cmd.spawn()?;
        let input = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdin is not captured"))?;
        Ok((
            child,
            Box::new(SplitPipe {
                input,
                output: reader,
            }),
        ))
    }
}

impl ProcessSupervisor for PtySupervisor {
    fn spawn(&mut self, program: &str, args: &[String], use_pty: bool) -> Result<Spawned, Error> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        let spawned = if use_pty {
            Self::spawn_under_pty(&mut cmd)
        } else {
            Self::spawn_with_pipes(&mut cmd)
        };
        // parent copies of the child side descriptors are closed here
        drop(cmd);

        let (child, pipe) = spawned.map_err(|e| match e {
            Error::IO(e) => Error::Spawn(program.to_string(), e),
            e => e,
        })?;
        let pid = Pid::from_raw(child.id() as i32);
        debug!(target: "debugger", "`{program}` started with pid {pid}");

        self.children.insert(pid, child);
        Ok(Spawned { pid, pipe })
    }

    fn is_alive(&mut self, pid: Pid) -> bool {
        match self.children.get_mut(&pid) {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    debug!(target: "debugger", "process {pid} exited with {status}");
                    self.children.remove(&pid);
                    false
                }
                Err(_) => false,
            },
            None => signal::kill(pid, None).is_ok(),
        }
    }

    fn signal(&mut self, pid: Pid, sig: Signal) -> Result<(), Error> {
        signal::kill(pid, sig).map_err(|e| Error::Syscall("kill", e))
    }

    fn kill(&mut self, pid: Pid) {
        let Some(mut child) = self.children.remove(&pid) else {
            _ = signal::kill(pid, Signal::SIGKILL);
            return;
        };

        _ = signal::kill(pid, Signal::SIGTERM);
        for _ in 0..TERMINATE_ATTEMPTS {
            if let Ok(Some(_)) = child.try_wait() {
                return;
            }
            thread::sleep(TERMINATE_STEP);
        }

        _ = child.kill();
        _ = child.wait();
    }

    fn open_terminal(&mut self) -> Result<DebugeeTerminal, Error> {
        let pty = openpty(None, None).map_err(Error::Terminal)?;
        let path = std::fs::read_link(format!("/proc/self/fd/{}", pty.slave.as_raw_fd()))?;
        Ok(DebugeeTerminal {
            path,
            master: File::from(pty.master),
            _slave: pty.slave,
        })
    }
}

impl Drop for PtySupervisor {
    fn drop(&mut self) {
        let pids: Vec<Pid> = self.children.keys().copied().collect();
        pids.into_iter().for_each(|pid| self.kill(pid));
    }
}

/// Put a terminal into a mode where bytes pass as is: no echo, no line editing,
/// no signal characters and no newline translation in either direction.
fn make_raw(fd: impl AsFd) -> Result<(), Error> {
    let mut attrs = termios::tcgetattr(fd.as_fd()).map_err(Error::Terminal)?;
    attrs
        .local_flags
        .remove(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG);
    attrs
        .output_flags
        .remove(OutputFlags::ONLCR | OutputFlags::OCRNL);
    attrs.input_flags.remove(InputFlags::ICRNL);
    attrs.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    attrs.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
    termios::tcsetattr(fd.as_fd(), SetArg::TCSANOW, &attrs).map_err(Error::Terminal)
}
