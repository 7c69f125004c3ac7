use indexmap::IndexSet;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::cell::RefCell;
use std::os::fd::{BorrowedFd, RawFd};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    Readable,
    Writable,
}

impl Interest {
    fn poll_flags(self) -> PollFlags {
        match self {
            Interest::Readable => PollFlags::POLLIN,
            Interest::Writable => PollFlags::POLLOUT,
        }
    }
}

/// Event loop collaborator. Debugger asks it to call back when a descriptor becomes ready.
pub trait Reactor {
    fn watch(&self, fd: RawFd, interest: Interest);
    fn unwatch(&self, fd: RawFd, interest: Interest);
}

/// Set of watched descriptors, shared between debugger and the loop that polls them.
#[derive(Clone, Default)]
pub struct WatchSet {
    watched: Rc<RefCell<IndexSet<(RawFd, Interest)>>>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watched(&self, fd: RawFd, interest: Interest) -> bool {
        self.watched.borrow().contains(&(fd, interest))
    }

    pub fn is_empty(&self) -> bool {
        self.watched.borrow().is_empty()
    }

    /// Wait until some of watched descriptors become ready or timeout expires.
    /// Return ready descriptors in order of watch registration.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms`: max wait time in milliseconds
    pub fn poll(&self, timeout_ms: u16) -> nix::Result<Vec<(RawFd, Interest)>> {
        let watched: Vec<(RawFd, Interest)> = self.watched.borrow().iter().copied().collect();

        // SAFETY: descriptors are owned by the debugger and unwatched before they are closed.
        let mut fds: Vec<PollFd> = watched
            .iter()
            .map(|&(fd, interest)| {
                PollFd::new(unsafe { BorrowedFd::borrow_raw(fd) }, interest.poll_flags())
            })
            .collect();

        if poll(&mut fds, PollTimeout::from(timeout_ms))? == 0 {
            return Ok(vec![]);
        }

        let hangup = PollFlags::POLLHUP | PollFlags::POLLERR | PollFlags::POLLNVAL;
        Ok(watched
            .into_iter()
            .zip(fds.iter())
            .filter(|((_, interest), pfd)| {
                pfd.revents()
                    .is_some_and(|ev| ev.intersects(interest.poll_flags() | hangup))
            })
            .map(|(watch, _)| watch)
            .collect())
    }
}

impl Reactor for WatchSet {
    fn watch(&self, fd: RawFd, interest: Interest) {
        self.watched.borrow_mut().insert((fd, interest));
    }

    fn unwatch(&self, fd: RawFd, interest: Interest) {
        self.watched.borrow_mut().shift_remove(&(fd, interest));
    }
}
