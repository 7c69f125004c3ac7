
mod breakpoints;
mod process;
mod steps;

use crate::common::{Session, DEBUGGER_PID};
use gdbpilot::debugger::{SessionOptions, SessionState, SourcePlace};
use nix::sys::signal::Signal;
use nix::unistd::Pid;

#[test]
fn test_start_spawns_debugger() {
    let mut session = Session::new(SessionOptions::default());
    session.debugger.start().unwrap();

    {
        let log = session.supervisor.borrow();
        let (program, args, use_pty) = &log.spawned[0];
        assert_eq!(program, "gdb");
        assert!(*use_pty);
        assert_eq!(&args[..4], ["-iex", "set editing off", "-iex", "set width 0"]);
        assert!(args[4].ends_with(
            std::env::current_exe()
                .unwrap()
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
        ));
    }

    // nothing is sent until the banner is read
    assert!(session.debugger.is_busy());
    assert!(!session.writer_armed());
    assert_eq!(session.send_next(), None);

    let pending: Vec<String> = session
        .debugger
        .pending_commands()
        .map(|cmd| cmd.text.clone())
        .collect();
    assert_eq!(
        pending,
        vec![
            "set args --flag 42\n",
            "b main\n",
            "r\n",
            "clear\np 1834559546\n",
            "info program\n",
        ]
    );
}

#[test]
fn test_start_stops_at_main() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    assert_eq!(session.debugger.state(), &SessionState::Idle);
    assert_eq!(session.debugger.debugee_pid(), Some(Pid::from_raw(4242)));
    assert_eq!(
        session.debugger.current_place(),
        Some(SourcePlace::new("/home/user/test.c", 5))
    );
    assert_eq!(session.debugger.breakpoints().count(), 0);
    assert!(!session.writer_armed());

    let info = session.info.borrow();
    assert!(info.events.contains(&common::HookEvent::Navigate(
        SourcePlace::new("/home/user/test.c", 5)
    )));
    assert!(info.errors().is_empty());
}

#[test]
fn test_restart_kills_debugee() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.start().unwrap();
    assert_eq!(session.debugger.debugee_pid(), None);
    session.exchange("k\n", "Kill the program being debugged? (y or n) ");
    assert_eq!(session.pipe.borrow().written.last().unwrap(), "y\n");
    session.respond("[Inferior 1 (process 4242) killed]\n(gdb) ");
    session.run_to_main();

    assert_eq!(session.supervisor.borrow().spawned.len(), 1);
    assert_eq!(session.debugger.debugee_pid(), Some(Pid::from_raw(4242)));
}

#[test]
fn test_kill() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.kill();

    assert_eq!(session.debugger.state(), &SessionState::Closed);
    assert!(!session.debugger.is_started());
    let log = session.supervisor.borrow();
    assert_eq!(log.killed, vec![Pid::from_raw(DEBUGGER_PID)]);
    assert_eq!(log.signals, vec![(Pid::from_raw(4242), Signal::SIGKILL)]);
}

#[test]
fn test_detach() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.detach().unwrap();
    session.exchange(
        "detach\n",
        "Detaching from program: /tmp/test, process 4242\n[Inferior 1 (process 4242) detached]\n(gdb) ",
    );

    assert_eq!(session.debugger.state(), &SessionState::Closed);
    assert!(session.supervisor.borrow().signals.is_empty());
    assert_eq!(session.info.borrow().errors().len(), 1);
}

#[test]
fn test_attach() {
    let mut session = Session::new(SessionOptions {
        show_debugee_output: true,
        ..SessionOptions::default()
    });
    session.debugger.attach(Pid::from_raw(4242)).unwrap();
    assert!(session.supervisor.borrow().spawned[0].2);

    session.respond(common::BANNER);
    session.exchange("attach 4242\n", "Attaching to process 4242\n(gdb) ");
    session.exchange(
        "info program\n",
        "\tUsing the running image of attached Thread 0x7ffff7d85740 (LWP 4242).\n(gdb) ",
    );
    assert_eq!(session.debugger.debugee_pid(), Some(Pid::from_raw(4242)));
    assert_eq!(session.send_next().as_deref(), Some("c\n"));

    assert!(matches!(
        session.debugger.attach(Pid::from_raw(1)),
        Err(gdbpilot::debugger::Error::AlreadyRunning)
    ));
}

#[test]
fn test_operations_require_debugger() {
    let mut session = Session::new(SessionOptions::default());
    assert!(matches!(
        session.debugger.step(),
        Err(gdbpilot::debugger::Error::NotRunning)
    ));
    assert!(matches!(
        session.debugger.execute("info registers"),
        Err(gdbpilot::debugger::Error::NotRunning)
    ));
    assert!(matches!(
        session.debugger.interrupt(),
        Err(gdbpilot::debugger::Error::NotRunning)
    ));
}
