use crate::common::{HookEvent, Session, BANNER};
use gdbpilot::debugger::{Error, MarkerKind, SessionOptions, SessionState, SourcePlace};
use nix::sys::signal::Signal;
use nix::unistd::Pid;

const INFO_SOURCE: &str = "Current source file is test.c\nLocated in /home/user/test.c\n(gdb) ";

#[test]
fn test_run_without_stop_at_main() {
    let mut session = Session::new(SessionOptions {
        stop_at_entry: false,
        ..SessionOptions::default()
    });
    session.debugger.start().unwrap();
    session.respond(BANNER);
    session.exchange("set args --flag 42\n", "(gdb) ");
    session.exchange(
        "b main\n",
        "Breakpoint 1 at 0x1139: file test.c, line 5.\n(gdb) ",
    );
    session.exchange(
        "r\n",
        "Starting program: /tmp/test\n\nBreakpoint 1, main () at test.c:5\n5\t  int x = 0;\n(gdb) ",
    );
    session.exchange(
        "clear\np 1834559546\n",
        "Deleted breakpoint 1 \n$1 = 1834559546\n(gdb) ",
    );
    session.exchange(
        "info program\n",
        "\tUsing the running image of child process 4242.\n(gdb) ",
    );
    session.exchange(
        "c\n",
        "Continuing.\n[Inferior 1 (process 4242) exited normally]\n(gdb) ",
    );

    // source query is useless without a debugee
    assert_eq!(session.send_next(), None);
    assert_eq!(session.debugger.debugee_pid(), None);
    assert_eq!(session.debugger.state(), &SessionState::Idle);
    assert_eq!(
        session.info.borrow().errors(),
        vec![(
            "Debug Message".to_string(),
            "[Inferior 1 (process 4242) exited normally]".to_string()
        )]
    );
}

#[test]
fn test_step() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();
    session.clear_events();

    session.debugger.step().unwrap();
    session.exchange("s\n", "6\t  return x + 1;\n(gdb) ");
    session.exchange("info source\n", INFO_SOURCE);

    assert_eq!(
        session.debugger.current_place(),
        Some(SourcePlace::new("/home/user/test.c", 6))
    );
    assert_eq!(
        session.info.borrow().events,
        vec![
            HookEvent::ClearMarkers(MarkerKind::Current),
            HookEvent::Navigate(SourcePlace::new("/home/user/test.c", 6)),
            HookEvent::ClearMarkers(MarkerKind::Current),
            HookEvent::InsertMarker(
                SourcePlace::new("/home/user/test.c", 6),
                MarkerKind::Current
            ),
        ]
    );
}

#[test]
fn test_next_into_other_function() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.next().unwrap();
    session.exchange("n\n", "foo (a=1) at util.c:3\n3\t  return a * 2;\n(gdb) ");
    session.exchange(
        "info source\n",
        "Current source file is util.c\nLocated in /home/user/util.c\n(gdb) ",
    );

    assert_eq!(
        session.debugger.current_place(),
        Some(SourcePlace::new("/home/user/util.c", 3))
    );
}

#[test]
fn test_stop_without_line() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.step().unwrap();
    session.exchange("s\n", "0x00007ffff7c29d90 in __libc_start_call_main ()\n(gdb) ");
    session.exchange(
        "backtrace\n",
        "#0  0x00007ffff7c29d90 in __libc_start_call_main ()\n#1  0x00007ffff7c29e40 in __libc_start_main ()\n(gdb) ",
    );

    assert_eq!(
        session.info.borrow().texts(),
        vec![(
            "Backtrace".to_string(),
            "#0  0x00007ffff7c29d90 in __libc_start_call_main ()\n#1  0x00007ffff7c29e40 in __libc_start_main ()".to_string()
        )]
    );
}

#[test]
fn test_busy() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.continue_debugee().unwrap();
    assert_eq!(session.send_next().as_deref(), Some("c\n"));

    assert!(matches!(session.debugger.step(), Err(Error::Busy)));
    assert!(matches!(session.debugger.backtrace(), Err(Error::Busy)));
    assert!(matches!(session.debugger.start(), Err(Error::Busy)));
}

#[test]
fn test_signal_received() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.continue_debugee().unwrap();
    session.exchange(
        "c\n",
        "Continuing.\n\nProgram received signal SIGSEGV, Segmentation fault.\n0x0000555555555151 in main () at test.c:7\n7\t  *p = 1;\n(gdb) ",
    );

    assert_eq!(
        session.info.borrow().errors(),
        vec![(
            "Debug Message".to_string(),
            "Program received signal SIGSEGV, Segmentation fault.\n0x0000555555555151 in main () at test.c:7\n7\t  *p = 1;".to_string()
        )]
    );
    session.exchange("info source\n", INFO_SOURCE);
    assert_eq!(
        session.debugger.current_place(),
        Some(SourcePlace::new("/home/user/test.c", 7))
    );
}

#[test]
fn test_program_terminated() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.continue_debugee().unwrap();
    session.exchange(
        "c\n",
        "Continuing.\n\nProgram terminated with signal SIGKILL, Killed.\nThe program no longer exists.\n(gdb) ",
    );

    assert_eq!(session.debugger.debugee_pid(), None);
    assert_eq!(session.send_next(), None);
    assert_eq!(session.info.borrow().errors().len(), 1);
}

#[test]
fn test_watchpoint_triggered() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.continue_debugee().unwrap();
    session.exchange(
        "c\n",
        "Continuing.\n\nHardware watchpoint 2: x\n\nOld value = 0\nNew value = 1\nmain () at test.c:7\n7\t  x = x + 1;\n(gdb) ",
    );

    assert_eq!(
        session.info.borrow().texts(),
        vec![(
            "Watchpoint".to_string(),
            "Variable: x\n\n0\n     --->     \n1".to_string()
        )]
    );
    assert_eq!(session.send_next().as_deref(), Some("info source\n"));
}

#[test]
fn test_interrupt() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    // nothing to interrupt
    session.debugger.interrupt().unwrap();
    assert!(session.supervisor.borrow().signals.is_empty());

    session.debugger.continue_debugee().unwrap();
    session.exchange("c\n", "Continuing.\n");
    session.debugger.interrupt().unwrap();

    assert_eq!(
        session.supervisor.borrow().signals,
        vec![(Pid::from_raw(4242), Signal::SIGINT)]
    );
    assert!(session.debugger.is_busy());

    session.respond("\nProgram received signal SIGINT, Interrupt.\nmain () at test.c:8\n8\t  while (1) {}\n(gdb) ");
    assert_eq!(session.send_next().as_deref(), Some("info source\n"));
}

#[test]
fn test_backtrace() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.backtrace().unwrap();
    session.exchange("backtrace\n", "#0  main () at test.c:5\n(gdb) ");
    session.debugger.execute("info frame  ").unwrap();
    session.exchange("info frame\n", "No stack.\n(gdb) ");

    let info = session.info.borrow();
    assert_eq!(
        info.texts(),
        vec![("Backtrace".to_string(), "#0  main () at test.c:5".to_string())]
    );
    assert_eq!(
        info.errors(),
        vec![("Debug Message".to_string(), "There is no stack".to_string())]
    );
}

#[test]
fn test_raw_command_empty_output() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.execute("set var x = 3").unwrap();
    session.exchange("set var x = 3\n", "(gdb) ");

    assert!(session.info.borrow().texts().is_empty());
    assert!(!session.debugger.is_busy());
}
