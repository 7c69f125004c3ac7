use crate::common::{HookEvent, Session, BANNER};
use gdbpilot::debugger::{Error, MarkerKind, SessionOptions, SourcePlace};

fn place(file: &str, line: u64) -> SourcePlace {
    SourcePlace::new(file, line)
}

fn marker_inserts(session: &Session, at: &SourcePlace) -> usize {
    session
        .info
        .borrow()
        .events
        .iter()
        .filter(|e| **e == HookEvent::InsertMarker(at.clone(), MarkerKind::Breakpoint))
        .count()
}

#[test]
fn test_toggle_without_debugger() {
    let mut session = Session::new(SessionOptions::default());

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    assert_eq!(
        session.debugger.breakpoints().collect::<Vec<_>>(),
        vec![&place("test.c", 12)]
    );

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    assert_eq!(session.debugger.breakpoints().count(), 0);

    assert_eq!(
        session.info.borrow().events,
        vec![
            HookEvent::InsertMarker(place("test.c", 12), MarkerKind::Breakpoint),
            HookEvent::RemoveMarker(place("test.c", 12), MarkerKind::Breakpoint),
        ]
    );
    assert!(session.pipe.borrow().written.is_empty());
}

#[test]
fn test_breakpoints_set_on_start() {
    let mut session = Session::new(SessionOptions::default());
    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();

    session.debugger.start().unwrap();
    session.respond(BANNER);
    session.exchange("set args --flag 42\n", "(gdb) ");
    session.exchange(
        "b test.c:12\n",
        "Breakpoint 1 at 0x1150: file test.c, line 12.\n(gdb) ",
    );
    session.exchange(
        "b main\n",
        "Breakpoint 2 at 0x1139: file test.c, line 5.\n(gdb) ",
    );
    session.exchange(
        "r\n",
        "Starting program: /tmp/test\n\nBreakpoint 2, main () at test.c:5\n5\t  int x = 0;\n(gdb) ",
    );
    session.exchange(
        "clear\np 1834559546\n",
        "Deleted breakpoint 2 \n$1 = 1834559546\n(gdb) ",
    );

    // marker of a breakpoint set by user survives a temporary one
    assert_eq!(
        session.debugger.breakpoints().collect::<Vec<_>>(),
        vec![&place("test.c", 12)]
    );
    assert_eq!(marker_inserts(&session, &place("test.c", 12)), 1);
}

#[test]
fn test_toggle_in_session() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();
    session.clear_events();

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    session.exchange(
        "b test.c:12\n",
        "Breakpoint 2 at 0x1150: file test.c, line 12.\n(gdb) ",
    );
    assert_eq!(session.debugger.breakpoints().count(), 1);

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    session.exchange(
        "clear test.c:12\np 1834559546\n",
        "Deleted breakpoint 2 \n$2 = 1834559546\n(gdb) ",
    );
    assert_eq!(session.debugger.breakpoints().count(), 0);

    assert_eq!(
        session.info.borrow().events,
        vec![
            HookEvent::InsertMarker(place("test.c", 12), MarkerKind::Breakpoint),
            HookEvent::RemoveMarker(place("test.c", 12), MarkerKind::Breakpoint),
        ]
    );
}

#[test]
fn test_toggle_while_busy() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.continue_debugee().unwrap();
    assert_eq!(session.send_next().as_deref(), Some("c\n"));
    assert!(matches!(
        session.debugger.toggle_breakpoint(place("test.c", 12)),
        Err(Error::Busy)
    ));
}

#[test]
fn test_conditional_breakpoint() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    session.exchange(
        "b test.c:12\n",
        "Breakpoint 2 at 0x1150: file test.c, line 12.\n(gdb) ",
    );

    session
        .debugger
        .set_conditional_breakpoint(place("test.c", 12), " i == 3 ")
        .unwrap();
    session.exchange(
        "b test.c:12\n",
        "Note: breakpoint 2 also set at pc 0x1150.\nBreakpoint 3 at 0x1150: file test.c, line 12.\n(gdb) ",
    );
    session.exchange("condition 3 i == 3\n", "(gdb) ");

    assert_eq!(marker_inserts(&session, &place("test.c", 12)), 1);
    assert!(session.info.borrow().errors().is_empty());
    assert!(!session.writer_armed());
}

#[test]
fn test_pending_breakpoint_confirmed() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();
    session.info.borrow_mut().answers.push_back(true);

    session.debugger.toggle_breakpoint(place("lib.c", 7)).unwrap();
    session.exchange(
        "b lib.c:7\n",
        "No source file named lib.c.\nMake breakpoint pending on future shared library load? (y or [n]) ",
    );
    // question completes `b` command, answer is sent as a separate command
    assert!(!session.debugger.is_busy());
    assert!(session.info.borrow().events.contains(&HookEvent::Question(
        "Make breakpoint pending on future shared library load?".to_string()
    )));
    assert_eq!(marker_inserts(&session, &place("lib.c", 7)), 0);

    session.exchange("y\n", "Breakpoint 2 (lib.c:7) pending.\n(gdb) ");

    assert_eq!(marker_inserts(&session, &place("lib.c", 7)), 1);
    assert_eq!(
        session.debugger.breakpoints().collect::<Vec<_>>(),
        vec![&place("lib.c", 7)]
    );
    assert!(session.info.borrow().errors().is_empty());
}

#[test]
fn test_pending_conditional_breakpoint() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();
    session.info.borrow_mut().answers.push_back(true);

    session
        .debugger
        .set_conditional_breakpoint(place("lib.c", 7), "n > 1")
        .unwrap();
    session.exchange(
        "b lib.c:7\n",
        "No source file named lib.c.\nMake breakpoint pending on future shared library load? (y or [n]) ",
    );
    session.exchange("y\n", "Breakpoint 2 (lib.c:7) pending.\n(gdb) ");
    session.exchange("condition 2 n > 1\n", "(gdb) ");

    assert_eq!(marker_inserts(&session, &place("lib.c", 7)), 1);
    assert!(!session.debugger.is_busy());
}

#[test]
fn test_pending_breakpoint_denied() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.toggle_breakpoint(place("lib.c", 7)).unwrap();
    session.exchange(
        "b lib.c:7\n",
        "No source file named lib.c.\nMake breakpoint pending on future shared library load? (y or [n]) ",
    );
    session.exchange("n\n", "(gdb) ");

    assert_eq!(session.debugger.breakpoints().count(), 0);
    assert_eq!(marker_inserts(&session, &place("lib.c", 7)), 0);
    assert!(session.info.borrow().errors().is_empty());
    assert!(!session.debugger.is_busy());
    assert_eq!(session.send_next(), None);
}

#[test]
fn test_duplicate_breakpoint() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    session.exchange(
        "b test.c:12\n",
        "Breakpoint 2 at 0x1150: file test.c, line 12.\n(gdb) ",
    );

    session
        .debugger
        .set_conditional_breakpoint(place("test.c", 12), "i == 3")
        .unwrap();
    session.exchange("b test.c:12\n", "Breakpoint 2 already exists\n(gdb) ");

    assert_eq!(
        session.info.borrow().errors(),
        vec![(
            "Debug Message".to_string(),
            "Breakpoint 2 already exists".to_string()
        )]
    );
    assert_eq!(marker_inserts(&session, &place("test.c", 12)), 1);
    assert_eq!(
        session.debugger.breakpoints().collect::<Vec<_>>(),
        vec![&place("test.c", 12)]
    );
    // condition is not put on anything
    assert_eq!(session.send_next(), None);
}

#[test]
fn test_clear_breakpoints() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.toggle_breakpoint(place("test.c", 12)).unwrap();
    session.exchange(
        "b test.c:12\n",
        "Breakpoint 2 at 0x1150: file test.c, line 12.\n(gdb) ",
    );

    session.debugger.clear_breakpoints().unwrap();
    assert_eq!(session.debugger.breakpoints().count(), 0);
    assert_eq!(
        session.info.borrow().events.last(),
        Some(&HookEvent::ClearMarkers(MarkerKind::Breakpoint))
    );
    session.exchange("d\n", "(gdb) ");
    assert!(!session.debugger.is_busy());
}

#[test]
fn test_unrecognized_response_drops_queue() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.until(place("test.c", 30)).unwrap();
    session.exchange("b test.c:30\n", "Line 30 is out of range for \"test.c\".\n(gdb) ");

    assert_eq!(
        session.info.borrow().errors(),
        vec![(
            "Debug Message".to_string(),
            "Line 30 is out of range for \"test.c\".".to_string()
        )]
    );
    assert_eq!(session.debugger.pending_commands().count(), 0);
    assert_eq!(session.send_next(), None);
}

#[test]
fn test_until() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();
    session.clear_events();

    session.debugger.until(place("test.c", 9)).unwrap();
    session.exchange(
        "b test.c:9\n",
        "Breakpoint 2 at 0x1160: file test.c, line 9.\n(gdb) ",
    );
    session.exchange(
        "c\n",
        "Continuing.\n\nBreakpoint 2, main () at test.c:9\n9\t  return x;\n(gdb) ",
    );
    session.exchange(
        "info source\n",
        "Current source file is test.c\nLocated in /home/user/test.c\n(gdb) ",
    );
    session.exchange(
        "clear test.c:9\np 1834559546\n",
        "Deleted breakpoint 2 \n$2 = 1834559546\n(gdb) ",
    );

    assert_eq!(session.debugger.breakpoints().count(), 0);
    assert_eq!(
        session.debugger.current_place(),
        Some(place("/home/user/test.c", 9))
    );
    let info = session.info.borrow();
    assert!(info
        .events
        .contains(&HookEvent::Navigate(place("/home/user/test.c", 9))));
    assert!(info
        .events
        .contains(&HookEvent::RemoveMarker(place("test.c", 9), MarkerKind::Breakpoint)));
}

#[test]
fn test_until_existing_breakpoint() {
    let mut session = Session::new(SessionOptions::default());
    session.start_at_main();

    session.debugger.toggle_breakpoint(place("test.c", 9)).unwrap();
    session.exchange(
        "b test.c:9\n",
        "Breakpoint 2 at 0x1160: file test.c, line 9.\n(gdb) ",
    );

    session.debugger.until(place("test.c", 9)).unwrap();
    session.exchange(
        "c\n",
        "Continuing.\n\nBreakpoint 2, main () at test.c:9\n9\t  return x;\n(gdb) ",
    );
    session.exchange(
        "info source\n",
        "Current source file is test.c\nLocated in /home/user/test.c\n(gdb) ",
    );

    assert_eq!(session.send_next(), None);
    assert_eq!(
        session.debugger.breakpoints().collect::<Vec<_>>(),
        vec![&place("test.c", 9)]
    );
}
