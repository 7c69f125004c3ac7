use gdbpilot::debugger::process::{DebuggerPipe, ProcessSupervisor};
use gdbpilot::debugger::{Error, PtySupervisor};
use serial_test::serial;
use std::io::{Read, Write};

#[test]
#[serial]
fn test_pty_process_lifecycle() {
    let mut supervisor = PtySupervisor::new();
    let spawned = supervisor
        .spawn("sleep", &["5".to_string()], true)
        .unwrap();
    assert_eq!(spawned.pipe.input_fd(), spawned.pipe.output_fd());

    assert!(supervisor.is_alive(spawned.pid));
    supervisor.kill(spawned.pid);
    assert!(!supervisor.is_alive(spawned.pid));
}

/// Read from a pipe until `expected_len` bytes are received or the other side is closed.
fn read_output(pipe: &mut dyn DebuggerPipe, expected_len: usize) -> Vec<u8> {
    let mut output = Vec::new();
    let mut buf = [0u8; 64];
    while output.len() < expected_len {
        match pipe.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => output.extend_from_slice(&buf[..n]),
        }
    }
    output
}

#[test]
#[serial]
fn test_pty_output_is_not_translated() {
    let mut supervisor = PtySupervisor::new();
    let mut spawned = supervisor
        .spawn("printf", &["1834559546\\n(gdb) ".to_string()], true)
        .unwrap();

    let expected = b"1834559546\n(gdb) ";
    let output = read_output(spawned.pipe.as_mut(), expected.len());
    assert_eq!(String::from_utf8_lossy(&output), "1834559546\n(gdb) ");

    supervisor.kill(spawned.pid);
}

#[test]
#[serial]
fn test_pty_input_is_not_echoed() {
    let mut supervisor = PtySupervisor::new();
    let mut spawned = supervisor.spawn("cat", &[], true).unwrap();

    spawned.pipe.write_all(b"ping\n").unwrap();
    spawned.pipe.flush().unwrap();

    // echo or newline translation would make the output longer
    let output = read_output(spawned.pipe.as_mut(), 5);
    assert_eq!(output, b"ping\n");

    supervisor.kill(spawned.pid);
    assert!(!supervisor.is_alive(spawned.pid));
}

#[test]
#[serial]
fn test_piped_process() {
    let mut supervisor = PtySupervisor::new();
    let mut spawned = supervisor.spawn("cat", &[], false).unwrap();
    assert_ne!(spawned.pipe.input_fd(), spawned.pipe.output_fd());

    spawned.pipe.write_all(b"ping\n").unwrap();
    spawned.pipe.flush().unwrap();

    let mut output = Vec::new();
    let mut buf = [0u8; 64];
    while output.len() < 5 {
        let n = spawned.pipe.read(&mut buf).unwrap();
        assert_ne!(n, 0);
        output.extend_from_slice(&buf[..n]);
    }
    assert_eq!(output, b"ping\n");

    supervisor.kill(spawned.pid);
    assert!(!supervisor.is_alive(spawned.pid));
}

#[test]
#[serial]
fn test_spawn_unknown_program() {
    let mut supervisor = PtySupervisor::new();
    let result = supervisor.spawn("gdbpilot-no-such-program", &[], false);
    assert!(matches!(result, Err(Error::Spawn(program, _)) if program == "gdbpilot-no-such-program"));
}
