use crate::debugger::Debugger;
use log::debug;
use nix::unistd::Pid;

fn first_number(s: &str) -> Option<i32> {
    let tail = s.trim_start_matches(|c: char| !c.is_ascii_digit());
    let digits: String = tail.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Extract a debugee pid from an `info program` response like
/// `Using the running image of child process 4242.` or
/// `Using the running image of child Thread 0x7ffff7d85740 (LWP 4242).`
pub(super) fn parse_debugee_pid(text: &str) -> Option<Pid> {
    let start = ["Pid", "Thread", "process"]
        .into_iter()
        .find_map(|keyword| text.find(keyword))?;
    let tail = &text[start..];

    let pid = match tail.find("LWP") {
        Some(lwp) => first_number(&tail[lwp..]),
        None => first_number(tail),
    }?;
    (pid > 0).then(|| Pid::from_raw(pid))
}

impl Debugger {
    pub(super) fn on_info_program_response(&mut self, text: &str) {
        if let Some(pid) = parse_debugee_pid(text) {
            debug!(target: "debugger", "debugee pid: {pid}");
            self.debugee_pid = Some(pid);
        }
    }
}
