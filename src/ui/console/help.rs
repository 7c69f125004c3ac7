use crate::ui::command::parser;

pub const HELP: &str = r#"
Available debugger commands:

start, r, run                               -- start or restart debugged program
attach <pid>                                -- attach debugger to a running process
detach                                      -- detach from a process and stop debugger
b, break <file:line>                        -- set or remove a breakpoint
cond <file:line> <expression>               -- set a conditional breakpoint
clear                                       -- remove all breakpoints
n, next                                     -- step program, stepping over subroutine calls
s, step                                     -- step program until it reaches a different source line
c, continue                                 -- continue program being debugged, after signal or breakpoint
until <file:line>                           -- continue program until it reaches a line
bt, backtrace                               -- print backtrace
gdb <command>                               -- send command to the debugger as is
display <expression>                        -- add expression to the variables panel
undisplay <number>                          -- remove expression from the variables panel
watch <number>                              -- set or remove a watchpoint on variable from the panel
vars                                        -- show variables panel
stop                                        -- interrupt running program
kill                                        -- kill debugger and program
h, help <>|<command>                        -- show help
q, quit                                     -- exit the gdbpilot
"#;

pub const HELP_START: &str = "\
\x1b[32;1mstart\x1b[0m
Start or restart a program. Debugger is started if it is not running yet, previously set
breakpoints are restored. Program stops at `main` unless `--no-stop-at-main` option is set.
";

pub const HELP_ATTACH: &str = "\
\x1b[32;1mattach\x1b[0m
Start a debugger and attach it to a running process.

Examples of usage:
attach 4242 - attach to process with pid 4242
";

pub const HELP_DETACH: &str = "\
\x1b[32;1mdetach\x1b[0m
Detach from a process, process continues its execution. Debugger is stopped.
";

pub const HELP_BREAK: &str = "\
\x1b[32;1mbreak\x1b[0m
Set a breakpoint at a source line, if there is a breakpoint already - remove it.
Breakpoints can be set before a program starts.

Examples of usage:
b main.c:10 - set or remove a breakpoint at line 10 of main.c
break /home/user/src/main.c:10 - same, with full path
";

pub const HELP_CONDITION: &str = "\
\x1b[32;1mcond\x1b[0m
Set a breakpoint that stops a program only if condition is true.

Examples of usage:
cond main.c:10 i == 3 - stop at line 10 of main.c if `i` equals to 3
";

pub const HELP_CLEAR: &str = "\
\x1b[32;1mclear\x1b[0m
Remove all breakpoints.
";

pub const HELP_NEXT: &str = "\
\x1b[32;1mnext\x1b[0m
Step program, stepping over subroutine calls.
";

pub const HELP_STEP: &str = "\
\x1b[32;1mstep\x1b[0m
Step program until it reaches a different source line.
";

pub const HELP_CONTINUE: &str = "\
\x1b[32;1mcontinue\x1b[0m
Continue program being debugged, after signal or breakpoint.
";

pub const HELP_UNTIL: &str = "\
\x1b[32;1muntil\x1b[0m
Continue program until it reaches a source line. Temporary breakpoint is removed after the stop.

Examples of usage:
until main.c:20 - run to line 20 of main.c
";

pub const HELP_BACKTRACE: &str = "\
\x1b[32;1mbacktrace\x1b[0m
Print backtrace of the stopped program.
";

pub const HELP_RAW: &str = "\
\x1b[32;1mgdb\x1b[0m
Send a command to the debugger as is, output is printed after the command is done.

Examples of usage:
gdb info registers - print registers
gdb x/4x $sp - print 4 words at stack pointer
";

pub const HELP_DISPLAY: &str = "\
\x1b[32;1mdisplay\x1b[0m
Add expression to the variables panel. Values are refreshed each time program stops,
changed values are marked with `*`.

Examples of usage:
display counter - show variable `counter`
display arr[i] + 1 - show expression value
";

pub const HELP_UNDISPLAY: &str = "\
\x1b[32;1mundisplay\x1b[0m
Remove expression from the variables panel by its number (see `vars`).
";

pub const HELP_WATCH: &str = "\
\x1b[32;1mwatch\x1b[0m
Set a watchpoint on expression from the variables panel by its number (see `vars`). If there is
a watchpoint already - remove it.
";

pub const HELP_VARS: &str = "\
\x1b[32;1mvars\x1b[0m
Show variables panel.
";

pub const HELP_STOP: &str = "\
\x1b[32;1mstop\x1b[0m
Interrupt a running program, same as Ctrl-C.
";

pub const HELP_KILL: &str = "\
\x1b[32;1mkill\x1b[0m
Kill debugger and a program.
";

pub const HELP_QUIT: &str = "\
\x1b[32;1mquit\x1b[0m
Exit gdbpilot, debugger and a program are killed.
";

pub fn help_for_command(command: Option<&str>) -> &str {
    match command {
        None => HELP,
        Some(parser::START_COMMAND)
        | Some(parser::RUN_COMMAND)
        | Some(parser::RUN_COMMAND_SHORT) => HELP_START,
        Some(parser::ATTACH_COMMAND) => HELP_ATTACH,
        Some(parser::DETACH_COMMAND) => HELP_DETACH,
        Some(parser::BREAK_COMMAND) | Some(parser::BREAK_COMMAND_SHORT) => HELP_BREAK,
        Some(parser::CONDITION_COMMAND) => HELP_CONDITION,
        Some(parser::CLEAR_COMMAND) => HELP_CLEAR,
        Some(parser::NEXT_COMMAND) | Some(parser::NEXT_COMMAND_SHORT) => HELP_NEXT,
        Some(parser::STEP_COMMAND) | Some(parser::STEP_COMMAND_SHORT) => HELP_STEP,
        Some(parser::CONTINUE_COMMAND) | Some(parser::CONTINUE_COMMAND_SHORT) => HELP_CONTINUE,
        Some(parser::UNTIL_COMMAND) => HELP_UNTIL,
        Some(parser::BACKTRACE_COMMAND) | Some(parser::BACKTRACE_COMMAND_SHORT) => HELP_BACKTRACE,
        Some(parser::RAW_COMMAND) => HELP_RAW,
        Some(parser::DISPLAY_COMMAND) => HELP_DISPLAY,
        Some(parser::UNDISPLAY_COMMAND) => HELP_UNDISPLAY,
        Some(parser::WATCH_COMMAND) => HELP_WATCH,
        Some(parser::VARS_COMMAND) => HELP_VARS,
        Some(parser::STOP_COMMAND) => HELP_STOP,
        Some(parser::KILL_COMMAND) => HELP_KILL,
        Some(parser::QUIT_COMMAND) | Some(parser::QUIT_COMMAND_SHORT) => HELP_QUIT,
        _ => "unknown command",
    }
}
