use super::{Command, CommandError, CommandResult};
use crate::debugger::SourcePlace;
use std::fmt::Display;
use std::str::FromStr;

pub const START_COMMAND: &str = "start";
pub const RUN_COMMAND: &str = "run";
pub const RUN_COMMAND_SHORT: &str = "r";
pub const ATTACH_COMMAND: &str = "attach";
pub const DETACH_COMMAND: &str = "detach";
pub const BREAK_COMMAND: &str = "break";
pub const BREAK_COMMAND_SHORT: &str = "b";
pub const CONDITION_COMMAND: &str = "cond";
pub const CLEAR_COMMAND: &str = "clear";
pub const NEXT_COMMAND: &str = "next";
pub const NEXT_COMMAND_SHORT: &str = "n";
pub const STEP_COMMAND: &str = "step";
pub const STEP_COMMAND_SHORT: &str = "s";
pub const CONTINUE_COMMAND: &str = "continue";
pub const CONTINUE_COMMAND_SHORT: &str = "c";
pub const UNTIL_COMMAND: &str = "until";
pub const BACKTRACE_COMMAND: &str = "backtrace";
pub const BACKTRACE_COMMAND_SHORT: &str = "bt";
pub const RAW_COMMAND: &str = "gdb";
pub const DISPLAY_COMMAND: &str = "display";
pub const UNDISPLAY_COMMAND: &str = "undisplay";
pub const WATCH_COMMAND: &str = "watch";
pub const VARS_COMMAND: &str = "vars";
pub const STOP_COMMAND: &str = "stop";
pub const KILL_COMMAND: &str = "kill";
pub const HELP_COMMAND: &str = "help";
pub const HELP_COMMAND_SHORT: &str = "h";
pub const QUIT_COMMAND: &str = "quit";
pub const QUIT_COMMAND_SHORT: &str = "q";

use chumsky::error::Rich;
use chumsky::prelude::{any, choice, end, just};
use chumsky::text::Char;
use chumsky::{extra, text, Boxed, Parser};

type Err<'a> = extra::Err<Rich<'a, char>>;

fn number<'a, T>() -> impl chumsky::Parser<'a, &'a str, T, Err<'a>> + Clone
where
    T: FromStr,
    T::Err: Display,
{
    text::int(10)
        .from_str::<T>()
        .try_map(|res, span| res.map_err(|e| Rich::custom(span, e)))
        .padded()
        .labelled("number")
}

/// Parse `file:line`.
pub fn source_place_parser<'a>() -> impl chumsky::Parser<'a, &'a str, SourcePlace, Err<'a>> + Clone
{
    any()
        .filter(|c: &char| c.to_char() != ':' && !c.is_whitespace())
        .repeated()
        .at_least(1)
        .to_slice()
        .then_ignore(just(':'))
        .then(number())
        .map(|(file, line): (&str, u64)| SourcePlace::new(file, line))
        .padded()
        .labelled("file:line")
}

/// Rest of the input, must not be empty.
fn tail<'a>() -> impl chumsky::Parser<'a, &'a str, String, Err<'a>> + Clone {
    any()
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.trim().to_string())
        .filter(|s: &String| !s.is_empty())
}

fn command<'a, I>(ctx: &'static str, inner: I) -> Boxed<'a, 'a, &'a str, Command, Err<'a>>
where
    I: chumsky::Parser<'a, &'a str, Command, Err<'a>> + 'a,
{
    inner.then_ignore(end()).labelled(ctx).boxed()
}

impl Command {
    /// Parse input string into command.
    pub fn parse(input: &str) -> CommandResult<Command> {
        Self::parser()
            .parse(input)
            .into_result()
            .map_err(|e| CommandError::Parsing(e[0].to_string()))
    }

    fn parser<'a>() -> impl chumsky::Parser<'a, &'a str, Command, Err<'a>> {
        let op = |sym| just(sym).padded();
        let op2 = |full, short| op(full).or(op(short));

        let start = choice((op(START_COMMAND), op(RUN_COMMAND), op(RUN_COMMAND_SHORT)))
            .to(Command::Start);
        let attach = op(ATTACH_COMMAND)
            .ignore_then(number())
            .map(Command::Attach);
        let detach = op(DETACH_COMMAND).to(Command::Detach);

        let r#break = op2(BREAK_COMMAND, BREAK_COMMAND_SHORT)
            .ignore_then(source_place_parser())
            .map(Command::Breakpoint);
        let condition = op(CONDITION_COMMAND)
            .ignore_then(source_place_parser())
            .then(tail())
            .map(|(place, expr)| Command::Condition(place, expr))
            .boxed();
        let clear = op(CLEAR_COMMAND).to(Command::ClearBreakpoints);

        let next = op2(NEXT_COMMAND, NEXT_COMMAND_SHORT).to(Command::Next);
        let step = op2(STEP_COMMAND, STEP_COMMAND_SHORT).to(Command::Step);
        let r#continue = op2(CONTINUE_COMMAND, CONTINUE_COMMAND_SHORT).to(Command::Continue);
        let until = op(UNTIL_COMMAND)
            .ignore_then(source_place_parser())
            .map(Command::Until);
        let backtrace = op2(BACKTRACE_COMMAND, BACKTRACE_COMMAND_SHORT).to(Command::Backtrace);

        let raw = op(RAW_COMMAND).ignore_then(tail()).map(Command::Raw);

        let display = op(DISPLAY_COMMAND).ignore_then(tail()).map(Command::Display);
        let undisplay = op(UNDISPLAY_COMMAND)
            .ignore_then(number())
            .map(Command::Undisplay);
        let watch = op(WATCH_COMMAND).ignore_then(number()).map(Command::Watch);
        let vars = op(VARS_COMMAND).to(Command::Variables);

        let stop = op(STOP_COMMAND).to(Command::Stop);
        let kill = op(KILL_COMMAND).to(Command::Kill);

        let help = op2(HELP_COMMAND, HELP_COMMAND_SHORT)
            .ignore_then(text::ident().or_not())
            .map(|s: Option<&str>| Command::Help(s.map(ToOwned::to_owned)))
            .padded()
            .boxed();

        choice((
            command(START_COMMAND, start),
            command(ATTACH_COMMAND, attach),
            command(DETACH_COMMAND, detach),
            command(BREAK_COMMAND, r#break),
            command(CONDITION_COMMAND, condition),
            command(CLEAR_COMMAND, clear),
            command(NEXT_COMMAND, next),
            command(STEP_COMMAND, step),
            command(CONTINUE_COMMAND, r#continue),
            command(UNTIL_COMMAND, until),
            command(BACKTRACE_COMMAND, backtrace),
            command(RAW_COMMAND, raw),
            command(DISPLAY_COMMAND, display),
            command(UNDISPLAY_COMMAND, undisplay),
            command(WATCH_COMMAND, watch),
            command(VARS_COMMAND, vars),
            command(STOP_COMMAND, stop),
            command(KILL_COMMAND, kill),
            command(HELP_COMMAND, help),
        ))
        .map_err(|e| {
            let span = e.span();
            if span.start == 0 && span.end == 0 {
                Rich::custom(*e.span(), "type help for list of commands")
            } else {
                e
            }
        })
    }
}

#[test]
fn test_parser() {
    struct TestCase {
        inputs: Vec<&'static str>,
        command_matcher: fn(result: CommandResult<Command>),
    }
    let cases = vec![
        TestCase {
            inputs: vec!["start", "run", "r", "  r  "],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Start),
        },
        TestCase {
            inputs: vec!["attach 4242", "attach   4242 "],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Attach(4242)),
        },
        TestCase {
            inputs: vec!["attach", "attach pid", "attach 99999999999"],
            command_matcher: |result| assert!(result.is_err()),
        },
        TestCase {
            inputs: vec!["detach"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Detach),
        },
        TestCase {
            inputs: vec!["b test.c:5", "break test.c:5", "break  test.c:5 "],
            command_matcher: |result| {
                assert_eq!(
                    result.unwrap(),
                    Command::Breakpoint(SourcePlace::new("test.c", 5))
                )
            },
        },
        TestCase {
            inputs: vec!["b /home/user/src/main.c:120"],
            command_matcher: |result| {
                assert_eq!(
                    result.unwrap(),
                    Command::Breakpoint(SourcePlace::new("/home/user/src/main.c", 120))
                )
            },
        },
        TestCase {
            inputs: vec!["b", "b test.c", "b test.c:", "b :5", "b test.c:five"],
            command_matcher: |result| assert!(result.is_err()),
        },
        TestCase {
            inputs: vec!["cond test.c:7 i == 3", "cond  test.c:7   i == 3  "],
            command_matcher: |result| {
                assert_eq!(
                    result.unwrap(),
                    Command::Condition(SourcePlace::new("test.c", 7), "i == 3".to_string())
                )
            },
        },
        TestCase {
            inputs: vec!["cond test.c:7", "cond test.c:7   "],
            command_matcher: |result| assert!(result.is_err()),
        },
        TestCase {
            inputs: vec!["clear"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::ClearBreakpoints),
        },
        TestCase {
            inputs: vec!["n", "next"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Next),
        },
        TestCase {
            inputs: vec!["s", "step"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Step),
        },
        TestCase {
            inputs: vec!["c", "continue"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Continue),
        },
        TestCase {
            inputs: vec!["until test.c:12"],
            command_matcher: |result| {
                assert_eq!(
                    result.unwrap(),
                    Command::Until(SourcePlace::new("test.c", 12))
                )
            },
        },
        TestCase {
            inputs: vec!["bt", "backtrace"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Backtrace),
        },
        TestCase {
            inputs: vec!["gdb info registers rip"],
            command_matcher: |result| {
                assert_eq!(
                    result.unwrap(),
                    Command::Raw("info registers rip".to_string())
                )
            },
        },
        TestCase {
            inputs: vec!["gdb", "gdb   "],
            command_matcher: |result| assert!(result.is_err()),
        },
        TestCase {
            inputs: vec!["display arr[i] + 1"],
            command_matcher: |result| {
                assert_eq!(result.unwrap(), Command::Display("arr[i] + 1".to_string()))
            },
        },
        TestCase {
            inputs: vec!["undisplay 2"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Undisplay(2)),
        },
        TestCase {
            inputs: vec!["watch 0"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Watch(0)),
        },
        TestCase {
            inputs: vec!["watch", "watch x"],
            command_matcher: |result| assert!(result.is_err()),
        },
        TestCase {
            inputs: vec!["vars"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Variables),
        },
        TestCase {
            inputs: vec!["stop"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Stop),
        },
        TestCase {
            inputs: vec!["kill"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Kill),
        },
        TestCase {
            inputs: vec!["h", "help"],
            command_matcher: |result| assert_eq!(result.unwrap(), Command::Help(None)),
        },
        TestCase {
            inputs: vec!["help cond", "h  cond"],
            command_matcher: |result| {
                assert_eq!(result.unwrap(), Command::Help(Some("cond".to_string())))
            },
        },
        TestCase {
            inputs: vec!["", "foo", "steps", "continue 1"],
            command_matcher: |result| assert!(result.is_err()),
        },
    ];

    for case in cases {
        for input in case.inputs {
            (case.command_matcher)(Command::parse(input));
        }
    }
}
