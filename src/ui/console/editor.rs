use crate::ui::command::parser::{
    ATTACH_COMMAND, BACKTRACE_COMMAND, BACKTRACE_COMMAND_SHORT, BREAK_COMMAND,
    BREAK_COMMAND_SHORT, CLEAR_COMMAND, CONDITION_COMMAND, CONTINUE_COMMAND,
    CONTINUE_COMMAND_SHORT, DETACH_COMMAND, DISPLAY_COMMAND, HELP_COMMAND, HELP_COMMAND_SHORT,
    KILL_COMMAND, NEXT_COMMAND, NEXT_COMMAND_SHORT, QUIT_COMMAND, QUIT_COMMAND_SHORT, RAW_COMMAND,
    RUN_COMMAND, RUN_COMMAND_SHORT, START_COMMAND, STEP_COMMAND, STEP_COMMAND_SHORT, STOP_COMMAND,
    UNDISPLAY_COMMAND, UNTIL_COMMAND, VARS_COMMAND, WATCH_COMMAND,
};
use crossterm::style::{Color, Stylize};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::HistoryHinter;
use rustyline::history::MemHistory;
use rustyline::{CompletionType, Config, Context, EditMode, Editor};
use rustyline_derive::{Helper, Hinter, Validator};
use std::borrow::Cow;

/// Max number of remembered commands.
const HISTORY_SIZE: usize = 500;

/// Console command name and its short alias.
struct CommandName {
    long: &'static str,
    short: Option<&'static str>,
}

impl CommandName {
    const fn new(long: &'static str) -> Self {
        Self { long, short: None }
    }

    const fn with_alias(short: &'static str, long: &'static str) -> Self {
        Self {
            long,
            short: Some(short),
        }
    }

    /// Candidate text shown in a completion list, alias is underlined.
    fn display(&self) -> String {
        match self.short {
            Some(short) if self.long.starts_with(short) => format!(
                "{}{}",
                short.bold().underlined(),
                &self.long[short.len()..]
            ),
            Some(short) => format!("{}|{}", self.long, short.bold().underlined()),
            None => self.long.to_string(),
        }
    }
}

static COMMAND_NAMES: [CommandName; 21] = [
    CommandName::new(START_COMMAND),
    CommandName::with_alias(RUN_COMMAND_SHORT, RUN_COMMAND),
    CommandName::new(ATTACH_COMMAND),
    CommandName::new(DETACH_COMMAND),
    CommandName::with_alias(BREAK_COMMAND_SHORT, BREAK_COMMAND),
    CommandName::new(CONDITION_COMMAND),
    CommandName::new(CLEAR_COMMAND),
    CommandName::with_alias(NEXT_COMMAND_SHORT, NEXT_COMMAND),
    CommandName::with_alias(STEP_COMMAND_SHORT, STEP_COMMAND),
    CommandName::with_alias(CONTINUE_COMMAND_SHORT, CONTINUE_COMMAND),
    CommandName::new(UNTIL_COMMAND),
    CommandName::with_alias(BACKTRACE_COMMAND_SHORT, BACKTRACE_COMMAND),
    CommandName::new(RAW_COMMAND),
    CommandName::new(DISPLAY_COMMAND),
    CommandName::new(UNDISPLAY_COMMAND),
    CommandName::new(WATCH_COMMAND),
    CommandName::new(VARS_COMMAND),
    CommandName::new(STOP_COMMAND),
    CommandName::new(KILL_COMMAND),
    CommandName::with_alias(HELP_COMMAND_SHORT, HELP_COMMAND),
    CommandName::with_alias(QUIT_COMMAND_SHORT, QUIT_COMMAND),
];

/// Completes command names: the first word of a line and an argument of `help`.
pub struct CommandCompleter;

impl CommandCompleter {
    /// Return start of a completed word and candidates for it.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line = &line[..pos];
        let (start, prefix) = match line.split_once(char::is_whitespace) {
            None => (0, line),
            Some((cmd, arg)) if cmd == HELP_COMMAND || cmd == HELP_COMMAND_SHORT => {
                let arg = arg.trim_start();
                if arg.contains(char::is_whitespace) {
                    return (pos, vec![]);
                }
                (pos - arg.len(), arg)
            }
            Some(_) => return (pos, vec![]),
        };

        let pairs = COMMAND_NAMES
            .iter()
            .filter(|name| name.long.starts_with(prefix))
            .map(|name| Pair {
                display: name.display(),
                replacement: name.long.to_string(),
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

#[derive(Helper, Hinter, Validator)]
pub struct RLHelper {
    completer: CommandCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    colored_prompt: Option<String>,
}

impl Completer for RLHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for RLHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        match &self.colored_prompt {
            Some(colored) if default => Cow::Borrowed(colored),
            _ => Cow::Borrowed(prompt),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if self.colored_prompt.is_some() {
            Cow::Owned(hint.with(Color::DarkGrey).to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }
}

/// Create a line editor with command completion and in-memory history.
pub fn create_editor(prompt: &str, colored: bool) -> anyhow::Result<Editor<RLHelper, MemHistory>> {
    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .completion_type(CompletionType::List)
        .history_ignore_space(true)
        .history_ignore_dups(true)?
        .max_history_size(HISTORY_SIZE)?
        .build();

    let helper = RLHelper {
        completer: CommandCompleter,
        hinter: HistoryHinter {},
        colored_prompt: colored.then(|| prompt.with(Color::DarkGreen).to_string()),
    };

    let mut editor = Editor::with_history(config, MemHistory::with_config(config))?;
    editor.set_helper(Some(helper));
    Ok(editor)
}
