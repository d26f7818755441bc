use std::{
    fmt,
    io::{self, BufRead, Lines},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;

const SCRIPT_ENV: &str = "MONEY_NOTE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;

    let result = match mode {
        CliMode::Interactive => {
            output_info("Money Note. Type `help` to list commands.");
            let mut terminal = Terminal::new(CompletionTable::from_registry(&context.registry))?;
            drive(&mut context, &mut terminal)
        }
        CliMode::Script => drive(&mut context, &mut ScriptLines::new(io::stdin().lock())),
    };
    tracing::debug!(status = %context.status(), "shell finished");
    result
}

/// What one read from the input produced.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineSource {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError>;
}

/// Runs lines until the source closes or a command asks to exit. Command
/// failures are reported and the loop carries on.
fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        match source.read(&context.prompt())? {
            Input::Line(line) => match context.process_line(&line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => {
                if context.is_interactive() {
                    output_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

/// Rustyline editor with history and `?`/tab completion.
struct Terminal {
    editor: Editor<CompletionTable, DefaultHistory>,
}

impl Terminal {
    fn new(table: CompletionTable) -> Result<Self, CliError> {
        let mut editor = Editor::<CompletionTable, DefaultHistory>::new()?;
        editor.set_helper(Some(table));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    self.editor.add_history_entry(trimmed).ok();
                }
                Ok(Input::Line(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(err) => Err(err.into()),
        }
    }
}

/// One command per line of a reader, without prompts.
struct ScriptLines<R> {
    lines: Lines<R>,
}

impl<R: BufRead> ScriptLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptLines<R> {
    fn read(&mut self, _prompt: &str) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Closed),
        }
    }
}

/// Command words (aliases included) and the actions each one takes as its
/// first argument.
struct CompletionTable {
    commands: Vec<(&'static str, &'static [&'static str])>,
}

impl CompletionTable {
    fn from_registry(registry: &CommandRegistry) -> Self {
        Self {
            commands: registry
                .names()
                .map(|word| (word, registry.actions(word)))
                .collect(),
        }
    }

    /// Start offset of the word under completion and its candidates. Only the
    /// command word and the action after it are completed.
    fn candidates(&self, prefix: &str) -> (usize, Vec<&'static str>) {
        let start = prefix
            .trim_end_matches(|c: char| !c.is_whitespace())
            .len();
        let partial = prefix[start..].to_ascii_lowercase();
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: Vec<&'static str> = match before.as_slice() {
            [] => self.commands.iter().map(|(word, _)| *word).collect(),
            [command] => self
                .commands
                .iter()
                .find(|(word, _)| word.eq_ignore_ascii_case(command))
                .map(|(_, actions)| actions.to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.starts_with(&partial))
            .collect();
        (start, matches)
    }
}

impl Helper for CompletionTable {}

impl Completer for CompletionTable {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: format!("{} ", word),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CompletionTable {
    type Hint = String;
}

impl Highlighter for CompletionTable {}

impl Validator for CompletionTable {}

/// Splits a command line into words. A line starting with `#` is a comment;
/// a `#` anywhere else is literal text, so colors like `#ff0000` survive.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Vec::new());
    }
    split(&escape_hashes(trimmed)).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

/// Backslash-escapes every unquoted `#` that begins a word.
fn escape_hashes(line: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut out = String::with_capacity(line.len() + 4);
    let mut quote = Quote::None;
    let mut word_start = true;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::None, '#') if word_start => out.push_str("\\#"),
            (Quote::None, '\\') | (Quote::Double, '\\') => {
                out.push(ch);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            (Quote::None, '\'') => {
                quote = Quote::Single;
                out.push(ch);
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                out.push(ch);
            }
            (Quote::Single, '\'') | (Quote::Double, '"') => {
                quote = Quote::None;
                out.push(ch);
            }
            _ => out.push(ch),
        }
        word_start = quote == Quote::None && ch.is_whitespace();
    }
    out
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
