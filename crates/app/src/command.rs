//! Line parsing for the shell.

use chrono::NaiveTime;
use thiserror::Error;

use medrem_core::MedicationId;
use medrem_medication::MedicationForm;

/// Which record a command addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    /// Zero-based position in the list (typed 1-based).
    Index(usize),
    Id(MedicationId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(MedicationForm),
    Take(Target),
    Miss(Target),
    Quantity(Target, u32),
    Restock(Target),
    Remove(Target),
    Delete(Target),
    List,
    Json,
    /// Run a reminder scan now, optionally at a given time of day.
    Tick(Option<NaiveTime>),
    Permission,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{0}` expects {1}")]
    Usage(&'static str, &'static str),

    #[error("invalid record reference `{0}`: use a list number or an id")]
    BadTarget(String),

    #[error("invalid number `{0}`")]
    BadNumber(String),

    #[error("invalid time `{0}`: expected HH:MM")]
    BadTime(String),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("expected key=value, got `{0}`")]
    BadField(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

pub const HELP: &str = "\
commands:
  add name=<n> time=<HH:MM> dosage=<d> [instructions=<i>] [frequency=<f>] [quantity=<q>] [threshold=<t>]
  take <ref>            mark a dose taken
  miss <ref>            mark a dose missed
  qty <ref> <n>         set the quantity
  restock <ref>         add one dose worth of stock
  remove <ref>          remove one dose worth of stock
  delete <ref>          delete a reminder
  list                  show reminders grouped by status
  json                  dump records as JSON
  tick [HH:MM]          run a reminder scan now
  permission            request notification permission
  help | quit
<ref> is a list number (1-based) or a record id. Quote values with spaces: dosage=\"2 pills\"";

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ShellCommand, ParseError> {
    let words = split_words(line)?;
    let Some((head, args)) = words.split_first() else {
        return Err(ParseError::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "add" => parse_form(args).map(ShellCommand::Add),
        "take" => one_target("take", args).map(ShellCommand::Take),
        "miss" => one_target("miss", args).map(ShellCommand::Miss),
        "restock" => one_target("restock", args).map(ShellCommand::Restock),
        "remove" => one_target("remove", args).map(ShellCommand::Remove),
        "delete" | "rm" => one_target("delete", args).map(ShellCommand::Delete),
        "qty" | "quantity" => match args {
            [target, n] => Ok(ShellCommand::Quantity(parse_target(target)?, parse_u32(n)?)),
            _ => Err(ParseError::Usage("qty", "a record and a quantity")),
        },
        "list" | "ls" => no_args("list", args, ShellCommand::List),
        "json" => no_args("json", args, ShellCommand::Json),
        "tick" => match args {
            [] => Ok(ShellCommand::Tick(None)),
            [at] => NaiveTime::parse_from_str(at, "%H:%M")
                .map(|t| ShellCommand::Tick(Some(t)))
                .map_err(|_| ParseError::BadTime(at.clone())),
            _ => Err(ParseError::Usage("tick", "at most one time")),
        },
        "permission" => no_args("permission", args, ShellCommand::Permission),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Resolve a target against a list of ids in display order.
pub fn resolve(target: Target, ids: &[MedicationId]) -> Option<MedicationId> {
    match target {
        Target::Index(i) => ids.get(i).copied(),
        Target::Id(id) => ids.contains(&id).then_some(id),
    }
}

fn no_args(
    name: &'static str,
    args: &[String],
    cmd: ShellCommand,
) -> Result<ShellCommand, ParseError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(ParseError::Usage(name, "no arguments"))
    }
}

fn one_target(name: &'static str, args: &[String]) -> Result<Target, ParseError> {
    match args {
        [target] => parse_target(target),
        _ => Err(ParseError::Usage(name, "one record")),
    }
}

fn parse_target(raw: &str) -> Result<Target, ParseError> {
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Target::Index(n - 1)),
            _ => Err(ParseError::BadTarget(raw.to_string())),
        };
    }
    raw.parse::<MedicationId>()
        .map(Target::Id)
        .map_err(|_| ParseError::BadTarget(raw.to_string()))
}

fn parse_u32(raw: &str) -> Result<u32, ParseError> {
    raw.parse::<u32>()
        .map_err(|_| ParseError::BadNumber(raw.to_string()))
}

fn parse_form(args: &[String]) -> Result<MedicationForm, ParseError> {
    let mut form = MedicationForm::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| ParseError::BadField(arg.clone()))?;
        match key.to_ascii_lowercase().as_str() {
            "name" => form.name = value.to_string(),
            "time" => form.time = value.to_string(),
            "dosage" => form.dosage = value.to_string(),
            "instructions" => form.instructions = value.to_string(),
            "frequency" => form.frequency = Some(value.to_string()),
            "quantity" | "qty" => form.quantity = Some(parse_u32(value)?),
            "threshold" | "refill" | "refill_threshold" => {
                form.refill_threshold = Some(parse_u32(value)?)
            }
            other => return Err(ParseError::UnknownField(other.to_string())),
        }
    }
    Ok(form)
}

/// Whitespace split with double-quote grouping. Quotes may appear mid-word,
/// so `dosage="2 pills"` is one word.
fn split_words(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
