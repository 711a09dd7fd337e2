//! Purpose: `mvault` CLI entry point for validating and normalizing vault payloads.
//! Role: Binary crate root; parses args, reads input, emits JSON on stdout.
//! Invariants: stdout carries only results; diagnostics go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `mvault::to_exit_code`.
use std::ffi::OsString;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{
    ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

use mvault::{
    Error, ErrorKind, MVaultRecord, ParseOptions, PbsProfile, RetrievalStatus, StatusPolicy,
    VaultEntity, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run(std::env::args_os()) {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, None, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run<I>(args: I) -> Result<RunOutcome, (Error, ColorMode)>
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `mvault --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing(cli.verbose);
    let color_mode = cli.color;

    let result = match cli.command {
        Command::Check { input } => check(&input),
        Command::Normalize { input, pretty } => normalize(&input, pretty, color_mode),
    };
    result.map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "mvault",
    version,
    about = "Validate and normalize MVault membership records",
    long_about = None,
    after_help = r#"EXAMPLES
  $ mvault check record.json
  $ curl -s "$VAULT/memberships/$ID" | mvault check --kind record
  $ mvault normalize --pretty record.json
  $ mvault check --jsonl --strict-status export.jsonl

NOTES
  - Input is read from FILE, or stdin when FILE is omitted or `-`
  - `--jsonl` treats each non-empty line as one payload
  - Dates are re-rendered as YYYY-MM-DDThh:mm:ssZ (UTC)
  - Log level: -v info, -vv debug, -vvv trace (RUST_LOG overrides)"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity on stderr"
    )]
    verbose: u8,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        global = true,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EntityKind {
    Record,
    Profile,
    Status,
}

impl EntityKind {
    fn label(self) -> &'static str {
        match self {
            EntityKind::Record => "record",
            EntityKind::Profile => "profile",
            EntityKind::Status => "status",
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Validate payloads and print a summary per payload")]
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    #[command(about = "Validate payloads and print their canonical serialization")]
    Normalize {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, help = "Pretty-print output (ignored with --jsonl)")]
        pretty: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    #[arg(
        long,
        value_enum,
        default_value = "record",
        help = "Payload shape: record|profile|status"
    )]
    kind: EntityKind,
    #[arg(long, help = "Treat each non-empty input line as one payload")]
    jsonl: bool,
    #[arg(long, help = "Reject record status values other than \"On\"/\"Off\"")]
    strict_status: bool,
    #[arg(help = "Input file (stdin when omitted or -)", value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn options(&self) -> ParseOptions {
        let policy = if self.strict_status {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Lenient
        };
        ParseOptions::new().with_status_policy(policy)
    }
}

enum Parsed {
    Record(MVaultRecord),
    Profile(PbsProfile),
    Status(RetrievalStatus),
}

impl Parsed {
    fn parse(kind: EntityKind, input: &str, options: &ParseOptions) -> Result<Self, Error> {
        match kind {
            EntityKind::Record => MVaultRecord::from_json_with(input, options).map(Parsed::Record),
            EntityKind::Profile => PbsProfile::from_json_with(input, options).map(Parsed::Profile),
            EntityKind::Status => {
                RetrievalStatus::from_json_with(input, options).map(Parsed::Status)
            }
        }
    }

    fn canonical(&self) -> Value {
        match self {
            Parsed::Record(record) => record.to_value(),
            Parsed::Profile(profile) => profile.to_value(),
            Parsed::Status(status) => status.to_value(),
        }
    }

    fn summary(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("valid".to_string(), json!(true));
        match self {
            Parsed::Record(record) => {
                map.insert("kind".to_string(), json!(EntityKind::Record.label()));
                map.insert("membership_id".to_string(), json!(record.membership_id()));
                map.insert("status_on".to_string(), json!(record.is_status_on()));
                map.insert("activated".to_string(), json!(record.is_activated()));
            }
            Parsed::Profile(profile) => {
                map.insert("kind".to_string(), json!(EntityKind::Profile.label()));
                map.insert("uid".to_string(), json!(profile.uid()));
                map.insert("success".to_string(), json!(profile.is_success_profile()));
            }
            Parsed::Status(status) => {
                map.insert("kind".to_string(), json!(EntityKind::Status.label()));
                map.insert("status".to_string(), json!(status.status()));
                map.insert("success".to_string(), json!(status.is_success()));
            }
        }
        map
    }
}

fn check(input: &InputArgs) -> Result<RunOutcome, Error> {
    let text = read_input(input.file.as_deref())?;
    let options = input.options();

    if !input.jsonl {
        let parsed = Parsed::parse(input.kind, &text, &options)?;
        emit_json(Value::Object(parsed.summary()), false);
        return Ok(RunOutcome::ok());
    }

    let mut first_failure = None;
    for (line_no, line) in jsonl_lines(&text) {
        match Parsed::parse(input.kind, line, &options) {
            Ok(parsed) => {
                let mut summary = parsed.summary();
                summary.insert("line".to_string(), json!(line_no));
                emit_json(Value::Object(summary), false);
            }
            Err(err) => {
                let mut failure = Map::new();
                failure.insert("line".to_string(), json!(line_no));
                failure.insert("valid".to_string(), json!(false));
                failure.insert("error".to_string(), error_body(&err));
                emit_json(Value::Object(failure), false);
                first_failure.get_or_insert(to_exit_code(err.kind()));
            }
        }
    }
    Ok(first_failure.map_or_else(RunOutcome::ok, RunOutcome::with_code))
}

fn normalize(input: &InputArgs, pretty: bool, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    let text = read_input(input.file.as_deref())?;
    let options = input.options();

    if !input.jsonl {
        let parsed = Parsed::parse(input.kind, &text, &options)?;
        emit_json(parsed.canonical(), pretty);
        return Ok(RunOutcome::ok());
    }

    let mut first_failure = None;
    for (line_no, line) in jsonl_lines(&text) {
        match Parsed::parse(input.kind, line, &options) {
            Ok(parsed) => emit_json(parsed.canonical(), false),
            Err(err) => {
                emit_error(&err, Some(line_no), color_mode);
                first_failure.get_or_insert(to_exit_code(err.kind()));
            }
        }
    }
    Ok(first_failure.map_or_else(RunOutcome::ok, RunOutcome::with_code))
}

/// Non-empty lines with their 1-based line numbers.
fn jsonl_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn read_input(path: Option<&Path>) -> Result<String, Error> {
    match path {
        None => read_stdin(),
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_hint("Check the path, or pipe the payload on stdin.")
                .with_source(err)
        }),
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(text)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_json(value: Value, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, line: Option<usize>, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, line, color_mode.use_color(is_tty)));
        return;
    }

    let mut body = error_body(err);
    if let (Some(line), Value::Object(map)) = (line, &mut body) {
        map.insert("line".to_string(), json!(line));
    }
    let mut outer = Map::new();
    outer.insert("error".to_string(), body);
    let json = serde_json::to_string(&Value::Object(outer)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::MissingField => "required field is missing".to_string(),
        ErrorKind::InvalidDate => "date field is not correctly formatted".to_string(),
        ErrorKind::InvalidType => "field has the wrong type".to_string(),
        ErrorKind::InvalidStatus => "status is not recognized".to_string(),
        ErrorKind::MalformedInput => "input is not valid JSON".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_body(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }
    Value::Object(inner)
}

fn error_text(err: &Error, line: Option<usize>, use_color: bool) -> String {
    let mut lines = Vec::new();
    let prefix = line.map(|line| format!("line {line}: ")).unwrap_or_default();
    lines.push(format!(
        "{} {prefix}{}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}
