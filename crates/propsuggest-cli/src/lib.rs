// propsuggest-cli: shared utilities for CLI tools.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use propsuggest_core::{AttributeId, AttributeSet, Suggestion};
use propsuggest_store::{InMemoryStore, LoadSummary, load_table};
use tracing::Level;

/// File name of the pair table inside a data directory.
pub const TABLE_FILE: &str = "propertypairs.tsv";

/// Environment variable naming the pair table or its directory.
pub const DATA_PATH_ENV: &str = "PROPSUGGEST_DATA_PATH";

/// Environment variable with a comma- or space-separated deprecated id list.
pub const DEPRECATED_ENV: &str = "PROPSUGGEST_DEPRECATED_IDS";

/// Search for the pair table and load it into memory.
///
/// Search order:
/// 1. `data_path` argument (if provided)
/// 2. `PROPSUGGEST_DATA_PATH` environment variable
/// 3. `~/.propsuggest/`
/// 4. Current working directory
///
/// Each entry may name the table file itself or a directory holding
/// `propertypairs.tsv`.
pub fn load_store(data_path: Option<&str>) -> Result<(InMemoryStore, LoadSummary), String> {
    let search_paths = build_search_paths(data_path);

    for candidate in &search_paths {
        if let Some(path) = resolve_table(candidate) {
            let shown = path.display();
            tracing::debug!(path = %shown, "loading pair table");
            let file = File::open(&path).map_err(|e| format!("failed to open {shown}: {e}"))?;
            let loaded = load_table(BufReader::new(file));
            return loaded.map_err(|e| format!("failed to load {shown}: {e}"));
        }
    }

    Err(format!(
        "could not find {} in any of the search paths:\n{}",
        TABLE_FILE,
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

fn resolve_table(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    let inner = candidate.join(TABLE_FILE);
    inner.is_file().then_some(inner)
}

/// Build the list of locations to search for the pair table.
fn build_search_paths(data_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = data_path {
        paths.push(PathBuf::from(p));
    }

    if let Ok(env_path) = std::env::var(DATA_PATH_ENV) {
        paths.push(PathBuf::from(env_path));
    }

    if let Some(home) = home_dir() {
        paths.push(home.join(".propsuggest"));
    }

    // Fallback for local development
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    paths
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Parse a `--data-path=PATH` or `-d PATH` argument from command line args.
///
/// Returns `(data_path, remaining_args)`.
pub fn parse_data_path(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut data_path = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix("--data-path=") {
            data_path = Some(val.to_string());
        } else if arg == "--data-path" || arg == "-d" {
            match args.get(i + 1) {
                Some(val) => {
                    data_path = Some(val.clone());
                    skip_next = true;
                }
                None => fatal(&format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (data_path, remaining)
}

/// Split a list of ids on whitespace and commas and parse each one.
///
/// Accepts `P31`, `p31` and `31`. Duplicates collapse.
pub fn parse_id_list(text: &str) -> Result<AttributeSet, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<AttributeId>().map_err(|e| e.to_string()))
        .collect()
}

/// Deprecated ids from the command line, falling back to
/// `PROPSUGGEST_DEPRECATED_IDS`.
pub fn deprecated_ids(flag: Option<&str>) -> Result<AttributeSet, String> {
    match flag {
        Some(list) => parse_id_list(list),
        None => match std::env::var(DEPRECATED_ENV) {
            Ok(list) => parse_id_list(&list).map_err(|e| format!("{DEPRECATED_ENV}: {e}")),
            Err(_) => Ok(AttributeSet::new()),
        },
    }
}

/// Print one `P<id>\t<score>` line per suggestion.
pub fn write_suggestions<W: Write>(out: &mut W, suggestions: &[Suggestion]) -> io::Result<()> {
    for s in suggestions {
        writeln!(out, "{}\t{:.6}", s.attribute, s.score)?;
    }
    Ok(())
}

/// Print the number of pairs per context, the total and the skipped
/// conditional rows.
pub fn write_table_stats<W: Write>(
    out: &mut W,
    store: &InMemoryStore,
    summary: &LoadSummary,
) -> io::Result<()> {
    for context in store.contexts() {
        let pairs = store.context_len(context.as_str());
        writeln!(out, "{context}\t{pairs}")?;
    }
    let skipped = summary.rows_conditional_skipped;
    writeln!(out, "total\t{}", store.len())?;
    writeln!(out, "conditional (skipped)\t{skipped}")
}

/// Install a stderr subscriber. `-v` enables debug output, `-vv` trace.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Count `-v`/`--verbose` flags and strip them from the args.
pub fn parse_verbosity(args: &[String]) -> (u8, Vec<String>) {
    let mut verbosity = 0u8;
    let mut remaining = Vec::new();
    for arg in args {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            _ => remaining.push(arg.clone()),
        }
    }
    (verbosity, remaining)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
