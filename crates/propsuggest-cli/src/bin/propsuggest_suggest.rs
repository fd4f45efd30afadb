// propsuggest-suggest: Suggest properties for sets of seed properties.
//
// Reads seed sets from stdin (one per line, ids separated by spaces or
// commas) and prints ranked suggestions for each.
//
// Usage:
//   propsuggest-suggest [-d DATA_PATH] [OPTIONS] [ID...]
//
// Options:
//   -d, --data-path PATH        Pair table file or directory with propertypairs.tsv
//   -n, --limit N               Maximum number of suggestions (default: 7)
//   -m, --min-probability P     Minimum score, exclusive (default: 0.05)
//   -c, --context NAME          Context tag (default: item)
//   -x, --exclude IDS           Ids that must not be suggested
//       --deprecated IDS        Globally excluded ids (or PROPSUGGEST_DEPRECATED_IDS)
//   -v, --verbose               Log to stderr (repeat for more)
//   -h, --help                  Print help

use std::io::{self, BufRead, Write};

use propsuggest_core::{AttributeSet, Context, Suggestion};
use propsuggest_engine::{
    DEFAULT_LIMIT, DEFAULT_MIN_PROBABILITY, EngineOptions, QueryOptions, SuggestionEngine,
};
use propsuggest_store::InMemoryStore;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = propsuggest_cli::parse_data_path(&args);
    let (verbosity, args) = propsuggest_cli::parse_verbosity(&args);

    if propsuggest_cli::wants_help(&args) {
        println!("propsuggest-suggest: Suggest properties from co-occurrence statistics.");
        println!();
        println!("Usage: propsuggest-suggest [-d DATA_PATH] [OPTIONS] [ID...]");
        println!();
        println!("If ID arguments are given, they form a single seed set.");
        println!("Otherwise reads seed sets from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH     Pair table or directory containing propertypairs.tsv");
        println!("  -n, --limit N            Maximum suggestions (default: {DEFAULT_LIMIT})");
        println!("  -m, --min-probability P  Minimum score (default: {DEFAULT_MIN_PROBABILITY})");
        println!("  -c, --context NAME       Context tag (default: item)");
        println!("  -x, --exclude IDS        Ids that must not be suggested");
        println!("      --deprecated IDS     Globally excluded ids");
        println!("  -v, --verbose            Log to stderr (repeat for more)");
        println!("  -h, --help               Print this help");
        return;
    }

    propsuggest_cli::init_logging(verbosity);

    let mut limit = DEFAULT_LIMIT;
    let mut min_probability = DEFAULT_MIN_PROBABILITY;
    let mut context = Context::item();
    let mut excluded = AttributeSet::new();
    let mut deprecated_flag: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        let value = || {
            args.get(i + 1)
                .cloned()
                .unwrap_or_else(|| propsuggest_cli::fatal(&format!("{arg} requires a value")))
        };
        match arg.as_str() {
            "-n" | "--limit" => {
                limit = value()
                    .parse()
                    .unwrap_or_else(|_| propsuggest_cli::fatal("invalid number for --limit"));
                skip_next = true;
            }
            "-m" | "--min-probability" => {
                min_probability = value().parse().unwrap_or_else(|_| {
                    propsuggest_cli::fatal("invalid number for --min-probability")
                });
                skip_next = true;
            }
            "-c" | "--context" => {
                context = Context::parse(&value())
                    .unwrap_or_else(|| propsuggest_cli::fatal("context must not be empty"));
                skip_next = true;
            }
            "-x" | "--exclude" => {
                let ids = propsuggest_cli::parse_id_list(&value())
                    .unwrap_or_else(|e| propsuggest_cli::fatal(&e));
                excluded.extend(ids);
                skip_next = true;
            }
            "--deprecated" => {
                deprecated_flag = Some(value());
                skip_next = true;
            }
            other if !other.starts_with('-') => positional.push(other.to_string()),
            other => propsuggest_cli::fatal(&format!("unknown option {other}")),
        }
    }

    let deprecated = propsuggest_cli::deprecated_ids(deprecated_flag.as_deref())
        .unwrap_or_else(|e| propsuggest_cli::fatal(&e));
    let (store, _) = propsuggest_cli::load_store(data_path.as_deref())
        .unwrap_or_else(|e| propsuggest_cli::fatal(&e));
    let engine = SuggestionEngine::with_options(
        store,
        EngineOptions {
            deprecated_attributes: deprecated,
        },
    );
    let options = QueryOptions::new(limit, min_probability, context).excluding(excluded);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if positional.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let written = match suggest_line(&engine, &line, &options) {
                Ok(suggestions) => propsuggest_cli::write_suggestions(&mut out, &suggestions),
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(())
                }
            };
            if let Err(e) = written.and_then(|()| writeln!(out)) {
                write_failed(&e);
            }
        }
    } else {
        let line = positional.join(" ");
        let suggestions = match suggest_line(&engine, &line, &options) {
            Ok(suggestions) => suggestions,
            Err(e) => propsuggest_cli::fatal(&e),
        };
        if let Err(e) = propsuggest_cli::write_suggestions(&mut out, &suggestions) {
            write_failed(&e);
        }
    }
    if let Err(e) = out.flush() {
        write_failed(&e);
    }
}

/// Rank one seed set.
fn suggest_line(
    engine: &SuggestionEngine<InMemoryStore>,
    line: &str,
    options: &QueryOptions,
) -> Result<Vec<Suggestion>, String> {
    let seeds = propsuggest_cli::parse_id_list(line)?;
    engine
        .suggest_from(&seeds, options)
        .map_err(|e| e.to_string())
}

fn write_failed(e: &io::Error) -> ! {
    propsuggest_cli::fatal(&format!("failed to write output: {e}"))
}
