// propsuggest-stats: Print row counts of a pair table.
//
// Loads the pair table the same way propsuggest-suggest does and reports how
// many unconditional pairs each context holds.
//
// Usage:
//   propsuggest-stats [-d DATA_PATH] [-v]

use std::io::{self, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = propsuggest_cli::parse_data_path(&args);
    let (verbosity, args) = propsuggest_cli::parse_verbosity(&args);

    if propsuggest_cli::wants_help(&args) {
        println!("propsuggest-stats: Print row counts of a pair table.");
        println!();
        println!("Usage: propsuggest-stats [-d DATA_PATH] [-v]");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH  Pair table or directory containing propertypairs.tsv");
        println!("  -v, --verbose         Log to stderr (repeat for more)");
        println!("  -h, --help            Print this help");
        return;
    }
    if let Some(extra) = args.first() {
        propsuggest_cli::fatal(&format!("unexpected argument {extra}"));
    }

    propsuggest_cli::init_logging(verbosity);

    let (store, summary) = propsuggest_cli::load_store(data_path.as_deref())
        .unwrap_or_else(|e| propsuggest_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let written = propsuggest_cli::write_table_stats(&mut out, &store, &summary);
    if let Err(e) = written.and_then(|()| out.flush()) {
        propsuggest_cli::fatal(&format!("failed to write output: {e}"));
    }
}
