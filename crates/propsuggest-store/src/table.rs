// Pair table loader
//
// Reads a tab-separated dump of the pair table produced by the offline
// pipeline. The first non-comment line is a header naming the columns; the
// order of columns is free. Recognized columns:
//
//   pid1         first attribute (required)
//   qid1         value item the pair is conditioned on (optional)
//   pid2         second attribute (required)
//   count        co-occurrence count (optional, default 0)
//   probability  co-occurrence probability (required)
//   context      context tag (required)
//
// Rows with a non-null qid1 describe value-conditioned pairs. They are not part
// of the unconditional statistics and are skipped.

use std::io::BufRead;

use propsuggest_core::{AttributeId, Context, PairStatistic};
use tracing::{debug, info};

use crate::TableError;
use crate::memory::InMemoryStore;

/// Spellings of SQL NULL in a dump.
const NULL_MARKERS: &[&str] = &["", "\\N", "NULL", "null"];

/// What a load did besides building the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Unconditional rows inserted into the store.
    pub rows_loaded: usize,
    /// Value-conditioned rows that were skipped.
    pub rows_conditional_skipped: usize,
}

/// Column positions resolved from the header line.
#[derive(Debug, Clone, Copy)]
struct Columns {
    pid1: usize,
    qid1: Option<usize>,
    pid2: usize,
    count: Option<usize>,
    probability: usize,
    context: usize,
    width: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, TableError> {
        let names: Vec<&str> = header.split('\t').map(str::trim).collect();
        let find = |name: &'static str| names.iter().position(|n| n.eq_ignore_ascii_case(name));
        let require = |name: &'static str| find(name).ok_or(TableError::MissingColumn(name));

        Ok(Self {
            pid1: require("pid1")?,
            qid1: find("qid1"),
            pid2: require("pid2")?,
            count: find("count"),
            probability: require("probability")?,
            context: require("context")?,
            width: names.len(),
        })
    }
}

/// Parse a whole table held in memory.
pub fn parse_table(text: &str) -> Result<(InMemoryStore, LoadSummary), TableError> {
    load_table(text.as_bytes())
}

/// Read a table from any buffered reader and build an in-memory store.
///
/// Errors carry the 1-based line number of the offending row.
pub fn load_table<R: BufRead>(reader: R) -> Result<(InMemoryStore, LoadSummary), TableError> {
    let mut store = InMemoryStore::new();
    let mut summary = LoadSummary::default();
    let mut columns: Option<Columns> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(cols) = columns else {
            columns = Some(Columns::from_header(trimmed)?);
            continue;
        };

        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if fields.len() != cols.width {
            return Err(TableError::FieldCount {
                line: line_no,
                expected: cols.width,
                actual: fields.len(),
            });
        }

        if let Some(qid1) = cols.qid1 {
            if !NULL_MARKERS.contains(&fields[qid1]) {
                debug!(
                    line = line_no,
                    qid1 = fields[qid1],
                    "skipping conditional pair"
                );
                summary.rows_conditional_skipped += 1;
                continue;
            }
        }

        let statistic = parse_row(&fields, &cols, line_no)?;
        store
            .insert(statistic)
            .map_err(|source| TableError::AtLine {
                line: line_no,
                source: Box::new(source),
            })?;
        summary.rows_loaded += 1;
    }

    if columns.is_none() {
        return Err(TableError::MissingHeader);
    }

    info!(
        rows = summary.rows_loaded,
        conditional_skipped = summary.rows_conditional_skipped,
        contexts = store.contexts().len(),
        "loaded pair table"
    );
    Ok((store, summary))
}

fn parse_row(fields: &[&str], cols: &Columns, line: usize) -> Result<PairStatistic, TableError> {
    let attribute = |column: &'static str, index: usize| {
        fields[index]
            .parse::<AttributeId>()
            .map_err(|_| invalid(line, column, fields[index]))
    };

    let first = attribute("pid1", cols.pid1)?;
    let second = attribute("pid2", cols.pid2)?;

    let raw_probability = fields[cols.probability];
    let probability = raw_probability
        .parse::<f64>()
        .map_err(|_| invalid(line, "probability", raw_probability))?;

    let count = match cols.count {
        Some(index) if !NULL_MARKERS.contains(&fields[index]) => fields[index]
            .parse::<u64>()
            .map_err(|_| invalid(line, "count", fields[index]))?,
        _ => 0,
    };

    let context = Context::parse(fields[cols.context]).ok_or(TableError::EmptyContext { line })?;

    Ok(PairStatistic {
        first,
        second,
        context,
        probability,
        count,
    })
}

fn invalid(line: usize, column: &'static str, value: &str) -> TableError {
    TableError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}
