// WASM bindings for the propsuggest property suggester.
//
// Provides a `WasmSuggester` class exported via wasm-bindgen that wraps a
// `SuggestionEngine` over an in-memory pair table. Suggestions are
// serialized to JavaScript values using serde-wasm-bindgen.
//
// Usage from JavaScript:
//
//   const s = new WasmSuggester(tableText, ["P107"]);
//   s.suggest(["P31", "P21"], 7, 0.05, "item", []);
//     // => [{ attributeId: 569, id: "P569", score: 0.65 }, ...]
//   s.reload(newTableText);     // swap in a refreshed table
//   s.len();                    // => number of loaded pairs

use serde::Serialize;
use wasm_bindgen::prelude::*;

use propsuggest_core::{AttributeId, AttributeSet, Context, Suggestion};
use propsuggest_engine::{EngineOptions, QueryOptions, SuggestionEngine};
use propsuggest_store::{SnapshotStore, parse_table};

// ============================================================================
// Serde-serializable DTO types for JS interop
// ============================================================================

/// Serializable representation of a suggestion.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsSuggestion {
    attribute_id: u64,
    id: String,
    score: f64,
}

impl From<&Suggestion> for JsSuggestion {
    fn from(s: &Suggestion) -> Self {
        JsSuggestion {
            attribute_id: s.attribute.numeric_id(),
            id: s.attribute.to_string(),
            score: s.score,
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn parse_ids(ids: &[String]) -> Result<AttributeSet, String> {
    ids.iter()
        .map(|id| id.trim().parse::<AttributeId>().map_err(|e| e.to_string()))
        .collect()
}

fn build_engine(
    table_text: &str,
    deprecated: &[String],
) -> Result<SuggestionEngine<SnapshotStore>, String> {
    let (store, _) = parse_table(table_text).map_err(|e| e.to_string())?;
    let options = EngineOptions {
        deprecated_attributes: parse_ids(deprecated)?,
    };
    let snapshot = SnapshotStore::new(store);
    Ok(SuggestionEngine::with_options(snapshot, options))
}

fn run_suggest(
    engine: &SuggestionEngine<SnapshotStore>,
    seeds: &[String],
    limit: usize,
    min_probability: f64,
    context: &str,
    excluded: &[String],
) -> Result<Vec<JsSuggestion>, String> {
    let Some(context) = Context::parse(context) else {
        return Err("context must not be empty".to_string());
    };
    let excluded = parse_ids(excluded)?;
    let options = QueryOptions::new(limit, min_probability, context).excluding(excluded);
    let suggestions = engine
        .suggest_from(&parse_ids(seeds)?, &options)
        .map_err(|e| e.to_string())?;
    Ok(suggestions.iter().map(JsSuggestion::from).collect())
}

// ============================================================================
// WasmSuggester
// ============================================================================

/// Property suggester for WebAssembly.
#[wasm_bindgen]
pub struct WasmSuggester {
    engine: SuggestionEngine<SnapshotStore>,
}

#[wasm_bindgen]
impl WasmSuggester {
    /// Create a suggester from the text of a pair table.
    ///
    /// - `table_text`: tab-separated pair table with a header line
    /// - `deprecated`: ids never to suggest (optional)
    #[wasm_bindgen(constructor)]
    pub fn new(
        table_text: &str,
        deprecated: Option<Vec<String>>,
    ) -> Result<WasmSuggester, JsError> {
        let engine = build_engine(table_text, deprecated.as_deref().unwrap_or_default())
            .map_err(|e| JsError::new(&e))?;
        Ok(WasmSuggester { engine })
    }

    /// Rank properties for a seed set.
    ///
    /// Returns a JavaScript array of objects with fields `attributeId`,
    /// `id` and `score`, best first.
    pub fn suggest(
        &self,
        seeds: Vec<String>,
        limit: usize,
        min_probability: f64,
        context: &str,
        excluded: Option<Vec<String>>,
    ) -> Result<JsValue, JsError> {
        let suggestions = run_suggest(
            &self.engine,
            &seeds,
            limit,
            min_probability,
            context,
            excluded.as_deref().unwrap_or_default(),
        )
        .map_err(|e| JsError::new(&e))?;
        serde_wasm_bindgen::to_value(&suggestions).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Replace the pair table. Queries already running keep the old one.
    pub fn reload(&self, table_text: &str) -> Result<(), JsError> {
        let (store, _) = parse_table(table_text).map_err(|e| JsError::new(&e.to_string()))?;
        self.engine.store().replace(store);
        Ok(())
    }

    /// Number of unconditional pairs currently loaded.
    pub fn len(&self) -> usize {
        self.engine.store().snapshot().len()
    }

    /// Whether the loaded table is empty.
    #[wasm_bindgen(js_name = "isEmpty")]
    pub fn is_empty(&self) -> bool {
        self.engine.store().snapshot().is_empty()
    }
}
