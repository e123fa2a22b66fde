//! WASM bindings for the tidytree-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every function returns a JSON document; failures are reported through the
//! `error` field and logged to the browser console.

use wasm_bindgen::prelude::*;

use crate::generate::{GeneratorConfig, generate_tree};
use crate::layout::{ConfigError, LayoutConfig, layout_tree};
use crate::output::TreeOutput;
use crate::parser::{self, CompileError, SourceError};
use crate::tree::Tree;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Returned when even the error document cannot be serialized.
const FALLBACK_ERROR: &str = "{\"error\":{\"message\":\"serialization failed\",\"line\":1,\"column\":1,\"end_line\":1,\"end_column\":1}}";

fn to_json(output: &TreeOutput) -> String {
    serde_json::to_string(output).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {}", e));
        FALLBACK_ERROR.to_string()
    })
}

/// Empty or missing config means defaults.
fn parse_config<T: Default + serde::de::DeserializeOwned>(config_json: &str) -> Result<T, SourceError> {
    if config_json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(config_json)
        .map_err(|e| SourceError::Config(ConfigError { msg: format!("invalid config: {}", e) }))
}

fn layout_config(config_json: &str) -> Result<LayoutConfig, SourceError> {
    let cfg: LayoutConfig = parse_config(config_json)?;
    cfg.validate()?;
    Ok(cfg)
}

fn lay_out(tree: Result<Tree, SourceError>, config_json: &str, what: &str) -> String {
    let result = tree.and_then(|mut tree| {
        let cfg = layout_config(config_json)?;
        let summary = layout_tree(&mut tree, &cfg);
        Ok(TreeOutput::from_tree(&tree, &summary))
    });
    match result {
        Ok(output) => to_json(&output),
        Err(e) => {
            console_error(&format!("Error in {}: {:?}", what, e));
            to_json(&TreeOutput::from_error(&e))
        }
    }
}

/// Lay out edge-list source text.
#[wasm_bindgen]
pub fn layout_source(input: &str, config_json: &str) -> String {
    lay_out(crate::parse_source(input), config_json, "source")
}

/// Lay out a JSON relationship list.
#[wasm_bindgen]
pub fn layout_json(input: &str, config_json: &str) -> String {
    lay_out(parser::parse_json(input), config_json, "relationship JSON")
}

/// Lay out a random tree; `generator_json` may override size and fan-out.
#[wasm_bindgen]
pub fn random_tree(generator_json: &str, seed: u64, config_json: &str) -> String {
    let tree = parse_config::<GeneratorConfig>(generator_json).and_then(|cfg| {
        generate_tree(&cfg, seed).map_err(|e| {
            SourceError::Compile(CompileError { msg: e.to_string(), line: 1, col: 1 })
        })
    });
    lay_out(tree, config_json, "generator")
}

/// Reformat edge-list source, keeping comments. Returns the source unchanged
/// if it does not parse.
#[wasm_bindgen]
pub fn format_source(source: &str) -> String {
    match parser::parse_file(source) {
        Ok(ast) => parser::emit_file(&ast),
        Err(e) => {
            console_error(&format!("Error parsing file: {:?}", e));
            source.to_string()
        }
    }
}

/// Canonical edge-list text for a JSON relationship list, or an empty
/// string if it is invalid.
#[wasm_bindgen]
pub fn json_to_source(input: &str) -> String {
    match parser::parse_json(input) {
        Ok(tree) => parser::emit_tree(&tree),
        Err(e) => {
            console_error(&format!("Error converting relationship JSON: {:?}", e));
            String::new()
        }
    }
}
