//! Structured-document validation
//!
//! Loads a single YAML/JSON document, validates it against a JSON-Schema
//! (draft 2020-12) and an optional structural model, and reduces every
//! failure into a flat, ordered list of human-readable issue strings.
//!
//! Parsing and root-shape checks are fail-fast (one issue, stop); schema and
//! model validation are exhaustive. The compiled-schema cache is the one
//! piece of retained state in the crate: explicit, bounded, keyed by
//! absolute schema path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Draft, Validator};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use crate::catalog::OUTPUT_METADATA_KEYS;

/// Location marker for root-level schema failures.
pub const ROOT_MARKER: &str = "<root>";

/// Default schema for documents under data/outputs.
pub const OUTPUT_METADATA_SCHEMA: &str = include_str!("../schemas/outputs_metadata.schema.json");

/// Bounded cache of compiled schema validators, keyed by absolute path.
///
/// Eviction is least-recently-used. Capacity is an explicit constructor
/// parameter so callers (and tests) control retention; there is no global
/// instance.
pub struct SchemaCache {
    capacity: usize,
    entries: Vec<(PathBuf, Arc<Validator>)>,
}

impl SchemaCache {
    pub fn new(capacity: usize) -> Self {
        SchemaCache {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch the compiled validator for `path`, loading and caching it on a
    /// miss. Load or compile failures are reported as issue strings, never
    /// panics.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Validator>, String> {
        let abs = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if let Some(pos) = self.entries.iter().position(|(p, _)| *p == abs) {
            let entry = self.entries.remove(pos);
            let validator = Arc::clone(&entry.1);
            self.entries.push(entry);
            return Ok(validator);
        }

        let text = std::fs::read_to_string(&abs)
            .map_err(|e| format!("Schema load error: {}: {}", abs.display(), e))?;
        let schema_json: Value = serde_json::from_str(&text)
            .map_err(|e| format!("Schema load error: {}: {}", abs.display(), e))?;
        let validator = Arc::new(compile_schema(&schema_json)?);

        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((abs, Arc::clone(&validator)));
        Ok(validator)
    }
}

impl SchemaCache {
    /// Fetch the compiled validator for an embedded schema, keyed by a
    /// pseudo-path so it shares the same bounded slot pool.
    pub fn get_or_compile_embedded(
        &mut self,
        name: &str,
        text: &str,
    ) -> Result<Arc<Validator>, String> {
        let key = PathBuf::from(format!("<embedded:{}>", name));
        if let Some(pos) = self.entries.iter().position(|(p, _)| *p == key) {
            let entry = self.entries.remove(pos);
            let validator = Arc::clone(&entry.1);
            self.entries.push(entry);
            return Ok(validator);
        }
        let schema_json: Value = serde_json::from_str(text)
            .map_err(|e| format!("Schema load error: embedded {} schema: {}", name, e))?;
        let validator = Arc::new(compile_schema(&schema_json)?);
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, Arc::clone(&validator)));
        Ok(validator)
    }
}

/// A schema source: a file on disk, or a schema compiled into the binary.
#[derive(Debug, Clone)]
pub enum SchemaRef {
    Path(PathBuf),
    Embedded {
        name: &'static str,
        text: &'static str,
    },
}

impl SchemaRef {
    pub fn display_path(&self) -> String {
        match self {
            SchemaRef::Path(path) => path.display().to_string(),
            SchemaRef::Embedded { name, .. } => format!("<embedded:{}>", name),
        }
    }

    fn validator(&self, cache: &mut SchemaCache) -> Result<Arc<Validator>, String> {
        match self {
            SchemaRef::Path(path) => cache.get_or_load(path),
            SchemaRef::Embedded { name, text } => cache.get_or_compile_embedded(name, text),
        }
    }
}

/// Compile a draft 2020-12 schema with format assertions enabled.
pub fn compile_schema(schema: &Value) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| format!("Schema compile error: {}", e))
}

/// Compile the embedded outputs-metadata schema.
pub fn output_metadata_validator() -> Result<Validator, String> {
    let schema: Value = serde_json::from_str(OUTPUT_METADATA_SCHEMA)
        .map_err(|e| format!("Schema load error: embedded outputs metadata schema: {}", e))?;
    compile_schema(&schema)
}

/// Exhaustive schema validation issues, each prefixed with its location as a
/// "/"-joined path of property/index segments (root failures use the literal
/// root marker).
pub fn schema_errors(validator: &Validator, doc: &Value) -> Vec<String> {
    let mut issues = Vec::new();
    for err in validator.iter_errors(doc) {
        let pointer = err.instance_path.to_string();
        let location = pointer.trim_start_matches('/');
        let location = if location.is_empty() {
            ROOT_MARKER
        } else {
            location
        };
        issues.push(format!("{}: {}", location, err));
    }
    issues
}

/// Convert a YAML value to a JSON value, normalizing mapping keys to strings.
pub fn yaml_to_json(value: serde_norway::Value) -> Value {
    match value {
        serde_norway::Value::Null => Value::Null,
        serde_norway::Value::Bool(b) => Value::Bool(b),
        serde_norway::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }
        serde_norway::Value::String(s) => Value::String(s),
        serde_norway::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_norway::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(yaml_key_to_string(&k), yaml_to_json(v));
            }
            Value::Object(out)
        }
        serde_norway::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key_to_string(key: &serde_norway::Value) -> String {
    match key {
        serde_norway::Value::String(s) => s.clone(),
        serde_norway::Value::Bool(b) => b.to_string(),
        serde_norway::Value::Number(n) => n.to_string(),
        serde_norway::Value::Null => "null".to_string(),
        other => serde_norway::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Outcome of validating a single config document against schema and model.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ValidationResult {
    pub label: String,
    pub data_path: String,
    pub schema_path: String,
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn failed(label: &str, data_path: &Path, schema: &SchemaRef, errors: Vec<String>) -> Self {
        ValidationResult {
            label: label.to_string(),
            data_path: data_path.display().to_string(),
            schema_path: schema.display_path(),
            ok: false,
            errors,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "label": self.label,
            "data_path": self.data_path,
            "schema_path": self.schema_path,
            "ok": self.ok,
            "errors": self.errors,
        })
    }
}

/// Validate one YAML config against a JSON-Schema and a structural model.
///
/// Issue order: schema issues first (exhaustive, location-prefixed), then
/// whatever the model check finds. Unparsable or non-mapping documents
/// short-circuit with a single issue.
pub fn validate_document(
    label: &str,
    data_path: &Path,
    schema: &SchemaRef,
    cache: &mut SchemaCache,
    model_check: impl Fn(&Value) -> Vec<String>,
) -> ValidationResult {
    let raw = match std::fs::read_to_string(data_path) {
        Ok(raw) => raw,
        Err(e) => {
            return ValidationResult::failed(
                label,
                data_path,
                schema,
                vec![format!("YAML error: cannot read file: {}", e)],
            );
        }
    };

    let parsed: serde_norway::Value = match serde_norway::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            return ValidationResult::failed(
                label,
                data_path,
                schema,
                vec![format!("YAML error: {}", e)],
            );
        }
    };

    let doc = yaml_to_json(parsed);
    let doc = match doc {
        Value::Null => Value::Object(serde_json::Map::new()),
        Value::Object(_) => doc,
        other => {
            return ValidationResult::failed(
                label,
                data_path,
                schema,
                vec![format!(
                    "YAML error: root must be a mapping, got {}",
                    json_type_name(&other)
                )],
            );
        }
    };

    let mut errors = Vec::new();
    match schema.validator(cache) {
        Ok(validator) => {
            errors.extend(
                schema_errors(&validator, &doc)
                    .into_iter()
                    .map(|issue| format!("Schema: {}", issue)),
            );
        }
        Err(e) => errors.push(e),
    }

    errors.extend(
        model_check(&doc)
            .into_iter()
            .map(|issue| format!("Model: {}", issue)),
    );

    ValidationResult {
        label: label.to_string(),
        data_path: data_path.display().to_string(),
        schema_path: schema.display_path(),
        ok: errors.is_empty(),
        errors,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Accepts RFC-3339 (trailing `Z` or explicit offset) plus the common
/// zone-less ISO forms.
pub fn timestamp_is_valid(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Validate one output-metadata JSON file.
///
/// `display_path` appears verbatim in every issue. Stages, in order:
/// JSON parse (fail-fast), object root (fail-fast), schema (one combined
/// issue per file), timestamp format, missing metadata keys (one combined
/// issue listing every absent key).
pub fn validate_output_file(
    display_path: &str,
    path: &Path,
    validator: Option<&Validator>,
) -> Vec<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => return vec![format!("{}: failed to read file ({})", display_path, e)],
    };

    let doc: Value = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => return vec![format!("{}: failed to parse JSON ({})", display_path, e)],
    };

    let map = match doc.as_object() {
        Some(map) => map,
        None => {
            return vec![format!(
                "{}: expected top-level JSON object with metadata",
                display_path
            )]
        }
    };

    if let Some(validator) = validator {
        let schema_issues = schema_errors(validator, &doc);
        if !schema_issues.is_empty() {
            return vec![format!(
                "{}: schema validation failed: {}",
                display_path,
                schema_issues.join(", ")
            )];
        }
    }

    if let Some(ts) = map.get("timestamp") {
        let valid = ts.as_str().map(timestamp_is_valid).unwrap_or(false);
        if !valid {
            return vec![format!(
                "{}: invalid timestamp format: {}",
                display_path, ts
            )];
        }
    }

    let missing: Vec<&str> = OUTPUT_METADATA_KEYS
        .iter()
        .filter(|key| !map.contains_key(**key))
        .copied()
        .collect();
    if !missing.is_empty() {
        return vec![format!(
            "{}: missing metadata keys: {}",
            display_path,
            missing.join(", ")
        )];
    }

    Vec::new()
}
