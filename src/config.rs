//! Typed models for the standard config documents
//!
//! An ergonomic, type-safe view of `models.yaml`, `prompts.yaml`,
//! `project.yaml`, and `evals.yaml`. `#[serde(deny_unknown_fields)]` rejects
//! unknown keys where the standard forbids them; field rules beyond what
//! types express are checked exhaustively by the `*_check` functions, which
//! collect every violation they can find.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::validate::{validate_document, SchemaCache, SchemaRef, ValidationResult};

pub const MODELS_SCHEMA: &str = include_str!("../schemas/models.schema.json");
pub const PROMPTS_SCHEMA: &str = include_str!("../schemas/prompts.schema.json");
pub const PROJECT_SCHEMA: &str = include_str!("../schemas/project_config.schema.json");
pub const EVALS_SCHEMA: &str = include_str!("../schemas/eval_config.schema.json");

const RUNTIMES: &[&str] = &["batch", "service", "cli", "notebook", "library", "hybrid"];
const STATUSES: &[&str] = &["active", "maintenance", "deprecated", "archived"];
const CLASSIFICATIONS: &[&str] = &["public", "internal", "confidential", "restricted"];
const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+(-[a-zA-Z0-9]+)?$";

/// Validated model parameters for a specific provider/model pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelParams {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

/// Provider-level defaults and optional model allow-lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub default_model: String,
    #[serde(default)]
    pub coding_models: Option<Vec<String>>,
    #[serde(default)]
    pub general_models: Option<Vec<String>>,
}

/// Top-level models.yaml structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    pub default: ModelParams,
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// A single prompt template definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptTemplate {
    pub description: String,
    pub system: String,
    pub user_template: String,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Mapping of prompt IDs to their templates.
pub type PromptsConfig = BTreeMap<String, PromptTemplate>;

/// A value that may be one string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// Data handling policy metadata for a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataPolicy {
    #[serde(default)]
    pub pii: Option<bool>,
    #[serde(default)]
    pub prod_data: Option<bool>,
    #[serde(default)]
    pub data_classification: Option<String>,
    #[serde(default)]
    pub retention_days: Option<i64>,
}

/// Repository metadata for the project config.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

/// Top-level project.yaml structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub owner: Option<StringOrList>,
    pub languages: Vec<String>,
    pub runtime: String,
    #[serde(default)]
    pub stack: Option<Vec<String>>,
    #[serde(default)]
    pub data_policy: Option<DataPolicy>,
    #[serde(default)]
    pub repository: Option<RepositoryInfo>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

/// Dataset locator and sampling options for an evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalDataset {
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub max_samples: Option<i64>,
    #[serde(default)]
    pub seed: Option<i64>,
}

impl EvalDataset {
    pub fn has_source(&self) -> bool {
        self.dataset_id.as_deref().is_some_and(|s| !s.is_empty())
            || self.data_path.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A single evaluation definition within evals.yaml.
/// Unknown extra keys are tolerated here.
#[derive(Debug, Clone, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub description: String,
    pub dataset: EvalDataset,
    pub prompt_id: StringOrList,
    pub models: Vec<String>,
    pub metrics: Vec<String>,
    #[serde(default)]
    pub thresholds: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub batch_size: Option<i64>,
    #[serde(default)]
    pub parallelism: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Top-level evals.yaml structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalsConfig {
    #[serde(default)]
    pub version: Option<String>,
    pub evals: Vec<Evaluation>,
}

/// Structural checks for models.yaml.
pub fn models_check(doc: &Value) -> Vec<String> {
    let config: ModelsConfig = match serde_json::from_value(doc.clone()) {
        Ok(c) => c,
        Err(e) => return vec![e.to_string()],
    };

    let mut issues = Vec::new();
    check_model_params("default", &config.default, &mut issues);
    for (name, provider) in &config.providers {
        if provider.default_model.is_empty() {
            issues.push(format!("providers.{}: default_model cannot be empty", name));
        }
    }
    issues
}

fn check_model_params(label: &str, params: &ModelParams, issues: &mut Vec<String>) {
    if params.provider.is_empty() {
        issues.push(format!("{}: provider cannot be empty", label));
    }
    if params.model.is_empty() {
        issues.push(format!("{}: model cannot be empty", label));
    }
    if !(0.0..=2.0).contains(&params.temperature) {
        issues.push(format!(
            "{}: temperature must be between 0.0 and 2.0, got {}",
            label, params.temperature
        ));
    }
    if params.max_tokens == 0 {
        issues.push(format!("{}: max_tokens must be positive", label));
    }
}

/// Structural checks for prompts.yaml.
pub fn prompts_check(doc: &Value) -> Vec<String> {
    let config: PromptsConfig = match serde_json::from_value(doc.clone()) {
        Ok(c) => c,
        Err(e) => return vec![e.to_string()],
    };

    let mut issues = Vec::new();
    for (id, template) in &config {
        for (field, value) in [
            ("description", &template.description),
            ("system", &template.system),
            ("user_template", &template.user_template),
        ] {
            if value.is_empty() {
                issues.push(format!("{}: {} cannot be empty", id, field));
            }
        }
    }
    issues
}

/// Structural checks for project.yaml.
pub fn project_check(doc: &Value) -> Vec<String> {
    let config: ProjectConfig = match serde_json::from_value(doc.clone()) {
        Ok(c) => c,
        Err(e) => return vec![e.to_string()],
    };

    let mut issues = Vec::new();
    if config.name.is_empty() {
        issues.push("name cannot be empty".to_string());
    }
    if config.description.is_empty() {
        issues.push("description cannot be empty".to_string());
    }
    if config.languages.is_empty() {
        issues.push("languages must contain at least one item".to_string());
    }
    if !RUNTIMES.contains(&config.runtime.as_str()) {
        issues.push(format!(
            "runtime must be one of {}, got '{}'",
            RUNTIMES.join("|"),
            config.runtime
        ));
    }
    if !STATUSES.contains(&config.status.as_str()) {
        issues.push(format!(
            "status must be one of {}, got '{}'",
            STATUSES.join("|"),
            config.status
        ));
    }
    if let Some(version) = &config.version {
        let pattern = Regex::new(VERSION_PATTERN).expect("version pattern is valid");
        if !pattern.is_match(version) {
            issues.push(format!("version '{}' is not a valid semver string", version));
        }
    }
    if let Some(policy) = &config.data_policy {
        if let Some(class) = &policy.data_classification {
            if !CLASSIFICATIONS.contains(&class.as_str()) {
                issues.push(format!(
                    "data_policy.data_classification must be one of {}, got '{}'",
                    CLASSIFICATIONS.join("|"),
                    class
                ));
            }
        }
        if let Some(days) = policy.retention_days {
            if days < 0 {
                issues.push("data_policy.retention_days cannot be negative".to_string());
            }
        }
    }
    issues
}

/// Structural checks for evals.yaml.
pub fn evals_check(doc: &Value) -> Vec<String> {
    let config: EvalsConfig = match serde_json::from_value(doc.clone()) {
        Ok(c) => c,
        Err(e) => return vec![e.to_string()],
    };

    let mut issues = Vec::new();
    for eval in &config.evals {
        let label = if eval.id.is_empty() {
            "<no id>"
        } else {
            eval.id.as_str()
        };
        if eval.id.is_empty() {
            issues.push(format!("{}: id cannot be empty", label));
        }
        if eval.description.is_empty() {
            issues.push(format!("{}: description cannot be empty", label));
        }
        if eval.models.is_empty() {
            issues.push(format!("{}: models must contain at least one item", label));
        }
        if eval.metrics.is_empty() {
            issues.push(format!("{}: metrics must contain at least one item", label));
        }
        match &eval.prompt_id {
            StringOrList::One(id) if id.is_empty() => {
                issues.push(format!("{}: prompt_id cannot be empty", label));
            }
            StringOrList::Many(ids) if ids.is_empty() => {
                issues.push(format!("{}: prompt_id list cannot be empty", label));
            }
            StringOrList::Many(ids) if ids.iter().any(|id| id.is_empty()) => {
                issues.push(format!(
                    "{}: prompt_id entries must be non-empty strings",
                    label
                ));
            }
            _ => {}
        }
        if !eval.dataset.has_source() {
            issues.push(format!(
                "{}: dataset must include dataset_id or data_path",
                label
            ));
        }
        for (field, value) in [
            ("dataset.max_samples", eval.dataset.max_samples),
            ("batch_size", eval.batch_size),
            ("parallelism", eval.parallelism),
        ] {
            if let Some(v) = value {
                if v < 1 {
                    issues.push(format!("{}: {} must be at least 1", label, field));
                }
            }
        }
        if let Some(seed) = eval.dataset.seed {
            if seed < 0 {
                issues.push(format!("{}: dataset.seed cannot be negative", label));
            }
        }
    }
    issues
}

/// Per-document path overrides for config validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub models: Option<PathBuf>,
    pub models_schema: Option<PathBuf>,
    pub prompts: Option<PathBuf>,
    pub prompts_schema: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub project_schema: Option<PathBuf>,
    pub evals: Option<PathBuf>,
    pub evals_schema: Option<PathBuf>,
}

fn schema_ref(override_path: &Option<PathBuf>, name: &'static str, text: &'static str) -> SchemaRef {
    match override_path {
        Some(path) => SchemaRef::Path(path.clone()),
        None => SchemaRef::Embedded { name, text },
    }
}

/// Validate the four standard config documents under `target_root`.
///
/// Documents default to `<root>/config/*.yaml`, falling back to
/// `<root>/templates/config/*.yaml` when no `config/` directory exists.
pub fn validate_configs(
    target_root: &Path,
    paths: &ConfigPaths,
    cache: &mut SchemaCache,
) -> Vec<ValidationResult> {
    let config_dir = target_root.join("config");
    let config_root = if config_dir.exists() {
        config_dir
    } else {
        target_root.join("templates/config")
    };

    let resolve =
        |over: &Option<PathBuf>, name: &str| over.clone().unwrap_or_else(|| config_root.join(name));

    let validations: [(&str, PathBuf, SchemaRef, fn(&Value) -> Vec<String>); 4] = [
        (
            "models",
            resolve(&paths.models, "models.yaml"),
            schema_ref(&paths.models_schema, "models", MODELS_SCHEMA),
            models_check,
        ),
        (
            "prompts",
            resolve(&paths.prompts, "prompts.yaml"),
            schema_ref(&paths.prompts_schema, "prompts", PROMPTS_SCHEMA),
            prompts_check,
        ),
        (
            "project",
            resolve(&paths.project, "project.yaml"),
            schema_ref(&paths.project_schema, "project", PROJECT_SCHEMA),
            project_check,
        ),
        (
            "evals",
            resolve(&paths.evals, "evals.yaml"),
            schema_ref(&paths.evals_schema, "evals", EVALS_SCHEMA),
            evals_check,
        ),
    ];

    validations
        .into_iter()
        .map(|(label, data_path, schema, check)| {
            validate_document(label, &data_path, &schema, cache, check)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_models_check_valid() {
        let doc = json!({
            "default": {
                "provider": "openai",
                "model": "gpt-4",
                "temperature": 0.2,
                "max_tokens": 2048
            },
            "providers": {
                "openai": {"default_model": "gpt-4"}
            }
        });
        assert!(models_check(&doc).is_empty());
    }

    #[test]
    fn test_models_check_temperature_range() {
        let doc = json!({
            "default": {
                "provider": "openai",
                "model": "gpt-4",
                "temperature": 3.5,
                "max_tokens": 2048
            },
            "providers": {}
        });
        let issues = models_check(&doc);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("temperature"));
    }

    #[test]
    fn test_models_check_rejects_unknown_fields() {
        let doc = json!({
            "default": {
                "provider": "openai",
                "model": "gpt-4",
                "temperature": 0.2,
                "max_tokens": 10,
                "surprise": true
            },
            "providers": {}
        });
        let issues = models_check(&doc);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("surprise") || issues[0].contains("unknown field"));
    }

    #[test]
    fn test_project_check_collects_all_violations() {
        let doc = json!({
            "name": "demo",
            "description": "demo project",
            "languages": [],
            "runtime": "spaceship",
            "status": "retired",
            "version": "one.two"
        });
        let issues = project_check(&doc);
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_evals_check_dataset_source() {
        let doc = json!({
            "evals": [{
                "id": "e1",
                "description": "eval one",
                "dataset": {"split": "test"},
                "prompt_id": "p1",
                "models": ["gpt-4"],
                "metrics": ["accuracy"]
            }]
        });
        let issues = evals_check(&doc);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("dataset must include dataset_id or data_path"));
    }

    #[test]
    fn test_evals_tolerates_extra_keys() {
        let doc = json!({
            "evals": [{
                "id": "e1",
                "description": "eval one",
                "dataset": {"dataset_id": "d1"},
                "prompt_id": ["p1", "p2"],
                "models": ["gpt-4"],
                "metrics": ["accuracy"],
                "notes": "kept for the team"
            }]
        });
        assert!(evals_check(&doc).is_empty());
    }

    #[test]
    fn test_validate_configs_reports_each_document() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config");
        fs::create_dir_all(&config).unwrap();
        fs::write(
            config.join("models.yaml"),
            "default:\n  provider: openai\n  model: gpt-4\n  temperature: 0.2\n  max_tokens: 2048\nproviders:\n  openai:\n    default_model: gpt-4\n",
        )
        .unwrap();
        fs::write(
            config.join("prompts.yaml"),
            "summarize:\n  description: Summarize text\n  system: You are a summarizer.\n  user_template: \"Summarize: {text}\"\n",
        )
        .unwrap();
        fs::write(
            config.join("project.yaml"),
            "name: demo\ndescription: demo project\nlanguages: [python]\nruntime: cli\n",
        )
        .unwrap();
        fs::write(
            config.join("evals.yaml"),
            "evals:\n  - id: e1\n    description: smoke eval\n    dataset:\n      dataset_id: d1\n    prompt_id: summarize\n    models: [gpt-4]\n    metrics: [accuracy]\n",
        )
        .unwrap();

        let mut cache = SchemaCache::new(4);
        let results = validate_configs(temp.path(), &ConfigPaths::default(), &mut cache);
        assert_eq!(results.len(), 4);
        for result in &results {
            assert!(result.ok, "{}: {:?}", result.label, result.errors);
        }
    }

    #[test]
    fn test_validate_configs_missing_file_is_per_document_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        let mut cache = SchemaCache::new(4);
        let results = validate_configs(temp.path(), &ConfigPaths::default(), &mut cache);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| !r.ok));
        assert!(results[0].errors[0].contains("cannot read file"));
    }
}
