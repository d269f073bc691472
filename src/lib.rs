// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # aicheck — compliance auditors for the AI Core Standard
//!
//! Checks a target project's directory tree, configuration files, and source
//! code against a fixed organizational standard: required directories,
//! required documentation, tooling/CI configuration, data-layout conventions,
//! and prompt/LLM-usage hygiene.
//!
//! ## Core Concept
//!
//! Every auditor is an independent, side-effect-free scan-and-report routine:
//! a tree walk plus a table of expected paths/patterns, producing a uniform
//! result shape (missing items, derived compliance flag, structured report).
//! A consolidating check composes several of them into one report.
//!
//! - **structure** — required dirs/files plus recommended items
//! - **docs** — documentation presence and README linkage
//! - **tooling** — CI/lint/test configs, language-conditional requirements
//! - **data layout** — data/ policy and output metadata traceability
//! - **llm usage** — raw provider-call detection
//! - **prompt extraction** — inline prompt discovery (informational)
//! - **prompt merge** — core/template/project precedence merging
//! - **config validation** — JSON-Schema plus typed structural models
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aicheck::audit::{data_layout, structure};
//! use aicheck::validate::SchemaCache;
//!
//! let result = structure::audit(std::path::Path::new("."));
//! if !result.is_compliant() {
//!     println!("{}", result.to_report());
//! }
//!
//! let mut cache = SchemaCache::new(4);
//! let data = data_layout::audit(
//!     std::path::Path::new("."),
//!     &data_layout::DataAuditOptions::default(),
//!     &mut cache,
//! );
//! println!("{}", serde_json::to_string_pretty(&data.to_json())?);
//! ```
//!
//! ## Design
//!
//! All scans are single-threaded, synchronous, and stateless: every result
//! is a pure function of (root path, configuration) at call time. The one
//! retained piece of state is the bounded, explicitly-owned schema cache in
//! [`validate::SchemaCache`]. Anything file-local (missing path, malformed
//! document, unreadable file) is reported and scanning continues; only fatal
//! configuration problems (a missing required merge source, a non-mapping
//! document root) propagate as errors.

// Engine (generic scan/validate/merge machinery)
pub mod catalog;
pub mod error;
pub mod finding;
pub mod merge;
pub mod patterns;
pub mod scan;
pub mod validate;

// Auditors and orchestration
pub mod audit;
pub mod config;
pub mod extract;
pub mod health;
pub mod tasks;

// Re-exports
pub use audit::{
    DataAuditResult, DocsAuditResult, LlmAuditResult, StructureAuditResult, ToolingAuditResult,
};
pub use error::{Error, Result};
pub use extract::{extract_prompts, ExtractOptions, PromptExtractionResult, PromptFinding};
pub use finding::Finding;
pub use health::{run_checks, CheckOutcome, ConsolidatedReport};
pub use merge::{merge, MergeReport, PrecedenceSource};
pub use scan::{find_missing, find_missing_dirs, scan, ScanEvent, ScanPolicy};
pub use tasks::{filter_tasks, run_sequence, AuditTask, TaskResult, KNOWN_TASKS};
pub use validate::{validate_document, SchemaCache, SchemaRef, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
