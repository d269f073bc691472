//! aicheck CLI - Command-line interface
//!
//! Commands:
//!   structure - Audit project structure
//!   docs      - Audit documentation and README linkage
//!   tooling   - Audit tooling and CI configs
//!   data      - Audit data layout and output metadata
//!   llm       - Audit for raw LLM provider calls
//!   prompts   - Extract inline prompts (informational)
//!   merge     - Merge prompt sources with precedence
//!   validate  - Validate config YAML against schemas and models
//!   check     - Consolidated health check
//!   fix       - Run or list remediation tasks
//!   update    - Update to latest version

mod update;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use aicheck::audit::{data_layout, docs, llm_usage, structure, tooling};
use aicheck::config::{validate_configs, ConfigPaths};
use aicheck::extract::{extract_prompts, ExtractOptions};
use aicheck::merge::{load_source, merge, write_merged, PrecedenceSource};
use aicheck::tasks;
use aicheck::validate::SchemaCache;
use aicheck::{Error, Result, VERSION};

/// Capacity of the per-invocation schema cache.
const SCHEMA_CACHE_CAPACITY: usize = 4;

fn main() -> ExitCode {
    // Non-blocking update check in background thread
    update::check_for_updates_background();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "structure" => cmd_structure(&args[2..]),
        "docs" => cmd_docs(&args[2..]),
        "tooling" => cmd_tooling(&args[2..]),
        "data" => cmd_data(&args[2..]),
        "llm" => cmd_llm(&args[2..]),
        "prompts" => cmd_prompts(&args[2..]),
        "merge" => cmd_merge(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "fix" => cmd_fix(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "update" => cmd_update(),
        "version" | "--version" | "-v" => {
            println!("aicheck {}", VERSION);
            Ok(0)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(0)
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
aicheck - Compliance auditors for the AI Core Standard

USAGE:
    aicheck <COMMAND> [OPTIONS]

COMMANDS:
    structure [--validate-configs]   Audit required dirs/files
    docs                             Audit docs and README linkage
    tooling                          Audit tooling/CI presence
    data [--max-output-files N]      Audit data layout and output metadata
    llm [--max-size-bytes N]         Audit for raw LLM provider calls
    prompts [--yaml] [--min-length]  Extract inline prompts (informational)
    merge [--dry-run]                Merge core/template/project prompts
    validate                         Validate config YAML files
    check                            Consolidated health check
    fix [--list|--run]               Run or list remediation tasks
    schema [name]                    Print JSON schema for a report type
    update                           Update to latest version

OPTIONS:
    --target-root <DIR>   Target project root (default: current directory)
    --json                JSON output format
    --report <FILE>       Also write the JSON report to a file

EXAMPLES:
    aicheck structure --target-root ../my-project
    aicheck data --max-output-files 500 --json
    aicheck prompts --yaml > prompts_skeleton.yaml
    aicheck merge --show-overrides
    aicheck fix --run --only structure,docs
"#
    );
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn value_arg(args: &[String], flag: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if arg == flag {
            if let Some(value) = args.get(i + 1) {
                return Some(value.clone());
            }
        }
    }
    None
}

fn path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    value_arg(args, flag).map(PathBuf::from)
}

fn usize_arg(args: &[String], flag: &str) -> Result<Option<usize>> {
    match value_arg(args, flag) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::Other(format!("{} expects a non-negative integer", flag))),
    }
}

fn target_root(args: &[String]) -> PathBuf {
    let raw = value_arg(args, "--target-root").unwrap_or_else(|| ".".to_string());
    let path = PathBuf::from(raw);
    path.canonicalize().unwrap_or(path)
}

/// Print the payload or the human report, then optionally write the report
/// file. Returns the exit code implied by `compliant`.
fn emit(
    args: &[String],
    payload: &serde_json::Value,
    human: &str,
    compliant: bool,
) -> Result<u8> {
    let serialized = serde_json::to_string_pretty(payload)?;
    if has_flag(args, "--json") {
        println!("{}", serialized);
    } else {
        println!("{}", human);
    }
    if let Some(report) = path_arg(args, "--report") {
        fs::write(&report, format!("{}\n", serialized)).map_err(Error::Io)?;
        eprintln!("Report written to: {}", report.display());
    }
    Ok(u8::from(!compliant))
}

// ---------------------------------------------------------------------------
// Audit commands
// ---------------------------------------------------------------------------

fn cmd_structure(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let result = if has_flag(args, "--validate-configs") {
        let mut cache = SchemaCache::new(SCHEMA_CACHE_CAPACITY);
        structure::audit_with_configs(&target, &mut cache)
    } else {
        structure::audit(&target)
    };
    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

fn cmd_docs(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let result = docs::audit(&target);
    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

fn cmd_tooling(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let result = tooling::audit(&target);
    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

fn cmd_data(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let options = data_layout::DataAuditOptions {
        max_output_files: usize_arg(args, "--max-output-files")?,
        metadata_schema: path_arg(args, "--metadata-schema"),
    };
    let mut cache = SchemaCache::new(SCHEMA_CACHE_CAPACITY);
    let result = data_layout::audit(&target, &options, &mut cache);
    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

fn cmd_llm(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let max_size_bytes = match usize_arg(args, "--max-size-bytes")? {
        Some(0) => None,
        Some(n) => Some(n as u64),
        None => llm_usage::LlmAuditOptions::default().max_size_bytes,
    };
    let result = llm_usage::audit(&target, &llm_usage::LlmAuditOptions { max_size_bytes });
    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

fn cmd_prompts(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let mut options = ExtractOptions::default();
    if let Some(min_length) = usize_arg(args, "--min-length")? {
        options.min_length = min_length;
    }
    if let Some(raw) = value_arg(args, "--extensions") {
        let extensions: Vec<String> = raw
            .split(',')
            .map(|ext| ext.trim().to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if !extensions.is_empty() {
            options.extensions = extensions;
        }
    }

    let result = extract_prompts(&target, &options);

    if has_flag(args, "--yaml") {
        println!("{}", result.to_yaml_skeleton());
        if let Some(report) = path_arg(args, "--report") {
            let payload = serde_json::to_string_pretty(&result.to_json())?;
            fs::write(&report, format!("{}\n", payload)).map_err(Error::Io)?;
        }
        return Ok(0);
    }

    emit(args, &result.to_json(), &result.to_report(), result.is_compliant())
}

// ---------------------------------------------------------------------------
// Prompt merging
// ---------------------------------------------------------------------------

fn cmd_merge(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let core_path = path_arg(args, "--core")
        .unwrap_or_else(|| target.join("config/prompts.core.yaml"));
    let template_path = path_arg(args, "--template")
        .unwrap_or_else(|| target.join("config/prompts.defaults.yaml"));
    let project_path = path_arg(args, "--project")
        .unwrap_or_else(|| target.join("config/prompts.custom.yaml"));
    let output_path = path_arg(args, "--output")
        .unwrap_or_else(|| target.join("config/prompts.merged.yaml"));

    let mut warnings = Vec::new();
    let core = load_source(&core_path, true, "core prompts", &mut warnings)?;
    let template = load_source(&template_path, false, "template prompts", &mut warnings)?;
    let project = load_source(&project_path, false, "project prompts", &mut warnings)?;
    for warning in &warnings {
        eprintln!("⚠️  {}", warning);
    }

    let report = merge(&[
        PrecedenceSource::new("core", core),
        PrecedenceSource::new("template", template),
        PrecedenceSource::new("project", project),
    ]);

    if has_flag(args, "--show-overrides") && !report.overrides.is_empty() {
        eprintln!("Overrides detected (later source overrides earlier):");
        for (key, sources) in &report.overrides {
            eprintln!("  - {}: {}", key, sources.join(" -> "));
        }
        eprintln!();
    }

    if has_flag(args, "--dry-run") {
        println!("[dry-run] Would merge {} prompt(s)", report.merged.len());
    } else {
        write_merged(&report.merged, &output_path)?;
        println!(
            "Merged {} prompt(s) → {}",
            report.merged.len(),
            output_path.display()
        );
    }

    Ok(0)
}

// ---------------------------------------------------------------------------
// Config validation
// ---------------------------------------------------------------------------

fn cmd_validate(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let paths = ConfigPaths {
        models: path_arg(args, "--models"),
        models_schema: path_arg(args, "--models-schema"),
        prompts: path_arg(args, "--prompts"),
        prompts_schema: path_arg(args, "--prompts-schema"),
        project: path_arg(args, "--project"),
        project_schema: path_arg(args, "--project-schema"),
        evals: path_arg(args, "--evals"),
        evals_schema: path_arg(args, "--evals-schema"),
    };

    let mut cache = SchemaCache::new(SCHEMA_CACHE_CAPACITY);
    let results = validate_configs(&target, &paths, &mut cache);
    let all_ok = results.iter().all(|r| r.ok);

    if has_flag(args, "--json") {
        let payload = serde_json::json!({
            "results": results.iter().map(|r| r.to_json()).collect::<Vec<_>>(),
            "ok": all_ok,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for result in &results {
            if result.ok {
                println!("OK {} config valid: {}", result.label, result.data_path);
            } else {
                println!("ERROR {} invalid: {}", result.label, result.data_path);
                for issue in &result.errors {
                    println!("  - {}", issue);
                }
            }
        }
    }

    Ok(u8::from(!all_ok))
}

// ---------------------------------------------------------------------------
// Consolidated check
// ---------------------------------------------------------------------------

fn cmd_check(args: &[String]) -> Result<u8> {
    let target = target_root(args);
    let mut cache = SchemaCache::new(SCHEMA_CACHE_CAPACITY);
    let report = aicheck::health::run_checks(&target, &mut cache);
    emit(args, &report.to_json(), &report.to_report(), report.passed())
}

// ---------------------------------------------------------------------------
// Remediation tasks
// ---------------------------------------------------------------------------

fn cmd_fix(args: &[String]) -> Result<u8> {
    if has_flag(args, "--guide") {
        println!("{}", tasks::WORKFLOW_GUIDE);
        return Ok(0);
    }

    let only: Option<Vec<String>> = value_arg(args, "--only").map(|raw| {
        raw.split(',')
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect()
    });
    let selected = tasks::filter_tasks(only.as_deref());

    let run = has_flag(args, "--run");
    if has_flag(args, "--list") && !run {
        for task in &selected {
            let availability = if task.subcommand.is_some() {
                "available"
            } else {
                "manual"
            };
            println!("{:15} {:10} - {}", task.key, availability, task.title);
        }
        return Ok(0);
    }
    if !run {
        print_usage();
        return Ok(0);
    }

    let target = target_root(args);
    let dry_run = has_flag(args, "--dry-run");
    let fail_on_missing = has_flag(args, "--fail-on-missing");
    let max_iterations = usize_arg(args, "--max-iterations")?.unwrap_or(3).max(1);
    let iterations = if has_flag(args, "--loop") { max_iterations } else { 1 };
    let plan_path =
        path_arg(args, "--plan-path").unwrap_or_else(|| target.join("fix_audit_plan.md"));
    let exe = std::env::current_exe().map_err(Error::Io)?;

    let mut results = Vec::new();
    for _ in 0..iterations {
        results = tasks::run_sequence(&selected, &exe, &target, dry_run);
        println!("{}", tasks::summarize(&results));
        if !has_flag(args, "--skip-plan") {
            tasks::write_plan(&plan_path, &results).map_err(Error::Io)?;
        }
        if tasks::sequence_settled(&results, fail_on_missing) {
            break;
        }
    }

    Ok(tasks::exit_code(&results, fail_on_missing) as u8)
}

// ---------------------------------------------------------------------------
// Schemas / update
// ---------------------------------------------------------------------------

fn cmd_schema(args: &[String]) -> Result<u8> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!(
                "Available schemas: structure, docs, tooling, data, llm, prompts, finding, \
                 check, validation, task"
            );
            Ok(0)
        }
        "structure" => print_schema::<aicheck::StructureAuditResult>(),
        "docs" => print_schema::<aicheck::DocsAuditResult>(),
        "tooling" => print_schema::<aicheck::ToolingAuditResult>(),
        "data" => print_schema::<aicheck::DataAuditResult>(),
        "llm" => print_schema::<aicheck::LlmAuditResult>(),
        "prompts" => print_schema::<aicheck::PromptExtractionResult>(),
        "finding" => print_schema::<aicheck::Finding>(),
        "check" => print_schema::<aicheck::ConsolidatedReport>(),
        "validation" => print_schema::<aicheck::ValidationResult>(),
        "task" => print_schema::<aicheck::TaskResult>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<u8> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(0)
}

fn cmd_update() -> Result<u8> {
    update::run_update().map_err(|e| Error::Other(e.to_string()))?;
    Ok(0)
}
