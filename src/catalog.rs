//! Static catalogues for the AI Core Standard
//!
//! Every auditor is a generic scan fed by one of these constant tables.
//! Keeping the expectations as data (rather than code branches) is what lets
//! the same audit routines cover structure, docs, tooling, and data layout.

/// Directories every compliant project must have.
pub const REQUIRED_DIRS: &[&str] = &[
    "config",
    "data",
    "data/raw",
    "data/processed",
    "data/prompts",
    "data/outputs",
    "data/cache",
    "data/embeddings",
    "docs",
];

/// Files every compliant project must have.
pub const REQUIRED_FILES: &[&str] = &["config/prompts.yaml", "config/models.yaml", "README.md"];

/// Recommended items: warn when missing, never fail.
pub const RECOMMENDED_FILES: &[&str] = &[
    ".gitignore",
    ".editorconfig",
    "docs/AI_PROMPTING_STANDARDS.md",
    "docs/COPILOT_USAGE.md",
];

/// Documentation set required under docs/.
pub const REQUIRED_DOCS: &[&str] = &[
    "docs/PROJECT_STRUCTURE.md",
    "docs/AI_PROMPTING_STANDARDS.md",
    "docs/COPILOT_USAGE.md",
    "docs/DATA_ORGANIZATION.md",
    "docs/SCHEMAS_AND_VALIDATION.md",
    "docs/LINTING_AND_CI_STANDARDS.md",
    "docs/AI_PROJECT_REVIEW_CHECKLIST.md",
];

/// Recommended documentation.
pub const RECOMMENDED_DOCS: &[&str] = &["docs/STATUS.md"];

/// Directories the data-layout audit requires (a subset of `REQUIRED_DIRS`).
pub const DATA_REQUIRED_DIRS: &[&str] = &[
    "data",
    "data/raw",
    "data/processed",
    "data/prompts",
    "data/outputs",
    "data/cache",
    "data/embeddings",
];

/// Subdirectories of data/ that the layout standard defines.
/// Derived from `DATA_REQUIRED_DIRS`; anything else directly under data/ is stray.
pub const ALLOWED_DIRS_IN_DATA: &[&str] = &[
    "raw",
    "processed",
    "prompts",
    "outputs",
    "cache",
    "embeddings",
];

/// Housekeeping files tolerated directly under data/.
pub const ALLOWED_FILES_IN_DATA: &[&str] = &[".gitkeep", ".gitignore", "README.md"];

/// Metadata keys every output document must carry for traceability.
pub const OUTPUT_METADATA_KEYS: &[&str] = &["run_id", "model", "prompt_id", "timestamp"];

/// Sentinel for the CI requirement; any workflow YAML satisfies it.
pub const CI_SENTINEL: &str = ".github/workflows/ci.yml";

/// Tooling files required regardless of language.
pub const REQUIRED_TOOLING_FILES: &[&str] = &[".pre-commit-config.yaml", CI_SENTINEL];

pub const RUFF_PRIMARY: &str = "ruff.toml";
pub const RUFF_DOT: &str = ".ruff.toml";

/// Tooling files recommended regardless of language.
pub const RECOMMENDED_TOOLING_FILES: &[&str] = &["mypy.ini", "pytest.ini", RUFF_PRIMARY, RUFF_DOT];

/// Recommended directories (non-blocking).
pub const RECOMMENDED_TOOLING_DIRS: &[&str] = &["tests"];

/// Language-specific tooling requirements, keyed by detected language.
pub const LANGUAGE_REQUIRED: &[(&str, &[&str])] = &[
    ("python", &["pyproject.toml"]),
    ("javascript", &["package.json"]),
    ("typescript", &["package.json", "tsconfig.json"]),
    ("c_cpp", &[]),
    ("powershell", &[]),
    ("shell", &[]),
];

/// Language-specific recommended artifacts.
pub const LANGUAGE_RECOMMENDED: &[(&str, &[&str])] = &[
    ("python", &["mypy.ini", "pytest.ini", RUFF_PRIMARY, RUFF_DOT]),
    (
        "javascript",
        &[
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            ".eslintrc.json",
            ".eslintrc.js",
            "eslint.config.js",
        ],
    ),
    ("typescript", &["tsconfig.json"]),
    ("c_cpp", &["CMakeLists.txt", "Makefile"]),
    ("powershell", &["PSScriptAnalyzerSettings.psd1"]),
    ("shell", &[".shellcheckrc"]),
];

/// Alternative groups: any one member of a group satisfies the requirement.
pub const LANGUAGE_REQUIRED_ALT_GROUPS: &[(&str, &[&[&str]])] =
    &[("c_cpp", &[&["CMakeLists.txt", "Makefile"]])];

/// Extension to language mapping used for detection.
pub const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    (".py", "python"),
    (".ts", "typescript"),
    (".tsx", "typescript"),
    (".js", "javascript"),
    (".c", "c_cpp"),
    (".cc", "c_cpp"),
    (".cpp", "c_cpp"),
    (".cxx", "c_cpp"),
    (".h", "c_cpp"),
    (".hpp", "c_cpp"),
    (".hxx", "c_cpp"),
    (".ps1", "powershell"),
    (".sh", "shell"),
];

/// Upper bound on files sampled during language detection.
pub const LANGUAGE_DETECT_MAX_FILES: usize = 2000;

/// Directory names excluded from every content scan, subtree-wide.
pub const IGNORE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    "node_modules",
    "dist",
    "build",
    "venv",
    ".venv",
];

/// File extensions eligible for LLM-usage scanning.
pub const LLM_SCAN_EXTENSIONS: &[&str] = &[".py", ".ts", ".tsx", ".js"];

/// Substring patterns indicating raw provider usage, with remediation hints.
pub const RAW_LLM_PATTERNS: &[(&str, &str)] = &[
    (
        "openai.ChatCompletion.create",
        "Raw OpenAI ChatCompletion call; use standard client abstraction.",
    ),
    (
        "openai.Completion.create",
        "Raw OpenAI Completion call; use standard client abstraction.",
    ),
    (
        "client.chat.completions.create",
        "Raw Azure OpenAI chat call; use standard client abstraction.",
    ),
    (
        "client.completions.create",
        "Raw Azure OpenAI completion call; use standard client abstraction.",
    ),
];

/// Default per-file size cap for content scans, in bytes.
pub const DEFAULT_MAX_SCAN_BYTES: u64 = 1_000_000;

/// Identifier suffixes that mark a variable as a likely prompt.
pub const PROMPT_VAR_SUFFIXES: &[&str] = &[
    "prompt",
    "template",
    "system_msg",
    "user_msg",
    "instruction",
    "system_prompt",
    "user_prompt",
];

/// Minimum reduced-string length for a prompt finding (exclusive threshold).
pub const DEFAULT_MIN_PROMPT_LEN: usize = 40;

/// Extensions scanned for prompt literals by default.
pub const PROMPT_SCAN_EXTENSIONS: &[&str] = &[".py"];
