//! Linter configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use globset::{Glob, GlobMatcher};
use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::LinterError;
use crate::options::{DEFAULT_MAX_LINE_LENGTH, EXTENSION_METHODS, MAX_LINE_LENGTH, OptionProvider};
use crate::violation::Severity;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule configuration (enable/disable/severity).
    #[serde(default)]
    pub options: HashMap<String, RuleOption>,

    /// Maximum line length in characters.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Methods treated as extension methods even when not declared in the
    /// linted file.
    #[serde(default)]
    pub extension_methods: Vec<String>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Per-file option overrides. Later entries win.
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,

    /// Whether to enable performance timings.
    #[serde(default)]
    pub timings: bool,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,

    #[serde(skip)]
    override_matchers: Vec<GlobMatcher>,
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

/// Options applied to files matching a glob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigOverride {
    pub files: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<usize>,
}

/// Configuration for a single rule (in options map).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled (boolean).
    Enabled(bool),
    /// Rule is enabled with severity string ("error", "warning", "info", "off").
    Severity(String),
    /// Rule is enabled with specific options object.
    Options(serde_json::Value),
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
            RuleOption::Options(_) => true,
        }
    }

    /// Severity configured for the rule, if any.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleOption::Severity(s) => Severity::from_config(s),
            RuleOption::Options(v) => v
                .get("severity")
                .and_then(serde_json::Value::as_str)
                .and_then(Severity::from_config),
            RuleOption::Enabled(_) => None,
        }
    }
}

impl LinterConfig {
    /// Configuration file names, in lookup order.
    pub const CONFIG_FILES: [&'static str; 2] = [".trivialint.jsonc", ".trivialint.json"];

    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            extension_methods: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            overrides: Vec::new(),
            timings: false,
            base_dir: None,
            override_matchers: Vec::new(),
        }
    }

    /// Returns the first configuration file present in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.trivialint.jsonc`, `.trivialint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        config.base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        let mut config: Self = serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))?;
        config.compile_overrides()?;
        Ok(config)
    }

    /// Appends an override. Used by the CLI for command-line values.
    pub fn push_override(&mut self, rule: ConfigOverride) -> Result<(), LinterError> {
        self.overrides.push(rule);
        self.compile_overrides()
    }

    fn compile_overrides(&mut self) -> Result<(), LinterError> {
        self.override_matchers = self
            .overrides
            .iter()
            .map(|rule| {
                Glob::new(&rule.files)
                    .map(|glob| glob.compile_matcher())
                    .map_err(|e| {
                        LinterError::config(format!("Invalid override glob '{}': {}", rule.files, e))
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Returns whether a rule is enabled. Rules absent from `options` are on.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.options
            .get(rule_id)
            .is_none_or(RuleOption::is_enabled)
    }

    /// Severity for violations of a rule.
    pub fn rule_severity(&self, rule_id: &str) -> Severity {
        self.options
            .get(rule_id)
            .and_then(RuleOption::severity)
            .unwrap_or_default()
    }

    /// Overrides matching `path`, in declaration order.
    fn matching_overrides<'a>(
        &'a self,
        path: Option<&'a Path>,
    ) -> impl Iterator<Item = &'a ConfigOverride> + 'a {
        self.overrides
            .iter()
            .zip(&self.override_matchers)
            .filter(move |(_, matcher)| path.is_some_and(|p| self.matches(matcher, p)))
            .map(|(rule, _)| rule)
    }

    fn matches(&self, matcher: &GlobMatcher, path: &Path) -> bool {
        if matcher.is_match(path) {
            return true;
        }
        let relative = self
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok());
        relative.is_some_and(|rel| matcher.is_match(rel))
            || path.file_name().is_some_and(|name| matcher.is_match(name))
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionProvider for LinterConfig {
    fn get(&self, path: Option<&Path>, key: &str) -> Option<String> {
        if key == MAX_LINE_LENGTH.key() {
            let value = self
                .matching_overrides(path)
                .filter_map(|rule| rule.max_line_length)
                .last()
                .unwrap_or(self.max_line_length);
            Some(value.to_string())
        } else if key == EXTENSION_METHODS.key() {
            (!self.extension_methods.is_empty()).then(|| self.extension_methods.join(","))
        } else {
            None
        }
    }
}
