use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IncludeGraphError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the preprocessor trace is produced
    pub compiler: CompilerConfig,

    /// Trace line format
    pub trace: TraceConfig,

    /// Name matching rules for queries
    pub query: QueryConfig,

    /// System vs project header classification
    pub classification: ClassificationConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler executable, invoked as `<program> -E -H <source> -I <dir>...`
    pub program: String,

    /// Include directories passed with `-I` (empty means the working directory)
    pub include_dirs: Vec<PathBuf>,

    /// Additional arguments appended to the invocation (e.g. `-std=c++20`)
    pub extra_args: Vec<String>,

    /// Keep a copy of the captured trace at this location
    pub save_trace: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Character repeated at the start of a trace line to encode depth
    pub depth_marker: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Suffix tried when a query name has no extension (`vector` also matches `vector.h`)
    pub header_suffix: String,

    /// Names starting with this prefix are hidden from subtree listings
    pub reserved_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationPolicy {
    /// Headers outside the declared project root are system headers
    ProjectRoot,
    /// Headers whose path contains a known toolchain marker are system headers
    PathMarkers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub policy: ClassificationPolicy,

    /// Project root for the `project-root` policy (defaults to the working directory)
    pub project_root: Option<PathBuf>,

    /// Substrings marking a system header for the `path-markers` policy
    pub system_markers: Vec<String>,

    /// Path prefixes marking a system header for the `path-markers` policy
    pub system_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "clang++".to_string(),
            include_dirs: Vec::new(),
            extra_args: Vec::new(),
            save_trace: None,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { depth_marker: '.' }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            header_suffix: ".h".to_string(),
            reserved_prefix: "__".to_string(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            policy: ClassificationPolicy::ProjectRoot,
            project_root: None,
            system_markers: vec!["include/c++".to_string(), "Cellar/llvm".to_string()],
            system_prefixes: vec!["/usr/".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| IncludeGraphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Err(IncludeGraphError::Config(format!(
                        "config file {} does not exist",
                        p.as_ref().display()
                    )))
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "include-graph.toml",
                    "IncludeGraph.toml",
                    ".include-graph.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.compiler.program.trim().is_empty() {
            return Err(IncludeGraphError::Config("compiler.program must not be empty".to_string()));
        }
        if self.trace.depth_marker.is_whitespace() {
            return Err(IncludeGraphError::Config("trace.depth_marker must not be whitespace".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[compiler]
program = "g++"
include_dirs = ["include", "src"]

[classification]
policy = "path-markers"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.compiler.program, "g++");
        assert_eq!(config.compiler.include_dirs, vec![PathBuf::from("include"), PathBuf::from("src")]);
        assert_eq!(config.classification.policy, ClassificationPolicy::PathMarkers);
        assert_eq!(config.classification.system_prefixes, vec!["/usr/".to_string()]);
        assert_eq!(config.trace.depth_marker, '.');
        assert_eq!(config.query.header_suffix, ".h");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compiler]\nprogram = \"\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, IncludeGraphError::Config(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"yaml\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }
}
