// src/core/compiler.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::CompilerConfig;
use crate::error::{IncludeGraphError, Result};

/// Runs the preprocessor with header tracing and captures the trace.
///
/// `-H` writes the trace to stderr; the preprocessed output on stdout is
/// discarded.
pub struct CompilerInvocation {
    program: String,
    include_dirs: Vec<PathBuf>,
    extra_args: Vec<String>,
    save_trace: Option<PathBuf>,
}

impl CompilerInvocation {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            program: config.program.clone(),
            include_dirs: config.include_dirs.clone(),
            extra_args: config.extra_args.clone(),
            save_trace: config.save_trace.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for tracing `source`; `working_dir` is the include root
    /// when no include directories are configured
    pub fn args(&self, source: &Path, working_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-E".into(), "-H".into(), source.into()];

        if self.include_dirs.is_empty() {
            args.push("-I".into());
            args.push(working_dir.into());
        } else {
            for dir in &self.include_dirs {
                args.push("-I".into());
                args.push(dir.into());
            }
        }

        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }

    /// Run the compiler on `source` and return its header trace
    pub async fn capture_trace(&self, source: &Path, working_dir: &Path) -> Result<String> {
        let args = self.args(source, working_dir);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => IncludeGraphError::CompilerNotFound(self.program.clone()),
                _ => IncludeGraphError::Compiler(format!("failed to run {}: {}", self.program, e)),
            })?;

        // A failing compile still traces every header it reached
        if !output.status.success() {
            warn!("{} exited with {}; using the partial trace", self.program, output.status);
        }

        let trace = String::from_utf8_lossy(&output.stderr).into_owned();

        if let Some(path) = &self.save_trace {
            tokio::fs::write(path, &trace).await?;
            info!("Include trace written to {}", path.display());
        }

        Ok(trace)
    }
}

/// Read a trace captured earlier (e.g. `clang++ -E -H main.cpp 2> trace.txt`)
pub async fn read_trace(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
