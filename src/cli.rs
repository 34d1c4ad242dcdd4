use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use anyhow::Result;

use crate::config::{Config, OutputFormat};
use crate::core::{Engine, QueryCommand, QueryRequest};

#[derive(Parser, Debug)]
#[command(name = "include-graph")]
#[command(about = "Explain why a C++ header is included, what it pulls in, and which headers arrive more than once")]
#[command(version)]
pub struct Cli {
    /// Source or header file to analyze
    pub file: PathBuf,

    /// Question to answer
    #[arg(value_enum)]
    pub command: QueryCommand,

    /// Header name (e.g. `vector` or `config.h`), required for why/what;
    /// a path fragment for levels
    pub name: Option<String>,

    /// Hide system headers
    #[arg(long)]
    pub project_only: bool,

    /// Only print the shortest inclusion chain (why)
    #[arg(long)]
    pub shortest: bool,

    /// Read a captured `-H` trace instead of running the compiler
    #[arg(long, value_name = "PATH")]
    pub trace: Option<PathBuf>,

    /// Include directory passed to the compiler (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments, rejecting why/what/levels without a header name
    pub fn parse_validated() -> Self {
        let cli = Self::parse();
        if let Err(err) = cli.validate() {
            err.exit();
        }
        cli
    }

    pub fn validate(&self) -> std::result::Result<(), clap::Error> {
        let command = match self.command {
            QueryCommand::Why => "why",
            QueryCommand::What => "what",
            QueryCommand::Levels => "levels",
            QueryCommand::Duplicates => return Ok(()),
        };
        if self.name.as_deref().map_or(true, str::is_empty) {
            return Err(Self::command().error(
                clap::error::ErrorKind::MissingRequiredArgument,
                format!("{} requires a header name", command),
            ));
        }
        Ok(())
    }

    /// Command-line flags take precedence over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if !self.include_dirs.is_empty() {
            config.compiler.include_dirs = self.include_dirs.clone();
        }
    }

    pub fn request(&self) -> QueryRequest {
        QueryRequest {
            source: self.file.clone(),
            command: self.command,
            name: self.name.clone(),
            project_only: self.project_only,
            shortest: self.shortest,
            trace: self.trace.clone(),
        }
    }

    pub async fn execute(self, engine: Engine) -> Result<()> {
        engine.run(&self.request()).await
    }
}
