// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use super::compiler::{self, CompilerInvocation};
use super::include_graph::{IncludeGraph, QueryEngine, SystemClassifier, TraceLineParser, TreeBuilder};
use super::report::ReportRenderer;

/// Question asked about the include graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryCommand {
    /// Show every inclusion chain that leads to a header
    Why,
    /// Show everything a header pulls in
    What,
    /// Show the nesting levels at which a path fragment is included
    Levels,
    /// List headers included more than once
    Duplicates,
}

/// One run of the tool: which file, which question
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Translation unit being analyzed (the root of the tree)
    pub source: PathBuf,
    pub command: QueryCommand,
    pub name: Option<String>,
    pub project_only: bool,
    /// Only report the shortest chain (`why`)
    pub shortest: bool,
    /// Use an already captured trace instead of running the compiler
    pub trace: Option<PathBuf>,
}

/// Main orchestration engine: trace capture, tree construction, queries
pub struct Engine {
    config: Config,
    parser: TraceLineParser,
    compiler: CompilerInvocation,
    classifier: SystemClassifier,
    renderer: ReportRenderer,
    working_dir: PathBuf,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        let working_dir = std::env::current_dir().context("Failed to determine working directory")?;
        Self::with_working_dir(config, working_dir)
    }

    /// Create an engine that runs the compiler in `working_dir` and resolves
    /// a missing or relative project root against it
    pub fn with_working_dir(config: Config, working_dir: PathBuf) -> Result<Self> {
        debug!("Loaded configuration: {:?}", config);

        let parser = TraceLineParser::new(&config.trace)?;
        let compiler = CompilerInvocation::new(&config.compiler);
        let classifier = SystemClassifier::from_config(&config.classification, &working_dir);
        let renderer = ReportRenderer::new(config.output.format);

        Ok(Self {
            config,
            parser,
            compiler,
            classifier,
            renderer,
            working_dir,
        })
    }

    /// Answer `request` and print the result to stdout
    pub async fn run(&self, request: &QueryRequest) -> Result<()> {
        let graph = self.load_graph(&request.source, request.trace.as_deref()).await?;
        for line in self.answer(&graph, request)? {
            println!("{}", line);
        }
        Ok(())
    }

    /// Obtain the trace for `source` and build its include tree
    pub async fn load_graph(&self, source: &Path, trace: Option<&Path>) -> Result<IncludeGraph> {
        let text = match trace {
            Some(path) => {
                info!("Reading include trace from {}", path.display());
                compiler::read_trace(path)
                    .await
                    .with_context(|| format!("Failed to read trace {}", path.display()))?
            }
            None => {
                if !source.exists() {
                    bail!("Path: {} does not exist", source.display());
                }
                info!("Tracing includes of {} with {}", source.display(), self.compiler.program());
                self.compiler
                    .capture_trace(source, &self.working_dir)
                    .await
                    .with_context(|| format!("Failed to trace includes of {}", source.display()))?
            }
        };

        let graph = self.build_graph(source, &text);

        let summary = QueryEngine::new(&graph, &self.classifier, &self.config.query).summary();
        info!("{}", summary.root);
        info!("    {} headers included (unique)", summary.unique_headers);
        info!("    {} headers reachable from multiple paths", summary.duplicated_headers);
        if summary.roots > 1 {
            info!("    {} extra roots from a malformed trace", summary.roots - 1);
        }

        Ok(graph)
    }

    /// Build the tree for `source` from captured trace text
    pub fn build_graph(&self, source: &Path, trace: &str) -> IncludeGraph {
        TreeBuilder::build(source.to_string_lossy(), self.parser.parse_trace(trace))
    }

    /// Run the requested query against a finished graph
    pub fn answer(&self, graph: &IncludeGraph, request: &QueryRequest) -> Result<Vec<String>> {
        let queries = QueryEngine::new(graph, &self.classifier, &self.config.query);

        let lines = match request.command {
            QueryCommand::Why => {
                let name = required_name(request)?;
                let answer = if request.shortest {
                    queries.shortest_why(name, request.project_only)
                } else {
                    queries.why(name, request.project_only)
                };
                self.renderer.why(&answer)?
            }
            QueryCommand::What => {
                let name = required_name(request)?;
                self.renderer.what(&queries.what(name, request.project_only))?
            }
            QueryCommand::Levels => {
                let name = required_name(request)?;
                self.renderer.levels(&queries.levels_including(name, request.project_only))?
            }
            QueryCommand::Duplicates => self.renderer.duplicates(&queries.duplicates())?,
        };

        Ok(lines)
    }
}

fn required_name(request: &QueryRequest) -> Result<&str> {
    match request.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => bail!("{:?} requires a header name", request.command),
    }
}
