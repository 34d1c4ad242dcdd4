// src/core/include_graph/trace_parser.rs
use regex::Regex;
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::config::TraceConfig;
use crate::error::{IncludeGraphError, Result};

/// One structural trace line: a header entered at `depth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub depth: usize,
    pub path: String,
}

impl TraceEntry {
    /// Build an entry, rejecting an empty path
    pub fn new(depth: usize, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(IncludeGraphError::InvalidTraceEntry {
                depth,
                reason: "empty include path".to_string(),
            });
        }
        Ok(Self { depth, path })
    }
}

/// Parses `clang -H` style lines: `<marker>+ <path>`, where the number of
/// markers is the nesting depth of the header.
///
/// Anything else (warnings, "Multiple include guards may be useful for:",
/// blank lines) is noise and yields `None`.
pub struct TraceLineParser {
    line_regex: Regex,
}

impl TraceLineParser {
    pub fn new(config: &TraceConfig) -> Result<Self> {
        let marker = regex::escape(&config.depth_marker.to_string());
        let line_regex = Regex::new(&format!(r"^((?:{marker})+)\s+(\S.*)$"))
            .map_err(|e| IncludeGraphError::Config(format!("invalid depth marker: {}", e)))?;

        Ok(Self { line_regex })
    }

    /// Parse a single line of the trace
    pub fn parse_line(&self, line: &str) -> Option<TraceEntry> {
        let line = line.trim();
        let Some(caps) = self.line_regex.captures(line) else {
            if !line.is_empty() {
                trace!("Skipping non-structural trace line: {}", line);
            }
            return None;
        };

        let depth = caps.get(1)?.as_str().chars().count();
        let path = caps.get(2)?.as_str().trim_end();

        TraceEntry::new(depth, path).ok()
    }

    /// Parse a whole captured trace, keeping emission order
    pub fn parse_trace<'a>(&'a self, text: &'a str) -> impl Iterator<Item = TraceEntry> + 'a {
        text.lines().filter_map(move |line| self.parse_line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_parser() -> TraceLineParser {
        TraceLineParser::new(&TraceConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_structural_lines() {
        let parser = default_parser();

        assert_eq!(
            parser.parse_line(". /usr/include/c++/13/vector"),
            Some(TraceEntry { depth: 1, path: "/usr/include/c++/13/vector".to_string() })
        );
        assert_eq!(
            parser.parse_line("... ./include/b.h  "),
            Some(TraceEntry { depth: 3, path: "./include/b.h".to_string() })
        );
        // Paths containing spaces are kept whole
        assert_eq!(
            parser.parse_line(".. /home/me/My Project/a.h"),
            Some(TraceEntry { depth: 2, path: "/home/me/My Project/a.h".to_string() })
        );
    }

    #[test]
    fn test_noise_is_skipped() {
        let parser = default_parser();

        assert_eq!(parser.parse_line(""), None);
        assert_eq!(parser.parse_line("garbage output from tool"), None);
        assert_eq!(parser.parse_line("Multiple include guards may be useful for:"), None);
        assert_eq!(parser.parse_line("./a.h:3:10: warning: unused variable"), None);
        assert_eq!(parser.parse_line("..."), None);
        assert_eq!(parser.parse_line("1 warning generated."), None);
    }

    #[test]
    fn test_custom_marker() {
        let parser = TraceLineParser::new(&TraceConfig { depth_marker: '+' }).unwrap();

        assert_eq!(
            parser.parse_line("++ sub/c.h"),
            Some(TraceEntry { depth: 2, path: "sub/c.h".to_string() })
        );
        assert_eq!(parser.parse_line(". a.h"), None);
    }

    #[test]
    fn test_parse_trace_keeps_order() {
        let parser = default_parser();
        let trace = ". a.h\n.. b.h\nIn file included from main.cpp:1:\n. c.h\n.. b.h\n";

        let entries: Vec<(usize, String)> = parser
            .parse_trace(trace)
            .map(|entry| (entry.depth, entry.path))
            .collect();

        assert_eq!(
            entries,
            vec![
                (1, "a.h".to_string()),
                (2, "b.h".to_string()),
                (1, "c.h".to_string()),
                (2, "b.h".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let err = TraceEntry::new(2, "   ").unwrap_err();
        assert!(matches!(err, IncludeGraphError::InvalidTraceEntry { depth: 2, .. }));
    }
}
