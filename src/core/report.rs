// src/core/report.rs
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::Result;
use super::include_graph::{DuplicateInclude, LevelsAnswer, WhatAnswer, WhyAnswer};

/// Separator between names of an inclusion chain
pub const CHAIN_SEPARATOR: &str = " → ";

/// Renders query answers for the terminal or as JSON
pub struct ReportRenderer {
    format: OutputFormat,
}

#[derive(Serialize)]
struct DuplicatesReport<'a> {
    duplicates: &'a [DuplicateInclude],
}

impl ReportRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn why(&self, answer: &WhyAnswer) -> Result<Vec<String>> {
        match self.format {
            OutputFormat::Json => json_lines(answer),
            OutputFormat::Text => {
                if let Some(line) = nothing_found(&answer.query, answer.matched, answer.hidden, 0) {
                    return Ok(vec![line]);
                }
                Ok(answer
                    .chains
                    .iter()
                    .map(|chain| chain.names.join(CHAIN_SEPARATOR))
                    .collect())
            }
        }
    }

    pub fn what(&self, answer: &WhatAnswer) -> Result<Vec<String>> {
        match self.format {
            OutputFormat::Json => json_lines(answer),
            OutputFormat::Text => {
                if let Some(line) =
                    nothing_found(&answer.query, answer.matched, answer.hidden, answer.reserved)
                {
                    return Ok(vec![line]);
                }
                Ok(answer
                    .subtrees
                    .iter()
                    .flat_map(|subtree| subtree.lines.iter())
                    .map(|line| format!("{}{}", "  ".repeat(line.depth), line.name))
                    .collect())
            }
        }
    }

    pub fn levels(&self, answer: &LevelsAnswer) -> Result<Vec<String>> {
        match self.format {
            OutputFormat::Json => json_lines(answer),
            OutputFormat::Text => {
                if answer.levels.is_empty() {
                    return Ok(vec![format!("No include named '{}' found", answer.query)]);
                }
                Ok(answer
                    .levels
                    .iter()
                    .map(|depth| format!("include: {} found at level: {}", answer.query, depth))
                    .collect())
            }
        }
    }

    pub fn duplicates(&self, duplicates: &[DuplicateInclude]) -> Result<Vec<String>> {
        match self.format {
            OutputFormat::Json => json_lines(&DuplicatesReport { duplicates }),
            OutputFormat::Text => {
                if duplicates.is_empty() {
                    return Ok(vec!["No duplicate includes found".to_string()]);
                }
                Ok(duplicates
                    .iter()
                    .map(|duplicate| format!("{}: {} times", duplicate.name, duplicate.count))
                    .collect())
            }
        }
    }
}

/// The informational line for a query that produced nothing to show,
/// worded by why the matches were dropped
fn nothing_found(query: &str, matched: usize, hidden: usize, reserved: usize) -> Option<String> {
    if matched == 0 {
        return Some(format!("No include named '{}' found", query));
    }
    if hidden + reserved < matched {
        return None;
    }

    let line = match (hidden, reserved) {
        (_, 0) => format!(
            "No project include named '{}' found ({} system matches hidden)",
            query, hidden
        ),
        (0, _) => format!(
            "No include named '{}' shown ({} reserved matches hidden)",
            query, reserved
        ),
        _ => format!(
            "No project include named '{}' found ({} system matches hidden, {} reserved matches hidden)",
            query, hidden, reserved
        ),
    };
    Some(line)
}

fn json_lines<T: Serialize>(value: &T) -> Result<Vec<String>> {
    Ok(vec![serde_json::to_string_pretty(value)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::include_graph::{IncludeChain, Subtree, SubtreeLine};

    fn why_answer(chains: Vec<Vec<&str>>, matched: usize, hidden: usize) -> WhyAnswer {
        WhyAnswer {
            query: "b.h".to_string(),
            matched,
            hidden,
            chains: chains
                .into_iter()
                .map(|names| IncludeChain {
                    full_path: names.last().unwrap().to_string(),
                    names: names.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_why_text() {
        let renderer = ReportRenderer::new(OutputFormat::Text);
        let answer = why_answer(
            vec![vec!["main.cpp", "a.h", "b.h"], vec!["main.cpp", "c.h", "b.h"]],
            2,
            0,
        );

        assert_eq!(
            renderer.why(&answer).unwrap(),
            vec!["main.cpp → a.h → b.h", "main.cpp → c.h → b.h"]
        );
    }

    #[test]
    fn test_not_found_lines() {
        let renderer = ReportRenderer::new(OutputFormat::Text);

        let missing = WhyAnswer {
            query: "zzz".to_string(),
            ..why_answer(vec![], 0, 0)
        };
        assert_eq!(renderer.why(&missing).unwrap(), vec!["No include named 'zzz' found"]);

        let all_hidden = why_answer(vec![], 2, 2);
        assert_eq!(
            renderer.why(&all_hidden).unwrap(),
            vec!["No project include named 'b.h' found (2 system matches hidden)"]
        );

        let empty_what = WhatAnswer {
            query: "zzz".to_string(),
            matched: 0,
            hidden: 0,
            reserved: 0,
            subtrees: vec![],
        };
        assert_eq!(renderer.what(&empty_what).unwrap(), vec!["No include named 'zzz' found"]);
    }

    #[test]
    fn test_hidden_matches_are_explained_by_cause() {
        let renderer = ReportRenderer::new(OutputFormat::Text);
        let what = |matched, hidden, reserved| WhatAnswer {
            query: "__shim.h".to_string(),
            matched,
            hidden,
            reserved,
            subtrees: vec![],
        };

        assert_eq!(
            renderer.what(&what(1, 0, 1)).unwrap(),
            vec!["No include named '__shim.h' shown (1 reserved matches hidden)"]
        );
        assert_eq!(
            renderer.what(&what(2, 2, 0)).unwrap(),
            vec!["No project include named '__shim.h' found (2 system matches hidden)"]
        );
        assert_eq!(
            renderer.what(&what(3, 1, 2)).unwrap(),
            vec!["No project include named '__shim.h' found (1 system matches hidden, 2 reserved matches hidden)"]
        );
    }

    #[test]
    fn test_what_text_indents_by_depth() {
        let renderer = ReportRenderer::new(OutputFormat::Text);
        let answer = WhatAnswer {
            query: "a.h".to_string(),
            matched: 1,
            hidden: 0,
            reserved: 0,
            subtrees: vec![Subtree {
                full_path: "a.h".to_string(),
                lines: vec![
                    SubtreeLine { depth: 0, name: "a.h".to_string() },
                    SubtreeLine { depth: 1, name: "b.h".to_string() },
                    SubtreeLine { depth: 2, name: "c.h".to_string() },
                ],
            }],
        };

        assert_eq!(renderer.what(&answer).unwrap(), vec!["a.h", "  b.h", "    c.h"]);
    }

    #[test]
    fn test_levels_text() {
        let renderer = ReportRenderer::new(OutputFormat::Text);
        let answer = LevelsAnswer {
            query: "vector".to_string(),
            levels: vec![1, 3],
        };

        assert_eq!(
            renderer.levels(&answer).unwrap(),
            vec!["include: vector found at level: 1", "include: vector found at level: 3"]
        );

        let empty = LevelsAnswer {
            query: "zzz".to_string(),
            levels: vec![],
        };
        assert_eq!(renderer.levels(&empty).unwrap(), vec!["No include named 'zzz' found"]);
    }

    #[test]
    fn test_duplicates_text() {
        let renderer = ReportRenderer::new(OutputFormat::Text);
        let duplicates = vec![DuplicateInclude { name: "b.h".to_string(), count: 2 }];

        assert_eq!(renderer.duplicates(&duplicates).unwrap(), vec!["b.h: 2 times"]);
        assert_eq!(renderer.duplicates(&[]).unwrap(), vec!["No duplicate includes found"]);
    }

    #[test]
    fn test_json_output() {
        let renderer = ReportRenderer::new(OutputFormat::Json);
        let duplicates = vec![DuplicateInclude { name: "b.h".to_string(), count: 2 }];

        let lines = renderer.duplicates(&duplicates).unwrap();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["duplicates"][0]["name"], "b.h");
        assert_eq!(value["duplicates"][0]["count"], 2);

        let answer = why_answer(vec![vec!["main.cpp", "b.h"]], 1, 0);
        let value: serde_json::Value = serde_json::from_str(&renderer.why(&answer).unwrap()[0]).unwrap();
        assert_eq!(value["matched"], 1);
        assert_eq!(value["chains"][0]["names"][1], "b.h");
    }
}
