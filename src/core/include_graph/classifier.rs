// src/core/include_graph/classifier.rs
use std::path::{Component, Path, PathBuf};

use crate::config::{ClassificationConfig, ClassificationPolicy};
use super::IncludeNode;

/// Decides whether a node belongs to the toolchain rather than the project.
///
/// Only used to filter output, never to change the tree.
#[derive(Debug, Clone)]
pub enum SystemClassifier {
    /// Relative paths and paths under `root` are project headers
    ProjectRoot { root: PathBuf },
    /// Paths containing a marker or starting with a prefix are system headers
    PathMarkers {
        markers: Vec<String>,
        prefixes: Vec<String>,
    },
}

impl SystemClassifier {
    /// `fallback_root` is used when the config does not declare a project
    /// root, and a relative configured root is resolved against it
    pub fn from_config(config: &ClassificationConfig, fallback_root: &Path) -> Self {
        match config.policy {
            ClassificationPolicy::ProjectRoot => {
                let root = match &config.project_root {
                    Some(root) if root.is_relative() => fallback_root.join(root),
                    Some(root) => root.clone(),
                    None => fallback_root.to_path_buf(),
                };
                Self::ProjectRoot {
                    root: normalize(&root),
                }
            }
            ClassificationPolicy::PathMarkers => Self::PathMarkers {
                markers: config.system_markers.clone(),
                prefixes: config.system_prefixes.clone(),
            },
        }
    }

    pub fn is_system(&self, node: &IncludeNode) -> bool {
        self.is_system_path(&node.full_path)
    }

    pub fn is_system_path(&self, full_path: &str) -> bool {
        match self {
            Self::ProjectRoot { root } => {
                let path = Path::new(full_path);
                path.is_absolute() && !normalize(path).starts_with(root)
            }
            Self::PathMarkers { markers, prefixes } => {
                markers.iter().any(|marker| full_path.contains(marker.as_str()))
                    || prefixes.iter().any(|prefix| full_path.starts_with(prefix.as_str()))
            }
        }
    }
}

/// Lexically drop `.` components and fold `..` into its parent, without
/// touching the filesystem. `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
