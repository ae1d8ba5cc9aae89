//! Ancestor chain discovery for descriptor documents.
//!
//! Two strategies, tried in order: ask the effective-model oracle for the
//! inheritance chain, and fall back to walking declared parent links by hand.
//! The manual walk is best-effort: an invalid, cyclic or out-of-bounds link
//! truncates the chain, it never fails the scan.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use pom::PomDocument;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::oracle::{EffectiveModelOracle, ModelBuildRequest};
use crate::project::ProjectModelFactory;

static RE_WINDOWS_PATH: Lazy<Regex> = Lazy::new(|| Regex::new("^[A-Za-z]:").expect("static pattern"));

/// Resolve the ancestor chain of `pom_path`, preferring the oracle and
/// falling back to the manual link walk when no model can be built.
pub fn scan_from(
    pom_path: &Path,
    top_level_dir: &Path,
    oracle: &dyn EffectiveModelOracle,
) -> Result<ProjectModelFactory> {
    let request = ModelBuildRequest {
        pom_path,
        offline: true,
        repository_path: None,
        active_profiles: Vec::new(),
        excluded_profiles: Vec::new(),
    };

    match oracle.build_model(&request) {
        Ok(model) => {
            let factory = ProjectModelFactory::load(pom_path)?;
            let mut parents = Vec::new();
            for path in &model.ancestor_pom_paths {
                match PomDocument::load(path) {
                    Ok(document) => parents.push(document),
                    Err(err) => {
                        warn!("skipping unreadable ancestor {}: {err}", path.display());
                    }
                }
            }
            Ok(factory.with_parent_pom_files(parents))
        }
        Err(err) => {
            debug!("effective model unavailable (you can ignore): {err}");
            legacy_scan_from(pom_path, top_level_dir)
        }
    }
}

/// Walk declared parent links starting at `pom_path`, accepting ancestors
/// until a link is rejected. The chain resolved so far is always returned.
pub fn legacy_scan_from(pom_path: &Path, top_level_dir: &Path) -> Result<ProjectModelFactory> {
    let pom_file = PomDocument::load(pom_path)?;
    let mut parent_pom_files: Vec<PomDocument> = Vec::new();

    let leaf_path = normalize_path(&absolute(pom_path));
    let top_level = normalize_path(&absolute(top_level_dir));

    let mut next_link = first_link(&pom_file, &leaf_path, &top_level);

    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(leaf_path.clone());
    let mut base_path = leaf_path;

    while let Some(link) = next_link.take() {
        if link.trim().is_empty() {
            break;
        }

        let link = fix_relative_link(link.trim());
        if !is_relative_link(&link) {
            warn!("not a relative link: {link}");
            break;
        }

        let base_dir = base_path.parent().unwrap_or(Path::new("."));
        let candidate = normalize_path(&base_dir.join(&link));

        if !visited.insert(candidate.clone()) {
            warn!("ancestor link loops back to {}", candidate.display());
            break;
        }
        match std::fs::metadata(&candidate) {
            Err(_) => {
                warn!("ancestor file does not exist: {}", candidate.display());
                break;
            }
            Ok(metadata) if metadata.len() == 0 => {
                warn!("ancestor file is empty: {}", candidate.display());
                break;
            }
            Ok(_) => {}
        }
        if !candidate.starts_with(&top_level) {
            warn!(
                "ancestor {} is outside the top level directory {}",
                candidate.display(),
                top_level.display()
            );
            break;
        }

        let mut new_document = match PomDocument::load(&candidate) {
            Ok(document) => document,
            Err(err) => {
                warn!("unreadable ancestor {}: {err}", candidate.display());
                break;
            }
        };

        // Backfill a parent link so the next iteration can keep walking.
        if let Some(parent) = new_document.root_mut().child_element_mut("parent") {
            if parent.child_element("relativePath").is_none() {
                parent.add_element("relativePath").set_text("../pom.xml");
            }
        }

        // The candidate must be the document the previous one points at.
        let my_artifact_id = new_document.artifact_id();
        let previous = parent_pom_files.last().unwrap_or(&pom_file);
        let referenced_artifact_id = previous
            .root()
            .child_element("parent")
            .and_then(|parent| parent.child_element("artifactId"))
            .map(|el| el.text_trim());
        match (&my_artifact_id, &referenced_artifact_id) {
            (Some(mine), Some(referenced)) if mine == referenced => {}
            _ => {
                warn!(
                    "parent reference mismatch: {my_artifact_id:?} vs {referenced_artifact_id:?}"
                );
                break;
            }
        }

        next_link = new_document
            .root()
            .child_element("parent")
            .and_then(|parent| parent.child_element("relativePath"))
            .map(|el| el.text());
        base_path = candidate;
        parent_pom_files.push(new_document);
    }

    Ok(ProjectModelFactory::new(pom_file).with_parent_pom_files(parent_pom_files))
}

/// The first link to follow from the leaf: its declared relativePath, or a
/// synthesized `../pom.xml` when a parent is referenced without one, unless
/// the leaf already sits at the top-level boundary.
fn first_link(pom_file: &PomDocument, leaf_path: &Path, top_level: &Path) -> Option<String> {
    let parent = pom_file.root().child_element("parent")?;
    match parent.child_element("relativePath") {
        Some(relative_path) => {
            let text = relative_path.text();
            if text.trim().is_empty() {
                // an explicitly empty relativePath disables the walk
                None
            } else {
                Some(text)
            }
        }
        None => {
            let leaf_dir = leaf_path.parent().unwrap_or(Path::new("."));
            if leaf_dir == top_level {
                None
            } else {
                Some("../pom.xml".to_string())
            }
        }
    }
}

/// Extension-less links denote a directory; point them at its default file.
fn fix_relative_link(text: &str) -> String {
    let file_name = Path::new(text)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if file_name.contains('.') {
        text.to_string()
    } else {
        format!("{text}/pom.xml")
    }
}

fn is_relative_link(link: &str) -> bool {
    if RE_WINDOWS_PATH.is_match(link) {
        return false;
    }
    !(link.starts_with('/') || link.starts_with('~'))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Lexical normalization: resolves `.` and `..` components without touching
/// the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    let mut parts: Vec<std::ffi::OsString> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => prefix.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(part) => parts.push(part.to_os_string()),
        }
    }
    let mut result = prefix;
    for part in parts {
        result.push(part);
    }
    dunce::simplified(&result).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_relative_link_appends_default_file() {
        assert_eq!(fix_relative_link(".."), "../pom.xml");
        assert_eq!(fix_relative_link("../core"), "../core/pom.xml");
        assert_eq!(fix_relative_link("../pom.xml"), "../pom.xml");
        // a dot anywhere in the last segment reads as a file name
        assert_eq!(fix_relative_link("../parent-v1.2"), "../parent-v1.2");
    }

    #[test]
    fn test_is_relative_link() {
        assert!(is_relative_link("../pom.xml"));
        assert!(is_relative_link("core/pom.xml"));
        assert!(!is_relative_link("/etc/pom.xml"));
        assert!(!is_relative_link("~/pom.xml"));
        assert!(!is_relative_link("C:\\poms\\pom.xml"));
    }

    #[test]
    fn test_normalize_path_resolves_dot_segments() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c/./pom.xml")),
            PathBuf::from("/a/c/pom.xml")
        );
        assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
    }
}
