pub mod bump;
pub mod properties;
pub mod versions;

use std::path::{Path, PathBuf};

use anyhow::Result;
use operator::{Operator, ProjectModelFactory};

/// Scan the ancestor chain for `pom`, bounded by `top_level` or the
/// descriptor's own directory.
pub fn scan(
    operator: &Operator,
    pom: &Path,
    top_level: Option<&Path>,
) -> Result<ProjectModelFactory> {
    let default_top: PathBuf = pom
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let top = top_level.map(Path::to_path_buf).unwrap_or(default_top);
    Ok(operator.scan_from(pom, &top)?)
}
