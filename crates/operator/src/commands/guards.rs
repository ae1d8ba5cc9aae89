//! Preconditions run ahead of the mutation strategies. Guards never handle
//! the operation themselves; they either pass (handled=false) or fail fast.

use crate::errors::{OperatorError, Result};
use crate::project::ProjectModel;

/// Invoking a mutation without a target coordinate is a programmer error.
pub fn check_dependency_present(project_model: &ProjectModel) -> Result<bool> {
    if project_model.dependency.is_none() {
        return Err(OperatorError::MissingDependency);
    }
    Ok(false)
}

/// Every ancestor of a multi-document context must declare pom packaging.
pub fn check_parent_packaging(project_model: &ProjectModel) -> Result<bool> {
    for parent in project_model.parent_pom_files() {
        let packaging = parent
            .root()
            .child_element("packaging")
            .map(|el| el.text_trim());
        if packaging.as_deref() != Some("pom") {
            return Err(OperatorError::WrongParentPackaging {
                path: parent.path().map(|p| p.to_path_buf()),
                found: packaging,
            });
        }
    }
    Ok(false)
}
