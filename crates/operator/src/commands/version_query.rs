//! Strategies that discover language-level version settings.

use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::Result;
use crate::oracle::{EffectiveModelOracle, ModelBuildRequest};
use crate::project::ProjectModel;
use crate::version::{Kind, VersionDefinition};

/// Scan the provenance map for recognized property names, keeping the first
/// contribution per name.
pub fn by_property(project_model: &ProjectModel) -> Result<BTreeSet<VersionDefinition>> {
    let mut found = BTreeSet::new();
    for (name, contributions) in project_model.properties_defined_by_file() {
        let Some(kind) = Kind::for_property_name(&name) else {
            continue;
        };
        if let Some(first) = contributions.first() {
            found.insert(VersionDefinition::new(kind, first.value.clone()));
        }
    }
    Ok(found)
}

/// Ask the oracle for effective properties and compiler plugin configuration
/// and scan both against the recognized name tables. Oracle failures are
/// an empty result, never an error.
pub fn by_effective_model(
    project_model: &ProjectModel,
    oracle: &dyn EffectiveModelOracle,
) -> Result<BTreeSet<VersionDefinition>> {
    let Some(pom_path) = project_model.pom_file().path() else {
        debug!("document has no backing file, skipping effective model query");
        return Ok(BTreeSet::new());
    };

    let request = ModelBuildRequest {
        pom_path,
        offline: project_model.offline,
        repository_path: project_model.repository_path.as_deref(),
        active_profiles: project_model.activated_profiles(),
        excluded_profiles: project_model.excluded_profiles(),
    };

    let model = match oracle.build_model(&request) {
        Ok(model) => model,
        Err(err) => {
            debug!("effective model unavailable (you can ignore): {err}");
            return Ok(BTreeSet::new());
        }
    };

    let mut found = BTreeSet::new();
    for configuration in &model.compiler_configurations {
        for (option, value) in configuration {
            if let Some(kind) = Kind::for_option_name(option) {
                found.insert(VersionDefinition::new(kind, value.clone()));
            }
        }
    }
    for (name, value) in &model.properties {
        if let Some(kind) = Kind::for_property_name(name) {
            found.insert(VersionDefinition::new(kind, value.clone()));
        }
    }
    Ok(found)
}
