//! Strategies that enumerate resolved dependency coordinates. Each form
//! delegates to the external build-tool facade; the forms only differ in
//! trust level and cost.

use tracing::debug;

use crate::dependency::Dependency;
use crate::errors::{OperatorError, Result};
use crate::oracle::{BuildToolFacade, DependencyQueryRequest, FacadeError, InvocationForm};
use crate::project::ProjectModel;

pub fn execute(
    form: InvocationForm,
    project_model: &ProjectModel,
    build_tool: &dyn BuildToolFacade,
) -> Result<Vec<Dependency>> {
    let Some(pom_path) = project_model.pom_file().path() else {
        debug!("document has no backing file, skipping {form:?} query");
        return Ok(Vec::new());
    };

    let request = DependencyQueryRequest {
        pom_path,
        offline: project_model.offline,
        repository_path: project_model.repository_path.as_deref(),
        active_profiles: project_model.activated_profiles(),
        excluded_profiles: project_model.excluded_profiles(),
    };

    match build_tool.run_dependency_query(form, &request) {
        Ok(found) => Ok(found),
        Err(FacadeError::ModelNotBuildable(reason)) => {
            debug!("model not buildable (you can ignore): {reason}");
            Ok(Vec::new())
        }
        Err(FacadeError::Unavailable) => {
            debug!("no build tool configured for {form:?} query");
            Ok(Vec::new())
        }
        Err(FacadeError::ExitStatus(code)) => Err(OperatorError::ExternalProcessFailure { code }),
    }
}
