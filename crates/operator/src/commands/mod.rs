//! The closed set of strategies a chain can run.

pub mod dependency_query;
pub mod guards;
pub mod insert;
pub mod upgrade;
pub mod version_query;

use std::collections::BTreeSet;

use crate::chain::Collaborators;
use crate::dependency::Dependency;
use crate::errors::Result;
use crate::oracle::InvocationForm;
use crate::project::ProjectModel;
use crate::version::VersionDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckDependencyPresent,
    CheckParentPackaging,
    SimpleUpgrade,
    SimpleInsert,
    VersionByProperty,
    VersionByEffectiveModel,
    DependencyQuery(InvocationForm),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CheckDependencyPresent => "check-dependency-present",
            Command::CheckParentPackaging => "check-parent-packaging",
            Command::SimpleUpgrade => "simple-upgrade",
            Command::SimpleInsert => "simple-insert",
            Command::VersionByProperty => "version-by-property",
            Command::VersionByEffectiveModel => "version-by-effective-model",
            Command::DependencyQuery(InvocationForm::Resolver) => "query-by-resolver",
            Command::DependencyQuery(InvocationForm::Invoker) => "query-by-invoker",
            Command::DependencyQuery(InvocationForm::Embedder) => "query-by-embedder",
        }
    }
}

pub(crate) fn execute_modify(
    command: &Command,
    project_model: &mut ProjectModel,
    _collaborators: &Collaborators<'_>,
) -> Result<bool> {
    match command {
        Command::CheckDependencyPresent => guards::check_dependency_present(project_model),
        Command::CheckParentPackaging => guards::check_parent_packaging(project_model),
        Command::SimpleUpgrade => upgrade::execute(project_model),
        Command::SimpleInsert => insert::execute(project_model),
        // query strategies never handle a mutation
        _ => Ok(false),
    }
}

pub(crate) fn execute_dependency_query(
    command: &Command,
    project_model: &ProjectModel,
    collaborators: &Collaborators<'_>,
) -> Result<Vec<Dependency>> {
    match command {
        Command::DependencyQuery(form) => {
            dependency_query::execute(*form, project_model, collaborators.build_tool)
        }
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn execute_version_query(
    command: &Command,
    project_model: &ProjectModel,
    collaborators: &Collaborators<'_>,
) -> Result<BTreeSet<VersionDefinition>> {
    match command {
        Command::VersionByProperty => version_query::by_property(project_model),
        Command::VersionByEffectiveModel => {
            version_query::by_effective_model(project_model, collaborators.oracle)
        }
        _ => Ok(BTreeSet::new()),
    }
}
