//! Ordered strategy execution.
//!
//! A chain runs its strategies in order against one resolution context.
//! Mutation chains stop at the first strategy that reports handled; query
//! chains stop at the first strategy that produced a non-empty result, and
//! the answer is taken from the last non-empty accumulator slot so that
//! later, higher-trust strategies win.

use std::collections::BTreeSet;

use crate::commands::{self, Command};
use crate::dependency::Dependency;
use crate::errors::Result;
use crate::oracle::{BuildToolFacade, EffectiveModelOracle, InvocationForm};
use crate::project::{ProjectModel, QueryType};
use crate::version::VersionDefinition;

/// The excluded collaborators, borrowed for the duration of one execution.
pub struct Collaborators<'a> {
    pub oracle: &'a dyn EffectiveModelOracle,
    pub build_tool: &'a dyn BuildToolFacade,
}

pub struct Chain {
    commands: Vec<Command>,
}

impl Chain {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Default mutation chain: guards, then the single bump strategy.
    pub fn create_for_modify() -> Self {
        Self::new(vec![
            Command::CheckDependencyPresent,
            Command::CheckParentPackaging,
            Command::SimpleUpgrade,
        ])
    }

    /// Mutation chain that declares the dependency when it is absent.
    pub fn create_for_insert() -> Self {
        Self::new(vec![
            Command::CheckDependencyPresent,
            Command::CheckParentPackaging,
            Command::SimpleInsert,
        ])
    }

    /// Query strategies in increasing trust and cost order.
    pub fn create_for_dependency_query(query_type: QueryType) -> Self {
        let commands = match query_type {
            QueryType::None => Vec::new(),
            QueryType::Safe => vec![Command::DependencyQuery(InvocationForm::Resolver)],
            QueryType::Unsafe => vec![
                Command::DependencyQuery(InvocationForm::Resolver),
                Command::DependencyQuery(InvocationForm::Invoker),
                Command::DependencyQuery(InvocationForm::Embedder),
            ],
        };
        Self::new(commands)
    }

    pub fn create_for_version_query() -> Self {
        Self::new(vec![
            Command::VersionByProperty,
            Command::VersionByEffectiveModel,
        ])
    }

    /// Run the chain in mutation mode. The first strategy that handles the
    /// operation stops the chain; none handling it is a result, not an error.
    pub fn execute(
        &self,
        project_model: &mut ProjectModel,
        collaborators: &Collaborators<'_>,
    ) -> Result<bool> {
        for command in &self.commands {
            if commands::execute_modify(command, project_model, collaborators)? {
                project_model.modified_by_command = true;
                project_model.finished_by = Some(command.name().to_string());
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Run the chain in query mode for dependency coordinates.
    pub fn execute_dependency_query(
        &self,
        project_model: &ProjectModel,
        collaborators: &Collaborators<'_>,
    ) -> Result<Vec<Dependency>> {
        let mut slots: Vec<Vec<Dependency>> = Vec::new();
        for command in &self.commands {
            let found = commands::execute_dependency_query(command, project_model, collaborators)?;
            let done = !found.is_empty();
            slots.push(found);
            if done {
                break;
            }
        }
        for slot in slots.into_iter().rev() {
            if !slot.is_empty() {
                return Ok(slot);
            }
        }
        Ok(Vec::new())
    }

    /// Run the chain in query mode for version definitions.
    pub fn execute_version_query(
        &self,
        project_model: &ProjectModel,
        collaborators: &Collaborators<'_>,
    ) -> Result<BTreeSet<VersionDefinition>> {
        let mut slots: Vec<BTreeSet<VersionDefinition>> = Vec::new();
        for command in &self.commands {
            let found = commands::execute_version_query(command, project_model, collaborators)?;
            let done = !found.is_empty();
            slots.push(found);
            if done {
                break;
            }
        }
        for slot in slots.into_iter().rev() {
            if !slot.is_empty() {
                return Ok(slot);
            }
        }
        Ok(BTreeSet::new())
    }
}
