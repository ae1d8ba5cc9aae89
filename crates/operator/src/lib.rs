//! # operator
//!
//! Resolution and mutation engine for Maven project descriptors.
//!
//! This crate provides:
//! - Ancestor chain discovery for a descriptor, oracle-assisted with a
//!   manual link-walking fallback
//! - Property resolution across a descriptor chain and its activated
//!   profiles, with per-name provenance
//! - A formatting-preserving dependency version bump, direct or through an
//!   inherited property
//! - Strategy chains for version and dependency queries with
//!   first-non-empty-wins semantics

pub mod chain;
pub mod commands;
pub mod dependency;
pub mod errors;
pub mod oracle;
pub mod project;
pub mod scanner;
pub mod version;


pub use chain::Chain;
pub use dependency::Dependency;
pub use errors::{OperatorError, Result};
pub use project::{
    DocumentId, ProjectModel, ProjectModelFactory, PropertyContribution, QueryType,
};
pub use version::{Kind, VersionDefinition, VersionQueryResponse};

use std::collections::BTreeSet;
use std::path::Path;

use chain::Collaborators;
use oracle::{BuildToolFacade, EffectiveModelOracle, NoBuildTool, UnavailableOracle};

/// Entry point owning the excluded collaborators. The defaults are
/// permanently unavailable, which keeps every operation on its in-process
/// strategies; callers wire in real implementations where they exist.
pub struct Operator {
    oracle: Box<dyn EffectiveModelOracle>,
    build_tool: Box<dyn BuildToolFacade>,
}

impl Default for Operator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator {
    pub fn new() -> Self {
        Self {
            oracle: Box::new(UnavailableOracle),
            build_tool: Box::new(NoBuildTool),
        }
    }

    pub fn with_oracle(mut self, oracle: Box<dyn EffectiveModelOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_build_tool(mut self, build_tool: Box<dyn BuildToolFacade>) -> Self {
        self.build_tool = build_tool;
        self
    }

    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            oracle: self.oracle.as_ref(),
            build_tool: self.build_tool.as_ref(),
        }
    }

    /// Bump the context's target dependency version. Returns whether any
    /// strategy handled the operation; finding nothing to act on is a
    /// result, not an error.
    pub fn modify(&self, project_model: &mut ProjectModel) -> Result<bool> {
        Chain::create_for_modify().execute(project_model, &self.collaborators())
    }

    /// Declare the context's target dependency when it is absent.
    pub fn insert(&self, project_model: &mut ProjectModel) -> Result<bool> {
        Chain::create_for_insert().execute(project_model, &self.collaborators())
    }

    /// Enumerate resolved dependency coordinates, using the chain selected
    /// by the context's query kind.
    pub fn query_dependencies(&self, project_model: &ProjectModel) -> Result<Vec<Dependency>> {
        Chain::create_for_dependency_query(project_model.query_type)
            .execute_dependency_query(project_model, &self.collaborators())
    }

    /// Discover the source/target language level of the descriptor chain.
    pub fn query_versions(
        &self,
        project_model: &ProjectModel,
    ) -> Result<Option<VersionQueryResponse>> {
        let definitions = self.query_version_definitions(project_model)?;
        version::combine_definitions(&definitions)
    }

    /// Raw version-definition view backing [`Operator::query_versions`].
    pub fn query_version_definitions(
        &self,
        project_model: &ProjectModel,
    ) -> Result<BTreeSet<VersionDefinition>> {
        Chain::create_for_version_query()
            .execute_version_query(project_model, &self.collaborators())
    }

    /// Resolve the ancestor chain for a descriptor file.
    pub fn scan_from(
        &self,
        pom_path: &Path,
        top_level_dir: &Path,
    ) -> Result<ProjectModelFactory> {
        scanner::scan_from(pom_path, top_level_dir, self.oracle.as_ref())
    }

    /// Resolve the ancestor chain by link-walking only.
    pub fn legacy_scan_from(
        &self,
        pom_path: &Path,
        top_level_dir: &Path,
    ) -> Result<ProjectModelFactory> {
        scanner::legacy_scan_from(pom_path, top_level_dir)
    }
}
