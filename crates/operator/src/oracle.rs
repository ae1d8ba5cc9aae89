//! Boundary traits for the excluded collaborators: the effective-model
//! builder and the external build tool. The engine only depends on these
//! interfaces; the default implementations are permanently unavailable so
//! every chain falls through to its in-process strategies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dependency::Dependency;

#[derive(Debug, Clone)]
pub struct ModelBuildRequest<'a> {
    pub pom_path: &'a Path,
    pub offline: bool,
    pub repository_path: Option<&'a Path>,
    pub active_profiles: Vec<String>,
    pub excluded_profiles: Vec<String>,
}

/// What the oracle knows about a descriptor once a model has been built.
#[derive(Debug, Clone, Default)]
pub struct EffectiveModel {
    /// Ancestor descriptor locations in inheritance order, nearest parent
    /// first.
    pub ancestor_pom_paths: Vec<PathBuf>,
    /// Fully resolved effective properties.
    pub properties: HashMap<String, String>,
    /// Compiler plugin configuration blocks, option name to value.
    pub compiler_configurations: Vec<HashMap<String, String>>,
}

/// Both variants are non-fatal: callers fall back to another strategy.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("model not buildable: {0}")]
    ModelNotBuildable(String),
    #[error("no oracle is configured")]
    Unavailable,
}

pub trait EffectiveModelOracle {
    fn build_model(
        &self,
        request: &ModelBuildRequest<'_>,
    ) -> std::result::Result<EffectiveModel, OracleError>;
}

/// Default collaborator: every request falls through.
pub struct UnavailableOracle;

impl EffectiveModelOracle for UnavailableOracle {
    fn build_model(
        &self,
        _request: &ModelBuildRequest<'_>,
    ) -> std::result::Result<EffectiveModel, OracleError> {
        Err(OracleError::Unavailable)
    }
}

/// The form an external dependency query takes, in increasing trust and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationForm {
    Resolver,
    Invoker,
    Embedder,
}

#[derive(Debug, Clone)]
pub struct DependencyQueryRequest<'a> {
    pub pom_path: &'a Path,
    pub offline: bool,
    pub repository_path: Option<&'a Path>,
    pub active_profiles: Vec<String>,
    pub excluded_profiles: Vec<String>,
}

#[derive(Error, Debug)]
pub enum FacadeError {
    /// Non-fatal: the strategy yields an empty result.
    #[error("model not buildable: {0}")]
    ModelNotBuildable(String),
    /// Non-fatal: no build tool is wired in.
    #[error("no build tool is configured")]
    Unavailable,
    /// Fatal: the invoked process failed.
    #[error("build tool exited with status {0}")]
    ExitStatus(i32),
}

pub trait BuildToolFacade {
    fn run_dependency_query(
        &self,
        form: InvocationForm,
        request: &DependencyQueryRequest<'_>,
    ) -> std::result::Result<Vec<Dependency>, FacadeError>;
}

/// Default collaborator: every query form is unavailable.
pub struct NoBuildTool;

impl BuildToolFacade for NoBuildTool {
    fn run_dependency_query(
        &self,
        _form: InvocationForm,
        _request: &DependencyQueryRequest<'_>,
    ) -> std::result::Result<Vec<Dependency>, FacadeError> {
        Err(FacadeError::Unavailable)
    }
}
