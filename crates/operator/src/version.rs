//! Discovered language-level version settings and their combination rules.

use std::collections::BTreeSet;

use semver::Version;
use serde::Serialize;

use crate::errors::{OperatorError, Result};

/// Classification of a discovered version setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Kind {
    Source,
    Target,
    Release,
}

impl Kind {
    /// Property name this kind is recognized under.
    pub fn property_name(&self) -> &'static str {
        match self {
            Kind::Source => "maven.compiler.source",
            Kind::Target => "maven.compiler.target",
            Kind::Release => "maven.compiler.release",
        }
    }

    /// Compiler plugin configuration option this kind is recognized under.
    pub fn option_name(&self) -> &'static str {
        match self {
            Kind::Source => "source",
            Kind::Target => "target",
            Kind::Release => "release",
        }
    }

    pub fn for_property_name(name: &str) -> Option<Kind> {
        match name {
            "maven.compiler.source" => Some(Kind::Source),
            "maven.compiler.target" => Some(Kind::Target),
            "maven.compiler.release" => Some(Kind::Release),
            _ => None,
        }
    }

    pub fn for_option_name(name: &str) -> Option<Kind> {
        match name {
            "source" => Some(Kind::Source),
            "target" => Some(Kind::Target),
            "release" => Some(Kind::Release),
            _ => None,
        }
    }
}

/// A (kind, raw value) pair found in a descriptor chain. The derived ordering
/// (kind first, then value) is what deduplicates definitions inside a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VersionDefinition {
    pub kind: Kind,
    pub value: String,
}

impl VersionDefinition {
    pub fn new(kind: Kind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// The combined source/target answer of a version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionQueryResponse {
    pub source: Version,
    pub target: Version,
}

/// Map a raw short version string into canonical three-component form:
/// values starting with `1.` get `.0` appended, anything else `.0.0`.
pub fn map_version(value: &str) -> Result<Version> {
    let suffix = if value.starts_with("1.") { ".0" } else { ".0.0" };
    let fixed = format!("{value}{suffix}");
    Version::parse(&fixed).map_err(|e| OperatorError::InvalidVersion {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Collapse a deduplicated definition set into a single source/target pair.
/// Exactly {source, target} combine into a pair; a single definition of any
/// kind stands for both sides; a release definition alongside others, or
/// more than two definitions, is an inconsistency.
pub fn combine_definitions(
    definitions: &BTreeSet<VersionDefinition>,
) -> Result<Option<VersionQueryResponse>> {
    match definitions.len() {
        0 => Ok(None),
        1 => {
            let Some(only) = definitions.iter().next() else {
                return Ok(None);
            };
            let version = map_version(&only.value)?;
            Ok(Some(VersionQueryResponse {
                source: version.clone(),
                target: version,
            }))
        }
        2 => {
            if definitions.iter().any(|d| d.kind == Kind::Release) {
                return Err(OperatorError::VersionDefinitionClash(format!(
                    "unexpected combination: {definitions:?}"
                )));
            }
            let source = definitions
                .iter()
                .find(|d| d.kind == Kind::Source)
                .ok_or_else(|| {
                    OperatorError::VersionDefinitionClash("missing source version".to_string())
                })?;
            let target = definitions
                .iter()
                .find(|d| d.kind == Kind::Target)
                .ok_or_else(|| {
                    OperatorError::VersionDefinitionClash("missing target version".to_string())
                })?;
            Ok(Some(VersionQueryResponse {
                source: map_version(&source.value)?,
                target: map_version(&target.value)?,
            }))
        }
        _ => Err(OperatorError::VersionDefinitionClash(format!(
            "unexpected combination: {definitions:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_version_appends_minor_for_one_dot() {
        assert_eq!(map_version("1.8").unwrap(), Version::new(1, 8, 0));
    }

    #[test]
    fn test_map_version_appends_both_otherwise() {
        assert_eq!(map_version("17").unwrap(), Version::new(17, 0, 0));
        assert_eq!(map_version("11").unwrap(), Version::new(11, 0, 0));
    }

    #[test]
    fn test_definition_ordering_is_kind_then_value() {
        let mut set = BTreeSet::new();
        set.insert(VersionDefinition::new(Kind::Target, "1.8"));
        set.insert(VersionDefinition::new(Kind::Source, "1.8"));
        set.insert(VersionDefinition::new(Kind::Source, "1.8"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().kind, Kind::Source);
    }

    #[test]
    fn test_combine_pair() {
        let mut set = BTreeSet::new();
        set.insert(VersionDefinition::new(Kind::Source, "1.8"));
        set.insert(VersionDefinition::new(Kind::Target, "11"));
        let response = combine_definitions(&set).unwrap().unwrap();
        assert_eq!(response.source, Version::new(1, 8, 0));
        assert_eq!(response.target, Version::new(11, 0, 0));
    }

    #[test]
    fn test_combine_single_stands_for_both() {
        let mut set = BTreeSet::new();
        set.insert(VersionDefinition::new(Kind::Release, "17"));
        let response = combine_definitions(&set).unwrap().unwrap();
        assert_eq!(response.source, response.target);
        assert_eq!(response.source, Version::new(17, 0, 0));
    }

    #[test]
    fn test_combine_empty_is_none() {
        assert!(combine_definitions(&BTreeSet::new()).unwrap().is_none());
    }

    #[test]
    fn test_release_alongside_others_is_fatal() {
        let mut set = BTreeSet::new();
        set.insert(VersionDefinition::new(Kind::Source, "1.8"));
        set.insert(VersionDefinition::new(Kind::Release, "17"));
        assert!(matches!(
            combine_definitions(&set),
            Err(OperatorError::VersionDefinitionClash(_))
        ));

        set.insert(VersionDefinition::new(Kind::Target, "1.8"));
        assert!(matches!(
            combine_definitions(&set),
            Err(OperatorError::VersionDefinitionClash(_))
        ));
    }
}
