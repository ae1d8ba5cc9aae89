//! Dependency coordinates as declared in a descriptor.

use std::fmt;

use serde::Serialize;

use crate::errors::{OperatorError, Result};

/// One dependency coordinate. Equality is structural over all six fields.
/// A coordinate without a version identifies a query target, not a mutation
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub packaging: String,
    pub scope: String,
}

impl Dependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            classifier: None,
            packaging: "jar".to_string(),
            scope: "compile".to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Parse a `group:artifact:version` coordinate string. Trailing segments
    /// beyond the first three are ignored.
    pub fn from_coordinate_string(coordinate: &str) -> Result<Self> {
        let parts: Vec<&str> = coordinate.split(':').collect();
        if parts.len() < 3 || parts.iter().take(3).any(|part| part.is_empty()) {
            return Err(OperatorError::InvalidCoordinate(coordinate.to_string()));
        }
        Ok(Self::new(parts[0], parts[1]).with_version(parts[2]))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.packaging, version
            ),
            None => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dependency = Dependency::new("org.dom4j", "dom4j");
        assert_eq!(dependency.packaging, "jar");
        assert_eq!(dependency.scope, "compile");
        assert!(dependency.version.is_none());
    }

    #[test]
    fn test_from_coordinate_string() {
        let dependency = Dependency::from_coordinate_string("org.dom4j:dom4j:2.0.3").unwrap();
        assert_eq!(dependency.group_id, "org.dom4j");
        assert_eq!(dependency.artifact_id, "dom4j");
        assert_eq!(dependency.version.as_deref(), Some("2.0.3"));
        assert_eq!(dependency.to_string(), "org.dom4j:dom4j:jar:2.0.3");
    }

    #[test]
    fn test_coordinate_string_needs_three_segments() {
        assert!(matches!(
            Dependency::from_coordinate_string("org.dom4j:dom4j"),
            Err(OperatorError::InvalidCoordinate(_))
        ));
        assert!(Dependency::from_coordinate_string("a:b:").is_err());
    }

    #[test]
    fn test_structural_equality() {
        let left = Dependency::new("g", "a").with_version("1.0.0");
        let right = Dependency::new("g", "a").with_version("1.0.0");
        assert_eq!(left, right);
        assert_ne!(left, right.clone().with_scope("test"));
    }
}
