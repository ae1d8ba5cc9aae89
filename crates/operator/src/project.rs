//! The resolution context: one leaf descriptor, its ancestor chain, the
//! target coordinate and the operation flags, plus property resolution
//! across the chain and its activated profiles.

use std::collections::HashMap;
use std::path::PathBuf;

use pom::{PomDocument, XmlElement};

use crate::dependency::Dependency;
use crate::errors::Result;

/// Output query-kind selector. `Safe` keeps to API-backed strategies,
/// `Unsafe` also allows strategies that spawn external processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    #[default]
    None,
    Safe,
    Unsafe,
}

/// Identifies one document inside a resolution context; index 0 is the leaf,
/// ancestors follow nearest-parent-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub usize);

/// One property contribution: the declared value and the document it came
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyContribution {
    pub value: String,
    pub document: DocumentId,
}

/// The unit of work for one operation. Owned exclusively by the caller for
/// the duration of that operation.
pub struct ProjectModel {
    pom_file: PomDocument,
    parent_pom_files: Vec<PomDocument>,
    pub dependency: Option<Dependency>,
    pub skip_if_newer: bool,
    pub use_properties: bool,
    /// Profile names in declaration order; a leading `!` deactivates.
    pub active_profiles: Vec<String>,
    pub override_if_already_exists: bool,
    pub query_type: QueryType,
    pub repository_path: Option<PathBuf>,
    pub offline: bool,
    /// Set when a mutation strategy handled the operation.
    pub modified_by_command: bool,
    /// Name of the strategy that handled the operation.
    pub finished_by: Option<String>,
}

impl ProjectModel {
    pub fn pom_file(&self) -> &PomDocument {
        &self.pom_file
    }

    pub fn pom_file_mut(&mut self) -> &mut PomDocument {
        &mut self.pom_file
    }

    pub fn parent_pom_files(&self) -> &[PomDocument] {
        &self.parent_pom_files
    }

    /// Leaf first, then ancestors nearest-parent-first.
    pub fn all_pom_files(&self) -> Vec<&PomDocument> {
        let mut all = Vec::with_capacity(1 + self.parent_pom_files.len());
        all.push(&self.pom_file);
        all.extend(self.parent_pom_files.iter());
        all
    }

    pub fn document_count(&self) -> usize {
        1 + self.parent_pom_files.len()
    }

    pub fn document_ids(&self) -> Vec<DocumentId> {
        (0..self.document_count()).map(DocumentId).collect()
    }

    pub fn document(&self, id: DocumentId) -> &PomDocument {
        if id.0 == 0 {
            &self.pom_file
        } else {
            &self.parent_pom_files[id.0 - 1]
        }
    }

    pub fn document_mut(&mut self, id: DocumentId) -> &mut PomDocument {
        if id.0 == 0 {
            &mut self.pom_file
        } else {
            &mut self.parent_pom_files[id.0 - 1]
        }
    }

    /// Profile names declared active, in order, with deactivations dropped.
    pub fn activated_profiles(&self) -> Vec<String> {
        self.active_profiles
            .iter()
            .filter(|name| !name.starts_with('!'))
            .cloned()
            .collect()
    }

    /// Profile names forcefully deactivated (declared with a leading `!`).
    pub fn excluded_profiles(&self) -> Vec<String> {
        self.active_profiles
            .iter()
            .filter_map(|name| name.strip_prefix('!'))
            .map(str::to_string)
            .collect()
    }

    /// Flattened name-to-final-value view. Documents are merged in
    /// `all_pom_files` order with later documents overwriting earlier ones,
    /// and each document's activated-profile properties overwrite its base
    /// properties.
    pub fn resolved_properties(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        let activated = self.activated_profiles();
        for document in self.all_pom_files() {
            for (name, value) in base_properties(document) {
                result.insert(name, value);
            }
            for profile in &activated {
                for (name, value) in profile_properties(document, profile) {
                    result.insert(name, value);
                }
            }
        }
        result
    }

    /// Provenance view: for each property name, every contribution in
    /// contribution order (leaf document first).
    pub fn properties_defined_by_file(&self) -> HashMap<String, Vec<PropertyContribution>> {
        let mut result: HashMap<String, Vec<PropertyContribution>> = HashMap::new();
        let activated = self.activated_profiles();
        for (index, document) in self.all_pom_files().into_iter().enumerate() {
            let mut merged: Vec<(String, String)> = Vec::new();
            merge_pairs(&mut merged, base_properties(document));
            for profile in &activated {
                merge_pairs(&mut merged, profile_properties(document, profile));
            }
            for (name, value) in merged {
                result.entry(name).or_default().push(PropertyContribution {
                    value,
                    document: DocumentId(index),
                });
            }
        }
        result
    }
}

/// Base `<properties>` entries of a document, in document order.
fn base_properties(document: &PomDocument) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for properties in document.root().child_elements("properties") {
        for property in properties.elements() {
            pairs.push((property.name.clone(), property.text()));
        }
    }
    pairs
}

/// Properties declared by the named profile of a document.
fn profile_properties(document: &PomDocument, profile_name: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for profiles in document.root().child_elements("profiles") {
        for profile in profiles.child_elements("profile") {
            if !profile_has_id(profile, profile_name) {
                continue;
            }
            for properties in profile.child_elements("properties") {
                for property in properties.elements() {
                    pairs.push((property.name.clone(), property.text()));
                }
            }
        }
    }
    pairs
}

fn profile_has_id(profile: &XmlElement, name: &str) -> bool {
    profile
        .child_element("id")
        .map(|id| id.text_trim() == name)
        .unwrap_or(false)
}

/// Merge later pairs over earlier ones, keeping first-seen key positions.
fn merge_pairs(target: &mut Vec<(String, String)>, updates: Vec<(String, String)>) {
    for (name, value) in updates {
        if let Some(existing) = target.iter_mut().find(|(key, _)| *key == name) {
            existing.1 = value;
        } else {
            target.push((name, value));
        }
    }
}

/// Builder for a `ProjectModel`.
pub struct ProjectModelFactory {
    pom_file: PomDocument,
    parent_pom_files: Vec<PomDocument>,
    dependency: Option<Dependency>,
    skip_if_newer: bool,
    use_properties: bool,
    active_profiles: Vec<String>,
    override_if_already_exists: bool,
    query_type: QueryType,
    repository_path: Option<PathBuf>,
    offline: bool,
}

impl ProjectModelFactory {
    pub fn new(pom_file: PomDocument) -> Self {
        Self {
            pom_file,
            parent_pom_files: Vec::new(),
            dependency: None,
            skip_if_newer: false,
            use_properties: false,
            active_profiles: Vec::new(),
            override_if_already_exists: false,
            query_type: QueryType::default(),
            repository_path: None,
            offline: false,
        }
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(PomDocument::load(path)?))
    }

    pub fn with_parent_pom_files(mut self, parents: Vec<PomDocument>) -> Self {
        self.parent_pom_files = parents;
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency = Some(dependency);
        self
    }

    pub fn with_skip_if_newer(mut self, skip_if_newer: bool) -> Self {
        self.skip_if_newer = skip_if_newer;
        self
    }

    pub fn with_use_properties(mut self, use_properties: bool) -> Self {
        self.use_properties = use_properties;
        self
    }

    pub fn with_active_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override_if_already_exists(mut self, override_if_already_exists: bool) -> Self {
        self.override_if_already_exists = override_if_already_exists;
        self
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    pub fn with_repository_path(mut self, repository_path: PathBuf) -> Self {
        self.repository_path = Some(repository_path);
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn build(self) -> ProjectModel {
        ProjectModel {
            pom_file: self.pom_file,
            parent_pom_files: self.parent_pom_files,
            dependency: self.dependency,
            skip_if_newer: self.skip_if_newer,
            use_properties: self.use_properties,
            active_profiles: self.active_profiles,
            override_if_already_exists: self.override_if_already_exists,
            query_type: self.query_type,
            repository_path: self.repository_path,
            offline: self.offline,
            modified_by_command: false,
            finished_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: &str = r#"<project>
  <artifactId>child</artifactId>
  <properties>
    <foo>base</foo>
    <shared>from-child</shared>
  </properties>
  <profiles>
    <profile>
      <id>test-profile</id>
      <properties>
        <foo>bar</foo>
      </properties>
    </profile>
  </profiles>
</project>
"#;

    const PARENT: &str = r#"<project>
  <artifactId>parent</artifactId>
  <packaging>pom</packaging>
  <properties>
    <shared>from-parent</shared>
    <only.parent>yes</only.parent>
  </properties>
</project>
"#;

    fn model_with_profiles(profiles: &[&str]) -> ProjectModel {
        ProjectModelFactory::new(PomDocument::from_str(LEAF).unwrap())
            .with_active_profiles(profiles.iter().copied())
            .build()
    }

    #[test]
    fn test_profile_absent_keeps_base_value() {
        let model = model_with_profiles(&[]);
        assert_eq!(model.resolved_properties().get("foo").unwrap(), "base");
    }

    #[test]
    fn test_profile_activation_overrides_base_value() {
        let model = model_with_profiles(&["test-profile"]);
        assert_eq!(model.resolved_properties().get("foo").unwrap(), "bar");
    }

    #[test]
    fn test_profile_deactivation_keeps_base_value() {
        let model = model_with_profiles(&["!test-profile"]);
        assert_eq!(model.resolved_properties().get("foo").unwrap(), "base");
        assert_eq!(model.excluded_profiles(), vec!["test-profile"]);
        assert!(model.activated_profiles().is_empty());
    }

    #[test]
    fn test_later_documents_overwrite_in_flattened_view() {
        let model = ProjectModelFactory::new(PomDocument::from_str(LEAF).unwrap())
            .with_parent_pom_files(vec![PomDocument::from_str(PARENT).unwrap()])
            .build();
        let resolved = model.resolved_properties();
        assert_eq!(resolved.get("shared").unwrap(), "from-parent");
        assert_eq!(resolved.get("only.parent").unwrap(), "yes");
        assert_eq!(resolved.get("foo").unwrap(), "base");
    }

    #[test]
    fn test_provenance_keeps_leaf_contribution_first() {
        let model = ProjectModelFactory::new(PomDocument::from_str(LEAF).unwrap())
            .with_parent_pom_files(vec![PomDocument::from_str(PARENT).unwrap()])
            .build();
        let provenance = model.properties_defined_by_file();
        let shared = provenance.get("shared").unwrap();
        assert_eq!(shared.len(), 2);
        assert_eq!(shared[0].value, "from-child");
        assert_eq!(shared[0].document, DocumentId(0));
        assert_eq!(shared[1].value, "from-parent");
        assert_eq!(shared[1].document, DocumentId(1));
    }

    #[test]
    fn test_profile_contribution_replaces_base_within_document() {
        let model = model_with_profiles(&["test-profile"]);
        let provenance = model.properties_defined_by_file();
        let foo = provenance.get("foo").unwrap();
        assert_eq!(foo.len(), 1);
        assert_eq!(foo[0].value, "bar");
    }
}
