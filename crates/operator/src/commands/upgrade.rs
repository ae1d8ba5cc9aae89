//! The version bump strategy: locate the single dependency node matching the
//! target coordinate and rewrite its version, either in place or through an
//! inherited property.

use once_cell::sync::Lazy;
use regex::Regex;

use pom::{PomDocument, XmlElement, XmlNode};

use crate::dependency::Dependency;
use crate::errors::{OperatorError, Result};
use crate::project::{DocumentId, ProjectModel};

static PROPERTY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{(.*)}$").expect("static pattern"));

pub fn execute(project_model: &mut ProjectModel) -> Result<bool> {
    let dependency = project_model
        .dependency
        .clone()
        .ok_or(OperatorError::MissingDependency)?;
    handle_dependency(project_model, &dependency)
}

fn handle_dependency(project_model: &mut ProjectModel, dependency: &Dependency) -> Result<bool> {
    {
        let root = project_model.pom_file().root();
        if matching_dependencies(root, dependency).count() != 1 {
            return Ok(false);
        }
        let Some(node) = matching_dependencies(root, dependency).next() else {
            return Ok(false);
        };
        if node.child_elements("version").count() != 1 {
            return Ok(false);
        }
    }

    let must_upgrade = if project_model.skip_if_newer {
        upgrade_is_needed(project_model, dependency)?
    } else {
        true
    };

    if must_upgrade {
        upgrade_version_node(project_model, dependency)?;
    }

    Ok(true)
}

/// With skip-if-newer, only strictly greater requested versions are applied.
fn upgrade_is_needed(project_model: &ProjectModel, dependency: &Dependency) -> Result<bool> {
    let requested_text = dependency
        .version
        .as_deref()
        .ok_or(OperatorError::MissingDependency)?;
    let current_text = version_node_text(project_model.pom_file(), dependency);
    let resolved = resolve_version_text(project_model, &current_text);

    let current = parse_version(&resolved)?;
    let requested = parse_version(requested_text)?;
    Ok(requested > current)
}

fn parse_version(value: &str) -> Result<semver::Version> {
    semver::Version::parse(value.trim()).map_err(|e| OperatorError::InvalidVersion {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Follow a `${name}` reference through the resolved property map; any other
/// text is returned as-is.
fn resolve_version_text(project_model: &ProjectModel, text: &str) -> String {
    if let Some(captures) = PROPERTY_REFERENCE.captures(text.trim()) {
        if let Some(value) = project_model.resolved_properties().get(&captures[1]) {
            return value.clone();
        }
    }
    text.trim().to_string()
}

fn upgrade_version_node(project_model: &mut ProjectModel, dependency: &Dependency) -> Result<()> {
    let requested = dependency
        .version
        .clone()
        .ok_or(OperatorError::MissingDependency)?;

    if project_model.use_properties {
        let current_text = version_node_text(project_model.pom_file(), dependency);
        let property_name = property_name_for(&current_text, dependency);
        upgrade_property(project_model, &property_name, &requested)?;
        set_version_node_text(project_model, dependency, &format!("${{{property_name}}}"));
    } else {
        set_version_node_text(project_model, dependency, &requested);
    }
    Ok(())
}

/// Reuse the referenced property name when the version is already a
/// reference, otherwise synthesize one from the artifact identifier.
fn property_name_for(current_text: &str, dependency: &Dependency) -> String {
    if let Some(captures) = PROPERTY_REFERENCE.captures(current_text) {
        return captures[1].to_string();
    }
    format!("versions.{}", dependency.artifact_id)
}

/// Set or create the property on the document whose definition wins
/// resolution, creating a properties container with matching indentation
/// when the document has none.
pub(crate) fn upgrade_property(
    project_model: &mut ProjectModel,
    property_name: &str,
    requested: &str,
) -> Result<()> {
    let owner = owning_document_for_property(project_model, property_name);
    let already_defined = document_defines_property(project_model.document(owner), property_name);

    if already_defined && !project_model.override_if_already_exists {
        let references = count_property_references(project_model, property_name)?;
        if references > 1 {
            return Err(OperatorError::PropertyConflict {
                property: property_name.to_string(),
            });
        }
    }

    let document = project_model.document_mut(owner);
    let indent = document.indent().to_owned();
    let endl = document.endl().to_owned();

    let mut changed = false;
    {
        let root = document.root_mut();
        if root.child_element("properties").is_none() {
            pom::add_indented_element(root, 0, &indent, &endl, "properties");
            changed = true;
        }
        if let Some(container) = root.child_element_mut("properties") {
            if container.child_element(property_name).is_none() {
                pom::add_indented_element(container, 1, &indent, &endl, property_name);
                changed = true;
            }
            if let Some(property) = container.child_element_mut(property_name) {
                if property.text_trim() != requested {
                    property.set_text(requested);
                    changed = true;
                }
            }
        }
    }
    if changed {
        document.set_dirty(true);
    }
    Ok(())
}

/// The document whose definition of `property_name` wins resolution: the last
/// one in chain order that defines it, else the last document of the chain.
fn owning_document_for_property(project_model: &ProjectModel, property_name: &str) -> DocumentId {
    let files = project_model.all_pom_files();
    let mut owner = None;
    for (index, document) in files.iter().enumerate() {
        if document_defines_property(document, property_name) {
            owner = Some(index);
        }
    }
    DocumentId(owner.unwrap_or(files.len() - 1))
}

fn document_defines_property(document: &PomDocument, property_name: &str) -> bool {
    document
        .root()
        .child_elements("properties")
        .any(|properties| properties.child_element(property_name).is_some())
}

/// Count literal `${name}` references across every serialized document of the
/// context.
fn count_property_references(project_model: &ProjectModel, property_name: &str) -> Result<usize> {
    let needle = format!("${{{property_name}}}");
    let mut count = 0;
    for document in project_model.all_pom_files() {
        count += document.serialize_to_string()?.matches(&needle).count();
    }
    Ok(count)
}

fn version_node_text(document: &PomDocument, dependency: &Dependency) -> String {
    matching_dependencies(document.root(), dependency)
        .next()
        .and_then(|node| node.child_element("version"))
        .map(|version| version.text_trim())
        .unwrap_or_default()
}

/// Rewrite the version node text, marking the leaf dirty only on change.
fn set_version_node_text(project_model: &mut ProjectModel, dependency: &Dependency, text: &str) {
    let document = project_model.pom_file_mut();
    let mut changed = false;
    if let Some(node) = find_matching_dependency_mut(document.root_mut(), dependency) {
        if let Some(version) = node.child_element_mut("version") {
            if version.text_trim() != text {
                version.set_text(text);
                changed = true;
            }
        }
    }
    if changed {
        document.set_dirty(true);
    }
}

pub(crate) fn dependency_matches(element: &XmlElement, dependency: &Dependency) -> bool {
    element
        .child_element("groupId")
        .map(|el| el.text_trim())
        .as_deref()
        == Some(dependency.group_id.as_str())
        && element
            .child_element("artifactId")
            .map(|el| el.text_trim())
            .as_deref()
            == Some(dependency.artifact_id.as_str())
}

/// Dependency entries of /project/dependencies matching group and artifact.
pub(crate) fn matching_dependencies<'a>(
    root: &'a XmlElement,
    dependency: &Dependency,
) -> impl Iterator<Item = &'a XmlElement> {
    root.child_elements("dependencies")
        .flat_map(|deps| deps.child_elements("dependency"))
        .filter(move |el| dependency_matches(el, dependency))
}

fn find_matching_dependency_mut<'a>(
    root: &'a mut XmlElement,
    dependency: &Dependency,
) -> Option<&'a mut XmlElement> {
    for child in root.children.iter_mut() {
        if let XmlNode::Element(deps) = child {
            if deps.name != "dependencies" {
                continue;
            }
            for node in deps.children.iter_mut() {
                if let XmlNode::Element(el) = node {
                    if el.name == "dependency" && dependency_matches(el, dependency) {
                        return Some(el);
                    }
                }
            }
        }
    }
    None
}
