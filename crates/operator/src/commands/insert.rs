//! The insertion strategy: declare the target dependency when the document
//! does not carry it yet. The coordinate is added both under
//! dependencyManagement (with its version) and under the plain dependencies
//! section, creating the containers with matching indentation as needed.

use pom::{XmlElement, XmlNode};

use crate::commands::upgrade;
use crate::dependency::Dependency;
use crate::errors::{OperatorError, Result};
use crate::project::ProjectModel;

pub fn execute(project_model: &mut ProjectModel) -> Result<bool> {
    let dependency = project_model
        .dependency
        .clone()
        .ok_or(OperatorError::MissingDependency)?;
    let requested = dependency
        .version
        .clone()
        .ok_or(OperatorError::MissingDependency)?;

    let indent = project_model.pom_file().indent().to_owned();
    let endl = project_model.pom_file().endl().to_owned();

    // managed entry, carrying the version node
    {
        let document = project_model.pom_file_mut();
        let root = document.root_mut();
        if root.child_element("dependencyManagement").is_none() {
            let management = pom::add_indented_element(root, 0, &indent, &endl, "dependencyManagement");
            pom::add_indented_element(management, 1, &indent, &endl, "dependencies");
        } else if let Some(management) = root.child_element_mut("dependencyManagement") {
            if management.child_element("dependencies").is_none() {
                pom::add_indented_element(management, 1, &indent, &endl, "dependencies");
            }
        }
        if let Some(management) = root.child_element_mut("dependencyManagement") {
            if let Some(dependencies) = management.child_element_mut("dependencies") {
                let entry = append_coordinates(dependencies, 2, &indent, &endl, &dependency);
                pom::add_indented_element(entry, 3, &indent, &endl, "version");
            }
        }
        document.set_dirty(true);
    }

    // write the version, honoring property mode
    if project_model.use_properties {
        let property_name = format!("versions.{}", dependency.artifact_id);
        upgrade::upgrade_property(project_model, &property_name, &requested)?;
        set_managed_version_text(
            project_model,
            &dependency,
            &format!("${{{property_name}}}"),
        );
    } else {
        set_managed_version_text(project_model, &dependency, &requested);
    }

    // plain entry, version inherited from the managed one
    {
        let document = project_model.pom_file_mut();
        let root = document.root_mut();
        if root.child_elements("dependencies").count() > 1 {
            return Err(OperatorError::DuplicateDependenciesSection);
        }
        if root.child_element("dependencies").is_none() {
            pom::add_indented_element(root, 0, &indent, &endl, "dependencies");
        }
        if let Some(dependencies) = root.child_element_mut("dependencies") {
            append_coordinates(dependencies, 1, &indent, &endl, &dependency);
        }
        document.set_dirty(true);
    }

    Ok(true)
}

/// Create a dependency entry carrying groupId and artifactId. `depth` is the
/// nesting depth of the dependencies container.
fn append_coordinates<'a>(
    dependencies: &'a mut XmlElement,
    depth: usize,
    indent: &str,
    endl: &str,
    dependency: &Dependency,
) -> &'a mut XmlElement {
    let entry = pom::add_indented_element(dependencies, depth, indent, endl, "dependency");
    let group = pom::add_indented_element(entry, depth + 1, indent, endl, "groupId");
    group.set_text(dependency.group_id.as_str());
    let artifact = pom::add_indented_element(entry, depth + 1, indent, endl, "artifactId");
    artifact.set_text(dependency.artifact_id.as_str());
    entry
}

fn set_managed_version_text(
    project_model: &mut ProjectModel,
    dependency: &Dependency,
    text: &str,
) {
    let document = project_model.pom_file_mut();
    let mut changed = false;
    if let Some(management) = document.root_mut().child_element_mut("dependencyManagement") {
        if let Some(dependencies) = management.child_element_mut("dependencies") {
            for node in dependencies.children.iter_mut() {
                if let XmlNode::Element(el) = node {
                    if el.name == "dependency" && upgrade::dependency_matches(el, dependency) {
                        if let Some(version) = el.child_element_mut("version") {
                            if version.text_trim() != text {
                                version.set_text(text);
                                changed = true;
                            }
                        }
                        break;
                    }
                }
            }
        }
    }
    if changed {
        document.set_dirty(true);
    }
}
