use assert_cmd::Command;
use predicates::prelude::*;

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.example</groupId>
  <artifactId>sample</artifactId>
  <version>1.0.0</version>
  <properties>
    <foo>base</foo>
  </properties>
  <profiles>
    <profile>
      <id>test-profile</id>
      <properties>
        <foo>bar</foo>
      </properties>
    </profile>
  </profiles>
  <dependencies>
    <dependency>
      <groupId>org.dom4j</groupId>
      <artifactId>dom4j</artifactId>
      <version>1.6.1</version>
    </dependency>
  </dependencies>
</project>
"#;

fn write_pom(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("pom.xml");
    std::fs::write(&path, POM).expect("write pom fixture");
    path
}

#[test]
fn bump_updates_a_descriptor_in_place() {
    let temp = tempfile::tempdir().unwrap();
    let pom_path = write_pom(temp.path());

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("bump")
        .arg(&pom_path)
        .arg("org.dom4j:dom4j:2.0.2")
        .assert()
        .success()
        .stdout(predicate::str::contains("updated 1 file(s)"));

    let written = std::fs::read_to_string(&pom_path).unwrap();
    assert!(written.contains("<version>2.0.2</version>"));
    assert!(!written.contains("1.6.1"));
}

#[test]
fn bump_dry_run_leaves_the_file_alone() {
    let temp = tempfile::tempdir().unwrap();
    let pom_path = write_pom(temp.path());

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("bump")
        .arg(&pom_path)
        .arg("org.dom4j:dom4j:2.0.2")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run, nothing written"));

    let written = std::fs::read_to_string(&pom_path).unwrap();
    assert!(written.contains("1.6.1"));
}

#[test]
fn bump_reports_undeclared_dependencies() {
    let temp = tempfile::tempdir().unwrap();
    let pom_path = write_pom(temp.path());

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("bump")
        .arg(&pom_path)
        .arg("org.example:absent:1.0.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));
}

#[test]
fn properties_honors_profile_activation() {
    let temp = tempfile::tempdir().unwrap();
    let pom_path = write_pom(temp.path());

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("properties")
        .arg(&pom_path)
        .arg("--profile")
        .arg("test-profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("foo=bar"));

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("properties")
        .arg(&pom_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("foo=base"));
}

#[test]
fn versions_reports_nothing_for_plain_descriptors() {
    let temp = tempfile::tempdir().unwrap();
    let pom_path = write_pom(temp.path());

    Command::cargo_bin("pombump")
        .unwrap()
        .arg("versions")
        .arg(&pom_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no language-level versions"));
}
