use horadric_catalog::{YamlError, load_classes};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_yaml(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn load_class_from_yaml() {
    let tmp = TempDir::new().unwrap();
    let classes_dir = tmp.path().join("classes");
    fs::create_dir(&classes_dir).unwrap();

    write_yaml(
        &classes_dir,
        "barbarian.yaml",
        r#"
id: barbarian
name: Barbarian
short_name: bar
trees:
  - name: Combat Skills
    skills:
      - id: bash
        name: Bash
        required_level: 1
      - id: whirlwind
        name: Whirlwind
        required_level: 30
  - name: Warcries
    skills:
      - id: battle_orders
        name: Battle Orders
"#,
    );

    let classes = load_classes(&classes_dir).unwrap();
    assert_eq!(classes.len(), 1);
    let barb = &classes[0];
    assert_eq!(barb.id, "barbarian");
    assert_eq!(barb.short_name, "bar");
    assert_eq!(barb.trees.len(), 2);

    let skills: Vec<&str> = barb.skills().map(|s| s.id.as_str()).collect();
    assert_eq!(skills, vec!["bash", "whirlwind", "battle_orders"]);
    assert_eq!(barb.trees[1].skills[0].required_level, None);
}

#[test]
fn classes_load_in_file_name_order() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "sorceress.yaml", "id: sorceress\nname: Sorceress\nshort_name: sor\n");
    write_yaml(tmp.path(), "amazon.yml", "id: amazon\nname: Amazon\nshort_name: ama\n");
    write_yaml(tmp.path(), "notes.txt", "not yaml");

    let classes = load_classes(tmp.path()).unwrap();
    let ids: Vec<&str> = classes.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["amazon", "sorceress"]);
    assert!(classes[0].trees.is_empty());
}

#[test]
fn missing_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    let classes = load_classes(&tmp.path().join("nope")).unwrap();
    assert!(classes.is_empty());
}

#[test]
fn invalid_yaml_reports_path() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "broken.yaml", "id: [unclosed\n");

    let err = load_classes(tmp.path()).unwrap_err();
    match err {
        YamlError::Parse { path, .. } => assert!(path.ends_with("broken.yaml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn shipped_class_data_is_complete() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../catalog/classes");
    let classes = load_classes(&dir).unwrap();
    assert_eq!(classes.len(), 7);

    let mut ids = std::collections::HashSet::new();
    for class in &classes {
        assert_eq!(class.trees.len(), 3, "{}", class.name);
        assert_eq!(class.skills().count(), 30, "{}", class.name);
        assert_eq!(class.short_name.len(), 3);
        for skill in class.skills() {
            assert!(ids.insert(skill.id.clone()), "duplicate skill id {}", skill.id);
        }
    }
}
