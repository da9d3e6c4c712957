//! End-to-end export tests
//!
//! Each test feeds a JSON scene document through the full pipeline and
//! inspects the unit and mesh files written to a temporary directory.

use tempfile::TempDir;

use unitforge_core::ExportOptions;
use unitforge_export::build_and_serialize;
use unitforge_scene::SceneDocument;

fn document(json: &str) -> SceneDocument {
    serde_json::from_str(json).expect("test document must parse")
}

fn export(doc: &SceneDocument, options: &ExportOptions) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let unit_path = dir.path().join("level.unit");
    build_and_serialize(doc, options, &unit_path).unwrap();
    let unit = std::fs::read_to_string(&unit_path).unwrap();
    (dir, unit)
}

/// A quad mesh object with one UV layer, for reuse across scenarios
fn quad_object(name: &str, parent: Option<&str>) -> String {
    let parent = match parent {
        Some(p) => format!("\"{}\"", p),
        None => "null".to_string(),
    };
    format!(
        r#"{{
            "name": "{name}",
            "kind": "mesh",
            "parent": {parent},
            "geometry": {{
                "positions": [[0,0,0],[1,0,0],[1,1,0],[0,1,0]],
                "faces": [ {{
                    "corners": [0,1,2,3],
                    "uvs": [ {{ "slot": 0, "corners": [[0,0],[1,0],[1,1],[0,1]] }} ]
                }} ]
            }}
        }}"#
    )
}

#[test]
fn single_empty_exports_identity_node() {
    let doc = document(r#"{ "objects": [ { "name": "Root", "kind": "empty" } ] }"#);
    let (_dir, unit) = export(&doc, &ExportOptions::default());

    assert!(unit.starts_with("nodes = ["));
    assert!(unit.contains("type = \"EMPTY\""));
    assert!(unit.contains("name = \"Root\""));
    assert!(unit.contains("fully_qualified_name = \"Root\""));
    assert!(unit.contains("parent = -1"));
    assert!(unit.contains("position = [ 0 0 0 ]"));
    assert!(unit.contains("rotation = [ 1 0 0 0 ]"));
    assert!(unit.contains("scale = [ 1 1 1 ]"));
}

#[test]
fn quad_mesh_exports_expected_declaration() {
    let doc = document(&format!(
        r#"{{ "objects": [ {} ] }}"#,
        quad_object("Panel", None)
    ));
    let options = ExportOptions {
        export_tangents: false,
        ..Default::default()
    };
    let (dir, unit) = export(&doc, &options);

    assert!(unit.contains("type = \"MESH\""));

    let mesh = std::fs::read_to_string(dir.path().join("level/Panel.mesh")).unwrap();
    let lines: Vec<&str> = mesh.lines().collect();
    assert_eq!(lines[0], "0"); // no materials
    assert_eq!(lines[1], "3"); // declaration size
    assert_eq!(&lines[2..5], &["POSITION", "TEXCOORD0", "NORMAL"]);
    assert_eq!(lines[5], "4"); // vertices
    assert_eq!(lines[6], "6"); // indices: quad split into two triangles

    // Two triangles along the (0,2) diagonal close the file.
    assert_eq!(&lines[lines.len() - 2..], &["0 1 2", "0 2 3"]);
}

#[test]
fn tangent_export_adds_trailing_channels() {
    let doc = document(&format!(
        r#"{{ "objects": [ {} ] }}"#,
        quad_object("Panel", None)
    ));
    let (dir, _unit) = export(&doc, &ExportOptions::default());

    let mesh = std::fs::read_to_string(dir.path().join("level/Panel.mesh")).unwrap();
    let lines: Vec<&str> = mesh.lines().collect();
    assert_eq!(lines[1], "5");
    assert_eq!(
        &lines[2..7],
        &["POSITION", "TEXCOORD0", "NORMAL", "TANGENT", "BITANGENT"]
    );
}

#[test]
fn zero_face_mesh_exports_as_empty() {
    let doc = document(
        r#"{ "objects": [ {
            "name": "Husk",
            "kind": "mesh",
            "geometry": { "positions": [[0,0,0]], "faces": [] }
        } ] }"#,
    );
    let (dir, unit) = export(&doc, &ExportOptions::default());

    assert!(unit.contains("type = \"EMPTY\""));
    assert!(!unit.contains("type = \"MESH\""));
    assert!(!dir.path().join("level/Husk.mesh").exists());
}

#[test]
fn bone_weights_are_capped_and_renormalized() {
    let doc = document(
        r#"{ "objects": [ {
            "name": "Arm",
            "kind": "mesh",
            "geometry": {
                "positions": [[0,0,0],[1,0,0],[0,1,0]],
                "faces": [ { "corners": [0,1,2] } ],
                "weights": [ { "bones": [0,1,2,3,4],
                               "weights": [0.1,0.5,0.3,0.05,0.05] } ]
            }
        } ] }"#,
    );
    let graph =
        unitforge_scene::build_graph(&doc, &ExportOptions::default()).unwrap();

    let index = graph.index_of("Arm").unwrap();
    let unitforge_scene::NodeKind::Mesh(mesh) = &graph.node(index).kind else {
        panic!("expected a mesh node");
    };
    let bones = mesh.vertices[0].bones.as_ref().unwrap();
    assert_eq!(bones.weights.len(), 4);
    let sum: f32 = bones.weights.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    // One of the two tied weakest influences was dropped.
    let dropped = [3u32, 4]
        .iter()
        .filter(|&b| !bones.indices.contains(b))
        .count();
    assert_eq!(dropped, 1);
}

#[test]
fn hierarchy_assigns_parent_ids_before_children() {
    let doc = document(&format!(
        r#"{{ "objects": [
            {{ "name": "Ship", "kind": "empty" }},
            {},
            {}
        ] }}"#,
        quad_object("Hull", Some("Ship")),
        quad_object("Turret", Some("Hull"))
    ));
    let (dir, unit) = export(&doc, &ExportOptions::default());

    // Parse back (id, parent) pairs in file order.
    let parents: Vec<i64> = unit
        .lines()
        .filter_map(|line| line.trim().strip_prefix("parent = "))
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(parents.len(), 3);
    for (id, &parent) in parents.iter().enumerate() {
        assert!(parent < id as i64);
    }

    // Mesh files mirror the dotted paths as directories.
    assert!(dir.path().join("level/Ship/Hull.mesh").exists());
    assert!(dir.path().join("level/Ship/Hull/Turret.mesh").exists());
}

#[test]
fn reexport_removes_stale_mesh_files() {
    let dir = TempDir::new().unwrap();
    let unit_path = dir.path().join("level.unit");

    // Previous export left a mesh that no longer exists in the scene.
    let stale = dir.path().join("level/Old");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("Gone.mesh"), "stale").unwrap();

    let doc = document(&format!(
        r#"{{ "objects": [ {} ] }}"#,
        quad_object("Panel", None)
    ));
    build_and_serialize(&doc, &ExportOptions::default(), &unit_path).unwrap();

    assert!(!stale.join("Gone.mesh").exists());
    assert!(dir.path().join("level/Panel.mesh").exists());
}

#[test]
fn zero_rotation_exports_identity_pose() {
    let doc = document(
        r#"{ "objects": [ {
            "name": "Prop",
            "kind": "empty",
            "transform": { "rotation": [0, 0, 0, 0] }
        } ] }"#,
    );
    let (_dir, unit) = export(&doc, &ExportOptions::default());

    assert!(!unit.contains("NaN"));
    assert!(unit.contains("rotation = [ 1 0 0 0 ]"));
}

#[test]
fn duplicate_names_abort_the_export() {
    let doc = document(
        r#"{ "objects": [
            { "name": "Root", "kind": "empty" },
            { "name": "Root", "kind": "empty" }
        ] }"#,
    );
    let dir = TempDir::new().unwrap();
    let err = build_and_serialize(
        &doc,
        &ExportOptions::default(),
        dir.path().join("level.unit"),
    )
    .unwrap_err();
    assert!(err.is_scene_error());
    assert!(!dir.path().join("level.unit").exists());
}

#[test]
fn colliding_fully_qualified_paths_abort_the_export() {
    // A root literally named "A.B" collides with B's path under A.
    let doc = document(
        r#"{ "objects": [
            { "name": "A.B", "kind": "empty" },
            { "name": "A", "kind": "empty" },
            { "name": "B", "kind": "empty", "parent": "A" }
        ] }"#,
    );
    let dir = TempDir::new().unwrap();
    let err = build_and_serialize(
        &doc,
        &ExportOptions::default(),
        dir.path().join("level.unit"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        unitforge_core::Error::DuplicateNodePath { .. }
    ));
}
