use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::json;

fn joi_typegen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_joi-typegen"))
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn project(optics: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut outputs = json!({
        "types": "src/generated/types.ts",
        "utils": "src/generated/utils.ts",
        "library": "src/generated/library.ts"
    });
    if optics {
        outputs["optics"] = json!("src/generated/optics");
    }
    let package = json!({
        "name": "fixture",
        "joiTypegen": {
            "input": "build/schemas.json",
            "schemas": "src/schemas",
            "nullableMode": "option",
            "outputs": outputs
        }
    });
    std::fs::write(dir.path().join("package.json"), package.to_string()).unwrap();

    let schemas = json!({
        "JobSchema": {
            "type": "object",
            "children": { "title": { "type": "string", "flags": { "presence": "required" } } }
        },
        "PersonSchema": {
            "type": "object",
            "children": {
                "name": { "type": "string" },
                "job": { "$ref": "JobSchema" }
            }
        }
    });
    std::fs::create_dir_all(dir.path().join("build")).unwrap();
    std::fs::write(dir.path().join("build/schemas.json"), schemas.to_string()).unwrap();
    dir
}

#[test]
fn generate_writes_every_artifact() {
    let dir = project(true);
    let out = joi_typegen(dir.path(), &["generate"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let generated = dir.path().join("src/generated");
    for file in ["types.ts", "utils.ts", "library.ts", "optics/jobLenses.generated.ts", "optics/personLenses.generated.ts"] {
        assert!(generated.join(file).is_file(), "missing {file}");
    }
    let types = std::fs::read_to_string(generated.join("types.ts")).unwrap();
    assert!(types.contains("export interface Person {\n  name: Option<string>;\n  job: Option<Job>;\n}\n"));
}

#[test]
fn types_prints_to_stdout_and_matches_generate() {
    let dir = project(false);
    let out = joi_typegen(dir.path(), &["types"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(!dir.path().join("src").exists());

    let generate = joi_typegen(dir.path(), &["generate"]);
    assert!(generate.status.success());
    let written = std::fs::read_to_string(dir.path().join("src/generated/types.ts")).unwrap();
    // println! adds one trailing newline
    assert_eq!(String::from_utf8_lossy(&out.stdout), format!("{written}\n"));
}

#[test]
fn inspect_writes_the_type_list() {
    let dir = project(false);
    let out = joi_typegen(dir.path(), &["inspect", "-o", "types.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let listed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("types.json")).unwrap()).unwrap();
    let names: Vec<&str> = listed.as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Job", "Person"]);
    assert_eq!(listed[0]["class"]["kind"], "interface");
}

#[test]
fn failures_leave_no_partial_output() {
    let dir = project(true);
    std::fs::write(
        dir.path().join("build/schemas.json"),
        json!({
            "GoodSchema": { "type": "string" },
            "BadSchema": {
                "type": "object",
                "children": { "inner": { "type": "object", "children": { "x": { "type": "number" } } } }
            }
        })
        .to_string(),
    )
    .unwrap();

    let out = joi_typegen(dir.path(), &["generate"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Bad.inner"));
    assert!(!dir.path().join("src").exists());
}

#[test]
fn unwritable_output_directory_writes_nothing() {
    let dir = project(true);
    let generated = dir.path().join("src/generated");
    std::fs::create_dir_all(&generated).unwrap();
    // optics directory is blocked by a plain file
    std::fs::write(generated.join("optics"), "").unwrap();

    let out = joi_typegen(dir.path(), &["generate"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("optics"));
    let mut left: Vec<String> = std::fs::read_dir(&generated)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, ["optics"]);
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = joi_typegen(dir.path(), &["generate", "--config", "nope.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope.json"));
}
