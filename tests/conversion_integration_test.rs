use playbook_lang::{
    Compiler, ConversionEngine, ConversionRequest, EmitFormat, LocalStorage, PlaybookError,
    TomlConfig,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const PICK_AND_ROLL: &str = r#"
// high pick and roll
players = { p1, p2, p3 }
state = {
    baller = p1,
    position = {
        p1 = (0, -60)
        p2 = (20, -40)
        p3 = (-70, 10)
    },
}
action = {
    move = {
        p1 -> (-30, -20),
        p2 -> (10, 30),
    },
    screen = {
        p2 -> p1:before
    },
    pass = {
        p1 -> p2:after,
        p2 -> p3,
    },
}
"#;

#[tokio::test]
async fn test_end_to_end_svg_conversion() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("pnr.playbook"), PICK_AND_ROLL).unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let engine = ConversionEngine::new(storage, Compiler::default());
    let request = ConversionRequest::new("pnr.playbook", None, EmitFormat::Svg);

    let report = engine.run(&request).await.unwrap();
    assert_eq!(report.entities, 3);
    assert_eq!(report.interactions, 5);
    assert_eq!(report.warnings, 0);

    let svg = std::fs::read_to_string(temp_dir.path().join("pnr.svg")).unwrap();
    assert!(svg.starts_with("<svg width=\"500\" height=\"500\""));
    assert_eq!(svg.matches("stroke-dasharray=\"4\"").count(), 2);
    assert_eq!(svg.matches("stroke=\"blue\" stroke-width=\"4\"").count(), 1);
    // Screen meets p1 where p1 starts.
    assert!(svg.contains("<line x1=\"20\" y1=\"-40\" x2=\"0\" y2=\"-60\" stroke=\"blue\""));
    // The p2 -> p3 pass leaves from p2's end position.
    assert!(svg.contains("<line x1=\"10\" y1=\"30\" x2=\"-70\" y2=\"10\""));
    assert_eq!(svg.matches("fill=\"orange\"").count(), 1);
}

#[tokio::test]
async fn test_scene_json_with_explicit_output() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("pnr.playbook"), PICK_AND_ROLL).unwrap();

    let engine = ConversionEngine::new(LocalStorage::new(temp_dir.path()), Compiler::default());
    let request = ConversionRequest::new(
        "pnr.playbook",
        Some("build/diagrams/pnr.scene.json".into()),
        EmitFormat::Scene,
    );
    engine.run(&request).await.unwrap();

    let json = std::fs::read_to_string(temp_dir.path().join("build/diagrams/pnr.scene.json")).unwrap();
    let scene: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(scene["entities"][0]["label"], "1");
    assert_eq!(scene["entities"][0]["is_baller"], true);
    assert_eq!(scene["interactions"][4]["kind"], "screen");
}

#[tokio::test]
async fn test_config_file_drives_rendering() {
    let mut config_file = NamedTempFile::new().unwrap();
    config_file
        .write_all(
            br#"
[canvas]
width = 300
height = 300

[style]
pass_color = "crimson"

[compile]
strict = true
"#,
        )
        .unwrap();
    let config = TomlConfig::from_file(config_file.path()).unwrap();

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("pnr.playbook"), PICK_AND_ROLL).unwrap();
    std::fs::write(
        temp_dir.path().join("typo.playbook"),
        "players = { p1 } action = { pass = { p1 -> p7 } }",
    )
    .unwrap();

    let compiler = Compiler::new(config.render_settings()).with_strict(config.strict());
    let engine = ConversionEngine::new(LocalStorage::new(temp_dir.path()), compiler);

    engine
        .run(&ConversionRequest::new("pnr.playbook", None, EmitFormat::Svg))
        .await
        .unwrap();
    let svg = std::fs::read_to_string(temp_dir.path().join("pnr.svg")).unwrap();
    assert!(svg.starts_with("<svg width=\"300\" height=\"300\""));
    assert!(svg.contains("stroke=\"crimson\""));

    let err = engine
        .run(&ConversionRequest::new("typo.playbook", None, EmitFormat::Svg))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybookError::SemanticError { .. }));
    assert!(err.to_string().contains("'p7'"));
    assert!(!temp_dir.path().join("typo.svg").exists());
}

#[tokio::test]
async fn test_missing_input_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ConversionEngine::new(LocalStorage::new(temp_dir.path()), Compiler::default());

    let err = engine
        .run(&ConversionRequest::new("absent.playbook", None, EmitFormat::Svg))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybookError::IoError(_)));
}
