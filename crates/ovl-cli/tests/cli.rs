//! End-to-end runs of the `ovl` binary.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};

const DOC: &str = r##"{
  "elements": [
    { "id": 1, "type": "webcam", "subtype": "neon", "x": 40, "y": 40, "width": 480, "height": 270,
      "borderColor": "#00ff00", "borderWidth": 5 },
    { "id": 2, "type": "text", "content": "LIVE", "x": 600, "y": 60, "width": 300, "height": 120,
      "fontSize": 80, "fontFamily": "'Roboto', sans-serif", "color": "#ffffff" }
  ],
  "canvasSize": { "width": 640, "height": 360 },
  "updatedAt": 0
}"##;

fn ovl(args: &[&str], config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ovl"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("OVL_STORE_DIR")
        .env_remove("OVL_USER")
        .output()
        .expect("run ovl")
}

fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("layout.json");
    std::fs::write(&doc, DOC).unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"export":{"settle_delay_ms":0,"load_system_fonts":false}}"#,
    )
    .unwrap();
    (dir, doc, config)
}

#[test]
fn inspect_lists_elements() {
    let (_dir, doc, config) = setup();
    let out = ovl(&["inspect", doc.to_str().unwrap()], &config);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("canvas 640x360, 2 element(s)\n"));
    assert!(stdout.contains("camera"));
    assert!(stdout.contains("text"));
}

#[test]
fn export_writes_png_and_html() {
    let (dir, doc, config) = setup();
    let png = dir.path().join("overlay.png");
    let html = dir.path().join("overlay.html");
    let out = ovl(
        &[
            "export",
            doc.to_str().unwrap(),
            "--png",
            png.to_str().unwrap(),
            "--html",
            html.to_str().unwrap(),
        ],
        &config,
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 640);
    assert_eq!(u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]), 360);

    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("width:640px;height:360px;"));
    assert!(page.contains(">LIVE</div>"));
}

#[test]
fn export_finds_fonts_next_to_each_stylesheet() {
    let (dir, doc, config) = setup();
    let mut args = vec!["export".to_string(), doc.display().to_string()];
    for (sub, family) in [("a", "Alpha"), ("b", "Beta")] {
        let sub = dir.path().join(sub);
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("face.ttf"), b"not a real font").unwrap();
        let sheet = sub.join("fonts.css");
        std::fs::write(
            &sheet,
            format!("@font-face {{ font-family: '{family}'; src: url(face.ttf) format('truetype'); }}"),
        )
        .unwrap();
        args.push("--font-css".into());
        args.push(sheet.display().to_string());
    }
    let html = dir.path().join("overlay.html");
    args.push("--html".into());
    args.push(html.display().to_string());

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = Command::new(env!("CARGO_BIN_EXE_ovl"))
        .arg("--config")
        .arg(&config)
        .args(&args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run ovl");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(!String::from_utf8_lossy(&out.stderr).contains("skipping font"));

    let page = std::fs::read_to_string(&html).unwrap();
    let beta = dir.path().join("b").join("face.ttf");
    assert!(page.contains(&format!("url(\"{}\")", beta.display())));
}

#[test]
fn export_without_targets_fails() {
    let (_dir, doc, config) = setup();
    let out = ovl(&["export", doc.to_str().unwrap()], &config);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nothing to export"));
}

#[test]
fn store_save_then_load() {
    let (dir, doc, config) = setup();
    let store = dir.path().join("store");
    let store = store.to_str().unwrap();

    let out = ovl(
        &["store", "save", doc.to_str().unwrap(), "--dir", store, "--user", "streamer-1"],
        &config,
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("store/streamer-1.json").exists());

    let out = ovl(&["store", "load", "--dir", store, "--user", "streamer-1"], &config);
    assert!(out.status.success());
    let loaded: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(loaded["elements"].as_array().unwrap().len(), 2);
    assert_eq!(loaded["canvas_size"]["width"], 640);
}

#[test]
fn store_rejects_bad_user() {
    let (dir, doc, config) = setup();
    let store = dir.path().join("store");
    let out = ovl(
        &[
            "store",
            "save",
            doc.to_str().unwrap(),
            "--dir",
            store.to_str().unwrap(),
            "--user",
            "../escape",
        ],
        &config,
    );
    assert!(!out.status.success());
}
