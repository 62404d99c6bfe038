//! `ovl`: inspect, export and store overlay layouts from the shell.

mod fonts;

use clap::{Args, Parser, Subcommand};
use fonts::LocalFontSource;
use ovl_core::{EditorConfig, LayoutDocument, ModelError, Scene, now_millis};
use ovl_editor::{CloudError, CloudSync, EditorSession};
use ovl_export::{
    ExportConfig, ExportEngine, ExportError, FontSource, ResvgCapture,
    prepare_font_bundle,
};
use ovl_store::{FileStore, StoreError, UserId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layout: {0}")]
    Model(#[from] ModelError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Cloud(#[from] CloudError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("nothing to export; pass --png and/or --html")]
    NothingToExport,
}

/// `--config` file contents. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CliConfig {
    editor: EditorConfig,
    export: ExportConfig,
}

#[derive(Parser, Debug)]
#[command(name = "ovl", version, about = "Overlay layout toolkit")]
struct Cli {
    /// JSON file with `editor` and `export` settings.
    #[arg(long, global = true, env = "OVL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a layout document and list its elements.
    Inspect { document: PathBuf },
    /// Render a layout document to PNG and/or HTML.
    Export(ExportArgs),
    /// Save or load layouts in a directory-backed store.
    Store(StoreCommand),
}

#[derive(Args, Debug)]
struct ExportArgs {
    document: PathBuf,

    #[arg(long)]
    png: Option<PathBuf>,

    #[arg(long)]
    html: Option<PathBuf>,

    /// Local @font-face stylesheet to inline (repeatable).
    #[arg(long = "font-css")]
    font_css: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct StoreCommand {
    #[command(subcommand)]
    command: StoreSubcommand,
}

#[derive(Subcommand, Debug)]
enum StoreSubcommand {
    Save {
        document: PathBuf,
        #[arg(long, env = "OVL_STORE_DIR")]
        dir: PathBuf,
        #[arg(long, env = "OVL_USER")]
        user: String,
    },
    Load {
        #[arg(long, env = "OVL_STORE_DIR")]
        dir: PathBuf,
        #[arg(long, env = "OVL_USER")]
        user: String,
        /// Write the document here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => serde_json::from_str(&read_text(path).await?)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Command::Inspect { document } => run_inspect(&document).await,
        Command::Export(args) => run_export(&config, args).await,
        Command::Store(store) => run_store(&config, store).await,
    }
}

async fn read_text(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_scene(path: &Path) -> Result<Scene, CliError> {
    let doc = LayoutDocument::from_json(&read_text(path).await?)?;
    Ok(doc.into_scene()?)
}

fn session_with(config: &CliConfig, scene: Scene) -> Result<EditorSession, CliError> {
    let mut session = EditorSession::new(config.editor.clone());
    session.load_scene(scene)?;
    Ok(session)
}

// ─── inspect ────────────────────────────────────────────────────────────

async fn run_inspect(path: &Path) -> Result<(), CliError> {
    let scene = read_scene(path).await?;
    print!("{}", summarize(&scene));
    Ok(())
}

fn summarize(scene: &Scene) -> String {
    let mut out = format!(
        "canvas {}x{}, {} element(s)\n",
        scene.canvas_size.width,
        scene.canvas_size.height,
        scene.len()
    );
    for el in &scene.elements {
        let (w, h) = el.resolved_size();
        out.push_str(&format!(
            "  {:<6} {:<7} at ({}, {}) size {}x{} opacity {}\n",
            el.id.to_string(),
            el.kind_name(),
            el.x,
            el.y,
            w,
            h,
            el.opacity
        ));
    }
    out
}

// ─── export ─────────────────────────────────────────────────────────────

async fn run_export(config: &CliConfig, args: ExportArgs) -> Result<(), CliError> {
    if args.png.is_none() && args.html.is_none() {
        return Err(CliError::NothingToExport);
    }

    let mut session = session_with(config, read_scene(&args.document).await?)?;
    let fonts = LocalFontSource::new(args.font_css);
    let engine = ExportEngine::new(config.export.clone());
    write_exports(
        &engine,
        &mut session,
        &fonts,
        args.png.as_deref(),
        args.html.as_deref(),
    )
    .await
}

async fn write_exports<S: FontSource + ?Sized>(
    engine: &ExportEngine<ResvgCapture>,
    session: &mut EditorSession,
    fonts: &S,
    png: Option<&Path>,
    html: Option<&Path>,
) -> Result<(), CliError> {
    // One bundle feeds both outputs; only the raster waits for the settle delay
    let bundle = if png.is_some() {
        engine.prepare(fonts).await
    } else {
        prepare_font_bundle(fonts).await
    };

    if let Some(out) = png {
        let image = engine.capture_raster(session, &bundle)?;
        tokio::fs::write(out, &image.bytes).await?;
        println!("wrote {} ({}x{})", out.display(), image.width, image.height);
    }

    if let Some(out) = html {
        let doc = engine.export_html(session.scene(), Some(&bundle));
        tokio::fs::write(out, doc.html).await?;
        println!("wrote {}", out.display());
    }

    Ok(())
}

// ─── store ──────────────────────────────────────────────────────────────

async fn run_store(config: &CliConfig, store: StoreCommand) -> Result<(), CliError> {
    match store.command {
        StoreSubcommand::Save {
            document,
            dir,
            user,
        } => {
            let user = UserId::new(user)?;
            let session = session_with(config, read_scene(&document).await?)?;
            let cloud = CloudSync::new(FileStore::new(dir));
            cloud
                .save(session.gate(), Some(&user), &session.to_document(now_millis()))
                .await?;
            println!("saved layout for {user}");
            Ok(())
        }
        StoreSubcommand::Load { dir, user, out } => {
            let user = UserId::new(user)?;
            let session = EditorSession::new(config.editor.clone());
            let cloud = CloudSync::new(FileStore::new(dir));
            let Some(scene) = cloud.load(session.gate(), Some(&user)).await? else {
                println!("no saved layout for {user}");
                return Ok(());
            };
            let json = LayoutDocument::from_scene(&scene, now_millis()).to_json()?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    println!("wrote {}", path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovl_core::{CameraStyle, Element, ElementId};
    use ovl_export::FontError;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_lists_elements() {
        let mut scene = Scene::new();
        scene
            .elements
            .push(Element::camera(ElementId::from_raw(7), CameraStyle::Neon));
        assert_eq!(
            summarize(&scene),
            "canvas 1920x1080, 1 element(s)\n  #7     camera  at (50, 50) size 480x270 opacity 1\n"
        );
    }

    #[test]
    fn config_sections_are_optional() {
        let config: CliConfig =
            serde_json::from_str(r#"{"export":{"settle_delay_ms":0}}"#).unwrap();
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.export.settle_delay_ms, 0);
        assert_eq!(config.export.png_file_name, "overlay.png");
    }

    #[derive(Default)]
    struct CountingFonts {
        sheets: std::cell::Cell<usize>,
    }

    #[async_trait::async_trait(?Send)]
    impl FontSource for CountingFonts {
        fn stylesheet_urls(&self) -> Vec<String> {
            vec!["fonts.css".into()]
        }

        async fn fetch_text(&self, _url: &str) -> Result<String, FontError> {
            self.sheets.set(self.sheets.get() + 1);
            Ok(String::new())
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
            Err(FontError::Fetch {
                url: url.into(),
                reason: "unused".into(),
            })
        }
    }

    #[tokio::test]
    async fn png_and_html_share_one_font_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new();
        scene.canvas_size = ovl_core::CanvasSize {
            width: 64,
            height: 36,
        };
        let config = CliConfig {
            export: ExportConfig {
                settle_delay_ms: 0,
                load_system_fonts: false,
                ..ExportConfig::default()
            },
            ..CliConfig::default()
        };
        let mut session = session_with(&config, scene).unwrap();
        let engine = ExportEngine::new(config.export.clone());
        let fonts = CountingFonts::default();
        let png = dir.path().join("out.png");
        let html = dir.path().join("out.html");

        write_exports(&engine, &mut session, &fonts, Some(&png), Some(&html))
            .await
            .unwrap();

        assert_eq!(fonts.sheets.get(), 1);
        assert!(png.exists());
        assert!(html.exists());
    }

    #[test]
    fn cli_parses_store_save() {
        let cli = Cli::try_parse_from([
            "ovl", "store", "save", "doc.json", "--dir", "/tmp/s", "--user", "alice",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand {
                command: StoreSubcommand::Save { .. }
            })
        ));
    }
}
