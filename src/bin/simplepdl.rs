use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "simplepdl", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document as a PNG.
    Render(RenderArgs),
    /// Load and parse a document, reporting whether it is valid.
    Check(InputArgs),
    /// Print the draw calls a document issues, as JSON.
    Dump(InputArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Input document (`.xml`, or `.json` for the JSON form).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input document (`.xml`, or `.json` for the JSON form).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Viewer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document units to pixels (overrides the config).
    #[arg(long)]
    scale: Option<f64>,

    /// Extra font file (TTF/OTF). May be repeated.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_raw(path: &Path) -> simplepdl::PdlResult<simplepdl::Page> {
    if is_json(path) {
        simplepdl::document::json::from_path(path)
    } else {
        simplepdl::document::xml::from_path(path)
    }
}

fn load_into(viewer: &simplepdl::Viewer, path: &Path) -> anyhow::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match viewer.load_with(&file_name, || read_raw(path)) {
        simplepdl::LoadOutcome::Loaded => Ok(()),
        simplepdl::LoadOutcome::Failed(failure) => {
            let message = format!("{}: {}", simplepdl::LoadFailure::TITLE, failure.message());
            Err(anyhow::Error::new(failure.error).context(message))
        }
        simplepdl::LoadOutcome::Busy => anyhow::bail!("another load is in progress"),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => simplepdl::ViewerConfig::from_path(path)?,
        None => simplepdl::ViewerConfig::default(),
    }
    .with_env_overrides();
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    config.fonts.extend(args.fonts);

    let viewer = simplepdl::Viewer::new(config).context("create viewer")?;
    load_into(&viewer, &args.in_path)?;
    let frame = viewer.render_frame().context("render page")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_check(args: InputArgs) -> anyhow::Result<()> {
    let viewer = simplepdl::Viewer::new(simplepdl::ViewerConfig::default())?;
    load_into(&viewer, &args.in_path)?;
    let doc = viewer
        .document()
        .context("document missing after successful load")?;
    let size = doc.size();
    println!(
        "ok: {} ({} x {}, {} nodes)",
        args.in_path.display(),
        size.width,
        size.height,
        doc.page().node_count()
    );
    Ok(())
}

fn cmd_dump(args: InputArgs) -> anyhow::Result<()> {
    let raw = read_raw(&args.in_path)
        .with_context(|| format!("load '{}'", args.in_path.display()))?;
    let doc = simplepdl::load(raw).with_context(|| format!("parse '{}'", args.in_path.display()))?;

    let mut session = simplepdl::RecordingSession::new();
    simplepdl::render(&doc, &mut session, simplepdl::Affine::IDENTITY);

    let json = serde_json::to_string_pretty(session.calls()).context("encode draw calls")?;
    println!("{json}");
    Ok(())
}
