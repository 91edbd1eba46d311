use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use caption_layout::{
    CompileInput, CompiledCaptionMeta, Compiler, EngineConfig, ExpectedGeometry, FrameDims,
    MeasuredGeometry, ParityGate, ParityTolerances, PreviewRequest, PreviewResponse, RasterSpec,
    config::MeasureBackend, ensure_fonts_ready_with, logging::init_logging, request_fingerprint,
};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser, Debug)]
#[command(name = "caption-layout", version)]
struct Cli {
    /// Engine config JSON (defaults to $CAPTION_LAYOUT_CONFIG, then the XDG config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile caption text and print the compiled meta as JSON.
    Compile(CompileArgs),
    /// Answer a preview request (legacy or v3) read from a file or stdin.
    Preview(PreviewArgs),
    /// Compare client-measured geometry against a compiled meta.
    CheckParity(ParityArgs),
    /// Draw the geometry of a compiled meta as a PNG guide.
    Guide(GuideArgs),
    /// List registered fonts (family, source, SHA-256 of font bytes).
    Fonts,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Caption text.
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read caption text from a file (`-` for stdin).
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Partial style as a JSON object.
    #[arg(long)]
    style: Option<String>,

    #[arg(long, default_value_t = 1080)]
    frame_w: u32,

    #[arg(long, default_value_t = 1920)]
    frame_h: u32,

    /// Compile in raster mode with this raster width.
    #[arg(long)]
    raster_w: Option<u32>,

    /// Raster padding (defaults to the style's internalPaddingPx).
    #[arg(long, requires = "raster_w")]
    raster_padding: Option<u32>,

    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Request JSON (`-` for stdin).
    #[arg(long = "in", default_value = "-")]
    in_path: PathBuf,

    /// Answer legacy requests with the legacy response shape.
    #[arg(long)]
    legacy_response: bool,

    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct ParityArgs {
    /// Compiled meta JSON, as printed by `compile`.
    #[arg(long)]
    meta: PathBuf,

    /// Measured geometry JSON (`width`, `fontSizePx`, `lineHeightPx`, `topPx`).
    #[arg(long)]
    measured: PathBuf,

    /// Consumer pixels per frame pixel.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct GuideArgs {
    /// Compiled meta JSON, as printed by `compile`.
    #[arg(long)]
    meta: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(cli.config.as_deref());
    init_logging(&config.logging);

    match cli.cmd {
        Command::Compile(args) => cmd_compile(&config, args),
        Command::Preview(args) => cmd_preview(&config, args),
        Command::CheckParity(args) => cmd_check_parity(&config, args),
        Command::Guide(args) => cmd_guide(args),
        Command::Fonts => cmd_fonts(&config),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn cmd_compile(config: &EngineConfig, args: CompileArgs) -> anyhow::Result<()> {
    let text = match (args.text, args.text_file) {
        (Some(t), _) => t,
        (None, Some(path)) => read_input(&path)?,
        (None, None) => anyhow::bail!("one of --text or --text-file is required"),
    };
    let style: Map<String, Value> = match args.style {
        Some(raw) => serde_json::from_str(&raw).context("parse --style as a JSON object")?,
        None => Map::new(),
    };
    let input = CompileInput {
        text,
        style,
        frame: FrameDims::new(args.frame_w, args.frame_h)?,
        raster: args.raster_w.map(|width| RasterSpec {
            width,
            padding: args.raster_padding,
        }),
    };

    let meta = Compiler::from_config(config).compile_input(&input)?;
    print_json(&meta, args.pretty)
}

fn cmd_preview(config: &EngineConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let raw = read_input(&args.in_path)?;
    let request = PreviewRequest::parse(&raw)?;
    let legacy = request.is_legacy();
    let input = request.into_compile_input()?;

    let meta = Compiler::from_config(config).compile_input(&input)?;
    let response = PreviewResponse::from_meta(&meta, request_fingerprint(&input));
    if legacy && args.legacy_response {
        print_json(&response.to_legacy(), args.pretty)
    } else {
        print_json(&response, args.pretty)
    }
}

fn cmd_check_parity(config: &EngineConfig, args: ParityArgs) -> anyhow::Result<()> {
    let meta: CompiledCaptionMeta = read_json(&args.meta)?;
    let measured: MeasuredGeometry = read_json(&args.measured)?;
    let gate = ParityGate::new(ParityTolerances::from(&config.parity));

    let report = gate.check(&ExpectedGeometry::from_meta(&meta, args.scale), &measured);
    print_json(&report, true)?;
    if !report.passed() {
        anyhow::bail!("parity check failed on {} dimension(s)", report.mismatches.len());
    }
    Ok(())
}

const GUIDE_BG: [u8; 4] = [18, 20, 28, 255];
const GUIDE_SAFE: [u8; 4] = [90, 30, 30, 255];
const GUIDE_BOX: [u8; 4] = [40, 60, 90, 255];
const GUIDE_LINE: [u8; 4] = [230, 230, 230, 255];

fn cmd_guide(args: GuideArgs) -> anyhow::Result<()> {
    let meta: CompiledCaptionMeta = read_json(&args.meta)?;
    let (w, h) = (meta.frame_w, meta.frame_h);
    anyhow::ensure!(w > 0 && h > 0, "meta has an empty frame");

    let mut img = image::RgbaImage::from_pixel(w, h, image::Rgba(GUIDE_BG));
    let v = &meta.placement.vertical;
    fill_rect(&mut img, 0, 0, i64::from(w), i64::from(v.safe_top_margin_px), GUIDE_SAFE);
    fill_rect(
        &mut img,
        0,
        i64::from(h) - i64::from(v.safe_bottom_margin_px),
        i64::from(w),
        i64::from(h),
        GUIDE_SAFE,
    );

    let g = &meta.placement.geometry;
    fill_rect(
        &mut img,
        g.box_left_px,
        v.y_px_first_line,
        g.box_left_px + i64::from(g.box_width_px),
        v.y_px_first_line + i64::from(meta.total_text_h),
        GUIDE_BOX,
    );
    for b in &meta.placement.line_boxes {
        let r = b.rect();
        fill_rect(
            &mut img,
            r.x0 as i64,
            r.y0 as i64,
            r.x1.ceil() as i64,
            r.y1 as i64,
            GUIDE_LINE,
        );
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn fill_rect(img: &mut image::RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, rgba: [u8; 4]) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
    let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x as u32, y as u32, image::Rgba(rgba));
        }
    }
}

fn cmd_fonts(config: &EngineConfig) -> anyhow::Result<()> {
    let registry = ensure_fonts_ready_with(&config.fonts);
    let backend = match config.fonts.backend {
        MeasureBackend::Builtin => "builtin",
        MeasureBackend::Fonts => "fonts",
    };
    eprintln!("measure backend: {backend}");
    eprintln!(
        "font dirs:       {}",
        config
            .fonts
            .dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if registry.faces().is_empty() {
        eprintln!("no font faces registered; measuring with the built-in table");
        return Ok(());
    }
    for face in registry.faces() {
        println!("{}:", face.family);
        println!("  source: {}", face.source.display());
        println!("  sha256: {}", face.sha256_hex());
    }
    Ok(())
}
