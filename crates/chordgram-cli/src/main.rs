use chordgram::render::raster::{RasterError, RasterOptions};
use chordgram::render::{HeadlessError, HeadlessRenderer, Viewport};
use chordgram::{ChordConfig, EntityTable, InputFormat, parse_entity_table};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Input(chordgram::Error),
    Headless(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Input(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chordgram::Error> for CliError {
    fn from(value: chordgram::Error) -> Self {
        Self::Input(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Validate,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    input_format: Option<InputFormat>,
    config: Option<String>,
    pretty: bool,
    verbose: u8,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
    diagram_id: Option<String>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            command: Command::Validate,
            input: None,
            input_format: None,
            config: None,
            pretty: false,
            verbose: 0,
            render_format: RenderFormat::Svg,
            render_scale: 1.0,
            background: None,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            diagram_id: None,
            out: None,
        }
    }
}

#[derive(Serialize)]
struct EntitySummary<'a> {
    name: &'a str,
    outgoing: f64,
    incoming: f64,
}

#[derive(Serialize)]
struct ValidateOut<'a> {
    entities: Vec<EntitySummary<'a>>,
    total: f64,
}

fn usage() -> &'static str {
    "chordgram-cli\n\
\n\
USAGE:\n\
  chordgram-cli [validate] [--input-format auto|json|json5|yaml] [--pretty] [<path>|-]\n\
  chordgram-cli layout [--input-format <fmt>] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [--pretty] [<path>|-]\n\
  chordgram-cli render [--format svg|png|jpg|pdf] [--scale <n>] [--background <color>] [--input-format <fmt>] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [--id <diagram-id>] [--out <path>] [<path>|-]\n\
\n\
OPTIONS:\n\
  -v, --verbose   more log output on stderr (repeatable); CHORDGRAM_LOG sets the filter otherwise\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is {\"names\": [...], \"matrix\": [[...]]} or {\"entities\": [{\"name\": ..., \"weights\": [...]}]}.\n\
  - The input format defaults to the file extension, or auto-detection for stdin.\n\
  - validate prints a JSON summary of each entity's outgoing and incoming totals.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbose = args.verbose.saturating_add(1),
            "--input-format" => {
                let fmt = next_value(&mut it)?;
                args.input_format = Some(
                    fmt.parse::<InputFormat>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--viewport-width" => {
                args.viewport_width = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-height" => {
                args.viewport_height = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn input_format(args: &Args) -> InputFormat {
    match (args.input_format, args.input.as_deref()) {
        (Some(fmt), _) => fmt,
        (None, Some(path)) if path != "-" => InputFormat::from_path(Path::new(path)),
        _ => InputFormat::Auto,
    }
}

fn load_config(path: Option<&str>) -> Result<ChordConfig, CliError> {
    let Some(path) = path else {
        return Ok(ChordConfig::empty_object());
    };
    let text = std::fs::read_to_string(path)?;
    Ok(ChordConfig::from_text(
        &text,
        InputFormat::from_path(Path::new(path)),
    )?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, bytes)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn summarize(table: &EntityTable) -> ValidateOut<'_> {
    let entities = table
        .entities()
        .iter()
        .enumerate()
        .map(|(i, e)| EntitySummary {
            name: &e.name,
            outgoing: e.outgoing_total(),
            incoming: table.incoming_total(i),
        })
        .collect();
    ValidateOut {
        entities,
        total: table.total(),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("CHORDGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // A second initialization (tests) is harmless; ignore it.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let format = input_format(&args);
    tracing::debug!(?format, command = ?args.command, "input read");

    if let Command::Validate = args.command {
        let table = parse_entity_table(&text, format)?;
        return write_json(&summarize(&table), args.pretty);
    }

    let viewport = Viewport::new(args.viewport_width, args.viewport_height)
        .map_err(|e| CliError::Headless(e.into()))?;
    let mut renderer = HeadlessRenderer::new()
        .with_input_format(format)
        .with_viewport(viewport)
        .with_config(&load_config(args.config.as_deref())?);
    if let Some(id) = &args.diagram_id {
        renderer = renderer.with_diagram_id(id);
    }

    match args.command {
        Command::Validate => Ok(()),
        Command::Layout => {
            let layout = renderer.layout_sync(&text)?;
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..RasterOptions::default()
            };
            let bytes = match args.render_format {
                RenderFormat::Svg => {
                    let svg = renderer.render_svg_sync(&text)?;
                    return write_bytes(svg.as_bytes(), args.out.as_deref());
                }
                RenderFormat::Png => renderer.render_png_sync(&text, &raster)?,
                RenderFormat::Jpeg => renderer.render_jpeg_sync(&text, &raster)?,
                RenderFormat::Pdf => renderer.render_pdf_sync(&text)?,
            };
            let out = match args.out.as_deref() {
                Some(path) => PathBuf::from(path),
                None => default_raster_out_path(
                    args.input.as_deref(),
                    args.render_format.extension(),
                ),
            };
            std::fs::write(&out, bytes)?;
            tracing::info!(path = %out.display(), "wrote output");
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("chordgram-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn render_flags_parse() {
        let args = parse_args(&argv(&[
            "render",
            "--format",
            "jpeg",
            "--scale",
            "2",
            "--viewport-width",
            "640",
            "--id",
            "x",
            "data.yaml",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Render));
        assert_eq!(args.render_format, RenderFormat::Jpeg);
        assert_eq!(args.render_scale, 2.0);
        assert_eq!(args.viewport_width, 640.0);
        assert_eq!(args.viewport_height, 960.0);
        assert_eq!(args.input.as_deref(), Some("data.yaml"));
        assert_eq!(input_format(&args), InputFormat::Yaml);
    }

    #[test]
    fn bad_flags_are_usage_errors() {
        for bad in [
            &["--scale", "0"][..],
            &["--format", "gif"],
            &["--input-format", "toml"],
            &["--out"],
            &["a.json", "b.json"],
            &["--nope"],
        ] {
            assert!(
                matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn stdin_dash_is_an_input_not_a_flag() {
        let args = parse_args(&argv(&["layout", "-"])).unwrap();
        assert_eq!(args.input.as_deref(), Some("-"));
        assert_eq!(input_format(&args), InputFormat::Auto);
    }

    #[test]
    fn raster_output_defaults_next_to_input() {
        assert_eq!(
            default_raster_out_path(Some("dir/trade.yaml"), "png"),
            PathBuf::from("dir/trade.png")
        );
        assert_eq!(default_raster_out_path(None, "pdf"), PathBuf::from("out.pdf"));
    }
}
