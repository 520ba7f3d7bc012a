//! Fractales: render a Mandelbrot or Julia set to PNG.
//!
//! ```text
//! fractales                         render the default from preferences.json
//! fractales view.txt                re-render a saved record
//! fractales view.txt top-left       zoom a saved record into a quadrant
//! fractales bottom-right            zoom the default into a quadrant
//! ```
//!
//! Output goes to `<fileName>.png` and `<fileName>.txt` in the images directory.

mod app_dir;
mod preferences;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info, warn};

use fractales_core::{compute_matrix, text, zoom, FractalConfig, Quadrant};
use fractales_render::{colorize, export_png, render, RenderCancel};

use preferences::AppPreferences;

/// What to render, from the positional arguments.
#[derive(Debug, Default, PartialEq)]
struct Invocation {
    record: Option<PathBuf>,
    quadrant: Option<Quadrant>,
}

/// `[record] [quadrant]`. A lone argument that names a quadrant zooms the
/// default fractal; anything else is taken as a record path.
fn parse_args(args: &[String]) -> fractales_core::Result<Invocation> {
    if args.len() > 2 {
        warn!(ignored = ?&args[2..], "Ignoring extra arguments");
    }
    let mut invocation = Invocation::default();
    match args {
        [] => {}
        [only] => match only.parse::<Quadrant>() {
            Ok(q) => invocation.quadrant = Some(q),
            Err(_) => invocation.record = Some(PathBuf::from(only)),
        },
        [record, quadrant, ..] => {
            invocation.record = Some(PathBuf::from(record));
            invocation.quadrant = Some(quadrant.parse()?);
        }
    }
    Ok(invocation)
}

/// Base name for the output files. Only the last component of `fileName`
/// is kept, so a record cannot write outside the images directory.
fn output_stem(config: &FractalConfig) -> String {
    let stem = Path::new(config.file_name())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.fractal_type().default_file_name().to_string());
    if stem != config.file_name() {
        warn!(file_name = config.file_name(), %stem, "Stripped directories from file name");
    }
    stem
}

fn run(prefs: &AppPreferences, invocation: Invocation) -> fractales_render::Result<PathBuf> {
    let mut config = match &invocation.record {
        Some(path) => {
            info!(path = %path.display(), "Loading fractal record");
            text::decode(&fs::read_to_string(path)?)?
        }
        None => FractalConfig::build(prefs.default_fractal, prefs.default_options.clone())?,
    };
    if let Some(quadrant) = invocation.quadrant {
        config = zoom(&config, Some(quadrant))?;
    }

    info!(
        fractal = %config.fractal_type(),
        width = config.image_width(),
        height = config.image_height(),
        step = config.discrete_step(),
        max_iteration = config.max_iteration(),
        parallel = prefs.parallel_render,
        "Rendering"
    );
    let matrix = if prefs.parallel_render {
        render(&config, &RenderCancel::new()).matrix
    } else {
        compute_matrix(&config)
    };
    let buffer = colorize(&matrix, &config);

    let dir = prefs.images_directory();
    fs::create_dir_all(&dir)?;
    let stem = output_stem(&config);
    let image_path = dir.join(format!("{stem}.png"));
    export_png(&buffer, &image_path, &config)?;
    fs::write(dir.join(format!("{stem}.txt")), text::encode(&config))?;
    Ok(image_path)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Fractales");

    let prefs = AppPreferences::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = parse_args(&args)
        .map_err(fractales_render::RenderError::from)
        .and_then(|invocation| run(&prefs, invocation));
    match result {
        Ok(path) => {
            info!(path = %path.display(), "Saved image");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
