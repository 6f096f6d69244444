//! Segline - segmented video timeline preview and export tool.
//!
//! ```text
//! segline [--config <file>] <manifest.json>                 open the preview window
//! segline [--config <file>] export-edl <manifest> [out.edl] write an EDL
//! segline [--config <file>] export-csv <manifest> [out.csv] write the segment CSV
//! ```

mod export;
mod preview;
mod sim;

use std::path::PathBuf;

use anyhow::{bail, Context};
use segline_core::EngineConfig;
use segline_media::ExportFormat;
use segline_timeline::TimelineFile;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: segline [--config <file>] <manifest.json>\n       \
                     segline [--config <file>] export-edl|export-csv <manifest.json> [output]";

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Invocation {
    Preview {
        manifest: PathBuf,
    },
    Export {
        format: ExportFormat,
        manifest: PathBuf,
        output: Option<PathBuf>,
    },
}

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    invocation: Invocation,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!("{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let format = match positional.first().map(String::as_str) {
        Some("export-edl") => Some(ExportFormat::Edl),
        Some("export-csv") => Some(ExportFormat::Csv),
        _ => None,
    };

    let invocation = match (format, positional.len()) {
        (Some(format), 2 | 3) => Invocation::Export {
            format,
            manifest: PathBuf::from(&positional[1]),
            output: positional.get(2).map(PathBuf::from),
        },
        (None, 1) => Invocation::Preview {
            manifest: PathBuf::from(&positional[0]),
        },
        _ => bail!("{USAGE}"),
    };

    Ok(Args { config, invocation })
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = EngineConfig::load(args.config.as_deref()).context("loading config")?;

    match args.invocation {
        Invocation::Export {
            format,
            manifest,
            output,
        } => {
            let file = TimelineFile::load_from_file(&manifest)
                .with_context(|| format!("loading manifest {}", manifest.display()))?;
            let output = output
                .unwrap_or_else(|| export::default_output(&manifest, &file, &config, format));
            export::write_export(&file.timeline, &config, format, &output)?;
            info!("Wrote {} to {}", format.label(), output.display());
        }
        Invocation::Preview { manifest } => {
            let file = TimelineFile::load_from_file(&manifest)
                .with_context(|| format!("loading manifest {}", manifest.display()))?;
            info!(
                "Opening {} ({} segments)",
                manifest.display(),
                file.timeline.segments.len()
            );

            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1280.0, 720.0])
                    .with_title("Segline"),
                renderer: eframe::Renderer::Wgpu,
                ..Default::default()
            };

            eframe::run_native(
                "Segline",
                options,
                Box::new(move |cc| Ok(Box::new(preview::PreviewApp::new(cc, config, manifest, file)))),
            )
            .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;
        }
    }

    Ok(())
}
