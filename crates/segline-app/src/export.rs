//! File exports shared by the headless subcommands and the preview's menu.

use std::path::{Path, PathBuf};

use anyhow::Context;
use segline_core::EngineConfig;
use segline_media::{build_csv, build_edl, ExportFormat, ExportMeta};
use segline_timeline::{TimelineDocument, TimelineFile};

/// Render `document` in `format`.
pub fn render(document: &TimelineDocument, config: &EngineConfig, format: ExportFormat) -> String {
    let meta = ExportMeta::from_document(document, config);
    match format {
        ExportFormat::Edl => {
            let model = document.model_with_min_clip_length(config.min_clip_length_sec);
            build_edl(&meta, model.clips())
        }
        ExportFormat::Csv => build_csv(&meta, &document.segments, &document.order, &document.trim),
    }
}

/// Suggested file name for `document`, e.g. `NM-S02.edl`.
pub fn file_name(document: &TimelineDocument, config: &EngineConfig, format: ExportFormat) -> String {
    ExportMeta::from_document(document, config).export_file_name(format)
}

/// Export next to the manifest under the conventional name.
pub fn default_output(
    manifest: &Path,
    file: &TimelineFile,
    config: &EngineConfig,
    format: ExportFormat,
) -> PathBuf {
    let name = file_name(&file.timeline, config, format);
    match manifest.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

pub fn write_export(
    document: &TimelineDocument,
    config: &EngineConfig,
    format: ExportFormat,
    path: &Path,
) -> anyhow::Result<()> {
    let text = render(document, config, format);
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
