//! Preview window: timeline editor, transport, and simulated playback.

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver};
use segline_audio::AudioTrackSync;
use segline_core::{EngineConfig, SegmentId, Timecode};
use segline_media::{BufferId, ExportFormat, PlaybackController, PlaybackEvent, PlaybackItem};
use segline_timeline::{EditCommand, TimelineFile, TimelineModel, UndoStack};
use segline_ui::{show_timeline, EditorAction, EditorCommand, Theme, TimelineEditor, TimelineView};
use tracing::{info, warn};

use crate::export;
use crate::sim::{BufferMessage, SimAudio, SimBuffer};

const SCALE_KEY: &str = "segline.timeline_scale";

/// Frame deltas above this are treated as a stall, not as playback time.
const MAX_TICK_SEC: f64 = 0.25;

pub struct PreviewApp {
    config: EngineConfig,
    manifest_path: PathBuf,
    file: TimelineFile,
    model: TimelineModel,
    undo: UndoStack,
    editor: TimelineEditor,
    controller: PlaybackController<SimBuffer>,
    buffer_events: Receiver<BufferMessage>,
    audio: AudioTrackSync<SimAudio>,
    last_tick: Instant,
    status: String,
}

impl PreviewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: EngineConfig,
        manifest_path: PathBuf,
        file: TimelineFile,
    ) -> Self {
        Theme::apply(&cc.egui_ctx);

        let mut editor = TimelineEditor::new(&config);
        if let Some(scale) = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, SCALE_KEY))
        {
            editor.set_scale(scale);
        }

        let model = file
            .timeline
            .model_with_min_clip_length(config.min_clip_length_sec);

        let library: HashMap<String, f64> = file
            .timeline
            .segments
            .iter()
            .filter(|s| s.is_playable())
            .map(|s| (s.media_url_or_empty().to_string(), s.source_duration))
            .collect();
        let library = Rc::new(library);

        let (tx, rx) = unbounded();
        let mut controller = PlaybackController::new(
            SimBuffer::new(BufferId::A, tx.clone(), library.clone()),
            SimBuffer::new(BufferId::B, tx, library),
        )
        .with_autoplay(config.autoplay);
        controller.set_playlist(PlaybackItem::from_clips(model.clips()));

        let mut audio = AudioTrackSync::from_config(&config);
        if let Some(url) = file.timeline.audio_track_url.as_deref() {
            audio.attach(SimAudio::new(None), url);
        }

        Self {
            undo: UndoStack::new(config.undo_depth),
            config,
            manifest_path,
            file,
            model,
            editor,
            controller,
            buffer_events: rx,
            audio,
            last_tick: Instant::now(),
            status: String::new(),
        }
    }

    // ── Playback pump ──────────────────────────────────────────

    fn tick(&mut self) {
        let dt = self.last_tick.elapsed().as_secs_f64().min(MAX_TICK_SEC);
        self.last_tick = Instant::now();

        for id in [BufferId::A, BufferId::B] {
            self.controller.buffer(id).tick(dt);
        }
        if let Some(element) = self.audio.element() {
            element.tick(dt);
        }

        let messages: Vec<BufferMessage> = self.buffer_events.try_iter().collect();
        for (id, event) in messages {
            self.controller.handle_buffer_event(id, event);
        }

        for event in self.controller.drain_events() {
            match event {
                PlaybackEvent::TimeUpdate { position, .. } => {
                    self.audio.reconcile(position);
                }
                // Audio runs continuously across clip boundaries.
                PlaybackEvent::IndexChanged(_) => {}
                PlaybackEvent::Ended => {
                    self.audio.pause();
                    self.status = "End of timeline".into();
                }
                PlaybackEvent::MediaFailed { url, reason, .. } => {
                    self.status = format!("Could not play {url}: {reason}");
                }
            }
        }
        self.sync_audio_transport();
    }

    /// Keep the background track's play/pause in lockstep with the sequence.
    fn sync_audio_transport(&mut self) {
        let playing = self.controller.is_playing();
        if playing && !self.audio.is_playing() {
            self.audio.seek_to(self.controller.position());
            self.audio.play();
        } else if !playing && self.audio.is_playing() {
            self.audio.pause();
        }
    }

    // ── Editing ────────────────────────────────────────────────

    fn apply_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::Seek(time) => {
                self.controller.seek_to_time(time);
                self.audio.seek_to(time);
            }
            EditorAction::SelectClip(id) => {
                if let Some(segment) = self.model.segment(id) {
                    self.status = format!(
                        "Scene {} segment {}",
                        segment.scene_number,
                        segment.index + 1
                    );
                }
            }
            EditorAction::Reorder { segment_id, gap } => {
                let before = self.model.order().to_vec();
                if let Some(after) = self.model.reorder(segment_id, gap) {
                    self.undo.push(EditCommand::SetOrder { before, after });
                    self.commit_edit();
                }
            }
            EditorAction::TrimPreview { segment_id, trim } => {
                self.model.set_trim(segment_id, trim);
                self.refresh_playlist();
            }
            EditorAction::TrimCommit {
                segment_id,
                before,
                after,
            } => {
                if let Some(after) = self.model.set_trim(segment_id, after) {
                    self.undo.push(EditCommand::SetTrim {
                        segment_id,
                        before,
                        after,
                    });
                }
                self.commit_edit();
            }
            EditorAction::Command(command) => self.run_command(command),
        }
    }

    fn run_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::PlayPause => {
                self.controller.toggle_play();
                self.sync_audio_transport();
            }
            EditorCommand::Undo => {
                if let Some(cmd) = self.undo.undo() {
                    cmd.apply(&mut self.model);
                    self.commit_edit();
                }
            }
            EditorCommand::Redo => {
                if let Some(cmd) = self.undo.redo() {
                    cmd.apply(&mut self.model);
                    self.commit_edit();
                }
            }
            // Viewport commands are consumed by the editor.
            EditorCommand::ZoomIn | EditorCommand::ZoomOut | EditorCommand::ToggleFit => {}
        }
    }

    fn refresh_playlist(&mut self) {
        self.controller
            .set_playlist(PlaybackItem::from_clips(self.model.clips()));
        self.editor.retain_selection(self.model.clips());
    }

    /// Publish an order or trim change: refresh playback and write the manifest.
    fn commit_edit(&mut self) {
        self.refresh_playlist();
        self.file.timeline.update_from(&self.model);
        match self.file.save_to_file(&self.manifest_path) {
            Ok(()) => info!("Saved {}", self.manifest_path.display()),
            Err(e) => {
                warn!("Failed to save {}: {}", self.manifest_path.display(), e);
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn export_dialog(&mut self, format: ExportFormat) {
        let name = export::file_name(&self.file.timeline, &self.config, format);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(name.as_str())
            .add_filter(format.label(), &[format.extension()])
            .save_file()
        else {
            return;
        };
        match export::write_export(&self.file.timeline, &self.config, format, &path) {
            Ok(()) => self.status = format!("Exported {}", path.display()),
            Err(e) => {
                warn!("Export failed: {e:#}");
                self.status = format!("Export failed: {e}");
            }
        }
    }

    fn shortcut_label(&self, id: &str) -> String {
        self.editor
            .commands()
            .get(id)
            .and_then(|c| c.shortcut_label())
            .unwrap_or_default()
    }

    fn current_segment(&self) -> Option<SegmentId> {
        let index = self.controller.current_index()?;
        self.controller.items().get(index).map(|i| i.segment_id)
    }

    // ── Panels ─────────────────────────────────────────────────

    fn menu_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<EditorAction>) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export EDL...").clicked() {
                        self.export_dialog(ExportFormat::Edl);
                        ui.close_menu();
                    }
                    if ui.button("Export CSV...").clicked() {
                        self.export_dialog(ExportFormat::Csv);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    let undo = ui.add_enabled(
                        self.undo.can_undo(),
                        egui::Button::new("Undo").shortcut_text(self.shortcut_label("edit.undo")),
                    );
                    if undo.clicked() {
                        actions.push(EditorAction::Command(EditorCommand::Undo));
                        ui.close_menu();
                    }
                    let redo = ui.add_enabled(
                        self.undo.can_redo(),
                        egui::Button::new("Redo").shortcut_text(self.shortcut_label("edit.redo")),
                    );
                    if redo.clicked() {
                        actions.push(EditorAction::Command(EditorCommand::Redo));
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    for (label, id, command) in [
                        ("Zoom In", "view.zoom_in", EditorCommand::ZoomIn),
                        ("Zoom Out", "view.zoom_out", EditorCommand::ZoomOut),
                        ("Fit Timeline", "view.fit_toggle", EditorCommand::ToggleFit),
                    ] {
                        let button = egui::Button::new(label).shortcut_text(self.shortcut_label(id));
                        if ui.add(button).clicked() {
                            self.editor
                                .apply_command(command, self.model.total_duration());
                            ui.close_menu();
                        }
                    }
                });
            });
        });
    }

    fn transport(&mut self, ui: &mut egui::Ui, actions: &mut Vec<EditorAction>) {
        ui.horizontal(|ui| {
            let label = if self.controller.is_playing() {
                "⏸"
            } else {
                "▶"
            };
            if ui.button(label).clicked() {
                actions.push(EditorAction::Command(EditorCommand::PlayPause));
            }

            let rate = self.config.export_frame_rate();
            ui.monospace(format!(
                "{} / {}",
                Timecode::from_seconds(self.controller.position(), rate),
                Timecode::from_seconds(self.model.total_duration(), rate),
            ));

            ui.add_space(Theme::SPACE_MD);
            let mut volume = self.controller.volume();
            if ui
                .add(egui::Slider::new(&mut volume, 0.0..=1.0).text("Volume"))
                .changed()
            {
                self.controller.set_volume(volume);
            }
            let mut muted = self.controller.is_muted();
            if ui.checkbox(&mut muted, "Mute").changed() {
                self.controller.set_muted(muted);
            }
        });
    }

    fn viewer(&self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Theme::bg1());

        let text = match self.current_segment().and_then(|id| self.model.segment(id)) {
            Some(segment) => {
                let cursor = self.controller.cursor();
                format!(
                    "Scene {} / Segment {}\n{}\nbuffer {}  {:.2}s into clip",
                    segment.scene_number,
                    segment.index + 1,
                    segment.media_url_or_empty(),
                    cursor.active_buffer,
                    cursor.elapsed_within_clip,
                )
            }
            None if self.model.clips().is_empty() => "No finished segments yet".to_string(),
            None => "Click the timeline to start playback".to_string(),
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(Theme::FONT_SM),
            Theme::t1(),
        );
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        let mut actions = Vec::new();
        self.menu_bar(ctx, &mut actions);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} clips  {:.1}s",
                    self.model.clips().len(),
                    self.model.total_duration()
                ));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(self.status.as_str());
                }
            });
        });

        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.transport(ui, &mut actions);
                ui.add_space(Theme::SPACE_XS);
                let markers = self.model.scene_markers();
                let view = TimelineView {
                    clips: self.model.clips(),
                    markers: &markers,
                    playhead: self.controller.position(),
                    playing: self.controller.is_playing(),
                };
                actions.extend(show_timeline(ui, &mut self.editor, &view));
            });

        egui::CentralPanel::default().show(ctx, |ui| self.viewer(ui));

        for action in actions {
            self.apply_action(action);
        }

        if self.controller.is_playing() || !self.editor.gesture().is_idle() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SCALE_KEY, self.editor.scale());
    }
}
