//! The timeline widget: ruler, scene flags, clip lane, and playhead.

use egui::{self, Align2, FontId, Pos2, Rect, Rounding, Sense, Stroke, Vec2};
use segline_timeline::{total_duration, Clip, SceneMarker};

use crate::editor::{EditorAction, TimelineEditor};
use crate::gesture::{gap_x, hit_test_trim_handle, trim_cursor, Gesture};
use crate::ruler::{minor_ticks, visible_ticks};
use crate::theme::Theme;

const CLIP_INSET: f32 = 3.0;
const PLAYHEAD_TRIANGLE: f32 = 5.0;

/// What the widget draws this frame.
pub struct TimelineView<'a> {
    pub clips: &'a [Clip],
    pub markers: &'a [SceneMarker],
    /// Cumulative playhead time.
    pub playhead: f64,
    pub playing: bool,
}

/// Vertical bands of the widget.
struct Layout {
    rect: Rect,
    ruler: Rect,
    scenes: Rect,
    lane: Rect,
}

impl Layout {
    fn new(rect: Rect) -> Self {
        let ruler = Rect::from_min_size(rect.min, Vec2::new(rect.width(), Theme::RULER_HEIGHT));
        let scenes = Rect::from_min_size(
            Pos2::new(rect.left(), ruler.bottom()),
            Vec2::new(rect.width(), Theme::SCENE_LANE_HEIGHT),
        );
        let lane = Rect::from_min_max(Pos2::new(rect.left(), scenes.bottom()), rect.max);
        Self {
            rect,
            ruler,
            scenes,
            lane,
        }
    }

    fn x(&self, offset: f32) -> f32 {
        self.rect.left() + offset
    }

    fn offset(&self, pos: Pos2) -> f32 {
        pos.x - self.rect.left()
    }

    fn clip_rect(&self, editor: &TimelineEditor, clip: &Clip) -> Rect {
        let scale = editor.scale();
        let left = self.x(scale.time_to_x(clip.cumulative_start));
        let width = scale
            .duration_to_width(clip.effective_duration)
            .max(Theme::MIN_CLIP_WIDTH);
        Rect::from_min_size(
            Pos2::new(left, self.lane.top() + CLIP_INSET),
            Vec2::new(width, self.lane.height() - 2.0 * CLIP_INSET),
        )
    }
}

/// Draw the timeline and collect the actions produced by this frame's input.
pub fn show_timeline(
    ui: &mut egui::Ui,
    editor: &mut TimelineEditor,
    view: &TimelineView<'_>,
) -> Vec<EditorAction> {
    let mut actions = Vec::new();
    let total = total_duration(view.clips);
    let height = Theme::RULER_HEIGHT + Theme::SCENE_LANE_HEIGHT + Theme::CLIP_LANE_HEIGHT;
    let (response, painter) = ui.allocate_painter(
        Vec2::new(ui.available_width(), height),
        Sense::click_and_drag(),
    );
    let layout = Layout::new(response.rect);

    editor.set_viewport_width(layout.rect.width());
    actions.extend(editor.handle_shortcuts(ui.ctx(), total));
    editor.follow_playhead(view.playhead, view.playing);

    // ── Wheel: modifier zooms around the pointer, plain wheel scrolls ──
    if response.hovered() {
        let (zoom_ratio, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta));
        if let Some(pointer) = response.hover_pos() {
            if zoom_ratio != 1.0 {
                let steps = zoom_ratio.ln() / editor.scale().zoom_factor().ln();
                editor.wheel_zoom(layout.offset(pointer), steps, total);
            } else if scroll.x != 0.0 || scroll.y != 0.0 {
                editor.scroll_by(-(scroll.x + scroll.y), total);
            }
        }
    }

    // ── Paint ──────────────────────────────────────────────────
    painter.rect_filled(layout.rect, 0.0, Theme::bg());
    draw_ruler(&painter, &layout, editor);
    draw_scene_flags(&painter, &layout, editor, view.markers);

    if view.clips.is_empty() {
        painter.text(
            layout.lane.center(),
            Align2::CENTER_CENTER,
            "No finished segments yet",
            FontId::proportional(Theme::FONT_SM),
            Theme::t3(),
        );
    }

    let hover = response.hover_pos();
    let dragged_id = match editor.gesture() {
        Gesture::Reorder(drag) => Some(drag.segment_id),
        _ => None,
    };
    for clip in view.clips {
        let clip_rect = layout.clip_rect(editor, clip);
        if clip_rect.right() < layout.rect.left() || clip_rect.left() > layout.rect.right() {
            continue;
        }
        let hovered = hover.is_some_and(|p| clip_rect.contains(p));
        draw_clip(
            &painter,
            clip,
            clip_rect,
            editor.selected() == Some(clip.id()),
            hovered,
            dragged_id == Some(clip.id()),
        );
    }

    if let Gesture::Reorder(drag) = editor.gesture() {
        if let Some(gap) = drag.hover_gap.filter(|_| drag.is_move()) {
            let x = layout.x(gap_x(view.clips, editor.scale(), gap));
            painter.line_segment(
                [Pos2::new(x, layout.lane.top()), Pos2::new(x, layout.lane.bottom())],
                Stroke::new(2.0, Theme::cyan()),
            );
        }
    }

    draw_playhead(&painter, &layout, editor, view.playhead);

    // ── Cursor feedback ────────────────────────────────────────
    match editor.gesture() {
        Gesture::Trim(drag) => ui.ctx().set_cursor_icon(trim_cursor(drag.edge)),
        Gesture::Reorder(_) => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
        Gesture::Idle => {
            if let Some(pos) = hover.filter(|p| layout.lane.contains(*p)) {
                let edge = view.clips.iter().find_map(|clip| {
                    hit_test_trim_handle(layout.clip_rect(editor, clip), pos, editor.trim_handle_px())
                });
                if let Some(edge) = edge {
                    ui.ctx().set_cursor_icon(trim_cursor(edge));
                }
            }
        }
        Gesture::Scrub => {}
    }

    // ── Clicks ─────────────────────────────────────────────────
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if pos.y < layout.scenes.bottom() {
                actions.push(editor.click_ruler(layout.offset(pos)));
            } else if let Some(clip) = clip_under(&layout, editor, view.clips, pos) {
                actions.extend(editor.click_clip(clip));
            }
        }
    }

    // ── Drags ──────────────────────────────────────────────────
    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            start_gesture(&layout, editor, view.clips, pos);
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            actions.extend(editor.drag_to(view.clips, layout.offset(pos)));
        }
    }
    if response.drag_stopped() {
        actions.extend(editor.release());
    }

    editor.retain_selection(view.clips);
    actions
}

fn clip_under<'a>(
    layout: &Layout,
    editor: &TimelineEditor,
    clips: &'a [Clip],
    pos: Pos2,
) -> Option<&'a Clip> {
    clips
        .iter()
        .find(|clip| layout.clip_rect(editor, clip).contains(pos))
}

fn start_gesture(layout: &Layout, editor: &mut TimelineEditor, clips: &[Clip], pos: Pos2) {
    if pos.y < layout.scenes.bottom() {
        editor.begin_scrub();
        return;
    }
    let handle = editor.trim_handle_px();
    for (index, clip) in clips.iter().enumerate() {
        let rect = layout.clip_rect(editor, clip);
        if let Some(edge) = hit_test_trim_handle(rect, pos, handle) {
            editor.begin_trim(clip, edge, layout.offset(pos));
            return;
        }
        if rect.contains(pos) {
            editor.begin_reorder(clip, index);
            return;
        }
    }
}

// ── Painting helpers ────────────────────────────────────────────

fn draw_ruler(painter: &egui::Painter, layout: &Layout, editor: &TimelineEditor) {
    let ruler = layout.ruler;
    painter.rect_filled(ruler, 0.0, Theme::bg1());
    painter.line_segment(
        [ruler.left_bottom(), ruler.right_bottom()],
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_10()),
    );

    let width = ruler.width();
    let gap = editor.min_label_gap_px();
    for x in minor_ticks(editor.scale(), width, gap) {
        let x = layout.x(x);
        painter.line_segment(
            [Pos2::new(x, ruler.bottom() - 4.0), Pos2::new(x, ruler.bottom())],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_10()),
        );
    }
    for tick in visible_ticks(editor.scale(), width, gap) {
        let x = layout.x(tick.x);
        painter.line_segment(
            [Pos2::new(x, ruler.bottom() - 10.0), Pos2::new(x, ruler.bottom())],
            Stroke::new(1.0, Theme::t3()),
        );
        painter.text(
            Pos2::new(x + 3.0, ruler.top() + 2.0),
            Align2::LEFT_TOP,
            &tick.label,
            FontId::monospace(Theme::FONT_XS),
            Theme::t3(),
        );
    }
}

fn draw_scene_flags(
    painter: &egui::Painter,
    layout: &Layout,
    editor: &TimelineEditor,
    markers: &[SceneMarker],
) {
    for marker in markers {
        let x = layout.x(editor.scale().time_to_x(marker.time));
        if x < layout.rect.left() - 40.0 || x > layout.rect.right() {
            continue;
        }
        let color = Theme::scene_color(marker.scene_number);
        painter.line_segment(
            [Pos2::new(x, layout.scenes.top()), Pos2::new(x, layout.lane.bottom())],
            Stroke::new(1.0, Theme::with_alpha(color, 140)),
        );
        painter.text(
            Pos2::new(x + 3.0, layout.scenes.center().y),
            Align2::LEFT_CENTER,
            format!("Scene {}", marker.scene_number),
            FontId::proportional(Theme::FONT_XS),
            color,
        );
    }
}

fn draw_clip(
    painter: &egui::Painter,
    clip: &Clip,
    rect: Rect,
    selected: bool,
    hovered: bool,
    dragging: bool,
) {
    let color = Theme::scene_color(clip.segment.scene_number);
    let fill_alpha = if dragging { 20 } else if selected { 70 } else { 40 };
    painter.rect_filled(rect, Rounding::same(Theme::RADIUS), Theme::with_alpha(color, fill_alpha));
    let stroke = if selected {
        Stroke::new(1.5, color)
    } else {
        Stroke::new(Theme::STROKE_SUBTLE, Theme::with_alpha(color, 120))
    };
    painter.rect_stroke(rect, Rounding::same(Theme::RADIUS), stroke);

    if rect.width() > 36.0 {
        let text = painter.with_clip_rect(rect.shrink(2.0));
        text.text(
            Pos2::new(rect.left() + Theme::SPACE_SM, rect.top() + Theme::SPACE_XS),
            Align2::LEFT_TOP,
            format!("{}.{}", clip.segment.scene_number, clip.segment.index + 1),
            FontId::proportional(Theme::FONT_XS),
            Theme::t1(),
        );
        text.text(
            Pos2::new(rect.left() + Theme::SPACE_SM, rect.bottom() - Theme::SPACE_XS),
            Align2::LEFT_BOTTOM,
            format!("{:.1}s", clip.effective_duration),
            FontId::monospace(Theme::FONT_XS),
            Theme::t3(),
        );
    }

    if !clip.trim.is_none() {
        // Notch on trimmed edges.
        let notch = Stroke::new(2.0, Theme::amber());
        if clip.trim.trim_in > 0.0 {
            painter.line_segment([rect.left_top(), rect.left_bottom()], notch);
        }
        if clip.trim.trim_out > 0.0 {
            painter.line_segment([rect.right_top(), rect.right_bottom()], notch);
        }
    }

    if selected || hovered {
        let handle = Theme::with_alpha(color, 90);
        let w = 4.0f32.min(rect.width() / 2.0);
        painter.rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(w, rect.height())),
            Rounding::ZERO,
            handle,
        );
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(rect.right() - w, rect.top()), Vec2::new(w, rect.height())),
            Rounding::ZERO,
            handle,
        );
    }
}

fn draw_playhead(painter: &egui::Painter, layout: &Layout, editor: &TimelineEditor, time: f64) {
    let x = layout.x(editor.scale().time_to_x(time));
    if x < layout.rect.left() || x > layout.rect.right() {
        return;
    }
    let tip = layout.ruler.bottom();
    painter.add(egui::epaint::PathShape::convex_polygon(
        vec![
            Pos2::new(x - PLAYHEAD_TRIANGLE, tip - PLAYHEAD_TRIANGLE - 1.0),
            Pos2::new(x + PLAYHEAD_TRIANGLE, tip - PLAYHEAD_TRIANGLE - 1.0),
            Pos2::new(x, tip),
        ],
        Theme::red(),
        Stroke::NONE,
    ));
    painter.line_segment(
        [Pos2::new(x, tip), Pos2::new(x, layout.rect.bottom())],
        Stroke::new(1.5, Theme::red()),
    );
    painter.line_segment(
        [Pos2::new(x, tip), Pos2::new(x, layout.rect.bottom())],
        Stroke::new(4.0, Theme::with_alpha(Theme::red(), 30)),
    );
}
