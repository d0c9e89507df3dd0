//! Preview surfaces
//!
//! Paints what a `SurfaceState` holds: the card preview beside the editor
//! and the deck preview window with slide navigation. Slides are drawn as a
//! schematic of the exported page: background color, image area, text block
//! at its grid position and the chosen text size.

use crate::deck::{hex_to_rgb, FontSize, Layout, Slide, DEFAULT_BACKGROUND};
use crate::preview::SurfaceState;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Rounding, Stroke, Ui, Vec2};

/// Width over height of a slide.
const SLIDE_ASPECT: f32 = 16.0 / 9.0;

/// Padding between the slide edge and its text block.
const SLIDE_PADDING: f32 = 14.0;

// ─────────────────────────────────────────────────────────────────────────────
// Slide Painting
// ─────────────────────────────────────────────────────────────────────────────

/// Title and description point sizes for a font size, at a reference slide
/// width of 480 px.
fn text_sizes(font_size: FontSize) -> (f32, f32) {
    match font_size {
        FontSize::Small => (18.0, 11.0),
        FontSize::Medium => (24.0, 13.0),
        FontSize::Large => (32.0, 16.0),
    }
}

/// Slide background, falling back to the default color.
pub fn background_color(slide: &Slide) -> Color32 {
    let [r, g, b] = hex_to_rgb(&slide.background)
        .or_else(|| hex_to_rgb(DEFAULT_BACKGROUND))
        .unwrap_or([0x0a, 0x9c, 0x97]);
    Color32::from_rgb(r, g, b)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luminance = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luminance > 150.0 {
        Color32::from_rgb(20, 20, 20)
    } else {
        Color32::WHITE
    }
}

/// Split a slide into its image area and text area.
fn layout_areas(layout: Layout, has_image: bool, rect: Rect) -> (Option<Rect>, Rect) {
    let half = rect.width() / 2.0;
    match layout {
        Layout::ImageLeft => {
            let image = Rect::from_min_size(rect.min, Vec2::new(half, rect.height()));
            let text = Rect::from_min_max(Pos2::new(rect.min.x + half, rect.min.y), rect.max);
            (Some(image), text)
        }
        Layout::ImageRight => {
            let text = Rect::from_min_size(rect.min, Vec2::new(half, rect.height()));
            let image = Rect::from_min_max(Pos2::new(rect.min.x + half, rect.min.y), rect.max);
            (Some(image), text)
        }
        Layout::Overlay if has_image => (Some(rect), rect),
        Layout::Overlay | Layout::TextOnly => (None, rect),
    }
}

/// Anchor of the text block for a grid cell (row, column).
fn text_anchor(cell: (usize, usize)) -> Align2 {
    let horizontal = match cell.1 {
        0 => egui::Align::Min,
        1 => egui::Align::Center,
        _ => egui::Align::Max,
    };
    let vertical = match cell.0 {
        0 => egui::Align::Min,
        1 => egui::Align::Center,
        _ => egui::Align::Max,
    };
    Align2([horizontal, vertical])
}

/// Paint one slide into `rect`.
pub fn paint_slide(ui: &Ui, slide: &Slide, rect: Rect) {
    let painter = ui.painter_at(rect);
    let background = background_color(slide);
    painter.rect_filled(rect, Rounding::same(6.0), background);

    let has_image = !slide.image.trim().is_empty();
    let (image_area, text_area) = layout_areas(slide.layout, has_image, rect);

    if let Some(area) = image_area {
        let shade = if slide.layout == Layout::Overlay {
            Color32::from_black_alpha(90)
        } else {
            Color32::from_black_alpha(40)
        };
        painter.rect_filled(area.shrink(2.0), Rounding::same(4.0), shade);
        let label = if has_image {
            format!("🖼 {}", slide.image)
        } else {
            "🖼 no image".to_string()
        };
        painter.text(
            area.center_bottom() - Vec2::new(0.0, 10.0),
            Align2::CENTER_BOTTOM,
            label,
            FontId::proportional(10.0),
            Color32::from_white_alpha(180),
        );
    }

    let scale = (rect.width() / 480.0).clamp(0.4, 2.5);
    let (title_size, description_size) = text_sizes(slide.font_size);
    let text_color = if slide.layout == Layout::Overlay && has_image {
        Color32::WHITE
    } else {
        text_color_on(background)
    };

    let anchor = text_anchor(slide.position.grid_cell());
    let inner = text_area.shrink(SLIDE_PADDING * scale);

    let wrap_width = inner.width();
    let title_galley = painter.layout(
        slide.title.clone(),
        FontId::proportional(title_size * scale),
        text_color,
        wrap_width,
    );
    let description_galley = painter.layout(
        slide.description.clone(),
        FontId::proportional(description_size * scale),
        text_color,
        wrap_width,
    );

    let gap = 6.0 * scale;
    let block = Vec2::new(
        title_galley.size().x.max(description_galley.size().x),
        title_galley.size().y + gap + description_galley.size().y,
    );
    let block_rect = anchor.align_size_within_rect(block, inner);

    let title_x = align_x(anchor, block_rect, title_galley.size().x);
    let description_x = align_x(anchor, block_rect, description_galley.size().x);
    let title_height = title_galley.size().y;
    painter.galley(Pos2::new(title_x, block_rect.min.y), title_galley, text_color);
    painter.galley(
        Pos2::new(description_x, block_rect.min.y + title_height + gap),
        description_galley,
        text_color,
    );
}

fn align_x(anchor: Align2, block: Rect, width: f32) -> f32 {
    match anchor.x() {
        egui::Align::Min => block.min.x,
        egui::Align::Center => block.center().x - width / 2.0,
        egui::Align::Max => block.max.x - width,
    }
}

/// Allocate a 16:9 area as wide as the available space, capped by height.
fn allocate_slide_rect(ui: &mut Ui, max_height: f32) -> Rect {
    let width = ui.available_width().min(max_height * SLIDE_ASPECT).max(120.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, width / SLIDE_ASPECT), egui::Sense::hover());
    rect
}

fn paint_loading(ui: &Ui, rect: Rect) {
    ui.painter()
        .rect_stroke(rect, Rounding::same(6.0), Stroke::new(1.0, ui.visuals().weak_text_color()));
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Loading preview…",
        FontId::proportional(13.0),
        ui.visuals().weak_text_color(),
    );
}

fn playback_badges(ui: &mut Ui, surface: &SurfaceState) {
    if let Some(message) = surface.message() {
        ui.horizontal(|ui| {
            if message.data.autoplay {
                ui.label(RichText::new("⏵ Autoplay").small().weak());
            }
            if message.data.loop_playback {
                ui.label(RichText::new("🔁 Loop").small().weak());
            }
            if let Some(slide) = surface.current_slide() {
                ui.label(RichText::new(format!("✨ {}", slide.animation.label())).small().weak());
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card Preview
// ─────────────────────────────────────────────────────────────────────────────

/// Render the card surface: the active slide on its own.
pub fn show_card_preview(ui: &mut Ui, surface: &SurfaceState) {
    ui.label(RichText::new("Preview").strong());
    ui.add_space(4.0);

    let max_height = ui.available_height() * 0.6;
    let rect = allocate_slide_rect(ui, max_height);
    match surface.current_slide() {
        Some(slide) if !surface.is_loading() => paint_slide(ui, slide, rect),
        _ => paint_loading(ui, rect),
    }

    ui.add_space(4.0);
    playback_badges(ui, surface);
}

// ─────────────────────────────────────────────────────────────────────────────
// Deck Preview
// ─────────────────────────────────────────────────────────────────────────────

/// Render the deck preview window.
pub fn show_deck_preview(ctx: &egui::Context, open: &mut bool, surface: &mut SurfaceState) {
    let mut window_open = *open;
    egui::Window::new("Deck Preview")
        .open(&mut window_open)
        .collapsible(false)
        .resizable(true)
        .default_size([720.0, 460.0])
        .show(ctx, |ui| {
            let rect = allocate_slide_rect(ui, ui.available_height() - 48.0);
            match surface.current_slide() {
                Some(slide) if !surface.is_loading() => paint_slide(ui, slide, rect),
                _ => paint_loading(ui, rect),
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let count = surface.slide_count();
                let current = surface.current_index();
                let looping = surface
                    .message()
                    .is_some_and(|m| m.data.loop_playback);

                let can_go_back = looping || current > 0;
                let can_go_forward = looping || current + 1 < count;

                if ui
                    .add_enabled(can_go_back, egui::Button::new("◀"))
                    .clicked()
                {
                    surface.previous();
                }
                ui.label(format!("{} / {}", current + 1, count.max(1)));
                if ui
                    .add_enabled(can_go_forward, egui::Button::new("▶"))
                    .clicked()
                {
                    surface.next();
                }

                ui.add_space(12.0);
                playback_badges(ui, surface);
            });

            if ui.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                surface.next();
            }
            if ui.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                surface.previous();
            }
        });
    *open = window_open;
}
