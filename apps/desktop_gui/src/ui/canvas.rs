//! Bar canvas: paints the current sequence snapshot, with the pair the sort
//! last swapped drawn in a highlight colour.

use eframe::egui;
use sort_core::{bar_layout, Sequence};

const CANVAS_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(238, 238, 238);
const BAR_FILL: egui::Color32 = egui::Color32::BLUE;
const SWAPPED_FILL: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);

fn bar_fill(index: usize, highlight: Option<(usize, usize)>) -> egui::Color32 {
    match highlight {
        Some((left, right)) if index == left || index == right => SWAPPED_FILL,
        _ => BAR_FILL,
    }
}

/// Converts a bar in canvas-local pixels to screen space.
fn bar_rect(origin: egui::Pos2, bar: &sort_core::Bar) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(bar.x as f32, bar.y as f32),
        egui::vec2(bar.width as f32, bar.height as f32),
    )
}

pub fn show(ui: &mut egui::Ui, sequence: &Sequence, highlight: Option<(usize, usize)>) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

    let width = rect.width().max(0.0) as u32;
    let height = rect.height().max(0.0) as u32;
    for bar in bar_layout(sequence, width, height) {
        if bar.width == 0 || bar.height == 0 {
            continue;
        }
        painter.rect_filled(
            bar_rect(rect.min, &bar),
            0.0,
            bar_fill(bar.index, highlight),
        );
    }
}
