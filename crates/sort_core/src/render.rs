//! Bar geometry for the canvas, in canvas-local pixels with the origin at
//! the top-left corner.

use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Lays out one bottom-anchored bar per element.
///
/// Each element gets a slot `floor(width / n)` pixels wide and is drawn one
/// pixel narrower; its height is `value / max_value` of the canvas height,
/// truncated to whole pixels.
pub fn bar_layout(sequence: &Sequence, width: u32, height: u32) -> Vec<Bar> {
    let count = sequence.len();
    if count == 0 {
        return Vec::new();
    }
    let slot = width / count as u32;
    let drawn_width = slot.saturating_sub(1);
    let max_value = f64::from(sequence.max_value());

    sequence
        .values()
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let bar_height = ((f64::from(value) / max_value) * f64::from(height)) as u32;
            let bar_height = bar_height.min(height);
            Bar {
                index,
                x: index as u32 * slot,
                y: height - bar_height,
                width: drawn_width,
                height: bar_height,
            }
        })
        .collect()
}
