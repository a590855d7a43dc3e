//! Level layouts
//!
//! Maps a level number to invader spawn positions, laid out around the field's
//! horizontal center below a fixed top margin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::FieldConfig;

/// Top margin for patterned levels
pub const PATTERN_TOP: f32 = 80.0;
pub const PATTERN_SPACING_X: f32 = 45.0;
pub const PATTERN_SPACING_Y: f32 = 50.0;

/// Classic grid dimensions
pub const CLASSIC_ROWS: usize = 4;
pub const CLASSIC_COLS: usize = 10;
pub const CLASSIC_TOP: f32 = 100.0;
pub const CLASSIC_SPACING_X: f32 = 60.0;
pub const CLASSIC_SPACING_Y: f32 = 50.0;

/// Which spawn layout the game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormationLayout {
    /// Same 4x10 grid every level
    Classic,
    /// Columns for levels 1-2, diamond from level 3 on
    #[default]
    Patterned,
}

impl FormationLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormationLayout::Classic => "classic",
            FormationLayout::Patterned => "patterned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" | "grid" => Some(FormationLayout::Classic),
            "patterned" | "pattern" => Some(FormationLayout::Patterned),
            _ => None,
        }
    }
}

/// Spawn positions (invader centers) for `level`
pub fn spawn_positions(level: u32, layout: FormationLayout, field: &FieldConfig) -> Vec<Vec2> {
    match layout {
        FormationLayout::Classic => classic_grid(field),
        FormationLayout::Patterned => patterned(level.max(1), field),
    }
}

/// Number of diamond rows for a level (3+ only)
pub fn diamond_rows(level: u32) -> u32 {
    3 + (level / 2).min(2)
}

fn patterned(level: u32, field: &FieldConfig) -> Vec<Vec2> {
    let center_x = field.width / 2.0;
    let mut positions = Vec::new();

    match level {
        1 => {
            // Two columns of five, straddling the center
            for column_x in [
                center_x - PATTERN_SPACING_X / 2.0,
                center_x + PATTERN_SPACING_X / 2.0,
            ] {
                push_column(&mut positions, 5, column_x);
            }
        }
        2 => {
            for i in 0..3 {
                let column_x = center_x - PATTERN_SPACING_X + i as f32 * PATTERN_SPACING_X;
                push_column(&mut positions, 4, column_x);
            }
        }
        _ => {
            let rows = diamond_rows(level);
            let half = rows.div_ceil(2);
            for i in 0..rows {
                // Grows to the middle row then shrinks
                let count = if i < half { i + 1 } else { rows - i };
                let offset = (half - count) as f32 * PATTERN_SPACING_X / 2.0;
                let y = PATTERN_TOP + i as f32 * PATTERN_SPACING_Y;
                for j in 0..count {
                    positions.push(Vec2::new(
                        center_x - offset + j as f32 * PATTERN_SPACING_X,
                        y,
                    ));
                }
            }
        }
    }

    positions
}

fn push_column(positions: &mut Vec<Vec2>, count: usize, x: f32) {
    for i in 0..count {
        positions.push(Vec2::new(x, PATTERN_TOP + i as f32 * PATTERN_SPACING_Y));
    }
}

fn classic_grid(field: &FieldConfig) -> Vec<Vec2> {
    use crate::consts::{EDGE_PADDING, INVADER_WIDTH};

    // Shrink columns on narrow fields so the grid starts inside the march band
    let usable = field.width - 2.0 * EDGE_PADDING - 3.0 * INVADER_WIDTH;
    let spacing_x = CLASSIC_SPACING_X
        .min(usable / (CLASSIC_COLS - 1) as f32)
        .max(0.0);
    let start_x = field.width / 2.0 - spacing_x * (CLASSIC_COLS - 1) as f32 / 2.0;

    let mut positions = Vec::with_capacity(CLASSIC_ROWS * CLASSIC_COLS);
    for row in 0..CLASSIC_ROWS {
        for col in 0..CLASSIC_COLS {
            positions.push(Vec2::new(
                start_x + col as f32 * spacing_x,
                CLASSIC_TOP + row as f32 * CLASSIC_SPACING_Y,
            ));
        }
    }
    positions
}
