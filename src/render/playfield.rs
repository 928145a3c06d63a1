//! Playfield configuration and layout.
//!
//! Maps track coordinates (lane index, position along the track) onto
//! terminal cells.

use crossterm::style::Color;

/// Lane colors, cycled when there are more lanes than entries.
const LANE_COLORS: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

/// Configuration for the playfield layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayfieldConfig {
    pub column_width: u16,
    pub x_offset: u16,
    /// First row of the track.
    pub y_offset: u16,
    /// Rows covering the whole track length.
    pub rows: u16,
}

impl PlayfieldConfig {
    /// Centers `lane_count` columns in a `width` x `height` terminal, leaving
    /// the top rows for the HUD and the bottom rows for lane labels.
    pub fn fit(lane_count: usize, width: u16, height: u16) -> Self {
        let lanes = lane_count.max(1) as u16;
        let column_width = (width / lanes).clamp(3, 8);
        let total = column_width.saturating_mul(lanes);
        Self {
            column_width,
            x_offset: width.saturating_sub(total) / 2,
            y_offset: HUD_ROWS,
            rows: height.saturating_sub(HUD_ROWS + FOOTER_ROWS).max(1),
        }
    }

    /// Row of a track position, or `None` past the end of the track.
    pub fn row_for(&self, position: f64, track_length: f64) -> Option<u16> {
        if track_length <= 0.0 || !(0.0..=track_length).contains(&position) {
            return None;
        }
        let row = (position / track_length * (self.rows - 1) as f64).round() as u16;
        Some(self.y_offset + row.min(self.rows - 1))
    }

    /// Left edge of a lane column.
    pub fn column_x(&self, lane: usize) -> u16 {
        self.x_offset + self.column_width * lane as u16
    }

    /// Column of a fractional lane coordinate (particles).
    pub fn x_for(&self, lane_units: f64) -> u16 {
        let x = self.x_offset as f64 + lane_units * self.column_width as f64;
        x.max(0.0) as u16
    }

    /// Row just below the track.
    pub fn footer_row(&self) -> u16 {
        self.y_offset + self.rows
    }
}

/// Rows reserved above the track.
pub const HUD_ROWS: u16 = 3;
/// Rows reserved below the track.
pub const FOOTER_ROWS: u16 = 2;

pub fn lane_color(lane: usize) -> Color {
    LANE_COLORS[lane % LANE_COLORS.len()]
}
