//! Snapshot composition into a character grid.
//!
//! `compose` is pure: it turns a `RenderState` into a `Canvas`, which `flush`
//! then writes to the terminal in one synchronized update.

use super::playfield::{PlayfieldConfig, lane_color};
use crate::models::stats::Judgement;
use crate::shared::snapshot::{EchoSnapshot, GameplaySnapshot, RenderState};
use crate::state::SessionPhase;
use crate::state::echo::EchoStatus;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::{cursor, queue};
use std::io::{self, Write};

const CONTROLS: &str = "Enter start  F5 restart  Esc stop  Tab switch game  F9 reload keys  Ctrl+C quit";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

/// Fixed-size grid of colored characters.
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width as usize * height as usize],
        }
    }

    /// Writes one character; out-of-bounds writes are dropped.
    pub fn put(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = Cell { ch, fg };
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            let Some(xx) = x.checked_add(i as u16) else {
                break;
            };
            if xx >= self.width {
                break;
            }
            self.put(xx, y, ch, fg);
        }
    }

    /// Writes `text` centered on the row.
    pub fn put_centered(&mut self, y: u16, text: &str, fg: Color) {
        let len = text.chars().count() as u16;
        self.put_str(self.width.saturating_sub(len) / 2, y, text, fg);
    }

    /// Plain text of one row, trailing spaces trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let row: String = self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        (x < self.width && y < self.height)
            .then(|| self.cells[y as usize * self.width as usize + x as usize].ch)
    }

    /// Writes the whole grid to `out`.
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut current_fg = None;
        for y in 0..self.height {
            queue!(out, cursor::MoveTo(0, y))?;
            let start = y as usize * self.width as usize;
            for cell in &self.cells[start..start + self.width as usize] {
                if current_fg != Some(cell.fg) {
                    queue!(out, SetForegroundColor(cell.fg))?;
                    current_fg = Some(cell.fg);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }
}

/// Lays out the latest snapshot on a `width` x `height` grid.
pub fn compose(state: &RenderState, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    match state {
        RenderState::Empty => canvas.put_centered(height / 2, "Loading...", Color::Grey),
        RenderState::Rhythm(snapshot) => draw_rhythm(&mut canvas, snapshot),
        RenderState::Echo(snapshot) => draw_echo(&mut canvas, snapshot),
    }
    canvas
}

fn draw_rhythm(canvas: &mut Canvas, snap: &GameplaySnapshot) {
    let layout = PlayfieldConfig::fit(snap.lane_labels.len(), canvas.width, canvas.height);

    canvas.put_str(
        1,
        0,
        &format!(
            "RHYTHM  Score: {}  Combo: {}  Level: {}",
            snap.score, snap.combo, snap.level
        ),
        Color::White,
    );
    let (status, color) = rhythm_status(snap);
    canvas.put_str(1, 1, &status, color);
    canvas.put_str(1, 2, CONTROLS, Color::DarkGrey);

    let lanes = snap.lane_labels.len();
    let right = layout.column_x(lanes);
    for row in layout.y_offset..layout.footer_row() {
        for lane in 0..=lanes {
            canvas.put(layout.column_x(lane), row, '│', Color::DarkGrey);
        }
    }

    // Hit window band and judgement line.
    let band = [
        (snap.hit_line - snap.hit_window, '-'),
        (snap.hit_line + snap.hit_window, '-'),
        (snap.hit_line, '='),
    ];
    for (position, ch) in band {
        if let Some(row) = layout.row_for(position, snap.track_length) {
            for x in layout.x_offset + 1..right {
                if canvas.char_at(x, row) != Some('│') {
                    canvas.put(x, row, ch, Color::Grey);
                }
            }
        }
    }

    for note in &snap.notes {
        let Some(row) = layout.row_for(note.position, snap.track_length) else {
            continue;
        };
        let x = layout.column_x(note.lane) + 1;
        for dx in 0..layout.column_width.saturating_sub(1) {
            canvas.put(x + dx, row, '█', lane_color(note.color_key));
        }
    }

    for particle in &snap.particles {
        let Some(row) = layout.row_for(particle.y, snap.track_length) else {
            continue;
        };
        let ch = if particle.alpha > 0.5 { '*' } else { '.' };
        canvas.put(layout.x_for(particle.x), row, ch, Color::White);
    }

    for (lane, label) in snap.lane_labels.iter().enumerate() {
        let x = layout.column_x(lane) + 1;
        canvas.put_str(x, layout.footer_row(), label, lane_color(lane));
    }
}

fn rhythm_status(snap: &GameplaySnapshot) -> (String, Color) {
    match snap.phase {
        SessionPhase::Idle => ("Press Enter to start".to_string(), Color::Cyan),
        SessionPhase::Playing => {
            let misses = if snap.max_misses > 0 {
                format!("Misses: {}/{}", snap.misses, snap.max_misses)
            } else {
                format!("Misses: {}", snap.misses)
            };
            match snap.last_judgement {
                Some(Judgement::Hit { .. }) => (format!("HIT!   {}", misses), Color::Green),
                Some(Judgement::Miss) => (format!("MISS   {}", misses), Color::Red),
                None => (misses, Color::Grey),
            }
        }
        SessionPhase::Ended => match &snap.result {
            Some(result) => (
                format!(
                    "Finished - score {}, max combo {}, accuracy {:.1}%. Enter to play again",
                    result.score,
                    result.max_combo,
                    result.accuracy()
                ),
                Color::Yellow,
            ),
            None => ("Finished. Enter to play again".to_string(), Color::Yellow),
        },
    }
}

fn draw_echo(canvas: &mut Canvas, snap: &EchoSnapshot) {
    canvas.put_str(
        1,
        0,
        &format!(
            "ECHO  Score: {}  Combo: {}  Round: {}",
            snap.score, snap.combo, snap.level
        ),
        Color::White,
    );
    canvas.put_str(1, 1, &echo_status(snap), Color::Cyan);
    canvas.put_str(1, 2, CONTROLS, Color::DarkGrey);

    let pads = snap.lane_labels.len().max(1) as u16;
    let pad_width = (canvas.width / pads).clamp(5, 12);
    let pad_height = canvas.height.saturating_sub(6).clamp(3, 7);
    let x0 = canvas.width.saturating_sub(pad_width * pads) / 2;
    let y0 = 4;

    for (pad, label) in snap.lane_labels.iter().enumerate() {
        let lit = snap.lit_pad == Some(pad);
        let color = if lit { lane_color(pad) } else { Color::DarkGrey };
        let fill = if lit { '█' } else { '░' };
        let x = x0 + pad_width * pad as u16;
        for dy in 0..pad_height {
            for dx in 0..pad_width.saturating_sub(1) {
                canvas.put(x + dx, y0 + dy, fill, color);
            }
        }
        canvas.put_str(x + 1, y0 + pad_height, label, lane_color(pad));
    }
}

fn echo_status(snap: &EchoSnapshot) -> String {
    match snap.status {
        EchoStatus::Ready => "Press Enter to start".to_string(),
        EchoStatus::Watch => "Watch the pads...".to_string(),
        EchoStatus::Listen => "Listen...".to_string(),
        EchoStatus::YourTurn => {
            format!("Your turn! ({}/{})", snap.progress, snap.sequence_len)
        }
        EchoStatus::GoodJob => "Good job!".to_string(),
        EchoStatus::GameOver => format!("Game over! You reached level {}", snap.level),
    }
}
