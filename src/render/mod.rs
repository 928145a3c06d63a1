//! Terminal rendering: event pump, layout and drawing.

pub mod app;
pub mod draw;
pub mod playfield;
