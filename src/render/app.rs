//! Terminal session and render loop.
//!
//! The render loop owns the terminal. It forwards key presses to the input
//! thread, keeps the newest snapshot from the logic thread and redraws it.

use crate::input::events::RawInputEvent;
use crate::render::draw;
use crate::shared::snapshot::RenderState;
use crate::system::bus::{SystemBus, SystemEvent};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Upper bound on how long one loop iteration waits for a key.
const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Main application struct handling terminal events.
pub struct App {
    bus: SystemBus,
    state: RenderState,
    size: (u16, u16),
}

impl App {
    pub fn new(bus: SystemBus, size: (u16, u16)) -> Self {
        Self {
            bus,
            state: RenderState::Empty,
            size,
        }
    }

    /// Runs the render loop (blocking) until the player quits.
    pub fn run(bus: SystemBus) -> Result<()> {
        let mut out = io::stdout();
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )
        .context("failed to enter the alternate screen")?;
        log::info!("RENDER: Terminal ready");

        let size = terminal::size().unwrap_or((80, 24));
        let mut app = App::new(bus, size);
        let outcome = app.event_loop(&mut out);

        // Always hand the terminal back, even if the loop failed.
        let restored = restore(&mut out);
        outcome.and(restored)
    }

    fn event_loop(&mut self, out: &mut Stdout) -> Result<()> {
        loop {
            if event::poll(POLL_INTERVAL)? {
                let event = event::read()?;
                if !self.handle_event(&event) {
                    log::info!("RENDER: Quit requested");
                    let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                    return Ok(());
                }
            }

            // Update state from logic thread
            if let Some(snapshot) = self.bus.render_rx.try_iter().last() {
                self.state = snapshot;
            }

            draw::compose(&self.state, self.size.0, self.size.1).flush(out)?;
        }
    }

    /// Routes one terminal event. Returns `false` when the app should exit.
    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key)
                if key.kind == KeyEventKind::Press
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) =>
            {
                false
            }
            Event::Resize(width, height) => {
                self.size = (*width, *height);
                true
            }
            _ => {
                if let Some(raw_event) = RawInputEvent::from_crossterm(event) {
                    let _ = self.bus.raw_input_tx.send(raw_event);
                }
                true
            }
        }
    }
}

fn restore(out: &mut Stdout) -> Result<()> {
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap
    )
    .context("failed to leave the alternate screen")?;
    terminal::disable_raw_mode().context("failed to disable raw mode")?;
    log::info!("RENDER: Terminal restored");
    Ok(())
}
