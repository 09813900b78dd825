//! wp-tui - a terminal UI for managing a WordPress site through wp-cli
//!
//! Content export with per-section filters, plan plugin setup, theme
//! management and invite acceptance, from one keyboard-driven screen.

mod action;
mod app;
mod component;
mod components;
mod config;
mod i18n;
mod model;
mod services;
mod tui;

use action::Action;
use anyhow::Result;
use app::App;
use crossterm::event::Event;
use std::time::Duration;
use tui::Tui;

fn main() -> Result<()> {
    let mut app = App::new()?;
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let result = run(&mut app, &mut tui);
    tui.exit()?;
    result
}

fn run(app: &mut App, tui: &mut Tui) -> Result<()> {
    while !app.should_quit {
        let mut draw_result = Ok(());
        tui.draw(|frame| draw_result = app.draw(frame))?;
        draw_result?;

        match tui.next_event()? {
            Some(Event::Key(key)) => {
                if let Some(action) = app.handle_key_event(key)? {
                    app.dispatch(action)?;
                }
                // Background work still advances on input-heavy sessions
                app.dispatch(Action::Tick)?;
            }
            Some(Event::Resize(width, height)) => {
                app.dispatch(Action::Resize(width, height))?;
            }
            _ => app.dispatch(Action::Tick)?,
        }
    }
    Ok(())
}
