//! Runtime: unified event loop and input routing for the controller.
//!
//! Responsibilities
//! - Own the terminal lifecycle (alternate screen, raw mode, mouse capture,
//!   bracketed paste).
//! - Drive a single event loop that handles input, request completions and
//!   throbber animation.
//! - Route input to `MainView`, hand returned `Effect`s to `cmd`, and feed
//!   every completion back as `Msg::ExecCompleted`.
//!
//! Input comes from a dedicated task blocking on `crossterm::event::read()`
//! that forwards events over a channel. Ticks are fast (100 ms) only while a
//! request is in flight and slow (5 s) otherwise.
use std::time::{Duration, Instant};

use anyhow::Result;
use colorevolve_types::{Effect, ExecOutcome, Msg};
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::App;
use crate::cmd::{self, CmdContext};
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn the input task that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Mouse move events are throttled to one per 16 ms.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok() {
                match event::read() {
                    Ok(event) => {
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so the table's hit area is current.
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        app.focus.first();
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Whether the key asks the controller to quit.
fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Handle raw crossterm input events and update `App`/components.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => main_view.handle_key_events(app, key_event),
        Event::Key(_) => Vec::new(),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::Paste(text) => main_view.handle_paste(app, &text),
        Event::FocusGained | Event::FocusLost => Vec::new(),
    }
}

/// Entry point for the terminal runtime: sets up the terminal, spawns the
/// event producer, runs the async event loop, and performs cleanup on exit.
pub async fn run_app(mut app: App, ctx: CmdContext) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = Vec::with_capacity(4);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;
    info!(capabilities = ?app.capabilities, "controller started");

    loop {
        let needs_animation = app.is_busy() || !pending_execs.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(event) if is_quit_key(&event) => break,
                    Some(event) => effects.extend(handle_input_event(&mut app, &mut main_view, event)),
                    // Input channel closed; shut down cleanly.
                    None => break,
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = needs_animation;
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                // A panicked task carries no control tag; the wrapper in `cmd`
                // already turns task failures into tagged outcomes.
                match joined {
                    Ok(outcome) => effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)))),
                    Err(error) => warn!(%error, "execution task aborted"),
                }
                if !app.is_busy() {
                    app.throbber_idx = 0;
                }
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            let batch = std::mem::take(&mut effects);
            pending_execs.extend(cmd::run_from_effects(&ctx, batch));
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    info!("controller stopped");
    cleanup_terminal(&mut terminal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::*;

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(&Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))));
        assert!(is_quit_key(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))));
        assert!(!is_quit_key(&Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))));
        assert!(!is_quit_key(&Event::Paste("q".into())));
    }
}
