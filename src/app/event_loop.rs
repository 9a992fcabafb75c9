use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use ratatui::layout::Rect;
use ratatui::{DefaultTerminal, Frame};

use crate::ui;

use super::App;
use super::effects::handle_message_side_effects;
use super::input::handle_event;
use super::model::Model;
use super::update::{Message, update};

/// Poll timeout while idle; keeps toast expiry ticking.
const IDLE_POLL_MS: u64 = 250;
/// Resize events arrive in bursts while the user drags the terminal corner.
const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Collapses a burst of resize events into the last one.
struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(u16, u16, Instant)>,
}

impl ResizeDebouncer {
    const fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    fn queue(&mut self, width: u16, height: u16) {
        self.pending = Some((width, height, Instant::now()));
    }

    const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn take_ready(&mut self, now: Instant) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now.duration_since(queued_at) >= self.delay {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }
}

impl App {
    /// Initialize the terminal, run the event loop, restore on exit.
    pub fn run(self) -> Result<()> {
        let mut terminal = ratatui::try_init().context("Failed to initialize terminal")?;
        execute!(stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;

        let size = terminal.size().context("Failed to read terminal size")?;
        let mut model = self.build_model((size.width, size.height));

        let result = Self::event_loop(&mut terminal, &mut model);

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut debouncer = ResizeDebouncer::new(RESIZE_DEBOUNCE_MS);
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }
            if let Some((width, height)) = debouncer.take_ready(Instant::now()) {
                Self::apply(model, Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render || debouncer.has_pending() {
                0
            } else {
                IDLE_POLL_MS
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                if Self::dispatch_event(model, &mut debouncer)? {
                    needs_render = true;
                }
                // Drain queued events so key repeat and mouse drags coalesce
                // into a single render.
                while event::poll(Duration::from_millis(0))? {
                    if Self::dispatch_event(model, &mut debouncer)? {
                        needs_render = true;
                    }
                }
            }

            if model.should_quit {
                break;
            }
            if needs_render {
                Self::refresh_preview_if_dirty(model);
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }

    fn dispatch_event(model: &mut Model, debouncer: &mut ResizeDebouncer) -> Result<bool> {
        let event = event::read()?;
        if let Event::Resize(width, height) = event {
            debouncer.queue(width, height);
            return Ok(false);
        }
        let Some(msg) = handle_event(&event, model) else {
            return Ok(false);
        };
        Self::apply(model, msg);
        Ok(true)
    }

    /// Run the pure update, then side effects, then drain any selection a
    /// formatting operation deferred. The buffer swap is always observed
    /// before the selection is restored.
    pub(super) fn apply(model: &mut Model, msg: Message) {
        let effect_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        handle_message_side_effects(model, &effect_msg);
        while let Some(selection) = model.pending_selection.take() {
            *model = update(std::mem::take(model), Message::RestoreSelection(selection));
        }
        // The editor is the only surface and always has focus; draining the
        // request here keeps the flag from carrying over between messages.
        let _ = model.editor.take_focus_request();
    }

    fn refresh_preview_if_dirty(model: &mut Model) {
        if !(model.preview_dirty && model.preview_visible) {
            return;
        }
        let frame = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
        let (_, main_area, _) = ui::layout_rows(frame);
        let (_, _, preview_area) =
            ui::split_panes(main_area, model.split_percent, model.preview_visible);
        if let Some(preview_area) = preview_area {
            model.refresh_preview(preview_area.width);
        }
    }

    fn view(model: &Model, frame: &mut Frame) {
        ui::render(model, frame);
    }
}
