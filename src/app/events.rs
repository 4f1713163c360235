//! Event handling for ViewerApp.
//!
//! Contains handlers for:
//! - Event bus events (handle_events)
//! - Keyboard input (handle_keyboard_input)

use eframe::egui;
use log::trace;

use super::ViewerApp;
use crate::core::player_events::{StepBackwardEvent, StepForwardEvent, TogglePlayPauseEvent};
use crate::main_events::{self, EventResult};

impl ViewerApp {
    /// Handle events from event bus.
    ///
    /// While a warning is open the app is blocked: queued events are dropped
    /// until it is acknowledged.
    pub fn handle_events(&mut self) {
        let events = self.event_bus.poll();
        for event in events {
            if self.warning.is_some() {
                trace!("Event dropped while a warning is open");
                continue;
            }
            match main_events::handle_app_event(
                &event,
                &mut self.player,
                &mut self.session,
                &mut self.settings,
                &mut self.show_settings,
            ) {
                Some(result) => self.apply_event_result(result),
                None => trace!("Event without handler dropped"),
            }
        }
    }

    /// Execute the deferred part of an event: tabs, dialogs, status text.
    fn apply_event_result(&mut self, result: EventResult) {
        for id in result.opened_docks {
            self.add_array_tab(id);
        }
        for id in result.closed_docks {
            self.remove_array_tab(id);
        }
        if let Some(visible) = result.show_operations {
            self.set_operations_visible(visible);
        }
        if let Some(warning) = result.warning {
            // keep the first one until it is acknowledged
            self.warning.get_or_insert(warning);
        }
        if let Some(message) = result.status {
            self.status_bar.set_message(message);
        }
        self.reset_settings_pending |= result.reset_settings;
    }

    /// Space toggles playback, Left/Right step one frame.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        // Don't process hotkeys when text input is active (typing in fields)
        if ctx.wants_keyboard_input() || self.warning.is_some() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Space) {
                self.event_bus.emit(TogglePlayPauseEvent);
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                self.event_bus.emit(StepForwardEvent);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                self.event_bus.emit(StepBackwardEvent);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::app::tests::app;
    use crate::core::player_events::SetFrameEvent;
    use crate::dialogs::warning::Warning;
    use crate::entities::operation::BinaryOp;
    use crate::widgets::operations::operation_events::CreateDerivedEvent;

    #[test]
    fn events_are_ignored_while_warning_is_open() {
        let mut app = app();
        app.warning = Some(Warning::new("Calculation error", "division by zero"));

        app.event_bus.emit(SetFrameEvent(2));
        app.event_bus.emit(CreateDerivedEvent {
            op: BinaryOp::Sum,
            a: "A".into(),
            b: "B".into(),
        });
        app.handle_events();
        assert_eq!(app.session.frame(), 0);
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.event_bus.queue_len(), 0);

        app.warning = None;
        app.event_bus.emit(SetFrameEvent(2));
        app.handle_events();
        assert_eq!(app.session.frame(), 2);
    }

    #[test]
    fn failed_derivation_blocks_the_rest_of_the_batch() {
        let mut app = app();
        // "A" has a zero at (0, 0, 0), so B / A is not finite
        app.event_bus.emit(CreateDerivedEvent {
            op: BinaryOp::Division,
            a: "B".into(),
            b: "A".into(),
        });
        app.event_bus.emit(SetFrameEvent(3));
        app.handle_events();

        assert_eq!(app.warning.as_ref().map(|w| w.title.as_str()), Some("Calculation error"));
        assert_eq!(app.session.frame(), 0);
        assert_eq!(app.session.len(), 2);
    }
}
