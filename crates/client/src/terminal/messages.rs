//! Message log fed by runtime events.
use std::collections::VecDeque;

use annex_core::{CatalogOracle, Intent, Notice, Verdict};
use runtime::{ContentEvent, Event, GameStateEvent, OracleBundle, PersistenceEvent};

/// Severity level for UI messages produced from runtime events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct MessageEntry {
    pub text: String,
    /// Game clock in milliseconds, when the message came from an intent.
    pub timestamp: Option<u64>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, timestamp: Option<u64>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            timestamp,
            level,
        }
    }

    /// `[mm:ss] text`, with a marker for warnings and errors.
    pub fn format(&self) -> String {
        let marker = match self.level {
            MessageLevel::Info => "",
            MessageLevel::Warning => "! ",
            MessageLevel::Error => "!! ",
        };
        match self.timestamp {
            Some(ms) => {
                let secs = ms / 1000;
                format!("[{:02}:{:02}] {}{}", secs / 60, secs % 60, marker, self.text)
            }
            None => format!("{}{}", marker, self.text),
        }
    }
}

/// Circular buffer of messages, with a cursor over the ones not yet printed.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
    unread: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
            unread: 0,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.unread = (self.unread + 1).min(self.entries.len());
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    /// Messages pushed since the last call, oldest first.
    pub fn take_unread(&mut self) -> Vec<MessageEntry> {
        let start = self.entries.len() - self.unread;
        self.unread = 0;
        self.entries.iter().skip(start).cloned().collect()
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the screen needs after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            requires_redraw: self.requires_redraw || other.requires_redraw,
        }
    }
}

/// Turns runtime events into player-facing messages.
pub struct EventConsumer {
    log: MessageLog,
    oracles: OracleBundle,
}

impl EventConsumer {
    pub fn new(log: MessageLog, oracles: OracleBundle) -> Self {
        Self { log, oracles }
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    pub fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn on_event(&mut self, event: &Event) -> EventImpact {
        match event {
            Event::GameState(GameStateEvent::IntentApplied {
                intent,
                feedback,
                notices,
                clock_ms,
                ..
            }) => {
                let mut impact = EventImpact::none();
                if let Some(feedback) = feedback {
                    let level = match feedback.verdict {
                        Verdict::Wrong => MessageLevel::Warning,
                        Verdict::Correct | Verdict::Neutral => MessageLevel::Info,
                    };
                    self.log.push(MessageEntry::new(
                        feedback.message.clone(),
                        Some(*clock_ms),
                        level,
                    ));
                }
                for notice in notices {
                    impact = impact.combine(self.push_notice(notice, *clock_ms));
                }
                // Player intents always change what is on screen
                if matches!(intent, Intent::Player(_)) {
                    impact = EventImpact::redraw();
                }
                impact
            }
            Event::GameState(GameStateEvent::IntentRejected { intent, error, .. }) => {
                // System intents racing a phase change are routine
                if let Intent::Player(_) = intent {
                    self.log.push(MessageEntry::new(
                        format!("Not now ({}): {}", intent.label(), error),
                        None,
                        MessageLevel::Warning,
                    ));
                }
                EventImpact::none()
            }
            Event::Content(ContentEvent::LogSpawned { fallback: true, .. }) => {
                self.log.push(MessageEntry::new(
                    "Generator offline. Serving archived logs.",
                    None,
                    MessageLevel::Warning,
                ));
                EventImpact::none()
            }
            Event::Content(_) => EventImpact::none(),
            Event::Persistence(PersistenceEvent::Failed { error }) => {
                self.log.push(MessageEntry::new(
                    format!("Save failed: {}", error),
                    None,
                    MessageLevel::Error,
                ));
                EventImpact::none()
            }
            Event::Persistence(PersistenceEvent::Cleared) => {
                self.log.push_text("Save slot cleared.");
                EventImpact::none()
            }
            Event::Persistence(PersistenceEvent::Saved { .. }) => EventImpact::none(),
        }
    }

    fn push_notice(&mut self, notice: &Notice, clock_ms: u64) -> EventImpact {
        let catalog = self.oracles.catalog();
        let (text, level) = match notice {
            Notice::SpawnDue | Notice::LogEnqueued { .. } => return EventImpact::none(),
            Notice::LogPresented { .. }
            | Notice::LunchEnded
            | Notice::ShiftEnding
            | Notice::ReviewOpened { .. }
            | Notice::EmailOpened { .. } => return EventImpact::redraw(),
            Notice::ShiftStarted { shift_index } => {
                (format!("Shift {} started.", shift_index), MessageLevel::Info)
            }
            Notice::LunchStarted { .. } => ("Lunch break.".to_string(), MessageLevel::Info),
            Notice::ShiftEndArmed => ("Quota met. Wrapping up.".to_string(), MessageLevel::Info),
            Notice::ShiftFinalized { shift_index } => {
                (format!("Shift {} closed.", shift_index), MessageLevel::Info)
            }
            Notice::EventStarted { event_id } => {
                let name = catalog
                    .events()
                    .iter()
                    .find(|event| event.id == *event_id)
                    .map_or(event_id.as_str(), |event| event.name.as_str());
                (format!("EVENT: {}", name), MessageLevel::Warning)
            }
            Notice::EventExpired { .. } => ("Event over.".to_string(), MessageLevel::Info),
            Notice::TrapOffered { .. } => {
                ("Someone left you an offer.".to_string(), MessageLevel::Warning)
            }
            Notice::AmendmentProposed { .. } => {
                ("A rule amendment awaits your signature.".to_string(), MessageLevel::Warning)
            }
            Notice::RuleRotted { rule_id } => {
                let text = catalog
                    .rule(rule_id)
                    .map_or(rule_id.as_str(), |rule| rule.text.as_str());
                (format!("A rule is fading: {}", text), MessageLevel::Warning)
            }
            Notice::StressMaxed { hits } => (
                format!("Stress maxed out (x{}).", hits),
                MessageLevel::Warning,
            ),
            Notice::RankChanged { rank } => (format!("Rank: {}", rank), MessageLevel::Info),
            Notice::OllieModeEnabled => (
                "Something else is reading the logs with you.".to_string(),
                MessageLevel::Warning,
            ),
            Notice::Paused(paused) => {
                let text = if *paused { "Paused." } else { "Resumed." };
                (text.to_string(), MessageLevel::Info)
            }
            Notice::GameOver { ending } => {
                let title = catalog
                    .ending_text(*ending)
                    .map_or_else(|| ending.to_string(), |text| text.title.clone());
                (format!("RUN OVER: {}", title), MessageLevel::Warning)
            }
        };

        self.log
            .push(MessageEntry::new(text, Some(clock_ms), level));
        EventImpact::redraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::{Feedback, PlayerAction};
    use client_bootstrap::{BundledOracleFactory, OracleFactory};

    fn consumer() -> EventConsumer {
        let oracles = BundledOracleFactory.build().expect("bundled oracles");
        EventConsumer::new(MessageLog::new(8), oracles)
    }

    fn applied(intent: Intent, feedback: Option<Feedback>, notices: Vec<Notice>) -> Event {
        Event::GameState(GameStateEvent::IntentApplied {
            nonce: 1,
            intent,
            feedback,
            notices,
            clock_ms: 65_000,
        })
    }

    #[test]
    fn ring_buffer_drops_oldest_and_tracks_unread() {
        let mut log = MessageLog::new(2);
        log.push_text("a");
        log.push_text("b");
        assert_eq!(log.take_unread().len(), 2);

        log.push_text("c");
        let unread = log.take_unread();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].text, "c");
        assert_eq!(log.len(), 2);
        assert!(log.take_unread().is_empty());
        let recent: Vec<_> = log.recent(5).map(|entry| entry.text.as_str()).collect();
        assert_eq!(recent, vec!["c", "b"]);
    }

    #[test]
    fn feedback_and_notices_become_messages() {
        let mut consumer = consumer();
        let impact = consumer.on_event(&applied(
            Intent::perform(PlayerAction::Log),
            Some(Feedback::wrong("MISSED VIOLATION: CHARM")),
            vec![Notice::ShiftEndArmed],
        ));
        assert!(impact.requires_redraw);

        let unread = consumer.message_log_mut().take_unread();
        assert_eq!(unread.len(), 2);
        assert_eq!(unread[0].level, MessageLevel::Warning);
        assert_eq!(unread[0].format(), "[01:05] ! MISSED VIOLATION: CHARM");
        assert_eq!(unread[1].text, "Quota met. Wrapping up.");
    }

    #[test]
    fn quiet_ticks_neither_log_nor_redraw() {
        let mut consumer = consumer();
        let impact = consumer.on_event(&applied(Intent::tick(250), None, vec![Notice::SpawnDue]));
        assert_eq!(impact, EventImpact::none());
        assert!(consumer.message_log().is_empty());
    }

    #[test]
    fn only_player_rejections_are_shown() {
        let mut consumer = consumer();
        consumer.on_event(&Event::GameState(GameStateEvent::IntentRejected {
            intent: Intent::tick(250),
            phase: None,
            code: "X".to_string(),
            error: "late".to_string(),
        }));
        assert!(consumer.message_log().is_empty());

        consumer.on_event(&Event::GameState(GameStateEvent::IntentRejected {
            intent: Intent::perform(PlayerAction::Free),
            phase: None,
            code: "X".to_string(),
            error: "not in Ollie mode".to_string(),
        }));
        assert_eq!(consumer.message_log().len(), 1);
    }
}
