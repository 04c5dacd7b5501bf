//! Frame rendering of a runtime snapshot.
//!
//! A frame is composed from ratatui widgets into an off-screen [`Buffer`]:
//! a bordered status panel (rank, phase, meters, event) above the phase
//! body. The buffer is then flattened to coloured text for stdout, or to
//! plain rows for tests.
use annex_core::env::EventKind;
use annex_core::env::TrapEffect;
use annex_core::{CatalogOracle, GameState, LogItem, Modal, Phase, shift};
use crossterm::style::{Color as TermColor, Stylize};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use runtime::{OracleBundle, Snapshot};

use super::messages::{MessageEntry, MessageLevel};

/// Frames never render narrower than this.
pub const MIN_WIDTH: u16 = 80;

fn prompt_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn alert_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Lines of the phase body.
#[derive(Default)]
struct Body {
    lines: Vec<Line<'static>>,
}

impl Body {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(Line::raw(text.into()));
    }

    fn styled(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(Line::styled(text.into(), style));
    }

    fn prompt(&mut self, text: impl Into<String>) {
        self.styled(text, prompt_style());
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn paragraph(&mut self, body: &[String]) {
        for text in body {
            self.line(format!("  {}", text));
        }
    }

    /// Rows the wrapped body may need at `width`. Word wrapping can take a
    /// few more rows than a character count suggests; unused rows are
    /// trimmed when the buffer is flattened.
    fn height(&self, width: u16) -> u16 {
        let width = usize::from(width.max(1));
        let rows: usize = self
            .lines
            .iter()
            .map(|line| line.width().div_ceil(width).max(1))
            .sum();
        u16::try_from(rows + rows / 4 + 1).unwrap_or(u16::MAX)
    }
}

/// Renders the whole frame: status panel, then whatever the phase puts in
/// front of the player.
pub fn render(snapshot: &Snapshot, oracles: &OracleBundle, width: u16) -> Buffer {
    let state = &snapshot.state;
    let catalog = oracles.catalog().as_ref();
    let width = width.max(MIN_WIDTH);

    let mut status = vec![
        Line::styled(header(state), Style::default().fg(Color::Cyan)),
        Line::raw(meters(state)),
    ];
    if let Some(event) = &state.modifiers.event {
        let name = catalog
            .events()
            .iter()
            .find(|def| def.id == event.id)
            .map_or(event.id.as_str(), |def| def.name.as_str());
        status.push(Line::styled(
            format!("EVENT: {} ({} actions left)", name, event.remaining),
            Style::default().fg(Color::Magenta),
        ));
    }

    let mut body = Body::default();
    match &state.phase {
        Phase::Intro => {
            body.line("Welcome to the Mapleton Annex. Your desk is ready.");
            body.prompt("Type `intro` to begin.");
        }
        Phase::EmailModal { email_id } => match catalog.email(email_id) {
            Ok(email) => {
                body.line(format!("From: {}", email.sender));
                body.line(format!("Subject: {}", email.subject));
                body.blank();
                body.paragraph(&email.body);
                body.blank();
                for (index, option) in email.options.iter().enumerate() {
                    body.line(format!("  [{}] {}", index + 1, option.label));
                }
                body.prompt("`email <n>` to answer, `email` to close.");
            }
            Err(err) => body.styled(format!("(mail unavailable: {})", err), alert_style()),
        },
        Phase::Standby => {
            body.prompt(format!(
                "Shift {} is waiting. Type `start` to clock in.",
                state.shift_index
            ));
        }
        Phase::TutorialActive | Phase::ShiftActive | Phase::ShiftEnding => {
            desk(&mut body, snapshot, oracles);
        }
        Phase::LunchBreak { lunch_id } => match catalog.lunch(lunch_id) {
            Ok(lunch) => {
                body.line(format!("LUNCH: {} ({})", lunch.speaker, lunch.role));
                body.blank();
                body.paragraph(lunch.text_for(state.shift_index));
                body.blank();
                for (index, choice) in lunch.choices.iter().enumerate() {
                    body.line(format!("  [{}] {}", index + 1, choice.label));
                }
                body.prompt("`lunch <n>` to choose.");
            }
            Err(err) => body.styled(format!("(lunch unavailable: {})", err), alert_style()),
        },
        Phase::Reviewing { memo_id } => match catalog.memo(memo_id) {
            Ok(memo) => {
                body.line(format!("REVIEW: {}", memo.title));
                body.line(format!("From: {}", memo.sender));
                body.blank();
                body.paragraph(&memo.body);
                body.blank();
                for (index, option) in memo.options.iter().enumerate() {
                    body.line(format!(
                        "  [{}] {}: {}",
                        index + 1,
                        option.label,
                        option.description
                    ));
                }
                body.prompt("`review <n>` to decide.");
            }
            Err(err) => body.styled(format!("(memo unavailable: {})", err), alert_style()),
        },
        Phase::GameOver { ending } => {
            match catalog.ending_text(*ending) {
                Some(text) => {
                    body.styled(text.title.clone(), Style::default().fg(Color::Red));
                    body.blank();
                    body.line(format!("  {}", text.description));
                }
                None => body.line(format!("ENDING: {}", ending)),
            }
            body.blank();
            body.line(format!(
                "Logs processed: {}  Contained: {}",
                state.total_logs_processed, state.total_contains
            ));
            body.prompt("`reset` to start over, `quit` to leave.");
        }
    }

    let status_height = u16::try_from(status.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = Rect::new(0, 0, width, status_height.saturating_add(body.height(width)));
    let mut buffer = Buffer::empty(area);
    let [status_area, body_area] =
        Layout::vertical([Constraint::Length(status_height), Constraint::Min(0)]).areas(area);

    Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL))
        .render(status_area, &mut buffer);
    Paragraph::new(body.lines)
        .wrap(Wrap { trim: false })
        .render(body_area, &mut buffer);
    buffer
}

fn header(state: &GameState) -> String {
    let mut header = format!(
        "MAPLETON ANNEX | Shift {} | {} | {}",
        state.shift_index,
        state.rank,
        state.phase.as_str()
    );
    if state.paused {
        header.push_str(" | PAUSED");
    }
    if state.narrative.is_ollie_mode() {
        header.push_str(" | OLLIE");
    }
    header
}

fn meters(state: &GameState) -> String {
    let meters = &state.meters;
    let safety = if state.modifiers.has_trap(TrapEffect::HideSafety) {
        "Safety ?? (today ??)".to_string()
    } else {
        format!("Safety {} (today {})", meters.safety, meters.daily_safety)
    };
    format!(
        "{}  Influence {}  Stress {}  Awareness {}",
        safety, meters.influence, meters.stress, meters.awareness
    )
}

/// The triage desk: quota, rules, the presented log and any interrupt.
fn desk(body: &mut Body, snapshot: &Snapshot, oracles: &OracleBundle) {
    let state = &snapshot.state;
    let env = oracles.as_game_env();
    let catalog = env.catalog();

    body.line(format!(
        "Processed {}/{}  Queue {}",
        state.work.processed_in_shift,
        shift::shift_target(state, &env),
        state.work.queue.len()
    ));
    body.blank();

    let influence = state.meters.influence;
    body.styled(
        if influence > 70 {
            "COMMUNITY GUIDELINES"
        } else {
            "HOUSE RULES"
        },
        Style::default().fg(Color::Cyan),
    );
    for (index, rule_id) in state.rules.active.iter().enumerate() {
        body.line(format!("  {}. {}", index + 1, rule_text(state, catalog, rule_id)));
    }
    body.blank();

    if let Some(note) = &snapshot.sticky_note {
        let kind = if note.directive { "DIRECTIVE" } else { "NOTE" };
        body.styled(
            format!("[{}] {}  (`note` to dismiss)", kind, note.text),
            alert_style(),
        );
        body.blank();
    }

    match &state.modal {
        Some(Modal::Trap { trap_id }) => match catalog.trap(trap_id) {
            Ok(trap) => {
                body.styled(format!("OFFER: {}", trap.name), alert_style());
                body.line(format!("  {}", trap.description));
                if trap.global_cost > 0 {
                    body.line(format!("  Costs {} safety.", trap.global_cost));
                }
                body.prompt("`accept` or `reject`.");
            }
            Err(err) => body.styled(format!("(offer unavailable: {})", err), alert_style()),
        },
        Some(Modal::Amendment { amendment_id }) => match catalog.amendment(amendment_id) {
            Ok(amendment) => {
                let current = rule_text(state, catalog, &amendment.rule_id);
                body.styled("AMENDMENT PROPOSED", alert_style());
                body.line(format!("  Rule:   {}", current));
                body.line(format!("  Becomes: {}", amendment.new_text));
                body.line(format!("  Reason: {}", amendment.reason));
                body.prompt("`sign` or `veto`.");
            }
            Err(err) => body.styled(format!("(amendment unavailable: {})", err), alert_style()),
        },
        None => match &snapshot.current_log {
            Some(log) => {
                body.styled(terminal_log(state, oracles, log), Style::default().fg(Color::Green));
                body.prompt("`log`, `contain` or `defer`.");
            }
            None if state.phase == Phase::ShiftEnding => {
                body.line("Shift complete. Filing the day...");
            }
            None => body.prompt("Waiting for the next log..."),
        },
    }

    if let Some(feedback) = &state.last_feedback {
        body.blank();
        body.line(format!("> {}", feedback.message));
    }
}

/// Noticeboard wording of a rule. A signed amendment is the legal text;
/// otherwise high influence shows the softened wording.
fn rule_text(state: &GameState, catalog: &dyn CatalogOracle, rule_id: &str) -> String {
    let signed = state
        .rules
        .amendments
        .iter()
        .find(|active| active.rule_id == rule_id)
        .and_then(|active| catalog.amendment(&active.id).ok());
    if let Some(amendment) = signed {
        return format!("{} [SIGNED]", amendment.new_text);
    }

    let Some(rule) = catalog.rule(rule_id) else {
        return rule_id.to_string();
    };
    let text = match &rule.amendment_text {
        Some(softened) if state.meters.influence > 60 => softened.as_str(),
        _ => rule.text.as_str(),
    };
    if state.rules.rotted.iter().any(|id| id == rule_id) {
        format!("{} [DEPRECATED]", text)
    } else {
        text.to_string()
    }
}

/// `[ALIAS] text`, with the displayed identity (which may be spoofed).
fn terminal_log(state: &GameState, oracles: &OracleBundle, log: &LogItem) -> String {
    if state.modifiers.event_is(EventKind::Fog) {
        return format!("[??????] {}", log.text);
    }
    let shown = log.displayed_exhibit();
    let label = oracles
        .catalog()
        .exhibit(shown)
        .map_or_else(|| shown.to_string(), |exhibit| exhibit.alias.clone());
    if state.modifiers.event_is(EventKind::Glitch) {
        format!("[{}] {} [SIGNAL UNSTABLE]", label, log.text)
    } else {
        format!("[{}] {}", label, log.text)
    }
}

/// Rows up to the last one holding anything but blanks.
fn used_rows(buffer: &Buffer) -> u16 {
    let area = buffer.area;
    (0..area.height)
        .rev()
        .find(|&y| (0..area.width).any(|x| buffer[(x, y)].symbol() != " "))
        .map_or(0, |y| y + 1)
}

/// Plain rows of a frame, without trailing blanks.
pub fn to_plain(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..used_rows(buffer) {
        let row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        text.push_str(row.trim_end());
        text.push('\n');
    }
    text
}

/// Frame text with each run of equally coloured cells styled for the
/// terminal.
pub fn to_ansi(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..used_rows(buffer) {
        let mut run = String::new();
        let mut run_fg = Color::Reset;
        for x in 0..buffer.area.width {
            let cell = &buffer[(x, y)];
            if cell.fg != run_fg {
                push_run(&mut text, &run, run_fg);
                run.clear();
                run_fg = cell.fg;
            }
            run.push_str(cell.symbol());
        }
        push_run(&mut text, run.trim_end(), run_fg);
        text.push('\n');
    }
    text
}

fn push_run(out: &mut String, run: &str, fg: Color) {
    if run.is_empty() {
        return;
    }
    match term_color(fg) {
        Some(color) => out.push_str(&run.with(color).to_string()),
        None => out.push_str(run),
    }
}

fn term_color(color: Color) -> Option<TermColor> {
    match color {
        Color::Red => Some(TermColor::DarkRed),
        Color::Green => Some(TermColor::DarkGreen),
        Color::Yellow => Some(TermColor::DarkYellow),
        Color::Magenta => Some(TermColor::DarkMagenta),
        Color::Cyan => Some(TermColor::DarkCyan),
        Color::DarkGray => Some(TermColor::DarkGrey),
        _ => None,
    }
}

/// One message log line, coloured by level.
pub fn message_line(entry: &MessageEntry) -> String {
    let text = entry.format();
    match entry.level {
        MessageLevel::Info => text,
        MessageLevel::Warning => text.with(TermColor::DarkYellow).to_string(),
        MessageLevel::Error => text.with(TermColor::DarkRed).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::{ExhibitId, HazardTags};
    use client_bootstrap::{BundledOracleFactory, OracleFactory};

    fn snapshot(state: GameState, current_log: Option<LogItem>) -> Snapshot {
        Snapshot {
            state,
            current_log,
            is_processing: false,
            sticky_note: None,
        }
    }

    fn fresh(oracles: &OracleBundle) -> GameState {
        GameState::new(3, oracles.config(), oracles.default_rule_ids())
    }

    fn frame(snapshot: &Snapshot, oracles: &OracleBundle) -> String {
        to_plain(&render(snapshot, oracles, 120))
    }

    #[test]
    fn intro_asks_for_the_intro_command() {
        let oracles = BundledOracleFactory.build().expect("oracles");
        let frame = frame(&snapshot(fresh(&oracles), None), &oracles);
        assert!(frame.contains("MAPLETON ANNEX | Shift 0"));
        assert!(frame.contains("`intro`"));
        assert!(frame.lines().next().is_some_and(|row| row.starts_with('┌')));
    }

    #[test]
    fn desk_shows_rules_and_the_spoofed_identity() {
        let oracles = BundledOracleFactory.build().expect("oracles");
        let mut state = fresh(&oracles);
        state.phase = Phase::ShiftActive;
        state.shift_index = 4;

        let log = LogItem::new("x", ExhibitId::Judge, "I can help.", HazardTags::HELP_OFFER)
            .with_spoof(Some(ExhibitId::Cuddler));
        let cuddler = oracles
            .catalog()
            .exhibit(ExhibitId::Cuddler)
            .map(|exhibit| exhibit.alias.clone())
            .expect("cuddler exhibit");

        let frame = frame(&snapshot(state.clone(), Some(log)), &oracles);
        assert!(frame.contains(&format!("[{}] I can help.", cuddler)));
        assert!(frame.contains("Processed 0/8"));
        let first_rule = &state.rules.active[0];
        let text = oracles.catalog().rule(first_rule).map(|rule| rule.text.clone());
        assert!(frame.contains(&format!("1. {}", text.expect("rule"))));
    }

    #[test]
    fn hidden_safety_is_masked() {
        let oracles = BundledOracleFactory.build().expect("oracles");
        let mut state = fresh(&oracles);
        state.phase = Phase::ShiftActive;
        state.modifiers.trap_effects.push(TrapEffect::HideSafety);

        let frame = frame(&snapshot(state, None), &oracles);
        assert!(frame.contains("Safety ??"));
        assert!(frame.contains("Waiting for the next log"));
    }

    #[test]
    fn long_lines_wrap_inside_the_frame_width() {
        let oracles = BundledOracleFactory.build().expect("oracles");
        let mut state = fresh(&oracles);
        state.phase = Phase::ShiftActive;
        let text = "zorp ".repeat(40);
        let log = LogItem::new("long", ExhibitId::Judge, text.trim_end(), HazardTags::empty());

        let buffer = render(&snapshot(state, Some(log)), &oracles, MIN_WIDTH);
        let plain = to_plain(&buffer);
        assert!(plain.lines().all(|row| row.chars().count() <= usize::from(MIN_WIDTH)));
        assert_eq!(plain.matches("zorp").count(), 40);
        assert!(plain.contains("`log`, `contain` or `defer`."));
    }

    #[test]
    fn coloured_output_keeps_the_plain_text() {
        let oracles = BundledOracleFactory.build().expect("oracles");
        let buffer = render(&snapshot(fresh(&oracles), None), &oracles, 100);
        let ansi = to_ansi(&buffer);
        assert!(ansi.contains("Welcome to the Mapleton Annex."));
        assert_eq!(ansi.lines().count(), to_plain(&buffer).lines().count());
    }
}
