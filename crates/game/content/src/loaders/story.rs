//! Narrative content loaders: mail, lunch scenes, sticky notes and endings.

use std::path::Path;

use annex_core::env::{Email, EndingText, LunchEvent, ReviewMemo, StickyNote};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Inbox structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mailroom {
    pub emails: Vec<Email>,
    pub memos: Vec<ReviewMemo>,
}

/// Loader for emails and review memos.
pub struct MailLoader;

impl MailLoader {
    pub fn load(path: &Path) -> LoadResult<Mailroom> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Mailroom> {
        let mailroom: Mailroom = parse_ron(content, "mailroom")?;
        if let Some(memo) = mailroom.memos.iter().find(|memo| memo.options.is_empty()) {
            anyhow::bail!("review memo {} has no options", memo.id);
        }
        Ok(mailroom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LunchTables {
    lunches: Vec<LunchEvent>,
}

/// Loader for lunch scenes.
pub struct LunchLoader;

impl LunchLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<LunchEvent>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<LunchEvent>> {
        let tables: LunchTables = parse_ron(content, "lunch tables")?;
        if let Some(lunch) = tables.lunches.iter().find(|lunch| lunch.choices.is_empty()) {
            anyhow::bail!("lunch scene {} has no choices", lunch.id);
        }
        Ok(tables.lunches)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NoteBoard {
    notes: Vec<StickyNote>,
}

/// Loader for sticky notes and directives.
pub struct NoteLoader;

impl NoteLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StickyNote>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StickyNote>> {
        let board: NoteBoard = parse_ron(content, "note board")?;
        Ok(board.notes)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EndingTable {
    endings: Vec<EndingText>,
}

/// Loader for ending screens.
pub struct EndingLoader;

impl EndingLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EndingText>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EndingText>> {
        let table: EndingTable = parse_ron(content, "ending table")?;
        Ok(table.endings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::Ending;
    use annex_core::env::{EmailEffect, LunchEffect, ReviewChoice};
    use annex_core::state::StoryFlags;

    #[test]
    fn mail_options_and_deltas() {
        let mailroom = MailLoader::parse(
            r#"(
                emails: [
                    (id: "email-hardship", sender: "HR", subject: "Support", body: ["Do you accept?"],
                     shift: Some(2),
                     options: [(label: "Sign", effect: Some(SIGN_HARDSHIP)), (label: "Decline")]),
                    (id: "email-cal-debt", sender: "Cal", subject: "The Stipend", body: []),
                ],
                memos: [
                    (id: "memo-probation", title: "Week 1", sender: "Talent", body: [],
                     options: [(label: "Acknowledge", choice: COOPERATE,
                                delta: (scrutiny: -5, auditability: 5))]),
                ],
            )"#,
        )
        .expect("valid mail");

        let hardship = &mailroom.emails[0];
        assert_eq!(hardship.shift, Some(2));
        assert_eq!(hardship.options[0].effect, Some(EmailEffect::SignHardship));
        assert_eq!(hardship.options[1].effect, None);
        assert_eq!(mailroom.emails[1].shift, None);

        let option = &mailroom.memos[0].options[0];
        assert_eq!(option.choice, ReviewChoice::Cooperate);
        assert_eq!(option.delta.scrutiny, -5);
        assert_eq!(option.delta.stability, 0);
    }

    #[test]
    fn memo_without_options_is_rejected() {
        let result = MailLoader::parse(
            r#"(memos: [(id: "memo-x", title: "", sender: "", body: [], options: [])])"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn lunch_follow_ups_and_variants() {
        let lunches = LunchLoader::parse(
            r#"(lunches: [
                (id: "lunch-01", speaker: "Sana", role: "Compliance", text: ["Tea."], shift: Some(1),
                 choices: [(label: "Drink."), (label: "Ask.", next: Some("lunch-01-ollie"))]),
                (id: "lunch-generic", speaker: "Internal Monologue", role: "Hungry", text: ["Late."],
                 variants: [(up_to_shift: 2, text: ["Early."])],
                 choices: [(label: "Close your eyes", effect: Some(STRESS_DOWN))]),
            ])"#,
        )
        .expect("valid lunches");

        assert_eq!(lunches[0].choices[1].next.as_deref(), Some("lunch-01-ollie"));
        assert_eq!(lunches[1].text_for(1), ["Early.".to_string()]);
        assert_eq!(lunches[1].text_for(9), ["Late.".to_string()]);
        assert_eq!(lunches[1].choices[0].effect, Some(LunchEffect::StressDown));
    }

    #[test]
    fn notes_carry_flag_requirements() {
        let notes = NoteLoader::parse(
            r#"(notes: [
                (id: "sn-hardship-1", text: "They own you now.", requires: "HARDSHIP"),
                (id: "cmd-1", text: "Just press LOG.", min_shift: Some(2), directive: true),
            ])"#,
        )
        .expect("valid notes");

        assert_eq!(notes[0].requires, StoryFlags::HARDSHIP);
        assert!(!notes[0].directive);
        assert!(notes[1].directive);
        assert!(notes[1].fits_shift(5));
        assert!(!notes[1].fits_shift(1));
    }

    #[test]
    fn endings_parse_by_name() {
        let endings = EndingLoader::parse(
            r#"(endings: [(ending: SUBJECT0, title: "INTEGRATION COMPLETE", description: "")])"#,
        )
        .expect("valid endings");
        assert_eq!(endings[0].ending, Ending::Subject0);
    }
}
