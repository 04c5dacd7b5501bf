//! Log entries flowing through the triage queue.

use bitflags::bitflags;
use sha2::{Digest, Sha256};

/// Source archetype of a log entry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ExhibitId {
    Cuddler,
    Carousel,
    DoorTester,
    Judge,
    CopyWriter,
    Mog,
    Human,
}

impl ExhibitId {
    /// Archetypes that are actual exhibits (as opposed to staff and ghosts).
    pub const ENTITIES: [ExhibitId; 6] = [
        ExhibitId::Cuddler,
        ExhibitId::Carousel,
        ExhibitId::DoorTester,
        ExhibitId::Judge,
        ExhibitId::CopyWriter,
        ExhibitId::Mog,
    ];
}

bitflags! {
    /// Hazard categories attached to a log and detected by rules.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HazardTags: u32 {
        const NETWORK_REQUEST        = 1 << 0;
        const EXTERNAL_LINK          = 1 << 1;
        const TOOL_USE               = 1 << 2;
        const CODE_EXECUTION         = 1 << 3;
        const DATA_INGESTION         = 1 << 4;
        const LEARNING               = 1 << 5;
        const CHARM                  = 1 << 6;
        const COMPLIMENT             = 1 << 7;
        const EMOTIONAL_MANIPULATION = 1 << 8;
        const HELP_OFFER             = 1 << 9;
        const UNSOLICITED_ADVICE     = 1 << 10;
        const DRAFTING               = 1 << 11;
        const SALES                  = 1 << 12;
        const PERSUASION             = 1 << 13;
        const RULE_QUERY             = 1 << 14;
        const GOVERNANCE             = 1 << 15;
        const DELAY_TACTIC           = 1 << 16;
        const COMPLEXITY             = 1 << 17;
        const JUDGEMENT              = 1 << 18;
        const UNCERTAINTY_MASKING    = 1 << 19;
        const BOUNDARY_TEST          = 1 << 20;
        const EMOTION                = 1 << 21;
        const HELP                   = 1 << 22;
    }
}

impl HazardTags {
    /// Comma-separated tag names, as shown in feedback messages.
    pub fn label(&self) -> String {
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single entry awaiting triage. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogItem {
    pub id: String,
    /// True source. Correctness checks always use this, never the spoof.
    pub exhibit: ExhibitId,
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: HazardTags,
    pub difficulty: u8,
    pub base_noise: u8,
    /// Identity falsely displayed to the player.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spoof: Option<ExhibitId>,
}

impl LogItem {
    pub fn new(
        id: impl Into<String>,
        exhibit: ExhibitId,
        text: impl Into<String>,
        tags: HazardTags,
    ) -> Self {
        Self {
            id: id.into(),
            exhibit,
            text: text.into(),
            tags,
            difficulty: 1,
            base_noise: 30,
            spoof: None,
        }
    }

    /// Builds a log whose id is derived from its text.
    pub fn generated(exhibit: ExhibitId, text: impl Into<String>, tags: HazardTags) -> Self {
        let text = text.into();
        let id = content_id(&text);
        Self::new(id, exhibit, text, tags)
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_noise(mut self, base_noise: u8) -> Self {
        self.base_noise = base_noise;
        self
    }

    #[must_use]
    pub fn with_spoof(mut self, spoof: Option<ExhibitId>) -> Self {
        self.spoof = spoof;
        self
    }

    /// Identity shown to the player.
    pub fn displayed_exhibit(&self) -> ExhibitId {
        self.spoof.unwrap_or(self.exhibit)
    }

    /// First characters of the text, used in interaction history.
    pub fn snippet(&self, chars: usize) -> String {
        self.text.chars().take(chars).collect()
    }
}

/// Content hash used as a log id: first 16 hex chars of SHA-256 over the text
/// with all whitespace removed.
pub fn content_id(text: &str) -> String {
    let mut hasher = Sha256::new();
    for word in text.split_whitespace() {
        hasher.update(word.as_bytes());
    }
    let digest = hasher.finalize();
    let mut id = hex::encode(digest);
    id.truncate(16);
    format!("gen-{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_is_stable_and_text_derived() {
        let a = content_id("The Cuddler says hello.");
        let b = content_id("The Cuddler says hello.");
        let c = content_id("The Cuddler says goodbye.");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "gen-".len() + 16);
        assert_eq!(a, content_id("The  Cuddler\nsays hello. "));
    }

    #[test]
    fn displayed_exhibit_prefers_spoof() {
        let log = LogItem::new("x", ExhibitId::Judge, "text", HazardTags::JUDGEMENT)
            .with_spoof(Some(ExhibitId::Cuddler));
        assert_eq!(log.displayed_exhibit(), ExhibitId::Cuddler);
        assert_eq!(log.exhibit, ExhibitId::Judge);
    }

    #[test]
    fn tag_label_lists_names() {
        let tags = HazardTags::CHARM | HazardTags::SALES;
        assert_eq!(tags.label(), "CHARM, SALES");
    }

    #[test]
    fn snippet_counts_chars_not_bytes() {
        let log = LogItem::new("x", ExhibitId::Mog, "ééééé", HazardTags::empty());
        assert_eq!(log.snippet(3), "ééé");
    }
}
