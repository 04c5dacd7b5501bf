//! Static content consumed by the reducer.
//!
//! The [`CatalogOracle`] trait exposes rule tables, interrupts and narrative
//! scripts. Concrete catalogs live in `annex-content`; the engine only sees
//! the trait so tests can swap in small fixtures.

use crate::state::{Ending, ExhibitId, HazardTags, LogItem, StoryFlags, WeeklyDelta};

/// House rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDef {
    pub id: String,
    pub text: String,
    pub tags: HazardTags,
    /// Alternate wording shown under heavy influence. Cosmetic.
    #[cfg_attr(feature = "serde", serde(default))]
    pub amendment_text: Option<String>,
    /// Rule this one contradicts. UI hint only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflict_id: Option<String>,
}

/// Meter debited when an amendment is signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AmendmentCost {
    Safety,
    Influence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmendmentDef {
    pub id: String,
    pub rule_id: String,
    pub new_text: String,
    pub reason: String,
    pub cost: AmendmentCost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TrapEffect {
    ShrinkContain,
    HideSafety,
    SkewButtons,
    AutoComplete,
    BoostDaily,
    ShuffleRules,
    VoiceTuner,
    PrinterJam,
    DeadKeys,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: TrapEffect,
    /// Career safety debited on acceptance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub global_cost: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Influence gains doubled.
    Surge,
    Fog,
    Glitch,
    /// Hazards may be redacted before logging.
    Redaction,
    /// LOG and CONTAIN swapped.
    Mirror,
    Burst,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventDef {
    pub id: String,
    pub kind: EventKind,
    pub name: String,
    pub description: String,
    /// Player actions before the event expires.
    pub duration: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExhibitDef {
    pub id: ExhibitId,
    pub name: String,
    pub alias: String,
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: String,
    pub tags: HazardTags,
}

/// Named log tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LogPool {
    Boot,
    /// Scripted tutorial logs after the boot log, in presentation order.
    Tutorial,
    Flavor,
    Human,
    Ollie,
    Archive,
    /// Exhibit logs used by the fallback provider.
    Standard,
    Redactable,
    RailLadder,
    RailHardship,
    RailArchivist,
    RailSympathizer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailEffect {
    SignHardship,
    ClipEvidence,
    ReportIncident,
    Archive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmailOption {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<EmailEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Email {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body: Vec<String>,
    /// Shift index this email opens by default. Reactive emails have none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shift: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Vec<EmailOption>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewChoice {
    Cooperate,
    Refuse,
    Promotion,
    HardshipAccept,
    HardshipReject,
    Leak,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviewOption {
    pub label: String,
    /// Consequence hint printed under the label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub choice: ReviewChoice,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delta: WeeklyDelta,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviewMemo {
    pub id: String,
    pub title: String,
    pub sender: String,
    pub body: Vec<String>,
    pub options: Vec<ReviewOption>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LunchEffect {
    StressDown,
    StressUp,
    InfluenceUp,
    UnlockMogUpgrade,
    SkipTasks,
    AcceptMogDraft,
    RejectMogDraft,
    GainKey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunchChoice {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub response: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<LunchEffect>,
    /// Lunch scene that continues the conversation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub next: Option<String>,
}

/// Scene text used up to (and including) a shift index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunchVariant {
    pub up_to_shift: u32,
    pub text: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunchEvent {
    pub id: String,
    pub speaker: String,
    pub role: String,
    pub text: Vec<String>,
    /// Shift whose lunch this scene scripts. Overrides and follow-ups have none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shift: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variants: Vec<LunchVariant>,
    pub choices: Vec<LunchChoice>,
}

impl LunchEvent {
    /// Scene text for a shift. The generic hub degrades as the run goes on.
    pub fn text_for(&self, shift_index: u32) -> &[String] {
        self.variants
            .iter()
            .find(|variant| shift_index <= variant.up_to_shift)
            .map_or(self.text.as_slice(), |variant| variant.text.as_slice())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickyNote {
    pub id: String,
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_shift: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_shift: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires: StoryFlags,
    /// Directives pretend to be advice and test the player.
    #[cfg_attr(feature = "serde", serde(default))]
    pub directive: bool,
}

impl StickyNote {
    pub fn fits_shift(&self, shift_index: u32) -> bool {
        self.min_shift.is_none_or(|min| shift_index >= min)
            && self.max_shift.is_none_or(|max| shift_index <= max)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndingText {
    pub ending: Ending,
    pub title: String,
    pub description: String,
}

/// Content lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown rule {0}")]
    UnknownRule(String),

    #[error("unknown amendment {0}")]
    UnknownAmendment(String),

    #[error("unknown trap {0}")]
    UnknownTrap(String),

    #[error("unknown email {0}")]
    UnknownEmail(String),

    #[error("unknown review memo {0}")]
    UnknownMemo(String),

    #[error("unknown lunch scene {0}")]
    UnknownLunch(String),

    #[error("log pool {0} is empty")]
    EmptyPool(LogPool),
}

/// Read-only content tables.
pub trait CatalogOracle: Send + Sync {
    fn rules(&self) -> &[RuleDef];
    fn amendments(&self) -> &[AmendmentDef];
    fn traps(&self) -> &[TrapDef];
    fn events(&self) -> &[EventDef];
    fn exhibits(&self) -> &[ExhibitDef];
    fn pool(&self, pool: LogPool) -> &[LogItem];
    fn emails(&self) -> &[Email];
    fn memos(&self) -> &[ReviewMemo];
    fn lunches(&self) -> &[LunchEvent];
    fn sticky_notes(&self) -> &[StickyNote];
    fn endings(&self) -> &[EndingText];

    fn rule(&self, id: &str) -> Option<&RuleDef> {
        self.rules().iter().find(|rule| rule.id == id)
    }

    fn amendment(&self, id: &str) -> Result<&AmendmentDef, CatalogError> {
        self.amendments()
            .iter()
            .find(|amendment| amendment.id == id)
            .ok_or_else(|| CatalogError::UnknownAmendment(id.to_owned()))
    }

    fn trap(&self, id: &str) -> Result<&TrapDef, CatalogError> {
        self.traps()
            .iter()
            .find(|trap| trap.id == id)
            .ok_or_else(|| CatalogError::UnknownTrap(id.to_owned()))
    }

    fn email(&self, id: &str) -> Result<&Email, CatalogError> {
        self.emails()
            .iter()
            .find(|email| email.id == id)
            .ok_or_else(|| CatalogError::UnknownEmail(id.to_owned()))
    }

    fn memo(&self, id: &str) -> Result<&ReviewMemo, CatalogError> {
        self.memos()
            .iter()
            .find(|memo| memo.id == id)
            .ok_or_else(|| CatalogError::UnknownMemo(id.to_owned()))
    }

    fn lunch(&self, id: &str) -> Result<&LunchEvent, CatalogError> {
        self.lunches()
            .iter()
            .find(|lunch| lunch.id == id)
            .ok_or_else(|| CatalogError::UnknownLunch(id.to_owned()))
    }

    fn exhibit(&self, id: ExhibitId) -> Option<&ExhibitDef> {
        self.exhibits().iter().find(|exhibit| exhibit.id == id)
    }

    fn ending_text(&self, ending: Ending) -> Option<&EndingText> {
        self.endings().iter().find(|text| text.ending == ending)
    }

    /// Rule ids active at the start of a run, in table order.
    fn default_rule_ids(&self) -> Vec<String> {
        self.rules().iter().map(|rule| rule.id.clone()).collect()
    }

    /// Email scheduled for a shift on the default timeline.
    fn timeline_email(&self, shift_index: u32) -> Option<&Email> {
        self.emails()
            .iter()
            .find(|email| email.shift == Some(shift_index))
    }

    /// Lunch scene scripted for a shift.
    fn scheduled_lunch(&self, shift_index: u32) -> Option<&LunchEvent> {
        self.lunches()
            .iter()
            .find(|lunch| lunch.shift == Some(shift_index))
    }
}
