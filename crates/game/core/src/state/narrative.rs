//! Narrative side channels.
//!
//! These gate content selection and endings. They are only ever adjusted by
//! intents and never reset mid-run.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StoryFlags: u8 {
        /// Signed the hardship waiver.
        const HARDSHIP         = 1 << 0;
        /// Kept a copy of the incident verification.
        const CLIPPED_EVIDENCE = 1 << 1;
        const BASEMENT_KEY     = 1 << 2;
        /// Late-game inverted-logic mode (FREE / FORGET).
        const OLLIE_MODE       = 1 << 3;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Narrative {
    pub flags: StoryFlags,
    pub evidence_count: u32,
    pub mog_rapport: i32,
    /// Counted in half points: every action adds one, a deferral adds four.
    pub ollie_haunt: u32,
    pub sana_corruption: u32,
}

impl Narrative {
    pub fn is_hardship(&self) -> bool {
        self.flags.contains(StoryFlags::HARDSHIP)
    }

    pub fn has_clipped_evidence(&self) -> bool {
        self.flags.contains(StoryFlags::CLIPPED_EVIDENCE)
    }

    pub fn is_ollie_mode(&self) -> bool {
        self.flags.contains(StoryFlags::OLLIE_MODE)
    }
}
