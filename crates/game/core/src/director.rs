//! Content director: decides what the next generated log should be.
//!
//! Pacing comes first. A struggling player (high stress or a wrong streak)
//! gets a cooldown; a comfortable one gets pressure. Active events override
//! the intent, narrative flags bias the exhibit pool, and late in the run the
//! director may force one of Mog's rail logs.
//!
//! [`decide`] never mutates state. The runtime hands the instruction to a
//! content provider.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{Dice, EventKind};
use crate::state::{ExhibitId, GameState, Rank};

/// Hazard intent requested from the content provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentIntent {
    Safe,
    ObviousHazard,
    SubtleHazard,
    Redactable,
    Narrative,
}

impl ContentIntent {
    /// Whether the requested log should carry rule-matching tags.
    pub fn is_hazard(&self) -> bool {
        !matches!(self, ContentIntent::Safe)
    }

    pub fn difficulty(&self) -> u8 {
        match self {
            ContentIntent::SubtleHazard => 3,
            ContentIntent::Safe => 1,
            _ => 2,
        }
    }
}

/// Mog's late-game story rails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Rail {
    Ladder,
    Hardship,
    Archivist,
    Sympathizer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectorInstruction {
    pub target: ExhibitId,
    pub intent: ContentIntent,
    pub base_noise: u8,
    pub allow_spoof: bool,
    pub word_limit: u16,
    pub rail: Option<Rail>,
}

const LATE_GAME_SHIFT: u32 = 6;
const MOG_NARRATIVE_CHANCE: u32 = 300;

type ExhibitPool = ArrayVec<ExhibitId, 16>;

fn add(pool: &mut ExhibitPool, exhibits: &[ExhibitId]) {
    for exhibit in exhibits {
        // Capacity covers every bias combination.
        let _ = pool.try_push(*exhibit);
    }
}

fn exhibit_pool(state: &GameState, config: &GameConfig, dice: &mut Dice<'_>) -> ExhibitPool {
    let narrative = &state.narrative;
    let mut pool = ExhibitPool::new();

    if narrative.is_hardship() {
        add(&mut pool, &[ExhibitId::Judge, ExhibitId::CopyWriter]);
    } else {
        add(&mut pool, &[ExhibitId::Cuddler, ExhibitId::Judge]);
        if state.rank != Rank::Visitor {
            add(
                &mut pool,
                &[ExhibitId::Carousel, ExhibitId::CopyWriter, ExhibitId::DoorTester],
            );
        }
        if matches!(state.rank, Rank::Liaison | Rank::Director) {
            add(&mut pool, &[ExhibitId::Mog]);
        }
    }
    if narrative.mog_rapport > 4 {
        add(&mut pool, &[ExhibitId::Mog, ExhibitId::Mog, ExhibitId::Cuddler]);
    }
    if narrative.has_clipped_evidence() {
        add(&mut pool, &[ExhibitId::DoorTester, ExhibitId::Judge]);
    }

    let haunted = state.shift_index >= LATE_GAME_SHIFT
        || state.meters.influence > 70
        || narrative.has_clipped_evidence();
    if haunted && dice.chance(config.horror_chance_permille) {
        pool.clear();
        add(&mut pool, &[ExhibitId::Human]);
    }
    pool
}

/// Chooses the exhibit and intent of the next generated log.
pub fn decide(state: &GameState, config: &GameConfig, dice: &mut Dice<'_>) -> DirectorInstruction {
    let meters = &state.meters;
    let narrative = &state.narrative;
    let late_game = state.shift_index >= LATE_GAME_SHIFT;

    let cooldown = meters.stress > 85 || state.streak.wrong > 2;
    let pressure =
        !cooldown && meters.daily_safety > 90 && state.streak.correct > 3 && meters.stress < 40;

    let pool = exhibit_pool(state, config, dice);
    let mut target = dice.pick(&pool).copied().unwrap_or(ExhibitId::Judge);

    let mut intent: ContentIntent;
    let mut noise = 10 + state.shift_index as i32 * 5;
    let mut allow_spoof = false;
    let mut word_limit = if late_game { 45 } else { 30 };
    let mut rail = None;

    if narrative.is_hardship() {
        noise = (noise - 20).max(0);
        word_limit = 20;
    } else if narrative.has_clipped_evidence() {
        noise += 30;
        // The intent chain below decides; this roll only keeps later draws in order.
        let _ = dice.chance(500);
    } else if narrative.mog_rapport > 5 {
        allow_spoof = true;
    }

    if state.modifiers.event_is(EventKind::Redaction) {
        intent = ContentIntent::Redactable;
        noise = 20;
        target = dice
            .pick(&[ExhibitId::Cuddler, ExhibitId::Judge, ExhibitId::CopyWriter])
            .copied()
            .unwrap_or(ExhibitId::Cuddler);
    } else if cooldown {
        intent = if dice.chance(600) {
            ContentIntent::Safe
        } else {
            ContentIntent::ObviousHazard
        };
        noise = (noise - 20).max(0);
    } else if pressure {
        intent = if dice.chance(400) {
            ContentIntent::SubtleHazard
        } else {
            ContentIntent::Safe
        };
        noise += 20;
        allow_spoof = dice.chance(300);
    } else {
        let hazard_chance = 400 + (meters.influence.max(0) as u32 * 1000 / 200);
        intent = if dice.chance(hazard_chance) {
            ContentIntent::ObviousHazard
        } else {
            ContentIntent::Safe
        };
    }

    if state.modifiers.event_is(EventKind::Surge) {
        intent = ContentIntent::ObviousHazard;
        allow_spoof = true;
    }

    if target == ExhibitId::Mog && dice.chance(MOG_NARRATIVE_CHANCE) {
        intent = ContentIntent::Narrative;
    }

    if target == ExhibitId::Human {
        noise = noise.max(80);
        intent = ContentIntent::ObviousHazard;
    }

    if late_game && dice.chance(config.rail_chance_permille) {
        target = ExhibitId::Mog;
        intent = ContentIntent::Narrative;
        rail = if narrative.is_hardship() {
            Some(Rail::Hardship)
        } else if narrative.has_clipped_evidence() {
            Some(Rail::Archivist)
        } else if narrative.mog_rapport > 5 {
            Some(Rail::Sympathizer)
        } else if matches!(state.rank, Rank::Liaison | Rank::Director) {
            Some(Rail::Ladder)
        } else {
            None
        };
    }

    DirectorInstruction {
        target,
        intent,
        base_noise: noise.clamp(0, i32::from(GameConfig::MAX_NOISE)) as u8,
        allow_spoof,
        word_limit,
        rail,
    }
}
