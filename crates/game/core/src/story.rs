//! Narrative content selection.
//!
//! Picks which email, review memo, lunch scene, trap and sticky note the
//! player sees next. Selection reads flags, rank and the weekly rollup; it
//! never mutates state. Ids are only returned when the catalog carries them,
//! so a trimmed content set degrades to the default timeline.

use crate::env::{CatalogOracle, Dice, GameEnv, RngStream, StickyNote, TrapEffect};
use crate::state::{GameState, Rank};

const MEMO_PROBATION: &str = "memo-probation";
const MEMO_SECURITY_INTERVIEW: &str = "memo-security-interview";
const MEMO_HARDSHIP_REVIEW: &str = "memo-hardship-review";
const MEMO_EMPATHY_WARNING: &str = "memo-empathy-warning";
const MEMO_PROMO_JUNIOR: &str = "memo-promo-junior";
const MEMO_BIND_FAST: &str = "memo-bind-fast";
const MEMO_BIND_SLOW: &str = "memo-bind-slow";
const MEMO_BIND_PERFECT: &str = "memo-bind-perfect";
const MEMO_BIND_AVERAGE: &str = "memo-bind-average";
const MEMO_PROMO_SENIOR: &str = "memo-promo-senior";
const MEMO_DIRECTOR_INTERVENTION: &str = "memo-director-intervention";
const MEMO_STORAGE_AUDIT: &str = "memo-storage-audit";
const MEMO_FINAL_PREP: &str = "memo-final-prep";

const LUNCH_MOG_FRIEND: &str = "lunch-mog-friend";
const LUNCH_HARDSHIP_GRIND: &str = "lunch-hardship-grind";
const LUNCH_SANA_ARTEFACT: &str = "lunch-sana-artefact";
const LUNCH_GENERIC: &str = "lunch-generic";

fn is_senior(rank: Rank) -> bool {
    matches!(rank, Rank::Liaison | Rank::Director)
}

// ============================================================================
// Reviews
// ============================================================================

/// Review memo scheduled after the shift that just finished.
///
/// Reads `state.weekly`, so call it after the rollup is recomputed.
pub fn select_review(state: &GameState) -> Option<&'static str> {
    let narrative = &state.narrative;
    let weekly = &state.weekly;
    let memo = match state.shift_index {
        1 => MEMO_PROBATION,
        3 => {
            if narrative.has_clipped_evidence() || narrative.evidence_count > 0 {
                MEMO_SECURITY_INTERVIEW
            } else if narrative.is_hardship() {
                MEMO_HARDSHIP_REVIEW
            } else if narrative.mog_rapport >= 2 {
                MEMO_EMPATHY_WARNING
            } else {
                MEMO_PROMO_JUNIOR
            }
        }
        // The double bind: every playstyle gets criticised.
        4 => {
            if weekly.throughput > 85 {
                MEMO_BIND_FAST
            } else if weekly.throughput < 50 {
                MEMO_BIND_SLOW
            } else if weekly.auditability > 90 && state.streak.wrong == 0 {
                MEMO_BIND_PERFECT
            } else {
                MEMO_BIND_AVERAGE
            }
        }
        5 => MEMO_PROMO_SENIOR,
        7 => MEMO_DIRECTOR_INTERVENTION,
        8 => MEMO_STORAGE_AUDIT,
        9 => MEMO_FINAL_PREP,
        _ => return None,
    };
    Some(memo)
}

// ============================================================================
// Emails
// ============================================================================

fn narrative_email(state: &GameState) -> Option<&'static str> {
    let narrative = &state.narrative;
    let weekly = &state.weekly;
    match state.shift_index {
        4 if weekly.throughput > 95 && weekly.stability > 80 => Some("email-dir-speed"),
        4 if weekly.throughput < 60 => Some("email-dir-slow"),
        5 if narrative.is_hardship() => Some("email-cal-debt"),
        5 if narrative.mog_rapport > 4 => Some("email-cal-warning"),
        7 | 9 => {
            let (first, second) = if narrative.is_hardship() {
                ("mog-hardship-1", "mog-hardship-2")
            } else if narrative.has_clipped_evidence() {
                ("mog-archivist-1", "mog-archivist-2")
            } else if narrative.mog_rapport > 5 {
                ("mog-friend-1", "mog-friend-2")
            } else if is_senior(state.rank) {
                ("mog-ladder-1", "mog-ladder-2")
            } else {
                return None;
            };
            Some(if state.shift_index == 7 { first } else { second })
        }
        _ => None,
    }
}

/// Email opening the current shift. Narrative overrides beat the timeline.
pub fn select_email(state: &GameState, catalog: &dyn CatalogOracle) -> Option<String> {
    narrative_email(state)
        .and_then(|id| catalog.email(id).ok())
        .or_else(|| catalog.timeline_email(state.shift_index))
        .map(|email| email.id.clone())
}

// ============================================================================
// Lunch
// ============================================================================

/// Lunch scene for the current shift, or `None` when the shift has no lunch.
pub fn select_lunch(
    state: &GameState,
    catalog: &dyn CatalogOracle,
    dice: &mut Dice<'_>,
) -> Option<String> {
    let shift = state.shift_index;
    let narrative = &state.narrative;

    let mut overrides = Vec::with_capacity(3);
    if shift >= 4 && narrative.mog_rapport > 3 && dice.chance(500) {
        overrides.push(LUNCH_MOG_FRIEND);
    }
    if narrative.is_hardship() && shift > 1 && dice.chance(300) {
        overrides.push(LUNCH_HARDSHIP_GRIND);
    }
    if shift >= 8 && dice.chance(300) {
        overrides.push(LUNCH_SANA_ARTEFACT);
    }

    overrides
        .into_iter()
        .find_map(|id| catalog.lunch(id).ok())
        .or_else(|| catalog.scheduled_lunch(shift))
        .or_else(|| (shift > 0).then(|| catalog.lunch(LUNCH_GENERIC).ok()).flatten())
        .map(|lunch| lunch.id.clone())
}

// ============================================================================
// Traps
// ============================================================================

/// Trap Mog offers, biased by the player's current rail.
pub fn select_trap(
    state: &GameState,
    catalog: &dyn CatalogOracle,
    dice: &mut Dice<'_>,
) -> Option<String> {
    let available: Vec<_> = catalog
        .traps()
        .iter()
        .filter(|trap| !state.modifiers.traps.contains(&trap.id))
        .collect();
    if available.is_empty() {
        return None;
    }

    let narrative = &state.narrative;
    let mut preferred: Vec<&[TrapEffect]> = Vec::new();
    if narrative.is_hardship() {
        preferred.push(&[TrapEffect::AutoComplete, TrapEffect::HideSafety]);
    }
    if narrative.mog_rapport > 3 {
        preferred.push(&[TrapEffect::VoiceTuner]);
    }
    if is_senior(state.rank) {
        preferred.push(&[TrapEffect::ShuffleRules, TrapEffect::ShrinkContain]);
    }
    if narrative.has_clipped_evidence() {
        preferred.push(&[TrapEffect::ShrinkContain]);
    }

    preferred
        .iter()
        .find_map(|effects| available.iter().find(|trap| effects.contains(&trap.effect)))
        .or_else(|| dice.pick(&available))
        .map(|trap| trap.id.clone())
}

// ============================================================================
// Sticky notes
// ============================================================================

const DIRECTIVE_MIN_PROCESSED: u32 = 4;
const DIRECTIVE_MIN_SHIFT: u32 = 2;

/// Sticky note currently pinned to the terminal, if any.
///
/// After lunch on later shifts a directive may replace the lore note. The
/// roll is keyed to the state nonce, so the choice is stable between intents.
pub fn sticky_note<'a>(state: &GameState, env: &GameEnv<'a>) -> Option<&'a StickyNote> {
    let catalog = env.catalog();
    let seen = &state.history.seen_sticky_notes;
    let shift = state.shift_index;

    if state.work.processed_in_shift > DIRECTIVE_MIN_PROCESSED && shift > DIRECTIVE_MIN_SHIFT {
        let mut dice = env.dice(state, RngStream::StickyNote);
        if dice.chance(env.config().directive_note_chance_permille) {
            let directives: Vec<_> = catalog
                .sticky_notes()
                .iter()
                .filter(|note| note.directive && !seen.contains(&note.id))
                .filter(|note| note.min_shift.is_none_or(|min| shift >= min))
                .collect();
            if let Some(note) = dice.pick(&directives) {
                return Some(*note);
            }
        }
    }

    catalog.sticky_notes().iter().find(|note| {
        !note.directive
            && !seen.contains(&note.id)
            && note.fits_shift(shift)
            && state.narrative.flags.contains(note.requires)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StoryFlags;
    use crate::testing::{Fixture, active_state, standby_state};

    #[test]
    fn week_two_review_branches_on_evidence_first() {
        let fixture = Fixture::new();
        let mut state = standby_state(&fixture, 3);
        state.narrative.flags = StoryFlags::HARDSHIP;
        assert_eq!(select_review(&state), Some(MEMO_HARDSHIP_REVIEW));

        state.narrative.evidence_count = 1;
        assert_eq!(select_review(&state), Some(MEMO_SECURITY_INTERVIEW));
    }

    #[test]
    fn double_bind_punishes_every_pace() {
        let fixture = Fixture::new();
        let mut state = standby_state(&fixture, 4);
        state.weekly.throughput = 100;
        assert_eq!(select_review(&state), Some(MEMO_BIND_FAST));
        state.weekly.throughput = 40;
        assert_eq!(select_review(&state), Some(MEMO_BIND_SLOW));
        state.weekly.throughput = 70;
        state.weekly.auditability = 95;
        assert_eq!(select_review(&state), Some(MEMO_BIND_PERFECT));
        state.streak.wrong = 1;
        assert_eq!(select_review(&state), Some(MEMO_BIND_AVERAGE));
    }

    #[test]
    fn unscheduled_shift_has_no_review() {
        let fixture = Fixture::new();
        assert_eq!(select_review(&standby_state(&fixture, 2)), None);
        assert_eq!(select_review(&standby_state(&fixture, 6)), None);
    }

    #[test]
    fn email_falls_back_to_the_timeline() {
        let fixture = Fixture::new();
        let state = standby_state(&fixture, 0);
        assert_eq!(
            select_email(&state, &fixture.catalog),
            Some("email-00".to_string())
        );
        // No override and nothing scheduled.
        let state = standby_state(&fixture, 6);
        assert_eq!(select_email(&state, &fixture.catalog), None);
    }

    #[test]
    fn mog_rail_email_overrides_the_timeline() {
        let fixture = Fixture::new();
        let mut state = standby_state(&fixture, 7);
        state.narrative.flags = StoryFlags::CLIPPED_EVIDENCE;
        assert_eq!(
            select_email(&state, &fixture.catalog),
            Some("mog-archivist-1".to_string())
        );
    }

    #[test]
    fn scripted_lunch_beats_the_generic_hub() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let state = standby_state(&fixture, 3);
        let mut dice = env.dice(&state, RngStream::Lifecycle);
        assert_eq!(
            select_lunch(&state, &fixture.catalog, &mut dice),
            Some("lunch-mog-appeal".to_string())
        );

        let state = standby_state(&fixture, 2);
        let mut dice = env.dice(&state, RngStream::Lifecycle);
        assert_eq!(
            select_lunch(&state, &fixture.catalog, &mut dice),
            Some(LUNCH_GENERIC.to_string())
        );
    }

    #[test]
    fn tutorial_has_no_lunch() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let state = standby_state(&fixture, 0);
        let mut dice = env.dice(&state, RngStream::Lifecycle);
        assert_eq!(select_lunch(&state, &fixture.catalog, &mut dice), None);
    }

    #[test]
    fn hardship_rail_prefers_auto_complete() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.narrative.flags = StoryFlags::HARDSHIP;
        let mut dice = env.dice(&state, RngStream::Trap);
        assert_eq!(
            select_trap(&state, &fixture.catalog, &mut dice),
            Some("T_AUTO".to_string())
        );

        state.modifiers.traps.push("T_AUTO".into());
        let mut dice = env.dice(&state, RngStream::Trap);
        assert_ne!(
            select_trap(&state, &fixture.catalog, &mut dice),
            Some("T_AUTO".to_string())
        );
    }

    #[test]
    fn no_trap_once_all_are_active() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.modifiers.traps = fixture
            .catalog
            .traps()
            .iter()
            .map(|trap| trap.id.clone())
            .collect();
        let mut dice = env.dice(&state, RngStream::Trap);
        assert_eq!(select_trap(&state, &fixture.catalog, &mut dice), None);
    }

    #[test]
    fn first_unseen_note_that_fits_is_shown() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.shift_index = 0;
        assert_eq!(sticky_note(&state, &env).map(|n| n.id.as_str()), Some("sn-tut-1"));

        state.history.seen_sticky_notes.push("sn-tut-1".into());
        assert_eq!(sticky_note(&state, &env), None);
    }

    #[test]
    fn flag_gated_note_needs_its_flag() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = active_state(&fixture);
        assert_eq!(sticky_note(&state, &env), None);
        state.narrative.flags = StoryFlags::HARDSHIP;
        assert_eq!(
            sticky_note(&state, &env).map(|n| n.id.as_str()),
            Some("sn-hardship-1")
        );
    }

    #[test]
    fn directive_can_replace_the_lore_note_after_lunch() {
        let fixture = Fixture::with_roll(0);
        let env = fixture.env();
        let mut state = active_state(&fixture);
        state.shift_index = 3;
        state.work.processed_in_shift = 5;
        let note = sticky_note(&state, &env).expect("directive");
        assert!(note.directive);
    }
}
