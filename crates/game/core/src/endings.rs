//! Terminal outcomes.
//!
//! Five endings can fire at any point of a shift; four more are reserved for
//! the end of the schedule. Once a run is over only a reset leaves it.

use crate::action::Notice;
use crate::config::GameConfig;
use crate::state::{Ending, GameState, Phase, Rank};

const BROKEN_AFTER_HITS: u32 = 3;
const SPEEDRUN_MIN_LOGS: u32 = 50;
const SPEEDRUN_MIN_SHIFT: u32 = 5;

/// Ending triggered by the current meters, if any. First match wins.
pub fn check(state: &GameState) -> Option<Ending> {
    let meters = &state.meters;
    if meters.safety <= GameConfig::METER_MIN {
        return Some(Ending::Fired);
    }
    if meters.influence >= GameConfig::METER_MAX {
        return Some(Ending::Subject0);
    }
    if state.stress_max_hits >= BROKEN_AFTER_HITS {
        return Some(Ending::Broken);
    }
    if meters.awareness >= GameConfig::METER_MAX {
        return Some(Ending::OllieAscension);
    }
    // More than nine in ten logs contained.
    let total = state.total_logs_processed;
    if total > SPEEDRUN_MIN_LOGS
        && state.total_contains * 10 > total * 9
        && state.shift_index > SPEEDRUN_MIN_SHIFT
    {
        return Some(Ending::Speedrun);
    }
    None
}

/// Ending reached by surviving the whole schedule.
pub fn final_ending(state: &GameState) -> Ending {
    let meters = &state.meters;
    let narrative = &state.narrative;
    if narrative.mog_rapport >= 8 || meters.influence > 90 {
        Ending::Overrun
    } else if narrative.has_clipped_evidence() && narrative.evidence_count >= 5 {
        Ending::Thawed
    } else if state.rank == Rank::Director && meters.safety > 40 {
        Ending::Manager
    } else {
        Ending::TrueEnding
    }
}

/// Freezes the run on `ending`.
pub fn conclude(state: &mut GameState, ending: Ending, notices: &mut Vec<Notice>) {
    state.phase = Phase::GameOver { ending };
    state.modal = None;
    state.paused = false;
    state.work.current = None;
    state.work.queue.clear();
    if ending == Ending::Subject0 {
        state.rank = Rank::Subject0;
    }
    notices.push(Notice::GameOver { ending });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, active_state, safe_log};

    #[test]
    fn healthy_run_has_no_ending() {
        let fixture = Fixture::new();
        assert_eq!(check(&active_state(&fixture)), None);
    }

    #[test]
    fn fired_outranks_everything() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.meters.safety = 0;
        state.meters.influence = 100;
        state.stress_max_hits = 3;
        assert_eq!(check(&state), Some(Ending::Fired));
    }

    #[test]
    fn immediate_endings_in_priority_order() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.stress_max_hits = 3;
        state.meters.awareness = 100;
        assert_eq!(check(&state), Some(Ending::Broken));

        state.stress_max_hits = 2;
        assert_eq!(check(&state), Some(Ending::OllieAscension));
    }

    #[test]
    fn speedrun_needs_volume_ratio_and_tenure() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.total_logs_processed = 60;
        state.total_contains = 55;
        state.shift_index = 6;
        assert_eq!(check(&state), Some(Ending::Speedrun));

        state.total_contains = 54;
        assert_eq!(check(&state), None);

        state.total_contains = 55;
        state.shift_index = 5;
        assert_eq!(check(&state), None);
    }

    #[test]
    fn final_ending_table() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        assert_eq!(final_ending(&state), Ending::TrueEnding);

        state.rank = Rank::Director;
        state.meters.safety = 41;
        assert_eq!(final_ending(&state), Ending::Manager);

        state.narrative.flags |= crate::state::StoryFlags::CLIPPED_EVIDENCE;
        state.narrative.evidence_count = 5;
        assert_eq!(final_ending(&state), Ending::Thawed);

        state.narrative.mog_rapport = 8;
        assert_eq!(final_ending(&state), Ending::Overrun);
    }

    #[test]
    fn conclude_clears_the_desk() {
        let fixture = Fixture::new();
        let mut state = active_state(&fixture);
        state.work.current = Some(safe_log("a"));
        state.work.queue.push_back(safe_log("b"));
        state.paused = true;
        let mut notices = Vec::new();

        conclude(&mut state, Ending::Subject0, &mut notices);

        assert_eq!(state.phase.ending(), Some(Ending::Subject0));
        assert_eq!(state.rank, Rank::Subject0);
        assert!(state.work.is_idle());
        assert!(!state.paused);
        assert!(state.validate().is_ok());
        assert_eq!(
            notices,
            vec![Notice::GameOver {
                ending: Ending::Subject0
            }]
        );
    }
}
