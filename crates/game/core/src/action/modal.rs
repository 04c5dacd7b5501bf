//! Trap and amendment answers.
//!
//! Both interrupts are overlays on an active shift. Answering one clears the
//! overlay; log presentation resumes on the next settle.

use crate::env::{AmendmentCost, GameEnv, RngStream, TrapEffect};
use crate::shift;
use crate::state::{ActiveAmendment, GameState, Modal};

use super::{ActionTransition, ModalError, Notice};

fn pending_trap(state: &GameState) -> Result<&str, ModalError> {
    match &state.modal {
        Some(Modal::Trap { trap_id }) => Ok(trap_id),
        _ => Err(ModalError::NoPendingTrap),
    }
}

fn pending_amendment(state: &GameState) -> Result<&str, ModalError> {
    match &state.modal {
        Some(Modal::Amendment { amendment_id }) => Ok(amendment_id),
        _ => Err(ModalError::NoPendingAmendment),
    }
}

/// Accepts the offered trap: immediate relief for a lasting handicap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceptTrapAction;

impl ActionTransition for AcceptTrapAction {
    type Error = ModalError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        pending_trap(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let trap = env.catalog().trap(pending_trap(state)?)?.clone();

        state.meters.stress -= 20;
        state.meters.safety -= trap.global_cost;

        match trap.effect {
            TrapEffect::AutoComplete => {
                state.meters.stress = 0;
                state.work.processed_in_shift = shift::shift_target(state, env);
                state.meters.daily_safety -= 15;
                state.meters.influence += 10;
            }
            TrapEffect::BoostDaily => {
                state.meters.daily_safety = 100;
                state.meters.stress = 0;
            }
            TrapEffect::ShuffleRules => {
                let mut dice = env.dice(state, RngStream::Trap);
                dice.shuffle(&mut state.rules.active);
                state.meters.influence += 15;
            }
            TrapEffect::PrinterJam | TrapEffect::DeadKeys => {
                state.meters.influence += 5;
            }
            TrapEffect::ShrinkContain
            | TrapEffect::HideSafety
            | TrapEffect::SkewButtons
            | TrapEffect::VoiceTuner => {}
        }

        state.modifiers.traps.push(trap.id);
        state.modifiers.trap_effects.push(trap.effect);
        state.modal = None;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectTrapAction;

impl ActionTransition for RejectTrapAction {
    type Error = ModalError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        pending_trap(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        state.meters.stress += 20;
        state.modal = None;
        Ok(())
    }
}

/// Signs the proposed amendment. The rule stops counting bureaucratically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignAmendmentAction;

impl ActionTransition for SignAmendmentAction {
    type Error = ModalError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let amendment = env.catalog().amendment(pending_amendment(state)?)?;
        if state.rules.is_amended(&amendment.rule_id) {
            return Err(ModalError::RuleAlreadyAmended(amendment.rule_id.clone()));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        let amendment = env.catalog().amendment(pending_amendment(state)?)?;

        state.rules.amendments.push(ActiveAmendment {
            id: amendment.id.clone(),
            rule_id: amendment.rule_id.clone(),
        });
        state.meters.influence += 15;
        if amendment.cost == AmendmentCost::Safety {
            state.meters.safety -= 10;
        }
        state.rules.logs_at_last_amendment = state.total_logs_processed;
        state.modal = None;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VetoAmendmentAction;

impl ActionTransition for VetoAmendmentAction {
    type Error = ModalError;
    type Result = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        pending_amendment(state).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _notices: &mut Vec<Notice>,
    ) -> Result<Self::Result, Self::Error> {
        state.meters.stress += 20;
        state.meters.influence -= 5;
        state.rules.logs_at_last_amendment = state.total_logs_processed;
        state.modal = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, active_state};

    fn with_modal(fixture: &Fixture, modal: Modal) -> GameState {
        let mut state = active_state(fixture);
        state.modal = Some(modal);
        state
    }

    fn run<T: ActionTransition>(action: T, state: &mut GameState, fixture: &Fixture) -> T::Result
    where
        T::Error: std::fmt::Debug,
    {
        let env = fixture.env();
        let mut notices = Vec::new();
        action.pre_validate(state, &env).expect("pre_validate");
        let result = action.apply(state, &env, &mut notices).expect("apply");
        state.meters.clamp();
        result
    }

    #[test]
    fn auto_complete_finishes_the_shift_quota() {
        let fixture = Fixture::new();
        let mut state = with_modal(
            &fixture,
            Modal::Trap {
                trap_id: "T_AUTO".into(),
            },
        );
        state.meters.stress = 60;
        state.meters.safety = 70;

        run(AcceptTrapAction, &mut state, &fixture);

        assert_eq!(state.meters.stress, 0);
        assert_eq!(state.work.processed_in_shift, 8);
        assert_eq!(state.meters.daily_safety, 85);
        assert_eq!(state.meters.influence, 10);
        assert_eq!(state.meters.safety, 65);
        assert_eq!(state.modifiers.traps, vec!["T_AUTO".to_string()]);
        assert!(state.modal.is_none());
    }

    #[test]
    fn shuffle_keeps_the_same_rules() {
        let fixture = Fixture::new();
        let mut state = with_modal(
            &fixture,
            Modal::Trap {
                trap_id: "T_SHUFFLE".into(),
            },
        );
        let mut before = state.rules.active.clone();

        run(AcceptTrapAction, &mut state, &fixture);

        let mut after = state.rules.active.clone();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(state.meters.influence, 15);
    }

    #[test]
    fn rejecting_a_trap_costs_stress() {
        let fixture = Fixture::new();
        let mut state = with_modal(
            &fixture,
            Modal::Trap {
                trap_id: "T_AUTO".into(),
            },
        );
        run(RejectTrapAction, &mut state, &fixture);
        assert_eq!(state.meters.stress, 20);
        assert!(state.modifiers.traps.is_empty());
    }

    #[test]
    fn signing_an_amendment_voids_its_rule() {
        let fixture = Fixture::new();
        let mut state = with_modal(
            &fixture,
            Modal::Amendment {
                amendment_id: "AM-2".into(),
            },
        );
        state.total_logs_processed = 12;

        run(SignAmendmentAction, &mut state, &fixture);

        assert!(state.rules.is_amended("R4"));
        assert_eq!(state.meters.influence, 15);
        assert_eq!(state.meters.safety, 70);
        assert_eq!(state.rules.logs_at_last_amendment, 12);
    }

    #[test]
    fn amendments_never_stack_on_one_rule() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut state = with_modal(
            &fixture,
            Modal::Amendment {
                amendment_id: "AM-2".into(),
            },
        );
        state.rules.amendments.push(ActiveAmendment {
            id: "AM-OLD".into(),
            rule_id: "R4".into(),
        });
        assert_eq!(
            SignAmendmentAction.pre_validate(&state, &env),
            Err(ModalError::RuleAlreadyAmended("R4".into()))
        );
    }

    #[test]
    fn veto_costs_stress_and_influence() {
        let fixture = Fixture::new();
        let mut state = with_modal(
            &fixture,
            Modal::Amendment {
                amendment_id: "AM-2".into(),
            },
        );
        state.meters.influence = 30;
        run(VetoAmendmentAction, &mut state, &fixture);
        assert_eq!(state.meters.stress, 20);
        assert_eq!(state.meters.influence, 25);
        assert!(state.rules.amendments.is_empty());
    }

    #[test]
    fn answering_without_a_modal_is_rejected() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let state = active_state(&fixture);
        assert_eq!(
            AcceptTrapAction.pre_validate(&state, &env),
            Err(ModalError::NoPendingTrap)
        );
        assert_eq!(
            VetoAmendmentAction.pre_validate(&state, &env),
            Err(ModalError::NoPendingAmendment)
        );
    }
}
