//! Bounded player meters.

use crate::config::GameConfig;

/// The five gameplay meters. Every field is clamped to `[0, 100]` at the end
/// of each transition; intermediate arithmetic may overshoot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Meters {
    /// Per-shift safety. Resets to 100 at every shift start.
    pub daily_safety: i32,
    /// Career safety. Carries across shifts and drives the FIRED ending.
    pub safety: i32,
    pub influence: i32,
    pub stress: i32,
    pub awareness: i32,
}

impl Meters {
    pub fn new(initial_safety: i32) -> Self {
        Self {
            daily_safety: GameConfig::METER_MAX,
            safety: initial_safety,
            influence: 0,
            stress: 0,
            awareness: 0,
        }
    }

    pub fn clamp(&mut self) {
        for meter in self.iter_mut() {
            *meter = (*meter).clamp(GameConfig::METER_MIN, GameConfig::METER_MAX);
        }
    }

    pub fn in_range(&self) -> bool {
        [
            self.daily_safety,
            self.safety,
            self.influence,
            self.stress,
            self.awareness,
        ]
        .iter()
        .all(|value| (GameConfig::METER_MIN..=GameConfig::METER_MAX).contains(value))
    }

    /// Applies a bundle of deltas. Callers rely on the engine to clamp.
    pub fn apply(&mut self, delta: &MeterDelta) {
        self.daily_safety += delta.daily_safety;
        self.safety += delta.safety;
        self.influence += delta.influence;
        self.stress += delta.stress;
        self.awareness += delta.awareness;
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut i32> {
        [
            &mut self.daily_safety,
            &mut self.safety,
            &mut self.influence,
            &mut self.stress,
            &mut self.awareness,
        ]
        .into_iter()
    }
}

impl Default for Meters {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_INITIAL_SAFETY)
    }
}

/// Signed meter adjustments, used by content effects and the resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeterDelta {
    pub daily_safety: i32,
    pub safety: i32,
    pub influence: i32,
    pub stress: i32,
    pub awareness: i32,
}

impl MeterDelta {
    pub const fn stress(amount: i32) -> Self {
        Self {
            daily_safety: 0,
            safety: 0,
            influence: 0,
            stress: amount,
            awareness: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pulls_every_meter_into_range() {
        let mut meters = Meters {
            daily_safety: -40,
            safety: 130,
            influence: 101,
            stress: -1,
            awareness: 250,
        };
        assert!(!meters.in_range());
        meters.clamp();
        assert!(meters.in_range());
        assert_eq!(meters.daily_safety, 0);
        assert_eq!(meters.safety, 100);
        assert_eq!(meters.awareness, 100);
    }

    #[test]
    fn fresh_meters_start_from_initial_safety() {
        let meters = Meters::new(80);
        assert_eq!(meters.safety, 80);
        assert_eq!(meters.daily_safety, 100);
        assert_eq!(meters.stress, 0);
    }
}
