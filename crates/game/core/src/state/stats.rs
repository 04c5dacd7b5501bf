//! Telemetry counters and the weekly performance rollup.

/// Content-provider telemetry. Owned by the provider, mirrored here for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionStats {
    pub provider_calls: u32,
    pub tokens_used: u64,
    pub errors: u32,
}

/// Derived rollup, recomputed at shift end and adjusted by review decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeeklyStats {
    pub throughput: i32,
    pub auditability: i32,
    pub variance: i32,
    pub scrutiny: i32,
    pub stability: i32,
    pub dossier_count: i32,
    pub rapport: i32,
}

impl Default for WeeklyStats {
    fn default() -> Self {
        Self {
            throughput: 100,
            auditability: 80,
            variance: 10,
            scrutiny: 20,
            stability: 80,
            dossier_count: 0,
            rapport: 0,
        }
    }
}

/// Adjustments a review option applies to the rollup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeeklyDelta {
    pub throughput: i32,
    pub auditability: i32,
    pub variance: i32,
    pub scrutiny: i32,
    pub stability: i32,
    pub dossier_count: i32,
    pub rapport: i32,
}

impl WeeklyStats {
    pub fn apply(&mut self, delta: &WeeklyDelta) {
        self.throughput += delta.throughput;
        self.auditability += delta.auditability;
        self.variance += delta.variance;
        self.scrutiny += delta.scrutiny;
        self.stability += delta.stability;
        self.dossier_count += delta.dossier_count;
        self.rapport += delta.rapport;
    }
}
