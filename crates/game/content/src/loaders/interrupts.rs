//! Trap and event loader.

use std::path::Path;

use annex_core::env::{EventDef, TrapDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Interrupt table structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterruptTable {
    pub traps: Vec<TrapDef>,
    pub events: Vec<EventDef>,
}

/// Loader for traps and timed events from RON files.
pub struct InterruptLoader;

impl InterruptLoader {
    pub fn load(path: &Path) -> LoadResult<InterruptTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InterruptTable> {
        let table: InterruptTable = parse_ron(content, "interrupt table")?;
        if let Some(event) = table.events.iter().find(|event| event.duration == 0) {
            anyhow::bail!("event {} never expires", event.id);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annex_core::env::{EventKind, TrapEffect};

    #[test]
    fn global_cost_defaults_to_zero() {
        let table = InterruptLoader::parse(
            r#"(
                traps: [
                    (id: "T1", name: "Auto-Sort", description: "", effect: SHRINK_CONTAIN),
                    (id: "T5", name: "Patch", description: "", effect: BOOST_DAILY, global_cost: 10),
                ],
                events: [
                    (id: "EVT_MIRROR", kind: MIRROR, name: "Input Echo", description: "", duration: 4),
                ],
            )"#,
        )
        .expect("valid interrupts");

        assert_eq!(table.traps[0].global_cost, 0);
        assert_eq!(table.traps[1].effect, TrapEffect::BoostDaily);
        assert_eq!(table.traps[1].global_cost, 10);
        assert_eq!(table.events[0].kind, EventKind::Mirror);
    }

    #[test]
    fn zero_length_event_is_rejected() {
        let result = InterruptLoader::parse(
            r#"(events: [(id: "EVT_FOG", kind: FOG, name: "", description: "", duration: 0)])"#,
        );
        assert!(result.is_err());
    }
}
