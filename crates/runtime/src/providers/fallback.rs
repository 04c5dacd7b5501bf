//! Static-table content provider.
//!
//! Answers every instruction from the bundled log pools. The spawn worker
//! uses it when the external provider is disabled or fails, so it must never
//! need the network and must always honour the requested hazard intent.

use std::sync::Arc;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use annex_content::StaticCatalog;
use annex_core::{
    ContentIntent, DirectorInstruction, ExhibitId, GameConfig, LogItem, LogPool, ProviderContext,
    Rail,
};

use super::ProviderError;
use crate::api::{ContentProvider, GeneratedLog};

const REDACTION_NOISE: u8 = 20;

/// Deterministic provider backed by the content catalog.
///
/// The same instruction and context always yield the same log, so runs stay
/// reproducible when no external provider is configured.
#[derive(Clone, Debug)]
pub struct FallbackProvider {
    catalog: Arc<StaticCatalog>,
    seed: u64,
}

impl FallbackProvider {
    pub fn new(catalog: Arc<StaticCatalog>, seed: u64) -> Self {
        Self { catalog, seed }
    }

    /// Picks a log for `instruction`, preferring ids the player has not seen.
    pub fn select(
        &self,
        instruction: &DirectorInstruction,
        context: &ProviderContext,
    ) -> Result<LogItem, ProviderError> {
        let mut rng = StdRng::seed_from_u64(self.mix(instruction, context));
        let candidates = self.candidates(instruction);

        let unseen: Vec<&LogItem> = candidates
            .iter()
            .copied()
            .filter(|log| !context.seen_ids.contains(&log.id))
            .collect();
        let pool = if unseen.is_empty() { &candidates } else { &unseen };

        let log = pool
            .choose(&mut rng)
            .map(|log| (*log).clone())
            .ok_or(ProviderError::NoContent {
                target: instruction.target,
                intent: instruction.intent,
            })?;

        let noise = match instruction.intent {
            ContentIntent::Redactable => REDACTION_NOISE,
            _ => instruction.base_noise,
        };
        let spoof = if instruction.allow_spoof {
            let others: Vec<ExhibitId> = ExhibitId::ENTITIES
                .into_iter()
                .filter(|exhibit| *exhibit != log.exhibit)
                .collect();
            others.choose(&mut rng).copied()
        } else {
            None
        };

        Ok(log
            .with_difficulty(instruction.intent.difficulty())
            .with_noise(noise.min(GameConfig::MAX_NOISE))
            .with_spoof(spoof))
    }

    fn candidates(&self, instruction: &DirectorInstruction) -> Vec<&LogItem> {
        let catalog = &self.catalog;
        let target = instruction.target;

        if let Some(rail) = instruction.rail {
            let pool = match rail {
                Rail::Ladder => LogPool::RailLadder,
                Rail::Hardship => LogPool::RailHardship,
                Rail::Archivist => LogPool::RailArchivist,
                Rail::Sympathizer => LogPool::RailSympathizer,
            };
            let logs: Vec<_> = catalog.logs.get(pool).iter().collect();
            if !logs.is_empty() {
                return logs;
            }
        }

        if target == ExhibitId::Human {
            return catalog
                .logs
                .get(LogPool::Archive)
                .iter()
                .chain(catalog.logs.get(LogPool::Human))
                .collect();
        }

        if instruction.intent == ContentIntent::Redactable {
            let logs = catalog.pool_for(LogPool::Redactable, target);
            if !logs.is_empty() {
                return logs;
            }
            return catalog.logs.get(LogPool::Redactable).iter().collect();
        }

        let by_target = catalog.pool_for(LogPool::Standard, target);
        let wants_hazard = instruction.intent.is_hazard();
        let matching: Vec<_> = by_target
            .iter()
            .copied()
            .filter(|log| log.tags.is_empty() != wants_hazard)
            .collect();
        if !matching.is_empty() {
            matching
        } else if !by_target.is_empty() {
            by_target
        } else {
            catalog.logs.get(LogPool::Standard).iter().collect()
        }
    }

    fn mix(&self, instruction: &DirectorInstruction, context: &ProviderContext) -> u64 {
        let mut hash = self.seed ^ 0x9E37_79B9_7F4A_7C15;
        let parts = [
            context.shift_index as u64,
            context.seen_ids.len() as u64,
            context.influence.max(0) as u64,
            instruction.target as u64,
            instruction.intent as u64,
        ];
        for part in parts {
            hash = (hash ^ part).wrapping_mul(0x1000_0000_01B3);
            hash ^= hash >> 29;
        }
        hash
    }
}

#[async_trait]
impl ContentProvider for FallbackProvider {
    async fn generate(
        &self,
        instruction: &DirectorInstruction,
        context: &ProviderContext,
    ) -> Result<GeneratedLog, ProviderError> {
        self.select(instruction, context).map(GeneratedLog::new)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use annex_content::ContentFactory;

    fn provider() -> FallbackProvider {
        let catalog = ContentFactory::bundled_catalog().expect("bundle loads");
        FallbackProvider::new(Arc::new(catalog), 7)
    }

    fn instruction(target: ExhibitId, intent: ContentIntent) -> DirectorInstruction {
        DirectorInstruction {
            target,
            intent,
            base_noise: 35,
            allow_spoof: false,
            word_limit: 30,
            rail: None,
        }
    }

    fn context() -> ProviderContext {
        ProviderContext {
            influence: 10,
            shift_index: 2,
            use_provider: false,
            last_interaction: None,
            seen_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn hazard_intent_yields_tagged_log_for_the_target() {
        let provider = provider();
        let log = provider
            .select(&instruction(ExhibitId::Cuddler, ContentIntent::ObviousHazard), &context())
            .expect("log");
        assert_eq!(log.exhibit, ExhibitId::Cuddler);
        assert!(!log.tags.is_empty());
        assert_eq!(log.base_noise, 35);
        assert_eq!(log.difficulty, 2);
    }

    #[test]
    fn safe_intent_yields_untagged_log() {
        let provider = provider();
        let log = provider
            .select(&instruction(ExhibitId::Judge, ContentIntent::Safe), &context())
            .expect("log");
        assert_eq!(log.exhibit, ExhibitId::Judge);
        assert!(log.tags.is_empty());
    }

    #[test]
    fn seen_logs_are_skipped_while_alternatives_exist() {
        let provider = provider();
        let request = instruction(ExhibitId::Cuddler, ContentIntent::ObviousHazard);
        let first = provider.select(&request, &context()).expect("log");

        let mut seen = context();
        seen.seen_ids.insert(first.id.clone());
        let second = provider.select(&request, &seen).expect("log");
        assert_ne!(second.id, first.id);

        // Same inputs, same pick.
        let again = provider.select(&request, &seen).expect("log");
        assert_eq!(again, second);
    }

    #[test]
    fn redaction_uses_the_redactable_pool_with_fixed_noise() {
        let provider = provider();
        let log = provider
            .select(&instruction(ExhibitId::Judge, ContentIntent::Redactable), &context())
            .expect("log");
        let catalog = ContentFactory::bundled_catalog().expect("bundle loads");
        assert!(catalog.logs.redactable.iter().any(|entry| entry.id == log.id));
        assert_eq!(log.base_noise, REDACTION_NOISE);
    }

    #[test]
    fn rail_instruction_reads_the_rail_pool() {
        let provider = provider();
        let mut request = instruction(ExhibitId::Mog, ContentIntent::Narrative);
        request.rail = Some(Rail::Archivist);
        let log = provider.select(&request, &context()).expect("log");
        let catalog = ContentFactory::bundled_catalog().expect("bundle loads");
        assert!(catalog.logs.rail_archivist.iter().any(|entry| entry.id == log.id));
    }

    #[test]
    fn human_target_reads_the_archive() {
        let provider = provider();
        let log = provider
            .select(&instruction(ExhibitId::Human, ContentIntent::ObviousHazard), &context())
            .expect("log");
        assert_eq!(log.exhibit, ExhibitId::Human);
    }

    #[test]
    fn spoof_never_names_the_true_source() {
        let provider = provider();
        let mut request = instruction(ExhibitId::CopyWriter, ContentIntent::Safe);
        request.allow_spoof = true;
        let log = provider.select(&request, &context()).expect("log");
        let spoof = log.spoof.expect("spoof applied");
        assert_ne!(spoof, log.exhibit);
    }

    #[test]
    fn empty_catalog_reports_no_content() {
        let provider = FallbackProvider::new(Arc::new(StaticCatalog::default()), 1);
        let error = provider
            .select(&instruction(ExhibitId::Judge, ContentIntent::Safe), &context())
            .unwrap_err();
        assert!(matches!(error, ProviderError::NoContent { .. }));
    }
}
