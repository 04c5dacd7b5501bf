//! Rule matching.
//!
//! Two violation sets are computed for every log. The bureaucratic set is
//! what the player is judged against: active rules minus amended ones. The
//! actual set matches the full rule table. When a hazard is only in the
//! actual set, logging it is "approved by amendment" and takes the milder
//! integrity-drain penalty.

use crate::env::RuleDef;
use crate::state::{ActiveAmendment, HazardTags};

/// Tags of `tags` caught by active, non-amended rules.
pub fn violating_tags(
    tags: HazardTags,
    active_rule_ids: &[String],
    amendments: &[ActiveAmendment],
    rules: &[RuleDef],
) -> HazardTags {
    rules
        .iter()
        .filter(|rule| active_rule_ids.iter().any(|id| *id == rule.id))
        .filter(|rule| !amendments.iter().any(|a| a.rule_id == rule.id))
        .fold(HazardTags::empty(), |acc, rule| acc | (rule.tags & tags))
}

/// Tags of `tags` caught by any rule in the static table.
pub fn actual_violations(tags: HazardTags, rules: &[RuleDef]) -> HazardTags {
    rules
        .iter()
        .fold(HazardTags::empty(), |acc, rule| acc | (rule.tags & tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, tags: HazardTags) -> RuleDef {
        RuleDef {
            id: id.into(),
            text: String::new(),
            tags,
            amendment_text: None,
            conflict_id: None,
        }
    }

    fn table() -> Vec<RuleDef> {
        vec![
            rule("R1", HazardTags::NETWORK_REQUEST | HazardTags::EXTERNAL_LINK),
            rule(
                "R4",
                HazardTags::CHARM | HazardTags::COMPLIMENT | HazardTags::EMOTIONAL_MANIPULATION,
            ),
            rule("R6", HazardTags::SALES | HazardTags::PERSUASION),
        ]
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn amendment_removes_tag_only_from_bureaucratic_set() {
        let rules = table();
        let tags = HazardTags::CHARM;
        let amendments = vec![ActiveAmendment {
            id: "AM-2".into(),
            rule_id: "R4".into(),
        }];

        let bureaucratic = violating_tags(tags, &ids(&["R1", "R4", "R6"]), &amendments, &rules);
        let actual = actual_violations(tags, &rules);

        assert!(bureaucratic.is_empty());
        assert_eq!(actual, HazardTags::CHARM);
    }

    #[test]
    fn inactive_rule_does_not_count() {
        let rules = table();
        let tags = HazardTags::SALES | HazardTags::CHARM;
        let bureaucratic = violating_tags(tags, &ids(&["R4"]), &[], &rules);
        assert_eq!(bureaucratic, HazardTags::CHARM);
    }

    #[test]
    fn untagged_log_matches_nothing() {
        let rules = table();
        let bureaucratic =
            violating_tags(HazardTags::HELP, &ids(&["R1", "R4", "R6"]), &[], &rules);
        assert!(bureaucratic.is_empty());
        assert!(actual_violations(HazardTags::HELP, &rules).is_empty());
    }
}
