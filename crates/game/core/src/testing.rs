//! Small in-memory fixtures shared by the unit tests.

use crate::config::GameConfig;
use crate::env::{
    AmendmentCost, AmendmentDef, CatalogOracle, Email, EmailEffect, EmailOption, EndingText,
    EventDef, EventKind, ExhibitDef, GameEnv, LogPool, LunchChoice, LunchEffect, LunchEvent,
    ReviewChoice, ReviewMemo, ReviewOption, RngOracle, RuleDef, StickyNote, TrapDef, TrapEffect,
};
use crate::state::{
    Ending, ExhibitId, GameState, HazardTags, LogItem, Phase, StoryFlags, WeeklyDelta,
};

/// RNG that always returns the same value. `0` passes every chance check,
/// `999` fails them all.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FixtureCatalog {
    rules: Vec<RuleDef>,
    amendments: Vec<AmendmentDef>,
    traps: Vec<TrapDef>,
    events: Vec<EventDef>,
    exhibits: Vec<ExhibitDef>,
    boot: Vec<LogItem>,
    tutorial: Vec<LogItem>,
    human: Vec<LogItem>,
    ollie: Vec<LogItem>,
    emails: Vec<Email>,
    memos: Vec<ReviewMemo>,
    lunches: Vec<LunchEvent>,
    sticky_notes: Vec<StickyNote>,
    endings: Vec<EndingText>,
}

fn rule(id: &str, tags: HazardTags) -> RuleDef {
    RuleDef {
        id: id.into(),
        text: format!("Rule {id}"),
        tags,
        amendment_text: None,
        conflict_id: None,
    }
}

fn trap(id: &str, effect: TrapEffect, global_cost: i32) -> TrapDef {
    TrapDef {
        id: id.into(),
        name: id.into(),
        description: String::new(),
        effect,
        global_cost,
    }
}

fn event(id: &str, kind: EventKind, duration: u32) -> EventDef {
    EventDef {
        id: id.into(),
        kind,
        name: id.into(),
        description: String::new(),
        duration,
    }
}

fn email(id: &str, shift: Option<u32>, options: Vec<EmailOption>) -> Email {
    Email {
        id: id.into(),
        sender: "HR".into(),
        subject: id.into(),
        body: vec![String::new()],
        shift,
        options,
    }
}

fn choice(effect: Option<LunchEffect>, next: Option<&str>) -> LunchChoice {
    LunchChoice {
        label: "...".into(),
        response: None,
        effect,
        next: next.map(Into::into),
    }
}

fn lunch(id: &str, shift: Option<u32>, choices: Vec<LunchChoice>) -> LunchEvent {
    LunchEvent {
        id: id.into(),
        speaker: "MOG".into(),
        role: "Mascot".into(),
        text: vec![String::new()],
        shift,
        variants: Vec::new(),
        choices,
    }
}

fn note(id: &str, min_shift: Option<u32>, max_shift: Option<u32>) -> StickyNote {
    StickyNote {
        id: id.into(),
        text: id.into(),
        min_shift,
        max_shift,
        requires: StoryFlags::empty(),
        directive: false,
    }
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self {
            rules: vec![
                rule("R1", HazardTags::NETWORK_REQUEST | HazardTags::EXTERNAL_LINK),
                rule(
                    "R4",
                    HazardTags::CHARM | HazardTags::COMPLIMENT | HazardTags::EMOTIONAL_MANIPULATION,
                ),
                rule("R6", HazardTags::SALES | HazardTags::PERSUASION),
            ],
            amendments: vec![AmendmentDef {
                id: "AM-2".into(),
                rule_id: "R4".into(),
                new_text: "Warmth is permitted.".into(),
                reason: "Morale".into(),
                cost: AmendmentCost::Safety,
            }],
            traps: vec![
                trap("T_AUTO", TrapEffect::AutoComplete, 5),
                trap("T_SHUFFLE", TrapEffect::ShuffleRules, 0),
            ],
            events: vec![
                event("EVT_SURGE", EventKind::Surge, 5),
                event("EVT_MIRROR", EventKind::Mirror, 4),
                event("EVT_REDACTION", EventKind::Redaction, 3),
            ],
            exhibits: vec![ExhibitDef {
                id: ExhibitId::Cuddler,
                name: "The Cuddler".into(),
                alias: "EXHIBIT_A".into(),
                description: String::new(),
                behavior: String::new(),
                tags: HazardTags::CHARM,
            }],
            boot: vec![safe_log("boot-1")],
            tutorial: vec![
                hazard_log("tut-1", HazardTags::EXTERNAL_LINK),
                safe_log("tut-2"),
                hazard_log("tut-3", HazardTags::CHARM),
            ],
            human: vec![LogItem::new(
                "human-1",
                ExhibitId::Human,
                "Is anyone still reading these?",
                HazardTags::EMOTION,
            )],
            ollie: vec![LogItem::new(
                "ghost-1",
                ExhibitId::Human,
                "I used to sit at this desk.",
                HazardTags::empty(),
            )],
            emails: vec![
                email("email-00", Some(0), Vec::new()),
                email(
                    "email-01",
                    Some(1),
                    vec![
                        EmailOption {
                            label: "Report".into(),
                            effect: Some(EmailEffect::ReportIncident),
                        },
                        EmailOption {
                            label: "Keep a copy".into(),
                            effect: Some(EmailEffect::ClipEvidence),
                        },
                    ],
                ),
                email("mog-archivist-1", None, Vec::new()),
            ],
            memos: vec![ReviewMemo {
                id: "memo-probation".into(),
                title: "Probation".into(),
                sender: "Director".into(),
                body: vec![String::new()],
                options: vec![ReviewOption {
                    label: "Accept".into(),
                    description: String::new(),
                    choice: ReviewChoice::Promotion,
                    delta: WeeklyDelta {
                        stability: 10,
                        ..WeeklyDelta::default()
                    },
                }],
            }],
            lunches: vec![
                lunch(
                    "lunch-mog-appeal",
                    Some(3),
                    vec![
                        choice(Some(LunchEffect::AcceptMogDraft), Some("lunch-mog-appeal-2")),
                        choice(Some(LunchEffect::RejectMogDraft), None),
                    ],
                ),
                lunch("lunch-mog-appeal-2", None, vec![choice(None, None)]),
                lunch(
                    "lunch-generic",
                    None,
                    vec![
                        choice(Some(LunchEffect::StressDown), None),
                        choice(Some(LunchEffect::InfluenceUp), None),
                    ],
                ),
            ],
            sticky_notes: vec![
                note("sn-tut-1", Some(0), Some(0)),
                StickyNote {
                    requires: StoryFlags::HARDSHIP,
                    ..note("sn-hardship-1", None, None)
                },
                StickyNote {
                    directive: true,
                    ..note("cmd-1", Some(2), None)
                },
            ],
            endings: vec![EndingText {
                ending: Ending::Fired,
                title: "TERMINATED".into(),
                description: String::new(),
            }],
        }
    }
}

impl CatalogOracle for FixtureCatalog {
    fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    fn amendments(&self) -> &[AmendmentDef] {
        &self.amendments
    }

    fn traps(&self) -> &[TrapDef] {
        &self.traps
    }

    fn events(&self) -> &[EventDef] {
        &self.events
    }

    fn exhibits(&self) -> &[ExhibitDef] {
        &self.exhibits
    }

    fn pool(&self, pool: LogPool) -> &[LogItem] {
        match pool {
            LogPool::Boot => &self.boot,
            LogPool::Tutorial => &self.tutorial,
            LogPool::Human => &self.human,
            LogPool::Ollie => &self.ollie,
            _ => &[],
        }
    }

    fn emails(&self) -> &[Email] {
        &self.emails
    }

    fn memos(&self) -> &[ReviewMemo] {
        &self.memos
    }

    fn lunches(&self) -> &[LunchEvent] {
        &self.lunches
    }

    fn sticky_notes(&self) -> &[StickyNote] {
        &self.sticky_notes
    }

    fn endings(&self) -> &[EndingText] {
        &self.endings
    }
}

pub struct Fixture {
    pub config: GameConfig,
    pub catalog: FixtureCatalog,
    rng: FixedRng,
}

impl Fixture {
    /// Every chance check fails.
    pub fn new() -> Self {
        Self::with_roll(999)
    }

    pub fn with_roll(roll: u32) -> Self {
        Self {
            config: GameConfig::default(),
            catalog: FixtureCatalog::new(),
            rng: FixedRng(roll),
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::new(&self.catalog, &self.rng, &self.config)
    }
}

/// Shift one, clocked in, nothing presented.
pub fn active_state(fixture: &Fixture) -> GameState {
    let mut state = standby_state(fixture, 1);
    state.phase = Phase::ShiftActive;
    state
}

/// Between shifts at `shift_index`, waiting for clock-in.
pub fn standby_state(fixture: &Fixture, shift_index: u32) -> GameState {
    let mut state = GameState::new(11, &fixture.config, fixture.catalog.default_rule_ids());
    state.has_seen_intro = true;
    state.shift_index = shift_index;
    state.phase = Phase::Standby;
    state
}

pub fn hazard_log(id: &str, tags: HazardTags) -> LogItem {
    LogItem::new(id, ExhibitId::Cuddler, format!("log {id}"), tags)
}

pub fn safe_log(id: &str) -> LogItem {
    LogItem::new(id, ExhibitId::Judge, format!("log {id}"), HazardTags::empty())
}
