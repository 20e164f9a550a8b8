//! Matchmaking generator.
//!
//! Keeps a minimum number of live and upcoming matches by pairing
//! personalities from the roster. Pairings prefer close ratings with
//! contrasting styles, sometimes a deliberate mismatch, and fall back to any
//! two distinct personalities.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error, info};

use crate::application::context::ArenaContext;
use crate::domain::error::DomainError;
use crate::domain::fixture::{Match, MatchStatus, MatchType, NewMatch};
use crate::domain::id::PersonalityId;
use crate::domain::personality::Personality;
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{ArenaEvent, MatchEvent};

/// Time controls offered for new matches. Advisory only.
pub const TIME_CONTROLS: [&str; 5] = ["1+0", "3+2", "5+0", "10+5", "15+10"];

/// Match types with their relative weights.
pub const MATCH_TYPE_WEIGHTS: [(MatchType, u32); 3] = [
    (MatchType::Regular, 70),
    (MatchType::Tournament, 20),
    (MatchType::Showcase, 10),
];

/// Latest start offset a scheduled match may be given.
pub const MAX_SCHEDULE_MINUTES: i64 = 7 * 24 * 60;

/// Inventory targets and pairing knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchmakingSettings {
    pub min_active: usize,
    pub min_upcoming: usize,
    /// Chance of trying a balanced pairing first.
    pub balanced_probability: f64,
    /// Largest rating gap for a balanced pairing.
    pub max_balanced_gap: u32,
    /// Mismatch gaps lie strictly between these bounds.
    pub mismatch_min_gap: u32,
    pub mismatch_max_gap: u32,
    pub schedule_min_minutes: i64,
    pub schedule_max_minutes: i64,
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            min_active: 2,
            min_upcoming: 5,
            balanced_probability: 0.7,
            max_balanced_gap: 200,
            mismatch_min_gap: 200,
            mismatch_max_gap: 500,
            schedule_min_minutes: 15,
            schedule_max_minutes: 24 * 60,
        }
    }
}

/// How a pairing was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingKind {
    Balanced,
    Mismatch,
    Random,
}

/// Two distinct personalities with colors assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub white: PersonalityId,
    pub black: PersonalityId,
    pub kind: PairingKind,
}

/// Matches created by one replenish run.
#[derive(Debug, Default)]
pub struct ReplenishReport {
    pub started: Vec<Match>,
    pub scheduled: Vec<Match>,
    pub failed: usize,
}

impl ReplenishReport {
    #[must_use]
    pub fn created(&self) -> usize {
        self.started.len() + self.scheduled.len()
    }
}

fn is_balanced(a: &Personality, b: &Personality, settings: &MatchmakingSettings) -> bool {
    a.rating_gap(b) <= settings.max_balanced_gap && a.style != b.style
}

fn is_mismatch(a: &Personality, b: &Personality, settings: &MatchmakingSettings) -> bool {
    let gap = a.rating_gap(b);
    gap > settings.mismatch_min_gap && gap < settings.mismatch_max_gap
}

/// First pair in shuffled order that satisfies `accept`.
fn scan<'a, F>(shuffled: &[&'a Personality], accept: F) -> Option<(&'a Personality, &'a Personality)>
where
    F: Fn(&Personality, &Personality) -> bool,
{
    for (i, a) in shuffled.iter().enumerate() {
        for b in &shuffled[i + 1..] {
            if a.id != b.id && accept(*a, *b) {
                return Some((*a, *b));
            }
        }
    }
    None
}

/// Pick two distinct personalities and assign colors.
///
/// Returns `None` when fewer than two distinct personalities are available.
pub fn pick_pairing<R: Rng + ?Sized>(
    roster: &[Personality],
    settings: &MatchmakingSettings,
    rng: &mut R,
) -> Option<Pairing> {
    let mut shuffled: Vec<&Personality> = roster.iter().collect();
    shuffled.shuffle(rng);

    let try_balanced = rng.gen_bool(settings.balanced_probability);
    let found = if try_balanced {
        scan(&shuffled, |a, b| is_balanced(a, b, settings))
            .map(|pair| (pair, PairingKind::Balanced))
            .or_else(|| {
                scan(&shuffled, |a, b| is_mismatch(a, b, settings))
                    .map(|pair| (pair, PairingKind::Mismatch))
            })
    } else {
        scan(&shuffled, |a, b| is_mismatch(a, b, settings))
            .map(|pair| (pair, PairingKind::Mismatch))
    };

    let ((a, b), kind) = match found {
        Some(found) => found,
        None => (scan(&shuffled, |_, _| true)?, PairingKind::Random),
    };

    let (white, black) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
    Some(Pairing {
        white: white.id,
        black: black.id,
        kind,
    })
}

/// Weighted cosmetic match type.
pub fn pick_match_type<R: Rng + ?Sized>(rng: &mut R) -> MatchType {
    let weights = MATCH_TYPE_WEIGHTS.map(|(_, w)| w);
    match WeightedIndex::new(weights) {
        Ok(dist) => MATCH_TYPE_WEIGHTS[dist.sample(rng)].0,
        Err(_) => MatchType::Regular,
    }
}

/// Uniform cosmetic time control.
pub fn pick_time_control<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TIME_CONTROLS.choose(rng).copied().unwrap_or("5+0")
}

/// Matchmaking generator service.
pub struct Matchmaker {
    ctx: ArenaContext,
    settings: MatchmakingSettings,
    rng: Mutex<StdRng>,
}

impl Matchmaker {
    pub fn new(ctx: ArenaContext, settings: MatchmakingSettings, rng: StdRng) -> Self {
        Self {
            ctx,
            settings,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &MatchmakingSettings {
        &self.settings
    }

    /// Create matches until the live and upcoming targets are met.
    pub async fn replenish(&self, now: DateTime<Utc>) -> Result<ReplenishReport> {
        let active = self
            .ctx
            .store
            .matches_by_status(MatchStatus::InProgress)
            .await?
            .len();
        let upcoming = self
            .ctx
            .store
            .matches_by_status(MatchStatus::Scheduled)
            .await?
            .len();

        let missing_active = self.settings.min_active.saturating_sub(active);
        let missing_upcoming = self.settings.min_upcoming.saturating_sub(upcoming);
        let mut report = ReplenishReport::default();

        for _ in 0..missing_active {
            match self.create(now, None).await {
                Ok(m) => report.started.push(m),
                Err(e) => {
                    error!(error = %e, "Failed to create live match");
                    report.failed += 1;
                }
            }
        }

        for _ in 0..missing_upcoming {
            let start = self.random_start(now);
            match self.create(now, Some(start)).await {
                Ok(m) => report.scheduled.push(m),
                Err(e) => {
                    error!(error = %e, "Failed to schedule match");
                    report.failed += 1;
                }
            }
        }

        if report.created() > 0 {
            info!(
                active,
                upcoming,
                started = report.started.len(),
                scheduled = report.scheduled.len(),
                "Match inventory replenished"
            );
        } else {
            debug!(active, upcoming, "Match inventory at target");
        }
        Ok(report)
    }

    /// Create one match with a generated pairing.
    ///
    /// `start` of `None` starts the match immediately.
    pub async fn create(&self, now: DateTime<Utc>, start: Option<DateTime<Utc>>) -> Result<Match> {
        let roster: Vec<Personality> = self.ctx.registry.all().cloned().collect();
        let (pairing, match_type, time_control) = {
            let mut rng = self.rng.lock();
            let pairing = pick_pairing(&roster, &self.settings, &mut *rng);
            (
                pairing,
                pick_match_type(&mut *rng),
                pick_time_control(&mut *rng),
            )
        };
        let pairing = pairing.ok_or(Error::Domain(DomainError::SamePersonality))?;
        debug!(white = %pairing.white, black = %pairing.black, kind = ?pairing.kind, "Pairing chosen");

        let new = match start {
            None => NewMatch::immediate(pairing.white, pairing.black, match_type, time_control, now),
            Some(at) => NewMatch::scheduled(pairing.white, pairing.black, match_type, time_control, at),
        };
        self.insert(new).await
    }

    /// Create a match between two given personalities.
    pub async fn create_between(
        &self,
        white: PersonalityId,
        black: PersonalityId,
        now: DateTime<Utc>,
        start: Option<DateTime<Utc>>,
    ) -> Result<Match> {
        if white == black {
            return Err(DomainError::SamePersonality.into());
        }
        for id in [white, black] {
            if self.ctx.registry.get(id).is_none() {
                return Err(Error::UnknownPersonality(id));
            }
        }
        let (match_type, time_control) = {
            let mut rng = self.rng.lock();
            (pick_match_type(&mut *rng), pick_time_control(&mut *rng))
        };
        let new = match start {
            None => NewMatch::immediate(white, black, match_type, time_control, now),
            Some(at) => NewMatch::scheduled(white, black, match_type, time_control, at),
        };
        self.insert(new).await
    }

    async fn insert(&self, new: NewMatch) -> Result<Match> {
        let m = self.ctx.store.insert_match(new).await?;
        let event = MatchEvent::from(&m);
        if m.status() == MatchStatus::InProgress {
            self.ctx.emit(ArenaEvent::MatchStarted(event));
        } else {
            self.ctx.emit(ArenaEvent::MatchCreated(event));
        }
        Ok(m)
    }

    fn random_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let max = self.settings.schedule_max_minutes.clamp(0, MAX_SCHEDULE_MINUTES) * 60;
        let min = self.settings.schedule_min_minutes.clamp(0, MAX_SCHEDULE_MINUTES) * 60;
        let secs = self.rng.lock().gen_range(min.min(max)..=max);
        now + Duration::seconds(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::personality::{builtin_roster, SearchBudget, StyleTag};
    use rand::SeedableRng;

    fn personality(id: u32, rating: u32, style: StyleTag) -> Personality {
        Personality {
            id: PersonalityId::new(id),
            name: format!("P{id}"),
            rating,
            style,
            openings: vec![],
            budget: SearchBudget::default(),
        }
    }

    #[test]
    fn pairings_never_repeat_a_personality() {
        let roster = builtin_roster();
        let settings = MatchmakingSettings::default();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..500 {
            let pairing = pick_pairing(&roster, &settings, &mut rng).unwrap();
            assert_ne!(pairing.white, pairing.black);
        }
    }

    #[test]
    fn balanced_pairings_respect_gap_and_style() {
        let roster = builtin_roster();
        let by_id = |id| roster.iter().find(|p| p.id == id).unwrap();
        let settings = MatchmakingSettings::default();
        let mut rng = StdRng::seed_from_u64(5);

        let mut balanced = 0;
        for _ in 0..1000 {
            let pairing = pick_pairing(&roster, &settings, &mut rng).unwrap();
            let (w, b) = (by_id(pairing.white), by_id(pairing.black));
            match pairing.kind {
                PairingKind::Balanced => {
                    balanced += 1;
                    assert!(w.rating_gap(b) <= 200);
                    assert_ne!(w.style, b.style);
                }
                PairingKind::Mismatch => {
                    assert!(w.rating_gap(b) > 200 && w.rating_gap(b) < 500);
                }
                PairingKind::Random => {}
            }
        }
        assert!((600..=800).contains(&balanced), "balanced = {balanced}");
    }

    #[test]
    fn falls_back_to_random_pair() {
        // Same style, huge gap: neither balanced nor mismatch.
        let roster = vec![
            personality(1, 1000, StyleTag::Mixed),
            personality(2, 2800, StyleTag::Mixed),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let pairing = pick_pairing(&roster, &MatchmakingSettings::default(), &mut rng).unwrap();
        assert_eq!(pairing.kind, PairingKind::Random);
    }

    #[test]
    fn mismatch_only_roster() {
        let roster = vec![
            personality(1, 2000, StyleTag::Aggressive),
            personality(2, 2300, StyleTag::Defensive),
        ];
        let settings = MatchmakingSettings {
            balanced_probability: 0.0,
            ..MatchmakingSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let pairing = pick_pairing(&roster, &settings, &mut rng).unwrap();
        assert_eq!(pairing.kind, PairingKind::Mismatch);
    }

    #[test]
    fn colors_are_assigned_both_ways() {
        let roster = vec![
            personality(1, 2000, StyleTag::Aggressive),
            personality(2, 2100, StyleTag::Defensive),
        ];
        let mut rng = StdRng::seed_from_u64(8);
        let whites: Vec<PersonalityId> = (0..100)
            .map(|_| {
                pick_pairing(&roster, &MatchmakingSettings::default(), &mut rng)
                    .unwrap()
                    .white
            })
            .collect();
        assert!(whites.contains(&PersonalityId::new(1)));
        assert!(whites.contains(&PersonalityId::new(2)));
    }

    #[test]
    fn single_personality_cannot_pair() {
        let roster = vec![personality(1, 2000, StyleTag::Mixed)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_pairing(&roster, &MatchmakingSettings::default(), &mut rng).is_none());
    }

    #[test]
    fn match_type_weights_favor_regular() {
        let mut rng = StdRng::seed_from_u64(3);
        let regular = (0..2000)
            .filter(|_| pick_match_type(&mut rng) == MatchType::Regular)
            .count();
        assert!((1300..=1500).contains(&regular), "regular = {regular}");
    }

    #[test]
    fn start_offset_is_capped() {
        use std::sync::Arc;

        use crate::adapter::outbound::memory::MemoryStore;
        use crate::domain::personality::PersonalityRegistry;
        use crate::port::outbound::notifier::NotifierRegistry;

        let ctx = ArenaContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(PersonalityRegistry::builtin()),
            Arc::new(NotifierRegistry::new()),
        );
        let settings = MatchmakingSettings {
            schedule_min_minutes: i64::MAX,
            schedule_max_minutes: i64::MAX,
            ..MatchmakingSettings::default()
        };
        let matchmaker = Matchmaker::new(ctx, settings, StdRng::seed_from_u64(2));

        let now = Utc::now();
        let start = matchmaker.random_start(now);
        assert_eq!(start - now, Duration::minutes(MAX_SCHEDULE_MINUTES));
    }

    #[test]
    fn time_controls_come_from_fixed_set() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(TIME_CONTROLS.contains(&pick_time_control(&mut rng)));
        }
    }
}
