//! Chess personalities and the static roster they are looked up from.
//!
//! A personality is an immutable agent profile: a name, an Elo-like rating,
//! a [`StyleTag`] that biases move selection, advisory opening preferences,
//! and a [`SearchBudget`] that shapes how long it appears to think.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::PersonalityId;

/// Playing style that biases which legal moves are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    Aggressive,
    Defensive,
    Positional,
    Tactical,
    Classical,
    Neural,
    Mixed,
}

impl StyleTag {
    /// All style tags.
    pub const ALL: [Self; 7] = [
        Self::Aggressive,
        Self::Defensive,
        Self::Positional,
        Self::Tactical,
        Self::Classical,
        Self::Neural,
        Self::Mixed,
    ];
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
            Self::Positional => "positional",
            Self::Tactical => "tactical",
            Self::Classical => "classical",
            Self::Neural => "neural",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Search-like knobs. No real search happens; these only shape pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Nominal search depth in plies.
    pub depth: u8,
    /// Nominal node budget per move.
    pub nodes: u32,
    /// Randomness temperature; scales timing jitter.
    pub temperature: f64,
}

impl SearchBudget {
    /// Node count that corresponds to a pace factor of 1.0.
    pub const REFERENCE_NODES: f64 = 250_000.0;

    /// Multiplier applied to the base thinking pause, in `[0.5, 2.0]`.
    #[must_use]
    pub fn pace_factor(&self) -> f64 {
        (f64::from(self.nodes) / Self::REFERENCE_NODES).clamp(0.5, 2.0)
    }

    /// Multiplier applied to timing jitter, in `[0.0, 2.0]`.
    #[must_use]
    pub fn jitter_factor(&self) -> f64 {
        if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 2.0)
        } else {
            1.0
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            depth: 3,
            nodes: 250_000,
            temperature: 1.0,
        }
    }
}

/// An immutable chess-agent profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub id: PersonalityId,
    pub name: String,
    /// Elo-like skill proxy.
    pub rating: u32,
    pub style: StyleTag,
    /// Advisory only; never enforced on the board.
    #[serde(default)]
    pub openings: Vec<String>,
    #[serde(default)]
    pub budget: SearchBudget,
}

impl Personality {
    /// Absolute rating difference between two personalities.
    #[must_use]
    pub fn rating_gap(&self, other: &Self) -> u32 {
        self.rating.abs_diff(other.rating)
    }
}

/// Static catalog of personalities keyed by id.
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct PersonalityRegistry {
    by_id: BTreeMap<PersonalityId, Personality>,
}

impl PersonalityRegistry {
    /// Build a registry from a list of personalities.
    ///
    /// Later entries with a duplicate id replace earlier ones; configuration
    /// validation rejects duplicates before this point.
    #[must_use]
    pub fn new(personalities: impl IntoIterator<Item = Personality>) -> Self {
        let by_id = personalities.into_iter().map(|p| (p.id, p)).collect();
        Self { by_id }
    }

    /// Registry holding the built-in roster.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_roster())
    }

    /// Look up a personality by id.
    #[must_use]
    pub fn get(&self, id: PersonalityId) -> Option<&Personality> {
        self.by_id.get(&id)
    }

    /// All personalities ordered by id.
    pub fn all(&self) -> impl Iterator<Item = &Personality> {
        self.by_id.values()
    }

    /// Number of registered personalities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn entry(
    id: u32,
    name: &str,
    rating: u32,
    style: StyleTag,
    openings: &[&str],
    budget: SearchBudget,
) -> Personality {
    Personality {
        id: PersonalityId::new(id),
        name: name.to_string(),
        rating,
        style,
        openings: openings.iter().map(|o| (*o).to_string()).collect(),
        budget,
    }
}

/// The default roster used when configuration does not supply one.
///
/// Covers every style tag, with ratings spread widely enough that both
/// balanced (gap <= 200) and mismatch (200 < gap < 500) pairings exist.
#[must_use]
pub fn builtin_roster() -> Vec<Personality> {
    vec![
        entry(
            1,
            "Blitzkrieg",
            2450,
            StyleTag::Aggressive,
            &["King's Gambit", "Sicilian Defense: Dragon"],
            SearchBudget { depth: 2, nodes: 150_000, temperature: 1.4 },
        ),
        entry(
            2,
            "Fortress",
            2380,
            StyleTag::Defensive,
            &["Caro-Kann Defense", "French Defense"],
            SearchBudget { depth: 4, nodes: 300_000, temperature: 0.6 },
        ),
        entry(
            3,
            "Architect",
            2520,
            StyleTag::Positional,
            &["Queen's Gambit Declined", "English Opening"],
            SearchBudget { depth: 5, nodes: 400_000, temperature: 0.5 },
        ),
        entry(
            4,
            "Razor",
            2470,
            StyleTag::Tactical,
            &["Scotch Game", "Evans Gambit"],
            SearchBudget { depth: 3, nodes: 220_000, temperature: 1.2 },
        ),
        entry(
            5,
            "Maestro",
            2640,
            StyleTag::Classical,
            &["Ruy Lopez", "Queen's Gambit"],
            SearchBudget { depth: 6, nodes: 500_000, temperature: 0.4 },
        ),
        entry(
            6,
            "Synapse",
            2700,
            StyleTag::Neural,
            &["Catalan Opening", "Grunfeld Defense"],
            SearchBudget { depth: 8, nodes: 800_000, temperature: 0.3 },
        ),
        entry(
            7,
            "Chameleon",
            2290,
            StyleTag::Mixed,
            &["Italian Game", "Pirc Defense"],
            SearchBudget { depth: 3, nodes: 180_000, temperature: 1.0 },
        ),
        entry(
            8,
            "Vanguard",
            2150,
            StyleTag::Aggressive,
            &["Danish Gambit"],
            SearchBudget { depth: 2, nodes: 100_000, temperature: 1.6 },
        ),
        entry(
            9,
            "Bastion",
            2580,
            StyleTag::Defensive,
            &["Berlin Defense", "Petrov Defense"],
            SearchBudget { depth: 5, nodes: 450_000, temperature: 0.5 },
        ),
    ]
}
