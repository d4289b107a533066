//! Move selection policies. Every policy sees the same inputs: the acting
//! combatant, its opponent and the moves that still have uses left.

pub use crate::battle::expected_damage;
use crate::model::{Combatant, Move};
use crate::moves::DEFAULT_MOVE;
use crate::types::effectiveness;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repertoire slot that can still be used.
#[derive(Debug, Clone, Copy)]
pub struct UsableMove<'a> {
    pub slot: usize,
    pub mv: &'a Move,
    pub remaining: u32,
}

/// The move chosen for a turn. `slot` is `None` for the default move.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub slot: Option<usize>,
    pub mv: &'a Move,
}

pub trait MoveSelector: Send + Sync {
    /// Index into `usable`, which is never empty when this is called.
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        rng: &mut SmallRng,
    ) -> usize;
}

/// Resolves a selector's choice, falling back to the default move when no
/// slot has uses left.
pub fn select_move<'a>(
    selector: &dyn MoveSelector,
    attacker: &Combatant,
    defender: &Combatant,
    usable: &[UsableMove<'a>],
    rng: &mut SmallRng,
) -> Selection<'a> {
    let Some(first) = usable.first() else {
        return Selection {
            slot: None,
            mv: &DEFAULT_MOVE,
        };
    };
    let idx = selector.pick(attacker, defender, usable, rng);
    let chosen = usable.get(idx).unwrap_or(first);
    Selection {
        slot: Some(chosen.slot),
        mv: chosen.mv,
    }
}

// First index with the highest score; entries scored `None` are skipped.
fn best_index<F>(usable: &[UsableMove<'_>], mut score: F) -> Option<usize>
where
    F: FnMut(&UsableMove<'_>) -> Option<f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in usable.iter().enumerate() {
        let Some(value) = score(candidate) else {
            continue;
        };
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChoice;

impl MoveSelector for RandomChoice {
    fn pick(
        &self,
        _attacker: &Combatant,
        _defender: &Combatant,
        usable: &[UsableMove<'_>],
        rng: &mut SmallRng,
    ) -> usize {
        rng.gen_range(0..usable.len())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HighestDamage;

impl MoveSelector for HighestDamage {
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        _rng: &mut SmallRng,
    ) -> usize {
        best_index(usable, |u| {
            (!u.mv.is_status()).then(|| expected_damage(attacker, defender, u.mv))
        })
        .unwrap_or(0)
    }
}

/// Best multiplier wins; ties go to the higher expected damage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeEffective;

impl MoveSelector for TypeEffective {
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        _rng: &mut SmallRng,
    ) -> usize {
        let top = usable
            .iter()
            .filter(|u| !u.mv.is_status())
            .map(|u| effectiveness(u.mv.move_type(), defender.types()))
            .fold(f64::NEG_INFINITY, f64::max);
        best_index(usable, |u| {
            let hits_hardest =
                !u.mv.is_status() && effectiveness(u.mv.move_type(), defender.types()) == top;
            hits_hardest.then(|| expected_damage(attacker, defender, u.mv))
        })
        .unwrap_or(0)
    }
}

/// Sets up with a status move unless a super-effective attack is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFirst;

impl MoveSelector for StatusFirst {
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        rng: &mut SmallRng,
    ) -> usize {
        let favored = usable.iter().any(|u| {
            !u.mv.is_status() && effectiveness(u.mv.move_type(), defender.types()) >= 2.0
        });
        if !favored {
            let status = best_index(usable, |u| {
                u.mv.is_status().then(|| match u.mv.accuracy() {
                    0 => 100.0,
                    acc => acc as f64,
                })
            });
            if let Some(idx) = status {
                return idx;
            }
        }
        TypeEffective.pick(attacker, defender, usable, rng)
    }
}

/// Weighted mix of normalized expected damage, multiplier, accuracy and
/// remaining-use ratio.
#[derive(Debug, Clone, Copy)]
pub struct Balanced {
    pub damage: f64,
    pub effectiveness: f64,
    pub accuracy: f64,
    pub uses: f64,
}

impl Balanced {
    pub const DEFAULT: Balanced = Balanced {
        damage: 0.4,
        effectiveness: 0.3,
        accuracy: 0.2,
        uses: 0.1,
    };

    pub fn score(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        u: &UsableMove<'_>,
        max_expected: f64,
    ) -> f64 {
        let damage = if max_expected > 0.0 {
            expected_damage(attacker, defender, u.mv) / max_expected
        } else {
            0.0
        };
        let multiplier = if u.mv.is_status() {
            0.0
        } else {
            effectiveness(u.mv.move_type(), defender.types())
        };
        let accuracy = match u.mv.accuracy() {
            0 => 1.0,
            acc => acc as f64 / 100.0,
        };
        let uses = u.remaining as f64 / u.mv.max_uses().max(1) as f64;
        damage * self.damage
            + multiplier * self.effectiveness
            + accuracy * self.accuracy
            + uses * self.uses
    }
}

impl Default for Balanced {
    fn default() -> Self {
        Balanced::DEFAULT
    }
}

impl MoveSelector for Balanced {
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        _rng: &mut SmallRng,
    ) -> usize {
        let max_expected = usable
            .iter()
            .map(|u| expected_damage(attacker, defender, u.mv))
            .fold(0.0, f64::max);
        best_index(usable, |u| Some(self.score(attacker, defender, u, max_expected))).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStrategy {
    Random,
    HighestDamage,
    TypeEffective,
    StatusFirst,
    Balanced,
}

static RANDOM: RandomChoice = RandomChoice;
static HIGHEST_DAMAGE: HighestDamage = HighestDamage;
static TYPE_EFFECTIVE: TypeEffective = TypeEffective;
static STATUS_FIRST: StatusFirst = StatusFirst;
static BALANCED: Balanced = Balanced::DEFAULT;

impl MoveStrategy {
    pub const ALL: [MoveStrategy; 5] = [
        MoveStrategy::Random,
        MoveStrategy::HighestDamage,
        MoveStrategy::TypeEffective,
        MoveStrategy::StatusFirst,
        MoveStrategy::Balanced,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveStrategy::Random => "random",
            MoveStrategy::HighestDamage => "highest_damage",
            MoveStrategy::TypeEffective => "type_effective",
            MoveStrategy::StatusFirst => "status_first",
            MoveStrategy::Balanced => "balanced",
        }
    }

    pub fn selector(self) -> &'static dyn MoveSelector {
        match self {
            MoveStrategy::Random => &RANDOM,
            MoveStrategy::HighestDamage => &HIGHEST_DAMAGE,
            MoveStrategy::TypeEffective => &TYPE_EFFECTIVE,
            MoveStrategy::StatusFirst => &STATUS_FIRST,
            MoveStrategy::Balanced => &BALANCED,
        }
    }

    pub fn select<'a>(
        self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'a>],
        rng: &mut SmallRng,
    ) -> Selection<'a> {
        select_move(self.selector(), attacker, defender, usable, rng)
    }
}

impl MoveSelector for MoveStrategy {
    fn pick(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        usable: &[UsableMove<'_>],
        rng: &mut SmallRng,
    ) -> usize {
        self.selector().pick(attacker, defender, usable, rng)
    }
}

impl fmt::Display for MoveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        MoveStrategy::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown strategy {s} (use random, highest_damage, type_effective, status_first or balanced)"
                )
            })
    }
}
