use crate::model::{Combatant, Move, MoveCategory, MoveUses, Team};
use crate::strategy::{select_move, MoveStrategy, Selection, UsableMove};
use crate::types::effectiveness;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_MAX_TURNS: u32 = 100;
const BASE_CRIT_PERCENT: f64 = 6.25;
const MEAN_VARIATION: f64 = 0.925;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// Result from the point of view of the first team (or first battler).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BattleOptions {
    /// Caps the rounds of one engagement and the engagements of a team match.
    pub max_turns: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        BattleOptions {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Per-match state of one combatant. The template is never mutated.
#[derive(Debug, Clone)]
pub struct Battler<'a> {
    combatant: &'a Combatant,
    current_hp: u32,
    uses: MoveUses,
}

impl<'a> Battler<'a> {
    pub fn new(combatant: &'a Combatant) -> Self {
        Battler {
            combatant,
            current_hp: combatant.max_hp(),
            uses: combatant.repertoire().fresh_uses(),
        }
    }

    pub fn combatant(&self) -> &'a Combatant {
        self.combatant
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn remaining_uses(&self, slot: usize) -> u32 {
        self.uses.remaining(slot)
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    pub fn restore(&mut self) {
        self.current_hp = self.combatant.max_hp();
        self.uses.restore(self.combatant.repertoire());
    }

    pub fn usable_moves(&self) -> Vec<UsableMove<'a>> {
        let combatant = self.combatant;
        combatant
            .repertoire()
            .moves()
            .iter()
            .enumerate()
            .filter_map(|(slot, mv)| {
                let remaining = self.uses.remaining(slot);
                (remaining > 0).then_some(UsableMove { slot, mv, remaining })
            })
            .collect()
    }

    fn spend(&mut self, selection: &Selection<'_>) {
        if let Some(slot) = selection.slot {
            self.uses.spend(slot);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleTurn<'a> {
    pub turn: u32,
    pub side: Side,
    pub attacker: &'a str,
    pub defender: &'a str,
    pub move_name: &'a str,
    pub hit: bool,
    pub damage: u32,
    pub critical: bool,
    pub effectiveness: f64,
    pub attacker_fainted: bool,
    pub defender_fainted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleLog<'a> {
    pub turns: Vec<BattleTurn<'a>>,
    pub outcome: Outcome,
    /// Rounds played across every engagement.
    pub total_turns: u32,
    /// One-on-one engagements fought; 1 for a single `run_match`.
    pub engagements: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    pub battles: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,
    pub avg_turns: f64,
}

/// Unscaled damage before type, critical and random modifiers.
pub fn base_damage(attacker: &Combatant, defender: &Combatant, mv: &Move) -> f64 {
    let (attack, defense) = match mv.category() {
        MoveCategory::Physical => (attacker.attack(), defender.defense()),
        MoveCategory::Special => (attacker.sp_attack(), defender.sp_defense()),
        MoveCategory::Status => return 0.0,
    };
    let defense = defense.max(1) as f64;
    let level = attacker.level() as f64;
    ((2.0 * level + 10.0) * mv.power() as f64 * attack as f64 / defense / 50.0) + 2.0
}

/// Probability in [0, 1] that a hit is critical; faster attackers crit more.
pub fn critical_chance(attacker: &Combatant) -> f64 {
    let speed_bonus = (attacker.speed() as f64 / 512.0).min(1.0);
    BASE_CRIT_PERCENT * (1.0 + speed_bonus) / 100.0
}

pub fn damage(
    attacker: &Combatant,
    defender: &Combatant,
    mv: &Move,
    critical: bool,
    rng: &mut SmallRng,
) -> u32 {
    if mv.category() == MoveCategory::Status {
        return 0;
    }
    let type_mod = effectiveness(mv.move_type(), defender.types());
    let crit_mod = if critical { 2.0 } else { 1.0 };
    let variation = rng.gen_range(0.85..=1.0);
    let raw = (base_damage(attacker, defender, mv) * type_mod * crit_mod * variation).floor();
    let cap = defender.max_hp().saturating_mul(4).max(1) as f64;
    raw.clamp(1.0, cap) as u32
}

/// Damage with the mean variation and crit-weighted multiplier instead of rolls.
pub fn expected_damage(attacker: &Combatant, defender: &Combatant, mv: &Move) -> f64 {
    if mv.category() == MoveCategory::Status {
        return 0.0;
    }
    let type_mod = effectiveness(mv.move_type(), defender.types());
    let crit_mod = 1.0 + critical_chance(attacker);
    base_damage(attacker, defender, mv) * type_mod * crit_mod * MEAN_VARIATION
}

pub fn is_critical(attacker: &Combatant, rng: &mut SmallRng) -> bool {
    rng.gen::<f64>() < critical_chance(attacker)
}

pub fn does_hit(mv: &Move, attacker: &Combatant, defender: &Combatant, rng: &mut SmallRng) -> bool {
    if mv.accuracy() == 0 {
        return true;
    }
    let total_speed = attacker.speed() as f64 + defender.speed() as f64;
    let speed_share = if total_speed > 0.0 {
        attacker.speed() as f64 / total_speed
    } else {
        0.5
    };
    let hit_rate = mv.accuracy() as f64 * (1.0 + (speed_share - 0.5) * 0.1);
    rng.gen::<f64>() * 100.0 < hit_rate
}

pub fn sample_accuracy_hits(
    mv: &Move,
    attacker: &Combatant,
    defender: &Combatant,
    seed: u64,
    trials: usize,
) -> usize {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..trials)
        .filter(|_| does_hit(mv, attacker, defender, &mut rng))
        .count()
}

/// Hit check, crit roll, damage and faint bookkeeping for one move use.
pub fn resolve_turn<'a>(
    attacker: &Battler<'a>,
    defender: &mut Battler<'a>,
    mv: &'a Move,
    turn: u32,
    side: Side,
    rng: &mut SmallRng,
) -> BattleTurn<'a> {
    let attacking = attacker.combatant();
    let defending = defender.combatant();
    if !does_hit(mv, attacking, defending, rng) {
        return BattleTurn {
            turn,
            side,
            attacker: attacking.name(),
            defender: defending.name(),
            move_name: mv.name(),
            hit: false,
            damage: 0,
            critical: false,
            effectiveness: 1.0,
            attacker_fainted: attacker.is_fainted(),
            defender_fainted: defender.is_fainted(),
        };
    }
    let critical = mv.category() != MoveCategory::Status && is_critical(attacking, rng);
    let dealt = damage(attacking, defending, mv, critical, rng);
    defender.take_damage(dealt);
    BattleTurn {
        turn,
        side,
        attacker: attacking.name(),
        defender: defending.name(),
        move_name: mv.name(),
        hit: true,
        damage: dealt,
        critical,
        effectiveness: effectiveness(mv.move_type(), defending.types()),
        attacker_fainted: attacker.is_fainted(),
        defender_fainted: defender.is_fainted(),
    }
}

/// A team's members during one match plus the active slot.
struct Lineup<'a> {
    members: Vec<Battler<'a>>,
    active: usize,
}

impl<'a> Lineup<'a> {
    fn new(team: &'a Team) -> Self {
        Lineup {
            members: team.iter().map(Battler::new).collect(),
            active: 0,
        }
    }

    fn is_defeated(&self) -> bool {
        self.members.iter().all(Battler::is_fainted)
    }

    fn active_mut(&mut self) -> &mut Battler<'a> {
        &mut self.members[self.active]
    }

    /// Moves to the next conscious member after the active one, wrapping to
    /// the first conscious member.
    fn auto_switch(&mut self) {
        if !self.members[self.active].is_fainted() {
            return;
        }
        let after = (self.active + 1..self.members.len()).find(|&i| !self.members[i].is_fainted());
        let next = after.or_else(|| self.members.iter().position(|b| !b.is_fainted()));
        if let Some(idx) = next {
            self.active = idx;
        }
    }
}

struct Recorder<'a> {
    enabled: bool,
    turns: Vec<BattleTurn<'a>>,
}

impl<'a> Recorder<'a> {
    fn new(enabled: bool) -> Self {
        Recorder {
            enabled,
            turns: Vec::new(),
        }
    }

    fn push(&mut self, turn: BattleTurn<'a>) {
        if self.enabled {
            self.turns.push(turn);
        }
    }
}

#[derive(Debug, Clone)]
pub struct BattleEngine {
    options: BattleOptions,
    strategies: [MoveStrategy; 2],
}

impl BattleEngine {
    pub fn new(options: BattleOptions) -> Self {
        BattleEngine {
            options,
            strategies: [MoveStrategy::Random, MoveStrategy::Random],
        }
    }

    pub fn with_strategies(mut self, one: MoveStrategy, two: MoveStrategy) -> Self {
        self.strategies = [one, two];
        self
    }

    pub fn options(&self) -> &BattleOptions {
        &self.options
    }

    pub fn strategy(&self, side: Side) -> MoveStrategy {
        self.strategies[side.index()]
    }

    /// One-on-one fight until a faint or the turn cap. Health carries over
    /// from whatever state the battlers are in.
    pub fn run_match<'a>(
        &self,
        one: &mut Battler<'a>,
        two: &mut Battler<'a>,
        rng: &mut SmallRng,
    ) -> BattleLog<'a> {
        let mut recorder = Recorder::new(true);
        let rounds = self.engage(one, two, 0, rng, &mut recorder);
        let outcome = match (one.is_fainted(), two.is_fainted()) {
            (false, true) => Outcome::Win,
            (true, false) => Outcome::Loss,
            _ => Outcome::Draw,
        };
        BattleLog {
            turns: recorder.turns,
            outcome,
            total_turns: rounds,
            engagements: 1,
        }
    }

    /// Full match between fresh copies of both teams.
    pub fn run_team_match<'a>(
        &self,
        team1: &'a Team,
        team2: &'a Team,
        rng: &mut SmallRng,
    ) -> BattleLog<'a> {
        self.play(team1, team2, rng, true)
    }

    pub fn simulate(&self, team1: &Team, team2: &Team, n: usize, seed: u64) -> SimulationStats {
        if n == 0 {
            return SimulationStats::default();
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut draws = 0usize;
        let mut turns = 0u64;
        for _ in 0..n {
            let log = self.play(team1, team2, &mut rng, false);
            match log.outcome {
                Outcome::Win => wins += 1,
                Outcome::Loss => losses += 1,
                Outcome::Draw => draws += 1,
            }
            turns += log.total_turns as u64;
        }
        let total = n as f64;
        SimulationStats {
            battles: n,
            win_rate: wins as f64 / total,
            loss_rate: losses as f64 / total,
            draw_rate: draws as f64 / total,
            avg_turns: turns as f64 / total,
        }
    }

    fn play<'a>(
        &self,
        team1: &'a Team,
        team2: &'a Team,
        rng: &mut SmallRng,
        record: bool,
    ) -> BattleLog<'a> {
        let mut one = Lineup::new(team1);
        let mut two = Lineup::new(team2);
        let mut recorder = Recorder::new(record);
        let mut total_turns = 0u32;
        let mut engagements = 0u32;
        while !one.is_defeated() && !two.is_defeated() && engagements < self.options.max_turns {
            engagements += 1;
            let (a, b) = (one.active_mut(), two.active_mut());
            total_turns += self.engage(a, b, total_turns, rng, &mut recorder);
            one.auto_switch();
            two.auto_switch();
        }
        let outcome = match (one.is_defeated(), two.is_defeated()) {
            (true, false) => Outcome::Loss,
            (false, true) => Outcome::Win,
            _ => Outcome::Draw,
        };
        BattleLog {
            turns: recorder.turns,
            outcome,
            total_turns,
            engagements,
        }
    }

    /// Rounds until one battler faints or the cap is hit. Returns the rounds played.
    fn engage<'a>(
        &self,
        one: &mut Battler<'a>,
        two: &mut Battler<'a>,
        turn_offset: u32,
        rng: &mut SmallRng,
        recorder: &mut Recorder<'a>,
    ) -> u32 {
        let mut rounds = 0u32;
        while !one.is_fainted() && !two.is_fainted() && rounds < self.options.max_turns {
            rounds += 1;
            let turn = turn_offset + rounds;
            let choice_one = self.choose(Side::One, one, two, rng);
            let choice_two = self.choose(Side::Two, two, one, rng);
            if acts_first(one, &choice_one, two, &choice_two, rng) {
                recorder.push(act(one, two, &choice_one, turn, Side::One, rng));
                if !two.is_fainted() {
                    recorder.push(act(two, one, &choice_two, turn, Side::Two, rng));
                }
            } else {
                recorder.push(act(two, one, &choice_two, turn, Side::Two, rng));
                if !one.is_fainted() {
                    recorder.push(act(one, two, &choice_one, turn, Side::One, rng));
                }
            }
        }
        rounds
    }

    fn choose<'a>(
        &self,
        side: Side,
        me: &Battler<'a>,
        foe: &Battler<'a>,
        rng: &mut SmallRng,
    ) -> Selection<'a> {
        let usable = me.usable_moves();
        select_move(
            &self.strategy(side),
            me.combatant(),
            foe.combatant(),
            &usable,
            rng,
        )
    }
}

fn act<'a>(
    attacker: &mut Battler<'a>,
    defender: &mut Battler<'a>,
    selection: &Selection<'a>,
    turn: u32,
    side: Side,
    rng: &mut SmallRng,
) -> BattleTurn<'a> {
    attacker.spend(selection);
    resolve_turn(attacker, defender, selection.mv, turn, side, rng)
}

/// Priority first, then speed, then a fair coin.
fn acts_first(
    one: &Battler<'_>,
    choice_one: &Selection<'_>,
    two: &Battler<'_>,
    choice_two: &Selection<'_>,
    rng: &mut SmallRng,
) -> bool {
    let order = choice_one
        .mv
        .priority()
        .cmp(&choice_two.mv.priority())
        .then_with(|| one.combatant().speed().cmp(&two.combatant().speed()));
    match order {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => rng.gen_bool(0.5),
    }
}

/// Derives an independent stream seed from a base seed and two indices.
pub fn derive_seed(seed: u64, a: u64, b: u64) -> u64 {
    let mut z = seed
        .wrapping_add(a.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(b.wrapping_mul(0xD1B5_4A32_D192_ED03));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
