use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const MAX_MOVES: usize = 4;
pub const MAX_TEAM_SIZE: usize = 6;
pub const MAX_LEVEL: u8 = 100;
pub const MAX_BASE_STAT: u32 = 255;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAttack,
        Stat::SpDefense,
        Stat::Speed,
    ];
}

/// Base values of a species. Effective values depend on the level.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl Stats {
    pub const fn new(
        hp: u32,
        attack: u32,
        defense: u32,
        sp_attack: u32,
        sp_defense: u32,
        speed: u32,
    ) -> Self {
        Stats {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpAttack => self.sp_attack,
            Stat::SpDefense => self.sp_defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn total(&self) -> u32 {
        Stat::ALL.iter().map(|&s| self.get(s)).sum()
    }

    /// Effective stat with a fixed IV of 31 and no EVs or nature.
    /// Saturates instead of overflowing for base values past [`MAX_BASE_STAT`].
    pub fn at_level(&self, stat: Stat, level: u8) -> u32 {
        let level = level as u64;
        let scaled = (self.get(stat) as u64 * 2 + 31) * level / 100;
        let value = match stat {
            Stat::Hp => scaled + level + 10,
            _ => scaled + 5,
        };
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    #[default]
    Enemy,
    User,
    AllEnemies,
    AllAllies,
    Everyone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    pub(crate) name: Cow<'static, str>,
    pub(crate) move_type: Type,
    pub(crate) category: MoveCategory,
    pub(crate) power: u32,
    pub(crate) accuracy: u32,
    pub(crate) max_uses: u32,
    pub(crate) priority: i32,
    pub(crate) target: MoveTarget,
}

impl Move {
    /// Builds a validated move. Accuracy 0 means the move never misses.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        move_type: Type,
        category: MoveCategory,
        power: u32,
        accuracy: u32,
        max_uses: u32,
    ) -> anyhow::Result<Move> {
        let name = name.into();
        if name.trim().is_empty() {
            anyhow::bail!("Move name must not be empty");
        }
        if accuracy > 100 {
            anyhow::bail!("Move {name}: accuracy {accuracy} exceeds 100");
        }
        if max_uses == 0 {
            anyhow::bail!("Move {name}: max uses must be > 0");
        }
        if category == MoveCategory::Status && power != 0 {
            anyhow::bail!("Move {name}: status moves must have power 0, got {power}");
        }
        Ok(Move {
            name,
            move_type,
            category,
            power,
            accuracy,
            max_uses,
            priority: 0,
            target: MoveTarget::Enemy,
        })
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn move_type(&self) -> Type {
        self.move_type
    }

    pub fn category(&self) -> MoveCategory {
        self.category
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn max_uses(&self) -> u32 {
        self.max_uses
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }
}

/// Up to four moves, fixed once built. Remaining uses live in [`MoveUses`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repertoire {
    moves: Vec<Move>,
}

impl Repertoire {
    pub fn new(moves: Vec<Move>) -> anyhow::Result<Repertoire> {
        if moves.len() > MAX_MOVES {
            anyhow::bail!(
                "A repertoire holds at most {MAX_MOVES} moves, got {}",
                moves.len()
            );
        }
        Ok(Repertoire { moves })
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn fresh_uses(&self) -> MoveUses {
        let mut remaining = [0u32; MAX_MOVES];
        for (slot, mv) in self.moves.iter().enumerate() {
            remaining[slot] = mv.max_uses;
        }
        MoveUses { remaining }
    }
}

/// Remaining-use counters parallel to a [`Repertoire`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MoveUses {
    remaining: [u32; MAX_MOVES],
}

impl MoveUses {
    pub fn remaining(&self, slot: usize) -> u32 {
        self.remaining.get(slot).copied().unwrap_or(0)
    }

    /// Spends one use of `slot`. Returns false when nothing was left.
    pub fn spend(&mut self, slot: usize) -> bool {
        match self.remaining.get_mut(slot) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn restore(&mut self, repertoire: &Repertoire) {
        *self = repertoire.fresh_uses();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    name: String,
    id: u32,
    types: Vec<Type>,
    stats: Stats,
    level: u8,
    repertoire: Repertoire,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        id: u32,
        types: &[Type],
        stats: Stats,
        level: u8,
    ) -> anyhow::Result<Combatant> {
        let name = name.into();
        if types.is_empty() || types.len() > 2 {
            anyhow::bail!("{name}: expected one or two types, got {}", types.len());
        }
        if types.len() == 2 && types[0] == types[1] {
            anyhow::bail!("{name}: duplicate type {}", types[0]);
        }
        if level == 0 || level > MAX_LEVEL {
            anyhow::bail!("{name}: level {level} outside 1..={MAX_LEVEL}");
        }
        if let Some(stat) = Stat::ALL.into_iter().find(|&s| stats.get(s) > MAX_BASE_STAT) {
            anyhow::bail!(
                "{name}: base {stat:?} {} exceeds {MAX_BASE_STAT}",
                stats.get(stat)
            );
        }
        Ok(Combatant {
            name,
            id,
            types: types.to_vec(),
            stats,
            level,
            repertoire: Repertoire::default(),
        })
    }

    pub fn with_repertoire(mut self, repertoire: Repertoire) -> Self {
        self.repertoire = repertoire;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Levels outside 1..=100 are clamped into range.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(1, MAX_LEVEL);
    }

    pub fn repertoire(&self) -> &Repertoire {
        &self.repertoire
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.at_level(stat, self.level)
    }

    pub fn max_hp(&self) -> u32 {
        self.stat(Stat::Hp)
    }

    pub fn attack(&self) -> u32 {
        self.stat(Stat::Attack)
    }

    pub fn defense(&self) -> u32 {
        self.stat(Stat::Defense)
    }

    pub fn sp_attack(&self) -> u32 {
        self.stat(Stat::SpAttack)
    }

    pub fn sp_defense(&self) -> u32 {
        self.stat(Stat::SpDefense)
    }

    pub fn speed(&self) -> u32 {
        self.stat(Stat::Speed)
    }

    pub fn type_label(&self) -> String {
        self.types
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Lv.{}) - {}", self.name, self.level, self.type_label())
    }
}

/// Ordered roster of at most six combatants. Battle state (health, active
/// slot) is kept by the engine, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    members: Vec<Combatant>,
}

impl Team {
    pub fn new(members: Vec<Combatant>) -> anyhow::Result<Team> {
        if members.len() > MAX_TEAM_SIZE {
            anyhow::bail!(
                "A team holds at most {MAX_TEAM_SIZE} members, got {}",
                members.len()
            );
        }
        Ok(Team { members })
    }

    /// Keeps the first six members and drops the rest.
    pub fn truncated(mut members: Vec<Combatant>) -> Team {
        members.truncate(MAX_TEAM_SIZE);
        Team { members }
    }

    pub fn members(&self) -> &[Combatant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combatant> {
        self.members.iter()
    }

    pub fn set_level(&mut self, level: u8) {
        for member in &mut self.members {
            member.set_level(level);
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }
}

fn default_level() -> u8 {
    50
}

fn default_accuracy() -> u32 {
    100
}

fn default_uses() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolFile {
    pub pokemon: Vec<CombatantRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombatantRecord {
    pub name: String,
    pub id: u32,
    pub types: Vec<Type>,
    pub stats: Stats,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub moves: Option<Vec<MoveRecord>>,
}

/// Either a catalog name or a full inline definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MoveRecord {
    Named(String),
    Inline(InlineMove),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineMove {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: Type,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: u32,
    #[serde(default = "default_uses")]
    pub uses: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub target: MoveTarget,
}

impl MoveRecord {
    pub fn into_move(self) -> anyhow::Result<Move> {
        match self {
            MoveRecord::Named(name) => crate::moves::resolve(&name),
            MoveRecord::Inline(m) => Ok(Move::new(
                m.name,
                m.move_type,
                m.category,
                m.power,
                m.accuracy,
                m.uses,
            )?
            .with_priority(m.priority)
            .with_target(m.target)),
        }
    }
}

impl CombatantRecord {
    /// Explicit moves win, then the species preset, then the type default.
    pub fn into_combatant(self) -> anyhow::Result<Combatant> {
        let combatant = Combatant::new(&self.name, self.id, &self.types, self.stats, self.level)?;
        let repertoire = match self.moves {
            Some(moves) if !moves.is_empty() => Repertoire::new(
                moves
                    .into_iter()
                    .map(MoveRecord::into_move)
                    .collect::<anyhow::Result<Vec<_>>>()?,
            )?,
            _ => match crate::moves::preset_repertoire(&self.name)? {
                Some(preset) => preset,
                None => crate::moves::default_repertoire(self.types[0])?,
            },
        };
        Ok(combatant.with_repertoire(repertoire))
    }
}
