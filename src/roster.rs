//! Built-in data: the five scripted opponents and the default candidate pool.

use crate::fitness::Opponent;
use crate::model::{Combatant, Repertoire, Stats, Team};
use crate::moves::{default_repertoire, preset_repertoire, repertoire_of};
use crate::types::Type;
use crate::types::Type::*;

pub const POOL_LEVEL: u8 = 50;

struct Species {
    name: &'static str,
    id: u32,
    types: &'static [Type],
    stats: Stats,
}

const fn species(name: &'static str, id: u32, types: &'static [Type], stats: Stats) -> Species {
    Species {
        name,
        id,
        types,
        stats,
    }
}

/// Trainer movesets, shared by every member of the same kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kit {
    Ice,
    Psychic,
    Fighting,
    Rock,
    Ghost,
    Poison,
    Water,
    Dragon,
    Flying,
    Ground,
    Fire,
    Grass,
}

impl Kit {
    fn moves(self) -> &'static [&'static str] {
        match self {
            Kit::Ice => &["Ice Beam", "Surf", "Confusion", "Growl"],
            Kit::Psychic => &["Psychic", "Confusion", "Thunder Wave", "Agility"],
            Kit::Fighting => &["Tackle", "Quick Attack", "Swords Dance", "Leer"],
            Kit::Rock => &["Rock Slide", "Tackle", "Leer", "Growl"],
            Kit::Ghost => &["Confusion", "Tackle", "Toxic", "Growl"],
            Kit::Poison => &["Tackle", "Toxic", "Bite", "Growl"],
            Kit::Water => &["Surf", "Water Gun", "Tackle", "Growl"],
            Kit::Dragon => &["Dragon Claw", "Tackle", "Agility", "Leer"],
            Kit::Flying => &["Tackle", "Quick Attack", "Growl", "Leer"],
            Kit::Ground => &["Earthquake", "Tackle", "Leer", "Growl"],
            Kit::Fire => &["Flamethrower", "Ember", "Tackle", "Growl"],
            Kit::Grass => &["Solar Beam", "Vine Whip", "Confusion", "Sleep Powder"],
        }
    }
}

struct TrainerMon {
    species: Species,
    level: u8,
    kit: Kit,
}

const fn mon(species: Species, level: u8, kit: Kit) -> TrainerMon {
    TrainerMon {
        species,
        level,
        kit,
    }
}

const DEWGONG: Species = species("Dewgong", 87, &[Water, Ice], Stats::new(90, 70, 80, 70, 95, 70));
const CLOYSTER: Species = species("Cloyster", 91, &[Water, Ice], Stats::new(50, 95, 180, 85, 45, 70));
const SLOWBRO: Species = species("Slowbro", 80, &[Water, Psychic], Stats::new(95, 75, 110, 100, 80, 30));
const JYNX: Species = species("Jynx", 124, &[Ice, Psychic], Stats::new(65, 50, 35, 115, 95, 95));
const LAPRAS: Species = species("Lapras", 131, &[Water, Ice], Stats::new(130, 85, 80, 85, 95, 60));
const ONIX: Species = species("Onix", 95, &[Rock, Ground], Stats::new(35, 45, 160, 30, 45, 70));
const HITMONCHAN: Species = species("Hitmonchan", 107, &[Fighting], Stats::new(50, 105, 79, 35, 110, 76));
const HITMONLEE: Species = species("Hitmonlee", 106, &[Fighting], Stats::new(50, 120, 53, 35, 110, 87));
const MACHAMP: Species = species("Machamp", 68, &[Fighting], Stats::new(90, 130, 80, 65, 85, 55));
const GENGAR: Species = species("Gengar", 94, &[Ghost, Poison], Stats::new(60, 65, 60, 130, 75, 110));
const GOLBAT: Species = species("Golbat", 42, &[Poison, Flying], Stats::new(75, 80, 70, 65, 75, 90));
const HAUNTER: Species = species("Haunter", 93, &[Ghost, Poison], Stats::new(45, 50, 45, 115, 55, 95));
const ARBOK: Species = species("Arbok", 24, &[Poison], Stats::new(60, 95, 69, 65, 79, 80));
const GYARADOS: Species = species("Gyarados", 130, &[Water, Flying], Stats::new(95, 125, 79, 60, 100, 81));
const DRAGONAIR: Species = species("Dragonair", 148, &[Dragon], Stats::new(61, 84, 65, 70, 70, 70));
const AERODACTYL: Species = species("Aerodactyl", 142, &[Rock, Flying], Stats::new(80, 105, 65, 60, 75, 130));
const DRAGONITE: Species = species("Dragonite", 149, &[Dragon, Flying], Stats::new(91, 134, 95, 100, 100, 80));
const PIDGEOT: Species = species("Pidgeot", 18, &[Normal, Flying], Stats::new(83, 80, 75, 70, 70, 101));
const ALAKAZAM: Species = species("Alakazam", 65, &[Psychic], Stats::new(55, 50, 45, 135, 95, 120));
const RHYDON: Species = species("Rhydon", 112, &[Ground, Rock], Stats::new(105, 130, 120, 45, 45, 40));
const ARCANINE: Species = species("Arcanine", 59, &[Fire], Stats::new(90, 110, 80, 100, 80, 95));
const EXEGGUTOR: Species = species("Exeggutor", 103, &[Grass, Psychic], Stats::new(95, 95, 85, 125, 75, 55));
const BLASTOISE: Species = species("Blastoise", 9, &[Water], Stats::new(79, 83, 100, 85, 105, 78));

struct Trainer {
    name: &'static str,
    specialty: Option<Type>,
    team: [TrainerMon; 5],
}

const TRAINERS: [Trainer; 4] = [
    Trainer {
        name: "Lorelei",
        specialty: Some(Ice),
        team: [
            mon(DEWGONG, 54, Kit::Ice),
            mon(CLOYSTER, 53, Kit::Ice),
            mon(SLOWBRO, 54, Kit::Psychic),
            mon(JYNX, 56, Kit::Psychic),
            mon(LAPRAS, 56, Kit::Ice),
        ],
    },
    Trainer {
        name: "Bruno",
        specialty: Some(Fighting),
        team: [
            mon(ONIX, 53, Kit::Rock),
            mon(HITMONCHAN, 55, Kit::Fighting),
            mon(HITMONLEE, 55, Kit::Fighting),
            mon(ONIX, 56, Kit::Rock),
            mon(MACHAMP, 58, Kit::Fighting),
        ],
    },
    Trainer {
        name: "Agatha",
        specialty: Some(Ghost),
        team: [
            mon(GENGAR, 56, Kit::Ghost),
            mon(GOLBAT, 56, Kit::Poison),
            mon(HAUNTER, 55, Kit::Ghost),
            mon(ARBOK, 58, Kit::Poison),
            mon(GENGAR, 60, Kit::Ghost),
        ],
    },
    Trainer {
        name: "Lance",
        specialty: Some(Dragon),
        team: [
            mon(GYARADOS, 58, Kit::Water),
            mon(DRAGONAIR, 56, Kit::Dragon),
            mon(DRAGONAIR, 54, Kit::Dragon),
            mon(AERODACTYL, 58, Kit::Rock),
            mon(DRAGONITE, 62, Kit::Dragon),
        ],
    },
];

const CHAMPION: [TrainerMon; 6] = [
    mon(PIDGEOT, 61, Kit::Flying),
    mon(ALAKAZAM, 59, Kit::Psychic),
    mon(RHYDON, 61, Kit::Ground),
    mon(ARCANINE, 61, Kit::Fire),
    mon(EXEGGUTOR, 61, Kit::Grass),
    mon(BLASTOISE, 63, Kit::Water),
];

fn build_trainer_team(members: &[TrainerMon]) -> anyhow::Result<Team> {
    let built = members
        .iter()
        .map(|m| -> anyhow::Result<Combatant> {
            let s = &m.species;
            Ok(Combatant::new(s.name, s.id, s.types, s.stats, m.level)?
                .with_repertoire(repertoire_of(m.kit.moves())?))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Team::new(built)
}

/// The four Elite Four members in order, followed by the Champion.
pub fn opponents() -> anyhow::Result<Vec<Opponent>> {
    let mut roster = TRAINERS
        .iter()
        .map(|t| -> anyhow::Result<Opponent> {
            Ok(Opponent {
                name: t.name.to_string(),
                specialty: t.specialty,
                team: build_trainer_team(&t.team)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    roster.push(Opponent {
        name: "Champion".to_string(),
        specialty: None,
        team: build_trainer_team(&CHAMPION)?,
    });
    Ok(roster)
}

pub fn find_opponent<'a>(roster: &'a [Opponent], name: &str) -> Option<&'a Opponent> {
    roster.iter().find(|o| o.name.eq_ignore_ascii_case(name.trim()))
}

const POOL: &[Species] = &[
    species("Venusaur", 3, &[Grass, Poison], Stats::new(80, 82, 83, 100, 100, 80)),
    species("Charizard", 6, &[Fire, Flying], Stats::new(78, 84, 78, 109, 85, 100)),
    species("Blastoise", 9, &[Water], Stats::new(79, 83, 100, 85, 105, 78)),
    species("Pikachu", 25, &[Electric], Stats::new(35, 55, 30, 50, 40, 90)),
    species("Raichu", 26, &[Electric], Stats::new(60, 90, 55, 90, 80, 100)),
    species("Nidoking", 34, &[Poison, Ground], Stats::new(81, 92, 77, 85, 75, 85)),
    species("Arcanine", 59, &[Fire], Stats::new(90, 110, 80, 100, 80, 95)),
    species("Alakazam", 65, &[Psychic], Stats::new(55, 50, 45, 135, 85, 120)),
    species("Machamp", 68, &[Fighting], Stats::new(90, 130, 80, 65, 85, 55)),
    species("Golem", 76, &[Rock, Ground], Stats::new(80, 110, 130, 55, 65, 45)),
    species("Gengar", 94, &[Ghost, Poison], Stats::new(60, 65, 60, 130, 75, 110)),
    species("Onix", 95, &[Rock, Ground], Stats::new(35, 45, 160, 30, 45, 70)),
    species("Exeggutor", 103, &[Grass, Psychic], Stats::new(95, 95, 85, 125, 65, 55)),
    species("Weezing", 110, &[Poison], Stats::new(65, 90, 120, 85, 70, 60)),
    species("Rhydon", 112, &[Ground, Rock], Stats::new(105, 130, 120, 45, 45, 40)),
    species("Chansey", 113, &[Normal], Stats::new(250, 5, 5, 35, 105, 50)),
    species("Kangaskhan", 115, &[Normal], Stats::new(105, 95, 80, 40, 80, 90)),
    species("Starmie", 121, &[Water, Psychic], Stats::new(60, 75, 85, 100, 85, 115)),
    species("Scyther", 123, &[Bug, Flying], Stats::new(70, 110, 80, 55, 80, 105)),
    species("Jynx", 124, &[Ice, Psychic], Stats::new(65, 50, 35, 115, 95, 95)),
    species("Electabuzz", 125, &[Electric], Stats::new(65, 83, 57, 95, 85, 105)),
    species("Magmar", 126, &[Fire], Stats::new(65, 95, 57, 100, 85, 93)),
    species("Pinsir", 127, &[Bug], Stats::new(65, 125, 100, 55, 70, 85)),
    species("Tauros", 128, &[Normal], Stats::new(75, 100, 95, 40, 70, 110)),
    species("Gyarados", 130, &[Water, Flying], Stats::new(95, 125, 79, 60, 100, 81)),
    species("Lapras", 131, &[Water, Ice], Stats::new(130, 85, 80, 85, 95, 60)),
    species("Vaporeon", 134, &[Water], Stats::new(130, 65, 60, 110, 95, 65)),
    species("Jolteon", 135, &[Electric], Stats::new(65, 65, 60, 110, 95, 130)),
    species("Flareon", 136, &[Fire], Stats::new(65, 130, 60, 95, 110, 65)),
    species("Kabutops", 141, &[Rock, Water], Stats::new(60, 115, 105, 65, 70, 80)),
    species("Aerodactyl", 142, &[Rock, Flying], Stats::new(80, 105, 65, 60, 75, 130)),
    species("Snorlax", 143, &[Normal], Stats::new(160, 110, 65, 65, 110, 30)),
    species("Articuno", 144, &[Ice, Flying], Stats::new(90, 85, 100, 95, 125, 85)),
    species("Zapdos", 145, &[Electric, Flying], Stats::new(90, 90, 85, 125, 90, 100)),
    species("Moltres", 146, &[Fire, Flying], Stats::new(90, 100, 90, 125, 85, 90)),
    species("Dragonite", 149, &[Dragon, Flying], Stats::new(91, 134, 95, 100, 100, 80)),
    species("Umbreon", 197, &[Dark], Stats::new(95, 65, 110, 60, 130, 65)),
    species("Steelix", 208, &[Steel, Ground], Stats::new(75, 85, 200, 55, 65, 30)),
    species("Skarmory", 227, &[Steel, Flying], Stats::new(65, 80, 140, 40, 70, 70)),
    species("Tyranitar", 248, &[Rock, Dark], Stats::new(100, 134, 110, 95, 100, 61)),
];

fn pool_repertoire(s: &Species) -> anyhow::Result<Repertoire> {
    match preset_repertoire(s.name)? {
        Some(preset) => Ok(preset),
        None => default_repertoire(s.types[0]),
    }
}

/// Candidate pool used when no pool file is given, at level 50.
pub fn builtin_pool() -> anyhow::Result<Vec<Combatant>> {
    POOL.iter()
        .map(|s| -> anyhow::Result<Combatant> {
            Ok(Combatant::new(s.name, s.id, s.types, s.stats, POOL_LEVEL)?
                .with_repertoire(pool_repertoire(s)?))
        })
        .collect()
}
