//! Move catalog resolved when combatants are built, so battles never look
//! moves up by name.

use crate::model::{Move, MoveCategory, MoveTarget, Repertoire};
use crate::types::Type;
use phf::phf_map;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug)]
pub struct MoveSpec {
    pub name: &'static str,
    pub move_type: Type,
    pub category: MoveCategory,
    pub power: u32,
    pub accuracy: u32,
    pub uses: u32,
    pub priority: i32,
    pub target: MoveTarget,
}

impl MoveSpec {
    pub fn to_move(&self) -> Move {
        Move {
            name: Cow::Borrowed(self.name),
            move_type: self.move_type,
            category: self.category,
            power: self.power,
            accuracy: self.accuracy,
            max_uses: self.uses,
            priority: self.priority,
            target: self.target,
        }
    }
}

/// Used when a combatant has no move with uses left. Spending it is free.
pub static DEFAULT_MOVE: Move = Move {
    name: Cow::Borrowed("Tackle"),
    move_type: Type::Normal,
    category: MoveCategory::Physical,
    power: 40,
    accuracy: 100,
    max_uses: 35,
    priority: 0,
    target: MoveTarget::Enemy,
};

const fn atk(
    name: &'static str,
    move_type: Type,
    category: MoveCategory,
    power: u32,
    accuracy: u32,
    uses: u32,
) -> MoveSpec {
    MoveSpec {
        name,
        move_type,
        category,
        power,
        accuracy,
        uses,
        priority: 0,
        target: MoveTarget::Enemy,
    }
}

const fn quick(
    name: &'static str,
    move_type: Type,
    power: u32,
    uses: u32,
    priority: i32,
) -> MoveSpec {
    MoveSpec {
        name,
        move_type,
        category: MoveCategory::Physical,
        power,
        accuracy: 100,
        uses,
        priority,
        target: MoveTarget::Enemy,
    }
}

const fn status(
    name: &'static str,
    move_type: Type,
    accuracy: u32,
    uses: u32,
    target: MoveTarget,
) -> MoveSpec {
    MoveSpec {
        name,
        move_type,
        category: MoveCategory::Status,
        power: 0,
        accuracy,
        uses,
        priority: 0,
        target,
    }
}

use MoveCategory::{Physical, Special};
use MoveTarget::{Enemy, Everyone, User};

pub static CATALOG: phf::Map<&'static str, MoveSpec> = phf_map! {
    "Tackle" => atk("Tackle", Type::Normal, Physical, 40, 100, 35),
    "Scratch" => atk("Scratch", Type::Normal, Physical, 40, 100, 35),
    "Vine Whip" => atk("Vine Whip", Type::Grass, Physical, 45, 100, 25),
    "Ember" => atk("Ember", Type::Fire, Special, 40, 100, 25),
    "Water Gun" => atk("Water Gun", Type::Water, Special, 40, 100, 25),
    "Thunder Shock" => atk("Thunder Shock", Type::Electric, Special, 40, 100, 30),
    "Confusion" => atk("Confusion", Type::Psychic, Special, 50, 100, 25),
    "Quick Attack" => quick("Quick Attack", Type::Normal, 40, 30, 1),
    "Bite" => atk("Bite", Type::Dark, Physical, 60, 100, 25),
    "Metal Claw" => atk("Metal Claw", Type::Steel, Physical, 50, 95, 35),
    "Flamethrower" => atk("Flamethrower", Type::Fire, Special, 95, 100, 15),
    "Surf" => atk("Surf", Type::Water, Special, 95, 100, 15),
    "Thunderbolt" => atk("Thunderbolt", Type::Electric, Special, 95, 100, 15),
    "Psychic" => atk("Psychic", Type::Psychic, Special, 90, 100, 10),
    "Solar Beam" => atk("Solar Beam", Type::Grass, Special, 120, 100, 10),
    "Ice Beam" => atk("Ice Beam", Type::Ice, Special, 95, 100, 10),
    "Hyper Beam" => atk("Hyper Beam", Type::Normal, Special, 150, 90, 5),
    "Earthquake" => atk("Earthquake", Type::Ground, Physical, 100, 100, 10),
    "Rock Slide" => atk("Rock Slide", Type::Rock, Physical, 75, 90, 10),
    "Dragon Claw" => atk("Dragon Claw", Type::Dragon, Physical, 80, 100, 15),
    "Growl" => status("Growl", Type::Normal, 100, 40, Enemy),
    "Leer" => status("Leer", Type::Normal, 100, 30, Enemy),
    "Swords Dance" => status("Swords Dance", Type::Normal, 100, 20, User),
    "Agility" => status("Agility", Type::Psychic, 100, 30, User),
    "Reflect" => status("Reflect", Type::Psychic, 100, 20, User),
    "Light Screen" => status("Light Screen", Type::Psychic, 100, 30, User),
    "Toxic" => status("Toxic", Type::Poison, 90, 10, Enemy),
    "Thunder Wave" => status("Thunder Wave", Type::Electric, 100, 20, Enemy),
    "Sleep Powder" => status("Sleep Powder", Type::Grass, 75, 15, Enemy),
    "Stun Spore" => status("Stun Spore", Type::Grass, 75, 30, Enemy),
    "Wing Attack" => atk("Wing Attack", Type::Flying, Physical, 60, 100, 35),
    "Body Slam" => atk("Body Slam", Type::Normal, Physical, 85, 100, 15),
    "Waterfall" => atk("Waterfall", Type::Water, Physical, 80, 100, 15),
    "Megahorn" => atk("Megahorn", Type::Bug, Physical, 120, 85, 10),
    "Explosion" => atk("Explosion", Type::Normal, Physical, 250, 100, 5),
    "Iron Tail" => atk("Iron Tail", Type::Steel, Physical, 100, 75, 15),
    "Sandstorm" => status("Sandstorm", Type::Rock, 100, 10, Everyone),
    "Bulk Up" => status("Bulk Up", Type::Fighting, 100, 20, User),
    "Soft-Boiled" => status("Soft-Boiled", Type::Normal, 100, 10, User),
    "Seismic Toss" => atk("Seismic Toss", Type::Fighting, Physical, 0, 100, 20),
    "Wish" => status("Wish", Type::Normal, 100, 10, User),
    "Tri Attack" => atk("Tri Attack", Type::Normal, Special, 80, 100, 10),
    "Shell Smash" => status("Shell Smash", Type::Normal, 100, 15, User),
    "Aqua Jet" => quick("Aqua Jet", Type::Water, 40, 20, 1),
    "Blizzard" => atk("Blizzard", Type::Ice, Special, 110, 70, 5),
    "Roost" => status("Roost", Type::Flying, 100, 10, User),
    "Fire Blast" => atk("Fire Blast", Type::Fire, Special, 110, 85, 5),
    "Thunder" => atk("Thunder", Type::Electric, Special, 110, 70, 10),
    "Dragon Pulse" => atk("Dragon Pulse", Type::Dragon, Special, 85, 100, 10),
    "Dragon Dance" => status("Dragon Dance", Type::Dragon, 100, 20, User),
    "Extreme Speed" => quick("Extreme Speed", Type::Normal, 80, 5, 2),
    "Aura Sphere" => atk("Aura Sphere", Type::Fighting, Special, 80, 100, 20),
    "Calm Mind" => status("Calm Mind", Type::Psychic, 100, 20, User),
    "Lovely Kiss" => status("Lovely Kiss", Type::Normal, 75, 10, Enemy),
    "Ice Punch" => atk("Ice Punch", Type::Ice, Physical, 75, 100, 15),
    "Thunder Punch" => atk("Thunder Punch", Type::Electric, Physical, 75, 100, 15),
    "X-Scissor" => atk("X-Scissor", Type::Bug, Physical, 80, 100, 15),
    "Flail" => atk("Flail", Type::Normal, Physical, 0, 100, 15),
    "Bounce" => atk("Bounce", Type::Flying, Physical, 85, 85, 5),
    "Transform" => status("Transform", Type::Normal, 100, 10, Enemy),
    "Acid Armor" => status("Acid Armor", Type::Poison, 100, 20, User),
    "Aqua Tail" => atk("Aqua Tail", Type::Water, Physical, 90, 90, 10),
    "Ice Fang" => atk("Ice Fang", Type::Ice, Physical, 65, 95, 15),
};

static PRESETS: &[(&str, &[&str])] = &[
    ("Charizard", &["Flamethrower", "Wing Attack", "Dragon Claw", "Earthquake"]),
    ("Blastoise", &["Surf", "Ice Beam", "Earthquake", "Bite"]),
    ("Venusaur", &["Solar Beam", "Vine Whip", "Earthquake", "Sleep Powder"]),
    ("Pikachu", &["Thunderbolt", "Quick Attack", "Thunder Wave", "Bite"]),
    ("Raichu", &["Thunderbolt", "Quick Attack", "Thunder Wave", "Bite"]),
    ("Alakazam", &["Psychic", "Confusion", "Reflect"]),
    ("Snorlax", &["Body Slam", "Earthquake", "Hyper Beam"]),
    ("Gengar", &["Psychic", "Thunderbolt", "Toxic"]),
    ("Machamp", &["Earthquake", "Rock Slide", "Bulk Up"]),
    ("Lapras", &["Surf", "Ice Beam", "Thunderbolt", "Psychic"]),
    ("Gyarados", &["Waterfall", "Earthquake", "Dragon Dance", "Ice Fang"]),
    ("Exeggutor", &["Solar Beam", "Psychic", "Earthquake", "Sleep Powder"]),
    ("Rhydon", &["Earthquake", "Rock Slide", "Megahorn", "Swords Dance"]),
    ("Golem", &["Earthquake", "Rock Slide", "Explosion", "Swords Dance"]),
    ("Onix", &["Earthquake", "Rock Slide", "Iron Tail", "Sandstorm"]),
    ("Hitmonlee", &["Earthquake", "Rock Slide", "Bulk Up"]),
    ("Hitmonchan", &["Earthquake", "Rock Slide", "Bulk Up"]),
    ("Lickitung", &["Body Slam", "Earthquake", "Swords Dance"]),
    ("Weezing", &["Flamethrower", "Thunderbolt", "Explosion"]),
    ("Rhyhorn", &["Earthquake", "Rock Slide", "Megahorn", "Swords Dance"]),
    ("Chansey", &["Soft-Boiled", "Seismic Toss", "Thunder Wave", "Toxic"]),
    ("Tangela", &["Solar Beam", "Sleep Powder", "Earthquake", "Swords Dance"]),
    ("Kangaskhan", &["Body Slam", "Earthquake", "Rock Slide", "Swords Dance"]),
    ("Horsea", &["Surf", "Ice Beam", "Dragon Pulse", "Agility"]),
    ("Goldeen", &["Waterfall", "Megahorn", "Swords Dance", "Aqua Tail"]),
    ("Staryu", &["Surf", "Thunderbolt", "Ice Beam"]),
    ("Starmie", &["Surf", "Thunderbolt", "Ice Beam", "Psychic"]),
    ("Mr. Mime", &["Psychic", "Thunderbolt", "Reflect", "Light Screen"]),
    ("Scyther", &["Wing Attack", "Swords Dance", "Quick Attack", "Agility"]),
    ("Jynx", &["Psychic", "Ice Beam", "Lovely Kiss", "Calm Mind"]),
    ("Electabuzz", &["Thunderbolt", "Psychic", "Ice Punch", "Thunder Wave"]),
    ("Magmar", &["Flamethrower", "Psychic", "Thunder Punch"]),
    ("Pinsir", &["X-Scissor", "Earthquake", "Swords Dance", "Quick Attack"]),
    ("Tauros", &["Body Slam", "Earthquake", "Rock Slide", "Swords Dance"]),
    ("Magikarp", &["Tackle", "Flail", "Bounce"]),
    ("Ditto", &["Transform"]),
    ("Eevee", &["Quick Attack", "Tackle", "Bite", "Growl"]),
    ("Vaporeon", &["Surf", "Ice Beam", "Acid Armor", "Wish"]),
    ("Jolteon", &["Thunderbolt", "Thunder Wave", "Quick Attack", "Agility"]),
    ("Flareon", &["Flamethrower", "Quick Attack", "Wish"]),
    ("Porygon", &["Tri Attack", "Thunderbolt", "Ice Beam"]),
    ("Omastar", &["Surf", "Ice Beam", "Shell Smash"]),
    ("Kabutops", &["Waterfall", "Rock Slide", "Swords Dance", "Aqua Jet"]),
    ("Aerodactyl", &["Wing Attack", "Rock Slide", "Earthquake", "Swords Dance"]),
    ("Articuno", &["Ice Beam", "Blizzard", "Roost", "Reflect"]),
    ("Zapdos", &["Thunderbolt", "Thunder", "Roost", "Light Screen"]),
    ("Moltres", &["Flamethrower", "Fire Blast", "Roost"]),
    ("Dragonite", &["Dragon Pulse", "Thunder Wave", "Dragon Dance", "Extreme Speed"]),
    ("Arcanine", &["Flamethrower", "Bite", "Extreme Speed", "Agility"]),
    ("Nidoking", &["Earthquake", "Ice Beam", "Thunderbolt", "Megahorn"]),
    ("Mewtwo", &["Psychic", "Aura Sphere", "Calm Mind"]),
    ("Mew", &["Psychic", "Aura Sphere", "Soft-Boiled", "Calm Mind"]),
];

pub fn lookup(name: &str) -> Option<&'static MoveSpec> {
    CATALOG.get(name).or_else(|| {
        CATALOG
            .values()
            .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
    })
}

pub fn resolve(name: &str) -> anyhow::Result<Move> {
    lookup(name)
        .map(MoveSpec::to_move)
        .ok_or_else(|| anyhow::anyhow!("Unknown move {name}"))
}

pub fn repertoire_of(names: &[&str]) -> anyhow::Result<Repertoire> {
    let moves = names
        .iter()
        .map(|name| resolve(name))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Repertoire::new(moves)
}

/// Hand-picked moveset for a known species, if any.
pub fn preset_repertoire(species: &str) -> anyhow::Result<Option<Repertoire>> {
    match PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(species))
    {
        Some((_, names)) => repertoire_of(names).map(Some),
        None => Ok(None),
    }
}

/// Two moves of the primary type topped up with generic moves.
pub fn default_repertoire(primary: Type) -> anyhow::Result<Repertoire> {
    let typed: [&str; 2] = match primary {
        Type::Fire => ["Ember", "Flamethrower"],
        Type::Water => ["Water Gun", "Surf"],
        Type::Grass => ["Vine Whip", "Solar Beam"],
        Type::Electric => ["Thunder Shock", "Thunderbolt"],
        Type::Psychic => ["Confusion", "Psychic"],
        Type::Ground => ["Tackle", "Earthquake"],
        Type::Poison => ["Tackle", "Toxic"],
        Type::Rock => ["Tackle", "Rock Slide"],
        Type::Ghost => ["Tackle", "Confusion"],
        Type::Dragon => ["Tackle", "Dragon Claw"],
        Type::Steel => ["Metal Claw", "Tackle"],
        Type::Dark => ["Bite", "Tackle"],
        Type::Ice => ["Tackle", "Ice Beam"],
        Type::Normal | Type::Fighting | Type::Flying | Type::Bug => ["Tackle", "Quick Attack"],
    };
    let mut names: Vec<&str> = typed.to_vec();
    for filler in ["Growl", "Leer", "Swords Dance", "Agility"] {
        if names.len() >= 4 {
            break;
        }
        if !names.contains(&filler) {
            names.push(filler);
        }
    }
    repertoire_of(&names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_are_valid_moves() {
        for (key, spec) in CATALOG.entries() {
            assert_eq!(*key, spec.name);
            let checked = Move::new(
                spec.name,
                spec.move_type,
                spec.category,
                spec.power,
                spec.accuracy,
                spec.uses,
            );
            assert!(checked.is_ok(), "{key}: {:?}", checked.err());
        }
    }

    #[test]
    fn every_preset_resolves() {
        for (species, _) in PRESETS {
            let repertoire = preset_repertoire(species).unwrap().unwrap();
            assert!(!repertoire.is_empty(), "{species}");
        }
    }

    #[test]
    fn every_type_has_a_full_default_moveset() {
        for t in Type::ALL {
            assert_eq!(default_repertoire(t).unwrap().len(), 4, "{t}");
        }
    }

    #[test]
    fn lookup_tolerates_case() {
        assert_eq!(lookup("ice beam").map(|s| s.name), Some("Ice Beam"));
        assert!(resolve("Shadow Ball").is_err());
    }
}
