use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Steel,
    Dark,
}

impl Type {
    pub const ALL: [Type; 17] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Steel,
        Type::Dark,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Steel => "Steel",
            Type::Dark => "Dark",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown type {s}"))
    }
}

/// Damage multiplier of an `attack` typed move against a defender with the
/// given types. Multipliers compose by product; an empty slice is neutral.
pub fn effectiveness(attack: Type, defender: &[Type]) -> f64 {
    defender
        .iter()
        .map(|&t| single_type_effectiveness(attack, t))
        .product()
}

// Third-generation chart: no Fairy, Bug still hits Poison, Ghost is neutral on Steel.
fn single_type_effectiveness(attacking: Type, defending: Type) -> f64 {
    use Type::*;
    match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug | Steel => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Poison | Psychic | Dark => 2.0,
            Fire | Fighting | Flying | Ghost | Steel => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost | Psychic => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Ice | Rock => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Steel => 0.5,
            _ => 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pairing_is_a_known_multiplier() {
        let allowed = [0.0, 0.25, 0.5, 1.0, 2.0, 4.0];
        for attack in Type::ALL {
            for first in Type::ALL {
                let single = effectiveness(attack, &[first]);
                assert!(allowed.contains(&single), "{attack} vs {first} = {single}");
                for second in Type::ALL {
                    let dual = effectiveness(attack, &[first, second]);
                    assert!(
                        allowed.contains(&dual),
                        "{attack} vs {first}/{second} = {dual}"
                    );
                }
            }
        }
    }

    #[test]
    fn immunities_are_one_directional() {
        assert_eq!(effectiveness(Type::Normal, &[Type::Ghost]), 0.0);
        assert_eq!(effectiveness(Type::Ghost, &[Type::Normal]), 0.0);
        assert_eq!(effectiveness(Type::Ground, &[Type::Flying]), 0.0);
        assert_eq!(effectiveness(Type::Flying, &[Type::Ground]), 1.0);
        assert_eq!(effectiveness(Type::Psychic, &[Type::Dark]), 0.0);
        assert_eq!(effectiveness(Type::Dark, &[Type::Psychic]), 2.0);
    }

    #[test]
    fn dual_types_compose() {
        assert_eq!(effectiveness(Type::Rock, &[Type::Fire, Type::Flying]), 4.0);
        assert_eq!(effectiveness(Type::Grass, &[Type::Fire, Type::Flying]), 0.25);
        assert_eq!(effectiveness(Type::Electric, &[Type::Water, Type::Ground]), 0.0);
        assert_eq!(effectiveness(Type::Water, &[]), 1.0);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("psychic".parse::<Type>().unwrap(), Type::Psychic);
        assert_eq!(" STEEL ".parse::<Type>().unwrap(), Type::Steel);
        assert!("fairy".parse::<Type>().is_err());
    }
}
