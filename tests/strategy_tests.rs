use rand::rngs::SmallRng;
use rand::SeedableRng;
use team_forge::model::{Combatant, Move, MoveCategory, Repertoire, Stats};
use team_forge::moves::DEFAULT_MOVE;
use team_forge::strategy::{select_move, Balanced, MoveStrategy, UsableMove};
use team_forge::types::Type;

fn make_move(
    name: &str,
    move_type: Type,
    category: MoveCategory,
    power: u32,
    accuracy: u32,
) -> Move {
    Move::new(name.to_string(), move_type, category, power, accuracy, 10).unwrap()
}

fn make_mon(name: &str, types: &[Type], moves: Vec<Move>) -> Combatant {
    Combatant::new(name, 1, types, Stats::new(80, 100, 80, 100, 80, 80), 50)
        .unwrap()
        .with_repertoire(Repertoire::new(moves).unwrap())
}

fn usable(mon: &Combatant) -> Vec<UsableMove<'_>> {
    mon.repertoire()
        .moves()
        .iter()
        .enumerate()
        .map(|(slot, mv)| UsableMove {
            slot,
            mv,
            remaining: mv.max_uses(),
        })
        .collect()
}

fn chosen(strategy: MoveStrategy, attacker: &Combatant, defender: &Combatant) -> String {
    let mut rng = SmallRng::seed_from_u64(0);
    let moves = usable(attacker);
    strategy
        .select(attacker, defender, &moves, &mut rng)
        .mv
        .name()
        .to_string()
}

fn fire_target() -> Combatant {
    let ember = make_move("Ember", Type::Fire, MoveCategory::Special, 40, 100);
    make_mon("Flare", &[Type::Fire], vec![ember])
}

#[test]
fn highest_damage_ignores_status_moves() {
    let attacker = make_mon(
        "Brute",
        &[Type::Normal],
        vec![
            make_move("Growl", Type::Normal, MoveCategory::Status, 0, 100),
            make_move("Tackle", Type::Normal, MoveCategory::Physical, 40, 100),
            make_move("Body Slam", Type::Normal, MoveCategory::Physical, 85, 100),
        ],
    );
    let target = make_mon("Dummy", &[Type::Normal], vec![DEFAULT_MOVE.clone()]);
    assert_eq!(chosen(MoveStrategy::HighestDamage, &attacker, &target), "Body Slam");
}

#[test]
fn type_effective_prefers_the_multiplier_over_power() {
    let attacker = make_mon(
        "Squirt",
        &[Type::Water],
        vec![
            make_move("Hyper Beam", Type::Normal, MoveCategory::Special, 150, 90),
            make_move("Water Gun", Type::Water, MoveCategory::Special, 40, 100),
            make_move("Bubble", Type::Water, MoveCategory::Special, 20, 100),
        ],
    );
    let target = fire_target();
    assert_eq!(chosen(MoveStrategy::TypeEffective, &attacker, &target), "Water Gun");
    assert_eq!(chosen(MoveStrategy::HighestDamage, &attacker, &target), "Hyper Beam");
}

#[test]
fn status_first_sets_up_unless_an_attack_is_super_effective() {
    let attacker = make_mon(
        "Setter",
        &[Type::Normal],
        vec![
            make_move("Tackle", Type::Normal, MoveCategory::Physical, 40, 100),
            make_move("Hypnosis", Type::Psychic, MoveCategory::Status, 0, 60),
            make_move("Growl", Type::Normal, MoveCategory::Status, 0, 100),
        ],
    );
    let target = fire_target();
    assert_eq!(chosen(MoveStrategy::StatusFirst, &attacker, &target), "Growl");

    let armed = make_mon(
        "Armed",
        &[Type::Water],
        vec![
            make_move("Growl", Type::Normal, MoveCategory::Status, 0, 100),
            make_move("Water Gun", Type::Water, MoveCategory::Special, 40, 100),
        ],
    );
    assert_eq!(chosen(MoveStrategy::StatusFirst, &armed, &target), "Water Gun");
}

#[test]
fn balanced_weighs_damage_and_effectiveness() {
    let attacker = make_mon(
        "Mixer",
        &[Type::Water],
        vec![
            make_move("Growl", Type::Normal, MoveCategory::Status, 0, 100),
            make_move("Tackle", Type::Normal, MoveCategory::Physical, 40, 100),
            make_move("Surf", Type::Water, MoveCategory::Special, 90, 100),
        ],
    );
    let target = fire_target();
    assert_eq!(chosen(MoveStrategy::Balanced, &attacker, &target), "Surf");

    let moves = usable(&attacker);
    let weights = Balanced::default();
    let surf = weights.score(&attacker, &target, &moves[2], 1.0);
    let growl = weights.score(&attacker, &target, &moves[0], 1.0);
    assert!(surf > growl);
}

#[test]
fn random_choice_stays_in_range() {
    let attacker = make_mon(
        "Dice",
        &[Type::Normal],
        vec![
            make_move("One", Type::Normal, MoveCategory::Physical, 40, 100),
            make_move("Two", Type::Fire, MoveCategory::Special, 40, 100),
        ],
    );
    let target = fire_target();
    let moves = usable(&attacker);
    let mut rng = SmallRng::seed_from_u64(99);
    let mut seen = [false; 2];
    for _ in 0..200 {
        let pick = MoveStrategy::Random.select(&attacker, &target, &moves, &mut rng);
        let slot = pick.slot.unwrap();
        seen[slot] = true;
        assert_eq!(pick.mv.name(), moves[slot].mv.name());
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn every_strategy_falls_back_to_default_move() {
    let attacker = make_mon("Spent", &[Type::Normal], Vec::new());
    let target = fire_target();
    let mut rng = SmallRng::seed_from_u64(1);
    for strategy in MoveStrategy::ALL {
        let pick = select_move(strategy.selector(), &attacker, &target, &[], &mut rng);
        assert!(pick.slot.is_none());
        assert_eq!(pick.mv.name(), "Tackle");
    }
}
