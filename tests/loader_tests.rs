use std::io::Write;
use team_forge::roster::{builtin_pool, opponents};
use team_forge::{load_pool, select_opponents, team_from_pool};

fn pool_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

const GOOD_ENTRY: &str = r#"{
    "name": "Lapras", "id": 131, "types": ["water", "ice"],
    "stats": {"hp": 130, "attack": 85, "defense": 80, "sp_attack": 85, "sp_defense": 95, "speed": 60},
    "moves": ["Surf", "Thunderbolt"]
}"#;

#[test]
fn pool_file_loads_named_and_preset_moves() {
    let body = format!(
        r#"{{"pokemon": [{GOOD_ENTRY}, {{
            "name": "Blastoise", "id": 9, "types": ["water"],
            "stats": {{"hp": 79, "attack": 83, "defense": 100, "sp_attack": 85, "sp_defense": 105, "speed": 78}}
        }}]}}"#
    );
    let file = pool_file(&body);
    let pool = load_pool(file.path()).unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool[0].name(), "Lapras");
    assert_eq!(pool[0].repertoire().moves().len(), 2);
    // No moves listed: the species preset applies.
    assert_eq!(pool[1].repertoire().moves()[0].name(), "Surf");
}

#[test]
fn bad_pool_entry_names_its_index_and_file() {
    let body = format!(
        r#"{{"pokemon": [{GOOD_ENTRY}, {{
            "name": "Mystery", "id": 999, "types": ["normal"],
            "stats": {{"hp": 50, "attack": 50, "defense": 50, "sp_attack": 50, "sp_defense": 50, "speed": 50}},
            "moves": ["Not A Real Move"]
        }}]}}"#
    );
    let file = pool_file(&body);
    let err = load_pool(file.path()).unwrap_err();
    let top = err.to_string();
    assert!(top.contains("Pool entry 1 (Mystery)"), "{top}");
    assert!(top.contains(&file.path().display().to_string()), "{top}");
    let chain = format!("{err:#}");
    assert!(chain.contains("Not A Real Move"), "{chain}");
}

#[test]
fn oversized_stats_in_a_pool_file_are_rejected() {
    let body = r#"{"pokemon": [{
        "name": "Giant", "id": 1, "types": ["normal"],
        "stats": {"hp": 30000000, "attack": 50, "defense": 50, "sp_attack": 50, "sp_defense": 50, "speed": 50}
    }]}"#;
    let file = pool_file(body);
    let err = load_pool(file.path()).unwrap_err();
    assert!(err.to_string().contains("Pool entry 0 (Giant)"), "{err:#}");
}

#[test]
fn unreadable_or_malformed_pool_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = load_pool(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read pool file"), "{err:#}");

    let file = pool_file("{\"pokemon\": [");
    let err = load_pool(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse JSON"), "{err:#}");
}

#[test]
fn team_lookup_ignores_case_and_rejects_unknown_names() {
    let pool = builtin_pool().unwrap();
    let names = vec!["gyarados".to_string(), " DRAGONITE ".to_string()];
    let team = team_from_pool(&pool, &names).unwrap();
    assert_eq!(team.names(), vec!["Gyarados", "Dragonite"]);

    let names = vec!["Gyarados".to_string(), "Missingno".to_string()];
    let err = team_from_pool(&pool, &names).unwrap_err();
    assert!(err.to_string().contains("Missingno is not in the candidate pool"), "{err}");
}

#[test]
fn opponent_filter_picks_one_by_name() {
    let all = select_opponents(opponents().unwrap(), None).unwrap();
    assert_eq!(all.len(), 5);

    let one = select_opponents(opponents().unwrap(), Some(" lance")).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].name, "Lance");

    let err = select_opponents(opponents().unwrap(), Some("Giovanni")).unwrap_err();
    assert!(err.to_string().contains("Unknown opponent Giovanni"), "{err}");
}
