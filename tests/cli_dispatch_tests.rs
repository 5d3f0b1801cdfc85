use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use azur_stats::cli::{
    check_options, parse_command, parse_invocation, Command as CliCommand, MenuChoice, Session,
};
use azur_stats::data::{
    Attribute, HullClass, Level, Rarity, ShipRecord, ShipRepository, ShipTable, TableKey,
};

const BATTLESHIPS_125: &str = "Ship Name,Rarity,Type,Firepower,Luck,Anti-air\n\
    Roon,Super Rare,Battleship,400,10,200\n\
    Drake,Super Rare,Battleship,380,,250\n\
    Mainz,Ultra Rare,Battleship,420,30,250\n";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_azur_stats")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("azur-stats-cli-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

fn data_dir(name: &str) -> PathBuf {
    let dir = unique_temp_dir(name);
    fs::write(dir.join("BB_Level_125.csv"), BATTLESHIPS_125).expect("fixture should be written");
    dir
}

fn run(dir: &PathBuf, args: &[&str]) -> Output {
    Command::new(bin())
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env_remove("AZUR_STATS_SUBSTITUTIONS")
        .output()
        .expect("binary should run")
}

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn command_parsing_defaults_to_menu() {
    assert_eq!(parse_command(&args(&["azur_stats"])), Some(CliCommand::Menu));
    assert_eq!(parse_command(&args(&["azur_stats", "compare"])), Some(CliCommand::Compare));
    assert_eq!(parse_command(&args(&["azur_stats", "bogus"])), None);
}

#[test]
fn options_are_pulled_out_of_positional_arguments() {
    let invocation = parse_invocation(&args(&[
        "azur_stats",
        "explore",
        "--json",
        "Drake",
        "--policy",
        "rarity",
        "125",
        "firepower",
    ]))
    .expect("arguments should parse");
    assert!(invocation.json);
    assert_eq!(invocation.policy.as_deref(), Some("rarity"));
    assert_eq!(invocation.positional, args(&["azur_stats", "explore", "Drake", "125", "firepower"]));

    assert!(parse_invocation(&args(&["azur_stats", "--policy"])).is_err());
    assert!(parse_invocation(&args(&["azur_stats", "--verbose"])).is_err());
}

#[test]
fn options_are_checked_per_command() {
    let invocation = parse_invocation(&args(&["azur_stats", "compare", "--policy", "rarity"]))
        .expect("arguments should parse");
    assert!(check_options(CliCommand::Compare, &invocation).is_err());
    assert!(check_options(CliCommand::Explore, &invocation).is_ok());

    let json = parse_invocation(&args(&["azur_stats", "tables", "--json"])).expect("arguments should parse");
    assert!(check_options(CliCommand::Tables, &json).is_ok());
    assert!(check_options(CliCommand::Validate, &json).is_err());
    assert!(check_options(CliCommand::Menu, &json).is_err());
}

#[test]
fn compare_command_rejects_policy_option() {
    let dir = data_dir("compare-policy");
    let output = run(&dir, &["compare", "Drake", "Mainz", "125", "firepower", "--policy", "rarity"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("option --policy is not supported by this command"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn compare_command_class_option_picks_hull_class() {
    let dir = data_dir("compare-class");
    fs::write(
        dir.join("CL_Level_125.csv"),
        "Ship Name,Rarity,Type,Firepower\nDrake,Rare,Light Cruiser,100\n",
    )
    .expect("fixture should be written");

    let unconstrained = run(&dir, &["compare", "Drake", "Mainz", "125", "firepower", "--json"]);
    assert_eq!(unconstrained.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&unconstrained.stdout)
        .expect("compare should emit json");
    assert_eq!(payload["first_class"], "LightCruiser");
    assert_eq!(payload["deltas"][0]["delta"], 320.0);

    let constrained = run(&dir, &["compare", "Drake", "Mainz", "125", "firepower", "--class", "BB", "--json"]);
    assert_eq!(constrained.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&constrained.stdout)
        .expect("compare should emit json");
    assert_eq!(payload["first_class"], "Battleship");
    assert_eq!(payload["deltas"][0]["delta"], 40.0);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn tables_command_emits_json() {
    let dir = data_dir("tables-json");
    let output = run(&dir, &["tables", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("tables should emit json");
    assert_eq!(payload[0]["table"], "BB_Level_125");
    assert_eq!(payload[0]["ships"], 3);
    assert_eq!(
        payload[0]["stat_columns"],
        serde_json::json!(["firepower", "luck", "anti_air"])
    );

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn explore_command_prints_class_summary() {
    let dir = data_dir("explore");
    let output = run(&dir, &["explore", "drake", "125", "firepower", "--policy", "class"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Drake (Super Rare Battleship, BB_Level_125)"));
    assert!(stdout.contains("400.0"));
    assert!(stdout.contains("rank 3/3"));
    assert!(!stdout.contains("same rarity"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn explore_command_emits_json() {
    let dir = data_dir("explore-json");
    let output = run(&dir, &["explore", "Drake", "125", "firepower,luck", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("explore should emit json");
    let sections = payload["sections"].as_array().expect("sections should be an array");
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["policy"], "all_in_class");

    let firepower = &sections[0]["summaries"][0];
    assert_eq!(firepower["attribute"], "firepower");
    assert_eq!(firepower["outcome"]["status"], "summary");
    assert_eq!(firepower["outcome"]["rank"], 3);
    assert_eq!(firepower["outcome"]["mean"], 400.0);
    assert_eq!(sections[0]["summaries"][1]["outcome"]["status"], "not_available");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn explore_command_rejects_unknown_attributes() {
    let dir = data_dir("bad-attr");
    let output = run(&dir, &["explore", "Drake", "125", "firepower,armor"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown attribute(s): armor"));
    assert!(stderr.contains("valid attributes:"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn explore_command_rejects_invalid_level() {
    let dir = data_dir("bad-level");
    let output = run(&dir, &["explore", "Drake", "90", "firepower"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid level '90'"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn explore_command_reports_unknown_ship() {
    let dir = data_dir("unknown-ship");
    let output = run(&dir, &["explore", "Enterprise", "125", "all"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no ship named 'Enterprise' at level 125"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn compare_command_emits_json_deltas() {
    let dir = data_dir("compare");
    let output = run(&dir, &["compare", "Drake", "Mainz", "125", "firepower,luck", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("compare should emit json");
    assert_eq!(payload["deltas"][0]["outcome"], "second_greater");
    assert_eq!(payload["deltas"][0]["delta"], 40.0);
    assert_eq!(payload["deltas"][1]["outcome"], "skipped");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_data_dir_is_fatal() {
    let dir = std::env::temp_dir().join("azur-stats-cli-no-such-dir");
    let output = run(&dir, &["tables"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data directory not found"));
}

#[test]
fn unknown_command_prints_usage() {
    let dir = data_dir("usage");
    let output = run(&dir, &["rank"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: azur_stats"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn tables_command_lists_loaded_tables() {
    let dir = data_dir("tables");
    let output = run(&dir, &["tables"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BB_Level_125\t3\t3"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn validate_command_fails_on_broken_table() {
    let dir = data_dir("validate");
    fs::write(dir.join("CV_Level_1.csv"), "Name,Firepower\nRanger,0\n")
        .expect("fixture should be written");
    let output = run(&dir, &["validate"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[error] CV_Level_1.csv: missing 'Rarity' column"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn validate_command_passes_on_clean_data() {
    let dir = data_dir("validate-clean");
    let output = run(&dir, &["validate"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn menu_runs_explore_flow_from_stdin() {
    let dir = data_dir("menu");
    let mut child = Command::new(bin())
        .arg("--data-dir")
        .arg(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("menu should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"1\nDrake\n125\nfirepower\n3\n")
        .expect("input should be written");
    let output = child.wait_with_output().expect("menu should finish");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rank 3/3"));
    assert!(stdout.contains("Goodbye."));

    let _ = fs::remove_dir_all(dir);
}

fn session_repository() -> ShipRepository {
    let mut repository = ShipRepository::new();
    repository.insert(ShipTable::with_all_columns(
        TableKey::new(HullClass::Battleship, Level::L125),
        vec![
            ShipRecord::new("Roon", Rarity::SuperRare, "Battleship").with_stat(Attribute::Firepower, 400.0),
            ShipRecord::new("Mainz", Rarity::UltraRare, "Battleship").with_stat(Attribute::Firepower, 420.0),
        ],
    ));
    repository
}

fn drive_session(script: &str) -> String {
    let repository = session_repository();
    let mut output = Vec::new();
    Session::new(&repository, Cursor::new(script.as_bytes()), &mut output)
        .run()
        .expect("session should run");
    String::from_utf8(output).expect("output should be utf-8")
}

#[test]
fn menu_choice_parsing_is_exhaustive_over_options() {
    assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::ExploreStats));
    assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::CompareShips));
    assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::Exit));
    assert_eq!(MenuChoice::parse("4"), None);
}

#[test]
fn session_reprompts_on_invalid_input() {
    let text = drive_session("9\n2\nroon\n90\n125\nbismarck\n125\nmainz\n125\nfirepower,armor\nfp\n3\n");

    assert!(text.contains("Please choose 1, 2 or 3."));
    assert!(text.contains("invalid level '90'"));
    assert!(text.contains("No ship named 'bismarck' at level 125"));
    assert!(text.contains("unknown attribute(s): armor"));
    assert!(text.contains("Valid attributes: luck, speed"));
    assert!(text.contains("Mainz higher by 20 (400 vs 420)"));
    assert!(text.trim_end().ends_with("Goodbye."));
}

#[test]
fn session_ends_cleanly_at_end_of_input() {
    let text = drive_session("1\nroon\n");
    assert!(text.contains("Level (1, 100, 120, 125): "));
    assert!(!text.contains("Goodbye."));
}
