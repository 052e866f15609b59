use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

const SEED: &str = "ammo add 2 5.56mm Ball
item add 1 G 10 5 3
equip add 7 0 0 M4 Carbine
load add 1 1
eitem add 1 AE 30
unit add 1st Battalion
ex add Steel Knight
edl add 1 1 1
";

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("mlpt").expect("mlpt binary");
    cmd.env_remove("MLPT_DATABASE")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_reports_exercise_totals() {
    let script = format!("{SEED}totals 1\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Created exercise 1: Steel Knight"))
        .stdout(str_contains("base_allowance=600"))
        .stdout(str_contains("daily_sustain=180"))
        .stdout(str_contains("equipment=30"));
}

#[test]
fn cli_lists_combat_loads() {
    let script = format!("{SEED}load list 1\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("5.56mm Ball"))
        .stdout(str_contains("base=10"));
}

#[test]
fn cli_delete_ammo_cascades_into_totals() {
    let script = format!("{SEED}ammo delete 1\ntotals 1\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Deleted ammo 1."))
        .stdout(str_contains("base_allowance=0"));
}

#[test]
fn cli_shows_edl_table_and_summary() {
    let script = format!("{SEED}edl show 1\nsummary 1 unit\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Steel Knight  1st Battalion  M4 Carbine"))
        .stdout(str_contains("| equipment_weight"))
        .stdout(str_contains("1st Battalion"));
}

#[test]
fn cli_reports_usage_and_invalid_input() {
    run_cli("ammo add\nitem add 1 X 1 1 1\nfrobnicate\nquit\n")
        .success()
        .stdout(str_contains("Usage: ammo add <weight> <name...>"))
        .stdout(str_contains("Invalid unit type 'X'"))
        .stdout(str_contains("Unknown command 'frobnicate'"));
}

#[test]
fn cli_reports_missing_references() {
    run_cli("eitem add 9 AE 1\nunit delete 3\nquit\n")
        .success()
        .stdout(str_contains("FOREIGN KEY constraint failed"))
        .stdout(str_contains("Unit 3 not found."));
}

#[test]
fn cli_save_json_and_export_csv() {
    let json = NamedTempFile::new().expect("create temp file");
    let csv = NamedTempFile::new().expect("create temp file");
    let script = format!(
        "{SEED}save json {}\nexport csv 1 {}\nquit\n",
        json.path().display(),
        csv.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Snapshot saved to"))
        .stdout(str_contains("Exported 1 EDL lines"));

    let restore = format!("load json {}\ntotals 1\nquit\n", json.path().display());
    run_cli(&restore)
        .success()
        .stdout(str_contains("Snapshot loaded from"))
        .stdout(str_contains("base_allowance=600"));
}

#[test]
fn cli_uses_configured_database_file() {
    let db = NamedTempFile::new().expect("create temp file");
    #[allow(deprecated)]
    let mut first = Command::cargo_bin("mlpt").expect("mlpt binary");
    first
        .env("MLPT_DATABASE", db.path())
        .write_stdin(format!("{SEED}quit\n"))
        .assert()
        .success();

    #[allow(deprecated)]
    let mut second = Command::cargo_bin("mlpt").expect("mlpt binary");
    second
        .env("MLPT_DATABASE", db.path())
        .write_stdin("ex list\ntotals 1\nquit\n")
        .assert()
        .success()
        .stdout(str_contains("Steel Knight"))
        .stdout(str_contains("base_allowance=600"));
}

#[test]
fn cli_updates_records_and_totals_follow() {
    let script = format!(
        "{SEED}ammo update 1 4 5.56mm Link\nitem update 1 G 20 5 3\nunit rename 1 2nd Battalion\nex rename 1 Iron Knight\nammo list\nitem list\nex list\ntotals 1\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Updated ammo 1: 5.56mm Link"))
        .stdout(str_contains("Updated ammo item 1."))
        .stdout(str_contains("Renamed unit 1 to 2nd Battalion."))
        .stdout(str_contains("Renamed exercise 1 to Iron Knight."))
        .stdout(str_contains("type=G (Ground Combat Element) base=20"))
        // 4 lb x 20 rounds x 30 carbines
        .stdout(str_contains("base_allowance=2400"));
}

#[test]
fn cli_removes_links_and_items() {
    let script = format!(
        "{SEED}load remove 1\ntotals 1\nex detach 1 1\nex detach 1 1\nex units 1\neitem delete 1\nitem delete 1\nload remove 1\nedl show 1\ntotals 1\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Removed combat load 1."))
        .stdout(str_contains("base_allowance=0"))
        .stdout(str_contains("Unit 1 detached from exercise 1."))
        .stdout(str_contains("Unit 1 is not attached to exercise 1."))
        .stdout(str_contains("Deleted equipment item 1."))
        .stdout(str_contains("Deleted ammo item 1."))
        .stdout(str_contains("Combat load 1 not found."))
        .stdout(str_contains("equipment=0"));
}

#[test]
fn cli_help_lists_codes() {
    run_cli("help\nquit\n")
        .success()
        .stdout(str_contains("ex detach <exercise_id> <unit_id>"))
        .stdout(str_contains("AFOE Assault Follow-On Element"))
        .stdout(str_contains("N    Non-Ground Combat Element"));
}
