use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PASSWORD: &str = "correct horse battery staple";

/// A data directory with a fast KDF so backup tests stay quick
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"crypto":{"kdf":{"algorithm":"pbkdf2_sha256","iterations":1000}}}"#,
    )
    .unwrap();
    dir
}

fn finvault(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finvault").unwrap();
    cmd.env("FINVAULT_DATA_DIR", dir.path())
        .env("FINVAULT_PASSWORD", PASSWORD)
        .env_remove("FINVAULT_LOG");
    cmd
}

fn init(dir: &TempDir) {
    finvault(dir).arg("init").assert().success();
}

fn add(dir: &TempDir, args: &[&str]) {
    finvault(dir)
        .args(["transaction", "add"])
        .args(args)
        .assert()
        .success();
}

fn seed_january(dir: &TempDir) {
    add(dir, &["1000", "--category", "Salary", "--income", "--date", "2025-01-05"]);
    add(dir, &["300", "--category", "Food", "--date", "2025-01-20", "-m", "Groceries"]);
}

#[test]
fn init_seeds_default_categories() {
    let dir = workspace();
    init(&dir);

    finvault(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Yield"));
}

#[test]
fn flow_report_for_single_month() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);

    finvault(&dir)
        .args(["report", "flow", "--as-of", "2025-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01"))
        .stdout(predicate::str::contains("$700.00"))
        .stdout(predicate::str::contains("$1000.00"));
}

#[test]
fn flow_export_to_stdout() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);

    finvault(&dir)
        .args(["export", "flow", "--as-of", "2025-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "date,salary,monthlyYield,accumulatedYield,accumulatedBalance,totalWealth",
        ))
        .stdout(predicate::str::contains("2025-01,1000.00,0.00,0.00,700.00,1000.00"));
}

#[test]
fn transactions_export_with_semicolons() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);

    finvault(&dir)
        .args(["export", "transactions", "--delimiter", "semicolon"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id;description;amount;date;type;categoryId"))
        .stdout(predicate::str::contains(";Groceries;300.00;2025-01-20;EXPENSE;"));
}

#[test]
fn category_in_use_cannot_be_deleted() {
    let dir = workspace();
    init(&dir);
    finvault(&dir).args(["category", "add", "Coffee"]).assert().success();
    add(&dir, &["4.50", "--category", "Coffee", "--date", "2025-02-01"]);

    finvault(&dir)
        .args(["category", "delete", "Coffee"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("used by 1 transaction"));
}

#[test]
fn unused_category_can_be_deleted() {
    let dir = workspace();
    init(&dir);
    finvault(&dir).args(["category", "add", "Pets"]).assert().success();

    finvault(&dir)
        .args(["category", "delete", "Pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted category: Pets"));
}

#[test]
fn transaction_requires_known_category() {
    let dir = workspace();
    init(&dir);

    finvault(&dir)
        .args(["txn", "add", "10", "--category", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn expense_patterns_report() {
    let dir = workspace();
    init(&dir);
    add(&dir, &["100", "--category", "Food", "--date", "2025-01-06"]);
    add(&dir, &["100", "--category", "Food", "--date", "2025-01-13"]);
    add(&dir, &["50", "--category", "Food", "--date", "2025-01-07"]);

    finvault(&dir)
        .args(["report", "expenses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Peak weekday:    Monday"));
}

#[test]
fn backup_create_list_and_restore() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);

    finvault(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup-"));

    finvault(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));

    finvault(&dir)
        .args(["backup", "info", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("looks restorable"));

    // Add a transaction after the backup, then roll it back
    add(&dir, &["999", "--category", "Leisure", "--date", "2025-01-25"]);

    finvault(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    let backup = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .min()
        .unwrap();

    finvault(&dir)
        .args(["backup", "restore", &backup, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored (replace): 2 transactions"));

    finvault(&dir)
        .args(["export", "transactions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("999.00").not());
}

#[test]
fn restore_with_wrong_password_fails() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);
    finvault(&dir).args(["backup", "create"]).assert().success();

    finvault(&dir)
        .env("FINVAULT_PASSWORD", "not the password")
        .args(["backup", "restore", "latest", "--merge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password or corrupted backup"));
}

#[test]
fn backup_to_explicit_file_and_verify() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);
    let target = dir.path().join("ledger.backup.json");

    finvault(&dir)
        .args(["backup", "create", "--output"])
        .arg(&target)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&target).unwrap();
    assert!(contents.contains("\"encryptedData\""));
    assert!(contents.contains("\"dbVersion\": 1"));
    assert!(!contents.contains("Groceries"));

    finvault(&dir)
        .args(["backup", "verify"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions: 2"));
}

#[test]
fn config_shows_paths() {
    let dir = workspace();

    finvault(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup directory"))
        .stdout(predicate::str::contains("PBKDF2-SHA256 (1000 iterations)"));
}

#[test]
fn prune_previews_then_deletes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{
            "crypto": {"kdf": {"algorithm": "pbkdf2_sha256", "iterations": 1000}},
            "backup_retention": {"daily_count": 0, "monthly_count": 12}
        }"#,
    )
    .unwrap();
    init(&dir);
    seed_january(&dir);

    for _ in 0..2 {
        finvault(&dir)
            .args(["backup", "create", "--no-prune"])
            .assert()
            .success();
    }

    finvault(&dir)
        .args(["backup", "prune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expired: 1 (1 daily, 0 monthly)"))
        .stdout(predicate::str::contains("--force"));

    finvault(&dir)
        .args(["backup", "prune", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 backup(s)."));

    finvault(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s), 1 monthly"));
}

#[test]
fn mistyped_password_on_replace_restore_writes_nothing() {
    let dir = workspace();
    init(&dir);
    seed_january(&dir);
    finvault(&dir).args(["backup", "create"]).assert().success();

    finvault(&dir)
        .env("FINVAULT_PASSWORD", "typo")
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password or corrupted backup"));

    let backups = std::fs::read_dir(dir.path().join("backups")).unwrap().count();
    assert_eq!(backups, 1);

    finvault(&dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored (replace): 2 transactions"));
}
