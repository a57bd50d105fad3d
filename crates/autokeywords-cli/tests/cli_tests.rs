//! Integration tests for the autokeywords binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = "\
# DEFAULT_MODEL=big/a
big/a|🏆 Big A (best)|flagship|large
tiny/a|⚡ Tiny A (fast)|lightweight|small
";

struct TestEnv {
    dir: TempDir,
    db_path: PathBuf,
    catalog_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.sqlite");
        let catalog_path = dir.path().join("models.txt");
        fs::write(&catalog_path, CATALOG).unwrap();
        Self {
            dir,
            db_path,
            catalog_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("autokeywords").unwrap();
        cmd.env("AUTOKEYWORDS_DB", &self.db_path)
            .env("AUTOKEYWORDS_CATALOG", &self.catalog_path)
            // nothing listens on the discard port
            .env("AUTOKEYWORDS_API_URL", "http://127.0.0.1:9")
            .env_remove("AUTOKEYWORDS_API_KEY")
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("HOME", self.dir.path());
        cmd
    }

    fn add_item(&self, title: &str) {
        self.cmd()
            .args(["item", "add", "--title", title, "--body", "<p>Some body</p>"])
            .assert()
            .success();
    }
}

#[test]
fn test_item_add_and_show() {
    let env = TestEnv::new();

    env.cmd()
        .args(["item", "add", "--type", "page", "--title", "About us"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added item #1"));

    env.cmd()
        .args(["item", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 [page] About us"))
        .stdout(predicate::str::contains("Keywords:  (none)"));

    env.cmd()
        .args(["item", "list", "--type", "post"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items"));
}

#[test]
fn test_item_show_missing_exits_not_found() {
    let env = TestEnv::new();
    env.cmd()
        .args(["item", "show", "42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Item not found: 42"));
}

#[test]
fn test_config_set_and_show() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "set", "keyword_count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set keyword_count = 5"));

    env.cmd()
        .args(["config", "set", "api_key", "sk-0123456789abcdefghijklmnop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-0123456...ghijklmnop"))
        .stdout(predicate::str::contains("abcdef").not());

    env.cmd()
        .args(["--format", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"keyword_count\": 5"))
        .stdout(predicate::str::contains("\"model\": \"big/a\""))
        .stdout(predicate::str::contains("\"api_key_exists\": true"));
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set", "keyword_count", "500"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("keyword_count must be between 1 and 50"));
}

#[test]
fn test_generate_without_api_key_fails() {
    let env = TestEnv::new();
    env.add_item("Hello");

    env.cmd()
        .args(["generate", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("API key is not set"));
}

#[test]
fn test_failed_models_are_excluded_and_restorable() {
    let env = TestEnv::new();
    env.add_item("Hello");
    env.cmd()
        .args(["config", "set", "api_key", "sk-test"])
        .assert()
        .success();

    // both catalog models fail with a transport error
    env.cmd()
        .args(["generate", "1", "--save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API connection error"))
        .stderr(predicate::str::contains(
            "no other available model could process the request",
        ));

    env.cmd()
        .args(["models", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"big/a\s+flagship\s+excluded").unwrap())
        .stdout(predicate::str::is_match(r"tiny/a\s+lightweight\s+excluded").unwrap())
        .stdout(predicate::str::contains("(1 total)"));

    env.cmd()
        .args(["models", "available"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No models available"));

    env.cmd()
        .args(["models", "restore", "tiny/a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored model 'tiny/a'"));

    env.cmd()
        .args(["models", "restore-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 1 models"));

    env.cmd()
        .args(["--format", "json", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"excluded_model_count\": 0"))
        .stdout(predicate::str::contains("\"pending_keywords\": 1"));
}

#[test]
fn test_restore_unknown_model() {
    let env = TestEnv::new();
    env.cmd()
        .args(["models", "restore", "nobody/none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not excluded"));
}

#[test]
fn test_tags_without_keywords_fail() {
    let env = TestEnv::new();
    env.add_item("Hello");

    env.cmd()
        .args(["tags", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No keywords"));

    env.cmd()
        .args(["--format", "json", "bulk", "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_hand_edited_keywords_become_tags() {
    let env = TestEnv::new();
    env.add_item("Hello");

    env.cmd()
        .args(["item", "keywords", "1", "  Rust, SQLite  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved keywords for item #1"));

    env.cmd()
        .args(["item", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keywords:  Rust, SQLite"));

    env.cmd()
        .args(["tags", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 2 tags on item #1 (2 new)"))
        .stdout(predicate::str::contains("Rust, SQLite"));
}

#[test]
fn test_item_keywords_for_missing_item() {
    let env = TestEnv::new();
    env.cmd()
        .args(["item", "keywords", "7", "Rust"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Item not found: 7"));
}

#[test]
fn test_status_on_empty_database() {
    let env = TestEnv::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Items:           0"))
        .stdout(predicate::str::contains("API key:         not set"));
}
