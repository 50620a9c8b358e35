use hero_core::config::{ClientConfig, ClientLayout};
use hero_core::favorites::{FavoritesStore, SqliteFavoritesBackend};
use hero_core::model::Hero;
use predicates::prelude::*;
use tempfile::tempdir;

/// An address nothing listens on, so network commands fail fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn init(root: &std::path::Path) {
    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .arg("init")
        .arg("--root")
        .arg(root)
        .arg("--name")
        .arg("TestWorkspace")
        .arg("--api-url")
        .arg(UNREACHABLE_API)
        .env_remove("HEROES_API_URL")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized hero-browser workspace"));
}

fn seed_favorite(root: &std::path::Path, hero: &Hero) {
    let layout = ClientLayout::new(root);
    let backend = SqliteFavoritesBackend::open(&layout.favorites_db_path).unwrap();
    let mut store = FavoritesStore::open(backend);
    store.toggle_favorite(hero);
}

#[test]
fn init_writes_config_and_favorites_db() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    let layout = ClientLayout::new(dir.path());
    assert!(layout.config_path.is_file());
    assert!(layout.favorites_db_path.is_file());

    let config: ClientConfig =
        serde_json::from_str(&std::fs::read_to_string(&layout.config_path).unwrap()).unwrap();
    assert_eq!(config.name, "TestWorkspace");
    assert_eq!(config.api_base_url, UNREACHABLE_API);
    assert_eq!(config.stale_time_secs, 300);
}

#[test]
fn init_uses_current_dir_when_root_omitted() {
    let dir = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    assert!(ClientLayout::new(dir.path()).is_initialized());
}

#[test]
fn info_fails_when_config_missing() {
    let dir = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .arg("info")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("hero-browser init"));
}

#[test]
fn info_json_reports_config_and_favorites() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    let output = assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .arg("info")
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .env_remove("HEROES_API_URL")
        .output()
        .expect("run info");
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(info["name"], "TestWorkspace");
    assert_eq!(info["effective_api_url"], UNREACHABLE_API);
    assert_eq!(info["favorite_count"], 0);
    assert_eq!(info["favorites_schema_version"], 1);
    assert_eq!(info["favorites_load"]["kind"], "never_saved");
}

#[test]
fn info_shows_env_override() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .arg("info")
        .arg("--root")
        .arg(dir.path())
        .env("HEROES_API_URL", "https://heroes.example")
        .assert()
        .success()
        .stdout(predicate::str::contains("HEROES_API_URL"))
        .stdout(predicate::str::contains("https://heroes.example"));
}

#[test]
fn favorites_list_starts_empty() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["favorites", "list", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorites yet."));
}

#[test]
fn favorites_toggle_removes_existing_without_backend() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());
    seed_favorite(dir.path(), &Hero::new("1", "Clark Kent").with_slug("clark-kent"));

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["favorites", "list", "--json", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slug\": \"clark-kent\""));

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["favorites", "toggle", "clark-kent", "--root"])
        .arg(dir.path())
        .env_remove("HEROES_API_URL")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Clark Kent (#1). Favorites: 0"));

    let backend =
        SqliteFavoritesBackend::open(&ClientLayout::new(dir.path()).favorites_db_path).unwrap();
    assert_eq!(FavoritesStore::open(backend).favorite_count(), 0);
}

#[test]
fn favorites_toggle_unknown_hero_fails_when_backend_unreachable() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["favorites", "toggle", "clark-kent", "--root"])
        .arg(dir.path())
        .env_remove("HEROES_API_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load hero 'clark-kent'"));
}

#[test]
fn favorites_clear_removes_everything() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());
    seed_favorite(dir.path(), &Hero::new("1", "Clark Kent"));
    seed_favorite(dir.path(), &Hero::new("2", "Bruce Wayne"));

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["favorites", "clear", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 favorite(s)."));
}

#[test]
fn list_reports_network_failure() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["list", "--query", "?page=2", "--root"])
        .arg(dir.path())
        .env_remove("HEROES_API_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load heroes"));
}

#[test]
fn verbose_flag_logs_to_stderr_only() {
    let dir = tempdir().expect("tempdir");
    init(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("hero-browser")
        .args(["--verbose", "info", "--json", "--root"])
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("HEROES_API_URL")
        .assert()
        .success()
        .stderr(predicate::str::contains("opening workspace"))
        .stdout(predicate::str::contains("opening workspace").not());
}
