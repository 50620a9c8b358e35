use std::fs;
use std::path::Path;

use hero_browser::{canonicalize_or_current, infer_workspace_name};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_joins_missing_paths_onto_cwd() {
    let tmp = tempdir().expect("tempdir");
    let nested = tmp.path().join("nested");
    fs::create_dir_all(&nested).expect("create nested");

    let existing = canonicalize_or_current(nested.to_str().unwrap()).expect("existing");
    assert_eq!(existing, nested.canonicalize().unwrap());

    let missing = canonicalize_or_current("does-not-exist-yet").expect("missing");
    assert!(missing.is_absolute());
    assert!(missing.ends_with("does-not-exist-yet"));
}

#[test]
fn infer_workspace_name_uses_last_path_component() {
    assert_eq!(infer_workspace_name(Path::new("/home/me/heroes-app")), "heroes-app");
    assert_eq!(infer_workspace_name(Path::new("/tmp/workspace-root")), "workspace-root");
}

#[test]
fn infer_workspace_name_falls_back_when_missing() {
    assert_eq!(infer_workspace_name(Path::new("/")), "unnamed-workspace");
}
