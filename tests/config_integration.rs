//! Round-trips the rc-file config through the filesystem.

use std::fs;

use tempfile::tempdir;

use markpad::config::{
    ConfigFlags, clear_config_flags, load_config_flags, parse_flag_tokens, save_config_flags,
};

#[test]
fn saved_defaults_survive_a_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config");

    let flags = ConfigFlags {
        no_preview: true,
        split: Some(65),
    };
    save_config_flags(&path, &flags).unwrap();

    let loaded = load_config_flags(&path).unwrap();
    assert_eq!(loaded, flags);
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("markpad").join("config");

    save_config_flags(&path, &ConfigFlags::default()).unwrap();
    assert!(path.exists());
}

#[test]
fn local_override_wins_over_global_for_split() {
    let dir = tempdir().unwrap();
    let global = dir.path().join("global");
    let local = dir.path().join(".markpadrc");

    save_config_flags(
        &global,
        &ConfigFlags {
            no_preview: false,
            split: Some(40),
        },
    )
    .unwrap();
    save_config_flags(
        &local,
        &ConfigFlags {
            no_preview: true,
            split: Some(70),
        },
    )
    .unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert!(merged.no_preview);
    assert_eq!(merged.split, Some(70));
}

#[test]
fn hand_written_rc_file_parses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    fs::write(&path, "# my defaults\n--split=35\n--no-preview\n").unwrap();

    let loaded = load_config_flags(&path).unwrap();
    assert!(loaded.no_preview);
    assert_eq!(loaded.split, Some(35));
}

#[test]
fn unknown_tokens_are_ignored() {
    let tokens = vec![
        "--verbose".to_string(),
        "--split".to_string(),
        "55".to_string(),
        "extra.md".to_string(),
    ];
    let flags = parse_flag_tokens(&tokens);
    assert!(!flags.no_preview);
    assert_eq!(flags.split, Some(55));
}

#[test]
fn clear_removes_the_file_and_tolerates_absence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config");

    save_config_flags(&path, &ConfigFlags::default()).unwrap();
    clear_config_flags(&path).unwrap();
    assert!(!path.exists());

    // Clearing again must not error.
    clear_config_flags(&path).unwrap();
}
