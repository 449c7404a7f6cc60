use super::*;
use crate::schema::{j2k, mihon};

fn sy_manga(source: i64, url: &str, favorite: bool, chapters: &[&str]) -> sy::BackupManga {
    sy::BackupManga {
        source,
        url: url.to_string(),
        title: url.trim_start_matches('/').to_string(),
        favorite,
        chapters: chapters
            .iter()
            .map(|c| sy::BackupChapter {
                url: c.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn mihon_manga(source: i64, url: &str, favorite: bool, chapters: &[&str]) -> mihon::BackupManga {
    mihon::BackupManga {
        source,
        url: url.to_string(),
        favorite,
        chapters: chapters
            .iter()
            .map(|c| mihon::BackupChapter {
                url: c.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn sy_backup(manga: Vec<sy::BackupManga>) -> TypedBackup {
    TypedBackup::Sy(sy::Backup {
        backup_manga: manga,
        ..Default::default()
    })
}

fn chapter_urls(manga: &sy::BackupManga) -> Vec<&str> {
    manga.chapters.iter().map(|c| c.url.as_str()).collect()
}

#[test]
fn test_empty_input_is_rejected() {
    let err = merge(Vec::new()).unwrap_err();
    assert!(matches!(err, BackupError::InvalidInput(_)));
}

#[test]
fn test_single_input_is_identity() {
    let backup = sy_backup(vec![sy_manga(1, "/a", false, &["c1"])]);
    let merged = merge(vec![(backup.clone(), BackupFormat::Sy)]).unwrap();
    assert_eq!(merged, backup);
}

#[test]
fn test_favorite_duplicate_replaces_wholesale() {
    let first = sy_backup(vec![sy_manga(1, "/a", false, &["c1", "c2"])]);
    let second = TypedBackup::Mihon(mihon::Backup {
        backup_manga: vec![mihon_manga(1, "/a", true, &["c1"])],
        ..Default::default()
    });

    let (merged, summary) = merge_with_summary(vec![
        (first, BackupFormat::Sy),
        (second, BackupFormat::Mihon),
    ])
    .unwrap();

    let merged = merged.into_sy().unwrap();
    assert_eq!(merged.backup_manga.len(), 1);
    assert!(merged.backup_manga[0].favorite);
    assert_eq!(chapter_urls(&merged.backup_manga[0]), vec!["c1"]);
    assert_eq!(summary.favorite_upgrades, 1);
    assert_eq!(summary.duplicates_kept, 0);
}

#[test]
fn test_favorite_is_never_downgraded() {
    let first = sy_backup(vec![sy_manga(1, "/a", true, &["c1"])]);
    let second = sy_backup(vec![sy_manga(1, "/a", false, &["c1", "c2"])]);

    let merged = merge(vec![(first, BackupFormat::Sy), (second, BackupFormat::Sy)])
        .unwrap()
        .into_sy()
        .unwrap();

    assert!(merged.backup_manga[0].favorite);
    assert_eq!(chapter_urls(&merged.backup_manga[0]), vec!["c1"]);
}

#[test]
fn test_equal_favorite_keeps_first_occurrence() {
    let first = sy_backup(vec![sy_manga(1, "/a", true, &["c1", "c2"])]);
    let second = sy_backup(vec![sy_manga(1, "/a", true, &["c3"])]);

    let (merged, summary) =
        merge_with_summary(vec![(first, BackupFormat::Sy), (second, BackupFormat::Sy)]).unwrap();

    let merged = merged.into_sy().unwrap();
    assert_eq!(chapter_urls(&merged.backup_manga[0]), vec!["c1", "c2"]);
    assert_eq!(summary.duplicates_kept, 1);
}

#[test]
fn test_upgrade_keeps_original_position() {
    let first = sy_backup(vec![
        sy_manga(1, "/a", false, &[]),
        sy_manga(1, "/b", true, &[]),
    ]);
    let second = sy_backup(vec![sy_manga(2, "/c", true, &[]), sy_manga(1, "/a", true, &[])]);

    let merged = merge(vec![(first, BackupFormat::Sy), (second, BackupFormat::Sy)])
        .unwrap()
        .into_sy()
        .unwrap();

    let keys: Vec<(i64, &str)> = merged
        .backup_manga
        .iter()
        .map(|m| (m.source, m.url.as_str()))
        .collect();
    assert_eq!(keys, vec![(1, "/a"), (1, "/b"), (2, "/c")]);
    assert!(merged.backup_manga[0].favorite);
}

#[test]
fn test_same_url_different_source_are_distinct() {
    let first = sy_backup(vec![sy_manga(1, "/a", false, &[])]);
    let second = sy_backup(vec![sy_manga(2, "/a", false, &[])]);

    let (merged, summary) =
        merge_with_summary(vec![(first, BackupFormat::Sy), (second, BackupFormat::Sy)]).unwrap();
    assert_eq!(merged.manga_count(), 2);
    assert_eq!(summary.unique_manga, 2);
    assert_eq!(summary.manga_seen, 2);
}

#[test]
fn test_auxiliary_lists_are_concatenated() {
    let first = TypedBackup::Sy(sy::Backup {
        backup_categories: vec![sy::BackupCategory {
            name: "Reading".to_string(),
            ..Default::default()
        }],
        backup_sources: vec![sy::BackupSource {
            name: "MangaDex".to_string(),
            source_id: 1,
        }],
        backup_extension_repo: vec![sy::BackupExtensionRepos {
            base_url: "https://sy.example".to_string(),
            name: "sy-repo".to_string(),
            ..Default::default()
        }],
        backup_saved_searches: vec![sy::BackupSavedSearch {
            name: "Done".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    });
    let second = TypedBackup::J2k(j2k::Backup {
        backup_categories: vec![j2k::BackupCategory {
            name: "Reading".to_string(),
            ..Default::default()
        }],
        backup_sources: vec![j2k::BackupSource {
            name: "MangaDex".to_string(),
            source_id: 1,
        }],
        backup_preferences: vec![j2k::BackupPreference {
            key: "j2k_theme".to_string(),
            value: None,
        }],
        ..Default::default()
    });
    let third = TypedBackup::Mihon(mihon::Backup {
        backup_extension_repo: vec![mihon::BackupExtensionRepos {
            base_url: "https://mihon.example".to_string(),
            name: "mihon-repo".to_string(),
            short_name: Some("mr".to_string()),
            ..Default::default()
        }],
        backup_preferences: vec![mihon::BackupPreference {
            key: "mihon_theme".to_string(),
            value: Some(mihon::PreferenceValue {
                r#type: "StringPreferenceValue".to_string(),
                value: b"dark".to_vec(),
            }),
        }],
        backup_source_preferences: vec![mihon::BackupSourcePreferences {
            source_key: "source_42".to_string(),
            prefs: vec![mihon::BackupPreference {
                key: "lang".to_string(),
                value: None,
            }],
        }],
        ..Default::default()
    });

    let merged = merge(vec![
        (first, BackupFormat::Sy),
        (second, BackupFormat::J2k),
        (third, BackupFormat::Mihon),
    ])
    .unwrap()
    .into_sy()
    .unwrap();

    // duplicates are kept as-is
    assert_eq!(merged.backup_categories.len(), 2);
    assert_eq!(merged.backup_sources.len(), 2);
    assert_eq!(merged.backup_saved_searches.len(), 1);

    let repos: Vec<&str> = merged
        .backup_extension_repo
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(repos, vec!["sy-repo", "mihon-repo"]);
    assert_eq!(merged.backup_extension_repo[1].short_name.as_deref(), Some("mr"));

    let prefs: Vec<&str> = merged
        .backup_preferences
        .iter()
        .map(|p| p.key.as_str())
        .collect();
    assert_eq!(prefs, vec!["j2k_theme", "mihon_theme"]);
    assert_eq!(
        merged.backup_preferences[1].value.as_ref().map(|v| v.value.as_slice()),
        Some(&b"dark"[..])
    );

    assert_eq!(merged.backup_source_preferences.len(), 1);
    assert_eq!(merged.backup_source_preferences[0].source_key, "source_42");
    assert_eq!(merged.backup_source_preferences[0].prefs[0].key, "lang");
}

#[test]
fn test_non_superset_inputs_are_upcast() {
    let j2k = TypedBackup::J2k(j2k::Backup {
        backup_manga: vec![j2k::BackupManga {
            source: 4,
            url: "/j".to_string(),
            custom_title: Some("Local".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    });

    let merged = merge(vec![(j2k, BackupFormat::J2k)]).unwrap().into_sy().unwrap();
    assert_eq!(merged.backup_manga[0].custom_title.as_deref(), Some("Local"));
}

#[test]
fn test_bad_input_reports_its_index() {
    let good = sy_backup(vec![sy_manga(1, "/a", false, &[])]);
    let mislabeled = TypedBackup::Mihon(mihon::Backup::default());

    let err = merge(vec![(good, BackupFormat::Sy), (mislabeled, BackupFormat::J2k)]).unwrap_err();
    assert_eq!(err.merge_input_index(), Some(1));
    match err {
        BackupError::MergeInput { source, .. } => {
            assert!(matches!(*source, BackupError::InvalidInput(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_url_is_invalid() {
    let backup = sy_backup(vec![sy_manga(1, "/a", false, &[]), sy_manga(1, "", false, &[])]);
    let err = merge(vec![(backup, BackupFormat::Sy)]).unwrap_err();
    assert_eq!(err.merge_input_index(), Some(0));
    assert!(err.to_string().contains("backupManga[1]"));
}

#[test]
fn test_merger_is_untouched_by_rejected_input() {
    let mut merger = Merger::new();
    merger
        .absorb(0, sy_backup(vec![sy_manga(1, "/a", false, &[])]), BackupFormat::Sy)
        .unwrap();

    let bad = sy_backup(vec![sy_manga(1, "/b", false, &[]), sy_manga(1, "", false, &[])]);
    assert!(merger.absorb(1, bad, BackupFormat::Sy).is_err());

    let (backup, summary) = merger.finish();
    assert_eq!(backup.backup_manga.len(), 1);
    assert_eq!(summary.inputs, 1);
}
