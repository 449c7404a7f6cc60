/// Conversion between fork formats through the public library API

use tachibk_converter::archive;
use tachibk_converter::convert::{convert, convert_with_report};
use tachibk_converter::format::BackupFormat;
use tachibk_converter::schema::{j2k, mihon, sy, TypedBackup, UpdateStrategy};

fn sy_library() -> sy::Backup {
    sy::Backup {
        backup_manga: vec![
            sy::BackupManga {
                source: 6247824327199706550,
                url: "/manga/berserk".to_string(),
                title: "Berserk".to_string(),
                author: "Miura".to_string(),
                genre: vec!["Dark Fantasy".to_string()],
                favorite: true,
                date_added: 1_650_000_000_000,
                chapters: vec![sy::BackupChapter {
                    url: "/c/1".to_string(),
                    name: "The Black Swordsman".to_string(),
                    read: Some(true),
                    last_page_read: Some(0),
                    chapter_number: Some(1.0),
                    last_modified_at: Some(1_650_000_100_000),
                    ..Default::default()
                }],
                tracking: vec![sy::BackupTracking {
                    sync_id: 1,
                    library_id: 99,
                    status: Some(2),
                    private: Some(true),
                    ..Default::default()
                }],
                update_strategy: UpdateStrategy::OnlyFetchOnce as i32,
                notes: "finish before the movie".to_string(),
                custom_title: Some("Berserk (Deluxe)".to_string()),
                custom_genre: vec!["Seinen".to_string()],
                ..Default::default()
            },
            sy::BackupManga {
                source: 1,
                url: "/local/doujin".to_string(),
                title: "Local".to_string(),
                ..Default::default()
            },
        ],
        backup_categories: vec![sy::BackupCategory {
            name: "Favorites".to_string(),
            order: 0,
            id: 1,
            flags: 64,
        }],
        backup_extension_repo: vec![sy::BackupExtensionRepos {
            base_url: "https://repo.example/index".to_string(),
            name: "Example".to_string(),
            short_name: Some("ex".to_string()),
            website: "https://repo.example".to_string(),
            signing_key_fingerprint: "00ff".to_string(),
        }],
        backup_saved_searches: vec![sy::BackupSavedSearch {
            name: "Ongoing".to_string(),
            query: "status:ongoing".to_string(),
            filter_list: "[]".to_string(),
            source: 6247824327199706550,
        }],
        ..Default::default()
    }
}

#[test]
fn test_same_format_conversion_is_identity() {
    let backups = [
        (TypedBackup::Sy(sy_library()), BackupFormat::Sy),
        (TypedBackup::Sy(sy_library()), BackupFormat::Neko),
        (
            convert(&TypedBackup::Sy(sy_library()), BackupFormat::Sy, BackupFormat::Mihon).unwrap(),
            BackupFormat::Mihon,
        ),
        (
            convert(&TypedBackup::Sy(sy_library()), BackupFormat::Sy, BackupFormat::J2k).unwrap(),
            BackupFormat::J2k,
        ),
    ];

    for (backup, format) in backups {
        let converted = convert(&backup, format, format).unwrap();
        assert_eq!(converted, backup, "{format} round trip changed the backup");
    }
}

#[test]
fn test_notes_do_not_survive_a_subset_hop() {
    let original = TypedBackup::Sy(sy_library());

    let mihon = convert(&original, BackupFormat::Sy, BackupFormat::Mihon).unwrap();
    let back = convert(&mihon, BackupFormat::Mihon, BackupFormat::Sy)
        .unwrap()
        .into_sy()
        .unwrap();

    assert_eq!(back.backup_manga[0].notes, "");
    assert_eq!(back.backup_manga[0].custom_title, None);
    assert!(back.backup_manga[0].custom_genre.is_empty());
    assert!(back.backup_saved_searches.is_empty());

    // shared fields come back untouched
    assert_eq!(back.backup_manga[0].title, "Berserk");
    assert_eq!(back.backup_manga[0].update_strategy(), UpdateStrategy::OnlyFetchOnce);
    assert_eq!(back.backup_manga[0].chapters[0].last_page_read, Some(0));
    assert_eq!(back.backup_extension_repo.len(), 1);
}

#[test]
fn test_drops_accumulate_across_hops() {
    let original = TypedBackup::Sy(sy_library());

    let j2k = convert(&original, BackupFormat::Sy, BackupFormat::J2k).unwrap();
    let mihon = convert(&j2k, BackupFormat::J2k, BackupFormat::Mihon).unwrap();
    let back = convert(&mihon, BackupFormat::Mihon, BackupFormat::Sy)
        .unwrap()
        .into_sy()
        .unwrap();

    let manga = &back.backup_manga[0];
    // J2K has no updateStrategy or private flag, Mihon cannot restore them
    assert_eq!(manga.update_strategy, 0);
    assert_eq!(manga.tracking[0].private, None);
    assert_eq!(manga.chapters[0].last_modified_at, None);
    assert!(back.backup_extension_repo.is_empty());
}

#[test]
fn test_report_lists_each_dropped_path_once() {
    let report = convert_with_report(
        &TypedBackup::Sy(sy_library()),
        BackupFormat::Sy,
        BackupFormat::J2k,
    )
    .unwrap();

    let paths: Vec<&str> = report.dropped.iter().map(|d| d.path.as_str()).collect();
    for expected in [
        "backupExtensionRepo",
        "backupSavedSearches",
        "backupManga.notes",
        "backupManga.updateStrategy",
        "backupManga.chapters.lastModifiedAt",
        "backupManga.tracking.private",
        "backupCategories.id",
    ] {
        assert_eq!(
            paths.iter().filter(|p| **p == expected).count(),
            1,
            "{expected} should be reported exactly once"
        );
    }
    // customTitle exists in J2K under the same name
    assert!(!paths.contains(&"backupManga.customTitle"));
}

#[test]
fn test_j2k_custom_fields_reach_sy() {
    let j2k = TypedBackup::J2k(j2k::Backup {
        backup_manga: vec![j2k::BackupManga {
            source: 3,
            url: "/j".to_string(),
            custom_title: Some("Renamed".to_string()),
            custom_status: 2,
            ..Default::default()
        }],
        ..Default::default()
    });

    let sy = convert(&j2k, BackupFormat::J2k, BackupFormat::Neko)
        .unwrap()
        .into_sy()
        .unwrap();
    assert_eq!(sy.backup_manga[0].custom_title.as_deref(), Some("Renamed"));
    assert_eq!(sy.backup_manga[0].custom_status, 2);
}

#[test]
fn test_file_roundtrip_through_conversion() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("library_mihon.tachibk");

    let mihon = TypedBackup::Mihon(mihon::Backup {
        backup_manga: vec![mihon::BackupManga {
            source: 2,
            url: "/m".to_string(),
            favorite_modified_at: Some(0),
            ..Default::default()
        }],
        ..Default::default()
    });
    archive::save_backup(&mihon, &path).unwrap();

    let loaded = archive::load_backup(&path, None, BackupFormat::Sy).unwrap();
    assert_eq!(loaded.format, BackupFormat::Mihon);

    let sy = convert(&loaded.backup, loaded.format, BackupFormat::Sy)
        .unwrap()
        .into_sy()
        .unwrap();
    assert_eq!(sy.backup_manga[0].favorite_modified_at, Some(0));
}
