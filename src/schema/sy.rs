//! TachiyomiSY backup schema (also read and written for Neko backups).
//!
//! SY declares every field the other supported forks declare, which makes
//! it the merge output schema.

use super::{Entity, MessageDescriptor, Schema, SchemaDescriptor};
use crate::projection::Projectable;

use super::UpdateStrategy;

backup_message! {
    /// Root message of an SY backup file
    pub struct Backup {
        #[prost(message, repeated, tag = "1")]
        pub backup_manga: Vec<BackupManga> => "backupManga",
        #[prost(message, repeated, tag = "2")]
        pub backup_categories: Vec<BackupCategory> => "backupCategories",
        #[prost(message, repeated, tag = "101")]
        pub backup_sources: Vec<BackupSource> => "backupSources",
        #[prost(message, repeated, tag = "104")]
        pub backup_preferences: Vec<BackupPreference> => "backupPreferences",
        #[prost(message, repeated, tag = "105")]
        pub backup_source_preferences: Vec<BackupSourcePreferences> => "backupSourcePreferences",
        #[prost(message, repeated, tag = "106")]
        pub backup_extension_repo: Vec<BackupExtensionRepos> => "backupExtensionRepo",
        #[prost(message, repeated, tag = "600")]
        pub backup_saved_searches: Vec<BackupSavedSearch> => "backupSavedSearches",
    }
}

backup_message! {
    pub struct BackupManga {
        #[prost(int64, tag = "1")]
        pub source: i64 => "source",
        #[prost(string, tag = "2")]
        pub url: String => "url",
        #[prost(string, tag = "3")]
        pub title: String => "title",
        #[prost(string, tag = "4")]
        pub artist: String => "artist",
        #[prost(string, tag = "5")]
        pub author: String => "author",
        #[prost(string, tag = "6")]
        pub description: String => "description",
        #[prost(string, repeated, tag = "7")]
        pub genre: Vec<String> => "genre",
        #[prost(int32, tag = "8")]
        pub status: i32 => "status",
        #[prost(string, tag = "9")]
        pub thumbnail_url: String => "thumbnailUrl",
        #[prost(int64, tag = "13")]
        pub date_added: i64 => "dateAdded",
        #[prost(int32, tag = "14")]
        pub viewer: i32 => "viewer",
        #[prost(message, repeated, tag = "16")]
        pub chapters: Vec<BackupChapter> => "chapters",
        #[prost(int64, repeated, packed = "false", tag = "17")]
        pub categories: Vec<i64> => "categories",
        #[prost(message, repeated, tag = "18")]
        pub tracking: Vec<BackupTracking> => "tracking",
        #[prost(bool, tag = "100")]
        pub favorite: bool => "favorite",
        #[prost(int32, tag = "101")]
        pub chapter_flags: i32 => "chapterFlags",
        #[prost(int32, optional, tag = "103")]
        pub viewer_flags: Option<i32> => "viewer_flags",
        #[prost(message, repeated, tag = "104")]
        pub history: Vec<BackupHistory> => "history",
        #[prost(enumeration = "UpdateStrategy", tag = "105")]
        pub update_strategy: i32 => "updateStrategy",
        #[prost(int64, tag = "106")]
        pub last_modified_at: i64 => "lastModifiedAt",
        #[prost(int64, optional, tag = "107")]
        pub favorite_modified_at: Option<i64> => "favoriteModifiedAt",
        #[prost(string, repeated, tag = "108")]
        pub excluded_scanlators: Vec<String> => "excludedScanlators",
        #[prost(int64, tag = "109")]
        pub version: i64 => "version",
        #[prost(string, tag = "110")]
        pub notes: String => "notes",
        #[prost(int32, tag = "602")]
        pub custom_status: i32 => "customStatus",
        #[prost(string, optional, tag = "603")]
        pub custom_thumbnail_url: Option<String> => "customThumbnailUrl",
        #[prost(string, optional, tag = "800")]
        pub custom_title: Option<String> => "customTitle",
        #[prost(string, optional, tag = "801")]
        pub custom_artist: Option<String> => "customArtist",
        #[prost(string, optional, tag = "802")]
        pub custom_author: Option<String> => "customAuthor",
        #[prost(string, optional, tag = "803")]
        pub custom_description: Option<String> => "customDescription",
        #[prost(string, repeated, tag = "804")]
        pub custom_genre: Vec<String> => "customGenre",
    }
}

backup_message! {
    pub struct BackupChapter {
        #[prost(string, tag = "1")]
        pub url: String => "url",
        #[prost(string, tag = "2")]
        pub name: String => "name",
        #[prost(string, optional, tag = "3")]
        pub scanlator: Option<String> => "scanlator",
        #[prost(bool, optional, tag = "4")]
        pub read: Option<bool> => "read",
        #[prost(bool, optional, tag = "5")]
        pub bookmark: Option<bool> => "bookmark",
        #[prost(int64, optional, tag = "6")]
        pub last_page_read: Option<i64> => "lastPageRead",
        #[prost(int64, optional, tag = "7")]
        pub date_fetch: Option<i64> => "dateFetch",
        #[prost(int64, optional, tag = "8")]
        pub date_upload: Option<i64> => "dateUpload",
        #[prost(float, optional, tag = "9")]
        pub chapter_number: Option<f32> => "chapterNumber",
        #[prost(int64, optional, tag = "10")]
        pub source_order: Option<i64> => "sourceOrder",
        #[prost(int64, optional, tag = "11")]
        pub last_modified_at: Option<i64> => "lastModifiedAt",
        #[prost(int64, optional, tag = "12")]
        pub version: Option<i64> => "version",
    }
}

backup_message! {
    pub struct BackupHistory {
        #[prost(string, tag = "1")]
        pub url: String => "url",
        #[prost(int64, tag = "2")]
        pub last_read: i64 => "lastRead",
        #[prost(int64, optional, tag = "3")]
        pub read_duration: Option<i64> => "readDuration",
    }
}

backup_message! {
    pub struct BackupTracking {
        #[prost(int32, tag = "1")]
        pub sync_id: i32 => "syncId",
        #[prost(int64, tag = "2")]
        pub library_id: i64 => "libraryId",
        #[prost(int32, optional, tag = "3")]
        pub media_id_int: Option<i32> => "mediaIdInt",
        #[prost(string, optional, tag = "4")]
        pub tracking_url: Option<String> => "trackingUrl",
        #[prost(string, optional, tag = "5")]
        pub title: Option<String> => "title",
        #[prost(float, optional, tag = "6")]
        pub last_chapter_read: Option<f32> => "lastChapterRead",
        #[prost(int32, optional, tag = "7")]
        pub total_chapters: Option<i32> => "totalChapters",
        #[prost(float, optional, tag = "8")]
        pub score: Option<f32> => "score",
        #[prost(int32, optional, tag = "9")]
        pub status: Option<i32> => "status",
        #[prost(int64, optional, tag = "10")]
        pub started_reading_date: Option<i64> => "startedReadingDate",
        #[prost(int64, optional, tag = "11")]
        pub finished_reading_date: Option<i64> => "finishedReadingDate",
        #[prost(bool, optional, tag = "12")]
        pub private: Option<bool> => "private",
        #[prost(int64, optional, tag = "100")]
        pub media_id: Option<i64> => "mediaId",
    }
}

backup_message! {
    pub struct BackupCategory {
        #[prost(string, tag = "1")]
        pub name: String => "name",
        #[prost(int64, tag = "2")]
        pub order: i64 => "order",
        #[prost(int64, tag = "3")]
        pub id: i64 => "id",
        #[prost(int64, tag = "100")]
        pub flags: i64 => "flags",
    }
}

backup_message! {
    /// Maps a source id to its display name
    pub struct BackupSource {
        #[prost(string, tag = "1")]
        pub name: String => "name",
        #[prost(int64, tag = "2")]
        pub source_id: i64 => "sourceId",
    }
}

backup_message! {
    pub struct BackupExtensionRepos {
        #[prost(string, tag = "1")]
        pub base_url: String => "baseUrl",
        #[prost(string, tag = "2")]
        pub name: String => "name",
        #[prost(string, optional, tag = "3")]
        pub short_name: Option<String> => "shortName",
        #[prost(string, tag = "4")]
        pub website: String => "website",
        #[prost(string, tag = "5")]
        pub signing_key_fingerprint: String => "signingKeyFingerprint",
    }
}

backup_message! {
    /// Polymorphic preference value: type name plus its serialized payload
    pub struct PreferenceValue {
        #[prost(string, tag = "1")]
        pub r#type: String => "type",
        #[prost(bytes = "vec", tag = "2")]
        pub value: Vec<u8> => "value",
    }
}

backup_message! {
    pub struct BackupPreference {
        #[prost(string, tag = "1")]
        pub key: String => "key",
        #[prost(message, optional, tag = "2")]
        pub value: Option<PreferenceValue> => "value",
    }
}

backup_message! {
    pub struct BackupSourcePreferences {
        #[prost(string, tag = "1")]
        pub source_key: String => "sourceKey",
        #[prost(message, repeated, tag = "2")]
        pub prefs: Vec<BackupPreference> => "prefs",
    }
}

backup_message! {
    pub struct BackupSavedSearch {
        #[prost(string, tag = "1")]
        pub name: String => "name",
        #[prost(string, tag = "2")]
        pub query: String => "query",
        #[prost(string, tag = "3")]
        pub filter_list: String => "filterList",
        #[prost(int64, tag = "4")]
        pub source: i64 => "source",
    }
}

pub struct SySchema;

pub static SCHEMA: SySchema = SySchema;

impl SchemaDescriptor for SySchema {
    fn schema(&self) -> Schema {
        Schema::Sy
    }

    fn message(&self, entity: Entity) -> Option<&'static MessageDescriptor> {
        Some(match entity {
            Entity::Backup => Backup::descriptor(),
            Entity::Manga => BackupManga::descriptor(),
            Entity::Chapter => BackupChapter::descriptor(),
            Entity::History => BackupHistory::descriptor(),
            Entity::Tracking => BackupTracking::descriptor(),
            Entity::Category => BackupCategory::descriptor(),
            Entity::Source => BackupSource::descriptor(),
            Entity::ExtensionRepo => BackupExtensionRepos::descriptor(),
            Entity::Preference => BackupPreference::descriptor(),
            Entity::SourcePreferences => BackupSourcePreferences::descriptor(),
            Entity::SavedSearch => BackupSavedSearch::descriptor(),
        })
    }
}
