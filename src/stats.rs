//! Library statistics shown by `tachibk info`.

use crate::convert::convert;
use crate::error::{BackupError, Result};
use crate::format::BackupFormat;
use crate::schema::{sy, TypedBackup};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub format: BackupFormat,
    pub total_manga: usize,
    pub favorites: usize,
    pub non_favorites: usize,
    pub categories: usize,
    pub sources: usize,
    pub extension_repos: usize,
    /// None for a backup without manga
    pub chapters: Option<ChapterStats>,
    pub manga_per_source: Vec<SourceCount>,
    pub top_genres: Vec<Ranked>,
    pub top_authors: Vec<Ranked>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterStats {
    pub total: usize,
    pub average: f64,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCount {
    pub source_id: i64,
    /// From the backup's source list, when present there
    pub name: Option<String>,
    pub manga: usize,
}

impl SourceCount {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("ID: {}", self.source_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub name: String,
    pub count: usize,
}

/// Count occurrences, most frequent first; ties keep first-seen order
fn rank<K: Hash + Eq>(items: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn top(items: impl IntoIterator<Item = String>) -> Vec<Ranked> {
    rank(items)
        .into_iter()
        .take(TOP_N)
        .map(|(name, count)| Ranked { name, count })
        .collect()
}

impl LibraryStats {
    /// Compute statistics on the superset view of `backup`
    pub fn from_backup(backup: &TypedBackup, format: BackupFormat) -> Result<Self> {
        if backup.schema() != format.schema() {
            return Err(BackupError::InvalidInput(format!(
                "backup holds a {:?} payload but was tagged {}",
                backup.schema(),
                format
            )));
        }

        let upcast;
        let library = match backup.as_sy() {
            Some(library) => library,
            None => {
                upcast = convert(backup, format, BackupFormat::SUPERSET)?;
                upcast.as_sy().ok_or_else(|| {
                    BackupError::Other("superset conversion produced a non-SY backup".to_string())
                })?
            }
        };

        Ok(Self::from_library(library, format))
    }

    fn from_library(library: &sy::Backup, format: BackupFormat) -> Self {
        let manga = &library.backup_manga;
        let favorites = manga.iter().filter(|m| m.favorite).count();

        let chapter_counts: Vec<usize> = manga.iter().map(|m| m.chapters.len()).collect();
        let chapters = (!chapter_counts.is_empty()).then(|| {
            let total: usize = chapter_counts.iter().sum();
            ChapterStats {
                total,
                average: total as f64 / chapter_counts.len() as f64,
                max: chapter_counts.iter().copied().max().unwrap_or(0),
            }
        });

        let source_names: IndexMap<i64, &str> = library
            .backup_sources
            .iter()
            .map(|s| (s.source_id, s.name.as_str()))
            .collect();
        let manga_per_source = rank(manga.iter().map(|m| m.source))
            .into_iter()
            .map(|(source_id, count)| SourceCount {
                source_id,
                name: source_names.get(&source_id).map(|name| name.to_string()),
                manga: count,
            })
            .collect();

        let top_genres = top(manga.iter().flat_map(|m| m.genre.iter().cloned()));
        let top_authors = top(
            manga
                .iter()
                .map(|m| m.author.trim().to_lowercase())
                .filter(|author| !author.is_empty()),
        );

        LibraryStats {
            format,
            total_manga: manga.len(),
            favorites,
            non_favorites: manga.len() - favorites,
            categories: library.backup_categories.len(),
            sources: library.backup_sources.len(),
            extension_repos: library.backup_extension_repo.len(),
            chapters,
            manga_per_source,
            top_genres,
            top_authors,
        }
    }
}

impl fmt::Display for LibraryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detected Format: {}", self.format)?;

        writeln!(f, "\n=== General Stats ===")?;
        writeln!(f, "Total Manga       : {}", self.total_manga)?;
        writeln!(f, "Categories        : {}", self.categories)?;
        writeln!(f, "Sources Used      : {}", self.sources)?;
        writeln!(f, "Extension Repos   : {}", self.extension_repos)?;

        writeln!(f, "\n=== Library ===")?;
        writeln!(f, "Favorites         : {}", self.favorites)?;
        writeln!(f, "Non-Favorites     : {}", self.non_favorites)?;

        if let Some(chapters) = &self.chapters {
            writeln!(f, "\n=== Chapters ===")?;
            writeln!(f, "Total Chapters    : {}", chapters.total)?;
            writeln!(f, "Average per Manga : {:.1}", chapters.average)?;
            writeln!(f, "Max Chapters      : {}", chapters.max)?;
        }

        writeln!(f, "\n=== Sources Used ===")?;
        for source in &self.manga_per_source {
            writeln!(f, "  - {:<20} : {} manga", source.display_name(), source.manga)?;
        }

        if !self.top_genres.is_empty() {
            writeln!(f, "\n=== Top Genres ===")?;
            for genre in &self.top_genres {
                writeln!(f, "  - {:<20} : {}", genre.name, genre.count)?;
            }
        }

        if !self.top_authors.is_empty() {
            writeln!(f, "\n=== Top Authors ===")?;
            for author in &self.top_authors {
                writeln!(f, "  - {:<20} : {}", author.name, author.count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mihon;

    fn manga(source: i64, author: &str, genres: &[&str], chapters: usize, favorite: bool) -> sy::BackupManga {
        sy::BackupManga {
            source,
            url: format!("/{}/{}", source, author),
            author: author.to_string(),
            genre: genres.iter().map(|g| g.to_string()).collect(),
            chapters: (0..chapters)
                .map(|i| sy::BackupChapter {
                    url: format!("/c{}", i),
                    ..Default::default()
                })
                .collect(),
            favorite,
            ..Default::default()
        }
    }

    #[test]
    fn test_library_stats() {
        let backup = TypedBackup::Sy(sy::Backup {
            backup_manga: vec![
                manga(1, "Oda ", &["Action", "Comedy"], 4, true),
                manga(2, "oda", &["Action"], 0, false),
                manga(2, "Araki", &["Drama"], 2, true),
            ],
            backup_sources: vec![sy::BackupSource {
                name: "MangaDex".to_string(),
                source_id: 2,
            }],
            ..Default::default()
        });

        let stats = LibraryStats::from_backup(&backup, BackupFormat::Sy).unwrap();
        assert_eq!(stats.total_manga, 3);
        assert_eq!(stats.favorites, 2);
        assert_eq!(stats.non_favorites, 1);

        let chapters = stats.chapters.clone().unwrap();
        assert_eq!(chapters.total, 6);
        assert_eq!(chapters.max, 4);
        assert!((chapters.average - 2.0).abs() < f64::EPSILON);

        assert_eq!(stats.manga_per_source[0].source_id, 2);
        assert_eq!(stats.manga_per_source[0].display_name(), "MangaDex");
        assert_eq!(stats.manga_per_source[1].display_name(), "ID: 1");

        assert_eq!(stats.top_genres[0], Ranked { name: "Action".to_string(), count: 2 });
        assert_eq!(stats.top_authors[0], Ranked { name: "oda".to_string(), count: 2 });
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = rank(vec!["b", "a", "a", "b", "c"]);
        assert_eq!(ranked, vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_empty_backup_has_no_chapter_stats() {
        let backup = TypedBackup::Mihon(mihon::Backup::default());
        let stats = LibraryStats::from_backup(&backup, BackupFormat::Mihon).unwrap();
        assert_eq!(stats.total_manga, 0);
        assert!(stats.chapters.is_none());
        assert!(!stats.to_string().contains("=== Chapters ==="));
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let backup = TypedBackup::Mihon(mihon::Backup::default());
        let stats = LibraryStats::from_backup(&backup, BackupFormat::Mihon).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalManga"], 0);
        assert_eq!(json["format"], "mihon");
    }
}
