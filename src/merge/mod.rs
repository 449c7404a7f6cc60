//! Merge several backups into one superset-format backup.
//!
//! Manga are deduplicated by `(source, url)`. The first occurrence of a key
//! fixes its position in the output. A later duplicate replaces the stored
//! record only when it upgrades `favorite` from false to true; the
//! replacement is wholesale, chapters/history/tracking of the discarded copy
//! are not unioned into the survivor. Auxiliary lists are concatenated.

use crate::convert::into_superset;
use crate::error::{BackupError, Result};
use crate::format::BackupFormat;
use crate::schema::{sy, TypedBackup};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;

#[cfg(test)]
mod tests;

/// Identity of a manga across backups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MangaKey {
    pub source: i64,
    pub url: String,
}

impl MangaKey {
    pub fn of(manga: &sy::BackupManga) -> Self {
        MangaKey {
            source: manga.source,
            url: manga.url.clone(),
        }
    }
}

/// Counters describing what a merge did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub inputs: usize,
    pub manga_seen: usize,
    pub unique_manga: usize,
    /// Non-favorite records replaced by a favorite duplicate
    pub favorite_upgrades: usize,
    /// Duplicates discarded in favor of the stored record
    pub duplicates_kept: usize,
}

/// Accumulates superset backups; fresh per merge call
#[derive(Debug, Default)]
pub struct Merger {
    manga: IndexMap<MangaKey, sy::BackupManga>,
    categories: Vec<sy::BackupCategory>,
    sources: Vec<sy::BackupSource>,
    preferences: Vec<sy::BackupPreference>,
    source_preferences: Vec<sy::BackupSourcePreferences>,
    extension_repos: Vec<sy::BackupExtensionRepos>,
    saved_searches: Vec<sy::BackupSavedSearch>,
    summary: MergeSummary,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one input. `index` only labels errors and log lines.
    pub fn absorb(&mut self, index: usize, backup: TypedBackup, format: BackupFormat) -> Result<()> {
        let backup = into_superset(backup, format).map_err(|e| BackupError::MergeInput {
            index,
            source: Box::new(e),
        })?;

        // validate every key before touching state so a bad input leaves no trace
        for (position, manga) in backup.backup_manga.iter().enumerate() {
            if manga.url.is_empty() {
                return Err(BackupError::MergeInput {
                    index,
                    source: Box::new(BackupError::InvalidInput(format!(
                        "backupManga[{}] (source {}) has an empty url",
                        position, manga.source
                    ))),
                });
            }
        }

        tracing::debug!(
            input = index,
            format = %format,
            manga = backup.backup_manga.len(),
            "Merging backup"
        );

        let sy::Backup {
            backup_manga,
            backup_categories,
            backup_sources,
            backup_preferences,
            backup_source_preferences,
            backup_extension_repo,
            backup_saved_searches,
        } = backup;

        for manga in backup_manga {
            self.insert_manga(manga);
        }

        self.categories.extend(backup_categories);
        self.sources.extend(backup_sources);
        self.preferences.extend(backup_preferences);
        self.source_preferences.extend(backup_source_preferences);
        self.extension_repos.extend(backup_extension_repo);
        self.saved_searches.extend(backup_saved_searches);
        self.summary.inputs += 1;

        Ok(())
    }

    fn insert_manga(&mut self, manga: sy::BackupManga) {
        self.summary.manga_seen += 1;

        match self.manga.entry(MangaKey::of(&manga)) {
            Entry::Vacant(slot) => {
                slot.insert(manga);
            }
            Entry::Occupied(mut slot) => {
                if !slot.get().favorite && manga.favorite {
                    tracing::debug!(
                        source = manga.source,
                        url = %manga.url,
                        "Replacing non-favorite entry with favorite duplicate"
                    );
                    slot.insert(manga);
                    self.summary.favorite_upgrades += 1;
                } else {
                    self.summary.duplicates_kept += 1;
                }
            }
        }
    }

    pub fn finish(self) -> (sy::Backup, MergeSummary) {
        let mut summary = self.summary;
        summary.unique_manga = self.manga.len();

        let backup = sy::Backup {
            backup_manga: self.manga.into_values().collect(),
            backup_categories: self.categories,
            backup_sources: self.sources,
            backup_preferences: self.preferences,
            backup_source_preferences: self.source_preferences,
            backup_extension_repo: self.extension_repos,
            backup_saved_searches: self.saved_searches,
        };
        (backup, summary)
    }
}

/// Merge backups into a single superset-format backup
pub fn merge(inputs: Vec<(TypedBackup, BackupFormat)>) -> Result<TypedBackup> {
    merge_with_summary(inputs).map(|(backup, _)| backup)
}

pub fn merge_with_summary(
    inputs: Vec<(TypedBackup, BackupFormat)>,
) -> Result<(TypedBackup, MergeSummary)> {
    if inputs.is_empty() {
        return Err(BackupError::InvalidInput("no backups to merge".to_string()));
    }

    let mut merger = Merger::new();
    for (index, (backup, format)) in inputs.into_iter().enumerate() {
        merger.absorb(index, backup, format)?;
    }

    let (backup, summary) = merger.finish();
    tracing::info!(
        inputs = summary.inputs,
        unique_manga = summary.unique_manga,
        favorite_upgrades = summary.favorite_upgrades,
        duplicates_kept = summary.duplicates_kept,
        "Merged backups"
    );

    Ok((TypedBackup::Sy(backup), summary))
}
