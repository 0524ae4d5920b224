//! # Potion Discovery
//!
//! Finds potion documents under the potions directory. The layout is one
//! folder per category, each holding `*.json` documents:
//!
//! ```text
//! src/statics/potions/
//!   components/button.json
//!   layouts/dashboard.json
//!   ...
//! ```

use std::path::{Path, PathBuf};

use potion_core::Category;

/// A potion document found on disk, with the category implied by its folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotionFile {
    /// Category of the folder the document was found in.
    pub category: Category,
    /// Path to the document.
    pub path: PathBuf,
}

/// Collect every `*.json` document under `<potions_dir>/<category>/`.
///
/// Categories are scanned in [`Category::all`] order and files are sorted
/// by name within a category. Missing category folders are skipped;
/// unreadable ones are logged and skipped. Subfolders are not descended.
pub fn discover_potions(potions_dir: &Path) -> Vec<PotionFile> {
    let mut potions = Vec::new();

    for category in Category::all() {
        let dir = potions_dir.join(category.as_str());
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "category folder absent");
            continue;
        }

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read category folder");
                continue;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    None
                }
            })
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        potions.extend(paths.into_iter().map(|path| PotionFile {
            category: *category,
            path,
        }));
    }

    tracing::debug!(count = potions.len(), dir = %potions_dir.display(), "potions discovered");
    potions
}
