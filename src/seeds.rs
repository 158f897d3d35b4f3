//! Seed files: one `<display name>, <artist id>` entry per line.
//!
//! The display name is informational; only the id drives lookups.

use crate::error::{CollabError, CollabResult};
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::metadata::types::ArtistId;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedEntry {
    pub name: String,
    pub id: ArtistId,
}

/// Parses one seed line. Lines without a comma or with an empty id yield `None`.
///
/// The id is the last field, so names containing commas still parse.
pub fn parse_seed_line(line: &str) -> Option<SeedEntry> {
    let (name, id) = line.rsplit_once(',')?;
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    Some(SeedEntry {
        name: name.trim().to_string(),
        id: ArtistId::from(id),
    })
}

pub fn parse_seeds(content: &str) -> Vec<SeedEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_seed_line)
        .collect()
}

fn read_input(path: &Path, what: &str) -> CollabResult<String> {
    fs::read_to_string(path).map_err(|e| {
        CollabError::ConfigMissing(format!("{} {}: {}", what, path.display(), e))
    })
}

/// Loads seed entries from `path`.
///
/// An absent or unreadable file, or one whose non-blank lines all fail to
/// parse, is a `ConfigMissing` error. An empty file yields no entries.
pub fn load_seeds(path: &Path) -> CollabResult<Vec<SeedEntry>> {
    let content = read_input(path, "seed file")?;
    let seeds = parse_seeds(&content);
    let has_content = content.lines().any(|line| !line.trim().is_empty());
    if seeds.is_empty() && has_content {
        return Err(CollabError::ConfigMissing(format!(
            "seed file {} has no `<name>, <id>` lines",
            path.display()
        )));
    }
    logger::info(&format!(
        "Loaded {} seeds from {}",
        seeds.len(),
        path.display()
    ));
    Ok(seeds)
}

/// Reads raw artist ids, one per line; blank lines are skipped.
pub fn load_raw_ids(path: &Path) -> CollabResult<Vec<ArtistId>> {
    let content = read_input(path, "id list")?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ArtistId::from)
        .collect())
}

pub fn write_seeds(path: &Path, seeds: &[SeedEntry]) -> CollabResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    for seed in seeds {
        writeln!(file, "{}, {}", seed.name, seed.id)?;
    }
    file.flush()?;
    Ok(())
}

/// Looks up the display name of every id and returns entries sorted by name,
/// ignoring case. Ids that fail to resolve are logged and left out.
pub async fn resolve_seeds<S>(source: &S, ids: &[ArtistId]) -> Vec<SeedEntry>
where
    S: MetadataSource + ?Sized,
{
    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        match source.fetch_artist(id).await {
            Ok(profile) => {
                logger::info(&format!("Resolved seed: {}", profile.name));
                entries.push(SeedEntry {
                    name: profile.name,
                    id: profile.id,
                });
            }
            Err(e) => logger::warn(&format!("Could not resolve seed {}: {}", id, e)),
        }
    }
    entries.sort_by_key(|entry| entry.name.to_lowercase());
    entries
}
