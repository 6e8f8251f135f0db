//! Maintenance commands for the song database and answer schedule.
use anyhow::{Context, Result, bail};
use coople_game::{Catalog, DateKey, SolutionMap, SongEntry, search};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::files::{read_catalog_file, read_solutions_file, write_replacing};
use crate::import::{ImportConfig, is_export_file, read_export_file};

/// Merge catalog JSON files and playlist exports (`.csv`, filtered by
/// `config`) into the song database, then drop excluded ids.
///
/// Returns the report printed by the command.
pub fn add_songs(
    songdb: &Path,
    inputs: &[PathBuf],
    exclude: &[String],
    config: &ImportConfig,
) -> Result<String> {
    let mut report = String::new();
    let mut catalog = if let Some(existing) = read_catalog_file(songdb)? {
        let _ = writeln!(report, "SongDb loaded from '{}'.", songdb.display());
        existing
    } else {
        let _ = writeln!(
            report,
            "SongDb file '{}' doesn't exist. Creating new SongDb...",
            songdb.display()
        );
        Catalog::empty()
    };
    let before = catalog.len();

    let mut incoming = Vec::new();
    for input in inputs {
        if is_export_file(input) {
            incoming.extend(read_export_file(input, config)?);
            let _ = writeln!(report, "Loaded CSV file '{}'.", input.display());
        } else {
            let songs = read_catalog_file(input)?
                .with_context(|| format!("input file '{}' not found", input.display()))?;
            incoming.extend(songs.entries().iter().cloned());
            let _ = writeln!(report, "Loaded '{}'.", input.display());
        }
    }
    let added = catalog.merge(incoming);
    log::debug!("{added} new song(s)");
    let removed = catalog.exclude(exclude.iter().map(String::as_str));
    if removed > 0 {
        let _ = writeln!(report, "Excluded {removed} song(s).");
    }

    let _ = writeln!(
        report,
        "SongDb went from {before} to {} songs.",
        catalog.len()
    );
    write_replacing(songdb, &catalog.to_json()?)
        .with_context(|| format!("writing {}", songdb.display()))?;
    let _ = write!(report, "SongDb saved to '{}'.", songdb.display());
    Ok(report)
}

/// How a candidate was chosen for a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(SongEntry),
    /// Several candidates and no `--pick`.
    Ambiguous(Vec<SongEntry>),
}

/// Choose the answer for `name`: an exact title wins, then the 1-based
/// `pick` among up to `limit` candidates, then a lone match.
///
/// # Errors
///
/// Fails when nothing matches or `pick` is out of range.
pub fn choose_song(
    catalog: &Catalog,
    name: &str,
    pick: Option<usize>,
    limit: usize,
) -> Result<Selection> {
    if let Some(exact) = catalog.by_name(name) {
        if pick.is_some() {
            log::warn!("'{name}' is an exact title; ignoring --pick");
        }
        return Ok(Selection::Chosen(exact.clone()));
    }
    let candidates = search(name, catalog, limit);
    if candidates.is_empty() {
        bail!("no song matches '{name}'");
    }
    if let Some(pick) = pick {
        let Some(song) = pick.checked_sub(1).and_then(|idx| candidates.get(idx)) else {
            bail!("--pick must be between 1 and {}", candidates.len());
        };
        return Ok(Selection::Chosen((*song).clone()));
    }
    match candidates.as_slice() {
        [only] => Ok(Selection::Chosen((*only).clone())),
        _ => Ok(Selection::Ambiguous(
            candidates.into_iter().cloned().collect(),
        )),
    }
}

/// Record the answer for `date` in the solutions file.
pub fn select_solution(
    songdb: &Path,
    solutions_path: &Path,
    date: DateKey,
    name: &str,
    pick: Option<usize>,
    limit: usize,
) -> Result<String> {
    let catalog = read_catalog_file(songdb)?
        .with_context(|| format!("SongDb file '{}' not found", songdb.display()))?;
    let mut report = format!("SongDb loaded from '{}'.\n", songdb.display());

    let song = match choose_song(&catalog, name, pick, limit)? {
        Selection::Chosen(song) => song,
        Selection::Ambiguous(options) => {
            let _ = writeln!(report, "Make a selection:");
            for (idx, song) in options.iter().enumerate() {
                let _ = writeln!(report, "{}: {}", idx + 1, song.display_name);
            }
            bail!("{report}Several songs match '{name}'; rerun with --pick N");
        }
    };

    let mut solutions = if let Some(existing) = read_solutions_file(solutions_path)? {
        existing
    } else {
        let _ = writeln!(
            report,
            "No previous solutions found in '{}', creating new file...",
            solutions_path.display()
        );
        SolutionMap::empty()
    };
    if let Some(Some(previous)) = solutions.assign(date, song.id.clone()) {
        log::warn!("{date}: replacing previous answer {previous}");
    }
    write_replacing(solutions_path, &solutions.to_json()?)
        .with_context(|| format!("writing {}", solutions_path.display()))?;
    let _ = write!(report, "{date}: {} ({})", song.display_name, song.id);
    Ok(report)
}
