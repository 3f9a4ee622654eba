use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use snafu::ResultExt;

use crate::config::models::MatchMode;
use crate::error::{EmptySelectionSnafu, IoSnafu, Result};

/// One group of printer names, labelled by the stem of the file it was
/// loaded from ("cups" for the live directory).
#[derive(Debug, Clone)]
pub struct NameList {
    pub label: String,
    pub names: Vec<String>,
}

/// The resolved working set the aggregator and executor operate on.
#[derive(Debug)]
pub struct Selection {
    pub groups: Vec<NameList>,
    /// True when the groups came from local list files, in which case the
    /// summary view prints their labels as headers.
    pub grouped: bool,
    /// Name-list files consulted, for the empty-selection report.
    pub sources: Vec<PathBuf>,
}

impl Selection {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.names.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.names.is_empty())
    }
}

/// Build the working set of printer names: the live directory when requested
/// (or when no list files exist), the local *.printers files otherwise, then
/// narrow it by the user's substring filters.
pub fn resolve(
    live_names: &[String],
    use_live: bool,
    lists_dir: &Path,
    filters: &[String],
    mode: MatchMode,
) -> Result<Selection> {
    let mut selection = if use_live {
        live_selection(live_names)
    } else {
        let lists = load_name_lists(lists_dir)?;
        if lists.is_empty() {
            warn!(
                "no printer list found under {}, using the list from CUPS",
                lists_dir.display()
            );
            live_selection(live_names)
        } else {
            Selection {
                sources: lists.iter().map(|(path, _)| path.clone()).collect(),
                groups: lists.into_iter().map(|(_, list)| list).collect(),
                grouped: true,
            }
        }
    };

    if !filters.is_empty() {
        let needles: Vec<String> = filters.iter().map(|f| f.to_lowercase()).collect();
        for group in &mut selection.groups {
            group.names.retain(|name| matches(name, &needles, mode));
        }
        if selection.is_empty() {
            let checked = (!selection.sources.is_empty()).then(|| {
                selection
                    .sources
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            });
            return EmptySelectionSnafu {
                filters: describe_filters(filters, mode),
                checked,
            }
            .fail();
        }
    }

    Ok(selection)
}

fn live_selection(live_names: &[String]) -> Selection {
    Selection {
        groups: vec![NameList {
            label: "cups".to_string(),
            names: live_names.to_vec(),
        }],
        grouped: false,
        sources: Vec::new(),
    }
}

/// Read every *.printers file under `dir`, one printer name per line, in
/// sorted filename order. A missing directory is the same as an empty one.
fn load_name_lists(dir: &Path) -> Result<Vec<(PathBuf, NameList)>> {
    let mut lists = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(lists),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "printers"))
        .collect();
    files.sort();

    for path in files {
        let text = fs::read_to_string(&path).context(IoSnafu { path: path.clone() })?;
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        lists.push((path, NameList { label, names }));
    }

    Ok(lists)
}

/// Case-insensitive substring match; `All` requires every token, `Any` one.
fn matches(name: &str, needles: &[String], mode: MatchMode) -> bool {
    let hay = name.to_lowercase();
    match mode {
        MatchMode::All => needles.iter().all(|needle| hay.contains(needle.as_str())),
        MatchMode::Any => needles.iter().any(|needle| hay.contains(needle.as_str())),
    }
}

fn describe_filters(filters: &[String], mode: MatchMode) -> String {
    let quoted: Vec<String> = filters.iter().map(|f| format!("'{f}'")).collect();
    let joiner = match mode {
        MatchMode::All => " and ",
        MatchMode::Any => " or ",
    };
    quoted.join(joiner)
}
