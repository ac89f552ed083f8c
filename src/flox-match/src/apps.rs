//! Application discovery module
//!
//! Finds and parses .desktop files so applications can be matched by name

use anyhow::Result;
use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::rank::Item;

/// Exec field codes that carry no meaning when launching without arguments
const FIELD_CODES: &[&str] = &[
    "%f", "%F", "%u", "%U", "%d", "%D", "%n", "%N", "%i", "%c", "%k", "%v", "%m",
];

/// Terminal used for `Terminal=true` entries
const TERMINAL: &str = "foot -e";

/// Standard XDG application directories, user directories first
fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_home) = env::var_os("XDG_DATA_HOME") {
        dirs.push(PathBuf::from(data_home).join("applications"));
    } else if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".local/share/applications"));
    }

    if let Some(data_dirs) = env::var_os("XDG_DATA_DIRS") {
        for dir in env::split_paths(&data_dirs) {
            dirs.push(dir.join("applications"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/local/share/applications"));
        dirs.push(PathBuf::from("/usr/share/applications"));
    }

    dirs
}

/// Parse the `[Desktop Entry]` group of a .desktop file
fn parse_desktop_entry(content: &str) -> Option<Item> {
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut no_display = false;
    let mut hidden = false;
    let mut terminal = false;
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();

        if line.starts_with('[') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if !in_desktop_entry {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                "Name" if name.is_none() => name = Some(value.to_string()),
                "Exec" => exec = Some(value.to_string()),
                "Icon" => icon = Some(value.to_string()),
                "NoDisplay" => no_display = value.eq_ignore_ascii_case("true"),
                "Hidden" => hidden = value.eq_ignore_ascii_case("true"),
                "Terminal" => terminal = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
    }

    if no_display || hidden {
        return None;
    }

    let exec = strip_field_codes(&exec?);
    let value = if terminal {
        format!("{TERMINAL} {exec}")
    } else {
        exec
    };

    Some(Item {
        display: name?,
        value,
        icon,
    })
}

fn strip_field_codes(exec: &str) -> String {
    FIELD_CODES
        .iter()
        .fold(exec.to_string(), |acc, code| acc.replace(code, ""))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn load_dir(dir: &Path, seen_names: &mut HashSet<String>, items: &mut Vec<Item>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.extension().map_or(false, |ext| ext == "desktop") {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };

            if let Some(item) = parse_desktop_entry(&content) {
                // Deduplicate by name, earlier directories win
                if seen_names.insert(item.display.clone()) {
                    items.push(item);
                }
            }
        }
    }
}

/// Load applications from `extra_dirs` followed by the XDG directories
pub fn load_applications(extra_dirs: &[PathBuf]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut seen_names = HashSet::new();

    for dir in extra_dirs.iter().cloned().chain(application_dirs()) {
        if dir.exists() {
            load_dir(&dir, &mut seen_names, &mut items);
        }
    }

    items.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));

    debug!("loaded {} applications", items.len());
    Ok(items)
}
