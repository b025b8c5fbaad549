use std::collections::{HashMap, HashSet};

use course_core::sanitize_filename;

/// Local file name for a remote resource: the percent-decoded basename of the
/// URL path with illegal characters stripped. `None` when nothing usable is
/// left (e.g. a URL ending in `/`).
pub fn resource_file_name(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = match urlencoding::decode(path) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned(),
    };
    let basename = decoded.rsplit('/').next().unwrap_or_default();
    let name = sanitize_filename(basename);
    if name.is_empty() || name.chars().all(|c| c == '.') {
        None
    } else {
        Some(name)
    }
}

/// Per-lesson image name assignments.
///
/// The same URL always maps to the same name; a name already taken by a
/// different URL gets a positional `_<n>` suffix before its extension.
#[derive(Debug, Default)]
pub struct NameRegistry {
    by_url: HashMap<String, String>,
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, url: &str, name: String) -> String {
        if let Some(existing) = self.by_url.get(url) {
            return existing.clone();
        }

        let mut candidate = name.clone();
        if self.taken.contains(&candidate) {
            let (stem, ext) = split_extension(&name);
            let mut position = self.by_url.len();
            loop {
                candidate = format!("{stem}_{position}{ext}");
                if !self.taken.contains(&candidate) {
                    break;
                }
                position += 1;
            }
        }

        self.taken.insert(candidate.clone());
        self.by_url.insert(url.to_string(), candidate.clone());
        candidate
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}
