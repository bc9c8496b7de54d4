//! Name normalization and index resolution, grounded on the teacher's
//! `data::loader::normalize_lookup` / `resolve_hostile_with_index`.

use std::collections::HashMap;

/// Normalize a string for lookup: lowercase, collapse whitespace/underscores.
pub fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Build a normalized-name -> key index over an arbitrary set of named items.
pub fn build_name_index<'a, I>(names: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| (normalize_lookup(name), name.to_string()))
        .collect()
}
