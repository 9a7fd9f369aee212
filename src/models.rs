//! Model JSON reference rewriting.
//!
//! Walks every model definition under `assets/minecraft/models` and
//! rewrites string values that still reference legacy armor layer names.
//! Documents are only written back when something actually changed, and a
//! document that does not parse as JSON is skipped without failing the run.

use std::path::Path;

use serde_json::Value;
use walkdir::WalkDir;

use crate::pipeline::Reporter;

/// Apply `rewrite` to every string value in a JSON document tree.
///
/// Returns the number of strings changed.
pub fn rewrite_strings<F>(value: &mut Value, rewrite: &F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) => match rewrite(s) {
            Some(new) => {
                *s = new;
                1
            }
            None => 0,
        },
        Value::Array(items) => items.iter_mut().map(|v| rewrite_strings(v, rewrite)).sum(),
        Value::Object(map) => map
            .values_mut()
            .map(|v| rewrite_strings(v, rewrite))
            .sum(),
        _ => 0,
    }
}

/// Rewrite a trailing legacy armor-layer reference, preserving any path
/// prefix before the final segment.
///
/// `gold_layer_1.png` becomes `entity/equipment/humanoid/gold`; the
/// `_layer_2` variant maps to `humanoid_leggings`. Returns `None` when the
/// value is not a legacy reference, which also makes the rewrite
/// idempotent: converted paths no longer end in a layer marker.
pub fn legacy_layer_target(value: &str) -> Option<String> {
    rewrite_tail(value, "_layer_1", "entity/equipment/humanoid").or_else(|| {
        rewrite_tail(value, "_layer_2", "entity/equipment/humanoid_leggings")
    })
}

fn rewrite_tail(value: &str, marker: &str, target_dir: &str) -> Option<String> {
    let base = value.strip_suffix(".png").unwrap_or(value);
    let stem = base.strip_suffix(marker)?;
    let (prefix, material) = match stem.rfind('/') {
        Some(idx) => (&stem[..idx + 1], &stem[idx + 1..]),
        None => ("", stem),
    };
    if material.is_empty() {
        return None;
    }
    Some(format!("{}{}/{}", prefix, target_dir, material))
}

/// Rewrite legacy texture references in every model JSON under the pack.
///
/// Returns the number of string values rewritten across all documents.
pub fn rewrite_model_refs(pack_root: &Path, reporter: &mut Reporter) -> usize {
    let models_root = pack_root
        .join("assets")
        .join("minecraft")
        .join("models");
    if !models_root.is_dir() {
        return 0;
    }

    let mut count = 0;
    for entry in WalkDir::new(&models_root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            continue;
        }

        let Ok(text) = std::fs::read_to_string(path) else {
            reporter.tick();
            continue;
        };
        let Ok(mut doc) = serde_json::from_str::<Value>(&text) else {
            reporter.tick();
            continue;
        };

        let changed = rewrite_strings(&mut doc, &legacy_layer_target);
        if changed > 0 {
            match serde_json::to_string_pretty(&doc) {
                Ok(out) => match std::fs::write(path, out) {
                    Ok(()) => {
                        count += changed;
                        reporter.log(format!("Updated model JSON refs in {}", path.display()));
                    }
                    Err(e) => {
                        reporter.log(format!("Failed to write JSON {}: {}", path.display(), e))
                    }
                },
                Err(e) => reporter.log(format!("Failed to write JSON {}: {}", path.display(), e)),
            }
        }
        reporter.tick();
    }
    count
}
