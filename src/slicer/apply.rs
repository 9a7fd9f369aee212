//! Sprite slicing engine.
//!
//! Executes a parsed slicer mapping against a pack tree: locates each input
//! atlas, cuts out the mapped rectangles and writes them as individual
//! sprite files, plus optional `.mcmeta` sidecars. Every failure is
//! per-item: a missing atlas or an unwritable sprite is logged and the run
//! moves on.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use walkdir::WalkDir;

use crate::pipeline::Reporter;

use super::{SliceRule, SliceSpec};

/// Cut sprites out of the pack's atlases according to `spec`.
///
/// Returns the number of sprite files written. Progress ticks once per
/// mapped output, whether or not its atlas was found.
pub fn apply_slices(pack_root: &Path, spec: &SliceSpec, reporter: &mut Reporter) -> usize {
    let mut created = 0;

    for input in spec.inputs() {
        let Some(source) = locate_input(pack_root, &input.path) else {
            reporter.log(format!("SLICER: input image not found: {}", input.path));
            for _ in &input.rules {
                reporter.tick();
            }
            continue;
        };

        let image = match image::open(&source) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                reporter.log(format!("SLICER: failed to open {}: {}", source.display(), e));
                for _ in &input.rules {
                    reporter.tick();
                }
                continue;
            }
        };

        if image.width() == 0 || image.height() == 0 {
            reporter.log(format!("SLICER: empty image: {}", source.display()));
            for _ in &input.rules {
                reporter.tick();
            }
            continue;
        }

        for rule in &input.rules {
            if write_sprite(pack_root, &image, rule, reporter) {
                created += 1;
            }
            reporter.tick();
        }
    }

    created
}

/// Cut one sprite and write it (plus its sidecar, if any).
fn write_sprite(
    pack_root: &Path,
    image: &RgbaImage,
    rule: &SliceRule,
    reporter: &mut Reporter,
) -> bool {
    let crop = rule.bounds.scale_to(image.width(), image.height());
    let sprite = image::imageops::crop_imm(image, crop.x, crop.y, crop.w, crop.h).to_image();

    let out_path = join_pack_path(pack_root, &rule.output);
    if let Some(parent) = out_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            reporter.log(format!(
                "Failed writing sprite {}: {}",
                out_path.display(),
                e
            ));
            return false;
        }
    }

    match sprite.save(&out_path) {
        Ok(()) => {
            reporter.log(format!("Wrote sprite: {}", out_path.display()));
            if let Some(metadata) = &rule.metadata {
                write_sidecar(&out_path, metadata, reporter);
            }
            true
        }
        Err(e) => {
            reporter.log(format!(
                "Failed writing sprite {}: {}",
                out_path.display(),
                e
            ));
            false
        }
    }
}

/// Write the sidecar payload verbatim next to the sprite.
///
/// The payload is only JSON-parsed to pick the log wording; the bytes
/// written are the same either way.
fn write_sidecar(sprite_path: &Path, metadata: &str, reporter: &mut Reporter) {
    let text = strip_triple_quotes(metadata);

    let mut os = sprite_path.as_os_str().to_owned();
    os.push(".mcmeta");
    let path = PathBuf::from(os);

    match std::fs::write(&path, text) {
        Ok(()) => {
            if serde_json::from_str::<serde_json::Value>(text).is_ok() {
                reporter.log(format!("Wrote sprite metadata: {}", path.display()));
            } else {
                reporter.log(format!("Wrote raw sprite metadata: {}", path.display()));
            }
        }
        Err(e) => reporter.log(format!(
            "Failed writing sprite metadata {}: {}",
            path.display(),
            e
        )),
    }
}

fn strip_triple_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("\"\"\"").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("\"\"\"").unwrap_or(trimmed);
    trimmed.trim()
}

/// Resolve an atlas path against the pack tree.
///
/// Tries the literal pack-relative path, then the namespace alias, then
/// falls back to searching the asset tree for a file with the same name.
fn locate_input(pack_root: &Path, rel: &str) -> Option<PathBuf> {
    let direct = join_pack_path(pack_root, rel);
    if direct.is_file() {
        return Some(direct);
    }

    if let Some(alias) = namespace_alias(rel) {
        let candidate = join_pack_path(pack_root, &alias);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let base = rel.rsplit('/').next()?;
    WalkDir::new(pack_root.join("assets"))
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name().to_str() == Some(base))
        .map(|e| e.into_path())
}

/// Swap the `minecraft` and `realms` namespaces, the one alias pair that
/// shows up in legacy packs.
fn namespace_alias(rel: &str) -> Option<String> {
    if let Some(rest) = rel.strip_prefix("assets/realms/") {
        Some(format!("assets/minecraft/{}", rest))
    } else {
        rel.strip_prefix("assets/minecraft/")
            .map(|rest| format!("assets/realms/{}", rest))
    }
}

fn join_pack_path(pack_root: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .fold(pack_root.to_path_buf(), |path, seg| path.join(seg))
}
