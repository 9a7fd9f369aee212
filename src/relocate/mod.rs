//! Relocation passes for legacy texture layouts.
//!
//! Two walks over the pack's texture tree: the armor/equipment pass driven
//! by the ordered rule table in [`rules`], and the flat trims pass moving
//! trim palettes from `trims/models/armor` into `trims/entity`. Both
//! degrade per file: an I/O failure is logged and the walk continues.

mod rules;

pub use rules::{destination_for, FileContext, RelocationRule, RULES};

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::pipeline::Reporter;

fn textures_root(pack_root: &Path) -> PathBuf {
    pack_root
        .join("assets")
        .join("minecraft")
        .join("textures")
}

/// Relocate legacy armor and equipment textures into `entity/equipment`.
///
/// Returns the number of files relocated. With `copy_only` the sources are
/// preserved; otherwise they are removed after a successful copy.
pub fn relocate_armor(pack_root: &Path, copy_only: bool, reporter: &mut Reporter) -> usize {
    let textures = textures_root(pack_root);
    if !textures.is_dir() {
        return 0;
    }
    let equipment_root = textures.join("entity").join("equipment");

    // Snapshot the walk before mutating, and leave the destination subtree
    // alone, so results never depend on walk order.
    let files: Vec<PathBuf> = WalkDir::new(&textures)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| !p.starts_with(&equipment_root))
        .collect();

    let mut count = 0;
    for src in files {
        let Some(name) = src.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lower = name.to_ascii_lowercase();
        let dir = src
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        let file = FileContext {
            name,
            lower: &lower,
            dir: &dir,
        };
        let Some((_, rel_dest)) = destination_for(&file) else {
            continue;
        };

        let dest = textures.join(rel_dest);
        match transfer(&src, &dest, copy_only) {
            Ok(()) => {
                count += 1;
                reporter.log(format!(
                    "Armor moved/copied: {} -> {}",
                    src.display(),
                    dest.display()
                ));
            }
            Err(e) => reporter.log(format!("Armor op failed for {}: {}", src.display(), e)),
        }
        reporter.tick();
    }
    count
}

/// Relocate trim palettes from `trims/models/armor` into `trims/entity`.
///
/// The source directory is flat; `*_leggings*` names drop the marker and
/// land in `humanoid_leggings`, everything else in `humanoid`.
pub fn relocate_trims(pack_root: &Path, copy_only: bool, reporter: &mut Reporter) -> usize {
    let textures = textures_root(pack_root);
    let armor_dir = textures.join("trims").join("models").join("armor");
    if !armor_dir.is_dir() {
        return 0;
    }
    let Ok(entries) = fs::read_dir(&armor_dir) else {
        return 0;
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let src = entry.path();
        if !src.is_file() {
            continue;
        }
        let Some(name) = src.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let trims_entity = textures.join("trims").join("entity");
        let dest = if name.contains("_leggings") {
            trims_entity
                .join("humanoid_leggings")
                .join(name.replace("_leggings", ""))
        } else {
            trims_entity.join("humanoid").join(name)
        };

        match transfer(&src, &dest, copy_only) {
            Ok(()) => {
                count += 1;
                reporter.log(format!(
                    "Trim moved/copied: {} -> {}",
                    src.display(),
                    dest.display()
                ));
            }
            Err(e) => reporter.log(format!("Trim op failed for {}: {}", src.display(), e)),
        }
        reporter.tick();
    }
    count
}

fn transfer(src: &Path, dest: &Path, copy_only: bool) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    if !copy_only {
        fs::remove_file(src)?;
    }
    Ok(())
}
