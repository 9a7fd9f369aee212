//! Update command implementation.
//!
//! Copies the selected pack (zip archive or folder) into a scratch
//! directory, runs the full pipeline there, and archives the result beside
//! the input. The original pack is never touched; the scratch directory is
//! released on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::archive::{extract_zip, output_name, zip_dir};
use crate::error::{MewError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{run_update, Observer, UpdateOptions};
use crate::slicer::load_slicer;

/// Update a pack archive or folder to the current layout
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Pack .zip archive or unpacked pack folder
    #[arg(required = true)]
    pub pack: PathBuf,

    /// Slicer mapping file describing atlas decomposition
    #[arg(long, default_value = "slicer.txt")]
    pub slicer: PathBuf,

    /// Remove original files after relocation instead of keeping copies
    #[arg(long)]
    pub replace_originals: bool,

    /// Print every changelog line while the pipeline runs
    #[arg(long, short)]
    pub verbose: bool,
}

/// Streams run-log lines to the terminal; progress stays silent.
struct CliObserver<'a> {
    printer: &'a Printer,
    verbose: bool,
}

impl Observer for CliObserver<'_> {
    fn log(&mut self, line: &str) {
        if self.verbose {
            eprintln!("{}", self.printer.dim(line));
        }
    }
}

pub fn run(args: UpdateArgs, printer: &Printer) -> Result<()> {
    let pack = &args.pack;
    if !pack.exists() {
        return Err(MewError::Io {
            path: pack.clone(),
            message: format!("Pack not found: {}", display_path(pack)),
        });
    }

    let slices = load_slicer(&args.slicer)?;
    if slices.is_empty() {
        printer.info(
            "Slicer",
            &format!(
                "{} not found or empty; sprite slicing disabled",
                display_path(&args.slicer)
            ),
        );
    } else {
        printer.info(
            "Slicer",
            &format!(
                "{} mapped from {}",
                plural(slices.output_count(), "output", "outputs"),
                plural(slices.input_count(), "atlas", "atlases")
            ),
        );
    }

    let scratch = tempfile::Builder::new()
        .prefix("mewup-")
        .tempdir()
        .map_err(|e| MewError::Io {
            path: std::env::temp_dir(),
            message: format!("Failed to create scratch directory: {}", e),
        })?;
    let workdir = scratch.path().join("work");

    printer.status("Preparing", &display_path(pack));
    if pack.is_dir() {
        copy_tree(pack, &workdir)?;
    } else {
        extract_zip(pack, &workdir)?;
    }

    printer.status("Updating", &display_path(pack));
    let mut observer = CliObserver {
        printer,
        verbose: args.verbose,
    };
    let options = UpdateOptions {
        replace_originals: args.replace_originals,
        slices,
    };
    let summary = run_update(&workdir, &options, &mut observer)?;

    let out_zip = output_name(pack);
    printer.status("Archiving", &display_path(&out_zip));
    zip_dir(&workdir, &out_zip)?;

    printer.success(
        "Finished",
        &format!(
            "{} relocated, {} written, {} updated -> {}",
            plural(summary.armor_moved + summary.trims_moved, "texture", "textures"),
            plural(summary.sprites_written, "sprite", "sprites"),
            plural(summary.model_refs_updated, "model ref", "model refs"),
            display_path(&out_zip)
        ),
    );

    Ok(())
}

/// Copy a pack folder into the scratch working directory.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| MewError::Io {
            path: src.to_path_buf(),
            message: format!("Failed to walk pack folder: {}", e),
        })?;
        let rel = entry.path().strip_prefix(src).map_err(|_| MewError::Io {
            path: entry.path().to_path_buf(),
            message: "File outside pack root".to_string(),
        })?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| MewError::Io {
                path: target.clone(),
                message: format!("Failed to create directory: {}", e),
            })?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| MewError::Io {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
            }
            fs::copy(entry.path(), &target).map_err(|e| MewError::Io {
                path: entry.path().to_path_buf(),
                message: format!("Failed to copy file: {}", e),
            })?;
        }
    }
    Ok(())
}
