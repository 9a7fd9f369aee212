//! Slicer command implementation.
//!
//! Parses a slicer mapping file and summarizes what it would produce,
//! without touching any pack.

use std::path::PathBuf;

use clap::Args;

use crate::error::{MewError, Result};
use crate::output::{display_path, plural, Printer};
use crate::slicer::load_slicer;

/// Parse and summarize a slicer mapping file
#[derive(Args, Debug)]
pub struct SlicerArgs {
    /// Slicer mapping file
    #[arg(required = true)]
    pub file: PathBuf,

    /// List every mapped output
    #[arg(long, short)]
    pub list: bool,
}

pub fn run(args: SlicerArgs, printer: &Printer) -> Result<()> {
    if !args.file.is_file() {
        return Err(MewError::Io {
            path: args.file.clone(),
            message: format!("File not found: {}", display_path(&args.file)),
        });
    }

    let spec = load_slicer(&args.file)?;
    if spec.is_empty() {
        printer.warning("Parsed", "no atlas mappings found");
        return Ok(());
    }

    printer.info(
        "Parsed",
        &format!(
            "{} across {}",
            plural(spec.output_count(), "output", "outputs"),
            plural(spec.input_count(), "atlas", "atlases")
        ),
    );

    if args.list {
        for input in spec.inputs() {
            println!("{}", input.path);
            for rule in &input.rules {
                let b = &rule.bounds;
                println!(
                    "  {} [{},{} {}x{} @ {}x{}]{}",
                    rule.output,
                    b.x,
                    b.y,
                    b.w,
                    b.h,
                    b.ref_w,
                    b.ref_h,
                    if rule.metadata.is_some() {
                        " +metadata"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    Ok(())
}
