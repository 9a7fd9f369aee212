//! Detect command implementation.
//!
//! Reports the pack_format a pack declares, reading `pack.mcmeta` from a
//! folder or straight out of a zip archive.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::mcmeta::detect_pack_format;
use crate::output::{display_path, Printer};

/// Report the pack_format a pack declares
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Pack .zip archive or unpacked pack folder
    #[arg(required = true)]
    pub pack: PathBuf,
}

pub fn run(args: DetectArgs, printer: &Printer) -> Result<()> {
    match detect_pack_format(&args.pack)? {
        Some(version) => {
            printer.info(
                "Detected",
                &format!("pack_format {} in {}", version, display_path(&args.pack)),
            );
            println!("{}", version);
        }
        None => {
            printer.warning(
                "Detected",
                &format!("no pack_format declared in {}", display_path(&args.pack)),
            );
            println!("unknown");
        }
    }
    Ok(())
}
