pub mod completions;
pub mod detect;
pub mod slicer;
pub mod update;

use clap::{Parser, Subcommand};

/// mewup - Minecraft resource pack layout updater
#[derive(Parser, Debug)]
#[command(name = "mewup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update a pack archive or folder to the current layout
    Update(update::UpdateArgs),

    /// Report the pack_format a pack declares
    Detect(detect::DetectArgs),

    /// Parse and summarize a slicer mapping file
    Slicer(slicer::SlicerArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
