use clap::Parser;
use miette::Result;
use mewup::cli::{Cli, Commands};
use mewup::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Update(args) => mewup::cli::update::run(args, &printer)?,
        Commands::Detect(args) => mewup::cli::detect::run(args, &printer)?,
        Commands::Slicer(args) => mewup::cli::slicer::run(args, &printer)?,
        Commands::Completions(args) => mewup::cli::completions::run(args)?,
    }

    Ok(())
}
