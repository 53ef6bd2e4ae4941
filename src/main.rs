use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod matching;
mod roster;
mod skills;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("rescue_planner=debug,info")
    } else {
        EnvFilter::new("rescue_planner=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let hierarchy = cli::load_hierarchy(cli.dependencies.as_deref())?;

    match cli.command {
        cli::Commands::Assign(args) => {
            cli::assign::run(args, cli.format, cli.verbose, &hierarchy)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose, &hierarchy)?;
        }
        cli::Commands::Skills => {
            cli::skills::run(cli.format, cli.verbose, &hierarchy)?;
        }
        cli::Commands::Export(args) => {
            cli::export::run(args, cli.format, cli.verbose, &hierarchy)?;
        }
    }

    Ok(())
}
