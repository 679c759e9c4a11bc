#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{Report, Result};
#[cfg(feature = "cli")]
use ideogen::{cli, cli::Command, Cli, Store};

#[tokio::main]
async fn main() -> Result<(), Report> {
    #[cfg(feature = "cli")]
    {
        // ------------------------------------------------------------------------
        // CLI Setup

        // Parse CLI parameters
        let args = Cli::parse();

        // initialize color_eyre crate for colorized logs
        color_eyre::install()?;

        // Set logging/verbosity level via RUST_LOG
        std::env::set_var("RUST_LOG", args.verbosity.to_string());

        // initialize env_logger crate for logging/verbosity level
        env_logger::init();

        let store = Store::resolve(args.data_dir)?;

        match args.command {
            Command::Build(args) => cli::build(&args, &store).await?,
            Command::Write(args) => cli::write(&args, &store).await?,
            Command::Script(args) => cli::script(&args, &store).await?,
            Command::Prepare(args) => cli::prepare(&args)?,
            Command::Sources => cli::sources(&store)?,
        }
    }

    Ok(())
}
