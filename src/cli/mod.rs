//! [Command-line interface](Cli) (CLI) of the main binary.

#[cfg(test)]
mod tests;

use crate::{html, jupyter, refseq, Store};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr};
use color_eyre::Help;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function.
/// ```no_run
/// use clap::Parser;
/// let args = ideogen::Cli::parse();
/// ```
/// Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// use ideogen::cli::Command;
///
/// let input = ["ideogen", "script", "TP53", "BRCA1", "--container", "viz1"];
/// let args = ideogen::Cli::parse_from(input);
/// assert!(matches!(args.command, Command::Script(_)));
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "ideogen", author, version)]
#[clap(about = "ideogen draws human gene ideograms in Jupyter notebooks and HTML pages.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,

    /// Directory of downloaded sources and the gene table.
    #[clap(long, global = true, env = crate::store::HOME_ENV)]
    #[clap(help = "Set the data directory [default: ~/.data/ideogen].")]
    pub data_dir: Option<PathBuf>,
}

/// CLI [commands](#variants).
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to [build].
    #[clap(about = "Download the NCBI sources and rebuild the gene table.")]
    Build(BuildArgs),
    /// Pass CLI arguments to [write].
    /// ## Examples
    /// ```rust
    /// use ideogen::{Cli, cli::Command};
    /// use clap::Parser;
    /// let input = ["ideogen", "write", "TP53", "-o", "tp53.html"];
    /// let args = Cli::parse_from(input);
    /// assert!(matches!(args.command, Command::Write(_)));
    /// ```
    #[clap(about = "Write a stand-alone HTML page.")]
    #[clap(arg_required_else_help = true)]
    Write(WriteArgs),
    /// Pass CLI arguments to [script].
    #[clap(about = "Write the Jupyter bootstrap script.")]
    Script(ScriptArgs),
    /// Pass CLI arguments to [prepare].
    #[clap(about = "Print the snippet that creates the container element.")]
    Prepare(PrepareArgs),
    /// Print the [sources](crate::refseq::sources) table.
    #[clap(about = "List the data sources and whether they are present.")]
    Sources,
}

// ----------------------------------------------------------------------------
// Arguments
// ----------------------------------------------------------------------------

/// Arguments of the `build` command.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
pub struct BuildArgs {
    /// Download the sources even if they exist locally.
    #[clap(long)]
    pub force_download: bool,

    /// Keep gene2refseq after the table is built.
    #[clap(long)]
    pub keep_source: bool,
}

/// Arguments of the `write` command.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
pub struct WriteArgs {
    /// Gene symbols to draw.
    #[clap(required = true)]
    pub symbols: Vec<String>,

    /// Output HTML file, stdout if not given.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Id of the container element.
    #[clap(short = 'c', long, default_value = jupyter::DEFAULT_ID)]
    pub container: String,

    /// Page title.
    #[clap(short = 't', long, default_value = html::DEFAULT_TITLE)]
    pub title: String,
}

/// Arguments of the `script` command.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
pub struct ScriptArgs {
    /// Gene symbols to draw.
    #[clap(conflicts_with = "annotations", required_unless_present = "annotations")]
    pub symbols: Vec<String>,

    /// JSON file of annotations to embed instead of looking up symbols.
    #[clap(short = 'a', long)]
    pub annotations: Option<PathBuf>,

    /// Id of the container element.
    #[clap(short = 'c', long, default_value = jupyter::DEFAULT_ID)]
    pub container: String,

    /// Output file, stdout if not given.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments of the `prepare` command.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
pub struct PrepareArgs {
    /// Id of the container element.
    #[clap(short = 'c', long, default_value = jupyter::DEFAULT_ID)]
    pub container: String,
}

// ----------------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------------

/// Rebuilds the gene table in `store`.
pub async fn build(args: &BuildArgs, store: &Store) -> Result<(), Report> {
    let options = refseq::BuildOptions {
        force_extract: true,
        force_download: args.force_download,
        cleanup: !args.keep_source,
    };
    let path = refseq::ensure_human_refseq(store, &options).await?;
    info!("Gene table: {path:?}");
    Ok(())
}

/// Writes the HTML page for the requested symbols.
pub async fn write(args: &WriteArgs, store: &Store) -> Result<(), Report> {
    let container = Some(args.container.as_str());
    let title = Some(args.title.as_str());
    match &args.output {
        Some(path) => html::to_html_path(&args.symbols, container, title, store, path).await,
        None => html::to_html_file(&args.symbols, container, title, store, std::io::stdout()).await,
    }
}

/// Writes the bootstrap script for an annotations file or the requested symbols.
pub async fn script(args: &ScriptArgs, store: &Store) -> Result<(), Report> {
    let script = match &args.annotations {
        Some(path) => {
            let reader = std::fs::File::open(path)
                .wrap_err_with(|| format!("Failed to open: {path:?}"))?;
            let annotations: serde_json::Value = serde_json::from_reader(reader)
                .wrap_err_with(|| format!("Failed to parse annotations JSON: {path:?}"))
                .suggestion("The annotations file must hold a single JSON value.")?;
            jupyter::render(&args.container, &annotations)?
        }
        None => jupyter::to_javascript(&args.symbols, Some(args.container.as_str()), store).await?,
    };

    match &args.output {
        Some(path) => {
            info!("Writing script: {path:?}");
            std::fs::write(path, script).wrap_err_with(|| format!("Failed to write: {path:?}"))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(script.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Prints the container preparation snippet.
pub fn prepare(args: &PrepareArgs) -> Result<(), Report> {
    println!("{}", jupyter::prepare(Some(args.container.as_str()))?);
    Ok(())
}

/// Prints the data sources of `store`.
pub fn sources(store: &Store) -> Result<(), Report> {
    println!("{}", refseq::sources(store)?);
    Ok(())
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // lowercase for RUST_LOG
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
