use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use metamark::config::{Config, OutputFormat};
use metamark::loader::{read_document, read_source};
use metamark::output::{
    exit_status, render_document, render_error, render_info, render_metadata, render_tokens,
};

/// Bytes of source shown on each side of a syntax error.
const EXCERPT_MARGIN: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "mmk", author, version, about = "Inspect MetaMark documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to mmk.yml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the document tree
    Parse {
        file: PathBuf,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Leave comment nodes out of the output
        #[arg(long)]
        no_comments: bool,
    },
    /// Print the frontmatter metadata, or a single value
    Meta {
        file: PathBuf,
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Print the coarse token stream
    Tokens { file: PathBuf },
    /// Summarize metadata and node counts
    Info { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref(), &env::current_dir()?)?;
    console::set_colors_enabled(config.color);
    console::set_colors_enabled_stderr(config.color);
    debug!(?config, "configuration");

    match cli.command {
        Commands::Parse {
            file,
            format,
            no_comments,
        } => {
            let mut doc = read_document(&file)?;
            let format = format.unwrap_or(config.format);
            let show_comments = config.show_comments && !no_comments;

            print!(
                "{}",
                render_document(&mut doc, format, config.indent, show_comments)?
            );
            Ok(())
        }
        Commands::Meta { file, key } => {
            let doc = read_document(&file)?;
            match key {
                Some(key) => {
                    let value = doc
                        .get_metadata(&key)
                        .ok_or_else(|| anyhow!("No metadata key `{}` in {}", key, file.display()))?;
                    println!("{}", value);
                }
                None => print!("{}", render_metadata(&doc.meta)),
            }
            Ok(())
        }
        Commands::Tokens { file } => {
            let bytes = read_source(&file)?;
            let source = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", file.display()))?;
            print!("{}", render_tokens(&source));
            Ok(())
        }
        Commands::Info { file } => {
            let mut doc = read_document(&file)?;
            println!("{} {}", style("Document").bold(), file.display());
            print!("{}", render_info(&mut doc)?);
            doc.destroy();
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = &result {
        eprint!("{}", render_error(e, EXCERPT_MARGIN));
    }
    ExitCode::from(exit_status(&result))
}
