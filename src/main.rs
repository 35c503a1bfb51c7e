//! semlayout - apply and recover row/column layout for semantic HTML

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use semlayout::presentation::resolve_classes;
use semlayout::{
    LayoutDetails, PresentationMap, Result, StyleRegistry, available_styles, extract_presentation,
    extract_structure, format_html, normalize_markup, preview_html,
};

#[derive(Parser)]
#[command(name = "semlayout")]
#[command(version, about = "Row/column layout for semantic HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    semlayout clean paste.html                       Normalize pasted markup
    semlayout structure page.html                    Print the outline as JSON
    semlayout format page.html -p layout.json        Apply a presentation map
    semlayout extract decorated.html                 Split layout from content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Layout strategy configuration (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    strategy: Option<PathBuf>,

    /// Class catalogue (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    styles: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize markup into the canonical subset
    Clean(InputArgs),
    /// Print the document outline as JSON
    Structure(InputArgs),
    /// Apply a presentation map and print the decorated markup
    Format(FormatArgs),
    /// Split decorated markup into clean markup and a presentation map
    Extract(InputArgs),
    /// Print a structural preview of the formatted layout
    Preview(FormatArgs),
    /// List the commands and classes available for a template
    Styles {
        /// Template name used to filter the catalogue
        #[arg(short, long, default_value = "")]
        template: String,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input file; reads stdin when omitted or "-"
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct FormatArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Presentation map (JSON); no layout when omitted
    #[arg(short, long, value_name = "FILE")]
    presentation: Option<PathBuf>,
}

#[derive(Serialize)]
struct Extracted {
    presentation: PresentationMap,
    html: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_user_error() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let strategy = load_strategy(cli.strategy.as_deref())?;
    let registry = match &cli.styles {
        Some(path) => StyleRegistry::from_path(path)?,
        None => StyleRegistry::default(),
    };

    match &cli.command {
        Commands::Clean(args) => Ok(normalize_markup(&read_input(args)?)),
        Commands::Structure(args) => {
            let outline = extract_structure(&read_input(args)?)?;
            Ok(serde_json::to_string_pretty(&outline)?)
        }
        Commands::Format(args) => {
            let pres = load_presentation(args, &registry)?;
            format_html(&read_input(&args.input)?, &pres, &strategy)
        }
        Commands::Preview(args) => {
            let pres = load_presentation(args, &registry)?;
            preview_html(&read_input(&args.input)?, &pres, &strategy)
        }
        Commands::Extract(args) => {
            let (presentation, html) = extract_presentation(&read_input(args)?, &strategy)?;
            Ok(serde_json::to_string_pretty(&Extracted { presentation, html })?)
        }
        Commands::Styles { template } => {
            let styles = available_styles(&registry, template);
            Ok(serde_json::to_string_pretty(&styles)?)
        }
    }
}

fn read_input(args: &InputArgs) -> Result<String> {
    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn load_strategy(path: Option<&Path>) -> Result<LayoutDetails> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(LayoutDetails::default()),
    }
}

/// Read the presentation map, restoring class metadata from the catalogue.
fn load_presentation(args: &FormatArgs, registry: &StyleRegistry) -> Result<PresentationMap> {
    let Some(path) = &args.presentation else {
        return Ok(PresentationMap::new());
    };
    let mut pres: PresentationMap = serde_json::from_str(&fs::read_to_string(path)?)?;
    resolve_classes(&mut pres, &registry.all_classes());
    if pres.is_empty() {
        tracing::warn!(path = %path.display(), "presentation map is empty");
    }
    Ok(pres)
}
