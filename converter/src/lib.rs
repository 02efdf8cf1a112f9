use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use corpus::archive::extract_archive;
use corpus::config::{parse_char_set, parse_tag_list, SwdaConfig};
use corpus::pipeline::{self, RunStats};
use corpus::splits::Split;
use corpus::tags::TagScheme;
use std::path::PathBuf;

/// Default metadata location, relative to the data directory.
const METADATA_REL: &str = "metadata";

#[derive(Parser)]
#[command(
    name = "swda_to_text",
    about = "Convert the Switchboard dialogue-act corpus into train/test/eval/dev text files"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the corpus archive into split text files (default).
    Convert(ConvertArgs),

    /// Only unpack the corpus archive into a directory.
    Extract {
        /// Destination directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Archive to unpack (defaults to SWDA_ARCHIVE).
        #[arg(long)]
        archive: Option<PathBuf>,
    },
}

#[derive(Args, Default, Debug)]
struct ConvertArgs {
    /// Corpus zip archive, or an already extracted corpus directory.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Root directory for the produced files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory holding train_split.txt, test_split.txt, eval_split.txt and dev_split.txt.
    #[arg(long)]
    metadata_dir: Option<PathBuf>,

    /// Write utterance text only, without speaker and act tag.
    #[arg(long)]
    utterance_only: bool,

    /// Comma-separated act tags to drop (e.g. "x,+"). An empty value drops none.
    #[arg(long)]
    exclude_tags: Option<String>,

    /// Characters to strip from utterance text (e.g. "<>()-#").
    #[arg(long)]
    exclude_chars: Option<String>,

    /// Act tag scheme: raw or damsl.
    #[arg(long)]
    tag_scheme: Option<TagScheme>,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run_convert(ConvertArgs::default()),
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Extract { output, archive }) => run_extract(output, archive),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    println!("Switchboard dialogue-act corpus converter");

    let config = apply_overrides(SwdaConfig::from_env()?, args);
    let stats = pipeline::convert(&config)?;
    print_summary(&config, &stats);
    Ok(())
}

fn run_extract(output: PathBuf, archive: Option<PathBuf>) -> Result<()> {
    let archive = match archive {
        Some(path) => path,
        None => SwdaConfig::from_env()?.archive_path,
    };
    std::fs::create_dir_all(&output)
        .with_context(|| format!("create output dir {}", output.display()))?;

    let files = extract_archive(&archive, &output)?;
    println!(
        "Extracted {} files from {} into {}",
        files,
        archive.display(),
        output.display()
    );
    Ok(())
}

fn apply_overrides(mut config: SwdaConfig, args: ConvertArgs) -> SwdaConfig {
    if let Some(path) = args.archive {
        config.archive_path = path;
    }
    if let Some(dir) = args.data_dir {
        // Metadata follows the data dir unless it was placed elsewhere.
        if config.metadata_dir == config.data_dir.join(METADATA_REL) {
            config.metadata_dir = dir.join(METADATA_REL);
        }
        config.data_dir = dir;
    }
    if let Some(dir) = args.metadata_dir {
        config.metadata_dir = dir;
    }
    if args.utterance_only {
        config.utterance_only = true;
    }
    if let Some(tags) = args.exclude_tags {
        config.excluded_tags = parse_tag_list(&tags);
    }
    if let Some(chars) = args.exclude_chars {
        config.excluded_chars = parse_char_set(&chars);
    }
    if let Some(scheme) = args.tag_scheme {
        config.tag_scheme = scheme;
    }
    config
}

fn print_summary(config: &SwdaConfig, stats: &RunStats) {
    println!(
        "Conversion complete: transcripts={} utterances_kept={} utterances_dropped={} unassigned={}",
        stats.transcripts, stats.utterances_kept, stats.utterances_dropped, stats.unassigned
    );
    for split in Split::ALL {
        println!("  {:?}: {} dialogues", split, stats.split_count(split));
    }
    println!("Output written to {}", config.data_dir.display());
}
