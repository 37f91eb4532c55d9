//! Karta CLI - Command-line tool for character cards embedded in PNG images.
//!
//! This is the main entry point for the Karta command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use karta::png::text;
use karta::prelude::*;

/// Karta - embed and extract character cards in PNG images
#[derive(Parser)]
#[command(name = "karta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// tEXt keyword that marks the card chunk
    #[arg(long, global = true, env = "KARTA_KEYWORD", default_value = karta::card::CARD_KEYWORD)]
    keyword: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a character record into a PNG
    Encode {
        /// Character record JSON file
        #[arg(short, long)]
        record: PathBuf,

        /// Source PNG (a blank 1x1 image is used when omitted)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Require the full 8-byte PNG signature on the source image
        #[arg(long)]
        strict_signature: bool,
    },

    /// Extract the character record from a PNG
    Decode {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the embedded card document instead of the mapped record
        #[arg(long)]
        raw: bool,
    },

    /// List the chunks of a PNG
    Inspect {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Decode every card PNG in a directory
    Scan {
        /// Directory to scan
        #[arg(short, long)]
        input: PathBuf,

        /// Filter pattern relative to the directory (glob-style)
        #[arg(short, long, default_value = "**/*.png")]
        filter: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let codec = CardCodec::new(CodecOptions::default().keyword(cli.keyword));

    match cli.command {
        Commands::Encode {
            record,
            image,
            output,
            strict_signature,
        } => {
            let check = if strict_signature {
                SignatureCheck::Full
            } else {
                SignatureCheck::Prefix
            };
            let codec = CardCodec::new(codec.options().clone().source_check(check));
            cmd_encode(&codec, &record, image.as_deref(), &output)?;
        }
        Commands::Decode { input, output, raw } => {
            cmd_decode(&codec, &input, output.as_deref(), raw)?;
        }
        Commands::Inspect { input } => {
            cmd_inspect(&input)?;
        }
        Commands::Scan { input, filter } => {
            cmd_scan(&codec, &input, &filter)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("KARTA_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_encode(codec: &CardCodec, record_path: &Path, image: Option<&Path>, output: &Path) -> Result<()> {
    let json = fs::read_to_string(record_path).context("Failed to read record file")?;
    let record: CharacterRecord = serde_json::from_str(&json).context("Failed to parse character record")?;

    let source = image
        .map(|path| fs::read(path).context("Failed to read source image"))
        .transpose()?;

    let png = codec
        .encode_to_png(&record, source.as_deref())
        .context("Failed to encode card")?;
    fs::write(output, &png).context("Failed to write output file")?;

    println!(
        "Encoded '{}' into {} ({} bytes)",
        record.profile.name,
        output.display(),
        png.len()
    );

    Ok(())
}

fn cmd_decode(codec: &CardCodec, input: &Path, output: Option<&Path>, raw: bool) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;

    let json = if raw {
        let doc = codec.decode_document_from_png(&data).context("Failed to decode card")?;
        serde_json::to_string_pretty(&doc)?
    } else {
        let record = codec.decode_from_png(&data).context("Failed to decode card")?;
        if record.reconstructed {
            tracing::info!("example dialogs were rebuilt from flattened text");
        }
        serde_json::to_string_pretty(&record)?
    };

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            println!("Decoded card written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;

    if !karta::png::validate_signature(&data) {
        anyhow::bail!("Input file is not a PNG");
    }

    println!("{:>10} {:<6} {:>10} {:<5} KEYWORD", "OFFSET", "TYPE", "LENGTH", "CRC");

    let mut count = 0;
    for chunk in scan_chunks(&data) {
        let chunk = chunk.context("Failed to scan chunks")?;

        let keyword = if chunk.chunk_type == ChunkType::TEXT {
            text::split_keyword(chunk.data)
                .map(|(keyword, _)| String::from_utf8_lossy(keyword).into_owned())
                .unwrap_or_else(|_| "<no separator>".to_string())
        } else {
            String::new()
        };

        println!(
            "{:>10} {:<6} {:>10} {:<5} {}",
            chunk.offset,
            chunk.chunk_type.to_string(),
            chunk.length,
            if chunk.integrity_ok { "ok" } else { "BAD" },
            keyword
        );
        count += 1;
    }

    println!("\nTotal: {} chunks", count);

    Ok(())
}

fn cmd_scan(codec: &CardCodec, input: &Path, filter: &str) -> Result<()> {
    let pattern = input.join(filter);
    let pattern = pattern.to_str().context("Scan path is not valid UTF-8")?;

    let paths: Vec<PathBuf> = glob::glob(pattern)
        .context("Invalid filter pattern")?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("skipping unreadable path: {}", e);
                None
            }
        })
        .collect();

    println!("Scanning {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(&PathBuf, Result<String>)> = paths
        .par_iter()
        .map(|path| {
            let name = fs::read(path)
                .context("Failed to read file")
                .and_then(|data| Ok(codec.decode_from_png(&data)?.profile.name));
            pb.inc(1);
            (path, name)
        })
        .collect();

    pb.finish_with_message("Done");

    let mut cards = 0;
    let mut errors = 0;
    for (path, result) in &results {
        match result {
            Ok(name) => {
                println!("{}: {}", path.display(), name);
                cards += 1;
            }
            Err(e) => {
                eprintln!("Error decoding {}: {:#}", path.display(), e);
                errors += 1;
            }
        }
    }

    println!(
        "Decoded {} cards in {:?} ({} errors)",
        cards,
        start.elapsed(),
        errors
    );

    Ok(())
}
