//! ItemStore CLI
//!
//! Command-line interface for inspecting and editing a storage directory.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itemstore::{Config, MetaValue, Result, Storage};
use tracing_subscriber::{fmt, EnvFilter};

/// ItemStore CLI
#[derive(Parser, Debug)]
#[command(name = "itemstore-cli")]
#[command(about = "CLI for ItemStore item storage")]
#[command(version)]
struct Args {
    /// Storage root directory
    #[arg(short, long, default_value = "./itemstore_data")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new item
    Create {
        /// Item name
        name: String,

        /// File whose contents become the item data
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Metadata entry (key=value), may be repeated
        #[arg(short, long = "meta", value_parser = parse_entry)]
        meta: Vec<(String, MetaValue)>,
    },

    /// Show data size and metadata of an item
    Info {
        /// Item name
        name: String,
    },

    /// Write item data to stdout
    Read {
        /// Item name
        name: String,

        /// Start offset
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Maximum bytes to read (default: to the end)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Write a file's contents into an item at an offset
    Write {
        /// Item name
        name: String,

        /// Start offset
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// File to write
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Set metadata entries (key=value)
    SetMeta {
        /// Item name
        name: String,

        /// Entries to set
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<(String, MetaValue)>,
    },

    /// Delete metadata keys
    DelMeta {
        /// Item name
        name: String,

        /// Keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Remove an item
    Destroy {
        /// Item name
        name: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,itemstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .root_dir(&args.root)
        .create_root(matches!(args.command, Commands::Create { .. }))
        .build();
    let storage = Storage::new(config)?;

    match args.command {
        Commands::Create { name, input, meta } => {
            let payload = match input {
                Some(path) => fs::read(path)?,
                None => Vec::new(),
            };

            storage.create(&name)?.scope(|item| {
                item.data.write(&payload, 0)?;
                for (key, value) in meta {
                    item.meta.insert(key, value);
                }
                item.meta.flush()
            })?;

            tracing::info!("Created {} ({} bytes)", name, payload.len());
        }

        Commands::Info { name } => {
            storage.open(&name)?.scope(|item| {
                let mut out = io::stdout().lock();
                writeln!(out, "name: {}", item.name())?;
                writeln!(out, "size: {}", item.data.size()?)?;
                for (key, value) in &item.meta {
                    writeln!(out, "meta {} ({}): {}", key, value.kind(), value)?;
                }
                Ok(())
            })?;
        }

        Commands::Read { name, offset, length } => {
            storage.open(&name)?.scope(|item| {
                let length = match length {
                    Some(len) => len,
                    None => remaining_len(item.data.size()?, offset),
                };
                let bytes = item.data.read(offset, length)?;
                io::stdout().lock().write_all(&bytes)?;
                Ok(())
            })?;
        }

        Commands::Write { name, offset, input } => {
            let payload = fs::read(input)?;
            let written = storage
                .openwrite(&name)?
                .scope(|item| item.data.write(&payload, offset))?;

            tracing::info!("Wrote {} bytes to {} at offset {}", written, name, offset);
        }

        Commands::SetMeta { name, entries } => {
            storage.openwrite(&name)?.scope(|item| {
                for (key, value) in entries {
                    item.meta.insert(key, value);
                }
                item.meta.flush()
            })?;
        }

        Commands::DelMeta { name, keys } => {
            storage.openwrite(&name)?.scope(|item| {
                for key in &keys {
                    if item.meta.remove(key).is_none() {
                        tracing::warn!("No metadata key {:?} on {}", key, name);
                    }
                }
                item.meta.flush()
            })?;
        }

        Commands::Destroy { name } => {
            storage.destroy(&name)?;
            tracing::info!("Destroyed {}", name);
        }
    }

    Ok(())
}

/// Parse `key=value`; integers and `true`/`false` keep their type
fn parse_entry(raw: &str) -> std::result::Result<(String, MetaValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))?;

    if key.is_empty() {
        return Err(format!("empty key in {:?}", raw));
    }

    let value = if let Ok(i) = value.parse::<i64>() {
        MetaValue::Int(i)
    } else if let Ok(b) = value.parse::<bool>() {
        MetaValue::Bool(b)
    } else {
        MetaValue::Str(value.to_string())
    };

    Ok((key.to_string(), value))
}

/// Bytes from `offset` to the end of a region of `size` bytes
///
/// Saturates on targets where the count does not fit in `usize`; `read`
/// clamps to the available bytes anyway.
fn remaining_len(size: u64, offset: u64) -> usize {
    usize::try_from(size.saturating_sub(offset)).unwrap_or(usize::MAX)
}
