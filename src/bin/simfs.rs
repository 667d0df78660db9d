//! simfs CLI
//!
//! Command-line front end for a simfs volume image.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use simfs::{Comparison, Config, FsError, Volume};
use tracing_subscriber::{fmt, EnvFilter};

/// simfs CLI
#[derive(Parser, Debug)]
#[command(name = "simfs")]
#[command(about = "Simulated single-image storage volume")]
#[command(version)]
struct Args {
    /// Backing image file
    #[arg(short, long, default_value = "disk.sim")]
    image: PathBuf,

    /// Operation log file
    #[arg(short, long, default_value = "fs.log")]
    log: PathBuf,

    /// Do not record operations in the log
    #[arg(long)]
    no_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty file
    Create { name: String },

    /// Delete a file
    Rm { name: String },

    /// Replace a file's contents
    Write { name: String, data: String },

    /// Append to the end of a file
    Append { name: String, data: String },

    /// Read a byte range of a file
    Read {
        name: String,
        /// Start offset in bytes
        offset: u64,
        /// Number of bytes to read
        length: u64,
    },

    /// List files
    Ls,

    /// Erase all files and zero the data region
    Format {
        /// Confirm the format
        #[arg(long)]
        yes: bool,
    },

    /// Rename a file
    Rename { old: String, new: String },

    /// Check whether a file exists
    Exists { name: String },

    /// Print a file's size
    Size { name: String },

    /// Shrink a file
    Truncate { name: String, size: u64 },

    /// Copy a file
    Cp { src: String, dest: String },

    /// Move (rename) a file
    Mv { src: String, dest: String },

    /// Pack all data to the front of the data region
    Defrag,

    /// Check table consistency
    Check,

    /// Copy the whole image to a file
    Backup { target: PathBuf },

    /// Replace the image with a backup
    Restore { source: PathBuf },

    /// Print a file's contents
    Cat { name: String },

    /// Compare two files
    Diff { left: String, right: String },

    /// Show the operation log
    Log,

    /// Show space usage
    Stats,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,simfs=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder().image_path(&args.image);
    builder = if args.no_log {
        builder.without_log()
    } else {
        builder.log_path(&args.log)
    };

    let mut volume = match Volume::open(builder.build()) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", args.image.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut volume, args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            if matches!(e, FsError::OutOfSpace { .. }) {
                eprintln!("hint: run `simfs defrag` and try again");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(volume: &mut Volume, command: Commands) -> simfs::Result<ExitCode> {
    match command {
        Commands::Create { name } => {
            volume.create(&name)?;
            println!("Created '{}'", name);
        }
        Commands::Rm { name } => {
            volume.delete(&name)?;
            println!("Deleted '{}'", name);
        }
        Commands::Write { name, data } => {
            volume.write(&name, data.as_bytes())?;
            println!("Wrote {} bytes to '{}'", data.len(), name);
        }
        Commands::Append { name, data } => {
            volume.append(&name, data.as_bytes())?;
            let size = volume.entry(&name).map_or(0, |e| e.size);
            println!(
                "Appended {} bytes to '{}' (size {})",
                data.len(),
                name,
                size
            );
        }
        Commands::Read {
            name,
            offset,
            length,
        } => {
            let bytes = volume.read(&name, offset, length)?;
            println!("{} bytes: \"{}\"", bytes.len(), String::from_utf8_lossy(&bytes));
        }
        Commands::Ls => {
            let entries = volume.list();
            if entries.is_empty() {
                println!("No files.");
            } else {
                println!("{:<31} {:>10} {:>20}", "NAME", "SIZE", "CREATED");
                for entry in entries {
                    println!("{:<31} {:>10} {:>20}", entry.name, entry.size, entry.created);
                }
            }
        }
        Commands::Format { yes } => {
            if !yes {
                println!("Format erases every file; re-run with --yes to confirm.");
                return Ok(ExitCode::FAILURE);
            }
            volume.format()?;
            println!("Formatted {}", volume.image_path().display());
        }
        Commands::Rename { old, new } => {
            volume.rename(&old, &new)?;
            println!("Renamed '{}' -> '{}'", old, new);
        }
        Commands::Exists { name } => {
            let exists = volume.exists(&name);
            println!(
                "'{}' {}",
                name,
                if exists { "exists" } else { "does not exist" }
            );
            if !exists {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Size { name } => {
            println!("{}", volume.size(&name)?);
        }
        Commands::Truncate { name, size } => {
            volume.truncate(&name, size)?;
            println!("Truncated '{}' to {} bytes", name, size);
        }
        Commands::Cp { src, dest } => {
            volume.copy(&src, &dest)?;
            println!("Copied '{}' -> '{}'", src, dest);
        }
        Commands::Mv { src, dest } => {
            volume.mv(&src, &dest)?;
            println!("Moved '{}' -> '{}'", src, dest);
        }
        Commands::Defrag => {
            let moved = volume.defragment()?;
            println!("Defragmented ({} files moved)", moved);
        }
        Commands::Check => {
            let report = volume.check();
            if report.is_consistent() {
                println!("File system is consistent.");
            } else {
                for issue in &report.issues {
                    println!("issue: {}", issue);
                }
                println!("{} issue(s) found", report.issue_count());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Backup { target } => {
            let copied = volume.backup(&target)?;
            println!("Backed up {} bytes to {}", copied, target.display());
        }
        Commands::Restore { source } => {
            let copied = volume.restore(&source)?;
            println!("Restored {} bytes from {}", copied, source.display());
        }
        Commands::Cat { name } => {
            let bytes = volume.cat(&name)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if bytes.last() != Some(&b'\n') {
                stdout.write_all(b"\n")?;
            }
        }
        Commands::Diff { left, right } => match volume.diff(&left, &right)? {
            Comparison::Identical => println!("Files are identical."),
            Comparison::SizeMismatch { left, right } => {
                println!("Files differ: sizes {} vs {} bytes", left, right);
                return Ok(ExitCode::FAILURE);
            }
            Comparison::ContentMismatch {
                offset,
                left,
                right,
            } => {
                println!(
                    "Files differ at byte {} (0x{:02X} vs 0x{:02X})",
                    offset, left, right
                );
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Log => {
            let (entries, stats) = volume.log_entries()?;
            for entry in &entries {
                println!("{}", entry);
            }
            if stats.entries_corrupted > 0 || stats.truncated_tail {
                println!(
                    "({} corrupt entries skipped{})",
                    stats.entries_corrupted,
                    if stats.truncated_tail { ", torn tail" } else { "" }
                );
            }
        }
        Commands::Stats => {
            let stats = volume.stats();
            println!("files:       {}", stats.file_count);
            println!("used bytes:  {}", stats.used_bytes);
            println!("free bytes:  {}", stats.free_bytes);
            println!("largest gap: {}", stats.largest_gap);
            println!("gaps:        {}", stats.gap_count);
            if stats.gap_count > 1 {
                println!("hint: free space is fragmented, `simfs defrag` will merge it");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
