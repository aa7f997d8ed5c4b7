//! rekor-monitor: verify saved Rekor entries, checkpoints and proofs offline
//!
//! Every verification failure exits with the status of its error kind (see
//! [`rekor_verify::Error::exit_code`]); usage errors exit with 2.

mod source;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rekor_merkle::Rfc6962Hasher;
use rekor_types::{Hex, TreeState};
use rekor_verify::{EntryReport, LogSource, Verdict, Verifier, VerifyConfig};
use source::{FileSource, SourceError};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rekor-monitor", version, about, long_about = None)]
struct Cli {
    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a saved log-info document and print it
    Checkpoint {
        /// Response of GET /api/v1/log
        #[arg(long)]
        checkpoint: PathBuf,
    },

    /// Verify inclusion and signature of a saved entry
    Inclusion {
        /// Response of GET /api/v1/log/entries?logIndex=N
        #[arg(long)]
        entry: PathBuf,

        /// The signed artifact
        #[arg(long)]
        artifact: PathBuf,

        /// Require the entry to sit at this global log index
        #[arg(long, allow_negative_numbers = true)]
        log_index: Option<i64>,
    },

    /// Verify that a previously seen tree is a prefix of the latest one
    Consistency {
        /// Tree ID of the previously seen tree
        #[arg(long)]
        tree_id: String,

        /// Size of the previously seen tree
        #[arg(long)]
        tree_size: u64,

        /// Root hash (hex) of the previously seen tree
        #[arg(long)]
        root_hash: String,

        /// Response of GET /api/v1/log
        #[arg(long)]
        checkpoint: PathBuf,

        /// Response of GET /api/v1/log/proof
        #[arg(long)]
        proof: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        let code = e
            .downcast_ref::<rekor_verify::Error>()
            .map(rekor_verify::Error::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}

/// `RUST_LOG` wins over `--debug`
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let verifier = Verifier::new(Rfc6962Hasher, VerifyConfig::default().with_debug(cli.debug));

    match cli.command {
        Command::Checkpoint { checkpoint } => {
            let source = FileSource::new().with_checkpoint(checkpoint);
            let latest = source
                .latest_checkpoint()
                .map_err(|e| source_error(e, rekor_verify::Error::CheckpointMismatch))?;
            verifier.verify_checkpoint(&latest)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&latest).context("failed to render checkpoint")?
            );
        }
        Command::Inclusion {
            entry,
            artifact,
            log_index,
        } => {
            let artifact = fs::read(&artifact).map_err(|e| {
                rekor_verify::Error::InputUnavailable(format!(
                    "failed to read {}: {}",
                    artifact.display(),
                    e
                ))
            })?;
            let source = FileSource::new().with_entry(entry);

            let report = match log_index {
                Some(index) => verifier.inclusion_from_source(&source, index, &artifact)?,
                None => {
                    let entry = source
                        .entry()
                        .map_err(|e| source_error(e, rekor_verify::Error::MalformedEntry))?;
                    verifier.verify_entry(&entry, &artifact)?
                }
            };

            print_report(&report);
            match report.verdict() {
                Verdict::Valid => println!("verdict: valid"),
                Verdict::Invalid(e) => {
                    println!("verdict: invalid");
                    return Err(e.into());
                }
            }
        }
        Command::Consistency {
            tree_id,
            tree_size,
            root_hash,
            checkpoint,
            proof,
        } => {
            let previous = TreeState::new(tree_id, tree_size, Hex::new(root_hash));
            let source = FileSource::new()
                .with_checkpoint(checkpoint)
                .with_proof(proof);

            let latest = verifier.consistency_from_source(&source, &previous)?;
            println!(
                "tree {} is consistent from size {} to {}",
                latest.tree_id, previous.tree_size, latest.tree_size
            );
            println!("root hash: {}", latest.root_hash);
        }
    }

    Ok(())
}

/// Undecodable files are reported with `malformed`, unreadable ones as
/// unavailable input
fn source_error(
    error: SourceError,
    malformed: fn(String) -> rekor_verify::Error,
) -> rekor_verify::Error {
    if FileSource::is_malformed(&error) {
        malformed(error.to_string())
    } else {
        rekor_verify::Error::InputUnavailable(error.to_string())
    }
}

fn print_report<T: AsRef<[u8]>>(report: &EntryReport<T>) {
    println!("entry {} at log index {}", report.uuid, report.log_index);
    println!("leaf hash: {}", Hex::encode(report.leaf_hash.as_ref()));
    println!("inclusion: {}", outcome(&report.inclusion));
    println!("signature: {}", outcome(&report.signature));

    if let Some(cert) = &report.certificate {
        println!("certificate subject: {}", cert.subject);
        if let Some(identity) = &cert.identity {
            println!("certificate identity: {}", identity);
        }
        if let Some(issuer) = &cert.issuer {
            println!("certificate issuer: {}", issuer);
        }
    }
}

fn outcome(result: &rekor_verify::Result<()>) -> String {
    match result {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("FAILED ({})", e),
    }
}
