//! sops-runner - decrypt and encrypt files through the sops CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sops_runner::codes::SOPS_ERROR_CODES;
use sops_runner::{
    DecodeMode, DecryptOptions, EncryptOptions, Plaintext, RunnerConfig, Sops, TracingSink,
};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sops-runner")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Decrypt and encrypt files through the sops CLI",
    long_about = "Runs sops, forwards its stderr as trace logs, and reports failures by sops exit code category."
)]
struct Cli {
    /// sops executable to run
    #[arg(long, global = true, env = "SOPS_RUNNER_BINARY")]
    sops_binary: Option<PathBuf>,

    /// JSON runner configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-vvvv shows sops stderr); overrides RUST_LOG when given
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt a file to stdout
    Decrypt {
        /// Encrypted file
        file: PathBuf,

        /// Format of the encrypted file
        #[arg(long)]
        input_type: Option<String>,

        /// Format of the decrypted output
        #[arg(long)]
        output_type: Option<String>,

        /// Write the output as raw bytes, without decoding or trimming
        #[arg(long)]
        raw: bool,

        /// Keep trailing whitespace
        #[arg(long, conflicts_with = "raw")]
        no_rstrip: bool,

        /// Replace invalid UTF-8 instead of failing
        #[arg(long, conflicts_with = "raw")]
        lossy: bool,
    },

    /// Encrypt data to stdout
    Encrypt {
        /// Input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Working directory for sops (where .sops.yaml is looked up)
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Format of the plaintext
        #[arg(long)]
        input_type: Option<String>,

        /// Format of the encrypted output
        #[arg(long)]
        output_type: Option<String>,
    },

    /// List the sops exit codes this tool recognizes
    Codes,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<sops_runner::Error>()
            .and_then(sops_runner::Error::exit_code)
            .filter(|&code| code > 0)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

/// Filter directive for the subscriber. An explicit `-v` beats `RUST_LOG`.
fn filter_directive(verbose: u8, rust_log: Option<String>) -> String {
    let level = match verbose {
        0 => return rust_log.unwrap_or_else(|| "warn".to_string()),
        1 => "info",
        2 | 3 => "debug",
        _ => "trace",
    };
    level.to_string()
}

fn init_logging(verbose: u8) {
    let directive = filter_directive(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => RunnerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    if let Some(binary) = cli.sops_binary {
        config.binary = binary;
    }
    let sops = Sops::with_config(config)?;

    match cli.command {
        Commands::Decrypt {
            file,
            input_type,
            output_type,
            raw,
            no_rstrip,
            lossy,
        } => {
            let mut options = if raw {
                DecryptOptions::raw()
            } else {
                DecryptOptions::new().rstrip(!no_rstrip)
            };
            options.input_type = input_type;
            options.output_type = output_type;
            if lossy {
                options = options.decode_mode(DecodeMode::Lossy);
            }
            cmd_decrypt(&sops, &file, &options)
        }

        Commands::Encrypt {
            input,
            cwd,
            input_type,
            output_type,
        } => {
            let options = EncryptOptions {
                input_type,
                output_type,
                cwd,
            };
            cmd_encrypt(&sops, input, &options)
        }

        Commands::Codes => cmd_codes(),
    }
}

fn cmd_decrypt(sops: &Sops, file: &Path, options: &DecryptOptions) -> anyhow::Result<()> {
    let plaintext = sops.decrypt(file, options, Some(&TracingSink))?;

    let mut stdout = io::stdout().lock();
    match plaintext {
        Plaintext::Text(text) if options.rstrip => writeln!(stdout, "{}", text)?,
        Plaintext::Text(text) => write!(stdout, "{}", text)?,
        Plaintext::Bytes(bytes) => stdout.write_all(&bytes)?,
    }
    stdout.flush()?;

    Ok(())
}

fn cmd_encrypt(sops: &Sops, input: Option<PathBuf>, options: &EncryptOptions) -> anyhow::Result<()> {
    let data = match input {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };

    let encrypted = sops.encrypt(&data, options, Some(&TracingSink))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&encrypted)?;
    stdout.flush()?;

    Ok(())
}

fn cmd_codes() -> anyhow::Result<()> {
    println!("Code  Category");
    println!("====  ========");
    for (code, category) in SOPS_ERROR_CODES {
        println!("{:>4}  {}", code, category);
    }
    Ok(())
}
