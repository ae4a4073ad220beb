//! Command line driver: trains a network on a sample file, or generates XOR samples.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scalarnet::data::{write_xor_samples, SampleSource, TrainingData};
use scalarnet::feedforward::{NetConfig, Network};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "scalar_nnet")]
#[command(about = "Online backpropagation on an explicit feedforward network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network on a sample file
    Train {
        /// Training data file
        #[arg(default_value = "/tmp/data.txt")]
        path: PathBuf,

        /// Overall training rate (eta)
        #[arg(long, default_value = "0.15")]
        learning_rate: f64,

        /// Multiplier of the last weight change (alpha)
        #[arg(long, default_value = "0.5")]
        momentum: f64,

        /// Number of samples the recent average error is smoothed over
        #[arg(long, default_value = "100.0")]
        smoothing_factor: f64,
    },

    /// Write random XOR samples
    MakeSamples {
        /// Number of samples
        #[arg(short, long, default_value = "2001")]
        count: usize,

        /// Output file, standard output if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so generated samples can be piped
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            path,
            learning_rate,
            momentum,
            smoothing_factor,
        } => {
            let config = NetConfig::new(learning_rate, momentum, smoothing_factor);
            train(&path, config)?;
        }
        Commands::MakeSamples { count, output } => {
            let mut rng = rand::thread_rng();
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    write_xor_samples(&mut BufWriter::new(file), &mut rng, count)?;
                    info!(count, path = %path.display(), "samples written");
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    write_xor_samples(&mut lock, &mut rng, count)?;
                    lock.flush()?;
                }
            }
        }
    }

    Ok(())
}

fn train(path: &Path, config: NetConfig) -> Result<()> {
    let mut data = TrainingData::open(path)
        .with_context(|| format!("cannot load training data from {}", path.display()))?;

    let net = Network::new(data.topology(), config)?;
    let mut trainer = net.build_trainer();

    let passes = trainer.train_from(&mut data, |report| {
        info!(
            pass = report.pass,
            inputs = ?report.inputs,
            outputs = ?report.outputs,
            targets = ?report.targets,
            "net recent average error: {}",
            report.recent_average_error
        );
    })?;

    info!(passes, "done");
    Ok(())
}
