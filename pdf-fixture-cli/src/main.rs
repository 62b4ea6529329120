use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_fixture::{
    generate_batch, BatchOptions, ErrorKind, FixtureConfig, FixtureError, GenerationRequest,
    PdfSettings, SizeTargetingGenerator, DEFAULT_CONFIG_FILE,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleObserver;

#[derive(Parser)]
#[command(
    name = "pdf-fixture",
    about = "Generate PDF test fixtures of a target size",
    version,
    author
)]
struct Cli {
    /// Do not print progress
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single PDF of at least the given size
    Generate {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Target size in megabytes
        #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
        size_mb: f64,

        /// Title printed on every page
        #[arg(short, long, default_value = "Attachment 1")]
        title: String,
    },

    /// Generate a batch of attachments (attachment-1.pdf .. attachment-N.pdf)
    Batch {
        /// Configuration file (defaults to ./pdf-fixture.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of documents
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Target size of each document in megabytes
        #[arg(short, long, allow_negative_numbers = true)]
        size_mb: Option<f64>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Append the target size to filenames
        #[arg(long)]
        label_sizes: bool,

        /// Documents generated concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample configuration file
    InitConfig {
        /// Output file path
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Values given on the command line for the `batch` command
struct BatchOverrides {
    config: Option<PathBuf>,
    count: Option<i64>,
    size_mb: Option<f64>,
    output_dir: Option<PathBuf>,
    label_sizes: bool,
    jobs: Option<usize>,
}

impl BatchOverrides {
    /// Merges the configuration file (if any) with command-line values.
    /// Flags win over file values.
    fn resolve(self) -> pdf_fixture::Result<PdfSettings> {
        let file = match &self.config {
            Some(path) => Some(FixtureConfig::load(path)?),
            None => match FixtureConfig::discover(".") {
                Ok(config) => Some(config),
                Err(e) if e.kind() == ErrorKind::ConfigurationMissing => None,
                Err(e) => return Err(e),
            },
        };

        let mut settings = match file {
            Some(config) => config.pdf,
            None => match (self.count, self.size_mb, &self.output_dir) {
                (Some(count), Some(size_mb), Some(output_dir)) => PdfSettings {
                    count,
                    size_mb,
                    output_dir: output_dir.clone(),
                    label_sizes: false,
                    parallelism: 1,
                },
                _ => {
                    return Err(FixtureError::ConfigurationMissing {
                        searched: vec![PathBuf::from(DEFAULT_CONFIG_FILE)],
                    })
                }
            },
        };

        if let Some(count) = self.count {
            settings.count = count;
        }
        if let Some(size_mb) = self.size_mb {
            settings.size_mb = size_mb;
        }
        if let Some(output_dir) = self.output_dir {
            settings.output_dir = output_dir;
        }
        if self.label_sizes {
            settings.label_sizes = true;
        }
        if let Some(jobs) = self.jobs {
            settings.parallelism = jobs;
        }

        Ok(settings)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("pdf_fixture={level},pdf_fixture_cli={level}"))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Contents written by `init-config`
fn sample_config() -> pdf_fixture::Result<String> {
    let body = FixtureConfig::default().to_toml_string()?;
    Ok(format!(
        "# pdf-fixture configuration (size_mb accepts fractions, e.g. 0.5)\n{body}"
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            output,
            size_mb,
            title,
        } => {
            let request = GenerationRequest::from_megabytes(title, size_mb, &output);
            let console = ConsoleObserver::new(cli.quiet, true);

            let result = SizeTargetingGenerator::new()
                .generate(&request, &console)
                .with_context(|| format!("Failed to generate {}", output.display()))?;

            println!(
                "✓ PDF created: {} ({} bytes, {} pages)",
                result.path.display(),
                result.size_bytes,
                result.pages
            );
        }

        Commands::Batch {
            config,
            count,
            size_mb,
            output_dir,
            label_sizes,
            jobs,
            json,
        } => {
            let settings = BatchOverrides {
                config,
                count,
                size_mb,
                output_dir,
                label_sizes,
                jobs,
            }
            .resolve()
            .context("Failed to load batch configuration")?;
            debug!("Resolved batch settings: {:?}", settings);

            let options: BatchOptions = settings.batch_options();
            let console = ConsoleObserver::new(cli.quiet || json, options.parallelism == 1);

            let summary = generate_batch(
                settings.document_count(),
                settings.target(),
                &settings.output_dir,
                &options,
                &console,
            )
            .context("Batch generation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!();
                print!("{}", summary.format_report());
            }
        }

        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                );
            }
            let content = sample_config().context("Failed to render sample configuration")?;
            std::fs::write(&output, content)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✓ Configuration written to {}", output.display());
        }
    }

    Ok(())
}
