//! # Analysekarte CLI
//!
//! Command-line interface for map compositing and report generation.
//!
//! ## Usage
//!
//! ```bash
//! # Composite layers (bottom first) into karte_final.png
//! analysekarte combine basis.png wald.png strassen.png
//!
//! # Build the PDF report from a composited map and a job's legend
//! analysekarte report karte_final.png --job job.json
//!
//! # Run a complete job: composite, then report
//! analysekarte run job.json --title "Analysekarte Nord"
//!
//! # Show what is happening
//! RUST_LOG=debug analysekarte run job.json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use analysekarte::{
    ReportError,
    compositor::{self, DEFAULT_MAP_PATH},
    job::{Job, JobOutputs},
    report::{self, DEFAULT_REPORT_PATH, DEFAULT_TITLE},
};

/// Analysekarte - map layer compositing and PDF report generation
#[derive(Parser, Debug)]
#[command(name = "analysekarte")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Composite image layers into one map image
    Combine {
        /// Layer images, bottom layer first
        #[arg(required = true)]
        layers: Vec<PathBuf>,

        /// Output image (format chosen from the extension)
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MAP_PATH)]
        output: PathBuf,
    },

    /// Build the PDF report from a composited map image
    Report {
        /// Composited map image
        map: PathBuf,

        /// Job file to read the legend from (legend is empty when omitted)
        #[arg(long, value_name = "FILE")]
        job: Option<PathBuf>,

        /// Output PDF
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// Report title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
    },

    /// Run a JSON job: composite the visible layers, then build the report
    Run {
        /// Job file with visibleLayers and legendData
        job: PathBuf,

        /// Composited map output
        #[arg(long, value_name = "FILE", default_value = DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Report output
        #[arg(long, value_name = "FILE", default_value = DEFAULT_REPORT_PATH)]
        pdf: PathBuf,

        /// Report title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ReportError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Combine { layers, output } => {
            let path = compositor::combine(&layers, output)?;
            println!("Wrote {}", path.display());
        }
        Commands::Report {
            map,
            job,
            output,
            title,
        } => {
            let legend = match job {
                Some(path) => Job::from_path(path)?.legend_data,
                None => Vec::new(),
            };
            let path = report::build(map, &legend, output, &title)?;
            println!("Wrote {}", path.display());
        }
        Commands::Run {
            job,
            map,
            pdf,
            title,
        } => {
            let outputs = JobOutputs {
                map_path: map,
                report_path: pdf,
                title,
            };
            let artifacts = Job::from_path(job)?.run(&outputs)?;
            println!("Wrote {}", artifacts.map.display());
            println!("Wrote {}", artifacts.report.display());
        }
    }

    Ok(())
}
