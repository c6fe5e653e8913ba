//! Command-line surface: one-shot batch mode and the interactive menu.

pub mod interactive;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use crate::config::SpkConfig;
use crate::source::{self, CsvRowSource, RowSource, SourceKind};
use crate::spk::batch::CSV_BATCH_NAME;
use crate::spk::{BatchStatus, GenerationReport, LogoCache, SpkGenerator};
use crate::surface::{RecordingFactory, SurfaceFactory, TypstRenderEngine};

#[derive(Parser, Debug)]
#[command(
    name = "spk-generator",
    version,
    about = "Generate two-up SPK (Surat Perintah Kerja) notices from spreadsheets"
)]
pub struct Cli {
    /// Input workbook (.xlsx/.xls) or CSV file. Omit to open the interactive menu.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory for generated documents (default: $SPK_OUTPUT_DIR or ./output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Letterhead logo image (default: $SPK_LOGO_PATH or logo/images.png).
    #[arg(long, value_name = "PATH")]
    pub logo: Option<PathBuf>,

    /// Output format; `json` writes the page layout instead of a PDF.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
    pub format: OutputFormat,

    /// Print a machine-readable generation report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Json,
}

impl Cli {
    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: SpkConfig) -> SpkConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(logo) = &self.logo {
            config.logo_path = logo.clone();
        }
        config
    }
}

/// Build the generator for a run: one logo cache, one backend.
pub fn build_generator(config: &SpkConfig, format: OutputFormat) -> SpkGenerator {
    let factory: Box<dyn SurfaceFactory> = match format {
        OutputFormat::Pdf => Box::new(TypstRenderEngine::new(&config.typst_bin)),
        OutputFormat::Json => Box::new(RecordingFactory),
    };
    SpkGenerator::new(factory, &config.output_dir)
        .with_logo(LogoCache::new(Some(config.logo_path.clone())))
        .with_defaults(config.defaults.clone())
}

/// Entry point after logging is set up. Every path ends successfully;
/// problems are printed and the run moves on.
pub fn run(cli: Cli, config: SpkConfig) -> anyhow::Result<()> {
    let generator = build_generator(&config, cli.format);

    match &cli.input {
        Some(input) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(e) = run_batch(input, &generator, cli.json, &mut out) {
                log::error!("{e:#}");
                writeln!(out, "Error: {e:#}")?;
            }
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            interactive::Session::new(&config, &generator)
                .run(stdin.lock(), stdout.lock())
                .context("interactive session failed")?;
        }
    }

    Ok(())
}

/// Non-interactive mode: generate everything in `input`.
pub fn run_batch<W: Write>(
    input: &Path,
    generator: &SpkGenerator,
    json: bool,
    out: &mut W,
) -> anyhow::Result<GenerationReport> {
    let kind = SourceKind::from_path(input);
    let mut reader: Box<dyn RowSource> = match kind {
        SourceKind::Csv => Box::new(CsvRowSource::new(input).with_batch_name(CSV_BATCH_NAME)),
        _ => source::open_source(input)?,
    };

    let report = generator
        .generate_from_source(&mut *reader)
        .with_context(|| format!("failed to read {}", input.display()))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        print_report(&report, out)?;
    }
    Ok(report)
}

pub fn print_report<W: Write>(report: &GenerationReport, out: &mut W) -> io::Result<()> {
    for batch in &report.batches {
        match &batch.status {
            BatchStatus::Generated { path, pages } => {
                writeln!(out, "Generated: {} ({} halaman)", path.display(), pages)?
            }
            BatchStatus::NothingGenerated => {
                writeln!(out, "Tidak ada data untuk {}, tidak ada file dibuat", batch.batch)?
            }
            BatchStatus::Failed { error } => writeln!(out, "Gagal {}: {}", batch.batch, error)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_input() {
        let cli = Cli::try_parse_from(["spk-generator", "data.xlsx", "--output-dir", "out"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("data.xlsx")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.format, OutputFormat::Pdf);
    }

    #[test]
    fn test_no_arguments_means_interactive() {
        let cli = Cli::try_parse_from(["spk-generator"]).unwrap();
        assert!(cli.input.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_overrides_apply_on_config() {
        let cli = Cli::try_parse_from(["spk-generator", "--logo", "brand.png", "--format", "json"]).unwrap();
        let config = cli.apply(SpkConfig::default());
        assert_eq!(config.logo_path, PathBuf::from("brand.png"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
