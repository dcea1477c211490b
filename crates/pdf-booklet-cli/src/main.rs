mod logger;
mod report;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::StderrLogger;
use pdf_booklet::constants::MAX_SHEETS_PER_SIGNATURE;
use pdf_booklet::{BookletOptions, SheetMargins, SignaturePlan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfbook", about = "Saddle-stitch booklet maker", version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Impose a PDF into a printable booklet
    Make {
        /// Input PDF file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        folding: FoldingArgs,

        /// Output paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Scaling mode
        #[arg(long, value_enum)]
        scaling: Option<ScalingArg>,

        /// Sheet margin in mm (uniform on all sides)
        #[arg(long)]
        margin: Option<f32>,

        /// Draw a dashed line along the fold
        #[arg(long)]
        fold_line: bool,

        /// Load options from a JSON file; other flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show how pages land on sheets without writing a PDF
    Plan {
        /// Number of pages in the source
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        pages: Option<usize>,

        /// Read the page count from a PDF
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        folding: FoldingArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Page selection and folding flags shared by `make` and `plan`
#[derive(Args)]
struct FoldingArgs {
    /// First source page (1-based, default: 1)
    #[arg(long)]
    first: Option<usize>,

    /// Last source page (default: last page of the source)
    #[arg(long)]
    last: Option<usize>,

    /// Sheets folded together into each signature
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_SHEETS_PER_SIGNATURE as i64))]
    sheets: Option<u8>,

    /// Turn back-side pages 180° for printers that flip on the long edge
    #[arg(long)]
    rotate_back: bool,
}

impl FoldingArgs {
    fn apply(&self, options: &mut BookletOptions) {
        if self.first.is_some() {
            options.first_page = self.first;
        }
        if self.last.is_some() {
            options.last_page = self.last;
        }
        if let Some(sheets) = self.sheets {
            options.sheets_per_signature = usize::from(sheets);
        }
        if self.rotate_back {
            options.rotate_back_side = true;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    Fit,
    Fill,
    None,
}

impl From<PaperArg> for pdf_booklet::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A0 => Self::A0,
            PaperArg::A1 => Self::A1,
            PaperArg::A2 => Self::A2,
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::A6 => Self::A6,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<ScalingArg> for pdf_booklet::ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Fit => Self::Fit,
            ScalingArg::Fill => Self::Fill,
            ScalingArg::None => Self::None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Make {
            input,
            output,
            folding,
            paper,
            scaling,
            margin,
            fold_line,
            config,
            save_config,
            stats_only,
        } => {
            let mut options = match &config {
                Some(path) => BookletOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => BookletOptions::default(),
            };

            if let Some(input) = input {
                options.input_file = input;
            }
            if let Some(output) = output {
                options.output_file = output;
            }
            folding.apply(&mut options);
            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if let Some(scaling) = scaling {
                options.scaling_mode = scaling.into();
            }
            if let Some(margin) = margin {
                options.sheet_margins = SheetMargins::uniform(margin);
            }
            if fold_line {
                options.fold_line = true;
            }

            if let Some(path) = &save_config {
                options
                    .save(path)
                    .await
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                log::info!("Saved options to {}", path.display());
            }

            if stats_only {
                if options.input_file.as_os_str().is_empty() {
                    bail!("No input file specified");
                }
                let source = pdf_booklet::open_source(&options.input_file).await?;
                let range = options.resolve_range(source.page_count())?;
                let plan = SignaturePlan::from_parts(options.signature_config()?, range);
                let stats = pdf_booklet::calculate_statistics(&plan, source.page_count());
                print!("{}", report::format_statistics(&stats));
                return Ok(());
            }

            let booklet = pdf_booklet::make_booklet(&options).await?;
            print!("{}", report::format_statistics(&booklet.statistics));
            println!("Booklet → {}", booklet.output_file.display());
        }

        Commands::Plan {
            pages,
            input,
            folding,
            json,
        } => {
            let page_count = match (pages, &input) {
                (Some(pages), _) => pages,
                (None, Some(path)) => pdf_booklet::open_source(path).await?.page_count(),
                (None, None) => bail!("Either --pages or --input is required"),
            };

            let mut options = BookletOptions::default();
            folding.apply(&mut options);

            let range = options.resolve_range(page_count)?;
            let plan = SignaturePlan::from_parts(options.signature_config()?, range);
            let sequence = pdf_booklet::sequence(&plan, options.rotate_back_side)?;
            let stats = pdf_booklet::calculate_statistics(&plan, page_count);

            if json {
                let value = serde_json::json!({
                    "statistics": stats,
                    "signatures": sequence.signatures(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", report::format_statistics(&stats));
                println!();
                print!("{}", report::format_layout(&sequence));
            }
        }
    }

    Ok(())
}
