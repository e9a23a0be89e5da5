mod barcode;
mod batch;
mod config;
mod error;
mod heuristics;
mod labels;
mod manual;
mod pdf_text;
mod render;
mod stamp;

use batch::BatchPlan;
use clap::{Parser, Subcommand};
use config::Config;
use error::{LabelError, Result};
use lopdf::Document;
use manual::ManualEntryForm;
use pdf_text::PdfContent;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bol_labels")]
#[command(about = "Shipping-label batches from Bill of Lading PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(long, global = true, default_value = "bol_labels.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp BOL PDFs and generate the label batch
    Labels {
        /// BOL PDF files, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Shipper name for the signature stamp (overrides config)
        #[arg(short, long)]
        shipper: Option<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print extracted fields per page
        #[arg(long)]
        debug: bool,
    },

    /// Generate labels from a manual row file
    Manual {
        /// TOML file of [[row]] shipment entries
        #[arg(short, long)]
        rows: PathBuf,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print skipped rows
        #[arg(long)]
        debug: bool,
    },

    /// Dump per-page extraction for one PDF without writing anything
    Inspect {
        file: PathBuf,
    },

    /// Show or edit configuration
    Config {
        /// Persist a default shipper name
        #[arg(long)]
        set_shipper: Option<String>,

        /// Show the effective configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(if cli.verbose { "debug" } else { "info" })
        .init();

    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Commands::Labels {
            files,
            shipper,
            output,
            debug,
        } => run_labels(&cfg, &files, shipper, output, debug)?,

        Commands::Manual {
            rows,
            output,
            debug,
        } => run_manual(&cfg, &rows, output, debug)?,

        Commands::Inspect { file } => run_inspect(&file)?,

        Commands::Config { set_shipper, show } => {
            if let Some(name) = set_shipper {
                Config::set_shipper(&cli.config, &name)?;
                println!("shipper_name set to {name:?}");
            }
            if show {
                let cfg = Config::load(&cli.config)?;
                println!("shipper_name: {:?}", cfg.shipper_name);
                println!("time_zone:    {}", cfg.time_zone);
                println!("output_dir:   {}", cfg.output_dir.display());
                println!(
                    "stamp:        ({}, {}) at {}pt",
                    cfg.stamp.anchor_x, cfg.stamp.anchor_y, cfg.stamp.font_size
                );
            }
        }
    }

    Ok(())
}

/// Document-upload path: every page of every file is stamped; every page
/// with a sales order contributes labels. One bad file aborts the whole
/// batch before anything is written.
fn run_labels(
    cfg: &Config,
    files: &[PathBuf],
    shipper: Option<String>,
    output: Option<PathBuf>,
    debug: bool,
) -> Result<()> {
    let tz = cfg.zone()?;
    let shipper = shipper.unwrap_or_else(|| cfg.shipper_name.clone());
    let line = stamp::signature_line(&shipper, tz);

    let mut stamped: Vec<Document> = Vec::with_capacity(files.len());
    let mut plan = BatchPlan::default();

    for path in files {
        let span = tracing::info_span!("bol", file = %path.display());
        let _guard = span.enter();

        let bytes = fs::read(path)?;
        let mut doc = Document::load_mem(&bytes)
            .map_err(|e| LabelError::Pdf(format!("{}: {e}", path.display())))?;
        stamp::stamp_pages(&mut doc, &line, &cfg.stamp)?;
        stamped.push(doc);

        match pdf_text::extract_page_texts(&bytes) {
            PdfContent::Pages(pages) => {
                for (i, page) in pages.iter().enumerate() {
                    let record = heuristics::extract_shipment(page);
                    let (filled, total) = record.coverage();
                    info!(page = i + 1, filled, total, "Page extracted");
                    if debug {
                        println!("--- {} page {} ---", path.display(), i + 1);
                        println!("{}", serde_json::to_string_pretty(&record)?);
                    }
                    plan.add_record(record);
                }
            }
            PdfContent::ScannedImage => {
                warn!("scanned/image-only BOL — stamped, but no labels from this file");
            }
            PdfContent::Error(e) => return Err(LabelError::Pdf(e)),
        }
    }

    if plan.is_empty() {
        return Err(LabelError::NoLabels);
    }

    let out_dir = output.unwrap_or_else(|| cfg.output_dir.clone());
    fs::create_dir_all(&out_dir)?;
    let ts = stamp::batch_timestamp(tz);

    let labels_path = out_dir.join(format!("labels_{ts}.pdf"));
    save_document(render::render_labels(&plan.labels)?, &labels_path)?;

    let bols_path = out_dir.join(format!("bols_{ts}.pdf"));
    save_document(stamp::merge_documents(stamped)?, &bols_path)?;

    info!(
        labels = plan.labels.len(),
        skipped = plan.skipped.len(),
        labels_file = %labels_path.display(),
        bols_file = %bols_path.display(),
        "Batch complete"
    );
    Ok(())
}

/// Manual-entry path: labels only, no BOL artifact to stamp.
fn run_manual(cfg: &Config, rows: &Path, output: Option<PathBuf>, debug: bool) -> Result<()> {
    let tz = cfg.zone()?;
    let form = ManualEntryForm::load(rows)?;
    info!(rows = form.rows.len(), "Manual form loaded");

    let plan = batch::plan_from_form(&form);
    if debug {
        for record in &plan.skipped {
            println!("skipped row:\n{}", serde_json::to_string_pretty(record)?);
        }
    }
    if plan.is_empty() {
        return Err(LabelError::NoLabels);
    }

    let out_dir = output.unwrap_or_else(|| cfg.output_dir.clone());
    fs::create_dir_all(&out_dir)?;
    let labels_path = out_dir.join(format!("labels_{}.pdf", stamp::batch_timestamp(tz)));
    save_document(render::render_labels(&plan.labels)?, &labels_path)?;

    info!(
        labels = plan.labels.len(),
        skipped = plan.skipped.len(),
        labels_file = %labels_path.display(),
        "Batch complete"
    );
    Ok(())
}

/// Debug view: per-page extraction results for one document.
fn run_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file)?;

    match pdf_text::extract_page_texts(&bytes) {
        PdfContent::Pages(pages) => {
            for (i, page) in pages.iter().enumerate() {
                let record = heuristics::extract_shipment(page);
                let (filled, total) = record.coverage();
                println!("--- Page {} ({filled}/{total} fields) ---", i + 1);
                println!("{}", serde_json::to_string_pretty(&record)?);
                if !record.has_sales_order() {
                    println!("(no sales order — this page would be skipped)");
                }
            }
            let plan = batch::plan_from_pages(&pages);
            println!(
                "batch: {} labels from {} pages ({} skipped)",
                plan.labels.len(),
                pages.len(),
                plan.skipped.len()
            );
        }
        PdfContent::ScannedImage => {
            println!("PDF is scanned/image-only — no text to extract.");
        }
        PdfContent::Error(e) => {
            println!("Could not read PDF: {e}");
        }
    }
    Ok(())
}

fn save_document(mut doc: Document, path: &Path) -> Result<()> {
    doc.save(path)
        .map_err(|e| LabelError::Pdf(format!("{}: {e}", path.display())))?;
    Ok(())
}
