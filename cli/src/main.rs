//! visio2img CLI - export Visio pages to images

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use visio2img::{
    ExportEvent, ExportOutcome, ExportPipeline, ExportRequest, OpenMode, VisioAutomation,
    VisioOptions,
};

/// Exit code when an export fails.
const EXIT_FAILURE: u8 = 1;
/// Exit code when Visio automation is not available on this machine.
const EXIT_UNAVAILABLE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "visio2img")]
#[command(author = "Yassu")]
#[command(version)]
#[command(about = "Export pages of a Visio document to GIF, JPEG, or PNG images", long_about = None)]
struct Cli {
    /// Input Visio document
    #[arg(value_name = "VISIO_FILE")]
    source: PathBuf,

    /// Output image (.gif, .jpg, .jpeg, .png); numbered when several pages are exported
    #[arg(value_name = "IMAGE_FILE")]
    destination: PathBuf,

    /// Pick a page by page number (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", conflicts_with = "name")]
    page: Option<usize>,

    /// Pick pages by page name (exact match)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    name: Option<String>,

    /// COM ProgID used to launch Visio
    #[arg(long, env = "VISIO2IMG_PROG_ID", default_value = visio2img::host::VISIO_PROG_ID)]
    prog_id: String,

    /// Open the document normally instead of as a read-only copy
    #[arg(long)]
    open_normal: bool,

    /// Print the written files as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Do not print progress or the list of written files
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    ExitCode::from(run(&cli))
}

/// Check the host the run will launch, then export. Returns the exit code.
fn run(cli: &Cli) -> u8 {
    let automation = build_automation(cli);
    if !automation.is_available() {
        eprintln!(
            "{}: Visio automation is not available ({} is not registered). visio2img requires Visio.",
            "error".red().bold(),
            cli.prog_id
        );
        return EXIT_UNAVAILABLE;
    }

    match cmd_export(cli, automation) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}: {}", format!("error[{}]", e.code()).red().bold(), e);
            EXIT_FAILURE
        }
    }
}

fn build_automation(cli: &Cli) -> VisioAutomation {
    let open_mode = if cli.open_normal {
        OpenMode::Normal
    } else {
        OpenMode::ReadOnlyCopy
    };
    VisioAutomation::with_options(
        VisioOptions::new()
            .with_prog_id(cli.prog_id.as_str())
            .with_open_mode(open_mode),
    )
}

fn cmd_export(cli: &Cli, automation: VisioAutomation) -> visio2img::Result<()> {
    let mut request = ExportRequest::new(&cli.source, &cli.destination);
    request.page_index = cli.page;
    request.page_name = cli.name.clone();

    let mut pipeline = ExportPipeline::new(automation);
    if !cli.quiet {
        pipeline = pipeline.with_progress(progress_reporter());
    }

    let outcome = pipeline.run(&request)?;

    if cli.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("could not serialize result: {}", e),
        }
    }

    match outcome {
        ExportOutcome::Exported(files) => {
            if !cli.quiet && !cli.json {
                for file in &files {
                    println!("{} {}", "Saved to".green(), file.display());
                }
            }
        }
        ExportOutcome::NothingToExport => {
            eprintln!(
                "{}: {} has no pages; nothing exported",
                "warning".yellow().bold(),
                cli.source.display()
            );
        }
    }

    Ok(())
}

/// Progress bar on stderr, shown only when more than one page is exported.
fn progress_reporter() -> impl FnMut(ExportEvent<'_>) {
    let mut bar: Option<ProgressBar> = None;

    move |event| match event {
        ExportEvent::Started { total } if total > 1 => {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            bar = Some(pb);
        }
        ExportEvent::Started { .. } => {}
        ExportEvent::PageExported { page, path } => {
            if let Some(pb) = &bar {
                pb.set_message(format!("{} -> {}", page.label(), path.display()));
                pb.inc(1);
                if pb.position() == pb.length().unwrap_or(0) {
                    pb.finish_and_clear();
                }
            }
        }
    }
}
