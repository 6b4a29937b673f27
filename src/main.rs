// Report Desk - command line entry point
// `locations` → store locations dashboard, `pets` → pet record editor

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use report_desk::locations::LocationLoader;
use report_desk::pets::PetDesk;
use report_desk::Settings;

#[derive(Parser, Debug)]
#[command(name = "report-desk", version, about = "Store locations report and pet record editor")]
struct Cli {
    /// Settings file (defaults to $REPORT_DESK_CONFIG, then ./report-desk.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the store locations dataset
    Locations {
        /// Read only the first N data rows
        #[arg(long)]
        nrows: Option<usize>,
    },

    /// Search and edit pet records
    Pets,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Locations { nrows } => run_locations(&settings, nrows.or(settings.locations.nrows)),
        Command::Pets => run_pets(&settings),
    }
}

fn run_locations(settings: &Settings, nrows: Option<usize>) -> Result<()> {
    let mut loader = LocationLoader::new();

    println!("📂 Loading data...");
    let table = loader.load(&settings.locations.url, nrows)?;
    println!("✓ Done! ({} rows)", table.len());
    info!(url = %settings.locations.url, rows = table.len(), "locations loaded");

    show_locations(table)
}

#[cfg(feature = "tui")]
fn show_locations(table: std::sync::Arc<report_desk::StoreTable>) -> Result<()> {
    let mut app = report_desk::ui::LocationsApp::new(table);
    report_desk::ui::run_locations(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn show_locations(table: std::sync::Arc<report_desk::StoreTable>) -> Result<()> {
    use report_desk::locations::{render_text, LocationReport};

    let report = LocationReport::build(&table, true);
    print!("{}", render_text(&report));
    Ok(())
}

fn run_pets(settings: &Settings) -> Result<()> {
    let desk = PetDesk::open(settings.mongo.as_ref());

    if let Some(diagnostic) = desk.diagnostic() {
        eprintln!("{}", diagnostic);
    }

    show_pets(desk)
}

#[cfg(feature = "tui")]
fn show_pets(desk: PetDesk<report_desk::MongoPetStore>) -> Result<()> {
    let mut app = report_desk::ui::PetsApp::new(desk);
    report_desk::ui::run_pets(&mut app)?;

    println!("\n✅ Editor closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn show_pets(mut desk: PetDesk<report_desk::MongoPetStore>) -> Result<()> {
    use report_desk::pets::listing::render_text;
    use report_desk::pets::{PetListing, QueryFilter};

    if !desk.is_connected() {
        return Ok(());
    }

    let listing = PetListing::new(desk.fetch(&QueryFilter::new())?);
    print!("{}", render_text(&listing));
    Ok(())
}
