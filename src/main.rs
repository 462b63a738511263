use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use animal_tables::controller::Controller;
use animal_tables::inputter::{Inputter, LinePrompt};
use animal_tables::model::{Model, Status};
use animal_tables::ui::PageUI;
use animal_tables::{AppConfig, TablesError, bootstrap};

#[derive(Parser, Debug)]
#[command(version, about = "Renders editable animal tables into an HTML page.")]
struct Cli {
    /// JSON file describing the tables to show
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the animal JSON files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Where the HTML page is written
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Write the page once and exit
    #[arg(long)]
    once: bool,
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(ErrorLayer::default())
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig, TablesError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = config.data_dir(dir);
    }
    if let Some(out) = &cli.out {
        config = config.output(out);
    }
    config.expanded()
}

fn run(cli: Cli) -> Result<(), TablesError> {
    let config = load_config(&cli)?;
    info!(
        "Starting with {} tables from {}",
        config.tables.len(),
        config.data_dir.display()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut model = Model::init(runtime.block_on(bootstrap(&config)));
    let mut ui = PageUI::new(&config);
    ui.draw(&model)?;

    if cli.once {
        return Ok(());
    }

    // Prompts are only shown when a person is typing
    let (reader, writer): (Box<dyn BufRead>, Box<dyn Write>) = match &cli.script {
        Some(path) => (Box::new(BufReader::new(File::open(path)?)), Box::new(io::sink())),
        None => (Box::new(io::stdin().lock()), Box::new(io::stdout())),
    };
    let mut controller = Controller::new(Inputter::new(LinePrompt::new(reader, writer)));

    while model.status != Status::QUITTING {
        match controller.handle_event(&model) {
            Ok(Some(message)) => model.update(message)?,
            Ok(None) => {}
            Err(e) => model.report(e)?,
        }

        ui.draw(&model)?;
        if let Some(message) = model.take_status_message() {
            println!("{message}");
        }
    }

    Ok(())
}
