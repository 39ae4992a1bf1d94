mod app;
mod cli;
mod color;
mod config;
mod dates;
mod error;
mod event;
mod goals;
mod logging;
mod managers;
mod report;
mod stopwatch;
mod store;
mod tui;
mod types;
mod ui;
mod validation;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use config::Config;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config = Config::load()?;
    let _logger = logging::init_logging(&config.log_level(), &config.log_dir())?;

    let conn = store::init(&config.db_path())?;

    if let Some(command) = cli_opts.command {
        let result = cli::run(command, &config, &conn);
        if let Err(err) = &result {
            error!("event=command module=main status=error err={err:#}");
        }
        return result;
    }

    info!("event=tui_start module=main");
    let mut app = app::App::new(conn, config.chart_max_hours);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
