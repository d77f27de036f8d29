// main.rs

mod api;
mod app;
mod board;
mod calendar;
mod config;
mod display;
mod error;
mod forms;
mod logging;
mod models;
mod parser;
mod routes;
mod services;
mod summary;
mod ui;

use crate::api::ApiClient;
use crate::app::App;
use crate::config::{Config, SessionStore};
use crate::services::Services;
use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::load()?;
    if let Err(err) = logging::init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("Logging disabled: {}", err);
    }

    let base_url = config.base_url();
    info!("event=config_loaded status=ok base_url={}", base_url);

    let api = Arc::new(ApiClient::new(base_url));
    let services = Services::new(api, SessionStore::default_location(), &config);
    let mut app = App::new(
        services,
        config.poll_interval(),
        Local::now().date_naive(),
    );
    app.start().await;

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let res = ui::run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("event=app_exit status=error error={}", err);
        eprintln!("Error: {:?}", err);
    } else {
        info!("event=app_exit status=ok");
    }

    Ok(())
}
