use slint::ComponentHandle;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use flower_orders::api::HttpBackend;
use flower_orders::config::Config;
use flower_orders::event_handlers::Backend;
use flower_orders::types::OrderSession;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::load();
    if let Err(e) = config.ensure_configured() {
        // Not fatal: the form still opens and refuses to submit
        warn!("{e}");
    }

    let backend: Backend = Arc::new(HttpBackend::new(
        config.api_url.clone(),
        config.http_timeout,
    )?);
    let session = Arc::new(Mutex::new(OrderSession::new(config)));

    let ui = flower_orders::ui::MainWindow::new()?;

    flower_orders::ui_setup::initialize_ui_and_data(&ui, &session, &backend)?;

    flower_orders::event_handlers::setup_event_handlers(session, backend, &ui);

    info!("Order form ready");
    ui.run()?;
    Ok(())
}
