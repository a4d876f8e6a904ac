use tokio::net::TcpListener;

use writeflow_lib::config::Config;
use writeflow_lib::routes;
use writeflow_lib::state::AppState;
use writeflow_lib::{log_info, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    // Missing DATABASE_URL fails the process before the listener binds.
    let config = Config::from_env()?;
    logging::init_logging(&config.log_dir)?;

    let state = AppState::initialize(&config).await?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    log_info!(
        "writeflow.main",
        "WriteFlow server listening on http://0.0.0.0:{}",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}
