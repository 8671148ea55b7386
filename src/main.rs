use clap::Parser;
use sleepcaster::config::setup_logging;
use tracing::error;

#[tokio::main(flavor = "multi_thread", worker_threads = 32)]
async fn main() {
    let cli = sleepcaster::cli::CliOptions::parse();

    if let Err(err) = setup_logging(cli.debug) {
        eprintln!("Failed to set up logging: {}", err);
        return;
    }

    let state = match sleepcaster::web::AppState::from_cli(&cli) {
        Ok(state) => state,
        Err(err) => {
            error!("Startup error: {}", err);
            return;
        }
    };

    if let Err(err) = sleepcaster::web::setup_server(&cli.listen_address, cli.port, state).await {
        error!("Application error: {}", err);
    }
}
