use supervision_solver::{ServerConfig, server};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    if let Err(e) = server::run_server(&config).await {
        log::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
