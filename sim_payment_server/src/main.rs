use std::sync::Arc;

use dotenvy::dotenv;
use log::info;
use sim_payment_server::{
    cli::handle_command_line_args, config::ServerConfig, notifier::LogNotifier, server::run_server,
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    handle_command_line_args();
    let config = ServerConfig::from_env_or_default();

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config, Arc::new(LogNotifier)).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
