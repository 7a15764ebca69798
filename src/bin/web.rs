//! Tournament web server: REST API over an in-memory store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, RUST_LOG.

use actix_web::{App, HttpServer};
use sports_tournament_web::{configure, new_state, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_filter.as_str()));

    let bind = config.bind_addr();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = new_state();
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
