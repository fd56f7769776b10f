use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use shift_board::config::AppConfig;
use shift_board::repository::Stores;
use shift_board::routes;
use shift_board::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let stores = match Stores::open(&config).await {
        Ok(stores) => stores,
        Err(e) => {
            error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };
    let state = web::Data::new(AppState::new(stores));

    let server_address = config.server_address.clone();
    info!(
        "Server running at http://{} ({} mode)",
        server_address,
        if config.is_mock() { "mock" } else { "database" }
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Shift board is running") }))
            .configure(routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
