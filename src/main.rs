use actix_web::{App, HttpServer, middleware, web};

use gramvani::db;
use gramvani::handlers;
use gramvani::jobs::{self, JobConfig};
use gramvani::summarizer::SummarizerClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/app.db".to_string());
    if let Some(parent) = std::path::Path::new(&database_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }

    let pool = db::init_pool(&database_path);
    db::run_migrations(&pool);

    let client = SummarizerClient::from_env();
    jobs::spawn_jobs(pool.clone(), client, JobConfig::from_env());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "success": false, "message": "Not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
