use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use gradeport::cli::{Cli, Commands};
use gradeport::db::init_app_state;
use gradeport::logging::init_tracing;
use gradeport::metrics::{init_metrics, metrics_app};
use gradeport::router::init_router;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Serve) => serve().await,
        Some(Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        }) => {
            let db = gradeport::config::database::init_db_pool().await;
            if let Err(e) =
                gradeport::cli::create_admin(&db, first_name, last_name, email, password).await
            {
                eprintln!("❌ Error creating admin: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Seed { students }) => {
            let db = gradeport::config::database::init_db_pool().await;
            if let Err(e) = gradeport::cli::seed(&db, students).await {
                eprintln!("❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn serve() {
    init_tracing();

    if let Some(handle) = init_metrics() {
        let metrics_addr = std::env::var("METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9091".into());
        let app = metrics_app(handle);
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&metrics_addr)
                .await
                .expect("Failed to bind metrics listener");
            info!("Metrics available on http://{}/metrics", metrics_addr);
            axum::serve(listener, app)
                .await
                .expect("Metrics server failed");
        });
    }

    let state = init_app_state().await;
    let app = init_router(state);

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app).await.expect("Server failed");
}
