mod api;
mod artifacts;
mod browser;
mod cookies;
mod crawler;
mod error;
mod extract;
mod insights;
mod platform;
mod storage;
mod task;

use std::sync::Arc;

use axum::{routing::post, Router};
use dotenv::dotenv;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(api::scrape),
    components(schemas(
        api::ScrapeRequest,
        api::ScrapeResponse,
        api::ErrorBody,
        crawler::UrlResult,
        crawler::UrlStatus,
        artifacts::S3Location,
        insights::BrandInsights,
        insights::VisualIdentity,
        insights::AudienceSentiment
    )),
    tags(
        (name = "scraper", description = "Brand insight scraping API")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let store: storage::SharedStore = Arc::new(storage::S3Store::from_env().await);
    let state = Arc::new(api::AppState { store });

    let app = Router::new()
        .merge(SwaggerUi::new("/scraper-swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/scrape", post(api::scrape))
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
