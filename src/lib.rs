pub mod config;
pub mod error;
pub mod helpers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod session;
pub mod state;
pub mod uploads;

use axum::http::header;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

pub use error::AppError;
pub use state::AppState;

use crate::middleware::logging::HttpLoggingExt;

/// The full application: forum pages plus the uploaded images under `/static/uploads`.
pub fn router(state: AppState) -> Router {
    let uploads = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("max-age=13420"),
        ))
        .layer(CompressionLayer::new())
        .service(ServeDir::new(state.uploads.dir()));

    Router::new()
        .merge(routes::posts::router())
        .merge(routes::auth::router())
        .nest_service("/static/uploads", uploads)
        .with_http_logging()
        .with_state(state)
}
