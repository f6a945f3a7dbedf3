use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::Value;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::models::{PageForm, RelayMessage, SitemapRequest};
use crate::api::page::render_page;
use crate::api::response;
use crate::composer::FormFields;
use crate::error::Result;
use crate::render::ResultPane;
use crate::session::{Delivery, Session, Surface};
use crate::AppState;

pub const RELAY_ACTION: &str = "parse_sitemap";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler).post(page_submit_handler))
        .route("/crawl", post(crawl_handler))
        .route("/relay", post(relay_handler))
        .route("/healthz", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn page_handler() -> Html<String> {
    Html(render_page(&FormFields::default(), &ResultPane::new(), None))
}

async fn page_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Html<String> {
    let fields = FormFields {
        sitemap_url: form.sitemap_url,
        start_date: form.start_date,
        end_date: form.end_date,
        content_filter: form.content_filter,
    };

    // The page reaches the backend directly rather than looping through /crawl
    let session = Session::new(
        Surface::PAGE.with_endpoint(state.client.endpoint()),
        state.client.clone(),
    );

    let alert = match session.submit(&fields).await {
        Ok(Delivery::Applied) | Ok(Delivery::Superseded) => None,
        Err(err) => {
            warn!(%err, "Page submission failed");
            session.report(&err)
        }
    };

    Html(render_page(&fields, &session.pane(), alert.as_deref()))
}

/// Same-origin relay: forwards the body and hands back the backend's status and JSON.
async fn crawl_handler(
    State(state): State<AppState>,
    Json(req): Json<SitemapRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    info!(sitemap_url = %req.sitemap_url, backend = %state.config.backend_url, "Relaying crawl request");
    let (status, data) = state.client.submit_with_status(&req).await?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(data)))
}

async fn relay_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RelayMessage>, JsonRejection>,
) -> impl IntoResponse {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(rejection) => {
            warn!(%rejection, "Malformed relay message");
            return response::failure(rejection.body_text());
        }
    };

    if message.action != RELAY_ACTION {
        warn!(action = %message.action, "Rejecting relay message");
        return response::failure(format!("Unsupported action: {}", message.action));
    }

    match state.client.submit(&message.request).await {
        Ok(data) => response::success(data),
        Err(err) => {
            tracing::error!(%err, "Error fetching sitemap data");
            response::failure(err.message().to_string())
        }
    }
}
