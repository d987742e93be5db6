use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{classifier::ComplaintClassifier, store::ComplaintStore};

pub mod error;
pub mod handlers;
pub mod types;

use handlers::{classify, create_complaint, get_complaint, ping};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ComplaintStore>,
    pub classifier: ComplaintClassifier,
    pub ping_message: Arc<str>,
}

impl AppState {
    pub fn new(
        store: ComplaintStore,
        classifier: ComplaintClassifier,
        ping_message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            classifier,
            ping_message: ping_message.into(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/classify", post(classify))
        .route("/api/complaints", post(create_complaint))
        .route("/api/complaints/{ticket_id}", get(get_complaint))
}

/// Full application: routes, CORS, state.
pub fn app(state: AppState) -> Router {
    router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
