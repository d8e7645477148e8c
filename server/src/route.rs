use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{AppModule, Bookstore};

pub use self::{author::*, book::*, genre::*, review::*};

mod author;
mod book;
mod genre;
mod review;

pub fn router<D: Bookstore>(module: AppModule<D>) -> Router {
    Router::new()
        .route_book()
        .route_review()
        .route_author()
        .route_genre()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(module)
}

/// `201 Created` pointing at the created resource.
#[derive(Debug)]
pub struct CreatedResponse<T> {
    location: String,
    body: T,
}

impl<T> CreatedResponse<T> {
    pub fn new(location: String, body: T) -> Self {
        Self { location, body }
    }
}

impl<T: Serialize> IntoResponse for CreatedResponse<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(self.body),
        )
            .into_response()
    }
}
