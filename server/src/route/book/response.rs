use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use application::transfer::{BookDetailDto, BookDto};

use crate::controller::Exhaust;
use crate::route::CreatedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    book_id: i32,
    title: String,
    description: String,
    price: Decimal,
    cover_image_url: String,
    review_count: i32,
    average_rating: f64,
    version: i64,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            book_id: value.id,
            title: value.title,
            description: value.description,
            price: value.price,
            cover_image_url: value.cover_image_url,
            review_count: value.review_count,
            average_rating: value.average_rating,
            version: value.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDetailResponse {
    #[serde(flatten)]
    book: BookResponse,
    authors: Vec<String>,
    genres: Vec<String>,
}

impl From<BookDetailDto> for BookDetailResponse {
    fn from(value: BookDetailDto) -> Self {
        Self {
            book: BookResponse::from(value.book),
            authors: value.authors,
            genres: value.genres,
        }
    }
}

pub struct Presenter;

impl Exhaust<Option<BookDetailDto>> for Presenter {
    type To = Option<Json<BookDetailResponse>>;
    fn emit(&self, input: Option<BookDetailDto>) -> Self::To {
        input.map(|detail| Json(BookDetailResponse::from(detail)))
    }
}

impl Exhaust<Vec<BookDetailDto>> for Presenter {
    type To = Json<Vec<BookDetailResponse>>;
    fn emit(&self, input: Vec<BookDetailDto>) -> Self::To {
        Json(input.into_iter().map(BookDetailResponse::from).collect())
    }
}

impl Exhaust<BookDto> for Presenter {
    type To = Json<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        Json(BookResponse::from(input))
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

pub struct CreatedPresenter;

impl Exhaust<BookDto> for CreatedPresenter {
    type To = CreatedResponse<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        CreatedResponse::new(format!("/books/{}", input.id), BookResponse::from(input))
    }
}

impl Exhaust<Vec<BookDto>> for CreatedPresenter {
    type To = CreatedResponse<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        CreatedResponse::new(
            "/books".to_string(),
            input.into_iter().map(BookResponse::from).collect(),
        )
    }
}
