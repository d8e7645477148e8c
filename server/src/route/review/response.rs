use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

use application::transfer::BookReviewDto;

use crate::controller::Exhaust;
use crate::route::CreatedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    review_id: i32,
    book_id: i32,
    rating: i32,
    comment: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<BookReviewDto> for ReviewResponse {
    fn from(value: BookReviewDto) -> Self {
        Self {
            review_id: value.id,
            book_id: value.book_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

pub struct Presenter;

impl Exhaust<Vec<BookReviewDto>> for Presenter {
    type To = Json<Vec<ReviewResponse>>;
    fn emit(&self, input: Vec<BookReviewDto>) -> Self::To {
        Json(input.into_iter().map(ReviewResponse::from).collect())
    }
}

impl Exhaust<BookReviewDto> for Presenter {
    type To = CreatedResponse<ReviewResponse>;
    fn emit(&self, input: BookReviewDto) -> Self::To {
        CreatedResponse::new(
            format!("/books/{}/reviews", input.book_id),
            ReviewResponse::from(input),
        )
    }
}
