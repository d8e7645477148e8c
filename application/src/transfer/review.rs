use time::OffsetDateTime;

use kernel::prelude::entity::{BookReview, DestructBookReview};

#[derive(Debug, Clone, PartialEq)]
pub struct BookReviewDto {
    pub id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

impl From<BookReview> for BookReviewDto {
    fn from(value: BookReview) -> Self {
        let DestructBookReview {
            id,
            book_id,
            rating,
            comment,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            rating: rating.into(),
            comment: comment.into(),
            created_at: created_at.into(),
        }
    }
}

pub struct GetBookReviewsDto {
    pub book_id: i32,
}

pub struct CreateBookReviewDto {
    pub book_id: i32,
    pub rating: i32,
    pub comment: String,
}
