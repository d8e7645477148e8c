mod comment;
mod id;
mod rating;

pub use self::{comment::*, id::*, rating::*};
use crate::entity::{BookId, CreatedAt};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookReview {
    id: ReviewId,
    book_id: BookId,
    rating: Rating,
    comment: ReviewComment,
    created_at: CreatedAt<BookReview>,
}

impl BookReview {
    pub fn new(
        id: ReviewId,
        book_id: BookId,
        rating: Rating,
        comment: ReviewComment,
        created_at: CreatedAt<BookReview>,
    ) -> Self {
        Self {
            id,
            book_id,
            rating,
            comment,
            created_at,
        }
    }
}
