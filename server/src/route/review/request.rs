use serde::Deserialize;

use application::transfer::{CreateBookReviewDto, GetBookReviewsDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    rating: i32,
    #[serde(default)]
    comment: String,
}

#[derive(Debug)]
pub struct GetRequest {
    book_id: i32,
}

impl GetRequest {
    pub fn new(book_id: i32) -> Self {
        Self { book_id }
    }
}

pub struct Transformer;

impl Intake<(i32, CreateRequest)> for Transformer {
    type To = CreateBookReviewDto;
    fn emit(&self, input: (i32, CreateRequest)) -> Self::To {
        let (book_id, input) = input;
        CreateBookReviewDto {
            book_id,
            rating: input.rating,
            comment: input.comment,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookReviewsDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookReviewsDto {
            book_id: input.book_id,
        }
    }
}
