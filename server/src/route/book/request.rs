use rust_decimal::Decimal;
use serde::Deserialize;

use application::transfer::{
    CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, IncrementReviewCountDto,
    UpdateBookDto,
};
use kernel::prelude::entity::{SelectLimit, SelectOffset};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    book_id: Option<i32>,
    title: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    cover_image_url: String,
    #[serde(default)]
    review_count: i32,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    author_ids: Vec<i32>,
    #[serde(default)]
    genre_ids: Vec<i32>,
}

/// Full replacement. `version` is the one the client read, if it kept it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    book_id: i32,
    title: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    cover_image_url: String,
    #[serde(default)]
    review_count: i32,
    #[serde(default)]
    average_rating: f64,
    version: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    limit: Option<SelectLimit>,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct GetRequest {
    id: i32,
}

impl GetRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteRequest {
    id: i32,
}

impl DeleteRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct IncrementReviewCountRequest {
    id: i32,
}

impl IncrementReviewCountRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateBookDto {
            id: input.book_id,
            title: input.title,
            description: input.description,
            price: input.price,
            cover_image_url: input.cover_image_url,
            review_count: input.review_count,
            average_rating: input.average_rating,
            author_ids: input.author_ids,
            genre_ids: input.genre_ids,
        }
    }
}

impl Intake<Vec<CreateRequest>> for Transformer {
    type To = Vec<CreateBookDto>;
    fn emit(&self, input: Vec<CreateRequest>) -> Self::To {
        input
            .into_iter()
            .map(|input| Intake::<CreateRequest>::emit(self, input))
            .collect()
    }
}

impl Intake<(i32, UpdateRequest)> for Transformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (i32, UpdateRequest)) -> Self::To {
        let (path_id, input) = input;
        UpdateBookDto {
            path_id,
            id: input.book_id,
            title: input.title,
            description: input.description,
            price: input.price,
            cover_image_url: input.cover_image_url,
            review_count: input.review_count,
            average_rating: input.average_rating,
            version: input.version,
        }
    }
}

impl Intake<GetAllRequest> for Transformer {
    type To = GetAllBookDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetAllBookDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl Intake<IncrementReviewCountRequest> for Transformer {
    type To = IncrementReviewCountDto;
    fn emit(&self, input: IncrementReviewCountRequest) -> Self::To {
        IncrementReviewCountDto { id: input.id }
    }
}
