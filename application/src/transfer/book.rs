use rust_decimal::Decimal;

use kernel::prelude::entity::{
    Book, BookDetail, DestructBook, DestructBookDetail, SelectLimit, SelectOffset,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub cover_image_url: String,
    pub review_count: i32,
    pub average_rating: f64,
    pub version: i64,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            description,
            price,
            cover_image_url,
            review_count,
            average_rating,
            version,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            price: price.into(),
            cover_image_url: cover_image_url.into(),
            review_count: review_count.into(),
            average_rating: average_rating.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookDetailDto {
    pub book: BookDto,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
}

impl From<BookDetail> for BookDetailDto {
    fn from(value: BookDetail) -> Self {
        let DestructBookDetail {
            book,
            authors,
            genres,
        } = value.into_destruct();
        Self {
            book: BookDto::from(book),
            authors: authors.into_iter().map(String::from).collect(),
            genres: genres.into_iter().map(String::from).collect(),
        }
    }
}

pub struct GetBookDto {
    pub id: i32,
}

pub struct GetAllBookDto {
    pub limit: Option<SelectLimit>,
    pub offset: SelectOffset,
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub id: Option<i32>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub cover_image_url: String,
    pub review_count: i32,
    pub average_rating: f64,
    pub author_ids: Vec<i32>,
    pub genre_ids: Vec<i32>,
}

/// Full replacement of a book's fields. `path_id` is the id the caller
/// addressed, `id` the one carried in the body.
#[derive(Debug, Clone)]
pub struct UpdateBookDto {
    pub path_id: i32,
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub cover_image_url: String,
    pub review_count: i32,
    pub average_rating: f64,
    pub version: Option<i64>,
}

pub struct DeleteBookDto {
    pub id: i32,
}

pub struct IncrementReviewCountDto {
    pub id: i32,
}
