use destructure::Destructure;
use vodca::References;

use crate::entity::{AuthorName, Book, GenreName};

/// A book together with the names of its authors and genres.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct BookDetail {
    book: Book,
    authors: Vec<AuthorName>,
    genres: Vec<GenreName>,
}

impl BookDetail {
    pub fn new(book: Book, authors: Vec<AuthorName>, genres: Vec<GenreName>) -> Self {
        Self {
            book,
            authors,
            genres,
        }
    }
}
