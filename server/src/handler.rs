use std::ops::Deref;
use std::sync::Arc;

use application::service::{
    CreateAuthorService, CreateBookReviewService, CreateBookService, CreateGenreService,
    DeleteBookService, GetAuthorService, GetBookReviewsService, GetBookService, GetGenreService,
    IncrementReviewCountService, UpdateBookService,
};
use driver::database::PostgresDatabase;
use kernel::KernelError;

/// Every service the routes call into.
pub trait Bookstore:
    'static
    + Sync
    + Send
    + GetBookService
    + CreateBookService
    + UpdateBookService
    + DeleteBookService
    + IncrementReviewCountService
    + GetBookReviewsService
    + CreateBookReviewService
    + GetAuthorService
    + CreateAuthorService
    + GetGenreService
    + CreateGenreService
{
}

impl<T> Bookstore for T where
    T: GetBookService
        + CreateBookService
        + UpdateBookService
        + DeleteBookService
        + IncrementReviewCountService
        + GetBookReviewsService
        + CreateBookReviewService
        + GetAuthorService
        + CreateAuthorService
        + GetGenreService
        + CreateGenreService
{
}

pub struct AppModule<D = PostgresDatabase>(Arc<Handler<D>>);

impl<D> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        database.migrate().await?;
        Ok(Self::with_database(database))
    }
}

impl<D> AppModule<D> {
    pub fn with_database(database: D) -> Self {
        Self(Arc::new(Handler { database }))
    }
}

impl<D> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<D> {
    database: D,
}

impl<D> Handler<D> {
    pub fn database(&self) -> &D {
        &self.database
    }
}
