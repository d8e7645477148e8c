use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{AuthorId, Book, BookId, GenreId, RowVersion};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Reserves a fresh id. Reservations are not rolled back.
    async fn allocate_id(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<BookId, KernelError>;

    /// Fails with [`KernelError::Conflict`] when the id is already taken,
    /// either here or when the transaction commits.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;

    /// Replaces the stored row if its version still equals `book.version()`
    /// and returns the version the row will have once committed.
    ///
    /// A missing row or a version mismatch is reported as
    /// [`KernelError::Concurrency`], here or when the transaction commits.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<RowVersion<Book>, KernelError>;

    async fn delete(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError>;

    async fn link_authors(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        authors: &[AuthorId],
    ) -> error_stack::Result<(), KernelError>;

    async fn link_genres(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        genres: &[GenreId],
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
