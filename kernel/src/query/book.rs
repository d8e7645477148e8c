use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookDetail, BookId, SelectLimit, SelectOffset};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    async fn exists(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<bool, KernelError>;

    async fn find_detail_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookDetail>, KernelError>;

    /// Details ordered by id. A missing `limit` selects every remaining row.
    async fn find_all_details(
        &self,
        con: &mut Self::Transaction,
        limit: Option<&SelectLimit>,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BookDetail>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
