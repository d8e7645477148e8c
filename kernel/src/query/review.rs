use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, BookReview};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookReviewQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BookReview>, KernelError>;
}

pub trait DependOnBookReviewQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookReviewQuery: BookReviewQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_review_query(&self) -> &Self::BookReviewQuery;
}
