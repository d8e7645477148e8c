use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, BookReview, Rating, ReviewComment};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookReviewModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Inserts a review. The owning book's counters are left alone.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        rating: &Rating,
        comment: &ReviewComment,
    ) -> error_stack::Result<BookReview, KernelError>;
}

pub trait DependOnBookReviewModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookReviewModifier: BookReviewModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_review_modifier(&self) -> &Self::BookReviewModifier;
}
