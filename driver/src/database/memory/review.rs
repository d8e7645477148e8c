use kernel::interface::query::{BookReviewQuery, DependOnBookReviewQuery};
use kernel::interface::update::{BookReviewModifier, DependOnBookReviewModifier};
use kernel::prelude::entity::{BookId, BookReview, CreatedAt, Rating, ReviewComment, ReviewId};
use kernel::KernelError;

use crate::database::memory::{InMemoryDatabase, InMemoryTransaction, Sequence, StagedWrite};

pub struct InMemoryBookReviewRepository;

#[async_trait::async_trait]
impl BookReviewQuery for InMemoryBookReviewRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BookReview>, KernelError> {
        Ok(con
            .read()
            .await
            .reviews
            .values()
            .filter(|review| review.book_id() == book_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookReviewModifier for InMemoryBookReviewRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        rating: &Rating,
        comment: &ReviewComment,
    ) -> error_stack::Result<BookReview, KernelError> {
        let id = ReviewId::new(con.next_sequence(Sequence::Review).await);
        let review = BookReview::new(id, *book_id, *rating, comment.clone(), CreatedAt::now());
        con.stage(StagedWrite::CreateReview(review.clone()));
        Ok(review)
    }
}

impl DependOnBookReviewQuery for InMemoryDatabase {
    type BookReviewQuery = InMemoryBookReviewRepository;
    fn book_review_query(&self) -> &Self::BookReviewQuery {
        &InMemoryBookReviewRepository
    }
}

impl DependOnBookReviewModifier for InMemoryDatabase {
    type BookReviewModifier = InMemoryBookReviewRepository;
    fn book_review_modifier(&self) -> &Self::BookReviewModifier {
        &InMemoryBookReviewRepository
    }
}
