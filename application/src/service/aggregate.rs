use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    BookQuery, BookReviewQuery, DependOnBookQuery, DependOnBookReviewQuery,
};
use kernel::interface::update::DependOnBookModifier;
use kernel::prelude::entity::BookId;
use kernel::KernelError;

use crate::service::{classify_conflict, commit_update};
use crate::transfer::{BookDto, IncrementReviewCountDto};

/// Keeps `review_count` and `average_rating` of a book in step with its reviews.
#[async_trait::async_trait]
pub trait IncrementReviewCountService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookReviewQuery
    + DependOnBookModifier
{
    /// Counts one more review and recomputes the average rating from every
    /// review stored for the book, guarded by the row version that was read.
    ///
    /// Fails with [`KernelError::NotFound`] when the book is absent, before or
    /// during the update, and with [`KernelError::Concurrency`] when another
    /// writer changed it in between. Neither case is retried.
    async fn increment_review_count(
        &self,
        dto: IncrementReviewCountDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;

        let Some(mut book) = self.book_query().find_by_id(&mut connection, &id).await? else {
            tracing::warn!(book_id = dto.id, "increment_review_count: book not found");
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.id)));
        };
        let reviews = self
            .book_review_query()
            .find_by_book_id(&mut connection, &id)
            .await?;

        book.record_review(&reviews).inspect_err(|report| {
            tracing::warn!(book_id = dto.id, "increment_review_count: {report:?}")
        })?;
        tracing::debug!(
            book_id = dto.id,
            reviews = reviews.len(),
            review_count = book.review_count().as_ref(),
            average_rating = book.average_rating().as_ref(),
            "increment_review_count: aggregates recomputed"
        );

        match commit_update(self.book_modifier(), connection, &book).await {
            Ok(version) => Ok(BookDto::from(book.with_version(version))),
            Err(report) => {
                Err(classify_conflict(self, &id, report, "increment_review_count").await)
            }
        }
    }
}

impl<T> IncrementReviewCountService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
        + DependOnBookReviewQuery
        + DependOnBookModifier
{
}
