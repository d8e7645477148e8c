use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, BookReviewQuery, DependOnBookQuery, DependOnBookReviewQuery,
};
use kernel::interface::update::{BookReviewModifier, DependOnBookReviewModifier};
use kernel::prelude::entity::{BookId, Rating, ReviewComment};
use kernel::KernelError;

use crate::transfer::{BookReviewDto, CreateBookReviewDto, GetBookReviewsDto};

#[async_trait::async_trait]
pub trait GetBookReviewsService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookReviewQuery
{
    async fn get_book_reviews(
        &self,
        dto: GetBookReviewsDto,
    ) -> error_stack::Result<Vec<BookReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let book_id = BookId::new(dto.book_id);
        if !self.book_query().exists(&mut connection, &book_id).await? {
            tracing::warn!(book_id = dto.book_id, "get_book_reviews: book not found");
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.book_id)));
        }

        let mut reviews = self
            .book_review_query()
            .find_by_book_id(&mut connection, &book_id)
            .await?;
        reviews.sort_by_key(|review| *review.id());

        Ok(reviews.into_iter().map(BookReviewDto::from).collect())
    }
}

impl<T> GetBookReviewsService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookReviewQuery
{
}

#[async_trait::async_trait]
pub trait CreateBookReviewService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookReviewModifier
{
    /// Stores a review. The book's counters are updated separately through
    /// `increment_review_count`.
    async fn create_book_review(
        &self,
        dto: CreateBookReviewDto,
    ) -> error_stack::Result<BookReviewDto, KernelError> {
        let rating = Rating::new(dto.rating);
        if !rating.is_in_range() {
            tracing::warn!(
                book_id = dto.book_id,
                rating = dto.rating,
                "create_book_review: rating out of range"
            );
            return Err(Report::new(KernelError::Invalid).attach_printable(format!(
                "Rating must be within {}..={}, got {}",
                Rating::MIN,
                Rating::MAX,
                dto.rating
            )));
        }

        let mut connection = self.database_connection().transact().await?;
        let book_id = BookId::new(dto.book_id);
        if !self.book_query().exists(&mut connection, &book_id).await? {
            tracing::warn!(book_id = dto.book_id, "create_book_review: book not found");
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.book_id)));
        }

        let review = self
            .book_review_modifier()
            .create(
                &mut connection,
                &book_id,
                &rating,
                &ReviewComment::new(dto.comment),
            )
            .await
            .inspect_err(|report| {
                tracing::warn!(book_id = dto.book_id, "create_book_review: {report:?}")
            })?;
        connection.commit().await.inspect_err(|report| {
            tracing::warn!(book_id = dto.book_id, "create_book_review: {report:?}")
        })?;

        Ok(BookReviewDto::from(review))
    }
}

impl<T> CreateBookReviewService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookReviewModifier
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{
        CreateBookReviewService, CreateBookService, GetBookReviewsService,
        IncrementReviewCountService,
    };
    use crate::transfer::{
        CreateBookDto, CreateBookReviewDto, GetBookReviewsDto, IncrementReviewCountDto,
    };

    fn review(book_id: i32, rating: i32, comment: &str) -> CreateBookReviewDto {
        CreateBookReviewDto {
            book_id,
            rating,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn reviews_are_listed_in_order() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        db.create_book(CreateBookDto {
            id: Some(1),
            title: "Hyperion".to_string(),
            description: String::new(),
            price: Decimal::new(1100, 2),
            cover_image_url: String::new(),
            review_count: 0,
            average_rating: 0.0,
            author_ids: Vec::new(),
            genre_ids: Vec::new(),
        })
        .await?;

        db.create_book_review(review(1, 5, "great")).await?;
        db.create_book_review(review(1, 2, "slow")).await?;

        let reviews = db
            .get_book_reviews(GetBookReviewsDto { book_id: 1 })
            .await?;
        assert_eq!(
            reviews
                .iter()
                .map(|review| (review.rating, review.comment.as_str()))
                .collect::<Vec<_>>(),
            vec![(5, "great"), (2, "slow")]
        );

        let book = db
            .increment_review_count(IncrementReviewCountDto { id: 1 })
            .await?;
        assert_eq!(book.average_rating, 3.5);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_bad_input() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let out_of_range = db.create_book_review(review(1, 6, "")).await;
        assert_eq!(
            out_of_range.map_err(|report| *report.current_context()),
            Err(KernelError::Invalid)
        );

        let missing = db.create_book_review(review(1, 4, "")).await;
        assert_eq!(
            missing.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );

        let listing = db
            .get_book_reviews(GetBookReviewsDto { book_id: 1 })
            .await;
        assert_eq!(
            listing.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        Ok(())
    }
}
