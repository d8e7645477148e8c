use error_stack::ResultExt;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::{BookReviewQuery, DependOnBookReviewQuery};
use kernel::interface::update::{BookReviewModifier, DependOnBookReviewModifier};
use kernel::prelude::entity::{BookId, BookReview, CreatedAt, Rating, ReviewComment, ReviewId};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookReviewRepository;

#[async_trait::async_trait]
impl BookReviewQuery for PostgresBookReviewRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_book_id(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BookReview>, KernelError> {
        PgBookReviewInternal::find_by_book_id(con, book_id).await
    }
}

#[async_trait::async_trait]
impl BookReviewModifier for PostgresBookReviewRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        rating: &Rating,
        comment: &ReviewComment,
    ) -> error_stack::Result<BookReview, KernelError> {
        PgBookReviewInternal::create(con, book_id, rating, comment).await
    }
}

impl DependOnBookReviewQuery for PostgresDatabase {
    type BookReviewQuery = PostgresBookReviewRepository;
    fn book_review_query(&self) -> &Self::BookReviewQuery {
        &PostgresBookReviewRepository
    }
}

impl DependOnBookReviewModifier for PostgresDatabase {
    type BookReviewModifier = PostgresBookReviewRepository;
    fn book_review_modifier(&self) -> &Self::BookReviewModifier {
        &PostgresBookReviewRepository
    }
}

#[derive(sqlx::FromRow)]
struct BookReviewRow {
    id: i32,
    book_id: i32,
    rating: i32,
    comment: String,
    created_at: OffsetDateTime,
}

impl From<BookReviewRow> for BookReview {
    fn from(value: BookReviewRow) -> Self {
        BookReview::new(
            ReviewId::new(value.id),
            BookId::new(value.book_id),
            Rating::new(value.rating),
            ReviewComment::new(value.comment),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgBookReviewInternal;

impl PgBookReviewInternal {
    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BookReview>, KernelError> {
        let rows = sqlx::query_as::<_, BookReviewRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, rating, comment, created_at
            FROM book_reviews
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BookReview::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        book_id: &BookId,
        rating: &Rating,
        comment: &ReviewComment,
    ) -> error_stack::Result<BookReview, KernelError> {
        let row = sqlx::query_as::<_, BookReviewRow>(
            // language=postgresql
            r#"
            INSERT INTO book_reviews (book_id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING id, book_id, rating, comment, created_at
            "#,
        )
        .bind(book_id.as_ref())
        .bind(rating.as_ref())
        .bind(comment.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
        .map_err(|report| {
            // The only foreign key is the owning book.
            if *report.current_context() == KernelError::Invalid {
                report.change_context(KernelError::NotFound)
            } else {
                report
            }
        })
        .attach_printable_lazy(|| {
            format!("Failed to insert review for book {}", book_id.as_ref())
        })?;
        Ok(BookReview::from(row))
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookReviewQuery;
    use kernel::interface::update::{BookModifier, BookReviewModifier};
    use kernel::prelude::entity::{
        AverageRating, Book, BookCoverImageUrl, BookDescription, BookPrice, BookTitle, Rating,
        ReviewComment, ReviewCount, RowVersion,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookRepository, PostgresBookReviewRepository, PostgresDatabase,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn reviews_follow_their_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let id = PostgresBookRepository.allocate_id(&mut con).await?;
        let book = Book::new(
            id,
            BookTitle::new("reviewed"),
            BookDescription::default(),
            BookPrice::new(Decimal::ONE),
            BookCoverImageUrl::default(),
            ReviewCount::new(0),
            AverageRating::new(0.0),
            RowVersion::initial(),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let first = PostgresBookReviewRepository
            .create(&mut con, &id, &Rating::new(3), &ReviewComment::new("fine"))
            .await?;
        let second = PostgresBookReviewRepository
            .create(&mut con, &id, &Rating::new(5), &ReviewComment::new("great"))
            .await?;

        let found = PostgresBookReviewRepository
            .find_by_book_id(&mut con, &id)
            .await?;
        assert_eq!(found, vec![first, second]);

        PostgresBookRepository.delete(&mut con, &id).await?;
        let found = PostgresBookReviewRepository
            .find_by_book_id(&mut con, &id)
            .await?;
        assert!(found.is_empty());

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn review_of_missing_book_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let id = PostgresBookRepository.allocate_id(&mut con).await?;
        let result = PostgresBookReviewRepository
            .create(&mut con, &id, &Rating::new(4), &ReviewComment::new("orphan"))
            .await;
        assert_eq!(
            result.err().map(|report| *report.current_context()),
            Some(KernelError::NotFound)
        );
        con.roll_back().await?;
        Ok(())
    }
}
