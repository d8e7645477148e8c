use error_stack::{Report, ResultExt};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    AuthorId, AuthorName, AverageRating, Book, BookCoverImageUrl, BookDescription, BookDetail,
    BookId, BookPrice, BookTitle, GenreId, GenreName, ReviewCount, RowVersion, SelectLimit,
    SelectOffset,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn exists(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::exists(con, id).await
    }

    async fn find_detail_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookDetail>, KernelError> {
        PgBookInternal::find_detail_by_id(con, id).await
    }

    async fn find_all_details(
        &self,
        con: &mut PostgresTransaction,
        limit: Option<&SelectLimit>,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BookDetail>, KernelError> {
        PgBookInternal::find_all_details(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn allocate_id(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<BookId, KernelError> {
        PgBookInternal::allocate_id(con).await
    }

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<RowVersion<Book>, KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }

    async fn link_authors(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        authors: &[AuthorId],
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::link_authors(con, book_id, authors).await
    }

    async fn link_genres(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
        genres: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::link_genres(con, book_id, genres).await
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i32,
    title: String,
    description: String,
    price: Decimal,
    cover_image_url: String,
    review_count: i32,
    average_rating: f64,
    version: i64,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookDescription::new(value.description),
            BookPrice::new(value.price),
            BookCoverImageUrl::new(value.cover_image_url),
            ReviewCount::new(value.review_count),
            AverageRating::new(value.average_rating),
            RowVersion::new(value.version),
        )
    }
}

#[derive(sqlx::FromRow)]
struct BookDetailRow {
    #[sqlx(flatten)]
    book: BookRow,
    authors: Vec<String>,
    genres: Vec<String>,
}

impl From<BookDetailRow> for BookDetail {
    fn from(value: BookDetailRow) -> Self {
        BookDetail::new(
            Book::from(value.book),
            value.authors.into_iter().map(AuthorName::new).collect(),
            value.genres.into_iter().map(GenreName::new).collect(),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, description, price, cover_image_url, review_count, average_rating, version
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn exists(con: &mut PgConnection, id: &BookId) -> error_stack::Result<bool, KernelError> {
        let exists = sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)
            "#,
        )
        .bind(id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(exists)
    }

    async fn find_detail_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<BookDetail>, KernelError> {
        let row = sqlx::query_as::<_, BookDetailRow>(
            // language=postgresql
            r#"
            SELECT
                b.id, b.title, b.description, b.price, b.cover_image_url,
                b.review_count, b.average_rating, b.version,
                ARRAY(
                    SELECT a.name FROM book_authors ba
                    JOIN authors a ON a.id = ba.author_id
                    WHERE ba.book_id = b.id
                    ORDER BY a.name
                ) AS authors,
                ARRAY(
                    SELECT g.name FROM book_genres bg
                    JOIN genres g ON g.id = bg.genre_id
                    WHERE bg.book_id = b.id
                    ORDER BY g.name
                ) AS genres
            FROM books b
            WHERE b.id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(BookDetail::from))
    }

    async fn find_all_details(
        con: &mut PgConnection,
        limit: Option<&SelectLimit>,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BookDetail>, KernelError> {
        // LIMIT NULL selects every row
        let rows = sqlx::query_as::<_, BookDetailRow>(
            // language=postgresql
            r#"
            SELECT
                b.id, b.title, b.description, b.price, b.cover_image_url,
                b.review_count, b.average_rating, b.version,
                ARRAY(
                    SELECT a.name FROM book_authors ba
                    JOIN authors a ON a.id = ba.author_id
                    WHERE ba.book_id = b.id
                    ORDER BY a.name
                ) AS authors,
                ARRAY(
                    SELECT g.name FROM book_genres bg
                    JOIN genres g ON g.id = bg.genre_id
                    WHERE bg.book_id = b.id
                    ORDER BY g.name
                ) AS genres
            FROM books b
            ORDER BY b.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.map(|limit| i64::from(*limit.as_ref())))
        .bind(i64::from(*offset.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BookDetail::from).collect())
    }

    async fn allocate_id(con: &mut PgConnection) -> error_stack::Result<BookId, KernelError> {
        let id = sqlx::query_scalar::<_, i64>(
            // language=postgresql
            r#"
            SELECT nextval('books_id_seq')
            "#,
        )
        .fetch_one(con)
        .await
        .convert_error()?;
        let id = i32::try_from(id)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("Book id sequence overflowed: {id}"))?;
        Ok(BookId::new(id))
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, description, price, cover_image_url, review_count, average_rating, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.description().as_ref())
        .bind(book.price().as_ref())
        .bind(book.cover_image_url().as_ref())
        .bind(book.review_count().as_ref())
        .bind(book.average_rating().as_ref())
        .bind(book.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()
        .attach_printable_lazy(|| format!("Failed to insert book {}", book.id().as_ref()))?;

        // Client supplied ids must never be handed out by the sequence later.
        sqlx::query(
            // language=postgresql
            r#"
            SELECT setval('books_id_seq', GREATEST($1, (SELECT last_value FROM books_id_seq)))
            "#,
        )
        .bind(i64::from(*book.id().as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        book: &Book,
    ) -> error_stack::Result<RowVersion<Book>, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2,
                description = $3,
                price = $4,
                cover_image_url = $5,
                review_count = $6,
                average_rating = $7,
                version = version + 1
            WHERE id = $1 AND version = $8
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.description().as_ref())
        .bind(book.price().as_ref())
        .bind(book.cover_image_url().as_ref())
        .bind(book.review_count().as_ref())
        .bind(book.average_rating().as_ref())
        .bind(book.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Book {} is missing or no longer at version {}",
                book.id().as_ref(),
                book.version().as_ref()
            )));
        }
        Ok(book.version().next())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", book_id.as_ref())));
        }
        Ok(())
    }

    async fn link_authors(
        con: &mut PgConnection,
        book_id: &BookId,
        authors: &[AuthorId],
    ) -> error_stack::Result<(), KernelError> {
        let authors = authors.iter().map(|id| *id.as_ref()).collect::<Vec<i32>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_authors (book_id, author_id)
            SELECT $1, UNNEST($2::INTEGER[])
            "#,
        )
        .bind(book_id.as_ref())
        .bind(&authors)
        .execute(con)
        .await
        .convert_error()
        .attach_printable_lazy(|| format!("Failed to link authors {authors:?}"))?;
        Ok(())
    }

    async fn link_genres(
        con: &mut PgConnection,
        book_id: &BookId,
        genres: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        let genres = genres.iter().map(|id| *id.as_ref()).collect::<Vec<i32>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO book_genres (book_id, genre_id)
            SELECT $1, UNNEST($2::INTEGER[])
            "#,
        )
        .bind(book_id.as_ref())
        .bind(&genres)
        .execute(con)
        .await
        .convert_error()
        .attach_printable_lazy(|| format!("Failed to link genres {genres:?}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::{AuthorModifier, BookModifier};
    use kernel::prelude::entity::{
        AuthorName, AverageRating, Book, BookCoverImageUrl, BookDescription, BookId, BookPrice,
        BookTitle, ReviewCount, RowVersion,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresAuthorRepository, PostgresBookRepository, PostgresDatabase,
    };

    fn book(id: BookId, title: &str) -> Book {
        Book::new(
            id,
            BookTitle::new(title),
            BookDescription::new("description"),
            BookPrice::new(Decimal::new(1999, 2)),
            BookCoverImageUrl::new("https://example.com/cover.png"),
            ReviewCount::new(0),
            AverageRating::new(0.0),
            RowVersion::initial(),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn basic_modification() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let id = PostgresBookRepository.allocate_id(&mut con).await?;
        let book = book(id, "test");
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        let version = PostgresBookRepository.update(&mut con, &book).await?;
        assert_eq!(version, RowVersion::new(1));

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone().with_version(version)));

        PostgresBookRepository.delete(&mut con, &id).await?;
        assert!(!PostgresBookRepository.exists(&mut con, &id).await?);

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn stale_version_is_a_concurrency_error() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let id = PostgresBookRepository.allocate_id(&mut con).await?;
        let book = book(id, "stale");
        PostgresBookRepository.create(&mut con, &book).await?;
        PostgresBookRepository.update(&mut con, &book).await?;

        let stale = PostgresBookRepository.update(&mut con, &book).await;
        assert_eq!(
            stale.map_err(|report| *report.current_context()),
            Err(KernelError::Concurrency)
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn detail_flattens_author_names() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let id = PostgresBookRepository.allocate_id(&mut con).await?;
        PostgresBookRepository
            .create(&mut con, &book(id, "detail"))
            .await?;
        let suffix = id.as_ref();
        let herbert = PostgresAuthorRepository
            .create(&mut con, &AuthorName::new(format!("Herbert {suffix}")))
            .await?;
        PostgresBookRepository
            .link_authors(&mut con, &id, &[*herbert.id()])
            .await?;

        let detail = PostgresBookRepository
            .find_detail_by_id(&mut con, &id)
            .await?
            .map(|detail| detail.authors().clone());
        assert_eq!(detail, Some(vec![herbert.name().clone()]));

        con.roll_back().await?;
        Ok(())
    }
}
