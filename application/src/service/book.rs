use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    AuthorId, AverageRating, Book, BookCoverImageUrl, BookDescription, BookId, BookPrice,
    BookTitle, GenreId, ReviewCount, RowVersion,
};
use kernel::KernelError;

use crate::transfer::{
    BookDetailDto, BookDto, CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto,
    UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery
{
    async fn get_book(
        &self,
        dto: GetBookDto,
    ) -> error_stack::Result<Option<BookDetailDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let detail = self
            .book_query()
            .find_detail_by_id(&mut connection, &id)
            .await?;
        if detail.is_none() {
            tracing::warn!(book_id = dto.id, "get_book: book not found");
        }

        Ok(detail.map(BookDetailDto::from))
    }

    async fn get_all_books(
        &self,
        dto: GetAllBookDto,
    ) -> error_stack::Result<Vec<BookDetailDto>, KernelError> {
        let negative_limit = dto.limit.as_ref().is_some_and(|limit| *limit.as_ref() < 0);
        if negative_limit || *dto.offset.as_ref() < 0 {
            tracing::warn!(
                limit = ?dto.limit,
                offset = ?dto.offset,
                "get_all_books: negative paging rejected"
            );
            return Err(Report::new(KernelError::Invalid)
                .attach_printable("limit and offset must not be negative"));
        }

        let mut connection = self.database_connection().transact().await?;
        let details = self
            .book_query()
            .find_all_details(&mut connection, dto.limit.as_ref(), &dto.offset)
            .await?;

        Ok(details.into_iter().map(BookDetailDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnDatabaseConnection + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let requested = dto.id;
        let book = stage_book(self.book_modifier(), &mut connection, dto)
            .await
            .inspect_err(|report| {
                tracing::warn!(book_id = ?requested, "create_book: {report:?}")
            })?;
        connection.commit().await.inspect_err(|report| {
            tracing::warn!(book_id = book.id().as_ref(), "create_book: {report:?}")
        })?;

        Ok(BookDto::from(book))
    }

    /// Creates every book or none of them.
    async fn create_books(
        &self,
        dtos: Vec<CreateBookDto>,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let mut books = Vec::with_capacity(dtos.len());
        for dto in dtos {
            let requested = dto.id;
            let book = stage_book(self.book_modifier(), &mut connection, dto)
                .await
                .inspect_err(|report| {
                    tracing::warn!(book_id = ?requested, "create_books: {report:?}")
                })?;
            books.push(book);
        }
        connection
            .commit()
            .await
            .inspect_err(|report| tracing::warn!(count = books.len(), "create_books: {report:?}"))?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> CreateBookService for T where T: DependOnDatabaseConnection + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<(), KernelError> {
        if dto.path_id != dto.id {
            tracing::warn!(
                path_id = dto.path_id,
                body_id = dto.id,
                "update_book: id mismatch"
            );
            return Err(Report::new(KernelError::Invalid).attach_printable(format!(
                "Path id {} does not match body id {}",
                dto.path_id, dto.id
            )));
        }

        let id = BookId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let Some(stored) = self.book_query().find_by_id(&mut connection, &id).await? else {
            tracing::warn!(book_id = dto.id, "update_book: book not found");
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.id)));
        };

        let version = dto
            .version
            .map(RowVersion::new)
            .unwrap_or_else(|| stored.version().clone());
        let book = Book::new(
            id,
            BookTitle::new(dto.title),
            BookDescription::new(dto.description),
            BookPrice::new(dto.price),
            BookCoverImageUrl::new(dto.cover_image_url),
            ReviewCount::new(dto.review_count),
            AverageRating::new(dto.average_rating),
            version,
        );

        match commit_update(self.book_modifier(), connection, &book).await {
            Ok(_) => Ok(()),
            Err(report) => Err(classify_conflict(self, &id, report, "update_book").await),
        }
    }
}

impl<T> UpdateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if !self.book_query().exists(&mut connection, &id).await? {
            tracing::warn!(book_id = dto.id, "delete_book: book not found");
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.id)));
        }

        self.book_modifier().delete(&mut connection, &id).await?;
        connection
            .commit()
            .await
            .inspect_err(|report| tracing::warn!(book_id = dto.id, "delete_book: {report:?}"))?;

        Ok(())
    }
}

impl<T> DeleteBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

async fn stage_book<M: BookModifier>(
    modifier: &M,
    connection: &mut M::Transaction,
    dto: CreateBookDto,
) -> error_stack::Result<Book, KernelError> {
    // 0 is what clients send for "no id yet".
    let id = match dto.id {
        Some(id) if id < 0 => {
            return Err(Report::new(KernelError::Invalid)
                .attach_printable(format!("Book id must not be negative, got {id}")))
        }
        Some(id) if id > 0 => BookId::new(id),
        _ => modifier.allocate_id(connection).await?,
    };

    let book = Book::new(
        id,
        BookTitle::new(dto.title),
        BookDescription::new(dto.description),
        BookPrice::new(dto.price),
        BookCoverImageUrl::new(dto.cover_image_url),
        ReviewCount::new(dto.review_count),
        AverageRating::new(dto.average_rating),
        RowVersion::initial(),
    );
    modifier.create(connection, &book).await?;

    if !dto.author_ids.is_empty() {
        let authors = dto
            .author_ids
            .into_iter()
            .map(AuthorId::new)
            .collect::<Vec<_>>();
        modifier.link_authors(connection, &id, &authors).await?;
    }
    if !dto.genre_ids.is_empty() {
        let genres = dto
            .genre_ids
            .into_iter()
            .map(GenreId::new)
            .collect::<Vec<_>>();
        modifier.link_genres(connection, &id, &genres).await?;
    }

    Ok(book)
}

/// Writes a version-guarded update and commits it. The transaction is rolled
/// back when the write itself is refused.
pub(crate) async fn commit_update<M: BookModifier>(
    modifier: &M,
    mut connection: M::Transaction,
    book: &Book,
) -> error_stack::Result<RowVersion<Book>, KernelError> {
    match modifier.update(&mut connection, book).await {
        Ok(version) => {
            connection.commit().await?;
            Ok(version)
        }
        Err(report) => {
            if let Err(rollback) = connection.roll_back().await {
                tracing::error!("Failed to roll back: {rollback:?}");
            }
            Err(report)
        }
    }
}

/// A concurrency failure means the row was either deleted or modified after
/// it was read. Existence is re-checked on a fresh transaction to tell the two
/// apart; other failures pass through untouched.
pub(crate) async fn classify_conflict<T>(
    module: &T,
    id: &BookId,
    report: Report<KernelError>,
    operation: &'static str,
) -> Report<KernelError>
where
    T: ?Sized + DependOnBookQuery,
{
    if *report.current_context() != KernelError::Concurrency {
        tracing::error!(book_id = id.as_ref(), "{operation}: {report:?}");
        return report;
    }

    match book_exists(module, id).await {
        Ok(false) => {
            tracing::warn!(book_id = id.as_ref(), "{operation}: book deleted concurrently");
            report
                .change_context(KernelError::NotFound)
                .attach_printable(format!("Book {} was deleted concurrently", id.as_ref()))
        }
        Ok(true) => {
            tracing::warn!(book_id = id.as_ref(), "{operation}: book modified concurrently");
            report
        }
        Err(check) => {
            tracing::error!(
                book_id = id.as_ref(),
                "{operation}: existence check failed: {check:?}"
            );
            report
        }
    }
}

async fn book_exists<T>(module: &T, id: &BookId) -> error_stack::Result<bool, KernelError>
where
    T: ?Sized + DependOnBookQuery,
{
    let mut connection = module.database_connection().transact().await?;
    module.book_query().exists(&mut connection, id).await
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{CreateBookService, DeleteBookService, GetBookService, UpdateBookService};
    use crate::transfer::{
        CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, UpdateBookDto,
    };
    use kernel::prelude::entity::{SelectLimit, SelectOffset};

    fn create_dto(id: Option<i32>, title: &str) -> CreateBookDto {
        CreateBookDto {
            id,
            title: title.to_string(),
            description: String::new(),
            price: Decimal::new(1500, 2),
            cover_image_url: String::new(),
            review_count: 0,
            average_rating: 0.0,
            author_ids: Vec::new(),
            genre_ids: Vec::new(),
        }
    }

    fn update_dto(path_id: i32, id: i32, title: &str, version: Option<i64>) -> UpdateBookDto {
        UpdateBookDto {
            path_id,
            id,
            title: title.to_string(),
            description: "revised".to_string(),
            price: Decimal::new(1800, 2),
            cover_image_url: String::new(),
            review_count: 0,
            average_rating: 0.0,
            version,
        }
    }

    fn context<T>(result: error_stack::Result<T, KernelError>) -> Option<KernelError> {
        result.err().map(|report| *report.current_context())
    }

    #[tokio::test]
    async fn create_then_get() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let created = db.create_book(create_dto(None, "Neuromancer")).await?;
        assert_eq!(created.id, 1);
        assert_eq!(created.version, 0);

        let detail = db.get_book(GetBookDto { id: created.id }).await?;
        assert_eq!(detail.map(|detail| detail.book), Some(created));

        assert!(db.get_book(GetBookDto { id: 42 }).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn explicit_ids_and_duplicates() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        db.create_book(create_dto(Some(10), "Solaris")).await?;
        assert_eq!(
            context(db.create_book(create_dto(Some(10), "Solaris")).await),
            Some(KernelError::Conflict)
        );
        assert_eq!(
            context(db.create_book(create_dto(Some(-3), "Negative")).await),
            Some(KernelError::Invalid)
        );

        let next = db.create_book(create_dto(None, "Roadside Picnic")).await?;
        assert_eq!(next.id, 11);
        let zero = db.create_book(create_dto(Some(0), "Unnumbered")).await?;
        assert_eq!(zero.id, 12);
        Ok(())
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        db.create_book(create_dto(Some(2), "Existing")).await?;

        let batch = vec![create_dto(Some(1), "First"), create_dto(Some(2), "Clash")];
        assert_eq!(
            context(db.create_books(batch).await),
            Some(KernelError::Conflict)
        );
        assert!(db.get_book(GetBookDto { id: 1 }).await?.is_none());

        let batch = vec![create_dto(Some(3), "Third"), create_dto(Some(4), "Fourth")];
        let created = db.create_books(batch).await?;
        assert_eq!(
            created.iter().map(|book| book.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_author_is_invalid() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut dto = create_dto(Some(1), "Orphan");
        dto.author_ids = vec![77];
        assert_eq!(
            context(db.create_book(dto).await),
            Some(KernelError::Invalid)
        );
        assert!(db.get_book(GetBookDto { id: 1 }).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn paging() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        for title in ["a", "b", "c", "d"] {
            db.create_book(create_dto(None, title)).await?;
        }

        let page = db
            .get_all_books(GetAllBookDto {
                limit: Some(SelectLimit::new(2)),
                offset: SelectOffset::new(1),
            })
            .await?;
        assert_eq!(
            page.iter().map(|detail| detail.book.id).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let all = db
            .get_all_books(GetAllBookDto {
                limit: None,
                offset: SelectOffset::default(),
            })
            .await?;
        assert_eq!(all.len(), 4);

        let negative = db
            .get_all_books(GetAllBookDto {
                limit: Some(SelectLimit::new(-1)),
                offset: SelectOffset::default(),
            })
            .await;
        assert_eq!(context(negative), Some(KernelError::Invalid));
        Ok(())
    }

    #[tokio::test]
    async fn update_checks_ids_and_versions() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        db.create_book(create_dto(Some(1), "Draft")).await?;

        assert_eq!(
            context(db.update_book(update_dto(1, 2, "Mismatch", None)).await),
            Some(KernelError::Invalid)
        );
        assert_eq!(
            context(db.update_book(update_dto(9, 9, "Missing", None)).await),
            Some(KernelError::NotFound)
        );

        db.update_book(update_dto(1, 1, "Final", Some(0))).await?;
        let detail = db.get_book(GetBookDto { id: 1 }).await?;
        let Some(detail) = detail else {
            panic!("updated book is missing");
        };
        assert_eq!(detail.book.title, "Final");
        assert_eq!(detail.book.version, 1);

        assert_eq!(
            context(db.update_book(update_dto(1, 1, "Stale", Some(0))).await),
            Some(KernelError::Concurrency)
        );

        db.update_book(update_dto(1, 1, "Latest", None)).await?;
        let version = db
            .get_book(GetBookDto { id: 1 })
            .await?
            .map(|detail| detail.book.version);
        assert_eq!(version, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        db.create_book(create_dto(Some(1), "Ephemeral")).await?;

        db.delete_book(DeleteBookDto { id: 1 }).await?;
        assert!(db.get_book(GetBookDto { id: 1 }).await?.is_none());
        assert_eq!(
            context(db.delete_book(DeleteBookDto { id: 1 }).await),
            Some(KernelError::NotFound)
        );
        Ok(())
    }
}
