use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::{RwLock, RwLockReadGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{
    Author, AuthorId, Book, BookId, BookReview, Genre, GenreId, ReviewId,
};
use kernel::KernelError;

pub use self::{author::*, book::*, genre::*, review::*};

mod author;
mod book;
mod genre;
mod review;

/// Process-local store with the same commit semantics as the postgres driver:
/// writes are staged per transaction and validated atomically on commit.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(InMemoryTransaction {
            store: Arc::clone(&self.store),
            staged: Vec::new(),
        })
    }
}

pub struct InMemoryTransaction {
    store: Arc<RwLock<MemoryStore>>,
    staged: Vec<StagedWrite>,
}

impl InMemoryTransaction {
    /// Reads see committed state only.
    async fn read(&self) -> RwLockReadGuard<'_, MemoryStore> {
        self.store.read().await
    }

    fn stage(&mut self, write: StagedWrite) {
        self.staged.push(write);
    }

    /// Sequences advance outside of the transaction, like database sequences do.
    async fn next_sequence(&self, sequence: Sequence) -> i32 {
        let mut store = self.store.write().await;
        store.sequences.next(sequence)
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let mut store = self.store.write().await;
        let mut working = store.clone();
        for write in self.staged {
            working.apply(write)?;
        }
        *store = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Debug)]
enum StagedWrite {
    CreateBook(Book),
    /// Carries the version the writer read.
    UpdateBook(Book),
    DeleteBook(BookId),
    LinkAuthors(BookId, Vec<AuthorId>),
    LinkGenres(BookId, Vec<GenreId>),
    CreateReview(BookReview),
    CreateAuthor(Author),
    CreateGenre(Genre),
}

#[derive(Debug, Clone, Copy)]
enum Sequence {
    Book,
    Review,
    Author,
    Genre,
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    book: i32,
    review: i32,
    author: i32,
    genre: i32,
}

impl Sequences {
    fn slot(&mut self, sequence: Sequence) -> &mut i32 {
        match sequence {
            Sequence::Book => &mut self.book,
            Sequence::Review => &mut self.review,
            Sequence::Author => &mut self.author,
            Sequence::Genre => &mut self.genre,
        }
    }

    fn next(&mut self, sequence: Sequence) -> i32 {
        let slot = self.slot(sequence);
        *slot = slot.saturating_add(1);
        *slot
    }

    fn observe(&mut self, sequence: Sequence, used: i32) {
        let slot = self.slot(sequence);
        *slot = (*slot).max(used);
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryStore {
    books: BTreeMap<BookId, Book>,
    reviews: BTreeMap<ReviewId, BookReview>,
    authors: BTreeMap<AuthorId, Author>,
    genres: BTreeMap<GenreId, Genre>,
    book_authors: BTreeSet<(BookId, AuthorId)>,
    book_genres: BTreeSet<(BookId, GenreId)>,
    sequences: Sequences,
}

impl MemoryStore {
    fn apply(&mut self, write: StagedWrite) -> error_stack::Result<(), KernelError> {
        match write {
            StagedWrite::CreateBook(book) => {
                let id = *book.id();
                if self.books.contains_key(&id) {
                    return Err(Report::new(KernelError::Conflict)
                        .attach_printable(format!("Book {} already exists", id.as_ref())));
                }
                self.sequences.observe(Sequence::Book, *id.as_ref());
                self.books.insert(id, book);
            }
            StagedWrite::UpdateBook(book) => {
                let id = *book.id();
                let stored = self.books.get(&id).map(|stored| stored.version().clone());
                if stored.as_ref() != Some(book.version()) {
                    return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                        "Book {} is missing or no longer at version {}",
                        id.as_ref(),
                        book.version().as_ref()
                    )));
                }
                let next = book.version().next();
                self.books.insert(id, book.with_version(next));
            }
            StagedWrite::DeleteBook(id) => {
                if self.books.remove(&id).is_none() {
                    return Err(Report::new(KernelError::NotFound)
                        .attach_printable(format!("Book {} not found", id.as_ref())));
                }
                self.reviews.retain(|_, review| *review.book_id() != id);
                self.book_authors.retain(|(book_id, _)| *book_id != id);
                self.book_genres.retain(|(book_id, _)| *book_id != id);
            }
            StagedWrite::LinkAuthors(book_id, authors) => {
                self.require_book(&book_id)?;
                for author_id in authors {
                    if !self.authors.contains_key(&author_id) {
                        return Err(Report::new(KernelError::Invalid).attach_printable(format!(
                            "Author {} does not exist",
                            author_id.as_ref()
                        )));
                    }
                    if !self.book_authors.insert((book_id, author_id)) {
                        return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                            "Author {} is already linked",
                            author_id.as_ref()
                        )));
                    }
                }
            }
            StagedWrite::LinkGenres(book_id, genres) => {
                self.require_book(&book_id)?;
                for genre_id in genres {
                    if !self.genres.contains_key(&genre_id) {
                        return Err(Report::new(KernelError::Invalid).attach_printable(format!(
                            "Genre {} does not exist",
                            genre_id.as_ref()
                        )));
                    }
                    if !self.book_genres.insert((book_id, genre_id)) {
                        return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                            "Genre {} is already linked",
                            genre_id.as_ref()
                        )));
                    }
                }
            }
            StagedWrite::CreateReview(review) => {
                if !self.books.contains_key(review.book_id()) {
                    return Err(Report::new(KernelError::NotFound).attach_printable(format!(
                        "Book {} not found",
                        review.book_id().as_ref()
                    )));
                }
                self.reviews.insert(*review.id(), review);
            }
            StagedWrite::CreateAuthor(author) => {
                if self.authors.values().any(|stored| stored.name() == author.name()) {
                    return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                        "Author {} already exists",
                        author.name().as_ref()
                    )));
                }
                self.authors.insert(*author.id(), author);
            }
            StagedWrite::CreateGenre(genre) => {
                if self.genres.values().any(|stored| stored.name() == genre.name()) {
                    return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                        "Genre {} already exists",
                        genre.name().as_ref()
                    )));
                }
                self.genres.insert(*genre.id(), genre);
            }
        }
        Ok(())
    }

    fn require_book(&self, id: &BookId) -> error_stack::Result<(), KernelError> {
        if self.books.contains_key(id) {
            Ok(())
        } else {
            Err(Report::new(KernelError::Invalid)
                .attach_printable(format!("Book {} does not exist", id.as_ref())))
        }
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::{BookQuery, BookReviewQuery};
    use kernel::interface::update::{BookModifier, BookReviewModifier};
    use kernel::prelude::entity::{
        AverageRating, Book, BookCoverImageUrl, BookDescription, BookId, BookPrice, BookTitle,
        Rating, ReviewComment, ReviewCount, RowVersion,
    };
    use kernel::KernelError;

    use crate::database::memory::{
        InMemoryBookRepository, InMemoryBookReviewRepository, InMemoryDatabase,
    };

    fn book(id: i32) -> Book {
        Book::new(
            BookId::new(id),
            BookTitle::new("Earthsea"),
            BookDescription::default(),
            BookPrice::new(Decimal::new(850, 2)),
            BookCoverImageUrl::default(),
            ReviewCount::new(0),
            AverageRating::new(0.0),
            RowVersion::initial(),
        )
    }

    async fn seed(db: &InMemoryDatabase, book: &Book) -> error_stack::Result<(), KernelError> {
        let mut con = db.transact().await?;
        InMemoryBookRepository.create(&mut con, book).await?;
        con.commit().await
    }

    #[tokio::test]
    async fn writes_are_invisible_until_commit() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let id = BookId::new(1);

        let mut con = db.transact().await?;
        InMemoryBookRepository.create(&mut con, &book(1)).await?;
        assert!(!InMemoryBookRepository.exists(&mut con, &id).await?);
        con.roll_back().await?;

        let mut con = db.transact().await?;
        assert!(!InMemoryBookRepository.exists(&mut con, &id).await?);
        InMemoryBookRepository.create(&mut con, &book(1)).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        assert!(InMemoryBookRepository.exists(&mut con, &id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn stale_update_fails_on_commit() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        seed(&db, &book(1)).await?;

        let mut first = db.transact().await?;
        let mut second = db.transact().await?;
        let read_first = InMemoryBookRepository.find_by_id(&mut first, &BookId::new(1)).await?;
        let read_second = InMemoryBookRepository.find_by_id(&mut second, &BookId::new(1)).await?;
        let (Some(read_first), Some(read_second)) = (read_first, read_second) else {
            panic!("seeded book is missing");
        };

        let version = InMemoryBookRepository.update(&mut first, &read_first).await?;
        assert_eq!(version, RowVersion::new(1));
        first.commit().await?;

        InMemoryBookRepository.update(&mut second, &read_second).await?;
        let result = second.commit().await;
        assert_eq!(
            result.map_err(|report| *report.current_context()),
            Err(KernelError::Concurrency)
        );

        let mut con = db.transact().await?;
        let stored = InMemoryBookRepository.find_by_id(&mut con, &BookId::new(1)).await?;
        assert_eq!(stored.map(|book| book.version().clone()), Some(RowVersion::new(1)));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        seed(&db, &book(7)).await?;

        let result = seed(&db, &book(7)).await;
        assert_eq!(
            result.map_err(|report| *report.current_context()),
            Err(KernelError::Conflict)
        );

        let mut con = db.transact().await?;
        let allocated = InMemoryBookRepository.allocate_id(&mut con).await?;
        assert_eq!(allocated, BookId::new(8));
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_reviews() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        seed(&db, &book(3)).await?;
        let id = BookId::new(3);

        let mut con = db.transact().await?;
        InMemoryBookReviewRepository
            .create(&mut con, &id, &Rating::new(4), &ReviewComment::new("good"))
            .await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        assert_eq!(
            InMemoryBookReviewRepository
                .find_by_book_id(&mut con, &id)
                .await?
                .len(),
            1
        );
        InMemoryBookRepository.delete(&mut con, &id).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        assert!(InMemoryBookReviewRepository
            .find_by_book_id(&mut con, &id)
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn review_of_deleted_book_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        seed(&db, &book(4)).await?;
        let id = BookId::new(4);

        let mut review = db.transact().await?;
        InMemoryBookReviewRepository
            .create(&mut review, &id, &Rating::new(2), &ReviewComment::new("late"))
            .await?;

        let mut delete = db.transact().await?;
        InMemoryBookRepository.delete(&mut delete, &id).await?;
        delete.commit().await?;

        assert_eq!(
            review.commit().await.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        Ok(())
    }
}
