use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    AuthorId, Book, BookDetail, BookId, GenreId, RowVersion, SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::database::memory::{
    InMemoryDatabase, InMemoryTransaction, MemoryStore, Sequence, StagedWrite,
};

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.read().await.books.get(id).cloned())
    }

    async fn exists(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con.read().await.books.contains_key(id))
    }

    async fn find_detail_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<BookDetail>, KernelError> {
        let store = con.read().await;
        Ok(store.books.get(id).map(|book| detail(&store, book)))
    }

    async fn find_all_details(
        &self,
        con: &mut InMemoryTransaction,
        limit: Option<&SelectLimit>,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BookDetail>, KernelError> {
        let store = con.read().await;
        let offset = usize::try_from(*offset.as_ref()).unwrap_or_default();
        let limit = limit.map_or(usize::MAX, |limit| {
            usize::try_from(*limit.as_ref()).unwrap_or_default()
        });
        Ok(store
            .books
            .values()
            .skip(offset)
            .take(limit)
            .map(|book| detail(&store, book))
            .collect())
    }
}

fn detail(store: &MemoryStore, book: &Book) -> BookDetail {
    let mut authors = store
        .book_authors
        .iter()
        .filter(|(book_id, _)| book_id == book.id())
        .filter_map(|(_, author_id)| store.authors.get(author_id))
        .map(|author| author.name().clone())
        .collect::<Vec<_>>();
    authors.sort();
    let mut genres = store
        .book_genres
        .iter()
        .filter(|(book_id, _)| book_id == book.id())
        .filter_map(|(_, genre_id)| store.genres.get(genre_id))
        .map(|genre| genre.name().clone())
        .collect::<Vec<_>>();
    genres.sort();
    BookDetail::new(book.clone(), authors, genres)
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn allocate_id(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<BookId, KernelError> {
        Ok(BookId::new(con.next_sequence(Sequence::Book).await))
    }

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.stage(StagedWrite::CreateBook(book.clone()));
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<RowVersion<Book>, KernelError> {
        con.stage(StagedWrite::UpdateBook(book.clone()));
        Ok(book.version().next())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.stage(StagedWrite::DeleteBook(*book_id));
        Ok(())
    }

    async fn link_authors(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        authors: &[AuthorId],
    ) -> error_stack::Result<(), KernelError> {
        con.stage(StagedWrite::LinkAuthors(*book_id, authors.to_vec()));
        Ok(())
    }

    async fn link_genres(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        genres: &[GenreId],
    ) -> error_stack::Result<(), KernelError> {
        con.stage(StagedWrite::LinkGenres(*book_id, genres.to_vec()));
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}
