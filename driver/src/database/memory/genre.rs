use kernel::interface::query::{GenreQuery, DependOnGenreQuery};
use kernel::interface::update::{GenreModifier, DependOnGenreModifier};
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::KernelError;

use crate::database::memory::{InMemoryDatabase, InMemoryTransaction, Sequence, StagedWrite};

pub struct InMemoryGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for InMemoryGenreRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        Ok(con.read().await.genres.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl GenreModifier for InMemoryGenreRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        name: &GenreName,
    ) -> error_stack::Result<Genre, KernelError> {
        let id = GenreId::new(con.next_sequence(Sequence::Genre).await);
        let genre = Genre::new(id, name.clone());
        con.stage(StagedWrite::CreateGenre(genre.clone()));
        Ok(genre)
    }
}

impl DependOnGenreQuery for InMemoryDatabase {
    type GenreQuery = InMemoryGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &InMemoryGenreRepository
    }
}

impl DependOnGenreModifier for InMemoryDatabase {
    type GenreModifier = InMemoryGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &InMemoryGenreRepository
    }
}
