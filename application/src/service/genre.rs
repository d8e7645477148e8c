use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{GenreQuery, DependOnGenreQuery};
use kernel::interface::update::{GenreModifier, DependOnGenreModifier};
use kernel::prelude::entity::GenreName;
use kernel::KernelError;

use crate::transfer::{CreateGenreDto, GenreDto};

#[async_trait::async_trait]
pub trait GetGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreQuery
{
    async fn get_genres(&self) -> error_stack::Result<Vec<GenreDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let genres = self.genre_query().find_all(&mut connection).await?;
        Ok(genres.into_iter().map(GenreDto::from).collect())
    }
}

impl<T> GetGenreService for T where T: DependOnDatabaseConnection + DependOnGenreQuery {}

#[async_trait::async_trait]
pub trait CreateGenreService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnGenreModifier
{
    async fn create_genre(
        &self,
        dto: CreateGenreDto,
    ) -> error_stack::Result<GenreDto, KernelError> {
        let name = dto.name.trim();
        if name.is_empty() {
            tracing::warn!("create_genre: blank name rejected");
            return Err(Report::new(KernelError::Invalid)
                .attach_printable("Genre name is blank"));
        }

        let mut connection = self.database_connection().transact().await?;
        let genre = self
            .genre_modifier()
            .create(&mut connection, &GenreName::new(name))
            .await?;
        connection.commit().await.inspect_err(|report| {
            tracing::warn!(name = name, "create_genre: {report:?}")
        })?;

        Ok(GenreDto::from(genre))
    }
}

impl<T> CreateGenreService for T where
    T: DependOnDatabaseConnection + DependOnGenreModifier
{
}
