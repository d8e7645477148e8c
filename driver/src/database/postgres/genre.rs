use sqlx::PgConnection;

use kernel::interface::query::{GenreQuery, DependOnGenreQuery};
use kernel::interface::update::{GenreModifier, DependOnGenreModifier};
use kernel::prelude::entity::{Genre, GenreId, GenreName};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresGenreRepository;

#[async_trait::async_trait]
impl GenreQuery for PostgresGenreRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError> {
        PgGenreInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl GenreModifier for PostgresGenreRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        name: &GenreName,
    ) -> error_stack::Result<Genre, KernelError> {
        PgGenreInternal::create(con, name).await
    }
}

impl DependOnGenreQuery for PostgresDatabase {
    type GenreQuery = PostgresGenreRepository;
    fn genre_query(&self) -> &Self::GenreQuery {
        &PostgresGenreRepository
    }
}

impl DependOnGenreModifier for PostgresDatabase {
    type GenreModifier = PostgresGenreRepository;
    fn genre_modifier(&self) -> &Self::GenreModifier {
        &PostgresGenreRepository
    }
}

#[derive(sqlx::FromRow)]
struct GenreRow {
    id: i32,
    name: String,
}

impl From<GenreRow> for Genre {
    fn from(value: GenreRow) -> Self {
        Genre::new(GenreId::new(value.id), GenreName::new(value.name))
    }
}

pub(in crate::database) struct PgGenreInternal;

impl PgGenreInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Genre>, KernelError> {
        let rows = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM genres
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        name: &GenreName,
    ) -> error_stack::Result<Genre, KernelError> {
        let row = sqlx::query_as::<_, GenreRow>(
            // language=postgresql
            r#"
            INSERT INTO genres (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Genre::from(row))
    }
}
