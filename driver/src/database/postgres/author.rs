use sqlx::PgConnection;

use kernel::interface::query::{AuthorQuery, DependOnAuthorQuery};
use kernel::interface::update::{AuthorModifier, DependOnAuthorModifier};
use kernel::prelude::entity::{Author, AuthorId, AuthorName};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for PostgresAuthorRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl AuthorModifier for PostgresAuthorRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        name: &AuthorName,
    ) -> error_stack::Result<Author, KernelError> {
        PgAuthorInternal::create(con, name).await
    }
}

impl DependOnAuthorQuery for PostgresDatabase {
    type AuthorQuery = PostgresAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &PostgresAuthorRepository
    }
}

impl DependOnAuthorModifier for PostgresDatabase {
    type AuthorModifier = PostgresAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &PostgresAuthorRepository
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i32,
    name: String,
}

impl From<AuthorRow> for Author {
    fn from(value: AuthorRow) -> Self {
        Author::new(AuthorId::new(value.id), AuthorName::new(value.name))
    }
}

pub(in crate::database) struct PgAuthorInternal;

impl PgAuthorInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM authors
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        name: &AuthorName,
    ) -> error_stack::Result<Author, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            INSERT INTO authors (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Author::from(row))
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::AuthorQuery;
    use kernel::interface::update::AuthorModifier;
    use kernel::prelude::entity::AuthorName;
    use kernel::KernelError;

    use crate::database::postgres::{PostgresAuthorRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_name_conflicts() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let name = AuthorName::new("Ursula K. Le Guin (duplicate test)");
        let created = PostgresAuthorRepository.create(&mut con, &name).await?;
        assert!(PostgresAuthorRepository
            .find_all(&mut con)
            .await?
            .contains(&created));

        let duplicate = PostgresAuthorRepository.create(&mut con, &name).await;
        assert_eq!(
            duplicate.map_err(|report| *report.current_context()),
            Err(KernelError::Conflict)
        );
        con.roll_back().await?;
        Ok(())
    }
}
