use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{AuthorQuery, DependOnAuthorQuery};
use kernel::interface::update::{AuthorModifier, DependOnAuthorModifier};
use kernel::prelude::entity::AuthorName;
use kernel::KernelError;

use crate::transfer::{CreateAuthorDto, AuthorDto};

#[async_trait::async_trait]
pub trait GetAuthorService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnAuthorQuery
{
    async fn get_authors(&self) -> error_stack::Result<Vec<AuthorDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let authors = self.author_query().find_all(&mut connection).await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }
}

impl<T> GetAuthorService for T where T: DependOnDatabaseConnection + DependOnAuthorQuery {}

#[async_trait::async_trait]
pub trait CreateAuthorService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnAuthorModifier
{
    async fn create_author(
        &self,
        dto: CreateAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        let name = dto.name.trim();
        if name.is_empty() {
            tracing::warn!("create_author: blank name rejected");
            return Err(Report::new(KernelError::Invalid)
                .attach_printable("Author name is blank"));
        }

        let mut connection = self.database_connection().transact().await?;
        let author = self
            .author_modifier()
            .create(&mut connection, &AuthorName::new(name))
            .await?;
        connection.commit().await.inspect_err(|report| {
            tracing::warn!(name = name, "create_author: {report:?}")
        })?;

        Ok(AuthorDto::from(author))
    }
}

impl<T> CreateAuthorService for T where
    T: DependOnDatabaseConnection + DependOnAuthorModifier
{
}

#[cfg(test)]
mod test {
    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{CreateAuthorService, GetAuthorService};
    use crate::transfer::CreateAuthorDto;

    fn named(name: &str) -> CreateAuthorDto {
        CreateAuthorDto {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn names_are_trimmed_and_unique() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let le_guin = db.create_author(named("  Ursula K. Le Guin ")).await?;
        assert_eq!(le_guin.name, "Ursula K. Le Guin");

        let duplicate = db.create_author(named("Ursula K. Le Guin")).await;
        assert_eq!(
            duplicate.map_err(|report| *report.current_context()),
            Err(KernelError::Conflict)
        );
        let blank = db.create_author(named("   ")).await;
        assert_eq!(
            blank.map_err(|report| *report.current_context()),
            Err(KernelError::Invalid)
        );

        assert_eq!(db.get_authors().await?, vec![le_guin]);
        Ok(())
    }
}
