use kernel::interface::query::{AuthorQuery, DependOnAuthorQuery};
use kernel::interface::update::{AuthorModifier, DependOnAuthorModifier};
use kernel::prelude::entity::{Author, AuthorId, AuthorName};
use kernel::KernelError;

use crate::database::memory::{InMemoryDatabase, InMemoryTransaction, Sequence, StagedWrite};

pub struct InMemoryAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for InMemoryAuthorRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        Ok(con.read().await.authors.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl AuthorModifier for InMemoryAuthorRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        name: &AuthorName,
    ) -> error_stack::Result<Author, KernelError> {
        let id = AuthorId::new(con.next_sequence(Sequence::Author).await);
        let author = Author::new(id, name.clone());
        con.stage(StagedWrite::CreateAuthor(author.clone()));
        Ok(author)
    }
}

impl DependOnAuthorQuery for InMemoryDatabase {
    type AuthorQuery = InMemoryAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &InMemoryAuthorRepository
    }
}

impl DependOnAuthorModifier for InMemoryDatabase {
    type AuthorModifier = InMemoryAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &InMemoryAuthorRepository
    }
}
