use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Author, AuthorName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    async fn create(
        &self,
        con: &mut Self::Transaction,
        name: &AuthorName,
    ) -> error_stack::Result<Author, KernelError>;
}

pub trait DependOnAuthorModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type AuthorModifier: AuthorModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn author_modifier(&self) -> &Self::AuthorModifier;
}
