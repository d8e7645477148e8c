use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Genre;
use crate::KernelError;

#[async_trait::async_trait]
pub trait GenreQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Genre>, KernelError>;
}

pub trait DependOnGenreQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type GenreQuery: GenreQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn genre_query(&self) -> &Self::GenreQuery;
}
