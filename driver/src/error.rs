use error_stack::Report;
use kernel::KernelError;

pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                sqlx::Error::PoolTimedOut => KernelError::Timeout,
                sqlx::Error::Database(db) if db.is_unique_violation() => KernelError::Conflict,
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => KernelError::Invalid,
                sqlx::Error::Database(db) if db.is_check_violation() => KernelError::Invalid,
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}
