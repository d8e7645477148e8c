use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::Report;
use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::Conflict => StatusCode::CONFLICT,
            KernelError::Invalid => StatusCode::BAD_REQUEST,
            // An unresolved write race is reported as a server-side failure.
            KernelError::Concurrency => StatusCode::INTERNAL_SERVER_ERROR,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        status.into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use error_stack::Report;
    use kernel::KernelError;

    use super::ErrorStatus;

    #[test]
    fn contexts_map_to_status_codes() {
        let cases = [
            (KernelError::NotFound, StatusCode::NOT_FOUND),
            (KernelError::Conflict, StatusCode::CONFLICT),
            (KernelError::Invalid, StatusCode::BAD_REQUEST),
            (KernelError::Concurrency, StatusCode::INTERNAL_SERVER_ERROR),
            (KernelError::Timeout, StatusCode::REQUEST_TIMEOUT),
            (KernelError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (context, status) in cases {
            assert_eq!(ErrorStatus::from(Report::new(context)).status(), status);
        }
    }
}
