use axum::Json;
use serde::Serialize;

use application::transfer::AuthorDto;

use crate::controller::Exhaust;
use crate::route::CreatedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    author_id: i32,
    name: String,
}

impl From<AuthorDto> for AuthorResponse {
    fn from(value: AuthorDto) -> Self {
        Self {
            author_id: value.id,
            name: value.name,
        }
    }
}

pub struct Presenter;

impl Exhaust<Vec<AuthorDto>> for Presenter {
    type To = Json<Vec<AuthorResponse>>;
    fn emit(&self, input: Vec<AuthorDto>) -> Self::To {
        Json(input.into_iter().map(AuthorResponse::from).collect())
    }
}

impl Exhaust<AuthorDto> for Presenter {
    type To = CreatedResponse<AuthorResponse>;
    fn emit(&self, input: AuthorDto) -> Self::To {
        CreatedResponse::new("/authors".to_string(), AuthorResponse::from(input))
    }
}
