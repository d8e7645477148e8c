use axum::Json;
use serde::Serialize;

use application::transfer::GenreDto;

use crate::controller::Exhaust;
use crate::route::CreatedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreResponse {
    genre_id: i32,
    name: String,
}

impl From<GenreDto> for GenreResponse {
    fn from(value: GenreDto) -> Self {
        Self {
            genre_id: value.id,
            name: value.name,
        }
    }
}

pub struct Presenter;

impl Exhaust<Vec<GenreDto>> for Presenter {
    type To = Json<Vec<GenreResponse>>;
    fn emit(&self, input: Vec<GenreDto>) -> Self::To {
        Json(input.into_iter().map(GenreResponse::from).collect())
    }
}

impl Exhaust<GenreDto> for Presenter {
    type To = CreatedResponse<GenreResponse>;
    fn emit(&self, input: GenreDto) -> Self::To {
        CreatedResponse::new("/genres".to_string(), GenreResponse::from(input))
    }
}
