use serde::Deserialize;

use application::transfer::CreateGenreDto;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: String,
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateGenreDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateGenreDto { name: input.name }
    }
}
