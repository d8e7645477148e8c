use serde::Deserialize;

use application::transfer::CreateAuthorDto;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: String,
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateAuthorDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateAuthorDto { name: input.name }
    }
}
