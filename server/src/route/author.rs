use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use application::service::{CreateAuthorService, GetAuthorService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Bookstore};

use self::request::{CreateRequest, Transformer};
use self::response::Presenter;

mod request;
mod response;

pub trait AuthorRouter {
    fn route_author(self) -> Self;
}

impl<D: Bookstore> AuthorRouter for Router<AppModule<D>> {
    fn route_author(self) -> Self {
        self.route(
            "/authors",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), Presenter)
                    .bypass(|| async move { module.database().get_authors().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_author(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
