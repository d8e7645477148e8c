use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use application::service::{CreateBookReviewService, GetBookReviewsService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Bookstore};

use self::request::{CreateRequest, GetRequest, Transformer};
use self::response::Presenter;

mod request;
mod response;

pub trait ReviewRouter {
    fn route_review(self) -> Self;
}

impl<D: Bookstore> ReviewRouter for Router<AppModule<D>> {
    fn route_review(self) -> Self {
        self.route(
            "/books/:id/reviews",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<i32>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.database().get_book_reviews(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<i32>,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.database().create_book_review(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
