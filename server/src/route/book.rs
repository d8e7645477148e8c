use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, IncrementReviewCountService,
    UpdateBookService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::{AppModule, Bookstore};

use self::request::{
    CreateRequest, DeleteRequest, GetAllRequest, GetRequest, IncrementReviewCountRequest,
    Transformer, UpdateRequest,
};
use self::response::{CreatedPresenter, Presenter};

mod request;
mod response;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<D: Bookstore> BookRouter for Router<AppModule<D>> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule<D>>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().get_all_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<D>>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/multiple",
            post(
                |State(module): State<AppModule<D>>, Json(req): Json<Vec<CreateRequest>>| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dtos| async move { module.database().create_books(dtos).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<i32>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(|res| {
                            res.map(IntoResponse::into_response)
                                .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
                        })
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<i32>,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.database().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<i32>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(DeleteRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id/incrementReviewCount",
            patch(
                |State(module): State<AppModule<D>>, Path(id): Path<i32>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(IncrementReviewCountRequest::new(id))
                        .handle(|dto| async move {
                            module.database().increment_review_count(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
