use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use crate::modules::books::models::{BookForm, IndexParams, NOTICE_ADDED};
use crate::modules::books::page;
use crate::modules::books::session::{BookShelf, Flash, FlashKind, BOOK_ADDED};

pub async fn index(
    State(shelf): State<Arc<BookShelf>>,
    Query(params): Query<IndexParams>,
) -> Markup {
    let mut state = shelf.page().await;
    if params.notice.as_deref() == Some(NOTICE_ADDED) {
        state.flash = Some(Flash::success(BOOK_ADDED));
    }
    page::render(&state)
}

/// Redirects after a successful add so a reload cannot post the form twice.
pub async fn add_book(State(shelf): State<Arc<BookShelf>>, Form(form): Form<BookForm>) -> Response {
    let state = shelf.submit(form.into()).await;
    match &state.flash {
        Some(flash) if flash.kind == FlashKind::Success => {
            Redirect::to(&format!("/?notice={NOTICE_ADDED}")).into_response()
        }
        _ => page::render(&state).into_response(),
    }
}

pub async fn delete_book(State(shelf): State<Arc<BookShelf>>, Path(id): Path<String>) -> Response {
    let state = shelf.delete(&id).await;
    if state.flash.is_none() {
        return Redirect::to("/").into_response();
    }
    page::render(&state).into_response()
}

/// Fill blank fields from the metadata search; the form is never submitted.
pub async fn lookup(State(shelf): State<Arc<BookShelf>>, Form(form): Form<BookForm>) -> Markup {
    page::render(&shelf.search_page(form.into()).await)
}
