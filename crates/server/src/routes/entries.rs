use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use service::entry::service::SortOrder;
use service::errors::ServiceError;
use tracing::info;

use super::parse_entry_id;
use crate::{errors::PageError, render, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct AddEntryForm {
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub regret: Option<String>,
}

async fn list_page(state: &AppState, order: SortOrder) -> Result<Html<String>, PageError> {
    let entries = state.entries.list(order).await?;
    Ok(Html(render::index_page(&entries, order)))
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    list_page(&state, SortOrder::Recent).await
}

pub async fn index_by_upvotes(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    list_page(&state, SortOrder::Popular).await
}

pub async fn add_form() -> Html<String> {
    Html(render::add_page())
}

/// Blank `why` stores nothing; either way the browser goes back to `/`.
/// A body that is not a form counts as blank.
pub async fn add_post(State(state): State<AppState>, form: Option<Form<AddEntryForm>>) -> Result<Redirect, PageError> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    if let Some(created) = state.entries.create(form.why.as_deref(), form.regret.as_deref()).await? {
        info!(entry_id = created.id, "entry added via form");
    }
    Ok(Redirect::to("/"))
}

pub async fn view_entry(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Html<String>, PageError> {
    let id = parse_entry_id(&raw).ok_or_else(|| ServiceError::not_found("entry"))?;
    let entry = state.entries.get_by_id(id).await?;
    Ok(Html(render::entry_page(&entry)))
}
