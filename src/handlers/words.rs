// Word listing handlers
// HTTP handlers for the public word list

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::{
    db::WordStore,
    error::ApiError,
    models::word::{WordListResponse, WordView},
};

/// List every approved word that belongs to an approved category
/// GET /api/words
///
/// Two sequential reads: approved category ids first, then the
/// approved words inside them, sorted ascending by word text.
pub async fn list_words(
    State(store): State<Arc<dyn WordStore>>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching approved word list");

    let category_ids = store.approved_category_ids().await?;

    // Nothing approved means an empty listing; skip the second query
    // rather than issuing an IN filter over an empty set.
    if category_ids.is_empty() {
        return Ok((StatusCode::OK, Json(WordListResponse { words: Vec::new() })));
    }

    let words = store.approved_words_in(&category_ids).await?;

    let words: Vec<WordView> = words.into_iter().map(WordView::from).collect();

    info!("Retrieved {} approved words", words.len());
    Ok((StatusCode::OK, Json(WordListResponse { words })))
}
