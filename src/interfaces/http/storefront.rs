use super::AppState;
use crate::domain::catalog::{Category, MenuItem};
use crate::domain::feedback::{MessageInput, RatingInput};
use crate::domain::settings::PublicSettings;
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

pub async fn menu_handler(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>> {
    Ok(Json(state.services.catalog.menu_items().await?))
}

pub async fn categories_handler(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.services.catalog.categories().await?))
}

pub async fn public_settings_handler(State(state): State<AppState>) -> Result<Json<PublicSettings>> {
    Ok(Json(state.services.settings.public_settings().await?))
}

pub async fn contact_handler(
    State(state): State<AppState>,
    Json(input): Json<MessageInput>,
) -> Result<(StatusCode, Json<Value>)> {
    state.services.engagement.submit_message(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "error": false, "message": "Message sent successfully!" })),
    ))
}

pub async fn rating_handler(
    State(state): State<AppState>,
    Json(input): Json<RatingInput>,
) -> Result<(StatusCode, Json<Value>)> {
    state.services.engagement.submit_rating(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "error": false, "message": "Thank you for your feedback!" })),
    ))
}

#[derive(Deserialize)]
pub struct PageView {
    path: String,
}

pub async fn page_view_handler(State(state): State<AppState>, Json(view): Json<PageView>) -> StatusCode {
    state.services.activity.page_view(&view.path).await;
    StatusCode::NO_CONTENT
}
