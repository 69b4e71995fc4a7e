//! Book handlers for `/api/books`

use super::MessageResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::Multipart;
use grimoire_core::{AssetRef, Book, BookDraft, CatalogError, Grade};
use serde::Serialize;
use serde_json::Value;

/// Multipart field carrying the book as JSON text
const BOOK_FIELD: &str = "book";

/// Multipart field carrying the cover image
const IMAGE_FIELD: &str = "image";

/// Contents of a multipart book upload
#[derive(Debug, Default)]
struct BookUpload {
    book: Option<String>,
    image: Option<(Vec<u8>, String)>,
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<BookUpload> {
    let mut upload = BookUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            BOOK_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                upload.book = Some(text);
            }
            IMAGE_FIELD => {
                let filename = field.file_name().unwrap_or("cover").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                upload.image = Some((data.to_vec(), filename));
            }
            other => tracing::debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(upload)
}

/// Transform and store an uploaded cover
async fn store_image(state: &AppState, image: (Vec<u8>, String)) -> ApiResult<AssetRef> {
    let (data, filename) = image;
    Ok(state.catalog.assets().store(data, &filename).await?)
}

/// Response for a created book
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: String,
}

/// GET /api/books
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(state.catalog.list_books().await?))
}

/// GET /api/books/bestrating
pub async fn best_rated_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(state.catalog.top_rated_books().await?))
}

/// GET /api/books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    Ok(Json(state.catalog.get_book(&id).await?))
}

/// POST /api/books
///
/// Multipart body with a `book` JSON text field and an `image` file field.
pub async fn create_book(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let upload = read_upload(multipart).await?;

    let raw = upload
        .book
        .ok_or_else(|| CatalogError::Validation(format!("missing `{BOOK_FIELD}` field")))?;
    let draft = BookDraft::from_json(&raw)?;

    let image = upload
        .image
        .ok_or_else(|| CatalogError::Validation(format!("missing `{IMAGE_FIELD}` file")))?;
    let image = store_image(&state, image).await?;

    let book = state.catalog.create_book(&user.user_id, draft, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Book created!",
            id: book.id().to_string(),
        }),
    ))
}

/// PUT /api/books/:id
///
/// Accepts either a multipart body (`book` JSON text plus an optional `image`)
/// or a plain JSON body with the fields to change.
pub async fn update_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    request: Request,
) -> ApiResult<Json<MessageResponse>> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (draft, image) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let upload = read_upload(multipart).await?;

        let draft = match upload.book {
            Some(raw) => BookDraft::from_json(&raw)?,
            None => BookDraft::default(),
        };
        (draft, upload.image)
    } else {
        let Json(body) = Json::<Value>::from_request(request, &state).await?;
        (BookDraft::from_value(body)?, None)
    };

    let image = match image {
        Some(image) => Some(store_image(&state, image).await?),
        None => None,
    };

    state
        .catalog
        .update_book(&id, &user.user_id, draft, image)
        .await?;

    Ok(Json(MessageResponse {
        message: "Book updated!",
    }))
}

/// DELETE /api/books/:id
pub async fn delete_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.catalog.delete_book(&id, &user.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted!",
    }))
}

/// POST /api/books/:id/rating
///
/// Body `{"rating": <0..=5>}`. A `userId` key, if sent, is ignored: the rater
/// is always the authenticated caller.
pub async fn rate_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Json(body) = body?;
    let grade = Grade::from_json(body.get("rating").unwrap_or(&Value::Null))?;
    let book = state
        .catalog
        .rate_book(&id, &user.user_id, grade.value())
        .await?;
    Ok(Json(book))
}
