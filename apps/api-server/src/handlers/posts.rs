//! Post handlers.

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, web};

use quill_core::domain::CandidatePost;
use quill_shared::dto::ListPostsQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts
///
/// The body is read raw so malformed JSON yields our own 400 body.
pub async fn create_post(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    let candidate = parse_candidate(&body)?;

    let post = state.posts.create(&candidate).await.map_err(|e| state.error(e))?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_published(query.limit)
        .await
        .map_err(|e| state.error(e))?;

    Ok(HttpResponse::Ok()
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(state.list_cache_max_age),
        ]))
        .json(posts))
}

fn parse_candidate(body: &[u8]) -> AppResult<CandidatePost> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected unparseable body");
        AppError::BadRequest("Invalid JSON body".to_string())
    })?;

    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
