//! Bug endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::bug::{BugListQuery, CreateBugRequest, UpdateBugRequest},
    response,
    routes::AppState,
};
use crate::auth::{CurrentUser, LoggedInUser, MaybeUser};
use crate::db::models::Bug;
use crate::db::repositories::BugRepository;
use crate::query::FilterSpec;
use crate::report;

const ME: &str = "me";

/// `creatorId=me` stands for the caller. Anonymous callers keep the literal
/// value, which matches no bug.
fn resolve_creator_alias(filter: &mut FilterSpec, caller: Option<&LoggedInUser>) {
    if filter.creator_id.as_deref() == Some(ME) {
        if let Some(user) = caller {
            filter.creator_id = Some(user.id.clone());
        }
    }
}

/// File a new bug as the logged-in user
///
/// POST /api/v1/bugs
pub async fn create_bug(
    State(app_state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    payload: Result<Json<CreateBugRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;

    let created = BugRepository::create(&app_state.db, req.into_new_bug(user.as_creator())).await?;

    tracing::info!("Created bug {} for {}", created.id, user.username);
    Ok(response::created(created))
}

/// List bugs through the filter, sort and page pipeline
///
/// GET /api/v1/bugs
pub async fn list_bugs(
    State(app_state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Query(params): Query<BugListQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut query = params.to_query(&app_state.query);
    resolve_creator_alias(&mut query.filter, caller.as_ref());
    let result = BugRepository::query(&app_state.db, &query).await;

    tracing::debug!(
        "Listed {} of {} bugs (page {})",
        result.bugs.len(),
        result.total_count,
        result.page_idx
    );
    Ok(response::ok(result))
}

/// Get a bug by ID
///
/// GET /api/v1/bugs/:id
pub async fn get_bug(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let bug = BugRepository::get_by_id(&app_state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bug {} not found", id)))?;

    Ok(response::ok(bug))
}

async fn load_modifiable(app_state: &AppState, id: &str, user: &LoggedInUser) -> ApiResult<Bug> {
    let bug = BugRepository::get_by_id(&app_state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bug {} not found", id)))?;

    if !user.can_modify(&bug) {
        tracing::warn!("{} may not modify bug {}", user.username, id);
        return Err(ApiError::Forbidden(format!(
            "Only the creator or an admin can modify bug {}",
            id
        )));
    }
    Ok(bug)
}

/// Update a bug
///
/// PUT /api/v1/bugs/:id
pub async fn update_bug(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser { user, .. }: CurrentUser,
    payload: Result<Json<UpdateBugRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;

    load_modifiable(&app_state, &id, &user).await?;
    let updated = BugRepository::update(&app_state.db, &id, req.into_changes()).await?;

    tracing::info!("Updated bug {}", id);
    Ok(response::ok(updated))
}

/// Delete a bug
///
/// DELETE /api/v1/bugs/:id
pub async fn delete_bug(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    CurrentUser { user, .. }: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    load_modifiable(&app_state, &id, &user).await?;
    BugRepository::delete(&app_state.db, &id).await?;

    tracing::info!("Deleted bug {}", id);
    Ok(response::no_content())
}

/// Collection-wide counts
///
/// GET /api/v1/bugs/stats
pub async fn get_bug_stats(State(app_state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = BugRepository::stats(&app_state.db).await;
    Ok(response::ok(stats))
}

/// Download every bug matching the list filters as a text report.
/// Paging parameters are ignored.
///
/// GET /api/v1/bugs/export
pub async fn export_bugs(
    State(app_state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Query(params): Query<BugListQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut filter = params.to_filter();
    resolve_creator_alias(&mut filter, caller.as_ref());
    let sort = params.to_sort();
    let bugs = BugRepository::export(&app_state.db, &filter, sort.as_ref()).await;

    let refs: Vec<&Bug> = bugs.iter().collect();
    let body = report::render_report(&refs, chrono::Utc::now());

    tracing::info!("Exported {} bugs", bugs.len());
    Ok(response::text_attachment(body, "bugs.txt"))
}
