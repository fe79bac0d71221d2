//! Axum route handlers for the Wizard API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dataset::upload::read_file;
use crate::errors::AppError;
use crate::models::answers::AnswersPatch;
use crate::state::AppState;
use crate::strategy::request_strategy;
use crate::wizard::store::PendingGeneration;
use crate::wizard::SessionView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// False when the session moved on while the strategy was being produced.
    pub applied: bool,
    pub session: SessionView,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> Json<SessionView> {
    let view = state.sessions.create().await;
    info!("Created wizard session {}", view.id);
    Json(view)
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(id).await?))
}

/// DELETE /api/v1/sessions/:id
///
/// "Start over": the session returns to Landing with all data discarded.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(id, |s| {
            s.reset();
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    transition(&state, id, |s| Ok(s.start()?)).await
}

/// PATCH /api/v1/sessions/:id/answers
pub async fn handle_update_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AnswersPatch>,
) -> Result<Json<SessionView>, AppError> {
    transition(&state, id, |s| Ok(s.update_answers(patch)?)).await
}

/// POST /api/v1/sessions/:id/upload
///
/// The file is parsed before the session is touched, so a rejected upload
/// leaves the wizard exactly as it was.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let file = read_file(multipart).await?;
    let rows = file.parse()?;
    info!("Session {id}: uploaded {} rows", rows.len());

    transition(&state, id, |s| Ok(s.attach_upload(file.file_name, &rows)?)).await
}

/// POST /api/v1/sessions/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    transition(&state, id, |s| Ok(s.next()?)).await
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    transition(&state, id, |s| Ok(s.back()?)).await
}

/// POST /api/v1/sessions/:id/skip-upload
pub async fn handle_skip_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    transition(&state, id, |s| Ok(s.skip_upload()?)).await
}

/// POST /api/v1/sessions/:id/generate
///
/// Snapshots the answers, releases the session, awaits the strategy, then
/// applies it only if nobody navigated away in the meantime. If the request
/// is dropped before that, the guard releases the generation.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = state
        .sessions
        .update(id, |s| Ok(s.begin_generation()?))
        .await?;
    let guard = PendingGeneration::new(state.sessions.clone(), id, request.ticket);

    let outcome =
        request_strategy(state.generator.as_ref(), &request.answers, &request.insight).await;
    let fallback = outcome.is_fallback();

    let (applied, session) = state
        .sessions
        .update(id, |s| {
            let applied = s.complete_generation(request.ticket, outcome);
            Ok((applied, s.view()))
        })
        .await?;
    guard.disarm();

    if applied {
        info!("Session {id}: strategy ready (fallback: {fallback})");
    } else {
        warn!("Session {id}: discarded a strategy that finished after the wizard moved on");
    }

    Ok(Json(GenerateResponse { applied, session }))
}

async fn transition(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut crate::wizard::WizardSession) -> Result<(), AppError>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(id, |s| {
            f(s)?;
            debug!("Session {id} is now {:?}", s.stage());
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}
