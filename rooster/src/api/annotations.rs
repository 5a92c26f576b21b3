//! Authenticated annotation endpoints: per-user labels, comments and
//! saved search keywords attached to individual records.

use actix_web::web::{self, Json};
use serde::{Deserialize, Serialize};

use domain_db::db::KeywordSaveOutcome;

use super::error::{handle_blocking_error, handle_store_error, ApplicationError};
use super::identity::UserId;
use super::response::Envelope;
use super::validation;
use super::ApplicationContext;

#[derive(Debug, Serialize)]
pub struct MutationResult {
    pub status: &'static str,
}

const COMPLETED: MutationResult = MutationResult {
    status: "completed",
};

fn invalid(message: String) -> ApplicationError {
    ApplicationError::Validation(vec![message])
}

#[derive(Debug, Deserialize)]
pub struct KeywordPayload {
    keyword: String,
}

pub async fn save_user_keyword(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<KeywordPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let keyword = validation::keyword(&payload.keyword).map_err(invalid)?;

    let outcome = web::block(move || {
        ctx.get_repository()
            .save_user_keyword(user.0, &keyword)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    let status = match outcome {
        KeywordSaveOutcome::Created => "completed",
        KeywordSaveOutcome::AlreadyExists => "already_exists",
    };
    Ok(Json(Envelope::ok(MutationResult { status })))
}

pub async fn delete_user_keyword(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<KeywordPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let keyword = validation::keyword(&payload.keyword).map_err(invalid)?;

    web::block(move || {
        ctx.get_repository()
            .delete_user_keyword(user.0, &keyword)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(COMPLETED)))
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    cve_id: String,
    comment: String,
}

pub async fn save_user_cve_comment(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<CommentPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let mut errors = Vec::new();
    let cve_id = validation::cve_id(&payload.cve_id).map_err(|m| errors.push(m)).ok();
    let comment = validation::comment(&payload.comment).map_err(|m| errors.push(m)).ok();
    let (Some(cve_id), Some(comment)) = (cve_id, comment) else {
        return Err(ApplicationError::Validation(errors));
    };

    web::block(move || {
        ctx.get_repository()
            .save_user_cve_comment(user.0, &cve_id, &comment)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(COMPLETED)))
}

#[derive(Debug, Deserialize)]
pub struct CveIdPayload {
    cve_id: String,
}

pub async fn delete_user_cve_comment(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<CveIdPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let cve_id = validation::cve_id(&payload.cve_id).map_err(invalid)?;

    web::block(move || {
        ctx.get_repository()
            .delete_user_cve_comment(user.0, &cve_id)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(COMPLETED)))
}

#[derive(Debug, Deserialize)]
pub struct LabelPayload {
    cve_id: String,
    cve_label_id: i32,
}

pub async fn save_user_cve_label(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<LabelPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let mut errors = Vec::new();
    let cve_id = validation::cve_id(&payload.cve_id).map_err(|m| errors.push(m)).ok();
    let label_id = validation::label_id(payload.cve_label_id)
        .map_err(|m| errors.push(m))
        .ok();
    let (Some(cve_id), Some(label_id)) = (cve_id, label_id) else {
        return Err(ApplicationError::Validation(errors));
    };

    web::block(move || {
        ctx.get_repository()
            .save_user_cve_label(user.0, &cve_id, label_id)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(COMPLETED)))
}

pub async fn delete_user_cve_label(
    ctx: web::Data<ApplicationContext>,
    user: UserId,
    payload: Json<CveIdPayload>,
) -> Result<Json<Envelope<MutationResult>>, ApplicationError> {
    let cve_id = validation::cve_id(&payload.cve_id).map_err(invalid)?;

    web::block(move || {
        ctx.get_repository()
            .delete_user_cve_label(user.0, &cve_id)
            .map_err(handle_store_error)
    })
    .await
    .map_err(handle_blocking_error)??;

    Ok(Json(Envelope::ok(COMPLETED)))
}
