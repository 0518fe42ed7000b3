//! Single-image and whole-employee deletion.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use ei_core::{EmployeeId, Error};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::routes::MessageResponse;

/// DELETE /delete/{employeeId}/{filename}
///
/// Removes the first image whose path contains `filename`.
#[utoipa::path(
    delete,
    path = "/delete/{employeeId}/{filename}",
    params(
        ("employeeId" = String, Path, description = "Employee identifier"),
        ("filename" = String, Path, description = "Fragment of the stored path to match")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 404, description = "Employee or image not found"),
        (status = 500, description = "Document store failure")
    )
)]
pub async fn delete_image(
    State(ctx): State<AppContext>,
    Extension(rid): Extension<RequestId>,
    Path((employee_id, filename)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let tag = |e: Error| AppError::from(e).with_request_id(&rid);

    let employee_id = EmployeeId::new(employee_id.as_str())
        .map_err(|_| tag(Error::employee_not_found(&employee_id)))?;
    let outcome = ctx
        .images
        .delete_image(&employee_id, &filename)
        .await
        .map_err(tag)?;

    if !outcome.cleanup.is_clean() {
        tracing::warn!(
            employee_id = %employee_id,
            failed = outcome.cleanup.failures.len(),
            "Image record updated but its file could not be removed"
        );
    }

    Ok(Json(MessageResponse::new("Image deleted successfully")))
}

/// DELETE /delete/{employeeId}
#[utoipa::path(
    delete,
    path = "/delete/{employeeId}",
    params(("employeeId" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "All images deleted", body = MessageResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Document store failure")
    )
)]
pub async fn delete_all_images(
    State(ctx): State<AppContext>,
    Extension(rid): Extension<RequestId>,
    Path(employee_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let tag = |e: Error| AppError::from(e).with_request_id(&rid);

    let employee_id = EmployeeId::new(employee_id.as_str())
        .map_err(|_| tag(Error::employee_not_found(&employee_id)))?;
    let outcome = ctx
        .images
        .delete_all_images(&employee_id)
        .await
        .map_err(tag)?;

    if !outcome.cleanup.is_clean() {
        tracing::warn!(
            employee_id = %employee_id,
            attempted = outcome.cleanup.attempted,
            failed = outcome.cleanup.failures.len(),
            "Employee record deleted but some files could not be removed"
        );
    }

    Ok(Json(MessageResponse::new("All images deleted successfully")))
}
