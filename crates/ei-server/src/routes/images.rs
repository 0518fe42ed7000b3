//! Image record query and its response DTOs.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use ei_core::{EmployeeId, Error};
use ei_db::models::{EmployeeImageRecord, ImageEntry};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// One titled image of an employee.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImageEntryResponse {
    pub title: String,
    /// Storage-relative path, servable under `/uploads/`.
    pub path: String,
}

impl ImageEntryResponse {
    fn from_model(entry: &ImageEntry) -> Self {
        Self {
            title: entry.title.clone(),
            path: entry.path.clone(),
        }
    }
}

/// An employee's full image record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeImagesResponse {
    pub employee_id: String,
    pub images: Vec<ImageEntryResponse>,
}

impl EmployeeImagesResponse {
    pub fn from_model(record: &EmployeeImageRecord) -> Self {
        Self {
            employee_id: record.employee_id.to_string(),
            images: record.images.iter().map(ImageEntryResponse::from_model).collect(),
        }
    }
}

/// GET /images/{employeeId}
#[utoipa::path(
    get,
    path = "/images/{employeeId}",
    params(("employeeId" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "The employee's images", body = EmployeeImagesResponse),
        (status = 404, description = "No record for the employee"),
        (status = 500, description = "Document store failure")
    )
)]
pub async fn get_images(
    State(ctx): State<AppContext>,
    Extension(rid): Extension<RequestId>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeImagesResponse>, AppError> {
    let tag = |e: Error| AppError::from(e).with_request_id(&rid);

    // A blank id can never have a record.
    let employee_id = EmployeeId::new(employee_id.as_str())
        .map_err(|_| tag(Error::not_found(&employee_id)))?;
    let record = ctx.images.get_images(&employee_id).await.map_err(tag)?;

    Ok(Json(EmployeeImagesResponse::from_model(&record)))
}
