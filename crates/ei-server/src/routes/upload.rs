//! Multipart image upload.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use ei_core::{EmployeeId, Error, Result};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::images::IncomingFile;
use crate::middleware::request_id::RequestId;
use crate::routes::images::EmployeeImagesResponse;

/// Multipart field carrying the uploaded files.
pub const IMAGES_FIELD: &str = "images";

/// Multipart request body (documentation only; parsed by hand).
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Employee the images belong to.
    pub employee_id: String,
    /// Titles aligned by position with `images`. Also accepted as `titles[]`.
    pub titles: Vec<String>,
    /// Image files, binary parts.
    #[schema(value_type = Vec<String>)]
    pub images: Vec<Vec<u8>>,
}

/// Response to a successful upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// The employee's full record after the append.
    pub employee: EmployeeImagesResponse,
}

/// Parsed multipart upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub employee_id: Option<String>,
    pub titles: Vec<String>,
    pub files: Vec<IncomingFile>,
}

impl UploadForm {
    /// Drain `multipart`, accepting at most `max_files` file parts named
    /// `images`.
    ///
    /// Unknown text fields, including an `images` part sent without a
    /// filename, are ignored. A file part under any other name is rejected.
    pub async fn read(mut multipart: Multipart, max_files: usize) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(invalid_body)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                IMAGES_FIELD if field.file_name().is_some() => {
                    if form.files.len() >= max_files {
                        return Err(Error::Validation(format!(
                            "Too many files: at most {max_files} images per upload"
                        )));
                    }
                    form.files.push(read_file(field, name.clone()).await?);
                }
                "employeeId" => {
                    form.employee_id = Some(field.text().await.map_err(invalid_body)?);
                }
                "titles" | "titles[]" => {
                    form.titles.push(field.text().await.map_err(invalid_body)?);
                }
                _ if field.file_name().is_some() => {
                    return Err(Error::Validation(format!("Unexpected file field: {name}")));
                }
                _ => {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }
}

async fn read_file(field: Field<'_>, field_name: String) -> Result<IncomingFile> {
    let original_filename = field.file_name().unwrap_or_default().to_string();
    let data = field.bytes().await.map_err(invalid_body)?;
    Ok(IncomingFile {
        field_name,
        original_filename,
        data: data.to_vec(),
    })
}

fn invalid_body(e: MultipartError) -> Error {
    Error::Validation(format!("invalid multipart body: {}", e.body_text()))
}

/// POST /upload
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files stored and appended", body = UploadResponse),
        (status = 400, description = "No files, missing employeeId, or malformed form"),
        (status = 500, description = "Blob write or document store failure")
    )
)]
pub async fn upload_images(
    State(ctx): State<AppContext>,
    Extension(rid): Extension<RequestId>,
    multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, AppError> {
    let tag = |e: Error| AppError::from(e).with_request_id(&rid);

    let form = UploadForm::read(multipart, ctx.config.storage.max_files)
        .await
        .map_err(tag)?;

    if form.files.is_empty() {
        return Err(tag(Error::NoFilesProvided));
    }
    let employee_id = EmployeeId::new(form.employee_id.unwrap_or_default()).map_err(tag)?;

    let stored = ctx.images.store_uploads(&form.files).await.map_err(tag)?;
    let record = ctx
        .images
        .upload_append(&employee_id, stored, &form.titles)
        .await
        .map_err(tag)?;

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".into(),
        employee: EmployeeImagesResponse::from_model(&record),
    }))
}
