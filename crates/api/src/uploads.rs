//! Multipart image upload storage.
//!
//! Files land under `<upload_dir>/<folder>/<uuid>.<ext>` and are echoed
//! back as `/uploads/<folder>/<filename>` paths, which the router serves
//! via `ServeDir`.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upload folders accepted by the endpoint.
const ALLOWED_FOLDERS: [&str; 6] = ["farms", "gardens", "equipments", "tasks", "news", "users"];

/// File extensions accepted for image uploads.
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Maximum accepted upload size in bytes (5 MiB).
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Response payload for a stored upload.
#[derive(Debug, serde::Serialize)]
pub struct UploadedFile {
    pub path: String,
}

/// POST /api/admin/uploads/{folder} (also mounted under /api/web)
///
/// Accepts a `multipart/form-data` body with an `image` field and stores it
/// under the configured upload directory. Returns the public path.
pub async fn upload_image(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(folder): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadedFile>>> {
    if !ALLOWED_FOLDERS.contains(&folder.as_str()) {
        return Err(AppError::BadRequest(format!("Unknown upload folder: {folder}")));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let path = store_field(&state.config.upload_dir, &folder, field).await?;
        return Ok(Json(DataResponse {
            data: UploadedFile { path },
        }));
    }

    Err(AppError::BadRequest("Missing 'image' field".into()))
}

/// Persist a single multipart field to disk, returning the public path.
async fn store_field(
    upload_dir: &str,
    folder: &str,
    field: Field<'_>,
) -> Result<String, AppError> {
    let extension = field
        .file_name()
        .and_then(|name| name.rsplit('.').next())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::BadRequest("Uploaded file has no extension".into()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file type: .{extension}"
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {MAX_UPLOAD_BYTES} byte upload limit"
        )));
    }

    let filename = format!("{}.{extension}", Uuid::new_v4());
    let dir = std::path::Path::new(upload_dir).join(folder);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    tokio::fs::write(dir.join(&filename), &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    Ok(format!("/uploads/{folder}/{filename}"))
}
