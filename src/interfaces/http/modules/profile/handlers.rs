//! Profile handlers
//!
//! Uploaded images land in the configured directory under a sanitized,
//! username-prefixed filename and are served back statically from
//! `/static/profile-images/`.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::interfaces::http::common::{domain_error, ApiResponse};
use crate::interfaces::http::modules::users::dto::UserDto;
use crate::interfaces::http::SharedUserService;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Profile handler state
#[derive(Clone)]
pub struct ProfileHandlerState {
    pub users: SharedUserService,
    pub upload_dir: PathBuf,
}

/// Strip anything that could escape the upload directory; path separators
/// included.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own account info", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated or outside access window")
    )
)]
pub async fn get_profile(
    State(state): State<ProfileHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let db_user = state
        .users
        .get_user_by_id(&user.user_id)
        .await
        .map_err(domain_error)?;

    let Some(db_user) = db_user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(UserDto::from(db_user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/image",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<String>),
        (status = 400, description = "Missing file or unsupported type")
    )
)]
pub async fn upload_profile_image(
    State(state): State<ProfileHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let bad_request =
        |msg: &str| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg)));

    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_default();
        if original.is_empty() {
            return Err(bad_request("Missing filename"));
        }
        if !allowed_extension(&original) {
            return Err(bad_request("Only png, jpg, jpeg and gif images are accepted"));
        }

        let filename = format!("{}_{}", sanitize_filename(&user.username), original);
        let data = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("Failed to read upload: {}", e)))?;
        if data.is_empty() {
            return Err(bad_request("Empty file"));
        }

        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to store image: {}", e))),
                )
            })?;
        tokio::fs::write(state.upload_dir.join(&filename), &data)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to store image: {}", e))),
                )
            })?;

        state
            .users
            .set_profile_image(&user.user_id, &filename)
            .await
            .map_err(domain_error)?;

        info!(username = %user.username, filename, "Profile image updated");
        stored = Some(filename);
        break;
    }

    match stored {
        Some(filename) => Ok(Json(ApiResponse::success(filename))),
        None => Err(bad_request("Expected an 'image' form field")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizing_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("foto praia.png"), "foto_praia.png");
        assert_eq!(sanitize_filename("ok-file_1.jpg"), "ok-file_1.jpg");
    }

    #[test]
    fn extension_allowlist() {
        assert!(allowed_extension("a.png"));
        assert!(allowed_extension("a.JPG"));
        assert!(allowed_extension("a.jpeg"));
        assert!(!allowed_extension("a.svg"));
        assert!(!allowed_extension("noext"));
        assert!(!allowed_extension("a.png.exe"));
    }
}
