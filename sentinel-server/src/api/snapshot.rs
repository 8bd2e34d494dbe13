//! Snapshot API Handlers
//!
//! Staging and listing of entry/exit captures.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use sentinel_core::domain::session::Checkpoint;
use sentinel_core::domain::snapshot::Snapshot;
use sentinel_core::dto::snapshot::UploadSummary;

use crate::api::error::{ApiError, ApiResult};
use crate::service::upload::UploadedFile;
use crate::service::{session_service, upload_service};
use crate::state::AppState;

/// Parse the `{checkpoint}` path segment
pub fn parse_checkpoint(raw: &str) -> ApiResult<Checkpoint> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown checkpoint '{}'", raw)))
}

/// Collect every file part of a multipart body
///
/// Parts without a file name are ordinary form fields and are ignored.
pub async fn read_files(mut multipart: Multipart) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read '{}': {}", file_name, e)))?;

        files.push(UploadedFile {
            file_name: Some(file_name).filter(|name| !name.is_empty()),
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(files)
}

/// Read a multipart upload and stage it on a checkpoint
pub async fn stage_upload(
    state: &AppState,
    checkpoint: Checkpoint,
    multipart: Multipart,
) -> ApiResult<UploadSummary> {
    let files = read_files(multipart).await?;
    let snapshots = upload_service::into_snapshots(files)?;
    Ok(session_service::stage_snapshots(&state.store, checkpoint, snapshots).await?)
}

/// POST /api/snapshots/{checkpoint}
/// Upload images for a checkpoint
pub async fn upload_snapshots(
    State(state): State<AppState>,
    Path(checkpoint): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<UploadSummary>> {
    let checkpoint = parse_checkpoint(&checkpoint)?;
    tracing::debug!("Receiving {} upload", checkpoint);

    Ok(Json(stage_upload(&state, checkpoint, multipart).await?))
}

/// GET /api/snapshots/{checkpoint}
/// List staged snapshots for a checkpoint
pub async fn list_snapshots(
    State(state): State<AppState>,
    Path(checkpoint): Path<String>,
) -> ApiResult<Json<Vec<Snapshot>>> {
    let checkpoint = parse_checkpoint(&checkpoint)?;
    tracing::debug!("Listing {} snapshots", checkpoint);

    Ok(Json(session_service::list_snapshots(&state.store, checkpoint).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    const BOUNDARY: &str = "sentinel-boundary";

    async fn multipart(body: String) -> Multipart {
        let request = Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn part(disposition: &str, content_type: Option<&str>, data: &str) -> String {
        let content_type = content_type
            .map(|ct| format!("Content-Type: {}\r\n", ct))
            .unwrap_or_default();
        format!(
            "--{}\r\nContent-Disposition: form-data; {}\r\n{}\r\n{}\r\n",
            BOUNDARY, disposition, content_type, data
        )
    }

    #[tokio::test]
    async fn test_read_files_skips_plain_fields() {
        let body = [
            part(r#"name="note""#, None, "hello"),
            part(r#"name="files"; filename="cam1.png""#, Some("image/png"), "png-bytes"),
            format!("--{}--\r\n", BOUNDARY),
        ]
        .concat();

        let files = read_files(multipart(body).await).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name.as_deref(), Some("cam1.png"));
        assert_eq!(files[0].content_type.as_deref(), Some("image/png"));
        assert_eq!(files[0].bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn test_empty_browser_file_part_is_staged_as_nothing() {
        let body = [
            part(
                r#"name="files"; filename="""#,
                Some("application/octet-stream"),
                "",
            ),
            format!("--{}--\r\n", BOUNDARY),
        ]
        .concat();

        let files = read_files(multipart(body).await).await.unwrap();

        assert!(files.iter().all(|f| f.file_name.is_none() && f.bytes.is_empty()));
        assert!(upload_service::into_snapshots(files).unwrap().is_empty());
    }

    #[test]
    fn test_parse_checkpoint_accepts_aliases() {
        assert_eq!(parse_checkpoint("entry").unwrap(), Checkpoint::Entry);
        assert_eq!(parse_checkpoint("out").unwrap(), Checkpoint::Exit);
    }

    #[test]
    fn test_unknown_checkpoint_is_not_found() {
        let err = parse_checkpoint("lobby").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg.contains("lobby")));
    }
}
