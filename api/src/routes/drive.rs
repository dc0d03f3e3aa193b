use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use eduplan_core::error::ApiError;

use crate::drive::DriveClient;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/export-to-drive", post(export_to_drive))
        .route("/api/upload-to-drive", post(upload_to_drive))
        .route("/api/drive-status", get(drive_status))
}

/// Response for a successful Drive upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Legacy JSON body for /api/upload-to-drive.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUploadRequest {
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub nombre_archivo: Option<String>,
    #[serde(default)]
    pub datos: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DriveStatusResponse {
    pub drive_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<&'static str>,
    pub folder_id: Option<String>,
    pub features: Vec<&'static str>,
}

/// One multipart file collected from the form.
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Export a file to Google Drive
///
/// Multipart form: `file` (required) plus optional `filename`, `mimeType`
/// and `format` overrides.
#[utoipa::path(
    post,
    path = "/api/export-to-drive",
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file in the form", body = ApiError),
        (status = 503, description = "Drive credentials not configured", body = ApiError),
        (status = 500, description = "Upload failed", body = ApiError)
    ),
    tag = "drive"
)]
pub async fn export_to_drive(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut filename: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut format: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or_default() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "filename" => filename = Some(field.text().await.map_err(multipart_error)?),
            "mimeType" => mime_type = Some(field.text().await.map_err(multipart_error)?),
            "format" => format = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(AppError::Validation {
            message: "Se requiere un archivo para subir a Google Drive".to_string(),
            field: Some("file".to_string()),
            received: None,
            docs_hint: Some("Envía el archivo en el campo multipart 'file'.".to_string()),
        });
    };

    let Some(drive) = state.config.drive.as_ref() else {
        return Err(AppError::DriveNotConfigured);
    };

    let final_name = filename
        .or(file.file_name)
        .unwrap_or_else(|| format!("archivo_{}", Utc::now().timestamp_millis()));
    let final_mime = mime_type
        .or(file.content_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let description = format!(
        "Exportado desde Eduplan - {}",
        format.as_deref().unwrap_or("archivo")
    );

    tracing::info!(
        file_name = %final_name,
        mime_type = %final_mime,
        size = file.bytes.len(),
        "Uploading to Google Drive"
    );

    let uploaded = DriveClient::new(&state.http, drive)
        .upload(&final_name, &final_mime, Some(&description), file.bytes)
        .await?;

    Ok(Json(upload_response(uploaded, format)))
}

/// Upload data to Google Drive (legacy endpoint)
///
/// Accepts either a multipart form with an `archivo` part, or a JSON body
/// `{tipo?, nombreArchivo?, datos}` which is stored as a pretty-printed
/// JSON file.
#[utoipa::path(
    post,
    path = "/api/upload-to-drive",
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "Neither file nor datos present", body = ApiError),
        (status = 503, description = "Drive credentials not configured", body = ApiError),
        (status = 500, description = "Upload failed", body = ApiError)
    ),
    tag = "drive"
)]
pub async fn upload_to_drive(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, AppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let (name, mime_type, bytes) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|err| AppError::Validation {
                message: format!("Formulario multipart inválido: {err}"),
                field: None,
                received: None,
                docs_hint: None,
            })?;
        read_archivo_field(multipart).await?
    } else {
        let Json(body) = Json::<LegacyUploadRequest>::from_request(request, &())
            .await
            .map_err(|err| AppError::Validation {
                message: format!("Cuerpo JSON inválido: {err}"),
                field: None,
                received: None,
                docs_hint: None,
            })?;
        json_payload_file(body)?
    };

    let Some(drive) = state.config.drive.as_ref() else {
        return Err(AppError::DriveNotConfigured);
    };

    tracing::info!(file_name = %name, mime_type = %mime_type, "Uploading to Google Drive (legacy)");

    let uploaded = DriveClient::new(&state.http, drive)
        .upload(&name, &mime_type, None, bytes)
        .await?;

    Ok(Json(upload_response(uploaded, None)))
}

/// Drive configuration status
#[utoipa::path(
    get,
    path = "/api/drive-status",
    responses((status = 200, description = "Drive configuration status", body = DriveStatusResponse)),
    tag = "drive"
)]
pub async fn drive_status(State(state): State<AppState>) -> Json<DriveStatusResponse> {
    let drive = state.config.drive.as_ref();
    Json(DriveStatusResponse {
        drive_configured: drive.is_some(),
        auth_mode: drive.map(|config| config.auth.mode()),
        folder_id: drive.map(|config| config.folder_id.clone()),
        features: vec!["upload", "export"],
    })
}

async fn read_archivo_field(mut multipart: Multipart) -> Result<(String, String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("archivo") {
            let name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("archivo_{}", Utc::now().timestamp_millis()));
            let mime_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
            return Ok((name, mime_type, bytes));
        }
    }

    Err(missing_payload_error())
}

/// Serializes the legacy JSON payload into an uploadable file.
fn json_payload_file(body: LegacyUploadRequest) -> Result<(String, String, Vec<u8>), AppError> {
    let Some(datos) = body.datos else {
        return Err(missing_payload_error());
    };

    let name = format!(
        "{}.json",
        body.nombre_archivo.as_deref().unwrap_or("datos_exportados")
    );
    let content = serde_json::to_vec_pretty(&datos)
        .map_err(|err| AppError::Internal(format!("could not serialize datos: {err}")))?;
    Ok((name, "application/json".to_string(), content))
}

fn missing_payload_error() -> AppError {
    AppError::Validation {
        message: "Se requieren datos o un archivo para subir".to_string(),
        field: None,
        received: None,
        docs_hint: Some(
            "Envía un campo multipart 'archivo' o un cuerpo JSON con 'datos'.".to_string(),
        ),
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation {
        message: format!("Formulario multipart inválido: {err}"),
        field: None,
        received: None,
        docs_hint: None,
    }
}

fn upload_response(file: crate::drive::DriveFile, format: Option<String>) -> UploadResponse {
    UploadResponse {
        success: true,
        message: "Archivo subido exitosamente a Google Drive".to_string(),
        file_id: file.id,
        file_name: file.name,
        file_url: file.web_view_link,
        download_url: file.web_content_link,
        format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_payload_defaults_filename() {
        let body = LegacyUploadRequest {
            tipo: None,
            nombre_archivo: None,
            datos: Some(json!({"plan": "contenido"})),
        };
        let (name, mime_type, bytes) = json_payload_file(body).unwrap();
        assert_eq!(name, "datos_exportados.json");
        assert_eq!(mime_type, "application/json");

        let round_trip: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(round_trip, json!({"plan": "contenido"}));
    }

    #[test]
    fn json_payload_uses_given_filename() {
        let body = LegacyUploadRequest {
            tipo: Some("plan".to_string()),
            nombre_archivo: Some("plan_trimestral".to_string()),
            datos: Some(json!([1, 2, 3])),
        };
        let (name, _, _) = json_payload_file(body).unwrap();
        assert_eq!(name, "plan_trimestral.json");
    }

    #[test]
    fn json_payload_without_datos_is_rejected() {
        let body = LegacyUploadRequest {
            tipo: None,
            nombre_archivo: Some("vacio".to_string()),
            datos: None,
        };
        assert!(matches!(
            json_payload_file(body),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn upload_response_carries_drive_links() {
        let file = crate::drive::DriveFile {
            id: "1abc".to_string(),
            name: "plan.pdf".to_string(),
            web_view_link: Some("https://drive.google.com/view".to_string()),
            web_content_link: None,
        };
        let response = upload_response(file, Some("pdf".to_string()));
        assert!(response.success);
        assert_eq!(response.file_id, "1abc");
        assert_eq!(response.format.as_deref(), Some("pdf"));
        assert!(response.download_url.is_none());
    }
}
