//! Google Drive upload client.
//!
//! Two credential shapes are supported: an OAuth refresh token (personal
//! account, the current deployment) and a service-account key (the earlier
//! one). Both end in a short-lived access token; tokens are fetched per
//! upload since nothing is shared across requests.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{DriveAuthConfig, DriveConfig};
use crate::error::AppError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const UPLOAD_FIELDS: &str = "id,name,webViewLink,webContentLink";

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("token exchange failed ({status}): {detail}")]
    TokenExchange { status: u16, detail: String },
    #[error("Drive upload failed ({status}): {detail}")]
    Upload { status: u16, detail: String },
    #[error("could not sign service-account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Drive request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<DriveError> for AppError {
    fn from(err: DriveError) -> Self {
        AppError::Upload {
            message: err.to_string(),
        }
    }
}

/// JWT claims for the service-account OAuth2 flow.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn service_account_claims(client_email: &str, now: i64) -> JwtClaims {
    JwtClaims {
        iss: client_email.to_string(),
        scope: DRIVE_SCOPE.to_string(),
        aud: TOKEN_URL.to_string(),
        iat: now,
        exp: now + 3600,
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The fields we request back from a Drive upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub web_content_link: Option<String>,
}

/// File metadata for the multipart upload. `parents` pins the file to the
/// configured folder; "root" drops it at the top of My Drive.
fn upload_metadata(name: &str, mime_type: &str, folder_id: &str, description: Option<&str>) -> Value {
    let mut metadata = json!({
        "name": name,
        "mimeType": mime_type,
        "parents": [folder_id],
    });
    if let Some(description) = description {
        metadata["description"] = json!(description);
    }
    metadata
}

pub struct DriveClient<'a> {
    http: &'a reqwest::Client,
    config: &'a DriveConfig,
}

impl<'a> DriveClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a DriveConfig) -> Self {
        DriveClient { http, config }
    }

    /// Uploads one file and returns its id and share links.
    pub async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        description: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<DriveFile, DriveError> {
        let token = self.access_token().await?;

        let metadata = upload_metadata(name, mime_type, &self.config.folder_id, description);
        let metadata_part = reqwest::multipart::Part::text(metadata.to_string())
            .mime_str("application/json; charset=UTF-8")?;
        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str(mime_type)?;
        let form = reqwest::multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let response = self
            .http
            .post(UPLOAD_URL)
            .query(&[("uploadType", "multipart"), ("fields", UPLOAD_FIELDS)])
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DriveError::Upload {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<DriveFile>().await?)
    }

    /// Exchanges the configured credential for a short-lived access token.
    async fn access_token(&self) -> Result<String, DriveError> {
        let form: Vec<(&str, String)> = match &self.config.auth {
            DriveAuthConfig::OAuth {
                client_id,
                client_secret,
                refresh_token,
            } => vec![
                ("grant_type", "refresh_token".to_string()),
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
                ("refresh_token", refresh_token.clone()),
            ],
            DriveAuthConfig::ServiceAccount {
                client_email,
                private_key,
            } => {
                let claims = service_account_claims(client_email, Utc::now().timestamp());
                let header = Header::new(Algorithm::RS256);
                let key = EncodingKey::from_rsa_pem(private_key.as_bytes())?;
                let assertion = encode(&header, &claims, &key)?;
                vec![
                    (
                        "grant_type",
                        "urn:ietf:params:oauth:grant-type:jwt-bearer".to_string(),
                    ),
                    ("assertion", assertion),
                ]
            }
        };

        let response = self.http.post(TOKEN_URL).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenExchange {
                status: status.as_u16(),
                detail,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_account_claims_use_drive_scope_and_hour_expiry() {
        let claims = service_account_claims("uploader@project.iam.gserviceaccount.com", 1_700_000_000);
        assert_eq!(claims.iss, "uploader@project.iam.gserviceaccount.com");
        assert_eq!(claims.scope, DRIVE_SCOPE);
        assert_eq!(claims.aud, TOKEN_URL);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn upload_metadata_pins_parent_folder() {
        let metadata = upload_metadata("plan.pdf", "application/pdf", "folder123", None);
        assert_eq!(metadata["name"], json!("plan.pdf"));
        assert_eq!(metadata["parents"], json!(["folder123"]));
        assert!(metadata.get("description").is_none());
    }

    #[test]
    fn upload_metadata_includes_description_when_given() {
        let metadata = upload_metadata(
            "plan.pdf",
            "application/pdf",
            "root",
            Some("Exportado desde Eduplan - pdf"),
        );
        assert_eq!(metadata["description"], json!("Exportado desde Eduplan - pdf"));
    }

    #[test]
    fn drive_file_parses_upload_response() {
        let file: DriveFile = serde_json::from_str(
            r#"{
                "id": "1abc",
                "name": "plan.pdf",
                "webViewLink": "https://drive.google.com/file/d/1abc/view",
                "webContentLink": "https://drive.google.com/uc?id=1abc"
            }"#,
        )
        .unwrap();
        assert_eq!(file.id, "1abc");
        assert_eq!(
            file.web_view_link.as_deref(),
            Some("https://drive.google.com/file/d/1abc/view")
        );
    }
}
