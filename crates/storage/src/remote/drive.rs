//! Google Drive remote store.
//!
//! Talks to the Drive v3 REST API directly. Folders are Drive files with the
//! folder MIME type, so listing a folder is a `files.list` query on name,
//! type and parent.
//!
//! # Credentials
//!
//! The backend is handed an OAuth 2.0 access token with the `drive.file`
//! scope. The credentials file may contain either the bare token or a JSON
//! object with an `access_token` key (the shape printed by most token
//! helpers). Minting and refreshing tokens is left to that tooling.

use crate::content::FileContent;
use crate::error::{ErrorKind, Result};
use crate::models::{FileId, FolderId, RemoteEntry};
use crate::path::validate_name;
use crate::RemoteStore;
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Body, Client, Response, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tracing::instrument;

const API_BASE: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const BOUNDARY: &str = "hoard-multipart-boundary";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// Google Drive remote store.
///
/// # Examples
///
/// ```no_run
/// use hoard_storage::remote::DriveBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let drive = DriveBackend::from_credentials_file("drive", "/etc/hoard/token.json").map_err(|e| e.to_string())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DriveBackend {
    name: String,
    client: Client,
    token: String,
}

impl DriveBackend {
    /// Create a backend from an access token.
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            exn::bail!(ErrorKind::Credentials("access token is empty".to_string()));
        }
        // No request timeout; uploads of long videos can take minutes.
        let client = Client::builder()
            .user_agent(concat!("hoard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ErrorKind::BackendError(e.to_string()))?;
        Ok(Self { name: name.into(), client, token: token.trim().to_string() })
    }

    /// Create a backend from a credentials file (see module docs for the
    /// accepted formats).
    pub fn from_credentials_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ErrorKind::Credentials(format!("unable to read {}: {e}", path.display())))?;
        Self::new(name, Self::parse_token(&contents)?)
    }

    fn parse_token(contents: &str) -> Result<String> {
        let trimmed = contents.trim();
        if trimmed.starts_with('{') {
            let parsed: TokenFile = serde_json::from_str(trimmed)
                .map_err(|e| ErrorKind::Credentials(format!("invalid token file: {e}")))?;
            return Ok(parsed.access_token);
        }
        Ok(trimmed.to_string())
    }

    /// Escape a value for use inside a single-quoted Drive query string.
    fn escape_query(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }

    fn folder_query(name: &str, parent: &FolderId) -> String {
        format!(
            "name = '{}' and mimeType = '{}' and '{}' in parents and trashed = false",
            Self::escape_query(name),
            FOLDER_MIME_TYPE,
            Self::escape_query(parent.as_str()),
        )
    }

    /// Build a `multipart/related` body: JSON metadata first, media second.
    /// The media part is streamed as-is.
    fn multipart_body(metadata: &serde_json::Value, mime_type: &str, content: FileContent) -> FileContent {
        let head = format!(
            "--{BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
             --{BOUNDARY}\r\nContent-Type: {mime_type}\r\n\r\n"
        );
        content.surround(head, format!("\r\n--{BOUNDARY}--\r\n"))
    }

    /// Turn transport failures and non-success statuses into storage errors.
    async fn check(response: std::result::Result<Response, reqwest::Error>) -> Result<Response> {
        let response = response.map_err(|e| ErrorKind::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ErrorKind::Credentials(format!("Drive returned {status}: {body}"))
            },
            _ => ErrorKind::BackendError(format!("Drive returned {status}: {body}")),
        };
        exn::bail!(kind)
    }

    async fn created_id(response: Response) -> Result<String> {
        let file: DriveFile = response.json().await.or_raise(|| ErrorKind::BackendError("invalid Drive response".into()))?;
        Ok(file.id)
    }
}

#[async_trait]
impl RemoteStore for DriveBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> FolderId {
        // Drive's alias for the top of "My Drive".
        FolderId::new("root")
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn list_folder(&self, name: &str, parent: &FolderId) -> Result<Vec<RemoteEntry>> {
        let query = Self::folder_query(name, parent);
        let request = self
            .client
            .get(API_BASE)
            .bearer_auth(&self.token)
            .query(&[("q", query.as_str()), ("fields", "files(id, name)"), ("spaces", "drive")]);
        let response = Self::check(request.send().await).await?;
        let list: FileList =
            response.json().await.or_raise(|| ErrorKind::BackendError("invalid Drive file list".into()))?;
        Ok(list.files.into_iter().map(|f| RemoteEntry::new(f.id, f.name)).collect())
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        validate_name(name)?;
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent.as_str()],
        });
        let request = self.client.post(API_BASE).bearer_auth(&self.token).query(&[("fields", "id")]).json(&metadata);
        let response = Self::check(request.send().await).await?;
        let id = Self::created_id(response).await?;
        tracing::info!(folder = name, id = %id, "Created remote folder");
        Ok(FolderId::new(id))
    }

    #[instrument(skip(self, content), fields(store = %self.name, bytes = content.len()))]
    async fn create_file(&self, name: &str, parent: &FolderId, mime_type: &str, content: FileContent) -> Result<FileId> {
        validate_name(name)?;
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent.as_str()],
        });
        let body = Self::multipart_body(&metadata, mime_type, content);
        let request = self
            .client
            .post(UPLOAD_BASE)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(reqwest::header::CONTENT_TYPE, format!("multipart/related; boundary={BOUNDARY}"))
            .header(reqwest::header::CONTENT_LENGTH, body.len())
            .body(Body::wrap_stream(body.into_stream()));
        let response = Self::check(request.send().await).await?;
        Ok(FileId::new(Self::created_id(response).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_token() {
        assert_eq!(DriveBackend::parse_token("  ya29.token\n").unwrap(), "ya29.token");
    }

    #[test]
    fn test_parse_json_token() {
        let json = r#"{"access_token": "ya29.json", "expires_in": 3599, "token_type": "Bearer"}"#;
        assert_eq!(DriveBackend::parse_token(json).unwrap(), "ya29.json");
        let err = DriveBackend::parse_token(r#"{"token": "nope"}"#).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Credentials(_)));
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = DriveBackend::new("drive", "  ").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Credentials(_)));
    }

    #[test]
    fn test_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": "abc"}"#).unwrap();
        let drive = DriveBackend::from_credentials_file("drive", &path).unwrap();
        assert_eq!(drive.token, "abc");
        assert!(DriveBackend::from_credentials_file("drive", dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_folder_query_escapes_quotes() {
        let query = DriveBackend::folder_query("Rock 'n' Roll", &FolderId::new("root"));
        assert_eq!(
            query,
            "name = 'Rock \\'n\\' Roll' and mimeType = 'application/vnd.google-apps.folder' \
             and 'root' in parents and trashed = false"
        );
    }

    #[tokio::test]
    async fn test_multipart_body() {
        let metadata = serde_json::json!({"name": "audio_1.mp3"});
        let body = DriveBackend::multipart_body(&metadata, "audio/mpeg", FileContent::from_bytes(&b"ID3"[..]));
        let len = body.len();
        let text = String::from_utf8(body.collect().await.unwrap()).unwrap();
        let expected = "--hoard-multipart-boundary\r\n\
            Content-Type: application/json; charset=UTF-8\r\n\r\n\
            {\"name\":\"audio_1.mp3\"}\r\n\
            --hoard-multipart-boundary\r\n\
            Content-Type: audio/mpeg\r\n\r\n\
            ID3\r\n\
            --hoard-multipart-boundary--\r\n";
        assert_eq!(text, expected);
        assert_eq!(len, expected.len() as u64);
    }
}
