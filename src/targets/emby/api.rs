//! Emby REST API client

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{RescanError, Result};
use crate::models::Library;

/// Header carrying the Emby API key
pub const TOKEN_HEADER: &str = "X-Emby-Token";

/// The three Emby operations a target needs
pub trait EmbyApi: Send + Sync {
    /// Probe the server
    fn available(&self) -> Result<()>;

    /// Fetch every library folder, in server order
    fn libraries(&self) -> Result<Vec<Library>>;

    /// Notify the server that a folder changed
    fn scan(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct MediaFolder {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "SubFolders", default)]
    sub_folders: Vec<SubFolder>,
}

#[derive(Debug, Deserialize)]
struct SubFolder {
    #[serde(rename = "Path")]
    path: String,
}

#[derive(Debug, Serialize)]
struct MediaUpdates<'a> {
    #[serde(rename = "Updates")]
    updates: Vec<MediaUpdate<'a>>,
}

#[derive(Debug, Serialize)]
struct MediaUpdate<'a> {
    #[serde(rename = "Path")]
    path: &'a str,
    #[serde(rename = "UpdateType")]
    update_type: &'static str,
}

/// Blocking HTTP client for one Emby server
#[derive(Debug, Clone)]
pub struct EmbyClient {
    client: Client,
    base_url: String,
    token: String,
}

impl EmbyClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Map a non-success response to an error
fn check_status(response: Response, expected: &[StatusCode]) -> Result<Response> {
    let status = response.status();
    if expected.contains(&status) {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = format!("Emby returned status {}: {}", status, body.trim());
    if status.is_server_error() {
        Err(RescanError::remote_unavailable(message))
    } else {
        Err(RescanError::remote_error(message))
    }
}

/// Flatten Emby media folders into libraries, one per sub-folder
fn flatten_folders(folders: Vec<MediaFolder>) -> Vec<Library> {
    let mut libraries = Vec::new();
    for folder in folders {
        for sub in folder.sub_folders {
            let mut path = sub.path;
            if !path.is_empty() && !path.ends_with('/') {
                path.push('/');
            }
            libraries.push(Library::new(folder.name.clone(), path));
        }
    }
    libraries
}

impl EmbyApi for EmbyClient {
    fn available(&self) -> Result<()> {
        let response = self
            .client
            .get(self.endpoint("System/Info"))
            .header(TOKEN_HEADER, &self.token)
            .send()?;
        check_status(response, &[StatusCode::OK])?;
        Ok(())
    }

    fn libraries(&self) -> Result<Vec<Library>> {
        let response = self
            .client
            .get(self.endpoint("Library/SelectableMediaFolders"))
            .header(TOKEN_HEADER, &self.token)
            .send()?;
        let folders: Vec<MediaFolder> = check_status(response, &[StatusCode::OK])?
            .json()
            .map_err(|e| RescanError::remote_error(format!("failed decoding libraries: {e}")))?;

        Ok(flatten_folders(folders))
    }

    fn scan(&self, path: &str) -> Result<()> {
        let payload = MediaUpdates {
            updates: vec![MediaUpdate {
                path,
                update_type: "Created",
            }],
        };

        let response = self
            .client
            .post(self.endpoint("Library/Media/Updated"))
            .header(TOKEN_HEADER, &self.token)
            .json(&payload)
            .send()
            .map_err(|e| RescanError::from(e).with_path(path))?;
        check_status(response, &[StatusCode::OK, StatusCode::NO_CONTENT])
            .map_err(|e| e.with_path(path))?;
        Ok(())
    }
}
