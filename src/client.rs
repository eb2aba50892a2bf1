// Upload client: validates a local file against the configured policy,
// hands it to the transport and maps the response envelope onto a typed
// result. Each call is independent; nothing is cached between uploads.

use crate::config::ClientConfig;
use crate::error::{Result, UploadError, ValidationError};
use crate::model::{ApiResponse, UploadResponse};
use crate::transport::{HttpTransport, Transport, UploadRequest};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Client for the Bucket storage API. Holds its configuration and the
/// transport used for every upload.
pub struct BucketClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl BucketClient<HttpTransport> {
    /// Create a client with a reqwest transport. The API key and URL are
    /// not checked here; problems surface on the first upload.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout).map_err(UploadError::Transport)?;
        Ok(BucketClient { config, transport })
    }
}

impl<T: Transport> BucketClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        BucketClient { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload one file and return the URL and metadata the service
    /// recorded for it. The whole file is read into memory first.
    pub fn upload(&self, file_path: impl AsRef<Path>) -> Result<UploadResponse> {
        let path = file_path.as_ref();
        let policy = &self.config.policy;

        let size = fs::metadata(path).map_err(|e| io_error(path, e))?.len();
        if size > policy.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: policy.max_file_size,
            }
            .into());
        }

        let extension = file_extension(path);
        if !policy.permits(&extension) {
            return Err(ValidationError::UnsupportedExtension { extension }.into());
        }

        let contents = read_file(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let request = UploadRequest {
            url: self.config.endpoint_url(),
            api_key: self.config.api_key.clone(),
            file_name,
            contents,
        };
        debug!(path = %path.display(), size, "uploading file");

        let raw = self.transport.send(request).map_err(UploadError::Transport)?;
        if raw.status != 200 {
            warn!(status = raw.status, "upload rejected by server");
            return Err(UploadError::Server {
                status: raw.status,
                body: raw.body,
            });
        }

        let resp = ApiResponse::from_slice(raw.body.as_bytes())?
            .into_result()
            .inspect_err(|e| warn!(error = %e, "upload failed"))?;
        info!(url = %resp.url, "upload complete");
        Ok(resp)
    }

    /// Upload several files one after another. A failure is reported for
    /// its own path and does not stop the rest.
    pub fn upload_many<I, P>(&self, paths: I) -> Vec<(PathBuf, Result<UploadResponse>)>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|p| {
                let path = p.as_ref().to_path_buf();
                let result = self.upload(&path);
                (path, result)
            })
            .collect()
    }
}

/// Read the whole file. The handle is closed when this returns.
fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| io_error(path, e))?;
    Ok(contents)
}

/// Lowercase text after the last dot of the file name, or empty. A
/// dotfile such as `.png` has extension `png`.
fn file_extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    match name.rfind('.') {
        Some(i) => name[i + 1..].to_lowercase(),
        None => String::new(),
    }
}

fn io_error(path: &Path, source: io::Error) -> UploadError {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::NotFound {
        UploadError::NotFound { path }
    } else {
        UploadError::Io { path, source }
    }
}
