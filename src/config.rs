// Client configuration: API key, target service and the local upload
// policy. Everything here is immutable once handed to a client.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::time::Duration;

/// Default origin of the Bucket storage service.
pub const DEFAULT_BASE_URL: &str = "https://bucket.ekilie.com";

/// Path of the upload endpoint, appended to the base URL.
pub const UPLOAD_ENDPOINT: &str = "/api/store/v1/index.php";

/// Largest file accepted for upload (100 MiB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extensions accepted by the service, lowercase and without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "webp", "svg",
    // documents
    "pdf", "txt", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // archives
    "zip", "rar", "tar", "gz",
    // data
    "json", "xml",
    // audio
    "mp3", "wav", "ogg", "m4a", "flac", "aac",
];

/// Size and type rules checked locally before a file is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    allowed_extensions: BTreeSet<String>,
}

impl UploadPolicy {
    /// Build a policy from a size ceiling and a list of extensions. Leading
    /// dots are stripped and case is ignored.
    pub fn new<I, S>(max_file_size: u64, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        UploadPolicy {
            max_file_size,
            allowed_extensions,
        }
    }

    /// Whether an extension (with or without the dot, any case) is allowed.
    pub fn permits(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        !ext.is_empty() && self.allowed_extensions.contains(&ext)
    }

    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy::new(MAX_FILE_SIZE, ALLOWED_EXTENSIONS)
    }
}

/// Everything a `BucketClient` needs. Only the API key is required; the
/// rest falls back to the service defaults.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub policy: UploadPolicy,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            base_url: None,
            timeout: Some(DEFAULT_TIMEOUT),
            policy: UploadPolicy::default(),
        }
    }

    /// Read `BUCKET_API_KEY` and the optional `BUCKET_BASE_URL` override
    /// from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BUCKET_API_KEY").context("BUCKET_API_KEY is not set")?;
        Ok(ClientConfig::new(api_key).with_env_overrides())
    }

    /// Apply `BUCKET_BASE_URL` when it is set; otherwise leave the config as is.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var("BUCKET_BASE_URL").ok())
    }

    fn with_base_url_override(self, base_url: Option<String>) -> Self {
        match base_url {
            Some(url) => self.with_base_url(url),
            None => self,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// `None` disables the transport timeout entirely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The override if one is set and non-empty, otherwise the default origin.
    pub fn base_url(&self) -> &str {
        match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => url.trim_end_matches('/'),
            _ => DEFAULT_BASE_URL,
        }
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url(), UPLOAD_ENDPOINT)
    }
}

// Keep the key out of debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}
