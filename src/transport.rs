// HTTP transport: a small blocking client that POSTs the multipart upload
// form to the storage service. The `Transport` trait is the seam the
// upload client talks to, so tests can swap the network out.

use crate::error::TransportError;
use reqwest::blocking::{multipart, Client};
use std::time::Duration;
use tracing::debug;

/// One fully buffered upload, ready to be sent.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub url: String,
    pub api_key: String,
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Status and complete body text of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub trait Transport: Send + Sync {
    /// Send the request and read the whole response. Only failures to
    /// talk to the server are errors; any HTTP status is a response.
    fn send(&self, request: UploadRequest) -> Result<RawResponse, TransportError>;
}

/// `Transport` backed by a reqwest blocking client. The client is built
/// once and reused for every upload.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: UploadRequest) -> Result<RawResponse, TransportError> {
        let UploadRequest {
            url,
            api_key,
            file_name,
            contents,
        } = request;

        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
        debug!(%url, %file_name, %mime, bytes = contents.len(), "sending upload request");

        let part = multipart::Part::bytes(contents)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = multipart::Form::new().text("apikey", api_key).part("file", part);

        let res = self.client.post(&url).multipart(form).send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        debug!(status, len = body.len(), "received upload response");
        Ok(RawResponse { status, body })
    }
}
