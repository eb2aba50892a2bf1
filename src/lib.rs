// Library root
// -----------
// This crate exposes a small client for the Bucket storage service plus
// the pieces the CLI binary (`main.rs`) is built from.
//
// Module responsibilities:
// - `config`: API key, base URL, timeout and the local upload policy
//   (size ceiling and allowed extensions).
// - `client`: `BucketClient`, which validates a file, uploads it and maps
//   the JSON envelope onto a typed result.
// - `transport`: the HTTP seam. `HttpTransport` sends the multipart form
//   with reqwest; tests plug in their own `Transport`.
// - `model`: response shapes returned by the service.
// - `error`: `UploadError` and its validation kinds.
// - `ui`: interactive terminal flows used by the binary.
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;
pub mod ui;

pub use client::BucketClient;
pub use config::{ClientConfig, UploadPolicy};
pub use error::{Result, UploadError, ValidationError};
pub use model::{Metadata, UploadResponse};
