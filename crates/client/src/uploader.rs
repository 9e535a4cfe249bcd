//! Upload request transport.
//!
//! [`Uploader`] is the seam between the session and HTTP, so the session
//! can be driven by mocks in tests. [`HttpUploader`] is the real thing.

use std::future::Future;
use std::pin::Pin;

use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::SessionError;
use crate::types::{FormField, UploadRequest};

/// Sends the multipart upload request.
pub trait Uploader: Send + Sync {
    /// Posts the request and resolves to the response status.
    ///
    /// The response body is not consumed.
    fn submit(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<u16, SessionError>> + Send + '_>>;
}

/// [`Uploader`] over `reqwest`, streaming file parts from disk.
#[derive(Debug, Clone, Default)]
pub struct HttpUploader {
    http: reqwest::Client,
}

impl HttpUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Uploader for HttpUploader {
    fn submit(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<u16, SessionError>> + Send + '_>> {
        Box::pin(async move {
            let form = build_form(request.fields).await?;
            debug!(url = %request.url, "sending upload request");

            let resp = self.http.post(request.url).multipart(form).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SessionError::Upload {
                    status: status.as_u16(),
                });
            }
            Ok(status.as_u16())
        })
    }
}

/// Builds the multipart body, keeping field order.
async fn build_form(fields: Vec<FormField>) -> Result<Form, SessionError> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name, value),
            FormField::File {
                name,
                file_name,
                path,
                size,
            } => {
                let file = tokio::fs::File::open(&path).await?;
                let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
                let part = Part::stream_with_length(body, size).file_name(file_name);
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
