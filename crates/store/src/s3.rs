//! S3-compatible object storage adapter.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::error::StoreError;
use crate::models::media::{MediaUpload, ObjectPath};
use crate::ports::ObjectStorage;

const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for [`S3ObjectStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...). Enables
    /// path-style addressing.
    pub endpoint: Option<String>,
    /// Base URL objects are publicly served from. Derived from the endpoint
    /// or the AWS virtual-host URL when absent.
    pub public_base_url: Option<String>,
}

impl S3Settings {
    fn resolved_public_base(&self) -> String {
        if let Some(base) = &self.public_base_url {
            return base.trim_end_matches('/').to_string();
        }
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.bucket,
                self.region.as_deref().unwrap_or(DEFAULT_REGION)
            ),
        }
    }
}

/// Objects stored under their [`ObjectPath`] as key in one bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStorage {
    /// Build a client from the ambient AWS credential chain plus `settings`.
    pub async fn connect(settings: S3Settings) -> Self {
        let region = settings
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %settings.bucket, endpoint = ?settings.endpoint, "S3 object storage configured");
        Self {
            client: Client::from_conf(builder.build()),
            public_base_url: settings.resolved_public_base(),
            bucket: settings.bucket,
        }
    }

    fn object_url(&self, path: &ObjectPath, version: Option<&str>) -> String {
        let base = format!("{}/{}", self.public_base_url, path);
        match version {
            Some(v) => format!("{base}?v={}", v.trim_matches('"')),
            None => base,
        }
    }

    /// `Ok(Some(etag))` when an object exists at `path`.
    async fn head(&self, path: &ObjectPath) -> Result<Option<Option<String>>, StoreError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path.as_str())
            .send()
            .await
        {
            Ok(output) => Ok(Some(output.e_tag().map(str::to_string))),
            Err(err) if matches!(&err, SdkError::ServiceError(e) if e.err().is_not_found()) => {
                Ok(None)
            }
            Err(err) => Err(sdk_failure("head_object", err)),
        }
    }
}

fn sdk_failure<E>(operation: &str, err: SdkError<E, HttpResponse>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let message = format!("{operation}: {}", DisplayErrorContext(&err));
    match (&err, status) {
        (SdkError::DispatchFailure(_) | SdkError::TimeoutError(_), _) => {
            StoreError::Unavailable(message)
        }
        (_, Some(403)) => StoreError::PermissionDenied(message),
        _ => StoreError::Backend(message),
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(&self, path: &ObjectPath, upload: MediaUpload) -> Result<String, StoreError> {
        let size = upload.bytes.len();
        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path.as_str())
            .set_content_type(upload.content_type)
            .body(ByteStream::from(upload.bytes))
            .send()
            .await
            .map_err(|e| sdk_failure("put_object", e))?;

        tracing::debug!(key = %path, size, "Object stored");
        Ok(self.object_url(path, output.e_tag()))
    }

    async fn delete(&self, path: &ObjectPath) -> Result<(), StoreError> {
        // S3 deletes are silent for missing keys.
        if self.head(path).await?.is_none() {
            return Err(StoreError::not_found("objects", path));
        }
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path.as_str())
            .send()
            .await
            .map_err(|e| sdk_failure("delete_object", e))?;
        tracing::debug!(key = %path, "Object deleted");
        Ok(())
    }

    async fn url(&self, path: &ObjectPath) -> Result<Option<String>, StoreError> {
        Ok(self
            .head(path)
            .await?
            .map(|etag| self.object_url(path, etag.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> S3Settings {
        S3Settings {
            bucket: "coursehub-media".into(),
            region: Some("eu-west-1".into()),
            endpoint: None,
            public_base_url: None,
        }
    }

    #[test]
    fn public_base_defaults_to_virtual_host() {
        assert_eq!(
            settings().resolved_public_base(),
            "https://coursehub-media.s3.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn public_base_uses_custom_endpoint_path_style() {
        let s = S3Settings {
            endpoint: Some("http://localhost:9000/".into()),
            ..settings()
        };
        assert_eq!(s.resolved_public_base(), "http://localhost:9000/coursehub-media");
    }

    #[test]
    fn explicit_public_base_wins() {
        let s = S3Settings {
            endpoint: Some("http://localhost:9000".into()),
            public_base_url: Some("https://cdn.example.com/".into()),
            ..settings()
        };
        assert_eq!(s.resolved_public_base(), "https://cdn.example.com");
    }
}
