use std::env;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("model download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Location of the serialized model weights in the object store.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub endpoint: String,
    pub bucket: String,
    pub key: String,
}

impl ModelSource {
    /// Read the model location from `MODEL_BUCKET`, `MODEL_KEY` and
    /// optionally `MODEL_ENDPOINT`. Bucket and key are validated here so
    /// a misconfigured instance fails at boot with a clear message
    /// rather than at fetch time.
    pub fn from_env() -> Result<Self, FetchError> {
        let bucket = env::var("MODEL_BUCKET").map_err(|_| FetchError::MissingEnv("MODEL_BUCKET"))?;
        let key = env::var("MODEL_KEY").map_err(|_| FetchError::MissingEnv("MODEL_KEY"))?;
        let endpoint = env::var("MODEL_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            endpoint,
            bucket,
            key,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            self.key
        )
    }
}

/// Download the serialized model weights. One blocking GET against the
/// object store; callers wrap this in `common::retry_with_backoff`.
pub fn fetch_model(source: &ModelSource) -> Result<Vec<u8>, FetchError> {
    let url = source.url();
    tracing::info!(%url, "Fetching model weights from object store");

    let bytes = reqwest::blocking::get(&url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(|e| FetchError::Download {
            url: url.clone(),
            source: e,
        })?;

    tracing::info!(size_bytes = bytes.len(), "Model weights fetched");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn url_joins_endpoint_bucket_and_key() {
        let source = ModelSource {
            endpoint: "https://s3.amazonaws.com/".to_string(),
            bucket: "models".to_string(),
            key: "ssd300/weights.onnx".to_string(),
        };
        assert_eq!(
            source.url(),
            "https://s3.amazonaws.com/models/ssd300/weights.onnx"
        );
    }

    #[test]
    #[serial]
    fn from_env_requires_bucket_and_key() {
        unsafe {
            env::remove_var("MODEL_BUCKET");
            env::remove_var("MODEL_KEY");
        }
        match ModelSource::from_env() {
            Err(FetchError::MissingEnv(name)) => assert_eq!(name, "MODEL_BUCKET"),
            other => panic!("expected MissingEnv, got {:?}", other.map(|s| s.url())),
        }
    }

    #[test]
    #[serial]
    fn from_env_reads_location_with_default_endpoint() {
        unsafe {
            env::set_var("MODEL_BUCKET", "my-bucket");
            env::set_var("MODEL_KEY", "weights.onnx");
            env::remove_var("MODEL_ENDPOINT");
        }
        let source = ModelSource::from_env().unwrap();
        assert_eq!(source.url(), "https://s3.amazonaws.com/my-bucket/weights.onnx");
        unsafe {
            env::remove_var("MODEL_BUCKET");
            env::remove_var("MODEL_KEY");
        }
    }
}
