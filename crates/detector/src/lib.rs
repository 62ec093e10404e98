pub mod backend;
pub mod config;
pub mod fetch;
pub mod postprocessing;
pub mod predictor;
pub mod preprocessing;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, InferenceOutput};
pub use config::DetectorConfig;
pub use postprocessing::{Detections, Verdict};
pub use predictor::Predictor;
pub use preprocessing::DecodeError;
