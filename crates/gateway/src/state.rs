use detector::Predictor;
use detector::backend::ort::OrtBackend;
use std::sync::{Arc, Mutex};

/// Application context built once at cold start and shared by every
/// request. The detector weights are read-only after load; the mutex
/// exists because the session's scratch buffers need `&mut` to run.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Mutex<Predictor<OrtBackend>>>,
    pub person_class_id: i64,
}

impl AppState {
    pub fn new(predictor: Predictor<OrtBackend>, person_class_id: i64) -> Self {
        Self {
            predictor: Arc::new(Mutex::new(predictor)),
            person_class_id,
        }
    }
}
