use crate::state::AppState;
use axum::{Json, extract::State};
use detector::{InferenceBackend, Predictor, Verdict, postprocessing, preprocessing};
use serde::{Deserialize, Serialize};

/// Inbound invocation event, lambda-proxy shaped. `body` must be a JSON
/// object; string-typed bodies are rejected rather than re-parsed.
#[derive(Debug, Deserialize)]
pub struct InvocationEvent {
    pub body: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RequestPayload {
    data: String,
}

/// Transport envelope returned for every invocation. The HTTP response
/// itself is always 200; the function-level status lives in
/// `statusCode`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    fn client_error(message: &str) -> Self {
        Self {
            status_code: 400,
            body: error_body(message),
        }
    }

    fn server_error(message: &str) -> Self {
        Self {
            status_code: 500,
            body: error_body(message),
        }
    }
}

fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Decode -> predict -> clamp -> filter -> envelope.
///
/// Malformed input produces a 400 envelope, inference failure a 500;
/// an empty result is not an error and answers 200 with
/// `is_person: false`.
pub fn handle_event<B: InferenceBackend>(
    predictor: &mut Predictor<B>,
    person_class_id: i64,
    event: &InvocationEvent,
) -> Envelope {
    let payload: RequestPayload = match serde_json::from_value(event.body.clone()) {
        Ok(payload) => payload,
        Err(_) => {
            return Envelope::client_error("body must be a JSON object with a base64 `data` field");
        }
    };

    let image = match preprocessing::decode_image(&payload.data) {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting undecodable payload");
            return Envelope::client_error(&e.to_string());
        }
    };

    let mut detections = match predictor.predict(&image) {
        Ok(detections) => detections,
        Err(e) => {
            tracing::error!(error = %e, "Inference failed");
            return Envelope::server_error("inference failed");
        }
    };

    postprocessing::clamp_boxes(&mut detections, image.width(), image.height());
    let verdict = match postprocessing::best_person(&detections, person_class_id) {
        Some(best) => Verdict::found(&best),
        None => Verdict::not_found(),
    };

    match serde_json::to_string(&verdict) {
        Ok(body) => Envelope::ok(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize verdict");
            Envelope::server_error("failed to serialize response")
        }
    }
}

/// POST /invocations
pub async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<InvocationEvent>,
) -> Json<Envelope> {
    let result = tokio::task::spawn_blocking(move || {
        let mut predictor = match state.predictor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        handle_event(&mut predictor, state.person_class_id, &event)
    })
    .await;

    match result {
        Ok(envelope) => Json(envelope),
        Err(e) => {
            tracing::error!(error = %e, "Inference task panicked or was cancelled");
            Json(Envelope::server_error("inference task failed"))
        }
    }
}
