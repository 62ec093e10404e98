use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-request detector output: three sequences of equal length,
/// positionally aligned.
#[derive(Debug, Clone, Default)]
pub struct Detections {
    pub boxes: Vec<[f32; 4]>, // xyxy in original image pixels
    pub labels: Vec<i64>,
    pub scores: Vec<f32>,
}

impl Detections {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// The single detection the endpoint reports on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonDetection {
    pub bbox: [f32; 4],
    pub score: f32,
}

/// Minimal response body, serialized as the envelope's JSON payload.
/// Box fields are omitted entirely when nothing was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub is_person: bool,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmin: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ymin: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmax: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ymax: Option<i64>,
}

impl Verdict {
    pub fn found(detection: &PersonDetection) -> Self {
        let [xmin, ymin, xmax, ymax] = detection.bbox;
        Self {
            is_person: true,
            confidence: detection.score,
            xmin: Some(xmin as i64),
            ymin: Some(ymin as i64),
            xmax: Some(xmax as i64),
            ymax: Some(ymax as i64),
        }
    }

    pub fn not_found() -> Self {
        Self {
            is_person: false,
            confidence: 0.0,
            xmin: None,
            ymin: None,
            xmax: None,
            ymax: None,
        }
    }
}

/// Clamp every box to the image frame. Idempotent; a coordinate already
/// inside `[0, width] x [0, height]` is untouched.
pub fn clamp_boxes(detections: &mut Detections, width: u32, height: u32) {
    let w = width as f32;
    let h = height as f32;
    for bbox in &mut detections.boxes {
        bbox[0] = bbox[0].max(0.0).min(w);
        bbox[1] = bbox[1].max(0.0).min(h);
        bbox[2] = bbox[2].max(0.0).min(w);
        bbox[3] = bbox[3].max(0.0).min(h);
    }
}

/// Select the highest-confidence detection with the given class id.
/// Exact score ties are broken by lexicographic comparison of the box
/// coordinates; `None` when no detection matches.
pub fn best_person(detections: &Detections, person_class_id: i64) -> Option<PersonDetection> {
    let mut best: Option<PersonDetection> = None;

    for i in 0..detections.len() {
        if detections.labels[i] != person_class_id {
            continue;
        }
        let candidate = PersonDetection {
            bbox: detections.boxes[i],
            score: detections.scores[i],
        };
        let beats_current = match &best {
            None => true,
            Some(current) => match candidate.score.partial_cmp(&current.score) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => {
                    candidate.bbox.partial_cmp(&current.bbox) == Some(Ordering::Greater)
                }
                _ => false,
            },
        };
        if beats_current {
            best = Some(candidate);
        }
    }

    best
}
