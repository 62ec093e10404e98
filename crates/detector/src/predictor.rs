use crate::{
    backend::{InferenceBackend, InferenceOutput},
    config::DetectorConfig,
    postprocessing::Detections,
    preprocessing,
};
use image::RgbImage;
use std::time::Instant;

/// Runs the forward pass over decoded images. Owns the backend and the
/// frozen detector configuration for the lifetime of the instance.
pub struct Predictor<B: InferenceBackend> {
    backend: B,
    config: DetectorConfig,
}

impl<B: InferenceBackend> Predictor<B> {
    pub fn new(backend: B, config: DetectorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Preprocess, infer and collect aligned detections in original
    /// image pixel coordinates. Detections under the configured score
    /// threshold are dropped here.
    pub fn predict(&mut self, image: &RgbImage) -> anyhow::Result<Detections> {
        let start = Instant::now();

        let input = preprocessing::to_input_tensor(
            image,
            self.config.input_size,
            self.config.pixel_means,
        );
        let output = self.backend.infer(&input)?;
        let detections = self.collect_detections(output, image.width(), image.height())?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            detections = detections.len(),
            "Inference complete"
        );
        Ok(detections)
    }

    fn collect_detections(
        &self,
        output: InferenceOutput,
        orig_width: u32,
        orig_height: u32,
    ) -> anyhow::Result<Detections> {
        let scores: Vec<f32> = output.scores.iter().copied().collect();
        let labels: Vec<i64> = output.labels.iter().copied().collect();
        let flat_boxes: Vec<f32> = output.boxes.iter().copied().collect();

        if labels.len() != scores.len() || flat_boxes.len() != scores.len() * 4 {
            anyhow::bail!(
                "misaligned detector output: {} box values, {} labels, {} scores",
                flat_boxes.len(),
                labels.len(),
                scores.len()
            );
        }

        let w = orig_width as f32;
        let h = orig_height as f32;
        let mut detections = Detections::default();
        for (i, chunk) in flat_boxes.chunks_exact(4).enumerate() {
            if scores[i] < self.config.score_threshold {
                continue;
            }
            // Denormalize from the model's 0..1 output space
            detections
                .boxes
                .push([chunk[0] * w, chunk[1] * h, chunk[2] * w, chunk[3] * h]);
            detections.labels.push(labels[i]);
            detections.scores.push(scores[i]);
        }

        Ok(detections)
    }
}
