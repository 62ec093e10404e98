use ndarray::{Array, IxDyn};

pub mod ort;

/// Forward pass over a preprocessed image tensor.
///
/// Implementations own the model weights; they are constructed once at
/// cold start and reused for every request in the instance.
pub trait InferenceBackend {
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<InferenceOutput>;
}

/// Raw detector output: three positionally aligned sequences.
pub struct InferenceOutput {
    pub boxes: ndarray::ArrayD<f32>,  // [N, 4] xyxy, normalized 0..1
    pub labels: ndarray::ArrayD<i64>, // [N] class ids
    pub scores: ndarray::ArrayD<f32>, // [N] confidences 0..1
}
