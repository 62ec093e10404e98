use super::{InferenceBackend, InferenceOutput};
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};

pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    /// Build a CPU session from serialized model bytes fetched at cold
    /// start. There is no on-disk model path in this deployment.
    pub fn load_from_bytes(model_bytes: &[u8]) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        tracing::info!("Initializing ONNX Runtime with CPU execution provider");
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_memory(model_bytes)?;

        tracing::info!(
            model_bytes = model_bytes.len(),
            "Model deserialized into session"
        );
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<InferenceOutput> {
        let outputs = self.session.run(ort::inputs![
            "images" => TensorRef::from_array_view(input.view())?
        ])?;

        let boxes = outputs["boxes"].try_extract_array()?;
        let labels = outputs["labels"].try_extract_array()?;
        let scores = outputs["scores"].try_extract_array()?;

        Ok(InferenceOutput {
            boxes: boxes.into_owned(),
            labels: labels.into_owned(),
            scores: scores.into_owned(),
        })
    }
}
