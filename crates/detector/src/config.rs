use serde::Deserialize;

/// Detector hyperparameters, read once from the bundled descriptor file
/// at cold start and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Square model input resolution in pixels.
    pub input_size: u32,
    /// Detections scoring below this are dropped by the predictor.
    pub score_threshold: f32,
    /// Overlap threshold applied by the exported model's in-graph NMS.
    pub iou_threshold: f32,
    /// Per-channel RGB means subtracted during preprocessing.
    pub pixel_means: [f32; 3],
    /// Class names in model output order, background first.
    pub class_names: Vec<String>,
}

impl DetectorConfig {
    /// Position of `name` in the class list, as emitted by the model.
    ///
    /// Resolved once at startup so a reordered class list surfaces as a
    /// boot failure instead of silently selecting the wrong class.
    pub fn class_id(&self, name: &str) -> Option<i64> {
        self.class_names
            .iter()
            .position(|n| n == name)
            .map(|i| i as i64)
    }
}

/// Load the detector descriptor from a TOML file.
pub fn load_descriptor(path: &str) -> Result<DetectorConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Toml))
        .build()?;

    settings.try_deserialize::<DetectorConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_descriptor(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_descriptor_from_toml_file() {
        let file = write_descriptor(
            r#"
            input_size = 300
            score_threshold = 0.5
            iou_threshold = 0.5
            pixel_means = [123.0, 117.0, 104.0]
            class_names = ["__background__", "cat", "person"]
            "#,
        );

        let cfg = load_descriptor(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.input_size, 300);
        assert_eq!(cfg.score_threshold, 0.5);
        assert_eq!(cfg.class_names.len(), 3);
        assert_eq!(cfg.class_id("person"), Some(2));
        assert_eq!(cfg.class_id("dog"), None);
    }

    #[test]
    fn malformed_descriptor_is_an_error() {
        let file = write_descriptor("input_size = \"not a number\"");
        assert!(load_descriptor(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_descriptor_is_an_error() {
        assert!(load_descriptor("/nonexistent/detector.toml").is_err());
    }

    #[test]
    fn bundled_descriptor_resolves_person_to_voc_id_15() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../config/detector.toml"
        );
        let cfg = load_descriptor(path).unwrap();
        assert_eq!(cfg.class_id("person"), Some(15));
        assert_eq!(cfg.class_names.len(), 21);
    }
}
