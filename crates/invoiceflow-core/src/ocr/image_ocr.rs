//! Neural OCR backend for photos and screenshots, using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use super::{CapabilityType, OcrBackend};
use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::raw::{BoundingBox, RawInput, TextCell};

/// Detection + recognition over a single image, returning one cell per
/// recognized text region.
pub struct ImageOcrBackend {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    min_confidence: f32,
}

impl ImageOcrBackend {
    /// Load models from `config.model_dir`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            min_confidence: config.min_confidence,
        })
    }
}

impl OcrBackend for ImageOcrBackend {
    fn capability(&self) -> CapabilityType {
        CapabilityType::ImageOcr
    }

    fn extract(&self, source: &Path) -> Result<RawInput, OcrError> {
        let start = Instant::now();
        let image = image::open(source)?;
        let (width, height) = image.dimensions();
        debug!("Running OCR on {} ({}x{})", source.display(), width, height);

        let results = {
            let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
            engine
                .run_from_image(&image)
                .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?
        };

        let cells: Vec<TextCell> = results
            .iter()
            .filter(|r| r.confidence >= self.min_confidence)
            .map(|r| {
                let points = r.bounding_box.exterior().coords().map(|c| (c.x as f32, c.y as f32));
                TextCell::new(
                    r.text.replace("[UNK]", " "),
                    BoundingBox::enclosing(points),
                    r.confidence,
                )
            })
            .collect();

        info!(
            "OCR complete: {} of {} regions kept in {}ms",
            cells.len(),
            results.len(),
            start.elapsed().as_millis()
        );

        Ok(RawInput::Table(cells))
    }
}
