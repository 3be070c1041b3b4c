//! Raw OCR output as produced by the backends.

use serde::{Deserialize, Serialize};

/// Vertical distance (in pixels) under which two cell centers count as one row.
const ROW_TOLERANCE: f32 = 15.0;

/// Axis-aligned bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Smallest box enclosing all given points.
    pub fn enclosing(points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut bbox = Self::new(f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (x, y) in points {
            bbox.x_min = bbox.x_min.min(x);
            bbox.y_min = bbox.y_min.min(y);
            bbox.x_max = bbox.x_max.max(x);
            bbox.y_max = bbox.y_max.max(y);
        }
        if bbox.x_min > bbox.x_max {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        bbox
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        (self.y_min + self.y_max) / 2.0
    }
}

/// A single recognized text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    /// Recognized text content.
    pub text: String,

    /// Region bounds.
    pub bounding_box: BoundingBox,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence_score: f32,
}

impl TextCell {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox, confidence_score: f32) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            confidence_score,
        }
    }
}

/// Output of a backend: either free text or a table of recognized cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawInput {
    Text(String),
    Table(Vec<TextCell>),
}

impl RawInput {
    /// Text form, if this input is unstructured text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawInput::Text(text) => Some(text),
            RawInput::Table(_) => None,
        }
    }

    /// Table form, if this input is a cell table.
    pub fn as_table(&self) -> Option<&[TextCell]> {
        match self {
            RawInput::Text(_) => None,
            RawInput::Table(cells) => Some(cells),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawInput::Text(text) => text.is_empty(),
            RawInput::Table(cells) => cells.is_empty(),
        }
    }
}

/// Group cells into rows (top-to-bottom), each row sorted left-to-right.
pub fn group_rows(cells: &[TextCell]) -> Vec<Vec<&TextCell>> {
    let mut sorted: Vec<&TextCell> = cells.iter().collect();
    sorted.sort_by(|a, b| {
        a.bounding_box
            .center_y()
            .partial_cmp(&b.bounding_box.center_y())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut rows: Vec<Vec<&TextCell>> = Vec::new();
    let mut current_y = f32::NEG_INFINITY;

    for cell in sorted {
        let y = cell.bounding_box.center_y();
        match rows.last_mut() {
            Some(row) if (y - current_y).abs() < ROW_TOLERANCE => row.push(cell),
            _ => {
                rows.push(vec![cell]);
                current_y = y;
            }
        }
    }

    for row in &mut rows {
        row.sort_by(|a, b| {
            a.bounding_box
                .x_min
                .partial_cmp(&b.bounding_box.x_min)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    rows
}

/// Join cells into plain text in reading order, one line per row.
pub fn reading_order_text(cells: &[TextCell]) -> String {
    group_rows(cells)
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
