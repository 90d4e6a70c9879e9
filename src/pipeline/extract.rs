//! Result Extractor
//!
//! Reads the three named fields out of one page record regardless of its
//! shape. Each field that is missing or malformed defaults independently to
//! the empty sequence; extraction itself never fails.

use serde_json::{Map, Value};

use crate::engine::{PageRecord, Polygon, TypedPage};

/// The three parallel sequences pulled from one page record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub texts: Vec<String>,
    pub scores: Vec<f64>,
    pub boxes: Vec<Polygon>,
}

/// Narrow capability interface over a page record's fields. One adapter per
/// record shape; the rest of the pipeline only sees [`Extracted`].
trait PageFields {
    fn texts(&self) -> Vec<String>;
    fn scores(&self) -> Vec<f64>;
    fn polygons(&self) -> Vec<Polygon>;
}

/// Extract texts, scores, and boxes from a page record of either shape.
pub fn extract(record: &PageRecord) -> Extracted {
    match record {
        PageRecord::Typed(page) => collect(page),
        PageRecord::Mapped(map) => collect(&MappedPage(map)),
    }
}

fn collect(fields: &impl PageFields) -> Extracted {
    Extracted {
        texts: fields.texts(),
        scores: fields.scores(),
        boxes: fields.polygons(),
    }
}

impl PageFields for TypedPage {
    fn texts(&self) -> Vec<String> {
        self.rec_texts.clone().unwrap_or_default()
    }

    fn scores(&self) -> Vec<f64> {
        self.rec_scores.clone().unwrap_or_default()
    }

    fn polygons(&self) -> Vec<Polygon> {
        self.rec_polys.clone().unwrap_or_default()
    }
}

/// Keyed-access adapter over a loose JSON object.
struct MappedPage<'a>(&'a Map<String, Value>);

impl MappedPage<'_> {
    fn items(&self, key: &str) -> impl Iterator<Item = &Value> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter())
            .unwrap_or_default()
    }
}

impl PageFields for MappedPage<'_> {
    fn texts(&self) -> Vec<String> {
        self.items("rec_texts")
            .filter_map(|value| value.as_str().map(str::to_owned))
            .collect()
    }

    fn scores(&self) -> Vec<f64> {
        self.items("rec_scores").filter_map(Value::as_f64).collect()
    }

    fn polygons(&self) -> Vec<Polygon> {
        self.items("rec_polys").filter_map(parse_polygon).collect()
    }
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    let points = value.as_array()?;
    points.iter().map(parse_point).collect()
}

fn parse_point(value: &Value) -> Option<(f32, f32)> {
    let pair = value.as_array()?;
    match pair.as_slice() {
        [x, y] => Some((x.as_f64()? as f32, y.as_f64()? as f32)),
        _ => None,
    }
}
