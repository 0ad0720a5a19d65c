//! Pagination of a report model into positioned cards and text.

pub mod card;
pub mod document;
pub mod engine;
pub mod geometry;

pub use card::{measure_card, CardItem, CardSpec, MeasuredCard};
pub use document::{
    CardKind, Document, FieldExtent, Fragment, Page, PlacedCard, SectionKind, SectionMark, Shape,
    TextRun, CARD_RADIUS,
};
pub use engine::{LayoutEngine, LayoutOptions, CARD_GAP};
pub use geometry::{PageGeometry, Rect};

use crate::metrics::Helvetica;
use crate::model::ReportModel;

/// Lays out `model` on A4 pages using the builtin Helvetica metrics.
pub fn layout(model: &ReportModel) -> Document {
    LayoutEngine::new(&Helvetica).layout(model)
}
