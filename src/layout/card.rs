//! Card measurement.
//!
//! A card is described by a [`CardSpec`]: a top-to-bottom list of wrapped text
//! fields, fixed spacers, and fixed-height decoration rows. [`measure_card`]
//! wraps every field exactly once and returns the complete geometry relative
//! to the card's top-left corner; placing the card on a page only translates
//! that geometry, so the drawn lines are always the measured ones.

use log::warn;

use crate::layout::document::{CardKind, FieldExtent, Fragment, PlacedCard, Shape, TextRun};
use crate::layout::geometry::Rect;
use crate::metrics::TextMetrics;
use crate::style::FontSpec;
use crate::wrap::wrap_text;

const EPSILON: f64 = 1e-6;

/// One entry of a card's content.
#[derive(Clone, Debug)]
pub enum CardItem {
    /// Wrapped text starting `inset` from the card's left edge.
    Text {
        inset: f64,
        width: f64,
        font: FontSpec,
        text: String,
    },
    /// Fixed vertical space.
    Spacer(f64),
    /// A fixed-height row of decorations; coordinates are relative to the
    /// card's left edge and the row's top.
    Row {
        height: f64,
        shapes: Vec<Shape>,
        labels: Vec<TextRun>,
    },
}

/// Description of a card before measurement.
#[derive(Clone, Debug)]
pub struct CardSpec {
    kind: CardKind,
    sequence: usize,
    width: f64,
    padding_y: f64,
    min_height: f64,
    items: Vec<CardItem>,
}

impl CardSpec {
    pub fn new(kind: CardKind, sequence: usize, width: f64) -> Self {
        Self {
            kind,
            sequence,
            width,
            padding_y: 0.0,
            min_height: 0.0,
            items: Vec::new(),
        }
    }

    /// Vertical padding applied above and below the content.
    pub fn padding_y(mut self, padding_y: f64) -> Self {
        self.padding_y = padding_y;
        self
    }

    pub fn min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn text(mut self, inset: f64, width: f64, font: FontSpec, text: impl Into<String>) -> Self {
        self.items.push(CardItem::Text {
            inset,
            width,
            font,
            text: text.into(),
        });
        self
    }

    pub fn spacer(mut self, height: f64) -> Self {
        self.items.push(CardItem::Spacer(height));
        self
    }

    pub fn row(mut self, height: f64, shapes: Vec<Shape>, labels: Vec<TextRun>) -> Self {
        self.items.push(CardItem::Row {
            height,
            shapes,
            labels,
        });
        self
    }
}

/// Card geometry relative to the card's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredCard {
    pub kind: CardKind,
    pub sequence: usize,
    pub width: f64,
    pub height: f64,
    pub padding_y: f64,
    pub lines: Vec<TextRun>,
    pub shapes: Vec<Shape>,
    pub fields: Vec<FieldExtent>,
    pub fragment: Option<Fragment>,
}

/// Wraps and stacks every item of `spec`.
///
/// The height is the stacked content plus padding on both sides, but never
/// less than the configured minimum height.
pub fn measure_card(spec: &CardSpec, metrics: &dyn TextMetrics) -> MeasuredCard {
    let mut offset = spec.padding_y;
    let mut lines = Vec::new();
    let mut shapes = Vec::new();
    let mut fields = Vec::new();

    for item in &spec.items {
        match item {
            CardItem::Text {
                inset,
                width,
                font,
                text,
            } => {
                let prepared = metrics.prepare(text);
                let wrapped = wrap_text(metrics, &prepared, font, *width);
                let advance = font.line_advance();
                let line_count = wrapped.len();

                for (index, line) in wrapped.into_iter().enumerate() {
                    let line_width = metrics.text_width(&line, font.weight, font.size_pt);
                    lines.push(TextRun {
                        text: line,
                        x: *inset,
                        y: offset + index as f64 * advance,
                        width: line_width,
                        font: *font,
                    });
                }

                let height = line_count as f64 * advance;
                fields.push(FieldExtent {
                    dy: offset,
                    height,
                    line_count,
                });
                offset += height;
            }
            CardItem::Spacer(height) => offset += height,
            CardItem::Row {
                height,
                shapes: row_shapes,
                labels,
            } => {
                shapes.extend(row_shapes.iter().cloned().map(|s| s.translated(0.0, offset)));
                lines.extend(labels.iter().cloned().map(|l| l.translated(0.0, offset)));
                offset += height;
            }
        }
    }

    let content_height = offset - spec.padding_y;
    let height = (content_height + 2.0 * spec.padding_y).max(spec.min_height);

    MeasuredCard {
        kind: spec.kind,
        sequence: spec.sequence,
        width: spec.width,
        height,
        padding_y: spec.padding_y,
        lines,
        shapes,
        fields,
        fragment: None,
    }
}

enum Atom {
    Line(TextRun),
    Shape(Shape),
}

impl Atom {
    fn bounds(&self) -> Rect {
        match self {
            Atom::Line(line) => line.bounds(),
            Atom::Shape(shape) => shape.bounds(),
        }
    }
}

impl MeasuredCard {
    /// Splits a card into fragments that each fit.
    ///
    /// The first fragment is limited to `first_height` so it can fill the
    /// rest of the current page; later fragments use `max_height`. Lines and
    /// decorations are never cut and each fragment keeps the card padding.
    /// Cards that fit within `first_height` are returned unchanged.
    pub fn split(self, first_height: f64, max_height: f64) -> Vec<MeasuredCard> {
        if self.height <= first_height.min(max_height) + EPSILON {
            return vec![self];
        }

        let first_capacity = first_height.min(max_height) - 2.0 * self.padding_y;
        let capacity = max_height - 2.0 * self.padding_y;
        let mut atoms: Vec<Atom> = self
            .lines
            .into_iter()
            .map(Atom::Line)
            .chain(self.shapes.into_iter().map(Atom::Shape))
            .collect();
        atoms.sort_by(|a, b| a.bounds().y.total_cmp(&b.bounds().y));

        let mut groups: Vec<Vec<Atom>> = Vec::new();
        let mut current: Vec<Atom> = Vec::new();
        let mut base = 0.0;
        for atom in atoms {
            let bounds = atom.bounds();
            let limit = if groups.is_empty() { first_capacity } else { capacity };
            if current.is_empty() {
                base = bounds.y;
            } else if bounds.bottom() - base > limit + EPSILON {
                groups.push(std::mem::take(&mut current));
                base = bounds.y;
            }
            current.push(atom);
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let count = groups.len();
        warn!(
            "{:?} card {} is {:.1}mm tall and was split into {} fragments",
            self.kind, self.sequence, self.height, count
        );

        groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                let top = group
                    .iter()
                    .map(|atom| atom.bounds().y)
                    .fold(f64::INFINITY, f64::min);
                let bottom = group
                    .iter()
                    .map(|atom| atom.bounds().bottom())
                    .fold(f64::NEG_INFINITY, f64::max);
                let shift = self.padding_y - top;

                let mut lines = Vec::new();
                let mut shapes = Vec::new();
                for atom in group {
                    match atom {
                        Atom::Line(line) => lines.push(line.translated(0.0, shift)),
                        Atom::Shape(shape) => shapes.push(shape.translated(0.0, shift)),
                    }
                }

                MeasuredCard {
                    kind: self.kind,
                    sequence: self.sequence,
                    width: self.width,
                    height: bottom - top + 2.0 * self.padding_y,
                    padding_y: self.padding_y,
                    lines,
                    shapes,
                    fields: Vec::new(),
                    fragment: Some(Fragment { index, count }),
                }
            })
            .collect()
    }

    /// Translates the card to `(x, y)` on a page.
    pub fn place(self, x: f64, y: f64) -> PlacedCard {
        PlacedCard {
            kind: self.kind,
            sequence: self.sequence,
            fragment: self.fragment,
            rect: Rect::new(x, y, self.width, self.height),
            lines: self.lines.into_iter().map(|l| l.translated(x, y)).collect(),
            shapes: self.shapes.into_iter().map(|s| s.translated(x, y)).collect(),
            fields: self.fields,
        }
    }
}
