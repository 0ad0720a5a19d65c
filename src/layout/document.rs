//! The laid-out document: pages, cards, and positioned text.
//!
//! All coordinates are absolute millimetres measured from the top-left corner
//! of the page. Text runs are positioned by the top of their line box.

use crate::layout::geometry::{PageGeometry, Rect};
use crate::style::{FontSpec, Rgb};

/// Corner radius of card outlines.
pub const CARD_RADIUS: f64 = 3.0;

/// Logical report sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Summary,
    Questions,
    ActionPlan,
    Recommendations,
}

/// Where a section starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMark {
    pub kind: SectionKind,
    pub title: String,
    /// Zero-based page index.
    pub page: usize,
    pub y: f64,
}

/// What a card holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardKind {
    Question,
    ActionPlan,
    Recommendation,
}

/// Position of a card fragment when an oversized card had to be split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub index: usize,
    pub count: usize,
}

/// A single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    /// Top of the line box.
    pub y: f64,
    /// Measured advance width of `text`.
    pub width: f64,
    pub font: FontSpec,
}

impl TextRun {
    /// The line box occupied by the run.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.font.line_advance())
    }

    /// Baseline used when the run is drawn.
    pub fn baseline(&self) -> f64 {
        self.y + self.font.size_mm() * 0.8
    }

    pub(crate) fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }
}

/// Filled or outlined decorations.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    RoundedRect {
        rect: Rect,
        radius: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
        fill: Rgb,
    },
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::RoundedRect { rect, .. } => *rect,
            Shape::Circle {
                center_x,
                center_y,
                radius,
                ..
            } => Rect::new(
                center_x - radius,
                center_y - radius,
                2.0 * radius,
                2.0 * radius,
            ),
        }
    }

    pub(crate) fn translated(self, dx: f64, dy: f64) -> Self {
        match self {
            Shape::RoundedRect {
                rect,
                radius,
                fill,
                stroke,
            } => Shape::RoundedRect {
                rect: Rect::new(rect.x + dx, rect.y + dy, rect.width, rect.height),
                radius,
                fill,
                stroke,
            },
            Shape::Circle {
                center_x,
                center_y,
                radius,
                fill,
            } => Shape::Circle {
                center_x: center_x + dx,
                center_y: center_y + dy,
                radius,
                fill,
            },
        }
    }
}

/// Vertical extent of one wrapped text field inside a card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldExtent {
    /// Offset from the top of the card.
    pub dy: f64,
    pub height: f64,
    pub line_count: usize,
}

/// A card drawn on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCard {
    pub kind: CardKind,
    /// Zero-based position within its section.
    pub sequence: usize,
    pub fragment: Option<Fragment>,
    pub rect: Rect,
    pub lines: Vec<TextRun>,
    pub shapes: Vec<Shape>,
    /// Field extents; empty for fragments of a split card.
    pub fields: Vec<FieldExtent>,
}

impl PlacedCard {
    /// Text of all lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One page of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    pub cards: Vec<PlacedCard>,
    /// Free text that does not belong to a card (titles, headings, footer).
    pub texts: Vec<TextRun>,
    /// Vertical cursor after the last placed element.
    pub cursor: f64,
}

impl Page {
    pub(crate) fn new(index: usize, cursor: f64) -> Self {
        Self {
            index,
            cards: Vec::new(),
            texts: Vec::new(),
            cursor,
        }
    }

    /// Returns whether anything was placed on the page.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.texts.is_empty()
    }
}

/// The complete laid-out report.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    geometry: PageGeometry,
    pages: Vec<Page>,
    sections: Vec<SectionMark>,
}

impl Document {
    pub(crate) fn new(geometry: PageGeometry, pages: Vec<Page>, sections: Vec<SectionMark>) -> Self {
        Self {
            geometry,
            pages,
            sections,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn sections(&self) -> &[SectionMark] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionMark> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// All cards in drawing order, with the index of the page they are on.
    pub fn cards(&self) -> impl Iterator<Item = (usize, &PlacedCard)> {
        self.pages
            .iter()
            .flat_map(|page| page.cards.iter().map(move |card| (page.index, card)))
    }

    pub fn cards_of(&self, kind: CardKind) -> impl Iterator<Item = (usize, &PlacedCard)> {
        self.cards().filter(move |(_, card)| card.kind == kind)
    }
}
