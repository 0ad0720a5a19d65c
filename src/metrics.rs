//! Text measurement.
//!
//! Layout needs to know how wide a string is before anything is drawn. The
//! [`TextMetrics`] trait answers that in millimetres for a given weight and
//! point size. [`Helvetica`] carries the standard metrics of the PDF base font,
//! so it works without any font files; TrueType families are measured through
//! `genpdf` in [`crate::fonts`].

use std::borrow::Cow;

use crate::style::{FontWeight, PT_TO_MM};

/// Measures rendered string widths.
pub trait TextMetrics {
    /// Width of `text` in millimetres when set in `weight` at `size_pt`.
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64;

    /// Rewrites `text` into what the font can actually draw.
    ///
    /// Measurement and drawing both operate on the prepared string.
    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Metrics of the built-in Helvetica and Helvetica-Bold faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct Helvetica;

/// Advance width used for characters outside the tables.
const FALLBACK_WIDTH: u16 = 556;

// Widths in 1/1000 em for ASCII 0x20..=0x7E, index = byte - 0x20.
#[rustfmt::skip]
const REGULAR_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A-M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a-m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n-z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A-M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a-m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n-z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

impl Helvetica {
    fn char_width(c: char, weight: FontWeight) -> u16 {
        let table = match weight {
            FontWeight::Regular => &REGULAR_WIDTHS,
            FontWeight::Bold => &BOLD_WIDTHS,
        };
        let code = c as usize;
        if (0x20..=0x7e).contains(&code) {
            table[code - 0x20]
        } else {
            FALLBACK_WIDTH
        }
    }
}

impl TextMetrics for Helvetica {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(Self::char_width(c, weight)))
            .sum();
        f64::from(units) / 1000.0 * size_pt * PT_TO_MM
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_ascii() {
            return Cow::Borrowed(text);
        }
        let mut prepared = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                c if c.is_ascii() => prepared.push(c),
                '\u{2013}' | '\u{2014}' | '\u{2212}' => prepared.push('-'),
                '\u{2018}' | '\u{2019}' => prepared.push('\''),
                '\u{201c}' | '\u{201d}' => prepared.push('"'),
                '\u{2026}' => prepared.push_str("..."),
                '\u{00a0}' => prepared.push(' '),
                _ => prepared.push('?'),
            }
        }
        Cow::Owned(prepared)
    }
}
