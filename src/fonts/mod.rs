//! Font selection for measuring and drawing reports.
//!
//! Reports are set in a TrueType Roboto family when the font files can be
//! found and fall back to the PDF base Helvetica faces otherwise. Both paths
//! expose a [`TextMetrics`] implementation so layout measures text with the
//! same font the renderer embeds.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::fonts::{Font, FontCache, FontData, FontFamily};
use log::{debug, warn};
use thiserror::Error;

use crate::metrics::{Helvetica, TextMetrics};
use crate::style::FontWeight;

/// Environment variable naming a directory that holds the TrueType fonts.
pub const FONTS_DIR_ENV: &str = "ASSESSMENT_REPORT_FONTS_DIR";

/// Name of the TrueType family looked up on disk.
pub const FONT_FAMILY_NAME: &str = "Roboto";

const REGULAR_FILE: &str = "Roboto-Regular.ttf";
const BOLD_FILE: &str = "Roboto-Bold.ttf";
const FONT_FILES: &[&str] = &[REGULAR_FILE, BOLD_FILE];

/// Size at which TrueType widths are sampled before scaling.
const REFERENCE_SIZE: u8 = 100;

/// Errors raised while loading TrueType fonts.
#[derive(Debug, Error)]
pub enum FontError {
    #[error(
        "Unable to locate the Roboto fonts. Checked: {checked}. Set \
         ASSESSMENT_REPORT_FONTS_DIR to a directory containing Roboto-Regular.ttf and Roboto-Bold.ttf."
    )]
    NotFound { checked: String },
    #[error("Failed to read font file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse font file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: genpdf::error::Error,
    },
}

/// Measures strings with TrueType advance widths.
pub struct TrueTypeMetrics {
    cache: FontCache,
    family: FontFamily<Font>,
}

impl TrueTypeMetrics {
    fn font(&self, weight: FontWeight) -> Font {
        match weight {
            FontWeight::Regular => self.family.regular,
            FontWeight::Bold => self.family.bold,
        }
    }
}

impl TextMetrics for TrueTypeMetrics {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        let width: printpdf::Mm = self
            .font(weight)
            .str_width(&self.cache, text, REFERENCE_SIZE)
            .into();
        width.0 * size_pt / f64::from(REFERENCE_SIZE)
    }
}

/// A regular/bold TrueType pair together with its metrics.
pub struct TrueTypeFamily {
    directory: PathBuf,
    regular: Vec<u8>,
    bold: Vec<u8>,
    metrics: TrueTypeMetrics,
}

impl TrueTypeFamily {
    /// Loads the family from `directory`.
    pub fn load(directory: &Path) -> Result<Self, FontError> {
        let regular = read_font(&directory.join(REGULAR_FILE))?;
        let bold = read_font(&directory.join(BOLD_FILE))?;

        let regular_data = parse_font(&directory.join(REGULAR_FILE), regular.clone())?;
        let bold_data = parse_font(&directory.join(BOLD_FILE), bold.clone())?;
        let cache = FontCache::new(FontFamily {
            regular: regular_data.clone(),
            bold: bold_data.clone(),
            italic: regular_data,
            bold_italic: bold_data,
        });
        let family = cache.default_font_family();

        Ok(Self {
            directory: directory.to_path_buf(),
            regular,
            bold,
            metrics: TrueTypeMetrics { cache, family },
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Raw font program for `weight`, as embedded into the PDF.
    pub fn bytes(&self, weight: FontWeight) -> &[u8] {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    pub fn metrics(&self) -> &TrueTypeMetrics {
        &self.metrics
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>, FontError> {
    fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_font(path: &Path, bytes: Vec<u8>) -> Result<FontData, FontError> {
    FontData::new(bytes, None).map_err(|source| FontError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The fonts a report is measured and drawn with.
pub enum FontSet {
    /// PDF base fonts; nothing is embedded.
    Builtin,
    TrueType(TrueTypeFamily),
}

impl FontSet {
    /// Loads the TrueType family from an explicit directory.
    pub fn from_directory(directory: &Path) -> Result<Self, FontError> {
        TrueTypeFamily::load(directory).map(FontSet::TrueType)
    }

    /// Searches the usual font locations, preferring `explicit` when given.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, FontError> {
        let directory = resolve_font_directory(explicit)?;
        debug!("Loading {} fonts from {}", FONT_FAMILY_NAME, directory.display());
        Self::from_directory(&directory)
    }

    /// Like [`FontSet::locate`], but falls back to the builtin faces.
    pub fn locate_or_builtin(explicit: Option<&Path>) -> Self {
        match Self::locate(explicit) {
            Ok(fonts) => fonts,
            Err(err) => {
                warn!("TrueType fonts unavailable ({}); falling back to builtin Helvetica.", err);
                FontSet::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontSet::Builtin)
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        match self {
            FontSet::Builtin => &Helvetica,
            FontSet::TrueType(family) => family.metrics(),
        }
    }
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSet::Builtin => f.write_str("Builtin"),
            FontSet::TrueType(family) => f
                .debug_tuple("TrueType")
                .field(&family.directory)
                .finish(),
        }
    }
}

fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.iter().any(|existing| existing == &candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(path) = explicit {
        push(path.to_path_buf());
    }

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }

    push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));

    candidates
}

fn missing_font_files(path: &Path) -> Vec<&'static str> {
    FONT_FILES
        .iter()
        .copied()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn resolve_font_directory(explicit: Option<&Path>) -> Result<PathBuf, FontError> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(explicit) {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_font_files(&candidate);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    let checked = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };
    Err(FontError::NotFound { checked })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_is_searched_first() {
        let explicit = Path::new("/definitely/not/here");
        let candidates = font_directory_candidates(Some(explicit));
        assert_eq!(candidates[0], explicit);
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = FontSet::from_directory(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
        assert!(err.to_string().contains(REGULAR_FILE));
    }

    #[test]
    fn builtin_set_measures_with_helvetica() {
        let fonts = FontSet::Builtin;
        let width = fonts.metrics().text_width("Score", FontWeight::Bold, 12.0);
        assert_eq!(width, Helvetica.text_width("Score", FontWeight::Bold, 12.0));
    }
}
