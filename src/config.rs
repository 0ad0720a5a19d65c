//! Export configuration.

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::fonts::FONTS_DIR_ENV;
use crate::likert::ResponseScale;

/// Overrides the product name shown in titles and footers.
pub const PRODUCT_ENV: &str = "ASSESSMENT_REPORT_PRODUCT";
/// Overrides the file name prefix.
pub const PREFIX_ENV: &str = "ASSESSMENT_REPORT_PREFIX";
/// Selects the response label scale (`agreement` or `maturity`).
pub const SCALE_ENV: &str = "ASSESSMENT_REPORT_SCALE";

/// Settings shared by every export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub product_name: String,
    pub file_prefix: String,
    pub response_scale: ResponseScale,
    /// Directory searched first for TrueType fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Skip the TrueType search and draw with the builtin faces.
    pub builtin_fonts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            product_name: "Xcelerator".to_owned(),
            file_prefix: "xcelerator".to_owned(),
            response_scale: ResponseScale::default(),
            fonts_dir: None,
            builtin_fonts: false,
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by any of the `ASSESSMENT_REPORT_*` variables that are set.
    pub fn from_env() -> Self {
        Self::default().merge_env(|name| env::var(name).ok())
    }

    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(product) = value(PRODUCT_ENV) {
            self.product_name = product;
        }
        if let Some(prefix) = value(PREFIX_ENV) {
            self.file_prefix = prefix;
        }
        if let Some(scale) = value(SCALE_ENV) {
            match scale.parse() {
                Ok(scale) => self.response_scale = scale,
                Err(err) => warn!("Ignoring {}: {}", SCALE_ENV, err),
            }
        }
        if let Some(dir) = value(FONTS_DIR_ENV) {
            self.fonts_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn merged(vars: &[(&str, &str)]) -> ReportConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReportConfig::default().merge_env(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(merged(&[]), ReportConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = merged(&[
            (PRODUCT_ENV, "Acme"),
            (PREFIX_ENV, "acme"),
            (SCALE_ENV, "maturity"),
            (FONTS_DIR_ENV, "/opt/fonts"),
        ]);
        assert_eq!(config.product_name, "Acme");
        assert_eq!(config.file_prefix, "acme");
        assert_eq!(config.response_scale, ResponseScale::Maturity);
        assert_eq!(config.fonts_dir, Some(PathBuf::from("/opt/fonts")));
    }

    #[test]
    fn blank_and_invalid_values_are_ignored() {
        let config = merged(&[(PRODUCT_ENV, "  "), (SCALE_ENV, "sideways")]);
        assert_eq!(config.product_name, "Xcelerator");
        assert_eq!(config.response_scale, ResponseScale::Agreement);
    }
}
