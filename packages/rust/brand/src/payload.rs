//! Brand provider response payload and its reduction to a [`BrandProfile`].
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! provider response is ignored.

use brandpitch_shared::{BrandColor, BrandProfile};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Brand lookup response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderBrand {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub logos: Vec<ProviderLogo>,
    #[serde(default)]
    pub colors: Vec<ProviderColor>,
}

/// One logo asset (`logo`, `icon`, `symbol`, ...) with its file formats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderLogo {
    #[serde(default, rename = "type")]
    pub logo_type: String,
    #[serde(default)]
    pub formats: Vec<ProviderFormat>,
}

/// One file rendition of a logo asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFormat {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub src: String,
}

/// One brand color.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderColor {
    #[serde(default)]
    pub hex: String,
    #[serde(default, rename = "type")]
    pub color_type: String,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick the logo URL: an asset typed `logo` wins over the first asset, and
/// within the chosen asset `svg` wins over `png`. Other formats are ignored.
pub fn resolve_logo(logos: &[ProviderLogo]) -> Option<String> {
    let asset = logos
        .iter()
        .find(|logo| logo.logo_type == "logo")
        .or_else(|| logos.first())?;

    ["svg", "png"].iter().find_map(|wanted| {
        asset
            .formats
            .iter()
            .find(|f| f.format == *wanted && !f.src.is_empty())
            .map(|f| f.src.clone())
    })
}

/// Pick the display color: `primary`, else `accent`, else none.
pub fn resolve_primary_color(colors: &[ProviderColor]) -> Option<String> {
    ["primary", "accent"].iter().find_map(|wanted| {
        colors
            .iter()
            .find(|c| c.color_type == *wanted && !c.hex.is_empty())
            .map(|c| c.hex.clone())
    })
}

impl ProviderBrand {
    /// Reduce the provider payload to the canonical profile.
    ///
    /// `domain` is the normalized lookup key, used when the provider omits
    /// its own domain or name.
    pub fn into_profile(self, domain: &str) -> BrandProfile {
        let logo = resolve_logo(&self.logos);
        let primary_color = resolve_primary_color(&self.colors);

        let name = non_empty(self.name).unwrap_or_else(|| domain.to_string());
        let domain = non_empty(self.domain).unwrap_or_else(|| domain.to_string());

        BrandProfile {
            name,
            domain,
            description: self.description.unwrap_or_default(),
            long_description: self.long_description.unwrap_or_default(),
            logo,
            primary_color,
            all_colors: self
                .colors
                .into_iter()
                .map(|c| BrandColor {
                    hex: c.hex,
                    color_type: c.color_type,
                })
                .collect(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
