//! The industry template catalog.
//!
//! The catalog is a versioned JSON document embedded at build time. A file
//! configured under `[catalog] path` replaces it wholesale. Once loaded it is
//! never mutated; lookups are by exact industry name.

use std::path::Path;
use std::sync::LazyLock;

use brandpitch_shared::{
    BrandPitchError, CatalogConfig, ChannelKey, FALLBACK_INDUSTRY, IndustryTemplate, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The catalog document shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../catalog/industries.json");

static BUILTIN: LazyLock<std::result::Result<Catalog, String>> =
    LazyLock::new(|| Catalog::from_json(BUILTIN_CATALOG).map_err(|e| e.to_string()));

/// Immutable set of industry templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Document version, bumped whenever templates change.
    pub version: u32,
    industries: Vec<IndustryTemplate>,
}

impl Catalog {
    /// The embedded catalog, parsed on first use.
    pub fn builtin() -> Result<&'static Catalog> {
        BUILTIN
            .as_ref()
            .map_err(|e| BrandPitchError::config(format!("built-in catalog is invalid: {e}")))
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|e| BrandPitchError::config(format!("failed to parse catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog document from disk.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| BrandPitchError::io(path, e))?;
        let catalog = Self::from_json(&json).map_err(|e| match e {
            BrandPitchError::Config { message } => {
                BrandPitchError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        info!(
            path = %path.display(),
            version = catalog.version,
            templates = catalog.len(),
            "loaded catalog override"
        );
        Ok(catalog)
    }

    /// The configured override if one is set, the built-in catalog otherwise.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::load_from(Path::new(path)),
            None => Self::builtin().cloned(),
        }
    }

    /// Template with exactly this name.
    pub fn get(&self, name: &str) -> Option<&IndustryTemplate> {
        self.industries.iter().find(|t| t.name == name)
    }

    /// All templates in document order.
    pub fn templates(&self) -> &[IndustryTemplate] {
        &self.industries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.industries.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    /// `(industry, label)` pairs whose step label maps to no channel. Journey
    /// expansion skips these steps.
    pub fn unmapped_labels(&self) -> Vec<(&str, &str)> {
        self.industries
            .iter()
            .flat_map(|template| {
                template
                    .steps
                    .iter()
                    .filter(|(label, _)| ChannelKey::from_label(label).is_none())
                    .map(move |(label, _)| (template.name.as_str(), label))
            })
            .collect()
    }

    /// Reject catalogs the pipeline cannot work with.
    fn validate(&self) -> Result<()> {
        if self.industries.is_empty() {
            return Err(BrandPitchError::config("catalog has no industries"));
        }

        for (i, template) in self.industries.iter().enumerate() {
            if template.name.trim().is_empty() {
                return Err(BrandPitchError::config(format!(
                    "catalog entry {i} has an empty name"
                )));
            }
            if self.industries[..i].iter().any(|t| t.name == template.name) {
                return Err(BrandPitchError::config(format!(
                    "duplicate industry '{}' in catalog",
                    template.name
                )));
            }
            if template.steps.is_empty() {
                return Err(BrandPitchError::config(format!(
                    "industry '{}' has no journey steps",
                    template.name
                )));
            }
        }

        for (industry, label) in self.unmapped_labels() {
            warn!(industry, label, "step label has no channel key, step will be skipped");
        }

        if self.get(FALLBACK_INDUSTRY).is_none() {
            return Err(BrandPitchError::config(format!(
                "catalog must contain the '{FALLBACK_INDUSTRY}' entry"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandpitch_shared::{CHANNEL_LABELS, FALLBACK_USE_CASE};

    fn minimal(extra: &str) -> String {
        format!(
            r#"{{
                "version": 1,
                "industries": [
                    {{
                        "name": "Other Industries",
                        "useCase": "General Marketing",
                        "steps": {{ "Email": {{ "goal": "g", "prompt": "p" }} }}
                    }}{extra}
                ]
            }}"#
        )
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.version >= 1);
        assert!(catalog.len() >= 10);
    }

    #[test]
    fn builtin_contains_retail_abandoned_cart() {
        let catalog = Catalog::builtin().unwrap();
        let retail = catalog.get("Retail & Consumer Goods").unwrap();
        assert_eq!(retail.use_case, "Abandoned Cart");
        let labels: Vec<&str> = retail.steps.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["In-App", "Email", "SMS"]);
    }

    #[test]
    fn builtin_fallback_entry_matches_fallback_use_case() {
        let catalog = Catalog::builtin().unwrap();
        let other = catalog.get(FALLBACK_INDUSTRY).unwrap();
        assert_eq!(other.use_case, FALLBACK_USE_CASE);
    }

    #[test]
    fn builtin_labels_are_all_known() {
        let catalog = Catalog::builtin().unwrap();
        for template in catalog.templates() {
            for (label, step) in template.steps.iter() {
                assert!(
                    CHANNEL_LABELS.iter().any(|(l, _)| *l == label),
                    "{}: unknown label {label}",
                    template.name
                );
                assert!(!step.goal.is_empty());
            }
        }
    }

    #[test]
    fn lookup_is_exact() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.get("retail & consumer goods").is_none());
        assert!(catalog.get(" Retail & Consumer Goods").is_none());
    }

    #[test]
    fn minimal_catalog_parses() {
        let catalog = Catalog::from_json(&minimal("")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Other Industries"]);
    }

    #[test]
    fn duplicate_industry_is_rejected() {
        let dup = r#", { "name": "Other Industries", "useCase": "x",
                        "steps": { "SMS": { "goal": "g", "prompt": "p" } } }"#;
        let err = Catalog::from_json(&minimal(dup)).unwrap_err();
        assert!(err.to_string().contains("duplicate industry"));
    }

    #[test]
    fn empty_steps_are_rejected() {
        let empty = r#", { "name": "Gaming", "useCase": "x", "steps": {} }"#;
        let err = Catalog::from_json(&minimal(empty)).unwrap_err();
        assert!(err.to_string().contains("no journey steps"));
    }

    #[test]
    fn duplicate_step_label_is_rejected() {
        let json = r#"{ "version": 1, "industries": [ { "name": "Other Industries",
            "useCase": "General Marketing",
            "steps": { "SMS": { "goal": "a", "prompt": "p" },
                       "SMS": { "goal": "b", "prompt": "p" } } } ] }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, BrandPitchError::Config { .. }));
        assert!(err.to_string().contains("duplicate step label"));
    }

    #[test]
    fn unknown_step_label_loads_and_is_reported() {
        let gaming = r#", { "name": "Gaming", "useCase": "Re-engagement",
            "steps": { "Inapp": { "goal": "a", "prompt": "p" },
                       "Push": { "goal": "b", "prompt": "p" } } }"#;
        let catalog = Catalog::from_json(&minimal(gaming)).unwrap();

        assert_eq!(catalog.unmapped_labels(), [("Gaming", "Inapp")]);

        let plan = crate::journey::expand("Gaming", &catalog);
        assert_eq!(plan.channel_order, [ChannelKey::Push]);
    }

    #[test]
    fn builtin_has_no_unmapped_labels() {
        assert!(Catalog::builtin().unwrap().unmapped_labels().is_empty());
    }

    #[test]
    fn missing_fallback_entry_is_rejected() {
        let json = r#"{ "version": 1, "industries": [ { "name": "Gaming",
            "useCase": "x", "steps": { "Push": { "goal": "g", "prompt": "p" } } } ] }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Other Industries"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::from_json(r#"{ "version": 1, "industries": [] }"#).unwrap_err();
        assert!(err.to_string().contains("no industries"));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = Catalog::load_from(Path::new("/nonexistent/industries.json")).unwrap_err();
        assert!(matches!(err, BrandPitchError::Io { .. }));
    }

    #[test]
    fn from_config_without_path_is_builtin() {
        let catalog = Catalog::from_config(&CatalogConfig::default()).unwrap();
        assert_eq!(&catalog, Catalog::builtin().unwrap());
    }

    #[test]
    fn from_config_reads_override() {
        let dir = std::env::temp_dir().join(format!("brandpitch-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("industries.json");
        std::fs::write(&path, minimal("")).unwrap();

        let config = CatalogConfig {
            path: Some(path.to_string_lossy().into_owned()),
        };
        let catalog = Catalog::from_config(&config).unwrap();
        assert_eq!(catalog.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
