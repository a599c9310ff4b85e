//! Industry classification.
//!
//! One model call picks the catalog entry that best fits a brand. The answer
//! is then gated: a confidence under [`CONFIDENCE_THRESHOLD`] or an industry
//! name the catalog does not know collapses to
//! [`IndustryDetermination::fallback`].

use std::fmt::Write;

use brandpitch_llm::{ChatRequest, LlmClient, LlmError, parse_json_payload};
use brandpitch_shared::{
    BrandPitchError, CONFIDENCE_THRESHOLD, IndustryDetermination, ModelSettings, Result,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::catalog::Catalog;

/// The model's answer before the confidence gate.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetermination {
    pub industry: String,
    pub use_case: Option<String>,
    pub confidence: f64,
}

/// Classify a brand into one catalog industry.
#[instrument(skip_all, fields(brand = %brand_name.trim(), model = %settings.model))]
pub async fn classify(
    llm: &dyn LlmClient,
    settings: &ModelSettings,
    brand_name: &str,
    brand_description: &str,
    catalog: &Catalog,
) -> Result<IndustryDetermination> {
    if brand_name.trim().is_empty() {
        return Err(BrandPitchError::Classification(
            "brand name is empty".to_string(),
        ));
    }
    if brand_description.trim().is_empty() {
        return Err(BrandPitchError::Classification(
            "brand description is empty".to_string(),
        ));
    }

    let request = ChatRequest::json(
        &settings.model,
        system_prompt(catalog),
        user_prompt(brand_name, brand_description),
        settings.classification_temperature,
    );

    let response = llm.complete(request).await.map_err(classification_error)?;
    let raw = parse_determination(&response.content)?;
    let determination = apply_gate(raw, catalog);

    info!(
        industry = %determination.industry,
        use_case = %determination.use_case,
        confidence = determination.confidence,
        fallback = determination.is_fallback(),
        latency_ms = response.latency_ms,
        "brand classified"
    );

    Ok(determination)
}

/// Instructions plus the full catalog: every name, use case and step goal.
pub fn system_prompt(catalog: &Catalog) -> String {
    let mut prompt = String::from(
        "You are a marketing strategist. Match the brand to the single best \
         industry from the catalog below.\n\n\
         Respond with a JSON object with exactly these fields:\n\
         - \"industry\": the industry name, copied exactly from the catalog\n\
         - \"useCase\": that industry's use case, copied exactly from the catalog\n\
         - \"confidence\": a number from 0 to 1\n\n\
         If no industry fits well, answer with a low confidence.\n\n\
         Catalog:\n",
    );

    for template in catalog.templates() {
        let _ = writeln!(prompt, "\n## {}", template.name);
        let _ = writeln!(prompt, "Use case: {}", template.use_case);
        for (label, step) in template.steps.iter() {
            let _ = writeln!(prompt, "- {label}: {}", step.goal);
        }
    }

    prompt
}

fn user_prompt(brand_name: &str, brand_description: &str) -> String {
    format!(
        "Brand name: {}\nBrand description: {}",
        brand_name.trim(),
        brand_description.trim()
    )
}

/// Read `{industry, useCase, confidence}` out of model output.
pub fn parse_determination(content: &str) -> Result<RawDetermination> {
    let value = parse_json_payload(content).map_err(|e| {
        BrandPitchError::Classification(format!("model output is not JSON: {e}"))
    })?;

    let Value::Object(map) = value else {
        return Err(BrandPitchError::Classification(
            "model output is not a JSON object".into(),
        ));
    };

    let industry = map
        .get("industry")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            BrandPitchError::Classification("model output has no string 'industry'".into())
        })?
        .to_string();

    let use_case = map
        .get("useCase")
        .and_then(Value::as_str)
        .map(str::to_string);

    let confidence = map
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .ok_or_else(|| {
            BrandPitchError::Classification("model output has no numeric 'confidence'".into())
        })?;

    Ok(RawDetermination {
        industry,
        use_case,
        confidence,
    })
}

/// Apply the confidence gate and resolve the use case from the catalog.
pub fn apply_gate(raw: RawDetermination, catalog: &Catalog) -> IndustryDetermination {
    let confidence = raw.confidence.clamp(0.0, 1.0);

    if confidence < CONFIDENCE_THRESHOLD {
        info!(
            industry = %raw.industry,
            confidence,
            "confidence below threshold, using fallback industry"
        );
        return IndustryDetermination::fallback();
    }

    let Some(template) = catalog.get(&raw.industry) else {
        warn!(industry = %raw.industry, "model chose an industry outside the catalog");
        return IndustryDetermination::fallback();
    };

    if let Some(use_case) = raw.use_case.as_deref() {
        if use_case != template.use_case {
            warn!(
                industry = %template.name,
                model_use_case = use_case,
                catalog_use_case = %template.use_case,
                "model use case differs from catalog"
            );
        }
    }

    IndustryDetermination {
        industry: template.name.clone(),
        use_case: template.use_case.clone(),
        confidence,
    }
}

fn classification_error(err: LlmError) -> BrandPitchError {
    BrandPitchError::Classification(err.to_string())
}
