//! Multi-channel copy generation and record assembly.
//!
//! A single model call writes copy for all six channels at once. Parsing is
//! lenient per field (a missing or non-string field becomes an empty string)
//! and strict only about the payload being a JSON object.

use std::fmt::Write;

use brandpitch_llm::{ChatRequest, LlmClient, LlmError, parse_json_payload};
use brandpitch_shared::{
    BrandPitchError, BrandProfile, ChannelPlan, ContentRecord, GeneratedCopy, ModelSettings,
    Result, RunId,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;

/// Longest SMS body carriers deliver as one segment.
pub const SMS_MAX_CHARS: usize = 160;

/// The brand facts the generator writes about.
///
/// `description` is the profile's short description and is the field that
/// must be present. `background` carries the long description as extra
/// context when it adds something.
#[derive(Debug, Clone, Copy)]
pub struct BrandBrief<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub background: Option<&'a str>,
    pub logo: Option<&'a str>,
}

impl<'a> From<&'a BrandProfile> for BrandBrief<'a> {
    fn from(profile: &'a BrandProfile) -> Self {
        let long = profile.long_description.trim();
        let background = (!long.is_empty() && long != profile.description.trim())
            .then_some(profile.long_description.as_str());
        Self {
            name: &profile.name,
            description: &profile.description,
            background,
            logo: profile.logo.as_deref(),
        }
    }
}

/// Generate copy for every channel in one model round trip.
#[instrument(skip_all, fields(brand = %brand.name.trim(), industry = %industry, model = %settings.model))]
pub async fn generate(
    llm: &dyn LlmClient,
    settings: &ModelSettings,
    brand: BrandBrief<'_>,
    industry: &str,
    catalog: &Catalog,
) -> Result<GeneratedCopy> {
    if brand.name.trim().is_empty() {
        return Err(BrandPitchError::validation("brand name is empty"));
    }
    if brand.description.trim().is_empty() {
        return Err(BrandPitchError::validation("brand description is empty"));
    }

    let request = ChatRequest::json(
        &settings.model,
        system_prompt(),
        user_prompt(brand, industry, catalog),
        settings.generation_temperature,
    );

    let response = llm.complete(request).await.map_err(generation_error)?;
    let copy = parse_copy(&response.content)?;

    let missing = copy.missing_fields();
    if !missing.is_empty() {
        warn!(?missing, "model left copy fields empty");
    }

    info!(
        filled = GeneratedCopy::FIELD_NAMES.len() - missing.len(),
        tokens_out = response.tokens_out,
        latency_ms = response.latency_ms,
        "copy generated"
    );

    Ok(copy)
}

/// Combine brand facts, copy and plan into one record.
pub fn merge(
    run_id: RunId,
    industry: &str,
    brand: BrandProfile,
    copy: GeneratedCopy,
    plan: ChannelPlan,
) -> ContentRecord {
    ContentRecord {
        run_id,
        generated_at: Utc::now(),
        industry: industry.to_string(),
        brand,
        copy,
        plan,
    }
}

/// Channel guidance and the exact output keys.
pub fn system_prompt() -> String {
    String::from(
        "You are a CRM copywriter producing a multi-channel campaign for a brand.\n\n\
         Write copy for every channel below, in the brand's voice:\n\
         - SMS: one message of at most 160 characters, including any link placeholder.\n\
         - Push: a short title and a one-sentence message.\n\
         - Content Card: a title and a short description for an in-app feed.\n\
         - In-App: a title, a body of one or two sentences, and a call-to-action button label.\n\
         - Email: a subject line, a headline, a body of two or three short paragraphs, \
           and a call-to-action button label.\n\
         - WhatsApp: a friendly, conversational message.\n\n\
         Respond with a single JSON object whose values are all strings, with exactly \
         these keys:\n\
         smsMessage, pushTitle, pushMessage, cardTitle, cardDescription, inAppTitle, \
         inAppBody, inAppCtaText, emailSubject, emailHeadline, emailBody, emailCta, \
         whatsappMessage",
    )
}

fn user_prompt(brand: BrandBrief<'_>, industry: &str, catalog: &Catalog) -> String {
    let mut prompt = format!(
        "Brand name: {}\nBrand description: {}\n",
        brand.name.trim(),
        brand.description.trim()
    );
    if let Some(background) = brand.background {
        let _ = writeln!(prompt, "Brand background: {}", background.trim());
    }
    if let Some(logo) = brand.logo {
        let _ = writeln!(prompt, "Brand logo: {logo}");
    }
    let _ = writeln!(prompt, "Industry: {industry}");

    match catalog.get(industry) {
        Some(template) => {
            let _ = writeln!(prompt, "Use case: {}", template.use_case);
            let _ = writeln!(prompt, "\nJourney:");
            for (label, step) in template.steps.iter() {
                let _ = writeln!(prompt, "- {label}: {}", step.goal);
            }
        }
        None => debug!(industry, "industry not in catalog, prompting without journey"),
    }

    prompt
}

/// Read the copy fields out of model output.
///
/// Unparsable output is a generation error. Parsed output that is not an
/// object is a validation error. Anything else succeeds.
pub fn parse_copy(content: &str) -> Result<GeneratedCopy> {
    let value = parse_json_payload(content)
        .map_err(|e| BrandPitchError::Generation(format!("model output is not JSON: {e}")))?;

    let Value::Object(map) = value else {
        return Err(BrandPitchError::validation(
            "generated copy is not a JSON object",
        ));
    };

    let mut copy = GeneratedCopy::default();
    for name in GeneratedCopy::FIELD_NAMES {
        let Some(slot) = copy.field_mut(name) else {
            continue;
        };
        match map.get(name) {
            Some(Value::String(text)) => *slot = text.clone(),
            None | Some(Value::Null) => {}
            Some(other) => {
                warn!(field = name, kind = json_kind(other), "non-string copy field ignored");
            }
        }
    }

    let sms_chars = copy.sms_message.chars().count();
    if sms_chars > SMS_MAX_CHARS {
        warn!(sms_chars, limit = SMS_MAX_CHARS, "generated SMS exceeds one segment");
    }

    Ok(copy)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn generation_error(err: LlmError) -> BrandPitchError {
    BrandPitchError::Generation(err.to_string())
}
