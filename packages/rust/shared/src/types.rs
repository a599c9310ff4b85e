//! Core domain types for the brand-to-campaign pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Minimum classifier confidence for a match to be accepted.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Industry substituted when classification is not trusted.
pub const FALLBACK_INDUSTRY: &str = "Other Industries";

/// Use case substituted when classification is not trusted.
pub const FALLBACK_USE_CASE: &str = "General Marketing";

/// Confidence reported for the fallback determination.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Internal channel key. Distinct from the display labels used in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKey {
    Sms,
    Push,
    Email,
    Card,
    InApp,
    Whatsapp,
}

/// Fixed display label → channel key table.
pub const CHANNEL_LABELS: [(&str, ChannelKey); 6] = [
    ("SMS", ChannelKey::Sms),
    ("Push", ChannelKey::Push),
    ("Email", ChannelKey::Email),
    ("Content Card", ChannelKey::Card),
    ("In-App", ChannelKey::InApp),
    ("WhatsApp", ChannelKey::Whatsapp),
];

impl ChannelKey {
    /// All keys in display-table order.
    pub const ALL: [ChannelKey; 6] = [
        ChannelKey::Sms,
        ChannelKey::Push,
        ChannelKey::Email,
        ChannelKey::Card,
        ChannelKey::InApp,
        ChannelKey::Whatsapp,
    ];

    /// Map a template display label to its key. Exact match only.
    pub fn from_label(label: &str) -> Option<Self> {
        CHANNEL_LABELS
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, key)| *key)
    }

    /// Display label used in templates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Push => "Push",
            Self::Email => "Email",
            Self::Card => "Content Card",
            Self::InApp => "In-App",
            Self::Whatsapp => "WhatsApp",
        }
    }

    /// Serialized key (`sms`, `in_app`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Push => "push",
            Self::Email => "email",
            Self::Card => "card",
            Self::InApp => "in_app",
            Self::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IndustryTemplate
// ---------------------------------------------------------------------------

/// One journey step of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    /// Narrative goal shown in the pitch view.
    pub goal: String,
    /// Example message prompt for the step.
    pub prompt: String,
    /// Optional message sub-type (e.g. "Slideup", "Modal").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub step_type: Option<String>,
}

/// Ordered label → step mapping. Declared order is significant, so this is
/// stored as a sequence and (de)serialized as a JSON object in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSteps(Vec<(String, TemplateStep)>);

impl TemplateSteps {
    /// Build from pairs. Later duplicates of a label are rejected by `None`.
    pub fn from_pairs(pairs: Vec<(String, TemplateStep)>) -> Option<Self> {
        for (i, (label, _)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(l, _)| l == label) {
                return None;
            }
        }
        Some(Self(pairs))
    }

    /// Iterate `(label, step)` in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateStep)> {
        self.0.iter().map(|(label, step)| (label.as_str(), step))
    }

    /// Look up a step by exact label.
    pub fn get(&self, label: &str) -> Option<&TemplateStep> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, step)| step)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TemplateSteps {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, step) in &self.0 {
            map.serialize_entry(label, step)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TemplateSteps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StepsVisitor;

        impl<'de> Visitor<'de> for StepsVisitor {
            type Value = TemplateSteps;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of channel label to journey step")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut pairs: Vec<(String, TemplateStep)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, step)) = access.next_entry::<String, TemplateStep>()? {
                    if pairs.iter().any(|(l, _)| *l == label) {
                        return Err(de::Error::custom(format!(
                            "duplicate step label '{label}'"
                        )));
                    }
                    pairs.push((label, step));
                }
                Ok(TemplateSteps(pairs))
            }
        }

        deserializer.deserialize_map(StepsVisitor)
    }
}

/// A catalog entry: one industry, its marketing use case, and its journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryTemplate {
    /// Unique catalog key.
    pub name: String,
    pub use_case: String,
    pub steps: TemplateSteps,
}

// ---------------------------------------------------------------------------
// BrandProfile
// ---------------------------------------------------------------------------

/// One brand color as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColor {
    pub hex: String,
    #[serde(rename = "type")]
    pub color_type: String,
}

/// Canonical brand facts for one lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub name: String,
    /// Normalized domain (empty for manually entered brands).
    pub domain: String,
    pub description: String,
    pub long_description: String,
    /// Logo URL (SVG preferred over PNG).
    pub logo: Option<String>,
    /// Primary (or accent) hex color.
    pub primary_color: Option<String>,
    /// All provider colors, in provider order.
    #[serde(default)]
    pub all_colors: Vec<BrandColor>,
}

impl BrandProfile {
    /// Brand facts typed in by a user when provider lookup is unavailable.
    pub fn manual(name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            name: name.into(),
            domain: String::new(),
            long_description: description.clone(),
            description,
            logo: None,
            primary_color: None,
            all_colors: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// IndustryDetermination
// ---------------------------------------------------------------------------

/// Result of industry classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryDetermination {
    pub industry: String,
    pub use_case: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl IndustryDetermination {
    /// The fixed triple used when classification is not trusted.
    pub fn fallback() -> Self {
        Self {
            industry: FALLBACK_INDUSTRY.into(),
            use_case: FALLBACK_USE_CASE.into(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

// ---------------------------------------------------------------------------
// ChannelPlan
// ---------------------------------------------------------------------------

/// Channel sequence and pitch flags expanded from a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPlan {
    /// Channels in the template's declared order.
    pub channel_order: Vec<ChannelKey>,
    /// Always holds all six keys.
    pub per_channel_in_pitch: BTreeMap<ChannelKey, bool>,
    /// Goals for the channels present in the template.
    pub per_channel_goal: BTreeMap<ChannelKey, String>,
}

impl ChannelPlan {
    /// A plan with no channels in the pitch.
    pub fn empty() -> Self {
        Self {
            channel_order: Vec::new(),
            per_channel_in_pitch: ChannelKey::ALL.iter().map(|k| (*k, false)).collect(),
            per_channel_goal: BTreeMap::new(),
        }
    }

    pub fn in_pitch(&self, key: ChannelKey) -> bool {
        self.per_channel_in_pitch.get(&key).copied().unwrap_or(false)
    }

    pub fn goal(&self, key: ChannelKey) -> Option<&str> {
        self.per_channel_goal.get(&key).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// GeneratedCopy
// ---------------------------------------------------------------------------

/// Marketing copy for every channel. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratedCopy {
    pub sms_message: String,
    pub push_title: String,
    pub push_message: String,
    pub card_title: String,
    pub card_description: String,
    pub in_app_title: String,
    pub in_app_body: String,
    pub in_app_cta_text: String,
    pub email_subject: String,
    pub email_headline: String,
    pub email_body: String,
    pub email_cta: String,
    pub whatsapp_message: String,
}

impl GeneratedCopy {
    /// Wire names of every copy field, in channel order.
    pub const FIELD_NAMES: [&'static str; 13] = [
        "smsMessage",
        "pushTitle",
        "pushMessage",
        "cardTitle",
        "cardDescription",
        "inAppTitle",
        "inAppBody",
        "inAppCtaText",
        "emailSubject",
        "emailHeadline",
        "emailBody",
        "emailCta",
        "whatsappMessage",
    ];

    /// Mutable slot for a wire field name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "smsMessage" => &mut self.sms_message,
            "pushTitle" => &mut self.push_title,
            "pushMessage" => &mut self.push_message,
            "cardTitle" => &mut self.card_title,
            "cardDescription" => &mut self.card_description,
            "inAppTitle" => &mut self.in_app_title,
            "inAppBody" => &mut self.in_app_body,
            "inAppCtaText" => &mut self.in_app_cta_text,
            "emailSubject" => &mut self.email_subject,
            "emailHeadline" => &mut self.email_headline,
            "emailBody" => &mut self.email_body,
            "emailCta" => &mut self.email_cta,
            "whatsappMessage" => &mut self.whatsapp_message,
            _ => return None,
        };
        Some(slot)
    }

    /// `(wire name, value)` pairs in channel order.
    pub fn fields(&self) -> [(&'static str, &str); 13] {
        [
            ("smsMessage", &self.sms_message),
            ("pushTitle", &self.push_title),
            ("pushMessage", &self.push_message),
            ("cardTitle", &self.card_title),
            ("cardDescription", &self.card_description),
            ("inAppTitle", &self.in_app_title),
            ("inAppBody", &self.in_app_body),
            ("inAppCtaText", &self.in_app_cta_text),
            ("emailSubject", &self.email_subject),
            ("emailHeadline", &self.email_headline),
            ("emailBody", &self.email_body),
            ("emailCta", &self.email_cta),
            ("whatsappMessage", &self.whatsapp_message),
        ]
    }

    /// Names of fields the model left empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ContentRecord
// ---------------------------------------------------------------------------

/// The merged, channel-complete record handed to preview rendering.
///
/// Serializes as one flat camelCase object: brand fields, copy fields and
/// plan fields side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    /// Industry the plan was expanded from.
    pub industry: String,
    #[serde(flatten)]
    pub brand: BrandProfile,
    #[serde(flatten)]
    pub copy: GeneratedCopy,
    #[serde(flatten)]
    pub plan: ChannelPlan,
}
