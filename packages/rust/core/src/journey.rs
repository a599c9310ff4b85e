//! Journey expansion: industry template → channel plan.
//!
//! Pure and infallible. An unknown industry yields [`ChannelPlan::empty`].

use brandpitch_shared::{ChannelKey, ChannelPlan, IndustryTemplate};
use tracing::debug;

use crate::catalog::Catalog;

/// Expand the named industry's journey into a [`ChannelPlan`].
pub fn expand(industry: &str, catalog: &Catalog) -> ChannelPlan {
    match catalog.get(industry) {
        Some(template) => expand_template(template),
        None => {
            debug!(industry, "industry not in catalog, empty channel plan");
            ChannelPlan::empty()
        }
    }
}

/// Expand one template. Channel order follows the declared step order;
/// labels outside the fixed label table are skipped.
pub fn expand_template(template: &IndustryTemplate) -> ChannelPlan {
    let mut plan = ChannelPlan::empty();

    for (label, step) in template.steps.iter() {
        let Some(key) = ChannelKey::from_label(label) else {
            debug!(industry = %template.name, label, "skipping unmapped step label");
            continue;
        };
        if plan.in_pitch(key) {
            continue;
        }
        plan.per_channel_in_pitch.insert(key, true);
        plan.per_channel_goal.insert(key, step.goal.clone());
        plan.channel_order.push(key);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandpitch_shared::{TemplateStep, TemplateSteps};

    fn step(goal: &str) -> TemplateStep {
        TemplateStep {
            goal: goal.into(),
            prompt: String::new(),
            step_type: None,
        }
    }

    fn template(labels: &[&str]) -> IndustryTemplate {
        IndustryTemplate {
            name: "Test".into(),
            use_case: "Test".into(),
            steps: TemplateSteps::from_pairs(
                labels
                    .iter()
                    .map(|l| (l.to_string(), step(&format!("goal for {l}"))))
                    .collect(),
            )
            .unwrap(),
        }
    }

    #[test]
    fn retail_plan_follows_declared_order() {
        let catalog = Catalog::builtin().unwrap();
        let plan = expand("Retail & Consumer Goods", catalog);

        assert_eq!(
            plan.channel_order,
            [ChannelKey::InApp, ChannelKey::Email, ChannelKey::Sms]
        );
        assert!(plan.in_pitch(ChannelKey::Sms));
        assert!(!plan.in_pitch(ChannelKey::Push));
        assert!(!plan.in_pitch(ChannelKey::Card));
        assert!(!plan.in_pitch(ChannelKey::Whatsapp));
        assert_eq!(
            plan.goal(ChannelKey::Sms),
            Some("Close the sale with a short, time-bound nudge.")
        );
        assert!(plan.goal(ChannelKey::Push).is_none());
    }

    #[test]
    fn unknown_industry_is_empty_plan() {
        let catalog = Catalog::builtin().unwrap();
        let plan = expand("nonexistent-industry", catalog);

        assert!(plan.channel_order.is_empty());
        assert_eq!(plan.per_channel_in_pitch.len(), 6);
        assert!(plan.per_channel_in_pitch.values().all(|v| !v));
        assert!(plan.per_channel_goal.is_empty());
    }

    #[test]
    fn every_catalog_entry_expands_completely() {
        let catalog = Catalog::builtin().unwrap();
        for template in catalog.templates() {
            let plan = expand(&template.name, catalog);

            assert_eq!(plan.channel_order.len(), template.steps.len(), "{}", template.name);

            let declared: Vec<ChannelKey> = template
                .steps
                .iter()
                .filter_map(|(label, _)| ChannelKey::from_label(label))
                .collect();
            assert_eq!(plan.channel_order, declared, "{}", template.name);

            for key in ChannelKey::ALL {
                assert_eq!(
                    plan.in_pitch(key),
                    template.steps.contains_label(key.label()),
                    "{}: {key}",
                    template.name
                );
            }
        }
    }

    #[test]
    fn unmapped_labels_are_skipped() {
        let plan = expand_template(&template(&["Email", "Fax", "Push"]));
        assert_eq!(plan.channel_order, [ChannelKey::Email, ChannelKey::Push]);
        assert_eq!(plan.per_channel_goal.len(), 2);
    }

    #[test]
    fn goals_are_copied_verbatim() {
        let plan = expand_template(&template(&["WhatsApp", "Content Card"]));
        assert_eq!(plan.goal(ChannelKey::Whatsapp), Some("goal for WhatsApp"));
        assert_eq!(plan.goal(ChannelKey::Card), Some("goal for Content Card"));
    }
}
