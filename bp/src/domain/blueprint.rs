//! Blueprint result type

use serde::{Deserialize, Serialize};

/// The structured blueprint document produced from a completed questionnaire
///
/// All four content sections are always present as strings - even for a
/// failed generation they hold readable error text - so rendering never has
/// to handle an absent section. Each regeneration replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintResult {
    /// Sleep recommendations, Markdown
    pub sleep_optimization: String,

    /// Exercise recommendations, Markdown
    pub exercise_protocol: String,

    /// Nutrition recommendations, Markdown
    pub nutrition_plan: String,

    /// Longevity insights and everything else, Markdown
    pub personal_recommendations: String,

    /// Set when generation failed, or when the model reported a soft error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable detail accompanying `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BlueprintResult {
    /// True when this result records a failed or partially failed generation
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Render the populated sections as one Markdown document
    pub fn to_markdown(&self) -> String {
        let mut doc = String::from("# Your Personalized Longevity Blueprint\n");

        for section in [
            &self.sleep_optimization,
            &self.exercise_protocol,
            &self.nutrition_plan,
            &self.personal_recommendations,
        ] {
            if !section.is_empty() {
                doc.push('\n');
                doc.push_str(section);
                doc.push('\n');
            }
        }

        doc
    }
}
