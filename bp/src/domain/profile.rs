//! Questionnaire profile types
//!
//! A flat snapshot of the user's questionnaire answers across three
//! screens: personal metrics, lifestyle habits, and goals. The JSON layout
//! (camelCase keys) is the persisted `formData` slot format and the form
//! the profile takes when serialized into a prompt. It carries no
//! timestamps, so its serialization is deterministic.

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};

/// A frozen record of the user's questionnaire answers
///
/// Created empty, mutated incrementally as the user works through the
/// question screens, serialized at the moment a blueprint is requested.
/// Unanswered text fields are empty strings; sliders and toggles always
/// hold a value (the form defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionnaireSnapshot {
    // Personal details
    pub age: String,
    pub weight: String,
    pub height: String,
    pub biological_sex: String,
    pub medical_conditions: Vec<String>,
    pub body_fat_percentage: String,
    pub resting_heart_rate: String,
    pub blood_pressure: String,
    pub medications: String,

    // Lifestyle
    pub sleep_hours: f64,
    pub sleep_quality: String,
    pub sleep_consistency: String,
    pub stress_level: u8,
    pub stress_management: Vec<String>,
    pub exercise_hours: f64,
    pub exercise_types: Vec<String>,
    pub activity_level: String,
    pub screen_time: f64,
    pub caffeine_intake: String,
    pub alcohol_consumption: String,
    pub smoking_habit: String,

    // Goals
    pub primary_goal: String,
    pub timeframe: String,
    pub dietary_preferences: Vec<String>,
    pub food_sensitivities: String,
    pub intermittent_fasting: bool,
    pub mental_goals: Vec<String>,
    pub longevity_focus: String,
    pub goals: Vec<String>,
}

impl Default for QuestionnaireSnapshot {
    fn default() -> Self {
        Self {
            age: String::new(),
            weight: String::new(),
            height: String::new(),
            biological_sex: String::new(),
            medical_conditions: Vec::new(),
            body_fat_percentage: String::new(),
            resting_heart_rate: String::new(),
            blood_pressure: String::new(),
            medications: String::new(),

            sleep_hours: 7.0,
            sleep_quality: "Average".to_string(),
            sleep_consistency: "Somewhat Regular".to_string(),
            stress_level: 5,
            stress_management: Vec::new(),
            exercise_hours: 3.0,
            exercise_types: Vec::new(),
            activity_level: "Moderately Active".to_string(),
            screen_time: 4.0,
            caffeine_intake: "Moderate".to_string(),
            alcohol_consumption: "Occasional".to_string(),
            smoking_habit: "None".to_string(),

            primary_goal: String::new(),
            timeframe: "Long-Term".to_string(),
            dietary_preferences: Vec::new(),
            food_sensitivities: String::new(),
            intermittent_fasting: false,
            mental_goals: Vec::new(),
            longevity_focus: "Committed".to_string(),
            goals: Vec::new(),
        }
    }
}

impl QuestionnaireSnapshot {
    /// Whether the named field holds no answer yet
    ///
    /// Field names are the camelCase JSON keys. Numeric and boolean fields
    /// always hold a value. Unknown names return `None` so callers can
    /// decide how strict to be.
    pub fn field_is_empty(&self, field: &str) -> Option<bool> {
        let empty = match field {
            "age" => self.age.is_empty(),
            "weight" => self.weight.is_empty(),
            "height" => self.height.is_empty(),
            "biologicalSex" => self.biological_sex.is_empty(),
            "medicalConditions" => self.medical_conditions.is_empty(),
            "bodyFatPercentage" => self.body_fat_percentage.is_empty(),
            "restingHeartRate" => self.resting_heart_rate.is_empty(),
            "bloodPressure" => self.blood_pressure.is_empty(),
            "medications" => self.medications.is_empty(),
            "sleepQuality" => self.sleep_quality.is_empty(),
            "sleepConsistency" => self.sleep_consistency.is_empty(),
            "stressManagement" => self.stress_management.is_empty(),
            "exerciseTypes" => self.exercise_types.is_empty(),
            "activityLevel" => self.activity_level.is_empty(),
            "caffeineIntake" => self.caffeine_intake.is_empty(),
            "alcoholConsumption" => self.alcohol_consumption.is_empty(),
            "smokingHabit" => self.smoking_habit.is_empty(),
            "primaryGoal" => self.primary_goal.is_empty(),
            "timeframe" => self.timeframe.is_empty(),
            "dietaryPreferences" => self.dietary_preferences.is_empty(),
            "foodSensitivities" => self.food_sensitivities.is_empty(),
            "mentalGoals" => self.mental_goals.is_empty(),
            "longevityFocus" => self.longevity_focus.is_empty(),
            "goals" => self.goals.is_empty(),
            "sleepHours" | "stressLevel" | "exerciseHours" | "screenTime" | "intermittentFasting" => false,
            _ => return None,
        };
        Some(empty)
    }

    /// Apply a single field assignment from text input
    ///
    /// List fields take comma-separated values; numeric and boolean fields
    /// are parsed and reported as errors when unparseable.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "age" => self.age = value.to_string(),
            "weight" => self.weight = value.to_string(),
            "height" => self.height = value.to_string(),
            "biologicalSex" => self.biological_sex = value.to_string(),
            "medicalConditions" => self.medical_conditions = split_list(value),
            "bodyFatPercentage" => self.body_fat_percentage = value.to_string(),
            "restingHeartRate" => self.resting_heart_rate = value.to_string(),
            "bloodPressure" => self.blood_pressure = value.to_string(),
            "medications" => self.medications = value.to_string(),
            "sleepHours" => self.sleep_hours = parse_number(field, value)?,
            "sleepQuality" => self.sleep_quality = value.to_string(),
            "sleepConsistency" => self.sleep_consistency = value.to_string(),
            "stressLevel" => {
                self.stress_level = value.parse().context(format!("Invalid value for {}: '{}'", field, value))?
            }
            "stressManagement" => self.stress_management = split_list(value),
            "exerciseHours" => self.exercise_hours = parse_number(field, value)?,
            "exerciseTypes" => self.exercise_types = split_list(value),
            "activityLevel" => self.activity_level = value.to_string(),
            "screenTime" => self.screen_time = parse_number(field, value)?,
            "caffeineIntake" => self.caffeine_intake = value.to_string(),
            "alcoholConsumption" => self.alcohol_consumption = value.to_string(),
            "smokingHabit" => self.smoking_habit = value.to_string(),
            "primaryGoal" => self.primary_goal = value.to_string(),
            "timeframe" => self.timeframe = value.to_string(),
            "dietaryPreferences" => self.dietary_preferences = split_list(value),
            "foodSensitivities" => self.food_sensitivities = value.to_string(),
            "intermittentFasting" => {
                self.intermittent_fasting = value.parse().context(format!("Invalid value for {}: '{}'", field, value))?
            }
            "mentalGoals" => self.mental_goals = split_list(value),
            "longevityFocus" => self.longevity_focus = value.to_string(),
            "goals" => self.goals = split_list(value),
            other => return Err(eyre!("Unknown field: '{}'", other)),
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    value.parse().context(format!("Invalid value for {}: '{}'", field, value))
}
