//! Validation of the model's JSON reply.
//!
//! The completion text is untrusted. It only becomes an [`AnalysisResult`]
//! after passing [`parse_analysis`]; nothing reads fields off the raw JSON.

use serde_json::Value;
use thiserror::Error;

use super::{AnalysisResult, FoodDetails};

pub const DISCRIMINATOR: &str = "isFood";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    Json(serde_json::Error),

    #[error("expected a boolean `isFood` field, found {0}")]
    Discriminant(String),

    #[error("food analysis does not match schema: {0}")]
    Shape(serde_json::Error),
}

/// Parses raw completion text and validates it against the two allowed shapes.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, SchemaError> {
    let value: Value = serde_json::from_str(content).map_err(SchemaError::Json)?;
    validate(value)
}

/// Validates an already-parsed JSON value.
///
/// `isFood: false` yields [`AnalysisResult::NotFood`]; any other keys on a
/// negative answer are dropped. `isFood: true` requires every food field.
pub fn validate(value: Value) -> Result<AnalysisResult, SchemaError> {
    match value.get(DISCRIMINATOR) {
        Some(Value::Bool(false)) => Ok(AnalysisResult::NotFood),
        Some(Value::Bool(true)) => serde_json::from_value::<FoodDetails>(value)
            .map(AnalysisResult::Food)
            .map_err(SchemaError::Shape),
        Some(other) => Err(SchemaError::Discriminant(format!("`{}`", other))),
        None => Err(SchemaError::Discriminant(describe(&value).to_string())),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "an object without it",
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    const FULL_FOOD: &str = r#"{
        "isFood": true,
        "dishName": "Pad Thai",
        "cuisine": "Thai",
        "difficulty": "medium",
        "cookingTime": "30 minutes",
        "servings": "2",
        "ingredients": ["rice noodles", "shrimp", "tamarind paste", "peanuts"],
        "instructions": ["Soak noodles", "Stir-fry shrimp", "Add sauce", "Top with peanuts"],
        "nutritionInfo": "About 600 kcal per serving"
    }"#;

    #[test]
    fn test_full_food_answer() {
        let result = parse_analysis(FULL_FOOD).unwrap();
        let AnalysisResult::Food(details) = result else {
            panic!("expected food variant");
        };

        assert_eq!(details.dish_name, "Pad Thai");
        assert_eq!(details.difficulty, Difficulty::Medium);
        assert_eq!(
            details.instructions,
            vec!["Soak noodles", "Stir-fry shrimp", "Add sauce", "Top with peanuts"]
        );
        assert_eq!(details.ingredients[3], "peanuts");
    }

    #[test]
    fn test_not_food_answer() {
        assert_eq!(parse_analysis(r#"{"isFood": false}"#).unwrap(), AnalysisResult::NotFood);
    }

    #[test]
    fn test_not_food_extra_keys_dropped() {
        let result = parse_analysis(r#"{"isFood": false, "dishName": "Shoe"}"#).unwrap();
        assert_eq!(result, AnalysisResult::NotFood);
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"isFood":false}"#);
    }

    #[test]
    fn test_trailing_comma_is_json_error() {
        let err = parse_analysis(r#"{"isFood": false,}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON:"));
    }

    #[test]
    fn test_missing_dish_name() {
        let err = parse_analysis(r#"{"isFood": true}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Shape(_)));
        assert!(err.to_string().contains("dishName"));
    }

    #[test]
    fn test_unknown_difficulty() {
        let content = FULL_FOOD.replace(r#""medium""#, r#""extreme""#);
        let err = parse_analysis(&content).unwrap_err();
        assert!(err.to_string().contains("extreme"));
    }

    #[test]
    fn test_ingredients_must_be_strings() {
        let content = FULL_FOOD.replace(r#""peanuts""#, "42");
        assert!(matches!(parse_analysis(&content), Err(SchemaError::Shape(_))));
    }

    #[test]
    fn test_numeric_servings_rejected() {
        let content = FULL_FOOD.replace(r#""servings": "2""#, r#""servings": 2"#);
        assert!(matches!(parse_analysis(&content), Err(SchemaError::Shape(_))));
    }

    #[test]
    fn test_discriminator_problems() {
        let missing = parse_analysis(r#"{"dishName": "Soup"}"#).unwrap_err();
        assert!(matches!(missing, SchemaError::Discriminant(_)));

        let stringly = parse_analysis(r#"{"isFood": "true"}"#).unwrap_err();
        assert!(stringly.to_string().contains(r#""true""#));

        let array = parse_analysis("[]").unwrap_err();
        assert!(array.to_string().contains("an array"));
    }
}
