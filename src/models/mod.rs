pub mod schema;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Outcome of analyzing one uploaded photo.
///
/// On the wire this is the `isFood`-tagged object the client expects:
/// `{"isFood": false}` or `{"isFood": true, "dishName": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    NotFood,
    Food(FoodDetails),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetails {
    pub dish_name: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub cooking_time: String,
    pub servings: String,
    /// Display order, as returned by the model.
    pub ingredients: Vec<String>,
    /// Step order, as returned by the model.
    pub instructions: Vec<String>,
    pub nutrition_info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

impl AnalysisResult {
    pub fn is_food(&self) -> bool {
        matches!(self, AnalysisResult::Food(_))
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisResult::NotFood => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("isFood", &false)?;
                map.end()
            }
            AnalysisResult::Food(details) => {
                #[derive(Serialize)]
                #[serde(rename_all = "camelCase")]
                struct Tagged<'a> {
                    is_food: bool,
                    #[serde(flatten)]
                    details: &'a FoodDetails,
                }

                Tagged {
                    is_food: true,
                    details,
                }
                .serialize(serializer)
            }
        }
    }
}
