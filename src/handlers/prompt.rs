/// Exact reply skeleton for a food photo, shown verbatim to the model.
pub const FOOD_SHAPE: &str = r#"{
"isFood": true,
"dishName": string,
"cuisine": string,
"difficulty": "easy" | "medium" | "hard",
"cookingTime": string,
"servings": string,
"ingredients": [string, ...],
"instructions": [string, ...],
"nutritionInfo": string
}"#;

/// Exact reply skeleton for anything else.
pub const NOT_FOOD_SHAPE: &str = r#"{
"isFood": false
}"#;

/// Builds the single-turn instruction for one stored image.
///
/// The fields are described twice, once in prose and once as the JSON
/// skeletons above, since JSON mode only guarantees syntactically valid JSON.
pub fn build_prompt(image_url: &str) -> String {
    format!(
        "This is an image of food at URL: {url}. Analyze it and answer the following:\n\
         \n\
         - **Is Food**: Is this image of a food dish? (true/false)\n\
         - If yes, provide:\n\
         - **Dish Name**: Name of the dish\n\
         - **Cuisine**: Type of cuisine (e.g., Italian, Indian, etc.)\n\
         - **Difficulty**: How hard is it to make? (easy, medium, hard)\n\
         - **Cooking Time**: Estimated time to cook\n\
         - **Servings**: Number of servings\n\
         - **Ingredients**: List of ingredients\n\
         - **Instructions**: Step-by-step instructions\n\
         - **Nutrition Info**: Short nutrition summary\n\
         - If not food, return only {{ \"isFood\": false }}\n\
         \n\
         Respond ONLY in JSON format with this structure:\n\
         If food:\n\
         {food}\n\
         If not food:\n\
         {not_food}",
        url = image_url,
        food = FOOD_SHAPE,
        not_food = NOT_FOOD_SHAPE,
    )
}
