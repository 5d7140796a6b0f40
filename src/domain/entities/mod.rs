pub mod recipe;
pub mod recipe_point;
