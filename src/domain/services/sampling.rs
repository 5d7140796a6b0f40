use crate::domain::entities::recipe::Recipe;

/// Keeps the first `n` recipes of the loaded dataset, preserving order.
///
/// If `n` exceeds the sequence length, the whole sequence is returned.
pub fn keep_first_n(n: usize, mut recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes.truncate(n);
    recipes
}
