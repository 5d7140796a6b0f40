pub mod index_recipes;
