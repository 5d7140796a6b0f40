pub mod recipe_json_repository;
pub mod recipe_point_qdrant_repository;
