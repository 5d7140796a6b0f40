pub mod chat_completion;
pub mod embeddings_generator;
pub mod recipe_point_repository;
pub mod recipe_resolver;
