pub mod openai_chat;
pub mod openai_embeddings;
pub mod recipe_agent;
pub mod recipe_search;
pub mod sampling;
