mod helpers;

mod recipe_agent;
