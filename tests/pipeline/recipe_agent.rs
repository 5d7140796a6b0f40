use std::sync::Arc;

use recipe_recommendation_service::{
    domain::services::recipe_agent::{RecipeAgent, RecipeAgentError},
    ports::chat_completion::ChatMessage,
};

use crate::helpers::{assistant_tool_call, recipe, ScriptedChatCompletion, StubRecipeResolver};

#[tokio::test]
async fn on_a_tool_calling_model_it_executes_the_tool_and_returns_the_final_answer() {
    // Arrange: the model first asks for the tool, then composes an answer
    let chat_completion = Arc::new(ScriptedChatCompletion::new(vec![
        assistant_tool_call("cheese"),
        ChatMessage::assistant("Try the Cheese Toast!"),
    ]));
    let resolver = Arc::new(StubRecipeResolver::new(vec![recipe(
        "Cheese Toast",
        "cheese, bread",
    )]));

    let agent = RecipeAgent::new(chat_completion, resolver.clone(), 3, 5);

    // Act
    let answer = agent.invoke("I have cheese, what can I cook?").await.unwrap();

    // Assert: the resolver was queried with the model's arguments
    assert_eq!(answer, "Try the Cheese Toast!");
    assert_eq!(*resolver.requests.lock().await, vec!["cheese".to_string()]);
}

#[tokio::test]
async fn on_a_model_answering_directly_it_never_invokes_the_tool() {
    let chat_completion = Arc::new(ScriptedChatCompletion::new(vec![ChatMessage::assistant(
        "You could cook almost anything!",
    )]));
    let resolver = Arc::new(StubRecipeResolver::new(vec![]));

    let agent = RecipeAgent::new(chat_completion, resolver.clone(), 3, 5);

    let answer = agent.invoke("What should I eat tonight?").await.unwrap();

    assert_eq!(answer, "You could cook almost anything!");
    assert!(resolver.requests.lock().await.is_empty());
}

#[tokio::test]
async fn on_a_model_that_keeps_calling_tools_it_stops_after_max_steps() {
    let chat_completion = Arc::new(ScriptedChatCompletion::new(vec![
        assistant_tool_call("cheese"),
        assistant_tool_call("bread"),
        assistant_tool_call("butter"),
    ]));
    let resolver = Arc::new(StubRecipeResolver::new(vec![recipe(
        "Cheese Toast",
        "cheese, bread",
    )]));

    let agent = RecipeAgent::new(chat_completion, resolver, 3, 2);

    let error = agent.invoke("cheese?").await.unwrap_err();

    assert!(matches!(error, RecipeAgentError::MaxStepsExceeded(2)));
}

#[tokio::test]
async fn on_malformed_tool_arguments_it_fails() {
    let mut bad_call = assistant_tool_call("cheese");
    if let Some(tool_calls) = bad_call.tool_calls.as_mut() {
        tool_calls[0].function.arguments = "not json".into();
    }

    let chat_completion = Arc::new(ScriptedChatCompletion::new(vec![bad_call]));
    let resolver = Arc::new(StubRecipeResolver::new(vec![]));

    let agent = RecipeAgent::new(chat_completion, resolver, 3, 5);

    let error = agent.invoke("cheese?").await.unwrap_err();

    assert!(matches!(error, RecipeAgentError::InvalidToolArguments(_, _)));
}
