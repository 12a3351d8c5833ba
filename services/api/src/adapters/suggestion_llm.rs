//! services/api/src/adapters/suggestion_llm.rs
//!
//! This module contains the adapter for the Recipe-Suggestion LLM.
//! It implements the `RecipeSuggestionService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a recipe suggestion bot. Given a list of ingredients, you will generate 3 simple recipe names and their core ingredients.

Return the response in a clear, parsable JSON format. Only return the recipe names and ingredients, exactly in this shape:
{"recipes": [{"title": "Recipe name", "ingredients": "ingredient one, ingredient two"}]}

The "ingredients" value is a single comma separated string. Do not add any text outside the JSON object."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use recipe_curator_core::{
    domain::Recipe,
    ports::{PortError, PortResult, RecipeSuggestionService},
};
use serde::Deserialize;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecipeSuggestionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSuggestionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSuggestionAdapter {
    /// Creates a new `OpenAiSuggestionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `RecipeSuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeSuggestionService for OpenAiSuggestionAdapter {
    async fn suggest_recipes(&self, ingredients: &str) -> PortResult<Vec<Recipe>> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("Ingredients: {}", ingredients))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Suggestion LLM response contained no text content.".to_string(),
                )
            })?;
        debug!("Suggestion LLM replied: {}", content);

        parse_suggestions(&content)
    }
}

//=========================================================================================
// Reply Parsing
//=========================================================================================

#[derive(Deserialize)]
struct SuggestionReply {
    recipes: Vec<SuggestedRecipe>,
}

#[derive(Deserialize)]
struct SuggestedRecipe {
    title: String,
    ingredients: IngredientsField,
}

/// Models occasionally return the ingredients as a JSON array despite the prompt.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsField {
    Text(String),
    List(Vec<String>),
}

impl IngredientsField {
    fn into_text(self) -> String {
        match self {
            IngredientsField::Text(text) => text.trim().to_string(),
            IngredientsField::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Parses the model's JSON reply, tolerating a surrounding markdown code fence.
///
/// All-or-nothing: an empty list or any entry without a title rejects the whole reply.
pub fn parse_suggestions(content: &str) -> PortResult<Vec<Recipe>> {
    let json = strip_code_fence(content);
    let reply: SuggestionReply = serde_json::from_str(json).map_err(|e| {
        PortError::Unexpected(format!("Suggestion LLM returned malformed JSON: {}", e))
    })?;

    if reply.recipes.is_empty() {
        return Err(PortError::Unexpected(
            "Suggestion LLM returned no recipes.".to_string(),
        ));
    }

    reply
        .recipes
        .into_iter()
        .map(|r| {
            let title = r.title.trim().to_string();
            if title.is_empty() {
                return Err(PortError::Unexpected(
                    "Suggestion LLM returned a recipe without a title.".to_string(),
                ));
            }
            Ok(Recipe::new(title, r.ingredients.into_text()))
        })
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, e.g. ```json
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
