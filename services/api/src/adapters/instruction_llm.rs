//! services/api/src/adapters/instruction_llm.rs
//!
//! This module contains the adapter for the Recipe-Instruction LLM.
//! It implements the `RecipeInstructionService` port from the `core` crate.

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
use recipe_curator_core::ports::{PortError, PortResult, RecipeInstructionService};

/// An adapter that implements `RecipeInstructionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiInstructionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiInstructionAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl RecipeInstructionService for OpenAiInstructionAdapter {
    /// Asks for step-by-step instructions, one step per line.
    async fn provide_instructions(&self, title: &str, ingredients: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content("You are a cooking assistant. Write clear and concise step-by-step cooking instructions, one numbered step per line. Respond with ONLY the steps.")
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Provide step-by-step cooking instructions for the following recipe:\n\nRecipe Title: {}\nIngredients: {}\n\nKeep the instructions clear and concise.",
                    title, ingredients
                ))
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

        let instructions = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Instruction LLM response contained no text content.".to_string(),
                )
            })?;

        Ok(instructions)
    }
}
