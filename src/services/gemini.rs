// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini API client backing the suggestion flows.
//!
//! Calls are made with the user's own API credential (from settings),
//! against a configurable base URL so tests can point elsewhere.

use crate::error::AppError;
use crate::services::suggest::{
    GroupSuggestionRequest, InactiveSuggestionRequest, InactiveSuggestions, KeyValidation,
    SuggestionBackend,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Low-level Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
        }
    }

    /// Run one generation request and return the model's text output.
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        json_response: bool,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let mut generation_config = serde_json::json!({ "temperature": 0.2 });
        if json_response {
            generation_config["responseMimeType"] = Value::String("application/json".to_string());
        }
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::SuggestionApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SuggestionApi(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::SuggestionApi(format!("JSON parse error: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| AppError::SuggestionApi("Empty model response".to_string()))
    }
}

/// Gemini generation response (the subset we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// [`SuggestionBackend`] implementation over the Gemini API.
#[derive(Clone)]
pub struct GeminiSuggestionService {
    client: GeminiClient,
}

impl GeminiSuggestionService {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: GeminiClient::new(base_url, model),
        }
    }
}

#[async_trait]
impl SuggestionBackend for GeminiSuggestionService {
    async fn suggest_groups(
        &self,
        api_key: &str,
        request: &GroupSuggestionRequest,
    ) -> Result<Vec<Value>, AppError> {
        let prompt = grouping_prompt(request);
        let text = self.client.generate(api_key, &prompt, true).await?;

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            AppError::SuggestionApi(format!("Malformed grouping response: {}", e))
        })?;
        match value {
            Value::Array(items) => Ok(items),
            other => Err(AppError::SuggestionApi(format!(
                "Expected a JSON array of proposals, got: {}",
                other
            ))),
        }
    }

    async fn suggest_inactive(
        &self,
        api_key: &str,
        request: &InactiveSuggestionRequest,
    ) -> Result<InactiveSuggestions, AppError> {
        let prompt = inactive_prompt(request);
        let text = self.client.generate(api_key, &prompt, true).await?;

        serde_json::from_str(&text)
            .map_err(|e| AppError::SuggestionApi(format!("Malformed closure response: {}", e)))
    }

    async fn validate_api_key(&self, api_key: &str) -> Result<KeyValidation, AppError> {
        // A minimal, low-cost generation; any success means the key works.
        match self.client.generate(api_key, "Say \"hello\"", false).await {
            Ok(_) => Ok(KeyValidation {
                is_valid: true,
                error: None,
            }),
            Err(AppError::SuggestionApi(msg)) => {
                tracing::debug!(error = %msg, "API key validation failed");
                Ok(KeyValidation {
                    is_valid: false,
                    error: Some(friendly_key_error(&msg)),
                })
            }
            Err(other) => Err(other),
        }
    }
}

/// Map a raw API failure onto a message fit for the settings screen.
fn friendly_key_error(msg: &str) -> String {
    if msg.contains("API_KEY_INVALID") || msg.contains("API key not valid") {
        "The provided API Key is not valid. Please check it and try again.".to_string()
    } else if msg.contains("PERMISSION_DENIED") || msg.contains("USER_LOCATION_INVALID") {
        "Permission denied or region not supported. The API key might lack necessary permissions or use from your region is restricted.".to_string()
    } else if msg.contains("error sending request") || msg.contains("dns error") {
        "Network error. Could not reach the Gemini API. Please check your internet connection."
            .to_string()
    } else {
        "Invalid API Key or API error.".to_string()
    }
}

/// Prompt for the grouping flow: ungrouped URLs plus a serialized view of
/// the existing groups, so the model can extend a group by repeating its
/// exact name.
fn grouping_prompt(request: &GroupSuggestionRequest) -> String {
    let mut prompt = String::from(
        "You are a tab grouping assistant. Given a list of ungrouped tab URLs \
         and the user's existing tab groups, suggest relevant tab groups based \
         on the content of the tabs.\n\nUngrouped URLs:\n",
    );
    for url in &request.ungrouped_urls {
        prompt.push_str("- ");
        prompt.push_str(url);
        prompt.push('\n');
    }

    prompt.push_str("\nExisting groups (JSON):\n");
    prompt.push_str(
        &serde_json::to_string(&request.existing_groups).unwrap_or_else(|_| "[]".to_string()),
    );
    prompt.push('\n');

    prompt.push_str(
        "\nTo add tabs to an existing group, reuse that group's exact name as \
         the groupName; otherwise choose a new descriptive name.\n",
    );

    if let Some(language) = &request.target_language {
        prompt.push_str(&format!("\nWrite the group names in: {}.\n", language));
    }

    prompt.push_str(
        "\nRespond with a JSON array of objects, where each object has a \
         groupName and a tabUrls field. The tabUrls field should be an array \
         of URLs that belong to the group.\n",
    );
    prompt
}

/// Prompt for the inactive-tab closure flow.
fn inactive_prompt(request: &InactiveSuggestionRequest) -> String {
    format!(
        "You are a browser assistant that helps users manage their open tabs \
         by suggesting inactive tabs for closure.\n\n\
         You will receive data about the user's tabs and their activity, as \
         well as optional user preferences. Based on this information, \
         determine which tabs are likely to be inactive and suggest closing \
         them to reduce clutter. Consider the time since last activity, the \
         type of tab, and any user preferences provided.\n\n\
         Tab Activity Data:\n{}\n\n\
         User Preferences (optional):\n{}\n\n\
         Format your output as a JSON object with \"tabsToClose\" (an array \
         of URLs to close) and \"reasoning\" (a string explaining the \
         suggestions).\n",
        request.tab_activity_data,
        request.user_preferences.as_deref().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_key_error_mapping() {
        assert!(friendly_key_error("HTTP 400: API_KEY_INVALID").contains("not valid"));
        assert!(friendly_key_error("HTTP 403: PERMISSION_DENIED").contains("Permission denied"));
        assert!(friendly_key_error("error sending request for url").contains("Network error"));
        assert_eq!(friendly_key_error("???"), "Invalid API Key or API error.");
    }

    #[test]
    fn test_grouping_prompt_mentions_existing_groups_and_language() {
        let request = GroupSuggestionRequest {
            ungrouped_urls: vec!["https://a.com".to_string()],
            existing_groups: vec![],
            target_language: Some("de".to_string()),
        };
        let prompt = grouping_prompt(&request);
        assert!(prompt.contains("https://a.com"));
        assert!(prompt.contains("exact name"));
        assert!(prompt.contains("de"));
    }
}
