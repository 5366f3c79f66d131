//! AI text-generation layer.
//!
//! A thin prompt-building layer over a provider abstraction. Explicit AI
//! endpoints surface provider failures; chat smart replies swallow them.

use serde::Deserialize;
use serde_json::json;
use stayhub_common::{
    AppError, AppResult,
    config::{AiConfig, AiProviderKind},
};
use stayhub_db::entities::{hotel, review, room};
use validator::Validate;

/// Maximum smart replies attached to a chat broadcast.
const MAX_SMART_REPLIES: usize = 3;

/// Input for generating a room description.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomDescriptionInput {
    #[validate(length(min = 1, max = 64))]
    pub room_type: String,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[validate(length(max = 64))]
    pub size: Option<String>,

    #[validate(length(max = 64))]
    pub bed_type: Option<String>,
}

/// Input for a pricing suggestion.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestionInput {
    pub room_id: String,

    #[validate(length(min = 1, max = 64))]
    pub season: String,

    /// Current nightly price in minor units.
    #[validate(range(min = 1))]
    pub current_price: i64,
}

/// Input for marketing content.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarketingContentInput {
    pub hotel_id: String,

    #[validate(length(min = 1, max = 64))]
    pub content_type: String,

    #[validate(length(max = 128))]
    pub theme: Option<String>,
}

/// AI text-generation service.
#[derive(Clone)]
pub struct AiService {
    config: AiConfig,
    http_client: reqwest::Client,
}

impl AiService {
    /// Create a new AI service.
    #[must_use]
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Generate text from a prompt.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
        match self.config.provider {
            AiProviderKind::OpenAi => self.generate_openai(prompt, max_tokens).await,
            AiProviderKind::Anthropic => self.generate_anthropic(prompt, max_tokens).await,
        }
    }

    /// Draft a room description for the catalog.
    pub async fn room_description(&self, input: &RoomDescriptionInput) -> AppResult<String> {
        let size = input.size.as_deref().unwrap_or("standard size");
        let bed = input.bed_type.as_deref().unwrap_or("standard");
        let prompt = format!(
            "Generate a compelling, SEO-optimized room description for a {} hotel room. \
             Details: {} bed, {}, amenities: {}. \
             Make it professional, inviting, and highlight key features. Keep it under 150 words.",
            input.room_type,
            bed,
            size,
            input.amenities.join(", "),
        );
        self.generate(&prompt, 200).await
    }

    /// Draft a tone-aware response to a review.
    pub async fn review_response(&self, review: &review::Model, tone: &str) -> AppResult<String> {
        let prompt = format!(
            "Generate a {} response to this hotel review. \
             Review: \"{}\" (Rating: {}/5) \
             Make it warm, professional, and address any concerns. Keep it under 100 words.",
            tone, review.comment, review.rating_overall,
        );
        self.generate(&prompt, 150).await
    }

    /// Suggest a pricing strategy for a room.
    pub async fn pricing_suggestion(
        &self,
        room: &room::Model,
        hotel: &hotel::Model,
        season: &str,
        current_price: i64,
    ) -> AppResult<String> {
        let prompt = format!(
            "Suggest an optimal pricing strategy for a {:?} room in a {:?} hotel. \
             Current price: {} {} per night (minor units), Season: {}. \
             Consider market trends, seasonality, and competitive positioning. \
             Provide a price recommendation and brief reasoning.",
            room.room_type, hotel.category, current_price, room.price_currency, season,
        );
        self.generate(&prompt, 150).await
    }

    /// Draft marketing copy for a hotel.
    pub async fn marketing_content(
        &self,
        hotel: &hotel::Model,
        content_type: &str,
        theme: Option<&str>,
    ) -> AppResult<String> {
        let prompt = format!(
            "Generate {} marketing content for a {:?} hotel named \"{}\" in {}. \
             Theme: {}. Make it engaging, persuasive, and highlight unique features. \
             Keep it under 200 words.",
            content_type,
            hotel.category,
            hotel.name,
            hotel.city,
            theme.unwrap_or("general promotion"),
        );
        self.generate(&prompt, 250).await
    }

    /// Up to three short reply suggestions for a guest message.
    pub async fn smart_replies(&self, message: &str) -> AppResult<Vec<String>> {
        let prompt = format!(
            "Generate 3 short, helpful reply suggestions for this hotel guest message: \
             \"{message}\". Return only the replies, one per line, max 10 words each.",
        );
        let text = self.generate(&prompt, 100).await?;
        Ok(parse_smart_replies(&text))
    }

    async fn generate_openai(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }
        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }
        #[derive(Deserialize)]
        struct Completion {
            choices: Vec<Choice>,
        }

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");

        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
            "temperature": 0.7,
        });

        let response = self
            .http_client
            .post(format!("{base_url}/v1/chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_error("OpenAI request failed", &e))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "OpenAI returned an error status");
            return Err(AppError::ExternalService(
                "Failed to generate AI response".to_string(),
            ));
        }

        let completion: Completion = response
            .json()
            .await
            .map_err(|e| provider_error("OpenAI response malformed", &e))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| AppError::ExternalService("Failed to generate AI response".to_string()))
    }

    async fn generate_anthropic(&self, prompt: &str, max_tokens: u32) -> AppResult<String> {
        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct MessagesResponse {
            content: Vec<ContentBlock>,
        }

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.anthropic.com");

        let body = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .http_client
            .post(format!("{base_url}/v1/messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_error("Anthropic request failed", &e))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Anthropic returned an error status");
            return Err(AppError::ExternalService(
                "Failed to generate AI response".to_string(),
            ));
        }

        let messages: MessagesResponse = response
            .json()
            .await
            .map_err(|e| provider_error("Anthropic response malformed", &e))?;

        messages
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AppError::ExternalService("Failed to generate AI response".to_string()))
    }
}

fn provider_error(context: &str, err: &dyn std::fmt::Display) -> AppError {
    tracing::warn!(error = %err, "{context}");
    AppError::ExternalService("Failed to generate AI response".to_string())
}

/// Split provider output into up to three non-empty reply lines.
#[must_use]
pub fn parse_smart_replies(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SMART_REPLIES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_smart_replies_takes_three() {
        let text = "Yes, early check-in is fine.\nWe can hold your bags.\nSee you soon!\nExtra line";
        let replies = parse_smart_replies(text);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0], "Yes, early check-in is fine.");
    }

    #[test]
    fn test_parse_smart_replies_skips_blank_lines_and_bullets() {
        let text = "- First reply\n\n  * Second reply\n";
        let replies = parse_smart_replies(text);
        assert_eq!(replies, vec!["First reply", "Second reply"]);
    }
}
