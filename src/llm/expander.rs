//! Text expansion through a hosted text-generation model
//!
//! Expansion is optional: callers treat every error from this module as
//! "keep the original text".

use crate::config::ExpansionConfig;
use crate::error::{Result, ResumeForgeError};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anything that can rewrite a piece of resume prose
pub trait TextExpander {
    fn expand(&self, text: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f64,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Error { error: String },
}

/// Pull the generated text out of an inference API response body
pub fn parse_generation_response(body: &str) -> Result<String> {
    let response: GenerationResponse = serde_json::from_str(body)?;

    let text = match response {
        GenerationResponse::Batch(items) => items
            .into_iter()
            .next()
            .map(|item| item.generated_text)
            .unwrap_or_default(),
        GenerationResponse::Single(item) => item.generated_text,
        GenerationResponse::Error { error } => return Err(ResumeForgeError::Expansion(error)),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ResumeForgeError::Expansion("Model returned empty text".to_string()));
    }
    Ok(text.to_string())
}

/// Exponential backoff before retry `attempt` (1-based): 1s, 2s, 4s, ...
pub fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1u64 << attempt.saturating_sub(1).min(6)))
}

/// Client for the HuggingFace text-generation inference API
#[derive(Clone)]
pub struct HuggingFaceExpander {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
    temperature: f64,
    max_new_tokens: u32,
    max_retries: u32,
}

impl HuggingFaceExpander {
    pub fn new(config: &ExpansionConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ResumeForgeError::Configuration(
                "API key for the expansion model is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/{}", config.api_url.trim_end_matches('/'), config.model_id),
            model_id: config.model_id.clone(),
            temperature: config.temperature,
            max_new_tokens: config.max_new_tokens,
            max_retries: config.max_retries,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Send a prompt, retrying on rate limits, server errors and dropped
    /// connections. Makes at most `max_retries + 1` attempts.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                temperature: self.temperature,
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
        };

        let mut last_error: Option<ResumeForgeError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                warn!(
                    "Expansion attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            info!("Sending request to model {}", self.model_id);
            let response = match self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read inference API response: {}", e);
                    last_error = Some(e.into());
                    continue;
                }
            };

            if status.as_u16() == 429 || status.is_server_error() {
                warn!("Inference API returned {}: {}", status, body);
                last_error = Some(ResumeForgeError::Expansion(format!("HTTP {}: {}", status, body)));
                continue;
            }

            if !status.is_success() {
                return Err(ResumeForgeError::Expansion(format!("HTTP {}: {}", status, body)));
            }

            let text = parse_generation_response(&body)?;
            debug!("Model returned {} characters", text.len());
            return Ok(text);
        }

        Err(last_error.unwrap_or_else(|| {
            ResumeForgeError::Expansion(format!("No response after {} attempts", self.max_retries + 1))
        }))
    }
}

impl TextExpander for HuggingFaceExpander {
    async fn expand(&self, text: &str) -> Result<String> {
        self.generate(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const TRUNCATED: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n[{\"generated_";

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let mut length = 0;
                for line in text[..end].lines() {
                    let line = line.to_ascii_lowercase();
                    if let Some(value) = line.strip_prefix("content-length:") {
                        length = value.trim().parse().unwrap_or(0);
                    }
                }
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    /// Serve one canned response per connection, counting connections
    async fn serve(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn local_expander(api_url: String, max_retries: u32) -> HuggingFaceExpander {
        let mut config = Config::default().expansion;
        config.api_url = api_url;
        config.model_id = "test-model".to_string();
        config.max_retries = max_retries;
        config.timeout_secs = 5;
        HuggingFaceExpander::new(&config, "hf_token".to_string()).unwrap()
    }

    #[test]
    fn test_parse_batch_response() {
        let text = parse_generation_response(r#"[{"generated_text": "  Led a team.  "}]"#).unwrap();
        assert_eq!(text, "Led a team.");
    }

    #[test]
    fn test_parse_single_response() {
        let text = parse_generation_response(r#"{"generated_text": "Built APIs."}"#).unwrap();
        assert_eq!(text, "Built APIs.");
    }

    #[test]
    fn test_parse_error_and_empty_responses() {
        assert!(matches!(
            parse_generation_response(r#"{"error": "Model is loading"}"#),
            Err(ResumeForgeError::Expansion(msg)) if msg == "Model is loading"
        ));
        assert!(parse_generation_response(r#"[]"#).is_err());
        assert!(parse_generation_response(r#"[{"generated_text": "   "}]"#).is_err());
        assert!(parse_generation_response("not json").is_err());
    }

    #[test]
    fn test_retry_delay_doubles() {
        assert_eq!(retry_delay(1), Duration::from_secs(1));
        assert_eq!(retry_delay(2), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = Config::default();
        assert!(HuggingFaceExpander::new(&config.expansion, "  ".to_string()).is_err());

        let expander = HuggingFaceExpander::new(&config.expansion, "hf_token".to_string()).unwrap();
        assert_eq!(expander.model_id(), "mistralai/Mistral-7B-Instruct-v0.3");
        assert!(expander.endpoint.ends_with("/models/mistralai/Mistral-7B-Instruct-v0.3"));
    }

    #[tokio::test]
    async fn test_truncated_body_is_retried() {
        let (url, hits) = serve(vec![
            TRUNCATED.to_string(),
            json_response(r#"[{"generated_text": "Led a team."}]"#),
        ])
        .await;

        let expander = local_expander(url, 1);
        let text = expander.generate("Refine this").await.unwrap();
        assert_eq!(text, "Led a team.");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retries_are_on_top_of_first_attempt() {
        let (url, hits) = serve(vec![TRUNCATED.to_string(), TRUNCATED.to_string()]).await;

        let expander = local_expander(url, 1);
        let result = expander.generate("Refine this").await;
        assert!(matches!(result, Err(ResumeForgeError::Network(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_makes_one_attempt() {
        let (url, hits) = serve(vec![TRUNCATED.to_string()]).await;

        let expander = local_expander(url, 0);
        assert!(expander.generate("Refine this").await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
