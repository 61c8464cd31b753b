//! Study assistant feature
//!
//! A thin collaborator around an external language-model API. The
//! assistant grounds every prompt in a curated knowledge base that is
//! loaded once at startup; a missing or unparseable knowledge base is
//! reported loudly and the assistant runs ungrounded rather than taking
//! the server down.

pub mod knowledge;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AssistantConfig;
use knowledge::KnowledgeEntry;

pub use routes::assistant_routes;

/// Errors that can occur when asking the assistant
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Question is required")]
    QuestionRequired,

    #[error("Assistant is not configured")]
    NotConfigured,

    #[error("The assistant is currently unavailable")]
    Upstream(String),
}

/// Assistant client with its knowledge base and HTTP client
#[derive(Clone)]
pub struct Assistant {
    inner: Arc<AssistantInner>,
}

struct AssistantInner {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    knowledge: Vec<KnowledgeEntry>,
}

impl Assistant {
    /// Build the assistant, loading the knowledge base from disk.
    ///
    /// Load failures are reported once, here, and the assistant proceeds
    /// with an empty knowledge base.
    pub async fn new(config: &AssistantConfig) -> Self {
        let kb_path = std::path::Path::new(&config.knowledge_base_path);
        let knowledge = match knowledge::load(kb_path) {
            Ok(entries) => {
                tracing::info!(entries = entries.len(), "Assistant knowledge base loaded");
                entries
            }
            Err(e) => {
                tracing::error!(
                    path = %config.knowledge_base_path,
                    error = %e,
                    "Failed to load assistant knowledge base; continuing without it"
                );
                Vec::new()
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(AssistantInner {
                client,
                api_url: config.api_url.clone(),
                api_key: config.api_key.clone(),
                knowledge,
            }),
        }
    }

    /// Answer a question, grounding the prompt in the knowledge base.
    pub async fn ask(&self, question: &str) -> Result<String, AssistantError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::QuestionRequired);
        }
        let (api_url, api_key) = match (
            self.inner.api_url.as_deref(),
            self.inner.api_key.as_deref(),
        ) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => (url, key),
            _ => return Err(AssistantError::NotConfigured),
        };

        let prompt = self.build_prompt(question);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .inner
            .client
            .post(format!("{api_url}?key={api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistantError::Upstream(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Upstream(e.to_string()))?;

        payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AssistantError::Upstream("unexpected response shape".to_string()))
    }

    fn build_prompt(&self, question: &str) -> String {
        let context = knowledge::render(&self.inner.knowledge);
        format!(
            "You are a helpful school assistant. Answer the student's question \
             using the school knowledge base below when it is relevant. If the \
             knowledge base does not cover the question, answer from general \
             knowledge and say so.\n\nKnowledge base:\n{context}\nQuestion: {question}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AssistantConfig {
        AssistantConfig {
            api_url: None,
            api_key: None,
            knowledge_base_path: "/nonexistent/kb.json".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_missing_knowledge_base_does_not_panic() {
        let assistant = Assistant::new(&config()).await;
        assert!(assistant.inner.knowledge.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_assistant_refuses() {
        let assistant = Assistant::new(&config()).await;
        let err = assistant.ask("when is the exam?").await.unwrap_err();
        assert!(matches!(err, AssistantError::NotConfigured));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let assistant = Assistant::new(&config()).await;
        let err = assistant.ask("   ").await.unwrap_err();
        assert!(matches!(err, AssistantError::QuestionRequired));
    }
}
