//! crates/knowledge_core/src/extraction.rs
//!
//! Prompt construction and response handling for knowledge extraction.

use serde_json::Value;
use tracing::debug;

use crate::domain::ExtractionMode;
use crate::ports::{ChatCompletionService, PortError, PortResult};

const CONCEPTS_PROMPT: &str = r#"You are a Knowledge Extraction and Structuring Agent.

Your tasks:
1. Extract all important key concepts.
2. Remove duplicate or unnecessary information.
3. Organize concepts into a clear hierarchy:
   - Main Topic
   - Subtopics
   - Key points

Rules:
- Be concise.
- Keep concepts meaningful.
- Do NOT generate quiz questions.

Output strictly in JSON format like this:
{
  "Main Topic": {
    "Subtopic 1": ["Point 1", "Point 2"],
    "Subtopic 2": ["Point 3", "Point 4"]
  }
}
"#;

const CONCEPTS_WITH_QUIZ_PROMPT: &str = r#"You are a Knowledge Extraction and Structuring Agent.

Your tasks:
1. Extract all important key concepts.
2. Remove duplicate or unnecessary information.
3. Organize concepts into a clear hierarchy.
4. Generate a Quiz based on the extracted content.

Output strictly in JSON format like this:
{
  "Main Topic": {
    "Subtopic 1": ["Point 1", "Point 2"]
  },
  "Quiz": [
    {
      "Question": "Question text?",
      "Options": ["A", "B", "C", "D"],
      "Answer": "Correct Option"
    }
  ]
}
"#;

/// The fixed system instruction for the given mode.
pub fn system_prompt(mode: ExtractionMode) -> &'static str {
    match mode {
        ExtractionMode::Concepts => CONCEPTS_PROMPT,
        ExtractionMode::ConceptsWithQuiz => CONCEPTS_WITH_QUIZ_PROMPT,
    }
}

pub fn user_message(text: &str) -> String {
    format!("Input: {}", text)
}

/// Runs one extraction request and parses the reply as JSON.
///
/// The shape of the hierarchy is the model's responsibility; only JSON
/// validity is checked here.
pub async fn extract_knowledge(
    chat: &dyn ChatCompletionService,
    text: &str,
    mode: ExtractionMode,
) -> PortResult<Value> {
    let content = chat
        .complete_json(system_prompt(mode), &user_message(text))
        .await?;
    debug!("Extraction response is {} bytes", content.len());

    serde_json::from_str(&content).map_err(|e| PortError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedChat {
        reply: PortResult<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedChat {
        fn replying(reply: PortResult<String>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletionService for ScriptedChat {
        async fn complete_json(&self, system: &str, user: &str) -> PortResult<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(PortError::Unexpected(e.to_string())),
            }
        }
    }

    #[test]
    fn prompts_differ_only_by_quiz_request() {
        assert!(system_prompt(ExtractionMode::Concepts).contains("Do NOT generate quiz questions"));
        assert!(!system_prompt(ExtractionMode::Concepts).contains("\"Quiz\""));
        assert!(system_prompt(ExtractionMode::ConceptsWithQuiz).contains("\"Quiz\""));
    }

    #[tokio::test]
    async fn short_text_is_still_sent() {
        let chat = ScriptedChat::replying(Ok(r#"{"Tides":{"Causes":["Moon"]}}"#.to_string()));
        let value = extract_knowledge(&chat, "tides", ExtractionMode::Concepts)
            .await
            .unwrap();

        assert_eq!(value["Tides"]["Causes"][0], "Moon");
        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "Input: tides");
    }

    #[tokio::test]
    async fn hierarchy_keeps_model_key_order() {
        let chat = ScriptedChat::replying(Ok(r#"{"Zeta":{},"Alpha":{}}"#.to_string()));
        let value = extract_knowledge(&chat, "x", ExtractionMode::Concepts)
            .await
            .unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Zeta", "Alpha"]);
    }

    #[tokio::test]
    async fn non_json_reply_is_invalid_response() {
        let chat = ScriptedChat::replying(Ok("Sure! Here are the concepts".to_string()));
        let err = extract_knowledge(&chat, "text", ExtractionMode::ConceptsWithQuiz)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidResponse(_)));
    }
}
