//! crates/knowledge_core/src/quiz.rs
//!
//! Quiz generation: the input gate, prompt construction, and cleanup of the
//! model's reply. `QuizGenerator` ties these together behind an optional provider.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{MockNotice, SamplingConfig};
use crate::ports::{PortError, PortResult, TextGenerationService};

/// Inputs shorter than this (in characters) yield an empty quiz.
pub const MIN_TEXT_CHARS: usize = 50;
/// Only this many characters of the input are embedded in the prompt.
pub const CONTEXT_CHAR_LIMIT: usize = 3000;

const PROMPT_TEMPLATE: &str = r#"
Act as a **Creative Exam Setter**. I will give you text, and you must generate a **100% UNIQUE** quiz.

Context Text: "{context}..."
Generation ID: {generation_id} (This ID means you MUST avoid any standard/generic outputs)

CRITICAL INSTRUCTIONS FOR UNIQUENESS:
1. **NEVER use generic questions** like "What is...?" or "Define...".
2. **Use varied phrasing**: Start with "Analyze...", "Why does...", "In the context of...", "Which scenario best fits...".
3. **DISTINCT OPTIONS**: The 4 options must be distinctly different. Do NOT use "All of the above" or "None of the above".
4. **SHUFFLE ANSWERS**: The correct answer usually sits at A or B. FORCE it to move around (A, B, C, D randomly).
5. **DEEP DIVERSITY**: If the user runs this again, they should get completely DIFFERENT questions. Focus on obscure details, implications, and lateral thinking.

OUTPUT JSON FORMAT:
{
    "concepts": ["UniqueConcept1", "UniqueConcept2", ...],
    "questions": [
        {
            "id": 1,
            "text": "Complex, unique question text here...",
            "options": ["Creative Option 1", "Creative Option 2", "Creative Option 3", "Creative Option 4"],
            "answerIdx": 2,
            "difficulty": "Medium",
            "validationNote": "Deep analysis of why this specific angle was chosen..."
        },
        ...
    ]
}

Randomize "answerIdx" (0-3) from question to question.
"#;

/// A per-request nonce (`<1000..=9999>_<unix seconds>`) that nudges the model
/// away from repeating earlier quizzes.
pub fn generation_id() -> String {
    let nonce: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}_{}", nonce, Utc::now().timestamp())
}

pub fn build_quiz_prompt(text: &str, generation_id: &str) -> String {
    let context: String = text.chars().take(CONTEXT_CHAR_LIMIT).collect();
    PROMPT_TEMPLATE
        .replace("{generation_id}", generation_id)
        .replace("{context}", &context)
}

/// Removes a Markdown code fence around the reply, preferring a ```json fence.
/// Text without fences is returned trimmed but otherwise untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let fenced = raw
        .split_once("```json")
        .or_else(|| raw.split_once("```"))
        .map(|(_, rest)| rest.split_once("```").map_or(rest, |(body, _)| body));
    fenced.unwrap_or(raw).trim()
}

/// Parses the model's reply as JSON. Any JSON value is accepted and relayed as-is.
pub fn parse_quiz_response(raw: &str) -> PortResult<Value> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| PortError::InvalidResponse(e.to_string()))
}

//=========================================================================================
// QuizGenerator
//=========================================================================================

/// What a generation request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    /// The text was below `MIN_TEXT_CHARS`; nothing was sent anywhere.
    TooShort,
    /// No provider is configured.
    Mock(MockNotice),
    /// The provider's parsed reply, untouched.
    Generated(Value),
}

#[derive(Clone)]
pub struct QuizGenerator {
    provider: Option<Arc<dyn TextGenerationService>>,
    sampling: SamplingConfig,
}

impl QuizGenerator {
    pub fn new(provider: Option<Arc<dyn TextGenerationService>>) -> Self {
        Self {
            provider,
            sampling: SamplingConfig::creative(),
        }
    }

    /// Makes at most one provider call.
    pub async fn generate(&self, text: &str) -> PortResult<QuizOutcome> {
        if text.chars().count() < MIN_TEXT_CHARS {
            return Ok(QuizOutcome::TooShort);
        }

        let Some(provider) = &self.provider else {
            warn!("No generative provider key configured. Returning mock data.");
            return Ok(QuizOutcome::Mock(MockNotice::unconfigured()));
        };

        let generation_id = generation_id();
        info!("Generating quiz with generation id {}", generation_id);
        let prompt = build_quiz_prompt(text, &generation_id);
        let raw = provider.generate_text(&prompt, &self.sampling).await?;

        parse_quiz_response(&raw).map(QuizOutcome::Generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LONG_TEXT: &str = "Photosynthesis converts light energy into chemical energy stored in glucose molecules.";

    const QUIZ_JSON: &str = r#"{
        "concepts": ["Light reactions"],
        "questions": [
            {"id": 1, "text": "Why does chlorophyll absorb red light?", "options": ["a", "b", "c", "d"], "answerIdx": 2, "difficulty": "Medium", "validationNote": "n"},
            {"id": 2, "text": "Which trade-off limits C4 plants?", "options": ["a", "b"], "answerIdx": 0}
        ]
    }"#;

    struct CountingProvider {
        calls: AtomicUsize,
        reply: String,
    }

    #[async_trait]
    impl TextGenerationService for CountingProvider {
        async fn generate_text(&self, prompt: &str, sampling: &SamplingConfig) -> PortResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("Generation ID: "));
            assert_eq!(*sampling, SamplingConfig::creative());
            Ok(self.reply.clone())
        }
    }

    fn provider(reply: &str) -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            reply: reply.to_string(),
        })
    }

    #[test]
    fn strips_json_fence() {
        let raw = "Here you go:\n```json\n{\"questions\": []}\n```\nEnjoy";
        assert_eq!(strip_code_fences(raw), "{\"questions\": []}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn unfenced_text_is_unchanged() {
        let raw = r#"{"concepts":["x"],"questions":[]}"#;
        assert_eq!(strip_code_fences(raw), raw);
        assert_eq!(parse_quiz_response(raw).unwrap()["concepts"], json!(["x"]));
    }

    #[test]
    fn fenced_and_plain_replies_parse_alike() {
        let fenced = format!("```json\n{}\n```", QUIZ_JSON);
        assert_eq!(
            parse_quiz_response(&fenced).unwrap(),
            parse_quiz_response(QUIZ_JSON).unwrap()
        );
    }

    #[test]
    fn reply_is_relayed_without_reshaping() {
        let quiz = parse_quiz_response(QUIZ_JSON).unwrap();
        assert_eq!(quiz["questions"].as_array().unwrap().len(), 2);
        assert!(quiz["questions"][1].get("validationNote").is_none());

        let raw = r#"{"summary":"s","concepts":["c"],"questions":[
            {"id":"q1","text":"t","options":["a","b","c","d"],"answerIdx":1,"difficulty":null,"hint":"h"}
        ]}"#;
        let quiz = parse_quiz_response(raw).unwrap();
        assert_eq!(quiz, serde_json::from_str::<Value>(raw).unwrap());
        assert_eq!(quiz["summary"], "s");
        assert_eq!(quiz["questions"][0]["id"], "q1");
        assert!(quiz["questions"][0]["difficulty"].is_null());
        assert_eq!(quiz["questions"][0]["hint"], "h");
    }

    #[test]
    fn prompt_shows_a_multi_question_example() {
        let prompt = build_quiz_prompt("text", "1234_1700000000");
        assert!(prompt.contains("        },\n        ...\n    ]"));
        assert!(prompt.contains("Randomize \"answerIdx\" (0-3)"));
    }

    #[test]
    fn prompt_truncates_context_by_characters() {
        let text = "é".repeat(CONTEXT_CHAR_LIMIT + 10);
        let prompt = build_quiz_prompt(&text, "1234_1700000000");
        let expected = format!("\"{}...\"", "é".repeat(CONTEXT_CHAR_LIMIT));
        assert!(prompt.contains(&expected));
        assert!(prompt.contains("Generation ID: 1234_1700000000"));
    }

    #[test]
    fn generation_id_has_nonce_and_timestamp() {
        let id = generation_id();
        let (nonce, ts) = id.split_once('_').unwrap();
        let nonce: u32 = nonce.parse().unwrap();
        assert!((1000..=9999).contains(&nonce));
        assert!(ts.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn short_text_makes_no_call() {
        let p = provider(QUIZ_JSON);
        let generator = QuizGenerator::new(Some(p.clone()));
        let outcome = generator.generate("too short").await.unwrap();
        assert_eq!(outcome, QuizOutcome::TooShort);
        assert_eq!(p.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unconfigured_generator_returns_mock() {
        let generator = QuizGenerator::new(None);
        let outcome = generator.generate(LONG_TEXT).await.unwrap();
        assert_eq!(outcome, QuizOutcome::Mock(MockNotice::unconfigured()));
    }

    #[tokio::test]
    async fn configured_generator_calls_once() {
        let p = provider(&format!("```json{}```", QUIZ_JSON));
        let generator = QuizGenerator::new(Some(p.clone()));
        let outcome = generator.generate(LONG_TEXT).await.unwrap();
        match outcome {
            QuizOutcome::Generated(quiz) => assert_eq!(quiz["concepts"], json!(["Light reactions"])),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unparseable_reply_is_an_error() {
        let generator = QuizGenerator::new(Some(provider("I cannot help with that.")));
        let err = generator.generate(LONG_TEXT).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidResponse(_)));
    }
}
