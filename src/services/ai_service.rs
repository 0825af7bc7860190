use crate::error::{Error, Result};
use crate::services::llm_provider::{ChatProvider, ChatRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use std::sync::Arc;

const COVER_LETTER_SYSTEM_PROMPT: &str =
    "You are a professional career advisor who writes compelling cover letters.";
const MATCH_SCORE_SYSTEM_PROMPT: &str =
    "You are a job matching AI that analyzes resumes against job descriptions.";

/// The model's match verdict. The score keeps the number form the model wrote and unknown keys are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: Number,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub explanation: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl MatchScore {
    pub fn degraded(reason: impl std::fmt::Display) -> Self {
        Self {
            score: Number::from(0),
            matching_skills: vec![],
            missing_skills: vec![],
            explanation: format!("Error parsing AI response: {}", reason),
            extra: Map::new(),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.score.as_f64()
    }
}

/// Result of a match-score call. Both variants serialize as the bare score object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchOutcome {
    Scored(MatchScore),
    Degraded(MatchScore),
}

impl MatchOutcome {
    pub fn parse(content: Option<&str>) -> Self {
        let Some(raw) = content else {
            return MatchOutcome::Degraded(MatchScore::degraded("response has no content"));
        };
        match serde_json::from_str::<MatchScore>(raw) {
            Ok(score) => MatchOutcome::Scored(score),
            Err(e) => MatchOutcome::Degraded(MatchScore::degraded(e)),
        }
    }

    pub fn score(&self) -> &MatchScore {
        match self {
            MatchOutcome::Scored(s) | MatchOutcome::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, MatchOutcome::Degraded(_))
    }
}

#[derive(Clone)]
pub struct AIService {
    provider: Arc<dyn ChatProvider>,
}

impl AIService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Drafts a cover letter and returns the model's first choice verbatim.
    ///
    /// Provider failures, including a response without choices or content, are returned to the caller.
    pub async fn generate_cover_letter(
        &self,
        resume_content: &str,
        job_description: &str,
        user_name: &str,
        company_name: &str,
    ) -> Result<String> {
        let prompt = format!(
            r#"Generate a professional cover letter for {user_name} applying to {company_name}.

Resume:
{resume_content}

Job Description:
{job_description}

The cover letter should:
1. Be professional and enthusiastic
2. Highlight relevant skills from the resume that match the job description
3. Show understanding of the company and position
4. Include a strong opening and closing paragraph
5. Be approximately 400 words
"#
        );

        let completion = self
            .provider
            .complete(ChatRequest {
                system_prompt: COVER_LETTER_SYSTEM_PROMPT.to_string(),
                user_prompt: prompt,
                temperature: 0.7,
                max_tokens: 1200,
                json_response: false,
            })
            .await?;

        let content = completion
            .first_choice()
            .ok_or_else(|| Error::Llm("response contained no choices".to_string()))?
            .message
            .content
            .clone()
            .ok_or_else(|| Error::Llm("first choice has no content".to_string()))?;

        tracing::info!(
            company = %company_name,
            chars = content.len(),
            "Cover letter generated"
        );
        Ok(content)
    }

    /// Scores a resume against a job description.
    ///
    /// Model output that does not parse into a [`MatchScore`] yields a degraded outcome instead of an error.
    pub async fn calculate_job_match_score(
        &self,
        resume_content: &str,
        job_description: &str,
    ) -> Result<MatchOutcome> {
        let prompt = format!(
            r#"Analyze how well the candidate's resume matches the job description.

Resume:
{resume_content}

Job Description:
{job_description}

Provide:
1. A match score from 0-100
2. Top 3 matching skills
3. Top 3 missing skills
4. Brief explanation (max 100 words)

Format your response as a JSON object with keys: score, matching_skills, missing_skills, explanation.
"#
        );

        let completion = self
            .provider
            .complete(ChatRequest {
                system_prompt: MATCH_SCORE_SYSTEM_PROMPT.to_string(),
                user_prompt: prompt,
                temperature: 0.3,
                max_tokens: 800,
                json_response: true,
            })
            .await?;

        let choice = completion
            .first_choice()
            .ok_or_else(|| Error::Llm("response contained no choices".to_string()))?;

        let outcome = MatchOutcome::parse(choice.message.content.as_deref());
        if outcome.is_degraded() {
            tracing::warn!(
                explanation = %outcome.score().explanation,
                "Match score response could not be parsed"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_provider::{ChatCompletion, MockChatProvider};

    fn service_returning(text: &'static str) -> AIService {
        let mut provider = MockChatProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(ChatCompletion::from_text(text)));
        AIService::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn cover_letter_is_first_choice_unmodified() {
        let raw = "  Dear Hiring Manager,\n\nI am thrilled...\n";
        let mut provider = MockChatProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                req.system_prompt.contains("career advisor")
                    && (req.temperature - 0.7).abs() < f64::EPSILON
                    && req.max_tokens == 1200
                    && !req.json_response
                    && req.user_prompt.contains("Ada Lovelace applying to Acme")
                    && req.user_prompt.contains("Rust and Postgres")
                    && req.user_prompt.contains("Backend Engineer")
            })
            .times(1)
            .returning(move |_| {
                Ok(ChatCompletion {
                    choices: vec![
                        ChatCompletion::from_text(raw).choices.remove(0),
                        ChatCompletion::from_text("second").choices.remove(0),
                    ],
                })
            });
        let service = AIService::new(Arc::new(provider));

        let letter = service
            .generate_cover_letter("Rust and Postgres", "Backend Engineer", "Ada Lovelace", "Acme")
            .await
            .unwrap();
        assert_eq!(letter, raw);
    }

    #[tokio::test]
    async fn cover_letter_propagates_provider_failure() {
        let mut provider = MockChatProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(Error::Llm("status 429 Too Many Requests".to_string())));
        let service = AIService::new(Arc::new(provider));

        let err = service
            .generate_cover_letter("resume", "job", "name", "company")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn cover_letter_without_choices_is_an_error() {
        let mut provider = MockChatProvider::new();
        provider
            .expect_complete()
            .returning(|_| Ok(ChatCompletion::default()));
        let service = AIService::new(Arc::new(provider));

        let result = service
            .generate_cover_letter("resume", "job", "name", "company")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn match_score_requests_json_and_returns_parsed_object() {
        let mut provider = MockChatProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                req.json_response
                    && req.max_tokens == 800
                    && (req.temperature - 0.3).abs() < f64::EPSILON
                    && req.system_prompt.contains("job matching AI")
                    && req.user_prompt.contains("5 years Python backend experience")
                    && req.user_prompt.contains("Senior Python Engineer")
            })
            .returning(|_| {
                Ok(ChatCompletion::from_text(
                    r#"{"score": 82, "matching_skills": ["Python", "APIs", "SQL"],
                        "missing_skills": ["Kubernetes"], "explanation": "Strong backend fit."}"#,
                ))
            });
        let service = AIService::new(Arc::new(provider));

        let outcome = service
            .calculate_job_match_score("5 years Python backend experience", "Senior Python Engineer")
            .await
            .unwrap();
        assert!(!outcome.is_degraded());
        let score = outcome.score();
        assert_eq!(score.value(), Some(82.0));
        assert_eq!(score.matching_skills, vec!["Python", "APIs", "SQL"]);
        assert_eq!(score.missing_skills, vec!["Kubernetes"]);
        assert_eq!(score.explanation, "Strong backend fit.");
    }

    #[tokio::test]
    async fn non_json_output_degrades_instead_of_failing() {
        let service = service_returning("not json");
        let outcome = service
            .calculate_job_match_score("5 years Python backend experience", "Senior Python Engineer")
            .await
            .unwrap();

        assert!(outcome.is_degraded());
        let score = outcome.score();
        assert_eq!(score.value(), Some(0.0));
        assert!(score.matching_skills.is_empty());
        assert!(score.missing_skills.is_empty());
        assert!(score.explanation.starts_with("Error parsing AI response: "));

        let body = serde_json::to_value(&outcome).unwrap();
        assert_eq!(body["score"], 0.0);
        assert_eq!(body["matching_skills"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn json_missing_keys_degrades() {
        let service = service_returning(r#"{"score": 55}"#);
        let outcome = service.calculate_job_match_score("r", "j").await.unwrap();
        assert!(outcome.is_degraded());
        assert!(outcome.score().explanation.contains("missing field"));
    }

    #[test]
    fn absent_content_degrades() {
        let outcome = MatchOutcome::parse(None);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.score().value(), Some(0.0));
    }

    #[test]
    fn out_of_range_score_is_returned_as_is() {
        let outcome = MatchOutcome::parse(Some(
            r#"{"score": 140, "matching_skills": [], "missing_skills": [], "explanation": ""}"#,
        ));
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.score().value(), Some(140.0));
    }

    #[test]
    fn parsed_object_serializes_as_the_model_wrote_it() {
        let raw = r#"{"score":82,"matching_skills":["Python"],"missing_skills":[],"explanation":"Good fit.","seniority":"senior"}"#;
        let outcome = MatchOutcome::parse(Some(raw));
        assert!(!outcome.is_degraded());

        let body = serde_json::to_value(&outcome).unwrap();
        let original: JsonValue = serde_json::from_str(raw).unwrap();
        assert_eq!(body, original);
        assert_eq!(serde_json::to_string(&body["score"]).unwrap(), "82");
    }
}
