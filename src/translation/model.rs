/*!
 * Records exchanged by the pipeline stages.
 *
 * All of them live for a single pipeline run; nothing here is persisted.
 */

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::feedback::Feedback;
use super::reviewer::ReviewVerdict;
use crate::providers::TokenUsage;

/// Immutable input to one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub source_text: String,
    /// Source language display name
    pub source_language: String,
    /// Target language display name
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Binary verdict attached to feedback reports and review verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Translation is good as is
    Accept,
    /// Translation needs revision
    Revise,
}

impl Decision {
    /// Wire form used in prompts and JSON payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Revise => "REVISE",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    // Models occasionally vary the case or pad the keyword
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCEPT" => Ok(Self::Accept),
            "REVISE" => Ok(Self::Revise),
            other => Err(format!("expected ACCEPT or REVISE, got {:?}", other)),
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Decision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of a run, derived solely from the reviewer's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    /// Reviewer accepted the translation
    Accepted,
    /// Reviewer revised the translation
    Revised,
}

impl PipelineStatus {
    /// Status implied by a reviewer decision
    pub fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Accept => Self::Accepted,
            Decision::Revise => Self::Revised,
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Revised => f.write_str("revised"),
        }
    }
}

/// Token usage accumulated over the calls of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
    /// Total number of tokens
    pub total_tokens: u64,
    /// Calls that reported usage
    pub reported_calls: u32,
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add usage from one completion; calls without usage are ignored
    pub fn add(&mut self, usage: Option<TokenUsage>) {
        if let Some(usage) = usage {
            self.prompt_tokens += usage.prompt_tokens;
            self.completion_tokens += usage.completion_tokens;
            self.total_tokens += usage.prompt_tokens + usage.completion_tokens;
            self.reported_calls += 1;
        }
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} prompt + {} completion = {} tokens over {} call(s)",
            self.prompt_tokens, self.completion_tokens, self.total_tokens, self.reported_calls
        )
    }
}

/// Everything a pipeline run hands back to its caller
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Identifier of the run, also used as log prefix
    pub run_id: String,
    /// The input of the run
    pub request: TranslationRequest,
    /// First-pass translation
    pub draft: String,
    /// Structured critique of the draft
    pub feedback: Feedback,
    /// Reviewer's final verdict
    pub verdict: ReviewVerdict,
    /// `accepted` iff the reviewer decided ACCEPT
    pub status: PipelineStatus,
    /// Token usage over the three calls
    pub usage: TokenUsageStats,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// The reviewer's final translation
    pub fn final_translation(&self) -> &str {
        &self.verdict.final_translation
    }

    /// Whether the reviewer accepted the translation
    pub fn is_accepted(&self) -> bool {
        self.status == PipelineStatus::Accepted
    }
}
