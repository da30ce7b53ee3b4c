/*!
 * Three-stage reflective translation pipeline.
 *
 * - `translator`: draft translation
 * - `feedback`: structured quality critique of the draft
 * - `reviewer`: reflection over draft + critique, final decision
 * - `orchestrator`: runs the three stages in order and assembles the result
 * - `model`: request/result records shared by the stages
 * - `prompts`: prompt builders for each stage
 * - `structured`: extraction of JSON objects from model output
 */

use serde::{Deserialize, Serialize};
use std::fmt;

pub use self::feedback::{Feedback, FeedbackChecks, FeedbackGenerator, FeedbackReport};
pub use self::model::{Decision, PipelineResult, PipelineStatus, TokenUsageStats, TranslationRequest};
pub use self::orchestrator::{PipelineConfig, TranslationPipeline};
pub use self::reviewer::{ReviewVerdict, Reviewer};
pub use self::translator::Translator;

pub mod feedback;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod reviewer;
pub mod structured;
pub mod translator;

/// Pipeline stage identifier, used in errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Draft translation
    Translation,
    /// Quality feedback
    Feedback,
    /// Reflection and final decision
    Review,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Translation => "translation",
            Self::Feedback => "feedback",
            Self::Review => "review",
        };
        write!(f, "{}", name)
    }
}
