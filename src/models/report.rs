use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Behavioral practice questions shown to the candidate.
pub const MAX_BEHAVIORAL_QUESTIONS: usize = 3;

/// Canonical assessment report consumed by the rendering layer.
///
/// Every field carries a default, so a section the service omitted is
/// indistinguishable from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationReport {
    pub resume_scores: ResumeScores,
    pub mock_evaluation: MockEvaluation,
    pub outcome: Outcome,
    pub behavioral_questions: Vec<BehavioralQuestion>,
    pub improvement_plan: ImprovementPlan,
}

/// Résumé scores on a 0-100 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeScores {
    pub clarity: f64,
    pub relevance: f64,
    pub structure: f64,
    /// Rescaled to 0-100; `None` when the service did not score experience.
    pub experience: Option<f64>,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockEvaluation {
    pub question: Option<String>,
    pub response: Option<String>,
    pub tone: f64,
    pub confidence: f64,
    pub relevance: f64,
    pub feedback: Vec<String>,
}

/// Predicted interview outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcome {
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehavioralQuestion {
    pub question: String,
    pub sample_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementPlan {
    pub suggestions: Vec<Suggestion>,
    pub resources: Vec<Resource>,
    pub priority_areas: Vec<String>,
    pub timeline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub title: String,
    pub link: String,
}

impl EvaluationReport {
    /// Serialize into the canonical layout: snake_case sections, top-level
    /// `behavioral_questions`, flat improvement plan with object entries.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
