//! Reconciles the evaluation service's response layouts into one
//! [`EvaluationReport`].
//!
//! Two endpoints answer with different documents:
//! - the combined endpoint sends `mock_evaluation`, `success_prediction` and a
//!   flat `improvement_plan` of plain strings;
//! - the interview endpoint sends `mock_scores`, `outcome` (with
//!   `success_score`), `behavioral_patterns` and an `improvement_plan` nested
//!   under a second `improvement_plan` key with object entries.
//!
//! Any section may be missing. Missing sections take their defaults; only a
//! section that is present and cannot be read is an error.
//!
//! Documents produced by [`EvaluationReport::to_document`] are read back with
//! [`normalize_canonical`], which leaves scores exactly as written.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::report::{
    BehavioralQuestion, EvaluationReport, ImprovementPlan, MockEvaluation, Outcome, Resource,
    ResumeScores, Suggestion, MAX_BEHAVIORAL_QUESTIONS,
};

/// Experience scores at or below this are on the service's 0-5 scale.
const EXPERIENCE_SMALL_SCALE_MAX: f64 = 5.0;
const EXPERIENCE_SCALE_FACTOR: f64 = 20.0;

type Object = Map<String, Value>;

fn malformed(section: impl Into<String>) -> NormalizationError {
    NormalizationError::MalformedSection(section.into())
}

/// Normalize a response document from the evaluation service.
pub fn normalize(raw: &Value) -> Result<EvaluationReport, NormalizationError> {
    read_report(raw, true)
}

/// Read back a document produced by [`EvaluationReport::to_document`].
///
/// Identical to [`normalize`] except that experience is never rescaled, so
/// `normalize_canonical(&report.to_document()?) == report`.
pub fn normalize_canonical(raw: &Value) -> Result<EvaluationReport, NormalizationError> {
    read_report(raw, false)
}

fn read_report(raw: &Value, rescale: bool) -> Result<EvaluationReport, NormalizationError> {
    let root = raw.as_object().ok_or_else(|| malformed("response"))?;

    let resume_scores = match section(root, &["resume_scores"])? {
        Some((name, obj)) => resume_scores(obj, name, rescale)?,
        None => ResumeScores::default(),
    };

    let mock_evaluation = match section(root, &["mock_evaluation", "mock_scores"])? {
        Some((name, obj)) => mock_evaluation(obj, name)?,
        None => MockEvaluation::default(),
    };

    let outcome = match section(root, &["outcome", "success_prediction"])? {
        Some((name, obj)) => outcome(obj, name)?,
        None => Outcome::default(),
    };

    let report = EvaluationReport {
        resume_scores,
        mock_evaluation,
        outcome,
        behavioral_questions: behavioral_questions(root)?,
        improvement_plan: improvement_plan(root)?,
    };

    debug!(
        rescale,
        behavioral_questions = report.behavioral_questions.len(),
        suggestions = report.improvement_plan.suggestions.len(),
        resources = report.improvement_plan.resources.len(),
        "Normalized evaluation response"
    );

    Ok(report)
}

/// Bring a 0-5 experience score onto the 0-100 scale.
///
/// Values above 5 are assumed to already be on the full scale.
pub fn rescale_experience(value: f64) -> f64 {
    if (0.0..=EXPERIENCE_SMALL_SCALE_MAX).contains(&value) {
        value * EXPERIENCE_SCALE_FACTOR
    } else {
        value
    }
}

/// First of `keys` present with a non-null value, which must be an object.
fn section<'a>(
    root: &'a Object,
    keys: &[&'static str],
) -> Result<Option<(&'static str, &'a Object)>, NormalizationError> {
    for &key in keys {
        match root.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::Object(obj)) => return Ok(Some((key, obj))),
            Some(_) => return Err(malformed(key)),
        }
    }
    Ok(None)
}

fn resume_scores(
    obj: &Object,
    name: &str,
    rescale: bool,
) -> Result<ResumeScores, NormalizationError> {
    let experience = number(obj, name, "experience")?;

    Ok(ResumeScores {
        clarity: number(obj, name, "clarity")?.unwrap_or_default(),
        relevance: number(obj, name, "relevance")?.unwrap_or_default(),
        structure: number(obj, name, "structure")?.unwrap_or_default(),
        experience: if rescale {
            experience.map(rescale_experience)
        } else {
            experience
        },
        feedback: string_list(obj, name, "feedback")?,
    })
}

fn mock_evaluation(obj: &Object, name: &str) -> Result<MockEvaluation, NormalizationError> {
    Ok(MockEvaluation {
        question: text(obj, name, "question")?,
        response: text(obj, name, "response")?,
        tone: number(obj, name, "tone")?.unwrap_or_default(),
        confidence: number(obj, name, "confidence")?.unwrap_or_default(),
        relevance: number(obj, name, "relevance")?.unwrap_or_default(),
        feedback: string_list(obj, name, "feedback")?,
    })
}

fn outcome(obj: &Object, name: &str) -> Result<Outcome, NormalizationError> {
    let score = match number(obj, name, "score")? {
        Some(score) => Some(score),
        None => number(obj, name, "success_score")?,
    };

    Ok(Outcome {
        score: score.unwrap_or_default(),
        reason: text(obj, name, "reason")?.unwrap_or_default(),
    })
}

fn behavioral_questions(root: &Object) -> Result<Vec<BehavioralQuestion>, NormalizationError> {
    const SECTION: &str = "behavioral_patterns.questions";

    let entries = match section(root, &["behavioral_patterns"])? {
        Some((_, patterns)) => list(patterns, SECTION, "questions")?,
        // Canonical documents carry the questions at the top level.
        None => list(root, "behavioral_questions", "behavioral_questions")?,
    };

    let mut questions = entries
        .iter()
        .map(|entry| match entry {
            Value::String(question) => Ok(BehavioralQuestion {
                question: question.clone(),
                sample_answer: String::new(),
            }),
            Value::Object(obj) => Ok(BehavioralQuestion {
                question: text(obj, SECTION, "question")?.unwrap_or_default(),
                sample_answer: text(obj, SECTION, "sample_answer")?.unwrap_or_default(),
            }),
            _ => Err(malformed(SECTION)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    questions.truncate(MAX_BEHAVIORAL_QUESTIONS);
    Ok(questions)
}

/// Where the improvement plan's fields live in a given response.
#[derive(Debug)]
enum PlanShape<'a> {
    /// `improvement_plan.improvement_plan.{suggestions, resources}`
    Nested(&'a Object),
    /// `improvement_plan.{suggestions, resources}`
    Flat(&'a Object),
}

impl<'a> PlanShape<'a> {
    fn locate(outer: &'a Object) -> Result<Self, NormalizationError> {
        match outer.get("improvement_plan") {
            Some(Value::Object(inner)) => Ok(Self::Nested(inner)),
            None | Some(Value::Null) => Ok(Self::Flat(outer)),
            Some(_) => Err(malformed("improvement_plan.improvement_plan")),
        }
    }

    fn fields(&self) -> &'a Object {
        match self {
            Self::Nested(obj) | Self::Flat(obj) => *obj,
        }
    }
}

fn improvement_plan(root: &Object) -> Result<ImprovementPlan, NormalizationError> {
    const SECTION: &str = "improvement_plan";

    let Some((_, outer)) = section(root, &[SECTION])? else {
        return Ok(ImprovementPlan::default());
    };

    let shape = PlanShape::locate(outer)?;
    debug!(nested = matches!(shape, PlanShape::Nested(_)), "Located improvement plan");
    let plan = shape.fields();

    let suggestions = if has_value(plan, "suggestions") {
        suggestions(plan, "suggestions")?
    } else {
        // Fallback plans list their steps as `action_items`.
        suggestions(plan, "action_items")?
    };

    Ok(ImprovementPlan {
        suggestions,
        resources: resources(plan)?,
        priority_areas: string_list(plan, SECTION, "priority_areas")?,
        timeline: text(plan, SECTION, "timeline")?,
    })
}

fn suggestions(plan: &Object, key: &str) -> Result<Vec<Suggestion>, NormalizationError> {
    let section = format!("improvement_plan.{key}");

    list(plan, &section, key)?
        .iter()
        .map(|entry| match entry {
            Value::String(title) => Ok(Suggestion {
                title: title.clone(),
                description: None,
            }),
            Value::Object(obj) => Ok(Suggestion {
                title: text(obj, &section, "title")?.unwrap_or_default(),
                description: text(obj, &section, "description")?,
            }),
            _ => Err(malformed(section.as_str())),
        })
        .collect()
}

fn resources(plan: &Object) -> Result<Vec<Resource>, NormalizationError> {
    const SECTION: &str = "improvement_plan.resources";

    list(plan, SECTION, "resources")?
        .iter()
        .map(|entry| match entry {
            Value::String(link) => Ok(Resource {
                title: link.clone(),
                link: link.clone(),
            }),
            Value::Object(obj) => {
                let link = match text(obj, SECTION, "link")? {
                    Some(link) => link,
                    None => text(obj, SECTION, "url")?.unwrap_or_default(),
                };
                let title = text(obj, SECTION, "title")?.unwrap_or_else(|| link.clone());
                Ok(Resource { title, link })
            }
            _ => Err(malformed(SECTION)),
        })
        .collect()
}

fn has_value(obj: &Object, key: &str) -> bool {
    !matches!(obj.get(key), None | Some(Value::Null))
}

/// Array under `key`; absent or null reads as empty.
fn list<'a>(obj: &'a Object, section: &str, key: &str) -> Result<&'a [Value], NormalizationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(malformed(section)),
    }
}

/// Numeric score; numeric strings are accepted.
fn number(obj: &Object, section: &str, field: &str) -> Result<Option<f64>, NormalizationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| malformed(format!("{section}.{field}"))),
        Some(_) => Err(malformed(format!("{section}.{field}"))),
    }
}

fn text(obj: &Object, section: &str, field: &str) -> Result<Option<String>, NormalizationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(format!("{section}.{field}"))),
    }
}

/// List of strings; a lone string counts as a one-item list.
fn string_list(obj: &Object, section: &str, field: &str) -> Result<Vec<String>, NormalizationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(malformed(format!("{section}.{field}"))),
            })
            .collect(),
        Some(_) => Err(malformed(format!("{section}.{field}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("Malformed section in evaluation response: {0}")]
    MalformedSection(String),
}

impl NormalizationError {
    pub fn section(&self) -> &str {
        match self {
            Self::MalformedSection(name) => name,
        }
    }
}
