//! Canned evaluation service responses and candidate inputs

#![allow(dead_code)]

use serde_json::{json, Value};

pub const COMBINED_PATH: &str = "/evaluate_all";
pub const INTERVIEW_PATH: &str = "/run-interview-evaluation/";

pub const JOB_DESCRIPTION: &str =
    "Backend engineer. Rust, PostgreSQL, on-call rotation, mentoring junior developers.";
pub const CANDIDATE_RESPONSE: &str =
    "When our release slipped I split the scope, shipped the core migration first and wrote up what we deferred.";

/// Minimal PDF-looking bytes; the client never inspects file contents.
pub const RESUME_BYTES: &[u8] = b"%PDF-1.4\n% sample resume\n";

/// Reply from the combined endpoint: flat improvement plan, plain string
/// resources, outcome under `success_prediction`.
pub fn combined_response() -> Value {
    json!({
        "resume_scores": {
            "clarity": 78,
            "relevance": 85,
            "structure": 70,
            "feedback": ["Quantify impact", "Trim the summary"]
        },
        "mock_evaluation": {
            "tone": 80,
            "confidence": 72,
            "relevance": 90,
            "feedback": ["Use the STAR format"]
        },
        "success_prediction": {
            "score": 74,
            "reason": "Strong technical fit, interview delivery needs polish"
        },
        "improvement_plan": {
            "suggestions": ["Practice STAR answers", "Add metrics to bullets"],
            "resources": ["https://star.test/guide"]
        }
    })
}

/// Reply from the interview endpoint: nested improvement plan, behavioral
/// questions, 0-5 experience score.
pub fn interview_response() -> Value {
    json!({
        "resume_scores": {
            "clarity": 82,
            "relevance": 88,
            "structure": 75,
            "experience": 4,
            "feedback": ["Lead with the most recent role"]
        },
        "behavioral_patterns": {
            "questions": [
                {"question": "Tell me about a conflict.", "sample_answer": "I listened first."},
                {"question": "Describe a deadline you missed.", "sample_answer": "I escalated early."},
                {"question": "How do you learn quickly?", "sample_answer": "I build something small."},
                {"question": "A time you disagreed with a manager?", "sample_answer": "I brought data."}
            ]
        },
        "mock_scores": {
            "question": "Tell me about a conflict.",
            "response": "I once disagreed with a teammate about...",
            "tone": 70,
            "confidence": 65,
            "relevance": 80,
            "feedback": ["Be more specific about the result"]
        },
        "outcome": {
            "success_score": 68,
            "reason": "Good alignment, moderate interview performance"
        },
        "improvement_plan": {
            "improvement_plan": {
                "suggestions": [
                    {"title": "Practice STAR", "description": "Use structured answers"}
                ],
                "resources": [
                    {"title": "STAR method guide", "link": "https://star.test/guide"}
                ]
            }
        }
    })
}
