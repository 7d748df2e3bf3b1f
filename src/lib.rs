//! Interview Evaluation Client
//!
//! This library provides the client side of the interview evaluation
//! workflow: it validates a candidate's résumé, job description and mock
//! interview response, submits them to the evaluation service, and
//! normalizes whichever response layout the service returns into one
//! [`EvaluationReport`](models::report::EvaluationReport).

pub mod config;
pub mod models;
pub mod services;
