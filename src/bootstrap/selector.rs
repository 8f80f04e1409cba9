//! Ordered-fallback model selection.

use std::fmt::Display;
use std::future::Future;

/// Why one candidate could not be initialized.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFailure {
    pub candidate: String,
    pub reason: String,
}

impl Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.candidate, self.reason)
    }
}

/// The first candidate that initialized, plus the ones skipped before it.
#[derive(Debug)]
pub struct Selected<M> {
    pub candidate: String,
    pub value: M,
    pub skipped: Vec<CandidateFailure>,
}

/// Every candidate failed (or there were none).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("no candidate model could be initialized ({} tried)", .failures.len())]
pub struct SelectionError {
    pub failures: Vec<CandidateFailure>,
}

/// Try `candidates` in order and keep the first one `try_init` accepts.
///
/// `try_init` is not called again after the first success.
pub async fn select_model<M, E, F, Fut>(
    candidates: &[String],
    mut try_init: F,
) -> Result<Selected<M>, SelectionError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<M, E>>,
    E: Display,
{
    let mut failures = Vec::new();

    for candidate in candidates {
        match try_init(candidate.clone()).await {
            Ok(value) => {
                tracing::info!(model = %candidate, "Model configured");
                return Ok(Selected {
                    candidate: candidate.clone(),
                    value,
                    skipped: failures,
                });
            }
            Err(e) => {
                tracing::warn!(model = %candidate, error = %e, "Could not configure model");
                failures.push(CandidateFailure {
                    candidate: candidate.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Err(SelectionError { failures })
}
