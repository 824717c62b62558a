use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, error, info};

use crate::inference::redact::redact_error_message;
use crate::inference::{with_backoff, ProviderError, RetryPolicy, TextGenerator};
use crate::model::report::{is_blank, DayResult, GenerateRequest};
use crate::prompts::{build_report_prompt, Gender};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// How each day's provider call is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    pub retry: RetryPolicy,
    /// Applies to every single attempt, not to the whole retry sequence.
    pub call_timeout: Duration,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Fan out one provider call per non-empty day and collect the results in
/// input order.
///
/// Never fails: a day that cannot be generated carries its error message as
/// `text`, empty days come back with `text: None` and cost no call. The
/// caller is expected to have checked `request.validate()`.
pub async fn generate_reports<G>(
    generator: &G,
    policy: &GenerationPolicy,
    request: &GenerateRequest,
) -> Vec<DayResult>
where
    G: TextGenerator + ?Sized,
{
    info!(
        days = request.days.len(),
        active = request.active_days(),
        gender = request.gender.as_str(),
        "generating reports"
    );

    let jobs = request
        .inputs
        .iter()
        .zip(&request.days)
        .map(|(activities, day)| generate_day(generator, policy, request.gender, day, activities));

    join_all(jobs).await
}

async fn generate_day<G>(
    generator: &G,
    policy: &GenerationPolicy,
    gender: Gender,
    day: &str,
    activities: &str,
) -> DayResult
where
    G: TextGenerator + ?Sized,
{
    if is_blank(activities) {
        return DayResult::skipped(day);
    }

    let prompt = build_report_prompt(day, gender, activities);
    let outcome = with_backoff(&policy.retry, day, || {
        call_once(generator, &prompt, policy.call_timeout)
    })
    .await;

    match outcome {
        Ok(text) => {
            debug!(day, chars = text.chars().count(), "report generated");
            DayResult::generated(day, text)
        }
        Err(err) => {
            let cause = redact_error_message(&err.to_string());
            error!(day, error = %cause, "report generation failed");
            DayResult::failed(day, &cause)
        }
    }
}

async fn call_once<G>(generator: &G, prompt: &str, timeout: Duration) -> Result<String, ProviderError>
where
    G: TextGenerator + ?Sized,
{
    let text = match tokio::time::timeout(timeout, generator.complete(prompt)).await {
        Ok(result) => result?,
        Err(_) => return Err(ProviderError::Timeout { duration: timeout }),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::MissingContent);
    }
    Ok(text.to_string())
}
