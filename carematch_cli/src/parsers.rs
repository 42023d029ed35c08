use jiff::{SignedDuration, SpanRelativeTo};

pub const MAX_SOLVE_TIME_ENV: &str = "CAREMATCH_MAX_SOLVE_TIME";

pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<i64>() {
        SignedDuration::from_secs(seconds.abs())
    } else {
        return Err(String::from("Invalid duration"));
    };

    if duration.is_negative() {
        return Err(String::from("Duration must not be negative"));
    }

    Ok(duration)
}

/// Solve time limit from the environment, used when no `--timeout` flag is given.
pub fn max_solve_time_from_env() -> Result<Option<SignedDuration>, anyhow::Error> {
    match std::env::var(MAX_SOLVE_TIME_ENV) {
        Ok(value) => parse_duration(&value)
            .map(Some)
            .map_err(|err| anyhow::anyhow!("{MAX_SOLVE_TIME_ENV}={value}: {err}")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
