use std::time::Duration;

/// Retry a fallible operation with exponential backoff.
///
/// The delay doubles after every failed attempt, starting at
/// `base_delay_ms`. The last error is returned once `max_attempts`
/// is exhausted.
pub fn retry_with_backoff<F, T, E>(
    mut op: F,
    max_attempts: u32,
    base_delay_ms: u64,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts {
                    tracing::error!("{} failed after {} attempts: {}", operation_name, attempt, e);
                    return Err(e);
                }
                let delay_ms = base_delay_ms * 2_u64.pow(attempt - 1);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                    operation_name,
                    attempt,
                    max_attempts,
                    e,
                    delay_ms
                );
                std::thread::sleep(Duration::from_millis(delay_ms));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_success() {
        let mut calls = 0;
        let result: Result<u32, String> = retry_with_backoff(
            || {
                calls += 1;
                Ok(42)
            },
            3,
            1,
            "test op",
        );
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn recovers_after_transient_failures() {
        let mut calls = 0;
        let result: Result<u32, String> = retry_with_backoff(
            || {
                calls += 1;
                if calls < 3 {
                    Err("not yet".to_string())
                } else {
                    Ok(7)
                }
            },
            5,
            1,
            "test op",
        );
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<u32, String> = retry_with_backoff(
            || {
                calls += 1;
                Err("broken".to_string())
            },
            3,
            1,
            "test op",
        );
        assert_eq!(result.unwrap_err(), "broken");
        assert_eq!(calls, 3);
    }
}
