use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::daily_limit::DailyLimiter;
use crate::error::Result;
use crate::store::backend::MetadataBackend;

/// Bring the counter up to date and report it.
pub fn run<M: MetadataBackend, C: Clock>(limiter: &DailyLimiter<M, C>) -> Result<CmdResult> {
    let status = limiter.load()?;
    let mut result = CmdResult::default().with_limit(status);
    if status.remaining == 0 {
        result.add_message(CmdMessage::warning(
            "Daily limit reached. Watch an ad (`reward`) to unlock more.",
        ));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::clock;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn fresh_counter_has_full_quota() {
        let backend = MemBackend::new();
        let limiter = DailyLimiter::with_clock(&backend, clock());

        let result = run(&limiter).unwrap();
        let status = result.limit.unwrap();
        assert_eq!((status.used, status.remaining), (0, 5));
        assert!(result.messages.is_empty());
    }

    #[test]
    fn exhausted_counter_warns() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock()).with_limit(1);
        limiter.consume().unwrap();

        let result = run(&limiter).unwrap();
        assert_eq!(result.limit.unwrap().remaining, 0);
        assert!(result.messages[0].content.contains("reward"));
    }
}
