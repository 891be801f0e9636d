use crate::ads::{AdProvider, AdSession};
use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::daily_limit::DailyLimiter;
use crate::error::Result;
use crate::store::backend::MetadataBackend;

/// Show a rewarded ad and, if it was watched through, give back `credits`
/// generations.
pub fn run<M: MetadataBackend, C: Clock, P: AdProvider>(
    limiter: &mut DailyLimiter<M, C>,
    rewarded: &mut AdSession<P>,
    credits: u32,
) -> Result<CmdResult> {
    let outcome = rewarded.show_and_wait();
    let mut result = CmdResult::default();

    if outcome.reward_granted {
        limiter.add_credits(credits)?;
        result.add_message(CmdMessage::success(format!(
            "Unlocked {} extra generation(s).",
            credits
        )));
    } else if outcome.shown {
        result.add_message(CmdMessage::warning(
            "The ad was closed before the reward was earned.",
        ));
    } else {
        result.add_message(CmdMessage::warning("No ad is available right now."));
    }

    result.ad = Some(outcome);
    result.limit = Some(limiter.status()?);
    Ok(result)
}
