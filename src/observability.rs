use biometrics::{Collector, Counter, Moments};

pub(crate) static COMPLETION_REQUESTS: Counter = Counter::new("yechat.completion.requests");
pub(crate) static COMPLETION_FALLBACKS: Counter = Counter::new("yechat.completion.fallbacks");
pub(crate) static COMPLETION_DURATION: Moments =
    Moments::new("yechat.completion.duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("yechat.session.submissions");
pub(crate) static SESSION_REJECTIONS: Counter = Counter::new("yechat.session.rejections");
pub(crate) static SESSION_SEEDS_CONSUMED: Counter = Counter::new("yechat.session.seeds_consumed");
pub(crate) static SESSION_TURN_DURATION: Moments =
    Moments::new("yechat.session.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&COMPLETION_REQUESTS);
    collector.register_counter(&COMPLETION_FALLBACKS);
    collector.register_moments(&COMPLETION_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_REJECTIONS);
    collector.register_counter(&SESSION_SEEDS_CONSUMED);
    collector.register_moments(&SESSION_TURN_DURATION);
}
