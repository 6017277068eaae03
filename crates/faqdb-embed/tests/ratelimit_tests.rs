use std::collections::HashMap;
use std::time::{Duration, Instant};

use faqdb_core::config::RateLimitConfig;
use faqdb_embed::RateLimiter;

fn limiter(capacity: u32, refill_per_minute: u32) -> RateLimiter {
    let mut configs = HashMap::new();
    configs.insert("openai".to_string(), RateLimitConfig { capacity, refill_per_minute });
    RateLimiter::new(&configs)
}

#[test]
fn capacity_then_denial_then_refill() {
    // Capacity 3, one token per second (60/min).
    let rl = limiter(3, 60);
    let base = Instant::now();

    for i in 0..3 {
        assert!(rl.check_at("openai", base), "call {i} within capacity");
    }
    assert!(!rl.check_at("openai", base), "capacity + 1 is denied");
    assert!(
        !rl.check_at("openai", base + Duration::from_millis(500)),
        "half a refill interval is not enough"
    );
    assert!(
        rl.check_at("openai", base + Duration::from_secs(1)),
        "one token refilled after 60/refill_rate seconds"
    );
}

#[test]
fn refill_is_capped_at_capacity() {
    let rl = limiter(2, 600);
    let base = Instant::now();
    assert!(rl.check_at("openai", base));
    assert!(rl.check_at("openai", base));

    // An hour later the bucket holds capacity tokens, not 36000.
    let later = base + Duration::from_secs(3600);
    assert_eq!(rl.remaining_tokens_at("openai", later), 2);
    assert!(rl.check_at("openai", later));
    assert!(rl.check_at("openai", later));
    assert!(!rl.check_at("openai", later));
}

#[test]
fn remaining_tokens_reports_lazy_refill() {
    let rl = limiter(5, 60);
    let base = Instant::now();
    for _ in 0..5 {
        assert!(rl.check_at("openai", base));
    }
    assert_eq!(rl.remaining_tokens_at("openai", base), 0);
    assert_eq!(rl.remaining_tokens_at("openai", base + Duration::from_secs(2)), 2);
}

#[test]
fn time_until_refill_counts_down() {
    let rl = limiter(1, 60);
    let base = Instant::now();
    assert!(rl.check_at("openai", base));

    let wait = rl.time_until_refill_at("openai", base);
    assert!(wait > Duration::from_millis(900) && wait <= Duration::from_secs(1), "wait={wait:?}");

    // Full bucket reports zero.
    rl.reset("openai");
    assert_eq!(rl.time_until_refill("openai"), Duration::ZERO);
}

#[test]
fn unknown_provider_is_denied_not_a_crash() {
    let rl = limiter(3, 60);
    assert!(!rl.check("anthropic"));
    assert_eq!(rl.remaining_tokens("anthropic"), 0);
    assert_eq!(rl.time_until_refill("anthropic"), Duration::ZERO);
}

#[test]
fn reset_restores_full_capacity() {
    let rl = limiter(2, 1);
    let base = Instant::now();
    assert!(rl.check_at("openai", base));
    assert!(rl.check_at("openai", base));
    assert!(!rl.check_at("openai", base));

    rl.reset("openai");
    assert_eq!(rl.remaining_tokens("openai"), 2);
}
