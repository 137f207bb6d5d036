use super::*;
use std::net::Ipv4Addr;

fn ip(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
}

fn limiter() -> RateLimiter {
    RateLimiter::with_config(RateLimitConfig::default())
}

#[test]
fn per_client_allows_up_to_limit() {
    let rl = limiter();
    let client = ip(1);
    let now = Instant::now();

    for i in 0..DEFAULT_PER_CLIENT_LIMIT {
        assert!(rl.check_and_record_at(client, now).is_ok(), "request {i} should succeed");
    }
    let err = rl.check_and_record_at(client, now).unwrap_err();
    assert!(matches!(err, RateLimitError::PerClientExceeded { limit: DEFAULT_PER_CLIENT_LIMIT, window_secs: 60 }));
    assert_eq!(err.error_code(), "E_RATE_LIMIT_CLIENT");
    assert!(err.retryable());
}

#[test]
fn global_allows_up_to_limit() {
    let rl = limiter();
    let now = Instant::now();

    // Distinct clients so the per-client limit never trips first.
    for i in 0..DEFAULT_GLOBAL_LIMIT {
        let client = ip(u8::try_from(i).unwrap());
        assert!(rl.check_and_record_at(client, now).is_ok(), "request {i} should succeed");
    }
    let err = rl.check_and_record_at(ip(250), now).unwrap_err();
    assert!(matches!(err, RateLimitError::GlobalExceeded { .. }));
    assert_eq!(err.error_code(), "E_RATE_LIMIT_GLOBAL");
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = limiter();
    let client = ip(1);
    let start = Instant::now();

    for _ in 0..DEFAULT_PER_CLIENT_LIMIT {
        rl.check_and_record_at(client, start).unwrap();
    }
    assert!(rl.check_and_record_at(client, start).is_err());

    let after_window = start + Duration::from_secs(DEFAULT_PER_CLIENT_WINDOW_SECS) + Duration::from_millis(1);
    assert!(rl.check_and_record_at(client, after_window).is_ok());
}

#[test]
fn distinct_clients_do_not_interfere() {
    let rl = limiter();
    let now = Instant::now();

    for _ in 0..DEFAULT_PER_CLIENT_LIMIT {
        rl.check_and_record_at(ip(1), now).unwrap();
    }
    assert!(rl.check_and_record_at(ip(1), now).is_err());
    assert!(rl.check_and_record_at(ip(2), now).is_ok());
}

#[test]
fn rejected_request_is_not_recorded() {
    let rl = RateLimiter::with_config(RateLimitConfig { per_client_limit: 1, ..RateLimitConfig::default() });
    let now = Instant::now();

    rl.check_and_record_at(ip(1), now).unwrap();
    assert!(rl.check_and_record_at(ip(1), now).is_err());

    let inner = rl.inner.lock().unwrap();
    assert_eq!(inner.global_requests.len(), 1);
}

#[test]
fn idle_clients_are_evicted() {
    let rl = limiter();
    let start = Instant::now();

    rl.check_and_record_at(ip(1), start).unwrap();
    let later = start + Duration::from_secs(DEFAULT_PER_CLIENT_WINDOW_SECS * 2);
    rl.check_and_record_at(ip(2), later).unwrap();

    let inner = rl.inner.lock().unwrap();
    assert!(!inner.client_requests.contains_key(&ip(1)));
    assert!(inner.client_requests.contains_key(&ip(2)));
}
