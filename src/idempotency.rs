//! Idempotency keys for write requests.

use chrono::Utc;
use rand::Rng;

pub const DEFAULT_PREFIX: &str = "req";
const SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Builds `<prefix>_<unix millis>_<7 base36 chars>`.
pub fn generate_key(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Key prefix for a request path: the resource segment after `/api/`.
pub fn prefix_for_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or_default();
    match path.split('/').nth(2) {
        Some(segment) if !segment.is_empty() => segment,
        _ => DEFAULT_PREFIX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_has_prefix_timestamp_and_suffix() {
        let key = generate_key("deals");
        let parts: Vec<&str> = key.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "deals");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 7);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_key("req")).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn prefix_follows_resource_segment() {
        assert_eq!(prefix_for_path("/api/requests"), "requests");
        assert_eq!(prefix_for_path("/api/deals/d1/messages"), "deals");
        assert_eq!(prefix_for_path("/api/services?agent_id=a1"), "services");
        assert_eq!(prefix_for_path("/health"), "req");
        assert_eq!(prefix_for_path("/api/"), "req");
    }
}
