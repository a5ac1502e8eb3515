//! Identities that must not collide across runs against a shared server

use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const USERNAME_SUFFIX_LEN: usize = 8;

/// `user_` followed by 8 random lowercase alphanumerics.
#[must_use]
pub fn unique_username() -> String {
    username_with(&mut SmallRng::from_entropy())
}

fn username_with(rng: &mut impl Rng) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(USERNAME_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("user_{suffix}")
}

/// Pet id well above the small fixed ids used by parameterized scenarios.
#[must_use]
pub fn unique_pet_id() -> i64 {
    SmallRng::from_entropy().gen_range(1_000_000..1_000_000_000)
}

/// Same range as pets; orders from concurrent runs must not share an id.
#[must_use]
pub fn unique_order_id() -> i64 {
    SmallRng::from_entropy().gen_range(1_000_000..1_000_000_000)
}

/// Numeric id for a user record; lookups go through the username.
#[must_use]
pub fn unique_user_id() -> i64 {
    SmallRng::from_entropy().gen_range(1..=1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_shape() {
        let name = unique_username();
        assert!(name.starts_with("user_"));
        let suffix = &name["user_".len()..];
        assert_eq!(suffix.len(), USERNAME_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn seeded_usernames_are_deterministic() {
        let a = username_with(&mut SmallRng::seed_from_u64(7));
        let b = username_with(&mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn usernames_differ_across_calls() {
        let names: std::collections::HashSet<String> = (0..50).map(|_| unique_username()).collect();
        assert_eq!(names.len(), 50);
    }

    #[test]
    fn order_ids_rarely_repeat() {
        let ids: std::collections::HashSet<i64> = (0..50).map(|_| unique_order_id()).collect();
        assert!(ids.len() >= 49, "{} distinct of 50", ids.len());
    }

    #[test]
    fn id_ranges() {
        for _ in 0..100 {
            assert!(unique_pet_id() >= 1_000_000);
            assert!(unique_order_id() >= 1_000_000);
            assert!(unique_user_id() >= 1);
        }
    }
}
