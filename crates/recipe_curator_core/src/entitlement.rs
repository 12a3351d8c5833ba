//! crates/recipe_curator_core/src/entitlement.rs
//!
//! Premium entitlement as a pure function of the stored user and the current time.
//! Nothing here is cached; callers recompute on every read so an expired daily
//! plan can never be reported as active.

use chrono::{DateTime, Duration, Utc};
use crate::domain::{SubscriptionType, User};

/// How long a daily plan lasts after purchase.
pub fn daily_plan_length() -> Duration {
    Duration::hours(24)
}

/// Whether `user` has premium access at `now`.
pub fn is_premium(user: &User, now: DateTime<Utc>) -> bool {
    match user.subscription {
        SubscriptionType::Monthly => true,
        SubscriptionType::Daily => user
            .subscription_end_date
            .map_or(false, |end| now < end),
        SubscriptionType::None => false,
    }
}

/// Time left on an active daily plan. `None` for every other plan and once expired.
pub fn remaining_premium_time(user: &User, now: DateTime<Utc>) -> Option<Duration> {
    if user.subscription != SubscriptionType::Daily {
        return None;
    }
    let left = user.subscription_end_date? - now;
    (left > Duration::zero()).then_some(left)
}

/// Formats a duration as `HH:MM:SS`, truncating to whole seconds.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn user_with(plan: SubscriptionType, end: Option<DateTime<Utc>>) -> User {
        User {
            subscription: plan,
            subscription_end_date: end,
            ..User::new("tester")
        }
    }

    #[test]
    fn monthly_is_premium_whatever_the_end_date() {
        let now = at(1_000_000);
        for end in [None, Some(at(0)), Some(at(2_000_000))] {
            assert!(is_premium(&user_with(SubscriptionType::Monthly, end), now));
        }
    }

    #[test]
    fn daily_is_premium_only_before_end() {
        let start = at(1_000_000);
        let user = user_with(SubscriptionType::Daily, Some(start + daily_plan_length()));

        assert!(is_premium(&user, start));
        assert!(is_premium(&user, start + Duration::hours(23)));
        assert!(!is_premium(&user, start + daily_plan_length()));
        assert!(!is_premium(&user, start + Duration::days(3)));
    }

    #[test]
    fn daily_without_end_date_is_not_premium() {
        assert!(!is_premium(&user_with(SubscriptionType::Daily, None), at(0)));
    }

    #[test]
    fn free_tier_is_never_premium() {
        assert!(!is_premium(&user_with(SubscriptionType::None, Some(at(10))), at(0)));
    }

    #[test]
    fn remaining_time_counts_down_and_stops_at_expiry() {
        let start = at(500);
        let user = user_with(SubscriptionType::Daily, Some(start + daily_plan_length()));

        assert_eq!(remaining_premium_time(&user, start), Some(daily_plan_length()));
        assert_eq!(
            remaining_premium_time(&user, start + Duration::hours(20)),
            Some(Duration::hours(4))
        );
        assert_eq!(remaining_premium_time(&user, start + daily_plan_length()), None);
    }

    #[test]
    fn remaining_time_is_absent_for_monthly() {
        let user = user_with(SubscriptionType::Monthly, None);
        assert_eq!(remaining_premium_time(&user, at(0)), None);
    }

    #[test]
    fn formats_as_zero_padded_clock() {
        assert_eq!(format_remaining(Duration::hours(24)), "24:00:00");
        assert_eq!(format_remaining(Duration::seconds(3_725)), "01:02:05");
        assert_eq!(format_remaining(Duration::milliseconds(999)), "00:00:00");
        assert_eq!(format_remaining(Duration::seconds(-5)), "00:00:00");
    }
}
