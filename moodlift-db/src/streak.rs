//! Streak and points arithmetic
//!
//! Pure functions shared by the check-in preview and the committing
//! transaction, so the two can never drift. All calendar-day comparisons
//! use UTC dates; callers read the clock once and pass the date in.

use chrono::{DateTime, NaiveDate, Utc};

/// Points awarded for completing the given streak day.
///
/// Days 1 through 6 earn a single point; from day 7 the award scales as
/// `round(5/7 × streak)` (half away from zero); every 30th day adds a
/// flat +10 bonus on top.
pub fn points_for_streak(streak: i64) -> i64 {
    let mut points = if streak <= 0 {
        0
    } else if streak <= 6 {
        1
    } else {
        ((5.0 / 7.0) * streak as f64).round() as i64
    };

    if streak > 0 && streak % 30 == 0 {
        points += 10;
    }

    points
}

/// Whether a check-in is allowed: true unless the last check-in falls on
/// the same calendar date as `today`.
pub fn can_checkin(last_checkin: Option<DateTime<Utc>>, today: NaiveDate) -> bool {
    match last_checkin {
        None => true,
        Some(last) => last.date_naive() != today,
    }
}

/// Whether the last check-in fell on the calendar date before `today`.
pub fn was_yesterday(last_checkin: Option<DateTime<Utc>>, today: NaiveDate) -> bool {
    match (last_checkin, today.pred_opt()) {
        (Some(last), Some(yesterday)) => last.date_naive() == yesterday,
        _ => false,
    }
}

/// The streak value a check-in on `today` would produce: consecutive days
/// extend the streak, a gap resets it to 1, and a same-day re-check-in
/// leaves it unchanged.
pub fn next_streak(last_checkin: Option<DateTime<Utc>>, current_streak: i64, today: NaiveDate) -> i64 {
    if was_yesterday(last_checkin, today) {
        current_streak + 1
    } else if can_checkin(last_checkin, today) {
        1
    } else {
        current_streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(9, 30, 0).unwrap())
    }

    #[test]
    fn test_points_for_early_streaks() {
        for streak in 1..=6 {
            assert_eq!(points_for_streak(streak), 1, "streak {streak}");
        }
    }

    #[test]
    fn test_points_scale_from_day_seven() {
        assert_eq!(points_for_streak(7), 5);
        assert_eq!(points_for_streak(8), 6);
        assert_eq!(points_for_streak(14), 10);
    }

    #[test]
    fn test_points_monthly_bonus() {
        // round(5/7 * 30) + 10
        assert_eq!(points_for_streak(30), 31);
        assert_eq!(points_for_streak(60), 53);
    }

    #[test]
    fn test_points_zero_streak() {
        assert_eq!(points_for_streak(0), 0);
    }

    #[test]
    fn test_consecutive_day_extends_streak() {
        let today = date(2024, 3, 15);
        let yesterday = at(today.pred_opt().unwrap());
        assert!(can_checkin(Some(yesterday), today));
        assert_eq!(next_streak(Some(yesterday), 5, today), 6);
    }

    #[test]
    fn test_same_day_is_rejected() {
        let today = date(2024, 3, 15);
        let this_morning = at(today);
        assert!(!can_checkin(Some(this_morning), today));
        assert_eq!(next_streak(Some(this_morning), 5, today), 5);
    }

    #[test]
    fn test_gap_resets_streak() {
        let today = date(2024, 3, 15);
        let three_days_ago = at(today.checked_sub_days(Days::new(3)).unwrap());
        assert!(can_checkin(Some(three_days_ago), today));
        assert_eq!(next_streak(Some(three_days_ago), 5, today), 1);
    }

    #[test]
    fn test_first_checkin_starts_at_one() {
        let today = date(2024, 3, 15);
        assert!(can_checkin(None, today));
        assert_eq!(next_streak(None, 0, today), 1);
    }

    #[test]
    fn test_month_boundary() {
        let today = date(2024, 3, 1);
        let yesterday = at(date(2024, 2, 29));
        assert_eq!(next_streak(Some(yesterday), 10, today), 11);
    }
}
