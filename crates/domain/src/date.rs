use chrono::prelude::*;
use chrono::Days;
use chrono_tz::Tz;

/// Converts a unix timestamp in millis into the given civil time zone.
/// All reminder math uses one configured zone, never the server's
/// local clock.
pub fn zoned(timestamp_millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis).map(|dt| dt.with_timezone(&tz))
}

/// Weekday from the canonical picker encoding: 1=Monday .. 5=Friday.
/// Weekend indices are not offered by the picker and are rejected.
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        _ => None,
    }
}

pub fn german_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

pub fn format_day_and_date(date: &DateTime<Tz>) -> String {
    format!(
        "{}, {}",
        german_weekday(date.weekday()),
        date.format("%d.%m.%Y")
    )
}

/// Next future calendar occurrence of `target` at `hour`:00 relative
/// to `now`. If the target weekday is today but the hour has already
/// passed, the occurrence is pushed a full week ahead, so the result
/// is always strictly in the future and at most 7 days out.
///
/// Returns `None` when the local wall-clock time does not exist, e.g.
/// inside a DST gap.
pub fn next_weekday_occurrence(
    now: DateTime<Tz>,
    target: Weekday,
    hour: u32,
) -> Option<DateTime<Tz>> {
    let current = now.weekday().number_from_monday() as i64;
    let wanted = target.number_from_monday() as i64;

    let mut days_ahead = (wanted - current).rem_euclid(7);
    if days_ahead == 0 && now.hour() >= hour {
        days_ahead += 7;
    }

    let date = now
        .date_naive()
        .checked_add_days(Days::new(days_ahead as u64))?;
    let local = date.and_hms_opt(hour, 0, 0)?;
    now.timezone().from_local_datetime(&local).single()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::Europe::Berlin;

    // Monday 2026-03-02 11:00 Berlin time
    fn monday_at_eleven() -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap()
    }

    #[test]
    fn it_schedules_later_today_when_hour_not_passed() {
        let now = monday_at_eleven();
        let target = next_weekday_occurrence(now, Weekday::Mon, 16).unwrap();
        assert_eq!(target, Berlin.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap());
    }

    #[test]
    fn it_skips_a_full_week_when_todays_slot_has_elapsed() {
        // Monday 11:00, asking for Monday 10:00 -> next Monday, 7 days out
        let now = monday_at_eleven();
        let target = next_weekday_occurrence(now, Weekday::Mon, 10).unwrap();
        assert_eq!(target, Berlin.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap());
    }

    #[test]
    fn it_picks_the_upcoming_weekday_within_this_week() {
        let now = monday_at_eleven();
        let target = next_weekday_occurrence(now, Weekday::Thu, 10).unwrap();
        assert_eq!(target, Berlin.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn it_wraps_to_next_week_for_already_passed_weekdays() {
        // Thursday asking for Tuesday
        let now = Berlin.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        let target = next_weekday_occurrence(now, Weekday::Tue, 16).unwrap();
        assert_eq!(
            target,
            Berlin.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn it_never_produces_targets_in_the_past_or_beyond_seven_days() {
        let now = monday_at_eleven();
        for index in 1..=5 {
            let weekday = weekday_from_index(index).unwrap();
            for hour in [10, 16] {
                let target = next_weekday_occurrence(now, weekday, hour).unwrap();
                let lead = target.timestamp_millis() - now.timestamp_millis();
                assert!(lead > 0, "{:?} {}:00 not in the future", weekday, hour);
                assert!(
                    lead <= 7 * 24 * 60 * 60 * 1000,
                    "{:?} {}:00 further than 7 days out",
                    weekday,
                    hour
                );
            }
        }
    }

    #[test]
    fn it_rejects_weekend_indices() {
        assert!(weekday_from_index(0).is_none());
        assert!(weekday_from_index(6).is_none());
        assert!(weekday_from_index(7).is_none());
    }

    #[test]
    fn it_formats_german_dates() {
        let date = Berlin.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_day_and_date(&date), "Donnerstag, 05.03.2026");
    }
}
