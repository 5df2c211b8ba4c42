use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};
use uuid::Uuid;

use contactdesk::analytics::histogram::{self, first_max};
use contactdesk::analytics::insights::{self, growth_percent};
use contactdesk::analytics::ranking::{self, RankedEntry, TOP_N};
use contactdesk::analytics::window::DAY_MS;
use contactdesk::analytics::{self, Counts};
use contactdesk::models::Submission;

const HOUR_MS: i64 = 60 * 60 * 1000;

fn sub(name: &str, email: &str, subject: &str, message: &str, timestamp: i64) -> Submission {
    Submission {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
        timestamp,
    }
}

fn at(timestamp: i64) -> Submission {
    sub("Someone", "someone@example.com", "Hello", "message body", timestamp)
}

/// Friday 2026-10-16 12:00:00 UTC.
fn noon_friday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

fn entry(key: &str, count: usize) -> RankedEntry {
    RankedEntry {
        key: key.to_string(),
        count,
    }
}

// ── Counts ──────────────────────────────────────────────────────

#[test]
fn empty_set_counts_are_zero() {
    let records: Vec<Submission> = Vec::new();
    let report = analytics::build(&records, &noon_friday());

    assert_eq!(report.counts, Counts::default());
    assert_eq!(report.daily.len(), 7);
    assert!(report.daily.iter().all(|b| b.count == 0));
    assert!(report.weekdays.iter().all(|b| b.count == 0));
    assert!(report.top_subjects.is_empty());
    assert!(report.top_domains.is_empty());
    assert!(report.recent.is_empty());

    let insights = report.insights;
    assert_eq!(insights.average_message_length, 0);
    assert_eq!(insights.peak_hour, None);
    assert_eq!(insights.most_active_day, None);
    assert_eq!(insights.growth_percent, 0);
    assert_eq!(
        insights.lines,
        [
            "Average message length is 0 characters",
            "Week-over-week growth: 0%"
        ]
    );
}

#[test]
fn today_is_calendar_day_not_rolling_window() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 0, 30, 0).unwrap();
    let records = vec![
        at(ms(2026, 10, 15, 23, 0)), // 90 minutes ago, but yesterday
        at(ms(2026, 10, 16, 0, 10)),
    ];

    let counts = analytics::counts(&records, &now);
    assert_eq!(counts.total, 2);
    assert_eq!(counts.today, 1);
    assert_eq!(counts.week, 2);
}

#[test]
fn week_window_is_strict_trailing_seven_days() {
    let now = noon_friday();
    let now_ms = now.timestamp_millis();
    let records = vec![
        at(now_ms - 7 * DAY_MS),
        at(now_ms - 7 * DAY_MS + 1),
        at(now_ms + HOUR_MS), // future-dated still counts
    ];

    let counts = analytics::counts(&records, &now);
    assert_eq!(counts.week, 2);
    assert_eq!(counts.total, 3);
}

#[test]
fn today_never_exceeds_week_or_total() {
    let now = noon_friday();
    let now_ms = now.timestamp_millis();
    let records: Vec<Submission> = (0..60)
        .map(|i| at(now_ms - i * 7 * HOUR_MS + (i % 3) * 1000))
        .collect();

    for len in 0..records.len() {
        let counts = analytics::counts(&records[..len], &now);
        assert!(counts.today <= counts.week, "{counts:?}");
        assert!(counts.week <= counts.total, "{counts:?}");
    }
}

#[test]
fn today_follows_the_evaluation_zone() {
    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    // 23:30 UTC on the 16th is 01:30 on the 17th at +02:00
    let records = vec![at(ms(2026, 10, 16, 23, 30))];

    let utc_now = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
    assert_eq!(analytics::counts(&records, &utc_now).today, 0);

    let local_now = utc_now.with_timezone(&plus_two);
    assert_eq!(analytics::counts(&records, &local_now).today, 1);
}

// ── Histograms ──────────────────────────────────────────────────

#[test]
fn daily_histogram_covers_last_seven_calendar_days() {
    let now = noon_friday();
    let records = vec![
        at(ms(2026, 10, 16, 1, 0)),
        at(ms(2026, 10, 16, 23, 59)),
        at(ms(2026, 10, 14, 9, 0)),
        at(ms(2026, 10, 10, 0, 0)),
        at(ms(2026, 10, 9, 23, 59)), // eight calendar days back
        at(ms(2026, 10, 17, 0, 1)),  // tomorrow
    ];

    let daily = histogram::daily(&records, &now);
    let labels: Vec<&str> = daily.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Oct 10", "Oct 11", "Oct 12", "Oct 13", "Oct 14", "Oct 15", "Oct 16"]
    );
    let counts: Vec<usize> = daily.iter().map(|b| b.count).collect();
    assert_eq!(counts, [1, 0, 0, 0, 1, 0, 2]);
    assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2026, 10, 10).unwrap());

    let total: usize = counts.iter().sum();
    assert_eq!(total, 4);
}

#[test]
fn weekday_histogram_puts_sunday_last() {
    let records = vec![
        at(ms(2026, 10, 18, 10, 0)), // Sunday
        at(ms(2026, 10, 12, 10, 0)), // Monday
        at(ms(2026, 10, 13, 10, 0)), // Tuesday
        at(ms(2026, 10, 20, 10, 0)), // Tuesday
        at(ms(2026, 10, 17, 10, 0)), // Saturday
    ];

    let buckets = histogram::weekdays(&records, &Utc);
    assert_eq!(buckets, [1, 2, 0, 0, 0, 1, 1]);
    assert_eq!(buckets.iter().sum::<usize>(), records.len());

    let labelled = histogram::weekday_buckets(&buckets);
    assert_eq!(labelled[0].day, "Mon");
    assert_eq!(labelled[6].day, "Sun");
    assert_eq!(labelled[6].count, 1);
}

#[test]
fn first_max_prefers_earliest_index() {
    assert_eq!(first_max(&[0, 3, 1, 3]), Some(1));
    assert_eq!(first_max(&[2, 0, 2]), Some(0));
    assert_eq!(first_max(&[0, 0, 0]), None);
    assert_eq!(first_max(&[]), None);
}

// ── Rankings ────────────────────────────────────────────────────

#[test]
fn domain_ties_keep_insertion_order() {
    let t = noon_friday().timestamp_millis();
    let records = vec![
        sub("A", "a@x.com", "One", "message body", t),
        sub("B", "b@y.com", "Two", "message body", t),
    ];

    let report = analytics::build(&records, &noon_friday());
    assert_eq!(report.counts.total, 2);
    assert_eq!(report.top_domains, [entry("x.com", 1), entry("y.com", 1)]);
}

#[test]
fn domains_rank_by_count_and_truncate() {
    let t = noon_friday().timestamp_millis();
    let emails = [
        "a@one.com", "b@two.com", "c@two.com", "d@three.com", "e@four.com",
        "f@five.com", "g@six.com", "h@six.com", "i@six.com", "no-at-sign",
    ];
    let records: Vec<Submission> = emails
        .iter()
        .map(|e| sub("N", e, "S", "message body", t))
        .collect();

    let top = ranking::top_domains(&records, TOP_N);
    assert_eq!(
        top,
        [
            entry("six.com", 3),
            entry("two.com", 2),
            entry("one.com", 1),
            entry("three.com", 1),
            entry("four.com", 1),
        ]
    );
}

#[test]
fn domain_is_text_between_first_and_second_at() {
    let record = sub("N", "odd@mid@end.com", "S", "message body", 0);
    assert_eq!(record.email_domain(), Some("mid"));
    assert_eq!(sub("N", "plain", "S", "m", 0).email_domain(), None);
}

#[test]
fn subjects_rank_by_frequency() {
    let t = noon_friday().timestamp_millis();
    let subjects = ["A", "B", "C", "D", "E", "F", "F", "B", "F"];
    let records: Vec<Submission> = subjects
        .iter()
        .map(|s| sub("N", "n@x.com", s, "message body", t))
        .collect();

    let top = ranking::top_subjects(&records, TOP_N);
    assert_eq!(
        top,
        [
            entry("F", 3),
            entry("B", 2),
            entry("A", 1),
            entry("C", 1),
            entry("D", 1),
        ]
    );
}

#[test]
fn subjects_group_by_exact_string() {
    let records = vec![
        sub("N", "n@x.com", "Hello", "message body", 0),
        sub("N", "n@x.com", "hello", "message body", 0),
        sub("N", "n@x.com", "Hello", "message body", 0),
    ];

    let top = ranking::top_subjects(&records, TOP_N);
    assert_eq!(top, [entry("Hello", 2), entry("hello", 1)]);
}

// ── Insights ────────────────────────────────────────────────────

#[test]
fn growth_is_zero_without_baseline() {
    assert_eq!(growth_percent(0, 0), 0);
    assert_eq!(growth_percent(12, 0), 0);
}

#[test]
fn growth_rounds_half_up() {
    assert_eq!(growth_percent(3, 2), 50);
    assert_eq!(growth_percent(1, 2), -50);
    assert_eq!(growth_percent(1, 3), -67);
    assert_eq!(growth_percent(9, 8), 13);
    assert_eq!(growth_percent(7, 8), -12);
    assert_eq!(growth_percent(2, 2), 0);
}

#[test]
fn growth_compares_trailing_weeks() {
    let now = noon_friday();
    let now_ms = now.timestamp_millis();
    let records = vec![
        at(now_ms - HOUR_MS),
        at(now_ms - 2 * DAY_MS),
        at(now_ms - 6 * DAY_MS),
        at(now_ms - 7 * DAY_MS), // last week, boundary inclusive
        at(now_ms - 13 * DAY_MS),
        at(now_ms - 14 * DAY_MS), // too old for either week
    ];

    let weekday_counts = histogram::weekdays(&records, &Utc);
    let result = insights::compute(&records, &weekday_counts, &now);
    assert_eq!(result.this_week, 3);
    assert_eq!(result.last_week, 2);
    assert_eq!(result.growth_percent, 50);
    assert!(result
        .lines
        .contains(&"Week-over-week growth: +50%".to_string()));
}

#[test]
fn average_message_length_rounds_and_counts_chars() {
    let records = vec![
        sub("N", "n@x.com", "S", "0123456789", 0),
        sub("N", "n@x.com", "S", "0123456789a", 0),
    ];
    assert_eq!(insights::average_message_length(&records), 11);

    let accented = vec![sub("N", "n@x.com", "S", "héllo wörld", 0)];
    assert_eq!(insights::average_message_length(&accented), 11);

    let none: Vec<Submission> = Vec::new();
    assert_eq!(insights::average_message_length(&none), 0);
}

#[test]
fn peak_hour_and_most_active_day() {
    let now = noon_friday();
    let records = vec![
        at(ms(2026, 10, 13, 14, 5)), // Tuesday
        at(ms(2026, 10, 13, 9, 0)),  // Tuesday
        at(ms(2026, 10, 11, 14, 45)), // Sunday
        at(ms(2026, 10, 16, 9, 30)), // Friday
    ];

    let report = analytics::build(&records, &now);
    let insights = report.insights;
    assert_eq!(insights.peak_hour, Some(9));
    assert_eq!(insights.most_active_day, Some(Weekday::Tue));
    assert_eq!(
        insights.lines[0],
        "Peak submission time is 9:00 - 10:00"
    );
    assert!(insights
        .lines
        .contains(&"Most active day is Tuesday".to_string()));
}

#[test]
fn most_active_day_can_be_sunday() {
    let records = vec![at(ms(2026, 10, 18, 10, 0)), at(ms(2026, 10, 11, 10, 0))];
    let report = analytics::build(&records, &noon_friday());
    assert_eq!(report.insights.most_active_day, Some(Weekday::Sun));
}

#[test]
fn recent_lists_last_inserted_first() {
    let records: Vec<Submission> = (0..7)
        .map(|i| sub(&format!("N{i}"), "n@x.com", "S", "message body", 0))
        .collect();

    let recent = analytics::recent(&records, 5);
    let names: Vec<&str> = recent.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["N6", "N5", "N4", "N3", "N2"]);
}

#[test]
fn report_accepts_borrowed_views() {
    let records = vec![at(noon_friday().timestamp_millis())];
    let view: Vec<&Submission> = records.iter().collect();
    let report = analytics::build(&view, &noon_friday());
    assert_eq!(report.counts.total, 1);
    assert_eq!(report.counts.today, 1);
}
