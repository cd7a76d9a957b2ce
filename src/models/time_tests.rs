use super::*;
use chrono::TimeZone;

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

#[test]
fn test_range_rejects_inverted_dates() {
    assert!(DateRange::new(date(2025, 6, 5), date(2025, 6, 1)).is_err());
    assert!(DateRange::new(date(2025, 6, 5), date(2025, 6, 5)).is_err());
    assert!(DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).is_ok());
}

#[test]
fn test_overlap_inner_and_disjoint() {
    let booked = DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).unwrap();

    let inner = DateRange::new(date(2025, 6, 3), date(2025, 6, 7)).unwrap();
    assert!(booked.overlaps(&inner));

    let disjoint = DateRange::new(date(2025, 7, 1), date(2025, 7, 5)).unwrap();
    assert!(!booked.overlaps(&disjoint));
}

#[test]
fn test_overlap_is_inclusive_at_bounds() {
    // A stay ending June 5 conflicts with one starting June 5: no same-day
    // turnover.
    let booked = DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).unwrap();
    let back_to_back = DateRange::new(date(2025, 6, 5), date(2025, 6, 10)).unwrap();
    assert!(booked.overlaps(&back_to_back));
    assert!(back_to_back.overlaps(&booked));

    // One day of clearance is enough.
    let next_day = DateRange::new(date(2025, 6, 6), date(2025, 6, 10)).unwrap();
    assert!(!booked.overlaps(&next_day));
}

#[test]
fn test_overlap_is_symmetric() {
    let a = DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).unwrap();
    let b = DateRange::new(date(2025, 6, 4), date(2025, 6, 9)).unwrap();
    assert_eq!(a.overlaps(&b), b.overlaps(&a));
}

#[test]
fn test_fixed_clock() {
    let clock = FixedClock::new(date(2025, 6, 1));
    assert_eq!(clock.now(), date(2025, 6, 1));
    clock.advance(chrono::Duration::days(2));
    assert_eq!(clock.now(), date(2025, 6, 3));
}
