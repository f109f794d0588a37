use super::common::*;
use crate::community::domain::ReportType;
use crate::community::reputation::{
    apply_delta, qualifies_for_verified_watcher, report_outcome_delta, ReputationBadge,
    VerificationTally,
};

#[test]
fn outcome_delta_scales_with_report_stakes() {
    let cases = [
        (ReportType::FullJubilee, true, 5),
        (ReportType::FullJubilee, false, -3),
        (ReportType::EarlyWarning, true, 3),
        (ReportType::EarlyWarning, false, -1),
        (ReportType::AllClear, true, 1),
        (ReportType::AllClear, false, -1),
    ];

    for (report_type, verified, expected) in cases {
        assert_eq!(
            report_outcome_delta(report_type, verified),
            expected,
            "{report_type:?} verified={verified}"
        );
    }
}

#[test]
fn reputation_is_clamped_to_scale() {
    assert_eq!(apply_delta(98, 5), 100);
    assert_eq!(apply_delta(2, -3), 0);
    assert_eq!(apply_delta(0, -10), 0);
    assert_eq!(apply_delta(50, 3), 53);
}

#[test]
fn repeated_deltas_never_leave_the_scale() {
    let mut reputation = 50;
    for _ in 0..40 {
        reputation = apply_delta(reputation, 5);
        assert!(reputation <= 100);
    }
    assert_eq!(reputation, 100);

    for _ in 0..40 {
        reputation = apply_delta(reputation, -10);
    }
    assert_eq!(reputation, 0);
}

#[test]
fn tally_components_sum_independently() {
    let cases = [
        ((0, 0, false), 0),
        ((1, 0, false), 2),
        ((2, 0, false), 2),
        ((3, 0, false), 5),
        ((12, 0, false), 5),
        ((0, 3, false), -3),
        ((0, 30, false), -3),
        ((0, 2, false), 0),
        ((3, 3, false), 2),
        ((1, 4, true), -11),
        ((0, 0, true), -10),
    ];

    for ((verifications, disputes, moderator_flagged), expected) in cases {
        let tally = VerificationTally {
            verifications,
            disputes,
            moderator_flagged,
        };
        assert_eq!(tally.delta(), expected, "{tally:?}");
    }
}

#[test]
fn promotion_happens_once_at_seventy_five() {
    let mut watcher = author("w", 72);

    let first = watcher.apply_reputation_delta(3);
    assert_eq!(first.previous, 72);
    assert_eq!(first.reputation, 75);
    assert!(first.promoted);
    assert!(watcher.verified_watcher);

    let second = watcher.apply_reputation_delta(5);
    assert!(!second.promoted);
    assert_eq!(second.reputation, 80);
}

#[test]
fn verified_watcher_flag_is_sticky() {
    let mut watcher = author("w", 76);
    watcher.apply_reputation_delta(1);
    assert!(watcher.verified_watcher);

    let update = watcher.apply_reputation_delta(-10);

    assert_eq!(update.reputation, 67);
    assert!(update.verified_watcher);
    assert!(watcher.verified_watcher);
}

#[test]
fn falling_short_of_seventy_five_does_not_promote() {
    let mut watcher = author("w", 70);

    let update = watcher.apply_reputation_delta(4);

    assert_eq!(update.reputation, 74);
    assert!(!update.promoted);
    assert!(!watcher.verified_watcher);
}

#[test]
fn verified_watcher_qualification_starts_at_seventy_five() {
    assert!(!qualifies_for_verified_watcher(74));
    assert!(qualifies_for_verified_watcher(75));
    assert!(qualifies_for_verified_watcher(100));
}

#[test]
fn badges_follow_reputation_bands() {
    let cases = [
        (0, ReputationBadge::NoviceWatcher),
        (24, ReputationBadge::NoviceWatcher),
        (25, ReputationBadge::Contributor),
        (49, ReputationBadge::Contributor),
        (50, ReputationBadge::ExperiencedWatcher),
        (69, ReputationBadge::ExperiencedWatcher),
        (70, ReputationBadge::VerifiedWatcher),
        (89, ReputationBadge::VerifiedWatcher),
        (90, ReputationBadge::MasterWatcher),
        (100, ReputationBadge::MasterWatcher),
    ];

    for (reputation, expected) in cases {
        assert_eq!(ReputationBadge::for_reputation(reputation), expected);
    }
    assert_eq!(ReputationBadge::MasterWatcher.label(), "Master Watcher");
}
