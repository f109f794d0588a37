use std::sync::Arc;

use super::common::*;
use crate::community::domain::{AuthorId, ReportId, ReportType, VerificationStatus, Vote};
use crate::community::repository::{ReportRepository, RepositoryError};
use crate::community::reputation::VerificationTally;
use crate::community::{
    AlertLevel, CommunityAlertService, CommunityServiceError, EscalationConfig,
};

#[test]
fn submit_stamps_report_and_evaluates_window() {
    let (service, repository, publisher) = build_service();

    let receipt = service
        .submit(submission("r-1", ReportType::EarlyWarning, Some("newcomer")), now())
        .expect("submission succeeds");

    assert_eq!(receipt.report.reported_at, now());
    assert_eq!(receipt.report.created_at, now());
    assert_eq!(
        receipt.report.author.as_ref().map(|author| author.reputation),
        Some(40)
    );
    assert_eq!(receipt.alert.total_report_count, 1);
    assert_eq!(receipt.alert.level, AlertLevel::None);
    assert!(!receipt.notified);
    assert!(publisher.events().is_empty());
    assert!(repository
        .fetch(&ReportId("r-1".to_string()))
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn anonymous_reports_are_accepted() {
    let (service, _, _) = build_service();

    let receipt = service
        .submit(submission("anon", ReportType::FullJubilee, None), now())
        .expect("submission succeeds");

    assert!(receipt.report.author.is_none());
    assert!(!receipt.notified);
}

#[test]
fn duplicate_submission_conflicts() {
    let (service, _, _) = build_service();
    service
        .submit(submission("dup", ReportType::EarlyWarning, None), now())
        .expect("first submission succeeds");

    match service.submit(submission("dup", ReportType::EarlyWarning, None), now()) {
        Err(CommunityServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn reports_lists_submissions_in_order() {
    let (service, _, _) = build_service();
    for id in ["first", "second"] {
        service
            .submit(submission(id, ReportType::EarlyWarning, None), now())
            .expect("submission succeeds");
    }

    let ids: Vec<String> = service
        .reports()
        .expect("listing succeeds")
        .into_iter()
        .map(|report| report.id.0)
        .collect();
    assert_eq!(ids, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn unknown_author_is_rejected() {
    let (service, repository, _) = build_service();

    match service.submit(submission("r-x", ReportType::EarlyWarning, Some("ghost")), now()) {
        Err(CommunityServiceError::MissingAuthor(id)) => assert_eq!(id.0, "r-x"),
        other => panic!("expected missing author, got {other:?}"),
    }
    assert!(repository.all().expect("list succeeds").is_empty());
}

#[test]
fn verified_watcher_sighting_publishes_immediately() {
    let (service, _, publisher) = build_service();

    let receipt = service
        .submit(submission("v-1", ReportType::FullJubilee, Some("veteran")), now())
        .expect("submission succeeds");

    assert!(receipt.notified);
    assert_eq!(receipt.alert.level, AlertLevel::Watch);
    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].report_id, ReportId("v-1".to_string()));
    assert_eq!(events[0].level, AlertLevel::Watch);
}

#[test]
fn grandfathered_flag_triggers_immediate_alert_without_escalating() {
    let (service, _, publisher) = build_service();

    let receipt = service
        .submit(submission("g-1", ReportType::EarlyWarning, Some("grandfathered")), now())
        .expect("submission succeeds");

    assert!(receipt.notified);
    assert_eq!(receipt.alert.level, AlertLevel::None);
    assert_eq!(publisher.events()[0].level, AlertLevel::Watch);
}

#[test]
fn all_clear_never_notifies() {
    let (service, _, publisher) = build_service();

    let receipt = service
        .submit(submission("c-1", ReportType::AllClear, Some("veteran")), now())
        .expect("submission succeeds");

    assert!(!receipt.notified);
    assert!(publisher.events().is_empty());
}

#[test]
fn publisher_failure_surfaces_after_report_is_stored() {
    let repository = Arc::new(MemoryRepository::with_authors(watchers()));
    let service = CommunityAlertService::new(
        repository.clone(),
        Arc::new(OfflinePublisher),
        EscalationConfig::default(),
    );

    match service.submit(submission("v-2", ReportType::FullJubilee, Some("veteran")), now()) {
        Err(CommunityServiceError::Publish(_)) => {}
        other => panic!("expected publish error, got {other:?}"),
    }
    assert_eq!(repository.all().expect("list succeeds").len(), 1);
}

#[test]
fn current_alert_reads_fresh_author_reputation() {
    let (service, repository, _) = build_service();
    service
        .submit(submission("r-1", ReportType::EarlyWarning, Some("newcomer")), now())
        .expect("submission succeeds");

    let before = service.current_alert(now(), None).expect("alert computes");
    assert_eq!(before.level, AlertLevel::None);

    repository
        .save_author(author("newcomer", 90))
        .expect("author saved");

    let after = service.current_alert(now(), None).expect("alert computes");
    assert_eq!(after.level, AlertLevel::Watch);
    assert_eq!(after.verified_watcher_count, 1);
}

#[test]
fn current_alert_escalates_as_reports_arrive() {
    let (service, _, _) = build_service();

    for index in 0..5 {
        service
            .submit(
                submission(&format!("fj-{index}"), ReportType::FullJubilee, None),
                minutes_ago(index),
            )
            .expect("submission succeeds");
    }

    let alert = service
        .current_alert(now(), Some(POINT_CLEAR))
        .expect("alert computes");
    assert_eq!(alert.level, AlertLevel::Confirmed);
    assert_eq!(alert.nearby_report_count, 5);

    let later = service
        .current_alert(now() + chrono::Duration::minutes(45), None)
        .expect("alert computes");
    assert_eq!(later.level, AlertLevel::None);
}

#[test]
fn votes_adjust_net_verifications() {
    let (service, _, _) = build_service();
    let id = ReportId("r-1".to_string());
    service
        .submit(submission("r-1", ReportType::EarlyWarning, None), now())
        .expect("submission succeeds");

    service.vote(&id, Vote::Confirm).expect("vote succeeds");
    service.vote(&id, Vote::Confirm).expect("vote succeeds");
    let report = service.vote(&id, Vote::Confirm).expect("vote succeeds");
    assert_eq!(report.verifications, 3);
    assert_eq!(report.verification_status(), VerificationStatus::Trusted);

    let report = service.vote(&id, Vote::Dispute).expect("vote succeeds");
    assert_eq!(service.get(&id).expect("report exists").verifications, 2);
    assert_eq!(report.verifications, 2);
}

#[test]
fn concurrent_votes_are_not_lost() {
    let (service, _, _) = build_service();
    let id = ReportId("busy".to_string());
    service
        .submit(submission("busy", ReportType::FullJubilee, None), now())
        .expect("submission succeeds");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..500 {
                    service.vote(&id, Vote::Confirm).expect("vote succeeds");
                }
            });
        }
    });

    assert_eq!(service.get(&id).expect("report exists").verifications, 4000);
}

#[test]
fn resolution_racing_votes_keeps_both_changes() {
    let (service, _, _) = build_service();
    let id = ReportId("r-1".to_string());
    service
        .submit(submission("r-1", ReportType::FullJubilee, Some("regular")), now())
        .expect("submission succeeds");

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..200 {
                service.vote(&id, Vote::Confirm).expect("vote succeeds");
            }
        });
        scope.spawn(|| {
            service.resolve(&id, true).expect("resolution succeeds");
        });
    });

    let report = service.get(&id).expect("report exists");
    assert_eq!(report.verifications, 200);
    assert!(report.verified);
    assert_eq!(report.author_reputation(), Some(77));
}

#[test]
fn voting_on_unknown_report_fails() {
    let (service, _, _) = build_service();

    match service.vote(&ReportId("missing".to_string()), Vote::Dispute) {
        Err(CommunityServiceError::UnknownReport(id)) => assert_eq!(id.0, "missing"),
        other => panic!("expected unknown report, got {other:?}"),
    }
}

#[test]
fn resolving_verified_report_promotes_author() {
    let (service, repository, _) = build_service();
    let id = ReportId("r-1".to_string());
    service
        .submit(submission("r-1", ReportType::FullJubilee, Some("regular")), now())
        .expect("submission succeeds");

    let update = service.resolve(&id, true).expect("resolution succeeds");

    assert_eq!(update.previous, 72);
    assert_eq!(update.reputation, 77);
    assert!(update.promoted);

    let stored = repository
        .author(&AuthorId("regular".to_string()))
        .expect("author lookup")
        .expect("author present");
    assert_eq!(stored.reputation, 77);
    assert!(stored.verified_watcher);

    let report = service.get(&id).expect("report exists");
    assert!(report.verified);
}

#[test]
fn resolving_false_report_costs_reputation() {
    let (service, _, _) = build_service();
    let id = ReportId("r-1".to_string());
    service
        .submit(submission("r-1", ReportType::EarlyWarning, Some("newcomer")), now())
        .expect("submission succeeds");

    let update = service.resolve(&id, false).expect("resolution succeeds");

    assert_eq!(update.delta, -1);
    assert_eq!(update.reputation, 39);
    assert!(!service.get(&id).expect("report exists").verified);
}

#[test]
fn resolving_anonymous_report_has_no_author_to_credit() {
    let (service, _, _) = build_service();
    let id = ReportId("anon".to_string());
    service
        .submit(submission("anon", ReportType::FullJubilee, None), now())
        .expect("submission succeeds");

    match service.resolve(&id, true) {
        Err(CommunityServiceError::MissingAuthor(missing)) => assert_eq!(missing, id),
        other => panic!("expected missing author, got {other:?}"),
    }
}

#[test]
fn tally_applies_aggregate_policy() {
    let (service, _, _) = build_service();

    let update = service
        .apply_tally(
            &AuthorId("veteran".to_string()),
            VerificationTally {
                verifications: 4,
                disputes: 3,
                moderator_flagged: true,
            },
        )
        .expect("tally applies");

    assert_eq!(update.delta, -8);
    assert_eq!(update.reputation, 74);
}

#[test]
fn tally_for_unknown_author_is_not_found() {
    let (service, _, _) = build_service();

    match service.apply_tally(&AuthorId("ghost".to_string()), VerificationTally::default()) {
        Err(CommunityServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn repository_outage_propagates() {
    let service = CommunityAlertService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryPublisher::default()),
        EscalationConfig::default(),
    );

    match service.current_alert(now(), None) {
        Err(CommunityServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline")
        }
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[test]
fn injected_clock_drives_now() {
    let (service, _, _) = build_service();

    assert_eq!(service.now(), now());
}
