use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use domain_ticket::{
    mock::{MockNotifyService, MockTicketRepo},
    model::entity::{
        ticket::{CancelledBy, TicketStatus},
        Severity, Ticket,
    },
    service::SlaSweepService,
};
use service_ticket::SlaSweepServiceImpl;
use uuid::Uuid;

fn severity(max_accept_minutes: i64, max_assign_minutes: i64) -> Severity {
    Severity {
        id: 1,
        name: "High".into(),
        priority: 1,
        max_accept_minutes,
        max_assign_minutes,
        color: "#e65100".into(),
        description: None,
    }
}

fn ticket(status: TicketStatus, is_escalated: bool, created_at: DateTime<Utc>) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        mechanic_id: None,
        service_id: Uuid::new_v4(),
        title: "Clutch slipping".into(),
        description: None,
        image_url: None,
        priority: 1,
        cost: None,
        status,
        is_escalated,
        is_paid: false,
        payment_method: None,
        created_at,
        accepted_at: None,
        assigned_at: None,
        completed_at: None,
        cancelled_at: None,
        cancelled_by: None,
        cancellation_reason: None,
    }
}

fn sweeper(tickets: MockTicketRepo, notify: MockNotifyService) -> SlaSweepServiceImpl {
    SlaSweepServiceImpl::builder()
        .ticket_repo(Arc::new(tickets))
        .notify_service(Arc::new(notify))
        .build()
}

#[tokio::test]
async fn pending_past_accept_deadline_is_cancelled_by_system() {
    let now = Utc::now();
    let stale = ticket(TicketStatus::Pending, false, now - Duration::minutes(31));
    let stale_id = stale.id;
    let client_id = stale.client_id;

    let mut tickets = MockTicketRepo::new();
    {
        let stale = stale.clone();
        tickets
            .expect_get_open_with_severity()
            .returning(move || Ok(vec![(stale.clone(), severity(30, 120))]));
    }
    tickets
        .expect_cancel_where_pending()
        .withf(move |ids, by, reason, _| {
            ids == [stale_id]
                && *by == CancelledBy::System
                && reason == "Auto-cancelled due to Accept SLA breach"
        })
        .times(1)
        .returning(|ids, _, _, _| Ok(ids.len() as u64));

    let mut notify = MockNotifyService::new();
    notify
        .expect_notify()
        .withf(move |user, title, _| *user == client_id && title == "Ticket Cancelled")
        .times(1)
        .returning(|_, _, _| Ok(()));
    notify
        .expect_notify_role()
        .withf(|_, title, _| title == "Tickets Auto-Cancelled")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = sweeper(tickets, notify).run_sweep_once(now).await.unwrap();
    assert_eq!(report.cancelled, vec![stale_id]);
    assert!(report.escalated.is_empty());
}

#[tokio::test]
async fn accepted_past_assign_deadline_is_escalated_not_cancelled() {
    let now = Utc::now();
    let waiting = ticket(TicketStatus::Accepted, false, now - Duration::minutes(61));
    let waiting_id = waiting.id;

    let mut tickets = MockTicketRepo::new();
    {
        let waiting = waiting.clone();
        tickets
            .expect_get_open_with_severity()
            .returning(move || Ok(vec![(waiting.clone(), severity(30, 60))]));
    }
    tickets
        .expect_escalate_where_accepted()
        .withf(move |ids| ids == [waiting_id])
        .times(1)
        .returning(|ids| Ok(ids.len() as u64));

    let mut notify = MockNotifyService::new();
    notify
        .expect_notify()
        .withf(|_, title, body| title == "Ticket Escalated" && body.contains("Clutch slipping"))
        .times(1)
        .returning(|_, _, _| Ok(()));
    notify
        .expect_notify_role()
        .withf(|_, title, _| title == "Critical: Tickets Auto-Escalated")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = sweeper(tickets, notify).run_sweep_once(now).await.unwrap();
    assert!(report.cancelled.is_empty());
    assert_eq!(report.escalated, vec![waiting_id]);
}

#[tokio::test]
async fn second_pass_without_clock_advance_changes_nothing() {
    let now = Utc::now();
    let stale = ticket(TicketStatus::Pending, false, now - Duration::minutes(45));

    let mut seq = mockall::Sequence::new();
    let mut tickets = MockTicketRepo::new();
    {
        let stale = stale.clone();
        tickets
            .expect_get_open_with_severity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(vec![(stale.clone(), severity(30, 60))]));
    }
    // After the first pass the ticket is CANCELLED, hence no longer open.
    tickets
        .expect_get_open_with_severity()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![]));
    tickets.expect_cancel_where_pending().times(1).returning(|ids, _, _, _| Ok(ids.len() as u64));

    let mut notify = MockNotifyService::new();
    notify.expect_notify().returning(|_, _, _| Ok(()));
    notify.expect_notify_role().returning(|_, _, _| Ok(()));

    let sweeper = sweeper(tickets, notify);
    let first = sweeper.run_sweep_once(now).await.unwrap();
    let second = sweeper.run_sweep_once(now).await.unwrap();
    assert_eq!(first.cancelled.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn already_escalated_tickets_are_left_alone() {
    let now = Utc::now();
    let flagged = ticket(TicketStatus::Accepted, true, now - Duration::hours(5));

    let mut tickets = MockTicketRepo::new();
    tickets
        .expect_get_open_with_severity()
        .returning(move || Ok(vec![(flagged.clone(), severity(30, 60))]));

    let report = sweeper(tickets, MockNotifyService::new()).run_sweep_once(now).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn tickets_on_the_deadline_are_not_breached_yet() {
    let now = Utc::now();
    let on_edge = ticket(TicketStatus::Pending, false, now - Duration::minutes(30));

    let mut tickets = MockTicketRepo::new();
    tickets
        .expect_get_open_with_severity()
        .returning(move || Ok(vec![(on_edge.clone(), severity(30, 60))]));

    let report = sweeper(tickets, MockNotifyService::new()).run_sweep_once(now).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_pass() {
    let now = Utc::now();
    let stale = ticket(TicketStatus::Pending, false, now - Duration::minutes(90));
    let stale_id = stale.id;

    let mut tickets = MockTicketRepo::new();
    {
        let stale = stale.clone();
        tickets
            .expect_get_open_with_severity()
            .returning(move || Ok(vec![(stale.clone(), severity(30, 60))]));
    }
    tickets.expect_cancel_where_pending().times(1).returning(|ids, _, _, _| Ok(ids.len() as u64));

    let mut notify = MockNotifyService::new();
    notify.expect_notify().returning(|_, _, _| Err(anyhow!("push gateway down")));
    notify.expect_notify_role().returning(|_, _, _| Err(anyhow!("push gateway down")));

    let report = sweeper(tickets, notify).run_sweep_once(now).await.unwrap();
    assert_eq!(report.cancelled, vec![stale_id]);
}
