use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain_ticket::{
    mock::{MockMechanicTaskRepo, MockNotifyService, MockTicketRepo, MockUserRepo},
    model::{
        entity::{
            ticket::TicketStatus,
            user::{UserRole, UserStatus},
            Ticket, User,
        },
        vo::AssignOutcome,
    },
    service::AssignmentService,
};
use service_ticket::AssignmentServiceImpl;
use uuid::Uuid;

fn ticket(status: TicketStatus, priority: i32, is_escalated: bool, created_at: DateTime<Utc>) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        mechanic_id: None,
        service_id: Uuid::new_v4(),
        title: "Gearbox whine".into(),
        description: None,
        image_url: None,
        priority,
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

fn mechanic(assigned_count: i32, last_assigned_at: Option<DateTime<Utc>>) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Sam".into(),
        email: "sam@example.com".into(),
        mobile: "0000000000".into(),
        role: UserRole::Mechanic,
        status: UserStatus::Active,
        assigned_count,
        last_assigned_at,
        created_at: Utc::now(),
    }
}

fn quiet_notify() -> MockNotifyService {
    let mut notify = MockNotifyService::new();
    notify.expect_notify().returning(|_, _, _| Ok(()));
    notify.expect_notify_role().returning(|_, _, _| Ok(()));
    notify
}

fn engine(
    tickets: MockTicketRepo,
    users: MockUserRepo,
    tasks: MockMechanicTaskRepo,
    notify: MockNotifyService,
) -> AssignmentServiceImpl {
    AssignmentServiceImpl::builder()
        .ticket_repo(Arc::new(tickets))
        .user_repo(Arc::new(users))
        .task_repo(Arc::new(tasks))
        .notify_service(Arc::new(notify))
        .build()
}

#[tokio::test]
async fn escalated_ticket_is_served_before_equal_rank() {
    let now = Utc::now();
    let plain = ticket(TicketStatus::Accepted, 1, false, now - Duration::hours(2));
    let escalated = ticket(TicketStatus::Accepted, 1, true, now - Duration::hours(1));
    let mech = mechanic(0, None);
    let escalated_id = escalated.id;

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));

    let mut tickets = MockTicketRepo::new();
    {
        let (plain, escalated) = (plain.clone(), escalated.clone());
        tickets
            .expect_get_queued()
            .returning(move || Ok(vec![plain.clone(), escalated.clone()]));
    }
    tickets
        .expect_update_where_status()
        .withf(move |patch, expected| {
            patch.id == escalated_id && matches!(expected, [TicketStatus::Accepted])
        })
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks
        .expect_insert()
        .withf(move |task| task.ticket_id == escalated_id)
        .times(1)
        .returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        AssignOutcome::Assigned { ticket_id: escalated_id, mechanic_id: mech.id }
    );
}

#[tokio::test]
async fn lower_priority_rank_wins_among_non_escalated() {
    let now = Utc::now();
    let routine = ticket(TicketStatus::Accepted, 2, false, now - Duration::hours(1));
    let urgent = ticket(TicketStatus::Accepted, 1, false, now - Duration::hours(1));
    let mech = mechanic(0, None);
    let urgent_id = urgent.id;

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));

    let mut tickets = MockTicketRepo::new();
    {
        let (routine, urgent) = (routine.clone(), urgent.clone());
        tickets
            .expect_get_queued()
            .returning(move || Ok(vec![routine.clone(), urgent.clone()]));
    }
    tickets
        .expect_update_where_status()
        .withf(move |patch, _| patch.id == urgent_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::Assigned { ticket_id: urgent_id, mechanic_id: mech.id });
}

#[tokio::test]
async fn creation_time_breaks_priority_ties() {
    let now = Utc::now();
    let newer = ticket(TicketStatus::Accepted, 1, false, now - Duration::minutes(5));
    let older = ticket(TicketStatus::Accepted, 1, false, now - Duration::minutes(50));
    let mech = mechanic(0, None);
    let older_id = older.id;

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));

    let mut tickets = MockTicketRepo::new();
    {
        let (newer, older) = (newer.clone(), older.clone());
        tickets.expect_get_queued().returning(move || Ok(vec![newer.clone(), older.clone()]));
    }
    tickets
        .expect_update_where_status()
        .withf(move |patch, _| patch.id == older_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::Assigned { ticket_id: older_id, mechanic_id: mech.id });
}

#[tokio::test]
async fn oldest_idle_mechanic_claims_first() {
    let now = Utc::now();
    let fresh = mechanic(0, Some(now - Duration::minutes(10)));
    let resting = mechanic(0, Some(now - Duration::hours(3)));
    let accepted = ticket(TicketStatus::Accepted, 1, false, now - Duration::minutes(30));
    let resting_id = resting.id;

    let mut tickets = MockTicketRepo::new();
    {
        let accepted = accepted.clone();
        tickets.expect_get_by_id().returning(move |_| Ok(Some(accepted.clone())));
    }
    tickets.expect_update_where_status().returning(|_, _| Ok(true));

    let mut users = MockUserRepo::new();
    {
        let (fresh, resting) = (fresh.clone(), resting.clone());
        users
            .expect_get_idle_mechanics()
            .returning(move || Ok(vec![fresh.clone(), resting.clone()]));
    }
    users
        .expect_try_occupy_slot()
        .withf(move |id, _| *id == resting_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_if_possible(accepted.id)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        AssignOutcome::Assigned { ticket_id: accepted.id, mechanic_id: resting_id }
    );
}

#[tokio::test]
async fn never_assigned_mechanic_leads_the_rotation() {
    let now = Utc::now();
    let veteran = mechanic(0, Some(now - Duration::days(1)));
    let rookie = mechanic(0, None);
    let accepted = ticket(TicketStatus::Accepted, 1, false, now);
    let rookie_id = rookie.id;

    let mut tickets = MockTicketRepo::new();
    {
        let accepted = accepted.clone();
        tickets.expect_get_by_id().returning(move |_| Ok(Some(accepted.clone())));
    }
    tickets.expect_update_where_status().returning(|_, _| Ok(true));

    let mut users = MockUserRepo::new();
    {
        let (veteran, rookie) = (veteran.clone(), rookie.clone());
        users
            .expect_get_idle_mechanics()
            .returning(move || Ok(vec![veteran.clone(), rookie.clone()]));
    }
    users
        .expect_try_occupy_slot()
        .withf(move |id, _| *id == rookie_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_if_possible(accepted.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::Assigned { ticket_id: accepted.id, mechanic_id: rookie_id });
}

#[tokio::test]
async fn no_idle_mechanic_keeps_the_ticket_queued() {
    let accepted = ticket(TicketStatus::Accepted, 1, false, Utc::now());

    let mut tickets = MockTicketRepo::new();
    {
        let accepted = accepted.clone();
        tickets.expect_get_by_id().returning(move |_| Ok(Some(accepted.clone())));
    }

    let mut users = MockUserRepo::new();
    users.expect_get_idle_mechanics().returning(|| Ok(vec![]));

    let outcome = engine(tickets, users, MockMechanicTaskRepo::new(), quiet_notify())
        .assign_if_possible(accepted.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::NoIdleMechanic);
}

#[tokio::test]
async fn punch_in_claims_the_exact_waiting_ticket() {
    let now = Utc::now();
    let waiting = ticket(TicketStatus::Accepted, 2, false, now - Duration::hours(1));
    let mech = mechanic(0, None);
    let waiting_id = waiting.id;

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().times(1).returning(|_, _| Ok(true));

    let mut tickets = MockTicketRepo::new();
    {
        let waiting = waiting.clone();
        tickets.expect_get_queued().returning(move || Ok(vec![waiting.clone()]));
    }
    tickets
        .expect_update_where_status()
        .withf(move |patch, _| patch.id == waiting_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::Assigned { ticket_id: waiting_id, mechanic_id: mech.id });
}

#[tokio::test]
async fn busy_mechanic_pulls_nothing() {
    let mech = mechanic(1, Some(Utc::now()));

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }

    let outcome = engine(MockTicketRepo::new(), users, MockMechanicTaskRepo::new(), quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::NoQueuedTicket);
}

#[tokio::test]
async fn lost_ticket_race_releases_the_slot() {
    let accepted = ticket(TicketStatus::Accepted, 1, false, Utc::now());
    let mech = mechanic(0, None);
    let mech_id = mech.id;

    let mut tickets = MockTicketRepo::new();
    {
        let accepted = accepted.clone();
        tickets.expect_get_by_id().returning(move |_| Ok(Some(accepted.clone())));
    }
    tickets.expect_update_where_status().times(1).returning(|_, _| Ok(false));

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_idle_mechanics().returning(move || Ok(vec![mech.clone()]));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));
    users
        .expect_release_slot()
        .withf(move |id| *id == mech_id)
        .times(1)
        .returning(|_| Ok(true));

    let outcome = engine(tickets, users, MockMechanicTaskRepo::new(), quiet_notify())
        .assign_if_possible(accepted.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::NoQueuedTicket);
}

#[tokio::test]
async fn lost_claim_retries_against_a_reread_queue() {
    let now = Utc::now();
    let first = ticket(TicketStatus::Accepted, 1, false, now - Duration::hours(1));
    let second = ticket(TicketStatus::Accepted, 2, false, now - Duration::minutes(30));
    let mech = mechanic(0, None);
    let (first_id, second_id) = (first.id, second.id);

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));

    let mut seq = mockall::Sequence::new();
    let mut tickets = MockTicketRepo::new();
    {
        let (first, second) = (first.clone(), second.clone());
        tickets
            .expect_get_queued()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(vec![first.clone(), second.clone()]));
    }
    {
        let second = second.clone();
        tickets
            .expect_get_queued()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(vec![second.clone()]));
    }
    tickets
        .expect_update_where_status()
        .withf(move |patch, _| patch.id == first_id)
        .times(1)
        .returning(|_, _| Ok(false));
    tickets
        .expect_update_where_status()
        .withf(move |patch, _| patch.id == second_id)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut tasks = MockMechanicTaskRepo::new();
    tasks.expect_insert().returning(|_| Ok(()));

    let outcome = engine(tickets, users, tasks, quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::Assigned { ticket_id: second_id, mechanic_id: mech.id });
}

#[tokio::test]
async fn empty_queue_hands_the_slot_back() {
    let mech = mechanic(0, None);
    let mech_id = mech.id;

    let mut users = MockUserRepo::new();
    {
        let mech = mech.clone();
        users.expect_get_by_id().returning(move |_| Ok(Some(mech.clone())));
    }
    users.expect_try_occupy_slot().returning(|_, _| Ok(true));
    users
        .expect_release_slot()
        .withf(move |id| *id == mech_id)
        .times(1)
        .returning(|_| Ok(true));

    let mut tickets = MockTicketRepo::new();
    tickets.expect_get_queued().returning(|| Ok(vec![]));

    let outcome = engine(tickets, users, MockMechanicTaskRepo::new(), quiet_notify())
        .assign_next_queued(mech.id)
        .await
        .unwrap();
    assert_eq!(outcome, AssignOutcome::NoQueuedTicket);
}
