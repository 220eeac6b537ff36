use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::{
    exception::TicketResult,
    model::{
        entity::{
            mechanic_task::DbMechanicTask,
            ticket::{CancelledBy, DbTicket, TicketStatus},
            user::{DbUser, UserRole},
            MechanicTask, Notification, Service, Severity, Ticket, User,
        },
        vo::AssignOutcome,
    },
    repository::{
        MechanicTaskRepo, NotificationRepo, ServiceRepo, SeverityRepo, TicketRepo, UserRepo,
    },
    service::{AssignmentService, NotifyService},
};

mock! {
    pub TicketRepo {}
    #[async_trait]
    impl TicketRepo for TicketRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ticket>>;
        async fn insert(&self, ticket: &Ticket) -> anyhow::Result<()>;
        async fn update(&self, patch: DbTicket) -> anyhow::Result<()>;
        async fn update_where_status(
            &self,
            patch: DbTicket,
            expected: &[TicketStatus],
        ) -> anyhow::Result<bool>;
        async fn get_queued(&self) -> anyhow::Result<Vec<Ticket>>;
        async fn get_open_with_severity(&self) -> anyhow::Result<Vec<(Ticket, Severity)>>;
        async fn cancel_where_pending(
            &self,
            ids: &[Uuid],
            by: CancelledBy,
            reason: &str,
            now: DateTime<Utc>,
        ) -> anyhow::Result<u64>;
        async fn escalate_where_accepted(&self, ids: &[Uuid]) -> anyhow::Result<u64>;
    }
}

mock! {
    pub UserRepo {}
    #[async_trait]
    impl UserRepo for UserRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
        async fn get_by_role(&self, role: UserRole) -> anyhow::Result<Vec<User>>;
        async fn get_idle_mechanics(&self) -> anyhow::Result<Vec<User>>;
        async fn update(&self, patch: DbUser) -> anyhow::Result<()>;
        async fn try_occupy_slot(&self, id: Uuid, now: DateTime<Utc>) -> anyhow::Result<bool>;
        async fn release_slot(&self, id: Uuid) -> anyhow::Result<bool>;
    }
}

mock! {
    pub MechanicTaskRepo {}
    #[async_trait]
    impl MechanicTaskRepo for MechanicTaskRepo {
        async fn insert(&self, task: &MechanicTask) -> anyhow::Result<()>;
        async fn get_open_by_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Option<MechanicTask>>;
        async fn update(&self, patch: DbMechanicTask) -> anyhow::Result<()>;
    }
}

mock! {
    pub SeverityRepo {}
    #[async_trait]
    impl SeverityRepo for SeverityRepo {
        async fn get_by_id(&self, id: i32) -> anyhow::Result<Option<Severity>>;
    }
}

mock! {
    pub ServiceRepo {}
    #[async_trait]
    impl ServiceRepo for ServiceRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Service>>;
    }
}

mock! {
    pub NotificationRepo {}
    #[async_trait]
    impl NotificationRepo for NotificationRepo {
        async fn insert(&self, notification: &Notification) -> anyhow::Result<()>;
    }
}

mock! {
    pub NotifyService {}
    #[async_trait]
    impl NotifyService for NotifyService {
        async fn notify(&self, user_id: Uuid, title: &str, body: &str) -> anyhow::Result<()>;
        async fn notify_role(&self, role: UserRole, title: &str, body: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub AssignmentService {}
    #[async_trait]
    impl AssignmentService for AssignmentService {
        async fn assign_if_possible(&self, ticket_id: Uuid) -> TicketResult<AssignOutcome>;
        async fn assign_next_queued(&self, mechanic_id: Uuid) -> TicketResult<AssignOutcome>;
    }
}
