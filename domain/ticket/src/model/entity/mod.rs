pub mod mechanic_task;
pub mod notification;
pub mod service;
pub mod severity;
pub mod ticket;
pub mod user;

#[rustfmt::skip]
pub use {
    mechanic_task::MechanicTask,
    notification::Notification,
    service::Service,
    severity::Severity,
    ticket::Ticket,
    user::User,
};
