mod db;
mod mechanic_task;
mod notification;
mod service;
mod severity;
mod ticket;
mod user;

#[rustfmt::skip]
pub use {
    db::DbField,
    mechanic_task::MechanicTaskRepo,
    notification::NotificationRepo,
    service::ServiceRepo,
    severity::SeverityRepo,
    ticket::TicketRepo,
    user::UserRepo,
};
