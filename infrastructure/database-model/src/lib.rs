//! sea-orm table definitions shared by the repositories.

pub mod mechanic_task;
pub mod notification;
pub mod service;
pub mod severity;
pub mod ticket;
pub mod user;
