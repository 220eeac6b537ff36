mod mechanic_task;
mod notification;
mod service;
mod severity;
mod ticket;
mod user;
