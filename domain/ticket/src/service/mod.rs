mod assignment;
mod flow;
mod notify;
mod sweep;

#[rustfmt::skip]
pub use {
    assignment::AssignmentService,
    flow::TicketFlowService,
    notify::NotifyService,
    sweep::SlaSweepService,
};
