mod assignment;
mod flow;
mod sweep;

#[rustfmt::skip]
pub use {
    assignment::AssignmentServiceImpl,
    flow::TicketFlowServiceImpl,
    sweep::SlaSweepServiceImpl,
};
