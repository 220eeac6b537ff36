use thiserror::Error;
use uuid::Uuid;

use crate::model::entity::ticket::TicketStatus;

pub type TicketResult<T> = Result<T, TicketException>;

#[derive(Error, Debug)]
pub enum TicketException {
    #[error("There is no ticket with id: {id}.")]
    TicketNotFound { id: Uuid },

    #[error("There is no mechanic with id: {id}.")]
    MechanicNotFound { id: Uuid },

    #[error("There is no service with id: {id}.")]
    ServiceNotFound { id: Uuid },

    #[error("There is no severity with id: {id}.")]
    SeverityNotFound { id: i32 },

    #[error("The service with id: {id} is not active.")]
    ServiceDisabled { id: Uuid },

    #[error("The ticket: {id} has no open mechanic task.")]
    MechanicTaskNotFound { id: Uuid },

    #[error("The ticket: {id} is not assigned to mechanic: {mechanic_id}.")]
    MechanicMismatch { id: Uuid, mechanic_id: Uuid },

    #[error("The ticket: {id} can not be {action} while {from}.")]
    InvalidStateTransition {
        id: Uuid,
        from: TicketStatus,
        action: &'static str,
    },

    #[error("Ticket internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for TicketException {
    fn from(e: anyhow::Error) -> Self {
        TicketException::InternalError { source: e }
    }
}
