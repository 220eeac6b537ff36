use anyhow::anyhow;
use chrono::{DateTime, Utc};
use database_model::service;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry offered by the facility. Owns a reference to exactly one
/// severity, which new tickets snapshot from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub r#type: ServiceType,
    pub severity_id: i32,
    pub default_expected_hours: Option<i32>,
    pub default_cost: Option<f64>,
    pub description: Option<String>,
    /// Inactive services take no new tickets.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Default, FromPrimitive, ToPrimitive, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceType {
    #[default]
    Repair,
    Maintenance,
    Modification,
    Accidental,
}

impl TryFrom<service::Model> for Service {
    type Error = anyhow::Error;

    fn try_from(model: service::Model) -> Result<Self, Self::Error> {
        let service::Model {
            id,
            title,
            r#type,
            severity_id,
            default_expected_hours,
            default_cost,
            description,
            is_active,
            created_at,
        } = model;

        Ok(Self {
            id,
            title,
            r#type: ServiceType::from_i32(r#type).ok_or(anyhow!("Wrong service type"))?,
            severity_id,
            default_expected_hours,
            default_cost,
            description,
            is_active,
            created_at,
        })
    }
}
