use std::sync::Arc;

use domain_ticket::repository::DbField;
use sea_orm::{ActiveValue, DatabaseConnection, Value};
use typed_builder::TypedBuilder;

/// One repository struct over the shared connection; every domain
/// repository trait is implemented on it. Mutations execute immediately;
/// race-prone ones are single conditional statements whose row count tells
/// the caller whether the claim held.
#[derive(Clone, TypedBuilder)]
pub struct OrmRepo {
    pub db: Arc<DatabaseConnection>,
}

impl OrmRepo {
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Map a partial-update field onto a sea-orm column value.
pub fn av<T, U>(field: DbField<T>, f: impl FnOnce(T) -> U) -> ActiveValue<U>
where
    U: Into<Value>,
{
    match field {
        DbField::Set(v) => ActiveValue::Set(f(v)),
        DbField::NotSet => ActiveValue::NotSet,
    }
}
