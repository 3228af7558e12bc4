pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_appointment;
mod m20240601_000002_appointment_policies;

pub mod rls;

pub use rls::{disable_rls_sql, enable_rls_sql, RlsCommand, RlsPolicy, RlsRole};

/// Name of the table the booking store reads and writes
pub const APPOINTMENT_TABLE: &str = "appointment";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_appointment::Migration),
            Box::new(m20240601_000002_appointment_policies::Migration),
        ]
    }
}
