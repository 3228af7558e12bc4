use sea_orm_migration::prelude::*;

use crate::rls::{disable_rls_sql, enable_rls_sql, RlsCommand, RlsPolicy, RlsRole};
use crate::APPOINTMENT_TABLE;

#[derive(DeriveMigrationName)]
pub struct Migration;

// The booking screen talks to PostgREST with the anon key.
fn policies() -> Vec<RlsPolicy> {
    [
        ("anon can read appointments", RlsCommand::Select),
        ("anon can book appointments", RlsCommand::Insert),
        ("anon can edit appointments", RlsCommand::Update),
        ("anon can cancel appointments", RlsCommand::Delete),
    ]
    .into_iter()
    .map(|(name, command)| RlsPolicy::allow_all(name, APPOINTMENT_TABLE, command, RlsRole::Anon))
    .collect()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(&enable_rls_sql(APPOINTMENT_TABLE, Some("public")))
            .await?;
        for policy in policies() {
            db.execute_unprepared(&policy.create_policy_sql()).await?;
            println!(" -> RLS policy '{}' created.", policy.name);
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for policy in policies() {
            db.execute_unprepared(&policy.drop_policy_sql()).await?;
        }
        db.execute_unprepared(&disable_rls_sql(APPOINTMENT_TABLE, Some("public")))
            .await?;

        Ok(())
    }
}
