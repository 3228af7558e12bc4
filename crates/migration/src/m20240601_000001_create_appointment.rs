use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // `date` and `time` both carry the combined start timestamp.
        manager
            .create_table(
                Table::create()
                    .table(Appointment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointment::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Appointment::Clientname).text().not_null())
                    .col(ColumnDef::new(Appointment::Clientphone).text().not_null())
                    .col(ColumnDef::new(Appointment::Date).timestamp().not_null())
                    .col(ColumnDef::new(Appointment::Time).timestamp().not_null())
                    .col(ColumnDef::new(Appointment::Stylists).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_date")
                    .table(Appointment::Table)
                    .col(Appointment::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Appointment {
    Table,
    Id,
    Clientname,
    Clientphone,
    Date,
    Time,
    Stylists,
}
