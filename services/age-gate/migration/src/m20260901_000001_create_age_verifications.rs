use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgeVerifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgeVerifications::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgeVerifications::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(AgeVerifications::Age).small_integer().not_null())
                    .col(ColumnDef::new(AgeVerifications::AgeTier).string_len(16).not_null())
                    .col(
                        ColumnDef::new(AgeVerifications::VerifiedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgeVerifications::VerificationMethod)
                            .string_len(32)
                            .not_null()
                            .default("self_reported"),
                    )
                    .col(ColumnDef::new(AgeVerifications::IpAddress).string_len(64).null())
                    .col(ColumnDef::new(AgeVerifications::UserAgent).text().null())
                    .col(
                        ColumnDef::new(AgeVerifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AgeVerifications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::cust("age >= 0"))
                    .check(Expr::cust("age_tier IN ('minor', 'teen', 'adult')"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgeVerifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AgeVerifications {
    Table,
    UserId,
    DateOfBirth,
    Age,
    AgeTier,
    VerifiedAt,
    VerificationMethod,
    IpAddress,
    UserAgent,
    CreatedAt,
    UpdatedAt,
}
