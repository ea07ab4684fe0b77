use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgeAccessOverrides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgeAccessOverrides::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgeAccessOverrides::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AgeAccessOverrides::FeatureKey)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgeAccessOverrides::OverrideType)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgeAccessOverrides::Reason).text().null())
                    .col(
                        ColumnDef::new(AgeAccessOverrides::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(AgeAccessOverrides::GrantedBy).uuid().null())
                    .col(
                        ColumnDef::new(AgeAccessOverrides::ConsentReference)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AgeAccessOverrides::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AgeAccessOverrides::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::cust("override_type IN ('grant', 'deny')"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(AgeAccessOverrides::Table)
                    .col(AgeAccessOverrides::UserId)
                    .col(AgeAccessOverrides::FeatureKey)
                    .unique()
                    .name("idx_age_access_overrides_user_feature")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgeAccessOverrides::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AgeAccessOverrides {
    Table,
    Id,
    UserId,
    FeatureKey,
    OverrideType,
    Reason,
    ExpiresAt,
    GrantedBy,
    ConsentReference,
    CreatedAt,
    UpdatedAt,
}
