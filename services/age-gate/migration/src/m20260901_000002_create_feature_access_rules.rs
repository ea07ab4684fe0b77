use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeatureAccessRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeatureAccessRules::FeatureKey)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeatureAccessRules::FeatureName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeatureAccessRules::Description).text().null())
                    .col(
                        ColumnDef::new(FeatureAccessRules::MinAgeRequired)
                            .small_integer()
                            .not_null()
                            .default(16),
                    )
                    .col(
                        ColumnDef::new(FeatureAccessRules::TeenAccessible)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FeatureAccessRules::AdultOnly)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FeatureAccessRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeatureAccessRules::ComplianceNote).text().null())
                    .col(
                        ColumnDef::new(FeatureAccessRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FeatureAccessRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::cust("min_age_required >= 0"))
                    .check(Expr::cust("NOT adult_only OR min_age_required >= 18"))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(FeatureAccessRules::Table)
                    .col(FeatureAccessRules::IsActive)
                    .name("idx_feature_access_rules_is_active")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeatureAccessRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FeatureAccessRules {
    Table,
    FeatureKey,
    FeatureName,
    Description,
    MinAgeRequired,
    TeenAccessible,
    AdultOnly,
    IsActive,
    ComplianceNote,
    CreatedAt,
    UpdatedAt,
}
