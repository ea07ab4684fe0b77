use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonaBehaviors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonaBehaviors::PersonaId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PersonaBehaviors::TeenTone).string_len(64).null())
                    .col(ColumnDef::new(PersonaBehaviors::TeenSystemPrompt).text().null())
                    .col(
                        ColumnDef::new(PersonaBehaviors::TeenForbiddenTopics)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(PersonaBehaviors::AdultTone).string_len(64).null())
                    .col(ColumnDef::new(PersonaBehaviors::AdultSystemPrompt).text().null())
                    .col(
                        ColumnDef::new(PersonaBehaviors::AllowRomantic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PersonaBehaviors::AllowFlirty)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PersonaBehaviors::AllowIntimacy)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PersonaBehaviors::WellnessFocusOnly)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PersonaBehaviors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PersonaBehaviors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonaBehaviors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PersonaBehaviors {
    Table,
    PersonaId,
    TeenTone,
    TeenSystemPrompt,
    TeenForbiddenTopics,
    AdultTone,
    AdultSystemPrompt,
    AllowRomantic,
    AllowFlirty,
    AllowIntimacy,
    WellnessFocusOnly,
    CreatedAt,
    UpdatedAt,
}
