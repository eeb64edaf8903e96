use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Users::Id)
              .big_integer()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(Users::TelegramId).big_integer().null())
          .col(ColumnDef::new(Users::DiscordId).big_integer().null())
          .col(
            ColumnDef::new(Users::LicenseKey)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(ColumnDef::new(Users::MaxActivations).integer().not_null())
          .col(ColumnDef::new(Users::IssuedAt).big_integer().not_null())
          .col(ColumnDef::new(Users::ExpiresAt).big_integer().not_null())
          .col(
            ColumnDef::new(Users::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_telegram")
          .table(Users::Table)
          .col(Users::TelegramId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_discord")
          .table(Users::Table)
          .col(Users::DiscordId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  TelegramId,
  DiscordId,
  LicenseKey,
  MaxActivations,
  IssuedAt,
  ExpiresAt,
  Status,
  CreatedAt,
}
