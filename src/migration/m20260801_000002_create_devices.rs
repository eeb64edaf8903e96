use sea_orm_migration::prelude::*;

use super::m20260801_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Devices::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Devices::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Devices::UserId).big_integer().not_null())
          .col(ColumnDef::new(Devices::Hwid).string().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_devices_user")
              .from(Devices::Table, Devices::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_devices_user")
          .table(Devices::Table)
          .col(Devices::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Devices::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Devices {
  Table,
  Id,
  UserId,
  Hwid,
}
