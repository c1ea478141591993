use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(string(Documents::Collection))
                    .col(string(Documents::DocId))
                    .col(text(Documents::Body))
                    .col(big_integer(Documents::UpdatedAt))
                    .primary_key(Index::create().col(Documents::Collection).col(Documents::DocId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Documents::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Collection,
    DocId,
    Body,
    UpdatedAt,
}
