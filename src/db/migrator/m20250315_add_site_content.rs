use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use super::m20250301_initial::create_with_indexes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        create_with_indexes(manager, &schema, TrackSteps).await?;
        create_with_indexes(manager, &schema, Partners).await?;
        create_with_indexes(manager, &schema, ContactInfo).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrackSteps).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partners).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactInfo).to_owned())
            .await?;

        Ok(())
    }
}
