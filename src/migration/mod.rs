pub use sea_orm_migration::prelude::*;

mod m20250805_000001_create_user_table;
mod m20250805_000002_create_epic_table;
mod m20250805_000003_create_task_table;
mod m20250805_000004_create_comment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250805_000001_create_user_table::Migration),
            Box::new(m20250805_000002_create_epic_table::Migration),
            Box::new(m20250805_000003_create_task_table::Migration),
            Box::new(m20250805_000004_create_comment_table::Migration),
        ]
    }
}
