use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202610010001_create_users::Migration),
            Box::new(migrations::m202610010002_create_activities::Migration),
            Box::new(migrations::m202610010003_create_enrollments::Migration),
            Box::new(migrations::m202610010004_create_attendance_sessions::Migration),
            Box::new(migrations::m202610010005_create_attendance_records::Migration),
        ]
    }
}
