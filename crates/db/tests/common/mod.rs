//! Shared fixtures for repository integration tests.

use agrihub_core::roles::ROLE_FARMER;
use agrihub_core::types::DbId;
use agrihub_db::models::equipment::{CreateEquipment, CreateEquipmentCategory, Equipment};
use agrihub_db::models::farm::CreateFarm;
use agrihub_db::models::garden::CreateGarden;
use agrihub_db::models::task::{CreateTask, Task};
use agrihub_db::repositories::{
    EquipmentCategoryRepo, EquipmentRepo, FarmRepo, GardenRepo, TaskRepo, UserRepo,
};
use sqlx::PgPool;

pub async fn seed_farm(pool: &PgPool) -> DbId {
    FarmRepo::create(
        pool,
        &CreateFarm {
            name: "Green Acres".into(),
            address: "1 Field Lane".into(),
            description: "Test farm".into(),
            image: None,
        },
    )
    .await
    .expect("farm fixture")
    .id
}

pub async fn seed_user(pool: &PgPool, farm_id: DbId, role: &str, username: &str) -> DbId {
    UserRepo::create(
        pool,
        Some(farm_id),
        username,
        &format!("{username}@example.com"),
        "$argon2id$fixture-hash",
        "Test User",
        None,
        role,
    )
    .await
    .expect("user fixture")
    .id
}

pub async fn seed_farmer(pool: &PgPool, farm_id: DbId, username: &str) -> DbId {
    seed_user(pool, farm_id, ROLE_FARMER, username).await
}

pub async fn seed_category(pool: &PgPool) -> DbId {
    EquipmentCategoryRepo::create(
        pool,
        &CreateEquipmentCategory {
            name: "Tools".into(),
            description: String::new(),
        },
    )
    .await
    .expect("category fixture")
    .id
}

pub async fn seed_equipment(
    pool: &PgPool,
    farm_id: DbId,
    category_id: DbId,
    quantity: i32,
) -> Equipment {
    EquipmentRepo::create(
        pool,
        &CreateEquipment {
            farm_id,
            category_id,
            name: "Shovel".into(),
            image: None,
            quantity,
            description: String::new(),
        },
    )
    .await
    .expect("equipment fixture")
}

pub async fn seed_garden(pool: &PgPool, farm_id: DbId) -> DbId {
    GardenRepo::create(
        pool,
        &CreateGarden {
            farm_id,
            name: "North Plot".into(),
            area_m2: Some(120.0),
            description: String::new(),
            image: None,
        },
    )
    .await
    .expect("garden fixture")
    .id
}

pub async fn seed_task(pool: &PgPool, farm_id: DbId, garden_id: DbId) -> Task {
    TaskRepo::create(
        pool,
        farm_id,
        &CreateTask {
            garden_id,
            name: "Water the beds".into(),
            description: String::new(),
            image: None,
            task_type: "collect".into(),
            priority: None,
            start_date: None,
            end_date: None,
        },
        "medium",
    )
    .await
    .expect("task fixture")
}

/// Current stock of an equipment row, bypassing the repository filters.
pub async fn stock(pool: &PgPool, equipment_id: DbId) -> i32 {
    sqlx::query_scalar("SELECT quantity FROM equipment WHERE id = $1")
        .bind(equipment_id)
        .fetch_one(pool)
        .await
        .expect("stock query")
}

/// Number of history rows for a task.
pub async fn history_count(pool: &PgPool, task_id: DbId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM task_histories WHERE task_id = $1")
        .bind(task_id)
        .fetch_one(pool)
        .await
        .expect("history count query")
}
