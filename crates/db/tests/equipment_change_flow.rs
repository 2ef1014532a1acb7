//! Integration tests for the equipment change approval workflow.

mod common;

use agrihub_core::equipment_change::{CHANGE_EXPORT, CHANGE_IMPORT, CHANGE_PENDING};
use agrihub_db::repositories::equipment_change_repo::ReviewOutcome;
use agrihub_db::repositories::EquipmentChangeRepo;
use assert_matches::assert_matches;
use sqlx::PgPool;

use common::{seed_category, seed_equipment, seed_farm, seed_user, stock};

#[sqlx::test(migrations = "./migrations")]
async fn test_create_starts_pending(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_IMPORT, 5, manager)
            .await
            .unwrap();

    assert_eq!(change.status, CHANGE_PENDING);
    assert_eq!(change.quantity, 5);
    // Stock does not move until approval.
    assert_eq!(stock(&pool, equipment.id).await, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approve_import_adds_stock(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_IMPORT, 5, manager)
            .await
            .unwrap();

    let outcome = EquipmentChangeRepo::approve(&pool, change.id, manager)
        .await
        .unwrap();

    let approved = assert_matches!(outcome, ReviewOutcome::Done(c) => c);
    assert_eq!(approved.status, "approved");
    assert_eq!(stock(&pool, equipment.id).await, 15);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approve_export_subtracts_stock(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_EXPORT, 4, manager)
            .await
            .unwrap();

    let outcome = EquipmentChangeRepo::approve(&pool, change.id, manager)
        .await
        .unwrap();

    assert_matches!(outcome, ReviewOutcome::Done(_));
    assert_eq!(stock(&pool, equipment.id).await, 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approve_export_refuses_overdraw(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    // The request passes creation, but stock drops before review.
    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_EXPORT, 8, manager)
            .await
            .unwrap();

    sqlx::query("UPDATE equipment SET quantity = 3 WHERE id = $1")
        .bind(equipment.id)
        .execute(&pool)
        .await
        .unwrap();

    let outcome = EquipmentChangeRepo::approve(&pool, change.id, manager)
        .await
        .unwrap();

    assert_matches!(outcome, ReviewOutcome::InsufficientStock { available: 3 });
    // Nothing moved, the change is still pending.
    assert_eq!(stock(&pool, equipment.id).await, 3);
    let reloaded = EquipmentChangeRepo::find_by_id(&pool, change.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, CHANGE_PENDING);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_review_is_refused(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_IMPORT, 5, manager)
            .await
            .unwrap();

    let first = EquipmentChangeRepo::approve(&pool, change.id, manager)
        .await
        .unwrap();
    assert_matches!(first, ReviewOutcome::Done(_));

    // A second approve must not double-apply the stock delta.
    let second = EquipmentChangeRepo::approve(&pool, change.id, manager)
        .await
        .unwrap();
    assert_matches!(second, ReviewOutcome::NotPending(status) if status == "approved");
    assert_eq!(stock(&pool, equipment.id).await, 15);

    // Nor may a reject overturn the decision.
    let rejected = EquipmentChangeRepo::reject(&pool, change.id, "too late", manager)
        .await
        .unwrap();
    assert_matches!(rejected, ReviewOutcome::NotPending(_));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_records_reason_without_stock_effect(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let change =
        EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_EXPORT, 5, manager)
            .await
            .unwrap();

    let outcome = EquipmentChangeRepo::reject(&pool, change.id, "not needed", manager)
        .await
        .unwrap();

    let rejected = assert_matches!(outcome, ReviewOutcome::Done(c) => c);
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.reject_reason.as_deref(), Some("not needed"));
    assert_eq!(stock(&pool, equipment.id).await, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_status_and_keyword(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 50).await;
    let manager = seed_user(&pool, farm_id, "manager", "mgr1").await;

    let a = EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_IMPORT, 1, manager)
        .await
        .unwrap();
    EquipmentChangeRepo::create(&pool, farm_id, equipment.id, CHANGE_EXPORT, 2, manager)
        .await
        .unwrap();
    EquipmentChangeRepo::approve(&pool, a.id, manager).await.unwrap();

    let pending =
        EquipmentChangeRepo::list_for_farm(&pool, farm_id, Some("pending"), None, None, None)
            .await
            .unwrap();
    assert_eq!(pending.total, 1);
    assert_eq!(pending.items[0].change_type, CHANGE_EXPORT);

    // Keyword matches on the joined equipment name.
    let by_name =
        EquipmentChangeRepo::list_for_farm(&pool, farm_id, None, Some("shov"), None, None)
            .await
            .unwrap();
    assert_eq!(by_name.total, 2);
    assert_eq!(by_name.items[0].equipment_name, "Shovel");
}
