//! Integration tests for the community aggregate deletion cascade
//!
//! These tests need a provisioned PostgreSQL pointed at by `DATABASE_URL`
//! and are ignored by default; run them with `cargo test -- --ignored`.

mod support;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use api::models::{CreateCommunityRequest, CreateUserRequest};
use api::repositories::{CommunityRepository, HouseRepository, UserRepository};
use support::{test_pool, unique_email};

async fn create_admin(pool: &PgPool) -> Uuid {
    let users = UserRepository::new(pool.clone());
    users
        .create(&CreateUserRequest {
            name: "Community Admin".to_string(),
            email: unique_email("admin"),
            password: "admin-password".to_string(),
        })
        .await
        .unwrap()
        .expect("admin user")
        .id
}

async fn create_community(pool: &PgPool, admin: Uuid) -> Uuid {
    let communities = CommunityRepository::new(pool.clone());
    communities
        .create(
            &CreateCommunityRequest {
                name: "Maple Court".to_string(),
                district: "North".to_string(),
            },
            admin,
        )
        .await
        .unwrap()
        .id
}

async fn member_count(pool: &PgPool, house_id: Uuid) -> i64 {
    sqlx::query("SELECT COUNT(*) AS n FROM house_members WHERE house_id = $1")
        .bind(house_id)
        .fetch_one(pool)
        .await
        .unwrap()
        .get("n")
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn deleting_a_community_removes_houses_and_members() {
    let pool = test_pool().await;
    let communities = CommunityRepository::new(pool.clone());
    let houses = HouseRepository::new(pool.clone());

    let admin = create_admin(&pool).await;
    let community_id = create_community(&pool, admin).await;

    let h1 = communities.add_house(community_id, "House 1").await.unwrap().unwrap();
    let h2 = communities.add_house(community_id, "House 2").await.unwrap().unwrap();
    for house in [&h1, &h2] {
        houses.add_member(house.id, "Member A").await.unwrap().unwrap();
        houses.add_member(house.id, "Member B").await.unwrap().unwrap();
    }

    assert!(communities.delete_community(community_id).await.unwrap());

    assert!(communities.find_by_id(community_id).await.unwrap().is_none());
    for house in [&h1, &h2] {
        assert!(houses.find_by_id(house.id).await.unwrap().is_none());
        assert_eq!(member_count(&pool, house.id).await, 0);
    }
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn deleting_an_unknown_community_is_a_silent_false() {
    let pool = test_pool().await;
    let communities = CommunityRepository::new(pool.clone());

    assert!(!communities.delete_community(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn removing_a_house_detaches_all_members() {
    let pool = test_pool().await;
    let communities = CommunityRepository::new(pool.clone());
    let houses = HouseRepository::new(pool.clone());

    let admin = create_admin(&pool).await;
    let community_id = create_community(&pool, admin).await;

    let house = communities
        .add_house(community_id, "Crowded House")
        .await
        .unwrap()
        .unwrap();
    for i in 0..3 {
        houses
            .add_member(house.id, &format!("Member {}", i))
            .await
            .unwrap()
            .unwrap();
    }

    assert!(communities.remove_house(community_id, house.id).await.unwrap());

    let remaining = communities.list_houses(community_id).await.unwrap();
    assert!(remaining.iter().all(|h| h.id != house.id));
    assert_eq!(member_count(&pool, house.id).await, 0);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn removing_an_empty_house_works_too() {
    let pool = test_pool().await;
    let communities = CommunityRepository::new(pool.clone());
    let houses = HouseRepository::new(pool.clone());

    let admin = create_admin(&pool).await;
    let community_id = create_community(&pool, admin).await;

    let house = communities
        .add_house(community_id, "Empty House")
        .await
        .unwrap()
        .unwrap();

    assert!(communities.remove_house(community_id, house.id).await.unwrap());
    assert!(houses.find_by_id(house.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn removing_a_house_from_the_wrong_community_is_refused() {
    let pool = test_pool().await;
    let communities = CommunityRepository::new(pool.clone());
    let houses = HouseRepository::new(pool.clone());

    let admin = create_admin(&pool).await;
    let community_a = create_community(&pool, admin).await;
    let community_b = create_community(&pool, admin).await;

    let house = communities
        .add_house(community_a, "House A1")
        .await
        .unwrap()
        .unwrap();

    assert!(!communities.remove_house(community_b, house.id).await.unwrap());
    assert!(houses.find_by_id(house.id).await.unwrap().is_some());
}
