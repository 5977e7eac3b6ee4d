//! Integration tests for the PostgreSQL repository.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/fleet_test cargo test -p fleet-server -- --ignored
//! ```

use fleet_engine::{
    Error, NewCrewMember, NewShip, PageWindow, Role, Ship, ShipFilter, ShipQuery, Sort, SortField,
};
use fleet_server::db;
use fleet_server::error::AppError;
use fleet_server::repository::{CrewRepository, PgRepository, ShipRepository};

async fn repository() -> PgRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&url).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    PgRepository::new(pool)
}

/// A name no other test run will have produced.
fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

fn by_name(name: &str) -> ShipFilter {
    ShipFilter {
        name: Some(name.to_string()),
        displacement: None,
    }
}

#[tokio::test]
#[ignore]
async fn ship_round_trip() {
    let repo = repository().await;
    let name = unique_name("Argo");

    let created = ShipRepository::create(&repo, &NewShip::new(name.clone(), 120))
        .await
        .unwrap();
    let read = ShipRepository::get(&repo, created.ship_id).await.unwrap();
    assert_eq!(read, Some(created.clone()));

    let updated = ShipRepository::update(
        &repo,
        &Ship {
            displacement: 900,
            ..created.clone()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.displacement, 900);

    assert!(ShipRepository::delete(&repo, created.ship_id).await.unwrap());
    assert!(!ShipRepository::delete(&repo, created.ship_id).await.unwrap());
    assert!(!repo.exists(created.ship_id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn filter_sort_and_page() {
    let repo = repository().await;
    let tag = unique_name("Fleet");
    for displacement in [300, 100, 200] {
        ShipRepository::create(&repo, &NewShip::new(format!("{tag}-{displacement}"), displacement))
            .await
            .unwrap();
    }

    let query = ShipQuery::new()
        .with_filter(by_name(&tag))
        .with_sort(Sort::descending(SortField::Displacement))
        .with_page(PageWindow::new(0, 2));

    let ships = repo.list(&query).await.unwrap();
    let displacements: Vec<i64> = ships.iter().map(|s| s.displacement).collect();
    assert_eq!(displacements, vec![300, 200]);
    assert_eq!(repo.count(&query.filter).await.unwrap(), 3);

    let rest = repo
        .list(&query.clone().with_page(PageWindow::new(1, 2)))
        .await
        .unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].displacement, 100);
}

#[tokio::test]
#[ignore]
async fn name_filter_is_literal() {
    let repo = repository().await;
    let tag = unique_name("Pct");
    ShipRepository::create(&repo, &NewShip::new(format!("{tag} 100%"), 100))
        .await
        .unwrap();

    assert_eq!(repo.count(&by_name(&format!("{tag} 100%"))).await.unwrap(), 1);
    assert_eq!(repo.count(&by_name(&format!("{tag}_"))).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn crew_follows_its_ship() {
    let repo = repository().await;
    let ship = ShipRepository::create(&repo, &NewShip::new(unique_name("Crewed"), 120))
        .await
        .unwrap();

    let fields = NewCrewMember::new("Haddock", "CAPTAIN").validate().unwrap();
    let member = CrewRepository::create(&repo, ship.ship_id, &fields)
        .await
        .unwrap();
    assert_eq!(member.role, Role::Captain);
    assert_eq!(
        repo.list_for_ship(ship.ship_id).await.unwrap(),
        vec![member.clone()]
    );

    ShipRepository::delete(&repo, ship.ship_id).await.unwrap();
    assert!(CrewRepository::get(&repo, ship.ship_id, member.crew_member_id)
        .await
        .unwrap()
        .is_none());

    let err = CrewRepository::create(&repo, ship.ship_id, &fields)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Engine(Error::ShipNotFound(_))));
}
