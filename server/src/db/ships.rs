//! Database operations for the ships table.

use fleet_engine::{NewShip, Ship, ShipFilter, ShipId, ShipQuery, SortField, SortOrder};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// A stored ship row from the database.
#[derive(Debug)]
pub struct ShipRow {
    pub ship_id: i64,
    pub name: String,
    pub displacement: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ShipRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ShipRow {
            ship_id: row.try_get("ship_id")?,
            name: row.try_get("name")?,
            displacement: row.try_get("displacement")?,
        })
    }
}

impl ShipRow {
    /// Convert database row to an engine Ship.
    pub fn into_ship(self) -> Ship {
        Ship {
            ship_id: self.ship_id,
            name: self.name,
            displacement: self.displacement,
        }
    }
}

/// Sort expression for an allow-listed field.
///
/// Names compare bytewise so ordering matches the in-memory store whatever the
/// database collation.
fn sort_expression(field: SortField) -> &'static str {
    match field {
        SortField::Name => r#"name COLLATE "C""#,
        SortField::Displacement => "displacement",
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ShipFilter) {
    if filter.is_empty() {
        return;
    }

    let mut separator = " WHERE ";
    if let Some(name) = &filter.name {
        // strpos keeps % and _ literal, unlike LIKE
        builder
            .push(separator)
            .push("strpos(name, ")
            .push_bind(name.clone())
            .push(") > 0");
        separator = " AND ";
    }
    if let Some(displacement) = filter.displacement {
        builder
            .push(separator)
            .push("displacement = ")
            .push_bind(displacement);
    }
}

/// Insert a ship, returning it with its assigned key.
pub async fn insert_ship(pool: &PgPool, new: &NewShip) -> Result<Ship, sqlx::Error> {
    let row = sqlx::query_as::<_, ShipRow>(
        r#"
        INSERT INTO ships (name, displacement)
        VALUES ($1, $2)
        RETURNING ship_id, name, displacement
        "#,
    )
    .bind(&new.name)
    .bind(new.displacement)
    .fetch_one(pool)
    .await?;

    Ok(row.into_ship())
}

/// Get a ship by key.
pub async fn get_ship(pool: &PgPool, ship_id: ShipId) -> Result<Option<Ship>, sqlx::Error> {
    let row = sqlx::query_as::<_, ShipRow>(
        r#"
        SELECT ship_id, name, displacement
        FROM ships
        WHERE ship_id = $1
        "#,
    )
    .bind(ship_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ShipRow::into_ship))
}

/// Check if a ship with the given key exists.
pub async fn ship_exists(pool: &PgPool, ship_id: ShipId) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM ships WHERE ship_id = $1)"#)
        .bind(ship_id)
        .fetch_one(pool)
        .await?;

    Ok(result.0)
}

/// List ships: filter, then sort (ties by key), then page window.
pub async fn list_ships(pool: &PgPool, query: &ShipQuery) -> Result<Vec<Ship>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT ship_id, name, displacement FROM ships");
    push_filter(&mut builder, &query.filter);

    builder.push(" ORDER BY ");
    if let Some(sort) = query.sort {
        builder.push(sort_expression(sort.field));
        builder.push(match sort.order {
            SortOrder::Ascending => " ASC, ",
            SortOrder::Descending => " DESC, ",
        });
    }
    builder.push("ship_id ASC");

    if let Some(page) = query.page {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
    }

    let rows = builder.build_query_as::<ShipRow>().fetch_all(pool).await?;

    Ok(rows.into_iter().map(ShipRow::into_ship).collect())
}

/// Count ships matching a filter.
pub async fn count_ships(pool: &PgPool, filter: &ShipFilter) -> Result<u64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ships");
    push_filter(&mut builder, filter);

    let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;

    Ok(u64::try_from(count).unwrap_or(0))
}

/// Replace a ship's fields by key. Returns `None` if no such ship.
pub async fn update_ship(pool: &PgPool, ship: &Ship) -> Result<Option<Ship>, sqlx::Error> {
    let row = sqlx::query_as::<_, ShipRow>(
        r#"
        UPDATE ships
        SET name = $2, displacement = $3
        WHERE ship_id = $1
        RETURNING ship_id, name, displacement
        "#,
    )
    .bind(ship.ship_id)
    .bind(&ship.name)
    .bind(ship.displacement)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ShipRow::into_ship))
}

/// Delete a ship by key; its crew goes with it. Returns false if no such ship.
pub async fn delete_ship(pool: &PgPool, ship_id: ShipId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM ships WHERE ship_id = $1"#)
        .bind(ship_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every ship and crew member. Key sequences are left running.
pub async fn clear_fleet(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(r#"TRUNCATE crew_members, ships"#)
        .execute(pool)
        .await?;

    Ok(())
}
