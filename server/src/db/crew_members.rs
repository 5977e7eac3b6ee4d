//! Database operations for the crew_members table.

use fleet_engine::{CrewMember, CrewMemberFields, CrewMemberId, Role, ShipId};
use sqlx::{PgPool, Row};

/// A stored crew member row from the database.
#[derive(Debug)]
pub struct CrewMemberRow {
    pub crew_member_id: i64,
    pub name: String,
    pub role: String,
    pub ship_id: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CrewMemberRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CrewMemberRow {
            crew_member_id: row.try_get("crew_member_id")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            ship_id: row.try_get("ship_id")?,
        })
    }
}

impl CrewMemberRow {
    /// Convert database row to an engine CrewMember.
    pub fn into_crew_member(self) -> Result<CrewMember, sqlx::Error> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e: fleet_engine::Error| sqlx::Error::Decode(Box::new(e)))?;

        Ok(CrewMember {
            crew_member_id: self.crew_member_id,
            name: self.name,
            role,
            ship_id: self.ship_id,
        })
    }
}

/// Insert a crew member under a ship, returning it with its assigned key.
pub async fn insert_crew_member(
    pool: &PgPool,
    ship_id: ShipId,
    fields: &CrewMemberFields,
) -> Result<CrewMember, sqlx::Error> {
    sqlx::query_as::<_, CrewMemberRow>(
        r#"
        INSERT INTO crew_members (name, role, ship_id)
        VALUES ($1, $2, $3)
        RETURNING crew_member_id, name, role, ship_id
        "#,
    )
    .bind(&fields.name)
    .bind(fields.role.as_str())
    .bind(ship_id)
    .fetch_one(pool)
    .await?
    .into_crew_member()
}

/// Get all crew members of a ship, in key order.
pub async fn list_crew_members(
    pool: &PgPool,
    ship_id: ShipId,
) -> Result<Vec<CrewMember>, sqlx::Error> {
    sqlx::query_as::<_, CrewMemberRow>(
        r#"
        SELECT crew_member_id, name, role, ship_id
        FROM crew_members
        WHERE ship_id = $1
        ORDER BY crew_member_id ASC
        "#,
    )
    .bind(ship_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(CrewMemberRow::into_crew_member)
    .collect()
}

/// Get a crew member scoped by both keys.
pub async fn get_crew_member(
    pool: &PgPool,
    ship_id: ShipId,
    crew_member_id: CrewMemberId,
) -> Result<Option<CrewMember>, sqlx::Error> {
    sqlx::query_as::<_, CrewMemberRow>(
        r#"
        SELECT crew_member_id, name, role, ship_id
        FROM crew_members
        WHERE crew_member_id = $1 AND ship_id = $2
        "#,
    )
    .bind(crew_member_id)
    .bind(ship_id)
    .fetch_optional(pool)
    .await?
    .map(CrewMemberRow::into_crew_member)
    .transpose()
}

/// Replace a crew member's fields, scoped by both keys.
pub async fn update_crew_member(
    pool: &PgPool,
    member: &CrewMember,
) -> Result<Option<CrewMember>, sqlx::Error> {
    sqlx::query_as::<_, CrewMemberRow>(
        r#"
        UPDATE crew_members
        SET name = $3, role = $4
        WHERE crew_member_id = $1 AND ship_id = $2
        RETURNING crew_member_id, name, role, ship_id
        "#,
    )
    .bind(member.crew_member_id)
    .bind(member.ship_id)
    .bind(&member.name)
    .bind(member.role.as_str())
    .fetch_optional(pool)
    .await?
    .map(CrewMemberRow::into_crew_member)
    .transpose()
}

/// Delete a crew member scoped by both keys. Returns false if no such row.
pub async fn delete_crew_member(
    pool: &PgPool,
    ship_id: ShipId,
    crew_member_id: CrewMemberId,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query(r#"DELETE FROM crew_members WHERE crew_member_id = $1 AND ship_id = $2"#)
            .bind(crew_member_id)
            .bind(ship_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Check if a SQL error is a foreign key violation.
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        // PostgreSQL foreign key violation code is "23503"
        db_err.code().map(|c| c == "23503").unwrap_or(false)
    } else {
        false
    }
}
