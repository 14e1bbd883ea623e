//! Schema creation and every SQL statement the handlers run.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::model::*;

/// Tables are created on startup if absent.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vehicle (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        make VARCHAR(50) NOT NULL,
        model VARCHAR(50) NOT NULL,
        year INTEGER NOT NULL,
        nickname VARCHAR(50),
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fuel_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_id INTEGER NOT NULL REFERENCES vehicle (id),
        date DATE NOT NULL,
        odometer INTEGER NOT NULL,
        liters REAL NOT NULL,
        price_per_liter REAL NOT NULL,
        total_cost REAL NOT NULL,
        full_tank BOOLEAN NOT NULL DEFAULT 0,
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS maintenance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_id INTEGER NOT NULL REFERENCES vehicle (id),
        date DATE NOT NULL,
        odometer INTEGER NOT NULL,
        service_type VARCHAR(100) NOT NULL,
        cost REAL NOT NULL,
        notes TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_fuel_log_vehicle ON fuel_log (vehicle_id)",
    "CREATE INDEX IF NOT EXISTS idx_maintenance_vehicle ON maintenance (vehicle_id)",
];

/// Opens a pool on `database_url`, creating the database file if missing.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn list_vehicles(pool: &SqlitePool) -> Result<Vec<Vehicle>, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>(
        "SELECT id, make, model, year, nickname, notes FROM vehicle ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_vehicle(pool: &SqlitePool, vehicle_id: i64) -> Result<Option<Vehicle>, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>(
        "SELECT id, make, model, year, nickname, notes FROM vehicle WHERE id = ?",
    )
    .bind(vehicle_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_vehicle(pool: &SqlitePool, vehicle: &NewVehicle) -> Result<i64, sqlx::Error> {
    let record = sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO vehicle (make, model, year, nickname, notes)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&vehicle.make)
    .bind(&vehicle.model)
    .bind(vehicle.year)
    .bind(&vehicle.nickname)
    .bind(&vehicle.notes)
    .fetch_one(pool)
    .await?;

    Ok(record.id)
}

pub async fn list_fuel_logs(pool: &SqlitePool, vehicle_id: i64) -> Result<Vec<FuelLog>, sqlx::Error> {
    sqlx::query_as::<_, FuelLog>(
        r#"
        SELECT id, vehicle_id, date, odometer, liters, price_per_liter, total_cost, full_tank, notes
        FROM fuel_log
        WHERE vehicle_id = ?
        ORDER BY id
        "#,
    )
    .bind(vehicle_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_fuel_log(pool: &SqlitePool, log: &NewFuelLog) -> Result<i64, sqlx::Error> {
    let record = sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO fuel_log
        (vehicle_id, date, odometer, liters, price_per_liter, total_cost, full_tank, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(log.vehicle_id)
    .bind(log.date)
    .bind(log.odometer)
    .bind(log.liters)
    .bind(log.price_per_liter)
    .bind(log.total_cost)
    .bind(log.full_tank)
    .bind(&log.notes)
    .fetch_one(pool)
    .await?;

    Ok(record.id)
}

pub async fn list_maintenance(
    pool: &SqlitePool,
    vehicle_id: i64,
) -> Result<Vec<Maintenance>, sqlx::Error> {
    sqlx::query_as::<_, Maintenance>(
        r#"
        SELECT id, vehicle_id, date, odometer, service_type, cost, notes
        FROM maintenance
        WHERE vehicle_id = ?
        ORDER BY id
        "#,
    )
    .bind(vehicle_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_maintenance(
    pool: &SqlitePool,
    entry: &NewMaintenance,
) -> Result<i64, sqlx::Error> {
    let record = sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO maintenance
        (vehicle_id, date, odometer, service_type, cost, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(entry.vehicle_id)
    .bind(entry.date)
    .bind(entry.odometer)
    .bind(&entry.service_type)
    .bind(entry.cost)
    .bind(&entry.notes)
    .fetch_one(pool)
    .await?;

    Ok(record.id)
}

/// Deletes a maintenance entry, returning the owning vehicle's id, or `None`
/// if no entry had that id.
pub async fn delete_maintenance(
    pool: &SqlitePool,
    maintenance_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("DELETE FROM maintenance WHERE id = ? RETURNING vehicle_id")
        .bind(maintenance_id)
        .fetch_optional(pool)
        .await
}

/// Single-connection in-memory pool with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");
    create_schema(&pool).await.expect("failed to create schema");
    pool
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn corolla() -> NewVehicle {
        NewVehicle {
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2020,
            nickname: None,
            notes: None,
        }
    }

    fn oil_change(vehicle_id: i64) -> NewMaintenance {
        NewMaintenance {
            vehicle_id,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            odometer: 30000,
            service_type: "Oil change".to_string(),
            cost: 65.0,
            notes: None,
        }
    }

    #[actix_web::test]
    async fn create_schema_is_idempotent() {
        let pool = test_pool().await;
        create_schema(&pool).await.expect("second run should be a no-op");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["fuel_log", "maintenance", "vehicle"]);
    }

    #[actix_web::test]
    async fn vehicle_round_trips_through_insert_and_get() {
        let pool = test_pool().await;
        let id = insert_vehicle(&pool, &corolla()).await.unwrap();

        let vehicle = get_vehicle(&pool, id).await.unwrap().unwrap();
        assert_eq!(vehicle.make, "Toyota");
        assert_eq!(vehicle.model, "Corolla");
        assert_eq!(vehicle.year, 2020);
        assert_eq!(vehicle.nickname, None);
        assert!(get_vehicle(&pool, id + 1).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn listings_are_scoped_to_vehicle() {
        let pool = test_pool().await;
        let first = insert_vehicle(&pool, &corolla()).await.unwrap();
        let second = insert_vehicle(&pool, &corolla()).await.unwrap();

        insert_maintenance(&pool, &oil_change(first)).await.unwrap();
        insert_fuel_log(
            &pool,
            &NewFuelLog {
                vehicle_id: second,
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                odometer: 1200,
                liters: 30.0,
                price_per_liter: 1.5,
                total_cost: 45.0,
                full_tank: true,
                notes: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(list_maintenance(&pool, first).await.unwrap().len(), 1);
        assert!(list_maintenance(&pool, second).await.unwrap().is_empty());
        assert!(list_fuel_logs(&pool, first).await.unwrap().is_empty());

        let logs = list_fuel_logs(&pool, second).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].full_tank);
        assert_eq!(logs[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[actix_web::test]
    async fn delete_maintenance_reports_owner() {
        let pool = test_pool().await;
        let vehicle_id = insert_vehicle(&pool, &corolla()).await.unwrap();
        let entry_id = insert_maintenance(&pool, &oil_change(vehicle_id)).await.unwrap();

        assert_eq!(
            delete_maintenance(&pool, entry_id).await.unwrap(),
            Some(vehicle_id)
        );
        assert_eq!(delete_maintenance(&pool, entry_id).await.unwrap(), None);
        assert!(list_maintenance(&pool, vehicle_id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn foreign_key_rejects_unknown_vehicle() {
        let pool = test_pool().await;
        let result = insert_maintenance(&pool, &oil_change(42)).await;
        assert!(result.is_err());
    }
}
