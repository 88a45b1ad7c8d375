use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::booking::DATE_FORMAT;
use crate::models::{Service, ServiceRequest, ServiceRequestStatus, Vehicle};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Customers & sessions ──

pub fn create_customer(
    conn: &Connection,
    customer_id: &str,
    name: &str,
    email: Option<&str>,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO customers (customer_id, name, email) VALUES (?1, ?2, ?3)",
        params![customer_id, name, email],
    )?;
    Ok(())
}

pub fn create_session(conn: &Connection, token: &str, customer_id: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, customer_id) VALUES (?1, ?2)",
        params![token, customer_id],
    )?;
    Ok(())
}

pub fn get_customer_for_token(conn: &Connection, token: &str) -> anyhow::Result<Option<String>> {
    let customer_id = conn
        .query_row(
            "SELECT customer_id FROM sessions WHERE token = ?1",
            [token],
            |row| row.get(0),
        )
        .optional()?;
    Ok(customer_id)
}

// ── Vehicles ──

pub fn create_vehicle(
    conn: &Connection,
    customer_id: &str,
    brand: &str,
    model: &str,
    year: i32,
    registration_number: &str,
    fuel_type: &str,
) -> anyhow::Result<Vehicle> {
    conn.execute(
        "INSERT INTO vehicles (customer_id, brand, model, year, registration_number, fuel_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![customer_id, brand, model, year, registration_number, fuel_type],
    )?;

    Ok(Vehicle {
        vehicle_id: conn.last_insert_rowid(),
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        registration_number: registration_number.to_string(),
        fuel_type: fuel_type.to_string(),
    })
}

pub fn get_customer_vehicle(
    conn: &Connection,
    customer_id: &str,
    vehicle_id: i64,
) -> anyhow::Result<Option<Vehicle>> {
    let vehicle = conn
        .query_row(
            "SELECT vehicle_id, brand, model, year, registration_number, fuel_type
             FROM vehicles WHERE vehicle_id = ?1 AND customer_id = ?2",
            params![vehicle_id, customer_id],
            |row| {
                Ok(Vehicle {
                    vehicle_id: row.get(0)?,
                    brand: row.get(1)?,
                    model: row.get(2)?,
                    year: row.get(3)?,
                    registration_number: row.get(4)?,
                    fuel_type: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(vehicle)
}

// ── Services ──

fn service_from_row(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        service_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        base_price: row.get(3)?,
        estimated_time: row.get(4)?,
        category: row.get(5)?,
    })
}

pub fn list_active_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT service_id, name, description, base_price, estimated_time, category
         FROM services WHERE is_active = 1 ORDER BY category, name",
    )?;

    let services = stmt
        .query_map([], service_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(services)
}

pub fn get_service(conn: &Connection, service_id: i64) -> anyhow::Result<Option<Service>> {
    let service = conn
        .query_row(
            "SELECT service_id, name, description, base_price, estimated_time, category
             FROM services WHERE service_id = ?1 AND is_active = 1",
            [service_id],
            service_from_row,
        )
        .optional()?;
    Ok(service)
}

pub fn set_service_active(conn: &Connection, service_id: i64, active: bool) -> anyhow::Result<bool> {
    let changed = conn.execute(
        "UPDATE services SET is_active = ?1 WHERE service_id = ?2",
        params![active, service_id],
    )?;
    Ok(changed > 0)
}

// ── Service requests ──

pub fn create_service_request(conn: &Connection, request: &ServiceRequest) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO service_requests
            (request_id, customer_id, vehicle_id, service_id, scheduled_date,
             customer_notes, estimated_cost, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            request.request_id,
            request.customer_id,
            request.vehicle_id,
            request.service_id,
            request.scheduled_date.format(DATE_FORMAT).to_string(),
            request.customer_notes,
            request.estimated_cost,
            request.status.as_str(),
            request.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn list_service_requests(
    conn: &Connection,
    customer_id: &str,
) -> anyhow::Result<Vec<ServiceRequest>> {
    let mut stmt = conn.prepare(
        "SELECT request_id, customer_id, vehicle_id, service_id, scheduled_date,
                customer_notes, estimated_cost, status, created_at
         FROM service_requests WHERE customer_id = ?1
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map([customer_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut requests = Vec::with_capacity(rows.len());
    for (request_id, customer_id, vehicle_id, service_id, date, notes, cost, status, created) in
        rows
    {
        requests.push(ServiceRequest {
            scheduled_date: NaiveDate::parse_from_str(&date, DATE_FORMAT)?,
            created_at: NaiveDateTime::parse_from_str(&created, TIMESTAMP_FORMAT)?,
            status: ServiceRequestStatus::parse(&status),
            request_id,
            customer_id,
            vehicle_id,
            service_id,
            customer_notes: notes,
            estimated_cost: cost,
        });
    }

    Ok(requests)
}
