use std::collections::HashMap;

use rusqlite::Connection;

use crate::core::errors::LoadError;
use crate::core::types::RecordId;

fn key_map(conn: &Connection, sql: &str) -> Result<HashMap<String, RecordId>, LoadError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, RecordId>(1)?))
    })?;

    let mut map = HashMap::new();
    for row in rows {
        let (key, id) = row?;
        map.insert(key, id);
    }
    Ok(map)
}

pub fn region_ids(conn: &Connection) -> Result<HashMap<String, RecordId>, LoadError> {
    key_map(conn, "SELECT Region, RegionID FROM Region")
}

pub fn country_ids(conn: &Connection) -> Result<HashMap<String, RecordId>, LoadError> {
    key_map(conn, "SELECT Country, CountryID FROM Country")
}

/// Keyed by full name, "First Last".
pub fn customer_ids(conn: &Connection) -> Result<HashMap<String, RecordId>, LoadError> {
    key_map(
        conn,
        "SELECT FirstName || ' ' || LastName, CustomerID FROM Customer",
    )
}

pub fn category_ids(conn: &Connection) -> Result<HashMap<String, RecordId>, LoadError> {
    key_map(
        conn,
        "SELECT ProductCategory, ProductCategoryID FROM ProductCategory",
    )
}

pub fn product_ids(conn: &Connection) -> Result<HashMap<String, RecordId>, LoadError> {
    key_map(conn, "SELECT ProductName, ProductID FROM Product")
}
