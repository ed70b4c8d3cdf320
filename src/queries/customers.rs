use rusqlite::{params, Connection};

use crate::core::errors::QueryError;
use crate::core::types::{CustomerTotal, RecordId};
use crate::engine::lookup;

fn resolve_customer(conn: &Connection, name: &str) -> Result<RecordId, QueryError> {
    let ids = lookup::customer_ids(conn)?;
    ids.get(name)
        .copied()
        .ok_or_else(|| QueryError::UnknownCustomer(name.to_string()))
}

/// One purchased line for a customer's order history.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub name: String,
    pub product: String,
    pub order_date: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub total: f64,
}

/// Every order line for the named customer. The name is resolved to a
/// CustomerID through the customer dictionary, then bound as a parameter.
pub fn order_history(conn: &Connection, customer: &str) -> Result<Vec<OrderLine>, QueryError> {
    let customer_id = resolve_customer(conn, customer)?;

    let mut stmt = conn.prepare(
        "SELECT C.FirstName || ' ' || C.LastName AS Name,
                P.ProductName,
                OD.OrderDate,
                P.ProductUnitPrice,
                OD.QuantityOrdered,
                ROUND(P.ProductUnitPrice * OD.QuantityOrdered, 2) AS Total
         FROM OrderDetail OD
         JOIN Customer C ON C.CustomerID = OD.CustomerID
         JOIN Product P ON P.ProductID = OD.ProductID
         WHERE C.CustomerID = ?1",
    )?;
    let rows = stmt.query_map(params![customer_id], |row| {
        Ok(OrderLine {
            name: row.get(0)?,
            product: row.get(1)?,
            order_date: row.get(2)?,
            unit_price: row.get(3)?,
            quantity: row.get(4)?,
            total: row.get(5)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Lifetime order total for the named customer. None if the customer has no
/// orders.
pub fn lifetime_total(
    conn: &Connection,
    customer: &str,
) -> Result<Option<CustomerTotal>, QueryError> {
    let customer_id = resolve_customer(conn, customer)?;

    let mut stmt = conn.prepare(
        "SELECT C.FirstName || ' ' || C.LastName AS Name,
                ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered), 2) AS Total
         FROM OrderDetail OD
         JOIN Customer C ON C.CustomerID = OD.CustomerID
         JOIN Product P ON P.ProductID = OD.ProductID
         WHERE C.CustomerID = ?1
         GROUP BY Name",
    )?;
    let mut rows = stmt.query_map(params![customer_id], |row| {
        Ok(CustomerTotal {
            name: row.get(0)?,
            total: row.get(1)?,
        })
    })?;

    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Lifetime totals for every customer, largest first.
pub fn totals_by_customer(conn: &Connection) -> Result<Vec<CustomerTotal>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT C.FirstName || ' ' || C.LastName AS Name,
                ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered), 2) AS Total
         FROM OrderDetail OD
         JOIN Customer C ON C.CustomerID = OD.CustomerID
         JOIN Product P ON P.ProductID = OD.ProductID
         GROUP BY OD.CustomerID
         ORDER BY Total DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CustomerTotal {
            name: row.get(0)?,
            total: row.get(1)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
