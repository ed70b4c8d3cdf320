use rusqlite::Connection;

use crate::core::errors::LoadError;

// Facts dropped before dimensions so the foreign keys stay valid.
const SCHEMA: &str = "
DROP TABLE IF EXISTS OrderDetail;
DROP TABLE IF EXISTS Product;
DROP TABLE IF EXISTS ProductCategory;
DROP TABLE IF EXISTS Customer;
DROP TABLE IF EXISTS Country;
DROP TABLE IF EXISTS Region;

CREATE TABLE Region (
    RegionID INTEGER NOT NULL PRIMARY KEY,
    Region TEXT NOT NULL
);

CREATE TABLE Country (
    CountryID INTEGER NOT NULL PRIMARY KEY,
    Country TEXT NOT NULL,
    RegionID INTEGER NOT NULL,
    FOREIGN KEY (RegionID) REFERENCES Region (RegionID)
);

CREATE TABLE Customer (
    CustomerID INTEGER NOT NULL PRIMARY KEY,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL,
    Address TEXT NOT NULL,
    City TEXT NOT NULL,
    CountryID INTEGER NOT NULL,
    FOREIGN KEY (CountryID) REFERENCES Country (CountryID)
);

CREATE TABLE ProductCategory (
    ProductCategoryID INTEGER NOT NULL PRIMARY KEY,
    ProductCategory TEXT NOT NULL,
    ProductCategoryDescription TEXT NOT NULL
);

CREATE TABLE Product (
    ProductID INTEGER NOT NULL PRIMARY KEY,
    ProductName TEXT NOT NULL,
    ProductUnitPrice REAL NOT NULL,
    ProductCategoryID INTEGER NOT NULL,
    FOREIGN KEY (ProductCategoryID) REFERENCES ProductCategory (ProductCategoryID)
);

CREATE TABLE OrderDetail (
    OrderID INTEGER NOT NULL PRIMARY KEY,
    CustomerID INTEGER NOT NULL,
    ProductID INTEGER NOT NULL,
    OrderDate TEXT NOT NULL,
    QuantityOrdered INTEGER NOT NULL,
    FOREIGN KEY (CustomerID) REFERENCES Customer (CustomerID),
    FOREIGN KEY (ProductID) REFERENCES Product (ProductID)
);
";

/// Drops and recreates the warehouse tables.
pub fn init(conn: &Connection) -> Result<(), LoadError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
