use rusqlite::Connection;

use crate::core::errors::QueryError;

#[derive(Debug, Clone)]
pub struct RegionTotal {
    pub region: String,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct CountryTotal {
    pub country: String,
    pub total: f64,
}

/// A country's order total and its rank among the countries of its region.
#[derive(Debug, Clone)]
pub struct CountryRank {
    pub region: String,
    pub country: String,
    pub total: f64,
    pub rank: i64,
}

/// Order totals per region, largest first, rounded to two places.
pub fn totals_by_region(conn: &Connection) -> Result<Vec<RegionTotal>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT R.Region,
                ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered), 2) AS Total
         FROM OrderDetail OD
         JOIN Product P ON P.ProductID = OD.ProductID
         JOIN Customer C ON C.CustomerID = OD.CustomerID
         JOIN Country CO ON CO.CountryID = C.CountryID
         JOIN Region R ON R.RegionID = CO.RegionID
         GROUP BY R.Region
         ORDER BY Total DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RegionTotal {
            region: row.get(0)?,
            total: row.get(1)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Order totals per country, largest first, rounded to whole units.
pub fn totals_by_country(conn: &Connection) -> Result<Vec<CountryTotal>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT CO.Country,
                ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered)) AS CountryTotal
         FROM OrderDetail OD
         JOIN Product P ON P.ProductID = OD.ProductID
         JOIN Customer C ON C.CustomerID = OD.CustomerID
         JOIN Country CO ON CO.CountryID = C.CountryID
         GROUP BY CO.Country
         ORDER BY CountryTotal DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CountryTotal {
            country: row.get(0)?,
            total: row.get(1)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Every country ranked against the other countries of its region, regions
/// in ascending name order.
pub fn country_ranks_within_region(conn: &Connection) -> Result<Vec<CountryRank>, QueryError> {
    let mut stmt = conn.prepare(
        "WITH country_totals AS (
             SELECT R.Region,
                    CO.Country,
                    ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered)) AS CountryTotal
             FROM OrderDetail OD
             JOIN Product P ON P.ProductID = OD.ProductID
             JOIN Customer C ON C.CustomerID = OD.CustomerID
             JOIN Country CO ON CO.CountryID = C.CountryID
             JOIN Region R ON R.RegionID = CO.RegionID
             GROUP BY R.Region, CO.Country
         )
         SELECT Region,
                Country,
                CountryTotal,
                RANK() OVER (PARTITION BY Region ORDER BY CountryTotal DESC)
                    AS CountryRegionalRank
         FROM country_totals
         ORDER BY Region ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CountryRank {
            region: row.get(0)?,
            country: row.get(1)?,
            total: row.get(2)?,
            rank: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// The top-ranked country of each region.
pub fn leading_country_per_region(conn: &Connection) -> Result<Vec<CountryRank>, QueryError> {
    let mut stmt = conn.prepare(
        "WITH ranked AS (
             SELECT R.Region,
                    CO.Country,
                    ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered)) AS CountryTotal,
                    RANK() OVER (PARTITION BY R.Region
                                 ORDER BY SUM(P.ProductUnitPrice * OD.QuantityOrdered) DESC)
                        AS CountryRegionalRank
             FROM OrderDetail OD
             JOIN Product P ON P.ProductID = OD.ProductID
             JOIN Customer C ON C.CustomerID = OD.CustomerID
             JOIN Country CO ON CO.CountryID = C.CountryID
             JOIN Region R ON R.RegionID = CO.RegionID
             GROUP BY R.Region, CO.Country
         )
         SELECT Region, Country, CountryTotal, CountryRegionalRank
         FROM ranked
         WHERE CountryRegionalRank = 1
         ORDER BY Region ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CountryRank {
            region: row.get(0)?,
            country: row.get(1)?,
            total: row.get(2)?,
            rank: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
