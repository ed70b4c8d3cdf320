use rusqlite::Connection;

use crate::core::errors::QueryError;
use crate::core::types::RecordId;

const QUARTERLY_CTE: &str = "
    SELECT OD.CustomerID,
           CAST(strftime('%Y', OD.OrderDate) AS INTEGER) AS Year,
           CASE
               WHEN CAST(strftime('%m', OD.OrderDate) AS INTEGER) <= 3 THEN 'Q1'
               WHEN CAST(strftime('%m', OD.OrderDate) AS INTEGER) <= 6 THEN 'Q2'
               WHEN CAST(strftime('%m', OD.OrderDate) AS INTEGER) <= 9 THEN 'Q3'
               ELSE 'Q4'
           END AS Quarter,
           ROUND(SUM(P.ProductUnitPrice * OD.QuantityOrdered)) AS Total
    FROM OrderDetail OD
    JOIN Product P ON P.ProductID = OD.ProductID
    GROUP BY OD.CustomerID, Year, Quarter";

#[derive(Debug, Clone)]
pub struct QuarterlyTotal {
    pub quarter: String,
    pub year: i64,
    pub customer_id: RecordId,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct RankedQuarterlyTotal {
    pub quarter: String,
    pub year: i64,
    pub customer_id: RecordId,
    pub total: f64,
    pub rank: i64,
}

#[derive(Debug, Clone)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
    pub rank: i64,
}

/// A customer's widest stretch of days between consecutive orders.
#[derive(Debug, Clone)]
pub struct OrderGap {
    pub customer_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub order_date: String,
    pub previous_order_date: String,
    pub max_days_without_order: f64,
}

/// Order totals per customer, bucketed by quarter and year.
pub fn quarterly_customer_totals(conn: &Connection) -> Result<Vec<QuarterlyTotal>, QueryError> {
    let sql = format!(
        "WITH quarterly AS ({QUARTERLY_CTE})
         SELECT Quarter, Year, CustomerID, Total
         FROM quarterly
         ORDER BY Year"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(QuarterlyTotal {
            quarter: row.get(0)?,
            year: row.get(1)?,
            customer_id: row.get(2)?,
            total: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// The five highest-spending customers of every quarter.
pub fn top_customers_per_quarter(
    conn: &Connection,
) -> Result<Vec<RankedQuarterlyTotal>, QueryError> {
    let sql = format!(
        "WITH quarterly AS ({QUARTERLY_CTE}),
         ranked AS (
             SELECT Quarter, Year, CustomerID, Total,
                    RANK() OVER (PARTITION BY Quarter, Year ORDER BY Total DESC)
                        AS CustomerRank
             FROM quarterly
         )
         SELECT Quarter, Year, CustomerID, Total, CustomerRank
         FROM ranked
         WHERE CustomerRank <= 5
         ORDER BY Year ASC, Quarter ASC, CustomerRank ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(RankedQuarterlyTotal {
            quarter: row.get(0)?,
            year: row.get(1)?,
            customer_id: row.get(2)?,
            total: row.get(3)?,
            rank: row.get(4)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Calendar months ranked by their all-time sales totals.
pub fn monthly_sales_ranking(conn: &Connection) -> Result<Vec<MonthlyTotal>, QueryError> {
    let mut stmt = conn.prepare(
        "WITH monthly AS (
             SELECT CASE strftime('%m', OD.OrderDate)
                        WHEN '01' THEN 'January'
                        WHEN '02' THEN 'February'
                        WHEN '03' THEN 'March'
                        WHEN '04' THEN 'April'
                        WHEN '05' THEN 'May'
                        WHEN '06' THEN 'June'
                        WHEN '07' THEN 'July'
                        WHEN '08' THEN 'August'
                        WHEN '09' THEN 'September'
                        WHEN '10' THEN 'October'
                        WHEN '11' THEN 'November'
                        WHEN '12' THEN 'December'
                    END AS Month,
                    SUM(ROUND(P.ProductUnitPrice * OD.QuantityOrdered)) AS TotalMonthlySales
             FROM OrderDetail OD
             JOIN Product P ON P.ProductID = OD.ProductID
             GROUP BY Month
         ),
         ranked AS (
             SELECT Month, TotalMonthlySales,
                    RANK() OVER (ORDER BY TotalMonthlySales DESC) AS TotalRank
             FROM monthly
         )
         SELECT Month, TotalMonthlySales AS Total, TotalRank
         FROM ranked
         ORDER BY TotalRank ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MonthlyTotal {
            month: row.get(0)?,
            total: row.get(1)?,
            rank: row.get(2)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Each customer's longest stretch of days between consecutive orders,
/// widest first. The reported pair is the earliest one that attains the
/// maximum. Customers with fewer than two orders do not appear.
pub fn longest_gap_per_customer(conn: &Connection) -> Result<Vec<OrderGap>, QueryError> {
    let mut stmt = conn.prepare(
        "WITH order_pairs AS (
             SELECT C.CustomerID,
                    C.FirstName,
                    C.LastName,
                    CO.Country,
                    OD.OrderDate,
                    LAG(OD.OrderDate) OVER (PARTITION BY OD.CustomerID
                                            ORDER BY OD.OrderDate) AS PreviousOrderDate
             FROM OrderDetail OD
             JOIN Customer C ON OD.CustomerID = C.CustomerID
             JOIN Country CO ON C.CountryID = CO.CountryID
         ),
         gaps AS (
             SELECT *,
                    julianday(OrderDate) - julianday(PreviousOrderDate)
                        AS MaxDaysWithoutOrder
             FROM order_pairs
             WHERE PreviousOrderDate IS NOT NULL
         ),
         max_gaps AS (
             SELECT CustomerID, MAX(MaxDaysWithoutOrder) AS MaxDaysWithoutOrder
             FROM gaps
             GROUP BY CustomerID
         )
         SELECT gaps.CustomerID,
                gaps.FirstName,
                gaps.LastName,
                gaps.Country,
                gaps.OrderDate,
                gaps.PreviousOrderDate,
                gaps.MaxDaysWithoutOrder
         FROM gaps
         JOIN max_gaps ON gaps.CustomerID = max_gaps.CustomerID
             AND gaps.MaxDaysWithoutOrder = max_gaps.MaxDaysWithoutOrder
             AND gaps.OrderDate = (SELECT MIN(g.OrderDate) FROM gaps g
                                   WHERE g.CustomerID = gaps.CustomerID
                                     AND g.MaxDaysWithoutOrder = max_gaps.MaxDaysWithoutOrder)
         ORDER BY gaps.MaxDaysWithoutOrder DESC, gaps.CustomerID DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(OrderGap {
            customer_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            country: row.get(3)?,
            order_date: row.get(4)?,
            previous_order_date: row.get(5)?,
            max_days_without_order: row.get(6)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
