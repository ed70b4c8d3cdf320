use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::core::errors::LoadError;
use crate::core::types::SaleRecord;
use crate::engine::lookup;
use crate::engine::metrics::LoadMetrics;
use crate::engine::schema;
use crate::io::IngestEvent;

/// Loads the flat sales records into the normalized schema, one table per
/// step, dimensions before the facts that reference them. Each step
/// deduplicates and sorts its natural keys, assigns 1-based surrogate IDs,
/// and resolves foreign keys through a dictionary read back from the
/// previously loaded table. References that do not resolve are dropped and
/// counted, never errored.
pub struct Loader {
    conn: Connection,
    metrics: LoadMetrics,
}

impl Loader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, LoadError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LoadError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self {
            conn,
            metrics: LoadMetrics::default(),
        })
    }

    pub fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Runs the whole pipeline: recreates the schema, then loads the six
    /// tables in dependency order.
    pub fn load(
        &mut self,
        events: impl IntoIterator<Item = IngestEvent>,
    ) -> Result<(), LoadError> {
        let mut records = Vec::new();
        for event in events {
            match event {
                IngestEvent::Record(r) => records.push(r),
                IngestEvent::MalformedRow => self.metrics.malformed_rows += 1,
                IngestEvent::MalformedItem => self.metrics.malformed_items += 1,
            }
        }

        schema::init(&self.conn)?;
        self.load_regions(&records)?;
        self.load_countries(&records)?;
        self.load_customers(&records)?;
        self.load_categories(&records)?;
        self.load_products(&records)?;
        self.load_orders(&records)?;
        Ok(())
    }

    fn load_regions(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        let regions: BTreeSet<&str> = records.iter().map(|r| r.region.as_str()).collect();

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO Region (RegionID, Region) VALUES (?1, ?2)")?;
            for (i, region) in regions.iter().enumerate() {
                stmt.execute(params![(i + 1) as i64, region])?;
            }
        }
        tx.commit()?;

        debug!(rows = regions.len(), "loaded Region");
        Ok(())
    }

    fn load_countries(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        let region_ids = lookup::region_ids(&self.conn)?;

        // first occurrence fixes a country's region
        let mut countries: BTreeMap<&str, &str> = BTreeMap::new();
        for r in records {
            countries
                .entry(r.country.as_str())
                .or_insert(r.region.as_str());
        }

        let mut rows = Vec::with_capacity(countries.len());
        for (country, region) in countries {
            match region_ids.get(region) {
                Some(&region_id) => rows.push((country, region_id)),
                None => self.metrics.unresolved_regions += 1,
            }
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Country (CountryID, Country, RegionID) VALUES (?1, ?2, ?3)",
            )?;
            for (i, (country, region_id)) in rows.iter().enumerate() {
                stmt.execute(params![(i + 1) as i64, country, region_id])?;
            }
        }
        tx.commit()?;

        debug!(rows = rows.len(), "loaded Country");
        Ok(())
    }

    fn load_customers(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        let country_ids = lookup::country_ids(&self.conn)?;

        // one Customer row per input data row, no dedup
        let mut rows = Vec::with_capacity(records.len());
        for r in records {
            match country_ids.get(r.country.as_str()) {
                Some(&country_id) => rows.push((
                    r.customer.first.as_str(),
                    r.customer.last.as_str(),
                    r.address.as_str(),
                    r.city.as_str(),
                    country_id,
                )),
                None => self.metrics.unresolved_countries += 1,
            }
        }
        rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Customer (CustomerID, FirstName, LastName, Address, City, CountryID)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (i, (first, last, address, city, country_id)) in rows.iter().enumerate() {
                stmt.execute(params![
                    (i + 1) as i64,
                    first,
                    last,
                    address,
                    city,
                    country_id
                ])?;
            }
        }
        tx.commit()?;

        debug!(rows = rows.len(), "loaded Customer");
        Ok(())
    }

    fn load_categories(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        // description seen at a category's first occurrence wins
        let mut categories: BTreeMap<&str, &str> = BTreeMap::new();
        for item in records.iter().flat_map(|r| r.items.iter()) {
            categories
                .entry(item.category.as_str())
                .or_insert(item.category_description.as_str());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO ProductCategory (ProductCategoryID, ProductCategory, ProductCategoryDescription)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (i, (category, description)) in categories.iter().enumerate() {
                stmt.execute(params![(i + 1) as i64, category, description])?;
            }
        }
        tx.commit()?;

        debug!(rows = categories.len(), "loaded ProductCategory");
        Ok(())
    }

    fn load_products(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        let category_ids = lookup::category_ids(&self.conn)?;

        // distinct (name, category, price) triples in first-seen order
        let mut seen: HashSet<(&str, &str, u64)> = HashSet::new();
        let mut triples: Vec<(&str, &str, f64)> = Vec::new();
        for item in records.iter().flat_map(|r| r.items.iter()) {
            let key = (
                item.product.as_str(),
                item.category.as_str(),
                item.unit_price.to_bits(),
            );
            if seen.insert(key) {
                triples.push((
                    item.product.as_str(),
                    item.category.as_str(),
                    item.unit_price,
                ));
            }
        }
        // stable sort on the name alone, ties keep first-seen order
        triples.sort_by(|a, b| a.0.cmp(b.0));

        let mut rows = Vec::with_capacity(triples.len());
        for (product, category, price) in triples {
            match category_ids.get(category) {
                Some(&category_id) => rows.push((product, price, category_id)),
                None => self.metrics.unresolved_categories += 1,
            }
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Product (ProductID, ProductName, ProductUnitPrice, ProductCategoryID)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (i, (product, price, category_id)) in rows.iter().enumerate() {
                stmt.execute(params![(i + 1) as i64, product, price, category_id])?;
            }
        }
        tx.commit()?;

        debug!(rows = rows.len(), "loaded Product");
        Ok(())
    }

    fn load_orders(&mut self, records: &[SaleRecord]) -> Result<(), LoadError> {
        let customer_ids = lookup::customer_ids(&self.conn)?;
        let product_ids = lookup::product_ids(&self.conn)?;

        let mut rows: Vec<(i64, i64, String, i64)> = Vec::new();
        for r in records {
            let customer_id = match customer_ids.get(&r.customer.full()) {
                Some(&id) => id,
                None => {
                    self.metrics.unresolved_customers += 1;
                    continue;
                }
            };

            for item in &r.items {
                let product_id = match product_ids.get(item.product.as_str()) {
                    Some(&id) => id,
                    None => {
                        self.metrics.unresolved_products += 1;
                        continue;
                    }
                };
                rows.push((
                    customer_id,
                    product_id,
                    item.order_date.format("%Y-%m-%d").to_string(),
                    item.quantity,
                ));
            }
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO OrderDetail (OrderID, CustomerID, ProductID, OrderDate, QuantityOrdered)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (i, (customer_id, product_id, order_date, quantity)) in rows.iter().enumerate() {
                stmt.execute(params![
                    (i + 1) as i64,
                    customer_id,
                    product_id,
                    order_date,
                    quantity
                ])?;
            }
        }
        tx.commit()?;

        debug!(rows = rows.len(), "loaded OrderDetail");
        Ok(())
    }
}
