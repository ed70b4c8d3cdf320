use chrono::NaiveDate;

use crate::core::errors::CoreError;

/// Surrogate key type shared by every table in the warehouse.
pub type RecordId = i64;

/// Customer name split on whitespace: the first token is the first name, the
/// remaining tokens joined by single spaces are the last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName {
    pub first: String,
    pub last: String,
}

impl CustomerName {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let mut tokens = s.split_whitespace();
        let first = tokens.next().ok_or(CoreError::EmptyName)?.to_string();
        let last = tokens.collect::<Vec<_>>().join(" ");
        Ok(CustomerName { first, last })
    }

    /// Full name as used for dictionary keys: "First Last".
    pub fn full(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

#[derive(Debug, Clone)]
pub struct LineItem {
    pub product: String,
    pub category: String,
    pub category_description: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub order_date: NaiveDate,
}

impl LineItem {
    fn parse(
        product: &str,
        category: &str,
        description: &str,
        price: &str,
        quantity: &str,
        date: &str,
    ) -> Result<Self, CoreError> {
        let unit_price: f64 = price.trim().parse().map_err(|_| CoreError::ParsePrice)?;
        let quantity: i64 = quantity.trim().parse().map_err(|_| CoreError::ParseQuantity)?;
        let order_date = NaiveDate::parse_from_str(date.trim(), "%Y%m%d")
            .map_err(|_| CoreError::ParseDate)?;

        Ok(LineItem {
            product: product.trim().to_string(),
            category: category.trim().to_string(),
            category_description: description.trim().to_string(),
            unit_price,
            quantity,
            order_date,
        })
    }

    /// Zips the six parallel `;`-separated column values into line items.
    ///
    /// The product list sets the expected item count. Entries past the end of
    /// a shorter sibling list, and entries whose price, quantity, or date
    /// fail to parse, are dropped; the second element of the return value is
    /// how many were dropped.
    pub fn zip_lists(
        products: &str,
        categories: &str,
        descriptions: &str,
        prices: &str,
        quantities: &str,
        dates: &str,
    ) -> (Vec<LineItem>, usize) {
        let products: Vec<&str> = products.split(';').collect();
        let categories: Vec<&str> = categories.split(';').collect();
        let descriptions: Vec<&str> = descriptions.split(';').collect();
        let prices: Vec<&str> = prices.split(';').collect();
        let quantities: Vec<&str> = quantities.split(';').collect();
        let dates: Vec<&str> = dates.split(';').collect();

        let n = products
            .len()
            .min(categories.len())
            .min(descriptions.len())
            .min(prices.len())
            .min(quantities.len())
            .min(dates.len());

        let mut items = Vec::with_capacity(n);
        for i in 0..n {
            if let Ok(item) = LineItem::parse(
                products[i],
                categories[i],
                descriptions[i],
                prices[i],
                quantities[i],
                dates[i],
            ) {
                items.push(item);
            }
        }

        let dropped = products.len() - items.len();
        (items, dropped)
    }
}

/// One data row of the flat sales file, after parsing.
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub customer: CustomerName,
    pub address: String,
    pub city: String,
    pub country: String,
    pub region: String,
    pub items: Vec<LineItem>,
}

/// One row of the per-customer totals report.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerTotal {
    pub name: String,
    pub total: f64,
}
