#[derive(Debug, Default, Clone)]
pub struct LoadMetrics {
    pub malformed_rows: u64,
    pub malformed_items: u64,
    pub unresolved_regions: u64,
    pub unresolved_countries: u64,
    pub unresolved_categories: u64,
    pub unresolved_customers: u64,
    pub unresolved_products: u64,
}
