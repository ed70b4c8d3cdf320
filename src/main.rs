use std::env;
use std::fs::File;

use tracing::info;
use tracing_subscriber::EnvFilter;

use sales_warehouse::engine::Loader;
use sales_warehouse::io::{CsvEmitter, Emitter, Ingester, TsvIngester};
use sales_warehouse::queries::customers;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input_path = env::args()
        .nth(1)
        .expect("usage: sales_warehouse <sales.tsv> <warehouse.db>");
    let db_path = env::args()
        .nth(2)
        .expect("usage: sales_warehouse <sales.tsv> <warehouse.db>");

    let file = File::open(input_path)?;

    let ingester = TsvIngester;
    let emitter = CsvEmitter;

    let mut loader = Loader::open(&db_path)?;
    loader.load(ingester.ingest(Box::new(file)))?;

    let metrics = loader.metrics();
    info!(
        malformed_rows = metrics.malformed_rows,
        malformed_items = metrics.malformed_items,
        unresolved_customers = metrics.unresolved_customers,
        unresolved_products = metrics.unresolved_products,
        "load complete"
    );

    let conn = loader.into_connection();
    let rows = customers::totals_by_customer(&conn)?;

    let mut out = std::io::stdout();
    emitter.emit(&rows, &mut out)?;

    Ok(())
}
