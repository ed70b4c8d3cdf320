use proptest::prelude::*;

use sales_warehouse::engine::Loader;
use sales_warehouse::io::{Ingester, TsvIngester};
use sales_warehouse::queries::customers;

// --------- generation pools ---------
//
// Countries determine their region and product names determine their
// category and price, so any generated file is internally consistent the
// way the real export is.

const COUNTRIES: &[(&str, &str)] = &[
    ("Argentina", "South America"),
    ("Brazil", "South America"),
    ("Canada", "North America"),
    ("France", "Europe"),
    ("Germany", "Europe"),
    ("Japan", "Asia"),
    ("Kenya", "Africa"),
];

// name, category, description, unit price (binary-exact quarters so sums
// compare exactly against SQL)
const PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("Apples", "Fruit", "Fresh fruit", "2.50"),
    ("Beans", "Vegetables", "Garden vegetables", "1.25"),
    ("Coffee", "Beverages", "Hot drinks", "4.00"),
    ("Dates", "Fruit", "Fresh fruit", "3.75"),
    ("Tea", "Beverages", "Hot drinks", "3.25"),
];

const FIRST_NAMES: &[&str] = &["Ada", "Bruno", "Chen", "Dora", "Ewa"];
const LAST_NAMES: &[&str] = &["Klein", "Okafor", "Silva", "Tanaka"];

#[derive(Debug, Clone)]
struct GenItem {
    product: usize,
    quantity: i64,
    date: (i32, u32, u32),
}

#[derive(Debug, Clone)]
struct GenRow {
    first: usize,
    last: usize,
    country: usize,
    items: Vec<GenItem>,
}

fn item_strategy() -> impl Strategy<Value = GenItem> {
    (0..PRODUCTS.len(), 1i64..100, 2018i32..2022, 1u32..13, 1u32..29).prop_map(
        |(product, quantity, y, m, d)| GenItem {
            product,
            quantity,
            date: (y, m, d),
        },
    )
}

fn row_strategy() -> impl Strategy<Value = GenRow> {
    (
        0..FIRST_NAMES.len(),
        0..LAST_NAMES.len(),
        0..COUNTRIES.len(),
        prop::collection::vec(item_strategy(), 1..4),
    )
        .prop_map(|(first, last, country, items)| GenRow {
            first,
            last,
            country,
            items,
        })
}

fn dataset_strategy() -> impl Strategy<Value = Vec<GenRow>> {
    prop::collection::vec(row_strategy(), 1..40)
}

// --------- rendering and loading ---------

fn render_tsv(rows: &[GenRow]) -> String {
    let mut out = String::from(
        "Name\tAddress\tCity\tCountry\tRegion\tProductName\tProductCategory\tProductCategoryDescription\tProductUnitPrice\tQuantityOrdered\tOrderDate\n",
    );

    for (i, row) in rows.iter().enumerate() {
        let (country, region) = COUNTRIES[row.country];

        let names: Vec<&str> = row.items.iter().map(|it| PRODUCTS[it.product].0).collect();
        let cats: Vec<&str> = row.items.iter().map(|it| PRODUCTS[it.product].1).collect();
        let descs: Vec<&str> = row.items.iter().map(|it| PRODUCTS[it.product].2).collect();
        let prices: Vec<&str> = row.items.iter().map(|it| PRODUCTS[it.product].3).collect();
        let quantities: Vec<String> =
            row.items.iter().map(|it| it.quantity.to_string()).collect();
        let dates: Vec<String> = row
            .items
            .iter()
            .map(|it| format!("{:04}{:02}{:02}", it.date.0, it.date.1, it.date.2))
            .collect();

        out.push_str(&format!(
            "{} {}\t{} Main St\tSpringfield\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            FIRST_NAMES[row.first],
            LAST_NAMES[row.last],
            i + 1,
            country,
            region,
            names.join(";"),
            cats.join(";"),
            descs.join(";"),
            prices.join(";"),
            quantities.join(";"),
            dates.join(";"),
        ));
    }
    out
}

fn load(input: &str) -> Loader {
    let mut loader = Loader::in_memory().unwrap();
    let events = TsvIngester.ingest(Box::new(input.as_bytes()));
    loader.load(events).unwrap();
    loader
}

// --------- properties ---------

proptest! {
    // For any input, the distinct region values equal the Region table,
    // with IDs assigned in sorted order starting at 1.
    #[test]
    fn distinct_regions_match_the_region_table(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.connection();

        let mut expected: Vec<&str> = rows.iter().map(|r| COUNTRIES[r.country].1).collect();
        expected.sort();
        expected.dedup();

        let mut stmt = conn
            .prepare("SELECT RegionID, Region FROM Region ORDER BY RegionID")
            .unwrap();
        let got: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(got.len(), expected.len());
        for (i, (id, region)) in got.iter().enumerate() {
            prop_assert_eq!(*id, (i + 1) as i64);
            prop_assert_eq!(region.as_str(), expected[i]);
        }
    }

    #[test]
    fn countries_are_sorted_and_point_at_their_region(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.connection();

        let mut expected: Vec<&str> = rows.iter().map(|r| COUNTRIES[r.country].0).collect();
        expected.sort();
        expected.dedup();

        let mut stmt = conn
            .prepare(
                "SELECT C.CountryID, C.Country, R.Region
                 FROM Country C JOIN Region R ON R.RegionID = C.RegionID
                 ORDER BY C.CountryID",
            )
            .unwrap();
        let got: Vec<(i64, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(got.len(), expected.len());
        for (i, (id, country, region)) in got.iter().enumerate() {
            prop_assert_eq!(*id, (i + 1) as i64);
            prop_assert_eq!(country.as_str(), expected[i]);
            let pool_region = COUNTRIES
                .iter()
                .find(|(c, _)| c == country)
                .map(|(_, r)| *r)
                .unwrap();
            prop_assert_eq!(region.as_str(), pool_region);
        }
    }

    #[test]
    fn every_data_row_becomes_a_customer_in_name_order(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.connection();

        let mut expected: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (FIRST_NAMES[r.first], LAST_NAMES[r.last]))
            .collect();
        expected.sort();

        let mut stmt = conn
            .prepare("SELECT FirstName, LastName FROM Customer ORDER BY CustomerID")
            .unwrap();
        let got: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(got.len(), expected.len());
        for (i, (first, last)) in got.iter().enumerate() {
            prop_assert_eq!((first.as_str(), last.as_str()), expected[i]);
        }
    }

    #[test]
    fn products_are_distinct_sorted_with_pool_prices(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.connection();

        let mut expected: Vec<&(&str, &str, &str, &str)> = rows
            .iter()
            .flat_map(|r| r.items.iter().map(|it| &PRODUCTS[it.product]))
            .collect();
        expected.sort_by_key(|p| p.0);
        expected.dedup();

        let mut stmt = conn
            .prepare("SELECT ProductID, ProductName, ProductUnitPrice FROM Product ORDER BY ProductID")
            .unwrap();
        let got: Vec<(i64, String, f64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(got.len(), expected.len());
        for (i, (id, name, price)) in got.iter().enumerate() {
            prop_assert_eq!(*id, (i + 1) as i64);
            prop_assert_eq!(name.as_str(), expected[i].0);
            prop_assert_eq!(*price, expected[i].3.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn order_rows_and_quantities_are_conserved(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.connection();

        let expected_rows: usize = rows.iter().map(|r| r.items.len()).sum();
        let expected_quantity: i64 = rows
            .iter()
            .flat_map(|r| r.items.iter())
            .map(|it| it.quantity)
            .sum();

        let (count, quantity): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(QuantityOrdered), 0) FROM OrderDetail",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        prop_assert_eq!(count, expected_rows as i64);
        prop_assert_eq!(quantity, expected_quantity);
    }

    #[test]
    fn well_formed_input_skips_nothing(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let m = loader.metrics();

        prop_assert_eq!(m.malformed_rows, 0);
        prop_assert_eq!(m.malformed_items, 0);
        prop_assert_eq!(m.unresolved_regions, 0);
        prop_assert_eq!(m.unresolved_countries, 0);
        prop_assert_eq!(m.unresolved_categories, 0);
        prop_assert_eq!(m.unresolved_customers, 0);
        prop_assert_eq!(m.unresolved_products, 0);
    }

    #[test]
    fn customer_totals_conserve_total_revenue(rows in dataset_strategy()) {
        let loader = load(&render_tsv(&rows));
        let conn = loader.into_connection();

        // pool prices are binary-exact quarters, so the sums match exactly
        let expected: f64 = rows
            .iter()
            .flat_map(|r| r.items.iter())
            .map(|it| PRODUCTS[it.product].3.parse::<f64>().unwrap() * it.quantity as f64)
            .sum();

        let totals = customers::totals_by_customer(&conn).unwrap();
        let got: f64 = totals.iter().map(|t| t.total).sum();

        prop_assert_eq!(got, expected);
    }
}
