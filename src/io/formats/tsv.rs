use std::io::Read;

use serde::Deserialize;

use crate::core::types::{CustomerName, LineItem, SaleRecord};
use crate::io::{IngestEvent, Ingester};

/// One raw row of the flat sales file. The loader addresses columns by
/// position, so deserialization is positional rather than header-driven.
#[derive(Debug, Deserialize)]
struct TsvRow(
    String, // customer name
    String, // address
    String, // city
    String, // country
    String, // region
    String, // product names
    String, // product categories
    String, // category descriptions
    String, // unit prices
    String, // quantities
    String, // order dates
);

fn row_events(row: TsvRow) -> Vec<IngestEvent> {
    let TsvRow(
        name,
        address,
        city,
        country,
        region,
        products,
        categories,
        descriptions,
        prices,
        quantities,
        dates,
    ) = row;

    let customer = match CustomerName::parse(&name) {
        Ok(c) => c,
        Err(_) => return vec![IngestEvent::MalformedRow],
    };

    let (items, dropped) = LineItem::zip_lists(
        &products,
        &categories,
        &descriptions,
        &prices,
        &quantities,
        &dates,
    );

    let mut events = Vec::with_capacity(dropped + 1);
    events.extend(std::iter::repeat_with(|| IngestEvent::MalformedItem).take(dropped));
    events.push(IngestEvent::Record(SaleRecord {
        customer,
        address,
        city,
        country,
        region,
        items,
    }));
    events
}

pub struct TsvIngester;

impl Ingester for TsvIngester {
    fn ingest<'a>(
        &self,
        input: Box<dyn Read + 'a>,
    ) -> Box<dyn Iterator<Item = IngestEvent> + 'a> {
        let rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(input);

        let iter = rdr.into_deserialize::<TsvRow>().flat_map(|res| match res {
            Ok(row) => row_events(row),
            Err(_) => vec![IngestEvent::MalformedRow],
        });

        Box::new(iter)
    }
}
