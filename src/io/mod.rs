use std::io::{Read, Write};

use crate::core::types::{CustomerTotal, SaleRecord};

#[derive(Debug)]
pub enum IngestEvent {
    Record(SaleRecord),
    MalformedRow,
    MalformedItem,
}

pub trait Ingester {
    fn ingest<'a>(
        &self,
        input: Box<dyn Read + 'a>,
    ) -> Box<dyn Iterator<Item = IngestEvent> + 'a>;
}

pub trait Emitter {
    fn emit(
        &self,
        rows: &[CustomerTotal],
        out: &mut dyn Write,
    ) -> std::io::Result<()>;
}

pub mod formats;
pub use formats::csv::CsvEmitter;
pub use formats::tsv::TsvIngester;
