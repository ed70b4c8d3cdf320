use std::io::Write;

use crate::core::types::CustomerTotal;
use crate::io::Emitter;

pub struct CsvEmitter;

impl Emitter for CsvEmitter {
    fn emit(
        &self,
        rows: &[CustomerTotal],
        out: &mut dyn Write,
    ) -> std::io::Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(out);

        wtr.write_record(["Name", "Total"])?;

        for r in rows {
            wtr.write_record(&[r.name.clone(), format!("{:.2}", r.total)])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
