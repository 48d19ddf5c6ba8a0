use std::io::Write;

use anyhow::{Context, Result};

use crate::config::OutputFormat;

/// Final hop for a rendered document. Mail transports live outside this crate
/// and plug in here.
pub trait Delivery {
    fn deliver(&self, document: &str, format: OutputFormat) -> Result<()>;
}

pub struct StdoutDelivery;

impl Delivery for StdoutDelivery {
    fn deliver(&self, document: &str, format: OutputFormat) -> Result<()> {
        write_document(&mut std::io::stdout().lock(), document)
            .with_context(|| format!("unable to write {format:?} document to stdout"))
    }
}

fn write_document<W: Write>(out: &mut W, document: &str) -> std::io::Result<()> {
    out.write_all(document.as_bytes())?;
    if !document.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
