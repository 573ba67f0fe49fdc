//! JSON report: the full digest, pretty-printed.

use crate::report::Digest;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, digest: &Digest) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, digest)?;
    writeln!(writer)
}
