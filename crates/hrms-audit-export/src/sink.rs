//! Byte-counting output with optional gzip.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Counts bytes passed to the wrapped writer.
pub(crate) struct CountingWriter<W> {
    inner: W,
    bytes: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Destination of an export, compressed or not.
pub(crate) enum Sink<W: Write> {
    Plain(CountingWriter<W>),
    Gzip(GzEncoder<CountingWriter<W>>),
}

impl<W: Write> Sink<W> {
    pub(crate) fn new(writer: W, compress: bool) -> Self {
        let counting = CountingWriter {
            inner: writer,
            bytes: 0,
        };
        if compress {
            Self::Gzip(GzEncoder::new(counting, Compression::default()))
        } else {
            Self::Plain(counting)
        }
    }

    /// Bytes that reached the destination, after compression.
    pub(crate) fn bytes_written(&self) -> u64 {
        match self {
            Self::Plain(w) => w.bytes,
            Self::Gzip(e) => e.get_ref().bytes,
        }
    }

    /// Flush, writing the gzip trailer if compressed.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(e) => {
                e.try_finish()?;
                e.get_mut().flush()
            }
        }
    }
}

impl<W: Write> Sink<W> {
    /// Complete the stream and return the destination.
    pub(crate) fn into_inner(self) -> io::Result<W> {
        match self {
            Self::Plain(mut w) => {
                w.flush()?;
                Ok(w.inner)
            }
            Self::Gzip(e) => Ok(e.finish()?.inner),
        }
    }
}

impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(e) => e.flush(),
        }
    }
}
