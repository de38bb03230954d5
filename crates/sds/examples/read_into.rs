//! Reads an inline command stream straight into the spare capacity of an
//! [`sds::Sds`] and tokenizes every complete line.
//!
//! The reader hands out at most a few bytes per call, the way a socket does
//! under load, so lines arrive split across reads. Bytes are written into
//! [`Sds::spare_mut`] and committed with [`Sds::incr_len`]; nothing is copied
//! through an intermediate buffer.
//!
//! Run with
//!
//! ```bash
//! cargo run -p sds --example read_into
//! ```

use std::io::{self, Read};

use sds::Sds;

/// A reader that returns at most `max` bytes per call.
struct Trickle<R> {
    inner: R,
    max: usize,
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.max);
        self.inner.read(&mut buf[..len])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stream = b"set greeting \"hello\\x20world\"\r\nget greeting\r\nappend log 'it\\'s'\r\nping\r\n";
    let mut reader = Trickle {
        inner: io::Cursor::new(&stream[..]),
        max: 7,
    };

    let mut query = Sds::empty()?;
    loop {
        query.make_room_for(16)?;
        let read = reader.read(query.spare_mut())?;
        if read == 0 {
            break;
        }
        query.incr_len(isize::try_from(read)?);

        while let Some(end) = query.windows(2).position(|w| w == b"\r\n") {
            let args = sds::split_args(&query[..end])?;
            let mut line = Sds::try_from("=>")?;
            for arg in &args {
                line.cat(" ")?;
                line.cat_repr(arg)?;
            }
            println!("{line}");

            // Drop the consumed line and its terminator.
            query.range(isize::try_from(end + 2)?, -1);
        }
    }

    if !query.is_empty() {
        eprintln!("trailing partial line: {query:?}");
    }
    Ok(())
}
