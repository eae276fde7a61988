use std::io::{self, Write};

#[inline]
fn is_printable(x: u8) -> bool {
    (0x20..=0x7E).contains(&x)
}

/// Write printable ASCII as is and everything else as `<hh>`, then a newline.
pub fn write_escaped<W: Write + ?Sized>(out: &mut W, data: &[u8]) -> io::Result<()> {
    let mut start = 0;
    for (i, &x) in data.iter().enumerate() {
        if !is_printable(x) {
            out.write_all(&data[start..i])?;
            write!(out, "<{:02x}>", x)?;
            start = i + 1;
        }
    }
    out.write_all(&data[start..])?;
    writeln!(out)
}
