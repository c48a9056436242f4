//! Length-prefixed framing primitives shared by the carrier header and the
//! `Configuration` body codec.
//!
//! Two string forms exist:
//! - `utf`: `u16` big-endian byte length, then UTF-8 bytes (carrier header)
//! - `string`: `u32` big-endian byte length, then UTF-8 bytes (entry data)

use std::io::{self, Read, Write};

/// Write a `u16`-length-prefixed UTF-8 string.
pub fn write_utf<W: Write + ?Sized>(out: &mut W, value: &str) -> io::Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("encoded string too long: {} bytes", value.len()),
        )
    })?;
    out.write_all(&len.to_be_bytes())?;
    out.write_all(value.as_bytes())
}

/// Read a `u16`-length-prefixed UTF-8 string.
pub fn read_utf<R: Read + ?Sized>(input: &mut R) -> io::Result<String> {
    let mut len = [0u8; 2];
    input.read_exact(&mut len)?;
    read_exact_utf8(input, usize::from(u16::from_be_bytes(len)))
}

/// Write a `u32`-length-prefixed UTF-8 string.
pub fn write_string<W: Write + ?Sized>(out: &mut W, value: &str) -> io::Result<()> {
    let len = u32::try_from(value.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("encoded string too long: {} bytes", value.len()),
        )
    })?;
    write_u32(out, len)?;
    out.write_all(value.as_bytes())
}

/// Read a `u32`-length-prefixed UTF-8 string.
pub fn read_string<R: Read + ?Sized>(input: &mut R) -> io::Result<String> {
    let len = read_u32(input)?;
    let len = usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "string length overflow"))?;
    read_exact_utf8(input, len)
}

/// Write a big-endian `u32`.
pub fn write_u32<W: Write + ?Sized>(out: &mut W, value: u32) -> io::Result<()> {
    out.write_all(&value.to_be_bytes())
}

/// Read a big-endian `u32`.
pub fn read_u32<R: Read + ?Sized>(input: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Write a collection length as `u32`, rejecting lengths that do not fit.
pub fn write_len<W: Write + ?Sized>(out: &mut W, len: usize) -> io::Result<()> {
    let len = u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("collection too large to encode: {len} items"),
        )
    })?;
    write_u32(out, len)
}

// The length prefix is untrusted: grow the buffer from what actually arrives
// instead of allocating `len` bytes up front.
fn read_exact_utf8<R: Read + ?Sized>(input: &mut R, len: usize) -> io::Result<String> {
    let mut raw = Vec::new();
    (&mut *input).take(len as u64).read_to_end(&mut raw)?;
    if raw.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes of string data, got {}", raw.len()),
        ));
    }
    String::from_utf8(raw).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_utf_layout() {
        let mut buf = Vec::new();
        write_utf(&mut buf, "conf").unwrap();
        assert_eq!(buf, [0, 4, b'c', b'o', b'n', b'f']);
    }

    #[test]
    fn test_string_layout_and_non_ascii() {
        let mut buf = Vec::new();
        write_string(&mut buf, "é").unwrap();
        assert_eq!(buf, [0, 0, 0, 2, 0xC3, 0xA9]);

        let decoded = read_string(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, "é");
    }

    #[test]
    fn test_utf_rejects_oversized_value() {
        let long = "x".repeat(usize::from(u16::MAX) + 1);
        let err = write_utf(&mut Vec::new(), &long).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_truncated_string_is_eof() {
        let mut input = Cursor::new(vec![0, 0, 0, 10, b'a', b'b']);
        let err = read_string(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_huge_length_prefix_does_not_preallocate() {
        let mut input = Cursor::new(vec![0xFF, 0xFF, 0xFF, 0xFF]);
        let err = read_string(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_invalid_utf8_is_invalid_data() {
        let mut input = Cursor::new(vec![0, 2, 0xFF, 0xFE]);
        let err = read_utf(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
