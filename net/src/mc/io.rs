use super::{
    error::{ProtoError, Result},
    types::{Angle, Uuid},
    varint::read_varint,
};

#[inline]
pub fn take<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if input.len() < len {
        return Err(ProtoError::UnexpectedEof);
    }

    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head)
}

#[inline]
pub fn read_u8(input: &mut &[u8]) -> Result<u8> {
    Ok(take(input, 1)?[0])
}

#[inline]
pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

#[inline]
pub fn read_i8(input: &mut &[u8]) -> Result<i8> {
    Ok(read_u8(input)? as i8)
}

#[inline]
pub fn write_i8(out: &mut Vec<u8>, value: i8) {
    out.push(value as u8);
}

// Any nonzero byte reads as true; writes are strictly 0x00/0x01.
#[inline]
pub fn read_bool(input: &mut &[u8]) -> Result<bool> {
    Ok(read_u8(input)? != 0)
}

#[inline]
pub fn write_bool(out: &mut Vec<u8>, value: bool) {
    out.push(value as u8);
}

#[inline]
pub fn read_u16_be(input: &mut &[u8]) -> Result<u16> {
    let bytes: [u8; 2] = take(input, 2)?.try_into().unwrap();
    Ok(u16::from_be_bytes(bytes))
}

#[inline]
pub fn write_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn read_i16_be(input: &mut &[u8]) -> Result<i16> {
    let bytes: [u8; 2] = take(input, 2)?.try_into().unwrap();
    Ok(i16::from_be_bytes(bytes))
}

#[inline]
pub fn write_i16_be(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn read_i32_be(input: &mut &[u8]) -> Result<i32> {
    let bytes: [u8; 4] = take(input, 4)?.try_into().unwrap();
    Ok(i32::from_be_bytes(bytes))
}

#[inline]
pub fn write_i32_be(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn read_i64_be(input: &mut &[u8]) -> Result<i64> {
    let bytes: [u8; 8] = take(input, 8)?.try_into().unwrap();
    Ok(i64::from_be_bytes(bytes))
}

#[inline]
pub fn write_i64_be(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn read_u64_be(input: &mut &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = take(input, 8)?.try_into().unwrap();
    Ok(u64::from_be_bytes(bytes))
}

#[inline]
pub fn write_u64_be(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub fn read_f32_be(input: &mut &[u8]) -> Result<f32> {
    Ok(f32::from_bits(read_i32_be(input)? as u32))
}

#[inline]
pub fn write_f32_be(out: &mut Vec<u8>, value: f32) {
    write_i32_be(out, value.to_bits() as i32);
}

#[inline]
pub fn read_f64_be(input: &mut &[u8]) -> Result<f64> {
    Ok(f64::from_bits(read_u64_be(input)?))
}

#[inline]
pub fn write_f64_be(out: &mut Vec<u8>, value: f64) {
    write_u64_be(out, value.to_bits());
}

#[inline]
pub fn read_angle(input: &mut &[u8]) -> Result<Angle> {
    Ok(Angle::from_byte(read_u8(input)?))
}

#[inline]
pub fn write_angle(out: &mut Vec<u8>, value: Angle) {
    out.push(value.as_byte());
}

#[inline]
pub fn read_uuid(input: &mut &[u8]) -> Result<Uuid> {
    let msb = read_u64_be(input)?;
    let lsb = read_u64_be(input)?;
    Ok(Uuid::from_u64s(msb, lsb))
}

#[inline]
pub fn write_uuid(out: &mut Vec<u8>, value: &Uuid) {
    let (msb, lsb) = value.as_u64s();
    write_u64_be(out, msb);
    write_u64_be(out, lsb);
}

pub fn read_string_bounded<'a>(input: &mut &'a [u8], max_chars: usize) -> Result<&'a str> {
    let byte_len = read_varint(input)?;
    if byte_len < 0 {
        return Err(ProtoError::InvalidLength(byte_len));
    }

    let byte_len = byte_len as usize;
    let max_bytes = max_chars.saturating_mul(4);
    if byte_len > max_bytes {
        return Err(ProtoError::LengthTooLarge {
            max: max_bytes,
            actual: byte_len,
        });
    }

    let bytes = take(input, byte_len)?;
    let s = std::str::from_utf8(bytes).map_err(|_| ProtoError::InvalidUtf8)?;

    let char_count = s.encode_utf16().count();
    if char_count > max_chars {
        return Err(ProtoError::StringTooLong {
            max: max_chars,
            actual: char_count,
        });
    }

    Ok(s)
}

pub fn write_string_bounded(out: &mut Vec<u8>, value: &str, max_chars: usize) -> Result<()> {
    let char_count = value.encode_utf16().count();
    if char_count > max_chars {
        return Err(ProtoError::StringTooLong {
            max: max_chars,
            actual: char_count,
        });
    }

    let len = value.len();
    if len > i32::MAX as usize {
        return Err(ProtoError::LengthTooLarge {
            max: i32::MAX as usize,
            actual: len,
        });
    }

    super::varint::write_varint(out, len as i32);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}
