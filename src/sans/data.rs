//! Base types and field values of data records.

use tracing::warn;

use super::definition::ByteOrder;

/// Numeric kind of a field, from the low five bits of its base type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Enum,
    SInt8,
    UInt8,
    SInt16,
    UInt16,
    SInt32,
    UInt32,
    String,
    Float32,
    Float64,
    UInt8Z,
    UInt16Z,
    UInt32Z,
    Byte,
    SInt64,
    UInt64,
    UInt64Z,
}

impl BaseType {
    /// Identify the kind of a base type code, if it is known.
    ///
    /// Bit 7 of the code (set for multi-byte kinds) is ignored.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code & 0x1F {
            0x00 => Self::Enum,
            0x01 => Self::SInt8,
            0x02 => Self::UInt8,
            0x03 => Self::SInt16,
            0x04 => Self::UInt16,
            0x05 => Self::SInt32,
            0x06 => Self::UInt32,
            0x07 => Self::String,
            0x08 => Self::Float32,
            0x09 => Self::Float64,
            0x0A => Self::UInt8Z,
            0x0B => Self::UInt16Z,
            0x0C => Self::UInt32Z,
            0x0D => Self::Byte,
            0x0E => Self::SInt64,
            0x0F => Self::UInt64,
            0x10 => Self::UInt64Z,
            _ => None?,
        })
    }

    /// Size in bytes of a single value of this kind.
    pub fn width(self) -> usize {
        match self {
            Self::Enum | Self::SInt8 | Self::UInt8 | Self::UInt8Z => 1,
            Self::String | Self::Byte => 1,
            Self::SInt16 | Self::UInt16 | Self::UInt16Z => 2,
            Self::SInt32 | Self::UInt32 | Self::UInt32Z | Self::Float32 => 4,
            Self::SInt64 | Self::UInt64 | Self::UInt64Z | Self::Float64 => 8,
        }
    }

    /// Decode one value of this kind from exactly [`Self::width`] bytes.
    ///
    /// Returns `None` for strings, which are not scalar.
    fn scalar(self, r: &[u8], order: ByteOrder) -> Option<Scalar> {
        macro_rules! read {
            ($t:ty) => {{
                let mut buf = [0; size_of::<$t>()];
                buf.copy_from_slice(r);
                match order {
                    ByteOrder::Little => <$t>::from_le_bytes(buf),
                    ByteOrder::Big => <$t>::from_be_bytes(buf),
                }
            }};
        }

        Some(match self {
            Self::Enum | Self::UInt8 | Self::Byte => Scalar::U8(read!(u8)),
            Self::UInt8Z => Scalar::U8Z(read!(u8)),
            Self::UInt16 => Scalar::U16(read!(u16)),
            Self::UInt16Z => Scalar::U16Z(read!(u16)),
            Self::UInt32 => Scalar::U32(read!(u32)),
            Self::UInt32Z => Scalar::U32Z(read!(u32)),
            Self::UInt64 => Scalar::U64(read!(u64)),
            Self::UInt64Z => Scalar::U64Z(read!(u64)),

            Self::SInt8 => Scalar::I8(read!(i8)),
            Self::SInt16 => Scalar::I16(read!(i16)),
            Self::SInt32 => Scalar::I32(read!(i32)),
            Self::SInt64 => Scalar::I64(read!(i64)),

            Self::Float32 => Scalar::F32(read!(f32)),
            Self::Float64 => Scalar::F64(read!(f64)),

            Self::String => None?,
        })
    }
}

/// A single numeric value, tagged with the base type it was decoded as.
///
/// `enum` and `byte` fields are represented as [`Scalar::U8`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    U8(u8),
    U8Z(u8),
    U16(u16),
    U16Z(u16),
    U32(u32),
    U32Z(u32),
    U64(u64),
    U64Z(u64),

    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),

    F32(f32),
    F64(f64),
}

impl Scalar {
    /// Whether this value is the 'invalid' marker of its base type.
    ///
    /// Plain integers use their maximum, `z` integers use zero, and floats
    /// use a bit pattern of all ones.
    pub fn is_invalid(&self) -> bool {
        match *self {
            Self::U8(x) => x == u8::MAX,
            Self::U16(x) => x == u16::MAX,
            Self::U32(x) => x == u32::MAX,
            Self::U64(x) => x == u64::MAX,

            Self::U8Z(x) => x == 0,
            Self::U16Z(x) => x == 0,
            Self::U32Z(x) => x == 0,
            Self::U64Z(x) => x == 0,

            Self::I8(x) => x == i8::MAX,
            Self::I16(x) => x == i16::MAX,
            Self::I32(x) => x == i32::MAX,
            Self::I64(x) => x == i64::MAX,

            Self::F32(x) => x.to_bits() == u32::MAX,
            Self::F64(x) => x.to_bits() == u64::MAX,
        }
    }

    /// The value as a signed integer, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::U8(x) | Self::U8Z(x) => Some(x.into()),
            Self::U16(x) | Self::U16Z(x) => Some(x.into()),
            Self::U32(x) | Self::U32Z(x) => Some(x.into()),
            Self::U64(x) | Self::U64Z(x) => x.try_into().ok(),
            Self::I8(x) => Some(x.into()),
            Self::I16(x) => Some(x.into()),
            Self::I32(x) => Some(x.into()),
            Self::I64(x) => Some(x),
            Self::F32(_) | Self::F64(_) => None,
        }
    }
}

/// The decoded value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A field holding exactly one value of its base type.
    Scalar(Scalar),
    /// A field holding several values of its base type, such as multi-axis
    /// sensor samples.
    Array(Vec<Scalar>),
    /// A string field, without trailing padding.
    Text(String),
    /// A field of unknown base type, or whose size does not fit its type.
    Bytes(Vec<u8>),
}

impl Value {
    /// The single value held, if this is not an array, string, or raw field.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// The single value held as a signed integer, unless it is marked invalid.
    pub fn as_valid_i64(&self) -> Option<i64> {
        self.as_scalar().filter(|s| !s.is_invalid())?.as_i64()
    }
}

/// Decode the bytes of a field according to its base type code.
///
/// Codes of unknown kind are passed through as [`Value::Bytes`]. A size that
/// is a multiple of the kind's width greater than one produces a
/// [`Value::Array`].
pub fn decode_value(r: &[u8], base_type: u8, order: ByteOrder) -> Value {
    let Some(kind) = BaseType::from_code(base_type) else {
        return Value::Bytes(r.to_vec());
    };

    if kind == BaseType::String {
        let text = String::from_utf8_lossy(r);
        return Value::Text(text.trim_end_matches('\0').to_owned());
    }

    let width = kind.width();

    if r.is_empty() || r.len() % width != 0 {
        warn!(
            ?kind,
            size = r.len(),
            "Field size is not a multiple of its base type, keeping raw bytes."
        );
        return Value::Bytes(r.to_vec());
    }

    let mut scalars = r.chunks_exact(width).filter_map(|c| kind.scalar(c, order));

    if r.len() == width {
        scalars.next().map_or_else(|| Value::Bytes(r.to_vec()), Value::Scalar)
    } else {
        Value::Array(scalars.collect())
    }
}
