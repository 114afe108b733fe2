//! Structured fields attached to log entries
//!
//! A [`Field`] is a lower-cased name plus a typed value. Nothing is rendered when the field is
//! built: the value is only written into an encoder when the entry is actually emitted, so
//! building a field costs at most one small allocation for owned data.

use crate::encoder::{ArrayMarshaler, ObjectEncoder, ObjectMarshaler};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Typed payload of a field.
#[derive(Clone)]
pub enum FieldValue {
    /// Emits nothing at all.
    Skip,
    Null,
    Int(i64),
    Ints(Arc<[i64]>),
    Uint(u64),
    Uints(Arc<[u64]>),
    Float32(f32),
    Float32s(Arc<[f32]>),
    Float64(f64),
    Float64s(Arc<[f64]>),
    String(Cow<'static, str>),
    Strings(Arc<[String]>),
    /// Raw bytes rendered as a string; malformed UTF-8 is replaced.
    ByteString(Arc<[u8]>),
    Bool(bool),
    Bools(Arc<[bool]>),
    Time(DateTime<FixedOffset>),
    Times(Arc<[DateTime<FixedOffset>]>),
    Duration(Duration),
    Durations(Arc<[Duration]>),
    /// Raw bytes rendered as standard base64.
    Binary(Arc<[u8]>),
    Object(Arc<dyn ObjectMarshaler>),
    Objects(Arc<[Arc<dyn ObjectMarshaler>]>),
    Array(Arc<dyn ArrayMarshaler>),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Skip => f.write_str("Skip"),
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Int(v) => write!(f, "Int({})", v),
            FieldValue::Ints(v) => write!(f, "Ints({:?})", v),
            FieldValue::Uint(v) => write!(f, "Uint({})", v),
            FieldValue::Uints(v) => write!(f, "Uints({:?})", v),
            FieldValue::Float32(v) => write!(f, "Float32({})", v),
            FieldValue::Float32s(v) => write!(f, "Float32s({:?})", v),
            FieldValue::Float64(v) => write!(f, "Float64({})", v),
            FieldValue::Float64s(v) => write!(f, "Float64s({:?})", v),
            FieldValue::String(v) => write!(f, "String({:?})", v),
            FieldValue::Strings(v) => write!(f, "Strings({:?})", v),
            FieldValue::ByteString(v) => write!(f, "ByteString({:?})", v),
            FieldValue::Bool(v) => write!(f, "Bool({})", v),
            FieldValue::Bools(v) => write!(f, "Bools({:?})", v),
            FieldValue::Time(v) => write!(f, "Time({})", v),
            FieldValue::Times(v) => write!(f, "Times({:?})", v),
            FieldValue::Duration(v) => write!(f, "Duration({:?})", v),
            FieldValue::Durations(v) => write!(f, "Durations({:?})", v),
            FieldValue::Binary(v) => write!(f, "Binary({} bytes)", v.len()),
            FieldValue::Object(_) => f.write_str("Object(..)"),
            FieldValue::Objects(v) => write!(f, "Objects({} items)", v.len()),
            FieldValue::Array(_) => f.write_str("Array(..)"),
        }
    }
}

/// A named value added to a log entry.
#[derive(Debug, Clone)]
pub struct Field {
    name: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    /// Builds a field; the name is lower-cased.
    pub fn new(name: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        let name = name.into();
        let name = if name.chars().any(char::is_uppercase) {
            Cow::Owned(name.to_lowercase())
        } else {
            name
        };
        Self { name, value }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Writes the key/value pair into the encoder.
    pub fn write(&self, encoder: &mut dyn ObjectEncoder) {
        let key: &str = &self.name;
        match &self.value {
            FieldValue::Skip => {}
            FieldValue::Null => encoder.add_null(key),
            FieldValue::Int(v) => encoder.add_i64(key, *v),
            FieldValue::Ints(v) => encoder.add_i64s(key, v),
            FieldValue::Uint(v) => encoder.add_u64(key, *v),
            FieldValue::Uints(v) => encoder.add_u64s(key, v),
            FieldValue::Float32(v) => encoder.add_f32(key, *v),
            FieldValue::Float32s(v) => encoder.add_f32s(key, v),
            FieldValue::Float64(v) => encoder.add_f64(key, *v),
            FieldValue::Float64s(v) => encoder.add_f64s(key, v),
            FieldValue::String(v) => encoder.add_str(key, v),
            FieldValue::Strings(v) => encoder.add_strings(key, v),
            FieldValue::ByteString(v) => encoder.add_byte_str(key, v),
            FieldValue::Bool(v) => encoder.add_bool(key, *v),
            FieldValue::Bools(v) => encoder.add_bools(key, v),
            FieldValue::Time(v) => encoder.add_time(key, v),
            FieldValue::Times(v) => encoder.add_times(key, v),
            FieldValue::Duration(v) => encoder.add_duration(key, *v),
            FieldValue::Durations(v) => encoder.add_durations(key, v),
            FieldValue::Binary(v) => encoder.add_binary(key, v),
            FieldValue::Object(v) => encoder.add_object(key, v.as_ref()),
            FieldValue::Objects(v) => encoder.add_objects(key, v),
            FieldValue::Array(v) => encoder.add_array(key, v.as_ref()),
        }
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    pub fn int(key: impl Into<Cow<'static, str>>, value: isize) -> Self {
        Self::new(key, FieldValue::Int(value as i64))
    }

    pub fn int8(key: impl Into<Cow<'static, str>>, value: i8) -> Self {
        Self::new(key, FieldValue::Int(i64::from(value)))
    }

    pub fn int16(key: impl Into<Cow<'static, str>>, value: i16) -> Self {
        Self::new(key, FieldValue::Int(i64::from(value)))
    }

    pub fn int32(key: impl Into<Cow<'static, str>>, value: i32) -> Self {
        Self::new(key, FieldValue::Int(i64::from(value)))
    }

    pub fn int64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn uint(key: impl Into<Cow<'static, str>>, value: usize) -> Self {
        Self::new(key, FieldValue::Uint(value as u64))
    }

    pub fn uint8(key: impl Into<Cow<'static, str>>, value: u8) -> Self {
        Self::new(key, FieldValue::Uint(u64::from(value)))
    }

    pub fn uint16(key: impl Into<Cow<'static, str>>, value: u16) -> Self {
        Self::new(key, FieldValue::Uint(u64::from(value)))
    }

    pub fn uint32(key: impl Into<Cow<'static, str>>, value: u32) -> Self {
        Self::new(key, FieldValue::Uint(u64::from(value)))
    }

    pub fn uint64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    pub fn float32(key: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::new(key, FieldValue::Float32(value))
    }

    pub fn float64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// Renders any `Display` value as a string, eagerly.
    pub fn stringer<T: fmt::Display + ?Sized>(key: impl Into<Cow<'static, str>>, value: &T) -> Self {
        Self::new(key, FieldValue::String(Cow::Owned(value.to_string())))
    }

    pub fn byte_string(key: impl Into<Cow<'static, str>>, value: impl Into<Arc<[u8]>>) -> Self {
        Self::new(key, FieldValue::ByteString(value.into()))
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn time<Tz: TimeZone>(key: impl Into<Cow<'static, str>>, value: DateTime<Tz>) -> Self {
        Self::new(key, FieldValue::Time(value.fixed_offset()))
    }

    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn binary(key: impl Into<Cow<'static, str>>, value: impl Into<Arc<[u8]>>) -> Self {
        Self::new(key, FieldValue::Binary(value.into()))
    }

    pub fn null(key: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Null)
    }

    pub fn object(key: impl Into<Cow<'static, str>>, value: impl ObjectMarshaler + 'static) -> Self {
        Self::new(key, FieldValue::Object(Arc::new(value)))
    }

    pub fn array(key: impl Into<Cow<'static, str>>, value: impl ArrayMarshaler + 'static) -> Self {
        Self::new(key, FieldValue::Array(Arc::new(value)))
    }

    /// A field that writes nothing; it still takes part in name deduplication.
    pub fn skip(key: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Skip)
    }

    /// Shorthand for `named_error("error", Some(err))`.
    pub fn error<E: fmt::Display + ?Sized>(err: &E) -> Self {
        Self::named_error("error", Some(err))
    }

    /// Renders the error message as a string, or nothing when there is no error.
    pub fn named_error<E: fmt::Display + ?Sized>(
        key: impl Into<Cow<'static, str>>,
        err: Option<&E>,
    ) -> Self {
        match err {
            Some(err) => Self::stringer(key, err),
            None => Self::skip(key),
        }
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    pub fn ints(key: impl Into<Cow<'static, str>>, values: &[isize]) -> Self {
        Self::new(key, FieldValue::Ints(values.iter().map(|v| *v as i64).collect()))
    }

    pub fn int8s(key: impl Into<Cow<'static, str>>, values: &[i8]) -> Self {
        Self::new(key, FieldValue::Ints(values.iter().map(|v| i64::from(*v)).collect()))
    }

    pub fn int16s(key: impl Into<Cow<'static, str>>, values: &[i16]) -> Self {
        Self::new(key, FieldValue::Ints(values.iter().map(|v| i64::from(*v)).collect()))
    }

    pub fn int32s(key: impl Into<Cow<'static, str>>, values: &[i32]) -> Self {
        Self::new(key, FieldValue::Ints(values.iter().map(|v| i64::from(*v)).collect()))
    }

    pub fn int64s(key: impl Into<Cow<'static, str>>, values: &[i64]) -> Self {
        Self::new(key, FieldValue::Ints(Arc::from(values)))
    }

    pub fn uints(key: impl Into<Cow<'static, str>>, values: &[usize]) -> Self {
        Self::new(key, FieldValue::Uints(values.iter().map(|v| *v as u64).collect()))
    }

    pub fn uint8s(key: impl Into<Cow<'static, str>>, values: &[u8]) -> Self {
        Self::new(key, FieldValue::Uints(values.iter().map(|v| u64::from(*v)).collect()))
    }

    pub fn uint16s(key: impl Into<Cow<'static, str>>, values: &[u16]) -> Self {
        Self::new(key, FieldValue::Uints(values.iter().map(|v| u64::from(*v)).collect()))
    }

    pub fn uint32s(key: impl Into<Cow<'static, str>>, values: &[u32]) -> Self {
        Self::new(key, FieldValue::Uints(values.iter().map(|v| u64::from(*v)).collect()))
    }

    pub fn uint64s(key: impl Into<Cow<'static, str>>, values: &[u64]) -> Self {
        Self::new(key, FieldValue::Uints(Arc::from(values)))
    }

    pub fn float32s(key: impl Into<Cow<'static, str>>, values: &[f32]) -> Self {
        Self::new(key, FieldValue::Float32s(Arc::from(values)))
    }

    pub fn float64s(key: impl Into<Cow<'static, str>>, values: &[f64]) -> Self {
        Self::new(key, FieldValue::Float64s(Arc::from(values)))
    }

    pub fn strings<I, S>(key: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, FieldValue::Strings(values.into_iter().map(Into::into).collect()))
    }

    pub fn stringers<I>(key: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Self::new(
            key,
            FieldValue::Strings(values.into_iter().map(|v| v.to_string()).collect()),
        )
    }

    pub fn bools(key: impl Into<Cow<'static, str>>, values: &[bool]) -> Self {
        Self::new(key, FieldValue::Bools(Arc::from(values)))
    }

    pub fn times<I, Tz>(key: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Tz>>,
        Tz: TimeZone,
    {
        Self::new(
            key,
            FieldValue::Times(values.into_iter().map(|v| v.fixed_offset()).collect()),
        )
    }

    pub fn durations(key: impl Into<Cow<'static, str>>, values: &[Duration]) -> Self {
        Self::new(key, FieldValue::Durations(Arc::from(values)))
    }

    pub fn objects<I>(key: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ObjectMarshaler>>,
    {
        Self::new(key, FieldValue::Objects(values.into_iter().collect()))
    }

    /// Renders every error message as an array of strings.
    pub fn errors<I>(key: impl Into<Cow<'static, str>>, errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Self::stringers(key, errors)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::encoder::{ArrayEncoder, Encoder, JsonEncoder};
    use chrono::Utc;

    /// Renders a single field as `"name":value`.
    pub(crate) fn render(field: &Field) -> String {
        let mut encoder = JsonEncoder::new();
        field.write(&mut encoder);
        String::from_utf8(encoder.bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_name_is_lowercased() {
        let field = Field::int("RequestID", 1);
        assert_eq!(field.name(), "requestid");
        assert_eq!(render(&field), r#""requestid":1"#);

        let field = Field::int("already_lower", 1);
        assert!(matches!(field.name, Cow::Borrowed(_)));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&Field::int8("a", -8)), r#""a":-8"#);
        assert_eq!(render(&Field::int64("a", i64::MIN)), r#""a":-9223372036854775808"#);
        assert_eq!(render(&Field::uint16("a", 65535)), r#""a":65535"#);
        assert_eq!(render(&Field::float64("a", 3.25)), r#""a":3.25"#);
        assert_eq!(render(&Field::float32("a", f32::INFINITY)), r#""a":"+Inf""#);
        assert_eq!(render(&Field::string("a", "b")), r#""a":"b""#);
        assert_eq!(render(&Field::string("a", String::from("owned"))), r#""a":"owned""#);
        assert_eq!(render(&Field::stringer("a", &42u8)), r#""a":"42""#);
        assert_eq!(render(&Field::bool("a", false)), r#""a":false"#);
        assert_eq!(render(&Field::null("a")), r#""a":null"#);
        assert_eq!(render(&Field::binary("a", vec![0x67u8])), r#""a":"Zw==""#);
        assert_eq!(render(&Field::byte_string("a", &b"x\xffy"[..])), r#""a":"x\ufffdy""#);
        assert_eq!(
            render(&Field::duration("a", Duration::from_micros(2523))),
            r#""a":"2.523ms""#
        );
    }

    #[test]
    fn test_time() {
        let time = Utc.timestamp_opt(1_545_492_862, 0).unwrap();
        assert_eq!(render(&Field::time("at", time)), r#""at":"2018-12-22T15:34:22Z""#);
    }

    #[test]
    fn test_collections() {
        assert_eq!(render(&Field::ints("a", &[1, 2])), r#""a":[1,2]"#);
        assert_eq!(render(&Field::uint8s("a", &[7])), r#""a":[7]"#);
        assert_eq!(render(&Field::float64s("a", &[0.5, f64::NAN])), r#""a":[0.5,"NaN"]"#);
        assert_eq!(render(&Field::strings("a", ["x", "y"])), r#""a":["x","y"]"#);
        assert_eq!(render(&Field::stringers("a", [1, 2])), r#""a":["1","2"]"#);
        assert_eq!(render(&Field::bools("a", &[true])), r#""a":[true]"#);
        assert_eq!(
            render(&Field::durations("a", &[Duration::from_secs(1), Duration::ZERO])),
            r#""a":["1s","0s"]"#
        );
        assert_eq!(render(&Field::int32s("a", &[])), r#""a":[]"#);
    }

    #[test]
    fn test_object_and_array() {
        let field = Field::object("user", |encoder: &mut dyn ObjectEncoder| {
            encoder.add_str("name", "alice");
            encoder.add_u64("age", 30);
        });
        assert_eq!(render(&field), r#""user":{"name":"alice","age":30}"#);

        let field = Field::array("matrix", |encoder: &mut dyn ArrayEncoder| {
            encoder.append_array(&|row: &mut dyn ArrayEncoder| {
                row.append_i64(1);
                row.append_i64(2);
            });
            encoder.append_null();
        });
        assert_eq!(render(&field), r#""matrix":[[1,2],null]"#);

        let first: Arc<dyn ObjectMarshaler> =
            Arc::new(|encoder: &mut dyn ObjectEncoder| encoder.add_i64("id", 1));
        let second: Arc<dyn ObjectMarshaler> =
            Arc::new(|encoder: &mut dyn ObjectEncoder| encoder.add_i64("id", 2));
        let field = Field::objects("items", [first, second]);
        assert_eq!(render(&field), r#""items":[{"id":1},{"id":2}]"#);
    }

    #[test]
    fn test_errors() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        assert_eq!(render(&Field::error(&err)), r#""error":"missing file""#);
        assert_eq!(
            render(&Field::named_error("cause", Some(&err))),
            r#""cause":"missing file""#
        );
        assert_eq!(render(&Field::named_error::<std::io::Error>("cause", None)), "");
        assert_eq!(render(&Field::skip("anything")), "");
        assert_eq!(render(&Field::errors("all", ["a", "b"])), r#""all":["a","b"]"#);
    }
}
