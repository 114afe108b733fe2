//! Typed value rendering and string escaping

use super::JsonEncoder;
use crate::core::timestamp::{format_duration, format_rfc3339_nanos};
use crate::encoder::{ArrayEncoder, ArrayMarshaler, ObjectEncoder, ObjectMarshaler};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, FixedOffset};
use std::io::Write as _;
use std::time::Duration;

const HEX: &[u8; 16] = b"0123456789abcdef";
const REPLACEMENT: &[u8] = b"\\ufffd";

impl ArrayEncoder for JsonEncoder {
    fn append_array(&mut self, value: &dyn ArrayMarshaler) {
        self.append_element_separator();
        self.append_array_start();
        value.encode(self);
        self.append_array_end();
    }

    fn append_object(&mut self, value: &dyn ObjectMarshaler) {
        self.append_element_separator();
        self.append_begin_marker();
        value.encode(self);
        self.append_end_marker();
    }

    fn append_i64(&mut self, value: i64) {
        self.append_element_separator();
        let _ = write!(self.buffer, "{}", value);
    }

    fn append_u64(&mut self, value: u64) {
        self.append_element_separator();
        let _ = write!(self.buffer, "{}", value);
    }

    fn append_f32(&mut self, value: f32) {
        self.append_element_separator();
        if value.is_finite() {
            let _ = write!(self.buffer, "{}", value);
        } else {
            self.append_non_finite(f64::from(value));
        }
    }

    fn append_f64(&mut self, value: f64) {
        self.append_element_separator();
        if value.is_finite() {
            let _ = write!(self.buffer, "{}", value);
        } else {
            self.append_non_finite(value);
        }
    }

    fn append_str(&mut self, value: &str) {
        self.append_element_separator();
        self.buffer.push(b'"');
        self.safe_add_str(value);
        self.buffer.push(b'"');
    }

    fn append_byte_str(&mut self, value: &[u8]) {
        self.append_element_separator();
        self.buffer.push(b'"');
        self.safe_add_bytes(value);
        self.buffer.push(b'"');
    }

    fn append_bool(&mut self, value: bool) {
        self.append_element_separator();
        let literal: &[u8] = if value { b"true" } else { b"false" };
        self.buffer.extend_from_slice(literal);
    }

    fn append_time(&mut self, value: &DateTime<FixedOffset>) {
        self.append_str(&format_rfc3339_nanos(value));
    }

    fn append_duration(&mut self, value: Duration) {
        self.append_str(&format_duration(value));
    }

    fn append_binary(&mut self, value: &[u8]) {
        self.append_element_separator();
        self.buffer.push(b'"');
        let start = self.buffer.len();
        let encoded_len = base64::encoded_len(value.len(), true).unwrap_or(0);
        self.buffer.resize(start + encoded_len, 0);
        match STANDARD.encode_slice(value, &mut self.buffer[start..]) {
            Ok(written) => self.buffer.truncate(start + written),
            Err(_) => self.buffer.truncate(start),
        }
        self.buffer.push(b'"');
    }

    fn append_null(&mut self) {
        self.append_element_separator();
        self.buffer.extend_from_slice(b"null");
    }
}

impl ObjectEncoder for JsonEncoder {
    fn add_array(&mut self, key: &str, value: &dyn ArrayMarshaler) {
        self.append_key(key);
        self.append_array(value);
    }

    fn add_object(&mut self, key: &str, value: &dyn ObjectMarshaler) {
        self.append_key(key);
        self.append_object(value);
    }

    fn add_i64(&mut self, key: &str, value: i64) {
        self.append_key(key);
        self.append_i64(value);
    }

    fn add_u64(&mut self, key: &str, value: u64) {
        self.append_key(key);
        self.append_u64(value);
    }

    fn add_f32(&mut self, key: &str, value: f32) {
        self.append_key(key);
        self.append_f32(value);
    }

    fn add_f64(&mut self, key: &str, value: f64) {
        self.append_key(key);
        self.append_f64(value);
    }

    fn add_str(&mut self, key: &str, value: &str) {
        self.append_key(key);
        self.append_str(value);
    }

    fn add_byte_str(&mut self, key: &str, value: &[u8]) {
        self.append_key(key);
        self.append_byte_str(value);
    }

    fn add_bool(&mut self, key: &str, value: bool) {
        self.append_key(key);
        self.append_bool(value);
    }

    fn add_time(&mut self, key: &str, value: &DateTime<FixedOffset>) {
        self.append_key(key);
        self.append_time(value);
    }

    fn add_duration(&mut self, key: &str, value: Duration) {
        self.append_key(key);
        self.append_duration(value);
    }

    fn add_binary(&mut self, key: &str, value: &[u8]) {
        self.append_key(key);
        self.append_binary(value);
    }

    fn add_null(&mut self, key: &str) {
        self.append_key(key);
        self.append_null();
    }
}

impl JsonEncoder {
    /// NaN and infinities are not valid JSON numbers, so they are written as strings.
    fn append_non_finite(&mut self, value: f64) {
        let literal: &[u8] = if value.is_nan() {
            b"\"NaN\""
        } else if value.is_sign_positive() {
            b"\"+Inf\""
        } else {
            b"\"-Inf\""
        };
        self.buffer.extend_from_slice(literal);
    }

    /// JSON-escapes a string into the buffer.
    pub(crate) fn safe_add_str(&mut self, value: &str) {
        for &byte in value.as_bytes() {
            if !self.try_add_ascii(byte) {
                // Already valid UTF-8: multi-byte sequences are copied through.
                self.buffer.push(byte);
            }
        }
    }

    /// JSON-escapes arbitrary bytes, replacing every byte of a malformed sequence with `\ufffd`.
    pub(crate) fn safe_add_bytes(&mut self, value: &[u8]) {
        let mut i = 0;
        while i < value.len() {
            if self.try_add_ascii(value[i]) {
                i += 1;
                continue;
            }
            let width = utf8_width(value[i]);
            let end = i + width;
            if width > 0 && end <= value.len() && std::str::from_utf8(&value[i..end]).is_ok() {
                self.buffer.extend_from_slice(&value[i..end]);
                i = end;
            } else {
                self.buffer.extend_from_slice(REPLACEMENT);
                i += 1;
            }
        }
    }

    /// Writes a single-byte character, escaped when needed. Returns false for non-ASCII bytes.
    fn try_add_ascii(&mut self, byte: u8) -> bool {
        if byte >= 0x80 {
            return false;
        }
        match byte {
            b'\\' | b'"' => self.buffer.extend_from_slice(&[b'\\', byte]),
            b'\n' => self.buffer.extend_from_slice(b"\\n"),
            b'\r' => self.buffer.extend_from_slice(b"\\r"),
            b'\t' => self.buffer.extend_from_slice(b"\\t"),
            0x00..=0x1f => self.buffer.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(byte >> 4)],
                HEX[usize::from(byte & 0xf)],
            ]),
            _ => self.buffer.push(byte),
        }
        true
    }
}

/// Expected length of the UTF-8 sequence starting with `lead`, or 0 if it cannot start one.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}
