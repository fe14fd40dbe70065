use crate::config::WriterConfig;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

// Largest magnitude (exclusive) at which an f64 still truncates into an i64
// without saturating.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    pub fn to_line_protocol(&self, config: &WriterConfig) -> String {
        // Renders the value the way it appears after `key=` in a line

        match self {
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Integer(v) => {
                if config.integer_suffix {
                    format!("{}i", v)
                } else {
                    v.to_string()
                }
            }
            FieldValue::Float(v) => format_float(*v, config.trim_whole_floats),
            FieldValue::String(v) => quote_string(v),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Boolean(v) => *v,
            FieldValue::Integer(v) => *v != 0,
            // NaN is neither positive nor zero, so it counts as true.
            FieldValue::Float(v) => *v != 0.0,
            FieldValue::String(v) => v.eq_ignore_ascii_case("true"),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            FieldValue::Boolean(v) => i64::from(*v),
            FieldValue::Integer(v) => *v,
            FieldValue::Float(v) => *v as i64,
            FieldValue::String(v) => {
                if v.contains('.') {
                    parse_f64_or_zero(v) as i64
                } else {
                    v.parse().unwrap_or(0)
                }
            }
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Boolean(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Float(v) => *v,
            FieldValue::String(v) => parse_f64_or_zero(v),
        }
    }

    /// Plain text form of the value, without quoting or type markers.
    ///
    /// Floats use Rust's `Debug` rendering (`82.0`, `1e20`), which always
    /// keeps a decimal point or exponent and so differs from the trimmed
    /// wire form produced by [`FieldValue::to_line_protocol`].
    pub fn as_string(&self) -> String {
        match self {
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => format!("{:?}", v),
            FieldValue::String(v) => v.clone(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_line_protocol(&WriterConfig::default()))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => float_bits(*a) == float_bits(*b),
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Boolean(v) => v.hash(state),
            FieldValue::Integer(v) => v.hash(state),
            FieldValue::Float(v) => float_bits(*v).hash(state),
            FieldValue::String(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    FieldValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

fn format_float(value: f64, trim_whole_floats: bool) -> String {
    // Whole floats inside the i64 range drop the fractional part; everything
    // else keeps Rust's shortest round-trip decimal text.

    if trim_whole_floats && value.fract() == 0.0 && value.abs() < I64_BOUND {
        (value as i64).to_string()
    } else if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn quote_string(value: &str) -> String {
    // Backslashes first so the escapes added for quotes stay single.

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn parse_f64_or_zero(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn float_bits(value: f64) -> u64 {
    // All NaN payloads compare equal to each other; 0.0 and -0.0 stay distinct.

    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}
