use std::borrow::Cow;

/// Escapes a measurement name. Spaces and commas end the measurement, so both
/// are escaped; `=` is left alone because it is not a separator there.
pub fn escape_measurement(measurement: &str) -> Cow<'_, str> {
    escape(measurement, &[' ', ','])
}

/// Escapes a tag key, tag value or field key.
pub fn escape_key(key: &str) -> Cow<'_, str> {
    escape(key, &[' ', ',', '='])
}

fn escape<'a>(input: &'a str, special: &[char]) -> Cow<'a, str> {
    if !input.contains(special) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
