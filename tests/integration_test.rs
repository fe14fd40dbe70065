use anyhow::{anyhow, Error};
use influxdb_line_protocol::{parse_lines, FieldValue as ParsedFieldValue, ParsedLine};
use influxdb_line_protocol_writer::{
    config::{Precision, WriterConfig},
    handle_input, FieldValue, Point, PointBuilder,
};
use rand::{distributions::Alphanumeric, Rng};

// Characters the writer has to escape somewhere in a line.
static SPECIAL_CHARACTERS: &[char] = &[' ', ',', '=', '"', '\\'];

// These tests render points with the writer and read them back with the
// influxdata line protocol parser, so every assertion checks what an
// ingestion endpoint would actually see.

fn random_string(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            if rng.gen_bool(0.3) {
                SPECIAL_CHARACTERS[rng.gen_range(0, SPECIAL_CHARACTERS.len())]
            } else {
                char::from(rng.sample(Alphanumeric))
            }
        })
        .collect()
}

fn parse_single(line: &str) -> Result<ParsedLine<'_>, Error> {
    let mut lines = parse_lines(line);
    let parsed = lines
        .next()
        .ok_or_else(|| anyhow!("No line parsed from {}", line))?
        .map_err(|error| anyhow!("Failed to parse {}: {}", line, error))?;
    if lines.next().is_some() {
        return Err(anyhow!("More than one line parsed from {}", line));
    }
    Ok(parsed)
}

fn assert_round_trip(point: &Point) -> Result<(), Error> {
    // Parses the rendered point and compares every part with the source.
    let line = point.to_string();
    let parsed = parse_single(&line)?;

    assert_eq!(parsed.series.measurement.to_string(), point.measurement());

    let parsed_tags: Vec<(String, String)> = parsed
        .series
        .tag_set
        .as_ref()
        .map(|tags| {
            tags.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(parsed_tags, point.tags());

    assert_eq!(parsed.field_set.len(), point.fields().len());
    for ((parsed_key, parsed_value), (key, value)) in
        parsed.field_set.iter().zip(point.fields().iter())
    {
        assert_eq!(parsed_key.to_string(), *key);
        match (parsed_value, value) {
            (ParsedFieldValue::I64(parsed), FieldValue::Integer(expected)) => {
                assert_eq!(parsed, expected)
            }
            (ParsedFieldValue::F64(parsed), FieldValue::Float(expected)) => {
                assert_eq!(parsed, expected)
            }
            (ParsedFieldValue::Boolean(parsed), FieldValue::Boolean(expected)) => {
                assert_eq!(parsed, expected)
            }
            (ParsedFieldValue::String(parsed), FieldValue::String(expected)) => {
                assert_eq!(parsed.to_string(), *expected)
            }
            (parsed, expected) => {
                return Err(anyhow!(
                    "Field {} parsed as {:?}, expected {:?}",
                    key,
                    parsed,
                    expected
                ))
            }
        }
    }

    assert_eq!(parsed.timestamp, point.timestamp());
    Ok(())
}

#[test]
fn test_weather_point_parses() -> Result<(), Error> {
    let point = PointBuilder::new()
        .measurement("weather")
        .tag("location", "us-midwest")
        .field("temperature", 82.0)
        .timestamp(1465839830100400200)
        .build()
        .ok_or_else(|| anyhow!("Failed to build point"))?;

    assert_eq!(
        point.to_string(),
        "weather,location=us-midwest temperature=82 1465839830100400200"
    );
    assert_round_trip(&point)
}

#[test]
fn test_all_field_types_parse() -> Result<(), Error> {
    let point = PointBuilder::new()
        .measurement("readings")
        .tag("fleet", "Alberta")
        .field("incline", 125)
        .field("fuel_usage", 21.3)
        .field("whole", -4.0)
        .field("active", false)
        .field("note", "said \"hi\" \\o/")
        .build()
        .ok_or_else(|| anyhow!("Failed to build point"))?;

    assert_round_trip(&point)
}

#[test]
fn test_escaped_names_parse() -> Result<(), Error> {
    let point = PointBuilder::new()
        .measurement(",wea ther")
        .tag("fleet ,=", "A l,b=erta")
        .field("inc line,=", 1)
        .timestamp(1577836800000)
        .build()
        .ok_or_else(|| anyhow!("Failed to build point"))?;

    assert_round_trip(&point)
}

#[test]
fn test_random_strings_parse() -> Result<(), Error> {
    // Backslashes are only escaped inside string field values, so they stay
    // out of the names here.
    for _ in 0..200 {
        let name = || -> String {
            let mut name = random_string(12).replace('\\', "_");
            // a leading or trailing special character can be ambiguous
            name.insert(0, 'x');
            name.push('x');
            name
        };
        let point = PointBuilder::new()
            .measurement(name())
            .tag(name(), name())
            .field(name(), random_string(16))
            .field(name(), rand::thread_rng().gen::<i64>())
            .timestamp(rand::thread_rng().gen_range(0, i64::MAX))
            .build()
            .ok_or_else(|| anyhow!("Failed to build point"))?;

        assert_round_trip(&point)?;
    }
    Ok(())
}

#[test]
fn test_handle_input() -> Result<(), Error> {
    let input = concat!(
        r#"{"measurement":"weather","tags":{"location":"us-midwest"},"fields":{"temperature":82.0},"timestamp":1465839830100400200}"#,
        "\n",
        "\n",
        r#"{"measurement":"empty","tags":{"a":"b"}}"#,
        "\n",
        r#"{"measurement":"readings","fields":{"incline":125,"note":"ok"}}"#,
        "\n",
    );
    let mut output: Vec<u8> = Vec::new();

    let written = handle_input(
        input.as_bytes(),
        &mut output,
        &WriterConfig::default(),
        &Precision::Nanoseconds,
    )?;

    assert_eq!(written, 2);
    let output = String::from_utf8(output)?;
    assert_eq!(
        output,
        "weather,location=us-midwest temperature=82 1465839830100400200\n\
         readings incline=125i,note=\"ok\"\n"
    );
    assert_eq!(parse_lines(&output).filter(|line| line.is_ok()).count(), 2);
    Ok(())
}

#[test]
fn test_handle_input_precision() -> Result<(), Error> {
    let input = r#"{"measurement":"m","fields":{"v":1.5},"timestamp":1577836800}"#;
    let mut output: Vec<u8> = Vec::new();

    handle_input(
        input.as_bytes(),
        &mut output,
        &WriterConfig::default(),
        &Precision::Seconds,
    )?;

    assert_eq!(String::from_utf8(output)?, "m v=1.5 1577836800000000000\n");
    Ok(())
}

#[test]
fn test_handle_input_malformed_line() {
    let input = "{\"measurement\":\"m\",\"fields\":{\"v\":1}}\n{not json}\n";
    let mut output: Vec<u8> = Vec::new();

    let result = handle_input(
        input.as_bytes(),
        &mut output,
        &WriterConfig::default(),
        &Precision::Nanoseconds,
    );

    let error = result.expect_err("Expected malformed input to fail");
    assert!(error.to_string().contains("line 2"));
    // Records before the malformed one are already written.
    assert_eq!(String::from_utf8_lossy(&output), "m v=1i\n");
}

#[test]
fn test_handle_input_skips_empty_measurement() -> Result<(), Error> {
    let input = concat!(
        r#"{"measurement":"","fields":{"a":1}}"#,
        "\n",
        r#"{"measurement":"m","fields":{"a":1}}"#,
        "\n",
    );
    let mut output: Vec<u8> = Vec::new();

    let written = handle_input(
        input.as_bytes(),
        &mut output,
        &WriterConfig::default(),
        &Precision::Nanoseconds,
    )?;

    assert_eq!(written, 1);
    assert_eq!(String::from_utf8(output)?, "m a=1i\n");
    Ok(())
}
