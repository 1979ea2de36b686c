use std::borrow::Cow;

use crate::error::ParseError;
use crate::{Labels, Series, NAME_LABEL};

/// A parser for Prometheus's text exposition format.
///
/// Returns one series per sample line, in line order. Any malformed sample
/// line fails the whole parse.
pub fn parse(input: &str) -> Result<Vec<Series>, ParseError> {
    let mut values = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        // The line defines a metric's type
        if line.starts_with("# TYPE ") {
            let mut line_parts = line.split(' ').filter(|x| !x.trim().is_empty()).skip(2);
            match (line_parts.next(), line_parts.next()) {
                (Some(_), Some("counter"))
                | (Some(_), Some("gauge"))
                | (Some(_), Some("histogram"))
                | (Some(_), Some("summary"))
                | (Some(_), Some("untyped")) => (),
                (Some(_), Some(type_str)) => {
                    return Err(ParseError::new(
                        line_no,
                        format!("unknown metric type {:?}", type_str),
                    ))
                }
                _ => return Err(ParseError::new(line_no, "incomplete TYPE line")),
            }
        }
        // The line is help text, another comment, or is empty
        else if line.starts_with('#') || line.is_empty() {
        }
        // The line contains data
        else {
            let sample = parse_sample(line).map_err(|reason| ParseError::new(line_no, reason))?;
            values.push(sample);
        }
    }
    Ok(values)
}

/// Parses `metric_name{label1="value1",label2="value2"} value [timestamp]`
fn parse_sample(line: &str) -> Result<Series, String> {
    let (name, mut tail) = split_name(line, true);
    if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Err("invalid metric name".into());
    }

    let mut labels = Labels::new();
    labels.insert(NAME_LABEL.to_string(), name.to_string());
    if let Some(labels_str) = tail.strip_prefix('{') {
        tail = parse_labels(labels_str, &mut labels)?;
    }

    // Split `value timestamp` into parts
    if !tail.starts_with(|ch: char| ch.is_whitespace()) {
        return Err("expected whitespace after metric".into());
    }
    let mut line_parts = tail.split_whitespace();
    let value_str = line_parts.next().ok_or("missing sample value")?;
    let value = parse_value(value_str).ok_or_else(|| format!("invalid value {:?}", value_str))?;

    // The sample's own timestamp isn't used; records are stamped when encoded
    if let Some(unix_str) = line_parts.next() {
        unix_str
            .parse::<i64>()
            .map_err(|_| format!("invalid timestamp {:?}", unix_str))?;
    }
    if line_parts.next().is_some() {
        return Err("unexpected text after timestamp".into());
    }

    Ok(Series::new(labels, value))
}

/// Parses labels up to and including the closing `}`, returning the rest of the line
fn parse_labels<'i>(input: &'i str, labels: &mut Labels) -> Result<&'i str, String> {
    let mut tail = input.trim_start();
    loop {
        if let Some(rest) = tail.strip_prefix('}') {
            return Ok(rest);
        }

        // Split first label
        let (name, rest) = split_name(tail, false);
        if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Err("invalid label name".into());
        }
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix('=')
            .ok_or_else(|| format!("expected '=' after label {:?}", name))?
            .trim_start();
        let rest = rest
            .strip_prefix('"')
            .ok_or_else(|| format!("expected '\"' to start value of label {:?}", name))?;

        // Parse the label
        let (value, rest) = parse_label_value(rest)?;
        if labels.insert(name.to_string(), value.into_owned()).is_some() {
            return Err(format!("duplicate label {:?}", name));
        }

        // Advance to next label
        tail = rest.trim_start();
        if let Some(rest) = tail.strip_prefix(',') {
            tail = rest.trim_start();
        } else if !tail.starts_with('}') {
            return Err("expected ',' or '}' after label value".into());
        }
    }
}

/// Parses a quoted label value, starting after the opening quote.
///
/// Returns the unescaped value and the rest of the input after the closing quote.
fn parse_label_value(input: &str) -> Result<(Cow<str>, &str), String> {
    let mut escaped: Option<String> = None;
    let mut chars = input.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => {
                let value = match escaped {
                    Some(esc) => Cow::Owned(esc),
                    None => Cow::Borrowed(&input[..i]),
                };
                return Ok((value, &input[i + 1..]));
            }
            '\\' => {
                let esc = escaped.get_or_insert_with(|| input[..i].to_string());
                match chars.next() {
                    Some((_, 'n')) => esc.push('\n'),
                    Some((_, '\\')) => esc.push('\\'),
                    Some((_, '"')) => esc.push('"'),
                    Some((_, other)) => {
                        return Err(format!("invalid escape sequence \"\\{}\"", other))
                    }
                    None => break,
                }
            }
            _ => {
                if let Some(esc) = escaped.as_mut() {
                    esc.push(ch);
                }
            }
        }
    }
    Err("unterminated label value".into())
}

fn parse_value(value: &str) -> Option<f64> {
    match value {
        "+Inf" | "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => value.parse().ok(),
    }
}

/// Splits a leading metric name (or label name, without colons) from the input
fn split_name(input: &str, colons: bool) -> (&str, &str) {
    let end = input
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || (colons && ch == ':')))
        .unwrap_or_else(|| input.len());
    input.split_at(end)
}
