// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sample formatters: text (default) and JSON Lines.
//!
//! The text layout is consumed by log scrapers and must stay byte-stable:
//!
//! ```text
//! [domain=1] TOPIC: aircraft coredata
//! Sample '1' RECEIVED
//!  - {latitude: 48.8566, longitude: 2.35222, ...}
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::DomainId;
use crate::error::Result;
use crate::topics::RecordKind;
use crate::types::Record;

/// Output format for accepted samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Three-line human-readable block.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    /// Render one sample. The result carries no trailing newline.
    pub fn render<R: Record>(self, ctx: &SampleContext<'_>, record: &R) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(format_text(ctx, record)),
            OutputFormat::Json => format_json(ctx, record),
        }
    }
}

/// Where and when a sample was received.
#[derive(Debug, Clone, Copy)]
pub struct SampleContext<'a> {
    pub domain: DomainId,
    pub topic: &'a str,
    /// Listener counter value for this sample, starting at 1.
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
}

/// One field value as it appears in the text body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Float(f64),
    Int(i64),
    UInt(u64),
    Bool(bool),
    /// Printed between double quotes, verbatim.
    Text(&'a str),
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(v: f32) -> Self {
        FieldValue::Float(f64::from(v))
    }
}

impl From<i16> for FieldValue<'_> {
    fn from(v: i16) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<u16> for FieldValue<'_> {
    fn from(v: u16) -> Self {
        FieldValue::UInt(u64::from(v))
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(v: u32) -> Self {
        FieldValue::UInt(u64::from(v))
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(v: &'a String) -> Self {
        FieldValue::Text(v)
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => f.write_str(&format_general(*v)),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::UInt(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
            FieldValue::Text(v) => write!(f, "\"{}\"", v),
        }
    }
}

/// Text block: header, counter line, then the `name: value` body.
pub fn format_text<R: Record>(ctx: &SampleContext<'_>, record: &R) -> String {
    let body = record
        .fields()
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[domain={}] TOPIC: {}\nSample '{}' RECEIVED\n - {{{}}}",
        ctx.domain,
        R::KIND.label(ctx.topic),
        ctx.sequence,
        body
    )
}

#[derive(Serialize)]
struct JsonLine<'a, R> {
    domain: DomainId,
    topic: &'a str,
    kind: RecordKind,
    sample: u64,
    received_at: DateTime<Utc>,
    data: &'a R,
}

/// JSON Lines object; `data` keeps the text field order.
pub fn format_json<R: Record>(ctx: &SampleContext<'_>, record: &R) -> Result<String> {
    let line = JsonLine {
        domain: ctx.domain,
        topic: ctx.topic,
        kind: R::KIND,
        sample: ctx.sequence,
        received_at: ctx.received_at,
        data: record,
    };
    Ok(serde_json::to_string(&line)?)
}

const PRECISION: i32 = 6;

/// Render a float like a default-configured C++ output stream (`%g`, six
/// significant digits).
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent after rounding to PRECISION digits picks the notation.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(format!("{:.*}", decimals, value))
    } else {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa.to_string()),
            if exponent < 0 { '-' } else { '+' },
            exponent.unsigned_abs()
        )
    }
}

fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}
