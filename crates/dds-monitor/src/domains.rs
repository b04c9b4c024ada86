// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain list parsing.
//!
//! A domain specification is a comma-separated list of tokens, each a single
//! id (`"4"`) or an inclusive range (`"0-3"`). Token order is preserved and a
//! range always expands in ascending order, so `"5-3"` yields `[3, 4, 5]`.

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// DDS domain id.
pub type DomainId = u32;

/// Highest domain id the RTPS port mapping accepts.
pub const MAX_DOMAIN_ID: DomainId = 232;

/// Environment variable consulted when no domain argument is given.
pub const DOMAINS_ENV: &str = "MONITOR_DOMAINS";

/// Domains monitored when nothing else is specified.
pub const DEFAULT_DOMAINS: [DomainId; 6] = [0, 1, 2, 3, 4, 5];

/// How malformed tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Numeric-prefix conversion: `"7x"` is 7, `"abc"` is 0. Ranges with an
    /// empty endpoint are skipped and clamped to the highest valid domain id.
    #[default]
    Lenient,
    /// Any malformed token or out-of-range id is an error.
    Strict,
}

/// Parse a domain specification.
///
/// Empty (or blank) tokens are skipped under both policies. The result may be
/// empty; see [`resolve_domains`] for the default fallback.
pub fn parse_domains(spec: &str, policy: TokenPolicy) -> Result<Vec<DomainId>> {
    let mut domains = Vec::new();
    for token in spec.split(',') {
        if token.trim().is_empty() {
            continue;
        }
        match policy {
            TokenPolicy::Lenient => lenient_token(token, &mut domains),
            TokenPolicy::Strict => strict_token(token, &mut domains)?,
        }
    }
    Ok(domains)
}

/// Pick the domain list from the CLI argument, then the environment, then
/// [`DEFAULT_DOMAINS`].
///
/// A blank argument counts as absent. A specification that parses to an
/// empty list also falls back to the default.
pub fn resolve_domains(
    arg: Option<&str>,
    env: Option<&str>,
    policy: TokenPolicy,
) -> Result<Vec<DomainId>> {
    let spec = match arg {
        Some(arg) if !arg.is_empty() => Some(arg),
        _ => env,
    };
    let domains = match spec {
        Some(spec) => parse_domains(spec, policy)?,
        None => Vec::new(),
    };
    if domains.is_empty() {
        return Ok(DEFAULT_DOMAINS.to_vec());
    }
    Ok(domains)
}

fn lenient_token(token: &str, out: &mut Vec<DomainId>) {
    let Some((start, end)) = token.split_once('-') else {
        out.push(numeric_prefix(token));
        return;
    };
    if start.is_empty() || end.is_empty() {
        return;
    }
    let (lo, hi) = ordered(numeric_prefix(start), numeric_prefix(end));
    let hi = hi.min(MAX_DOMAIN_ID);
    if lo <= hi {
        out.extend(lo..=hi);
    }
}

fn strict_token(token: &str, out: &mut Vec<DomainId>) -> Result<()> {
    let trimmed = token.trim();
    match trimmed.split_once('-') {
        Some((start, end)) => {
            let (lo, hi) = ordered(strict_id(trimmed, start)?, strict_id(trimmed, end)?);
            out.extend(lo..=hi);
        }
        None => out.push(strict_id(trimmed, trimmed)?),
    }
    Ok(())
}

fn strict_id(token: &str, part: &str) -> Result<DomainId> {
    let invalid = |reason: String| MonitorError::InvalidDomainToken {
        token: token.to_string(),
        reason,
    };
    let part = part.trim();
    if part.is_empty() {
        return Err(invalid("empty range endpoint".into()));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a domain id", part)));
    }
    match part.parse::<DomainId>() {
        Ok(id) if id <= MAX_DOMAIN_ID => Ok(id),
        _ => Err(invalid(format!(
            "{} exceeds the highest domain id {}",
            part, MAX_DOMAIN_ID
        ))),
    }
}

/// C `atoi` rules: leading whitespace, optional sign, then digits. Anything
/// unparsable (or negative) becomes 0; overflow saturates.
fn numeric_prefix(text: &str) -> DomainId {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        });
    if negative {
        0
    } else {
        value
    }
}

fn ordered(a: DomainId, b: DomainId) -> (DomainId, DomainId) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(spec: &str) -> Vec<DomainId> {
        parse_domains(spec, TokenPolicy::Lenient).unwrap()
    }

    #[test]
    fn test_single_ids_keep_token_order() {
        assert_eq!(lenient("4,1,3"), vec![4, 1, 3]);
        assert_eq!(lenient("2,2"), vec![2, 2]);
    }

    #[test]
    fn test_ranges_expand_ascending() {
        assert_eq!(lenient("0-3"), vec![0, 1, 2, 3]);
        assert_eq!(lenient("5-3"), vec![3, 4, 5]);
        assert_eq!(lenient("7-7"), vec![7]);
        assert_eq!(lenient("9,0-1,4"), vec![9, 0, 1, 4]);
    }

    #[test]
    fn test_empty_tokens_skipped() {
        assert_eq!(lenient(",1,,2,"), vec![1, 2]);
        assert_eq!(lenient(" , "), Vec::<DomainId>::new());
        assert!(lenient("").is_empty());
    }

    #[test]
    fn test_lenient_malformed_tokens_become_zero() {
        assert_eq!(lenient("abc"), vec![0]);
        assert_eq!(lenient("7x"), vec![7]);
        assert_eq!(lenient(" 12"), vec![12]);
        assert_eq!(lenient("+3"), vec![3]);
    }

    #[test]
    fn test_lenient_half_open_ranges_skipped() {
        assert_eq!(lenient("-3"), Vec::<DomainId>::new());
        assert_eq!(lenient("3-"), Vec::<DomainId>::new());
        assert_eq!(lenient("1,-,2"), vec![1, 2]);
    }

    #[test]
    fn test_lenient_range_upper_bound_clamped() {
        let domains = lenient("230-5000000000");
        assert_eq!(domains, vec![230, 231, 232]);
        assert!(lenient("300-400").is_empty());
    }

    #[test]
    fn test_strict_accepts_well_formed() {
        let domains = parse_domains("1, 3-4 ,232", TokenPolicy::Strict).unwrap();
        assert_eq!(domains, vec![1, 3, 4, 232]);
        let domains = parse_domains("5-3", TokenPolicy::Strict).unwrap();
        assert_eq!(domains, vec![3, 4, 5]);
    }

    #[test]
    fn test_strict_rejects_malformed_tokens() {
        for spec in ["abc", "7x", "1,-3", "2-", "1-2-3", "233", "0-300"] {
            let err = parse_domains(spec, TokenPolicy::Strict).unwrap_err();
            assert!(
                matches!(err, MonitorError::InvalidDomainToken { .. }),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_strict_error_names_offending_token() {
        let err = parse_domains("1,x9,2", TokenPolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("'x9'"));
    }

    #[test]
    fn test_resolve_precedence() {
        let policy = TokenPolicy::Lenient;
        assert_eq!(resolve_domains(Some("7"), Some("8"), policy).unwrap(), vec![7]);
        assert_eq!(resolve_domains(Some(""), Some("8"), policy).unwrap(), vec![8]);
        assert_eq!(resolve_domains(None, Some("8-9"), policy).unwrap(), vec![8, 9]);
        assert_eq!(
            resolve_domains(None, None, policy).unwrap(),
            DEFAULT_DOMAINS.to_vec()
        );
    }

    #[test]
    fn test_resolve_empty_result_falls_back_to_default() {
        let domains = resolve_domains(Some(",,"), Some("4"), TokenPolicy::Lenient).unwrap();
        assert_eq!(domains, DEFAULT_DOMAINS.to_vec());
    }

    #[test]
    fn test_numeric_prefix_saturates() {
        assert_eq!(numeric_prefix("99999999999"), u32::MAX);
        assert_eq!(numeric_prefix("-5"), 0);
    }
}
