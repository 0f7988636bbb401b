//! Format validators
//!
//! Standalone checks for the identifier and code formats that HIPAA
//! implementation guides reference. All functions are pure and panic-free.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Validate a National Provider Identifier.
///
/// An NPI is 10 digits; the Luhn check runs over the number prefixed with
/// the fixed industry identifier `80840`.
#[must_use]
pub fn validate_npi(npi: &str) -> bool {
    if npi.len() != 10 || !npi.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut total = 0u32;
    for (i, byte) in format!("80840{npi}").bytes().rev().enumerate() {
        let mut d = u32::from(byte - b'0');
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        total += d;
    }
    total % 10 == 0
}

/// Validate a Tax ID (EIN): 9 digits, optionally formatted `NN-NNNNNNN`.
#[must_use]
pub fn validate_tax_id(tax_id: &str) -> bool {
    let digits: String = match tax_id.len() {
        9 => tax_id.to_string(),
        10 if tax_id.as_bytes().get(2) == Some(&b'-') => tax_id.replacen('-', "", 1),
        _ => return false,
    };
    digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit())
}

fn icd10_cm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-TV-Z][0-9][0-9A-Z](\.[0-9A-Z]{1,4})?$").expect("pattern is valid")
    })
}

/// Validate an ICD-10-CM diagnosis code.
#[must_use]
pub fn validate_icd10_cm(code: &str) -> bool {
    icd10_cm_pattern().is_match(code)
}

/// Validate an ICD-10-PCS procedure code: exactly 7 alphanumerics.
#[must_use]
pub fn validate_icd10_pcs(code: &str) -> bool {
    code.len() == 7 && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Validate a CPT (5 digits) or HCPCS Level II (letter + 4 digits) code.
#[must_use]
pub fn validate_procedure_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != 5 {
        return false;
    }
    let tail_is_digits = bytes[1..].iter().all(u8::is_ascii_digit);
    (bytes[0].is_ascii_digit() || bytes[0].is_ascii_uppercase()) && tail_is_digits
}

/// Validate a CCYYMMDD date with strict calendar rules, leap years included.
#[must_use]
pub fn validate_date(value: &str) -> bool {
    value.len() == 8 && NaiveDate::parse_from_str(value, "%Y%m%d").is_ok()
}

/// Validate an HHMM or HHMMSS time.
#[must_use]
pub fn validate_time(value: &str) -> bool {
    if !(value.len() == 4 || value.len() == 6) || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let hours: u32 = value[0..2].parse().unwrap_or(99);
    let minutes: u32 = value[2..4].parse().unwrap_or(99);
    let seconds: u32 = value.get(4..6).map_or(0, |s| s.parse().unwrap_or(99));
    hours < 24 && minutes < 60 && seconds < 60
}

/// Validate a whole number, optional leading sign.
#[must_use]
pub fn validate_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a decimal number, optional sign and fraction.
#[must_use]
pub fn validate_decimal(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npi_known_good() {
        // 1234567893 carries the correct Luhn check digit for 123456789.
        assert!(validate_npi("1234567893"));
        assert!(validate_npi("1245319599"));
    }

    #[test]
    fn test_npi_rejects_bad_check_digit() {
        assert!(!validate_npi("1234567890"));
        assert!(!validate_npi("1234567894"));
    }

    #[test]
    fn test_npi_rejects_malformed() {
        assert!(!validate_npi("123456789"));
        assert!(!validate_npi("12345678901"));
        assert!(!validate_npi("12345678XX"));
        assert!(!validate_npi(""));
    }

    #[test]
    fn test_tax_id() {
        assert!(validate_tax_id("123456789"));
        assert!(validate_tax_id("12-3456789"));
        assert!(!validate_tax_id("12345678"));
        assert!(!validate_tax_id("1234567890"));
        assert!(!validate_tax_id("12345678A"));
        assert!(!validate_tax_id("123-45678"));
    }

    #[test]
    fn test_icd10_cm() {
        assert!(validate_icd10_cm("J45"));
        assert!(validate_icd10_cm("J45.909"));
        assert!(validate_icd10_cm("E11.9"));
        assert!(validate_icd10_cm("S72.001A"));
        assert!(!validate_icd10_cm("U07"), "U is excluded from the first position");
        assert!(!validate_icd10_cm("j45.909"));
        assert!(!validate_icd10_cm("J4"));
        assert!(!validate_icd10_cm("J45."));
        assert!(!validate_icd10_cm("J45.90909"));
    }

    #[test]
    fn test_icd10_pcs() {
        assert!(validate_icd10_pcs("0BH17EZ"));
        assert!(!validate_icd10_pcs("0BH17E"));
        assert!(!validate_icd10_pcs("0BH17EZ9"));
        assert!(!validate_icd10_pcs("0BH17E-"));
    }

    #[test]
    fn test_procedure_codes() {
        assert!(validate_procedure_code("99213"), "CPT");
        assert!(validate_procedure_code("J1100"), "HCPCS");
        assert!(!validate_procedure_code("9921"));
        assert!(!validate_procedure_code("992134"));
        assert!(!validate_procedure_code("J110A"));
        assert!(!validate_procedure_code("j1100"));
    }

    #[test]
    fn test_dates_with_leap_years() {
        assert!(validate_date("20240229"), "2024 is a leap year");
        assert!(!validate_date("20230229"));
        assert!(!validate_date("20241301"));
        assert!(!validate_date("20240132"));
        assert!(!validate_date("2024010"));
        assert!(validate_date("20000229"), "2000 is a leap year");
        assert!(!validate_date("19000229"), "1900 is not a leap year");
    }

    #[test]
    fn test_times() {
        assert!(validate_time("0000"));
        assert!(validate_time("2359"));
        assert!(validate_time("235959"));
        assert!(!validate_time("2400"));
        assert!(!validate_time("1260"));
        assert!(!validate_time("123060"));
        assert!(!validate_time("12"));
        assert!(!validate_time("12a0"));
    }

    #[test]
    fn test_numeric() {
        assert!(validate_integer("42"));
        assert!(validate_integer("-7"));
        assert!(!validate_integer("4.2"));
        assert!(!validate_integer(""));

        assert!(validate_decimal("100"));
        assert!(validate_decimal("100.50"));
        assert!(validate_decimal("-0.5"));
        assert!(!validate_decimal("1.2.3"));
        assert!(!validate_decimal(""));
    }
}
