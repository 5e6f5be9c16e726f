//! Integration tests for scalar codecs
//!
//! Tests rational normalization and rendering, bit and byte strings, and
//! Unicode handling of text.

use relvalue_foundation::{BigInt, BitString, ByteString, Rational, Text};

// =============================================================================
// Rationals
// =============================================================================

#[test]
fn rational_repeating_renders_as_fraction() {
    assert_eq!(Rational::new(1, 3).unwrap().literal(), "1/3");
    assert_eq!(Rational::new(-4, 14).unwrap().literal(), "-2/7");
}

#[test]
fn rational_terminating_renders_as_decimal() {
    assert_eq!(Rational::new(1, 4).unwrap().literal(), "0.25");
    assert_eq!(Rational::new(4, 2).unwrap().literal(), "2.0");
    assert_eq!(Rational::new(1, -2).unwrap().literal(), "-0.5");
}

#[test]
fn rational_sign_moves_to_numerator() {
    let r = Rational::new(-3, -6).unwrap();
    assert_eq!(r.numerator(), &BigInt::from(1));
    assert_eq!(r.denominator(), &BigInt::from(2));
    assert!(r.same(&Rational::new(1, 2).unwrap()));
}

#[test]
fn rational_decimal_keeps_written_scale() {
    let r = Rational::parse_decimal("12.50").unwrap();
    assert_eq!(r.decimal_text().as_deref(), Some("12.50"));
    assert_eq!(r.literal(), "12.5");
    assert!(r.same(&Rational::new(25, 2).unwrap()));
}

#[test]
fn rational_terminating_classification() {
    assert!(Rational::new(7, 40).unwrap().is_terminating_decimal());
    assert!(!Rational::new(1, 6).unwrap().is_terminating_decimal());
    assert!(Rational::new(6, 3).unwrap().is_integral());
}

#[test]
fn rational_malformed_decimal_rejected() {
    assert!(Rational::parse_decimal("1.").is_err());
    assert!(Rational::parse_decimal("abc").is_err());
}

// =============================================================================
// Bit and Byte Strings
// =============================================================================

#[test]
fn bits_render_with_prefix() {
    let bits = BitString::parse("1011").unwrap();
    assert_eq!(bits.len(), 4);
    assert_eq!(bits.get(1), Some(false));
    assert_eq!(bits.literal(), "\\~?0b1011");
    assert_eq!(BitString::new().literal(), "\\~?");
}

#[test]
fn bits_reject_other_digits() {
    assert!(BitString::parse("102").is_err());
}

#[test]
fn bytes_render_upper_hex() {
    assert_eq!(ByteString::new(vec![0x0A, 0xFF]).literal(), "\\~+0x0AFF");
    assert_eq!(ByteString::new(Vec::new()).literal(), "\\~+");
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn text_surrogate_pair_is_one_member() {
    let text = Text::from_utf16(&[0x0061, 0xD83D, 0xDE00]).unwrap();
    assert_eq!(text.len(), 2);
    assert_eq!(text.as_str(), "a\u{1F600}");
}

#[test]
fn text_unpaired_surrogate_rejected() {
    assert!(Text::from_utf16(&[0xD83D]).is_err());
    assert!(Text::from_utf16(&[0xDE00, 0x0061]).is_err());
    assert!(Text::from_code_points(&[0xD800]).is_err());
    assert!(Text::from_code_points(&[0x11_0000]).is_err());
}

#[test]
fn text_literal_escapes_reserved_characters() {
    let text = Text::new("a\"b'c`d\\e\tf\ng\rh\u{7}");
    assert_eq!(
        text.literal(),
        "\"a\\\"b\\'c\\`d\\\\e\\tf\\ng\\rh\\u{7}\""
    );
    assert_eq!(Text::new("héllo").literal(), "\"héllo\"");
}

#[test]
fn text_identifier_shape() {
    assert!(Text::new("_name1").is_identifier());
    assert!(!Text::new("1name").is_identifier());
    assert!(!Text::new("").is_identifier());
}
