//! French business identifier shape checks.
//!
//! These are syntactic checks only — registry lookups (INSEE, VIES) are an
//! external collaborator's concern.

/// Check the SIRET shape: exactly 14 digits (spaces tolerated — extracted
/// documents often group digits).
pub fn is_valid_siret(siret: &str) -> bool {
    let digits: String = siret.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 14 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Check the SIREN shape: exactly 9 digits.
pub fn is_valid_siren(siren: &str) -> bool {
    let digits: String = siren.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Check the French VAT identifier shape: `FR` + 2-character key + 9-digit
/// SIREN. Non-FR prefixes only get the generic 2-letter-country check.
///
/// Operates on chars, not byte offsets — extracted identifiers can carry
/// arbitrary text and must fail the check rather than panic.
pub fn is_valid_vat_number(vat: &str) -> bool {
    let chars: Vec<char> = vat.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() < 4 {
        return false;
    }
    let (country, rest) = chars.split_at(2);
    if !country.iter().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    if country[0] == 'F' && country[1] == 'R' {
        rest.len() == 11
            && rest[..2].iter().all(|c| c.is_ascii_alphanumeric())
            && rest[2..].iter().all(|c| c.is_ascii_digit())
    } else {
        rest.iter().all(|c| c.is_ascii_alphanumeric())
    }
}

/// Extract the SIREN (first 9 digits) from a SIRET.
pub fn siren_of_siret(siret: &str) -> Option<String> {
    let digits: String = siret.chars().filter(|c| !c.is_whitespace()).collect();
    if is_valid_siret(&digits) {
        Some(digits[..9].to_string())
    } else {
        None
    }
}
