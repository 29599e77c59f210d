// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Prefix shared by every public order reference.
pub const ORDER_REF_PREFIX: &str = "RI-";

const ORDER_REF_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_REF_SUFFIX_LEN: usize = 8;

/// Generates a public order reference such as `RI-7K2M9Q4Z`.
///
/// Uniqueness is enforced by the storage layer; callers retry on collision.
#[must_use]
pub fn generate_order_ref() -> String {
    let mut reference = String::with_capacity(ORDER_REF_PREFIX.len() + ORDER_REF_SUFFIX_LEN);
    reference.push_str(ORDER_REF_PREFIX);
    for _ in 0..ORDER_REF_SUFFIX_LEN {
        let index = rand::random::<u32>() as usize % ORDER_REF_ALPHABET.len();
        reference.push(char::from(ORDER_REF_ALPHABET[index]));
    }
    reference
}

/// Returns whether `value` has the shape of an order reference.
///
/// Lowercase input is accepted; references are compared case-insensitively.
#[must_use]
pub fn is_valid_order_ref(value: &str) -> bool {
    let Some(suffix) = value
        .get(..ORDER_REF_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(ORDER_REF_PREFIX))
        .and_then(|_| value.get(ORDER_REF_PREFIX.len()..))
    else {
        return false;
    };
    suffix.len() == ORDER_REF_SUFFIX_LEN && suffix.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Normalizes an order reference for lookup.
#[must_use]
pub fn normalize_order_ref(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}
