//! Internal helpers for payload validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! the messages and normalization rules so every entity reports errors the
//! same way.

use unicode_normalization::UnicodeNormalization;

use crate::FieldErrors;

pub(crate) const NAME_MAX_LEN: usize = 100;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

pub(crate) fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

pub(crate) fn does_not_exist(id: i32) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

pub(crate) fn already_exists(entity: &str) -> String {
    format!("{entity} with this name already exists.")
}

/// Trim, collapse inner whitespace runs and NFC-normalize a display name.
pub(crate) fn normalize_name(input: &str) -> String {
    let composed: String = input.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and check a taxonomy name, recording problems on `name`.
///
/// Returns `None` when the name was rejected.
pub(crate) fn validate_name(input: &str, errors: &mut FieldErrors) -> Option<String> {
    let name = normalize_name(input);
    if name.is_empty() {
        errors.add("name", BLANK);
        return None;
    }
    if name.chars().count() > NAME_MAX_LEN {
        errors.add("name", too_long(NAME_MAX_LEN));
        return None;
    }
    Some(name)
}

/// Empty comments are stored as `""`, surrounding whitespace is dropped.
pub(crate) fn normalize_comment(input: Option<&str>) -> String {
    input.map(str::trim).unwrap_or_default().to_string()
}
