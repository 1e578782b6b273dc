//! Rules every cash flow write must satisfy.
//!
//! Both checks are pure: the engine loads the referenced rows and hands over
//! only the ids that matter.
//!
//! - the amount parses as a decimal with at most two places and is positive;
//! - the subcategory belongs to the supplied category, and the category
//!   (supplied, or else the subcategory's own) belongs to the supplied cash
//!   flow type.

use crate::{Amount, FieldErrors};

pub(crate) const AMOUNT_NOT_POSITIVE: &str = "Amount must be positive";
pub(crate) const SUBCATEGORY_MISMATCH: &str =
    "Subcategory does not belong to the selected category.";
pub(crate) const CATEGORY_MISMATCH: &str =
    "Category does not belong to the selected cash flow type.";

/// Parse a submitted amount, returning the message to report on `amount`.
pub(crate) fn parse_amount(raw: &str) -> Result<Amount, String> {
    let amount: Amount = raw.parse().map_err(|err: crate::AmountError| err.to_string())?;
    if !amount.is_positive() {
        return Err(AMOUNT_NOT_POSITIVE.to_string());
    }
    Ok(amount)
}

/// A category as seen by the consistency check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CategoryRef {
    pub id: i32,
    pub cash_flow_type_id: i32,
}

/// Classification of a cash flow write with every reference resolved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Classification {
    pub cash_flow_type_id: i32,
    /// The category supplied with the write, if any.
    pub category: Option<CategoryRef>,
    /// The category the subcategory belongs to.
    pub subcategory_category: CategoryRef,
}

/// Check that subcategory, category and cash flow type agree.
///
/// Stops at the first mismatch, subcategory first.
pub(crate) fn check_classification(classification: &Classification) -> Result<(), FieldErrors> {
    if let Some(category) = classification.category
        && classification.subcategory_category.id != category.id
    {
        return Err(FieldErrors::single("subcategory", SUBCATEGORY_MISMATCH));
    }

    let category = classification
        .category
        .unwrap_or(classification.subcategory_category);
    if category.cash_flow_type_id != classification.cash_flow_type_id {
        return Err(FieldErrors::single("category", CATEGORY_MISMATCH));
    }

    Ok(())
}
