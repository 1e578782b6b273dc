use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{ColumnTrait, Order, QueryFilter, QueryOrder};

use crate::{
    FieldErrors, ResultEngine, cash_flow_types, cash_flows, categories, statuses, subcategories,
};

const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
const INVALID_DATE: &str = "Enter a valid date/time.";

/// One end of a `created_at` range.
///
/// A bare date covers the whole UTC day: as a lower bound it starts at
/// midnight, as an upper bound it ends right before the next midnight.
/// Timestamps are compared as given, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatedAtBound {
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl CreatedAtBound {
    fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc()
    }
}

impl FromStr for CreatedAtBound {
    type Err = String;

    /// Accepts `YYYY-MM-DD`, RFC 3339 and naive `YYYY-MM-DD[T ]HH:MM[:SS[.f]]`
    /// (read as UTC).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Date(date));
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Timestamp(timestamp.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Self::Timestamp(naive.and_utc()))
            .ok_or_else(|| INVALID_DATE.to_string())
    }
}

/// Raw listing query values, before parsing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CashFlowFilterParams<'a> {
    pub status: Option<&'a str>,
    pub cash_flow_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub created_at_after: Option<&'a str>,
    pub created_at_before: Option<&'a str>,
}

/// Filters for listing cash flows. Every set field must match.
///
/// Ids that do not exist are not an error, they simply match nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CashFlowFilter {
    pub status: Option<i32>,
    pub cash_flow_type: Option<i32>,
    pub category: Option<i32>,
    pub subcategory: Option<i32>,
    pub created_at_after: Option<CreatedAtBound>,
    pub created_at_before: Option<CreatedAtBound>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_id(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<i32> {
    let raw = non_blank(raw)?;
    match raw.parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, INVALID_CHOICE);
            None
        }
    }
}

fn parse_bound(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<CreatedAtBound> {
    let raw = non_blank(raw)?;
    match raw.parse::<CreatedAtBound>() {
        Ok(bound) => Some(bound),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

impl CashFlowFilter {
    /// Parse raw query values. Blank values are treated as absent.
    pub fn parse(params: CashFlowFilterParams<'_>) -> ResultEngine<Self> {
        let mut errors = FieldErrors::new();
        let filter = Self {
            status: parse_id("status", params.status, &mut errors),
            cash_flow_type: parse_id("cash_flow_type", params.cash_flow_type, &mut errors),
            category: parse_id("category", params.category, &mut errors),
            subcategory: parse_id("subcategory", params.subcategory, &mut errors),
            created_at_after: parse_bound(
                "created_at_after",
                params.created_at_after,
                &mut errors,
            ),
            created_at_before: parse_bound(
                "created_at_before",
                params.created_at_before,
                &mut errors,
            ),
        };
        errors.into_result()?;
        Ok(filter)
    }
}

/// Sortable columns of the cash flow listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CashFlowOrderField {
    Id,
    CreatedAt,
    Amount,
    Status,
    CashFlowType,
    Category,
    Subcategory,
}

impl FromStr for CashFlowOrderField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "created_at" => Ok(Self::CreatedAt),
            "amount" => Ok(Self::Amount),
            "status" | "status_name" => Ok(Self::Status),
            "cash_flow_type" | "cash_flow_type_name" => Ok(Self::CashFlowType),
            "category" | "category_name" => Ok(Self::Category),
            "subcategory" | "subcategory_name" => Ok(Self::Subcategory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CashFlowOrdering {
    pub field: CashFlowOrderField,
    pub descending: bool,
}

impl CashFlowOrdering {
    /// Newest first.
    pub const DEFAULT: Self = Self {
        field: CashFlowOrderField::CreatedAt,
        descending: true,
    };

    /// Parse `ordering=a,-b`. Unknown fields are skipped; when nothing usable
    /// remains the default ordering applies.
    pub fn parse_list(raw: Option<&str>) -> Vec<Self> {
        let mut orderings: Vec<Self> = Vec::new();
        for term in raw.unwrap_or_default().split(',').map(str::trim) {
            let (name, descending) = match term.strip_prefix('-') {
                Some(name) => (name, true),
                None => (term, false),
            };
            let Ok(field) = name.parse::<CashFlowOrderField>() else {
                continue;
            };
            if orderings.iter().all(|o| o.field != field) {
                orderings.push(Self { field, descending });
            }
        }
        if orderings.is_empty() {
            orderings.push(Self::DEFAULT);
        }
        orderings
    }
}

pub(super) trait ApplyCashFlowFilters: QueryFilter + Sized {
    fn apply_cash_flow_filters(self, filter: &CashFlowFilter) -> Self;
}

impl<T> ApplyCashFlowFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_cash_flow_filters(mut self, filter: &CashFlowFilter) -> Self {
        if let Some(id) = filter.status {
            self = self.filter(cash_flows::Column::StatusId.eq(id));
        }
        if let Some(id) = filter.cash_flow_type {
            self = self.filter(cash_flows::Column::CashFlowTypeId.eq(id));
        }
        if let Some(id) = filter.subcategory {
            self = self.filter(cash_flows::Column::SubcategoryId.eq(id));
        }
        // Requires the subcategories join.
        if let Some(id) = filter.category {
            self = self.filter(subcategories::Column::CategoryId.eq(id));
        }

        match filter.created_at_after {
            Some(CreatedAtBound::Date(date)) => {
                let start = CreatedAtBound::start_of_day(date);
                self = self.filter(cash_flows::Column::CreatedAt.gte(start));
            }
            Some(CreatedAtBound::Timestamp(at)) => {
                self = self.filter(cash_flows::Column::CreatedAt.gte(at));
            }
            None => {}
        }
        match filter.created_at_before {
            Some(CreatedAtBound::Date(date)) => {
                if let Some(next) = date.checked_add_days(Days::new(1)) {
                    let end = CreatedAtBound::start_of_day(next);
                    self = self.filter(cash_flows::Column::CreatedAt.lt(end));
                }
            }
            Some(CreatedAtBound::Timestamp(at)) => {
                self = self.filter(cash_flows::Column::CreatedAt.lte(at));
            }
            None => {}
        }

        self
    }
}

pub(super) trait ApplyCashFlowOrdering: QueryOrder + Sized {
    fn apply_cash_flow_ordering(self, orderings: &[CashFlowOrdering]) -> Self;
}

impl<T> ApplyCashFlowOrdering for T
where
    T: QueryOrder + Sized,
{
    /// Always ends with `id` descending so pages are stable.
    fn apply_cash_flow_ordering(mut self, orderings: &[CashFlowOrdering]) -> Self {
        let orderings = if orderings.is_empty() {
            &[CashFlowOrdering::DEFAULT][..]
        } else {
            orderings
        };

        for ordering in orderings {
            let order = if ordering.descending {
                Order::Desc
            } else {
                Order::Asc
            };
            self = match ordering.field {
                CashFlowOrderField::Id => self.order_by(cash_flows::Column::Id, order),
                CashFlowOrderField::CreatedAt => {
                    self.order_by(cash_flows::Column::CreatedAt, order)
                }
                CashFlowOrderField::Amount => self.order_by(cash_flows::Column::AmountMinor, order),
                CashFlowOrderField::Status => self.order_by(statuses::Column::Name, order),
                CashFlowOrderField::CashFlowType => {
                    self.order_by(cash_flow_types::Column::Name, order)
                }
                CashFlowOrderField::Category => self.order_by(categories::Column::Name, order),
                CashFlowOrderField::Subcategory => {
                    self.order_by(subcategories::Column::Name, order)
                }
            };
        }

        if orderings.iter().all(|o| o.field != CashFlowOrderField::Id) {
            self = self.order_by_desc(cash_flows::Column::Id);
        }
        self
    }
}
