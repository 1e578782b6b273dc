//! Storage and rules of the cash flow ledger.
//!
//! The [`Engine`] owns the database connection and exposes one method per
//! operation: list, read, create, update and delete for statuses, cash flow
//! types, categories, subcategories and cash flows. Every operation runs in
//! its own database transaction.

pub use cash_flow_types::CashFlowType;
pub use cash_flows::CashFlow;
pub use categories::Category;
pub use error::{EngineError, FieldErrors};
pub use money::{Amount, AmountError};
pub use ops::{
    CashFlowFilter, CashFlowFilterParams, CashFlowInput, CashFlowOrderField, CashFlowOrdering,
    CategoryInput, CreatedAtBound, Engine, EngineBuilder, NameInput, SubcategoryInput, WriteMode,
};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, Pagination};
pub use statuses::Status;
pub use subcategories::Subcategory;

mod cash_flow_types;
mod cash_flows;
mod categories;
mod error;
mod money;
mod ops;
mod pagination;
mod statuses;
mod subcategories;
mod util;
mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
