//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod category;
pub mod question;
pub mod pagination;

pub use validation::ValidationError;
pub use category::{Category, CategoryMap, CategoryRef, DEFAULT_CATEGORIES};
pub use question::{NewQuestion, Question};
pub use pagination::{PageParams, Paginated, Pagination, QUESTIONS_PER_PAGE};
