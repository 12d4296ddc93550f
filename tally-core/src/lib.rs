//! tally-core: category store, keyword categorizer, corrections and summaries

pub mod categorizer;
pub mod category;
pub mod correction;
pub mod error;
pub mod store;
pub mod summary;
pub mod transaction;

pub use categorizer::{Categorization, Categorizer, LearnedKeyword, categorize};
pub use category::{Category, CategoryMap, UNCATEGORIZED};
pub use correction::{Recategorized, apply_correction, create_category, recategorize};
pub use error::{CorrectionError, PersistenceError};
pub use store::CategoryStore;
pub use summary::{CategoryTotal, grand_total, summarize};
pub use transaction::{Direction, Transaction};
