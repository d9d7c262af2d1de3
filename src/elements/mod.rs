mod error;
mod parsing;
mod store;

pub use error::ProviderError;
pub use parsing::{catalog_number, parse_element_sets, RawElementSet};
pub use store::{ElementStore, StoredSet};
