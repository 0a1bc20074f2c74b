pub mod options;

pub use options::{OptionCatalog, SelectOption, catalog};
