pub mod sheet;
pub mod table;

pub use sheet::{Cell, PriceRow, PriceSheet, INPUT_PRICE_COLUMN, OUTPUT_PRICE_COLUMN};
pub use table::{PriceEntry, PriceTable};
