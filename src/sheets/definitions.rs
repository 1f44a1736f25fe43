// src/sheets/definitions.rs

pub mod cell_format;
pub mod cell_value;
pub mod column_data_type;
pub mod column_definition;
pub mod sheet;

pub use cell_format::{CellAlign, CellFormat, CellMeta, CellMetaKey};
pub use cell_value::CellValue;
pub use column_data_type::{parse_column_data_type, ColumnDataType};
pub use column_definition::{generate_column_key, ColumnDefinition, ColumnUpdate};
pub use sheet::{column_letter, MergeRect, Sheet, MAX_COLS, MAX_ROWS};
