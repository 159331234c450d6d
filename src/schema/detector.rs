//! Date/value column detection.
//!
//! Sales exports name their columns inconsistently ("Order Date" vs
//! "transaction_date", "Sales" vs "Revenue" vs "Quantity"). We resolve them
//! against fixed, priority-ordered candidate lists: the first candidate present
//! in the file wins, regardless of where the column sits in the header.

use crate::domain::ColumnBinding;
use crate::error::SchemaError;

/// Date column candidates, highest priority first.
pub const DATE_COLUMN_CANDIDATES: &[&str] = &[
    "Order Date",
    "Date",
    "order_date",
    "date",
    "OrderDate",
    "transaction_date",
    "Transaction Date",
    "InvoiceDate",
    "Invoice Date",
    "sale_date",
    "Sale Date",
    "Ship Date",
    "ship_date",
];

/// Value column candidates (sales, revenue, then quantity synonyms), highest priority first.
pub const VALUE_COLUMN_CANDIDATES: &[&str] = &[
    "Sales",
    "sales",
    "Total Sales",
    "total_sales",
    "Revenue",
    "revenue",
    "Sales Amount",
    "Amount",
    "amount",
    "Total",
    "total",
    "Quantity",
    "quantity",
    "Quantity Ordered",
    "Units",
    "units",
    "Units Sold",
    "Qty",
    "qty",
];

/// Substrings (case-insensitive) marking a value column as a unit count.
const QUANTITY_MARKERS: [&str; 3] = ["quantity", "units", "qty"];

/// Pick the date and value columns from a header row.
pub fn detect_columns<S: AsRef<str>>(column_names: &[S]) -> Result<ColumnBinding, SchemaError> {
    let has = |candidate: &str| column_names.iter().any(|c| c.as_ref() == candidate);

    let date_column = DATE_COLUMN_CANDIDATES
        .iter()
        .find(|c| has(c))
        .ok_or(SchemaError::NoDateColumn)?;
    let value_column = VALUE_COLUMN_CANDIDATES
        .iter()
        .find(|c| has(c))
        .ok_or(SchemaError::NoValueColumn)?;

    Ok(ColumnBinding {
        date_column: date_column.to_string(),
        value_column: value_column.to_string(),
        is_quantity: is_quantity_column(value_column),
    })
}

pub fn is_quantity_column(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    QUANTITY_MARKERS.iter().any(|m| lower.contains(m))
}
