//! Flat row Arrow schema and conversions
//!
//! The schema is fixed: the twelve [`FlatRow`] columns in declaration order,
//! all non-nullable.

use crate::error::{Error, Result};
use crate::types::{FlatRow, FLAT_ROW_COLUMNS};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Arrow schema of a flattened order file
pub fn flat_row_schema() -> SchemaRef {
    let fields: Vec<Field> = FLAT_ROW_COLUMNS
        .iter()
        .map(|name| Field::new(*name, column_type(name), false))
        .collect();
    Arc::new(Schema::new(fields))
}

fn column_type(name: &str) -> DataType {
    match name {
        "total_amount" | "price" => DataType::Float64,
        "quantity" => DataType::Int64,
        _ => DataType::Utf8,
    }
}

/// Convert rows to a RecordBatch, preserving row order
pub fn rows_to_batch(rows: &[FlatRow]) -> Result<RecordBatch> {
    let schema = flat_row_schema();

    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    fn strings(rows: &[FlatRow], f: impl Fn(&FlatRow) -> &str) -> ArrayRef {
        Arc::new(rows.iter().map(|r| Some(f(r))).collect::<StringArray>())
    }

    let columns: Vec<ArrayRef> = vec![
        strings(rows, |r| r.order_id.as_str()),
        strings(rows, |r| r.order_date.as_str()),
        Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.total_amount),
        )),
        strings(rows, |r| r.customer_id.as_str()),
        strings(rows, |r| r.customer_name.as_str()),
        strings(rows, |r| r.email.as_str()),
        strings(rows, |r| r.address.as_str()),
        strings(rows, |r| r.product_id.as_str()),
        strings(rows, |r| r.product_name.as_str()),
        strings(rows, |r| r.category.as_str()),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.price))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.quantity))),
    ];

    RecordBatch::try_new(schema, columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Convert a flat row RecordBatch back into rows
///
/// Columns are looked up by name, so the batch may come from any reader
/// that preserved the schema.
pub fn batch_to_rows(batch: &RecordBatch) -> Result<Vec<FlatRow>> {
    let order_id: &StringArray = column(batch, "order_id")?;
    let order_date: &StringArray = column(batch, "order_date")?;
    let total_amount: &Float64Array = column(batch, "total_amount")?;
    let customer_id: &StringArray = column(batch, "customer_id")?;
    let customer_name: &StringArray = column(batch, "customer_name")?;
    let email: &StringArray = column(batch, "email")?;
    let address: &StringArray = column(batch, "address")?;
    let product_id: &StringArray = column(batch, "product_id")?;
    let product_name: &StringArray = column(batch, "product_name")?;
    let category: &StringArray = column(batch, "category")?;
    let price: &Float64Array = column(batch, "price")?;
    let quantity: &Int64Array = column(batch, "quantity")?;

    let rows = (0..batch.num_rows())
        .map(|i| FlatRow {
            order_id: order_id.value(i).to_string(),
            order_date: order_date.value(i).to_string(),
            total_amount: total_amount.value(i),
            customer_id: customer_id.value(i).to_string(),
            customer_name: customer_name.value(i).to_string(),
            email: email.value(i).to_string(),
            address: address.value(i).to_string(),
            product_id: product_id.value(i).to_string(),
            product_name: product_name.value(i).to_string(),
            category: category.value(i).to_string(),
            price: price.value(i),
            quantity: quantity.value(i),
        })
        .collect();

    Ok(rows)
}

/// Look up a non-null column by name and downcast it
fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let array = batch.column_by_name(name).ok_or_else(|| Error::Output {
        message: format!("Missing column '{name}'"),
    })?;

    if array.null_count() > 0 {
        return Err(Error::Output {
            message: format!("Column '{name}' contains nulls"),
        });
    }

    array.as_any().downcast_ref::<T>().ok_or_else(|| Error::Output {
        message: format!(
            "Column '{name}' has unexpected type {}",
            array.data_type()
        ),
    })
}
