//! Order document parser

use crate::error::{Error, Result};
use crate::types::{Customer, Order, Product};
use serde::Deserialize;
use serde_json::Value;

/// Parse an order-list document
///
/// The document must be a UTF-8 JSON array of orders. The first invalid
/// order aborts the whole document.
pub fn parse_orders(bytes: &[u8]) -> Result<Vec<Order>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::type_mismatch(
                "$",
                format!("expected an array of orders, found {}", value_kind(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Order::deserialize(&item).map_err(|e| locate(&format!("$[{index}]"), &item, &e))
        })
        .collect()
}

/// Find the innermost customer or product that fails to deserialize
///
/// Falls back to the order itself when both nested values are fine.
fn locate(path: &str, order: &Value, err: &serde_json::Error) -> Error {
    if let Some(customer) = order.get("customer") {
        if let Err(e) = Customer::deserialize(customer) {
            return classify(format!("{path}.customer"), &e);
        }
    }

    if let Some(Value::Array(products)) = order.get("products") {
        for (index, product) in products.iter().enumerate() {
            if let Err(e) = Product::deserialize(product) {
                return classify(format!("{path}.products[{index}]"), &e);
            }
        }
    }

    classify(path.to_string(), err)
}

/// Map a serde error at `path` onto a typed document error
fn classify(path: String, err: &serde_json::Error) -> Error {
    let message = err.to_string();

    match missing_field_name(&message) {
        Some(field) => Error::missing_field(path, field),
        None => Error::type_mismatch(path, message),
    }
}

/// Extract the field name from serde's "missing field `name`" message
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
