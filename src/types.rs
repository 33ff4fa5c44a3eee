//! Order document model and the flat row produced from it
//!
//! The input document is a JSON array of [`Order`] objects, each embedding a
//! [`Customer`] and an ordered list of [`Product`] lines. [`FlatRow`] is the
//! denormalized output record, one per (order, product) pair.

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Model
// ============================================================================

/// Top-level transactional record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub order_id: String,

    /// Order date, copied verbatim (no date parsing)
    pub order_date: String,

    /// Total order amount
    pub total_amount: f64,

    /// Embedded customer
    pub customer: Customer,

    /// Product lines in document order
    pub products: Vec<Product>,
}

/// Customer embedded in an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Product line embedded in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,

    /// Unit price
    pub price: f64,

    pub quantity: i64,
}

// ============================================================================
// Output Model
// ============================================================================

/// Column names of a [`FlatRow`], in output order
pub const FLAT_ROW_COLUMNS: [&str; 12] = [
    "order_id",
    "order_date",
    "total_amount",
    "customer_id",
    "customer_name",
    "email",
    "address",
    "product_id",
    "product_name",
    "category",
    "price",
    "quantity",
];

/// One denormalized (order, product) record
///
/// Field order matches [`FLAT_ROW_COLUMNS`] and therefore the Parquet
/// column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub order_id: String,
    pub order_date: String,
    pub total_amount: f64,
    pub customer_id: String,
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl FlatRow {
    /// Build a row by copying order, customer and product fields
    pub fn new(order: &Order, product: &Product) -> Self {
        let customer = &order.customer;
        Self {
            order_id: order.order_id.clone(),
            order_date: order.order_date.clone(),
            total_amount: order.total_amount,
            customer_id: customer.customer_id.clone(),
            customer_name: customer.name.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
            product_id: product.product_id.clone(),
            product_name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_deserialize() {
        let order: Order = serde_json::from_value(json!({
            "order_id": "ORD1",
            "order_date": "2024-01-15",
            "total_amount": 10.5,
            "customer": {
                "customer_id": "C1",
                "name": "Ann",
                "email": "ann@example.com",
                "address": "1 Main St"
            },
            "products": [
                {"product_id": "P1", "name": "Pen", "category": "Office", "price": 10.5, "quantity": 1}
            ]
        }))
        .unwrap();

        assert_eq!(order.order_id, "ORD1");
        assert_eq!(order.customer.name, "Ann");
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].quantity, 1);
    }

    #[test]
    fn test_integer_amount_accepted_as_float() {
        let product: Product = serde_json::from_value(json!({
            "product_id": "P1", "name": "Pen", "category": "Office", "price": 150, "quantity": 1
        }))
        .unwrap();
        assert!((product.price - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_row_serializes_all_columns() {
        let row = FlatRow {
            order_id: "O".into(),
            order_date: "D".into(),
            total_amount: 1.0,
            customer_id: "C".into(),
            customer_name: "N".into(),
            email: "E".into(),
            address: "A".into(),
            product_id: "P".into(),
            product_name: "PN".into(),
            category: "CAT".into(),
            price: 2.0,
            quantity: 3,
        };

        let value = serde_json::to_value(&row).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = FLAT_ROW_COLUMNS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
