//! Order flattening
//!
//! Denormalizes nested orders into one [`FlatRow`] per (order, product)
//! pair. Rows come out in traversal order: orders as given, and within each
//! order its products as given. Nothing is sorted, filtered or aggregated,
//! and an order without products contributes no rows.

use crate::types::{FlatRow, Order};

/// Flatten orders into rows, one per product line
pub fn flatten(orders: &[Order]) -> Vec<FlatRow> {
    let mut rows = Vec::with_capacity(row_count(orders));

    for order in orders {
        for product in &order.products {
            rows.push(FlatRow::new(order, product));
        }
    }

    rows
}

/// Number of rows [`flatten`] produces for `orders`
pub fn row_count(orders: &[Order]) -> usize {
    orders.iter().map(|order| order.products.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse_orders;
    use crate::types::{Customer, Product};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            customer_id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            address: "123 Main St, Springfield".to_string(),
        }
    }

    fn product(id: &str, name: &str, category: &str, price: f64, quantity: i64) -> Product {
        Product {
            product_id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    fn order(id: &str, products: Vec<Product>) -> Order {
        Order {
            order_id: id.to_string(),
            order_date: "2024-01-15".to_string(),
            total_amount: 100.0,
            customer: customer("CUST001", "John Doe"),
            products,
        }
    }

    fn assert_copied(row: &FlatRow, order: &Order, product: &Product) {
        assert_eq!(row.order_id, order.order_id);
        assert_eq!(row.order_date, order.order_date);
        assert_eq!(row.total_amount, order.total_amount);
        assert_eq!(row.customer_id, order.customer.customer_id);
        assert_eq!(row.customer_name, order.customer.name);
        assert_eq!(row.email, order.customer.email);
        assert_eq!(row.address, order.customer.address);
        assert_eq!(row.product_id, product.product_id);
        assert_eq!(row.product_name, product.name);
        assert_eq!(row.category, product.category);
        assert_eq!(row.price, product.price);
        assert_eq!(row.quantity, product.quantity);
    }

    #[test]
    fn test_single_order_two_products() {
        let doc = json!([{
            "order_id": "ORD123",
            "order_date": "2024-01-15",
            "total_amount": 249.99,
            "customer": {
                "customer_id": "CUST001",
                "name": "John Doe",
                "email": "john.doe@example.com",
                "address": "123 Main St, Springfield"
            },
            "products": [
                {"product_id": "PROD100", "name": "Wireless Mouse", "category": "Electronics", "price": 49.99, "quantity": 2},
                {"product_id": "PROD101", "name": "Mechanical Keyboard", "category": "Electronics", "price": 150.00, "quantity": 1}
            ]
        }]);
        let orders = parse_orders(doc.to_string().as_bytes()).unwrap();

        let rows = flatten(&orders);

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.order_id, "ORD123");
            assert_eq!(row.customer_id, "CUST001");
            assert_eq!(row.customer_name, "John Doe");
            assert_eq!(row.total_amount, 249.99);
        }
        assert_eq!(rows[0].product_id, "PROD100");
        assert_eq!(rows[0].product_name, "Wireless Mouse");
        assert_eq!(rows[0].price, 49.99);
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[1].product_id, "PROD101");
        assert_eq!(rows[1].product_name, "Mechanical Keyboard");
        assert_eq!(rows[1].price, 150.00);
        assert_eq!(rows[1].quantity, 1);
    }

    #[test]
    fn test_empty_order_list() {
        let rows = flatten(&[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_order_without_products_contributes_nothing() {
        let orders = vec![
            order("ORD1", vec![]),
            order("ORD2", vec![product("P1", "Pen", "Office", 1.5, 3)]),
            order("ORD3", vec![]),
        ];

        let rows = flatten(&orders);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, "ORD2");
    }

    #[test]
    fn test_two_orders_one_and_three_products() {
        let orders = vec![
            order("ORD1", vec![product("P1", "Pen", "Office", 1.5, 3)]),
            order(
                "ORD2",
                vec![
                    product("P2", "Desk", "Furniture", 199.0, 1),
                    product("P3", "Lamp", "Furniture", 35.25, 2),
                    product("P4", "Chair", "Furniture", 89.0, 4),
                ],
            ),
        ];

        let rows = flatten(&orders);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].order_id, "ORD1");
        assert_eq!(rows[0].product_id, "P1");
        let rest: Vec<(&str, &str)> = rows[1..]
            .iter()
            .map(|r| (r.order_id.as_str(), r.product_id.as_str()))
            .collect();
        assert_eq!(rest, vec![("ORD2", "P2"), ("ORD2", "P3"), ("ORD2", "P4")]);
    }

    #[test]
    fn test_row_count_matches_product_total() {
        let orders: Vec<Order> = (0..6)
            .map(|i| {
                let products = (0..i)
                    .map(|j| product(&format!("P{i}-{j}"), "Item", "Misc", 1.0, j))
                    .collect();
                order(&format!("ORD{i}"), products)
            })
            .collect();

        let rows = flatten(&orders);
        assert_eq!(rows.len(), 15);
        assert_eq!(rows.len(), row_count(&orders));
    }

    #[test]
    fn test_every_field_is_copied() {
        let orders = vec![
            Order {
                order_id: "ORD9".to_string(),
                order_date: "2023-12-31T23:59:59Z".to_string(),
                total_amount: 0.1,
                customer: Customer {
                    customer_id: "C9".to_string(),
                    name: "Zoë Ångström".to_string(),
                    email: "zoe@example.org".to_string(),
                    address: "Storgatan 1, Umeå".to_string(),
                },
                products: vec![
                    product("P9", "Widget", "Gadgets", 0.1, -1),
                    product("P10", "", "", 0.0, 0),
                ],
            },
            order("ORD10", vec![product("P11", "Nut", "Hardware", 1e-9, i64::MAX)]),
        ];

        let rows = flatten(&orders);

        let pairs: Vec<(&Order, &Product)> = orders
            .iter()
            .flat_map(|o| o.products.iter().map(move |p| (o, p)))
            .collect();
        assert_eq!(rows.len(), pairs.len());
        for (row, (order, product)) in rows.iter().zip(pairs) {
            assert_copied(row, order, product);
        }
    }

    #[test]
    fn test_reordering_products_only_reorders_rows() {
        let products = vec![
            product("P1", "A", "X", 1.0, 1),
            product("P2", "B", "Y", 2.0, 2),
            product("P3", "C", "Z", 3.0, 3),
        ];
        let mut reversed = products.clone();
        reversed.reverse();

        let forward = flatten(&[order("ORD1", products)]);
        let backward = flatten(&[order("ORD1", reversed)]);

        let mut backward_restored = backward.clone();
        backward_restored.reverse();
        assert_eq!(forward, backward_restored);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let orders = vec![
            order("ORD1", vec![product("P1", "Pen", "Office", 1.5, 3)]),
            order("ORD2", vec![product("P2", "Ink", "Office", 4.0, 1)]),
        ];
        assert_eq!(flatten(&orders), flatten(&orders));
    }

    #[test]
    fn test_missing_customer_fails_instead_of_partial_rows() {
        let doc = json!([{
            "order_id": "ORD1",
            "order_date": "2024-01-15",
            "total_amount": 10.0,
            "products": [
                {"product_id": "P1", "name": "Pen", "category": "Office", "price": 10.0, "quantity": 1}
            ]
        }]);

        let err = parse_orders(doc.to_string().as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::MissingField { ref field, .. } if field == "customer"
        ));
    }
}
