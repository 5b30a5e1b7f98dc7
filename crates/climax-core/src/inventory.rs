//! # Inventory Helpers
//!
//! Stock arithmetic for the collaborators that own product stock: low stock
//! alerts, loans and receipts, and the per-sale stock check.
//!
//! Only stock-tracked products (`quantity` set) are affected. Drinks made to
//! order pass through untouched.

use crate::error::CoreResult;
use crate::types::{InventoryMovement, MovementStatus, MovementType, Product, Sale};

/// Stock-tracked products at or below their minimum, in catalog order.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

impl MovementType {
    /// Signed stock change for `quantity` units.
    pub fn stock_delta(&self, quantity: u32) -> i64 {
        match self {
            MovementType::Receipt => i64::from(quantity),
            MovementType::Loan => -i64::from(quantity),
        }
    }
}

/// Stock after applying `movement` to `product`.
///
/// Returns `None` for untracked products. Loans may take stock negative; the
/// register allows lending what the books do not show yet.
pub fn apply_movement(product: &Product, movement: &InventoryMovement) -> Option<i64> {
    product
        .quantity
        .map(|stock| stock + movement.kind.stock_delta(movement.quantity))
}

/// Stock after selling `sale.quantity` units, refusing to go below zero.
///
/// Returns `Ok(None)` for untracked products.
pub fn apply_sale(product: &Product, sale: &Sale) -> CoreResult<Option<i64>> {
    product.ensure_stock(sale.quantity)?;
    Ok(product.quantity.map(|stock| stock - i64::from(sale.quantity)))
}

/// Units of `product_id` lent out and not yet returned.
pub fn outstanding_loans(movements: &[InventoryMovement], product_id: &str) -> u64 {
    movements
        .iter()
        .filter(|m| {
            m.product_id == product_id
                && m.kind == MovementType::Loan
                && m.status == MovementStatus::Pending
        })
        .map(|m| u64::from(m.quantity))
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::{Category, PaymentMethod, SaleStatus};
    use chrono::{TimeZone, Utc};

    fn product(id: &str, quantity: Option<i64>, min_stock: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Liquor,
            quantity,
            price: Money::from_units(90_000),
            min_stock,
            supplier: None,
            lead_time: Some(3),
            image_url: None,
            description: None,
        }
    }

    fn movement(kind: MovementType, quantity: u32, status: MovementStatus) -> InventoryMovement {
        InventoryMovement {
            id: format!("{:?}-{}", kind, quantity),
            product_id: "aguardiente".to_string(),
            quantity,
            kind,
            date: Utc.with_ymd_and_hms(2024, 5, 10, 20, 0, 0).unwrap(),
            notes: None,
            return_date: None,
            status,
            received_from: None,
        }
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let products = vec![
            product("at-min", Some(5), Some(5)),
            product("below", Some(2), Some(5)),
            product("above", Some(6), Some(5)),
            product("no-min", Some(0), None),
            product("untracked", None, Some(5)),
        ];

        let ids: Vec<&str> = low_stock(&products).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["at-min", "below"]);
    }

    #[test]
    fn test_movements_change_stock() {
        let tracked = product("aguardiente", Some(10), None);

        let loan = movement(MovementType::Loan, 4, MovementStatus::Pending);
        let receipt = movement(MovementType::Receipt, 12, MovementStatus::Pending);

        assert_eq!(apply_movement(&tracked, &loan), Some(6));
        assert_eq!(apply_movement(&tracked, &receipt), Some(22));

        let untracked = product("aguardiente", None, None);
        assert_eq!(apply_movement(&untracked, &receipt), None);
    }

    #[test]
    fn test_apply_sale_refuses_overselling() {
        let tracked = product("aguardiente", Some(3), None);
        let mut sale = Sale {
            id: "s-1".to_string(),
            product_id: "aguardiente".to_string(),
            quantity: 2,
            total_price: Money::from_units(180_000),
            payment_method: PaymentMethod::Card,
            date: Utc.with_ymd_and_hms(2024, 5, 10, 23, 0, 0).unwrap(),
            status: SaleStatus::Pending,
            table_number: None,
        };

        assert_eq!(apply_sale(&tracked, &sale).unwrap(), Some(1));

        sale.quantity = 4;
        assert!(matches!(
            apply_sale(&tracked, &sale),
            Err(CoreError::InsufficientStock { available: 3, requested: 4, .. })
        ));

        let untracked = product("aguardiente", None, None);
        assert_eq!(apply_sale(&untracked, &sale).unwrap(), None);
    }

    #[test]
    fn test_outstanding_loans() {
        let mut other = movement(MovementType::Loan, 50, MovementStatus::Pending);
        other.product_id = "ron".to_string();

        let movements = vec![
            movement(MovementType::Loan, 4, MovementStatus::Pending),
            movement(MovementType::Loan, 2, MovementStatus::Returned),
            movement(MovementType::Receipt, 12, MovementStatus::Pending),
            movement(MovementType::Loan, 1, MovementStatus::Pending),
            other,
        ];

        assert_eq!(outstanding_loans(&movements, "aguardiente"), 5);
        assert_eq!(outstanding_loans(&movements, "cerveza"), 0);
    }
}
