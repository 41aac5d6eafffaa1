//! The Order Repository.
//!
//! Orders are never physically deleted; they move one way from PENDING to a
//! terminal state. Both terminal transitions go through a conditional
//! compare-and-swap on `status == PENDING`, so a race between a manual
//! cancel and an automatic fill resolves to exactly one terminal state,
//! never both.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use poolmint_types::{Order, OrderId, OrderStatus, PoolmintError, PriceType, Result, UserId};
use rust_decimal::Decimal;

fn poisoned<T>(_: PoisonError<T>) -> PoolmintError {
    PoolmintError::Persistence {
        reason: "order store lock poisoned".into(),
    }
}

/// Cloneable handle to the persisted order set.
#[derive(Clone)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Persist a new order.
    ///
    /// # Errors
    /// Returns `DuplicateOrder` if an order with this id already exists.
    pub fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        if orders.contains_key(&order.id) {
            return Err(PoolmintError::DuplicateOrder(order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    /// Look up one order.
    pub fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(orders.get(&id).cloned())
    }

    /// All pending LIMIT orders system-wide, oldest `created_at` first.
    /// Ties break on the time-ordered order id.
    pub fn pending_limit_orders(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().map_err(poisoned)?;
        let mut pending: Vec<Order> = orders
            .values()
            .filter(|o| o.status == OrderStatus::Pending && o.price_type == PriceType::Limit)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(pending)
    }

    /// All orders belonging to one user, newest first. Auto-canceled LIMIT
    /// orders stay visible here with their terminal status.
    pub fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().map_err(poisoned)?;
        let mut owned: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == user)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    /// Compare-and-swap PENDING → FILLED, recording the issued quantity and
    /// `executed_at`.
    ///
    /// # Errors
    /// - `OrderNotFound` if no such order exists
    /// - `OrderAlreadySettled` if the order is already terminal (the swap
    ///   lost the race)
    pub fn fill(&self, id: OrderId, token_amount: Decimal) -> Result<Order> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let order = orders.get_mut(&id).ok_or(PoolmintError::OrderNotFound(id))?;
        if order.status != OrderStatus::Pending {
            return Err(PoolmintError::OrderAlreadySettled(id));
        }
        order.status = OrderStatus::Filled;
        order.token_amount = Some(token_amount);
        order.executed_at = Some(Utc::now());
        Ok(order.clone())
    }

    /// Compare-and-swap PENDING → CANCELED, recording `canceled_at`.
    ///
    /// # Errors
    /// - `OrderNotFound` if no such order exists
    /// - `OrderNotCancellable` if the order is already terminal
    pub fn cancel(&self, id: OrderId) -> Result<Order> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let order = orders.get_mut(&id).ok_or(PoolmintError::OrderNotFound(id))?;
        if order.status != OrderStatus::Pending {
            return Err(PoolmintError::OrderNotCancellable);
        }
        order.status = OrderStatus::Canceled;
        order.canceled_at = Some(Utc::now());
        Ok(order.clone())
    }

    /// Number of orders stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.orders.read().map_err(poisoned)?.len())
    }

    /// Whether the store holds no orders.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.orders.read().map_err(poisoned)?.is_empty())
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use poolmint_types::OrderSide;

    use super::*;

    #[test]
    fn insert_and_lookup() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Buy, Decimal::new(100, 0), Decimal::new(35, 4));
        let id = order.id;
        store.insert(order).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().id, id);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Buy, Decimal::new(100, 0), Decimal::new(35, 4));
        store.insert(order.clone()).unwrap();
        let err = store.insert(order).unwrap_err();
        assert!(matches!(err, PoolmintError::DuplicateOrder(_)));
    }

    #[test]
    fn pending_scan_is_oldest_first() {
        let store = OrderStore::new();
        let first = Order::dummy_limit(OrderSide::Buy, Decimal::new(1, 0), Decimal::new(35, 4));
        let second = Order::dummy_limit(OrderSide::Sell, Decimal::new(2, 0), Decimal::new(35, 4));
        let third = Order::dummy_limit(OrderSide::Buy, Decimal::new(3, 0), Decimal::new(35, 4));
        let ids = [first.id, second.id, third.id];
        // Insert out of creation order; the scan must still sort by age.
        store.insert(third.clone()).unwrap();
        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();

        let scanned: Vec<OrderId> = store
            .pending_limit_orders()
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(scanned, ids);
    }

    #[test]
    fn market_orders_excluded_from_pending_scan() {
        let store = OrderStore::new();
        store
            .insert(Order::dummy_market(OrderSide::Buy, Decimal::new(50, 0)))
            .unwrap();
        store
            .insert(Order::dummy_limit(OrderSide::Buy, Decimal::new(50, 0), Decimal::new(35, 4)))
            .unwrap();
        assert_eq!(store.pending_limit_orders().unwrap().len(), 1);
    }

    #[test]
    fn fill_records_quantity_and_timestamp() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Buy, Decimal::new(50, 0), Decimal::new(35, 4));
        let id = order.id;
        store.insert(order).unwrap();

        let filled = store.fill(id, Decimal::new(142857143, 4)).unwrap();
        assert_eq!(filled.status, OrderStatus::Filled);
        assert_eq!(filled.token_amount, Some(Decimal::new(142857143, 4)));
        assert!(filled.executed_at.is_some());
    }

    #[test]
    fn cancel_then_fill_loses_the_race() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Buy, Decimal::new(50, 0), Decimal::new(35, 4));
        let id = order.id;
        store.insert(order).unwrap();

        store.cancel(id).unwrap();
        let err = store.fill(id, Decimal::ONE).unwrap_err();
        assert!(matches!(err, PoolmintError::OrderAlreadySettled(_)));

        // Exactly one terminal state.
        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Canceled);
        assert!(stored.canceled_at.is_some());
        assert!(stored.executed_at.is_none());
    }

    #[test]
    fn fill_then_cancel_loses_the_race() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Sell, Decimal::new(50, 0), Decimal::new(35, 4));
        let id = order.id;
        store.insert(order).unwrap();

        store.fill(id, Decimal::new(50, 0)).unwrap();
        let err = store.cancel(id).unwrap_err();
        assert!(matches!(err, PoolmintError::OrderNotCancellable));
        assert_eq!(store.get(id).unwrap().unwrap().status, OrderStatus::Filled);
    }

    #[test]
    fn terminal_orders_stay_visible_to_owner() {
        let store = OrderStore::new();
        let order = Order::dummy_limit(OrderSide::Buy, Decimal::new(50, 0), Decimal::new(35, 4));
        let user = order.user_id;
        let id = order.id;
        store.insert(order).unwrap();
        store.cancel(id).unwrap();

        let owned = store.orders_for_user(user).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].status, OrderStatus::Canceled);
    }

    #[test]
    fn nonexistent_order_errors() {
        let store = OrderStore::new();
        let err = store.fill(OrderId::new(), Decimal::ONE).unwrap_err();
        assert!(matches!(err, PoolmintError::OrderNotFound(_)));
        let err = store.cancel(OrderId::new()).unwrap_err();
        assert!(matches!(err, PoolmintError::OrderNotFound(_)));
    }
}
