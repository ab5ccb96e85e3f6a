//! Cart controller: one owner for the stored cart, stock and shipping state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{HttpStorefrontApi, ShippingApi, StockApi};
use crate::cart::{Cart, CartEvent, CartItem, CartStore, CartTotals, CartView};
use crate::checkout::{PostalCode, ShippingCalculator, ShippingOption, ShippingOutcome, ShippingQuote};
use crate::ids::VariantId;
use crate::stock::reconcile;

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub view: CartView,
    /// Notifications raised by reconciliation.
    pub events: Vec<CartEvent>,
    /// Whether remote stock was applied. `false` for an empty cart or a
    /// failed lookup.
    pub reconciled: bool,
    /// Replayed quote for the remembered postal code, set by
    /// [`CartController::open`].
    pub shipping: Option<ShippingOutcome>,
}

/// Drives the cart for a single adapter.
///
/// Mutations go through the [`CartStore`]; [`CartController::refresh`]
/// reconciles once against remote stock and builds the view. The current
/// shipping choice lives here and is never persisted.
pub struct CartController {
    store: CartStore,
    stock: Arc<dyn StockApi>,
    calculator: ShippingCalculator,
    shipping: ShippingOption,
    last_quote: Option<ShippingQuote>,
}

impl CartController {
    pub fn new(store: CartStore, stock: Arc<dyn StockApi>, shipping: Arc<dyn ShippingApi>) -> Self {
        Self {
            store,
            stock,
            calculator: ShippingCalculator::new(shipping),
            shipping: ShippingOption::Pickup,
            last_quote: None,
        }
    }

    /// Controller backed by the storefront HTTP API for both stock and shipping.
    pub fn with_api(store: CartStore, api: HttpStorefrontApi) -> Self {
        let api = Arc::new(api);
        Self::new(store, api.clone(), api)
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    pub fn shipping(&self) -> &ShippingOption {
        &self.shipping
    }

    /// First render of a session: reconcile, then replay the quote for the
    /// remembered postal code so delivery is preselected.
    pub async fn open(&mut self) -> RenderPass {
        let mut pass = self.refresh().await;
        if let Some(outcome) = self.replay_shipping().await {
            pass.view = self.view();
            pass.shipping = Some(outcome);
        }
        pass
    }

    /// Reconcile the stored cart with remote stock and build the view.
    ///
    /// Issues at most one stock request and none for an empty cart. If the
    /// lookup fails the cart is rendered as stored.
    pub async fn refresh(&mut self) -> RenderPass {
        let cart = self.store.load();
        if cart.is_empty() {
            return self.pass(&cart, Vec::new(), false);
        }

        let levels = match self.stock.check_stock(&cart.variant_ids()).await {
            Ok(levels) => levels,
            Err(e) => {
                warn!(error = %e, "stock check failed, showing cart as stored");
                return self.pass(&cart, Vec::new(), false);
            }
        };

        let result = reconcile(&cart, &levels);
        if result.needs_persist() {
            info!(
                removed = result.removed.len(),
                clamped = result.clamped.len(),
                "cart adjusted to remote stock"
            );
            self.store.save(&result.cart);
        }

        let events = result
            .removed
            .iter()
            .map(|item| CartEvent::OutOfStock {
                label: item.label(),
            })
            .chain(result.clamped.iter().map(|adj| CartEvent::StockAdjusted {
                label: adj.item.label(),
                qty: adj.item.qty,
            }))
            .collect();

        self.pass(&result.cart, events, true)
    }

    fn pass(&self, cart: &Cart, events: Vec<CartEvent>, reconciled: bool) -> RenderPass {
        RenderPass {
            view: CartView::build(cart, &self.shipping),
            events,
            reconciled,
            shipping: None,
        }
    }

    /// View of the stored cart without contacting the backend.
    pub fn view(&self) -> CartView {
        CartView::build(&self.store.load(), &self.shipping)
    }

    /// Totals of the stored cart for the current shipping choice.
    pub fn totals(&self) -> CartTotals {
        CartTotals::calculate(&self.store.load(), &self.shipping)
    }

    pub fn set_quantity(&self, key: VariantId, qty: i64) -> Option<CartEvent> {
        self.store.set_quantity(key, qty)
    }

    pub fn change_quantity(&self, key: VariantId, delta: i64) -> Option<CartEvent> {
        self.store.change_quantity(key, delta)
    }

    pub fn remove_item(&self, key: VariantId) -> Option<CartEvent> {
        self.store.remove_item(key)
    }

    pub fn add_item(&self, item: CartItem) -> CartEvent {
        self.store.add_item(item)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Quote shipping for raw postal code input.
    ///
    /// Invalid input is rejected without a request and leaves the current
    /// choice alone. A valid code is remembered before the request is sent.
    /// Success selects delivery; any failure falls back to pickup.
    pub async fn calculate_shipping(&mut self, input: &str) -> ShippingOutcome {
        let postal_code = match PostalCode::parse(input) {
            Ok(code) => code,
            Err(_) => {
                debug!(input = %input, "invalid postal code");
                return ShippingOutcome::Invalid {
                    input: input.to_string(),
                };
            }
        };

        self.store.remember_postal_code(&postal_code);
        let subtotal = self.store.load().subtotal();
        let outcome = self.calculator.quote(&postal_code, subtotal).await;

        self.last_quote = match &outcome {
            ShippingOutcome::Quoted { quote, .. } => Some(quote.clone()),
            _ => None,
        };
        if let Some(selection) = outcome.selection() {
            self.shipping = selection;
        }
        outcome
    }

    /// Re-run the quote for the remembered postal code, if there is one.
    pub async fn replay_shipping(&mut self) -> Option<ShippingOutcome> {
        let postal_code = self.store.last_postal_code()?;
        Some(self.calculate_shipping(postal_code.as_str()).await)
    }

    /// Switch to store pickup.
    pub fn select_pickup(&mut self) -> CartTotals {
        self.shipping = ShippingOption::Pickup;
        self.totals()
    }

    /// Switch back to delivery at the last quoted cost.
    ///
    /// Returns `None` if no quote is available.
    pub fn select_delivery(&mut self) -> Option<CartTotals> {
        let quote = self.last_quote.clone()?;
        self.shipping = ShippingOption::Delivery(quote);
        Some(self.totals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommerceError;
    use crate::money::{Currency, Money};
    use crate::stock::StockLevels;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        stock: Mutex<Option<StockLevels>>,
        stock_calls: AtomicUsize,
        shipping_calls: AtomicUsize,
    }

    #[async_trait]
    impl StockApi for FakeBackend {
        async fn check_stock(&self, _ids: &[VariantId]) -> Result<StockLevels, CommerceError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            self.stock
                .lock()
                .ok()
                .and_then(|s| s.clone())
                .ok_or(CommerceError::StockCheckRejected)
        }
    }

    #[async_trait]
    impl ShippingApi for FakeBackend {
        async fn calculate_shipping(
            &self,
            postal_code: &PostalCode,
        ) -> Result<ShippingQuote, CommerceError> {
            self.shipping_calls.fetch_add(1, Ordering::SeqCst);
            if postal_code.as_str().starts_with('9') {
                return Err(CommerceError::ShippingRejected(Some("Out of area".into())));
            }
            Ok(ShippingQuote {
                cost: Money::new(1000, Currency::BRL),
                distance_km: 2.0,
                message: None,
            })
        }
    }

    fn controller(backend: &Arc<FakeBackend>) -> CartController {
        CartController::new(CartStore::in_memory(), backend.clone(), backend.clone())
    }

    fn item(id: u64, qty: i64) -> CartItem {
        CartItem::new(
            VariantId::new(id),
            "Short",
            Money::new(3000, Currency::BRL),
            qty,
            "G",
        )
    }

    #[tokio::test]
    async fn test_empty_cart_skips_stock_check() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);

        let pass = controller.refresh().await;
        assert!(pass.view.is_empty);
        assert!(!pass.reconciled);
        assert_eq!(backend.stock_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_stock_check_renders_stored_cart() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);
        controller.add_item(item(1, 2));

        let pass = controller.refresh().await;
        assert!(!pass.reconciled);
        assert_eq!(pass.view.lines.len(), 1);
        assert_eq!(pass.view.lines[0].qty, 2);
        assert_eq!(backend.stock_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_drops_out_of_stock() {
        let backend = Arc::new(FakeBackend::default());
        *backend.stock.lock().unwrap() = Some([(VariantId::new(2), 5)].into_iter().collect());
        let mut controller = controller(&backend);
        controller.add_item(item(1, 1));
        controller.add_item(item(2, 1));

        let pass = controller.refresh().await;
        assert_eq!(pass.events, vec![CartEvent::OutOfStock { label: "Short (G)".into() }]);
        assert_eq!(controller.store().load().variant_ids(), vec![VariantId::new(2)]);
        assert_eq!(pass.view.lines[0].max, 5);
    }

    #[tokio::test]
    async fn test_shipping_selection_updates_totals() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);
        controller.add_item(item(1, 2));

        let outcome = controller.calculate_shipping("12345-678").await;
        assert!(matches!(outcome, ShippingOutcome::Quoted { .. }));
        assert!(controller.shipping().is_delivery());
        assert_eq!(controller.totals().total.amount_cents, 7000);

        assert_eq!(controller.select_pickup().total.amount_cents, 6000);
        assert_eq!(controller.select_delivery().map(|t| t.total.amount_cents), Some(7000));
    }

    #[tokio::test]
    async fn test_rejected_quote_falls_back_to_pickup() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);
        controller.calculate_shipping("12345678").await;

        let outcome = controller.calculate_shipping("98765432").await;
        assert_eq!(outcome.error(), Some("Error: Out of area"));
        assert_eq!(controller.shipping(), &ShippingOption::Pickup);
        assert_eq!(controller.select_delivery(), None);
    }

    #[tokio::test]
    async fn test_invalid_postal_code_is_not_remembered() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);

        controller.calculate_shipping("123").await;
        assert_eq!(controller.store().last_postal_code(), None);
        assert_eq!(controller.replay_shipping().await, None);
        assert_eq!(backend.shipping_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_replays_remembered_code() {
        let backend = Arc::new(FakeBackend::default());
        *backend.stock.lock().unwrap() = Some([(VariantId::new(1), 5)].into_iter().collect());
        let mut controller = controller(&backend);
        controller.add_item(item(1, 2));
        controller
            .store()
            .remember_postal_code(&PostalCode::parse("12345678").unwrap());

        let pass = controller.open().await;
        assert!(matches!(pass.shipping, Some(ShippingOutcome::Quoted { .. })));
        assert!(controller.shipping().is_delivery());
        assert_eq!(pass.view.totals.total.amount_cents, 7000);
        assert_eq!(backend.shipping_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_without_remembered_code_keeps_pickup() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);

        let pass = controller.open().await;
        assert_eq!(pass.shipping, None);
        assert_eq!(controller.shipping(), &ShippingOption::Pickup);
        assert_eq!(backend.shipping_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_replay_uses_remembered_code() {
        let backend = Arc::new(FakeBackend::default());
        let mut controller = controller(&backend);
        controller.calculate_shipping("01310-100").await;

        let replayed = controller.replay_shipping().await;
        assert!(matches!(replayed, Some(ShippingOutcome::Quoted { .. })));
        assert_eq!(backend.shipping_calls.load(Ordering::SeqCst), 2);
    }
}
