use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::actor_framework::{Query, ResourceClient};
use crate::auth::Principal;
use crate::clients::{ProductClient, RevenueClient, UserClient};
use crate::domain::{
    LineItem, Order, OrderCreate, OrderDetails, OrderStatus, Page, PageLimits, PageRequest, PlaceOrder, ReservedStock,
};
use crate::order_actor::{OrderAction, OrderError, StatusChange};
use crate::revenue_actor::RevenueEvent;

/// Client for interacting with the Order actor.
///
/// Besides plain reads, this client runs the order workflow: it reserves stock
/// through the product actor before persisting an order, and feeds status
/// changes into the revenue ledger.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    revenue_client: RevenueClient,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

fn parse_status(status: &str) -> Result<OrderStatus, OrderError> {
    status
        .parse()
        .map_err(|_| OrderError::ValidationError(format!("Invalid status: {}", status)))
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        revenue_client: RevenueClient,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            revenue_client,
        }
    }

    /// Places an order for `user_id`.
    ///
    /// Each line reserves its stock in input order. If any reservation, or
    /// persisting the order, fails, every reservation already taken is released
    /// and nothing is stored.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_order(&self, user_id: String, request: PlaceOrder) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        if request.items.is_empty() {
            return Err(OrderError::ValidationError("No items".to_string()));
        }
        if let Some(item) = request.items.iter().find(|item| item.qty == 0) {
            return Err(OrderError::ValidationError(format!("Invalid quantity for product {}", item.product)));
        }

        let mut reserved: Vec<ReservedStock> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            match self.product_client.reserve_stock(item.product.clone(), item.qty).await {
                Ok(line) => reserved.push(line),
                Err(e) => {
                    warn!(product_id = %item.product, error = %e, "Stock reservation failed");
                    self.release_all(&reserved).await;
                    return Err(e.into());
                }
            }
        }
        info!(lines = reserved.len(), "Stock reserved successfully");

        let params = OrderCreate {
            user: user_id,
            items: reserved.iter().cloned().map(LineItem::from).collect(),
            shipping_address: request.shipping_address,
        };
        match self.inner.create(params).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total_price, "Order created");
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Persisting order failed");
                self.release_all(&reserved).await;
                Err(e.into())
            }
        }
    }

    async fn release_all(&self, reserved: &[ReservedStock]) {
        for line in reserved {
            if let Err(e) = self.product_client.release_stock(line.product_id.clone(), line.qty).await {
                error!(product_id = %line.product_id, qty = line.qty, error = %e, "Releasing reservation failed");
            }
        }
    }

    /// Owner self-service cancellation. Stock is not restored.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: String, user_id: String) -> Result<Order, OrderError> {
        let change = self
            .inner
            .perform_action(order_id, OrderAction::Cancel { requested_by: user_id })
            .await?;
        Ok(change.order)
    }

    /// Administrative status change. Entering `Delivered` accrues the order's
    /// total into revenue, leaving it reverses the accrual.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: String,
        status: &str,
        admin_notes: Option<String>,
    ) -> Result<Order, OrderError> {
        let status = parse_status(status)?;
        let change = self
            .inner
            .perform_action(order_id, OrderAction::SetStatus { status, admin_notes })
            .await?;
        self.apply_revenue(&change).await?;
        Ok(change.order)
    }

    async fn apply_revenue(&self, change: &StatusChange) -> Result<(), OrderError> {
        let order = &change.order;
        if change.entered_delivered() {
            let applied = self
                .revenue_client
                .accrue(order.id.clone(), order.total_price, order.revision)
                .await?;
            info!(order_id = %order.id, ?applied, "Delivered order accrued");
        } else if change.left_delivered() {
            let applied = self.revenue_client.reverse(order.id.clone(), order.revision).await?;
            info!(order_id = %order.id, ?applied, "Accrual reversed");
        }
        Ok(())
    }

    /// The order with its customer summary, visible to the owner and to admins.
    #[instrument(skip(self))]
    pub async fn order_details(&self, order_id: String, principal: &Principal) -> Result<OrderDetails, OrderError> {
        let order = self
            .get_order(order_id.clone())
            .await?
            .ok_or(OrderError::NotFound(order_id))?;
        if !principal.is_admin() && !order.is_owned_by(&principal.id) {
            return Err(OrderError::Forbidden);
        }
        let customer = self
            .user_client
            .get_user(order.user.clone())
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
            .map(|user| user.summary());
        Ok(OrderDetails { order, customer })
    }

    #[instrument(skip(self))]
    pub async fn my_orders(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .list_orders(Query::new(move |order: &Order| order.is_owned_by(&user_id)))
            .await?;
        newest_first(&mut orders);
        Ok(orders)
    }

    /// Admin listing: optional address search and status filter, newest first.
    #[instrument(skip(self))]
    pub async fn list_page(
        &self,
        request: &PageRequest,
        status: Option<&str>,
        limits: PageLimits,
    ) -> Result<Page<Order>, OrderError> {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_status)
            .transpose()?;
        let needle = request.search().to_string();
        let query = Query::new(move |order: &Order| {
            status.map_or(true, |s| order.status == s)
                && (needle.is_empty() || order.shipping_address.matches(&needle))
        });
        let mut orders = self.list_orders(query).await?;
        newest_first(&mut orders);
        Ok(Page::paginate(orders, request, limits))
    }

    /// Orders with their customers for export, oldest first. An empty
    /// selection means every order.
    #[instrument(skip(self, selected), fields(selected = selected.len()))]
    pub async fn export(&self, selected: Vec<String>) -> Result<Vec<OrderDetails>, OrderError> {
        let mut orders = self
            .list_orders(Query::new(move |order: &Order| selected.is_empty() || selected.contains(&order.id)))
            .await?;
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut rows = Vec::with_capacity(orders.len());
        for order in orders {
            let customer = self
                .user_client
                .get_user(order.user.clone())
                .await
                .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
                .map(|user| user.summary());
            rows.push(OrderDetails { order, customer });
        }
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn revenue_total(&self) -> Result<Decimal, OrderError> {
        Ok(self.revenue_client.total().await?)
    }

    /// The raw accrual ledger, oldest first.
    #[instrument(skip(self))]
    pub async fn revenue_events(&self) -> Result<Vec<RevenueEvent>, OrderError> {
        Ok(self.revenue_client.events().await?)
    }
}
