//! Order lifecycle manager.
//!
//! Stateless, typed pass-throughs over the protocol client. The platform
//! keeps no order ledger here: persisting the mapping between an internal
//! purchase and the provider's order id at creation time is the external
//! orders subsystem's contract — if it doesn't record `provider_order_id`,
//! that mapping is lost on restart.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::PanelError;
use crate::models::provider::Provider;
use crate::models::remote::RemoteOrder;
use crate::panel::{Mode, PanelClient};

pub struct OrderManager {
    client: PanelClient,
}

impl OrderManager {
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    pub fn for_provider(provider: &Provider, mode_override: Option<Mode>) -> Result<Self, PanelError> {
        Ok(Self::new(PanelClient::for_provider(provider, mode_override)?))
    }

    /// Place an order against a remote service. Returns the provider's order
    /// id; the caller is responsible for persisting it.
    pub async fn create_order(
        &self,
        service_id: &str,
        link: &str,
        quantity: Option<u64>,
        extra: &[(String, String)],
    ) -> Result<String, PanelError> {
        let order_id = self.client.add_order(service_id, link, quantity, extra).await?;
        tracing::info!(service = service_id, order = %order_id, "order placed");
        Ok(order_id)
    }

    pub async fn order_status(&self, order_id: &str) -> Result<RemoteOrder, PanelError> {
        self.client.order_status(order_id).await
    }

    /// Batch status lookup. Ids are comma-joined into a single request —
    /// remote-protocol-mandated batching, not client-side parallelism.
    pub async fn multi_order_status(
        &self,
        order_ids: &[String],
    ) -> Result<BTreeMap<String, RemoteOrder>, PanelError> {
        self.client.multi_order_status(order_ids).await
    }

    /// Request a refill. The ack shape is provider-defined and relayed raw.
    pub async fn refill_order(&self, order_id: &str) -> Result<Value, PanelError> {
        self.client.refill_order(order_id).await
    }
}

// ── Tests ─────────────────────────────────────────────────────
