//! Broker client operations.
//!
//! Every operation issues exactly one transport call, except
//! [`BrokerClient::list_all`], which walks pages until the broker returns an
//! empty one. The client holds only its base URL and transport, so `&self`
//! operations may run concurrently whenever the transport allows it.
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`create`](BrokerClient::create) | POST | `/v1/contextEntities/type/{type}/id/{id}` |
//! | [`read`](BrokerClient::read) | GET | same |
//! | [`update`](BrokerClient::update) | PUT | same |
//! | [`delete`](BrokerClient::delete) | DELETE | same |
//! | [`exists`](BrokerClient::exists) | GET | same |
//! | [`list_page`](BrokerClient::list_page) | GET | `/v1/contextEntityTypes/{type}?limit=100&offset={n}` |

use model::{Entity, Page, PAGE_SIZE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::BrokerConfig;
use crate::errors::{BrokerResult, PartialListing};
use crate::transport::{HttpTransport, Method, Transport, TransportRequest};
use crate::wire::{
    decode, AlteredContextResponse, QueryContextElement, QueryContextResponse, WireAttributes,
    WireStatus,
};

/// Client for one context broker.
#[derive(Debug, Clone)]
pub struct BrokerClient<T = HttpTransport> {
    base_url: String,
    transport: T,
}

impl BrokerClient<HttpTransport> {
    /// Builds a client over an [`HttpTransport`] configured from `config`.
    pub fn from_config(config: &BrokerConfig) -> BrokerResult<Self> {
        let transport = HttpTransport::new(Some(config.request_timeout()))?;
        Ok(Self::new(&config.base_url, transport))
    }
}

impl<T: Transport> BrokerClient<T> {
    /// Creates a client for the broker at `base_url`. One trailing `/` is dropped.
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn entity_url(&self, entity_type: &str, id: &str) -> String {
        format!(
            "{}/v1/contextEntities/type/{}/id/{}",
            self.base_url, entity_type, id
        )
    }

    fn type_url(&self, entity_type: &str, page: Page) -> String {
        format!(
            "{}/v1/contextEntityTypes/{}?limit={}&offset={}",
            self.base_url,
            entity_type,
            PAGE_SIZE,
            page.offset(PAGE_SIZE)
        )
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<WireAttributes>,
    ) -> BrokerResult<R> {
        let body = body.as_ref().map(serde_json::to_vec).transpose()?;
        debug!(%method, %url, "sending broker request");
        let octets = self
            .transport
            .send(TransportRequest { method, url, body })
            .await?;
        decode(&octets)
    }

    /// Creates `entity` with its current attributes.
    ///
    /// Succeeds when the first response element carries status 200.
    #[instrument(skip_all, fields(entity_type = %entity.entity_type(), id = %entity.id()))]
    pub async fn create<E: Entity + ?Sized>(&self, entity: &E) -> BrokerResult<()> {
        let url = self.entity_url(entity.entity_type(), entity.id());
        let body = WireAttributes::from(entity.attributes());
        let response: AlteredContextResponse = self.call(Method::Post, url, Some(body)).await?;
        acknowledged("entity creation", response)
    }

    /// Replaces `entity`'s attributes with the broker's copy.
    ///
    /// The entity is only modified when the broker reports status 200.
    #[instrument(skip_all, fields(entity_type = %entity.entity_type(), id = %entity.id()))]
    pub async fn read<E: Entity + ?Sized>(&self, entity: &mut E) -> BrokerResult<()> {
        let url = self.entity_url(entity.entity_type(), entity.id());
        let response: QueryContextElement = self.call(Method::Get, url, None).await?;
        checked("entity lookup", response.status)?;
        debug!(
            is_pattern = response.element.id.is_pattern,
            attributes = response.element.attributes.attributes.len(),
            "entity read"
        );
        entity.set_attributes(response.element.attributes.into_attributes());
        Ok(())
    }

    /// Sends `entity`'s current attributes as an update.
    ///
    /// An empty response element list is [`crate::BrokerError::UnexpectedResult`].
    #[instrument(skip_all, fields(entity_type = %entity.entity_type(), id = %entity.id()))]
    pub async fn update<E: Entity + ?Sized>(&self, entity: &E) -> BrokerResult<()> {
        let url = self.entity_url(entity.entity_type(), entity.id());
        let body = WireAttributes::from(entity.attributes());
        let response: AlteredContextResponse = self.call(Method::Put, url, Some(body)).await?;
        acknowledged("entity update", response)
    }

    /// Deletes `entity` from the broker.
    #[instrument(skip_all, fields(entity_type = %entity.entity_type(), id = %entity.id()))]
    pub async fn delete<E: Entity + ?Sized>(&self, entity: &E) -> BrokerResult<()> {
        let url = self.entity_url(entity.entity_type(), entity.id());
        let status: WireStatus = self.call(Method::Delete, url, None).await?;
        checked("entity deletion", status)
    }

    /// Returns `true` if the broker reports the entity with status 200.
    ///
    /// Every failure, including transport and decode errors, reads as `false`.
    #[instrument(skip(self))]
    pub async fn exists(&self, entity_type: &str, id: &str) -> bool {
        let url = self.entity_url(entity_type, id);
        match self.call::<QueryContextElement>(Method::Get, url, None).await {
            Ok(response) => {
                if !response.status.is_ok() {
                    debug!(code = response.status.code, "entity not found");
                }
                response.status.is_ok()
            }
            Err(error) => {
                debug!(%error, "existence check failed, reporting absent");
                false
            }
        }
    }

    /// Fetches one page of entities of `entity_type`.
    ///
    /// Each entity is built by `factory(type, id)` and populated from its
    /// element. An empty result is not an error; it marks the end of the
    /// listing.
    #[instrument(skip(self, factory))]
    pub async fn list_page<E, F>(
        &self,
        entity_type: &str,
        page: Page,
        mut factory: F,
    ) -> BrokerResult<Vec<E>>
    where
        E: Entity,
        F: FnMut(&str, &str) -> E,
    {
        let url = self.type_url(entity_type, page);
        let response: QueryContextResponse = self.call(Method::Get, url, None).await?;
        let entities: Vec<E> = response
            .elements
            .into_iter()
            .map(|element| {
                let context = element.element;
                let mut entity = factory(&context.id.entity_type, &context.id.id);
                entity.set_attributes(context.attributes.into_attributes());
                entity
            })
            .collect();
        debug!(count = entities.len(), "page fetched");
        Ok(entities)
    }

    /// Fetches every entity of `entity_type`, one page at a time.
    ///
    /// Stops at the first empty page. On failure the entities collected so
    /// far are returned inside [`PartialListing`]. There is no page limit:
    /// a broker that never returns an empty page never lets this finish.
    #[instrument(skip(self, factory))]
    pub async fn list_all<E, F>(
        &self,
        entity_type: &str,
        mut factory: F,
    ) -> Result<Vec<E>, PartialListing<E>>
    where
        E: Entity,
        F: FnMut(&str, &str) -> E,
    {
        let mut output = Vec::new();
        let mut page = Page::FIRST;
        loop {
            let chunk = match self.list_page(entity_type, page, &mut factory).await {
                Ok(chunk) => chunk,
                Err(source) => {
                    warn!(%page, collected = output.len(), error = %source, "listing interrupted");
                    return Err(PartialListing {
                        entities: output,
                        page,
                        source,
                    });
                }
            };
            if chunk.is_empty() {
                break;
            }
            output.extend(chunk);
            page = page.next();
        }
        debug!(count = output.len(), pages = page.as_u64() + 1, "listing complete");
        Ok(output)
    }
}

fn acknowledged(operation: &str, response: AlteredContextResponse) -> BrokerResult<()> {
    match response.elements.first() {
        Some(element) => debug!(
            id = %response.id.id,
            attributes = element.attributes.attributes.len(),
            "{operation} answered"
        ),
        None => warn!(response = ?response, "{operation} returned no context responses"),
    }
    checked(operation, response.into_first_status()?)
}

fn checked(operation: &str, status: WireStatus) -> BrokerResult<()> {
    if !status.is_ok() {
        warn!(
            code = status.code,
            message = %status.reason_phrase,
            "{operation} failed"
        );
    }
    status.check()
}

