//! Worker consuming inbound brand messages.

use std::sync::Arc;

use document_store::DocumentStore;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::publisher::EventPublisher;

use super::{Brand, BrandChange, BrandService, CreateBrand};

/// Message type that creates a brand.
pub const BRAND_CREATED: &str = "BRAND_CREATED";

/// A message from the brands topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMessage {
    #[serde(rename = "type")]
    pub message_type: String,

    #[serde(default)]
    pub payload: CreateBrand,
}

impl BrandMessage {
    pub fn created(payload: CreateBrand) -> Self {
        Self {
            message_type: BRAND_CREATED.to_string(),
            payload,
        }
    }
}

/// Pulls brand messages from a bounded queue and creates brands.
///
/// Failures are logged and never stop the loop. The worker exits when the
/// shutdown signal flips to `true` or every sender is dropped.
pub struct BrandMessageWorker<S, P> {
    service: Arc<BrandService<S, P>>,
    messages: mpsc::Receiver<BrandMessage>,
    shutdown: watch::Receiver<bool>,
}

impl<S, P> BrandMessageWorker<S, P>
where
    S: DocumentStore<Brand>,
    P: EventPublisher<BrandChange>,
{
    pub fn new(
        service: Arc<BrandService<S, P>>,
        messages: mpsc::Receiver<BrandMessage>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            service,
            messages,
            shutdown,
        }
    }

    /// Runs the worker loop and returns the number of messages handled.
    pub async fn run(mut self) -> usize {
        tracing::info!("starting brand message worker");
        let mut handled = 0;

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        tracing::info!("shutdown signal received, stopping brand worker");
                        break;
                    }
                }
                message = self.messages.recv() => {
                    let Some(message) = message else {
                        tracing::info!("brand queue closed, stopping brand worker");
                        break;
                    };
                    self.handle(message).await;
                    handled += 1;
                }
            }
        }

        handled
    }

    async fn handle(&self, message: BrandMessage) {
        match message.message_type.as_str() {
            BRAND_CREATED => match self.service.create(message.payload).await {
                Ok((id, version)) => {
                    tracing::info!(%id, %version, "brand created from message");
                }
                Err(err) => {
                    tracing::warn!(error = %err, kind = %err.kind(), "brand message rejected");
                }
            },
            other => {
                tracing::debug!(message_type = other, "skipping unsupported brand message");
            }
        }
    }
}
