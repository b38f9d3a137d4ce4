//! Background task that writes bus events to the `events` table.

use revops_db::repositories::EventRepo;
use revops_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Drains an [`EventBus`](crate::EventBus) subscription into the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Consume events until the bus is closed.
    ///
    /// A lagged receiver drops the missed events and keeps going; the
    /// activity feed tolerates gaps but the API must never wait on it.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        tracing::info!("event persistence task started");

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(error) = Self::persist(&pool, &event).await {
                        tracing::warn!(
                            event_type = %event.event_type,
                            %error,
                            "failed to persist platform event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event persistence lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("event bus closed, stopping persistence task");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        EventRepo::insert(
            pool,
            event.company_id,
            &event.event_type,
            event.source_entity_type.as_deref(),
            event.source_entity_id,
            &event.payload,
        )
        .await?;
        Ok(())
    }
}
