//! Typed change feed, one broadcast channel per collection.
//!
//! Every committed write publishes a [`ChangeEvent`] on its collection's channel.
//! Subscribers react by re-reading the collection, so events carry no payload
//! beyond the new revision and a missed event is recovered by the next snapshot.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::broadcast;

/// Collections that can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Branches,
    Categories,
    Services,
    Offers,
    Referrals,
    Staff,
    Attendance,
    Bookings,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Branches,
        Collection::Categories,
        Collection::Services,
        Collection::Offers,
        Collection::Referrals,
        Collection::Staff,
        Collection::Attendance,
        Collection::Bookings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Branches => "branches",
            Collection::Categories => "categories",
            Collection::Services => "services",
            Collection::Offers => "offers",
            Collection::Referrals => "referrals",
            Collection::Staff => "staff",
            Collection::Attendance => "attendance",
            Collection::Bookings => "bookings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Whether snapshots of this collection are scoped to a single day.
    pub fn is_day_scoped(&self) -> bool {
        matches!(self, Collection::Attendance | Collection::Bookings)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed write on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub revision_id: i64,
}

/// What a subscriber observes when it waits for the next change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The collection changed at this revision.
    Updated(ChangeEvent),
    /// The subscriber fell behind and skipped this many events.
    Lagged(u64),
}

/// Registry of per-collection broadcast channels.
pub struct ChangeFeed {
    channels: HashMap<Collection, broadcast::Sender<ChangeEvent>>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let channels = Collection::ALL
            .into_iter()
            .map(|c| (c, broadcast::channel(capacity.max(1)).0))
            .collect();
        Self { channels }
    }

    /// Publish a change. Having no live subscribers is not an error.
    pub fn publish(&self, collection: Collection, revision_id: i64) {
        if let Some(tx) = self.channels.get(&collection) {
            let delivered = tx
                .send(ChangeEvent {
                    collection,
                    revision_id,
                })
                .unwrap_or(0);
            tracing::debug!(%collection, revision_id, delivered, "published change");
        }
    }

    /// Open a subscription. Dropping it unsubscribes.
    pub fn subscribe(&self, collection: Collection) -> Subscription {
        let rx = self.channels[&collection].subscribe();
        Subscription { collection, rx }
    }

    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.channels
            .get(&collection)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

/// Live subscription to a single collection.
pub struct Subscription {
    collection: Collection,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Wait for the next change. Returns `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<Change> {
        match self.rx.recv().await {
            Ok(event) => Some(Change::Updated(event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(collection = %self.collection, skipped, "subscriber lagged");
                Some(Change::Lagged(skipped))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names_round_trip() {
        for c in Collection::ALL {
            assert_eq!(Collection::parse(c.as_str()), Some(c));
        }
        assert_eq!(Collection::parse("topics"), None);
    }

    #[tokio::test]
    async fn test_subscriber_sees_only_its_collection() {
        let feed = ChangeFeed::new(8);
        let mut offers = feed.subscribe(Collection::Offers);

        feed.publish(Collection::Staff, 1);
        feed.publish(Collection::Offers, 2);

        let change = offers.next().await.unwrap();
        assert_eq!(
            change,
            Change::Updated(ChangeEvent {
                collection: Collection::Offers,
                revision_id: 2
            })
        );
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_told_to_resync() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe(Collection::Bookings);

        for rev in 1..=5 {
            feed.publish(Collection::Bookings, rev);
        }

        assert_eq!(sub.next().await, Some(Change::Lagged(3)));
        match sub.next().await {
            Some(Change::Updated(ev)) => assert_eq!(ev.revision_id, 4),
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let feed = ChangeFeed::new(4);
        let sub = feed.subscribe(Collection::Attendance);
        assert_eq!(feed.subscriber_count(Collection::Attendance), 1);
        drop(sub);
        assert_eq!(feed.subscriber_count(Collection::Attendance), 0);
    }
}
