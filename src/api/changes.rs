//! Change subscriptions over WebSocket.
//!
//! A client connects to `/api/changes/{collection}` and receives the collection's
//! full contents as a `snapshot` message, then a fresh snapshot after every
//! committed write. Failures to load are sent as `error` messages and the socket
//! stays open.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde_json::{json, Value};

use super::DayQuery;
use crate::changes::{Change, Collection};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// GET /api/changes/:collection?day= - Subscribe to a collection.
pub async fn subscribe_changes(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<DayQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(collection) = Collection::parse(&collection) else {
        return AppErrorWithRevision {
            error: AppError::NotFound(format!("Unknown collection: {}", collection)),
            revision_id,
        }
        .into_response();
    };
    // Only attendance and bookings read `?day=`; other collections ignore it.
    let day = if collection.is_day_scoped() {
        match query.resolve() {
            Ok(day) => Some(day),
            Err(error) => return AppErrorWithRevision { error, revision_id }.into_response(),
        }
    } else {
        None
    };

    ws.on_upgrade(move |socket| handle_socket(state, collection, day, socket))
}

async fn handle_socket(
    state: AppState,
    collection: Collection,
    day: Option<String>,
    socket: WebSocket,
) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before the first snapshot so no write slips between them.
    let mut subscription = state.repo.feed().subscribe(collection);
    tracing::debug!(%collection, ?day, "change subscription opened");

    if push_snapshot(&state, collection, day.as_deref(), &mut sender).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            change = subscription.next() => {
                match change {
                    Some(Change::Updated(_)) | Some(Change::Lagged(_)) => {
                        let pushed =
                            push_snapshot(&state, collection, day.as_deref(), &mut sender).await;
                        if pushed.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    tracing::debug!(collection = %subscription.collection(), "change subscription closed");
}

/// Load and send the current snapshot; a load failure is sent as an `error` message.
/// Only a failed send is returned as an error.
async fn push_snapshot(
    state: &AppState,
    collection: Collection,
    day: Option<&str>,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<(), axum::Error> {
    let message = match load_snapshot(state, collection, day).await {
        Ok((revision_id, data)) => json!({
            "type": "snapshot",
            "collection": collection,
            "revisionId": revision_id,
            "data": data,
        }),
        Err(e) => {
            tracing::warn!(%collection, error = %e.message(), "failed to load snapshot");
            json!({
                "type": "error",
                "collection": collection,
                "message": e.message(),
            })
        }
    };

    let result = sender.send(Message::Text(message.to_string().into())).await;
    if let Err(e) = &result {
        tracing::warn!(%collection, error = %e, "failed to push snapshot");
    }
    result
}

async fn load_snapshot(
    state: &AppState,
    collection: Collection,
    day: Option<&str>,
) -> Result<(i64, Value), AppError> {
    let repo = &state.repo;
    let day = day.unwrap_or_default();
    let revision_id = repo.get_revision_id().await?;

    let data = match collection {
        Collection::Branches => serde_json::to_value(repo.list_branches().await?)?,
        Collection::Categories => serde_json::to_value(repo.list_categories().await?)?,
        Collection::Services => serde_json::to_value(repo.list_services().await?)?,
        Collection::Offers => serde_json::to_value(repo.list_offers().await?)?,
        Collection::Referrals => serde_json::to_value(repo.list_referrals().await?)?,
        Collection::Staff => serde_json::to_value(repo.list_staff().await?)?,
        Collection::Attendance => serde_json::to_value(repo.list_attendance(day).await?)?,
        Collection::Bookings => serde_json::to_value(repo.list_bookings(day).await?)?,
    };

    Ok((revision_id, data))
}
