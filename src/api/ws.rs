use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;

use super::AppState;

pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay_notices(socket, state))
}

/// Forward each refresh notice to the client as one JSON text frame,
/// until either side goes away.
async fn relay_notices(mut socket: WebSocket, state: AppState) {
    let mut notices = state.notifier.subscribe();

    loop {
        tokio::select! {
            notice = notices.recv() => match notice {
                Ok(notice) => {
                    let Ok(text) = serde_json::to_string(&notice) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Subscriber lagged, {} notices dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(_)) => {}
                    // Client closed or errored
                    _ => break,
                }
            }
        }
    }
}
