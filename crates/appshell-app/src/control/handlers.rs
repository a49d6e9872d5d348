//! Route handlers. Each one resolves its input, calls into [`AppContext`]
//! and wraps the outcome in a [`Reply`].

use std::sync::Arc;

use appshell_common::{ShellError, WindowId};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::app_state::AppContext;

use super::protocol::{BroadcastRequest, OpenRequest, OpenWithDataRequest, Reply};

type Ctx = State<Arc<AppContext>>;

fn respond(result: Result<Reply, ShellError>) -> Response {
    match result {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "control request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Reply::failed(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Malformed identities behave like unknown ones.
fn parse_id(raw: &str) -> Option<WindowId> {
    let id = WindowId::parse(raw);
    if id.is_none() {
        tracing::debug!(raw, "ignoring malformed window id");
    }
    id
}

// =============================================================================
// WINDOW COMMANDS
// =============================================================================

pub(super) async fn exit(State(ctx): Ctx) -> Json<Reply> {
    ctx.request_exit();
    Json(Reply::ok())
}

pub(super) async fn close(State(ctx): Ctx, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return Json(Reply::ok()).into_response();
    };
    respond(ctx.close_window(id).await.map(|_| Reply::ok()))
}

pub(super) async fn open(State(ctx): Ctx, Json(req): Json<OpenRequest>) -> Response {
    respond(
        ctx.open_window(&req.url, req.location, req.resident)
            .await
            .map(Reply::opened),
    )
}

pub(super) async fn open_with_data(
    State(ctx): Ctx,
    Json(req): Json<OpenWithDataRequest>,
) -> Response {
    respond(
        ctx.open_window_with_data(&req.url, req.location, req.data, req.data_id)
            .await
            .map(|(id, data_id)| Reply {
                data_id: Some(data_id),
                ..Reply::opened(id)
            }),
    )
}

pub(super) async fn get_data_by_id(State(ctx): Ctx, Path(id): Path<String>) -> Json<Reply> {
    Json(Reply::data(ctx.data.take(&id).unwrap_or(Value::Null)))
}

pub(super) async fn maximize(State(ctx): Ctx, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return Json(Reply::ok()).into_response();
    };
    respond(ctx.maximize_window(id).await.map(|_| Reply::ok()))
}

pub(super) async fn minimize(State(ctx): Ctx, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return Json(Reply::ok()).into_response();
    };
    respond(ctx.minimize_window(id).await.map(|_| Reply::ok()))
}

pub(super) async fn show(State(ctx): Ctx, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return Json(Reply::ok()).into_response();
    };
    respond(ctx.show_window(id).await.map(|_| Reply::ok()))
}

pub(super) async fn home(State(ctx): Ctx) -> Response {
    respond(ctx.show_home().await.map(|_| Reply::ok()))
}

pub(super) async fn mouse_down_drag(State(ctx): Ctx, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return Json(Reply::ok()).into_response();
    };
    respond(ctx.mouse_down_drag(id).await.map(|_| Reply::ok()))
}

/// Put the raw request body on the clipboard. Clipboard failures are
/// reported in the reply, not as an HTTP error.
pub(super) async fn copy(State(ctx): Ctx, body: String) -> Json<Reply> {
    let clipboard = Arc::clone(&ctx.clipboard);
    let result = tokio::task::spawn_blocking(move || clipboard.set_text(&body))
        .await
        .map_err(|e| ShellError::Clipboard(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(()) => Json(Reply::ok()),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard write failed");
            Json(Reply::failed(e.to_string()))
        }
    }
}

// =============================================================================
// BROADCAST SOCKET
// =============================================================================

pub(super) async fn broadcast(ws: WebSocketUpgrade, State(ctx): Ctx) -> Response {
    ws.on_upgrade(move |socket| handle_broadcast_socket(socket, ctx))
}

async fn handle_broadcast_socket(socket: WebSocket, ctx: Arc<AppContext>) {
    let (mut sink, mut stream) = socket.split();
    let capacity = ctx.config.broadcast.queue_capacity.max(1);
    let (tx, mut rx) = mpsc::channel::<String>(capacity);
    let mut registered: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_broadcast_message(&ctx, &tx, &mut registered, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "broadcast socket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    for app_id in &registered {
        ctx.hub.unregister(app_id, &tx).await;
    }
    tracing::debug!(app_ids = ?registered, "broadcast socket closed");
}

async fn handle_broadcast_message(
    ctx: &AppContext,
    tx: &mpsc::Sender<String>,
    registered: &mut Vec<String>,
    text: &str,
) {
    match serde_json::from_str::<BroadcastRequest>(text) {
        Ok(BroadcastRequest::Register { app_id }) => {
            ctx.hub.register(&app_id, tx.clone()).await;
            if !registered.contains(&app_id) {
                registered.push(app_id);
            }
        }
        Ok(BroadcastRequest::Broadcast { app_id, data }) => {
            let delivered = ctx.hub.broadcast(&app_id, &data.to_string()).await;
            tracing::debug!(app_id = %app_id, delivered, "broadcast relayed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "malformed broadcast message ignored");
        }
    }
}
