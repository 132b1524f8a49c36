//! Live notification channel using socketioxide.
//!
//! The socket.io service runs on its own port, served by hyper. Clients
//! authenticate by emitting `join` with their bearer token and are placed in
//! their per-user room. Notifications are pushed to that room.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use socketioxide::{
    SocketIo,
    extract::{Data, SocketRef},
};
use tokio::net::TcpListener;
use uuid::Uuid;

use orbit_core::ports::{
    LiveError, LiveEvent, LiveNotifier, NEW_NOTIFICATION_EVENT, TokenService, user_room,
};

use crate::middleware::auth::bearer_token;

/// Pushes events to the per-user rooms of a running `SocketIo`.
#[derive(Clone)]
pub struct SocketIoNotifier {
    io: SocketIo,
}

impl SocketIoNotifier {
    pub fn new(io: SocketIo) -> Self {
        Self { io }
    }
}

#[async_trait]
impl LiveNotifier for SocketIoNotifier {
    async fn push(&self, recipient_id: Uuid, event: &LiveEvent) -> Result<(), LiveError> {
        self.io
            .to(user_room(recipient_id))
            .emit(NEW_NOTIFICATION_EVENT, event)
            .map_err(|e| LiveError::Delivery(e.to_string()))
    }
}

/// Configure socket handlers.
pub fn configure_socket_handlers(io: &SocketIo, tokens: Arc<dyn TokenService>) {
    io.ns("/", move |socket: SocketRef| {
        tracing::info!(socket_id = %socket.id, "Client connected");

        let tokens = tokens.clone();
        socket.on("join", move |socket: SocketRef, Data::<String>(token)| {
            // Accept the raw token or a full `Bearer` header value.
            let raw = bearer_token(&token).unwrap_or(token.as_str());
            let claims = tokens.validate_token(raw);

            match claims {
                Ok(claims) => {
                    let user_id = claims.user_id;
                    socket.join(user_room(user_id)).ok();
                    tracing::info!(socket_id = %socket.id, user_id = %user_id, "Client joined user room");

                    socket.emit("joined", &user_id).ok();
                    socket.broadcast().emit("user_online", &user_id).ok();
                }
                Err(e) => {
                    tracing::warn!(socket_id = %socket.id, error = %e, "Rejected socket join");
                    socket.emit("auth_error", &e.to_string()).ok();
                    socket.disconnect().ok();
                }
            }
        });

        socket.on_disconnect(|socket: SocketRef| {
            tracing::info!(socket_id = %socket.id, "Client disconnected");
        });
    });
}

/// Bind the socket.io listener and serve it in the background.
pub async fn start(
    addr: SocketAddr,
    tokens: Arc<dyn TokenService>,
) -> std::io::Result<Arc<dyn LiveNotifier>> {
    let (svc, io) = SocketIo::new_svc();
    configure_socket_handlers(&io, tokens);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Socket.io listening");

    tokio::spawn(async move {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::error!(error = %e, "Socket accept failed");
                    continue;
                }
            };

            let svc = svc.clone();
            tokio::spawn(async move {
                let conn = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .with_upgrades();
                if let Err(e) = conn.await {
                    tracing::debug!(%peer, error = %e, "Socket connection closed with error");
                }
            });
        }
    });

    Ok(Arc::new(SocketIoNotifier::new(io)))
}
