//! Per-socket WebSocket session actor.
//!
//! The actor parses frames, resolves its bound session token and forwards
//! commands into the registry. Outbound traffic arrives through
//! [`WsTransport`], the socket-table binding for this actor's mailbox.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::GameError;
use crate::room::RoomCommand;
use crate::server::registry::GameServer;
use crate::server::transport::Transport;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Outbound(pub String);

/// Socket-table transport backed by this actor's mailbox.
pub struct WsTransport(Recipient<Outbound>);

impl Transport for WsTransport {
    fn send(&self, payload: String) {
        self.0.do_send(Outbound(payload));
    }
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    server: web::Data<GameServer>,
) -> Result<HttpResponse, Error> {
    ws::start(WsSession::new(server.get_ref().clone()), &req, stream)
}

pub struct WsSession {
    server: GameServer,
    /// Bound after a successful create/join/reconnect; the key for every
    /// later message on this socket.
    session_id: Option<Uuid>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(server: GameServer) -> Self {
        Self {
            server,
            session_id: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, err: &GameError) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                message: err.to_string(),
            },
        );
    }

    fn transport(ctx: &mut ws::WebsocketContext<Self>) -> Arc<dyn Transport> {
        Arc::new(WsTransport(ctx.address().recipient()))
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!("client heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_client_msg(&mut self, msg: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMsg::Create { name } => {
                let server = self.server.clone();
                let transport = Self::transport(ctx);
                ctx.spawn(
                    async move { server.create(&name, transport).await }
                        .into_actor(self)
                        .map(|res, actor, ctx| match res {
                            Ok(session_id) => actor.session_id = Some(session_id),
                            Err(err) => Self::send_error(ctx, &err),
                        }),
                );
            }
            ClientMsg::Join { code, name } => {
                let server = self.server.clone();
                let transport = Self::transport(ctx);
                ctx.spawn(
                    async move { server.join(&code, &name, transport).await }
                        .into_actor(self)
                        .map(|res, actor, ctx| match res {
                            Ok(session_id) => actor.session_id = Some(session_id),
                            Err(err) => Self::send_error(ctx, &err),
                        }),
                );
            }
            ClientMsg::Reconnect { session_id } => {
                match self.server.reconnect(session_id, Self::transport(ctx)) {
                    Ok(()) => self.session_id = Some(session_id),
                    Err(err) => Self::send_error(ctx, &err),
                }
            }
            other => {
                let Some(session_id) = self.session_id else {
                    Self::send_error(ctx, &GameError::InvalidSession);
                    return;
                };
                let cmd = match other {
                    ClientMsg::AddAi { name } => RoomCommand::AddAi { session_id, name },
                    ClientMsg::StartGame => RoomCommand::StartGame { session_id },
                    ClientMsg::CallTrumps { suit } => RoomCommand::CallTrumps { session_id, suit },
                    ClientMsg::PlayCard { card } => RoomCommand::PlayCard { session_id, card },
                    ClientMsg::PlayAgain => RoomCommand::PlayAgain { session_id },
                    // Handled above.
                    ClientMsg::Create { .. } | ClientMsg::Join { .. } | ClientMsg::Reconnect { .. } => {
                        return
                    }
                };
                if let Err(err) = self.server.dispatch(session_id, cmd) {
                    Self::send_error(ctx, &err);
                }
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("websocket session started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(session_id) = self.session_id {
            self.server.disconnect(session_id);
        }
        info!(session_id = ?self.session_id, "websocket session stopped");
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => self.handle_client_msg(msg, ctx),
                    // Malformed JSON or unknown type: report and keep the
                    // connection open.
                    Err(_) => Self::send_error(ctx, &GameError::parse("Malformed message")),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(ctx, &GameError::parse("Binary not supported"));
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(error = %err, "websocket protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
