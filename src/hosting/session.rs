use super::Lobby;
use crate::ConnId;
use crate::gameroom::ClientEvent;
use crate::gameroom::Directive;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Per-connection bridge between one WebSocket and the room engine.
/// Owns the ingress rules: parse inbound text into events, route joined
/// traffic to the room inbox, and drop unknown or out-of-context events
/// without a reply. Outbound JSON from the room flows back through the
/// outbox channel registered at join.
pub struct Session {
    conn: ConnId,
    lobby: Arc<Lobby>,
    room: Option<UnboundedSender<Directive>>,
    outbox: UnboundedSender<String>,
}

impl Session {
    pub fn spawn(lobby: Arc<Lobby>, ws: actix_ws::Session, stream: actix_ws::MessageStream) {
        actix_web::rt::spawn(Self::run(lobby, ws, stream));
    }

    async fn run(lobby: Arc<Lobby>, mut ws: actix_ws::Session, mut stream: actix_ws::MessageStream) {
        let conn = lobby.conn();
        let (outbox, mut feed) = unbounded_channel::<String>();
        let mut session = Self {
            conn,
            lobby,
            room: None,
            outbox,
        };
        log::info!("[conn {}] connected", conn);
        'sesh: loop {
            tokio::select! {
                biased;
                json = feed.recv() => match json {
                    Some(json) => if ws.text(json).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => session.ingress(&text).await,
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        if let Some(room) = session.room.take() {
            let _ = room.send(Directive::Leave { conn });
        }
        log::info!("[conn {}] disconnected", conn);
    }

    async fn ingress(&mut self, text: &str) {
        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => return log::debug!("[conn {}] ignoring malformed event: {}", self.conn, e),
        };
        match (event, &self.room) {
            (ClientEvent::Join { room, name }, None) => {
                let tx = self
                    .lobby
                    .join(&room, self.conn, &name, self.outbox.clone())
                    .await;
                self.room = Some(tx);
            }
            (ClientEvent::Join { .. }, Some(_)) => {
                log::debug!("[conn {}] already in a room", self.conn)
            }
            (event, Some(room)) => {
                let _ = room.send(Directive::Client {
                    conn: self.conn,
                    event,
                });
            }
            (_, None) => log::debug!("[conn {}] dropped event before join", self.conn),
        }
    }
}
