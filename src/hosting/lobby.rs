use crate::ConnId;
use crate::dictionary::Dictionary;
use crate::gameroom::Directive;
use crate::gameroom::Retirement;
use crate::gameroom::Room;
use crate::letters::Bag;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Entry in the room table: the inbox half of a running room task, plus
/// a serial so the reaper never evicts a newer room that reused the code.
pub struct RoomHandle {
    pub serial: u64,
    pub tx: UnboundedSender<Directive>,
}

/// Creates and locates rooms, routes players in, and reaps rooms that
/// report empty. Room codes are opaque; uniqueness is exact match.
pub struct Lobby {
    rooms: RwLock<HashMap<String, RoomHandle>>,
    count: AtomicU64,
    conns: AtomicU64,
    retire: UnboundedSender<Retirement>,
    dictionary: Arc<Dictionary>,
}

impl Lobby {
    pub fn new(dictionary: Arc<Dictionary>) -> Arc<Self> {
        let (retire, retired) = unbounded_channel();
        let lobby = Arc::new(Self {
            rooms: RwLock::new(HashMap::new()),
            count: AtomicU64::new(1),
            conns: AtomicU64::new(1),
            retire,
            dictionary,
        });
        tokio::spawn(Self::reap(lobby.clone(), retired));
        lobby
    }

    /// unique connection-scoped player id
    pub fn conn(&self) -> ConnId {
        self.conns.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn occupancy(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Route a player into the named room, creating it in Lobby phase if
    /// absent. Delivery is verified: a handle whose room is gone (closed
    /// channel, or a send that bounces) is replaced in place, and room
    /// teardown deregisters under the same write lock this method holds,
    /// so a join directive that lands in a retiring room's inbox is
    /// always drained before that room exits.
    pub async fn join(
        &self,
        code: &str,
        conn: ConnId,
        name: &str,
        outbox: UnboundedSender<String>,
    ) -> UnboundedSender<Directive> {
        let code = Self::normalize(code);
        let mut rooms = self.rooms.write().await;
        let mut join = Directive::Join {
            conn,
            name: name.to_string(),
            outbox,
        };
        if let Some(handle) = rooms.get(&code).filter(|h| !h.tx.is_closed()) {
            match handle.tx.send(join) {
                Ok(()) => return handle.tx.clone(),
                Err(bounced) => {
                    log::debug!("room {} handle went stale, replacing", code);
                    join = bounced.0;
                }
            }
        }
        let serial = self.count.fetch_add(1, Ordering::Relaxed);
        let (tx, inbox) = unbounded_channel();
        let room = Room::new(
            &code,
            serial,
            self.dictionary.clone(),
            Bag::default(),
            inbox,
            self.retire.clone(),
        );
        let _ = tx.send(join);
        tokio::spawn(room.run());
        rooms.insert(code.clone(), RoomHandle { serial, tx: tx.clone() });
        tx
    }

    /// room codes are opaque strings; only emptiness is repaired
    fn normalize(code: &str) -> String {
        match code.trim() {
            "" => "lobby".to_string(),
            code => code.to_string(),
        }
    }

    /// Confirms each retirement under the rooms write lock. Holding the
    /// lock stops new joins from being handed out while the room drains
    /// its inbox one last time; the handle is only removed once the room
    /// confirms it is exiting. The serial guards the case where a new
    /// room already took over the code, in which case dropping `locked`
    /// lets the stale task exit on its own.
    async fn reap(lobby: Arc<Self>, mut retired: UnboundedReceiver<Retirement>) {
        while let Some(notice) = retired.recv().await {
            let Retirement {
                code,
                serial,
                locked,
                decided,
            } = notice;
            let mut rooms = lobby.rooms.write().await;
            if rooms.get(&code).map(|h| h.serial) != Some(serial) {
                continue;
            }
            let _ = locked.send(());
            if decided.await.unwrap_or(true) {
                rooms.remove(&code);
            }
        }
    }
}
