use super::*;
use crate::ConnId;
use crate::dictionary::Dictionary;
use crate::letters::Bag;
use crate::letters::score;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Directives posted into a room's inbox. Session tasks and the lobby
/// are the only producers; the room task is the sole consumer, which is
/// what serializes every grid, bank, and phase mutation per room.
#[derive(Debug)]
pub enum Directive {
    Join {
        conn: ConnId,
        name: String,
        outbox: UnboundedSender<String>,
    },
    Leave {
        conn: ConnId,
    },
    Client {
        conn: ConnId,
        event: ClientEvent,
    },
}

/// Teardown notice from a room to the registry reaper. The reaper
/// answers on `locked` once it holds the registry write lock, so no new
/// join can be handed out while the room makes its final call; the room
/// replies on `decided` whether it is actually exiting after draining
/// any join that raced in ahead of the lock.
#[derive(Debug)]
pub struct Retirement {
    pub code: String,
    pub serial: u64,
    pub locked: oneshot::Sender<()>,
    pub decided: oneshot::Receiver<bool>,
}

/// Central coordinator for one live Yoink room.
/// Single source of truth for grid contents, tile ownership, cooldowns,
/// round timing, and scoring. Runs as one tokio task whose select loop
/// multiplexes the inbox, the phase clock, the spawn clock, and a 1 Hz
/// observational tick; contested yoinks therefore resolve in inbox
/// order, first accepted wins.
///
/// Deadlines are absolute instants. The tick only projects state; it can
/// never skew a transition.
pub struct Room {
    code: String,
    serial: u64,
    settings: Settings,
    phase: Phase,
    round: usize,
    grid: Grid,
    players: Vec<Player>,
    host: Option<ConnId>,
    bag: Bag,
    dictionary: Arc<Dictionary>,
    spawn_deadline: Option<Instant>,
    phase_deadline: Option<Instant>,
    inbox: UnboundedReceiver<Directive>,
    retire: UnboundedSender<Retirement>,
}

impl Room {
    pub fn new(
        code: &str,
        serial: u64,
        dictionary: Arc<Dictionary>,
        bag: Bag,
        inbox: UnboundedReceiver<Directive>,
        retire: UnboundedSender<Retirement>,
    ) -> Self {
        Self {
            code: code.to_string(),
            serial,
            settings: Settings::default(),
            phase: Phase::Lobby,
            round: 0,
            grid: Grid::default(),
            players: Vec::new(),
            host: None,
            bag,
            dictionary,
            spawn_deadline: None,
            phase_deadline: None,
            inbox,
            retire,
        }
    }

    pub async fn run(mut self) {
        log::info!("[room {}] open", self.code);
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                biased;
                directive = self.inbox.recv() => match directive {
                    Some(directive) => self.handle(directive),
                    None => break,
                },
                _ = Self::alarm(self.phase_deadline) => self.advance(),
                _ = Self::alarm(self.spawn_deadline) => self.spawn(),
                _ = ticker.tick() => self.share(),
            }
            if self.players.is_empty() && self.inbox.is_empty() && !self.deregister().await {
                break;
            }
        }
        log::info!("[room {}] closed", self.code);
    }

    /// pends forever on None so an idle clock never wins the select
    async fn alarm(deadline: Option<Instant>) {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }

    /// Coordinated teardown with the registry. The reaper signals once
    /// it holds the registry write lock; every join handed out before
    /// that point is already queued in the inbox, so one final drain
    /// either confirms the exit or revives the room for a player who
    /// raced the shutdown. Returns true when the room keeps running.
    async fn deregister(&mut self) -> bool {
        let (locked, drained) = oneshot::channel();
        let (verdict, decided) = oneshot::channel();
        let notice = Retirement {
            code: self.code.clone(),
            serial: self.serial,
            locked,
            decided,
        };
        if self.retire.send(notice).is_err() || drained.await.is_err() {
            return false;
        }
        while let Ok(directive) = self.inbox.try_recv() {
            self.handle(directive);
        }
        let revived = !self.players.is_empty();
        let _ = verdict.send(!revived);
        revived
    }

    fn handle(&mut self, directive: Directive) {
        match directive {
            Directive::Join { conn, name, outbox } => self.join(conn, &name, outbox),
            Directive::Leave { conn } => self.leave(conn),
            Directive::Client { conn, event } => match event {
                ClientEvent::Start => self.start(conn),
                ClientEvent::Update(patch) => self.update(conn, &patch),
                ClientEvent::Yoink { index } => self.yoink(conn, index),
                ClientEvent::Submit { word, indices } => self.submit(conn, &word, indices),
                ClientEvent::Join { .. } => {
                    log::debug!("[room {}] duplicate join from {}", self.code, conn)
                }
            },
        }
    }
}

// membership
impl Room {
    fn join(&mut self, conn: ConnId, name: &str, outbox: UnboundedSender<String>) {
        if self.players.iter().any(|p| p.id == conn) {
            return;
        }
        let player = Player::new(conn, name, outbox, Instant::now());
        log::info!("[room {}] {} joined as {}", self.code, player.name, conn);
        self.players.push(player);
        self.host.get_or_insert(conn);
        self.share();
    }

    fn leave(&mut self, conn: ConnId) {
        let Some(position) = self.players.iter().position(|p| p.id == conn) else {
            return;
        };
        let player = self.players.remove(position);
        log::info!("[room {}] {} left", self.code, player.name);
        if self.host == Some(conn) {
            self.host = self.players.first().map(|p| p.id);
            if let Some(host) = self.host {
                log::debug!("[room {}] host passed to {}", self.code, host);
            }
        }
        match self.players.is_empty() {
            true => {
                // the run loop notices and retires; stop the clocks now
                self.spawn_deadline = None;
                self.phase_deadline = None;
            }
            false => self.share(),
        }
    }

    fn find(&self, conn: ConnId) -> Option<usize> {
        self.players.iter().position(|p| p.id == conn)
    }
}

// state machine
impl Room {
    /// `game:start`: valid from the lobby or a finished game, permissive
    /// by policy (any member may start; the host is tracked, not
    /// enforced)
    fn start(&mut self, conn: ConnId) {
        if !matches!(self.phase, Phase::Lobby | Phase::Finished) {
            return;
        }
        if self.find(conn).is_none() || self.players.is_empty() {
            return;
        }
        for player in self.players.iter_mut() {
            player.reset_game();
        }
        log::info!("[room {}] game started by {}", self.code, conn);
        self.begin(1);
    }

    fn update(&mut self, conn: ConnId, patch: &Patch) {
        self.settings.apply(patch);
        log::debug!("[room {}] settings updated by {}: {:?}", self.code, conn, self.settings);
        self.share();
    }

    /// Round start: banks and per-round scores cleared, the grid refilled
    /// to all 16 slots, clocks armed. The round begins full, so the spawn
    /// loop starts idle.
    fn begin(&mut self, round: usize) {
        self.round = round;
        self.phase = Phase::Playing;
        for player in self.players.iter_mut() {
            player.reset_round();
        }
        self.grid.refill(&mut self.bag);
        self.spawn_deadline = None;
        self.phase_deadline = Some(Instant::now() + self.settings.round_duration());
        log::info!(
            "[room {}] round {}/{} started",
            self.code,
            round,
            self.settings.rounds
        );
        self.share();
    }

    /// phase clock fired
    fn advance(&mut self) {
        match self.phase {
            Phase::Playing => self.conclude(),
            Phase::Intermission => self.begin(self.round + 1),
            _ => self.phase_deadline = None,
        }
    }

    /// Round end: fold round scores into cumulative totals, publish the
    /// leaderboard, then rest or finish.
    fn conclude(&mut self) {
        self.spawn_deadline = None;
        for player in self.players.iter_mut() {
            player.cumulative_score += player.round_score;
        }
        let leaderboard = self.standings();
        log::info!("[room {}] round {} ended", self.code, self.round);
        self.broadcast(ServerEvent::round_ended(
            self.round,
            self.settings.rounds,
            leaderboard.clone(),
        ));
        match self.round < self.settings.rounds {
            true => {
                self.phase = Phase::Intermission;
                self.phase_deadline = Some(Instant::now() + self.settings.intermission());
            }
            false => {
                self.phase = Phase::Finished;
                self.phase_deadline = None;
                log::info!("[room {}] game over", self.code);
                self.broadcast(ServerEvent::game_ended(leaderboard));
            }
        }
        self.share();
    }

    fn standings(&self) -> Vec<Standing> {
        let mut rows = self
            .players
            .iter()
            .map(|p| Standing {
                id: p.id,
                name: p.name.clone(),
                round_score: p.round_score,
                cumulative_score: p.cumulative_score,
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            b.cumulative_score
                .cmp(&a.cumulative_score)
                .then(a.name.cmp(&b.name))
        });
        rows
    }
}

// the shared pool
impl Room {
    /// First-come-first-served arbitration over one slot: inbox order
    /// decides, exactly one contender can observe the letter. Losers are
    /// silent; cooldown and capacity are policy denials surfaced to the
    /// yoinker alone.
    fn yoink(&mut self, conn: ConnId, index: usize) {
        if !self.phase.is_playing() {
            return;
        }
        let Some(position) = self.find(conn) else {
            return;
        };
        let now = Instant::now();
        let player = &self.players[position];
        if !player.off_cooldown(now) {
            Self::post(&player.outbox, ServerEvent::denied(Denial::Cooldown));
            return;
        }
        if player.bank.is_full() {
            Self::post(&player.outbox, ServerEvent::denied(Denial::BankFull));
            return;
        }
        let Some(letter) = self.grid.take(index) else {
            log::debug!("[room {}] tile {} gone before {}", self.code, index, conn);
            return;
        };
        let player = &mut self.players[position];
        player.last_yoink = Some(now);
        player.bank.append(letter);
        let name = player.name.clone();
        self.spawn_deadline = self.grid.next_spawn(now);
        self.broadcast(ServerEvent::yoinked(conn, name, index, letter));
        self.share();
    }

    /// spawn clock fired: fill one slot, recompute the schedule
    fn spawn(&mut self) {
        if !self.phase.is_playing() {
            self.spawn_deadline = None;
            return;
        }
        if let Some(index) = self.grid.spawn(&mut self.bag) {
            log::debug!("[room {}] spawned tile at {}", self.code, index);
        }
        self.spawn_deadline = self.grid.next_spawn(Instant::now());
        self.share();
    }
}

// submissions
impl Room {
    fn submit(&mut self, conn: ConnId, word: &str, indices: Option<Vec<usize>>) {
        if !self.phase.is_playing() {
            return;
        }
        let Some(position) = self.find(conn) else {
            return;
        };
        let now = Instant::now();
        let multiplier = self.settings.multiplier(self.round);
        let min_len = self.settings.min_len;
        let player = &mut self.players[position];
        if !player.bucket.allow(now) {
            log::debug!("[room {}] rate limited submit from {}", self.code, conn);
            return;
        }
        match validate(
            word,
            indices.as_deref(),
            &player.bank,
            &self.dictionary,
            min_len,
        ) {
            Err(reason) => {
                Self::post(&player.outbox, ServerEvent::rejected(word.to_string(), reason))
            }
            Ok(valid) => {
                player.bank.remove(&valid.indices);
                let points = score(&valid.word, multiplier);
                player.round_score += points;
                player.words.push(valid.word.clone());
                let name = player.name.clone();
                log::debug!(
                    "[room {}] {} scored {} with {}",
                    self.code,
                    name,
                    points,
                    valid.word
                );
                self.broadcast(ServerEvent::accepted(conn, name, valid.word, points));
                self.share();
            }
        }
    }
}

// fan-out
impl Room {
    fn post(outbox: &UnboundedSender<String>, event: ServerEvent) {
        let _ = outbox.send(event.to_json());
    }

    fn broadcast(&self, event: ServerEvent) {
        let json = event.to_json();
        for player in self.players.iter() {
            player
                .outbox
                .send(json.clone())
                .inspect_err(|e| {
                    log::warn!("[room {}] failed broadcast to {}: {}", self.code, player.id, e)
                })
                .ok();
        }
    }

    /// Project and push `lobby:state` to every viewer. The room-wide
    /// portion is computed once; bank, score, and id vary per viewer.
    fn share(&self) {
        let shared = self.shared();
        for player in self.players.iter() {
            let projection = Projection {
                id: player.id,
                bank: player.bank.letters(),
                my_score: player.round_score,
                shared: &shared,
            };
            match serde_json::to_string(&projection) {
                Ok(json) => {
                    let _ = player.outbox.send(json);
                }
                Err(e) => log::error!("[room {}] failed projection: {}", self.code, e),
            }
        }
    }

    fn shared(&self) -> Shared {
        let now = Instant::now();
        Shared {
            settings: self.settings,
            players: self
                .players
                .iter()
                .map(|p| Roster {
                    id: p.id,
                    name: p.name.clone(),
                })
                .collect(),
            pool: self.grid.slots().to_vec(),
            phase: self.phase,
            current_round: self.round,
            total_rounds: self.settings.rounds,
            round_multiplier: self.settings.multiplier(self.round),
            scores_hidden: self.phase.is_playing(),
            ends_in_ms: self
                .phase_deadline
                .map(|at| at.saturating_duration_since(now).as_millis() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::Letter;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::advance;

    fn dictionary() -> Dictionary {
        ["CAT", "DOG", "TACOS", "JESTING"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    fn room() -> Room {
        let (_inbox_tx, inbox) = unbounded_channel();
        let (retire, _retire_rx) = unbounded_channel();
        Room::new("test", 1, Arc::new(dictionary()), Bag::seeded(7), inbox, retire)
    }

    fn join(room: &mut Room, conn: ConnId) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded_channel();
        room.join(conn, &format!("p{}", conn), tx);
        rx
    }

    fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<serde_json::Value> {
        let mut events = Vec::new();
        while let Ok(json) = rx.try_recv() {
            events.push(serde_json::from_str(&json).unwrap());
        }
        events
    }

    fn kinds(events: &[serde_json::Value]) -> Vec<String> {
        events
            .iter()
            .map(|e| e["type"].as_str().unwrap().to_string())
            .collect()
    }

    fn stock(room: &mut Room, conn: ConnId, word: &str) {
        let position = room.find(conn).unwrap();
        for c in word.chars() {
            room.players[position]
                .bank
                .append(Letter::try_from(c).unwrap());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn lobby_until_started() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        assert_eq!(room.phase, Phase::Lobby);
        room.yoink(1, 0);
        room.submit(1, "CAT", None);
        let events = drain(&mut rx);
        // only the join projection; play events drop silently outside rounds
        assert_eq!(kinds(&events), vec!["lobby:state"]);
        assert_eq!(events[0]["currentRound"], 0);
        assert_eq!(events[0]["phase"], "lobby");
    }

    #[tokio::test(start_paused = true)]
    async fn start_fills_grid_and_arms_clock() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        let before = Instant::now();
        room.start(1);
        assert_eq!(room.phase, Phase::Playing);
        assert_eq!(room.round, 1);
        assert_eq!(room.grid.count(), 16);
        assert_eq!(room.spawn_deadline, None);
        assert_eq!(
            room.phase_deadline,
            Some(before + Duration::from_secs(60))
        );
        let events = drain(&mut rx);
        let state = events.last().unwrap();
        assert_eq!(state["phase"], "playing");
        assert_eq!(state["scoresHidden"], true);
        assert_eq!(state["pool"].as_array().unwrap().len(), 16);
        assert!(state["pool"].as_array().unwrap().iter().all(|s| !s.is_null()));
    }

    #[tokio::test(start_paused = true)]
    async fn yoink_moves_tile_to_bank_and_schedules_spawn() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        drain(&mut rx);
        let now = Instant::now();
        room.yoink(1, 3);
        assert_eq!(room.grid.count(), 15);
        assert_eq!(room.players[0].bank.len(), 1);
        assert_eq!(room.spawn_deadline, Some(now + Duration::from_millis(10_000)));
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["tile:yoinked", "lobby:state"]);
        assert_eq!(events[0]["index"], 3);
        assert_eq!(events[1]["bank"].as_array().unwrap().len(), 1);
        assert!(events[1]["pool"][3].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_refills_and_goes_idle() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        room.yoink(1, 3);
        drain(&mut rx);
        advance(Duration::from_millis(10_000)).await;
        room.spawn();
        assert_eq!(room.grid.count(), 16);
        assert_eq!(room.spawn_deadline, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_rejects_at_499_allows_at_500() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        room.yoink(1, 0);
        drain(&mut rx);
        advance(Duration::from_millis(499)).await;
        room.yoink(1, 1);
        let denied = drain(&mut rx);
        assert_eq!(kinds(&denied), vec!["yoink:rejected"]);
        assert_eq!(denied[0]["reason"], "cooldown");
        advance(Duration::from_millis(1)).await;
        room.yoink(1, 1);
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["tile:yoinked", "lobby:state"]);
    }

    #[tokio::test(start_paused = true)]
    async fn full_bank_denies_yoink() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        stock(&mut room, 1, "LETTERS");
        drain(&mut rx);
        room.yoink(1, 0);
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["yoink:rejected"]);
        assert_eq!(events[0]["reason"], "bank full");
        assert_eq!(room.grid.count(), 16);
    }

    #[tokio::test(start_paused = true)]
    async fn contested_yoink_has_one_winner() {
        let mut room = room();
        let mut rx1 = join(&mut room, 1);
        let mut rx2 = join(&mut room, 2);
        room.start(1);
        drain(&mut rx1);
        drain(&mut rx2);
        room.yoink(1, 5);
        room.yoink(2, 5);
        let first = drain(&mut rx1);
        let second = drain(&mut rx2);
        // one broadcasted win, no rejection for the loser
        assert_eq!(kinds(&first).iter().filter(|k| *k == "tile:yoinked").count(), 1);
        assert_eq!(kinds(&second).iter().filter(|k| *k == "tile:yoinked").count(), 1);
        assert!(!kinds(&second).iter().any(|k| k == "yoink:rejected"));
        assert_eq!(first[0]["playerId"], 1);
        // the loser observes the emptied slot in the next projection
        let state = second.iter().rev().find(|e| e["type"] == "lobby:state").unwrap();
        assert!(state["pool"][5].is_null());
        assert_eq!(room.players[1].bank.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_word_consumes_bank_and_scores() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        stock(&mut room, 1, "TAC");
        drain(&mut rx);
        room.submit(1, "cat", Some(vec![2, 1, 0]));
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["word:accepted", "lobby:state"]);
        assert_eq!(events[0]["points"], 64);
        assert_eq!(events[0]["word"], "CAT");
        assert_eq!(room.players[0].round_score, 64);
        assert!(room.players[0].bank.is_empty());
        assert_eq!(events[1]["myScore"], 64);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmitting_rebuilt_word_scores_identically() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        stock(&mut room, 1, "CATCAT");
        drain(&mut rx);
        room.submit(1, "CAT", None);
        room.submit(1, "CAT", None);
        let events = drain(&mut rx);
        let points = events
            .iter()
            .filter(|e| e["type"] == "word:accepted")
            .map(|e| e["points"].as_u64().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(points, vec![64, 64]);
        assert_eq!(room.players[0].round_score, 128);
    }

    #[tokio::test(start_paused = true)]
    async fn rejections_reach_submitter_only() {
        let mut room = room();
        let mut rx1 = join(&mut room, 1);
        let mut rx2 = join(&mut room, 2);
        room.start(1);
        stock(&mut room, 1, "CAT");
        drain(&mut rx1);
        drain(&mut rx2);
        room.submit(1, "ZEBRA", None);
        let mine = drain(&mut rx1);
        let theirs = drain(&mut rx2);
        assert_eq!(kinds(&mine), vec!["word:rejected"]);
        assert_eq!(mine[0]["reason"], "not a word");
        assert!(theirs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_submits_drop_silently() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        drain(&mut rx);
        for _ in 0..12 {
            room.submit(1, "ZZZZ", None);
        }
        let events = drain(&mut rx);
        assert_eq!(kinds(&events).iter().filter(|k| *k == "word:rejected").count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn round_transitions_through_intermission() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        stock(&mut room, 1, "CAT");
        room.submit(1, "CAT", None);
        drain(&mut rx);
        room.advance();
        assert_eq!(room.phase, Phase::Intermission);
        assert_eq!(room.players[0].cumulative_score, 64);
        assert_eq!(
            room.phase_deadline,
            Some(Instant::now() + Duration::from_secs(10))
        );
        let events = drain(&mut rx);
        // round:ended precedes the first intermission projection
        assert_eq!(kinds(&events), vec!["round:ended", "lobby:state"]);
        assert_eq!(events[0]["round"], 1);
        assert_eq!(events[0]["leaderboard"][0]["cumulativeScore"], 64);
        assert_eq!(events[1]["phase"], "intermission");
        assert_eq!(events[1]["scoresHidden"], false);
        room.advance();
        assert_eq!(room.phase, Phase::Playing);
        assert_eq!(room.round, 2);
        assert_eq!(room.grid.count(), 16);
        assert!(room.players[0].bank.is_empty());
        assert_eq!(room.players[0].round_score, 0);
        assert_eq!(room.players[0].cumulative_score, 64);
        let events = drain(&mut rx);
        let state = events.last().unwrap();
        assert_eq!(state["currentRound"], 2);
        assert_eq!(state["roundMultiplier"], 1.2);
    }

    #[tokio::test(start_paused = true)]
    async fn final_round_finishes_the_game() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.update(1, &Patch {
            rounds: Some(1),
            ..Patch::default()
        });
        room.start(1);
        drain(&mut rx);
        room.advance();
        assert_eq!(room.phase, Phase::Finished);
        assert_eq!(room.phase_deadline, None);
        assert_eq!(room.spawn_deadline, None);
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["round:ended", "game:ended", "lobby:state"]);
        assert_eq!(events[2]["phase"], "finished");
        // a finished room restarts into a fresh game
        room.start(1);
        assert_eq!(room.phase, Phase::Playing);
        assert_eq!(room.round, 1);
        assert_eq!(room.players[0].cumulative_score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn leaderboard_sorts_by_cumulative_then_name() {
        let mut room = room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        let _rx3 = join(&mut room, 3);
        room.start(1);
        room.players[0].round_score = 10;
        room.players[1].round_score = 30;
        room.players[2].round_score = 10;
        room.advance();
        let rows = room.standings();
        assert_eq!(rows[0].id, 2);
        assert_eq!(rows[1].name, "p1");
        assert_eq!(rows[2].name, "p3");
    }

    #[tokio::test(start_paused = true)]
    async fn host_passes_on_leave_and_room_empties() {
        let mut room = room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        assert_eq!(room.host, Some(1));
        room.leave(1);
        assert_eq!(room.host, Some(2));
        room.start(2);
        room.leave(2);
        assert!(room.players.is_empty());
        assert_eq!(room.phase_deadline, None);
        assert_eq!(room.spawn_deadline, None);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_confirms_when_truly_empty() {
        let (_inbox_tx, inbox) = unbounded_channel();
        let (retire, mut retired) = unbounded_channel();
        let mut room = Room::new("test", 1, Arc::new(dictionary()), Bag::seeded(7), inbox, retire);
        let (kept, _) = tokio::join!(room.deregister(), async {
            let notice = retired.recv().await.unwrap();
            assert_eq!(notice.code, "test");
            let _ = notice.locked.send(());
            // the room confirms it is exiting
            assert!(notice.decided.await.unwrap());
        });
        assert!(!kept);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_revives_for_a_raced_join() {
        let (inbox_tx, inbox) = unbounded_channel();
        let (retire, mut retired) = unbounded_channel();
        let mut room = Room::new("test", 1, Arc::new(dictionary()), Bag::seeded(7), inbox, retire);
        // a join lands in the inbox after the room decided to exit but
        // before the reaper takes the registry lock
        let (tx, mut rx) = unbounded_channel();
        inbox_tx
            .send(Directive::Join {
                conn: 9,
                name: "Ada".to_string(),
                outbox: tx,
            })
            .unwrap();
        let (kept, _) = tokio::join!(room.deregister(), async {
            let notice = retired.recv().await.unwrap();
            let _ = notice.locked.send(());
            // the room drained the join and stays up
            assert!(!notice.decided.await.unwrap());
        });
        assert!(kept);
        assert_eq!(room.players.len(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cumulative_scores_never_decrease() {
        let mut room = room();
        let mut rx = join(&mut room, 1);
        room.start(1);
        let mut last = 0;
        for _ in 0..3 {
            stock(&mut room, 1, "CAT");
            room.submit(1, "CAT", None);
            room.advance();
            let cumulative = room.players[0].cumulative_score;
            assert!(cumulative >= last);
            last = cumulative;
            if room.phase == Phase::Intermission {
                room.advance();
            }
            drain(&mut rx);
        }
        assert_eq!(room.phase, Phase::Finished);
    }
}
