use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_core::{
    Command, DefinitionSource, GameSession, GuessOutcome, HintQuery, LEADERBOARD_TOP, RecentWords,
    RoundEnd, RoundSchedule, RoundTiming, TickOutcome, WordSelector, leaderboard_text, parse,
};
use game_types::{ChatEvent, OverlayMessage, Platform};

use crate::chat::ChatResponder;
use crate::overlay::OverlaySink;

/// Everything the engine reacts to. Chat events come from the connectors;
/// the rest are sent by tasks the engine itself spawned, tagged with the
/// epoch they belong to so leftovers from a finished round are dropped.
#[derive(Debug)]
pub enum EngineEvent {
    Chat(ChatEvent),
    WordReady {
        epoch: u64,
        word: String,
    },
    FirstReveal {
        epoch: u64,
    },
    RevealTick {
        epoch: u64,
    },
    RoundTimeout {
        epoch: u64,
    },
    CountdownTick {
        epoch: u64,
        remaining: u32,
    },
    HintReady {
        epoch: u64,
        platform: Platform,
        definition: Option<String>,
    },
    OverlaySync {
        reply: oneshot::Sender<Vec<OverlayMessage>>,
    },
}

/// Cheap cloneable handle into the engine's event queue.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn chat(&self, event: ChatEvent) {
        let _ = self.tx.send(EngineEvent::Chat(event));
    }

    /// Current overlay values, for replay to a new subscriber.
    pub async fn overlay_snapshot(&self) -> Vec<OverlayMessage> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(EngineEvent::OverlaySync { reply }).is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }
}

/// The single task that owns all game state.
///
/// Every transition, whether from chat or from a timer, arrives on one
/// mpsc channel and is processed to completion before the next, so the
/// session needs no locking. Timer tasks are aborted when their round
/// ends; the epoch tag plus the session's own end latch make any that
/// slip through harmless.
pub struct Engine {
    session: GameSession,
    recent: RecentWords,
    selector: WordSelector,
    definitions: Arc<dyn DefinitionSource>,
    overlay: Arc<dyn OverlaySink>,
    chat: Arc<dyn ChatResponder>,
    owner: String,
    epoch: u64,
    round_tasks: Vec<JoinHandle<()>>,
    countdown_task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl Engine {
    pub fn spawn(
        timing: RoundTiming,
        owner: String,
        selector: WordSelector,
        definitions: Arc<dyn DefinitionSource>,
        overlay: Arc<dyn OverlaySink>,
        chat: Arc<dyn ChatResponder>,
    ) -> EngineHandle {
        let (tx, rx) = mpsc::unbounded_channel();

        let engine = Self {
            session: GameSession::new(timing),
            recent: RecentWords::new(),
            selector,
            definitions,
            overlay,
            chat,
            owner,
            epoch: 0,
            round_tasks: Vec::new(),
            countdown_task: None,
            tx: tx.clone(),
        };
        tokio::spawn(engine.run(rx));

        EngineHandle { tx }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        self.cancel_round_tasks();
    }

    fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Chat(chat) => self.handle_chat(chat),
            EngineEvent::WordReady { epoch, word } => self.handle_word_ready(epoch, word),
            EngineEvent::FirstReveal { epoch } | EngineEvent::RevealTick { epoch } => {
                self.handle_reveal(epoch)
            }
            EngineEvent::RoundTimeout { epoch } => self.handle_timeout(epoch),
            EngineEvent::CountdownTick { epoch, remaining } => {
                self.handle_countdown(epoch, remaining)
            }
            EngineEvent::HintReady {
                epoch,
                platform,
                definition,
            } => self.handle_hint_ready(epoch, platform, definition),
            EngineEvent::OverlaySync { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    fn handle_chat(&mut self, event: ChatEvent) {
        let is_owner = !self.owner.is_empty() && event.user.eq_ignore_ascii_case(&self.owner);
        let Some(command) = parse(&event.text, is_owner) else {
            return;
        };

        match command {
            Command::StartGame => {
                self.session.set_active();
                self.start_round();
                self.chat
                    .say(event.platform, "🎮 Word game started! Type !guess <word>");
            }
            Command::StopGame => self.stop_game(event.platform),
            Command::StartBattle => {
                self.session.start_battle();
                self.broadcast_scores();
                self.start_round();
                self.chat.say(
                    event.platform,
                    "⚔️ Battle mode: Twitch vs Kick! Type !guess <word>",
                );
            }
            Command::StopBattle => {
                self.session.stop_battle();
                self.chat.say(event.platform, "⚔️ Battle mode disabled.");
            }
            Command::BattleScore => match self.session.battle_report() {
                Some(report) => self.chat.say(event.platform, &report),
                None => self
                    .chat
                    .say(event.platform, "⚔️ Battle mode is not running."),
            },
            Command::Hint => self.handle_hint(event.platform),
            Command::MyScore => {
                let score = self.session.leaderboard().score(&event.user);
                self.chat.say(
                    event.platform,
                    &format!("📊 {}, your score is {}.", event.user, score),
                );
            }
            Command::Leaderboard => {
                let top = self.session.leaderboard().top(LEADERBOARD_TOP);
                self.chat.say(event.platform, &leaderboard_text(&top));
            }
            Command::Guess(word) => self.handle_guess(event.platform, &event.user, &word),
        }
    }

    fn handle_guess(&mut self, platform: Platform, user: &str, word: &str) {
        match self.session.submit_guess(platform, user, word) {
            GuessOutcome::Accepted(accepted) => {
                self.broadcast(OverlayMessage::Leaderboard {
                    entries: self.session.leaderboard().top(LEADERBOARD_TOP),
                });
                self.broadcast(OverlayMessage::Win);

                if let Some(standings) = accepted.battle {
                    self.broadcast(OverlayMessage::Battle { standings });
                    self.chat.say(
                        platform,
                        &format!("🎉 {} takes the round for {}!", user, platform),
                    );
                } else {
                    self.chat
                        .say(platform, &format!("🎉 {} guessed the word correctly!", user));
                }

                self.finish_round(accepted.end);
            }
            GuessOutcome::Rejected(reason) => {
                // Wrong and out-of-round guesses get no reply.
                debug!(user, ?reason, "guess rejected");
            }
        }
    }

    fn handle_hint(&mut self, platform: Platform) {
        match self.session.request_hint() {
            HintQuery::NoActiveRound => {}
            HintQuery::AlreadyUsed => {
                self.chat
                    .say(platform, "💡 The hint for this round was already used.");
            }
            HintQuery::Lookup(word) => {
                let epoch = self.epoch;
                let definitions = self.definitions.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let definition = definitions.fetch_definition(&word).await;
                    let _ = tx.send(EngineEvent::HintReady {
                        epoch,
                        platform,
                        definition,
                    });
                });
            }
        }
    }

    fn handle_hint_ready(&mut self, epoch: u64, platform: Platform, definition: Option<String>) {
        if epoch != self.epoch {
            return;
        }
        self.session.store_hint(definition.clone());
        match definition {
            Some(text) => self.chat.say(platform, &format!("💡 Hint: {}", text)),
            None => self
                .chat
                .say(platform, "💡 No definition found for this word."),
        }
    }

    /// Kick off word selection for a new round. The fetch runs off the
    /// event loop; the round actually starts when `WordReady` comes back.
    fn start_round(&mut self) {
        self.cancel_round_tasks();
        self.epoch += 1;

        let epoch = self.epoch;
        let selector = self.selector.clone();
        let recent = self.recent.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let word = selector.select(&recent).await;
            let _ = tx.send(EngineEvent::WordReady { epoch, word });
        });
    }

    fn handle_word_ready(&mut self, epoch: u64, word: String) {
        if epoch != self.epoch || !self.session.game_active() {
            return;
        }

        // A win during the fetch gap leaves a countdown armed under this
        // epoch; the new round must not inherit it.
        self.cancel_round_tasks();

        self.recent.insert(&word);
        let schedule = self.session.begin_round(&word);

        self.broadcast(OverlayMessage::Word {
            value: self.session.display(),
        });
        self.broadcast(OverlayMessage::Winner {
            name: String::new(),
        });
        self.broadcast(OverlayMessage::Countdown { seconds: 0 });

        self.arm_round_timers(schedule);
    }

    fn arm_round_timers(&mut self, schedule: RoundSchedule) {
        let epoch = self.epoch;

        let tx = self.tx.clone();
        self.round_tasks.push(tokio::spawn(async move {
            tokio::time::sleep(schedule.first_reveal_delay).await;
            let _ = tx.send(EngineEvent::FirstReveal { epoch });
        }));

        let tx = self.tx.clone();
        self.round_tasks.push(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + schedule.reveal_interval;
            let mut ticker = tokio::time::interval_at(start, schedule.reveal_interval);
            loop {
                ticker.tick().await;
                if tx.send(EngineEvent::RevealTick { epoch }).is_err() {
                    break;
                }
            }
        }));

        let tx = self.tx.clone();
        self.round_tasks.push(tokio::spawn(async move {
            tokio::time::sleep(schedule.round_duration).await;
            let _ = tx.send(EngineEvent::RoundTimeout { epoch });
        }));
    }

    fn handle_reveal(&mut self, epoch: u64) {
        if epoch != self.epoch {
            return;
        }
        match self.session.reveal_tick() {
            TickOutcome::Revealed(display) => {
                self.broadcast(OverlayMessage::Word { value: display });
            }
            TickOutcome::Finished(end) => self.finish_round(end),
            TickOutcome::Stale => {}
        }
    }

    fn handle_timeout(&mut self, epoch: u64) {
        if epoch != self.epoch {
            return;
        }
        if let Some(end) = self.session.time_out() {
            info!("round timed out");
            self.finish_round(end);
        }
    }

    /// Shared end-of-round path: cancel the round's timers, show the full
    /// word and the winner, then count down to the next round.
    fn finish_round(&mut self, end: RoundEnd) {
        self.cancel_round_tasks();

        self.broadcast(OverlayMessage::Word {
            value: end.word.clone(),
        });
        if let Some(winner) = &end.winner {
            self.broadcast(OverlayMessage::Winner {
                name: winner.user.clone(),
            });
        }

        let seconds = self.session.timing().post_round_delay.as_secs() as u32;
        self.broadcast(OverlayMessage::Countdown { seconds });

        let epoch = self.epoch;
        let tx = self.tx.clone();
        self.countdown_task = Some(tokio::spawn(async move {
            let mut remaining = seconds;
            while remaining > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                if tx
                    .send(EngineEvent::CountdownTick { epoch, remaining })
                    .is_err()
                {
                    return;
                }
            }
        }));
    }

    fn handle_countdown(&mut self, epoch: u64, remaining: u32) {
        if epoch != self.epoch {
            return;
        }
        self.broadcast(OverlayMessage::Countdown { seconds: remaining });

        if remaining == 0 && self.session.game_active() {
            self.start_round();
        }
    }

    fn stop_game(&mut self, platform: Platform) {
        self.cancel_round_tasks();
        // Also invalidates any in-flight word selection or hint lookup.
        self.epoch += 1;
        self.session.stop();

        self.broadcast(OverlayMessage::Word {
            value: self.session.display(),
        });
        self.broadcast(OverlayMessage::Winner {
            name: String::new(),
        });
        self.broadcast(OverlayMessage::Countdown { seconds: 0 });

        self.chat.say(platform, "🛑 Word game ended.");
    }

    fn broadcast_scores(&self) {
        self.broadcast(OverlayMessage::Leaderboard {
            entries: self.session.leaderboard().top(LEADERBOARD_TOP),
        });
        if let Some(standings) = self.session.battle_standings() {
            self.broadcast(OverlayMessage::Battle { standings });
        }
    }

    fn broadcast(&self, message: OverlayMessage) {
        self.overlay.broadcast(message);
    }

    fn cancel_round_tasks(&mut self) {
        for task in self.round_tasks.drain(..) {
            task.abort();
        }
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
    }
}
