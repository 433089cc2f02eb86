//! Match engine.
//!
//! Owns the whole state of one match: the board, whose turn it is, the
//! current phase and reinforcement budget, the pending selections, and the
//! dice. Every command validates against the current phase, ownership, and
//! adjacency before touching anything, so a rejected command leaves the
//! match exactly as it was. The win check runs after every accepted command.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::board::{Board, Player, Territory};
use crate::config::MatchConfig;
use crate::resolve::{can_leave, resolve_battle, winner, BattleReport, Dice, Phase};
use crate::selection::{AttackSelection, FortifySelection};

/// Why a command was refused. The match state is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,

    #[error("command needs the {expected} phase, but it is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("no territory {0}")]
    UnknownTerritory(usize),

    #[error("territory {0} is not yours")]
    NotOwned(usize),

    #[error("territory {0} is already yours")]
    OwnTerritory(usize),

    #[error("territory {to} does not border {from}")]
    NotAdjacent { from: usize, to: usize },

    #[error("territory {0} needs at least 2 armies")]
    InsufficientArmies(usize),

    #[error("territory {0} has no armies to fight")]
    EmptyTerritory(usize),

    #[error("no reinforcements left this turn")]
    NoReinforcementsLeft,

    #[error("{0} reinforcements still to place")]
    ReinforcementsRemaining(u32),

    #[error("no source territory selected")]
    NoSourceSelected,

    #[error("already fortified this turn")]
    AlreadyFortified,
}

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    TerritoryReinforced {
        territory: usize,
        player: Player,
    },
    BattleResolved {
        from: usize,
        to: usize,
        report: BattleReport,
    },
    TerritoryCaptured {
        territory: usize,
        player: Player,
        previous_owner: Option<Player>,
    },
    ArmyFortified {
        from: usize,
        to: usize,
    },
    PhaseChanged {
        player: Player,
        phase: Phase,
    },
    GameOver {
        winner: Player,
    },
}

/// Result of an accepted attack target selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub report: BattleReport,
    pub captured: bool,
}

/// A single two-player match.
///
/// Accepted commands append to an event queue that is never trimmed by the
/// engine. Callers that run long matches must empty it with `drain_events`.
#[derive(Debug, Clone)]
pub struct MatchEngine<D = SmallRng> {
    board: Board,
    config: MatchConfig,
    current_player: Player,
    phase: Phase,
    reinforcements_left: u32,
    winner: Option<Player>,
    attack: AttackSelection,
    fortify: FortifySelection,
    turn: u32,
    events: Vec<MatchEvent>,
    dice: D,
}

impl MatchEngine<SmallRng> {
    /// Creates a match with entropy-seeded dice.
    pub fn new(board: Board, config: MatchConfig) -> Self {
        Self::with_dice(board, config, SmallRng::from_entropy())
    }

    /// Creates a match whose dice are seeded from `seed`.
    pub fn seeded(board: Board, config: MatchConfig, seed: u64) -> Self {
        Self::with_dice(board, config, SmallRng::seed_from_u64(seed))
    }
}

impl<D: Dice> MatchEngine<D> {
    /// Creates a match with the given dice. The first player opens in the
    /// Reinforce phase with a full budget.
    pub fn with_dice(board: Board, config: MatchConfig, dice: D) -> Self {
        MatchEngine {
            board,
            reinforcements_left: config.reinforcements_per_turn,
            config,
            current_player: Player::First,
            phase: Phase::Reinforce,
            winner: None,
            attack: AttackSelection::Idle,
            fortify: FortifySelection::Idle,
            turn: 1,
            events: Vec::new(),
            dice,
        }
    }

    // ---- queries ----

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the human-readable label of the current phase.
    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn reinforcements_left(&self) -> u32 {
        self.reinforcements_left
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn attack_selection(&self) -> AttackSelection {
        self.attack
    }

    pub fn fortify_selection(&self) -> FortifySelection {
        self.fortify
    }

    /// Returns true once this turn's fortify move has been made.
    pub fn fortify_done(&self) -> bool {
        self.fortify.is_done()
    }

    /// Turn number, starting at 1 and increasing every time the turn passes.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Removes and returns all pending events.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Gives access to the dice, e.g. to extend a scripted sequence.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    // ---- commands ----

    /// Places one reinforcement army on a territory of the current player.
    pub fn place_reinforcement(&mut self, territory: usize) -> Result<(), Rejection> {
        self.try_place_reinforcement(territory)
            .inspect_err(|r| debug!(territory, reason = %r, "reinforcement rejected"))
    }

    /// Selects the territory to attack from. Replaces any earlier source.
    pub fn select_attack_source(&mut self, territory: usize) -> Result<(), Rejection> {
        self.try_select_attack_source(territory)
            .inspect_err(|r| debug!(territory, reason = %r, "attack source rejected"))
    }

    /// Selects the territory to attack and resolves the battle immediately.
    ///
    /// The source stays selected afterwards, so the same territory can keep
    /// attacking without being selected again.
    pub fn select_attack_target(&mut self, territory: usize) -> Result<AttackOutcome, Rejection> {
        self.try_select_attack_target(territory)
            .inspect_err(|r| debug!(territory, reason = %r, "attack target rejected"))
    }

    /// Selects the territory to move an army out of.
    pub fn select_fortify_source(&mut self, territory: usize) -> Result<(), Rejection> {
        self.try_select_fortify_source(territory)
            .inspect_err(|r| debug!(territory, reason = %r, "fortify source rejected"))
    }

    /// Selects the destination and moves exactly one army. Once per turn.
    pub fn select_fortify_target(&mut self, territory: usize) -> Result<(), Rejection> {
        self.try_select_fortify_target(territory)
            .inspect_err(|r| debug!(territory, reason = %r, "fortify target rejected"))
    }

    /// Moves to the next phase, passing the turn after Fortify.
    pub fn advance_phase(&mut self) -> Result<Phase, Rejection> {
        self.try_advance_phase()
            .inspect_err(|r| debug!(reason = %r, "phase advance rejected"))
    }

    // ---- validation helpers ----

    fn require_phase(&self, expected: Phase) -> Result<(), Rejection> {
        if self.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if self.phase != expected {
            return Err(Rejection::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn territory(&self, idx: usize) -> Result<&Territory, Rejection> {
        self.board
            .territory(idx)
            .ok_or(Rejection::UnknownTerritory(idx))
    }

    /// Checks that `idx` belongs to the current player and can spare an army.
    fn require_mobile_source(&self, idx: usize) -> Result<(), Rejection> {
        let t = self.territory(idx)?;
        if !t.is_owned_by(self.current_player) {
            return Err(Rejection::NotOwned(idx));
        }
        if t.armies < 2 {
            return Err(Rejection::InsufficientArmies(idx));
        }
        Ok(())
    }

    fn add_armies(&mut self, idx: usize, delta: i64) {
        if let Some(t) = self.board.territory_mut(idx) {
            t.armies = (i64::from(t.armies) + delta).max(0) as u32;
        }
    }

    // ---- command bodies ----

    fn try_place_reinforcement(&mut self, idx: usize) -> Result<(), Rejection> {
        self.require_phase(Phase::Reinforce)?;
        if self.reinforcements_left == 0 {
            return Err(Rejection::NoReinforcementsLeft);
        }
        if !self.territory(idx)?.is_owned_by(self.current_player) {
            return Err(Rejection::NotOwned(idx));
        }

        self.add_armies(idx, 1);
        self.reinforcements_left -= 1;
        debug!(
            territory = idx,
            player = self.current_player.name(),
            left = self.reinforcements_left,
            "reinforcement placed"
        );
        self.events.push(MatchEvent::TerritoryReinforced {
            territory: idx,
            player: self.current_player,
        });
        self.check_win();
        Ok(())
    }

    fn try_select_attack_source(&mut self, idx: usize) -> Result<(), Rejection> {
        self.require_phase(Phase::Attack)?;
        self.require_mobile_source(idx)?;
        self.attack = AttackSelection::SourceChosen(idx);
        debug!(territory = idx, "attack source selected");
        Ok(())
    }

    fn try_select_attack_target(&mut self, to: usize) -> Result<AttackOutcome, Rejection> {
        self.require_phase(Phase::Attack)?;
        let from = self.attack.source().ok_or(Rejection::NoSourceSelected)?;
        let target = self.territory(to)?;
        if !self.board.is_adjacent(from, to) {
            return Err(Rejection::NotAdjacent { from, to });
        }
        if target.is_owned_by(self.current_player) {
            return Err(Rejection::OwnTerritory(to));
        }
        let defender_armies = target.armies;
        let previous_owner = target.owner;
        self.require_mobile_source(from)?;
        let attacker_armies = self.territory(from)?.armies;

        let report = resolve_battle(attacker_armies, defender_armies, &self.config, &mut self.dice)
            .ok_or(Rejection::EmptyTerritory(to))?;
        trace!(
            attacker = ?report.attacker_rolls,
            defender = ?report.defender_rolls,
            "dice rolled"
        );

        self.add_armies(from, -i64::from(report.attacker_losses));
        self.add_armies(to, -i64::from(report.defender_losses));
        debug!(
            from,
            to,
            attacker_losses = report.attacker_losses,
            defender_losses = report.defender_losses,
            "battle resolved"
        );
        self.events.push(MatchEvent::BattleResolved {
            from,
            to,
            report: report.clone(),
        });

        let captured = self.board.armies(to) == Some(0);
        if captured {
            if let Some(t) = self.board.territory_mut(to) {
                t.owner = Some(self.current_player);
                t.armies = 1;
            }
            self.add_armies(from, -1);
            info!(
                territory = to,
                player = self.current_player.name(),
                "territory captured"
            );
            self.events.push(MatchEvent::TerritoryCaptured {
                territory: to,
                player: self.current_player,
                previous_owner,
            });
        }

        self.check_win();
        Ok(AttackOutcome { report, captured })
    }

    fn try_select_fortify_source(&mut self, idx: usize) -> Result<(), Rejection> {
        self.require_phase(Phase::Fortify)?;
        if self.fortify.is_done() {
            return Err(Rejection::AlreadyFortified);
        }
        self.require_mobile_source(idx)?;
        self.fortify = FortifySelection::SourceChosen(idx);
        debug!(territory = idx, "fortify source selected");
        Ok(())
    }

    fn try_select_fortify_target(&mut self, to: usize) -> Result<(), Rejection> {
        self.require_phase(Phase::Fortify)?;
        if self.fortify.is_done() {
            return Err(Rejection::AlreadyFortified);
        }
        let from = self.fortify.source().ok_or(Rejection::NoSourceSelected)?;
        if !self.territory(to)?.is_owned_by(self.current_player) {
            return Err(Rejection::NotOwned(to));
        }
        if !self.board.is_adjacent(from, to) {
            return Err(Rejection::NotAdjacent { from, to });
        }
        self.require_mobile_source(from)?;

        self.add_armies(from, -1);
        self.add_armies(to, 1);
        self.fortify = FortifySelection::Moved { from, to };
        debug!(from, to, "army fortified");
        self.events.push(MatchEvent::ArmyFortified { from, to });
        self.check_win();
        Ok(())
    }

    fn try_advance_phase(&mut self) -> Result<Phase, Rejection> {
        if self.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if !can_leave(self.phase, self.reinforcements_left) {
            return Err(Rejection::ReinforcementsRemaining(self.reinforcements_left));
        }

        let ends_turn = self.phase.ends_turn();
        self.phase = self.phase.next();
        match self.phase {
            Phase::Attack => {
                self.attack = AttackSelection::Idle;
            }
            Phase::Fortify => {
                self.fortify = FortifySelection::Idle;
            }
            Phase::Reinforce => {
                self.attack = AttackSelection::Idle;
                self.fortify = FortifySelection::Idle;
            }
        }
        if ends_turn {
            self.current_player = self.current_player.opponent();
            self.reinforcements_left = self.config.reinforcements_per_turn;
            self.turn += 1;
        }

        debug!(
            player = self.current_player.name(),
            phase = self.phase.name(),
            turn = self.turn,
            "phase changed"
        );
        self.events.push(MatchEvent::PhaseChanged {
            player: self.current_player,
            phase: self.phase,
        });
        self.check_win();
        Ok(self.phase)
    }

    /// Records the winner the first time the win condition holds. Never
    /// clears a winner once set.
    fn check_win(&mut self) {
        if self.winner.is_some() {
            return;
        }
        if let Some(w) = winner(&self.board, &self.config) {
            self.winner = Some(w);
            info!(winner = w.name(), turn = self.turn, "game over");
            self.events.push(MatchEvent::GameOver { winner: w });
        }
    }
}
