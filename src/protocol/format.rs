//! Text formatting for protocol responses.
//!
//! Every response is a single line starting with a keyword, so a front-end
//! can dispatch on the first token:
//!
//! - `event reinforced <t> <player>`
//! - `event battle <from> <to> attacker <rolls> defender <rolls> losses <a> <d>`
//! - `event captured <t> <player>`
//! - `event fortified <from> <to>`
//! - `event phase <player> <phase>`
//! - `event gameover <player>`
//! - `state ...`, `territory ...`, `selection ...` from `show`

use std::io::{self, Write};

use crate::board::Territory;
use crate::engine::{MatchEngine, MatchEvent};
use crate::resolve::Dice;
use crate::selection::{AttackSelection, FortifySelection};

/// Joins values with commas, or `-` when empty.
pub fn join_list<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats one event as a protocol line (without the newline).
pub fn format_event(event: &MatchEvent) -> String {
    match event {
        MatchEvent::TerritoryReinforced { territory, player } => {
            format!("event reinforced {} {}", territory, player.name())
        }
        MatchEvent::BattleResolved { from, to, report } => format!(
            "event battle {} {} attacker {} defender {} losses {} {}",
            from,
            to,
            join_list(&report.attacker_rolls),
            join_list(&report.defender_rolls),
            report.attacker_losses,
            report.defender_losses
        ),
        MatchEvent::TerritoryCaptured {
            territory, player, ..
        } => format!("event captured {} {}", territory, player.name()),
        MatchEvent::ArmyFortified { from, to } => format!("event fortified {} {}", from, to),
        MatchEvent::PhaseChanged { player, phase } => {
            format!("event phase {} {}", player.name(), phase.name())
        }
        MatchEvent::GameOver { winner } => format!("event gameover {}", winner.name()),
    }
}

fn format_territory(idx: usize, t: &Territory) -> String {
    let owner = t.owner.map_or("none", |p| p.name());
    format!(
        "territory {} owner {} armies {} neighbors {} name {}",
        idx,
        owner,
        t.armies,
        join_list(t.neighbors()),
        t.name
    )
}

fn format_selection(attack: AttackSelection, fortify: FortifySelection) -> String {
    let attack = match attack {
        AttackSelection::Idle => "-".to_string(),
        AttackSelection::SourceChosen(from) => from.to_string(),
    };
    let fortify = match fortify {
        FortifySelection::Idle => "-".to_string(),
        FortifySelection::SourceChosen(from) => from.to_string(),
        FortifySelection::Moved { from, to } => format!("{}>{}", from, to),
    };
    format!("selection attack {} fortify {}", attack, fortify)
}

/// Writes the full match state, terminated by a `stateok` line.
pub fn write_state<W: Write, D: Dice>(engine: &MatchEngine<D>, out: &mut W) -> io::Result<()> {
    let winner = engine.winner().map_or("none", |p| p.name());
    writeln!(
        out,
        "state turn {} player {} phase {} reinforcements {} winner {}",
        engine.turn(),
        engine.current_player().name(),
        engine.phase_name(),
        engine.reinforcements_left(),
        winner
    )?;
    for (i, t) in engine.board().territories().iter().enumerate() {
        writeln!(out, "{}", format_territory(i, t))?;
    }
    writeln!(
        out,
        "{}",
        format_selection(engine.attack_selection(), engine.fortify_selection())
    )?;
    writeln!(out, "stateok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player};
    use crate::config::MatchConfig;
    use crate::resolve::{BattleReport, Phase, ScriptedDice};

    #[test]
    fn join_list_formats() {
        assert_eq!(join_list::<u8>(&[]), "-");
        assert_eq!(join_list(&[6u8, 3, 1]), "6,3,1");
    }

    #[test]
    fn event_lines() {
        let battle = MatchEvent::BattleResolved {
            from: 0,
            to: 1,
            report: BattleReport {
                attacker_rolls: vec![6, 2],
                defender_rolls: vec![5],
                attacker_losses: 0,
                defender_losses: 1,
            },
        };
        assert_eq!(
            format_event(&battle),
            "event battle 0 1 attacker 6,2 defender 5 losses 0 1"
        );
        assert_eq!(
            format_event(&MatchEvent::TerritoryCaptured {
                territory: 1,
                player: Player::First,
                previous_owner: Some(Player::Second),
            }),
            "event captured 1 first"
        );
        assert_eq!(
            format_event(&MatchEvent::PhaseChanged {
                player: Player::Second,
                phase: Phase::Reinforce,
            }),
            "event phase second Reinforce"
        );
        assert_eq!(
            format_event(&MatchEvent::GameOver {
                winner: Player::Second
            }),
            "event gameover second"
        );
    }

    #[test]
    fn state_dump_lists_every_territory() {
        let engine =
            MatchEngine::with_dice(Board::world(), MatchConfig::default(), ScriptedDice::default());
        let mut out = Vec::new();
        write_state(&engine, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "state turn 1 player first phase Reinforce reinforcements 3 winner none"
        );
        assert_eq!(lines.iter().filter(|l| l.starts_with("territory ")).count(), 14);
        assert_eq!(
            lines[1],
            "territory 0 owner first armies 3 neighbors 1,2 name North America North-West"
        );
        assert_eq!(lines[15], "selection attack - fortify -");
        assert_eq!(lines[16], "stateok");
    }

    #[test]
    fn moved_fortify_selection_format() {
        assert_eq!(
            format_selection(
                AttackSelection::SourceChosen(3),
                FortifySelection::Moved { from: 0, to: 2 }
            ),
            "selection attack 3 fortify 0>2"
        );
    }
}
