//! Dice battle resolution.
//!
//! A battle rolls up to `max_attack_dice` for the attacker (never more than
//! its armies minus one) and up to `max_defense_dice` for the defender (never
//! more than its armies). Both sides are sorted descending and compared pair
//! by pair, highest first; the attacker must roll strictly higher to win a
//! pair, so ties go to the defender. Each lost pair costs the loser one army.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::MatchConfig;

/// Number of faces on a die.
pub const DIE_FACES: u8 = 6;

/// A source of fair six-sided die rolls.
pub trait Dice {
    /// Rolls one die, returning a face in `1..=6`.
    fn roll(&mut self) -> u8;
}

impl<R: Rng + ?Sized> Dice for R {
    fn roll(&mut self) -> u8 {
        self.gen_range(1..=DIE_FACES)
    }
}

/// Replays a fixed sequence of faces. Used to make battles deterministic.
///
/// Faces outside `1..=6` are clamped into range. Once the script runs out,
/// every roll returns 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        ScriptedDice {
            faces: faces.into_iter().map(|f| f.clamp(1, DIE_FACES)).collect(),
        }
    }

    /// Appends more faces to the end of the script.
    pub fn extend(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces
            .extend(faces.into_iter().map(|f| f.clamp(1, DIE_FACES)));
    }

    /// Returns how many scripted faces are left.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> u8 {
        self.faces.pop_front().unwrap_or(1)
    }
}

/// The rolls and casualties of one battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    /// Attacker rolls, highest first.
    pub attacker_rolls: Vec<u8>,
    /// Defender rolls, highest first.
    pub defender_rolls: Vec<u8>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

impl BattleReport {
    /// Number of pairs that were actually compared.
    pub fn pairs_compared(&self) -> u32 {
        self.attacker_losses + self.defender_losses
    }
}

/// Dice the attacker may roll with `armies` on the source territory.
pub fn attack_dice(armies: u32, max: u32) -> u32 {
    max.min(armies.saturating_sub(1))
}

/// Dice the defender may roll with `armies` on the target territory.
pub fn defense_dice(armies: u32, max: u32) -> u32 {
    max.min(armies)
}

fn roll_sorted(count: u32, dice: &mut impl Dice) -> Vec<u8> {
    let mut rolls: Vec<u8> = (0..count).map(|_| dice.roll()).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Resolves one battle between `attacker` and `defender` armies.
///
/// Returns None without rolling when either side has no dice to throw
/// (attacker below 2 armies, or an empty defender). Attacker dice are rolled
/// before defender dice. Comparison stops once the defender is wiped out or
/// the attacker is down to its last army, so losses never exceed what each
/// side can pay.
pub fn resolve_battle(
    attacker: u32,
    defender: u32,
    config: &MatchConfig,
    dice: &mut impl Dice,
) -> Option<BattleReport> {
    let a_dice = attack_dice(attacker, config.max_attack_dice);
    if a_dice < 1 {
        return None;
    }
    let d_dice = defense_dice(defender, config.max_defense_dice);
    if d_dice < 1 {
        return None;
    }

    let attacker_rolls = roll_sorted(a_dice, dice);
    let defender_rolls = roll_sorted(d_dice, dice);

    let mut attacker_left = attacker;
    let mut defender_left = defender;
    for (a, d) in attacker_rolls.iter().zip(&defender_rolls) {
        if a > d {
            defender_left -= 1;
        } else {
            attacker_left -= 1;
        }
        if defender_left == 0 || attacker_left <= 1 {
            break;
        }
    }

    Some(BattleReport {
        attacker_rolls,
        defender_rolls,
        attacker_losses: attacker - attacker_left,
        defender_losses: defender - defender_left,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rules() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn dice_counts_follow_army_limits() {
        assert_eq!(attack_dice(1, 3), 0);
        assert_eq!(attack_dice(2, 3), 1);
        assert_eq!(attack_dice(4, 3), 3);
        assert_eq!(attack_dice(10, 3), 3);
        assert_eq!(defense_dice(0, 2), 0);
        assert_eq!(defense_dice(1, 2), 1);
        assert_eq!(defense_dice(5, 2), 2);
    }

    #[test]
    fn single_die_attacker_wins() {
        let mut dice = ScriptedDice::new([6, 1]);
        let report = resolve_battle(2, 1, &rules(), &mut dice).unwrap();
        assert_eq!(report.attacker_rolls, vec![6]);
        assert_eq!(report.defender_rolls, vec![1]);
        assert_eq!(report.attacker_losses, 0);
        assert_eq!(report.defender_losses, 1);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn tie_goes_to_defender() {
        let mut dice = ScriptedDice::new([3, 3]);
        let report = resolve_battle(2, 1, &rules(), &mut dice).unwrap();
        assert_eq!(report.attacker_losses, 1);
        assert_eq!(report.defender_losses, 0);
    }

    #[test]
    fn rolls_are_sorted_and_compared_highest_first() {
        // Attacker 2, 5, 4 -> 5, 4, 2. Defender 4, 6 -> 6, 4.
        // 5 vs 6: attacker loses. 4 vs 4: tie, attacker loses.
        let mut dice = ScriptedDice::new([2, 5, 4, 4, 6]);
        let report = resolve_battle(10, 5, &rules(), &mut dice).unwrap();
        assert_eq!(report.attacker_rolls, vec![5, 4, 2]);
        assert_eq!(report.defender_rolls, vec![6, 4]);
        assert_eq!(report.attacker_losses, 2);
        assert_eq!(report.defender_losses, 0);
        assert_eq!(report.pairs_compared(), 2);
    }

    #[test]
    fn split_result() {
        // Attacker 6, 1 vs defender 5, 2: one loss each.
        let mut dice = ScriptedDice::new([6, 1, 5, 2]);
        let report = resolve_battle(3, 4, &rules(), &mut dice).unwrap();
        assert_eq!(report.attacker_losses, 1);
        assert_eq!(report.defender_losses, 1);
    }

    #[test]
    fn stops_when_defender_is_wiped_out() {
        // Defender has one army and rolls one die: only one pair exists.
        let mut dice = ScriptedDice::new([6, 6, 6, 1]);
        let report = resolve_battle(4, 1, &rules(), &mut dice).unwrap();
        assert_eq!(report.defender_rolls.len(), 1);
        assert_eq!(report.defender_losses, 1);
        assert_eq!(report.attacker_losses, 0);
    }

    #[test]
    fn too_few_attackers_does_not_roll() {
        let mut dice = ScriptedDice::new([6, 6]);
        assert!(resolve_battle(1, 3, &rules(), &mut dice).is_none());
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn empty_defender_does_not_roll() {
        let mut dice = ScriptedDice::new([6, 6]);
        assert!(resolve_battle(5, 0, &rules(), &mut dice).is_none());
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn custom_dice_limits_apply() {
        let config = MatchConfig {
            max_attack_dice: 1,
            max_defense_dice: 1,
            ..MatchConfig::default()
        };
        let mut dice = ScriptedDice::new([6, 1]);
        let report = resolve_battle(10, 10, &config, &mut dice).unwrap();
        assert_eq!(report.attacker_rolls.len(), 1);
        assert_eq!(report.defender_rolls.len(), 1);
    }

    #[test]
    fn losses_never_exceed_what_each_side_can_pay() {
        let mut rng = SmallRng::seed_from_u64(7);
        for attacker in 2..8u32 {
            for defender in 1..6u32 {
                for _ in 0..200 {
                    let report = resolve_battle(attacker, defender, &rules(), &mut rng).unwrap();
                    assert!(report.attacker_losses < attacker);
                    assert!(report.defender_losses <= defender);
                    assert!(report.pairs_compared() >= 1);
                    let max_pairs = attack_dice(attacker, 3).min(defense_dice(defender, 2));
                    assert!(report.pairs_compared() <= max_pairs);
                }
            }
        }
    }

    #[test]
    fn rng_rolls_stay_on_the_die() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let face = rng.roll();
            assert!((1..=DIE_FACES).contains(&face));
        }
    }

    #[test]
    fn scripted_dice_clamp_and_exhaust() {
        let mut dice = ScriptedDice::new([0, 9]);
        dice.extend([4]);
        assert_eq!(dice.roll(), 1);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 4);
        assert_eq!(dice.remaining(), 0);
        assert_eq!(dice.roll(), 1);
    }
}
