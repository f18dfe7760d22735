use crate::error::{DrawError, Result};
use crate::types::{Competitor, Side};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
  pub p1: Competitor,
  /// Absent only on the champion entry.
  pub p2: Option<Competitor>,
  pub winner: Option<Competitor>,
  /// Free-form score text per side; absent on the champion entry.
  pub scores: Option<[String; 2]>,
}

impl Match {
  fn pairing(p1: Competitor, p2: Competitor) -> Self {
    Match {
      p1,
      p2: Some(p2),
      winner: None,
      scores: Some([String::new(), String::new()]),
    }
  }

  fn champion() -> Self {
    Match {
      p1: Competitor::Tbd,
      p2: None,
      winner: None,
      scores: None,
    }
  }

  pub fn is_champion(&self) -> bool {
    self.p2.is_none()
  }

  pub fn occupant(&self, side: Side) -> Option<&Competitor> {
    match side {
      Side::One => Some(&self.p1),
      Side::Two => self.p2.as_ref(),
    }
  }

  fn slot_mut(&mut self, side: Side) -> Option<&mut Competitor> {
    match side {
      Side::One => Some(&mut self.p1),
      Side::Two => self.p2.as_mut(),
    }
  }

  pub fn is_winner(&self, side: Side) -> bool {
    match (self.occupant(side), self.winner.as_ref()) {
      (Some(occupant), Some(winner)) => occupant == winner,
      _ => false,
    }
  }
}

pub type Round = Vec<Match>;

/// Single-elimination bracket. The last round is the champion entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
  rounds: Vec<Round>,
}

impl Bracket {
  /// Pairs consecutive slots into the first round and lays out empty later
  /// rounds down to the final, then the champion entry.
  pub fn build(slots: Vec<Competitor>) -> Self {
    let mut rounds = Vec::new();
    let mut iter = slots.into_iter();
    let mut first = Vec::new();
    while let Some(p1) = iter.next() {
      let p2 = iter.next().unwrap_or(Competitor::Bye);
      first.push(Match::pairing(p1, p2));
    }
    let mut count = first.len();
    rounds.push(first);
    while count > 1 {
      count /= 2;
      rounds.push(
        (0..count)
          .map(|_| Match::pairing(Competitor::Tbd, Competitor::Tbd))
          .collect(),
      );
    }
    rounds.push(vec![Match::champion()]);
    Bracket { rounds }
  }

  pub fn rounds(&self) -> &[Round] {
    &self.rounds
  }

  /// Match count per round, champion round included.
  pub fn round_sizes(&self) -> Vec<usize> {
    self.rounds.iter().map(|round| round.len()).collect()
  }

  pub fn champion_round(&self) -> usize {
    self.rounds.len() - 1
  }

  pub fn champion(&self) -> &Competitor {
    &self.rounds[self.champion_round()][0].p1
  }

  pub fn get(&self, round: usize, position: usize) -> Option<&Match> {
    self.rounds.get(round)?.get(position)
  }

  fn get_mut(&mut self, round: usize, position: usize) -> Result<&mut Match> {
    self
      .rounds
      .get_mut(round)
      .and_then(|r| r.get_mut(position))
      .ok_or(DrawError::MatchNotFound { round, position })
  }

  /// Records the competitor on `side` as winner, or retracts them if they
  /// already are. BYE, TBD and the champion entry are left alone.
  pub fn record_or_toggle_winner(&mut self, round: usize, position: usize, side: Side) -> Result<()> {
    let champion_round = self.champion_round();
    let current = self.get_mut(round, position)?;
    if round == champion_round {
      return Ok(());
    }
    let Some(picked) = current.occupant(side).cloned() else {
      return Ok(());
    };
    if !picked.is_real() {
      return Ok(());
    }

    let already_won = current.winner.as_ref().map(|winner| *winner == picked);
    match already_won {
      Some(true) => return self.clear_result(round, position),
      Some(false) => self.clear_result(round, position)?,
      None => {}
    }

    self.get_mut(round, position)?.winner = Some(picked.clone());
    let (next_round, next_position, next_side) = self.feed_target(round, position);
    if let Some(slot) = self.get_mut(next_round, next_position)?.slot_mut(next_side) {
      *slot = picked;
    }
    tracing::debug!(round, position, "winner recorded");
    Ok(())
  }

  /// Retracts a recorded winner and every later result that depended on it.
  pub fn clear_result(&mut self, round: usize, position: usize) -> Result<()> {
    let champion_round = self.champion_round();
    self.get_mut(round, position)?;

    let mut round = round;
    let mut position = position;
    while round < champion_round {
      let Some(previous) = self.get_mut(round, position)?.winner.take() else {
        break;
      };
      tracing::debug!(round, position, "result cleared");

      let (next_round, next_position, next_side) = self.feed_target(round, position);
      let next = self.get_mut(next_round, next_position)?;
      let Some(slot) = next.slot_mut(next_side) else {
        break;
      };
      if *slot != previous {
        break;
      }
      *slot = Competitor::Tbd;
      if next.winner.as_ref() != Some(&previous) {
        break;
      }
      round = next_round;
      position = next_position;
    }
    Ok(())
  }

  /// Stores score text for one side. The champion entry has no scores.
  pub fn set_score(&mut self, round: usize, position: usize, side: Side, score: &str) -> Result<()> {
    let current = self.get_mut(round, position)?;
    if let Some(scores) = current.scores.as_mut() {
      let index = match side {
        Side::One => 0,
        Side::Two => 1,
      };
      scores[index] = score.trim().to_string();
    }
    Ok(())
  }

  /// Where the winner of (round, position) lands. From the final the target
  /// is always the champion slot.
  fn feed_target(&self, round: usize, position: usize) -> (usize, usize, Side) {
    let next_round = round + 1;
    if next_round == self.champion_round() {
      return (next_round, 0, Side::One);
    }
    let side = if position % 2 == 0 { Side::One } else { Side::Two };
    (next_round, position / 2, side)
  }
}
