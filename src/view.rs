use crate::bracket::Match;
use crate::draw::{Draw, SeedIndex};
use crate::types::{Competitor, Side};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
  pub label: String,
  pub seed: Option<usize>,
  pub winner: bool,
  /// Clicking does nothing on BYE/TBD slots.
  pub clickable: bool,
  pub score: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
  pub round: usize,
  pub position: usize,
  pub slots: Vec<SlotView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
  pub index: usize,
  pub title: String,
  pub matches: Vec<MatchView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionView {
  pub label: String,
  pub seed: Option<usize>,
  pub decided: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawView {
  pub title: String,
  pub generated_at: DateTime<Utc>,
  pub total_slots: usize,
  pub round_sizes: Vec<usize>,
  pub rounds: Vec<RoundView>,
  pub champion: ChampionView,
}

/// "Name (rank)" for seeds, the bare label otherwise.
pub fn display_label(seeds: &SeedIndex, competitor: &Competitor) -> String {
  match seeds.rank_of(competitor) {
    Some(rank) => format!("{} ({})", competitor.label(), rank),
    None => competitor.label().to_string(),
  }
}

pub fn round_title(index: usize, round_count: usize) -> String {
  if index + 1 == round_count {
    "Champion".to_string()
  } else {
    format!("Round {}", index + 1)
  }
}

/// The champion box shows the unknown placeholder until the final is decided.
pub fn champion_display(champion: &Competitor) -> Competitor {
  match champion {
    Competitor::Tbd => Competitor::UnknownChampion,
    other => other.clone(),
  }
}

fn slot_view(seeds: &SeedIndex, m: &Match, side: Side, score: Option<&String>) -> Option<SlotView> {
  let occupant = m.occupant(side)?;
  Some(SlotView {
    label: display_label(seeds, occupant),
    seed: seeds.rank_of(occupant),
    winner: m.is_winner(side),
    clickable: occupant.is_real(),
    score: score.cloned(),
  })
}

pub fn draw_view(draw: &Draw) -> DrawView {
  let seeds = draw.seeds();
  let bracket = &draw.bracket;
  let round_count = bracket.rounds().len();
  let rounds = bracket
    .rounds()
    .iter()
    .enumerate()
    .take(bracket.champion_round())
    .map(|(index, round)| RoundView {
      index,
      title: round_title(index, round_count),
      matches: round
        .iter()
        .enumerate()
        .map(|(position, m)| {
          let scores = m.scores.as_ref();
          let slots = [Side::One, Side::Two]
            .into_iter()
            .zip([scores.map(|s| &s[0]), scores.map(|s| &s[1])])
            .filter_map(|(side, score)| slot_view(seeds, m, side, score))
            .collect();
          MatchView { round: index, position, slots }
        })
        .collect(),
    })
    .collect();

  let champion = champion_display(bracket.champion());
  DrawView {
    title: draw.title.clone(),
    generated_at: draw.generated_at,
    total_slots: draw.total_slots,
    round_sizes: bracket.round_sizes(),
    rounds,
    champion: ChampionView {
      label: display_label(seeds, &champion),
      seed: seeds.rank_of(&champion),
      decided: champion.is_real(),
    },
  }
}
