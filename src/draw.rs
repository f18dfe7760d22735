use crate::bracket::Bracket;
use crate::error::{DrawError, Result};
use crate::seeding::{build_slots, next_power_of_two, Shuffler};
use crate::types::{Competitor, DrawForm};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Parsed generation request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawRequest {
  pub title: String,
  pub seed_count: usize,
  pub seeded: Vec<String>,
  pub unseeded: Vec<String>,
}

impl DrawRequest {
  /// Reads the raw form fields. A blank title falls back to `default_title`;
  /// an unparsable seed count reads as zero.
  pub fn from_form(form: &DrawForm, default_title: &str) -> Self {
    let title = form.title.trim();
    DrawRequest {
      title: if title.is_empty() {
        default_title.to_string()
      } else {
        title.to_string()
      },
      seed_count: form.num_seeds.trim().parse::<usize>().unwrap_or(0),
      seeded: parse_name_list(&form.seeded_players),
      unseeded: parse_name_list(&form.unseeded_players),
    }
  }

  pub fn competitor_count(&self) -> usize {
    self.seeded.len() + self.unseeded.len()
  }

  pub fn validate(&self) -> Result<()> {
    if self.seeded.len() != self.seed_count {
      return Err(DrawError::Configuration {
        expected: self.seed_count,
        found: self.seeded.len(),
      });
    }
    if self.competitor_count() == 0 {
      return Err(DrawError::NoCompetitors);
    }
    Ok(())
  }
}

/// One name per line, trimmed, blank lines dropped.
pub fn parse_name_list(raw: &str) -> Vec<String> {
  raw
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}

/// Name to 1-based seed rank. Only real competitors are ever ranked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedIndex {
  ranks: HashMap<String, usize>,
}

impl SeedIndex {
  pub fn new(seeded: &[String]) -> Self {
    let mut ranks = HashMap::new();
    for (idx, name) in seeded.iter().enumerate() {
      ranks.entry(name.clone()).or_insert(idx + 1);
    }
    SeedIndex { ranks }
  }

  pub fn rank_of(&self, competitor: &Competitor) -> Option<usize> {
    match competitor {
      Competitor::Real(name) => self.ranks.get(name).copied(),
      Competitor::Bye | Competitor::Tbd | Competitor::UnknownChampion => None,
    }
  }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draw {
  pub title: String,
  pub seeded: Vec<String>,
  pub total_slots: usize,
  pub generated_at: DateTime<Utc>,
  pub bracket: Bracket,
  #[serde(skip)]
  seeds: SeedIndex,
}

impl Draw {
  /// Validates the request and lays out a fresh bracket. Nothing is built
  /// when validation fails.
  pub fn generate(request: DrawRequest, shuffler: &mut dyn Shuffler) -> Result<Self> {
    request.validate()?;
    let total_slots = next_power_of_two(request.competitor_count());
    let slots = build_slots(
      &request.seeded,
      &request.unseeded,
      request.seed_count,
      total_slots,
      shuffler,
    )?;
    tracing::info!(
      title = %request.title,
      competitors = request.competitor_count(),
      total_slots,
      "draw generated"
    );
    Ok(Draw {
      title: request.title,
      seeds: SeedIndex::new(&request.seeded),
      seeded: request.seeded,
      total_slots,
      generated_at: Utc::now(),
      bracket: Bracket::build(slots),
    })
  }

  pub fn seeds(&self) -> &SeedIndex {
    &self.seeds
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeding::{NoShuffle, ThreadShuffler};
  use crate::types::Side;

  fn form(num_seeds: &str, seeded: &str, unseeded: &str) -> DrawForm {
    DrawForm {
      title: "BITS Open".to_string(),
      num_seeds: num_seeds.to_string(),
      seeded_players: seeded.to_string(),
      unseeded_players: unseeded.to_string(),
    }
  }

  #[test]
  fn test_parse_name_list() {
    assert_eq!(
      parse_name_list("  Alice \n\n Bob\r\n   \nCarol"),
      vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()]
    );
    assert!(parse_name_list("").is_empty());
  }

  #[test]
  fn test_from_form_defaults() {
    let mut raw = form("abc", "", "A\nB");
    raw.title = "   ".to_string();
    let request = DrawRequest::from_form(&raw, "Tournament Draw");
    assert_eq!(request.title, "Tournament Draw");
    assert_eq!(request.seed_count, 0);
    assert_eq!(request.unseeded, vec!["A".to_string(), "B".to_string()]);
  }

  #[test]
  fn test_generate_sizes_bracket() {
    let request = DrawRequest::from_form(&form("2", "A\nB", "C\nD\nE"), "x");
    let draw = Draw::generate(request, &mut ThreadShuffler).unwrap();
    assert_eq!(draw.total_slots, 8);
    assert_eq!(draw.bracket.round_sizes(), vec![4, 2, 1, 1]);
    assert_eq!(draw.bracket.rounds()[0][0].p1, Competitor::named("A"));
    assert_eq!(draw.bracket.rounds()[0][3].p2, Some(Competitor::named("B")));
  }

  #[test]
  fn test_bye_side_cannot_be_toggled() {
    let request = DrawRequest::from_form(&form("2", "A\nB", "C\nD\nE"), "x");
    let mut draw = Draw::generate(request, &mut NoShuffle).unwrap();
    // With the pool unshuffled, slot 6 (match 3, side one) is a BYE.
    assert_eq!(draw.bracket.rounds()[0][3].p1, Competitor::Bye);
    let before = draw.bracket.clone();
    draw.bracket.record_or_toggle_winner(0, 3, Side::One).unwrap();
    assert_eq!(draw.bracket, before);
  }

  #[test]
  fn test_seed_mismatch_is_configuration_error() {
    let request = DrawRequest::from_form(&form("3", "A\nB", "C"), "x");
    let err = Draw::generate(request, &mut NoShuffle).unwrap_err();
    assert_eq!(err, DrawError::Configuration { expected: 3, found: 2 });
    assert_eq!(
      err.to_string(),
      "Configuration Error: Expected 3 seeds, but found 2 names."
    );
  }

  #[test]
  fn test_empty_draw_rejected() {
    let request = DrawRequest::from_form(&form("0", "", "\n \n"), "x");
    assert_eq!(
      Draw::generate(request, &mut NoShuffle).unwrap_err(),
      DrawError::NoCompetitors
    );
  }

  #[test]
  fn test_single_competitor_gets_bye() {
    let request = DrawRequest::from_form(&form("0", "", "Solo"), "x");
    let draw = Draw::generate(request, &mut NoShuffle).unwrap();
    assert_eq!(draw.total_slots, 2);
    assert_eq!(draw.bracket.rounds()[0][0].p1, Competitor::named("Solo"));
    assert_eq!(draw.bracket.rounds()[0][0].p2, Some(Competitor::Bye));
  }

  #[test]
  fn test_seed_index_ignores_sentinels() {
    let index = SeedIndex::new(&["A".to_string(), "B".to_string(), "A".to_string()]);
    assert_eq!(index.rank_of(&Competitor::named("A")), Some(1));
    assert_eq!(index.rank_of(&Competitor::named("B")), Some(2));
    assert_eq!(index.rank_of(&Competitor::named("C")), None);
    assert_eq!(index.rank_of(&Competitor::Bye), None);
    assert_eq!(index.rank_of(&Competitor::Tbd), None);
    assert_eq!(index.rank_of(&Competitor::UnknownChampion), None);
  }
}
