use crate::draw::Draw;
use crate::error::{DrawError, Result};
use crate::types::{Competitor, Side, DEFAULT_PAGE_GROUP_SIZE};
use crate::view::{display_label, round_title};
use serde::Serialize;
use std::{fs, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PrintSlot {
  Name { label: String, seeded: bool, winner: bool, score: String },
  /// Undecided slot, printed as a line to write on.
  Blank { score: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintMatch {
  pub position: usize,
  pub slots: [PrintSlot; 2],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintColumn {
  pub round: usize,
  pub title: String,
  pub matches: Vec<PrintMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPage {
  pub header: String,
  pub page_number: usize,
  pub total_pages: usize,
  pub footer: String,
  pub columns: Vec<PrintColumn>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
  pub title: String,
  pub file_name: String,
  pub pages: Vec<PrintPage>,
}

/// Range of matches from one round that belong on `page`. Each later round
/// covers the same bracket lines with half as many matches.
pub fn page_slice(page: usize, group_size: usize, round: usize, round_len: usize) -> (usize, usize) {
  let ratio = 1usize << round;
  let start = (page * group_size / ratio).min(round_len);
  let end = ((page + 1) * group_size / ratio).min(round_len);
  (start, end)
}

pub fn page_count(first_round_len: usize, group_size: usize) -> usize {
  let group_size = group_size.max(1);
  first_round_len.div_ceil(group_size)
}

/// Title with whitespace runs collapsed to `_`, plus the `.pdf` extension.
pub fn export_file_name(title: &str) -> String {
  let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
  format!("{stem}.pdf")
}

fn print_slot(draw: &Draw, occupant: &Competitor, winner: bool, score: String) -> PrintSlot {
  match occupant {
    Competitor::Tbd | Competitor::UnknownChampion => PrintSlot::Blank { score },
    other => PrintSlot::Name {
      label: display_label(draw.seeds(), other),
      seeded: draw.seeds().rank_of(other).is_some(),
      winner,
      score,
    },
  }
}

/// Splits the bracket into printable pages. The champion column is left out.
pub fn paginate(draw: &Draw, group_size: usize) -> Vec<PrintPage> {
  let group_size = if group_size == 0 { DEFAULT_PAGE_GROUP_SIZE } else { group_size };
  let bracket = &draw.bracket;
  let rounds = bracket.rounds();
  let total_pages = page_count(rounds[0].len(), group_size);

  (0..total_pages)
    .map(|page| {
      let columns = rounds
        .iter()
        .enumerate()
        .take(bracket.champion_round())
        .map(|(round, matches)| {
          let (start, end) = page_slice(page, group_size, round, matches.len());
          let matches = matches[start..end]
            .iter()
            .enumerate()
            .map(|(offset, m)| {
              let scores = m.scores.clone().unwrap_or_default();
              let [s1, s2] = scores;
              let p2 = m.p2.clone().unwrap_or(Competitor::Tbd);
              PrintMatch {
                position: start + offset,
                slots: [
                  print_slot(draw, &m.p1, m.is_winner(Side::One), s1),
                  print_slot(draw, &p2, m.is_winner(Side::Two), s2),
                ],
              }
            })
            .collect();
          PrintColumn {
            round,
            title: round_title(round, rounds.len()),
            matches,
          }
        })
        .collect();
      PrintPage {
        header: draw.title.clone(),
        page_number: page + 1,
        total_pages,
        footer: format!("Page {} of {}", page + 1, total_pages),
        columns,
      }
    })
    .collect()
}

pub fn export_job(draw: &Draw, group_size: usize) -> ExportJob {
  ExportJob {
    title: draw.title.clone(),
    file_name: export_file_name(&draw.title),
    pages: paginate(draw, group_size),
  }
}

/// Consumes a laid-out page list. Rasterizing to PDF happens behind this.
pub trait ExportSink {
  fn write(&mut self, job: &ExportJob) -> Result<PathBuf>;
}

/// Writes the page list as JSON next to where the PDF would go.
pub struct JsonLayoutSink {
  dir: PathBuf,
}

impl JsonLayoutSink {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    JsonLayoutSink { dir: dir.into() }
  }
}

impl ExportSink for JsonLayoutSink {
  fn write(&mut self, job: &ExportJob) -> Result<PathBuf> {
    fs::create_dir_all(&self.dir)
      .map_err(|e| DrawError::Export(format!("create export dir {}: {e}", self.dir.display())))?;
    let stem = job.file_name.trim_end_matches(".pdf");
    let path = self.dir.join(format!("{stem}.layout.json"));
    let payload = serde_json::to_string_pretty(job).map_err(|e| DrawError::Export(e.to_string()))?;
    fs::write(&path, payload)
      .map_err(|e| DrawError::Export(format!("write export {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), pages = job.pages.len(), "export written");
    Ok(path)
  }
}
