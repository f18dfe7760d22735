use crate::error::{DrawError, Result};
use crate::types::Competitor;
use rand::seq::SliceRandom;

/// Randomizes the unseeded pool before it is spread over the open slots.
pub trait Shuffler {
  fn shuffle(&mut self, pool: &mut [Competitor]);
}

/// Uniform Fisher-Yates shuffle backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadShuffler;

impl Shuffler for ThreadShuffler {
  fn shuffle(&mut self, pool: &mut [Competitor]) {
    pool.shuffle(&mut rand::thread_rng());
  }
}

/// Leaves the pool in entry order.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShuffle;

impl Shuffler for NoShuffle {
  fn shuffle(&mut self, _pool: &mut [Competitor]) {}
}

/// Lays out `total_slots` first-round slots: seeds at their fixed positions,
/// everyone else (plus BYE padding) drawn at random into the remainder.
pub fn build_slots(
  seeded: &[String],
  unseeded: &[String],
  seed_count: usize,
  total_slots: usize,
  shuffler: &mut dyn Shuffler,
) -> Result<Vec<Competitor>> {
  if seeded.len() != seed_count {
    return Err(DrawError::Configuration {
      expected: seed_count,
      found: seeded.len(),
    });
  }
  let competitors = seeded.len() + unseeded.len();
  if !total_slots.is_power_of_two() || total_slots < 2 || total_slots < competitors {
    return Err(DrawError::SlotCount { total_slots, competitors });
  }

  let mut pool = unseeded
    .iter()
    .cloned()
    .map(Competitor::Real)
    .collect::<Vec<_>>();
  while seeded.len() + pool.len() < total_slots {
    pool.push(Competitor::Bye);
  }
  shuffler.shuffle(&mut pool);

  let mut pool = pool.into_iter();
  let slots = tennis_order(total_slots)
    .into_iter()
    .map(|rank| {
      let rank = rank as usize;
      if rank <= seed_count {
        Competitor::Real(seeded[rank - 1].clone())
      } else {
        pool.next().unwrap_or(Competitor::Bye)
      }
    })
    .collect::<Vec<_>>();
  Ok(slots)
}

/// Classic bracket order: 1 v 2 at the top level, each doubling pairs a rank
/// with its mirror so higher seeds meet as late as possible.
pub fn seed_positions(size: u32) -> Vec<u32> {
  let mut seeds = vec![1u32, 2];
  while seeds.len() < size as usize {
    let n = seeds.len() as u32;
    let mut next = Vec::with_capacity(seeds.len() * 2);
    for seed in seeds.iter().copied() {
      next.push(seed);
      next.push((n * 2 + 1).saturating_sub(seed));
    }
    seeds = next;
  }
  seeds
}

/// `seed_positions` reshaped into quarters: q1, reversed q2, q4, reversed q3.
pub fn tennis_order(size: usize) -> Vec<u32> {
  let seeds = seed_positions(size as u32);
  let q = size / 4;
  let mut order = Vec::with_capacity(seeds.len());
  order.extend_from_slice(&seeds[..q]);
  order.extend(seeds[q..q * 2].iter().rev());
  order.extend_from_slice(&seeds[q * 3..]);
  order.extend(seeds[q * 2..q * 3].iter().rev());
  order
}

/// Smallest power of two that fits `n` competitors, never below a single match.
pub fn next_power_of_two(n: usize) -> usize {
  n.max(2).next_power_of_two()
}
