use crate::draw::{Draw, DrawRequest};
use crate::error::{DrawError, Result};
use crate::export::{export_job, paginate, ExportJob, PrintPage};
use crate::seeding::Shuffler;
use crate::types::*;
use crate::view::{draw_view, DrawView};
use std::sync::MutexGuard;

// ── Helpers ─────────────────────────────────────────────────────────────

fn lock_state(state: &SharedDrawState) -> MutexGuard<'_, DrawState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Lock the mutex, require a generated draw, then call `f` with it.
fn with_draw<F, R>(state: &SharedDrawState, f: F) -> Result<R>
where
    F: FnOnce(&mut Draw) -> Result<R>,
{
    let mut guard = lock_state(state);
    let draw = guard.draw.as_mut().ok_or(DrawError::NoDraw)?;
    f(draw)
}

fn side_from_number(side: u8, round: usize, position: usize) -> Result<Side> {
    Side::from_number(side).ok_or(DrawError::MatchNotFound { round, position })
}

// ── Commands ────────────────────────────────────────────────────────────

pub fn draw_state(state: &SharedDrawState) -> Option<DrawView> {
    lock_state(state).draw.as_ref().map(draw_view)
}

/// Builds a new draw and swaps it in. A rejected form leaves the current
/// draw untouched.
pub fn generate_draw(
    state: &SharedDrawState,
    form: &DrawForm,
    config: &AppConfig,
    shuffler: &mut dyn Shuffler,
) -> Result<DrawView> {
    let request = DrawRequest::from_form(form, &config.default_title);
    let draw = match Draw::generate(request, shuffler) {
        Ok(draw) => draw,
        Err(e) => {
            tracing::warn!("draw rejected: {e}");
            return Err(e);
        }
    };
    let view = draw_view(&draw);
    lock_state(state).draw = Some(draw);
    Ok(view)
}

pub fn toggle_winner(state: &SharedDrawState, round: usize, position: usize, side: u8) -> Result<DrawView> {
    let side = side_from_number(side, round, position)?;
    with_draw(state, |draw| {
        draw.bracket.record_or_toggle_winner(round, position, side)?;
        Ok(draw_view(draw))
    })
}

pub fn clear_result(state: &SharedDrawState, round: usize, position: usize) -> Result<DrawView> {
    with_draw(state, |draw| {
        draw.bracket.clear_result(round, position)?;
        Ok(draw_view(draw))
    })
}

pub fn update_score(
    state: &SharedDrawState,
    round: usize,
    position: usize,
    side: u8,
    score: &str,
) -> Result<DrawView> {
    let side = side_from_number(side, round, position)?;
    with_draw(state, |draw| {
        draw.bracket.set_score(round, position, side, score)?;
        Ok(draw_view(draw))
    })
}

pub fn print_layout(state: &SharedDrawState, config: &AppConfig) -> Result<Vec<PrintPage>> {
    with_draw(state, |draw| Ok(paginate(draw, config.page_group_size)))
}

/// Snapshot of the page list taken under the lock; the sink runs on it
/// afterwards without holding the draw.
pub fn export_snapshot(state: &SharedDrawState, config: &AppConfig) -> Result<ExportJob> {
    with_draw(state, |draw| Ok(export_job(draw, config.page_group_size)))
}
