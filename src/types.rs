use serde::{Deserialize, Serialize, Serializer};
use std::{
    fmt,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::draw::Draw;

// ── Constants ──────────────────────────────────────────────────────────

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:17890";
pub const DEFAULT_TITLE: &str = "Tournament Draw";
pub const DEFAULT_PAGE_GROUP_SIZE: usize = 8;
pub const DEFAULT_STATIC_DIR: &str = "web";
pub const DEFAULT_EXPORTS_DIR: &str = "exports";

pub const BYE_LABEL: &str = "BYE";
pub const TBD_LABEL: &str = "TBD";
pub const UNKNOWN_CHAMPION_LABEL: &str = "???";

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedDrawState = Arc<Mutex<DrawState>>;

// ── Competitors ────────────────────────────────────────────────────────

/// Occupant of a bracket slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Competitor {
    Real(String),
    /// Empty slot; its opponent advances without playing.
    Bye,
    /// Waiting on a feeder match.
    Tbd,
    /// Only shown in the champion box before a winner exists.
    UnknownChampion,
}

impl Competitor {
    pub fn named(name: impl Into<String>) -> Self {
        Competitor::Real(name.into())
    }

    pub fn label(&self) -> &str {
        match self {
            Competitor::Real(name) => name,
            Competitor::Bye => BYE_LABEL,
            Competitor::Tbd => TBD_LABEL,
            Competitor::UnknownChampion => UNKNOWN_CHAMPION_LABEL,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Competitor::Real(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Competitor::Real(_))
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Competitor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Which side of a match a user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn from_number(raw: u8) -> Option<Side> {
        match raw {
            1 => Some(Side::One),
            2 => Some(Side::Two),
            _ => None,
        }
    }
}

// ── App state ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct DrawState {
    pub draw: Option<Draw>,
}

#[derive(Clone)]
pub struct ServerState {
    pub draw_state: SharedDrawState,
    pub config: AppConfig,
}

// ── Request payloads ───────────────────────────────────────────────────

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawForm {
    pub title: String,
    pub num_seeds: String,
    pub seeded_players: String,
    pub unseeded_players: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreUpdate {
    pub score: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub total_pages: usize,
}

// ── Config types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub server_addr: String,
    pub static_dir: String,
    pub exports_dir: String,
    pub page_group_size: usize,
    pub default_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            exports_dir: DEFAULT_EXPORTS_DIR.to_string(),
            page_group_size: DEFAULT_PAGE_GROUP_SIZE,
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}
