use serde::{Deserialize, Serialize};

use crate::sgf::{self, ParseDiagnostic};
use crate::tree::{DEFAULT_BOARD_SIZE, GameTree, Prop};

/// Application identifier written into the AP root property.
const APP_NAME: &str = "wrengo:1.0";

/// Game metadata, denormalized out of the root node so hosts can read and
/// edit it without touching raw properties. Written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub title: String,
    pub board_size: u8,
    pub black_name: String,
    pub black_rank: String,
    pub white_name: String,
    pub white_rank: String,
    pub komi: f64,
    /// Free-form date string; left empty unless the host fills it.
    pub date: String,
    pub rules: String,
}

impl Default for GameInfo {
    fn default() -> Self {
        GameInfo {
            title: "wrengo".to_string(),
            board_size: DEFAULT_BOARD_SIZE,
            black_name: "Black".to_string(),
            black_rank: "??".to_string(),
            white_name: "White".to_string(),
            white_rank: "??".to_string(),
            komi: 6.5,
            date: String::new(),
            rules: "Japanese".to_string(),
        }
    }
}

/// A full game record: the variation tree plus its metadata.
///
/// The tree is authoritative for moves and variations; `info` mirrors the
/// root metadata properties and is synced back into them on save so the
/// two never diverge in serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub tree: GameTree,
    pub info: GameInfo,
}

impl GameRecord {
    /// A fresh record with the standard root header.
    pub fn new(info: GameInfo) -> Self {
        let mut props = vec![
            Prop::new("GM", "1"),
            Prop::new("FF", "4"),
            Prop::new("CA", "UTF-8"),
            Prop::new("AP", APP_NAME),
            Prop::new("KM", format_komi(info.komi)),
            Prop::new("SZ", info.board_size.to_string()),
            Prop::new("GN", info.title.clone()),
            Prop::new("PB", info.black_name.clone()),
            Prop::new("PW", info.white_name.clone()),
            Prop::new("BR", info.black_rank.clone()),
            Prop::new("WR", info.white_rank.clone()),
            Prop::new("RU", info.rules.clone()),
        ];
        if !info.date.is_empty() {
            props.push(Prop::new("DT", info.date.clone()));
        }
        GameRecord {
            tree: GameTree::with_root(props),
            info,
        }
    }

    /// Load a record from text, recovering from malformed input.
    ///
    /// Metadata absent from the root falls back to the same defaults a
    /// fresh record uses. `default_size` fills in for a missing SZ.
    pub fn from_sgf(text: &str, default_size: u8) -> (Self, Vec<ParseDiagnostic>) {
        let (tree, diagnostics) = sgf::parse(text, default_size);
        let defaults = GameInfo::default();
        let root = tree.node(tree.root());
        let info = GameInfo {
            title: root.first("GN").map_or(defaults.title, str::to_string),
            board_size: tree.board_size(),
            black_name: root.first("PB").map_or(defaults.black_name, str::to_string),
            black_rank: root.first("BR").map_or(defaults.black_rank, str::to_string),
            white_name: root.first("PW").map_or(defaults.white_name, str::to_string),
            white_rank: root.first("WR").map_or(defaults.white_rank, str::to_string),
            komi: root
                .first("KM")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.komi),
            date: root.first("DT").unwrap_or_default().to_string(),
            rules: root.first("RU").map_or(defaults.rules, str::to_string),
        };
        (GameRecord { tree, info }, diagnostics)
    }

    /// Write `info` back into the root properties, then serialize.
    pub fn to_sgf(&mut self) -> String {
        let root = self.tree.root();
        let node = self.tree.node_mut(root);
        node.set("KM", vec![format_komi(self.info.komi)]);
        node.set("SZ", vec![self.info.board_size.to_string()]);
        node.set("GN", vec![self.info.title.clone()]);
        node.set("PB", vec![self.info.black_name.clone()]);
        node.set("PW", vec![self.info.white_name.clone()]);
        node.set("BR", vec![self.info.black_rank.clone()]);
        node.set("WR", vec![self.info.white_rank.clone()]);
        node.set("RU", vec![self.info.rules.clone()]);
        if !self.info.date.is_empty() {
            node.set("DT", vec![self.info.date.clone()]);
        }
        sgf::serialize(&self.tree)
    }
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new(GameInfo::default())
    }
}

/// Komi without a trailing ".0" for whole values, "6.5" style otherwise.
fn format_komi(komi: f64) -> String {
    if komi.fract() == 0.0 {
        format!("{}", komi as i64)
    } else {
        format!("{komi}")
    }
}
