use serde::{Deserialize, Serialize};

use crate::Point;
use crate::coords;
use crate::stone::Stone;
use crate::turn::Move;

pub type NodeId = usize;

/// Default board size when a record carries no SZ property.
pub const DEFAULT_BOARD_SIZE: u8 = 19;

/// Largest board the two-letter coordinate alphabet can address.
pub const MAX_BOARD_SIZE: u8 = 26;

/// Decode an SZ value into a usable board size. Rectangular "c:r" values
/// use the first dimension. `None` for anything unparseable, zero, or
/// beyond [`MAX_BOARD_SIZE`].
pub(crate) fn parse_size(value: &str) -> Option<u8> {
    value
        .split(':')
        .next()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .filter(|&n| n > 0 && n <= MAX_BOARD_SIZE)
}

/// One property of a record node: a short uppercase identifier and one or
/// more string payloads. Kept as raw strings (order preserved, unknown
/// identifiers included) so serialization is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prop {
    pub ident: String,
    pub values: Vec<String>,
}

impl Prop {
    pub fn new(ident: impl Into<String>, value: impl Into<String>) -> Self {
        Prop {
            ident: ident.into(),
            values: vec![value.into()],
        }
    }

    pub fn with_values(ident: impl Into<String>, values: Vec<String>) -> Self {
        Prop {
            ident: ident.into(),
            values,
        }
    }
}

/// A node of the variation tree.
///
/// `parent` is a back-reference used only for path reconstruction; the
/// arena owns every node. `selected` indexes into `children` and marks the
/// active continuation (meaningful only when `children` is non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordNode {
    pub props: Vec<Prop>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub selected: usize,
}

impl RecordNode {
    fn new(props: Vec<Prop>, parent: Option<NodeId>) -> Self {
        RecordNode {
            props,
            parent,
            children: Vec::new(),
            selected: 0,
        }
    }

    /// All values of a property, or `None` if absent.
    pub fn get(&self, ident: &str) -> Option<&[String]> {
        self.props
            .iter()
            .find(|p| p.ident == ident)
            .map(|p| p.values.as_slice())
    }

    /// First value of a property.
    pub fn first(&self, ident: &str) -> Option<&str> {
        self.get(ident).and_then(|vs| vs.first()).map(String::as_str)
    }

    pub fn has(&self, ident: &str) -> bool {
        self.props.iter().any(|p| p.ident == ident)
    }

    /// Replace the values of a property, appending it if absent.
    pub fn set(&mut self, ident: &str, values: Vec<String>) {
        match self.props.iter_mut().find(|p| p.ident == ident) {
            Some(prop) => prop.values = values,
            None => self.props.push(Prop::with_values(ident, values)),
        }
    }
}

/// Arena-backed variation tree. Node 0 is always the root (game metadata
/// and setup stones); every other node is reached through `children`
/// lists. Nodes are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTree {
    nodes: Vec<RecordNode>,
}

impl GameTree {
    /// A fresh tree holding only an empty root node.
    pub fn new() -> Self {
        GameTree {
            nodes: vec![RecordNode::new(Vec::new(), None)],
        }
    }

    pub fn with_root(props: Vec<Prop>) -> Self {
        GameTree {
            nodes: vec![RecordNode::new(props, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &RecordNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut RecordNode {
        &mut self.nodes[id]
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }

    /// Append a new leaf under `parent` and return its id.
    ///
    /// Sibling selection is left untouched: `selected` defaults to 0, so
    /// the first child of a node becomes the active continuation and later
    /// siblings do not steal it.
    pub fn create_child(&mut self, parent: NodeId, props: Vec<Prop>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(RecordNode::new(props, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Mark the child at `index` as the active continuation of `node`.
    /// Returns false (and mutates nothing) when `index` is out of range.
    pub fn select_variation(&mut self, node: NodeId, index: usize) -> bool {
        if index < self.nodes[node].children.len() {
            self.nodes[node].selected = index;
            true
        } else {
            false
        }
    }

    /// The active child of `node`, if it has any children.
    pub fn selected_child(&self, node: NodeId) -> Option<NodeId> {
        let n = &self.nodes[node];
        n.children.get(n.selected).copied()
    }

    /// Linear scan for an existing child recording the same move, used to
    /// reuse a branch instead of duplicating it. Children are scanned in
    /// creation order and the first match wins.
    pub fn find_child_by_move(&self, node: NodeId, mv: &Move) -> Option<(NodeId, usize)> {
        self.nodes[node]
            .children
            .iter()
            .enumerate()
            .find(|&(_, &child)| self.move_data(child) == Some(*mv))
            .map(|(index, &child)| (child, index))
    }

    /// The move recorded at a node.
    ///
    /// A node represents a move iff exactly one of the two color properties
    /// is present with a decodable coordinate; setup-only and metadata-only
    /// nodes (the root in particular) return `None`.
    pub fn move_data(&self, id: NodeId) -> Option<Move> {
        let node = &self.nodes[id];
        let (stone, raw) = match (node.first("B"), node.first("W")) {
            (Some(v), None) => (Stone::Black, v),
            (None, Some(v)) => (Stone::White, v),
            _ => return None,
        };
        let point = coords::from_sgf(raw, self.board_size())?;
        Some(Move::new(stone, point))
    }

    /// Setup stones attached to a node (AB/AW lists), decoded and filtered
    /// to on-board coordinates.
    pub fn setup_stones(&self, id: NodeId) -> Vec<(Stone, Point)> {
        let size = self.board_size();
        let node = &self.nodes[id];
        let mut stones = Vec::new();
        for (ident, stone) in [("AB", Stone::Black), ("AW", Stone::White)] {
            if let Some(values) = node.get(ident) {
                for value in values {
                    if let Some(point) = coords::from_sgf(value, size) {
                        stones.push((stone, point));
                    }
                }
            }
        }
        stones
    }

    /// The PL property of a node, if present and well-formed.
    pub fn player_to_play(&self, id: NodeId) -> Option<Stone> {
        self.nodes[id].first("PL").and_then(Stone::from_letter)
    }

    /// Board size from the root SZ property, falling back to the default
    /// when absent, unparseable, or outside the addressable range.
    pub fn board_size(&self) -> u8 {
        self.nodes[0]
            .first("SZ")
            .and_then(parse_size)
            .unwrap_or(DEFAULT_BOARD_SIZE)
    }

    /// Walk parent links from a node back to (but excluding) the root,
    /// returned in root-first order.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == 0 {
                break;
            }
            path.push(node);
            current = self.nodes[node].parent;
        }
        path.reverse();
        path
    }

    /// Follow selected children from the root to a leaf. The root itself
    /// is not part of the path.
    pub fn selected_path(&self) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.root();
        while let Some(next) = self.selected_child(current) {
            path.push(next);
            current = next;
        }
        path
    }
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_props(stone: Stone, point: Point) -> Vec<Prop> {
        vec![Prop::new(stone.letter(), coords::to_sgf(point))]
    }

    #[test]
    fn fresh_tree_has_bare_root() {
        let tree = GameTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.node(tree.root()).children.is_empty());
        assert!(tree.move_data(tree.root()).is_none());
    }

    #[test]
    fn create_child_links_both_ways() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        let b = tree.create_child(a, move_props(Stone::White, (1, 0)));

        assert_eq!(tree.node(a).parent, Some(tree.root()));
        assert_eq!(tree.node(b).parent, Some(a));
        assert_eq!(tree.node(tree.root()).children, vec![a]);
        assert_eq!(tree.node(a).children, vec![b]);
    }

    #[test]
    fn first_child_is_selected_by_default() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        let b = tree.create_child(tree.root(), move_props(Stone::Black, (1, 1)));

        assert_eq!(tree.selected_child(tree.root()), Some(a));
        assert!(tree.select_variation(tree.root(), 1));
        assert_eq!(tree.selected_child(tree.root()), Some(b));
    }

    #[test]
    fn select_variation_out_of_range_is_a_no_op() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));

        assert!(!tree.select_variation(tree.root(), 5));
        assert_eq!(tree.selected_child(tree.root()), Some(a));
    }

    #[test]
    fn move_data_requires_exactly_one_color() {
        let mut tree = GameTree::new();
        let mv = tree.create_child(tree.root(), move_props(Stone::Black, (3, 2)));
        assert_eq!(tree.move_data(mv), Some(Move::new(Stone::Black, (3, 2))));

        let both = tree.create_child(
            tree.root(),
            vec![Prop::new("B", "aa"), Prop::new("W", "bb")],
        );
        assert!(tree.move_data(both).is_none());

        let comment_only = tree.create_child(tree.root(), vec![Prop::new("C", "hello")]);
        assert!(tree.move_data(comment_only).is_none());
    }

    #[test]
    fn move_data_rejects_bad_coordinates() {
        let mut tree = GameTree::with_root(vec![Prop::new("SZ", "9")]);
        let off = tree.create_child(tree.root(), vec![Prop::new("B", "jj")]);
        assert!(tree.move_data(off).is_none());
    }

    #[test]
    fn find_child_by_move_reuses_branches() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        let b = tree.create_child(tree.root(), move_props(Stone::Black, (1, 1)));

        assert_eq!(
            tree.find_child_by_move(tree.root(), &Move::new(Stone::Black, (1, 1))),
            Some((b, 1))
        );
        assert_eq!(
            tree.find_child_by_move(tree.root(), &Move::new(Stone::Black, (0, 0))),
            Some((a, 0))
        );
        assert_eq!(
            tree.find_child_by_move(tree.root(), &Move::new(Stone::White, (0, 0))),
            None
        );
    }

    #[test]
    fn board_size_from_root() {
        assert_eq!(GameTree::new().board_size(), DEFAULT_BOARD_SIZE);
        assert_eq!(GameTree::with_root(vec![Prop::new("SZ", "9")]).board_size(), 9);
        assert_eq!(
            GameTree::with_root(vec![Prop::new("SZ", "13:9")]).board_size(),
            13
        );
        assert_eq!(
            GameTree::with_root(vec![Prop::new("SZ", "huge")]).board_size(),
            DEFAULT_BOARD_SIZE
        );
    }

    #[test]
    fn board_size_rejects_unaddressable_values() {
        // The two-letter coordinate alphabet stops at 26.
        assert_eq!(
            GameTree::with_root(vec![Prop::new("SZ", "26")]).board_size(),
            26
        );
        assert_eq!(
            GameTree::with_root(vec![Prop::new("SZ", "30")]).board_size(),
            DEFAULT_BOARD_SIZE
        );
        assert_eq!(
            GameTree::with_root(vec![Prop::new("SZ", "0")]).board_size(),
            DEFAULT_BOARD_SIZE
        );
    }

    #[test]
    fn setup_stones_from_root() {
        let tree = GameTree::with_root(vec![
            Prop::new("SZ", "9"),
            Prop::with_values("AB", vec!["aa".into(), "bb".into()]),
            Prop::new("AW", "cc"),
        ]);
        let stones = tree.setup_stones(tree.root());
        assert_eq!(
            stones,
            vec![
                (Stone::Black, (0, 0)),
                (Stone::Black, (1, 1)),
                (Stone::White, (2, 2)),
            ]
        );
    }

    #[test]
    fn selected_path_follows_selection() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        let b = tree.create_child(a, move_props(Stone::White, (1, 0)));
        let c = tree.create_child(a, move_props(Stone::White, (2, 0)));

        assert_eq!(tree.selected_path(), vec![a, b]);

        tree.select_variation(a, 1);
        assert_eq!(tree.selected_path(), vec![a, c]);
    }

    #[test]
    fn path_to_excludes_root() {
        let mut tree = GameTree::new();
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        let b = tree.create_child(a, move_props(Stone::White, (1, 0)));

        assert_eq!(tree.path_to(b), vec![a, b]);
        assert!(tree.path_to(tree.root()).is_empty());
    }

    #[test]
    fn prop_set_replaces_or_appends() {
        let mut tree = GameTree::new();
        let root = tree.root();
        tree.node_mut(root).set("GN", vec!["first".into()]);
        tree.node_mut(root).set("GN", vec!["second".into()]);
        assert_eq!(tree.node(root).first("GN"), Some("second"));
        assert_eq!(
            tree.node(root)
                .props
                .iter()
                .filter(|p| p.ident == "GN")
                .count(),
            1
        );
    }

    #[test]
    fn serde_round_trip() {
        let mut tree = GameTree::with_root(vec![Prop::new("SZ", "9")]);
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        tree.create_child(a, move_props(Stone::White, (1, 0)));
        tree.create_child(a, move_props(Stone::White, (2, 0)));
        tree.select_variation(a, 1);

        let json = serde_json::to_string(&tree).unwrap();
        let restored: GameTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);
    }
}
