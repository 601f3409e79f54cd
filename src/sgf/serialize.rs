use crate::tree::{GameTree, NodeId};

/// Render a variation tree back to record text.
///
/// Properties are written in stored order with `]` and `\` escaped, so a
/// parse/serialize round trip preserves every value byte-for-byte.
/// Single-continuation runs stay inline; at a branch point every child is
/// wrapped in its own subtree, the active one first, so reparsing the
/// output restores the same active line (a fresh parse selects child 0).
pub fn serialize(tree: &GameTree) -> String {
    let mut out = String::new();
    out.push('(');
    write_node(tree, tree.root(), &mut out);
    out.push(')');
    out
}

fn write_node(tree: &GameTree, mut id: NodeId, out: &mut String) {
    loop {
        out.push(';');
        let node = tree.node(id);
        for prop in &node.props {
            out.push_str(&prop.ident);
            if prop.values.is_empty() {
                out.push_str("[]");
            }
            for value in &prop.values {
                out.push('[');
                out.push_str(&escape(value));
                out.push(']');
            }
        }
        match node.children.len() {
            0 => return,
            1 => {
                id = node.children[0];
            }
            _ => {
                for &child in children_selected_first(node.children.as_slice(), node.selected) {
                    out.push('(');
                    write_node(tree, child, out);
                    out.push(')');
                }
                return;
            }
        }
    }
}

/// Children reordered so the active continuation comes first; siblings
/// keep their relative order. Allocates only at branch points.
fn children_selected_first(children: &[NodeId], selected: usize) -> Vec<&NodeId> {
    let mut ordered: Vec<&NodeId> = Vec::with_capacity(children.len());
    if let Some(chosen) = children.get(selected) {
        ordered.push(chosen);
    }
    for (index, child) in children.iter().enumerate() {
        if index != selected {
            ordered.push(child);
        }
    }
    ordered
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == ']' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords;
    use crate::stone::Stone;
    use crate::tree::Prop;

    fn move_props(stone: Stone, point: crate::Point) -> Vec<Prop> {
        vec![Prop::new(stone.letter(), coords::to_sgf(point))]
    }

    #[test]
    fn bare_root() {
        let tree = GameTree::with_root(vec![Prop::new("SZ", "19")]);
        assert_eq!(serialize(&tree), "(;SZ[19])");
    }

    #[test]
    fn linear_sequence_stays_inline() {
        let mut tree = GameTree::with_root(vec![Prop::new("SZ", "19")]);
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (3, 2)));
        tree.create_child(a, move_props(Stone::White, (2, 3)));
        assert_eq!(serialize(&tree), "(;SZ[19];B[cd];W[dc])");
    }

    #[test]
    fn branch_point_wraps_every_child() {
        let mut tree = GameTree::with_root(vec![Prop::new("SZ", "19")]);
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        tree.create_child(a, move_props(Stone::White, (1, 1)));
        tree.create_child(a, move_props(Stone::White, (2, 2)));
        assert_eq!(serialize(&tree), "(;SZ[19];B[aa](;W[bb])(;W[cc]))");
    }

    #[test]
    fn selected_variation_comes_first() {
        let mut tree = GameTree::with_root(vec![Prop::new("SZ", "19")]);
        let a = tree.create_child(tree.root(), move_props(Stone::Black, (0, 0)));
        tree.create_child(a, move_props(Stone::White, (1, 1)));
        tree.create_child(a, move_props(Stone::White, (2, 2)));
        tree.select_variation(a, 1);
        assert_eq!(serialize(&tree), "(;SZ[19];B[aa](;W[cc])(;W[bb]))");
    }

    #[test]
    fn multi_value_property() {
        let tree = GameTree::with_root(vec![
            Prop::new("SZ", "9"),
            Prop::with_values("AB", vec!["aa".into(), "bb".into()]),
        ]);
        assert_eq!(serialize(&tree), "(;SZ[9]AB[aa][bb])");
    }

    #[test]
    fn empty_value_list_keeps_the_property() {
        let tree = GameTree::with_root(vec![Prop::with_values("KM", Vec::new())]);
        assert_eq!(serialize(&tree), "(;KM[])");
    }

    #[test]
    fn bracket_and_backslash_are_escaped() {
        let tree = GameTree::with_root(vec![Prop::new("C", r"a ] b \ c")]);
        assert_eq!(serialize(&tree), r"(;C[a \] b \\ c])");
    }
}
