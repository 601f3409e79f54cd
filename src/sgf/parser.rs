use tracing::debug;

use crate::tree::{self, GameTree, NodeId, Prop};

use super::error::ParseDiagnostic;

/// Parse one SGF record into a variation tree, best-effort.
///
/// Grammar: a record is `( sequence )`; a sequence is a run of
/// `; properties` nodes optionally followed by `( sequence )`
/// sub-variations, each attaching as an additional child of the last node
/// of the enclosing sequence. The first node of the outermost sequence is
/// the root (node 0 of the arena).
///
/// Malformed input never fails the parse: junk is skipped, unterminated
/// values and missing delimiters are repaired, and every repair is
/// reported as a [`ParseDiagnostic`]. When the root ends up without a
/// usable SZ property (absent, unparseable, or outside the range the
/// two-letter coordinates can address) it is replaced by `default_size`,
/// so the tree and the rules engine agree on the board dimension before
/// any move is replayed.
pub fn parse(input: &str, default_size: u8) -> (GameTree, Vec<ParseDiagnostic>) {
    let mut parser = Parser::new(input);
    let mut tree = GameTree::new();
    let root = tree.root();

    parser.skip_to_open();
    if parser.peek() == Some(b'(') {
        parser.advance();
        parser.subtree(&mut tree, root, true);
    } else {
        parser.diag(ParseDiagnostic::MissingDelimiter { pos: parser.pos });
    }

    // Only one record per input; anything after the first tree is noise.
    parser.skip_whitespace();
    if let Some(b) = parser.peek() {
        parser.diag(ParseDiagnostic::UnexpectedToken {
            found: b as char,
            pos: parser.pos,
        });
    }

    match tree.node(root).first("SZ").map(str::to_string) {
        None => {
            tree.node_mut(root)
                .set("SZ", vec![default_size.to_string()]);
            parser.diag(ParseDiagnostic::MissingSizeProperty);
        }
        Some(value) if tree::parse_size(&value).is_none() => {
            tree.node_mut(root)
                .set("SZ", vec![default_size.to_string()]);
            parser.diag(ParseDiagnostic::UnsupportedSizeProperty { value });
        }
        Some(_) => {}
    }

    (tree, parser.diagnostics)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            bytes: input.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn diag(&mut self, diagnostic: ParseDiagnostic) {
        debug!(%diagnostic, "recovering from malformed record text");
        self.diagnostics.push(diagnostic);
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skip (and report) anything before the first opening delimiter.
    fn skip_to_open(&mut self) {
        self.skip_whitespace();
        if self.peek().is_some_and(|b| b != b'(') {
            let found = self.bytes[self.pos] as char;
            self.diag(ParseDiagnostic::UnexpectedToken {
                found,
                pos: self.pos,
            });
            while self.peek().is_some_and(|b| b != b'(') {
                self.pos += 1;
            }
        }
    }

    /// Parse a sequence plus its sub-variations, attaching nodes under
    /// `attach`. When `at_root` is set, the first `;` node's properties go
    /// to the arena root instead of creating a child. Consumes the closing
    /// `)` (or repairs its absence at EOF).
    fn subtree(&mut self, tree: &mut GameTree, attach: NodeId, at_root: bool) {
        let mut last = attach;
        let mut first = at_root;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b';') => {
                    self.advance();
                    let props = self.node_props();
                    if first {
                        tree.node_mut(last).props = props;
                        first = false;
                    } else {
                        last = tree.create_child(last, props);
                    }
                }
                Some(b'(') => {
                    self.advance();
                    self.subtree(tree, last, false);
                }
                Some(b')') => {
                    self.advance();
                    return;
                }
                None => {
                    self.diag(ParseDiagnostic::MissingDelimiter { pos: self.pos });
                    return;
                }
                Some(b) => {
                    self.diag(ParseDiagnostic::UnexpectedToken {
                        found: b as char,
                        pos: self.pos,
                    });
                    // Skip the whole junk run, one diagnostic per run.
                    while self
                        .peek()
                        .is_some_and(|b| !matches!(b, b';' | b'(' | b')') && !b.is_ascii_whitespace())
                    {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    /// Properties of one node: uppercase identifiers, each followed by
    /// zero or more bracketed values.
    fn node_props(&mut self) -> Vec<Prop> {
        let mut props = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b) if b.is_ascii_uppercase() => {
                    let ident = self.prop_ident();
                    let mut values = Vec::new();
                    loop {
                        self.skip_whitespace();
                        if self.peek() == Some(b'[') {
                            values.push(self.prop_value());
                        } else {
                            break;
                        }
                    }
                    props.push(Prop::with_values(ident, values));
                }
                _ => break,
            }
        }
        props
    }

    fn prop_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_uppercase()) {
            self.pos += 1;
        }
        // Identifiers are ASCII by construction.
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    /// A bracketed value. Backslash escapes the following character;
    /// escaped line breaks are soft breaks and vanish entirely.
    fn prop_value(&mut self) -> String {
        let open = self.pos;
        self.advance(); // consume '['
        let mut value = Vec::new();
        loop {
            match self.advance() {
                None => {
                    self.diag(ParseDiagnostic::UnterminatedValue { pos: open });
                    break;
                }
                Some(b'\\') => match self.advance() {
                    None => {
                        self.diag(ParseDiagnostic::UnterminatedValue { pos: open });
                        break;
                    }
                    Some(b'\n') => {
                        if self.peek() == Some(b'\r') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b) => value.push(b),
                },
                Some(b']') => break,
                Some(b) => value.push(b),
            }
        }
        String::from_utf8_lossy(&value).into_owned()
    }
}
