//! Newick reader and writer.
//!
//! Accepts leaf names, internal node names, branch lengths, single-quoted
//! labels (`''` escapes a quote) and `[...]` comments, which are skipped.

use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, NodeId, TreeArena};
use crate::domain::error::DomainError;

const DELIMITERS: &[char] = &['(', ')', ',', ':', ';', '['];
const QUOTE_TRIGGERS: &[char] = &['(', ')', ',', ':', ';', '[', ']', '\'', ' ', '\t', '\n'];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Comma,
    Colon,
    Semicolon,
    Label(String),
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>, DomainError> {
        self.skip_blanks_and_comments()?;

        let Some(&(pos, c)) = self.chars.peek() else {
            return Ok(None);
        };
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            '\'' => return self.quoted(pos).map(|label| Some((pos, Token::Label(label)))),
            _ => return Ok(Some((pos, Token::Label(self.unquoted(pos))))),
        };
        self.chars.next();
        Ok(Some((pos, token)))
    }

    fn skip_blanks_and_comments(&mut self) -> Result<(), DomainError> {
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if c == '[' {
                if !self.chars.any(|(_, c)| c == ']') {
                    return Err(DomainError::newick(pos, "unterminated comment"));
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn quoted(&mut self, start: usize) -> Result<String, DomainError> {
        self.chars.next();
        let mut label = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\'')) => {
                    if matches!(self.chars.peek(), Some((_, '\''))) {
                        self.chars.next();
                        label.push('\'');
                    } else {
                        return Ok(label);
                    }
                }
                Some((_, c)) => label.push(c),
                None => return Err(DomainError::newick(start, "unterminated quoted label")),
            }
        }
    }

    fn unquoted(&mut self, start: usize) -> String {
        let mut end = self.input.len();
        while let Some(&(pos, c)) = self.chars.peek() {
            if DELIMITERS.contains(&c) {
                end = pos;
                break;
            }
            self.chars.next();
        }
        self.input[start..end].trim_end().to_string()
    }
}

/// Node that was just completed and may still receive a label and a length.
#[derive(Debug, Clone, Copy)]
struct Pending {
    idx: NodeId,
    labeled: bool,
    has_length: bool,
}

impl Pending {
    fn fresh(idx: NodeId) -> Self {
        Self {
            idx,
            labeled: false,
            has_length: false,
        }
    }
}

/// Parses one Newick tree terminated by `;`.
#[instrument(level = "debug", skip(input), fields(len = input.len()))]
pub fn parse(input: &str) -> Result<TreeArena, DomainError> {
    let mut lexer = Lexer::new(input);
    let mut tree = TreeArena::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut current: Option<Pending> = None;
    let mut terminated = false;

    while let Some((pos, token)) = lexer.next_token()? {
        if terminated {
            return Err(DomainError::newick(pos, "unexpected content after ';'"));
        }
        match token {
            Token::Open => {
                if current.is_some() {
                    return Err(DomainError::newick(pos, "expected ',' or ')' before '('"));
                }
                ensure_single_root(&tree, &stack, pos)?;
                let idx = tree.insert_node(NodeData::default(), stack.last().copied());
                stack.push(idx);
            }
            Token::Label(name) => match current {
                None => {
                    ensure_single_root(&tree, &stack, pos)?;
                    let leaf = tree.insert_node(label_data(name), stack.last().copied());
                    current = Some(Pending {
                        labeled: true,
                        ..Pending::fresh(leaf)
                    });
                }
                Some(mut pending) if !pending.labeled && !pending.has_length => {
                    if let Some(node) = tree.get_node_mut(pending.idx) {
                        node.data.name = label_data(name).name;
                    }
                    pending.labeled = true;
                    current = Some(pending);
                }
                Some(_) => return Err(DomainError::newick(pos, "unexpected label")),
            },
            Token::Colon => {
                let mut pending = match current {
                    Some(pending) => pending,
                    None => {
                        ensure_single_root(&tree, &stack, pos)?;
                        let leaf = tree.insert_node(NodeData::default(), stack.last().copied());
                        Pending::fresh(leaf)
                    }
                };
                if pending.has_length {
                    return Err(DomainError::newick(pos, "duplicate branch length"));
                }
                let length = match lexer.next_token()? {
                    Some((_, Token::Label(text))) => match text.parse::<f64>() {
                        Ok(length) if length.is_finite() => length,
                        _ => {
                            return Err(DomainError::newick(
                                pos,
                                format!("invalid branch length '{}'", text),
                            ))
                        }
                    },
                    _ => return Err(DomainError::newick(pos, "missing branch length after ':'")),
                };
                if let Some(node) = tree.get_node_mut(pending.idx) {
                    node.data.branch_length = Some(length);
                }
                pending.has_length = true;
                current = Some(pending);
            }
            Token::Comma => {
                let Some(&parent) = stack.last() else {
                    return Err(DomainError::newick(pos, "',' outside parentheses"));
                };
                if current.is_none() {
                    tree.insert_node(NodeData::default(), Some(parent));
                }
                current = None;
            }
            Token::Close => {
                let Some(idx) = stack.pop() else {
                    return Err(DomainError::newick(pos, "unbalanced ')'"));
                };
                if current.is_none() {
                    tree.insert_node(NodeData::default(), Some(idx));
                }
                current = Some(Pending::fresh(idx));
            }
            Token::Semicolon => {
                if !stack.is_empty() {
                    return Err(DomainError::newick(pos, "unclosed '('"));
                }
                if tree.is_empty() {
                    return Err(DomainError::newick(pos, "empty tree"));
                }
                terminated = true;
            }
        }
    }

    if !terminated {
        return Err(if tree.is_empty() {
            DomainError::newick(0, "empty input")
        } else {
            DomainError::newick(input.len(), "missing terminating ';'")
        });
    }

    debug!(nodes = tree.len(), leaves = tree.leaf_count(), "parsed newick tree");
    Ok(tree)
}

fn ensure_single_root(tree: &TreeArena, stack: &[NodeId], pos: usize) -> Result<(), DomainError> {
    if stack.is_empty() && !tree.is_empty() {
        return Err(DomainError::newick(pos, "more than one root subtree"));
    }
    Ok(())
}

fn label_data(name: String) -> NodeData {
    if name.is_empty() {
        NodeData::default()
    } else {
        NodeData::named(name)
    }
}

/// Serializes the tree with names and branch lengths.
pub fn write(tree: &TreeArena) -> String {
    enum Step {
        Enter(NodeId),
        Separator,
        Exit(NodeId),
    }

    let mut out = String::new();
    let mut steps: Vec<Step> = tree.root().map(Step::Enter).into_iter().collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(idx) => {
                let children = tree.children(idx);
                steps.push(Step::Exit(idx));
                if children.is_empty() {
                    continue;
                }
                out.push('(');
                steps.push(Step::Enter(children[children.len() - 1]));
                for &child in children[..children.len() - 1].iter().rev() {
                    steps.push(Step::Separator);
                    steps.push(Step::Enter(child));
                }
            }
            Step::Separator => out.push(','),
            Step::Exit(idx) => {
                let Some(node) = tree.get_node(idx) else {
                    continue;
                };
                if !node.children.is_empty() {
                    out.push(')');
                }
                if let Some(name) = &node.data.name {
                    out.push_str(&quote_label(name));
                }
                if let Some(length) = node.data.branch_length {
                    out.push(':');
                    out.push_str(&length.to_string());
                }
            }
        }
    }
    out.push(';');
    out
}

fn quote_label(name: &str) -> String {
    if name.contains(QUOTE_TRIGGERS) {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}

impl FromStr for TreeArena {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TreeArena {
    pub fn to_newick(&self) -> String {
        write(self)
    }
}
