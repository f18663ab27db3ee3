//! Evaluator for the XPath subset the locator synthesizer emits.
//!
//! Generated expressions only ever use descendant/child steps, `*` or name
//! tests, attribute equality predicates joined with `and`, positional
//! predicates, an outer `(path)[n]` wrapper, and `concat(..)` string
//! literals. Supporting exactly that grammar keeps evaluation cheap and the
//! results trustworthy for uniqueness checks.

use crate::locator::Platform;
use crate::source::document::{Document, NodeId};
use serde::Serialize;

/// Outcome of testing an XPath expression for uniqueness against a capture.
/// `index` is 1-based and only populated when the expression is not unique
/// and the target node was located among the matches.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UniquenessResult {
    pub unique: bool,
    pub index: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone)]
enum Pred {
    Position(usize),
    /// Attribute tests joined with `and`; `None` value = existence test
    Attrs(Vec<(String, Option<String>)>),
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    /// `None` matches any element (`*`)
    name: Option<String>,
    preds: Vec<Pred>,
}

/// A parsed expression: a location path plus an optional outer
/// `(path)[n]` positional wrapper over the full result set.
#[derive(Debug, Clone)]
pub struct XPathExpr {
    steps: Vec<Step>,
    outer_index: Option<usize>,
}

/// Parse and evaluate `expr` against the document, returning matches in
/// document order.
pub fn evaluate(doc: &Document, expr: &str) -> Result<Vec<NodeId>, String> {
    parse(expr).map(|e| eval_expr(doc, &e))
}

/// Test an expression for uniqueness with respect to a specific target node.
/// Evaluation failures are logged and degrade to "not unique, no index".
pub fn check_uniqueness(
    doc: &Document,
    expr: &str,
    target: NodeId,
    platform: Platform,
) -> UniquenessResult {
    let matches = match evaluate(doc, expr) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("XPath evaluation failed for '{}': {}", expr, e);
            return UniquenessResult::default();
        }
    };
    let total = matches.len();
    let index = matches
        .iter()
        .position(|&m| doc.same_node(m, target, platform))
        .map(|i| i + 1);
    UniquenessResult {
        unique: total == 1,
        index: if total == 1 { None } else { index },
        total: Some(total),
    }
}

/// Build an XPath string literal for `value`: quoted with whichever quote
/// character is absent, or `concat()` of split segments when both appear.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        let mut parts = Vec::new();
        for (i, segment) in value.split('"').enumerate() {
            if i > 0 {
                parts.push("'\"'".to_string());
            }
            if !segment.is_empty() {
                parts.push(format!("\"{}\"", segment));
            }
        }
        format!("concat({})", parts.join(", "))
    }
}

// --- Tokenizer ---

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Name(String),
    Str(String),
    Num(usize),
    Slash,
    DSlash,
    At,
    Star,
    Eq,
    Comma,
    LParen,
    RParen,
    LBrack,
    RBrack,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn tokenize(input: &str) -> Result<Vec<Tok>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                toks.push(Tok::DSlash);
                i += 2;
            }
            '/' => {
                toks.push(Tok::Slash);
                i += 1;
            }
            '@' => {
                toks.push(Tok::At);
                i += 1;
            }
            '*' => {
                toks.push(Tok::Star);
                i += 1;
            }
            '=' => {
                toks.push(Tok::Eq);
                i += 1;
            }
            ',' => {
                toks.push(Tok::Comma);
                i += 1;
            }
            '(' => {
                toks.push(Tok::LParen);
                i += 1;
            }
            ')' => {
                toks.push(Tok::RParen);
                i += 1;
            }
            '[' => {
                toks.push(Tok::LBrack);
                i += 1;
            }
            ']' => {
                toks.push(Tok::RBrack);
                i += 1;
            }
            '"' | '\'' => {
                let quote = c;
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && chars[j] != quote {
                    j += 1;
                }
                if j >= chars.len() {
                    return Err(format!("Unterminated string literal at offset {}", i));
                }
                toks.push(Tok::Str(chars[start..j].iter().collect()));
                i = j + 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                toks.push(Tok::Num(
                    text.parse().map_err(|_| format!("Bad number: {}", text))?,
                ));
            }
            c if is_name_char(c) => {
                let start = i;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                toks.push(Tok::Name(chars[start..i].iter().collect()));
            }
            other => return Err(format!("Unexpected character '{}'", other)),
        }
    }
    Ok(toks)
}

// --- Parser ---

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, tok: Tok) -> Result<(), String> {
        match self.next() {
            Some(t) if t == tok => Ok(()),
            other => Err(format!("Expected {:?}, found {:?}", tok, other)),
        }
    }

    fn parse_expr(&mut self) -> Result<XPathExpr, String> {
        // Outer positional wrapper: (path)[n]
        if self.peek() == Some(&Tok::LParen) {
            self.next();
            let steps = self.parse_path()?;
            self.expect(Tok::RParen)?;
            self.expect(Tok::LBrack)?;
            let n = match self.next() {
                Some(Tok::Num(n)) => n,
                other => return Err(format!("Expected position, found {:?}", other)),
            };
            self.expect(Tok::RBrack)?;
            if self.peek().is_some() {
                return Err("Trailing tokens after positional wrapper".to_string());
            }
            return Ok(XPathExpr {
                steps,
                outer_index: Some(n),
            });
        }

        let steps = self.parse_path()?;
        if self.peek().is_some() {
            return Err("Trailing tokens after location path".to_string());
        }
        Ok(XPathExpr {
            steps,
            outer_index: None,
        })
    }

    fn parse_path(&mut self) -> Result<Vec<Step>, String> {
        let mut steps = Vec::new();
        loop {
            let axis = match self.peek() {
                Some(Tok::DSlash) => {
                    self.next();
                    Axis::Descendant
                }
                Some(Tok::Slash) => {
                    self.next();
                    Axis::Child
                }
                _ if steps.is_empty() => {
                    return Err("Location path must start with / or //".to_string())
                }
                _ => break,
            };
            steps.push(self.parse_step(axis)?);
        }
        Ok(steps)
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, String> {
        let name = match self.next() {
            Some(Tok::Star) => None,
            Some(Tok::Name(n)) => Some(n),
            other => return Err(format!("Expected name test, found {:?}", other)),
        };
        let mut preds = Vec::new();
        while self.peek() == Some(&Tok::LBrack) {
            self.next();
            preds.push(self.parse_pred()?);
            self.expect(Tok::RBrack)?;
        }
        Ok(Step { axis, name, preds })
    }

    fn parse_pred(&mut self) -> Result<Pred, String> {
        if let Some(Tok::Num(n)) = self.peek() {
            let n = *n;
            self.next();
            return Ok(Pred::Position(n));
        }

        let mut attrs = Vec::new();
        loop {
            self.expect(Tok::At)?;
            let name = match self.next() {
                Some(Tok::Name(n)) => n,
                other => return Err(format!("Expected attribute name, found {:?}", other)),
            };
            let value = if self.peek() == Some(&Tok::Eq) {
                self.next();
                Some(self.parse_literal()?)
            } else {
                None
            };
            attrs.push((name, value));

            match self.peek() {
                Some(Tok::Name(n)) if n == "and" => {
                    self.next();
                }
                _ => break,
            }
        }
        Ok(Pred::Attrs(attrs))
    }

    fn parse_literal(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Tok::Str(s)) => Ok(s),
            Some(Tok::Name(n)) if n == "concat" => {
                self.expect(Tok::LParen)?;
                let mut out = String::new();
                loop {
                    match self.next() {
                        Some(Tok::Str(s)) => out.push_str(&s),
                        other => return Err(format!("Expected string in concat, found {:?}", other)),
                    }
                    match self.next() {
                        Some(Tok::Comma) => continue,
                        Some(Tok::RParen) => break,
                        other => return Err(format!("Expected , or ) in concat, found {:?}", other)),
                    }
                }
                Ok(out)
            }
            other => Err(format!("Expected string literal, found {:?}", other)),
        }
    }
}

/// Parse an expression into its step representation
pub fn parse(expr: &str) -> Result<XPathExpr, String> {
    let toks = tokenize(expr)?;
    if toks.is_empty() {
        return Err("Empty expression".to_string());
    }
    Parser { toks, pos: 0 }.parse_expr()
}

// --- Evaluation ---

fn eval_expr(doc: &Document, expr: &XPathExpr) -> Vec<NodeId> {
    // The initial context is the virtual document root, which has the root
    // element as its only child and every element as a descendant.
    let mut contexts: Vec<Option<NodeId>> = vec![None];

    for step in &expr.steps {
        let mut next: Vec<Option<NodeId>> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for ctx in &contexts {
            let candidates: Vec<NodeId> = match (ctx, step.axis) {
                (None, Axis::Child) => doc.root().into_iter().collect(),
                (None, Axis::Descendant) => doc.all_nodes().collect(),
                (Some(id), Axis::Child) => doc.get(*id).map(|n| n.children.clone()).unwrap_or_default(),
                (Some(id), Axis::Descendant) => doc.descendants(*id),
            };
            let mut group: Vec<NodeId> = candidates
                .into_iter()
                .filter(|&n| match &step.name {
                    Some(name) => doc.tag_name(n) == name,
                    None => true,
                })
                .collect();
            for pred in &step.preds {
                group = apply_pred(doc, group, pred);
            }
            for n in group {
                if seen.insert(n) {
                    next.push(Some(n));
                }
            }
        }
        contexts = next;
    }

    let mut result: Vec<NodeId> = contexts.into_iter().flatten().collect();
    if let Some(n) = expr.outer_index {
        result = match result.get(n.wrapping_sub(1)) {
            Some(&id) => vec![id],
            None => Vec::new(),
        };
    }
    result
}

fn apply_pred(doc: &Document, group: Vec<NodeId>, pred: &Pred) -> Vec<NodeId> {
    match pred {
        Pred::Position(n) => group
            .get(n.wrapping_sub(1))
            .map(|&id| vec![id])
            .unwrap_or_default(),
        Pred::Attrs(tests) => group
            .into_iter()
            .filter(|&id| {
                tests.iter().all(|(name, value)| match value {
                    Some(v) => doc.attr(id, name) == Some(v.as_str()),
                    None => doc.attr(id, name).is_some(),
                })
            })
            .collect(),
    }
}
