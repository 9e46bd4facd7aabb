//! Template syntax: tokenizer and block parser.
//!
//! Recognized tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `{{name}}` | substitution (escaped per [`EscapeMode`](super::EscapeMode)) |
//! | `{{{name}}}` | raw substitution |
//! | `{{! text }}` | comment |
//! | `{{#if name}}` / `{{#unless name}}` | conditional, optional `{{else}}` |
//! | `{{#each name}}` | iteration, optional `{{else}}` for empty lists |
//! | `{{/if}}`, `{{/unless}}`, `{{/each}}` | block close |
//!
//! A block, `else` or comment tag that is the only thing on its line removes
//! the whole line, newline included.

use std::fmt;

use kiln_core::domain::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Unless,
    Each,
}

impl BlockKind {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "if" => Some(Self::If),
            "unless" => Some(Self::Unless),
            "each" => Some(Self::Each),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::If => "if",
            Self::Unless => "unless",
            Self::Each => "each",
        })
    }
}

/// Parsed template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Var {
        name: String,
        raw: bool,
        line: usize,
    },
    Block {
        kind: BlockKind,
        name: String,
        body: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Var { name: String, raw: bool, line: usize },
    Open { kind: BlockKind, name: String, line: usize },
    Else { line: usize },
    Close { kind: BlockKind, line: usize },
    Comment,
}

impl Token {
    fn is_standalone_candidate(&self) -> bool {
        !matches!(self, Self::Text(_) | Self::Var { .. })
    }
}

/// Parse `source` into a node tree.
pub fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    build_tree(tokenize(source)?)
}

fn malformed(reason: impl Into<String>, line: usize) -> TemplateError {
    TemplateError::MalformedBlock {
        reason: reason.into(),
        line,
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find("{{") {
        let start = cursor + found;
        let line = line_of(source, start);

        let (inner, end, raw) = if source[start..].starts_with("{{{") {
            let close = source[start + 3..]
                .find("}}}")
                .ok_or_else(|| malformed("unterminated '{{{' tag", line))?;
            (&source[start + 3..start + 3 + close], start + 3 + close + 3, true)
        } else {
            let close = source[start + 2..]
                .find("}}")
                .ok_or_else(|| malformed("unterminated '{{' tag", line))?;
            (&source[start + 2..start + 2 + close], start + 2 + close + 2, false)
        };

        let token = classify(inner.trim(), raw, line)?;

        let (text_end, next) = if token.is_standalone_candidate() {
            standalone_bounds(source, start, end).unwrap_or((start, end))
        } else {
            (start, end)
        };

        if text_end > text_start {
            tokens.push(Token::Text(source[text_start..text_end].to_string()));
        }
        tokens.push(token);
        text_start = next;
        cursor = next;
    }

    if text_start < source.len() {
        tokens.push(Token::Text(source[text_start..].to_string()));
    }
    Ok(tokens)
}

/// If the tag at `start..end` is alone on its line, the bounds of the text
/// to keep before it and the offset to resume after it.
fn standalone_bounds(source: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if !source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let rest = &source[end..];
    let line_end = rest.find('\n');
    let tail = &rest[..line_end.unwrap_or(rest.len())];
    if !tail.chars().all(|c| c == ' ' || c == '\t' || c == '\r') {
        return None;
    }

    let resume = match line_end {
        Some(nl) => end + nl + 1,
        None => source.len(),
    };
    Some((line_start, resume))
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

fn classify(inner: &str, raw: bool, line: usize) -> Result<Token, TemplateError> {
    if raw {
        return Ok(Token::Var {
            name: variable_name(inner, line)?,
            raw: true,
            line,
        });
    }

    if inner.starts_with('!') {
        return Ok(Token::Comment);
    }

    if let Some(rest) = inner.strip_prefix('#') {
        let mut parts = rest.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let kind = BlockKind::parse(word)
            .ok_or_else(|| malformed(format!("unknown block helper '#{word}'"), line))?;
        let name = parts
            .next()
            .ok_or_else(|| malformed(format!("'#{kind}' needs a variable name"), line))?;
        if parts.next().is_some() {
            return Err(malformed(format!("'#{kind}' takes a single argument"), line));
        }
        return Ok(Token::Open {
            kind,
            name: variable_name(name, line)?,
            line,
        });
    }

    if let Some(rest) = inner.strip_prefix('/') {
        let word = rest.trim();
        let kind = BlockKind::parse(word)
            .ok_or_else(|| malformed(format!("unknown closing tag '/{word}'"), line))?;
        return Ok(Token::Close { kind, line });
    }

    if inner == "else" {
        return Ok(Token::Else { line });
    }

    Ok(Token::Var {
        name: variable_name(inner, line)?,
        raw: false,
        line,
    })
}

fn variable_name(name: &str, line: usize) -> Result<String, TemplateError> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '$'));
    if valid {
        Ok(name.to_string())
    } else {
        Err(malformed(format!("invalid variable name '{name}'"), line))
    }
}

struct Frame {
    kind: BlockKind,
    name: String,
    line: usize,
    body: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl Frame {
    fn current(&mut self) -> &mut Vec<Node> {
        match &mut self.otherwise {
            Some(nodes) => nodes,
            None => &mut self.body,
        }
    }
}

fn build_tree(tokens: Vec<Token>) -> Result<Vec<Node>, TemplateError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokens {
        let node = match token {
            Token::Comment => continue,
            Token::Text(text) => Node::Text(text),
            Token::Var { name, raw, line } => Node::Var { name, raw, line },
            Token::Open { kind, name, line } => {
                stack.push(Frame {
                    kind,
                    name,
                    line,
                    body: Vec::new(),
                    otherwise: None,
                });
                continue;
            }
            Token::Else { line } => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| malformed("'else' outside of a block", line))?;
                if frame.otherwise.is_some() {
                    return Err(malformed(
                        format!("second 'else' in '#{}' block", frame.kind),
                        line,
                    ));
                }
                frame.otherwise = Some(Vec::new());
                continue;
            }
            Token::Close { kind, line } => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| malformed(format!("stray closing tag '/{kind}'"), line))?;
                if frame.kind != kind {
                    return Err(malformed(
                        format!(
                            "'/{kind}' closes '#{} {}' opened on line {}",
                            frame.kind, frame.name, frame.line
                        ),
                        line,
                    ));
                }
                Node::Block {
                    kind: frame.kind,
                    name: frame.name,
                    body: frame.body,
                    otherwise: frame.otherwise.unwrap_or_default(),
                    line: frame.line,
                }
            }
        };

        match stack.last_mut() {
            Some(frame) => frame.current().push(node),
            None => root.push(node),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(malformed(
            format!("unterminated '#{} {}' block", open.kind, open.name),
            open.line,
        ));
    }
    Ok(root)
}
