use crate::error::{CallArgsError, DeclarationError};

/// A dynamically-typed parameter value. Covers the literal kinds the
/// call-parameter grammar recognizes (spec.md §6): quoted strings, integers,
/// booleans — plus floats, needed once a node writes a computed output.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// One call-parameter position: either a literal value, or a reference to
/// one of the parent's own parameter slots (sigil-prefixed name, sigil
/// stripped on parse).
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    Literal(Value),
    Ref(String),
}

/// Parses a node's declaration string `"?in1 ?in2 => ?out1"` into
/// (input names, output names) with the leading `?` stripped from each name.
/// The `=>` separator is optional when there are no outputs.
pub fn parse_declaration(decl: &str) -> Result<(Vec<String>, Vec<String>), DeclarationError> {
    let decl = decl.trim();
    if decl.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut parts = decl.splitn(3, "=>");
    let first = parts.next().unwrap_or("").trim();
    let second = parts.next().map(str::trim);
    if parts.next().is_some() {
        return Err(DeclarationError::MultipleSeparators);
    }

    let inputs = parse_name_list(first)?;
    let outputs = match second {
        Some(s) => parse_name_list(s)?,
        None => Vec::new(),
    };
    Ok((inputs, outputs))
}

fn parse_name_list(s: &str) -> Result<Vec<String>, DeclarationError> {
    s.split_whitespace()
        .map(|token| {
            token
                .strip_prefix('?')
                .map(str::to_string)
                .ok_or_else(|| DeclarationError::MissingSigil(token.to_string()))
        })
        .collect()
}

/// Parses a parent's call-parameter string into position-matched arguments.
/// Each token is a quoted string (`"Alice"`), `True`/`False`, an integer, a
/// float, or a `?`-prefixed reference to one of the parent's own slots.
pub fn parse_call_args(s: &str) -> Result<Vec<CallArg>, CallArgsError> {
    tokenize(s)?
        .into_iter()
        .map(|token| parse_call_arg(&token))
        .collect()
}

fn parse_call_arg(token: &str) -> Result<CallArg, CallArgsError> {
    if let Some(rest) = token.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return Ok(CallArg::Literal(Value::Str(rest.to_string())));
    }
    match token {
        "True" => return Ok(CallArg::Literal(Value::Bool(true))),
        "False" => return Ok(CallArg::Literal(Value::Bool(false))),
        _ => {}
    }
    if let Some(name) = token.strip_prefix('?') {
        return Ok(CallArg::Ref(name.to_string()));
    }
    if let Ok(i) = token.parse::<i64>() {
        return Ok(CallArg::Literal(Value::Int(i)));
    }
    if let Ok(f) = token.parse::<f64>() {
        return Ok(CallArg::Literal(Value::Float(f)));
    }
    Err(CallArgsError::UnrecognizedToken(token.to_string()))
}

/// Splits a call-parameter string on whitespace, except inside `"..."`.
fn tokenize(s: &str) -> Result<Vec<String>, CallArgsError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                current.push('"');
                in_quotes = !in_quotes;
                if !in_quotes {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(CallArgsError::UnterminatedString(s.to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
