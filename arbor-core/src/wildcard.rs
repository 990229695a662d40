use regex::Regex;

/// Compiles a `?`/`*` wildcard string (`?` = one character, `*` = any
/// characters) into a prefix-anchored matcher. Anchored at the start only —
/// not the full string — mirroring the `re.match` semantics the original
/// `ControlNode.__wildcard_to_regex` relied on in `examples/original_source`.
/// No other regex metacharacters are interpreted; everything but `?`/`*` is
/// matched literally.
pub struct WildcardMatcher {
    re: Regex,
}

impl WildcardMatcher {
    pub fn new(wildcard: &str) -> Self {
        let mut pattern = String::with_capacity(wildcard.len() + 1);
        pattern.push('^');
        for c in wildcard.chars() {
            match c {
                '?' => pattern.push('.'),
                '*' => pattern.push_str(".*"),
                other => pattern.push_str(&regex::escape(&other.to_string())),
            }
        }
        let re = Regex::new(&pattern).expect("wildcard translation always yields valid regex");
        Self { re }
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.re.is_match(s)
    }
}
