//! Template compilation: `/users/{id}` → anchored regex plus ordered capture names.
//!
//! Hot path note: templates are compiled once when a route is built. Matching
//! only runs the compiled regex and copies captured values.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;

/// Which part of the address a template applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Captures stop at `/`
    Path,
    /// Captures stop at `.`, matching is case-insensitive
    Host,
}

impl TemplateKind {
    fn separator(self) -> char {
        match self {
            TemplateKind::Path => '/',
            TemplateKind::Host => '.',
        }
    }

    /// Capture pattern when no requirement is given. A capture followed by
    /// literal text also stops at that text's first character, so
    /// `{name}.{ext}` splits `a.tar.gz` the same way generation validated it.
    fn default_pattern(self, next: Option<char>) -> String {
        let mut class = String::from("[^");
        push_class_char(&mut class, self.separator());
        if let Some(c) = next.filter(|c| *c != self.separator()) {
            push_class_char(&mut class, c);
        }
        class.push_str("]+");
        class
    }
}

fn push_class_char(class: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        class.push('\\');
    }
    class.push(c);
}

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    /// Index into [`Template::captures`]
    Capture(usize),
}

/// A named capture and the pattern its value must satisfy.
#[derive(Debug, Clone)]
pub struct Capture {
    pub name: Arc<str>,
    /// Anchored `^(?:...)$` form of the effective pattern (the requirement,
    /// or the default). Applies to the URL-encoded value, which is what the
    /// template regex sees when matching.
    pub pattern: Regex,
}

/// A compiled path or host template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    regex: Regex,
    tokens: Vec<Token>,
    captures: Vec<Capture>,
}

impl Template {
    /// Compile `source`. `requirements` maps capture names to regex fragments
    /// replacing the default capture pattern.
    ///
    /// Errors are plain strings; the route builder wraps them with the route name.
    pub fn compile(
        source: &str,
        kind: TemplateKind,
        requirements: &HashMap<String, String>,
    ) -> Result<Self, String> {
        let tokens_raw = tokenize(source)?;

        let mut pattern = String::with_capacity(source.len() + 8);
        if kind == TemplateKind::Host {
            pattern.push_str("(?i)");
        }
        pattern.push('^');

        let mut tokens = Vec::with_capacity(tokens_raw.len());
        let mut captures: Vec<Capture> = Vec::new();
        let mut raws = tokens_raw.into_iter().peekable();
        while let Some(raw) = raws.next() {
            match raw {
                RawToken::Literal(text) => {
                    pattern.push_str(&regex::escape(&text));
                    tokens.push(Token::Literal(text));
                }
                RawToken::Capture(name) => {
                    if captures.iter().any(|c| c.name.as_ref() == name) {
                        return Err(format!("duplicate capture '{{{name}}}'"));
                    }
                    let next = match raws.peek() {
                        Some(RawToken::Literal(text)) => text.chars().next(),
                        _ => None,
                    };
                    let fragment = match requirements.get(&name) {
                        Some(req) => req.clone(),
                        None => kind.default_pattern(next),
                    };
                    pattern.push_str(&format!("(?P<p{}>{})", captures.len(), fragment));
                    let flags = if kind == TemplateKind::Host { "(?i)" } else { "" };
                    let anchored = Regex::new(&format!("{flags}^(?:{fragment})$"))
                        .map_err(|e| format!("invalid requirement for '{name}': {e}"))?;
                    tokens.push(Token::Capture(captures.len()));
                    captures.push(Capture {
                        name: Arc::from(name.as_str()),
                        pattern: anchored,
                    });
                }
            }
        }
        pattern.push('$');

        let regex = RegexBuilder::new(&pattern)
            .build()
            .map_err(|e| format!("template '{source}' does not compile: {e}"))?;

        Ok(Self {
            source: source.to_string(),
            regex,
            tokens,
            captures,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    /// Capture names in template order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.captures.iter().map(|c| c.name.as_ref())
    }

    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Match `input` and return `(name, value)` pairs in template order.
    #[must_use]
    pub fn match_captures(&self, input: &str) -> Option<Vec<(&Arc<str>, String)>> {
        let caps = self.regex.captures(input)?;
        let mut values = Vec::with_capacity(self.captures.len());
        for (i, capture) in self.captures.iter().enumerate() {
            let raw = caps.name(&format!("p{i}"))?.as_str();
            let value = urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            values.push((&capture.name, value));
        }
        Some(values)
    }
}

enum RawToken {
    Literal(String),
    Capture(String),
}

fn tokenize(source: &str) -> Result<Vec<RawToken>, String> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    if n == '{' {
                        return Err(format!("nested '{{' in template '{source}'"));
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(format!("unclosed '{{' in template '{source}'"));
                }
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(format!("empty capture name in template '{source}'"));
                }
                if !literal.is_empty() {
                    tokens.push(RawToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(RawToken::Capture(name));
            }
            '}' => return Err(format!("unbalanced '}}' in template '{source}'")),
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        tokens.push(RawToken::Literal(literal));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(source: &str) -> Template {
        Template::compile(source, TemplateKind::Path, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_root_path() {
        let t = path("/");
        assert!(t.is_match("/"));
        assert!(!t.is_match("/x"));
        assert_eq!(t.captures().len(), 0);
    }

    #[test]
    fn test_parameterized_path() {
        let t = path("/items/{id}");
        assert!(t.is_match("/items/123"));
        assert!(!t.is_match("/items/123/extra"));
        assert_eq!(t.capture_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_sub_segment_captures() {
        let t = path("/files/{name}.{ext}");
        let caps = t.match_captures("/files/report.pdf").unwrap();
        let caps: Vec<_> = caps.iter().map(|(k, v)| (k.as_ref(), v.as_str())).collect();
        assert_eq!(caps, vec![("name", "report"), ("ext", "pdf")]);
    }

    #[test]
    fn test_capture_stops_at_following_literal() {
        let t = path("/files/{name}.{ext}");
        let caps = t.match_captures("/files/a.tar.gz").unwrap();
        assert_eq!(caps[0].1, "a");
        assert_eq!(caps[1].1, "tar.gz");
        assert!(!t.captures()[0].pattern.is_match("a.tar"));
        assert!(t.captures()[1].pattern.is_match("tar.gz"));

        let t = Template::compile("{env}-{tenant}.example.com", TemplateKind::Host, &HashMap::new())
            .unwrap();
        assert!(!t.captures()[0].pattern.is_match("qa-eu"));
        assert!(t.captures()[1].pattern.is_match("ACME"));
    }

    #[test]
    fn test_literal_text_is_escaped() {
        let t = path("/v1.0/items");
        assert!(t.is_match("/v1.0/items"));
        assert!(!t.is_match("/v1x0/items"));
    }

    #[test]
    fn test_requirement_restricts_capture() {
        let mut reqs = HashMap::new();
        reqs.insert("id".to_string(), r"\d+".to_string());
        let t = Template::compile("/users/{id}", TemplateKind::Path, &reqs).unwrap();
        assert!(t.is_match("/users/42"));
        assert!(!t.is_match("/users/abc"));
        assert!(t.captures()[0].pattern.is_match("7"));
        assert!(!t.captures()[0].pattern.is_match("7a"));
    }

    #[test]
    fn test_host_template_is_case_insensitive() {
        let t = Template::compile("{tenant}.example.com", TemplateKind::Host, &HashMap::new())
            .unwrap();
        let caps = t.match_captures("ACME.example.com").unwrap();
        assert_eq!(caps[0].1, "ACME");
        assert!(!t.is_match("a.b.example.com"));
    }

    #[test]
    fn test_malformed_templates() {
        for bad in ["/a/{id", "/a/id}", "/a/{}", "/a/{x}/{x}", "/a/{{x}}"] {
            assert!(
                Template::compile(bad, TemplateKind::Path, &HashMap::new()).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_percent_encoded_values_are_decoded() {
        let t = path("/tags/{tag}");
        let caps = t.match_captures("/tags/rust%20lang").unwrap();
        assert_eq!(caps[0].1, "rust lang");
    }
}
