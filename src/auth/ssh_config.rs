//! auth::ssh_config
//!
//! Read-only `ssh_config(5)` reader.
//!
//! Only what credential resolution needs: `Host` blocks with `*`/`?`
//! wildcards and `!` negation, case-insensitive keys, first-value-wins
//! semantics and an accumulating `IdentityFile` list. `Match` blocks never
//! apply and `Include` is skipped.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Key whose values accumulate across matching blocks.
pub const IDENTITY_FILE: &str = "identityfile";

/// Options resolved for one host.
///
/// Keys are lower-cased. Every key maps to at least one value; only
/// `identityfile` ever has more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostProfile {
    options: BTreeMap<String, Vec<String>>,
}

impl HostProfile {
    /// First value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .get(&key.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Identity files in file order (empty when none configured).
    pub fn identity_files(&self) -> &[String] {
        self.options
            .get(IDENTITY_FILE)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Selector {
    /// `Host` patterns; a leading `!` negates.
    Host(Vec<String>),
    /// `Match` criteria are not evaluated.
    Match,
}

#[derive(Debug, Clone)]
struct Block {
    selector: Selector,
    options: Vec<(String, String)>,
}

impl Block {
    fn matches(&self, host: &str) -> bool {
        let patterns = match &self.selector {
            Selector::Host(patterns) => patterns,
            Selector::Match => return false,
        };

        let mut matched = false;
        for pattern in patterns {
            if let Some(negated) = pattern.strip_prefix('!') {
                if glob_match(negated, host) {
                    return false;
                }
            } else if glob_match(pattern, host) {
                matched = true;
            }
        }
        matched
    }
}

/// Parsed SSH configuration.
#[derive(Debug, Clone, Default)]
pub struct SshConfig {
    blocks: Vec<Block>,
}

impl SshConfig {
    /// Read a configuration file. A missing file yields an empty config.
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Parse configuration text. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        // Options before the first Host line apply to every host.
        let mut blocks = vec![Block {
            selector: Selector::Host(vec!["*".to_string()]),
            options: Vec::new(),
        }];

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = split_option(line) else {
                continue;
            };

            match key.as_str() {
                "host" => blocks.push(Block {
                    selector: Selector::Host(
                        value.split_whitespace().map(unquote).map(String::from).collect(),
                    ),
                    options: Vec::new(),
                }),
                "match" => blocks.push(Block {
                    selector: Selector::Match,
                    options: Vec::new(),
                }),
                "include" => {}
                _ => {
                    if let Some(block) = blocks.last_mut() {
                        block.options.push((key, unquote(value).to_string()));
                    }
                }
            }
        }

        Self { blocks }
    }

    /// Resolve the options for `host`.
    ///
    /// `%h`, `%d` and `%%` in identity-file values are expanded with the
    /// host and `home`.
    pub fn lookup(&self, host: &str, home: &Path) -> HostProfile {
        let host = host.to_lowercase();
        let mut options: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for block in self.blocks.iter().filter(|b| b.matches(&host)) {
            for (key, value) in &block.options {
                if key == IDENTITY_FILE {
                    options
                        .entry(key.clone())
                        .or_default()
                        .push(expand_tokens(value, &host, home));
                } else {
                    options
                        .entry(key.clone())
                        .or_insert_with(|| vec![value.clone()]);
                }
            }
        }

        HostProfile { options }
    }
}

/// Split `Key value` / `Key=value` / `Key = value`, lower-casing the key.
fn split_option(line: &str) -> Option<(String, &str)> {
    let key_end = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let key = &line[..key_end];
    let rest = line[key_end..].trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    if key.is_empty() || rest.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), rest))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn expand_tokens(value: &str, host: &str, home: &Path) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('h') => out.push_str(host),
            Some('d') => out.push_str(&home.to_string_lossy()),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Shell-style match supporting `*` and `?`, case-insensitive.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
