use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

/// Host used when no subnet rule matches the client address.
pub const DEFAULT_HOST: &str = "localhost";

/// A compiled `subnet pattern -> backend host` rule.
struct HostRule {
    pattern: Regex,
    host: String,
}

/// Resolves the backend host for a client address from the ordered
/// `host-resolution` rules.
pub struct HostResolver {
    rules: Vec<HostRule>,
}

impl HostResolver {
    /// Compiles the rule list. Each entry is a single-key mapping from a
    /// subnet pattern to a host; patterns that fail to compile are dropped
    /// and can never match.
    pub fn new(entries: &[IndexMap<String, String>]) -> HostResolver {
        let rules = entries
            .iter()
            .filter_map(|entry| entry.iter().next())
            .filter_map(|(pattern, host)| match compile_pattern(pattern) {
                Ok(regex) => Some(HostRule {
                    pattern: regex,
                    host: host.clone(),
                }),
                Err(e) => {
                    warn!(pattern = %pattern, "Skipping malformed subnet pattern: {e}");
                    None
                }
            })
            .collect();

        HostResolver { rules }
    }

    /// Matches the client address against the rules in declaration order;
    /// the first full match wins. Falls back to [`DEFAULT_HOST`].
    pub fn resolve(&self, client_address: &str) -> &str {
        let resolved = self
            .rules
            .iter()
            .find(|rule| rule.pattern.is_match(client_address))
            .map(|rule| rule.host.as_str());

        match resolved {
            Some(host) => host,
            None => {
                debug!(client = %client_address, "No subnet rule matched, using default host");
                DEFAULT_HOST
            }
        }
    }
}

/// Dots in a pattern match literally and `*` matches one or more digits;
/// the whole address must match.
fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let expanded = pattern.replace('.', r"\.").replace('*', r"\d+");
    Regex::new(&format!("^{expanded}$"))
}
