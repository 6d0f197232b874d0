//! MySQL option file (`my.cnf`) reader.
//!
//! Only the handful of connection keys the audit needs are consulted. Groups
//! are read in increasing priority: `[client]`, `[mysql]`, `[mysql-audit]`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{ConfigError, ConnectionSettings};

/// Option groups consulted, lowest priority first.
const GROUPS: [&str; 3] = ["client", "mysql", "mysql-audit"];

/// Parsed contents of a MySQL option file.
#[derive(Debug, Clone, Default)]
pub struct OptionFile {
    groups: HashMap<String, HashMap<String, String>>,
}

impl OptionFile {
    /// Read and parse an option file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "Loaded option file");
        Ok(Self::parse(&content))
    }

    /// Parse option file text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('!') {
                tracing::debug!(directive = line, "Ignoring option file directive");
                continue;
            }
            if let Some((name, _)) = line.strip_prefix('[').and_then(|l| l.split_once(']')) {
                current = Some(name.trim().to_ascii_lowercase());
                continue;
            }
            let Some(group) = current.as_ref() else {
                continue;
            };
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), parse_value(value)),
                None => (strip_comment(line), String::new()),
            };
            groups
                .entry(group.clone())
                .or_default()
                .insert(key.replace('-', "_").to_ascii_lowercase(), value);
        }

        Self { groups }
    }

    /// Look a key up across the consulted groups, highest priority first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        GROUPS
            .iter()
            .rev()
            .filter_map(|group| self.groups.get(*group))
            .find_map(|values| values.get(key))
            .map(String::as_str)
    }

    /// Overwrite connection settings with whatever the file provides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `port` is not a number.
    pub fn apply(&self, settings: &mut ConnectionSettings) -> Result<(), ConfigError> {
        if let Some(host) = self.get("host") {
            settings.host = host.to_string();
        }
        if let Some(user) = self.get("user") {
            settings.user = user.to_string();
        }
        if let Some(password) = self.get("password") {
            settings.password = Some(password.to_string());
        }
        if let Some(socket) = self.get("socket") {
            settings.socket = Some(PathBuf::from(socket));
        }
        if let Some(port) = self.get("port") {
            settings.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "port".to_string(),
                value: port.to_string(),
                reason: "expected a TCP port number".to_string(),
            })?;
        }
        Ok(())
    }

    /// Connection settings for a run given `--defaults-file`.
    ///
    /// The option file replaces every other connection source: settings
    /// start from the built-in defaults, not from `settings`. Without a
    /// defaults file `settings` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the option file cannot be read or holds an
    /// invalid value.
    pub fn resolve(settings: ConnectionSettings) -> Result<ConnectionSettings, ConfigError> {
        let Some(path) = settings.defaults_file.clone() else {
            return Ok(settings);
        };
        let mut resolved = ConnectionSettings {
            defaults_file: Some(path.clone()),
            ..ConnectionSettings::default()
        };
        Self::load(&path)?.apply(&mut resolved)?;
        Ok(resolved)
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(head, _)| head).trim_end()
}

/// Read a value up to its closing quote or, unquoted, up to a `#` comment.
///
/// Backslash escapes are resolved in both forms. An unknown escape keeps its
/// backslash so Windows paths survive.
fn parse_value(raw: &str) -> String {
    let raw = raw.trim();
    let mut chars = raw.chars().peekable();
    let quote = chars.next_if(|&c| matches!(c, '"' | '\''));

    let mut value = String::with_capacity(raw.len());
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => match unescape(escaped) {
                    Some(resolved) => value.push(resolved),
                    None => {
                        value.push('\\');
                        value.push(escaped);
                    }
                },
                None => value.push('\\'),
            },
            c if Some(c) == quote => return value,
            '#' if quote.is_none() => break,
            c => value.push(c),
        }
    }
    value.trim_end().to_string()
}

fn unescape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        's' => Some(' '),
        '\\' | '"' | '\'' => Some(c),
        _ => None,
    }
}
