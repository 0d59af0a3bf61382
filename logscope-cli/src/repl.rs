//! Line commands understood by `logscope repl`.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use logscope_cache::{Clock, ExpiringCache};

pub const HELP: &str = "\
commands:
  set <key> <value>   store a value (value may contain spaces)
  get <key>           read a value
  del <key>           delete a key
  sleep <ms>          wait, letting entries age
  purge               drop every expired entry
  stats               print cache statistics as JSON
  len                 number of stored entries, expired included
  clear               remove everything
  help                this text
  quit                exit";

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Set { key: String, value: String },
    Get { key: String },
    Del { key: String },
    Sleep(Duration),
    Purge,
    Stats,
    Len,
    Clear,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: set <key> <value>"))?;
                Self::Set {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "get" => Self::Get { key: single_key(rest, "get")? },
            "del" | "delete" => Self::Del { key: single_key(rest, "del")? },
            "sleep" => {
                let ms: u64 = rest
                    .parse()
                    .with_context(|| format!("usage: sleep <ms>, got {rest:?}"))?;
                Self::Sleep(Duration::from_millis(ms))
            }
            "purge" => Self::Purge,
            "stats" => Self::Stats,
            "len" => Self::Len,
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, try `help`"),
        };
        Ok(Some(command))
    }

    /// Runs a cache command and returns the line to print.
    ///
    /// `Sleep` and `Quit` have no effect on the cache; the caller handles them.
    pub fn execute<C: Clock>(&self, cache: &ExpiringCache<String, C>) -> Result<String> {
        Ok(match self {
            Self::Set { key, value } => {
                cache.set(key.as_str(), value.clone());
                "OK".to_string()
            }
            Self::Get { key } => cache.get(key).unwrap_or_else(|| "(nil)".to_string()),
            Self::Del { key } => {
                cache.delete(key);
                "OK".to_string()
            }
            Self::Purge => format!("purged {}", cache.purge_expired()),
            Self::Stats => serde_json::to_string_pretty(&cache.stats())?,
            Self::Len => cache.len().to_string(),
            Self::Clear => {
                cache.clear();
                "OK".to_string()
            }
            Self::Help => HELP.to_string(),
            Self::Sleep(d) => format!("slept {}ms", d.as_millis()),
            Self::Quit => "bye".to_string(),
        })
    }
}

fn single_key(rest: &str, command: &str) -> Result<String> {
    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [key] => Ok((*key).to_string()),
        _ => bail!("usage: {command} <key>"),
    }
}
