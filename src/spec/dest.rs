//! Destination expressions: the right-hand side of `=>`.
//!
//! Precedence, first match wins:
//! 1) `END`                      => Terminal
//! 2) `a, b, c`                  => Parallel([a, b, c])
//! 3) `[worker(item in queue)]`  => DynamicFanOut(worker, item, queue)
//! 4) anything else              => Single(text)

use crate::error::{Error, Result};
use crate::spec::graph::{Destination, END};
use regex::Regex;

const FAN_OUT_RE: &str = r"^\[\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s+in\s+([A-Za-z_][A-Za-z0-9_]*)\s*\)\s*\]$";

#[derive(Debug, Clone)]
pub struct DestParser {
    fan_out: Regex,
}

impl DestParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fan_out: Regex::new(FAN_OUT_RE)?,
        })
    }

    /// Classify a raw destination. Errors carry line 0; callers attach the line.
    pub fn parse(&self, raw: &str) -> Result<Destination> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(Error::format(0, raw, "empty destination"));
        }

        if text == END {
            return Ok(Destination::Terminal);
        }

        if text.contains(',') {
            let names: Vec<String> = text.split(',').map(|s| s.trim().to_string()).collect();
            if names.iter().any(|n| n.is_empty()) {
                return Err(Error::format(0, text, "empty member in parallel destination"));
            }
            if names.iter().any(|n| n == END) {
                return Err(Error::format(0, text, "END cannot be a member of a parallel destination"));
            }
            return Ok(Destination::Parallel { names });
        }

        if text.starts_with('[') || text.ends_with(']') {
            let caps = self.fan_out.captures(text).ok_or_else(|| {
                Error::format(0, text, "expected fan-out of the form [func(var in field)]")
            })?;
            return Ok(Destination::DynamicFanOut {
                function: caps[1].to_string(),
                var: caps[2].to_string(),
                field: caps[3].to_string(),
            });
        }

        Ok(Destination::Single {
            name: text.to_string(),
        })
    }
}
