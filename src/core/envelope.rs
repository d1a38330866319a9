//! Message envelope structure
//!
//! An envelope is the immutable snapshot handed to the delivery queue: the
//! level, the capture-time timestamp, the message body, and the fully merged
//! attribute set. Mutating the base's attributes after enqueue never changes
//! an envelope already in flight.

use super::attrs::{AttrSet, AttrValue};
use super::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Clock used to stamp envelopes; overridable for replay and testing
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The default wall clock
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// The message payload of an envelope.
///
/// `Rendered` carries a final string; `Template` defers positional `{}`
/// substitution until the dispatcher sends the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageBody {
    Rendered(String),
    Template {
        template: String,
        args: Vec<AttrValue>,
    },
}

impl MessageBody {
    pub fn rendered(message: impl Into<String>) -> Self {
        MessageBody::Rendered(message.into())
    }

    pub fn template(template: impl Into<String>, args: Vec<AttrValue>) -> Self {
        MessageBody::Template {
            template: template.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub body: MessageBody,
    pub attrs: AttrSet,
}

impl Envelope {
    pub fn new(level: Level, timestamp: DateTime<Utc>, body: MessageBody, attrs: AttrSet) -> Self {
        Self {
            level,
            timestamp,
            body,
            attrs,
        }
    }

    /// Produce the final message string.
    ///
    /// Template bodies substitute each `{}` placeholder with the next
    /// positional argument; surplus placeholders are left verbatim and
    /// surplus arguments are ignored. The result is sanitized so a message
    /// cannot inject fake log lines into line-oriented destinations.
    pub fn render(&self) -> String {
        let raw = match &self.body {
            MessageBody::Rendered(s) => s.clone(),
            MessageBody::Template { template, args } => {
                let mut out = String::with_capacity(template.len());
                let mut rest = template.as_str();
                let mut next = args.iter();
                while let Some(idx) = rest.find("{}") {
                    out.push_str(&rest[..idx]);
                    match next.next() {
                        Some(arg) => out.push_str(&arg.to_string()),
                        None => out.push_str("{}"),
                    }
                    rest = &rest[idx + 2..];
                }
                out.push_str(rest);
                out
            }
        };
        sanitize(&raw)
    }
}

/// Escape newlines, carriage returns, and tabs to keep one record per line
fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
