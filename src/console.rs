//! Interactive console
//!
//! Parses one command per input line and runs it against the [`AppContext`],
//! printing results through the [`DisplayFormatter`].

use tracing::debug;

use crate::context::AppContext;
use crate::error::{ConsoleError, Result};
use crate::models::{RequeueOperation, SendMessageRequest};
use crate::utils::display::DisplayFormatter;

pub const HELP: &str = "\
Commands:
  connections                        - List configured broker connections
  use <connection id>                - Switch to another connection
  activate <connection id>           - Test a connection and make it the backend's active one
  status                             - Check that the current connection answers
  queues                             - List queues of the current connection
  messages <queue>                   - List messages in a queue
  send <queue> <body>                - Send a text message to a queue
  delete <queue> <message id>        - Delete one message
  purge <queue>                      - Delete every message in a queue
  requeue <from> <to> <id,id> [cut]  - Copy (or move, with cut) messages to another queue
  metrics                            - Show broker metrics
  cache clear                        - Drop all cached responses
  help                               - Show this help
  exit                               - Exit the program";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Connections,
    Use(String),
    Activate(String),
    Status,
    Queues,
    Messages(String),
    Send { queue: String, body: String },
    Delete { queue: String, message_id: String },
    Purge(String),
    Requeue {
        source: String,
        target: String,
        message_ids: Vec<String>,
        operation: RequeueOperation,
    },
    Metrics,
    ClearCache,
}

fn usage(text: &str) -> ConsoleError {
    ConsoleError::Other(format!("usage: {}", text))
}

impl Command {
    /// Parses an input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (name, args.as_slice()) {
            ("", _) => return Ok(None),
            ("help", _) => Command::Help,
            ("exit" | "quit", _) => Command::Exit,
            ("connections", []) => Command::Connections,
            ("use", [id]) => Command::Use(id.to_string()),
            ("use", _) => return Err(usage("use <connection id>")),
            ("activate", [id]) => Command::Activate(id.to_string()),
            ("activate", _) => return Err(usage("activate <connection id>")),
            ("status", []) => Command::Status,
            ("queues", []) => Command::Queues,
            ("messages", [queue]) => Command::Messages(queue.to_string()),
            ("messages", _) => return Err(usage("messages <queue>")),
            ("send", [queue, _, ..]) => {
                // The body is everything after the queue name, spaces included.
                let body = rest[queue.len()..].trim_start();
                Command::Send {
                    queue: queue.to_string(),
                    body: body.to_string(),
                }
            }
            ("send", _) => return Err(usage("send <queue> <body>")),
            ("delete", [queue, id]) => Command::Delete {
                queue: queue.to_string(),
                message_id: id.to_string(),
            },
            ("delete", _) => return Err(usage("delete <queue> <message id>")),
            ("purge", [queue]) => Command::Purge(queue.to_string()),
            ("purge", _) => return Err(usage("purge <queue>")),
            ("requeue", [source, target, ids, mode @ ..]) if mode.len() <= 1 => {
                let operation = match mode.first() {
                    None | Some(&"copy") => RequeueOperation::Copy,
                    Some(&"cut") => RequeueOperation::Cut,
                    Some(_) => return Err(usage("requeue <from> <to> <id,id> [copy|cut]")),
                };
                Command::Requeue {
                    source: source.to_string(),
                    target: target.to_string(),
                    message_ids: ids
                        .split(',')
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect(),
                    operation,
                }
            }
            ("requeue", _) => return Err(usage("requeue <from> <to> <id,id> [copy|cut]")),
            ("metrics", []) => Command::Metrics,
            ("cache", ["clear"]) => Command::ClearCache,
            _ => {
                return Err(ConsoleError::Other(format!(
                    "unknown command '{}', type 'help' for a list",
                    line
                )))
            }
        };

        Ok(Some(command))
    }
}

pub struct Console<'a> {
    ctx: &'a AppContext,
    display: DisplayFormatter,
    connection_id: Option<String>,
}

impl<'a> Console<'a> {
    pub fn new(ctx: &'a AppContext, connection_id: Option<String>) -> Self {
        Self {
            ctx,
            display: DisplayFormatter::new(),
            connection_id,
        }
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    fn require_connection(&self) -> Result<&str> {
        self.connection_id
            .as_deref()
            .ok_or_else(|| ConsoleError::Other("no connection selected, run 'use <connection id>'".to_string()))
    }

    /// Runs one command and returns its printable output.
    pub async fn execute(&mut self, command: &Command) -> Result<String> {
        debug!("Executing {:?}", command);
        let output = match command {
            Command::Help => HELP.to_string(),
            Command::Exit => String::new(),
            Command::Connections => {
                let connections = self.ctx.connections.list().await?;
                self.display.format_connections(&connections, self.connection_id())
            }
            Command::Use(id) => {
                let connection = self.ctx.connections.get(id).await?;
                self.connection_id = Some(connection.id.clone());
                self.display
                    .format_success(&format!("using {} ({}:{})", connection.name, connection.host, connection.port))
            }
            Command::Activate(id) => {
                let connection = self.ctx.connections.activate(id).await?;
                self.connection_id = Some(connection.id.clone());
                self.display.format_success(&format!("{} is now active", connection.name))
            }
            Command::Status => {
                let connectivity = self.ctx.broker.check_connectivity(self.connection_id()).await;
                match connectivity.error {
                    None => self.display.format_success("broker is reachable"),
                    Some(error) => self.display.format_error(&error),
                }
            }
            Command::Queues => {
                let connection_id = self.require_connection()?;
                let queues = self.ctx.broker.fetch_queues(connection_id).await?;
                self.display.format_queues(&queues)
            }
            Command::Messages(queue) => {
                let connection_id = self.require_connection()?;
                let messages = self.ctx.broker.fetch_messages(queue, connection_id).await?;
                self.display.format_messages(queue, &messages)
            }
            Command::Send { queue, body } => {
                let connection_id = self.require_connection()?;
                let confirmation = self
                    .ctx
                    .broker
                    .send_message(queue, &SendMessageRequest::text(body.as_str()), connection_id)
                    .await?;
                self.display.format_success(&confirmation)
            }
            Command::Delete { queue, message_id } => {
                let connection_id = self.require_connection()?;
                self.ctx.broker.delete_message(queue, message_id, connection_id).await?;
                self.display.format_success(&format!("deleted {}", message_id))
            }
            Command::Purge(queue) => {
                let connection_id = self.require_connection()?;
                self.ctx.broker.purge_queue(queue, connection_id).await?;
                self.display.format_success(&format!("purged {}", queue))
            }
            Command::Requeue {
                source,
                target,
                message_ids,
                operation,
            } => {
                let connection_id = self.require_connection()?;
                let moved = self
                    .ctx
                    .broker
                    .requeue_messages(source, target, message_ids, *operation, connection_id)
                    .await?;
                let verb = match operation {
                    RequeueOperation::Copy => "copied",
                    RequeueOperation::Cut => "moved",
                };
                self.display
                    .format_success(&format!("{} {} messages from {} to {}", verb, moved, source, target))
            }
            Command::Metrics => {
                let connection_id = self.require_connection()?;
                let metrics = self.ctx.broker.fetch_metrics(connection_id).await?;
                self.display.format_metrics(&metrics)
            }
            Command::ClearCache => {
                let dropped = self.ctx.cache.len();
                self.ctx.cache.clear();
                self.display.format_success(&format!("dropped {} cached responses", dropped))
            }
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("queues"), Command::Queues);
        assert_eq!(parse("  exit "), Command::Exit);
        assert_eq!(parse("cache clear"), Command::ClearCache);
        assert_eq!(parse("use c1"), Command::Use("c1".to_string()));
        assert_eq!(parse("purge orders"), Command::Purge("orders".to_string()));
    }

    #[test]
    fn test_send_keeps_body_spaces() {
        assert_eq!(
            parse("send orders {\"id\": 1,  \"qty\": 2}"),
            Command::Send {
                queue: "orders".to_string(),
                body: "{\"id\": 1,  \"qty\": 2}".to_string(),
            }
        );
    }

    #[test]
    fn test_requeue_modes() {
        assert_eq!(
            parse("requeue dlq orders m1,m2"),
            Command::Requeue {
                source: "dlq".to_string(),
                target: "orders".to_string(),
                message_ids: vec!["m1".to_string(), "m2".to_string()],
                operation: RequeueOperation::Copy,
            }
        );
        assert!(matches!(
            parse("requeue dlq orders m1 cut"),
            Command::Requeue { operation: RequeueOperation::Cut, .. }
        ));
        assert!(Command::parse("requeue dlq orders m1 paste").is_err());
    }

    #[test]
    fn test_missing_arguments() {
        assert!(Command::parse("messages").is_err());
        assert!(Command::parse("send orders").is_err());
        assert!(Command::parse("delete orders").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }
}
