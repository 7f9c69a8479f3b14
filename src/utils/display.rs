use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::models::{BrokerConnection, BrokerMetrics, ConnectionStatus, Message, QueueInfo, QueueLoad};

/// Message bodies longer than this are cut in listings.
pub const BODY_PREVIEW_LENGTH: usize = 60;

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        // Add headers
        table.add_row(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));

        // Add data rows
        for row in rows {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }

        table.to_string()
    }

    pub fn format_load(&self, load: QueueLoad) -> String {
        match load {
            QueueLoad::Empty => load.label().dimmed().to_string(),
            QueueLoad::Normal => load.label().green().to_string(),
            QueueLoad::Medium => load.label().yellow().to_string(),
            QueueLoad::High => load.label().red().to_string(),
        }
    }

    pub fn format_queues(&self, queues: &[QueueInfo]) -> String {
        if queues.is_empty() {
            return "No queues found".to_string();
        }

        let rows: Vec<Vec<String>> = queues
            .iter()
            .enumerate()
            .map(|(i, queue)| {
                vec![
                    (i + 1).to_string(),
                    queue.name.clone(),
                    format_number(queue.queue_size),
                    format_number(queue.enqueue_count),
                    format_number(queue.dequeue_count),
                    format_number(queue.consumer_count),
                    self.format_load(queue.load()),
                ]
            })
            .collect();

        self.format_table(
            &["#", "Queue", "Pending", "Enqueued", "Dequeued", "Consumers", "Load"],
            &rows,
        )
    }

    pub fn format_messages(&self, queue_name: &str, messages: &[Message]) -> String {
        let mut output = vec![self.format_header(&format!("{} ({} messages)", queue_name, messages.len()))];
        if messages.is_empty() {
            output.push("Queue is empty".to_string());
            return output.join("\n");
        }

        let rows: Vec<Vec<String>> = messages
            .iter()
            .map(|message| {
                vec![
                    message.id.clone(),
                    message.timestamp.clone().unwrap_or_else(|| "-".to_string()),
                    message.headers.as_ref().map_or(0, |h| h.len()).to_string(),
                    truncate_text(&message.body, BODY_PREVIEW_LENGTH),
                ]
            })
            .collect();
        output.push(self.format_table(&["ID", "Timestamp", "Headers", "Body"], &rows));
        output.join("\n")
    }

    pub fn format_status(&self, status: ConnectionStatus) -> String {
        match status {
            ConnectionStatus::Connected => "CONNECTED".green().to_string(),
            ConnectionStatus::Disconnected => "DISCONNECTED".yellow().to_string(),
            ConnectionStatus::Error => "ERROR".red().to_string(),
            ConnectionStatus::Testing => "TESTING".cyan().to_string(),
            ConnectionStatus::Unknown => "UNKNOWN".dimmed().to_string(),
        }
    }

    pub fn format_connections(&self, connections: &[BrokerConnection], selected: Option<&str>) -> String {
        if connections.is_empty() {
            return "No connections configured".to_string();
        }

        let rows: Vec<Vec<String>> = connections
            .iter()
            .map(|connection| {
                let marker = if Some(connection.id.as_str()) == selected { "*" } else { "" };
                vec![
                    marker.to_string(),
                    connection.id.clone(),
                    connection.name.clone(),
                    format!("{}:{}", connection.host, connection.port),
                    connection.environment.clone(),
                    self.format_status(connection.last_test_status),
                ]
            })
            .collect();

        self.format_table(&["", "ID", "Name", "Address", "Environment", "Status"], &rows)
    }

    pub fn format_percentage(&self, value: f64) -> String {
        let text = format!("{:.1}%", value);
        if value >= 90.0 {
            text.red().to_string()
        } else if value >= 70.0 {
            text.yellow().to_string()
        } else {
            text.green().to_string()
        }
    }

    pub fn format_metrics(&self, metrics: &BrokerMetrics) -> String {
        let mut output = Vec::new();
        output.push(self.format_header(&format!("{} {}", metrics.broker_name, metrics.broker_version)));
        output.push(format!("Status: {}", metrics.status));
        output.push(format!("Uptime: {}", metrics.uptime_formatted));
        output.push(format!("CPU: {}", self.format_percentage(metrics.cpu_usage)));
        output.push(format!(
            "Memory: {} ({} of {})",
            self.format_percentage(metrics.memory_usage_percentage),
            format_bytes(metrics.memory_usage),
            format_bytes(metrics.max_memory)
        ));
        output.push(format!(
            "Disk: {} ({} of {})",
            self.format_percentage(metrics.disk_usage_percentage),
            format_bytes(metrics.disk_usage),
            format_bytes(metrics.max_disk_usage)
        ));
        output.push(format!(
            "Connections: {} active / {} total",
            metrics.active_connections, metrics.total_connections
        ));
        output.push(format!("Threads: {}", metrics.total_threads));

        output.join("\n")
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", "error:".red().bold(), message)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", "ok:".green().bold(), message)
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cuts `text` to `max_chars` characters, appending `...` when something was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((end, _)) => format!("{}...", &text[..end]),
    }
}

/// Groups digits in thousands: `1234567` becomes `1,234,567`.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
