//! Event consumers that write classified game events to stdout.
//!
//! [`ConsoleDisplayer`] renders one human-readable line per event and
//! [`JsonDisplayer`] one compact JSON object per event. Both return the
//! written line so callers and tests can inspect it.

use std::io::Write;

use colored::{Color, Colorize};
use serde::Serialize;

use hldslog_core::display::{Displayer, SourceNotice};
use hldslog_core::event::{EventFields, EventKind, GameEvent};
use hldslog_parser::team::{COUNTER_TERRORIST, TERRORIST, full_name, short_name};

/// A rendered event line split into its `[TAG]` and body.
#[derive(Debug, Clone)]
pub struct RenderedEvent {
    tag: &'static str,
    color: Color,
    body: String,
}

impl RenderedEvent {
    /// Plain text line without ANSI escapes.
    pub fn plain(&self) -> String {
        format!("{} {}", self.tag, self.body)
    }

    /// Line with a colored, bold `[TAG]`.
    pub fn colored(&self) -> String {
        format!("{} {}", self.tag.color(self.color).bold(), self.body)
    }
}

/// Render an event the way [`ConsoleDisplayer`] prints it.
///
/// Missing fields render as empty strings.
pub fn render_event(kind: EventKind, fields: &EventFields) -> RenderedEvent {
    let field = |name: &str| fields.get(name).unwrap_or_default();
    let team = |name: &str| team_label(field(name));

    let (tag, color, body) = match kind {
        EventKind::EndMap => (
            "[END MAP]",
            Color::Magenta,
            format!("{} won with {} points", team("winner"), field("score")),
        ),
        EventKind::EndRound => (
            "[END ROUND]",
            Color::Magenta,
            format!(
                "{} {} - {} {}",
                full_name(COUNTER_TERRORIST),
                field("score_ct"),
                field("score_t"),
                full_name(TERRORIST)
            ),
        ),
        EventKind::Kill => (
            "[KILL]",
            Color::Red,
            format!(
                "{} ({}) killed {} ({}) with {}",
                field("killer"),
                team("killer_team"),
                field("killed"),
                team("killed_team"),
                field("weapon")
            ),
        ),
        EventKind::Suicide => (
            "[SUICIDE]",
            Color::Red,
            format!("{} committed suicide", field("killed")),
        ),
        EventKind::Event => (
            "[EVENT]",
            Color::Yellow,
            format!(
                "{} ({}) {}",
                field("person"),
                team("person_team"),
                field("event_i18n")
            ),
        ),
        EventKind::LoadingMap => ("[LOADING MAP]", Color::Blue, field("map").to_owned()),
        EventKind::Chat => (
            "[CHAT]",
            Color::Cyan,
            format!(
                "{} ({}): {}",
                field("player"),
                team("player_team"),
                field("chat")
            ),
        ),
        EventKind::TeamChat => (
            "[TEAM CHAT]",
            Color::Cyan,
            format!(
                "{} ({}): {}",
                field("player"),
                team("player_team"),
                field("chat")
            ),
        ),
        EventKind::Connect => (
            "[CONNECT]",
            Color::Green,
            format!(
                "{} connected from {}:{}",
                field("player"),
                field("ip"),
                field("port")
            ),
        ),
        EventKind::Disconnect => (
            "[DISCONNECT]",
            Color::Green,
            format!("{} ({}) disconnected", field("player"), team("player_team")),
        ),
    };

    RenderedEvent { tag, color, body }
}

/// Render a lifecycle notice as `## <host>:<port> => <message>`.
pub fn render_notice(source: &str, notice: SourceNotice) -> String {
    format!("## {source} => {notice}")
}

/// `winner` is carried raw, so normalize before expanding.
fn team_label(team: &str) -> &str {
    full_name(short_name(team))
}

fn write_stdout(line: &str) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{line}") {
        tracing::warn!(error = %e, "failed to write to stdout");
    }
}

/// Human-readable console output.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleDisplayer {
    color: bool,
}

impl ConsoleDisplayer {
    /// Create a console displayer. `color` enables ANSI colors on the `[TAG]`.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Whether ANSI colors are enabled.
    pub fn color(&self) -> bool {
        self.color
    }
}

impl Displayer for ConsoleDisplayer {
    /// The plain (uncolored) line that was written.
    type Output = String;

    fn handle_event(&self, kind: EventKind, fields: EventFields) -> Self::Output {
        let rendered = render_event(kind, &fields);
        if self.color {
            write_stdout(&rendered.colored());
        } else {
            write_stdout(&rendered.plain());
        }
        rendered.plain()
    }

    fn notify(&self, source: &str, notice: SourceNotice) {
        let line = render_notice(source, notice);
        if self.color {
            write_stdout(&line.as_str().bold().to_string());
        } else {
            write_stdout(&line);
        }
    }
}

#[derive(Serialize)]
struct NoticeRecord<'a> {
    notice: &'static str,
    source: &'a str,
    message: &'static str,
}

fn notice_name(notice: SourceNotice) -> &'static str {
    match notice {
        SourceNotice::Connected => "connected",
        SourceNotice::Disconnected => "disconnected",
        SourceNotice::Stopped => "stopped",
    }
}

/// JSON Lines output: `{"type":"kill","params":{...}}` per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDisplayer;

impl JsonDisplayer {
    /// Create a JSON displayer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an event to a compact JSON line.
    pub fn encode(kind: EventKind, fields: EventFields) -> Result<String, serde_json::Error> {
        serde_json::to_string(&GameEvent::new(kind, fields))
    }

    /// Serialize a lifecycle notice to a compact JSON line.
    pub fn encode_notice(source: &str, notice: SourceNotice) -> Result<String, serde_json::Error> {
        serde_json::to_string(&NoticeRecord {
            notice: notice_name(notice),
            source,
            message: notice.message(),
        })
    }
}

impl Displayer for JsonDisplayer {
    /// The JSON line that was written, empty if serialization failed.
    type Output = String;

    fn handle_event(&self, kind: EventKind, fields: EventFields) -> Self::Output {
        match Self::encode(kind, fields) {
            Ok(line) => {
                write_stdout(&line);
                line
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "failed to serialize event");
                String::new()
            }
        }
    }

    fn notify(&self, source: &str, notice: SourceNotice) {
        match Self::encode_notice(source, notice) {
            Ok(line) => write_stdout(&line),
            Err(e) => tracing::warn!(error = %e, "failed to serialize notice"),
        }
    }
}
