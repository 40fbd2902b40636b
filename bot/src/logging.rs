use std::fmt;
use std::io::Write;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Mirrors warnings and errors as GitHub Actions workflow commands so they
/// show up as annotations on the run summary.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionsAnnotations {
    enabled: bool,
}

impl ActionsAnnotations {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled when running inside an Actions runner.
    pub fn from_env() -> Self {
        Self::new(std::env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true"))
    }
}

/// Formats a workflow command, or `None` for levels that don't get one.
pub fn annotation_line(level: &Level, message: &str) -> Option<String> {
    let command = if *level == Level::ERROR {
        "error"
    } else if *level == Level::WARN {
        "warning"
    } else {
        return None;
    };

    let message = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");

    Some(format!("::{command}::{message}"))
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for ActionsAnnotations {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if !self.enabled {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if let Some(line) = annotation_line(event.metadata().level(), &visitor.to_string()) {
            // Nowhere left to report a failed write to stdout
            let _ = writeln!(std::io::stdout().lock(), "{line}");
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl fmt::Display for MessageVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(ActionsAnnotations::from_env())
        .with(filter)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
