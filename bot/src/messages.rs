use shared::ItemMetadata;

const VARIABLES: [&str; 4] = ["number", "kind", "label", "days"];

/// Comment posted on an item right before it is closed.
///
/// The body may reference `{number}`, `{kind}`, `{label}` and `{days}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseMessage {
    template: String,
}

impl CloseMessage {
    /// Blank text disables the closing comment.
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        if template.trim().is_empty() {
            return None;
        }
        Some(Self { template })
    }

    pub fn render(&self, item: &ItemMetadata, label: &str, days_inactive: f64) -> String {
        let mut formatted_message = self.template.clone();
        for key in VARIABLES {
            let pattern = format!("{{{key}}}");
            if !formatted_message.contains(&pattern) {
                continue;
            }
            let value = match key {
                "number" => item.number().to_string(),
                "kind" => item.kind.to_string(),
                "label" => label.to_string(),
                _ => (days_inactive.floor() as u64).to_string(),
            };
            formatted_message = formatted_message.replace(&pattern, &value);
        }
        formatted_message
    }
}
