//! Stat card

use super::escape;

/// Direction and size of a percentage trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trend {
    pub value: u32,
    pub is_up: bool,
}

impl Trend {
    pub fn up(value: u32) -> Self {
        Self { value, is_up: true }
    }

    pub fn down(value: u32) -> Self {
        Self { value, is_up: false }
    }

    /// `+N%` or `-N%`
    pub fn label(&self) -> String {
        format!("{}{}%", if self.is_up { '+' } else { '-' }, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub icon: &'static str,
    pub trend: Option<Trend>,
}

impl StatCard {
    pub fn new(label: impl Into<String>, value: impl ToString, icon: &'static str) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            icon,
            trend: None,
        }
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn render(&self) -> String {
        let trend = self
            .trend
            .map(|t| {
                format!(
                    r#"<span class="trend {}">{}</span>"#,
                    if t.is_up { "up" } else { "down" },
                    t.label()
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div class="stat"><div class="stat-head"><span>{}</span><span>{}</span></div><p class="stat-value">{}{}</p></div>"#,
            escape(&self.label),
            escape(self.icon),
            escape(&self.value),
            trend
        )
    }
}
