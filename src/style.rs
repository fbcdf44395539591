// File: src/style.rs
//! Generated stylesheet rules for calendar and category colors.
//!
//! Views color items by calendar and by category through attribute-matched
//! rules. Rules are created lazily, once per identifier, and their color
//! declarations are rewritten in place when a color changes; the host
//! installs the rendered CSS text into its stylesheet.

use crate::color;
use crate::model::Calendar;
use std::collections::HashMap;

/// Fallback fill for calendars without a configured color.
pub const DEFAULT_CALENDAR_COLOR: &str = "#A8C2E1";

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    declarations: Vec<(String, String)>,
}

impl StyleRule {
    fn new(selector: String) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
        }
    }

    /// Sets a declaration, replacing any previous value. An empty value
    /// removes the declaration.
    fn set(&mut self, property: &str, value: &str) {
        self.declarations.retain(|(p, _)| p != property);
        if !value.is_empty() {
            self.declarations
                .push((property.to_string(), value.to_string()));
        }
    }

    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_css(&self) -> String {
        let body = self
            .declarations
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {{ {} }}", self.selector, body)
    }
}

/// Lazily-built rule cache for calendar and category colors.
#[derive(Debug, Default)]
pub struct StyleCache {
    rules: Vec<StyleRule>,
    calendar_rules: HashMap<String, (usize, usize)>,
    category_rules: HashMap<String, usize>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures the two rules for a calendar exist (the filled box and the
    /// month-view outline variant) and refreshes their colors.
    pub fn update_for_calendar(&mut self, calendar: &Calendar) {
        let (fill_index, outline_index) = match self.calendar_rules.get(&calendar.id) {
            Some(&indices) => indices,
            None => {
                let fill = StyleRule::new(format!(
                    ".calendar-color-box[calendar-id=\"{}\"]",
                    calendar.id
                ));
                let outline = StyleRule::new(format!(
                    "calendar-month-day-box-item:not([allday=\"true\"]) \
                     .calendar-color-box[calendar-id=\"{}\"]",
                    calendar.id
                ));
                self.rules.push(fill);
                self.rules.push(outline);
                let indices = (self.rules.len() - 2, self.rules.len() - 1);
                self.calendar_rules.insert(calendar.id.clone(), indices);
                indices
            }
        };

        let background = calendar.color.as_deref().unwrap_or(DEFAULT_CALENDAR_COLOR);
        let text = color::contrasting_text_color(background);
        self.rules[fill_index].set("background-color", background);
        self.rules[fill_index].set("color", text);
        self.rules[outline_index].set("background-color", "transparent");
        self.rules[outline_index].set("color", background);
    }

    /// Ensures the rule for a category exists and sets its background color.
    /// `None` (or an empty string) clears the color.
    pub fn update_for_category(&mut self, name: &str, category_color: Option<&str>) {
        let key = format_for_css_rule(name);
        let index = match self.category_rules.get(&key) {
            Some(&index) => index,
            None => {
                self.rules.push(StyleRule::new(format!(
                    ".category-color-box[categories~=\"{}\"]",
                    key
                )));
                let index = self.rules.len() - 1;
                self.category_rules.insert(key, index);
                index
            }
        };
        self.rules[index].set("background-color", category_color.unwrap_or(""));
    }

    /// Seeds category rules from a color map, migrating illegally formatted
    /// keys first.
    pub fn init_categories(&mut self, colors: &mut HashMap<String, String>) {
        for name in normalize_category_colors(colors) {
            let category_color = colors.get(&name).cloned();
            self.update_for_category(&name, category_color.as_deref());
        }
    }

    pub fn rule_for_calendar(&self, calendar_id: &str) -> Option<(&StyleRule, &StyleRule)> {
        self.calendar_rules
            .get(calendar_id)
            .map(|&(fill, outline)| (&self.rules[fill], &self.rules[outline]))
    }

    pub fn rule_for_category(&self, name: &str) -> Option<&StyleRule> {
        self.category_rules
            .get(&format_for_css_rule(name))
            .map(|&index| &self.rules[index])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// All rules as stylesheet text, in insertion order.
    pub fn rules_css(&self) -> String {
        self.rules
            .iter()
            .map(StyleRule::to_css)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rule-safe identifiers contain only `[0-9a-z_-]`.
pub fn is_css_safe(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Maps an arbitrary category name onto a rule-safe identifier.
pub fn format_for_css_rule(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Migrates illegally formatted color keys to their sanitized form where the
/// sanitized key is still free; entries whose sanitized key is taken are left
/// in place but excluded from styling. Returns the styleable names, sorted.
pub fn normalize_category_colors(colors: &mut HashMap<String, String>) -> Vec<String> {
    let mut names: Vec<String> = colors.keys().cloned().collect();
    names.sort();

    let mut result = Vec::new();
    for name in names {
        if is_css_safe(&name) {
            result.push(name);
            continue;
        }
        let fixed = format_for_css_rule(&name);
        if !colors.contains_key(&fixed) {
            if let Some(value) = colors.remove(&name) {
                colors.insert(fixed.clone(), value);
                result.push(fixed);
            }
        } else {
            log::debug!("category color key '{}' collides after sanitizing; not styled", name);
        }
    }
    result.sort();
    result
}
