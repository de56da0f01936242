//! FAQ display formatting
//!
//! Formats FAQ entries for terminal output in list and detail views.

use std::collections::BTreeSet;

use crate::models::{Environment, FaqEntry};
use crate::storage::DocumentStats;

const ANSWER_PREVIEW: usize = 60;

/// Format a list of entries as an aligned table
pub fn format_faq_list(env: &Environment, entries: &[FaqEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "No FAQ entries in '{}'.\n\nAdd one with: faqstore faq --env {} create -q <question> -a <answer>\n",
            env, env
        );
    }

    let id_width = entries
        .iter()
        .map(|e| e.id.as_str().chars().count())
        .max()
        .unwrap_or(2)
        .max(2);
    let category_width = entries
        .iter()
        .filter_map(|e| e.category.as_deref())
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<category_width$}  {:>3}  {}\n",
        "ID", "Category", "Qs", "Question"
    ));
    output.push_str(&format!(
        "{}\n",
        "-".repeat(id_width + category_width + 20 + ANSWER_PREVIEW)
    ));

    for entry in entries {
        output.push_str(&format!(
            "{:<id_width$}  {:<category_width$}  {:>3}  {}\n",
            entry.id.as_str(),
            entry.category.as_deref().unwrap_or("-"),
            entry.questions.len(),
            truncate(entry.primary_question(), ANSWER_PREVIEW),
        ));
    }

    output.push_str(&format!("\nTotal: {} entr{}\n", entries.len(), plural_y(entries.len())));
    output
}

/// Format one entry with every field
pub fn format_faq_details(entry: &FaqEntry) -> String {
    let mut output = String::new();

    output.push_str(&format!("FAQ {}\n", entry.id));
    output.push_str(&format!("{}\n", "=".repeat(entry.id.as_str().chars().count() + 4)));
    output.push_str(&format!(
        "Category: {}\n",
        entry.category.as_deref().unwrap_or("(none)")
    ));
    output.push('\n');

    output.push_str("Questions:\n");
    for question in &entry.questions {
        output.push_str(&format!("  - {}\n", question));
    }
    output.push('\n');

    output.push_str("Answer:\n");
    for line in entry.answer.lines() {
        output.push_str(&format!("  {}\n", line));
    }

    if let Some(links) = &entry.links {
        output.push('\n');
        output.push_str("Links:\n");
        let rendered = serde_json::to_string_pretty(links).unwrap_or_else(|_| links.to_string());
        for line in rendered.lines() {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output
}

/// Format the distinct categories of an environment
pub fn format_category_list(env: &Environment, categories: &BTreeSet<String>) -> String {
    if categories.is_empty() {
        return format!("No categories in '{}'.\n", env);
    }

    let mut output = format!("Categories in '{}':\n", env);
    for category in categories {
        output.push_str(&format!("  {}\n", category));
    }
    output
}

/// Format file statistics for an environment
pub fn format_stats(stats: &DocumentStats) -> String {
    let mut output = format!("Environment: {}\n", stats.environment);
    if !stats.exists {
        output.push_str("  File:      (not created yet)\n");
        return output;
    }

    output.push_str(&format!("  Size:      {}\n", super::format_size(stats.size_bytes)));
    if let Some(modified) = stats.modified {
        output.push_str(&format!(
            "  Modified:  {}\n",
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    output.push_str(&format!("  Entries:   {}\n", stats.entry_count));
    output.push_str(&format!("  Questions: {}\n", stats.question_count));
    output
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}
