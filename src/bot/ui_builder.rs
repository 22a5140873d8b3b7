//! UI Builder module for poll questions and poll options

use std::collections::HashMap;

use fluent_bundle::FluentValue;

use crate::localization::t_args_lang;

/// Telegram limit for the text of one poll option
pub const MAX_OPTION_CHARS: usize = 100;

/// Question shown above one page of the list
pub fn format_page_question(page: usize, total: usize, language_code: Option<&str>) -> String {
    t_args_lang(
        "list-page-title",
        [("page", FluentValue::from(page)), ("total", FluentValue::from(total))],
        language_code,
    )
}

/// Build poll option labels for one page.
///
/// Labels are cut to Telegram's length limit and repeated labels get a
/// counter suffix, because a poll cannot carry two identical options.
pub fn build_poll_options(items: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    items
        .iter()
        .map(|item| {
            let occurrence = seen.entry(item.clone()).or_insert(0);
            *occurrence += 1;

            if *occurrence == 1 {
                truncate_label(item, MAX_OPTION_CHARS)
            } else {
                let suffix = format!(" ({occurrence})");
                let room = MAX_OPTION_CHARS.saturating_sub(suffix.chars().count());
                format!("{}{}", truncate_label(item, room), suffix)
            }
        })
        .collect()
}

fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut label: String = text.chars().take(keep).collect();
    label.push('…');
    label
}
