use crate::chat::canned;
use crate::chat::envelope::QuickReply;
use crate::chat::intent::Intent;

const MIN_SUGGESTIONS: usize = 3;
const MAX_SUGGESTIONS: usize = 6;

/// Keyword groups scanned against the composed answer, in fixed priority order
const SERVICE_KEYWORDS: &[&str] = &["service", "ai", "development", "solution", "automation"];
const MEETING_KEYWORDS: &[&str] = &["demo", "meeting", "consultation", "discuss"];
const CONTACT_KEYWORDS: &[&str] = &["contact", "support", "help", "team"];
const INFO_KEYWORDS: &[&str] = &["learn", "information", "about", "company", "product"];

/// The quick-reply value owned by a label, used to avoid suggesting a path
/// the user is already on
fn own_button_value(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::ScheduleDemo => Some("schedule_demo"),
        Intent::KnowMore => Some("know_more"),
        Intent::Products => Some("products"),
        Intent::ReadArticle => Some("read_article"),
        Intent::OurServices => Some("our_services"),
        Intent::ContactUs => Some("contact_us"),
        _ => None,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Propose follow-up quick replies for a composed answer.
///
/// Scans the answer for category keyword groups in priority order and returns
/// the matching preset button set; falls back to the full default menu when no
/// category matched. The active label's own button is excluded, and the result
/// is topped up from the default menu so the length is always 3-6.
pub fn suggest(answer_text: &str, intent: Intent) -> Vec<QuickReply> {
    let answer_lower = answer_text.to_lowercase();

    let candidates: Vec<QuickReply> = if contains_any(&answer_lower, SERVICE_KEYWORDS) {
        vec![
            canned::services_button(),
            canned::products_button(),
            canned::meeting_button(),
        ]
    } else if contains_any(&answer_lower, MEETING_KEYWORDS) {
        vec![
            canned::meeting_button(),
            canned::contact_button(),
            canned::services_button(),
        ]
    } else if contains_any(&answer_lower, CONTACT_KEYWORDS) {
        vec![
            canned::contact_button(),
            canned::services_button(),
            canned::meeting_button(),
        ]
    } else if contains_any(&answer_lower, INFO_KEYWORDS) {
        vec![
            canned::know_more_button(),
            canned::case_studies_button(),
            canned::contact_button(),
        ]
    } else {
        vec![
            canned::services_button(),
            canned::products_button(),
            canned::case_studies_button(),
            canned::meeting_button(),
            canned::contact_button(),
        ]
    };

    let excluded = own_button_value(intent);

    let mut buttons: Vec<QuickReply> = Vec::new();
    for button in candidates {
        if Some(button.value.as_str()) != excluded
            && !buttons.iter().any(|b| b.value == button.value)
        {
            buttons.push(button);
        }
    }

    // Top up from the default menu so exclusion never drops us below the minimum
    for button in canned::default_quick_replies() {
        if buttons.len() >= MIN_SUGGESTIONS {
            break;
        }
        if Some(button.value.as_str()) != excluded
            && !buttons.iter().any(|b| b.value == button.value)
        {
            buttons.push(button);
        }
    }

    buttons.truncate(MAX_SUGGESTIONS);
    buttons
}
