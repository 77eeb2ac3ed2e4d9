use crate::chat::envelope::{QuickReply, ResponseEnvelope};
use crate::chat::intent::Intent;

// Canonical copy deck. One revision only: the greeting carries four quick
// replies and the Products menu entry exists.

pub const GREETING_ANSWER: &str = "**Welcome! 👋**\n\nI'm here to help you discover how AI can transform your business. Ask me anything about our services, products, or book a meeting with our experts.";

pub const IDENTITY_ANSWER: &str = "I'm your AI assistant. I can help you learn about our AI solutions, products, and services.\n\n**What can I help you with?**";

pub const HELP_ANSWER: &str = "I'm here to help! Ask me about our AI services, products, case studies, or book a meeting with our team.\n\n**Where should we start?**";

pub const THANKS_ANSWER: &str = "You're welcome! Happy to help anytime. 😊\n\n**Anything else you'd like to know?**";

pub const CONTACT_REQUEST_ANSWER: &str = "**Let's Connect! 📧**\n\nI'll help you get in touch with our team. Share a few quick details and we'll reach out to you shortly.\n\n• Full name\n• Email address\n• Phone number\n• Brief message\n\nOnce you provide the details, click 'Send Request' to submit.";

pub const MEETING_REQUEST_ANSWER: &str = "**Book Your Meeting! 🗓️**\n\nLet's schedule a personalized session with our AI experts. Just provide a few details:\n\n• Full name\n• Email address\n• Phone number\n• Preferred date & time\n• Topics to discuss\n\nClick 'Schedule Meeting' when ready!";

pub const NOT_INITIALIZED_ANSWER: &str = "Please initialize the system first before asking questions.";

pub const NO_INFORMATION_ANSWER: &str = "I don't have relevant information to answer your question.";

pub const DEGRADED_ANSWER: &str = "I apologize, but I encountered a problem while processing your question. Please try again in a moment.";

pub fn services_button() -> QuickReply {
    QuickReply::new("Services", "our_services")
}

pub fn products_button() -> QuickReply {
    QuickReply::new("Products", "products")
}

pub fn meeting_button() -> QuickReply {
    QuickReply::new("Book a Meeting", "schedule_demo")
}

pub fn contact_button() -> QuickReply {
    QuickReply::new("Contact Us", "contact_us")
}

pub fn know_more_button() -> QuickReply {
    QuickReply::new("Know More", "know_more")
}

pub fn case_studies_button() -> QuickReply {
    QuickReply::new("Case Studies", "read_article")
}

/// The full default menu (Services / Products / Book a Meeting / Contact Us)
pub fn default_quick_replies() -> Vec<QuickReply> {
    vec![
        services_button(),
        products_button(),
        meeting_button(),
        contact_button(),
    ]
}

/// Fixed greeting reply: canonical copy plus the four-button menu
pub fn greeting_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(GREETING_ANSWER, default_quick_replies())
}

/// Fixed replies for simple questions, keyed on the question content
pub fn simple_response(question: &str) -> ResponseEnvelope {
    let question_lower = question.to_lowercase();

    if question_lower.contains("who are you") || question_lower.contains("what is your name") {
        ResponseEnvelope::canned(
            IDENTITY_ANSWER,
            vec![services_button(), products_button(), contact_button()],
        )
    } else if question_lower.contains("thank") {
        ResponseEnvelope::canned(
            THANKS_ANSWER,
            vec![services_button(), meeting_button(), contact_button()],
        )
    } else {
        ResponseEnvelope::canned(
            HELP_ANSWER,
            vec![services_button(), products_button(), meeting_button()],
        )
    }
}

/// Contact-request reply: instructions plus the contact form trigger
pub fn contact_request_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(
        CONTACT_REQUEST_ANSWER,
        vec![services_button(), products_button(), meeting_button()],
    )
    .with_contact_form()
}

/// Meeting-request reply: instructions plus the meeting form trigger
pub fn meeting_request_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(
        MEETING_REQUEST_ANSWER,
        vec![services_button(), products_button(), contact_button()],
    )
    .with_meeting_form()
}

/// Short-circuit reply for retrieval paths reached before initialization
pub fn not_initialized_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(NOT_INITIALIZED_ANSWER, default_quick_replies())
}

/// Fixed reply when no relevant chunks exist even in the keyword fallback
pub fn no_information_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(NO_INFORMATION_ANSWER, default_quick_replies())
}

/// Last-resort reply for any internal failure; never surfaces the error
pub fn degraded_response() -> ResponseEnvelope {
    ResponseEnvelope::canned(DEGRADED_ANSWER, default_quick_replies())
}

/// The fixed natural-language retrieval query behind each menu label
pub fn menu_query(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::ScheduleDemo => Some(
            "How can I book a meeting or demo with the team, and what details are needed to schedule one?",
        ),
        Intent::KnowMore => Some(
            "Tell me about the company - what they do, their expertise, services, and achievements.",
        ),
        Intent::Products => Some(
            "What products are available? List every product and solution on offer.",
        ),
        Intent::ReadArticle => Some(
            "What articles, blogs, or case studies are available? List the content and resources.",
        ),
        Intent::OurServices => Some(
            "What services and offerings are available? List all services with details.",
        ),
        Intent::ContactUs => Some(
            "How can the company be contacted? What are the contact details, email, website, and ways to reach the team?",
        ),
        Intent::EndChat => Some(
            "What are the ways to follow up, stay in touch, or take the next step with the team?",
        ),
        _ => None,
    }
}
