use regex::Regex;

/// Closed set of intent labels derived purely from input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Simple,
    ScheduleDemo,
    KnowMore,
    Products,
    ReadArticle,
    OurServices,
    ContactUs,
    EndChat,
    MeetingRequest,
    ContactRequest,
    ServiceQuery,
    GeneralQuery,
}

impl Intent {
    /// Quick-reply menu labels, each backed by a fixed retrieval query
    pub fn is_menu(&self) -> bool {
        matches!(
            self,
            Intent::ScheduleDemo
                | Intent::KnowMore
                | Intent::Products
                | Intent::ReadArticle
                | Intent::OurServices
                | Intent::ContactUs
                | Intent::EndChat
        )
    }
}

/// How one classification rule matches the normalized input
enum Matcher {
    /// Whole-input regex match
    Full(Vec<Regex>),
    /// Exact equality against a small set of canonical menu strings
    Exact(&'static [&'static str]),
    /// Substring regex search anywhere in the input
    Search(Vec<Regex>),
    /// Any keyword from a fixed vocabulary appears in the input
    Keywords(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Full(patterns) => patterns.iter().any(|p| p.is_match(text)),
            Matcher::Exact(values) => values.contains(&text),
            Matcher::Search(patterns) => patterns.iter().any(|p| p.is_match(text)),
            Matcher::Keywords(words) => words.iter().any(|w| text.contains(w)),
        }
    }
}

struct Rule {
    matcher: Matcher,
    intent: Intent,
}

/// Pattern-based intent classifier.
///
/// Rules are held as an ordered list and evaluated with short-circuit
/// iteration; the first match wins. The ordering is a hard contract - in
/// particular the meeting-request rule precedes the contact-request rule,
/// because meeting language is more specific and must not be shadowed by
/// broader contact phrasing.
pub struct IntentClassifier {
    rules: Vec<Rule>,
}

fn regex(pattern: &str) -> Regex {
    // Patterns are compile-time constants; a failure here is a programming error
    Regex::new(pattern).expect("built-in classifier pattern must compile")
}

fn full(patterns: &[&str]) -> Matcher {
    Matcher::Full(patterns.iter().map(|p| regex(p)).collect())
}

fn search(patterns: &[&str]) -> Matcher {
    Matcher::Search(patterns.iter().map(|p| regex(p)).collect())
}

impl IntentClassifier {
    pub fn new() -> Self {
        let rules = vec![
            // 1. Exact greetings, optional trailing punctuation
            Rule {
                matcher: full(&[
                    r"^(hi|hello|hey|hii|hai|helo)\s*[!.]*\s*$",
                    r"^good\s+(morning|afternoon|evening)\s*[!.]*\s*$",
                    r"^how\s+are\s+you\s*\??\s*$",
                    r"^what\s*'?\s*s\s+up\s*\??\s*$",
                    r"^greetings?\s*[!.]*\s*$",
                ]),
                intent: Intent::Greeting,
            },
            // 2. Simple questions that never need retrieval
            Rule {
                matcher: full(&[
                    r"^who\s+are\s+you\s*\??\s*$",
                    r"^what\s+is\s+your\s+name\s*\??\s*$",
                    r"^help\s*[!.]*\s*$",
                    r"^(thanks?|thank\s+you)\s*[!.]*\s*$",
                ]),
                intent: Intent::Simple,
            },
            // 3. Quick-reply menu values and close textual variants
            Rule {
                matcher: Matcher::Exact(&[
                    "schedule a meeting",
                    "schedule a demo",
                    "schedule_demo",
                    "demo",
                    "meeting",
                ]),
                intent: Intent::ScheduleDemo,
            },
            Rule {
                matcher: Matcher::Exact(&["know more about us", "know_more", "about us", "about"]),
                intent: Intent::KnowMore,
            },
            Rule {
                matcher: Matcher::Exact(&["products", "product", "our products"]),
                intent: Intent::Products,
            },
            Rule {
                matcher: Matcher::Exact(&[
                    "read an article",
                    "read_article",
                    "article",
                    "blog",
                    "case studies",
                    "case_studies",
                ]),
                intent: Intent::ReadArticle,
            },
            Rule {
                matcher: Matcher::Exact(&["our services", "our_services", "services"]),
                intent: Intent::OurServices,
            },
            Rule {
                matcher: Matcher::Exact(&["contact us", "contact_us", "contact"]),
                intent: Intent::ContactUs,
            },
            // 4. End-of-chat indicators anywhere in the input
            Rule {
                matcher: search(&[
                    r"\b(bye|goodbye|thanks?|thank\s+you|that'?s\s+all|done|finished|exit|quit)\b",
                    r"\b(no\s+more|nothing\s+else|i'?m\s+good|all\s+set)\b",
                ]),
                intent: Intent::EndChat,
            },
            // 5. Meeting requests - MUST precede contact requests
            Rule {
                matcher: search(&[
                    r"(book|schedule|arrange).*(meeting|appointment|call|demo)",
                    r"(want|need|would\s+like)\s+to.*(meet|schedule|book)",
                    r"schedule\s+(a|an)\s+(meeting|demo|call)",
                    r"meeting\s+(request|booking)",
                    r"demo\s+(request|booking)",
                    r"consultation\s+(request|booking)",
                    r"appointment\s+(request|booking)",
                ]),
                intent: Intent::MeetingRequest,
            },
            // 6. Contact requests
            Rule {
                matcher: search(&[
                    r"(contact|connect|reach|get\s+in\s+touch|speak\s+with|talk\s+to).*(company|team|someone|you)",
                    r"(want|need|would\s+like)\s+to.*(contact|connect|speak)",
                    r"how\s+(can|do)\s+i.*(contact|reach|connect)",
                    r"(email|phone|call).*company",
                    r"business\s+(inquiry|enquiry)",
                    r"sales\s+(team|contact|inquiry)",
                    r"partnership.*opportunity",
                ]),
                intent: Intent::ContactRequest,
            },
            // 7. Service-domain vocabulary
            Rule {
                matcher: Matcher::Keywords(&[
                    "service",
                    "services",
                    "ai",
                    "development",
                    "generation",
                    "chatbot",
                    "automation",
                    "offer",
                    "provide",
                    "capabilities",
                    "solutions",
                ]),
                intent: Intent::ServiceQuery,
            },
        ];

        Self { rules }
    }

    /// Classify input text into an intent label.
    ///
    /// Normalizes (trim + lowercase), then evaluates rules in strict priority
    /// order until the first match; defaults to `GeneralQuery`.
    pub fn classify(&self, text: &str) -> Intent {
        let normalized = text.trim().to_lowercase();

        for rule in &self.rules {
            if rule.matcher.matches(&normalized) {
                return rule.intent;
            }
        }

        Intent::GeneralQuery
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new()
    }

    #[test]
    fn test_greetings_case_insensitive() {
        let c = classifier();
        for input in ["hi", "Hello", "hey", "HI!", "  hii  ", "good morning", "How are you?", "what's up", "greetings"] {
            assert_eq!(c.classify(input), Intent::Greeting, "input: {}", input);
        }
    }

    #[test]
    fn test_simple_patterns() {
        let c = classifier();
        assert_eq!(c.classify("who are you?"), Intent::Simple);
        assert_eq!(c.classify("What is your name"), Intent::Simple);
        assert_eq!(c.classify("help"), Intent::Simple);
        assert_eq!(c.classify("thanks"), Intent::Simple);
        assert_eq!(c.classify("Thank you"), Intent::Simple);
    }

    #[test]
    fn test_menu_values() {
        let c = classifier();
        assert_eq!(c.classify("schedule a meeting"), Intent::ScheduleDemo);
        assert_eq!(c.classify("demo"), Intent::ScheduleDemo);
        assert_eq!(c.classify("know more about us"), Intent::KnowMore);
        assert_eq!(c.classify("about"), Intent::KnowMore);
        assert_eq!(c.classify("products"), Intent::Products);
        assert_eq!(c.classify("our products"), Intent::Products);
        assert_eq!(c.classify("read an article"), Intent::ReadArticle);
        assert_eq!(c.classify("case studies"), Intent::ReadArticle);
        assert_eq!(c.classify("our services"), Intent::OurServices);
        assert_eq!(c.classify("Services"), Intent::OurServices);
        assert_eq!(c.classify("contact us"), Intent::ContactUs);
        assert_eq!(c.classify("contact"), Intent::ContactUs);
    }

    #[test]
    fn test_end_chat() {
        let c = classifier();
        assert_eq!(c.classify("ok bye now"), Intent::EndChat);
        assert_eq!(c.classify("that's all for today"), Intent::EndChat);
        assert_eq!(c.classify("nothing else, i'm good"), Intent::EndChat);
    }

    #[test]
    fn test_meeting_requests() {
        let c = classifier();
        assert_eq!(c.classify("I want to book a demo call"), Intent::MeetingRequest);
        assert_eq!(c.classify("can we arrange an appointment"), Intent::MeetingRequest);
        assert_eq!(c.classify("demo request"), Intent::MeetingRequest);
    }

    #[test]
    fn test_contact_requests() {
        let c = classifier();
        assert_eq!(c.classify("how do I reach your team"), Intent::ContactRequest);
        assert_eq!(c.classify("business inquiry"), Intent::ContactRequest);
        assert_eq!(c.classify("partnership opportunity with us"), Intent::ContactRequest);
    }

    #[test]
    fn test_meeting_precedes_contact() {
        // Could loosely match contact phrasing too; the meeting rule must win
        let c = classifier();
        assert_eq!(
            c.classify("schedule a meeting now please"),
            Intent::MeetingRequest
        );
        assert_eq!(
            c.classify("I would like to book a meeting with someone from your team"),
            Intent::MeetingRequest
        );
    }

    #[test]
    fn test_exact_menu_precedes_end_chat() {
        // "schedule a meeting" is a canonical menu value, not a free-form request
        let c = classifier();
        assert_eq!(c.classify("schedule a meeting"), Intent::ScheduleDemo);
    }

    #[test]
    fn test_simple_thanks_precedes_end_chat_substring() {
        // Exact "thanks" hits the simple rule before the end-chat substring rule
        let c = classifier();
        assert_eq!(c.classify("thanks"), Intent::Simple);
        assert_eq!(c.classify("thanks for everything"), Intent::EndChat);
    }

    #[test]
    fn test_service_query() {
        let c = classifier();
        assert_eq!(c.classify("what automation can you do"), Intent::ServiceQuery);
        assert_eq!(
            c.classify("tell me about your chatbot capabilities"),
            Intent::ServiceQuery
        );
        assert_eq!(c.classify("what services do you offer"), Intent::ServiceQuery);
    }

    #[test]
    fn test_general_query_default() {
        let c = classifier();
        assert_eq!(c.classify("asdkjasd"), Intent::GeneralQuery);
        assert_eq!(c.classify("where is the moon"), Intent::GeneralQuery);
    }

    #[test]
    fn test_normalization() {
        let c = classifier();
        assert_eq!(c.classify("  OUR SERVICES  "), Intent::OurServices);
    }
}
