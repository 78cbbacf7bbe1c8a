//! Scripted market assistant.
//!
//! Replies are canned paragraphs picked by keyword rules; there is no model
//! behind this. Matching is case-insensitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hello, I am LegalInsight AI. I can provide you with insights on legal tech market data, funding information, and investment trends. How can I assist you today?";

pub const SUGGESTIONS: [&str; 5] = [
    "What are the top 5 legal tech companies by funding in 2023?",
    "Show me trends in legal document automation startups",
    "Compare burn rates of AI legal research tools",
    "What features do successful legal tech platforms share?",
    "Which legal tech verticals are seeing the most investor interest?",
];

pub const REPHRASE: &str = "I don't have enough specific data on that query. Could you rephrase or ask about legal tech funding, market trends, burn rates, or investor interest in specific verticals?";

const TOP_FUNDING: &str = "Based on our data, the top legal tech companies by funding in 2023 were:

1. Clio - $250M (Series D)
2. LegalZoom - $535M (IPO)
3. Relativity - $100M (Private Equity)
4. ContractPodAi - $115M (Series C)
5. Everlaw - $85M (Series D)

These companies focus on areas such as practice management, document management, contract analysis, and e-discovery.";

const DOCUMENT_AUTOMATION: &str = "We're seeing strong growth in legal document automation startups, with a 34% increase in funding compared to last year. Key trends include:

- AI-enhanced template generation
- Integration with existing legal workflows
- Regulatory compliance automation
- Multilingual capabilities
- Blockchain-based document verification

Companies like Ironclad, ContractPodAi, and Juro are leading this segment.";

const BURN_RATES: &str = "Our analysis shows that AI legal research tools have varying burn rates:

- Early-stage startups: $150K-$300K monthly
- Growth-stage companies: $500K-$1.2M monthly
- Late-stage players: $2M+ monthly

Tools focused on specialized practice areas tend to have better unit economics and lower customer acquisition costs.";

const PLATFORM_FEATURES: &str = "Our data indicates successful legal tech platforms share these key features:

1. Intuitive user interfaces designed for legal workflows
2. Strong security and compliance frameworks
3. Integration capabilities with other legal software
4. Customizable reporting and analytics
5. Cloud-based deployment with on-premises options
6. Mobile accessibility for court/client interactions";

const VERTICALS: &str = "Current investor interest is highest in these legal tech verticals:

1. Regulatory compliance and risk management (36% of funding)
2. Contract lifecycle management (28% of funding)
3. Legal operations & analytics (17% of funding)
4. E-discovery and litigation support (12% of funding)
5. Access to justice platforms (7% of funding)

Early-stage funding is particularly strong in regulatory tech.";

/// Rules are checked in order; the first match wins. Each rule is a list of
/// alternatives, and each alternative is a set of keywords that must all appear.
const RULES: [(&[&[&str]], &str); 5] = [
    (&[&["top", "funding"]], TOP_FUNDING),
    (&[&["document", "automation"]], DOCUMENT_AUTOMATION),
    (&[&["burn rates"]], BURN_RATES),
    (&[&["features"]], PLATFORM_FEATURES),
    (&[&["investor interest"], &["verticals"]], VERTICALS),
];

/// Canned reply for `query`.
pub fn respond(query: &str) -> &'static str {
    let query = query.to_lowercase();
    RULES
        .iter()
        .find(|(alternatives, _)| {
            alternatives
                .iter()
                .any(|keywords| keywords.iter().all(|k| query.contains(k)))
        })
        .map(|(_, reply)| *reply)
        .unwrap_or(REPHRASE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// In-memory conversation, starting with the greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
                timestamp: Utc::now(),
            }],
        }
    }

    /// Record `query` and the reply to it. Blank input is ignored.
    pub fn ask(&mut self, query: &str) -> Option<&ChatMessage> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let now = Utc::now();
        self.messages.push(ChatMessage {
            role: Role::User,
            content: query.to_string(),
            timestamp: now,
        });
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: respond(query).to_string(),
            timestamp: now,
        });
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
