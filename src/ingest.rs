//! Mock feedback generator for seeding a store without a live ingest
//! source. Deterministic for a given seed so repeated runs are comparable.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::RawFeedback;

const TEMPLATES: &[&str] = &[
    // performance
    "The {product} dashboard is incredibly slow today. I can't even load my logs.",
    "Page load times have increased significantly over the past week. Users are complaining.",
    "The API response time for {product} is over 5 seconds. This is unacceptable.",
    "Experiencing severe latency issues with {product}. Requests are timing out.",
    "The {product} service is completely unresponsive. Is there an outage?",
    // feature requests
    "Is it possible to add {feature} support? We really need this for our enterprise stack.",
    "Do you plan to support {feature} in the near future? Our team is evaluating alternatives because of this.",
    "Would love to see {feature} integration. This would solve a major pain point for us.",
    "Feature request: Please add {feature} support. It's the only thing preventing us from fully migrating.",
    "Can you implement {feature}? We've been waiting for this for months.",
    // bug reports
    "Received a 500 error when trying to deploy my {product} script. Is there an outage?",
    "Urgent: My {product} rules are blocking valid traffic from my primary API.",
    "The {product} console crashes when I try to view analytics. This happens every time.",
    "Found a bug: The save button doesn't work in the {product} dashboard on Safari.",
    "Critical bug: Deployments are failing silently. No error messages shown.",
    "The {product} API is returning incorrect data. The timestamps are all wrong.",
    "Bug report: Can't delete resources in {product}. Getting permission denied errors.",
    // ui/ux
    "I love the new {product} UI, but the 'Save' button is hidden on mobile screens.",
    "The {product} interface is confusing. Can't find where to configure settings.",
    "The dark mode in {product} has poor contrast. Hard to read text.",
    "Mobile experience for {product} is terrible. Everything is too small.",
    // integration
    "Having trouble integrating {product} with our CI/CD pipeline. Documentation is unclear.",
    "The {product} webhook isn't firing. Our monitoring system isn't receiving events.",
    "Integration with {feature} is broken. Getting 401 unauthorized errors.",
    // security
    "Security concern: The {product} API keys are visible in the browser console.",
    "Is {product} data encrypted at rest? We need this for compliance.",
    // positive
    "The new {product} features are amazing! Great work team.",
    "Love the improvements to {product}. The performance is much better now.",
    "The {product} documentation is excellent. Made integration super easy.",
    // reliability
    "The {product} service went down yesterday. What happened?",
    "Experiencing intermittent failures with {product}. Very unreliable.",
    // billing / tiers
    "The {product} free tier is too limited. Need more generous limits.",
    "We're a business customer and the {product} pricing page doesn't match our invoice.",
    // storage
    "The {product} storage is filling up too quickly. Need more space.",
    "Can't retrieve old data from {product}. Archive feature not working.",
];

const PRODUCTS: &[&str] = &[
    "Workers",
    "R2",
    "WAF",
    "Pages",
    "D1",
    "KV",
    "Durable Objects",
    "Stream",
    "Images",
    "Analytics",
];

const FEATURES: &[&str] = &[
    "PostgreSQL",
    "Python",
    "Websockets",
    "Custom Headers",
    "GraphQL",
    "gRPC",
    "Server-Sent Events",
    "WebAssembly",
];

const AUTHORS: &[&str] = &[
    "john.doe@example.com",
    "sarah.smith@example.com",
    "mike.jones@example.com",
    "emily.brown@example.com",
    "david.wilson@example.com",
    "lisa.anderson@example.com",
    "chris.taylor@example.com",
    "jessica.martinez@example.com",
];

const URGENCY_SUFFIX: &str =
    " This is affecting our production environment and needs urgent attention.";

const TITLE_MAX_CHARS: usize = 80;

fn title_for(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        return text.to_string();
    }
    let mut title: String = text.chars().take(TITLE_MAX_CHARS - 3).collect();
    title.push_str("...");
    title
}

/// Generate `count` mock feedback items, reproducible for a given seed.
pub fn generate_feedback(count: usize, seed: u64) -> Vec<RawFeedback> {
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();

    (0..count)
        .map(|_| {
            let template = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
            let product = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            let feature = FEATURES[rng.gen_range(0..FEATURES.len())];

            let mut text = template
                .replace("{product}", product)
                .replace("{feature}", feature);
            if rng.gen_bool(0.3) {
                text.push_str(URGENCY_SUFFIX);
            }

            let days_ago = rng.gen_range(0..30);
            let hours_ago = rng.gen_range(0..24);

            RawFeedback {
                title: title_for(&text),
                body: text,
                author: AUTHORS[rng.gen_range(0..AUTHORS.len())].to_string(),
                created_at: now - Duration::days(days_ago) - Duration::hours(hours_ago),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_generates_same_feedback() {
        let a = generate_feedback(20, 7);
        let b = generate_feedback(20, 7);
        assert_eq!(a.len(), 20);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.title, y.title);
            assert_eq!(x.body, y.body);
            assert_eq!(x.author, y.author);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate_feedback(20, 1);
        let b = generate_feedback(20, 2);
        assert!(a.iter().zip(&b).any(|(x, y)| x.body != y.body));
    }

    #[test]
    fn titles_are_capped() {
        for raw in generate_feedback(100, 3) {
            assert!(raw.title.chars().count() <= TITLE_MAX_CHARS);
            assert!(!raw.body.is_empty());
        }
    }
}
