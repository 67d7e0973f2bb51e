//! Message pools the simulated users draw from.

use rand::seq::SliceRandom;
use rand::Rng;

/// Topics sent to the single-agent Gemma deployment
pub const GEMMA_TOPICS: [&str; 8] = [
    "What is machine learning?",
    "Explain cloud computing",
    "Tell me about renewable energy",
    "What are the benefits of AI?",
    "How does quantum computing work?",
    "Describe blockchain technology",
    "What is sustainable development?",
    "Explain neural networks",
];

/// General topics sent to Gemma in the multi-agent deployment
pub const CONVERSATION_TOPICS: [&str; 8] = [
    "Tell me about artificial intelligence",
    "What are some creative writing tips?",
    "Explain how photosynthesis works",
    "What's the difference between machine learning and deep learning?",
    "Can you help me brainstorm ideas for a blog post?",
    "How do I solve quadratic equations?",
    "What are the benefits of renewable energy?",
    "Explain the concept of blockchain in simple terms",
];

pub const WEATHER_CITIES: [&str; 8] = [
    "New York",
    "London",
    "Tokyo",
    "Paris",
    "Sydney",
    "San Francisco",
    "Berlin",
    "Miami",
];

pub const BILL_AMOUNTS: [f64; 8] = [25.50, 45.80, 78.25, 120.00, 89.99, 156.75, 67.40, 95.20];

pub const TIP_PERCENTAGES: [u32; 5] = [15, 18, 20, 22, 25];

/// An empty pool yields an empty topic
pub fn topic<R: Rng>(pool: &[&str], rng: &mut R) -> String {
    pool.choose(rng).map(|t| t.to_string()).unwrap_or_default()
}

pub fn weather_query<R: Rng>(rng: &mut R) -> String {
    let city = WEATHER_CITIES.choose(rng).copied().unwrap_or_default();
    match rng.gen_range(0..6) {
        0 => format!("What's the weather like in {}?", city),
        1 => format!("Can you check the weather for {}?", city),
        2 => format!("How's the weather in {} today?", city),
        3 => format!("Tell me about the weather in {}", city),
        4 => format!("Get me the current weather for {}", city),
        _ => format!("What are the weather conditions in {}?", city),
    }
}

pub fn tip_query<R: Rng>(rng: &mut R) -> String {
    let bill = BILL_AMOUNTS.choose(rng).copied().unwrap_or_default();
    let pct = TIP_PERCENTAGES.choose(rng).copied().unwrap_or_default();
    match rng.gen_range(0..6) {
        0 => format!("Calculate the tip for a ${:.2} bill with {}% tip", bill, pct),
        1 => format!("What's the tip on ${:.2} at {} percent?", bill, pct),
        2 => format!("Help me calculate a {}% tip on a ${:.2} bill", pct, bill),
        3 => format!("I need to calculate the tip for ${:.2} with {}% gratuity", bill, pct),
        4 => format!("What should I tip on a ${:.2} bill? Use {}%", bill, pct),
        _ => format!("Calculate tip: bill is ${:.2}, tip rate {}%", bill, pct),
    }
}
