//! Tasks every fresh review queue starts with.

use chrono::{DateTime, Duration, Utc};

use super::{Task, TaskStatus, Tier};

/// Returns the three seeded demo tasks, newest first.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: "t-103".to_string(),
            client_id: "Client_C (Standard)".to_string(),
            tier: Tier::Standard,
            input: "Write a blog post intro about AI automation.".to_string(),
            ai_draft: "AI is the future. It helps you save money and time.".to_string(),
            confidence: 95,
            status: TaskStatus::Pending,
            risk_flag: false,
            timestamp: now,
        },
        Task {
            id: "t-102".to_string(),
            client_id: "Client_B (Enterprise)".to_string(),
            tier: Tier::Enterprise,
            input: "Generate legal disclaimer for the new Q3 report.".to_string(),
            ai_draft: "The company is likely not responsible for errors...".to_string(),
            confidence: 82,
            status: TaskStatus::Pending,
            risk_flag: true,
            timestamp: now - Duration::milliseconds(500_000),
        },
        Task {
            id: "t-101".to_string(),
            client_id: "Client_A (Standard)".to_string(),
            tier: Tier::Standard,
            input: "Draft a reply to the customer complaint about shipping delay.".to_string(),
            ai_draft: "Hey sorry about the wait. We will get it to you whenever.".to_string(),
            confidence: 65,
            status: TaskStatus::Pending,
            risk_flag: true,
            timestamp: now - Duration::milliseconds(1_000_000),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_newest_first() {
        let tasks = seed_tasks(Utc::now());
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["t-103", "t-102", "t-101"]);
        assert!(tasks.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }
}
