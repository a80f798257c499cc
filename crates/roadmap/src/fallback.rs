//! Synthetic roadmap fallback.
//!
//! When the model response cannot be recovered, the user still gets a
//! usable course: deterministic milestones with placeholder resources and a
//! generic quiz. Callers flag the course as synthetic so operators can tell
//! the difference.

use pathwise_core::{
    AdditionalResource, MilestoneResources, QuizQuestion, Roadmap, RoadmapMilestone,
    YoutubeVideo,
};

/// Build the deterministic fallback roadmap for a topic.
pub fn synthetic_roadmap(topic: &str, duration: &str, milestone_count: usize) -> Roadmap {
    let milestones = (1..=milestone_count as u32)
        .map(|order| RoadmapMilestone {
            title: format!("{} - Milestone {}", topic, order),
            order,
            resources: placeholder_resources(),
            quiz: generic_quiz(topic),
        })
        .collect();

    Roadmap {
        course_name: format!("{} Learning Path", topic),
        duration: duration.to_string(),
        milestones,
    }
}

fn placeholder_resources() -> MilestoneResources {
    MilestoneResources {
        website: Some("https://developer.mozilla.org/en-US/docs/Web".to_string()),
        youtube: vec![YoutubeVideo {
            title: "Introduction Tutorial".to_string(),
            channel: "Educational Channel".to_string(),
            url: "https://youtube.com".to_string(),
        }],
        additional: vec![AdditionalResource {
            title: "Documentation".to_string(),
            url: "https://docs.example.com".to_string(),
            kind: "documentation".to_string(),
        }],
    }
}

fn generic_quiz(topic: &str) -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            question: format!("What is the key concept in {}?", topic),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct: 0,
        },
        QuizQuestion {
            question: format!("How do you implement {}?", topic),
            options: vec![
                "Method 1".to_string(),
                "Method 2".to_string(),
                "Method 3".to_string(),
                "Method 4".to_string(),
            ],
            correct: 1,
        },
        QuizQuestion {
            question: format!("What are best practices for {}?", topic),
            options: vec![
                "Practice A".to_string(),
                "Practice B".to_string(),
                "Practice C".to_string(),
                "Practice D".to_string(),
            ],
            correct: 2,
        },
    ]
}
