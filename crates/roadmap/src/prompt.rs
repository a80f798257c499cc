//! Prompt assembly for roadmap generation.

use pathwise_core::{Goal, LearnerProfile, Preference, SkillLevel};

/// Default milestone count for unrecognized durations.
const DEFAULT_MILESTONE_COUNT: usize = 4;

/// Milestone count derived from the requested duration.
pub fn milestone_count(duration: &str) -> usize {
    match duration {
        "1 week" => 3,
        "2 weeks" => 4,
        "4 weeks" => 5,
        _ => DEFAULT_MILESTONE_COUNT,
    }
}

fn resource_rules(preference: Preference) -> &'static str {
    match preference {
        Preference::Videos => {
            "- Include 2-3 YouTube videos and 1 website/documentation link per milestone\n"
        }
        Preference::Notes => {
            "- Include 2 websites/documentation links and 1 video per milestone\n"
        }
        Preference::Interactive => {
            "- Include coding playgrounds, GitHub labs, and interactive tutorials\n"
        }
    }
}

fn difficulty_rules(skill_level: SkillLevel) -> &'static str {
    match skill_level {
        SkillLevel::Beginner => {
            "- Use simple explanations and easier quiz questions\n- Focus on fundamentals and basic concepts\n"
        }
        SkillLevel::Advanced => {
            "- Include advanced documentation and complex tutorials\n- Create challenging quiz questions\n"
        }
        SkillLevel::Intermediate => "",
    }
}

fn goal_rules(goal: Goal) -> &'static str {
    match goal {
        Goal::Exam => {
            "- Create practice-style quiz questions similar to exam format\n- Focus on testable concepts\n"
        }
        Goal::Project => {
            "- Include 1 small project idea or exercise per milestone\n- Focus on practical application\n"
        }
        Goal::Placement => {
            "- Add interview-style questions and resources\n- Include real-world problem-solving scenarios\n"
        }
        Goal::Other => "",
    }
}

/// Build the JSON-only roadmap prompt for a profile. The schema skeleton is
/// spelled out verbatim so the model has an exact target shape.
pub fn build_prompt(profile: &LearnerProfile, milestone_count: usize) -> String {
    format!(
        r#"CRITICAL: You MUST respond with ONLY valid JSON. No markdown, no explanations, no additional text.

Generate a learning roadmap for: "{topic}" (Duration: {duration})

User Profile: {skill} level, prefers {preference}, goal: {goal}

EXACT JSON FORMAT REQUIRED:
{{
  "courseName": "Course title here",
  "duration": "{duration}",
  "milestones": [
    {{
      "title": "Milestone title",
      "order": 1,
      "resources": {{
        "website": "High-quality website URL with description",
        "youtube": [
          {{"title": "Exact video title", "channel": "Channel name", "url": "YouTube URL"}}
        ],
        "additional": [
          {{"title": "Resource title", "url": "URL", "type": "article"}}
        ]
      }},
      "quiz": [
        {{
          "question": "Quiz question here?",
          "options": ["Option A", "Option B", "Option C", "Option D"],
          "correct": 0
        }}
      ]
    }}
  ]
}}

REQUIREMENTS:
- Exactly {milestone_count} milestones
- Each milestone: 3-5 quiz questions
{resource_rules}{difficulty_rules}{goal_rules}- Real URLs only
- Logical progression

RESPOND WITH JSON ONLY. NO OTHER TEXT."#,
        topic = profile.topic,
        duration = profile.duration,
        skill = profile.skill_level.as_str(),
        preference = profile.preference.as_str(),
        goal = profile.goal.as_str(),
        milestone_count = milestone_count,
        resource_rules = resource_rules(profile.preference),
        difficulty_rules = difficulty_rules(profile.skill_level),
        goal_rules = goal_rules(profile.goal),
    )
}
