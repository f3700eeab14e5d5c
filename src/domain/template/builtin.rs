//! Templates shipped with the catalog

use super::types::TemplateDraft;

/// Categories offered by the filter even when no template uses them
pub const DEFAULT_CATEGORIES: &[&str] = &["Work", "Personal", "Creative", "Learning", "Productivity"];

fn draft(
    name: &str,
    description: &str,
    category: &str,
    tags: &[&str],
    icon: &str,
    body: &str,
    variables: &[&str],
) -> TemplateDraft {
    TemplateDraft {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        icon: icon.to_string(),
        body: body.to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
    }
}

/// Built-in templates in catalog-definition order, keyed by their fixed ids
pub fn default_templates() -> Vec<(&'static str, TemplateDraft)> {
    vec![
        (
            "meeting-notes",
            draft(
                "Meeting Notes",
                "Agenda, attendees and action items for a meeting",
                "Work",
                &["meeting", "work", "agenda"],
                "📋",
                "# {{title}}\n\n**Date:** {{date}}\n**Attendees:** {{attendees}}\n\n## Agenda\n- \n\n## Discussion\n\n## Action Items\n- [ ] \n",
                &["title", "date", "attendees"],
            ),
        ),
        (
            "daily-journal",
            draft(
                "Daily Journal",
                "Reflect on your day",
                "Personal",
                &["journal", "daily", "reflection"],
                "📔",
                "# Journal: {{date}}\n\n**Mood:** {{mood}}\n\n## Grateful for\n- \n\n## What happened today\n\n## Tomorrow\n- \n",
                &["date", "mood"],
            ),
        ),
        (
            "project-plan",
            draft(
                "Project Plan",
                "Goals, milestones and risks for a new project",
                "Work",
                &["project", "planning", "roadmap"],
                "🗂️",
                "# {{project_name}}\n\n**Owner:** {{owner}}\n**Deadline:** {{deadline}}\n\n## Goals\n- \n\n## Milestones\n- [ ] \n\n## Risks\n- \n",
                &["project_name", "owner", "deadline"],
            ),
        ),
        (
            "book-notes",
            draft(
                "Book Notes",
                "Summary and key ideas from a book",
                "Learning",
                &["book", "reading", "summary"],
                "📚",
                "# {{book_title}}\n\n**Author:** {{author}}\n\n## Summary\n\n## Key Ideas\n1. \n\n## Quotes\n> \n",
                &["book_title", "author"],
            ),
        ),
        (
            "story-outline",
            draft(
                "Story Outline",
                "Characters, setting and plot beats for a story",
                "Creative",
                &["writing", "story", "fiction"],
                "✍️",
                "# {{story_title}}\n\n**Genre:** {{genre}}\n**Protagonist:** {{protagonist}}\n\n## Setting\n\n## Plot\n1. Beginning\n2. Middle\n3. End\n",
                &["story_title", "genre", "protagonist"],
            ),
        ),
        (
            "weekly-review",
            draft(
                "Weekly Review",
                "Look back on the week and plan the next one",
                "Productivity",
                &["review", "weekly", "planning"],
                "🗓️",
                "# Week of {{week_start}}\n\n## Wins\n- \n\n## Challenges\n- \n\n## Focus for next week\n- \n",
                &["week_start"],
            ),
        ),
    ]
}
