use crate::api::Story;

/// Narrows `stories` to those in `category` (any when `None`) whose title or
/// hashtags contain `query`, case-insensitively. Order is preserved.
pub fn filter_stories<'a>(
    stories: &'a [Story],
    category: Option<u64>,
    query: &str,
) -> Vec<&'a Story> {
    let needle = query.to_lowercase();
    stories
        .iter()
        .filter(|story| category.is_none() || story.category_id() == category)
        .filter(|story| needle.is_empty() || matches_query(story, &needle))
        .collect()
}

fn matches_query(story: &Story, needle: &str) -> bool {
    story.title.to_lowercase().contains(needle)
        || story
            .hashtags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StoryBuilder;

    fn ids(stories: &[&Story]) -> Vec<u64> {
        stories.iter().map(|s| s.id).collect()
    }

    fn sample() -> Vec<Story> {
        vec![
            StoryBuilder::new()
                .id(1)
                .title("Finding Hope Again")
                .category(1, "Recovery")
                .build(),
            StoryBuilder::new()
                .id(2)
                .title("First week")
                .category(2, "Grief")
                .hashtags(&["HOPE", "loss"])
                .build(),
            StoryBuilder::new().id(3).title("Uncategorized").build(),
            StoryBuilder::new()
                .id(4)
                .title("Small wins")
                .category(1, "Recovery")
                .build(),
        ]
    }

    #[test]
    fn wildcards_return_everything_in_order() {
        let stories = sample();
        assert_eq!(ids(&filter_stories(&stories, None, "")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn category_is_exact_match() {
        let stories = sample();
        assert_eq!(ids(&filter_stories(&stories, Some(1), "")), vec![1, 4]);
        assert!(filter_stories(&stories, Some(99), "").is_empty());
    }

    #[test]
    fn uncategorized_never_matches_a_selected_category() {
        let stories = sample();
        let visible = filter_stories(&stories, Some(2), "");
        assert!(visible.iter().all(|s| s.category.is_some()));
    }

    #[test]
    fn query_matches_title_or_hashtag_case_insensitively() {
        let stories = sample();
        assert_eq!(ids(&filter_stories(&stories, None, "hope")), vec![1, 2]);
        assert_eq!(ids(&filter_stories(&stories, None, "LOSS")), vec![2]);
    }

    #[test]
    fn category_and_query_combine() {
        let stories = sample();
        assert_eq!(ids(&filter_stories(&stories, Some(2), "hope")), vec![2]);
        assert!(filter_stories(&stories, Some(1), "loss").is_empty());
    }

    #[test]
    fn whitespace_in_query_is_significant() {
        let stories = sample();
        // Only multi-word titles contain a space.
        assert_eq!(ids(&filter_stories(&stories, None, " ")), vec![1, 2, 4]);
        assert_eq!(ids(&filter_stories(&stories, None, "hope ")), vec![1]);
        assert!(filter_stories(&stories, None, "week ").is_empty());
    }
}
