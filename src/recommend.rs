use std::cmp::Reverse;

use crate::context::{Affinity, Show};

/// How many picks a recommendation listing shows by default.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 4;

/// Scores one show against the recipient's affinity: a category match
/// counts double, a venue match counts single. Comparison is
/// case-insensitive so CMS casing drift does not split categories.
pub fn affinity_score(show: &Show, affinity: &Affinity) -> u32 {
    let mut score = 0;
    if let (Some(category), Some(liked)) = (&show.category, &affinity.category) {
        if category.eq_ignore_ascii_case(liked) {
            score += 2;
        }
    }
    if let Some(liked) = &affinity.venue {
        if show.venue.eq_ignore_ascii_case(liked) {
            score += 1;
        }
    }
    score
}

/// Ranks shows for the recipient, best first. The sort is stable, so
/// shows with equal scores keep their input order and repeat renders
/// produce identical lists.
pub fn rank<'a>(shows: &'a [Show], affinity: &Affinity) -> Vec<&'a Show> {
    let mut ranked: Vec<&Show> = shows.iter().collect();
    ranked.sort_by_key(|show| Reverse(affinity_score(show, affinity)));
    ranked
}

/// The top `limit` picks for the recipient.
pub fn top<'a>(shows: &'a [Show], affinity: &Affinity, limit: usize) -> Vec<&'a Show> {
    let mut ranked = rank(shows, affinity);
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(name: &str, venue: &str, category: &str) -> Show {
        Show {
            name: name.into(),
            venue: venue.into(),
            category: Some(category.into()),
            ..Show::default()
        }
    }

    #[test]
    fn category_beats_venue() {
        let affinity = Affinity {
            category: Some("comedy".into()),
            venue: Some("Paramount".into()),
        };
        let by_category = show("A", "Elsewhere", "comedy");
        let by_venue = show("B", "Paramount", "music");
        assert_eq!(affinity_score(&by_category, &affinity), 2);
        assert_eq!(affinity_score(&by_venue, &affinity), 1);
        let both = show("C", "Paramount", "comedy");
        assert_eq!(affinity_score(&both, &affinity), 3);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let shows = vec![
            show("First Laugh", "Room A", "comedy"),
            show("Loud Night", "Room B", "music"),
            show("Second Laugh", "Room C", "comedy"),
        ];
        let affinity = Affinity {
            category: Some("Comedy".into()),
            venue: None,
        };
        for _ in 0..3 {
            let ranked = rank(&shows, &affinity);
            let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["First Laugh", "Second Laugh", "Loud Night"]);
        }
    }

    #[test]
    fn no_affinity_keeps_input_order() {
        let shows = vec![
            show("One", "V", "music"),
            show("Two", "V", "comedy"),
        ];
        let ranked = rank(&shows, &Affinity::default());
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn top_respects_the_limit() {
        let shows: Vec<Show> = (0..6).map(|i| show(&format!("S{i}"), "V", "music")).collect();
        assert_eq!(top(&shows, &Affinity::default(), 4).len(), 4);
        assert_eq!(top(&shows, &Affinity::default(), 10).len(), 6);
    }
}
