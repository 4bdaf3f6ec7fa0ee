use mongodb::bson::oid::ObjectId;
use std::collections::HashSet;

use super::flatten::flatten_iter;
use crate::models::{Quiz, ResolvedBookmark};

/// Resolves bookmarked question ids against standalone questions and group
/// children. Children get their group's case stem back. Ids that match
/// nothing are dropped without error, so the result may be shorter than
/// `bookmarked_ids`.
pub fn resolve_bookmarks(
    quizzes: &[Quiz],
    bookmarked_ids: &HashSet<ObjectId>,
) -> Vec<ResolvedBookmark> {
    if bookmarked_ids.is_empty() {
        return Vec::new();
    }

    flatten_iter(quizzes)
        .filter(|record| bookmarked_ids.contains(&record.id))
        .map(|question| ResolvedBookmark {
            quiz_id: question.quiz_id,
            quiz_title: question.quiz_title.clone(),
            question,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{group, question, quiz, standalone};
    use crate::models::{Difficulty, QuestionItem};

    #[test]
    fn resolves_standalone_and_child_with_case_stem() {
        let single = question("single", &["a"], Some(Difficulty::Recall));
        let child = question("child", &["b"], Some(Difficulty::Application));
        let quizzes = vec![quiz(
            "Renal",
            vec![
                standalone(single.clone()),
                group(
                    "Oliguric patient after surgery",
                    vec![question("other", &[], None), child.clone()],
                ),
            ],
        )];
        let ids: HashSet<_> = [single.id, child.id, ObjectId::new()].into_iter().collect();

        let resolved = resolve_bookmarks(&quizzes, &ids);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].question.id, single.id);
        assert!(resolved[0].question.case_stem.is_none());
        assert_eq!(resolved[1].question.id, child.id);
        assert_eq!(
            resolved[1].question.case_stem.as_deref(),
            Some("Oliguric patient after surgery")
        );
        assert_eq!(resolved[1].quiz_id, quizzes[0].id);
        assert_eq!(resolved[1].quiz_title, "Renal");
    }

    #[test]
    fn group_id_itself_is_not_a_question() {
        let item = group("Case", vec![question("child", &[], None)]);
        let group_id = match &item {
            QuestionItem::Group(group) => group.id,
            QuestionItem::Standalone(_) => unreachable!("fixture builds a group"),
        };
        let quizzes = vec![quiz("Q", vec![item])];
        let ids: HashSet<_> = [group_id].into_iter().collect();

        assert!(resolve_bookmarks(&quizzes, &ids).is_empty());
    }

    #[test]
    fn unknown_ids_only_yield_nothing() {
        let quizzes = vec![quiz("Q", vec![standalone(question("s", &[], None))])];
        let ids: HashSet<_> = [ObjectId::new(), ObjectId::new()].into_iter().collect();

        assert!(resolve_bookmarks(&quizzes, &ids).is_empty());
        assert!(resolve_bookmarks(&quizzes, &HashSet::new()).is_empty());
    }

    #[test]
    fn matches_across_quizzes_keep_owning_quiz() {
        let first = question("first", &[], None);
        let second = question("second", &[], None);
        let quizzes = vec![
            quiz("Alpha", vec![standalone(first.clone())]),
            quiz("Beta", vec![group("Case", vec![second.clone()])]),
        ];
        let ids: HashSet<_> = [second.id, first.id].into_iter().collect();

        let resolved = resolve_bookmarks(&quizzes, &ids);
        let titles: Vec<&str> = resolved.iter().map(|r| r.quiz_title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }
}
