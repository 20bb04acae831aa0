//! Goal and hypothesis extraction.
//!
//! The renderer lays out each goal as a run of list items: zero or more
//! hypothesis items followed by the item holding the turnstile and the
//! goal statement. Items are recognized by class-name fragments only:
//!
//! ```text
//! <li><span class="goal-hyp">h</span> : <span class="goal-hyp-type">p ∧ q</span></li>
//! <li><span class="goal-vdash">⊢ </span><span>q ∧ p</span></li>
//! ```
//!
//! Class names are matched on the JSON serialization of the attribute,
//! so both string and list values work, and any class that merely
//! contains a marker also matches.

use goalsync_core::{Goal, Hypothesis, WidgetElement, WidgetNode};
use tracing::trace;

use crate::walker::{walk, ElementWalker, Visit};

/// Class marking the turnstile of a goal item.
pub const GOAL_VDASH: &str = "goal-vdash";

/// Class marking a hypothesis name.
pub const GOAL_HYP: &str = "goal-hyp";

/// Class marking a hypothesis type.
pub const GOAL_HYP_TYPE: &str = "goal-hyp-type";

/// Exact text of the turnstile span.
pub const TURNSTILE: &str = "⊢ ";

fn has_class(element: &WidgetElement, marker: &str) -> bool {
    element
        .class_name()
        .is_some_and(|class| class.contains(marker))
}

fn is_span_with(element: &WidgetElement, marker: &str) -> bool {
    element.is("span") && has_class(element, marker)
}

/// Rendered text of an element.
///
/// Concatenates, in document order, the text of every element in the
/// subtree (the element included) whose children are exactly one leaf.
pub fn text_content(element: &WidgetElement) -> String {
    ElementWalker::from_element(element)
        .filter_map(WidgetElement::sole_text)
        .collect()
}

/// Read a hypothesis item.
///
/// The item is an `li` with a `goal-hyp` span holding the name as its
/// only text, and a `goal-hyp-type` span among its children. The name
/// comes from the first `goal-hyp` span with non-empty text, the type
/// from the first `goal-hyp-type` span.
pub fn hypothesis_of(item: &WidgetElement) -> Option<Hypothesis> {
    if !item.is("li") {
        return None;
    }

    let expression = item
        .child_elements()
        .filter(|child| is_span_with(child, GOAL_HYP))
        .find_map(|child| child.sole_text().filter(|text| !text.is_empty()))?;

    let type_span = item
        .child_elements()
        .find(|child| is_span_with(child, GOAL_HYP_TYPE))?;

    Some(Hypothesis::new(expression, text_content(type_span)))
}

/// Read a goal item, returning its rendered statement.
///
/// The item is an `li` with a `goal-vdash` span whose only text is the
/// turnstile.
pub fn goal_of(item: &WidgetElement) -> Option<String> {
    if !item.is("li") {
        return None;
    }

    let has_turnstile = item
        .child_elements()
        .any(|child| is_span_with(child, GOAL_VDASH) && child.sole_text() == Some(TURNSTILE));

    has_turnstile.then(|| text_content(item))
}

/// Lazy sequence of goals found in a widget tree.
///
/// Hypotheses accumulate until the next goal item, which takes all of
/// them. Hypotheses after the last goal item are dropped.
#[derive(Debug, Clone)]
pub struct Goals<'a> {
    walker: ElementWalker<'a>,
    hypotheses: Vec<Hypothesis>,
    visit: Visit,
}

impl<'a> Goals<'a> {
    /// Start extracting from `root`.
    pub fn new(root: &'a WidgetNode) -> Self {
        Self {
            walker: ElementWalker::new(root),
            hypotheses: Vec::new(),
            visit: Visit::Descend,
        }
    }
}

impl Iterator for Goals<'_> {
    type Item = Goal;

    fn next(&mut self) -> Option<Goal> {
        loop {
            let element = self.walker.next_with(self.visit)?;

            if let Some(hypothesis) = hypothesis_of(element) {
                self.hypotheses.push(hypothesis);
                self.visit = Visit::Skip;
                continue;
            }

            if let Some(goal) = goal_of(element) {
                self.visit = Visit::Skip;
                let hypotheses = std::mem::take(&mut self.hypotheses);
                trace!("Extracted goal {:?} with {} hypotheses", goal, hypotheses.len());
                return Some(Goal { goal, hypotheses });
            }

            self.visit = Visit::Descend;
        }
    }
}

/// Lazily extract goals from a widget tree.
pub fn goals(root: &WidgetNode) -> Goals<'_> {
    Goals::new(root)
}

/// Extract all goals from a widget tree.
pub fn extract_goals(root: &WidgetNode) -> Vec<Goal> {
    goals(root).collect()
}

/// Extract every hypothesis in a widget tree, regardless of goal.
pub fn hypotheses(root: &WidgetNode) -> Vec<Hypothesis> {
    let mut found = Vec::new();
    walk(root, |element| match hypothesis_of(element) {
        Some(hypothesis) => {
            found.push(hypothesis);
            Visit::Skip
        }
        None => Visit::Descend,
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalsync_core::AttributeValue;
    use serde_json::json;

    fn hyp_item(name: &str, ty: &str) -> WidgetElement {
        WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text(name))
            .with_text(" : ")
            .with_child(
                WidgetElement::new("span")
                    .with_class("goal-hyp-type")
                    .with_child(WidgetElement::new("span").with_text(ty)),
            )
    }

    fn goal_item(statement: &str) -> WidgetElement {
        WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-vdash").with_text("⊢ "))
            .with_child(WidgetElement::new("span").with_text(statement))
    }

    fn list(items: Vec<WidgetElement>) -> WidgetNode {
        items
            .into_iter()
            .fold(WidgetElement::new("ul"), |ul, item| ul.with_child(item))
            .into()
    }

    #[test]
    fn test_single_goal_without_hypotheses() {
        let tree = list(vec![goal_item("p")]);
        let goals = extract_goals(&tree);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal, "⊢ p");
        assert!(goals[0].hypotheses.is_empty());
    }

    #[test]
    fn test_hypotheses_attach_to_next_goal() {
        let tree = list(vec![
            hyp_item("p q", "Prop"),
            hyp_item("h", "p ∧ q"),
            goal_item("q ∧ p"),
            goal_item("p"),
        ]);

        let goals = extract_goals(&tree);
        assert_eq!(goals.len(), 2);
        assert_eq!(
            goals[0].hypotheses,
            vec![Hypothesis::new("p q", "Prop"), Hypothesis::new("h", "p ∧ q")]
        );
        assert_eq!(goals[0].goal, "⊢ q ∧ p");
        assert!(goals[1].hypotheses.is_empty());
    }

    #[test]
    fn test_hypotheses_are_not_shared_between_goals() {
        let tree = list(vec![
            hyp_item("a", "ℕ"),
            goal_item("a = a"),
            hyp_item("b", "ℕ"),
            goal_item("b = b"),
        ]);

        let goals = extract_goals(&tree);
        assert_eq!(goals[0].hypotheses, vec![Hypothesis::new("a", "ℕ")]);
        assert_eq!(goals[1].hypotheses, vec![Hypothesis::new("b", "ℕ")]);
    }

    #[test]
    fn test_trailing_hypotheses_are_dropped() {
        let tree = list(vec![goal_item("p"), hyp_item("h", "p")]);
        let goals = extract_goals(&tree);
        assert_eq!(goals.len(), 1);
        assert!(goals[0].hypotheses.is_empty());
    }

    #[test]
    fn test_goals_in_nested_markup() {
        let tree: WidgetNode = WidgetElement::new("div")
            .with_child(WidgetElement::new("div").with_child(goal_item("x")))
            .with_child(WidgetElement::new("div").with_child(list(vec![goal_item("y")])))
            .into();

        let statements: Vec<_> = goals(&tree).map(|g| g.goal).collect();
        assert_eq!(statements, vec!["⊢ x", "⊢ y"]);
    }

    #[test]
    fn test_unrecognized_markup_yields_nothing() {
        let tree = list(vec![
            WidgetElement::new("li").with_text("no goals"),
            WidgetElement::new("li")
                .with_child(WidgetElement::new("span").with_class("vdash").with_text("⊢ ")),
        ]);
        assert!(extract_goals(&tree).is_empty());
    }

    #[test]
    fn test_turnstile_must_match_exactly() {
        let item = WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-vdash").with_text("⊢"));
        assert_eq!(goal_of(&item), None);
    }

    #[test]
    fn test_goal_requires_li() {
        let item = WidgetElement::new("div")
            .with_child(WidgetElement::new("span").with_class("goal-vdash").with_text("⊢ "));
        assert_eq!(goal_of(&item), None);
    }

    #[test]
    fn test_hypothesis_first_type_span_wins() {
        let item = WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text("h"))
            .with_child(WidgetElement::new("span").with_class("goal-hyp-type").with_text("first"))
            .with_child(WidgetElement::new("span").with_class("goal-hyp-type").with_text("second"));

        assert_eq!(hypothesis_of(&item), Some(Hypothesis::new("h", "first")));
    }

    #[test]
    fn test_hypothesis_skips_empty_name_span() {
        let item = WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text(""))
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text("h"))
            .with_child(
                WidgetElement::new("span")
                    .with_class("goal-hyp-type")
                    .with_child(WidgetElement::new("b").with_text("p")),
            );

        assert_eq!(hypothesis_of(&item), Some(Hypothesis::new("h", "p")));
    }

    #[test]
    fn test_hypothesis_with_only_empty_names_is_ignored() {
        let item = WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text(""))
            .with_child(WidgetElement::new("span").with_class("goal-hyp-type").with_text("p"));
        assert_eq!(hypothesis_of(&item), None);
    }

    #[test]
    fn test_hypothesis_without_type_is_ignored() {
        let item = WidgetElement::new("li")
            .with_child(WidgetElement::new("span").with_class("goal-hyp").with_text("h"));
        assert_eq!(hypothesis_of(&item), None);
    }

    #[test]
    fn test_class_list_shape_matches() {
        let item = WidgetElement::new("li")
            .with_child(
                WidgetElement::new("span")
                    .with_attribute("className", AttributeValue::from(vec!["goal-hyp", "bold"]))
                    .with_text("h"),
            )
            .with_child(
                WidgetElement::new("span")
                    .with_attribute("className", AttributeValue::from(vec!["goal-hyp-type"]))
                    .with_text("ℕ"),
            );
        assert_eq!(hypothesis_of(&item), Some(Hypothesis::new("h", "ℕ")));
    }

    #[test]
    fn test_text_content_concatenates_single_text_elements() {
        let statement = WidgetElement::new("span")
            .with_child(WidgetElement::new("span").with_text("a"))
            .with_text(" + ")
            .with_child(WidgetElement::new("span").with_text("b"));
        // Mixed children contribute nothing themselves.
        assert_eq!(text_content(&statement), "ab");

        let leaf = WidgetElement::new("span").with_text("x");
        assert_eq!(text_content(&leaf), "x");
    }

    #[test]
    fn test_hypotheses_across_tree() {
        let tree = list(vec![hyp_item("h₁", "p"), goal_item("p"), hyp_item("h₂", "q")]);
        let found = hypotheses(&tree);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].expression, "h₂");
    }

    #[test]
    fn test_extract_from_wire_payload() {
        let tree: WidgetNode = serde_json::from_value(json!({
            "c": [{
                "t": "ul",
                "a": {"className": "list pl0 font-code"},
                "c": [
                    {"t": "li", "a": {"className": "lh-copy"}, "c": [
                        {"t": "span", "a": {"className": "goal-hyp b pr2"}, "c": ["n"]},
                        ":",
                        {"t": "span", "a": {"className": "goal-hyp-type"}, "c": [
                            {"t": "span", "c": ["ℕ"]}
                        ]}
                    ]},
                    {"t": "li", "a": {"className": "lh-copy"}, "c": [
                        {"t": "span", "a": {"className": "goal-vdash b"}, "c": ["⊢ "]},
                        {"t": "span", "c": [
                            {"t": "span", "c": ["n"]},
                            " + 0 = ",
                            {"t": "span", "c": ["n"]}
                        ]}
                    ]}
                ]
            }]
        }))
        .unwrap();

        let goals = extract_goals(&tree);
        assert_eq!(
            goals,
            vec![Goal::new("⊢ nn").with_hypothesis(Hypothesis::new("n", "ℕ"))]
        );
    }
}
