use super::*;
use pretty_assertions::assert_eq;

fn candidates(container: &str, name: &str) -> Vec<String> {
    Container::new(container).candidates(name).into_vec()
}

#[test]
fn walks_prefixes_most_specific_first() {
    assert_eq!(
        candidates("a.b.c", "R.s"),
        vec!["a.b.c.R.s", "a.b.R.s", "a.R.s", "R.s"]
    );
}

#[test]
fn leading_dot_resolves_at_root_only() {
    assert_eq!(candidates("a.b.c", ".X"), vec!["X"]);
    assert_eq!(candidates("", ".a.X"), vec!["a.X"]);
}

#[test]
fn root_container_yields_name_only() {
    assert_eq!(candidates("", "x"), vec!["x"]);
    assert_eq!(Container::root().name(), "");
}

#[test]
fn single_segment_container() {
    assert_eq!(candidates("pkg", "x"), vec!["pkg.x", "x"]);
}

mod properties {
    use super::super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn last_candidate_is_the_name(
            segments in prop::collection::vec("[a-z]{1,4}", 0..5),
            name in "[a-z]{1,4}(\\.[A-Z][a-z]{0,3})?",
        ) {
            let container = Container::new(segments.join("."));
            let candidates = container.candidates(&name);
            prop_assert_eq!(candidates.len(), segments.len() + 1);
            prop_assert_eq!(candidates.last().map(String::as_str), Some(name.as_str()));
            for candidate in &candidates {
                prop_assert!(candidate.ends_with(&name));
            }
        }
    }
}
