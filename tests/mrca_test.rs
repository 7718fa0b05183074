//! Tests for the MRCA of all targets

use std::collections::BTreeSet;

use rstest::{fixture, rstest};

use exnn::domain::{find_mrca, DomainError, NodeId, TargetSet, TreeArena};
use exnn::util::testing;

fn targets(names: &[&str]) -> TargetSet {
    names.iter().copied().collect()
}

#[fixture]
fn balanced() -> TreeArena {
    testing::init_test_setup();
    "((A,B)ab,(C,D)cd)root;".parse().unwrap()
}

#[fixture]
fn unbalanced() -> TreeArena {
    testing::init_test_setup();
    "((((A,B)ab,C)abc,(D,E)de)abcde,F)root;".parse().unwrap()
}

#[rstest]
#[case(&["A", "B"], "ab")]
#[case(&["C", "D"], "cd")]
#[case(&["A", "C"], "root")]
#[case(&["A", "B", "C"], "root")]
#[case(&["A", "B", "C", "D"], "root")]
fn given_balanced_tree_when_finding_mrca_then_returns_lowest_common_node(
    balanced: TreeArena,
    #[case] names: &[&str],
    #[case] expected: &str,
) {
    let mrca = find_mrca(&balanced, &targets(names)).unwrap();
    assert_eq!(balanced.name(mrca), Some(expected));
}

#[rstest]
#[case("A")]
#[case("C")]
#[case("F")]
fn given_single_target_when_finding_mrca_then_returns_the_leaf_itself(
    unbalanced: TreeArena,
    #[case] name: &str,
) {
    let mrca = find_mrca(&unbalanced, &targets(&[name])).unwrap();
    assert!(unbalanced.is_leaf(mrca));
    assert_eq!(unbalanced.name(mrca), Some(name));
}

#[rstest]
fn given_unknown_target_when_finding_mrca_then_name_not_found(balanced: TreeArena) {
    let result = find_mrca(&balanced, &targets(&["A", "Z"]));
    assert_eq!(result, Err(DomainError::NameNotFound("Z".to_string())));
}

#[rstest]
fn given_empty_targets_when_finding_mrca_then_empty_target_set(balanced: TreeArena) {
    let result = find_mrca(&balanced, &TargetSet::default());
    assert_eq!(result, Err(DomainError::EmptyTargetSet));
}

#[rstest]
fn given_internal_node_name_when_finding_mrca_then_name_not_found(balanced: TreeArena) {
    // Only leaves are matched by name
    let result = find_mrca(&balanced, &targets(&["ab"]));
    assert_eq!(result, Err(DomainError::NameNotFound("ab".to_string())));
}

#[rstest]
fn given_reordered_targets_when_finding_mrca_then_same_node(unbalanced: TreeArena) {
    let forward = find_mrca(&unbalanced, &targets(&["A", "C", "E"])).unwrap();
    let backward = find_mrca(&unbalanced, &targets(&["E", "C", "A"])).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(unbalanced.name(forward), Some("abcde"));
}

#[rstest]
fn given_same_inputs_when_finding_mrca_twice_then_same_node(unbalanced: TreeArena) {
    let names = targets(&["A", "B", "D"]);
    let first = find_mrca(&unbalanced, &names).unwrap();
    let second = find_mrca(&unbalanced, &names).unwrap();
    assert_eq!(first, second);
}

fn leaf_set(tree: &TreeArena, idx: NodeId) -> BTreeSet<String> {
    tree.leaves_under(idx)
        .filter_map(|leaf| tree.name(leaf).map(str::to_string))
        .collect()
}

#[rstest]
fn given_every_target_subset_when_finding_mrca_then_result_is_minimal_cover(unbalanced: TreeArena) {
    let names = unbalanced.leaf_names();
    assert_eq!(names.len(), 6);

    for mask in 1u32..(1 << names.len()) {
        let subset: TargetSet = names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, name)| name.as_str())
            .collect();

        let mrca = find_mrca(&unbalanced, &subset).unwrap();

        assert!(
            leaf_set(&unbalanced, mrca).is_superset(&subset),
            "mrca of {:?} does not cover all targets",
            subset
        );
        for &child in unbalanced.children(mrca) {
            assert!(
                !leaf_set(&unbalanced, child).is_superset(&subset),
                "mrca of {:?} is not minimal",
                subset
            );
        }
    }
}
