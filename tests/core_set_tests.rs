use emon_studio::parser::CoreSet;
use emon_studio::utils::error::CoreSetError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_parse_and_compress() {
    let set = CoreSet::parse("0,1,2,5").unwrap();
    assert_eq!(set.as_slice(), &[0, 1, 2, 5]);
    assert_eq!(set.compress(), "0-2,5");
}

#[test]
fn test_reversed_range() {
    assert_eq!(CoreSet::parse("5-3").unwrap().as_slice(), &[3, 4, 5]);
}

#[test]
fn test_empty_tokens_and_whitespace() {
    assert_eq!(CoreSet::parse("1,,2").unwrap().as_slice(), &[1, 2]);
    assert_eq!(CoreSet::parse(" 0 - 2 , 7 ,").unwrap().compress(), "0-2,7");
}

#[test]
fn test_short_runs_stay_expanded() {
    let set = CoreSet::from_cores([4, 3, 9, 10, 11, 12, 20]);
    assert_eq!(set.compress(), "3,4,9-12,20");
    assert_eq!(set.expanded(), "3,4,9,10,11,12,20");
}

#[test]
fn test_invalid_input() {
    for input in ["abc", "", "1-2-3", "-1", "1;2"] {
        assert_eq!(
            CoreSet::parse(input),
            Err(CoreSetError::InvalidCoreSet(input.to_string())),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_membership_and_order() {
    let set: CoreSet = "8,2-4,2".parse().unwrap();
    assert!(set.contains(3));
    assert!(!set.contains(5));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 3, 4, 8]);
    assert_eq!(set.to_string(), "2-4,8");
}

#[test]
fn test_empty_sequence() {
    let set = CoreSet::from_cores(Vec::new());
    assert!(set.is_empty());
    assert_eq!(set.compress(), "");
}

proptest! {
    #[test]
    fn prop_compress_round_trips(cores in prop::collection::vec(0u32..512, 1..64)) {
        let set = CoreSet::from_cores(cores.clone());
        let reparsed = CoreSet::parse(&set.compress()).unwrap();
        prop_assert_eq!(&reparsed, &set);

        let mut expected = cores;
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(reparsed.as_slice(), expected.as_slice());
    }

    #[test]
    fn prop_ranges_parse_to_inclusive_span(a in 0u32..1000, b in 0u32..1000) {
        let set = CoreSet::parse(&format!("{}-{}", a, b)).unwrap();
        prop_assert_eq!(set.len() as u32, a.abs_diff(b) + 1);
        prop_assert!(set.contains(a) && set.contains(b));
    }
}
