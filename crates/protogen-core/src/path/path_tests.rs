#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn FlatPath___any_id___is_empty() {
    assert_eq!(FlatPath.grouping_path(0), "");
    assert_eq!(FlatPath.grouping_path(32_767), "");
}

#[test_case(100, 0, "p0")]
#[test_case(100, 99, "p0")]
#[test_case(100, 100, "p100")]
#[test_case(100, 1_234, "p1200")]
#[test_case(1_000, 1_234, "p1000")]
fn BucketPath___grouping_path___uses_range_start(size: u16, id: u16, expected: &str) {
    let policy = BucketPath::new(size).unwrap();

    assert_eq!(policy.grouping_path(id), expected);
}

#[test]
fn BucketPath___zero_size___returns_config_error() {
    assert!(matches!(BucketPath::new(0), Err(GenerateError::Config(_))));
}

#[test]
fn BucketPath___same_id___always_same_path() {
    let policy = BucketPath::new(50).unwrap();

    let first = policy.grouping_path(777);
    let second = policy.grouping_path(777);

    assert_eq!(first, second);
}

#[test]
fn ExplicitPaths___known_id___uses_normalized_path() {
    let policy = ExplicitPaths::new(Box::new(FlatPath)).with_path(5, "/game\\player/");

    assert_eq!(policy.grouping_path(5), "game/player");
}

#[test]
fn ExplicitPaths___unknown_id___uses_fallback() {
    let policy = ExplicitPaths::new(Box::new(BucketPath::new(10).unwrap())).with_path(5, "a");

    assert_eq!(policy.grouping_path(27), "p20");
}

#[test_case("flat", GroupingPolicy::Flat)]
#[test_case("FLAT", GroupingPolicy::Flat)]
#[test_case("bucket:100", GroupingPolicy::Bucket(100))]
#[test_case(" bucket: 5 ", GroupingPolicy::Bucket(5))]
fn GroupingPolicy___from_str___parses(text: &str, expected: GroupingPolicy) {
    assert_eq!(text.parse::<GroupingPolicy>().unwrap(), expected);
}

#[test_case("nested")]
#[test_case("bucket:")]
#[test_case("bucket:-1")]
fn GroupingPolicy___from_str_invalid___returns_config_error(text: &str) {
    assert!(matches!(
        text.parse::<GroupingPolicy>(),
        Err(GenerateError::Config(_))
    ));
}

#[test]
fn GroupingPolicy___build_bucket___groups_ids() {
    let policy = GroupingPolicy::Bucket(100).build().unwrap();

    assert_eq!(policy.grouping_path(250), "p200");
}
