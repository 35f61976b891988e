//! Property tests for picking the tool from the executable name

use nats_box::cli::Mode;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_suffix_selects_mode(prefix in "[a-z0-9_.]{3,12}") {
        prop_assert_eq!(Mode::from_exe_name(&format!("{prefix}-sub")), Mode::Subscribe);
        prop_assert_eq!(Mode::from_exe_name(&format!("{prefix}-req")), Mode::Request);
        prop_assert_eq!(Mode::from_exe_name(&format!("{prefix}rply")), Mode::Reply);
        prop_assert_eq!(Mode::from_exe_name(&format!("{prefix}-pub")), Mode::Publish);
    }

    #[test]
    fn prop_directory_is_ignored(
        dir in "(/[a-z0-9-]{1,8}){0,4}",
        name in prop::sample::select(vec!["nats-sub", "nats-req", "nats-rply", "nats-pub", "nats-box"])
    ) {
        prop_assert_eq!(
            Mode::from_exe_name(&format!("{dir}/{name}")),
            Mode::from_exe_name(name)
        );
    }

    #[test]
    fn prop_short_names_publish(name in "[a-zA-Z-]{0,6}") {
        prop_assert_eq!(Mode::from_exe_name(&name), Mode::Publish);
    }

    #[test]
    fn prop_case_does_not_matter(
        prefix in "[a-z]{3,8}",
        suffix in prop::sample::select(vec!["-sub", "-req", "rply", "-pub"])
    ) {
        let name = format!("{prefix}{suffix}");
        prop_assert_eq!(
            Mode::from_exe_name(&name.to_uppercase()),
            Mode::from_exe_name(&name)
        );
    }
}

#[test]
fn test_installed_binary_names() {
    assert_eq!(Mode::from_exe_name("nats-pub"), Mode::Publish);
    assert_eq!(Mode::from_exe_name("nats-sub"), Mode::Subscribe);
    assert_eq!(Mode::from_exe_name("nats-req"), Mode::Request);
    assert_eq!(Mode::from_exe_name("nats-rply"), Mode::Reply);
    assert_eq!(Mode::from_exe_name("nats-box"), Mode::Publish);
}
