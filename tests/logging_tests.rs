use mlpt::logging::init_tracing;

#[test]
fn second_subscriber_install_is_reported() {
    assert!(init_tracing("mlpt=debug"));
    assert!(!init_tracing("warn"));
}
