mod oracle_cases;

#[test_log::test]
fn test_rules_match_rrule_expansion() {
    for case in oracle_cases::oracle_cases() {
        tracing::debug!(name = case.name, "Checking oracle case");
        oracle_cases::assert_case(&case);
    }
}
