use super::*;
use xbot_core::test_support::{manager_profile, worker_profile};

#[test]
fn manager_sees_memory_tools_when_enabled() {
    let defs = tool_definitions(&manager_profile(), true);
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&tool_access::MEMORY_READ));
    assert!(names.contains(&tool_access::DISPATCH_WORKER));
}

#[test]
fn manager_loses_memory_tools_when_disabled() {
    let defs = tool_definitions(&manager_profile(), false);
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert!(!names.contains(&tool_access::MEMORY_READ));
    assert!(!names.contains(&tool_access::MEMORY_WRITE));
}

#[test]
fn worker_never_sees_manager_only_tools() {
    let defs = tool_definitions(&worker_profile("w-1"), true);
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert!(!names.contains(&tool_access::DISPATCH_WORKER));
    assert!(!names.contains(&tool_access::MEMORY_READ));
    assert!(names.contains(&tool_access::READ));
}

#[test]
fn every_definition_has_a_non_empty_schema() {
    for profile in [manager_profile(), worker_profile("w-1")] {
        for def in tool_definitions(&profile, true) {
            assert!(def.parameters.is_object());
            assert!(!def.description.is_empty());
        }
    }
}
