use crate::harness::fast_context;
use tat_core::{CommandRegistry, Scenario, Step, Target, FILL_MANDATORY_FIELDS_AND_SUBMIT};

#[test]
fn test_custom_command_submits_form() {
    let ctx = fast_context().unwrap();
    Scenario::new("custom_command")
        .install_clock()
        .command(FILL_MANDATORY_FIELDS_AND_SUBMIT)
        .assert_visible(Target::css(".success"))
        .tick(3000)
        .assert_not_visible(Target::css(".success"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_undefined_command_fails_before_any_step() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("undefined_command")
        .type_text(Target::css("#firstName"), "Andressa")
        .command("fillEverything")
        .run_with(&ctx)
        .unwrap_err();
    assert_eq!(result.steps_executed, 0);
    assert_eq!(result.failure_step, Some(0));
    assert!(result.failed_step.is_none());
    assert!(result.error.unwrap().contains("fillEverything"));
}

fn select_and_check() -> Vec<Step> {
    vec![
        Step::Select {
            target: Target::css("#product"),
            option: "Cursos".into(),
        },
        Step::Check {
            target: Target::css("#email-checkbox"),
        },
    ]
}

fn full_contact() -> Vec<Step> {
    vec![
        Step::Command {
            name: "selectAndCheck".into(),
        },
        Step::Command {
            name: FILL_MANDATORY_FIELDS_AND_SUBMIT.into(),
        },
    ]
}

#[test]
fn test_registered_commands_nest() {
    let mut registry = CommandRegistry::builtin();
    registry.register("selectAndCheck", select_and_check);
    registry.register("fullContact", full_contact);
    let ctx = fast_context().unwrap().with_registry(registry);

    let result = Scenario::new("nested_commands")
        .command("fullContact")
        .assert_visible(Target::css(".success"))
        .assert_value(Target::css("#product"), "cursos")
        .assert_checked(Target::css("#email-checkbox"))
        .run_with(&ctx);
    assert_eq!(result.steps_executed, 10);
    result.unwrap();
}

#[test]
fn test_empty_registry_rejects_builtin_name() {
    let ctx = fast_context().unwrap().with_registry(CommandRegistry::new());
    Scenario::new("no_builtin")
        .command(FILL_MANDATORY_FIELDS_AND_SUBMIT)
        .run_with(&ctx)
        .unwrap_err();
}

fn check_missing_box() -> Vec<Step> {
    vec![
        Step::Select {
            target: Target::css("#product"),
            option: "Blog".into(),
        },
        Step::Check {
            target: Target::css("#missing-checkbox"),
        },
    ]
}

#[test]
fn test_failure_inside_command_reports_declared_step() {
    let mut registry = CommandRegistry::builtin();
    registry.register("checkMissingBox", check_missing_box);
    let ctx = fast_context().unwrap().with_registry(registry);
    let result = Scenario::new("failing_command")
        .type_text(Target::css("#firstName"), "Andressa")
        .command("checkMissingBox")
        .run_with(&ctx)
        .unwrap_err();
    assert_eq!(result.failure_step, Some(2));
    assert_eq!(result.declared_step, Some(1));
    assert_eq!(result.command.as_deref(), Some("checkMissingBox"));
    assert_eq!(
        result.location(),
        "step 2 (declared step 1 via checkMissingBox)"
    );
}
