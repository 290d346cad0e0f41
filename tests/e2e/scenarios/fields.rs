use crate::harness::fast_context;
use tat_core::{Scenario, Target};

#[test]
fn test_phone_stays_empty_for_non_numeric_text() {
    let ctx = fast_context().unwrap();
    Scenario::new("phone_non_numeric")
        .type_text(Target::css("#phone"), "testing")
        .assert_value(Target::css("#phone"), "")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_phone_keeps_digits() {
    let ctx = fast_context().unwrap();
    Scenario::new("phone_digits")
        .type_text(Target::css("#phone"), "(11) 98765 4321")
        .assert_value(Target::css("#phone"), "11987654321")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_fill_and_clear_each_field() {
    let ctx = fast_context().unwrap();
    let fields = [
        ("#firstName", "Andressa"),
        ("#lastName", "Roberts"),
        ("#email", "teste@teste.com"),
        ("#phone", "123456"),
        ("#open-text-area", "Houston, we have a problem"),
    ];
    fields
        .iter()
        .fold(Scenario::new("fill_and_clear"), |scenario, (selector, text)| {
            scenario
                .type_text(Target::css(selector), text)
                .assert_value(Target::css(selector), text)
                .clear(Target::css(selector))
                .assert_value(Target::css(selector), "")
        })
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_typing_appends() {
    let ctx = fast_context().unwrap();
    Scenario::new("typing_appends")
        .type_text(Target::css("#firstName"), "Andre")
        .type_text(Target::css("#firstName"), "ssa")
        .assert_value(Target::css("#firstName"), "Andressa")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_long_text_is_typed_whole() {
    let ctx = fast_context().unwrap();
    let long_text = "Lorem ipsum dolor sit amet. ".repeat(40);
    Scenario::new("long_text")
        .type_text(Target::css("#open-text-area"), &long_text)
        .assert_value(Target::css("#open-text-area"), &long_text)
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_typing_into_hidden_element_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("hidden_target")
        .type_text(Target::css("#cat"), "meow")
        .run_with(&ctx)
        .unwrap_err();
    assert_eq!(result.steps_executed, 0);
    assert!(result.error.unwrap().contains("not visible"));
}

#[test]
fn test_typing_into_non_text_control_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("type_into_checkbox")
        .type_text(Target::css("#phone-checkbox"), "x")
        .run_with(&ctx)
        .unwrap_err();
    assert!(result.error.unwrap().contains("does not accept text"));
}

#[test]
fn test_ambiguous_type_target_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("ambiguous")
        .type_text(Target::css("input"), "x")
        .run_with(&ctx)
        .unwrap_err();
    assert!(result.error.unwrap().contains("expected exactly one"));
}
