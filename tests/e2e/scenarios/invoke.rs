use crate::harness::fast_context;
use tat_core::{Scenario, Target};

#[test]
fn test_show_and_hide_messages() {
    let ctx = fast_context().unwrap();
    [(".success", "Mensagem enviada com sucesso."), (".error", "Valide os campos obrigatórios!")]
        .iter()
        .fold(Scenario::new("show_hide"), |scenario, (selector, text)| {
            scenario
                .assert_not_visible(Target::css(selector))
                .show(Target::css(selector))
                .assert_visible(Target::css(selector))
                .assert_contains_text(Target::css(selector), text)
                .hide(Target::css(selector))
                .assert_not_visible(Target::css(selector))
        })
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_set_textarea_value() {
    let ctx = fast_context().unwrap();
    let long_text = "Testing text-area ".repeat(10);
    Scenario::new("invoke_val")
        .set_value(Target::css("#open-text-area"), &long_text)
        .assert_value(Target::css("#open-text-area"), &long_text)
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_find_the_hidden_cat() {
    let ctx = fast_context().unwrap();
    Scenario::new("hidden_cat")
        .assert_not_visible(Target::css("#cat"))
        .show(Target::css("#cat"))
        .assert_visible(Target::css("#cat"))
        .set_text(Target::css("#title"), "CAT TAT")
        .set_text(Target::css("#subtitle"), "We ❤️ cats")
        .assert_contains_text(Target::css("#title"), "CAT TAT")
        .assert_contains_text(Target::css("#subtitle"), "We ❤️ cats")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_hidden_element_becomes_actionable_after_show() {
    let ctx = fast_context().unwrap();
    Scenario::new("show_then_click")
        .hide(Target::css("#phone-checkbox"))
        .assert_not_visible(Target::css("#phone-checkbox"))
        .show(Target::css("#phone-checkbox"))
        .check(Target::css("#phone-checkbox"))
        .assert_checked(Target::css("#phone-checkbox"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_invoke_on_missing_element_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("invoke_missing")
        .show(Target::css("#dog"))
        .run_with(&ctx)
        .unwrap_err();
    assert!(result.error.unwrap().contains("#dog"));
}
