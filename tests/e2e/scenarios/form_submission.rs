use crate::harness::fast_context;
use tat_core::{Scenario, Submission, TatError, Target};

fn fill_mandatory(scenario: Scenario, email: &str) -> Scenario {
    scenario
        .type_text(Target::css("#firstName"), "Andressa")
        .type_text(Target::css("#lastName"), "Roberts")
        .type_text(Target::css("#email"), email)
        .type_text(Target::css("#open-text-area"), "Houston, we have a problem")
}

#[test]
fn test_valid_form_shows_success_and_hides_error() {
    let ctx = fast_context().unwrap();
    fill_mandatory(Scenario::new("valid_form").install_clock(), "teste@teste.com")
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".success"))
        .assert_not_visible(Target::css(".error"))
        .assert_that(|b| match b.last_submission() {
            Some(Submission::Accepted) => Ok(()),
            other => Err(TatError::Custom(format!("submission was {:?}", other))),
        })
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_success_clears_the_form() {
    let ctx = fast_context().unwrap();
    fill_mandatory(Scenario::new("success_clears"), "teste@teste.com")
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".success"))
        .assert_value(Target::css("#firstName"), "")
        .assert_value(Target::css("#email"), "")
        .assert_value(Target::css("#open-text-area"), "")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_invalid_emails_are_rejected() {
    let ctx = fast_context().unwrap();
    for email in ["teste@", "teste", "@teste.com", "teste@teste", "tes te@teste.com", "a@b@c.com"] {
        fill_mandatory(Scenario::new(&format!("invalid_email {}", email)), email)
            .click(Target::contains("button", "Enviar"))
            .assert_visible(Target::css(".error"))
            .assert_not_visible(Target::css(".success"))
            .assert_value(Target::css("#email"), email)
            .run_with(&ctx)
            .expect(email);
    }
}

#[test]
fn test_each_missing_mandatory_field_is_an_error() {
    let ctx = fast_context().unwrap();
    let fields = [
        ("#firstName", "Andressa"),
        ("#lastName", "Roberts"),
        ("#email", "teste@teste.com"),
        ("#open-text-area", "Houston, we have a problem"),
    ];
    for skipped in 0..fields.len() {
        let mut scenario = Scenario::new(&format!("missing {}", fields[skipped].0));
        for (i, (selector, text)) in fields.iter().enumerate() {
            if i != skipped {
                scenario = scenario.type_text(Target::css(selector), text);
            }
        }
        scenario
            .click(Target::contains("button", "Enviar"))
            .assert_visible(Target::css(".error"))
            .run_with(&ctx)
            .expect(fields[skipped].0);
    }
}

#[test]
fn test_blank_text_counts_as_missing() {
    let ctx = fast_context().unwrap();
    Scenario::new("blank_first_name")
        .type_text(Target::css("#firstName"), "   ")
        .type_text(Target::css("#lastName"), "Roberts")
        .type_text(Target::css("#email"), "teste@teste.com")
        .type_text(Target::css("#open-text-area"), "Houston")
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".error"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_phone_required_when_checkbox_checked() {
    let ctx = fast_context().unwrap();
    fill_mandatory(Scenario::new("phone_required"), "teste@teste.com")
        .check(Target::css("#phone-checkbox"))
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".error"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_phone_filled_when_required_succeeds() {
    let ctx = fast_context().unwrap();
    fill_mandatory(Scenario::new("phone_filled"), "teste@teste.com")
        .check(Target::css("#phone-checkbox"))
        .type_text(Target::css("#phone"), "11987654321")
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".success"))
        .assert_value(Target::css("#phone"), "")
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_error_then_success_swaps_messages() {
    let ctx = fast_context().unwrap();
    Scenario::new("error_then_success")
        .install_clock()
        .click(Target::contains("button", "Enviar"))
        .assert_visible(Target::css(".error"))
        .command("fillMandatoryFieldsAndSubmit")
        .assert_visible(Target::css(".success"))
        .assert_not_visible(Target::css(".error"))
        .tick(3000)
        .assert_not_visible(Target::css(".success"))
        .run_with(&ctx)
        .unwrap();
}
