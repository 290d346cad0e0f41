use crate::harness::fast_context;
use tat_core::{Scenario, TatError, Target, THREE_SECONDS_IN_MS};

#[test]
fn test_message_hides_exactly_at_timeout() {
    let ctx = fast_context().unwrap();
    Scenario::new("hide_at_3000")
        .install_clock()
        .command("fillMandatoryFieldsAndSubmit")
        .assert_visible(Target::css(".success"))
        .tick(THREE_SECONDS_IN_MS - 1)
        .assert_visible(Target::css(".success"))
        .tick(1)
        .assert_not_visible(Target::css(".success"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_one_millisecond_short_fails_not_visible() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("hide_short")
        .install_clock()
        .command("fillMandatoryFieldsAndSubmit")
        .tick(THREE_SECONDS_IN_MS - 1)
        .assert_not_visible(Target::css(".success"))
        .run_with(&ctx)
        .unwrap_err();
    // install + 5 command steps + tick
    assert_eq!(result.failure_step, Some(7));
    assert_eq!(result.declared_step, Some(3));
    assert!(result.error.unwrap().contains("not visible"));
}

#[test]
fn test_resubmit_restarts_the_timer() {
    let ctx = fast_context().unwrap();
    Scenario::new("resubmit")
        .install_clock()
        .click(Target::contains("button", "Enviar"))
        .tick(2000)
        .click(Target::contains("button", "Enviar"))
        .tick(2000)
        .assert_visible(Target::css(".error"))
        .tick(1000)
        .assert_not_visible(Target::css(".error"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_tick_without_clock_fails() {
    let ctx = fast_context().unwrap();
    let result = Scenario::new("tick_without_clock")
        .tick(1000)
        .run_with(&ctx)
        .unwrap_err();
    assert_eq!(result.failure_step, Some(0));
    assert!(result.error.unwrap().contains("clock"));
}

#[test]
fn test_clock_installed_after_submit_keeps_remaining_delay() {
    let ctx = fast_context().unwrap();
    Scenario::new("late_install")
        .click(Target::contains("button", "Enviar"))
        .install_clock()
        .tick(2500)
        .assert_visible(Target::css(".error"))
        .tick(500)
        .assert_not_visible(Target::css(".error"))
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_large_tick_fires_everything_once() {
    let ctx = fast_context().unwrap();
    Scenario::new("large_tick")
        .install_clock()
        .command("fillMandatoryFieldsAndSubmit")
        .tick(60_000)
        .assert_not_visible(Target::css(".success"))
        .assert_that(|b| {
            if b.clock().pending() == 0 && b.clock().now_ms() == 60_000 {
                Ok(())
            } else {
                Err(TatError::Custom(format!(
                    "{} timers pending at {}ms",
                    b.clock().pending(),
                    b.clock().now_ms()
                )))
            }
        })
        .run_with(&ctx)
        .unwrap();
}

#[test]
fn test_visit_drops_pending_timers() {
    let ctx = fast_context().unwrap();
    Scenario::new("visit_drops_timers")
        .install_clock()
        .click(Target::contains("button", "Enviar"))
        .visit("index.html")
        .assert_not_visible(Target::css(".error"))
        .assert_that(|b| match b.clock().pending() {
            0 => Ok(()),
            n => Err(TatError::Custom(format!("{} timers pending", n))),
        })
        .run_with(&ctx)
        .unwrap();
}
