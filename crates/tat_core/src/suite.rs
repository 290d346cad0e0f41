//! The CAC TAT scenario suite and suite-level reporting.

use crate::commands::FILL_MANDATORY_FIELDS_AND_SUBMIT;
use crate::http::ResponseExpectation;
use crate::runner::RunContext;
use crate::scenario::{Scenario, ScenarioResult};
use crate::steps::Target;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Auto-hide delay of the CAC TAT messages.
pub const THREE_SECONDS_IN_MS: u64 = 3000;

/// Page the network scenario fetches.
pub const CAC_TAT_URL: &str = "https://cac-tat.s3.eu-central-1.amazonaws.com/index.html";

const LONG_TEXT: &str = "In Cypress, unlike other test automation tools, most commands are \
    chainable. That is, instead of storing the return of a cy.get() in a variable for later \
    use, you chain commands to it, such as a .should(), .type() or .click().";

fn css(selector: &str) -> Target {
    Target::css(selector)
}

fn send_button() -> Target {
    Target::contains("button", "Enviar")
}

/// Every scenario of the CAC TAT suite, in declaration order.
pub fn cac_tat_suite() -> Vec<Scenario> {
    vec![
        Scenario::new("check application title")
            .assert_title("Central de Atendimento ao Cliente TAT"),
        Scenario::new("fill in the required fields and send the form")
            .install_clock()
            .type_text(css("#firstName"), "Andressa")
            .type_text(css("#lastName"), "Roberts")
            .type_text(css("#email"), "teste@teste.com")
            .type_text(css("#open-text-area"), LONG_TEXT)
            .click(send_button())
            .assert_visible(css(".success"))
            .tick(THREE_SECONDS_IN_MS)
            .assert_not_visible(css(".success")),
        Scenario::new("phone field remains empty when typing a non-numeric value")
            .type_text(css("#phone"), "testing")
            .assert_value(css("#phone"), ""),
        Scenario::new("displays error message when submitting the form with an email with invalid formatting")
            .install_clock()
            .type_text(css("#firstName"), "Andressa")
            .type_text(css("#lastName"), "Roberts")
            .type_text(css("#email"), "teste@")
            .type_text(css("#open-text-area"), "Houston, we have a problem")
            .click(send_button())
            .assert_visible(css(".error"))
            .tick(THREE_SECONDS_IN_MS)
            .assert_not_visible(css(".error")),
        Scenario::new("displays error message when phone becomes mandatory but not filled in before form submission")
            .install_clock()
            .type_text(css("#firstName"), "Andressa")
            .type_text(css("#lastName"), "Roberts")
            .type_text(css("#email"), "teste@teste.com")
            .type_text(css("#open-text-area"), "Houston, we have a problem")
            .check(css("#phone-checkbox"))
            .click(send_button())
            .assert_visible(css(".error"))
            .tick(THREE_SECONDS_IN_MS)
            .assert_not_visible(css(".error")),
        fill_and_clear(),
        Scenario::new("displays error message when submitting the form without filling in the required fields")
            .install_clock()
            .click(send_button())
            .assert_visible(css(".error"))
            .tick(THREE_SECONDS_IN_MS)
            .assert_not_visible(css(".error")),
        Scenario::new("successfully submit the form using a custom command")
            .install_clock()
            .command(FILL_MANDATORY_FIELDS_AND_SUBMIT)
            .assert_visible(css(".success"))
            .tick(THREE_SECONDS_IN_MS)
            .assert_not_visible(css(".success")),
        Scenario::new("selects a product (YouTube) by its text")
            .select(css("#product"), "YouTube")
            .assert_value(css("#product"), "youtube"),
        Scenario::new("selects a product (Mentorship) by its value")
            .select(css("#product"), "mentoria")
            .assert_value(css("#product"), "mentoria"),
        Scenario::new("selects a product (Blog) by its index")
            .select(css("#product"), 1)
            .assert_value(css("#product"), "blog"),
        Scenario::new("mark the type of service 'Feedback'")
            .check(css("input[type=\"radio\"][value=\"feedback\"]"))
            .assert_value(css("input[type=\"radio\"][value=\"feedback\"]"), "feedback")
            .assert_checked(css("input[type=\"radio\"][value=\"feedback\"]")),
        mark_each_radio(),
        Scenario::new("check both checkboxes, then uncheck the last one")
            .check(css("input[type=\"checkbox\"]"))
            .assert_checked(css("input[type=\"checkbox\"]"))
            .uncheck(css("input[type=\"checkbox\"]").last())
            .assert_not_checked(css("input[type=\"checkbox\"]").last()),
        Scenario::new("selects a file from the fixture folder")
            .assert_no_value(css("#file-upload"))
            .select_file(css("#file-upload"), "example.json")
            .assert_file_name(css("#file-upload"), "example.json"),
        Scenario::new("selects a file simulating a drag-and-drop")
            .drag_file(css("#file-upload"), "example.json")
            .assert_file_name(css("#file-upload"), "example.json"),
        Scenario::new("selects a file using a fixture that has been given an alias")
            .fixture_alias("example.json", "sampleFile")
            .select_file(css("#file-upload"), "@sampleFile")
            .assert_file_name(css("#file-upload"), "example.json"),
        Scenario::new("verifies that the privacy policy opens in another tab without the need for a click")
            .assert_attr(css("#privacy a"), "target", "_blank"),
        Scenario::new("access the privacy policy page by removing the target and then clicking on the link")
            .remove_attr(css("#privacy a"), "target")
            .click(css("#privacy a"))
            .assert_visible(Target::text("Talking About Testing")),
        Scenario::new("display and hide success and error messages using invoke")
            .assert_not_visible(css(".success"))
            .show(css(".success"))
            .assert_visible(css(".success"))
            .assert_contains_text(css(".success"), "Mensagem enviada com sucesso.")
            .hide(css(".success"))
            .assert_not_visible(css(".success"))
            .assert_not_visible(css(".error"))
            .show(css(".error"))
            .assert_visible(css(".error"))
            .assert_contains_text(css(".error"), "Valide os campos obrigatórios!")
            .hide(css(".error"))
            .assert_not_visible(css(".error")),
        {
            let long_text = "Testing text-area ".repeat(10);
            Scenario::new("fills the text area using the invoke command")
                .set_value(css("#open-text-area"), &long_text)
                .assert_value(css("#open-text-area"), &long_text)
        },
        Scenario::new("make an http request")
            .requires_network()
            .request(CAC_TAT_URL, ResponseExpectation::ok_containing("CAC TAT")),
        Scenario::new("find the hidden cat")
            .show(css("#cat"))
            .assert_visible(css("#cat"))
            .set_text(css("#title"), "CAT TAT")
            .set_text(css("#subtitle"), "We ❤️ cats")
            .assert_contains_text(css("#title"), "CAT TAT")
            .assert_contains_text(css("#subtitle"), "We ❤️ cats"),
    ]
}

fn fill_and_clear() -> Scenario {
    [
        ("#firstName", "Andressa"),
        ("#lastName", "Roberts"),
        ("#email", "teste@teste.com"),
        ("#open-text-area", "Houston, we have a problem"),
    ]
    .into_iter()
    .fold(
        Scenario::new("fill in and clear the first name, last name, email and text area fields"),
        |scenario, (selector, text)| {
            scenario
                .type_text(css(selector), text)
                .assert_value(css(selector), text)
                .clear(css(selector))
                .assert_value(css(selector), "")
        },
    )
}

fn mark_each_radio() -> Scenario {
    let radios = || css("input[type=\"radio\"]");
    (0..3).fold(
        Scenario::new("mark each type of service").assert_length(radios(), 3),
        |scenario, i| {
            scenario
                .check(radios().nth(i))
                .assert_checked(radios().nth(i))
        },
    )
}

/// Which scenarios of a suite to run.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Case-insensitive substring of the scenario name.
    pub filter: Option<String>,
    /// Skip scenarios that need the network.
    pub offline: bool,
}

impl SuiteOptions {
    pub fn selects(&self, scenario: &Scenario) -> bool {
        match &self.filter {
            Some(filter) => scenario
                .name()
                .to_lowercase()
                .contains(&filter.to_lowercase()),
            None => true,
        }
    }
}

/// Outcome of one suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub results: Vec<ScenarioResult>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Run the selected scenarios one after another, each on a fresh page.
/// `on_result` sees every result as soon as it is available.
pub fn run_suite<F>(
    scenarios: Vec<Scenario>,
    ctx: &RunContext,
    options: &SuiteOptions,
    mut on_result: F,
) -> SuiteReport
where
    F: FnMut(&ScenarioResult),
{
    let run_id = Uuid::new_v4();
    info!(%run_id, "suite started");

    let mut results = Vec::new();
    for scenario in scenarios.into_iter().filter(|s| options.selects(s)) {
        let result = if options.offline && scenario.needs_network() {
            scenario.skip()
        } else {
            scenario.run_with(ctx)
        };
        on_result(&result);
        results.push(result);
    }

    let skipped = results.iter().filter(|r| r.skipped).count();
    let failed = results.iter().filter(|r| !r.success).count();
    let passed = results.len() - skipped - failed;
    info!(%run_id, passed, failed, skipped, "suite finished");

    SuiteReport {
        run_id,
        results,
        passed,
        failed,
        skipped,
    }
}
