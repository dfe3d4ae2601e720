//! Server-rendered predictor page.

use loan_approval::workflows::approval::{
    encoding_notes, ApplicantField, ApplicantForm, ApprovalError, CreditHistory, Dependents,
    Education, Gender, Married, ModelStatus, PredictionResult, PropertyArea, SelfEmployed,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; color: #222; }
aside { width: 16rem; padding: 1.5rem; background: #f3f4f6; min-height: 100vh; }
main { flex: 1; max-width: 46rem; margin: 0 auto; padding: 1.5rem; }
h1 { text-align: center; margin-bottom: 0.25rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem 1.5rem; }
label { display: block; font-size: 0.9rem; margin-bottom: 0.2rem; }
select, input { width: 100%; padding: 0.35rem; box-sizing: border-box; }
button { width: 100%; margin-top: 1rem; padding: 0.6rem; background-color: #4CAF50; color: white; border: 0; border-radius: 8px; font-size: 1rem; }
button:hover { background-color: #45A049; }
button:disabled { background-color: #9ca3af; }
.banner { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
.success { background: #dcfce7; color: #166534; }
.error { background: #fee2e2; color: #991b1b; }
.caption { font-size: 0.85rem; color: #555; }
progress { width: 100%; }
"#;

/// Outcome of the last predict action shown under the form.
pub(crate) enum Outcome<'a> {
    Prediction(&'a PredictionResult),
    Failure(&'a ApprovalError),
}

pub(crate) struct PageView<'a> {
    pub(crate) form: &'a ApplicantForm,
    pub(crate) model: &'a ModelStatus,
    pub(crate) outcome: Option<Outcome<'a>>,
}

pub(crate) fn render_page(view: &PageView<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Loan Approval Predictor" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (sidebar())
                main {
                    h1 { "🏦 Loan Approval Predictor" }
                    p { "Fill the form and click Predict to estimate approval." }
                    @if let Some(error) = &view.model.error {
                        div class="banner error" role="alert" { (error) }
                    }
                    (applicant_form(view.form, view.model.available))
                    @if let Some(outcome) = &view.outcome {
                        (outcome_section(outcome))
                    }
                    (encoding_section())
                }
            }
        }
    }
}

fn sidebar() -> Markup {
    html! {
        aside {
            h3 { "About" }
            p { "Predict loan approval using a model trained on historical data." }
            p class="caption" {
                "Note: Inputs and encoding must match training features from 2024 project."
            }
        }
    }
}

fn applicant_form(form: &ApplicantForm, model_available: bool) -> Markup {
    html! {
        form method="post" action="/predict" {
            h3 { "Applicant Details" }
            div class="columns" {
                div {
                    (select(form, ApplicantField::Gender, &Gender::ALL.map(Gender::label)))
                    (select(form, ApplicantField::Married, &Married::ALL.map(Married::label)))
                    (select(form, ApplicantField::Dependents, &Dependents::ALL.map(Dependents::label)))
                    (select(form, ApplicantField::Education, &Education::ALL.map(Education::label)))
                    (select(form, ApplicantField::SelfEmployed, &SelfEmployed::ALL.map(SelfEmployed::label)))
                }
                div {
                    (number(form, ApplicantField::ApplicantIncome))
                    (number(form, ApplicantField::CoapplicantIncome))
                    (number(form, ApplicantField::LoanAmount))
                    (number(form, ApplicantField::LoanTermMonths))
                    (select(form, ApplicantField::CreditHistory, &CreditHistory::ALL.map(CreditHistory::label)))
                }
            }
            (select(form, ApplicantField::PropertyArea, &PropertyArea::ALL.map(PropertyArea::label)))
            button type="submit" disabled[!model_available] { "🔮 Predict" }
        }
    }
}

fn select(form: &ApplicantForm, field: ApplicantField, options: &[&str]) -> Markup {
    let current = form.value(field);
    html! {
        div {
            label for=(field.key()) { (field.label()) }
            select id=(field.key()) name=(field.key()) {
                @for option in options {
                    option value=(option) selected[current == Some(*option)] { (option) }
                }
            }
        }
    }
}

fn number(form: &ApplicantForm, field: ApplicantField) -> Markup {
    html! {
        div {
            label for=(field.key()) { (field.label()) }
            input type="number" id=(field.key()) name=(field.key()) min="0" step="1"
                value=(form.value(field).unwrap_or("0"));
        }
    }
}

fn outcome_section(outcome: &Outcome<'_>) -> Markup {
    html! {
        section id="result" {
            @match outcome {
                Outcome::Prediction(result) => {
                    h3 { "Prediction Result:" }
                    @if result.approved {
                        div class="banner success" { "🎉 " (result.summary()) " ✅" }
                    } @else {
                        div class="banner error" { "🚫 " (result.summary()) " ❌" }
                    }
                    @if let Some(probability) = result.approval_probability {
                        progress max="1" value=(probability) {}
                    }
                    @if let Some(caption) = result.probability_caption() {
                        p class="caption" { "Estimated approval probability: " (caption) }
                    }
                }
                Outcome::Failure(error) => {
                    div class="banner error" role="alert" { (failure_message(error)) }
                }
            }
        }
    }
}

fn failure_message(error: &ApprovalError) -> String {
    match error {
        ApprovalError::Encoding(err) => format!("Invalid input: {err}"),
        ApprovalError::ModelUnavailable(err) => err.to_string(),
        ApprovalError::Prediction(err) => format!("Prediction failed: {err}"),
    }
}

fn encoding_section() -> Markup {
    html! {
        details {
            summary { "Notes on feature encoding" }
            ul {
                @for note in encoding_notes() {
                    li { (note.column) ": " (note.encoding) }
                }
            }
        }
    }
}
