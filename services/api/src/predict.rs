use clap::Args;
use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::telemetry;
use loan_approval::workflows::approval::{
    encoding_notes, shared_model, ApplicantForm, LoanApprovalService, PredictionResult,
};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Applicant fields as raw text so that invalid values report the same errors as the web form.
#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Male or Female
    #[arg(long)]
    pub(crate) gender: Option<String>,
    /// Yes or No
    #[arg(long)]
    pub(crate) married: Option<String>,
    /// 0, 1, 2 or 3+
    #[arg(long)]
    pub(crate) dependents: Option<String>,
    /// Graduate or "Not Graduate"
    #[arg(long)]
    pub(crate) education: Option<String>,
    /// Yes or No
    #[arg(long)]
    pub(crate) self_employed: Option<String>,
    /// Monthly applicant income
    #[arg(long)]
    pub(crate) applicant_income: Option<String>,
    /// Monthly co-applicant income
    #[arg(long)]
    pub(crate) coapplicant_income: Option<String>,
    /// Requested amount in thousands
    #[arg(long)]
    pub(crate) loan_amount: Option<String>,
    /// Loan duration in months
    #[arg(long)]
    pub(crate) loan_term_months: Option<String>,
    /// "Good (1)" or "Bad (0)"
    #[arg(long)]
    pub(crate) credit_history: Option<String>,
    /// Urban, Semiurban or Rural
    #[arg(long)]
    pub(crate) property_area: Option<String>,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

impl PredictArgs {
    pub(crate) fn form(&self) -> ApplicantForm {
        ApplicantForm {
            gender: self.gender.clone(),
            married: self.married.clone(),
            dependents: self.dependents.clone(),
            education: self.education.clone(),
            self_employed: self.self_employed.clone(),
            applicant_income: self.applicant_income.clone(),
            coapplicant_income: self.coapplicant_income.clone(),
            loan_amount: self.loan_amount.clone(),
            loan_term_months: self.loan_term_months.clone(),
            credit_history: self.credit_history.clone(),
            property_area: self.property_area.clone(),
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;
    let path = args.model.clone().unwrap_or(config.model.path);

    let service = LoanApprovalService::from_cache(shared_model(path));
    let result = service.predict(&args.form())?;

    print!("{}", render_prediction(&result));
    Ok(())
}

pub(crate) fn run_encoding() {
    print!("{}", render_encoding_notes());
}

pub(crate) fn render_prediction(result: &PredictionResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Prediction Result: {}", result.summary());
    let _ = writeln!(output, "  class label: {}", result.label);
    if let Some(caption) = result.probability_caption() {
        let _ = writeln!(output, "  Estimated approval probability: {caption}");
    }
    output
}

pub(crate) fn render_encoding_notes() -> String {
    let mut output = String::from("Notes on feature encoding\n");
    for note in encoding_notes() {
        let _ = writeln!(
            output,
            "  [{:>2}] {:<18} {}",
            note.position, note.column, note.encoding
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_output_includes_probability_when_known() {
        let result = PredictionResult {
            approved: true,
            label: 1,
            approval_probability: Some(0.734),
        };

        let output = render_prediction(&result);

        assert!(output.starts_with("Prediction Result: Loan Approved"));
        assert!(output.contains("Estimated approval probability: 73.4%"));
    }

    #[test]
    fn prediction_output_omits_missing_probability() {
        let result = PredictionResult {
            approved: false,
            label: 0,
            approval_probability: None,
        };

        let output = render_prediction(&result);

        assert!(output.contains("Loan Not Approved"));
        assert!(!output.contains("probability"));
    }

    #[test]
    fn encoding_notes_list_every_column() {
        let output = render_encoding_notes();
        assert_eq!(output.lines().count(), 12);
        assert!(output.contains("Property_Area"));
        assert!(output.contains("Urban=0, Semiurban=1, Rural=2"));
    }

    #[test]
    fn blank_flags_are_reported_as_missing() {
        let err = PredictArgs::default().form().parse().unwrap_err();
        assert_eq!(err.to_string(), "invalid gender: value is required");
    }
}
