//! Fixed-order feature encoding shared with the training pipeline.
//!
//! The classifier artifact carries no schema the encoder can negotiate with, so the column
//! order below is the contract. [`FeatureVector`] keeps named fields internally and is only
//! flattened to a positional row by [`FeatureVector::to_row`] at the model boundary.

use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantInput, CreditHistory, Dependents, Education, Gender, Married, PropertyArea,
    SelfEmployed,
};
use super::form::{ApplicantForm, EncodingError};

/// Number of columns the classifier was trained on.
pub const FEATURE_COUNT: usize = 11;

/// Training column names, in row order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "ApplicantIncome",
    "CoapplicantIncome",
    "LoanAmount",
    "Loan_Amount_Term",
    "Credit_History",
    "Property_Area",
];

/// Encoded applicant, one named value per training column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub gender: f64,
    pub married: f64,
    pub dependents: f64,
    pub education: f64,
    pub self_employed: f64,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_amount_term: f64,
    pub credit_history: f64,
    pub property_area: f64,
}

impl FeatureVector {
    pub fn from_input(input: &ApplicantInput) -> Self {
        Self {
            gender: gender_code(input.gender),
            married: married_code(input.married),
            dependents: dependents_code(input.dependents),
            education: education_code(input.education),
            self_employed: self_employed_code(input.self_employed),
            applicant_income: input.applicant_income as f64,
            coapplicant_income: input.coapplicant_income as f64,
            loan_amount: input.loan_amount as f64,
            loan_amount_term: input.loan_term_months as f64,
            credit_history: credit_history_code(input.credit_history),
            property_area: property_area_code(input.property_area),
        }
    }

    /// Positional row in [`FEATURE_NAMES`] order.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gender,
            self.married,
            self.dependents,
            self.education,
            self.self_employed,
            self.applicant_income,
            self.coapplicant_income,
            self.loan_amount,
            self.loan_amount_term,
            self.credit_history,
            self.property_area,
        ]
    }

    /// Column name and value pairs, mostly for logging and API responses.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.to_row()).collect()
    }
}

/// Parses raw form state and encodes it. Pure and deterministic.
pub fn encode(form: &ApplicantForm) -> Result<FeatureVector, EncodingError> {
    let input = form.parse()?;
    Ok(FeatureVector::from_input(&input))
}

fn gender_code(value: Gender) -> f64 {
    match value {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    }
}

fn married_code(value: Married) -> f64 {
    match value {
        Married::Yes => 1.0,
        Married::No => 0.0,
    }
}

fn dependents_code(value: Dependents) -> f64 {
    match value {
        Dependents::Zero => 0.0,
        Dependents::One => 1.0,
        Dependents::Two => 2.0,
        Dependents::ThreePlus => 3.0,
    }
}

fn education_code(value: Education) -> f64 {
    match value {
        Education::Graduate => 1.0,
        Education::NotGraduate => 0.0,
    }
}

fn self_employed_code(value: SelfEmployed) -> f64 {
    match value {
        SelfEmployed::Yes => 1.0,
        SelfEmployed::No => 0.0,
    }
}

fn credit_history_code(value: CreditHistory) -> f64 {
    match value {
        CreditHistory::Good => 1.0,
        CreditHistory::Bad => 0.0,
    }
}

fn property_area_code(value: PropertyArea) -> f64 {
    match value {
        PropertyArea::Urban => 0.0,
        PropertyArea::Semiurban => 1.0,
        PropertyArea::Rural => 2.0,
    }
}

/// One line of the encoding notes shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingNote {
    pub position: usize,
    pub column: &'static str,
    pub encoding: String,
}

/// Human readable description of every column's encoding, in row order.
pub fn encoding_notes() -> Vec<EncodingNote> {
    let encodings = [
        describe(&[
            (Gender::Male.label(), gender_code(Gender::Male)),
            (Gender::Female.label(), gender_code(Gender::Female)),
        ]),
        describe(&[
            (Married::Yes.label(), married_code(Married::Yes)),
            (Married::No.label(), married_code(Married::No)),
        ]),
        describe(
            &Dependents::ALL
                .iter()
                .map(|d| (d.label(), dependents_code(*d)))
                .collect::<Vec<_>>(),
        ),
        describe(&[
            (
                Education::Graduate.label(),
                education_code(Education::Graduate),
            ),
            (
                Education::NotGraduate.label(),
                education_code(Education::NotGraduate),
            ),
        ]),
        describe(&[
            (SelfEmployed::Yes.label(), self_employed_code(SelfEmployed::Yes)),
            (SelfEmployed::No.label(), self_employed_code(SelfEmployed::No)),
        ]),
        "verbatim integer".to_string(),
        "verbatim integer".to_string(),
        "verbatim integer (thousands)".to_string(),
        "verbatim integer (months)".to_string(),
        describe(&[
            ("Good", credit_history_code(CreditHistory::Good)),
            ("Bad", credit_history_code(CreditHistory::Bad)),
        ]),
        describe(
            &PropertyArea::ALL
                .iter()
                .map(|area| (area.label(), property_area_code(*area)))
                .collect::<Vec<_>>(),
        ),
    ];

    FEATURE_NAMES
        .into_iter()
        .zip(encodings)
        .enumerate()
        .map(|(position, (column, encoding))| EncodingNote {
            position,
            column,
            encoding,
        })
        .collect()
}

fn describe(pairs: &[(&str, f64)]) -> String {
    pairs
        .iter()
        .map(|(label, code)| format!("{label}={code}"))
        .collect::<Vec<_>>()
        .join(", ")
}
