use std::fmt;

use serde::{Deserialize, Serialize};

/// Applicant gender as captured by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Marital status of the primary applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Married {
    Yes,
    No,
}

/// Number of dependents; the form caps the choices at "3+".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependents {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3+")]
    ThreePlus,
}

/// Highest completed education.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate")]
    NotGraduate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfEmployed {
    Yes,
    No,
}

/// Whether the applicant's credit history meets guidelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditHistory {
    Good,
    Bad,
}

/// Location category of the property being financed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyArea {
    Urban,
    Semiurban,
    Rural,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Married {
    pub const ALL: [Married; 2] = [Married::Yes, Married::No];

    pub const fn label(self) -> &'static str {
        match self {
            Married::Yes => "Yes",
            Married::No => "No",
        }
    }
}

impl Dependents {
    pub const ALL: [Dependents; 4] = [
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreePlus,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Dependents::Zero => "0",
            Dependents::One => "1",
            Dependents::Two => "2",
            Dependents::ThreePlus => "3+",
        }
    }
}

impl Education {
    pub const ALL: [Education; 2] = [Education::Graduate, Education::NotGraduate];

    pub const fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }
}

impl SelfEmployed {
    pub const ALL: [SelfEmployed; 2] = [SelfEmployed::Yes, SelfEmployed::No];

    pub const fn label(self) -> &'static str {
        match self {
            SelfEmployed::Yes => "Yes",
            SelfEmployed::No => "No",
        }
    }
}

impl CreditHistory {
    pub const ALL: [CreditHistory; 2] = [CreditHistory::Good, CreditHistory::Bad];

    /// Select box label; the numeric suffix mirrors the training data's 1/0 column.
    pub const fn label(self) -> &'static str {
        match self {
            CreditHistory::Good => "Good (1)",
            CreditHistory::Bad => "Bad (0)",
        }
    }
}

impl PropertyArea {
    pub const ALL: [PropertyArea; 3] = [
        PropertyArea::Urban,
        PropertyArea::Semiurban,
        PropertyArea::Rural,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PropertyArea::Urban => "Urban",
            PropertyArea::Semiurban => "Semiurban",
            PropertyArea::Rural => "Rural",
        }
    }
}

/// Validated applicant attributes. Only `ApplicantForm::parse` builds this from UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub gender: Gender,
    pub married: Married,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub applicant_income: u64,
    pub coapplicant_income: u64,
    /// Requested amount in thousands.
    pub loan_amount: u64,
    pub loan_term_months: u64,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

/// Names the eleven form fields in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantField {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanTermMonths,
    CreditHistory,
    PropertyArea,
}

impl ApplicantField {
    pub const ALL: [ApplicantField; 11] = [
        ApplicantField::Gender,
        ApplicantField::Married,
        ApplicantField::Dependents,
        ApplicantField::Education,
        ApplicantField::SelfEmployed,
        ApplicantField::ApplicantIncome,
        ApplicantField::CoapplicantIncome,
        ApplicantField::LoanAmount,
        ApplicantField::LoanTermMonths,
        ApplicantField::CreditHistory,
        ApplicantField::PropertyArea,
    ];

    /// Key used by HTML forms and JSON payloads.
    pub const fn key(self) -> &'static str {
        match self {
            ApplicantField::Gender => "gender",
            ApplicantField::Married => "married",
            ApplicantField::Dependents => "dependents",
            ApplicantField::Education => "education",
            ApplicantField::SelfEmployed => "self_employed",
            ApplicantField::ApplicantIncome => "applicant_income",
            ApplicantField::CoapplicantIncome => "coapplicant_income",
            ApplicantField::LoanAmount => "loan_amount",
            ApplicantField::LoanTermMonths => "loan_term_months",
            ApplicantField::CreditHistory => "credit_history",
            ApplicantField::PropertyArea => "property_area",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicantField::Gender => "Gender",
            ApplicantField::Married => "Married",
            ApplicantField::Dependents => "Dependents",
            ApplicantField::Education => "Education",
            ApplicantField::SelfEmployed => "Self-Employed",
            ApplicantField::ApplicantIncome => "Applicant Income",
            ApplicantField::CoapplicantIncome => "Coapplicant Income",
            ApplicantField::LoanAmount => "Loan Amount (in thousands)",
            ApplicantField::LoanTermMonths => "Loan Term (in months)",
            ApplicantField::CreditHistory => "Credit History",
            ApplicantField::PropertyArea => "Property Area",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            ApplicantField::ApplicantIncome
                | ApplicantField::CoapplicantIncome
                | ApplicantField::LoanAmount
                | ApplicantField::LoanTermMonths
        )
    }
}

impl fmt::Display for ApplicantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of a single predict action. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub approved: bool,
    /// Raw class label returned by the classifier.
    pub label: i64,
    /// Probability of the approved class, clamped to [0, 1].
    pub approval_probability: Option<f64>,
}

impl PredictionResult {
    pub fn summary(&self) -> &'static str {
        if self.approved {
            "Loan Approved"
        } else {
            "Loan Not Approved"
        }
    }

    /// Percentage with one decimal, e.g. `73.4%`.
    pub fn probability_caption(&self) -> Option<String> {
        self.approval_probability
            .map(|probability| format!("{:.1}%", probability * 100.0))
    }
}
