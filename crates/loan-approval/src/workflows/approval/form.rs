use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    ApplicantField, ApplicantInput, CreditHistory, Dependents, Education, Gender, Married,
    PropertyArea, SelfEmployed,
};

/// Raw form state as submitted by a browser or JSON client.
///
/// Every value is kept as optional text so that missing or malformed input surfaces as an
/// [`EncodingError`] from [`ApplicantForm::parse`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub married: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dependents: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub self_employed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub applicant_income: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub coapplicant_income: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub loan_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub loan_term_months: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub credit_history: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub property_area: Option<String>,
}

/// Why a single field could not be turned into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingReason {
    #[error("value is required")]
    Missing,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' must not be negative")]
    Negative(String),
    #[error("'{0}' must be a whole number")]
    NotWhole(String),
    #[error("'{0}' is too large")]
    OutOfRange(String),
    #[error("'{value}' is not one of {expected}")]
    UnknownOption { value: String, expected: String },
}

/// Raised when form input cannot be encoded; no feature vector is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct EncodingError {
    pub field: ApplicantField,
    pub reason: EncodingReason,
}

impl EncodingError {
    pub fn new(field: ApplicantField, reason: EncodingReason) -> Self {
        Self { field, reason }
    }
}

impl ApplicantForm {
    /// Fills every field from an already valid input, using the select box labels.
    pub fn from_input(input: &ApplicantInput) -> Self {
        Self {
            gender: Some(input.gender.label().to_string()),
            married: Some(input.married.label().to_string()),
            dependents: Some(input.dependents.label().to_string()),
            education: Some(input.education.label().to_string()),
            self_employed: Some(input.self_employed.label().to_string()),
            applicant_income: Some(input.applicant_income.to_string()),
            coapplicant_income: Some(input.coapplicant_income.to_string()),
            loan_amount: Some(input.loan_amount.to_string()),
            loan_term_months: Some(input.loan_term_months.to_string()),
            credit_history: Some(input.credit_history.label().to_string()),
            property_area: Some(input.property_area.label().to_string()),
        }
    }

    pub fn value(&self, field: ApplicantField) -> Option<&str> {
        let raw = match field {
            ApplicantField::Gender => &self.gender,
            ApplicantField::Married => &self.married,
            ApplicantField::Dependents => &self.dependents,
            ApplicantField::Education => &self.education,
            ApplicantField::SelfEmployed => &self.self_employed,
            ApplicantField::ApplicantIncome => &self.applicant_income,
            ApplicantField::CoapplicantIncome => &self.coapplicant_income,
            ApplicantField::LoanAmount => &self.loan_amount,
            ApplicantField::LoanTermMonths => &self.loan_term_months,
            ApplicantField::CreditHistory => &self.credit_history,
            ApplicantField::PropertyArea => &self.property_area,
        };
        raw.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Validates all eleven fields, stopping at the first invalid one in feature order.
    pub fn parse(&self) -> Result<ApplicantInput, EncodingError> {
        Ok(ApplicantInput {
            gender: self.choice(ApplicantField::Gender, parse_gender)?,
            married: self.choice(ApplicantField::Married, parse_married)?,
            dependents: self.choice(ApplicantField::Dependents, parse_dependents)?,
            education: self.choice(ApplicantField::Education, parse_education)?,
            self_employed: self.choice(ApplicantField::SelfEmployed, parse_self_employed)?,
            applicant_income: self.amount(ApplicantField::ApplicantIncome)?,
            coapplicant_income: self.amount(ApplicantField::CoapplicantIncome)?,
            loan_amount: self.amount(ApplicantField::LoanAmount)?,
            loan_term_months: self.amount(ApplicantField::LoanTermMonths)?,
            credit_history: self.choice(ApplicantField::CreditHistory, parse_credit_history)?,
            property_area: self.choice(ApplicantField::PropertyArea, parse_property_area)?,
        })
    }

    fn required(&self, field: ApplicantField) -> Result<&str, EncodingError> {
        self.value(field)
            .ok_or_else(|| EncodingError::new(field, EncodingReason::Missing))
    }

    fn choice<T>(
        &self,
        field: ApplicantField,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, EncodingError> {
        let raw = self.required(field)?;
        parse(&raw.to_ascii_lowercase()).ok_or_else(|| {
            EncodingError::new(
                field,
                EncodingReason::UnknownOption {
                    value: raw.to_string(),
                    expected: expected_options(field),
                },
            )
        })
    }

    fn amount(&self, field: ApplicantField) -> Result<u64, EncodingError> {
        let raw = self.required(field)?;
        parse_amount(raw).map_err(|reason| EncodingError::new(field, reason))
    }
}

/// Accepts plain decimal digits, optionally followed by a zero fraction such as `5000.0`.
/// Signs other than a leading `-`, exponents and non-finite spellings are not numbers.
fn parse_amount(raw: &str) -> Result<u64, EncodingReason> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
        return Err(EncodingReason::NotANumber(raw.to_string()));
    }

    let is_zero = |part: &str| part.bytes().all(|byte| byte == b'0');
    if negative && !(is_zero(whole) && is_zero(fraction)) {
        return Err(EncodingReason::Negative(raw.to_string()));
    }
    if !is_zero(fraction) {
        return Err(EncodingReason::NotWhole(raw.to_string()));
    }

    whole
        .parse::<u64>()
        .map_err(|_| EncodingReason::OutOfRange(raw.to_string()))
}

fn parse_gender(value: &str) -> Option<Gender> {
    match value {
        "male" => Some(Gender::Male),
        "female" => Some(Gender::Female),
        _ => None,
    }
}

fn parse_married(value: &str) -> Option<Married> {
    match value {
        "yes" => Some(Married::Yes),
        "no" => Some(Married::No),
        _ => None,
    }
}

fn parse_dependents(value: &str) -> Option<Dependents> {
    match value {
        "0" => Some(Dependents::Zero),
        "1" => Some(Dependents::One),
        "2" => Some(Dependents::Two),
        "3+" => Some(Dependents::ThreePlus),
        _ => None,
    }
}

fn parse_education(value: &str) -> Option<Education> {
    match value {
        "graduate" => Some(Education::Graduate),
        "not graduate" => Some(Education::NotGraduate),
        _ => None,
    }
}

fn parse_self_employed(value: &str) -> Option<SelfEmployed> {
    match value {
        "yes" => Some(SelfEmployed::Yes),
        "no" => Some(SelfEmployed::No),
        _ => None,
    }
}

fn parse_credit_history(value: &str) -> Option<CreditHistory> {
    match value {
        "good" | "good (1)" | "1" => Some(CreditHistory::Good),
        "bad" | "bad (0)" | "0" => Some(CreditHistory::Bad),
        _ => None,
    }
}

fn parse_property_area(value: &str) -> Option<PropertyArea> {
    match value {
        "urban" => Some(PropertyArea::Urban),
        "semiurban" => Some(PropertyArea::Semiurban),
        "rural" => Some(PropertyArea::Rural),
        _ => None,
    }
}

fn expected_options(field: ApplicantField) -> String {
    let labels: Vec<&str> = match field {
        ApplicantField::Gender => Gender::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::Married => Married::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::Dependents => Dependents::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::Education => Education::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::SelfEmployed => SelfEmployed::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::CreditHistory => CreditHistory::ALL.iter().map(|v| v.label()).collect(),
        ApplicantField::PropertyArea => PropertyArea::ALL.iter().map(|v| v.label()).collect(),
        _ => vec!["a non-negative integer"],
    };
    labels.join(", ")
}

/// Accepts strings, numbers, or null so JSON clients may send `5000` or `"5000"`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(serde_json::Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
