use serde::{Deserialize, Serialize};

/// Home ownership category, wire values matching the backend's encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeOwnership {
    Rent,
    Mortgage,
    Own,
    Other,
}

/// Purpose of the requested loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanIntent {
    Personal,
    Education,
    Medical,
    Venture,
    HomeImprovement,
    DebtConsolidation,
}

/// Loan grade letter, A (excellent) through G (worst).
/// Ordering follows grade quality: A < B < ... < G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Prior-default flag, serialized as the backend's "Y"/"N" strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultOnFile {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

/// Applicant and loan attributes submitted for prediction.
///
/// Field names mirror the backend's request schema byte-for-byte; the record
/// is submitted by value on every request. Numeric bounds (e.g. the loan
/// percent income ratio in [0,1]) are enforced by the input widgets, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub person_age: u32,
    pub person_income: u64,
    pub person_home_ownership: HomeOwnership,
    /// Employment length in years.
    pub person_emp_length: f64,
    pub loan_intent: LoanIntent,
    pub loan_grade: LoanGrade,
    pub loan_amnt: u64,
    /// Interest rate as a percentage.
    pub loan_int_rate: f64,
    /// Ratio of loan amount to annual income, in [0,1].
    pub loan_percent_income: f64,
    pub cb_person_default_on_file: DefaultOnFile,
    /// Credit history length in years.
    pub cb_person_cred_hist_length: u32,
}

impl Default for LoanApplication {
    /// Sample applicant shown on first load.
    fn default() -> Self {
        Self {
            person_age: 27,
            person_income: 50_000,
            person_home_ownership: HomeOwnership::Rent,
            person_emp_length: 5.0,
            loan_intent: LoanIntent::Personal,
            loan_grade: LoanGrade::C,
            loan_amnt: 15_000,
            loan_int_rate: 12.5,
            loan_percent_income: 0.3,
            cb_person_default_on_file: DefaultOnFile::No,
            cb_person_cred_hist_length: 4,
        }
    }
}

impl LoanApplication {
    /// Coarse risk heuristic used for presentation accents only; the real
    /// assessment comes from the prediction service.
    pub fn is_high_risk(&self) -> bool {
        self.loan_int_rate > 15.0
            || self.loan_percent_income > 0.5
            || (self.cb_person_default_on_file == DefaultOnFile::Yes
                && self.loan_grade > LoanGrade::C)
    }
}

/// Successful response from the prediction endpoint, trusted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// "Default" or a non-default label from the service.
    pub loan_status: String,
    /// Probability in [0,1]; not re-validated on this side.
    pub default_probability: f64,
}

impl PredictionOutcome {
    pub fn is_default(&self) -> bool {
        self.loan_status == "Default"
    }
}

/// Displayable outcome of one submission. Replaces any prior result; results
/// are never merged or accumulated.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Outcome(PredictionOutcome),
    Failed { message: String },
}

impl PredictionResult {
    pub fn failed(message: impl Into<String>) -> Self {
        PredictionResult::Failed {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PredictionResult::Failed { .. })
    }
}
