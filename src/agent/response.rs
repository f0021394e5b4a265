//! Response payloads returned by `/generate`.
//!
//! The three shapes serialize without a tag, exactly as the front-end
//! expects: `{code, steps}` or `{code, feedback, ambiguous: true}`.

use serde::Serialize;

use super::classify::QueryKind;

/// Steps recorded on the simple path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSteps {
    pub direct_code: String,
}

/// Steps recorded on the complex path, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexSteps {
    pub interpretation: String,
    pub direct_code: String,
    pub enhanced_direct_code: String,
    pub interpreted_code: String,
    pub enhanced_interpreted_code: String,
    pub best_implementation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleResponse {
    pub code: String,
    pub steps: SimpleSteps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousResponse {
    pub code: String,
    pub feedback: String,
    pub ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexResponse {
    pub code: String,
    pub steps: ComplexSteps,
}

/// Output of one generate-then-enhance branch.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchResult {
    pub raw: String,
    pub enhanced: String,
}

/// Any of the three payload shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Simple(SimpleResponse),
    Ambiguous(AmbiguousResponse),
    Complex(ComplexResponse),
}

impl GenerateResponse {
    /// Which handler produced this payload.
    pub fn kind(&self) -> QueryKind {
        match self {
            GenerateResponse::Simple(_) => QueryKind::Simple,
            GenerateResponse::Ambiguous(_) => QueryKind::Ambiguous,
            GenerateResponse::Complex(_) => QueryKind::Complex,
        }
    }

    /// The terminal `code` field.
    pub fn code(&self) -> &str {
        match self {
            GenerateResponse::Simple(r) => &r.code,
            GenerateResponse::Ambiguous(r) => &r.code,
            GenerateResponse::Complex(r) => &r.code,
        }
    }
}

impl From<SimpleResponse> for GenerateResponse {
    fn from(r: SimpleResponse) -> Self {
        GenerateResponse::Simple(r)
    }
}

impl From<AmbiguousResponse> for GenerateResponse {
    fn from(r: AmbiguousResponse) -> Self {
        GenerateResponse::Ambiguous(r)
    }
}

impl From<ComplexResponse> for GenerateResponse {
    fn from(r: ComplexResponse) -> Self {
        GenerateResponse::Complex(r)
    }
}
