//! Dental code vocabularies
//!
//! Small, total lookup types shared by the prior-authorization builder and
//! the eligibility/remittance parsers: CDT procedure codes, tooth numbers,
//! tooth surfaces, oral cavity areas, and benefit procedure classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing dental codes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CdtCodeError {
    #[error("Invalid CDT code {0:?}: expected format D followed by four digits")]
    InvalidCdtCode(String),

    #[error("Invalid tooth number {0:?}: expected 1-32 or A-T")]
    InvalidToothNumber(String),

    #[error("Invalid surface code {0:?}: expected one of M, O, D, B, L, I, F")]
    InvalidSurfaceCode(String),
}

/// A CDT (Current Dental Terminology) procedure code, format `D####`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CdtCode(String);

impl CdtCode {
    /// Parses and validates a CDT code
    pub fn new(code: impl Into<String>) -> Result<Self, CdtCodeError> {
        let code = code.into();
        if Self::is_valid(&code) {
            Ok(Self(code))
        } else {
            Err(CdtCodeError::InvalidCdtCode(code))
        }
    }

    /// Returns true if the string is a well-formed CDT code
    pub fn is_valid(code: &str) -> bool {
        let bytes = code.as_bytes();
        bytes.len() == 5
            && bytes[0] == b'D'
            && bytes[1..].iter().all(|b| b.is_ascii_digit())
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies the procedure into a benefit class by CDT series
    pub fn procedure_class(&self) -> ProcedureClass {
        // Series ranges follow common plan benefit groupings
        match &self.0[1..2] {
            "0" | "1" => ProcedureClass::Preventive,
            "2" | "3" | "4" | "7" | "9" => ProcedureClass::Basic,
            "8" => ProcedureClass::Orthodontic,
            _ => ProcedureClass::Major,
        }
    }
}

impl fmt::Display for CdtCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CdtCode {
    type Err = CdtCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Benefit procedure classes used in eligibility responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureClass {
    Preventive,
    Basic,
    Major,
    Orthodontic,
}

impl ProcedureClass {
    /// Returns the class name used as a map key in benefit responses
    pub fn key(&self) -> &'static str {
        match self {
            ProcedureClass::Preventive => "preventive",
            ProcedureClass::Basic => "basic",
            ProcedureClass::Major => "major",
            ProcedureClass::Orthodontic => "orthodontic",
        }
    }
}

impl fmt::Display for ProcedureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A tooth designation under the Universal Numbering System:
/// permanent teeth 1-32, primary teeth A-T
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToothNumber(String);

impl ToothNumber {
    /// Parses and validates a tooth number
    pub fn new(tooth: impl Into<String>) -> Result<Self, CdtCodeError> {
        let tooth = tooth.into();
        if Self::is_valid(&tooth) {
            Ok(Self(tooth))
        } else {
            Err(CdtCodeError::InvalidToothNumber(tooth))
        }
    }

    /// Returns true if the string designates a valid tooth
    pub fn is_valid(tooth: &str) -> bool {
        if let Ok(n) = tooth.parse::<u8>() {
            return (1..=32).contains(&n);
        }
        matches!(tooth.as_bytes(), [b] if (b'A'..=b'T').contains(b))
    }

    /// Returns the tooth designation as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for a primary (deciduous) tooth designation
    pub fn is_primary(&self) -> bool {
        self.0.parse::<u8>().is_err()
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tooth surface codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceCode {
    /// Mesial
    M,
    /// Occlusal
    O,
    /// Distal
    D,
    /// Buccal
    B,
    /// Lingual
    L,
    /// Incisal
    I,
    /// Facial
    F,
}

impl SurfaceCode {
    /// Returns the single-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            SurfaceCode::M => "M",
            SurfaceCode::O => "O",
            SurfaceCode::D => "D",
            SurfaceCode::B => "B",
            SurfaceCode::L => "L",
            SurfaceCode::I => "I",
            SurfaceCode::F => "F",
        }
    }
}

impl FromStr for SurfaceCode {
    type Err = CdtCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(SurfaceCode::M),
            "O" => Ok(SurfaceCode::O),
            "D" => Ok(SurfaceCode::D),
            "B" => Ok(SurfaceCode::B),
            "L" => Ok(SurfaceCode::L),
            "I" => Ok(SurfaceCode::I),
            "F" => Ok(SurfaceCode::F),
            other => Err(CdtCodeError::InvalidSurfaceCode(other.to_string())),
        }
    }
}

impl fmt::Display for SurfaceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Oral cavity area codes (X12 code source 1361)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OralCavityArea {
    EntireOralCavity,
    MaxillaryArch,
    MandibularArch,
    UpperRightQuadrant,
    UpperLeftQuadrant,
    LowerLeftQuadrant,
    LowerRightQuadrant,
}

impl OralCavityArea {
    /// Looks up an area by its two-character wire code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "00" => Some(OralCavityArea::EntireOralCavity),
            "01" => Some(OralCavityArea::MaxillaryArch),
            "02" => Some(OralCavityArea::MandibularArch),
            "10" => Some(OralCavityArea::UpperRightQuadrant),
            "20" => Some(OralCavityArea::UpperLeftQuadrant),
            "30" => Some(OralCavityArea::LowerLeftQuadrant),
            "40" => Some(OralCavityArea::LowerRightQuadrant),
            _ => None,
        }
    }

    /// Returns the two-character wire code
    pub fn code(&self) -> &'static str {
        match self {
            OralCavityArea::EntireOralCavity => "00",
            OralCavityArea::MaxillaryArch => "01",
            OralCavityArea::MandibularArch => "02",
            OralCavityArea::UpperRightQuadrant => "10",
            OralCavityArea::UpperLeftQuadrant => "20",
            OralCavityArea::LowerLeftQuadrant => "30",
            OralCavityArea::LowerRightQuadrant => "40",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdt_code_valid() {
        assert!(CdtCode::is_valid("D2391"));
        assert!(CdtCode::new("D0120").is_ok());
    }

    #[test]
    fn test_cdt_code_invalid() {
        for bad in ["X123", "D123", "D12345", "d2391", "2391D"] {
            assert!(CdtCode::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_procedure_class_by_series() {
        assert_eq!(
            CdtCode::new("D1110").unwrap().procedure_class(),
            ProcedureClass::Preventive
        );
        assert_eq!(
            CdtCode::new("D2391").unwrap().procedure_class(),
            ProcedureClass::Basic
        );
        assert_eq!(
            CdtCode::new("D6010").unwrap().procedure_class(),
            ProcedureClass::Major
        );
        assert_eq!(
            CdtCode::new("D8080").unwrap().procedure_class(),
            ProcedureClass::Orthodontic
        );
    }

    #[test]
    fn test_tooth_numbers() {
        assert!(ToothNumber::is_valid("1"));
        assert!(ToothNumber::is_valid("32"));
        assert!(ToothNumber::is_valid("A"));
        assert!(ToothNumber::is_valid("T"));
        assert!(!ToothNumber::is_valid("0"));
        assert!(!ToothNumber::is_valid("33"));
        assert!(!ToothNumber::is_valid("U"));
        assert!(!ToothNumber::is_valid("a"));

        assert!(ToothNumber::new("B").unwrap().is_primary());
        assert!(!ToothNumber::new("14").unwrap().is_primary());
    }

    #[test]
    fn test_surface_codes() {
        for code in ["M", "O", "D", "B", "L", "I", "F"] {
            assert_eq!(code.parse::<SurfaceCode>().unwrap().code(), code);
        }
        assert!("X".parse::<SurfaceCode>().is_err());
    }

    #[test]
    fn test_oral_cavity_roundtrip() {
        for code in ["00", "01", "02", "10", "20", "30", "40"] {
            assert_eq!(OralCavityArea::from_code(code).unwrap().code(), code);
        }
        assert!(OralCavityArea::from_code("99").is_none());
    }
}
