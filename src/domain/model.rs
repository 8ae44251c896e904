use crate::domain::error::ImError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diffusion model baked into a graph when its weights are sealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffusionModel {
    /// Independent Cascade: each newly active node gets one chance per out-edge.
    #[default]
    #[serde(rename = "IC", alias = "ic", alias = "independent_cascade")]
    IndependentCascade,
    /// Linear Threshold: a node activates once its active in-weight reaches a latent threshold.
    #[serde(rename = "LT", alias = "lt", alias = "linear_threshold")]
    LinearThreshold,
}

impl DiffusionModel {
    pub const ALL: [DiffusionModel; 2] = [
        DiffusionModel::IndependentCascade,
        DiffusionModel::LinearThreshold,
    ];

    /// Short tag used in reports and file names.
    pub fn tag(&self) -> &'static str {
        match self {
            DiffusionModel::IndependentCascade => "IC",
            DiffusionModel::LinearThreshold => "LT",
        }
    }
}

impl fmt::Display for DiffusionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DiffusionModel {
    type Err = ImError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ic" | "independent_cascade" | "independent-cascade" => {
                Ok(DiffusionModel::IndependentCascade)
            }
            "lt" | "linear_threshold" | "linear-threshold" => Ok(DiffusionModel::LinearThreshold),
            other => Err(ImError::invalid(format!(
                "unknown diffusion model '{other}' (expected IC or LT)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_case_insensitive() {
        assert_eq!(
            "IC".parse::<DiffusionModel>().unwrap(),
            DiffusionModel::IndependentCascade
        );
        assert_eq!(
            "lt".parse::<DiffusionModel>().unwrap(),
            DiffusionModel::LinearThreshold
        );
        assert_eq!(
            " linear_threshold ".parse::<DiffusionModel>().unwrap(),
            DiffusionModel::LinearThreshold
        );
    }

    #[test]
    fn test_unknown_model_is_invalid_argument() {
        let err = "SIR".parse::<DiffusionModel>().unwrap_err();
        assert!(matches!(err, ImError::InvalidArgument(_)));
    }

    #[test]
    fn test_serde_uses_short_tags() {
        let json = serde_json::to_string(&DiffusionModel::LinearThreshold).unwrap();
        assert_eq!(json, "\"LT\"");
        let back: DiffusionModel = serde_json::from_str("\"ic\"").unwrap();
        assert_eq!(back, DiffusionModel::IndependentCascade);
        assert_eq!(DiffusionModel::IndependentCascade.to_string(), "IC");
    }
}
