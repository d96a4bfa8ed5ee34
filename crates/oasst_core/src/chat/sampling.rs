use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the sampling parameters exposed as a slider in the chat form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Temperature,
    MaxNewTokens,
    TopP,
    RepetitionPenalty,
    TopK,
    TypicalP,
}

/// Declared slider bounds for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub precision: u32,
}

impl ParameterRange {
    const fn unit() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            step: 0.01,
            precision: 2,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl ParameterKey {
    /// Slider order as shown in the form.
    pub const ALL: [ParameterKey; 6] = [
        ParameterKey::Temperature,
        ParameterKey::MaxNewTokens,
        ParameterKey::TopP,
        ParameterKey::RepetitionPenalty,
        ParameterKey::TopK,
        ParameterKey::TypicalP,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKey::Temperature => "temperature",
            ParameterKey::MaxNewTokens => "max_new_tokens",
            ParameterKey::TopP => "top_p",
            ParameterKey::RepetitionPenalty => "repetition_penalty",
            ParameterKey::TopK => "top_k",
            ParameterKey::TypicalP => "typical_p",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParameterKey::Temperature => "Temperature",
            ParameterKey::MaxNewTokens => "Max new tokens",
            ParameterKey::TopP => "Top P",
            ParameterKey::RepetitionPenalty => "Repetition Penalty",
            ParameterKey::TopK => "Top K",
            ParameterKey::TypicalP => "Typical P",
        }
    }

    pub fn range(self) -> ParameterRange {
        let unit = ParameterRange::unit();
        match self {
            ParameterKey::Temperature => ParameterRange {
                min: 0.01,
                max: 2.0,
                ..unit
            },
            ParameterKey::MaxNewTokens => ParameterRange {
                min: 1.0,
                max: 1024.0,
                step: 1.0,
                ..unit
            },
            ParameterKey::TopP | ParameterKey::TypicalP => unit,
            ParameterKey::RepetitionPenalty => ParameterRange {
                min: 1.0,
                max: 3.0,
                ..unit
            },
            ParameterKey::TopK => ParameterRange {
                min: 5.0,
                max: 2000.0,
                step: 5.0,
                ..unit
            },
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{key} must lie within [{min}, {max}], got {value}")]
    OutOfRange {
        key: ParameterKey,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Sampling settings sent along with chat requests. `None` disables a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SamplingParameters {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_new_tokens: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub repetition_penalty: Option<f64>,
    #[serde(default)]
    pub top_k: Option<f64>,
    #[serde(default)]
    pub typical_p: Option<f64>,
}

impl SamplingParameters {
    pub fn get(&self, key: ParameterKey) -> Option<f64> {
        *self.slot(key)
    }

    /// Sets one parameter after checking it against the declared range.
    pub fn set(&mut self, key: ParameterKey, value: Option<f64>) -> Result<(), ParameterError> {
        check(key, value)?;
        *self.slot_mut(key) = value;
        Ok(())
    }

    /// Enabling a parameter starts it at the top of its range.
    pub fn toggle(&mut self, key: ParameterKey, enabled: bool) {
        *self.slot_mut(key) = enabled.then(|| key.range().max);
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        ParameterKey::ALL
            .into_iter()
            .try_for_each(|key| check(key, self.get(key)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, Option<f64>)> + '_ {
        ParameterKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    fn slot(&self, key: ParameterKey) -> &Option<f64> {
        match key {
            ParameterKey::Temperature => &self.temperature,
            ParameterKey::MaxNewTokens => &self.max_new_tokens,
            ParameterKey::TopP => &self.top_p,
            ParameterKey::RepetitionPenalty => &self.repetition_penalty,
            ParameterKey::TopK => &self.top_k,
            ParameterKey::TypicalP => &self.typical_p,
        }
    }

    fn slot_mut(&mut self, key: ParameterKey) -> &mut Option<f64> {
        match key {
            ParameterKey::Temperature => &mut self.temperature,
            ParameterKey::MaxNewTokens => &mut self.max_new_tokens,
            ParameterKey::TopP => &mut self.top_p,
            ParameterKey::RepetitionPenalty => &mut self.repetition_penalty,
            ParameterKey::TopK => &mut self.top_k,
            ParameterKey::TypicalP => &mut self.typical_p,
        }
    }
}

fn check(key: ParameterKey, value: Option<f64>) -> Result<(), ParameterError> {
    let Some(value) = value else {
        return Ok(());
    };
    let range = key.range();
    if range.contains(value) {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            key,
            value,
            min: range.min,
            max: range.max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterError, ParameterKey, SamplingParameters};

    #[test]
    fn set_rejects_out_of_range_and_keeps_value() {
        let mut params = SamplingParameters {
            top_k: Some(50.0),
            ..Default::default()
        };
        let err = params.set(ParameterKey::TopK, Some(1.0)).unwrap_err();
        assert_eq!(
            err,
            ParameterError::OutOfRange {
                key: ParameterKey::TopK,
                value: 1.0,
                min: 5.0,
                max: 2000.0
            }
        );
        assert_eq!(params.top_k, Some(50.0));
    }

    #[test]
    fn null_is_always_accepted() {
        let mut params = SamplingParameters::default();
        params.set(ParameterKey::Temperature, None).unwrap();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn toggle_on_starts_at_max() {
        let mut params = SamplingParameters::default();
        params.toggle(ParameterKey::RepetitionPenalty, true);
        assert_eq!(params.repetition_penalty, Some(3.0));
        params.toggle(ParameterKey::RepetitionPenalty, false);
        assert_eq!(params.repetition_penalty, None);
    }

    #[test]
    fn nan_is_out_of_range() {
        let mut params = SamplingParameters::default();
        assert!(params.set(ParameterKey::TopP, Some(f64::NAN)).is_err());
    }

    #[test]
    fn keys_parse_from_wire_names() {
        assert_eq!(
            ParameterKey::parse("max_new_tokens"),
            Some(ParameterKey::MaxNewTokens)
        );
        assert_eq!(ParameterKey::parse("nope"), None);
    }
}
