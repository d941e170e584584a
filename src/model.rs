use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Absent,
    Number(f64),
    Text(String),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(number.to_string())),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "{PLACEHOLDER}"),
            Self::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.0}")
            }
            Self::Number(value) => write!(f, "{value:.1}"),
            Self::Text(text) if text.is_empty() || text == PLACEHOLDER => {
                write!(f, "{PLACEHOLDER}")
            }
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    #[serde(rename = "Section", deserialize_with = "text_or_empty")]
    pub section: String,
    #[serde(rename = "Grade", deserialize_with = "integer_or_zero")]
    pub grade: i64,
    #[serde(rename = "Weight", deserialize_with = "number_or_zero")]
    pub weight: f64,
    #[serde(rename = "d", deserialize_with = "number_or_zero")]
    pub d: f64,
    #[serde(rename = "bf", deserialize_with = "number_or_zero")]
    pub bf: f64,
    #[serde(rename = "tf", deserialize_with = "number_or_zero")]
    pub tf: f64,
    #[serde(rename = "tw", deserialize_with = "number_or_zero")]
    pub tw: f64,
    #[serde(rename = "r1")]
    pub r1: FieldValue,
    #[serde(rename = "d1", deserialize_with = "number_or_zero")]
    pub d1: f64,
    #[serde(rename = "tw__1")]
    pub tw_1: FieldValue,
    #[serde(rename = "tf__1")]
    pub tf_1: FieldValue,
    #[serde(rename = "Ag", deserialize_with = "number_or_zero")]
    pub ag: f64,
    #[serde(rename = "Ix", deserialize_with = "number_or_zero")]
    pub ix: f64,
    #[serde(rename = "Zx", deserialize_with = "number_or_zero")]
    pub zx: f64,
    #[serde(rename = "Sx", deserialize_with = "number_or_zero")]
    pub sx: f64,
    #[serde(rename = "rx", deserialize_with = "number_or_zero")]
    pub rx: f64,
    #[serde(rename = "Iy", deserialize_with = "number_or_zero")]
    pub iy: f64,
    #[serde(rename = "Zy", deserialize_with = "number_or_zero")]
    pub zy: f64,
    #[serde(rename = "Sy", deserialize_with = "number_or_zero")]
    pub sy: f64,
    #[serde(rename = "ry", deserialize_with = "number_or_zero")]
    pub ry: f64,
    #[serde(rename = "J", deserialize_with = "number_or_zero")]
    pub j: f64,
    #[serde(rename = "Iw")]
    pub iw: FieldValue,
    #[serde(rename = "flange")]
    pub flange: FieldValue,
    #[serde(rename = "web")]
    pub web: FieldValue,
    #[serde(rename = "kf")]
    pub kf: FieldValue,
    #[serde(rename = "C,N,S")]
    pub compactness: FieldValue,
    #[serde(rename = "Zex", deserialize_with = "number_or_zero")]
    pub zex: f64,
    #[serde(rename = "C,N,S__1")]
    pub compactness_y: FieldValue,
    #[serde(rename = "Zey", deserialize_with = "number_or_zero")]
    pub zey: f64,
    #[serde(rename = "2tf")]
    pub two_tf: FieldValue,
    #[serde(rename = "Zy5", deserialize_with = "number_or_zero")]
    pub zy5: f64,
    #[serde(rename = "Tan Alpha", deserialize_with = "number_or_zero")]
    pub tan_alpha: f64,
    // Several exported tables carry the UTF-8 bytes of "αb" decoded as Latin-1.
    #[serde(rename = "αb", alias = "Î±b")]
    pub alpha_b: FieldValue,
    #[serde(rename = "Fu")]
    pub fu: FieldValue,
    #[serde(rename = "r2")]
    pub r2: FieldValue,
    #[serde(rename = "ZeyD", deserialize_with = "number_or_zero")]
    pub zey_d: f64,
    #[serde(rename = "In", deserialize_with = "number_or_zero")]
    pub i_n: f64,
    #[serde(rename = "Ip", deserialize_with = "number_or_zero")]
    pub i_p: f64,
    #[serde(rename = "ZexC", deserialize_with = "number_or_zero")]
    pub zex_c: f64,
    #[serde(rename = "x5")]
    pub x5: FieldValue,
    #[serde(rename = "y5", deserialize_with = "number_or_zero")]
    pub y5: f64,
    #[serde(rename = "nL", deserialize_with = "number_or_zero")]
    pub n_l: f64,
    #[serde(rename = "pB", deserialize_with = "number_or_zero")]
    pub p_b: f64,
    #[serde(rename = "pT")]
    pub p_t: FieldValue,
    #[serde(rename = "Residual", deserialize_with = "text_or_empty")]
    pub residual: String,
    #[serde(rename = "Type")]
    pub section_type: FieldValue,
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(value) => Ok(value),
        None => Ok(0.0),
    }
}

fn integer_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(0),
        Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        Some(value) => Err(D::Error::custom(format!(
            "expected an integer grade, found {value}"
        ))),
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
