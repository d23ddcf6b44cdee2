//! Typed example values and their report-safe projections.
//!
//! A converted example cell travels two ways: the typed payload is handed to
//! step handlers, while only a string label and a primitive [`ReportValue`]
//! ever reach the report. The payload itself is never serialised.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Primitive projection of a converted value as it appears in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    /// No value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer that fits in `i64`.
    Integer(i64),
    /// Finite floating-point number.
    Float(f64),
    /// Anything else, by its label.
    String(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&value.label()),
            Self::String(value) => f.write_str(value),
        }
    }
}

/// A value an example converter may produce.
///
/// `label` identifies the value in test names and `example_kwargs`;
/// `report_value` is what the shared examples table shows. Custom types
/// usually only provide `label`, leaving the projection as that string.
///
/// # Examples
///
/// ```
/// use stepwise::{ExampleValue, ReportValue};
///
/// struct Point { x: i32, y: i32 }
///
/// impl ExampleValue for Point {
///     fn label(&self) -> String {
///         format!("{},{}", self.x, self.y)
///     }
/// }
///
/// let point = Point { x: 10, y: 20 };
/// assert_eq!(point.report_value(), ReportValue::String("10,20".into()));
/// ```
pub trait ExampleValue: Any + Send + Sync {
    /// Identification string for the value.
    fn label(&self) -> String;

    /// Primitive projection used in reports.
    fn report_value(&self) -> ReportValue {
        ReportValue::String(self.label())
    }
}

macro_rules! integer_example_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ExampleValue for $ty {
            fn label(&self) -> String {
                self.to_string()
            }

            fn report_value(&self) -> ReportValue {
                i64::try_from(*self)
                    .map_or_else(|_| ReportValue::String(self.to_string()), ReportValue::Integer)
            }
        }
    )*};
}

integer_example_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Render an `{:?}`-formatted float with a signed, two-digit exponent
/// (`1e+20`, `1.5e-07`).
fn signed_exponent(text: String) -> String {
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = exponent
        .strip_prefix('-')
        .map_or(('+', exponent), |digits| ('-', digits));
    format!("{mantissa}e{sign}{digits:0>2}")
}

// Finite floats keep a fractional part (`5.0`). Non-finite values are
// labelled `nan`, `inf` or `-inf` and projected to that string, since JSON
// has no representation for them.
fn float_label(debug: String, value: f64) -> String {
    if value.is_nan() {
        "nan".to_owned()
    } else if value.is_infinite() {
        (if value.is_sign_negative() { "-inf" } else { "inf" }).to_owned()
    } else {
        signed_exponent(debug)
    }
}

fn float_report_value(value: f64) -> ReportValue {
    if value.is_finite() {
        ReportValue::Float(value)
    } else {
        ReportValue::String(float_label(String::new(), value))
    }
}

impl ExampleValue for f64 {
    fn label(&self) -> String {
        float_label(format!("{self:?}"), *self)
    }

    fn report_value(&self) -> ReportValue {
        float_report_value(*self)
    }
}

impl ExampleValue for f32 {
    fn label(&self) -> String {
        float_label(format!("{self:?}"), f64::from(*self))
    }

    fn report_value(&self) -> ReportValue {
        float_report_value(f64::from(*self))
    }
}

impl ExampleValue for bool {
    fn label(&self) -> String {
        self.to_string()
    }

    fn report_value(&self) -> ReportValue {
        ReportValue::Bool(*self)
    }
}

impl ExampleValue for String {
    fn label(&self) -> String {
        self.clone()
    }
}

/// A converted example cell: shared typed payload plus its projections.
///
/// Cloning is cheap; every clone shares the payload.
#[derive(Clone)]
pub struct ConvertedValue {
    payload: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    label: String,
    report: ReportValue,
}

impl ConvertedValue {
    /// Wrap `value`, computing its label and projection once.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::{ConvertedValue, ReportValue};
    ///
    /// let value = ConvertedValue::new(5.0_f64);
    /// assert_eq!(value.label(), "5.0");
    /// assert_eq!(value.report_value(), &ReportValue::Float(5.0));
    /// assert_eq!(value.downcast_ref::<f64>(), Some(&5.0));
    /// ```
    #[must_use]
    pub fn new<T: ExampleValue>(value: T) -> Self {
        let label = value.label();
        let report = value.report_value();
        Self {
            payload: Arc::new(value),
            type_name: type_name::<T>(),
            label,
            report,
        }
    }

    /// Wrap a raw cell string unchanged.
    #[must_use]
    pub fn raw(value: impl Into<String>) -> Self {
        Self::new(value.into())
    }

    /// Identification label used in test names and `example_kwargs`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Report-safe projection.
    #[must_use]
    pub fn report_value(&self) -> &ReportValue {
        &self.report
    }

    /// Name of the payload type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the payload as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether the payload has type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }
}

impl fmt::Debug for ConvertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertedValue")
            .field("type_name", &self.type_name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
