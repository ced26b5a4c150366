use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::DiseaseDomain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text coerced to a number.
    Numeric,
    /// Fixed options as `(value, label)`.
    Choice(&'static [(i64, &'static str)]),
}

/// One input on a domain's form. `key` matches the dataset column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub help: &'static str,
    pub kind: FieldKind,
}

const fn numeric(key: &'static str, label: &'static str, help: &'static str) -> FormField {
    FormField {
        key,
        label,
        help,
        kind: FieldKind::Numeric,
    }
}

const fn choice(
    key: &'static str,
    label: &'static str,
    help: &'static str,
    options: &'static [(i64, &'static str)],
) -> FormField {
    FormField {
        key,
        label,
        help,
        kind: FieldKind::Choice(options),
    }
}

const DIABETES_FIELDS: &[FormField] = &[
    numeric("Pregnancies", "Number of Pregnancies", "Total number of pregnancies."),
    numeric("Glucose", "Glucose", "Plasma glucose from a tolerance test. Normal: < 140 mg/dL."),
    numeric("BloodPressure", "Blood Pressure", "Diastolic pressure. Normal: 60-80 mm Hg."),
    numeric("SkinThickness", "Skin Thickness", "Triceps skin fold thickness in mm."),
    numeric("Insulin", "Insulin", "2-hour serum insulin. Normal: < 25 mU/L."),
    numeric("BMI", "Body Mass Index (BMI)", "Weight (kg) / height (m)^2. Normal: 18.5-24.9."),
    numeric(
        "DiabetesPedigreeFunction",
        "Diabetes Pedigree Function",
        "Family-history score; average is about 0.47.",
    ),
    numeric("Age", "Age", "Current age in years."),
];

const HEART_FIELDS: &[FormField] = &[
    numeric("age", "Age", "Age in years."),
    choice("sex", "Sex", "Biological sex.", &[(0, "Female"), (1, "Male")]),
    choice(
        "cp",
        "Chest Pain Type",
        "Type of chest pain experienced.",
        &[
            (0, "Typical Angina"),
            (1, "Atypical Angina"),
            (2, "Non-anginal"),
            (3, "Asymptomatic"),
        ],
    ),
    numeric("trestbps", "Resting Blood Pressure", "Systolic pressure. Normal: 90-120 mm Hg."),
    numeric("chol", "Serum Cholesterol", "Total cholesterol. Normal: < 200 mg/dL."),
    choice(
        "fbs",
        "Fasting Blood Sugar > 120 mg/dl",
        "Whether fasting blood sugar exceeds 120 mg/dL.",
        &[(0, "False"), (1, "True")],
    ),
    choice(
        "restecg",
        "Resting ECG",
        "Resting electrocardiogram result.",
        &[(0, "Normal"), (1, "ST-T Abnormality"), (2, "Hypertrophy")],
    ),
    numeric("thalach", "Max Heart Rate Achieved", "Highest heart rate during a stress test."),
    choice(
        "exang",
        "Exercise Induced Angina",
        "Chest pain during exercise.",
        &[(0, "No"), (1, "Yes")],
    ),
    numeric("oldpeak", "ST Depression", "ST depression induced by exercise. Normal: 0."),
    choice(
        "slope",
        "Slope of Peak Exercise ST",
        "Slope of the ST segment at peak exercise.",
        &[(0, "Upsloping"), (1, "Flat"), (2, "Downsloping")],
    ),
    numeric("ca", "Major Vessels Colored", "Vessels (0-3) colored by fluoroscopy."),
    choice(
        "thal",
        "Thalassemia Defect",
        "Blood disorder status.",
        &[(1, "Normal"), (2, "Fixed Defect"), (3, "Reversible Defect")],
    ),
];

const PARKINSONS_FIELDS: &[FormField] = &[
    numeric("MDVP:Fo(Hz)", "MDVP:Fo(Hz)", "Average vocal fundamental frequency."),
    numeric("MDVP:Fhi(Hz)", "MDVP:Fhi(Hz)", "Maximum vocal fundamental frequency."),
    numeric("MDVP:Flo(Hz)", "MDVP:Flo(Hz)", "Minimum vocal fundamental frequency."),
    numeric("MDVP:Jitter(%)", "MDVP:Jitter(%)", "Frequency variation. Typical: < 1%."),
    numeric("MDVP:Jitter(Abs)", "MDVP:Jitter(Abs)", "Absolute jitter."),
    numeric("MDVP:RAP", "MDVP:RAP", "Relative average perturbation."),
    numeric("MDVP:PPQ", "MDVP:PPQ", "Five-point period perturbation quotient."),
    numeric("Jitter:DDP", "Jitter:DDP", "Jitter difference of differences."),
    numeric("MDVP:Shimmer", "MDVP:Shimmer", "Amplitude variation."),
    numeric("MDVP:Shimmer(dB)", "MDVP:Shimmer(dB)", "Shimmer in decibels."),
    numeric("Shimmer:APQ3", "Shimmer:APQ3", "Three-point amplitude perturbation quotient."),
    numeric("Shimmer:APQ5", "Shimmer:APQ5", "Five-point amplitude perturbation quotient."),
    numeric("HNR", "HNR", "Harmonics-to-noise ratio. Typical: > 20."),
    numeric("RPDE", "RPDE", "Recurrence period density entropy."),
    numeric("spread1", "spread1", "Nonlinear fundamental frequency variation."),
    numeric("spread2", "spread2", "Nonlinear fundamental frequency variation."),
    numeric("D2", "D2", "Correlation dimension."),
    numeric("PPE", "PPE", "Pitch period entropy."),
];

/// Ordered input fields of a domain's form.
pub fn form_fields(domain: DiseaseDomain) -> &'static [FormField] {
    match domain {
        DiseaseDomain::Diabetes => DIABETES_FIELDS,
        DiseaseDomain::Heart => HEART_FIELDS,
        DiseaseDomain::Parkinsons => PARKINSONS_FIELDS,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormInputError {
    #[error("'{0}' is not a field of this form")]
    UnknownField(String),
    #[error("'{field}' is required")]
    Missing { field: &'static str },
    #[error("'{field}' must be a number, got '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("'{field}' must be one of its listed options, got '{value}'")]
    NotAnOption { field: &'static str, value: String },
}

/// Raw text entered into one domain's form.
#[derive(Debug, Clone)]
pub struct FormInput {
    domain: DiseaseDomain,
    values: BTreeMap<&'static str, String>,
}

impl FormInput {
    pub fn new(domain: DiseaseDomain) -> Self {
        Self {
            domain,
            values: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> DiseaseDomain {
        self.domain
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormInputError> {
        let field = form_fields(self.domain)
            .iter()
            .find(|field| field.key == key)
            .ok_or_else(|| FormInputError::UnknownField(key.to_string()))?;
        self.values.insert(field.key, value.into());
        Ok(())
    }

    /// Coerce every field to a number, in form order.
    ///
    /// This is type coercion only; values are not range-checked.
    pub fn coerce(&self) -> Result<Vec<(&'static str, f64)>, FormInputError> {
        form_fields(self.domain)
            .iter()
            .map(|field| {
                let raw = self
                    .values
                    .get(field.key)
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .ok_or(FormInputError::Missing { field: field.key })?;
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| FormInputError::NotNumeric {
                        field: field.key,
                        value: raw.to_string(),
                    })?;
                if let FieldKind::Choice(options) = field.kind
                    && !options.iter().any(|(option, _)| *option as f64 == value)
                {
                    return Err(FormInputError::NotAnOption {
                        field: field.key,
                        value: raw.to_string(),
                    });
                }
                Ok((field.key, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_are_unique_per_domain() {
        for domain in DiseaseDomain::ALL {
            let mut keys: Vec<_> = form_fields(domain).iter().map(|f| f.key).collect();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), total, "{domain}");
        }
    }

    #[test]
    fn heart_form_has_thirteen_inputs() {
        assert_eq!(form_fields(DiseaseDomain::Heart).len(), 13);
    }

    #[test]
    fn coerces_complete_diabetes_form_in_field_order() {
        let mut input = FormInput::new(DiseaseDomain::Diabetes);
        for (idx, field) in form_fields(DiseaseDomain::Diabetes).iter().enumerate() {
            input.set(field.key, format!(" {idx}.5 ")).unwrap();
        }
        let values = input.coerce().unwrap();
        assert_eq!(values[0], ("Pregnancies", 0.5));
        assert_eq!(values[7], ("Age", 7.5));
    }

    #[test]
    fn reports_first_missing_or_invalid_field() {
        let mut input = FormInput::new(DiseaseDomain::Heart);
        for field in form_fields(DiseaseDomain::Heart) {
            input.set(field.key, "1").unwrap();
        }
        input.set("chol", "high").unwrap();
        assert_eq!(
            input.coerce().unwrap_err(),
            FormInputError::NotNumeric {
                field: "chol",
                value: "high".to_string()
            }
        );
        input.set("chol", "210").unwrap();
        input.set("thal", "0").unwrap();
        assert!(matches!(
            input.coerce().unwrap_err(),
            FormInputError::NotAnOption { field: "thal", .. }
        ));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut input = FormInput::new(DiseaseDomain::Parkinsons);
        assert_eq!(
            input.set("Glucose", "1"),
            Err(FormInputError::UnknownField("Glucose".to_string()))
        );
    }
}
