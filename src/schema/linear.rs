//! Inputs of the linear regression model (predicts total household income).

use super::{FeatureField, FieldConstraints};

const fn field(
    name: &'static str,
    group: &'static str,
    max: Option<f64>,
    step: f64,
    default: f64,
) -> FeatureField {
    FeatureField {
        name,
        label: name,
        group,
        constraints: FieldConstraints {
            min: 0.0,
            max,
            step,
            default,
        },
    }
}

const EXPENDITURES: &str = "Expenditures";
const INCOME: &str = "Income";
const ASSETS: &str = "Assets";

/// The 9 columns in fitted order.
pub static LINEAR_REGRESSION_FIELDS: &[FeatureField] = &[
    field("Total Food Expenditure", EXPENDITURES, None, 1000.0, 80000.0),
    field("Housing and water Expenditure", EXPENDITURES, None, 1000.0, 35000.0),
    field("Transportation Expenditure", EXPENDITURES, None, 500.0, 10000.0),
    field("Communication Expenditure", EXPENDITURES, None, 100.0, 3000.0),
    field("Education Expenditure", EXPENDITURES, None, 500.0, 5000.0),
    field("Medical Care Expenditure", EXPENDITURES, None, 100.0, 3000.0),
    field(
        "Total Income from Entrepreneurial Activities",
        INCOME,
        None,
        1000.0,
        20000.0,
    ),
    field("Number of Car, Jeep, Van", ASSETS, Some(10.0), 1.0, 0.0),
    field("Number of Cellular phone", ASSETS, Some(20.0), 1.0, 2.0),
];
