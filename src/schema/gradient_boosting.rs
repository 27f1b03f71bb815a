//! Inputs of the gradient boosting model (predicts income from salaries and wages).

use super::{FeatureField, FieldConstraints};

const fn field(
    name: &'static str,
    label: &'static str,
    group: &'static str,
    min: f64,
    max: Option<f64>,
    step: f64,
    default: f64,
) -> FeatureField {
    FeatureField {
        name,
        label,
        group,
        constraints: FieldConstraints {
            min,
            max,
            step,
            default,
        },
    }
}

const GENERAL: &str = "General Information";
const WAGES: &str = "Salaries & Wages";
const OTHER: &str = "Other Income Sources";

/// The 15 columns in fitted order.
pub static GRADIENT_BOOSTING_FIELDS: &[FeatureField] = &[
    field("Region", "Region", GENERAL, 1.0, Some(17.0), 1.0, 1.0),
    field("Province", "Province", GENERAL, 1.0, Some(81.0), 1.0, 28.0),
    field(
        "Family Size",
        "Family Size (Total Individuals)",
        GENERAL,
        1.0,
        None,
        0.5,
        3.0,
    ),
    field(
        "Salaries/Wages from Regular Employment",
        "Salaries/Wages from Regular Employment",
        WAGES,
        0.0,
        None,
        1000.0,
        50000.0,
    ),
    field(
        "Salaries/Wages from Seasonal Employment",
        "Salaries/Wages from Seasonal Employment",
        WAGES,
        0.0,
        None,
        1000.0,
        5000.0,
    ),
    field(
        "Net Share of Crops, Fruits, etc. (Tot. Net Value of Share)",
        "Net Share of Crops, Fruits, etc.",
        WAGES,
        0.0,
        None,
        1000.0,
        0.0,
    ),
    field(
        "Cash Receipts, Support, etc. from Abroad",
        "Cash Receipts, Support, etc. from Abroad",
        OTHER,
        0.0,
        None,
        1000.0,
        0.0,
    ),
    field(
        "Cash Receipts, Support, etc. from Domestic Source",
        "Cash Receipts, Support, etc. from Domestic Source",
        OTHER,
        0.0,
        None,
        1000.0,
        0.0,
    ),
    field(
        "Rentals Received from Non-Agri Lands, etc.",
        "Rentals Received from Non-Agri Lands, etc.",
        OTHER,
        0.0,
        None,
        100.0,
        0.0,
    ),
    field(
        "Pension and Retirement Benefits",
        "Pension and Retirement Benefits",
        OTHER,
        0.0,
        None,
        1000.0,
        0.0,
    ),
    field(
        "Dividends from Investment",
        "Dividends from Investment",
        OTHER,
        0.0,
        None,
        100.0,
        0.0,
    ),
    field(
        "Other Sources of Income NEC",
        "Other Sources of Income NEC",
        OTHER,
        0.0,
        None,
        100.0,
        0.0,
    ),
    field(
        "Family Sustenance Activities",
        "Family Sustenance Activities",
        OTHER,
        0.0,
        None,
        1000.0,
        0.0,
    ),
    field(
        "Transportation, Storage Services",
        "Transportation, Storage Services",
        OTHER,
        0.0,
        None,
        10.0,
        1500.0,
    ),
    field(
        "Hhld, Income from Entrepreneurial Activities, Total",
        "Hhld, Income from Entrepreneurial Activities, Total",
        OTHER,
        0.0,
        None,
        10.0,
        2000.0,
    ),
];
