use serde::Serialize;
use std::collections::BTreeMap;

/// Static request configuration sent to the insights endpoint.
pub struct InsightsOptions {
    pub level: &'static str,
    pub fields: &'static [&'static str],
    pub breakdowns: &'static str,
}

/// Validation/normalization rule applied to one response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Any accepted date representation, normalized to YYYY-MM-DD.
    Date,
    /// String passthrough.
    Text,
    /// Numeric coercion, accepts numeric strings.
    Number,
    /// Integer identifiers too large for a double, coerced without going
    /// through f64.
    UnsafeNumber,
    /// Repeated {action_type, value} sub-records.
    ActionBreakdown,
}

impl FieldRule {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldRule::Date => "a date in YYYY-MM-DD format",
            FieldRule::Text => "a string",
            FieldRule::Number | FieldRule::UnsafeNumber => "a number",
            FieldRule::ActionBreakdown => "an array of {action_type, value} records",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Date,
    String,
    Numeric,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Repeated,
}

/// One destination column in the warehouse load schema.
#[derive(Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Column>>,
}

impl Column {
    fn plain(name: &'static str, column_type: ColumnType) -> Self {
        Column {
            name,
            column_type,
            mode: None,
            fields: None,
        }
    }

    fn action_breakdown(name: &'static str) -> Self {
        Column {
            name,
            column_type: ColumnType::Record,
            mode: Some(Mode::Repeated),
            fields: Some(vec![
                Column::plain("action_type", ColumnType::String),
                Column::plain("value", ColumnType::Numeric),
            ]),
        }
    }
}

/// The descriptor triple for one report type: what to request, how to
/// validate each returned row, and how the fields map to warehouse columns.
pub struct Pipeline {
    pub name: &'static str,
    pub insights_options: InsightsOptions,
    pub validation_schema: BTreeMap<&'static str, FieldRule>,
    pub schema: Vec<Column>,
}

const AGE_GENDER_FIELDS: &[&str] = &[
    "date_start",
    "date_stop",
    "account_id",
    "campaign_id",
    "campaign_name",
    "adset_id",
    "adset_name",
    "ad_id",
    "ad_name",
    "reach",
    "impressions",
    "cpc",
    "cpm",
    "ctr",
    "clicks",
    "spend",
    "actions",
    "action_values",
    "cost_per_action_type",
    "cost_per_unique_action_type",
];

/// Ad-level insights broken down by age and gender.
pub fn age_gender_insights() -> Pipeline {
    Pipeline {
        name: "AgeGenderInsights",
        insights_options: InsightsOptions {
            level: "ad",
            fields: AGE_GENDER_FIELDS,
            breakdowns: "age,gender",
        },
        validation_schema: BTreeMap::from([
            ("date_start", FieldRule::Date),
            ("date_stop", FieldRule::Date),
            ("age", FieldRule::Text),
            ("gender", FieldRule::Text),
            ("account_id", FieldRule::UnsafeNumber),
            ("campaign_id", FieldRule::UnsafeNumber),
            ("campaign_name", FieldRule::Text),
            ("adset_id", FieldRule::UnsafeNumber),
            ("adset_name", FieldRule::Text),
            ("ad_id", FieldRule::UnsafeNumber),
            ("ad_name", FieldRule::Text),
            ("reach", FieldRule::Number),
            ("impressions", FieldRule::Number),
            ("cpc", FieldRule::Number),
            ("cpm", FieldRule::Number),
            ("ctr", FieldRule::Number),
            ("clicks", FieldRule::Number),
            ("spend", FieldRule::Number),
            ("actions", FieldRule::ActionBreakdown),
            ("action_values", FieldRule::ActionBreakdown),
            ("cost_per_action_type", FieldRule::ActionBreakdown),
            ("cost_per_unique_action_type", FieldRule::ActionBreakdown),
        ]),
        schema: vec![
            Column::plain("date_start", ColumnType::Date),
            Column::plain("date_stop", ColumnType::Date),
            Column::plain("age", ColumnType::String),
            Column::plain("gender", ColumnType::String),
            Column::plain("account_id", ColumnType::Numeric),
            Column::plain("campaign_id", ColumnType::Numeric),
            Column::plain("campaign_name", ColumnType::String),
            Column::plain("adset_id", ColumnType::Numeric),
            Column::plain("adset_name", ColumnType::String),
            Column::plain("ad_id", ColumnType::Numeric),
            Column::plain("ad_name", ColumnType::String),
            Column::plain("reach", ColumnType::Numeric),
            Column::plain("impressions", ColumnType::Numeric),
            Column::plain("cpc", ColumnType::Numeric),
            Column::plain("cpm", ColumnType::Numeric),
            Column::plain("ctr", ColumnType::Numeric),
            Column::plain("clicks", ColumnType::Numeric),
            Column::plain("spend", ColumnType::Numeric),
            Column::action_breakdown("actions"),
            Column::action_breakdown("action_values"),
            Column::action_breakdown("cost_per_action_type"),
            Column::action_breakdown("cost_per_unique_action_type"),
        ],
    }
}
