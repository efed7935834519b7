// Built-in statistics shown when the table endpoint is unreachable

use once_cell::sync::Lazy;

use super::models::TableRow;

const FALLBACK_ROWS: [(&str, &str, &str); 37] = [
    ("Total Return", "-0.201", "2.334"),
    ("1-day Return", "0.644", "0.834"),
    ("Alpha", "-63.781", "0.000"),
    ("Annualized Return", "-2.382", "31.900"),
    ("Std Deviation", "18.094", "8.560"),
    ("Return/Risk", "-0.132", "3.727"),
    ("Excess Return", "-34.282", "0.000"),
    ("Batting Average", "0.476", "0.524"),
    ("Skewness", "-0.749", "47.372"),
    ("Kurtosis", "69.406", "-23.455"),
    ("Max Drawdown", "3.986", "1.381"),
    ("Best Period", "2.676", "1.384"),
    ("Worst Period", "-2.279", "-0.668"),
    ("Calmar Ratio", "-0.610", "9.809"),
    ("Correlation Coefficient", "0.910", "1.000"),
    ("Bias Ratio", "0.541", "0.517"),
    ("Down Market Return", "-88.171", "-60.094"),
    ("Up Market Return", "564.932", "291.063"),
    ("Number of Negative Period", "11", "10"),
    ("Number of Positive Period", "10", "11"),
    ("Capture Ratio Down", "1.467", "1.000"),
    ("Capture Ratio Up", "1.941", "1.000"),
    ("Sterling Ratio", "-0.391", "4.727"),
    ("Sharpe Ratio", "-0.242", "3.493"),
    ("Downside Risk", "9.700", "0.000"),
    ("Tracking Error", "10.892", "0.000"),
    ("Information Ratio", "-3.147", "-"),
    ("Sortino", "-0.452", "-"),
    ("Variance", "1.299", "0.291"),
    ("Jensen Alpha", "-61.931", "0.000"),
    ("Beta", "1.925", "1.000"),
    ("Treynor", "-0.023", "0.299"),
    ("Loss Deviation", "0.0015", "0.0004"),
    ("Gain Deviation", "0.0013", "0.0007"),
    ("Omega Ratio", "0.9504", "1.5002"),
    ("R Squared", "0.8290", "1.0000"),
    ("Dividend Yield", "1.6295", "1.1118"),
];

static FALLBACK_TABLE: Lazy<Vec<TableRow>> = Lazy::new(|| {
    FALLBACK_ROWS
        .iter()
        .map(|(id, ac, bm)| TableRow::new(id, ac, bm))
        .collect()
});

/// Number of statistics in the built-in table
pub const FALLBACK_ROW_COUNT: usize = FALLBACK_ROWS.len();

/// A fresh copy of the built-in statistics table
pub fn fallback_table() -> Vec<TableRow> {
    FALLBACK_TABLE.clone()
}
