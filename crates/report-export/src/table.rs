//! Metrics table: column headers and per-cell formatting.

use analysis_core::format::crores;
use analysis_core::FinancialRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Year,
    Revenue,
    OperatingProfit,
    Opm,
    Pbt,
    Pat,
    Eps,
    EpsGrowth,
    PegRatio,
    Roe,
    Roce,
}

impl Column {
    /// Table order
    pub const ALL: [Column; 11] = [
        Column::Year,
        Column::Revenue,
        Column::OperatingProfit,
        Column::Opm,
        Column::Pbt,
        Column::Pat,
        Column::Eps,
        Column::EpsGrowth,
        Column::PegRatio,
        Column::Roe,
        Column::Roce,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Revenue => "Revenue (Cr)",
            Column::OperatingProfit => "Operating Profit (Cr)",
            Column::Opm => "OPM %",
            Column::Pbt => "PBT (Cr)",
            Column::Pat => "PAT (Cr)",
            Column::Eps => "EPS",
            Column::EpsGrowth => "EPS Growth %",
            Column::PegRatio => "PEG Ratio",
            Column::Roe => "ROE %",
            Column::Roce => "ROCE %",
        }
    }
}

/// Display text for one cell: percentages get `%`, EPS gets `₹`, money gets `₹…Cr`.
pub fn format_value(column: Column, record: &FinancialRecord) -> String {
    match column {
        Column::Year => record.year.clone(),
        Column::Opm => format!("{}%", record.opm),
        Column::Roe => format!("{}%", record.roe),
        Column::Roce => format!("{}%", record.roce),
        Column::EpsGrowth => format!("{}%", record.eps_growth),
        Column::PegRatio => record.peg_ratio.clone(),
        Column::Eps => format!("₹{}", record.eps),
        Column::Revenue => crores(record.revenue),
        Column::OperatingProfit => crores(record.operating_profit),
        Column::Pbt => crores(record.pbt),
        Column::Pat => crores(record.pat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthetic_data::generate_series;

    #[test]
    fn test_headers() {
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(headers[0], "Year");
        assert_eq!(headers[2], "Operating Profit (Cr)");
        assert_eq!(headers[10], "ROCE %");
    }

    #[test]
    fn test_format_value() {
        let records = generate_series("TCS");
        let first = &records[0];
        assert_eq!(format_value(Column::Year, first), "2021");
        assert_eq!(format_value(Column::Revenue, first), "₹18,345Cr");
        assert_eq!(format_value(Column::Opm, first), "24%");
        assert_eq!(format_value(Column::Eps, first), "₹76");
        assert_eq!(format_value(Column::EpsGrowth, first), "0%");
        assert_eq!(format_value(Column::PegRatio, first), "1.8");

        assert_eq!(format_value(Column::EpsGrowth, &records[1]), "-9.9%");
        assert_eq!(format_value(Column::EpsGrowth, &records[2]), "21.03%");
    }
}
