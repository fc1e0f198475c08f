use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// One candidate declaration and what the round would do with it
#[derive(Tabled)]
pub struct CandidateRow {
    #[tabled(rename = "Declaration")]
    pub declaration: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Report")]
    pub report: String,
    #[tabled(rename = "Sums")]
    pub sums: String,
}

pub fn candidates_table(rows: &[CandidateRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table() {
        let table = stats_table(&[("Declarations", "3"), ("Interfaces", "2")]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Declarations"));
        assert!(table.contains("3"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(TableBuilder::new().build().is_empty());
        assert!(candidates_table(&[]).is_empty());
    }
}
