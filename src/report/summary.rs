//! Transfer summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Documents handled for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub collection: String,
    pub documents: usize,
}

/// What a transfer did, collection by collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub operation: String,
    pub collections: Vec<CollectionReport>,
}

impl TransferSummary {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            collections: Vec::new(),
        }
    }

    pub fn record(&mut self, collection: &str, documents: usize) {
        self.collections.push(CollectionReport {
            collection: collection.to_string(),
            documents,
        });
    }

    pub fn total_documents(&self) -> usize {
        self.collections.iter().map(|c| c.documents).sum()
    }

    /// Document count recorded for `collection`
    pub fn documents_in(&self, collection: &str) -> Option<usize> {
        self.collections
            .iter()
            .find(|c| c.collection == collection)
            .map(|c| c.documents)
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style(self.operation.to_uppercase()).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Collection").add_attribute(Attribute::Bold),
            Cell::new("Documents").add_attribute(Attribute::Bold),
        ]);

        for report in &self.collections {
            table.add_row(vec![
                Cell::new(&report.collection),
                Cell::new(report.documents).fg(if report.documents == 0 {
                    Color::White
                } else {
                    Color::Green
                }),
            ]);
        }

        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(self.total_documents())
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Print the blocklisted project ids as a one-column table
pub fn display_blocklist(project_ids: &[String]) {
    if project_ids.is_empty() {
        println!("    {}", style("The blocklist is empty").dim());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![Cell::new("Blocklisted project").add_attribute(Attribute::Bold)]);
    for id in project_ids {
        table.add_row(vec![Cell::new(id).fg(Color::Red)]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
