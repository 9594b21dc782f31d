//! Receipt

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    ids::DiscountId,
    pricing::{Quote, QuoteLine},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Printable view of a [`Quote`].
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    quote: &'a Quote,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for a quote.
    pub fn new(quote: &'a Quote) -> Self {
        Self { quote }
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "", "Item", "Category", "Qty", "Unit Price", "Multiplier", "Total",
        ]);

        for (idx, line) in self.quote.lines().iter().enumerate() {
            builder.push_record(line_record(idx, line));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..7), Alignment::right());

        writeln!(out, "\nStore: {}", self.quote.store())?;
        writeln!(out, "{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let quote = self.quote;

        writeln!(out, " Subtotal: {:>10.2}", quote.original_price())?;
        writeln!(out, " Total:    {:>10.2}", quote.total())?;
        writeln!(
            out,
            " Savings:  {:>10.2} ({:.2}%)",
            quote.savings(),
            quote.savings_fraction() * 100.0
        )?;

        if quote.fired().is_empty() {
            writeln!(out, " Discounts: none")?;
        } else {
            let fired: Vec<&str> = quote.fired().iter().map(DiscountId::as_str).collect();

            writeln!(out, " Discounts: {}", fired.join(", "))?;
        }

        Ok(())
    }
}

fn line_record(idx: usize, line: &QuoteLine) -> [String; 7] {
    [
        format!("#{:<3}", idx + 1),
        line.product.name.clone(),
        line.product.category.clone(),
        line.quantity.to_string(),
        format!("{:.2}", line.product.price),
        format!("{:.4}", line.multiplier),
        format!("{:.2}", line.total()),
    ]
}
