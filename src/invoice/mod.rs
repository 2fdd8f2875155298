mod render;

use std::path::Path;

use bytes::Bytes;
use time::Date;
use time::macros::format_description;

use crate::error::AppResult;
use crate::models::{Customer, ReportKind};
use render::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const TRACKING_NOTE: &str = "This Report # can be used to keep track of report";

/// Company logo, relative to the static directory.
pub const LOGO_PATH: &str = "pics/RenuLogix-Logo.png";

/// Reads the logo once at startup. Invoices are issued without it when it is missing.
pub fn load_logo(static_dir: &Path) -> Option<Bytes> {
    let path = static_dir.join(LOGO_PATH);
    match std::fs::read(&path) {
        Ok(bytes) => Some(Bytes::from(bytes)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Invoice logo unavailable");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub address: String,
    pub address2: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_cost_usd: u32,
    pub quantity: u32,
}

impl LineItem {
    pub fn total_usd(&self) -> u32 {
        self.unit_cost_usd * self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// One drawing instruction on the invoice page. Positions are millimetres from the
/// bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
    },
}

fn text(font: Font, size: f32, x: f32, y: f32, text: impl Into<String>) -> Mark {
    Mark::Text {
        font,
        size,
        x,
        y,
        text: text.into(),
    }
}

const MARGIN: f32 = 18.0;
const RIGHT_COLUMN: f32 = 120.0;
const UNIT_COST_X: f32 = 110.0;
const QUANTITY_X: f32 = 145.0;
const TOTAL_X: f32 = 175.0;
const LOGO_WIDTH: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct Invoice {
    pub report_id: i64,
    pub reference: String,
    pub description: String,
    pub issued_on: Date,
    pub company: Party,
    pub customer: Party,
    pub items: Vec<LineItem>,
    pub notes: String,
    pub footer: String,
}

impl Invoice {
    pub fn for_order(customer: &Customer, kind: ReportKind, report_id: i64, issued_on: Date) -> Self {
        Self {
            report_id,
            reference: "Ref: Report Invoice".to_string(),
            description: "RenuLogix EagleView Report".to_string(),
            issued_on,
            company: Party {
                name: "Renulogix".to_string(),
                address: "85 N Raymond Ave".to_string(),
                address2: "Pasadena, CA".to_string(),
                postal_code: "91103".to_string(),
            },
            customer: Party {
                name: customer.full_name(),
                address: customer.street.clone(),
                address2: format!("{}, {}", customer.city, customer.state),
                postal_code: customer.zip.clone(),
            },
            items: vec![LineItem {
                name: kind.label().to_string(),
                unit_cost_usd: kind.price_usd(),
                quantity: 1,
            }],
            notes: format!("Report ID: {report_id}\n{TRACKING_NOTE}"),
            footer: TRACKING_NOTE.to_string(),
        }
    }

    pub fn total_usd(&self) -> u32 {
        self.items.iter().map(LineItem::total_usd).sum()
    }

    /// Invoice dates read like `01-02-2006 Monday`.
    pub fn formatted_date(&self) -> String {
        let format = format_description!("[month]-[day]-[year] [weekday]");
        self.issued_on
            .format(format)
            .unwrap_or_else(|_| self.issued_on.to_string())
    }

    pub fn title(&self) -> String {
        format!("Invoice for report {}", self.report_id)
    }

    pub fn marks(&self) -> Vec<Mark> {
        let right = PAGE_WIDTH_MM - MARGIN;
        let mut marks = Vec::new();
        let mut y = PAGE_HEIGHT_MM - 28.0;

        marks.push(Mark::Logo {
            x: MARGIN,
            y: y - 4.0,
            width: LOGO_WIDTH,
        });
        marks.push(text(Font::Bold, 24.0, RIGHT_COLUMN, y, "INVOICE"));
        marks.push(text(Font::Regular, 10.0, RIGHT_COLUMN, y - 7.0, &self.reference));
        marks.push(text(
            Font::Regular,
            10.0,
            RIGHT_COLUMN,
            y - 12.0,
            format!("Date: {}", self.formatted_date()),
        ));

        y -= 24.0;
        marks.push(text(Font::Regular, 11.0, MARGIN, y, &self.description));

        y -= 14.0;
        party_block(&mut marks, MARGIN, y, &self.company);
        party_block(&mut marks, RIGHT_COLUMN, y, &self.customer);

        y -= 34.0;
        marks.push(Mark::Band {
            x: MARGIN,
            y: y - 2.5,
            width: right - MARGIN,
            height: 8.0,
        });
        marks.push(text(Font::Bold, 10.0, MARGIN + 2.0, y, "Item"));
        marks.push(text(Font::Bold, 10.0, UNIT_COST_X, y, "Unit cost"));
        marks.push(text(Font::Bold, 10.0, QUANTITY_X, y, "Quantity"));
        marks.push(text(Font::Bold, 10.0, TOTAL_X, y, "Total"));

        for item in &self.items {
            y -= 8.0;
            marks.push(text(Font::Regular, 10.0, MARGIN + 2.0, y, &item.name));
            marks.push(text(Font::Regular, 10.0, UNIT_COST_X, y, dollars(item.unit_cost_usd)));
            marks.push(text(Font::Regular, 10.0, QUANTITY_X, y, item.quantity.to_string()));
            marks.push(text(Font::Regular, 10.0, TOTAL_X, y, dollars(item.total_usd())));
        }

        y -= 5.0;
        marks.push(Mark::Rule {
            x1: MARGIN,
            x2: right,
            y,
        });
        y -= 7.0;
        marks.push(text(Font::Bold, 11.0, QUANTITY_X, y, "Total"));
        marks.push(text(Font::Bold, 11.0, TOTAL_X, y, dollars(self.total_usd())));
        y -= 6.0;
        marks.push(text(
            Font::Regular,
            9.0,
            QUANTITY_X,
            y,
            format!("Payment term: {}", self.formatted_date()),
        ));

        y -= 16.0;
        marks.push(text(Font::Bold, 10.0, MARGIN, y, "Notes"));
        for line in self.notes.lines() {
            y -= 5.5;
            marks.push(text(Font::Regular, 10.0, MARGIN, y, line));
        }

        marks.push(Mark::Rule {
            x1: MARGIN,
            x2: right,
            y: 20.0,
        });
        marks.push(text(Font::Regular, 8.0, MARGIN, 14.0, &self.footer));
        marks.push(text(Font::Regular, 8.0, right - 14.0, 14.0, "Page 1/1"));

        marks
    }

    /// Renders the invoice; `logo` is the PNG placed above the company block.
    pub fn to_pdf(&self, logo: Option<&[u8]>) -> AppResult<Vec<u8>> {
        render::render(&self.title(), &self.marks(), logo)
    }
}

fn dollars(amount: u32) -> String {
    format!("${amount}.00")
}

fn party_block(marks: &mut Vec<Mark>, x: f32, y: f32, party: &Party) {
    marks.push(text(Font::Bold, 11.0, x, y, &party.name));
    marks.push(text(Font::Regular, 10.0, x, y - 5.5, &party.address));
    marks.push(text(Font::Regular, 10.0, x, y - 10.5, &party.address2));
    marks.push(text(Font::Regular, 10.0, x, y - 15.5, &party.postal_code));
}
