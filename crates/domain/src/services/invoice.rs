//! Invoice totals and PDF rendering.
//!
//! Rendering is a pure function of the order snapshot: no clock reads, no
//! I/O, identical input produces identical bytes. Callers treat a renderer
//! failure as "invoices unavailable", never as a fatal error.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Order, Restaurant};

/// Error type for invoice rendering.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Failed to encode page content: {0}")]
    Content(String),

    #[error("Failed to serialize document: {0}")]
    Serialize(String),
}

/// One renderable invoice line: the order item joined with its dish name.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl InvoiceLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Subtotal and the two flat-rate GST components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub grand_total: Decimal,
}

/// CGST and SGST are each 2.5% of the subtotal.
fn gst_rate() -> Decimal {
    Decimal::new(25, 3) // 0.025
}

impl InvoiceTotals {
    pub fn compute(lines: &[InvoiceLine]) -> Self {
        let subtotal: Decimal = lines.iter().map(InvoiceLine::line_total).sum();
        let cgst = subtotal * gst_rate();
        let sgst = subtotal * gst_rate();
        let grand_total = subtotal + cgst + sgst;
        Self {
            subtotal,
            cgst,
            sgst,
            grand_total,
        }
    }
}

const PAGE_WIDTH: f32 = 595.0; // A4 portrait, points
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const HEADER_HEIGHT: f32 = 85.0;
const LINE_STEP: f32 = 17.0;
const BOTTOM_LIMIT: f32 = 85.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_OBLIQUE: &str = "F3";

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Crude Helvetica width estimate, good enough to right-align numerals.
fn text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.5
}

/// Accumulates content operations page by page.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT,
        }
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, content: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current
            .push(Operation::new("Tf", vec![font.into(), Object::Real(size)]));
        self.current.push(Operation::new(
            "Td",
            vec![Object::Real(x), Object::Real(y)],
        ));
        self.current
            .push(Operation::new("Tj", vec![Object::string_literal(content)]));
        self.current.push(Operation::new("ET", vec![]));
    }

    fn text_right(&mut self, font: &str, size: f32, right_edge: f32, y: f32, content: &str) {
        let x = right_edge - text_width(content, size);
        self.text(font, size, x, y, content);
    }

    fn fill_color(&mut self, r: f32, g: f32, b: f32) {
        self.current.push(Operation::new(
            "rg",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ));
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.current.push(Operation::new(
            "re",
            vec![
                Object::Real(x),
                Object::Real(y),
                Object::Real(w),
                Object::Real(h),
            ],
        ));
        self.current.push(Operation::new("f", vec![]));
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32) {
        self.current.push(Operation::new(
            "RG",
            vec![
                Object::Real(0.83),
                Object::Real(0.83),
                Object::Real(0.83),
            ],
        ));
        self.current
            .push(Operation::new("w", vec![Object::Real(0.75)]));
        self.current.push(Operation::new(
            "m",
            vec![Object::Real(x1), Object::Real(y)],
        ));
        self.current.push(Operation::new(
            "l",
            vec![Object::Real(x2), Object::Real(y)],
        ));
        self.current.push(Operation::new("S", vec![]));
    }

    /// Finishes the current page and starts a fresh one.
    fn break_page(&mut self) {
        let ops = std::mem::take(&mut self.current);
        self.pages.push(ops);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Renders an order to PDF bytes.
///
/// The restaurant is resolved and validated at order creation, so the
/// renderer never has to guess it from the line items.
pub fn render_pdf(
    order: &Order,
    lines: &[InvoiceLine],
    restaurant: &Restaurant,
) -> Result<Vec<u8>, InvoiceError> {
    let totals = InvoiceTotals::compute(lines);
    let right_edge = PAGE_WIDTH - MARGIN;

    let mut writer = PageWriter::new();

    // Header band
    writer.fill_color(0.97, 0.45, 0.09);
    writer.rect(0.0, PAGE_HEIGHT - HEADER_HEIGHT, PAGE_WIDTH, HEADER_HEIGHT);
    writer.fill_color(1.0, 1.0, 1.0);
    writer.text(
        FONT_BOLD,
        18.0,
        MARGIN,
        PAGE_HEIGHT - HEADER_HEIGHT + 30.0,
        "FoodBooking Invoice",
    );
    writer.fill_color(0.0, 0.0, 0.0);

    // Order metadata block
    let mut y = PAGE_HEIGHT - HEADER_HEIGHT - 22.0;
    let meta = [
        format!("Order ID: {}", order.id),
        format!("Date: {}", order.created_at.format("%b %d, %Y %H:%M")),
        format!("Customer: {}", order.customer_name),
        format!("Phone: {}", order.customer_phone),
        format!("Delivery Address: {}", order.address),
        format!("Payment: {}", order.payment_method),
    ];
    for field in &meta {
        writer.text(FONT_REGULAR, 11.0, MARGIN, y, field);
        y -= 19.0;
    }

    // Restaurant block
    let restaurant_y = PAGE_HEIGHT - HEADER_HEIGHT - 22.0;
    writer.text(FONT_BOLD, 11.0, 340.0, restaurant_y, "Restaurant");
    writer.text(FONT_REGULAR, 10.0, 340.0, restaurant_y - 17.0, &restaurant.name);
    let address = if restaurant.address.is_empty() {
        "-"
    } else {
        &restaurant.address
    };
    let address: String = address.chars().take(38).collect();
    writer.text(FONT_REGULAR, 10.0, 340.0, restaurant_y - 34.0, &address);

    // Item table header
    y -= 10.0;
    writer.rule(MARGIN, right_edge, y);
    y -= 18.0;
    writer.text(FONT_BOLD, 11.0, MARGIN, y, "Item");
    writer.text_right(FONT_BOLD, 11.0, 330.0, y, "Qty");
    writer.text_right(FONT_BOLD, 11.0, 420.0, y, "Price");
    writer.text_right(FONT_BOLD, 11.0, right_edge, y, "Total");
    y -= 8.0;
    writer.rule(MARGIN, right_edge, y);
    y -= LINE_STEP;

    // Item rows, breaking pages as needed
    for line in lines {
        if y < BOTTOM_LIMIT {
            writer.break_page();
            y = writer.y;
        }
        writer.text(FONT_REGULAR, 10.0, MARGIN, y, &line.name);
        writer.text_right(FONT_REGULAR, 10.0, 330.0, y, &line.quantity.to_string());
        writer.text_right(FONT_REGULAR, 10.0, 420.0, y, &money(line.price));
        writer.text_right(FONT_REGULAR, 10.0, right_edge, y, &money(line.line_total()));
        y -= LINE_STEP;
    }

    // Totals block, kept together on one page
    if y < BOTTOM_LIMIT + 80.0 {
        writer.break_page();
        y = writer.y;
    }
    y -= 10.0;
    writer.text_right(
        FONT_REGULAR,
        10.0,
        right_edge,
        y,
        &format!("Subtotal: {}", money(totals.subtotal)),
    );
    y -= 14.0;
    writer.text_right(
        FONT_REGULAR,
        10.0,
        right_edge,
        y,
        &format!("CGST (2.5%): {}", money(totals.cgst)),
    );
    y -= 14.0;
    writer.text_right(
        FONT_REGULAR,
        10.0,
        right_edge,
        y,
        &format!("SGST (2.5%): {}", money(totals.sgst)),
    );
    y -= 18.0;
    writer.text_right(
        FONT_BOLD,
        12.0,
        right_edge,
        y,
        &format!("Grand Total: {}", money(totals.grand_total)),
    );

    // Footer
    y -= 34.0;
    writer.text(
        FONT_OBLIQUE,
        10.0,
        MARGIN,
        y,
        "\"Good food is the foundation of genuine happiness.\"",
    );
    y -= 14.0;
    writer.text(
        FONT_OBLIQUE,
        10.0,
        MARGIN,
        y,
        "Thank you for ordering with FoodBooking!",
    );

    build_document(writer.finish())
}

/// Assembles the page contents into a PDF document.
fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, InvoiceError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let font_oblique = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Oblique",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => font_regular,
            FONT_BOLD => font_bold,
            FONT_OBLIQUE => font_oblique,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let page_count = pages.len() as i64;
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| InvoiceError::Content(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| InvoiceError::Serialize(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::TimeZone;
    use chrono::Utc;
    use uuid::Uuid;

    fn fixed_order() -> Order {
        Order {
            id: Uuid::nil(),
            user_id: None,
            customer_name: "Asha Rao".to_string(),
            customer_phone: "9876543210".to_string(),
            address: "12 MG Road, Bengaluru".to_string(),
            delivery_latitude: None,
            delivery_longitude: None,
            payment_method: PaymentMethod::CashOnDelivery,
            total_amount: "300.00".parse().unwrap(),
            is_paid: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 15, 12, 30, 0).unwrap(),
        }
    }

    fn fixed_restaurant() -> Restaurant {
        Restaurant {
            id: Uuid::nil(),
            name: "Udupi Grand".to_string(),
            address: "45 Church Street".to_string(),
            is_active: true,
            latitude: None,
            longitude: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn line(name: &str, price: &str, quantity: i32) -> InvoiceLine {
        InvoiceLine {
            name: name.to_string(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_totals_example_from_checkout() {
        // Cart {dish_42: 2}, price 150.00
        let totals = InvoiceTotals::compute(&[line("Paneer Tikka", "150.00", 2)]);
        assert_eq!(totals.subtotal, "300.00".parse::<Decimal>().unwrap());
        assert_eq!(totals.cgst, "7.50".parse::<Decimal>().unwrap());
        assert_eq!(totals.sgst, "7.50".parse::<Decimal>().unwrap());
        assert_eq!(totals.grand_total, "315.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_totals_empty_order() {
        let totals = InvoiceTotals::compute(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_totals_deterministic_across_calls() {
        let lines = vec![line("Thali", "220.00", 1), line("Lassi", "60.50", 3)];
        assert_eq!(InvoiceTotals::compute(&lines), InvoiceTotals::compute(&lines));
    }

    #[test]
    fn test_money_always_two_decimals() {
        assert_eq!(money("315".parse().unwrap()), "315.00");
        assert_eq!(money("7.5".parse().unwrap()), "7.50");
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_pdf(
            &fixed_order(),
            &[line("Paneer Tikka", "150.00", 2)],
            &fixed_restaurant(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_is_byte_identical_for_identical_input() {
        let order = fixed_order();
        let restaurant = fixed_restaurant();
        let lines = vec![line("Paneer Tikka", "150.00", 2), line("Naan", "35.00", 4)];
        let first = render_pdf(&order, &lines, &restaurant).unwrap();
        let second = render_pdf(&order, &lines, &restaurant).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_paginates_long_item_lists() {
        let many: Vec<InvoiceLine> = (0..80)
            .map(|i| line(&format!("Dish {}", i), "49.00", 1))
            .collect();
        let long = render_pdf(&fixed_order(), &many, &fixed_restaurant()).unwrap();
        let short = render_pdf(
            &fixed_order(),
            &[line("Dish 0", "49.00", 1)],
            &fixed_restaurant(),
        )
        .unwrap();
        // Two Page objects serialize measurably larger than one
        assert!(long.len() > short.len());
        let needle = b"/Type /Page";
        let count = |hay: &[u8]| hay.windows(needle.len()).filter(|w| w == needle).count();
        assert!(count(&long) > count(&short));
    }
}
