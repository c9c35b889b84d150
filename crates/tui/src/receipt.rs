//! Plain-text receipt rendering.
//!
//! Line items come from the stored breakdown data (per-kg amounts for
//! refills and swipes, flat amounts for outright sales); the totals at the
//! bottom are the authoritative stored fields, never recomputed here.

use api_types::{customer::CustomerView, transaction::TransactionView};
use chrono::DateTime;
use chrono_tz::Tz;
use engine::Money;

const WIDTH: usize = 46;

pub fn render(customer: &CustomerView, tx: &TransactionView, tz: Tz) -> String {
    let mut out = String::new();
    let line = "-".repeat(WIDTH);

    center(&mut out, "SILINDA GAS SUPPLIES");
    center(&mut out, "Cylinder Sales & Refills");
    out.push_str(&line);
    out.push('\n');

    let number = tx.transaction_number.as_deref().unwrap_or("-");
    push_pair(&mut out, "Receipt No.", number);
    push_pair(&mut out, "Date", &format_date(tx.date, tz));
    push_pair(&mut out, "Customer", &customer.name);
    push_pair(&mut out, "Phone", &customer.phone);
    out.push_str(&line);
    out.push('\n');

    let mut any_item = false;
    if let Some(returns) = &tx.returns_breakdown {
        for (label, count, price, kg) in [
            ("6kg refill", returns.max_empty.kg6, returns.max_empty.price6, 6),
            ("13kg refill", returns.max_empty.kg13, returns.max_empty.price13, 13),
            ("50kg refill", returns.max_empty.kg50, returns.max_empty.price50, 50),
            ("6kg swipe", returns.swap_empty.kg6, returns.swap_empty.price6, 6),
            ("13kg swipe", returns.swap_empty.kg13, returns.swap_empty.price13, 13),
            ("50kg swipe", returns.swap_empty.kg50, returns.swap_empty.price50, 50),
        ] {
            if count > 0 {
                let amount = Money::from_cents(i64::from(count) * price * kg);
                push_item(&mut out, &format!("{label} x{count}"), amount);
                any_item = true;
            }
        }
        for (label, count) in [
            ("6kg full return", returns.return_full.kg6),
            ("13kg full return", returns.return_full.kg13),
            ("50kg full return", returns.return_full.kg50),
        ] {
            if count > 0 {
                push_item(&mut out, &format!("{label} x{count}"), Money::ZERO);
                any_item = true;
            }
        }
    }
    if let Some(outright) = &tx.outright_breakdown {
        for (label, count, price) in [
            ("6kg new cylinder", outright.kg6, outright.price6),
            ("13kg new cylinder", outright.kg13, outright.price13),
            ("50kg new cylinder", outright.kg50, outright.price50),
        ] {
            if count > 0 {
                let amount = Money::from_cents(i64::from(count) * price);
                push_item(&mut out, &format!("{label} x{count}"), amount);
                any_item = true;
            }
        }
    }
    if !any_item {
        out.push_str("(no line detail on file)\n");
    }

    out.push_str(&line);
    out.push('\n');
    push_item(&mut out, "TOTAL", Money::from_cents(tx.total_bill));
    push_item(&mut out, "Paid", Money::from_cents(tx.amount_paid));
    push_item(&mut out, "Outstanding", Money::from_cents(tx.financial_balance));
    push_pair(
        &mut out,
        "Payment",
        match tx.payment_method {
            api_types::transaction::PaymentMethod::Cash => "cash",
            api_types::transaction::PaymentMethod::Mpesa => "m-pesa",
            api_types::transaction::PaymentMethod::Card => "card",
            api_types::transaction::PaymentMethod::Transfer => "transfer",
            api_types::transaction::PaymentMethod::Credit => "credit",
        },
    );
    push_pair(
        &mut out,
        "Cylinders owed",
        &format!(
            "{} (6kg {}, 13kg {}, 50kg {})",
            tx.cylinder_balance,
            tx.cylinder_balance_6kg,
            tx.cylinder_balance_13kg,
            tx.cylinder_balance_50kg
        ),
    );
    if let Some(notes) = &tx.notes {
        push_pair(&mut out, "Notes", notes);
    }
    out.push_str(&line);
    out.push('\n');
    center(&mut out, "Thank you for your business");
    out
}

fn format_date(date: DateTime<chrono::FixedOffset>, tz: Tz) -> String {
    date.with_timezone(&tz).format("%d %b %Y %H:%M").to_string()
}

fn center(out: &mut String, text: &str) {
    let pad = WIDTH.saturating_sub(text.len()) / 2;
    out.push_str(&" ".repeat(pad));
    out.push_str(text);
    out.push('\n');
}

fn push_pair(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label}: {value}\n"));
}

fn push_item(out: &mut String, label: &str, amount: Money) {
    let amount = amount.to_string();
    let pad = WIDTH.saturating_sub(label.len() + amount.len());
    out.push_str(&format!("{label}{}{amount}\n", " ".repeat(pad.max(1))));
}

#[cfg(test)]
mod tests {
    use api_types::transaction as wire;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn sample_customer() -> CustomerView {
        CustomerView {
            id: Uuid::new_v4(),
            name: "Jane Wanjiku".to_string(),
            phone: "0712000001".to_string(),
            email: None,
            location: "Kasarani".to_string(),
            county: "Nairobi".to_string(),
            address: "Kasarani, Nairobi".to_string(),
            category: api_types::customer::CustomerCategory::Regular,
            created_at: Utc::now().fixed_offset(),
            last_transaction_date: None,
            total_billed: 162_000,
            total_paid: 81_000,
            financial_balance: 81_000,
            cylinder_balance_6kg: 0,
            cylinder_balance_13kg: 0,
            cylinder_balance_50kg: 0,
            cylinder_balance: 0,
        }
    }

    fn sample_transaction() -> wire::TransactionView {
        wire::TransactionView {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            date: Utc
                .with_ymd_and_hms(2026, 7, 1, 9, 30, 0)
                .unwrap()
                .fixed_offset(),
            load_breakdown: Some(wire::Counts {
                kg6: 2,
                kg13: 0,
                kg50: 0,
            }),
            returns_breakdown: Some(wire::ReturnsBreakdown {
                max_empty: wire::PricedCounts {
                    kg6: 2,
                    kg13: 0,
                    kg50: 0,
                    price6: 13_500,
                    price13: 13_500,
                    price50: 13_500,
                },
                swap_empty: wire::PricedCounts {
                    price6: 16_000,
                    price13: 16_000,
                    price50: 16_000,
                    ..Default::default()
                },
                return_full: wire::Counts::default(),
            }),
            outright_breakdown: Some(wire::PricedCounts {
                kg50: 1,
                price6: 220_000,
                price13: 440_000,
                price50: 800_000,
                ..Default::default()
            }),
            total_load: 2,
            total_returns: 2,
            total_bill: 962_000,
            amount_paid: 81_000,
            financial_balance: 881_000,
            cylinder_balance_6kg: 0,
            cylinder_balance_13kg: 0,
            cylinder_balance_50kg: -1,
            cylinder_balance: -1,
            payment_method: wire::PaymentMethod::Mpesa,
            notes: Some("regular weekly order".to_string()),
            transaction_number: Some("A0042".to_string()),
        }
    }

    #[test]
    fn receipt_lists_items_and_authoritative_totals() {
        let text = render(
            &sample_customer(),
            &sample_transaction(),
            chrono_tz::Africa::Nairobi,
        );

        assert!(text.contains("Receipt No.: A0042"));
        assert!(text.contains("Jane Wanjiku"));
        // Refill line priced per kg: 2 * 135 * 6 = 1620.
        assert!(text.contains("6kg refill x2"));
        assert!(text.contains("Ksh 1,620.00"));
        // Outright line flat: 8000.
        assert!(text.contains("50kg new cylinder x1"));
        assert!(text.contains("Ksh 8,000.00"));
        // Totals come from the stored fields.
        assert!(text.contains("TOTAL"));
        assert!(text.contains("Ksh 9,620.00"));
        assert!(text.contains("Outstanding"));
        assert!(text.contains("Ksh 8,810.00"));
        assert!(text.contains("Cylinders owed: -1"));
        // Nairobi is UTC+3.
        assert!(text.contains("01 Jul 2026 12:30"));
    }

    #[test]
    fn receipt_without_breakdowns_still_renders_totals() {
        let mut tx = sample_transaction();
        tx.returns_breakdown = None;
        tx.outright_breakdown = None;
        let text = render(&sample_customer(), &tx, chrono_tz::Africa::Nairobi);
        assert!(text.contains("(no line detail on file)"));
        assert!(text.contains("Ksh 9,620.00"));
    }
}
