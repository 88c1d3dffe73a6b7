/*!
 * Order-confirmation mail fan-out.
 *
 * Mail is composed here and handed to a [`MailTransport`]. The HTTP transport
 * posts to an external relay; when none is configured every message is written
 * to the log instead. Dispatch runs in a spawned task after the order response
 * has been sent, so failures are logged and never surfaced to the shopper.
 */

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::services::orders::PlacedOrder;

#[derive(Debug, Clone, Serialize)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), ServiceError>;
}

/// Posts mail as JSON to an HTTP relay endpoint.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(mail)
            .send()
            .await
            .map_err(|e| ServiceError::InternalError(format!("mail relay unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::InternalError(format!(
                "mail relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Fallback transport that writes the message to the log.
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), ServiceError> {
        info!(to = %mail.to, subject = %mail.subject, "mail transport not configured; logging instead");
        Ok(())
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11 | 12 | 13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Formats a pickup date like "March 3rd 2026".
pub fn format_pickup_date(at: DateTime<Utc>) -> String {
    let day = at.day();
    format!(
        "{} {}{} {}",
        at.format("%B"),
        day,
        ordinal_suffix(day),
        at.year()
    )
}

/// Formats a pickup time like "4:05:09 pm".
pub fn format_pickup_time(at: DateTime<Utc>) -> String {
    at.format("%-I:%M:%S %P").to_string()
}

fn line_item_rows(placed: &PlacedOrder) -> String {
    placed
        .order
        .items
        .iter()
        .map(|line| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                line.item_name, line.quantity, line.price
            )
        })
        .collect()
}

fn order_table(placed: &PlacedOrder) -> String {
    format!(
        "<table border=\"1\"><tr><th>Item</th><th>Quantity</th><th>Price</th></tr>{}</table>\
         <p>Total: {}</p>",
        line_item_rows(placed),
        placed.order.total_amount
    )
}

fn pickup_line(placed: &PlacedOrder) -> String {
    format!(
        "Pickup on {} at {}",
        format_pickup_date(placed.order.pick_up_time),
        format_pickup_time(placed.order.pick_up_time)
    )
}

fn admin_mail_body(placed: &PlacedOrder) -> String {
    format!(
        "<h2>New order {} at {}</h2><p>Placed by {} ({}).</p><p>{}</p>{}",
        placed.order.order_no,
        placed.store.store_name,
        placed.order.customer_name,
        placed.order.customer_phone,
        pickup_line(placed),
        order_table(placed)
    )
}

fn store_mail_body(placed: &PlacedOrder) -> String {
    format!(
        "<h2>You have a new order: {}</h2><p>{} will pick it up. Contact: {}.</p><p>{}</p>{}",
        placed.order.order_no,
        placed.order.customer_name,
        placed.order.customer_phone,
        pickup_line(placed),
        order_table(placed)
    )
}

fn customer_mail_body(placed: &PlacedOrder) -> String {
    format!(
        "<h2>Thanks for your order, {}!</h2>\
         <p>Your order {} at {} is confirmed.</p><p>{}</p>{}",
        placed.order.customer_name,
        placed.order.order_no,
        placed.store.store_name,
        pickup_line(placed),
        order_table(placed)
    )
}

/// Composes and dispatches the three order-confirmation mails.
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    admin_email: String,
    from: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, admin_email: String, from: String) -> Self {
        Self {
            transport,
            admin_email,
            from,
        }
    }

    /// Sends the fan-out for a placed order: platform admin, the store, and
    /// the customer when an email was supplied. Failures are logged per
    /// recipient; one failed send never stops the others.
    #[instrument(skip(self, placed), fields(order_no = %placed.order.order_no))]
    pub async fn send_order_notifications(&self, placed: &PlacedOrder) {
        let subject = format!("Order {} at {}", placed.order.order_no, placed.store.store_name);

        let mut mails = vec![
            OutboundMail {
                from: self.from.clone(),
                to: self.admin_email.clone(),
                subject: subject.clone(),
                html: admin_mail_body(placed),
            },
            OutboundMail {
                from: self.from.clone(),
                to: placed.store.email.clone(),
                subject: subject.clone(),
                html: store_mail_body(placed),
            },
        ];
        if let Some(customer_email) = &placed.order.customer_email {
            mails.push(OutboundMail {
                from: self.from.clone(),
                to: customer_email.clone(),
                subject,
                html: customer_mail_body(placed),
            });
        }

        for mail in &mails {
            if let Err(e) = self.transport.send(mail).await {
                error!(error = %e, to = %mail.to, "order notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pickup_date_uses_ordinal_day() {
        let at = Utc.with_ymd_and_hms(2026, 3, 3, 16, 5, 9).unwrap();
        assert_eq!(format_pickup_date(at), "March 3rd 2026");

        let first = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_pickup_date(first), "January 1st 2026");

        let teens = Utc.with_ymd_and_hms(2026, 7, 12, 0, 0, 0).unwrap();
        assert_eq!(format_pickup_date(teens), "July 12th 2026");

        let twenty_second = Utc.with_ymd_and_hms(2026, 9, 22, 0, 0, 0).unwrap();
        assert_eq!(format_pickup_date(twenty_second), "September 22nd 2026");
    }

    #[test]
    fn pickup_time_is_twelve_hour_clock() {
        let afternoon = Utc.with_ymd_and_hms(2026, 3, 3, 16, 5, 9).unwrap();
        assert_eq!(format_pickup_time(afternoon), "4:05:09 pm");

        let morning = Utc.with_ymd_and_hms(2026, 3, 3, 9, 30, 0).unwrap();
        assert_eq!(format_pickup_time(morning), "9:30:00 am");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(31), "st");
    }
}
