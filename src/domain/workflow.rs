//! Order fulfilment workflow: a single forward-only status ladder with
//! document gates on the shipping transitions.
//!
//! The backend owns cancellation and the actual writes; this module owns
//! the one transition table every view consults, so no page carries its
//! own switch over raw status codes.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::entities::{DocumentKind, Order, OrderId};

/// Lifecycle of a purchase order. Wire format is the numeric code 0..=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrderStatus {
    Requested,
    Pending,
    Processing,
    Shipped,
    PendingInvoice,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn code(self) -> u8 {
        match self {
            OrderStatus::Requested => 0,
            OrderStatus::Pending => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Shipped => 3,
            OrderStatus::PendingInvoice => 4,
            OrderStatus::Completed => 5,
            OrderStatus::Cancelled => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(OrderStatus::Requested),
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Processing),
            3 => Some(OrderStatus::Shipped),
            4 => Some(OrderStatus::PendingInvoice),
            5 => Some(OrderStatus::Completed),
            6 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Requested => "Requested",
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::PendingInvoice => "Pending Invoice",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed and Cancelled absorb; nothing advances out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The one forward successor. Total on the five non-terminal states,
    /// `None` on the terminals.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Requested => Some(OrderStatus::Pending),
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::PendingInvoice),
            OrderStatus::PendingInvoice => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        OrderStatus::from_code(code).ok_or_else(|| format!("unknown order status code {code}"))
    }
}

/// Receiving document required to *enter* a status, if any.
pub fn required_document(target: OrderStatus) -> Option<DocumentKind> {
    match target {
        OrderStatus::Shipped => Some(DocumentKind::Challan),
        OrderStatus::PendingInvoice => Some(DocumentKind::Grn),
        _ => None,
    }
}

/// Outcome of asking "can this order advance right now?".
#[derive(Clone, Debug, PartialEq)]
pub enum AdvanceDecision {
    /// Clear to issue the status PATCH for the given target.
    Advance(OrderStatus),
    /// The transition is gated on a document that is not attached yet.
    NeedsDocument {
        target: OrderStatus,
        required: DocumentKind,
    },
    /// Terminal state, no successor.
    Terminal,
}

/// Gate check for the one-click advance action. Never mutates the order;
/// a refused advance leaves status exactly where it was.
pub fn check_advance(order: &Order) -> AdvanceDecision {
    let Some(target) = order.status.next() else {
        return AdvanceDecision::Terminal;
    };

    match required_document(target) {
        Some(required) if !order.has_receiving(required) => AdvanceDecision::NeedsDocument {
            target,
            required,
        },
        _ => AdvanceDecision::Advance(target),
    }
}

/// A refused advance captured while the upload dialog is open. The intent
/// survives exactly until a matching upload succeeds or the dialog is
/// dismissed; either way it is consumed, never silently re-applied.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTransition {
    pub order_id: OrderId,
    pub target: OrderStatus,
    pub required: DocumentKind,
}

impl PendingTransition {
    pub fn for_order(order: &Order) -> Option<Self> {
        match check_advance(order) {
            AdvanceDecision::NeedsDocument { target, required } => Some(Self {
                order_id: order.id.clone(),
                target,
                required,
            }),
            _ => None,
        }
    }

    /// Only an upload of the armed kind releases the gate; any other kind
    /// leaves the pending intent to be discarded by the caller.
    pub fn satisfied_by(&self, uploaded: DocumentKind) -> bool {
        uploaded == self.required
    }
}

/// Client-emitted analytics payload for a successful transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusChangeEvent {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Seconds from order creation to completion; only set on the terminal
    /// Completed transition.
    pub completed_in_seconds: Option<i64>,
}

pub fn status_change_event(
    order: &Order,
    from: OrderStatus,
    to: OrderStatus,
    now: OffsetDateTime,
) -> StatusChangeEvent {
    let completed_in_seconds = (to == OrderStatus::Completed)
        .then(|| (now - order.created_at).whole_seconds())
        .filter(|elapsed| *elapsed >= 0);

    StatusChangeEvent {
        order_id: order.id.clone(),
        from,
        to,
        completed_in_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AddressSnapshot, OrderDocument};

    fn order(status: OrderStatus) -> Order {
        Order {
            id: "ord-1".to_string(),
            order_number: "PO-2024-0001".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Acme Fabrication".to_string(),
            status,
            items: Vec::new(),
            total_amount: 600.0,
            total_gst_amount: 108.0,
            final_amount: 708.0,
            billing_address: AddressSnapshot::default(),
            shipping_address: AddressSnapshot::default(),
            customer_po_number: Some("ACME-77".to_string()),
            receivings: Vec::new(),
            invoices: Vec::new(),
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        }
    }

    fn receiving(kind: DocumentKind) -> OrderDocument {
        OrderDocument {
            id: "doc-1".to_string(),
            kind,
            file_name: "scan.pdf".to_string(),
            reference: None,
            uploaded_at: OffsetDateTime::from_unix_timestamp(1_700_000_500).unwrap(),
        }
    }

    #[test]
    fn successor_is_total_on_non_terminal_states() {
        for code in 0..=4 {
            let status = OrderStatus::from_code(code).unwrap();
            let next = status.next().expect("non-terminal states have a successor");
            assert_eq!(next.code(), code + 1);
        }
        assert_eq!(OrderStatus::Completed.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn codes_round_trip() {
        for code in 0..=6 {
            assert_eq!(OrderStatus::from_code(code).unwrap().code(), code);
        }
        assert_eq!(OrderStatus::from_code(7), None);
    }

    #[test]
    fn shipping_is_gated_on_a_challan() {
        let mut order = order(OrderStatus::Processing);

        assert_eq!(
            check_advance(&order),
            AdvanceDecision::NeedsDocument {
                target: OrderStatus::Shipped,
                required: DocumentKind::Challan,
            }
        );
        // Refusal left the order untouched.
        assert_eq!(order.status, OrderStatus::Processing);

        // An invoice does not open the gate.
        order.invoices.push(receiving(DocumentKind::Invoice));
        assert!(matches!(
            check_advance(&order),
            AdvanceDecision::NeedsDocument { .. }
        ));

        order.receivings.push(receiving(DocumentKind::Challan));
        assert_eq!(
            check_advance(&order),
            AdvanceDecision::Advance(OrderStatus::Shipped)
        );

        // Applying the advance once moves the order exactly one step, and
        // the next gate is the GRN.
        order.status = OrderStatus::Shipped;
        assert_eq!(
            check_advance(&order),
            AdvanceDecision::NeedsDocument {
                target: OrderStatus::PendingInvoice,
                required: DocumentKind::Grn,
            }
        );
    }

    #[test]
    fn ungated_transitions_advance_directly() {
        assert_eq!(
            check_advance(&order(OrderStatus::Requested)),
            AdvanceDecision::Advance(OrderStatus::Pending)
        );
        assert_eq!(
            check_advance(&order(OrderStatus::PendingInvoice)),
            AdvanceDecision::Advance(OrderStatus::Completed)
        );
    }

    #[test]
    fn terminal_states_refuse_to_advance() {
        assert_eq!(check_advance(&order(OrderStatus::Completed)), AdvanceDecision::Terminal);
        assert_eq!(check_advance(&order(OrderStatus::Cancelled)), AdvanceDecision::Terminal);
    }

    #[test]
    fn pending_transition_matches_only_the_armed_kind() {
        let order = order(OrderStatus::Processing);
        let pending = PendingTransition::for_order(&order).unwrap();

        assert_eq!(pending.target, OrderStatus::Shipped);
        assert_eq!(pending.required, DocumentKind::Challan);
        assert!(pending.satisfied_by(DocumentKind::Challan));
        assert!(!pending.satisfied_by(DocumentKind::Grn));
        assert!(!pending.satisfied_by(DocumentKind::Invoice));
    }

    #[test]
    fn completion_event_carries_elapsed_seconds() {
        let order = order(OrderStatus::PendingInvoice);
        let now = order.created_at + time::Duration::hours(48);

        let event =
            status_change_event(&order, OrderStatus::PendingInvoice, OrderStatus::Completed, now);
        assert_eq!(event.completed_in_seconds, Some(48 * 3600));

        let event = status_change_event(&order, OrderStatus::Pending, OrderStatus::Processing, now);
        assert_eq!(event.completed_in_seconds, None);
    }
}
