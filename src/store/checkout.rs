//! The mock mobile-money checkout, modeled as an explicit state machine.
//!
//! `selection -> processing -> verification -> completed`, with two extra
//! resting states: `already_purchased` (entered straight away when the item
//! is a course the buyer owns) and `cancelled`. Processing is a fixed-delay
//! simulation of waiting for the provider's confirmation SMS; verification
//! trusts whatever non-empty reference code the learner types. No network
//! traffic and no processor exist behind this flow.

use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::types::{
    fresh_id, Course, Payment, PaymentKind, PaymentMethod, PaymentStatus, Plan, User,
};

/// How long the simulated provider takes to "confirm" a payment.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// What is being paid for.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutItem {
    Course(Course),
    Subscription { title: String, price: f64 },
}

impl CheckoutItem {
    /// A subscription item for a pricing-page plan.
    pub fn for_plan(plan: &Plan) -> Self {
        CheckoutItem::Subscription {
            title: plan.name.clone(),
            price: plan.price,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CheckoutItem::Course(course) => &course.title,
            CheckoutItem::Subscription { title, .. } => title,
        }
    }

    /// The amount to charge: a course's price (with the default fallback) or
    /// the plan price.
    pub fn amount(&self) -> f64 {
        match self {
            CheckoutItem::Course(course) => course.charge_amount(),
            CheckoutItem::Subscription { price, .. } => *price,
        }
    }

    pub fn kind(&self) -> PaymentKind {
        match self {
            CheckoutItem::Course(_) => PaymentKind::CoursePurchase,
            CheckoutItem::Subscription { .. } => PaymentKind::Subscription,
        }
    }

    pub fn course_id(&self) -> Option<&str> {
        match self {
            CheckoutItem::Course(course) => Some(&course.course_id),
            CheckoutItem::Subscription { .. } => None,
        }
    }
}

/// Where the flow currently rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Dead end reached before selection: the buyer already owns the course.
    AlreadyPurchased,
    /// Choosing a payment method.
    Selection,
    /// Waiting out the simulated provider delay.
    Processing,
    /// Waiting for the learner to type the reference code.
    Verification,
    /// A payment was synthesized; the flow is finished.
    Completed,
    /// The learner left; the flow is finished.
    Cancelled,
}

/// One checkout attempt for one buyer and one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutFlow {
    item: CheckoutItem,
    buyer_id: String,
    buyer_name: String,
    method: PaymentMethod,
    reference: String,
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Opens a flow for `buyer`. A course the buyer is already enrolled in
    /// short-circuits to [`CheckoutState::AlreadyPurchased`] before the
    /// method selection ever shows.
    pub fn begin(item: CheckoutItem, buyer: &User) -> Self {
        let duplicate = item
            .course_id()
            .map(|id| buyer.is_enrolled(id))
            .unwrap_or(false);
        let state = if duplicate {
            CheckoutState::AlreadyPurchased
        } else {
            CheckoutState::Selection
        };
        info!(item = item.title(), ?state, "checkout opened");

        Self {
            item,
            buyer_id: buyer.user_id.clone(),
            buyer_name: buyer.name.clone(),
            method: PaymentMethod::EvcPlus,
            reference: String::new(),
            state,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn item(&self) -> &CheckoutItem {
        &self.item
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// The reference code as typed so far, already upper-cased.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether the flow has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            CheckoutState::Completed | CheckoutState::Cancelled
        )
    }

    /// Picks a payment method. Only honored during selection.
    pub fn select_method(&mut self, method: PaymentMethod) -> bool {
        if self.state != CheckoutState::Selection {
            return false;
        }
        self.method = method;
        true
    }

    /// Confirms the selection and enters processing.
    pub fn start(&mut self) -> bool {
        if self.state != CheckoutState::Selection {
            return false;
        }
        self.state = CheckoutState::Processing;
        info!(method = ?self.method, "payment processing started");
        true
    }

    /// Lands the simulated provider confirmation: processing -> verification.
    pub fn complete_processing(&mut self) -> bool {
        if self.state != CheckoutState::Processing {
            return false;
        }
        self.state = CheckoutState::Verification;
        true
    }

    /// Drives selection through the simulated provider delay into
    /// verification. Returns `false` without waiting when the flow is not
    /// at selection.
    pub async fn process(&mut self) -> bool {
        if !self.start() {
            return false;
        }
        sleep(PROCESSING_DELAY).await;
        self.complete_processing()
    }

    /// Records the learner's reference code, upper-casing it as typed.
    pub fn enter_reference(&mut self, raw: &str) {
        self.reference = raw.to_uppercase();
    }

    /// Whether verification can be submitted: at the verification step with
    /// a non-blank reference code.
    pub fn can_verify(&self) -> bool {
        self.state == CheckoutState::Verification && !self.reference.trim().is_empty()
    }

    /// Submits the reference code, completing the flow and synthesizing the
    /// SUCCESS payment. Returns `None` while [`can_verify`] would: the
    /// submit stays blocked on a blank code or outside verification.
    ///
    /// [`can_verify`]: CheckoutFlow::can_verify
    pub fn verify(&mut self) -> Option<Payment> {
        if !self.can_verify() {
            return None;
        }

        let payment = Payment {
            payment_id: fresh_id("pay", 9),
            user_id: self.buyer_id.clone(),
            user_name: self.buyer_name.clone(),
            course_id: self.item.course_id().map(str::to_string),
            amount: self.item.amount(),
            currency: "USD".to_string(),
            payment_method: self.method,
            payment_type: self.item.kind(),
            status: PaymentStatus::Success,
            reference: Some(self.reference.clone()),
            created_at: Utc::now(),
        };
        self.state = CheckoutState::Completed;
        info!(
            payment_id = %payment.payment_id,
            amount = payment.amount,
            kind = ?payment.payment_type,
            "payment verified"
        );
        Some(payment)
    }

    /// Abandons the flow. Allowed from every state that is not already
    /// finished, the simulated processing and verification waits included.
    pub fn cancel(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.state = CheckoutState::Cancelled;
        info!("checkout cancelled");
        true
    }
}
