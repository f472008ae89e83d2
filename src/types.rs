//! Contains all the core data structures and types for the Yaaldug platform.
//!
//! These types mirror the entity shapes of the original application data,
//! designed to be serialized to and deserialized from JSON with camelCase
//! field names. We use the `serde` library for robust and efficient JSON
//! handling.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::content::ContentBlock;

// --- Pricing ---

/// Charged for a course whose price is missing or not positive.
pub const DEFAULT_COURSE_PRICE: f64 = 10.0;

/// A subscription amount above this threshold buys a yearly plan.
pub const YEARLY_AMOUNT_THRESHOLD: f64 = 50.0;

// --- Role and Status Enums ---

/// Platform role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Teacher,
    ContentManager,
    Admin,
}

/// Settlement state of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

/// Mobile-money provider (or card rail) used at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Zaad,
    EvcPlus,
    Edahab,
    Stripe,
}

/// What a payment buys: one course, or platform-wide access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    CoursePurchase,
    Subscription,
}

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

/// Interface language of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Somali,
    English,
}

// --- Course Catalog Types ---

/// One tile in the course category rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

/// A single lesson inside a course, holding its ordered content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub lesson_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display duration, e.g. `"15:45"`.
    pub duration: String,
    pub order: u32,
    /// Free-to-view regardless of the course's premium flag.
    pub is_preview: bool,
    pub content_blocks: Vec<ContentBlock>,
}

/// A published (or draft) course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub instructor: String,
    pub thumbnail: String,
    pub lessons: Vec<Lesson>,
    pub is_premium: bool,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Looks up a lesson by identifier.
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.lesson_id == lesson_id)
    }

    /// The amount charged at checkout. A missing or non-positive price
    /// falls back to [`DEFAULT_COURSE_PRICE`].
    pub fn charge_amount(&self) -> f64 {
        self.price
            .filter(|p| *p > 0.0)
            .unwrap_or(DEFAULT_COURSE_PRICE)
    }
}

// --- User and Subscription Types ---

/// A platform-wide entitlement attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Whether the subscription currently grants premium access.
    ///
    /// Requires both an `ACTIVE` status and an end date in the future; a
    /// subscription past its end date grants nothing even if its status was
    /// never flipped to `EXPIRED`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date > now
    }
}

/// An authenticated account, carrying enrollment and progress state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    /// Course id -> integer completion percentage in `[0, 100]`.
    #[serde(default)]
    pub progress: HashMap<String, u8>,
    #[serde(default)]
    pub completed_lessons: HashSet<String>,
    /// Lesson id -> resume position in seconds.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub lesson_resumes: HashMap<String, u32>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

impl User {
    /// Whether the user's enrolled list contains the course.
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|c| c == course_id)
    }

    /// The recorded completion percentage for a course, 0 when absent.
    pub fn progress_for(&self, course_id: &str) -> u8 {
        self.progress.get(course_id).copied().unwrap_or(0)
    }

    /// Whether the user holds a subscription active at `now`.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.subscription
            .as_ref()
            .map(|s| s.is_active(now))
            .unwrap_or(false)
    }
}

// --- Payment Types ---

/// A locally synthesized payment record.
///
/// Payments are fabricated client-side at the moment the learner submits a
/// mobile-money reference code; there is no processor round trip and no
/// server-side verification of the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentKind,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Pricing Page Types ---

/// A subscription offer shown on the pricing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration: SubscriptionPlan,
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
}

// --- Tutor Chat Types ---

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    /// The lowercase role string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One turn of the tutor transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

// --- Navigation ---

/// The screens a front end built on this core navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Courses,
    CourseDetail,
    Profile,
    Auth,
    Admin,
    AiTutor,
    Pricing,
    History,
    Community,
}

// --- Identifier Helpers ---

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A random lowercase base36 string of `len` characters.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// A prefixed random identifier, e.g. `fresh_id("pay", 9)` -> `"pay_k3j9x02mf"`.
pub fn fresh_id(prefix: &str, len: usize) -> String {
    format!("{}_{}", prefix, random_suffix(len))
}
