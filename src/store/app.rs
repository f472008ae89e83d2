//! The root state container.
//!
//! `AppStore` owns the single source of truth for a session: the current
//! user (or guest flag), the course catalog, the payment history, the
//! navigation state, the theme and language choices, and the open checkout
//! flow. Screens never own authoritative state; they call the action
//! methods here and re-read the accessors. Every mutation runs
//! synchronously, so no two actions ever interleave.

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::prefs::{Preferences, Theme};
use crate::progress::course_progress;
use crate::seed;
use crate::store::checkout::{CheckoutFlow, CheckoutItem};
use crate::types::{
    fresh_id, random_suffix, Language, Payment, PaymentKind, Plan, Screen, Subscription,
    SubscriptionPlan, SubscriptionStatus, User, UserRole, YEARLY_AMOUNT_THRESHOLD,
};

/// Email recorded for a login submitted with a blank address.
const FALLBACK_EMAIL: &str = "student@yaaldug.so";

/// Display name for a login that yields no usable email prefix.
const FALLBACK_NAME: &str = "Arday Yaaldug";

/// The single source of truth for one application session.
pub struct AppStore {
    current_user: Option<User>,
    is_guest: bool,
    catalog: Catalog,
    /// Every payment the platform knows about; logins filter their own
    /// history out of this.
    seed_payments: Vec<Payment>,
    /// The current user's history, newest first.
    payments: Vec<Payment>,
    screen: Screen,
    selected_course: Option<String>,
    dark_mode: bool,
    language: Language,
    checkout: Option<CheckoutFlow>,
    /// A question queued for the tutor screen, consumed exactly once.
    queued_prompt: Option<String>,
    prefs: Preferences,
}

impl AppStore {
    /// A store over an explicit catalog and payment ledger. The session
    /// starts signed out on the auth screen.
    pub fn new(catalog: Catalog, seed_payments: Vec<Payment>, prefs: Preferences) -> Self {
        Self {
            current_user: None,
            is_guest: false,
            catalog,
            seed_payments,
            payments: Vec::new(),
            screen: Screen::Auth,
            selected_course: None,
            dark_mode: false,
            language: Language::Somali,
            checkout: None,
            queued_prompt: None,
            prefs,
        }
    }

    /// A store booted from the built-in seed data.
    pub fn with_seed_data(prefs: Preferences) -> Self {
        Self::new(Catalog::new(seed::courses()), seed::payments(), prefs)
    }

    // --- Accessors ---

    pub fn user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_guest(&self) -> bool {
        self.is_guest
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable catalog access for the admin builder operations.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// The current user's payment history, newest first.
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_course(&self) -> Option<&str> {
        self.selected_course.as_deref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    /// Mutable access to the open checkout, for driving its transitions.
    pub fn checkout_mut(&mut self) -> Option<&mut CheckoutFlow> {
        self.checkout.as_mut()
    }

    // --- Session Bootstrap & Auth ---

    /// Applies the persisted flags at startup: a stored `"dark"` theme
    /// enables dark mode, and a stored login marker restores the seed
    /// account and lands on the home screen.
    pub fn bootstrap(&mut self) {
        self.dark_mode = self.prefs.theme() == Theme::Dark;
        if self.prefs.is_logged_in() {
            let user = seed::primary_user();
            info!(user_id = %user.user_id, "restoring persisted session");
            self.payments = self
                .seed_payments
                .iter()
                .filter(|p| p.user_id == user.user_id)
                .cloned()
                .collect();
            self.current_user = Some(user);
            self.is_guest = false;
            self.screen = Screen::Home;
        }
    }

    /// Simulated sign-in: fabricates a user record from the submitted email
    /// and opens the home screen. The login marker is persisted so the next
    /// bootstrap restores a session.
    pub fn login(&mut self, email: &str) -> &User {
        let user = fabricate_user(email);
        info!(user_id = %user.user_id, email = %user.email, "login");

        self.payments = self
            .seed_payments
            .iter()
            .filter(|p| p.user_id == user.user_id)
            .cloned()
            .collect();
        self.is_guest = false;
        self.screen = Screen::Home;
        self.prefs.set_logged_in(true);
        self.current_user.insert(user)
    }

    /// Browses without an account. Mutating actions will silently no-op.
    pub fn continue_as_guest(&mut self) {
        info!("continuing as guest");
        self.is_guest = true;
        self.screen = Screen::Home;
    }

    /// Signs out: drops the user, removes the persisted login marker, and
    /// returns to the auth screen.
    pub fn logout(&mut self) {
        info!("logout");
        self.current_user = None;
        self.is_guest = false;
        self.payments.clear();
        self.checkout = None;
        self.prefs.set_logged_in(false);
        self.screen = Screen::Auth;
    }

    // --- Navigation, Theme & Language ---

    pub fn navigate(&mut self, screen: Screen) {
        debug!(?screen, "navigate");
        self.screen = screen;
    }

    /// Opens a course's detail view. The id is not validated; an unknown
    /// course renders as an empty placeholder downstream.
    pub fn open_course(&mut self, course_id: &str) {
        self.selected_course = Some(course_id.to_string());
        self.screen = Screen::CourseDetail;
    }

    /// Flips dark mode and persists the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        self.dark_mode = !self.dark_mode;
        let theme = if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        };
        self.prefs.set_theme(theme);
        theme
    }

    /// Flips the interface language. Session-only, never persisted.
    pub fn toggle_language(&mut self) -> Language {
        self.language = match self.language {
            Language::Somali => Language::English,
            Language::English => Language::Somali,
        };
        self.language
    }

    // --- Profile ---

    /// Replaces the profile picture. The avatar seed is cleared so the new
    /// image wins over the generated avatar. No-op without a user.
    pub fn set_profile_image(&mut self, url: &str) -> bool {
        let Some(user) = self.current_user.as_mut() else {
            return false;
        };
        user.profile_image = Some(url.to_string());
        user.avatar_seed = None;
        true
    }

    // --- Lesson Completion ---

    /// Flips a lesson's membership in the completed set and recomputes the
    /// owning course's percentage, replacing the progress map copy-on-write.
    ///
    /// Guests, signed-out sessions, and unknown course ids are silent
    /// no-ops. Returns whether anything changed.
    pub fn toggle_lesson(&mut self, course_id: &str, lesson_id: &str) -> bool {
        if self.is_guest {
            return false;
        }
        let Some(course) = self.catalog.course(course_id) else {
            debug!(course_id, "toggle_lesson: unknown course");
            return false;
        };
        let Some(user) = self.current_user.as_mut() else {
            return false;
        };

        if !user.completed_lessons.remove(lesson_id) {
            user.completed_lessons.insert(lesson_id.to_string());
        }
        let percentage = course_progress(course, &user.completed_lessons);

        let mut progress = user.progress.clone();
        progress.insert(course_id.to_string(), percentage);
        user.progress = progress;

        info!(course_id, lesson_id, percentage, "lesson toggled");
        true
    }

    // --- Checkout & Payments ---

    /// Opens a checkout for a catalog course. Requires a signed-in user and
    /// a known course id; a course the buyer already owns opens straight
    /// into the already-purchased terminal.
    pub fn open_course_checkout(&mut self, course_id: &str) -> Option<&CheckoutFlow> {
        let user = self.current_user.as_ref()?;
        let Some(course) = self.catalog.course(course_id) else {
            warn!(course_id, "checkout for unknown course");
            return None;
        };
        self.checkout = Some(CheckoutFlow::begin(
            CheckoutItem::Course(course.clone()),
            user,
        ));
        self.checkout.as_ref()
    }

    /// Opens a subscription checkout for a pricing-page plan.
    pub fn open_plan_checkout(&mut self, plan: &Plan) -> Option<&CheckoutFlow> {
        let user = self.current_user.as_ref()?;
        self.checkout = Some(CheckoutFlow::begin(CheckoutItem::for_plan(plan), user));
        self.checkout.as_ref()
    }

    /// Abandons and closes any open checkout.
    pub fn cancel_checkout(&mut self) {
        if let Some(flow) = self.checkout.as_mut() {
            flow.cancel();
        }
        self.checkout = None;
    }

    /// Submits the open checkout's reference code. When verification
    /// passes, the synthesized payment is applied and the flow closes;
    /// otherwise nothing changes (blank code, wrong state, no flow).
    pub fn submit_checkout(&mut self) -> bool {
        let Some(payment) = self.checkout.as_mut().and_then(CheckoutFlow::verify) else {
            return false;
        };
        self.apply_payment(payment)
    }

    /// Applies a successful payment to the session.
    ///
    /// The payment must already carry `SUCCESS` status; this method trusts
    /// its caller and does not re-check. A course purchase enrolls the user
    /// (never duplicating) and seeds a zero progress entry when none exists;
    /// a subscription payment replaces any prior subscription with a fresh
    /// `ACTIVE` one, plan and length chosen by the amount threshold. The
    /// payment is prepended to history either way, the checkout closes, and
    /// the session lands on the profile screen unless the purchase was made
    /// from inside a course's detail view.
    pub fn apply_payment(&mut self, payment: Payment) -> bool {
        let Some(user) = self.current_user.as_mut() else {
            warn!("apply_payment without a user");
            return false;
        };

        match payment.payment_type {
            PaymentKind::CoursePurchase => {
                if let Some(course_id) = payment.course_id.as_deref() {
                    if !user.is_enrolled(course_id) {
                        user.enrolled_courses.push(course_id.to_string());
                    }
                    if !user.progress.contains_key(course_id) {
                        let mut progress = user.progress.clone();
                        progress.insert(course_id.to_string(), 0);
                        user.progress = progress;
                    }
                    info!(course_id, payment_id = %payment.payment_id, "course enrolled");
                }
            }
            PaymentKind::Subscription => {
                let yearly = payment.amount > YEARLY_AMOUNT_THRESHOLD;
                let start = Utc::now();
                let subscription = Subscription {
                    subscription_id: fresh_id("sub", 5),
                    user_id: user.user_id.clone(),
                    plan: if yearly {
                        SubscriptionPlan::Yearly
                    } else {
                        SubscriptionPlan::Monthly
                    },
                    amount: payment.amount,
                    start_date: start,
                    end_date: start + Duration::days(if yearly { 365 } else { 30 }),
                    status: SubscriptionStatus::Active,
                };
                info!(
                    subscription_id = %subscription.subscription_id,
                    plan = ?subscription.plan,
                    "subscription activated"
                );
                user.subscription = Some(subscription);
            }
        }

        self.payments.insert(0, payment);
        self.checkout = None;
        if self.screen != Screen::CourseDetail {
            self.screen = Screen::Profile;
        }
        true
    }

    // --- Tutor Handoff ---

    /// Queues the "explain this lesson" prompt and jumps to the tutor
    /// screen. No-op when the lesson is unknown.
    pub fn ask_tutor_about(&mut self, course_id: &str, lesson_id: &str) -> bool {
        let Some(lesson) = self.catalog.lesson(course_id, lesson_id) else {
            debug!(course_id, lesson_id, "ask_tutor_about: unknown lesson");
            return false;
        };
        self.queued_prompt = Some(format!(
            "Ma ii sharaxi kartaa casharkan: {}",
            lesson.title
        ));
        self.screen = Screen::AiTutor;
        true
    }

    /// Hands the queued tutor prompt to its consumer. A second call returns
    /// `None` until another prompt is queued.
    pub fn take_queued_prompt(&mut self) -> Option<String> {
        self.queued_prompt.take()
    }
}

/// Builds the simulated login identity: the seed profile template under a
/// fresh random id, student role, and the name taken from the email's local
/// part.
fn fabricate_user(email: &str) -> User {
    let template = seed::primary_user();
    let trimmed = email.trim();
    let (email, name) = if trimmed.is_empty() {
        (FALLBACK_EMAIL.to_string(), FALLBACK_NAME.to_string())
    } else {
        let name = trimmed
            .split('@')
            .next()
            .filter(|part| !part.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string();
        (trimmed.to_string(), name)
    };
    User {
        user_id: random_suffix(9),
        name,
        email,
        role: UserRole::Student,
        ..template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{KeyValueStore, MemoryStore, LOGIN_FLAG_KEY, THEME_KEY};
    use crate::types::{PaymentMethod, PaymentStatus};
    use std::sync::Arc;

    fn store() -> AppStore {
        AppStore::with_seed_data(Preferences::in_memory())
    }

    fn success_payment(kind: PaymentKind, course_id: Option<&str>, amount: f64) -> Payment {
        Payment {
            payment_id: fresh_id("pay", 9),
            user_id: "u7".to_string(),
            user_name: "Arday".to_string(),
            course_id: course_id.map(str::to_string),
            amount,
            currency: "USD".to_string(),
            payment_method: PaymentMethod::EvcPlus,
            payment_type: kind,
            status: PaymentStatus::Success,
            reference: Some("TX1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fresh_store_starts_signed_out_on_auth() {
        let app = store();
        assert!(app.user().is_none());
        assert!(!app.is_guest());
        assert_eq!(app.screen(), Screen::Auth);
        assert!(app.payments().is_empty());
        assert_eq!(app.language(), Language::Somali);
    }

    #[test]
    fn login_fabricates_a_student_from_the_email() {
        let mut app = store();
        let user = app.login("maryan@example.com").clone();
        assert_eq!(user.name, "maryan");
        assert_eq!(user.email, "maryan@example.com");
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.user_id.len(), 9);
        // The seed template's learning state carries over.
        assert!(user.is_enrolled("c1"));
        assert_eq!(app.screen(), Screen::Home);
        assert!(!app.is_guest());
    }

    #[test]
    fn blank_email_login_uses_the_fallback_identity() {
        let mut app = store();
        let user = app.login("  ");
        assert_eq!(user.name, FALLBACK_NAME);
        assert_eq!(user.email, FALLBACK_EMAIL);
    }

    #[test]
    fn login_persists_the_marker_and_logout_removes_it() {
        let kv = Arc::new(MemoryStore::new());
        let mut app = AppStore::with_seed_data(Preferences::new(kv.clone()));

        app.login("arday@yaaldug.so");
        assert_eq!(kv.get(LOGIN_FLAG_KEY), Some("true".to_string()));

        app.logout();
        assert!(app.user().is_none());
        assert_eq!(app.screen(), Screen::Auth);
        assert_eq!(kv.get(LOGIN_FLAG_KEY), None);
    }

    #[test]
    fn bootstrap_restores_theme_and_seed_session() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(THEME_KEY, "dark");
        kv.set(LOGIN_FLAG_KEY, "true");

        let mut app = AppStore::with_seed_data(Preferences::new(kv));
        app.bootstrap();

        assert!(app.dark_mode());
        assert_eq!(app.screen(), Screen::Home);
        let user = app.user().unwrap();
        assert_eq!(user.user_id, seed::primary_user().user_id);
        // Seed history holds nothing for the seed account.
        assert!(app.payments().is_empty());
    }

    #[test]
    fn bootstrap_without_marker_stays_on_auth() {
        let mut app = store();
        app.bootstrap();
        assert!(app.user().is_none());
        assert_eq!(app.screen(), Screen::Auth);
        assert!(!app.dark_mode());
    }

    #[test]
    fn theme_toggle_persists_both_directions() {
        let kv = Arc::new(MemoryStore::new());
        let mut app = AppStore::with_seed_data(Preferences::new(kv.clone()));

        assert_eq!(app.toggle_theme(), Theme::Dark);
        assert_eq!(kv.get(THEME_KEY), Some("dark".to_string()));

        assert_eq!(app.toggle_theme(), Theme::Light);
        assert_eq!(kv.get(THEME_KEY), Some("light".to_string()));
    }

    #[test]
    fn language_toggle_round_trips() {
        let mut app = store();
        assert_eq!(app.toggle_language(), Language::English);
        assert_eq!(app.toggle_language(), Language::Somali);
    }

    #[test]
    fn toggle_lesson_is_an_idempotent_round_trip() {
        let mut app = store();
        app.login("arday@yaaldug.so");
        let before = app.user().unwrap().clone();

        // The seed template already has l1 done at 25%; toggle l2 of c2.
        assert!(app.toggle_lesson("c2", "l2"));
        let mid = app.user().unwrap();
        assert!(mid.completed_lessons.contains("l2"));
        assert_eq!(mid.progress_for("c2"), 100);

        assert!(app.toggle_lesson("c2", "l2"));
        let after = app.user().unwrap();
        assert!(!after.completed_lessons.contains("l2"));
        assert_eq!(after.progress_for("c2"), 0);
        assert_eq!(after.completed_lessons, before.completed_lessons);
    }

    #[test]
    fn toggle_lesson_ignores_guests_and_unknown_courses() {
        let mut app = store();
        app.continue_as_guest();
        assert!(!app.toggle_lesson("c1", "l1"));

        app.login("arday@yaaldug.so");
        let before = app.user().unwrap().clone();
        assert!(!app.toggle_lesson("missing", "l1"));
        assert_eq!(app.user().unwrap(), &before);
    }

    #[test]
    fn course_payment_enrolls_once_and_seeds_zero_progress() {
        let mut app = store();
        app.login("arday@yaaldug.so");

        assert!(app.apply_payment(success_payment(
            PaymentKind::CoursePurchase,
            Some("c2"),
            15.0
        )));
        let user = app.user().unwrap();
        assert_eq!(
            user.enrolled_courses.iter().filter(|c| *c == "c2").count(),
            1
        );
        assert_eq!(user.progress_for("c2"), 0);
        assert_eq!(app.payments().len(), 1);
        assert_eq!(app.screen(), Screen::Profile);

        // Paying again never duplicates the enrollment.
        app.apply_payment(success_payment(
            PaymentKind::CoursePurchase,
            Some("c2"),
            15.0,
        ));
        let user = app.user().unwrap();
        assert_eq!(
            user.enrolled_courses.iter().filter(|c| *c == "c2").count(),
            1
        );
    }

    #[test]
    fn course_payment_keeps_existing_progress() {
        let mut app = store();
        app.login("arday@yaaldug.so");
        // The seed template enters with c1 at 25%.
        assert_eq!(app.user().unwrap().progress_for("c1"), 25);

        app.apply_payment(success_payment(
            PaymentKind::CoursePurchase,
            Some("c1"),
            7.0,
        ));
        assert_eq!(app.user().unwrap().progress_for("c1"), 25);
    }

    #[test]
    fn subscription_amount_threshold_picks_plan_and_length() {
        let mut app = store();
        app.login("arday@yaaldug.so");

        app.apply_payment(success_payment(PaymentKind::Subscription, None, 100.0));
        let sub = app.user().unwrap().subscription.clone().unwrap();
        assert_eq!(sub.plan, SubscriptionPlan::Yearly);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!((sub.end_date - sub.start_date).num_days(), 365);
        assert!(sub.subscription_id.starts_with("sub_"));

        // A later monthly purchase replaces it outright, no merging.
        app.apply_payment(success_payment(PaymentKind::Subscription, None, 10.0));
        let sub = app.user().unwrap().subscription.clone().unwrap();
        assert_eq!(sub.plan, SubscriptionPlan::Monthly);
        assert_eq!((sub.end_date - sub.start_date).num_days(), 30);
        assert_eq!(sub.amount, 10.0);
    }

    #[test]
    fn payments_prepend_newest_first() {
        let mut app = store();
        app.login("arday@yaaldug.so");

        let first = success_payment(PaymentKind::CoursePurchase, Some("c2"), 15.0);
        let second = success_payment(PaymentKind::Subscription, None, 10.0);
        let second_id = second.payment_id.clone();

        app.apply_payment(first);
        app.apply_payment(second);
        assert_eq!(app.payments()[0].payment_id, second_id);
    }

    #[test]
    fn payment_from_course_detail_stays_on_the_course() {
        let mut app = store();
        app.login("arday@yaaldug.so");
        app.open_course("c2");
        assert_eq!(app.screen(), Screen::CourseDetail);

        app.apply_payment(success_payment(
            PaymentKind::CoursePurchase,
            Some("c2"),
            15.0,
        ));
        assert_eq!(app.screen(), Screen::CourseDetail);
        assert_eq!(app.selected_course(), Some("c2"));
    }

    #[test]
    fn apply_payment_requires_a_user() {
        let mut app = store();
        assert!(!app.apply_payment(success_payment(
            PaymentKind::CoursePurchase,
            Some("c2"),
            15.0
        )));
        assert!(app.payments().is_empty());
    }

    #[test]
    fn checkout_requires_user_and_known_course() {
        let mut app = store();
        assert!(app.open_course_checkout("c2").is_none());

        app.login("arday@yaaldug.so");
        assert!(app.open_course_checkout("missing").is_none());
        assert!(app.open_course_checkout("c2").is_some());
        assert!(app.checkout().is_some());

        app.cancel_checkout();
        assert!(app.checkout().is_none());
    }

    #[test]
    fn ask_tutor_queues_the_lesson_prompt_once() {
        let mut app = store();
        app.login("arday@yaaldug.so");

        assert!(!app.ask_tutor_about("c1", "missing"));
        assert!(app.take_queued_prompt().is_none());

        assert!(app.ask_tutor_about("c2", "l2"));
        assert_eq!(app.screen(), Screen::AiTutor);
        assert_eq!(
            app.take_queued_prompt().as_deref(),
            Some("Ma ii sharaxi kartaa casharkan: Variables iyo Equations")
        );
        assert!(app.take_queued_prompt().is_none());
    }

    #[test]
    fn profile_image_replaces_avatar_seed() {
        let mut app = store();
        assert!(!app.set_profile_image("https://cdn.yaaldug.so/me.png"));

        app.login("arday@yaaldug.so");
        assert!(app.set_profile_image("https://cdn.yaaldug.so/me.png"));
        let user = app.user().unwrap();
        assert_eq!(
            user.profile_image.as_deref(),
            Some("https://cdn.yaaldug.so/me.png")
        );
        assert!(user.avatar_seed.is_none());
    }
}
