//! Checkout paths driven through the store, and the tutor session running
//! over a real HTTP backend (mocked with `mockito`).

use yaaldug_core::prefs::Preferences;
use yaaldug_core::seed;
use yaaldug_core::store::{CheckoutState, PROCESSING_DELAY};
use yaaldug_core::tutor::{GeminiBackend, TutorSession, FAILURE_FALLBACK};
use yaaldug_core::{AppStore, PaymentKind, Screen, SubscriptionPlan};

/// Readable action logs under `RUST_LOG`; repeated init attempts are fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn signed_in_app() -> AppStore {
    init_tracing();
    let mut app = AppStore::with_seed_data(Preferences::in_memory());
    app.login("hodan@yaaldug.so");
    app
}

#[test]
fn owned_course_dead_ends_without_a_payment() {
    let mut app = signed_in_app();
    // The login template arrives already enrolled in c1.
    assert!(app.user().unwrap().is_enrolled("c1"));

    app.open_course_checkout("c1").unwrap();
    assert_eq!(
        app.checkout().unwrap().state(),
        CheckoutState::AlreadyPurchased
    );

    // Nothing moves the flow forward and no payment exists.
    assert!(!app.submit_checkout());
    assert!(app.payments().is_empty());

    app.cancel_checkout();
    assert!(app.checkout().is_none());
    assert!(app.payments().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_processing_leaves_no_trace() {
    let mut app = signed_in_app();
    app.open_course_checkout("c2").unwrap();

    let flow = app.checkout_mut().unwrap();
    assert!(flow.start());
    assert_eq!(flow.state(), CheckoutState::Processing);

    // The learner navigates away before the simulated SMS lands.
    app.cancel_checkout();
    assert!(app.checkout().is_none());

    tokio::time::advance(PROCESSING_DELAY).await;
    assert!(app.payments().is_empty());
    assert!(!app.user().unwrap().is_enrolled("c2"));
}

#[tokio::test(start_paused = true)]
async fn blank_reference_keeps_the_flow_at_verification() {
    let mut app = signed_in_app();
    app.open_course_checkout("c2").unwrap();
    assert!(app.checkout_mut().unwrap().process().await);

    assert!(!app.submit_checkout());
    app.checkout_mut().unwrap().enter_reference("   ");
    assert!(!app.submit_checkout());

    assert_eq!(
        app.checkout().unwrap().state(),
        CheckoutState::Verification
    );
    assert!(app.payments().is_empty());

    // A real code unblocks the same flow.
    app.checkout_mut().unwrap().enter_reference("tx881");
    assert!(app.submit_checkout());
    assert_eq!(app.payments()[0].reference.as_deref(), Some("TX881"));
}

#[tokio::test(start_paused = true)]
async fn plan_checkout_activates_the_matching_subscription() {
    let mut app = signed_in_app();
    app.navigate(Screen::Pricing);

    let yearly = seed::plans()[1].clone();
    app.open_plan_checkout(&yearly).unwrap();
    assert!(app.checkout_mut().unwrap().process().await);
    app.checkout_mut().unwrap().enter_reference("SUB2024");
    assert!(app.submit_checkout());

    let payment = &app.payments()[0];
    assert_eq!(payment.payment_type, PaymentKind::Subscription);
    assert_eq!(payment.amount, 100.0);
    assert_eq!(payment.course_id, None);

    let sub = app.user().unwrap().subscription.as_ref().unwrap();
    assert_eq!(sub.plan, SubscriptionPlan::Yearly);
    assert_eq!((sub.end_date - sub.start_date).num_days(), 365);
    // Bought from the pricing screen, so the flow lands on the profile.
    assert_eq!(app.screen(), Screen::Profile);
}

#[tokio::test]
async fn tutor_session_runs_over_the_http_backend() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            "/v1beta/models/gemini-3-flash-preview:generateContent",
        )
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Aljebra waa laanta xisaabta ee isticmaasha xarfaha."}]}}]}"#)
        .create_async()
        .await;

    let backend = GeminiBackend::new("test-key").with_base_url(server.url());
    let mut session = TutorSession::new(backend);

    let reply = session.send("Maxay tahay aljebra?").await.unwrap();
    assert_eq!(
        reply.text,
        "Aljebra waa laanta xisaabta ee isticmaasha xarfaha."
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn tutor_failure_becomes_a_chat_message_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock(
            "POST",
            "/v1beta/models/gemini-3-flash-preview:generateContent",
        )
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let backend = GeminiBackend::new("test-key").with_base_url(server.url());
    let mut session = TutorSession::new(backend);

    let reply = session.send("Sharax").await.unwrap();
    assert_eq!(reply.text, FAILURE_FALLBACK);
    assert!(!session.is_busy());
}
