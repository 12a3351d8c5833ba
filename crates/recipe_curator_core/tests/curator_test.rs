//! Integration tests for the curator flow: suggestions, gated instructions,
//! favorites and purchases.

mod common;

use chrono::Duration;

use common::{curator, FakePayments, ManualClock, ScriptedInstructions, ScriptedSuggestions};
use recipe_curator_core::{CuratorError, InstructionsOutcome, Route, SubscriptionType};

#[tokio::test]
async fn chicken_and_rice_scenario_gates_instructions_without_a_call() {
    let suggestions = ScriptedSuggestions::returning(&[
        "Chicken Fried Rice",
        "Arroz con Pollo",
        "Chicken Congee",
    ]);
    let instructions = ScriptedInstructions::returning("Cook.");
    let mut curator = curator(
        ManualClock::new(),
        suggestions.clone(),
        instructions.clone(),
        FakePayments::approving(),
    );
    assert_eq!(curator.session().catalog().len(), 0);

    let recipes = curator.generate_recipes("chicken, rice").await.unwrap();
    assert_eq!(recipes.len(), 3);
    assert_eq!(curator.session().catalog().len(), 3);

    let outcome = curator.request_instructions(&recipes[0].title).await.unwrap();
    match outcome {
        InstructionsOutcome::UpgradeRequired(notice) => assert_eq!(notice.title, "Premium Feature"),
        other => panic!("expected an upgrade prompt, got {:?}", other),
    }
    assert_eq!(instructions.calls(), 0);
}

#[tokio::test]
async fn short_ingredient_list_is_rejected_before_any_call() {
    let suggestions = ScriptedSuggestions::returning(&["A"]);
    let mut curator = curator(
        ManualClock::new(),
        suggestions.clone(),
        ScriptedInstructions::returning("Cook."),
        FakePayments::approving(),
    );

    for input in ["", "  ", "eg", " ab "] {
        let err = curator.generate_recipes(input).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter at least one ingredient.");
    }
    assert_eq!(suggestions.calls(), 0);
    assert!(curator.generate_recipes("egg").await.is_ok());
}

#[tokio::test]
async fn suggestion_failure_maps_to_generic_message_and_leaves_catalog_alone() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::failing(),
        ScriptedInstructions::returning("Cook."),
        FakePayments::approving(),
    );

    let err = curator.generate_recipes("chicken, rice").await.unwrap_err();

    assert_eq!(err, CuratorError::Suggestion);
    assert_eq!(
        err.to_string(),
        "Failed to generate recipes. The AI might be resting. Please try again later."
    );
    assert!(curator.session().catalog().is_empty());
}

#[tokio::test]
async fn repeated_suggestions_are_not_duplicated_in_catalog() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["A", "B", "C"]),
        ScriptedInstructions::returning("Cook."),
        FakePayments::approving(),
    );

    curator.generate_recipes("chicken").await.unwrap();
    let again = curator.generate_recipes("chicken").await.unwrap();

    assert_eq!(again.len(), 3);
    assert_eq!(curator.session().catalog().len(), 3);
}

#[tokio::test]
async fn premium_user_fetches_instructions_once_and_they_are_kept() {
    let instructions = ScriptedInstructions::returning("Step one.\n\nStep two.");
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        instructions.clone(),
        FakePayments::approving(),
    );
    curator.session_mut().register("ana");
    curator.session_mut().upgrade_premium(SubscriptionType::Monthly, false);
    curator.generate_recipes("water, salt").await.unwrap();

    let first = curator.request_instructions("Soup").await.unwrap();
    let InstructionsOutcome::Ready(recipe) = first else {
        panic!("expected instructions");
    };
    assert_eq!(recipe.instruction_steps(), vec!["Soup", "Step one.", "Step two."]);
    assert_eq!(
        curator.session().recipe("Soup").unwrap().instructions,
        recipe.instructions
    );

    let second = curator.request_instructions("Soup").await.unwrap();
    assert_eq!(second, InstructionsOutcome::Ready(recipe));
    assert_eq!(instructions.calls(), 1);
}

#[tokio::test]
async fn instructions_are_gated_again_once_the_daily_plan_lapses() {
    let clock = ManualClock::new();
    let instructions = ScriptedInstructions::returning("Cook.");
    let mut curator = curator(
        clock.clone(),
        ScriptedSuggestions::returning(&["Soup", "Stew"]),
        instructions.clone(),
        FakePayments::approving(),
    );
    curator.session_mut().register("ana");
    curator.purchase(SubscriptionType::Daily).await.unwrap();
    curator.generate_recipes("water").await.unwrap();

    assert!(matches!(
        curator.request_instructions("Soup").await.unwrap(),
        InstructionsOutcome::Ready(_)
    ));

    clock.advance(Duration::hours(25));
    assert!(matches!(
        curator.request_instructions("Stew").await.unwrap(),
        InstructionsOutcome::UpgradeRequired(_)
    ));
    assert_eq!(instructions.calls(), 1);
}

#[tokio::test]
async fn instruction_failure_is_reported_and_nothing_is_stored() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::failing(),
        FakePayments::approving(),
    );
    curator.session_mut().register("ana");
    curator.session_mut().upgrade_premium(SubscriptionType::Monthly, false);
    curator.generate_recipes("water").await.unwrap();

    let err = curator.request_instructions("Soup").await.unwrap_err();

    assert_eq!(err, CuratorError::Instruction);
    assert!(curator.session().recipe("Soup").unwrap().instructions.is_none());
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        FakePayments::approving(),
    );

    let err = curator.request_instructions("Cake").await.unwrap_err();
    assert_eq!(err, CuratorError::RecipeNotFound("Cake".to_string()));
}

#[test]
fn favorites_require_login() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        FakePayments::approving(),
    );

    let err = curator.toggle_favorite("Soup").unwrap_err();
    assert_eq!(err.notice().title, "Login Required");
    assert_eq!(err.to_string(), "Please log in to save favorites.");

    curator.session_mut().login("ana");
    let outcome = curator.toggle_favorite("Soup").unwrap();
    assert_eq!(outcome.notice.unwrap().title, "Added to favorites!");
    assert!(curator.session().is_favorite("Soup"));
}

#[tokio::test]
async fn purchase_charges_then_upgrades_and_sends_home() {
    let payments = FakePayments::approving();
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        payments.clone(),
    );
    curator.session_mut().login("ana");

    let outcome = curator.purchase(SubscriptionType::Monthly).await.unwrap();

    assert_eq!(outcome.redirect, Some(Route::Home));
    assert_eq!(outcome.notice.unwrap().title, "Congratulations!");
    assert!(curator.session().is_premium());
    assert_eq!(*payments.charges.lock().unwrap(), vec![SubscriptionType::Monthly]);
}

#[tokio::test]
async fn purchase_requires_login_and_a_paid_plan() {
    let payments = FakePayments::approving();
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        payments.clone(),
    );

    let err = curator.purchase(SubscriptionType::Daily).await.unwrap_err();
    assert_eq!(err, CuratorError::LoginRequired("Please log in to upgrade.".to_string()));

    curator.session_mut().login("ana");
    let err = curator.purchase(SubscriptionType::None).await.unwrap_err();
    assert!(matches!(err, CuratorError::Validation(_)));

    assert!(payments.charges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn active_premium_member_cannot_buy_again() {
    let clock = ManualClock::new();
    let payments = FakePayments::approving();
    let mut curator = curator(
        clock.clone(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        payments.clone(),
    );
    curator.session_mut().register("ana");
    curator.purchase(SubscriptionType::Monthly).await.unwrap();

    let err = curator.purchase(SubscriptionType::Daily).await.unwrap_err();

    assert_eq!(
        err,
        CuratorError::Validation("You are already a Premium Member!".to_string())
    );
    assert_eq!(*payments.charges.lock().unwrap(), vec![SubscriptionType::Monthly]);
    assert_eq!(
        curator.session().user().unwrap().subscription,
        SubscriptionType::Monthly
    );
}

#[tokio::test]
async fn lapsed_daily_plan_can_be_bought_again() {
    let clock = ManualClock::new();
    let payments = FakePayments::approving();
    let mut curator = curator(
        clock.clone(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        payments.clone(),
    );
    curator.session_mut().register("ana");
    curator.purchase(SubscriptionType::Daily).await.unwrap();

    clock.advance(Duration::hours(25));
    curator.purchase(SubscriptionType::Daily).await.unwrap();

    assert!(curator.session().is_premium());
    assert_eq!(payments.charges.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn declined_payment_leaves_plan_unchanged() {
    let mut curator = curator(
        ManualClock::new(),
        ScriptedSuggestions::returning(&["Soup"]),
        ScriptedInstructions::returning("Cook."),
        FakePayments::declining(),
    );
    curator.session_mut().login("ana");

    let err = curator.purchase(SubscriptionType::Daily).await.unwrap_err();

    assert_eq!(err, CuratorError::Payment);
    assert!(!curator.session().is_premium());
    assert_eq!(
        curator.session().user().unwrap().subscription,
        SubscriptionType::None
    );
}
