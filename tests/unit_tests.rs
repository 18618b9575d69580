// Unit tests for Petswipe

use petswipe::core::{render_card, render_exhausted, render_list_card, InteractionState};
use petswipe::dom::contract::{
    list_card_id, CANDIDATE_ID_ATTR, CARD_ID, EXHAUSTED_MESSAGE, HEART_BUTTON_CLASS,
    HEART_BUTTON_ID, SKIP_BUTTON_CLASS, SKIP_BUTTON_ID,
};
use petswipe::dom::{Document, Element};
use petswipe::models::{Candidate, CandidateId, DecisionKind, Direction, NextPetResponse};
use petswipe::services::{DecisionBackend, HttpBackend};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn create_test_pet(id: &str) -> Candidate {
    Candidate {
        id: CandidateId::new(id),
        name: Some("Mochi".to_string()),
        image_url: Some("http://img.test/mochi.jpg".to_string()),
        gender: Some("Female".to_string()),
        age: Some("Baby".to_string()),
        size: Some("Small".to_string()),
        breed: None,
        description: None,
    }
}

#[test]
fn test_next_pet_exhausted_body() {
    let parsed: NextPetResponse = serde_json::from_str(r#"{"no_more": true}"#).unwrap();
    assert!(matches!(parsed, NextPetResponse::Exhausted { no_more: true }));
}

#[test]
fn test_next_pet_candidate_body() {
    let body = r#"{
        "id": 17,
        "name": "Mochi",
        "breed": null,
        "gender": "Female",
        "age": "Baby",
        "size": "Small",
        "image_url": "",
        "description": null
    }"#;
    match serde_json::from_str::<NextPetResponse>(body).unwrap() {
        NextPetResponse::Candidate(pet) => {
            assert_eq!(pet.id.as_str(), "17");
            assert_eq!(pet.breed, None);
            assert_eq!(pet.image_url.as_deref(), Some(""));
        }
        other => panic!("expected a candidate, got {:?}", other),
    }
}

#[test]
fn test_kind_messages() {
    assert_eq!(DecisionKind::Skip.rejected_message(), "Error skipping pet.");
    assert_eq!(DecisionKind::Skip.unreachable_message(), "Failed to skip pet.");
    assert_eq!(DecisionKind::Heart.rejected_message(), "Error hearting pet.");
    assert_eq!(DecisionKind::Heart.unreachable_message(), "Failed to heart pet.");
}

#[test]
fn test_list_card_id_format() {
    assert_eq!(list_card_id("42"), "pet-42");
}

#[test]
fn test_rendered_index_card_is_idle_and_unbound() {
    let doc = Document::with_body(vec![render_card(&create_test_pet("3"))]);
    let card = doc.get_element_by_id(CARD_ID).unwrap();

    assert!(InteractionState::of(Some(card)).is_idle());
    assert_eq!(card.attr(CANDIDATE_ID_ATTR), Some("3"));
    for control in [SKIP_BUTTON_ID, HEART_BUTTON_ID] {
        assert_eq!(doc.get_element_by_id(control).unwrap().listener_count(), 0);
    }
}

#[test]
fn test_rendered_list_cards_are_independent() {
    let doc = Document::with_body(vec![
        render_list_card(&create_test_pet("1")),
        render_list_card(&create_test_pet("2")),
    ]);

    assert!(doc.get_element_by_id("pet-1").is_some());
    assert!(doc.get_element_by_id("pet-2").is_some());
    assert_eq!(doc.query_class(SKIP_BUTTON_CLASS).len(), 2);
    assert_eq!(doc.query_class(HEART_BUTTON_CLASS).len(), 2);
}

#[test]
fn test_missing_optional_fields_render_blank() {
    let text = render_card(&create_test_pet("3")).text_content();
    assert!(text.contains("Mochi"));
    assert!(!text.contains("None"));
    assert!(!text.contains("null"));
}

#[test]
fn test_exhausted_message() {
    assert_eq!(render_exhausted().text_content(), EXHAUSTED_MESSAGE);
}

#[test]
fn test_direction_round_trips_through_class() {
    for direction in [Direction::ExitLeft, Direction::ExitRight] {
        assert_eq!(Direction::from_class(direction.class()), Some(direction));
    }
    assert_eq!(Direction::from_class("pet-card"), None);
}

#[test]
fn test_state_follows_class_changes() {
    let mut card = Element::new("div").with_id(CARD_ID);
    assert!(InteractionState::of(Some(&card)).is_idle());

    card.add_class(DecisionKind::Heart.direction().class());
    assert_eq!(
        InteractionState::of(Some(&card)),
        InteractionState::Animating(Direction::ExitRight)
    );

    card.remove_class(DecisionKind::Heart.direction().class());
    assert!(InteractionState::of(Some(&card)).is_idle());
}

#[test]
fn test_candidate_verification_macros() {
    let mut pet = create_test_pet("8");
    assert_ok!(pet.verify());

    pet.id = CandidateId::new("");
    assert_err!(pet.verify());

    assert_ok!("heart".parse::<DecisionKind>());
    assert_err!("superlike".parse::<DecisionKind>());
}

#[test]
fn test_feed_fetch_against_closed_port_is_transport_failure() {
    // Nothing listens on port 1
    let backend = assert_ok!(HttpBackend::new("http://127.0.0.1:1", Duration::from_secs(2)));
    let err = assert_err!(tokio_test::block_on(backend.next_candidate()));
    assert!(err.is_transport());
}
