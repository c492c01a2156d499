use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cityhall_client::api::CAPACITY_MESSAGE;
use cityhall_client::auth::MemoryStore;
use cityhall_client::error::Error;
use cityhall_client::forms::{default_answers, validate_submission, AnswerValue};
use cityhall_client::CityHall;

fn public_form(capacity_mode: &str) -> serde_json::Value {
    json!({
        "id": 10,
        "titre": "Inscription cantine",
        "status": "published",
        "is_public": true,
        "public_slug": "cantine",
        "capacity_mode": capacity_mode,
        "capacity_max": 30,
        "definition": {
            "version": 1,
            "fields": [
                { "id": "nom", "type": "text", "label": "Nom", "required": true },
                { "id": "cantine", "type": "checkbox", "label": "Cantine", "required": false },
                {
                    "id": "regime",
                    "type": "select",
                    "options": ["Aucun", "Végétarien"],
                    "label": "Régime",
                    "required": true,
                    "visibleWhen": { "fieldId": "cantine", "operator": "equals", "value": "true" }
                }
            ]
        }
    })
}

#[tokio::test]
async fn end_to_end_public_submission() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public/registration-forms/ville/cantine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(public_form("SUBMISSIONS")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/public/registration-forms/ville/cantine/submissions"))
        .and(body_json(json!({
            "data": { "cantine": false, "nom": "Dupont", "regime": "" },
            "persons_count": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "remaining": 12 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let city_hall = CityHall::new(&mock_server.uri(), Arc::new(MemoryStore::new()));
    let client = city_hall.public_forms();

    let form = client.get("ville", "cantine").await.unwrap();
    let definition = form.definition();
    let mut answers = default_answers(&definition);
    answers.insert("nom".to_string(), AnswerValue::Text("Dupont".to_string()));

    // The hidden required field does not block submission.
    assert!(validate_submission(&definition, &answers).is_empty());

    // A stale persons count is forced back to 1 for submission-counted forms.
    let receipt = client
        .submit("ville", "cantine", &form, &answers, 4)
        .await
        .unwrap();
    assert_eq!(receipt.remaining, Some(12));
    assert_eq!(
        receipt.success_message(),
        "Inscription envoyée. Places restantes: 12"
    );
}

#[tokio::test]
async fn persons_counted_forms_send_the_requested_count() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public/registration-forms/ville/cantine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(public_form("PERSONS")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/public/registration-forms/ville/cantine/submissions"))
        .and(body_json(json!({
            "data": { "nom": "Dupont" },
            "persons_count": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "remaining": null })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let city_hall = CityHall::new(&mock_server.uri(), Arc::new(MemoryStore::new()));
    let client = city_hall.public_forms();

    let form = client.get("ville", "cantine").await.unwrap();
    let mut answers = cityhall_client::forms::Answers::new();
    answers.insert("nom".to_string(), AnswerValue::Text("Dupont".to_string()));

    let receipt = client
        .submit("ville", "cantine", &form, &answers, 3)
        .await
        .unwrap();
    assert_eq!(receipt.remaining, None);
    assert_eq!(receipt.success_message(), "Inscription envoyée avec succès.");
}

#[tokio::test]
async fn a_full_form_maps_to_capacity_reached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public/registration-forms/ville/cantine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(public_form("SUBMISSIONS")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/public/registration-forms/ville/cantine/submissions"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "Complet" })))
        .mount(&mock_server)
        .await;

    let city_hall = CityHall::new(&mock_server.uri(), Arc::new(MemoryStore::new()));
    let client = city_hall.public_forms();

    let form = client.get("ville", "cantine").await.unwrap();
    let answers = cityhall_client::forms::Answers::new();
    let err = client
        .submit("ville", "cantine", &form, &answers, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CapacityReached));

    // Hosts word a full form distinctly from a generic failure.
    let wording = match &err {
        Error::CapacityReached => CAPACITY_MESSAGE,
        other => other.server_message().unwrap_or("Erreur lors de l'envoi"),
    };
    assert_eq!(wording, "Complet: la capacité est atteinte.");
}
