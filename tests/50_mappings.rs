mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn mapping_lifecycle_and_duplicate_rejection() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let user = common::register_user(server, "mapper").await?;
    let client = reqwest::Client::new();

    let patient_id = common::create_patient(server, &user, "Alice").await?;
    let doctor_id = common::create_doctor(server, &user, "Bob").await?;

    // First assignment succeeds
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let mapping: Value = res.json().await?;
    let mapping_id = mapping["id"].as_str().unwrap().to_string();
    assert_eq!(mapping["notes"], "");

    // Second assignment of the same pair fails with the fixed message,
    // even with different notes
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id, "notes": "retry" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(
        body["message"],
        "This doctor is already assigned to this patient"
    );

    // Listing expands the references for display
    let res = client
        .get(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == mapping_id.as_str())
        .expect("mapping listed");
    assert_eq!(entry["patient"]["name"], "Alice");
    assert_eq!(entry["doctor"]["name"], "Bob");
    assert_eq!(entry["doctor"]["specialization"], "Cardiology");

    // Doctors-for-patient flattens the doctor and annotates the mapping
    let res = client
        .get(format!(
            "{}/api/mappings/patient/{}",
            server.base_url, patient_id
        ))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let doctors = body.as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["name"], "Bob");
    assert_eq!(doctors[0]["mappingId"], mapping_id.as_str());
    assert_eq!(doctors[0]["notes"], "");

    // Delete
    let res = client
        .delete(format!(
            "{}/api/mappings/delete/{}",
            server.base_url, mapping_id
        ))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Mapping removed");

    // The pair can be assigned again afterwards
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn mapping_create_gate_checks_in_order() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let owner = common::register_user(server, "gate-owner").await?;
    let stranger = common::register_user(server, "gate-stranger").await?;
    let client = reqwest::Client::new();

    let patient_id = common::create_patient(server, &owner, "Gated").await?;
    let doctor_id = common::create_doctor(server, &owner, "Dr Gate").await?;

    // (a) missing patient
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&owner.token)
        .json(&json!({ "patient": uuid::Uuid::new_v4(), "doctor": doctor_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Patient not found");

    // (b) missing doctor
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&owner.token)
        .json(&json!({ "patient": patient_id, "doctor": uuid::Uuid::new_v4() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Doctor not found");

    // (c) caller does not own the patient
    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&stranger.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Not authorized to map this patient");

    Ok(())
}

#[tokio::test]
async fn deleting_a_patient_leaves_its_mappings_dangling() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let user = common::register_user(server, "dangler").await?;
    let client = reqwest::Client::new();

    let patient_id = common::create_patient(server, &user, "Shortlived").await?;
    let doctor_id = common::create_doctor(server, &user, "Dr Stay").await?;

    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let mapping: Value = res.json().await?;
    let mapping_id = mapping["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/api/patients/{}", server.base_url, patient_id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // No cascade: the mapping survives, with its patient unresolvable
    let res = client
        .get(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&user.token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == mapping_id.as_str())
        .expect("dangling mapping still listed");
    assert!(entry["patient"].is_null());
    assert_eq!(entry["doctor"]["name"], "Dr Stay");

    Ok(())
}

#[tokio::test]
async fn mapping_delete_is_owner_only() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let owner = common::register_user(server, "map-owner").await?;
    let stranger = common::register_user(server, "map-stranger").await?;
    let client = reqwest::Client::new();

    let patient_id = common::create_patient(server, &owner, "Kept").await?;
    let doctor_id = common::create_doctor(server, &owner, "Dr Kept").await?;

    let res = client
        .post(format!("{}/api/mappings", server.base_url))
        .bearer_auth(&owner.token)
        .json(&json!({ "patient": patient_id, "doctor": doctor_id }))
        .send()
        .await?;
    let mapping: Value = res.json().await?;
    let mapping_id = mapping["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!(
            "{}/api/mappings/delete/{}",
            server.base_url, mapping_id
        ))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Not authorized to delete this mapping");

    // Stranger also cannot list the owner's patient's doctors
    let res = client
        .get(format!(
            "{}/api/mappings/patient/{}",
            server.base_url, patient_id
        ))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Not authorized to view this patient's doctors");

    Ok(())
}
