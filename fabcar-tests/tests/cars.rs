use fabcar::types::{Car, ChaincodeResponse};
use fabcar_chaincode::{ledger::ChaincodeStub, ChaincodeError, ErrorKind};
use fabcar_tests::{
    stubs::FailingStub,
    tagged,
    utils::{sample_car, success},
    Result, TestLedger,
};

#[tokio::test]
async fn create_then_get_returns_the_input() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");

    let tx_id = test.create_car(&car).await?;
    assert!(!tx_id.is_empty());

    let stub = test.begin();
    let stored = test.contract.get_car_by_id(&stub, &car.id).await?;
    assert_eq!(stored, car);
    Ok(())
}

#[tokio::test]
async fn tom_to_jerry_scenario() -> Result<()> {
    let test = TestLedger::new().await;
    let car_data = r#"{"id":"CAR1","make":"Toyota","model":"Prius","color":"blue","owner":"Tom","addedAt":1000}"#;

    let _ = success(test.submit("CreateCar", &[car_data]).await)?;
    assert_eq!(
        test.ledger.committed_state("CAR1").await,
        Some(car_data.as_bytes().to_vec())
    );

    let response = success(test.evaluate("GetCarById", &["CAR1"]).await)?;
    assert_eq!(response.payload_str(), car_data);

    let _ = success(test.submit("UpdateCarOwner", &["CAR1", "Jerry"]).await)?;
    let car = test.evaluate_json("GetCarById", &["CAR1"]).await?;
    assert_eq!(car["owner"], "Jerry");
    assert_eq!(car["make"], "Toyota");
    assert_eq!(car["addedAt"], 1000);
    Ok(())
}

#[tokio::test]
async fn second_owner_update_wins() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");
    let _ = test.create_car(&car).await?;

    let _ = success(test.submit("UpdateCarOwner", &[car.id.as_str(), "Jerry"]).await)?;
    let _ = success(test.submit("UpdateCarOwner", &[car.id.as_str(), "Spike"]).await)?;

    let stub = test.begin();
    let stored = test.contract.get_car_by_id(&stub, &car.id).await?;
    assert_eq!(
        stored,
        Car {
            owner: "Spike".to_string(),
            ..car
        }
    );
    Ok(())
}

#[tokio::test]
async fn create_overwrites_and_announces_the_car() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");
    let _ = test.create_car(&car).await?;

    let repainted = Car {
        color: "red".to_string(),
        ..car.clone()
    };
    let tx_id = test.create_car(&repainted).await?;

    let events = test.ledger.events().await;
    assert_eq!(events.len(), 2);
    let last = &events[1];
    assert_eq!(last.tx_id, tx_id);
    assert_eq!(last.name, "CreateAsset");
    assert_eq!(serde_json::from_slice::<Car>(&last.payload)?, repainted);

    let stub = test.begin();
    assert_eq!(test.contract.get_car_by_id(&stub, &car.id).await?, repainted);
    Ok(())
}

#[tokio::test]
async fn owner_update_writes_back_under_the_requested_key() -> Result<()> {
    let test = TestLedger::new().await;
    let key = tagged("CAR");
    let other = tagged("OTHER");
    let stored = sample_car(other.as_str(), "Tom");
    test.put_raw(&key, &serde_json::to_vec(&stored)?).await;

    let _ = success(test.submit("UpdateCarOwner", &[key.as_str(), "Jerry"]).await)?;

    let car = test.evaluate_json("GetCarById", &[key.as_str()]).await?;
    assert_eq!(car["owner"], "Jerry");
    assert_eq!(car["id"], other.as_str());
    assert!(test.ledger.committed_state(&other).await.is_none());
    Ok(())
}

#[tokio::test]
async fn car_without_id_is_rejected_before_anything_is_staged() -> Result<()> {
    let test = TestLedger::new().await;
    let stub = test.begin();

    let error = test
        .contract
        .create_car(&stub, r#"{"owner":"Tom"}"#)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.to_string(), "id field must be a non-empty string");

    let committed = stub.commit().await;
    assert!(committed.keys.is_empty());
    assert_eq!(committed.event, None);
    assert!(test.ledger.committed_state("").await.is_none());
    Ok(())
}

#[tokio::test]
async fn missing_car_is_not_found() -> Result<()> {
    let test = TestLedger::new().await;
    let car_id = tagged("CAR");

    let response = test.evaluate("GetCarById", &[car_id.as_str()]).await;
    assert_eq!(response.status, ChaincodeResponse::ERROR_THRESHOLD);
    assert_eq!(response.message, format!("{car_id} does not exist"));

    let stub = test.begin();
    let error = test
        .contract
        .update_car_owner(&stub, &car_id, "Jerry")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn delete_is_unconditional() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");

    // Deleting a car that never existed still succeeds.
    let response = success(test.submit("DeleteCarById", &[car.id.as_str()]).await)?;
    assert!(!response.payload.is_empty());

    let _ = test.create_car(&car).await?;
    let _ = success(test.submit("DeleteCarById", &[car.id.as_str()]).await)?;

    let stub = test.begin();
    let error = test.contract.get_car_by_id(&stub, &car.id).await.unwrap_err();
    assert!(matches!(error, ChaincodeError::NotFound(id) if id == car.id));
    Ok(())
}

#[tokio::test]
async fn writes_are_not_visible_inside_the_same_transaction() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");
    let car_data = serde_json::to_string(&car)?;

    let stub = test.begin();
    let _tx_id = test.contract.create_car(&stub, &car_data).await?;
    let error = test.contract.get_car_by_id(&stub, &car.id).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);

    let _committed = stub.commit().await;
    let stub = test.begin();
    assert_eq!(test.contract.get_car_by_id(&stub, &car.id).await?, car);
    Ok(())
}

#[tokio::test]
async fn empty_arguments_are_rejected() -> Result<()> {
    let test = TestLedger::new().await;
    let stub = test.begin();

    let cases = [
        (
            test.contract.create_car(&stub, "").await.unwrap_err(),
            "Please pass the correct car data",
        ),
        (
            test.contract
                .update_car_owner(&stub, "", "Jerry")
                .await
                .unwrap_err(),
            "Please pass the correct car id",
        ),
        (
            test.contract.get_car_by_id(&stub, "").await.unwrap_err(),
            "Please provide correct contract Id",
        ),
        (
            test.contract.delete_car_by_id(&stub, "").await.unwrap_err(),
            "Please provide correct contract Id",
        ),
    ];

    for (error, message) in cases {
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.to_string(), message);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_car_is_a_serialization_error() -> Result<()> {
    let test = TestLedger::new().await;

    let response = test.submit("CreateCar", &[r#"{"id":"CAR1","addedAt":"soon"}"#]).await;
    assert_eq!(response.status, ChaincodeResponse::ERROR);
    assert!(response.message.starts_with("Failed while unmarshaling car."));
    assert!(test.ledger.committed_state("CAR1").await.is_none());

    let stub = test.begin();
    let error = test.contract.create_car(&stub, "not json").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Serialization);
    Ok(())
}

#[tokio::test]
async fn corrupt_stored_car_is_reported() -> Result<()> {
    let test = TestLedger::new().await;
    let car_id = tagged("CAR");
    test.put_raw(&car_id, br#"{"id":"CAR1","addedAt":"yesterday"}"#)
        .await;

    let stub = test.begin();
    let error = test.contract.get_car_by_id(&stub, &car_id).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CorruptState);

    let error = test
        .contract
        .update_car_owner(&stub, &car_id, "Jerry")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CorruptState);
    assert!(error.to_string().contains(&car_id));
    Ok(())
}

#[tokio::test]
async fn ledger_failures_are_wrapped_with_context() {
    let test = TestLedger::new().await;
    let stub = FailingStub::new("disk on fire");

    let error = test.contract.get_car_by_id(&stub, "CAR1").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Read);
    assert_eq!(
        error.to_string(),
        "Failed to read from world state. An error occurred within the ledger: disk on fire. See ledger logs."
    );

    let error = test
        .contract
        .update_car_owner(&stub, "CAR1", "Jerry")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Read);
    assert!(error.to_string().starts_with("Failed to get car data."));

    let error = test.contract.delete_car_by_id(&stub, "CAR1").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Write);

    let car_data = serde_json::to_string(&sample_car("CAR1", "Tom")).unwrap();
    let error = test.contract.create_car(&stub, &car_data).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Write);
    assert_eq!(stub.tx_id(), "failing-tx");
}
