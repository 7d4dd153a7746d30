use fabcar::types::HistoryEntry;
use fabcar_chaincode::{ledger::TransientMap, ErrorKind};
use fabcar_tests::{
    stubs::FailingStub,
    tagged,
    utils::{sample_car, success},
    Result, TestLedger,
};
use serde_json::{json, Value};
use time::macros::datetime;

#[tokio::test]
async fn history_after_create_and_update() -> Result<()> {
    let test = TestLedger::new().await;
    let car_data = r#"{"id":"CAR1","make":"Toyota","model":"Prius","color":"blue","owner":"Tom","addedAt":1000}"#;
    let _ = success(test.submit("CreateCar", &[car_data]).await)?;
    let _ = success(test.submit("UpdateCarOwner", &["CAR1", "Jerry"]).await)?;

    let history = test.evaluate_json("GetHistoryForAsset", &["CAR1"]).await?;
    let entries = history.as_array().expect("history is an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["Value"]["owner"], "Tom");
    assert_eq!(entries[1]["Value"]["owner"], "Jerry");
    assert_eq!(entries[1]["Value"]["model"], "Prius");
    for entry in entries {
        assert_eq!(entry["IsDelete"], "false");
        assert!(entry["TxId"].as_str().is_some());
    }
    assert_ne!(entries[0]["TxId"], entries[1]["TxId"]);
    Ok(())
}

#[tokio::test]
async fn delete_is_recorded_with_null_value() -> Result<()> {
    let test = TestLedger::new().await;
    let car = sample_car(tagged("CAR"), "Tom");
    let _ = test.create_car(&car).await?;

    let stub = test.ledger.begin_at(
        "delete-tx",
        datetime!(2024-03-05 21:47:03.090605 +02:00),
        TransientMap::new(),
    );
    let _ = test.contract.delete_car_by_id(&stub, &car.id).await?;
    let _committed = stub.commit().await;

    let stub = test.begin();
    let history = test.contract.get_history_for_asset(&stub, &car.id).await?;
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[1],
        HistoryEntry {
            tx_id: "delete-tx".to_string(),
            value: None,
            timestamp: "2024-03-05 19:47:03.090605 +0000 UTC".to_string(),
            is_delete: true,
        }
    );

    let rendered = serde_json::to_value(&history[1])?;
    assert_eq!(rendered["Value"], Value::Null);
    assert_eq!(rendered["IsDelete"], "true");
    Ok(())
}

#[tokio::test]
async fn unknown_key_has_empty_history() -> Result<()> {
    let test = TestLedger::new().await;
    let car_id = tagged("CAR");

    let history = test
        .evaluate_json("GetHistoryForAsset", &[car_id.as_str()])
        .await?;
    assert_eq!(history, json!([]));
    assert_eq!(test.ledger.open_iterators(), 0);
    Ok(())
}

#[tokio::test]
async fn corrupt_history_entry_releases_the_iterator() -> Result<()> {
    let test = TestLedger::new().await;
    let car_id = tagged("CAR");
    test.put_raw(&car_id, b"not json").await;

    let stub = test.begin();
    let error = test
        .contract
        .get_history_for_asset(&stub, &car_id)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CorruptState);
    assert_eq!(test.ledger.open_iterators(), 0);
    Ok(())
}

#[tokio::test]
async fn history_read_failure_is_a_read_error() {
    let test = TestLedger::new().await;
    let stub = FailingStub::new("history unavailable");

    let error = test
        .contract
        .get_history_for_asset(&stub, "CAR1")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Read);
    assert!(error.to_string().starts_with("Failed to get history for CAR1."));
}
